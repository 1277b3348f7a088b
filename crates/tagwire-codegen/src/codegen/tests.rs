use super::*;
use crate::protocol::field_descriptor_proto::{Label, Type};
use crate::protocol::{FieldDescriptorProto, FileDescriptorProto};
use crate::resolver::resolve;
use crate::testing::*;
use pretty_assertions::assert_eq;

/// Hand-written reference output, also compiled by the runtime's wire tests
const SIMPLE_RS: &str = include_str!("../../../../testdata/simple.rs");

fn simple_proto() -> FileDescriptorProto {
    let mut proto = file("simple.proto", "simple");

    proto.message_type.push(message("Test1", vec![scalar("a", 1, Type::Int32)]));
    proto.message_type.push(message(
        "BasicRepeated",
        vec![
            packed(repeated("a", 1, Type::Bool), false),
            scalar("b", 2, Type::Int32),
            packed(repeated("c", 3, Type::Float), true),
        ],
    ));
    proto.message_type.push(message(
        "RepeatedStrings",
        vec![repeated("a", 1, Type::String), scalar("b", 2, Type::Int32)],
    ));

    let mut nested = message("NestedMessage", vec![typed("a", 1, Type::Message, "Inner")]);
    nested.nested_type.push(message("Inner", vec![scalar("b", 1, Type::String)]));
    proto.message_type.push(nested);

    let mut basic_map = message("BasicMap", vec![]);
    map_field(&mut basic_map, "simple.BasicMap", "map_field", 1, Type::String, scalar("", 0, Type::Int32));
    proto.message_type.push(basic_map);

    let mut foo = message(
        "Foo",
        vec![
            scalar("a", 1, Type::Int32),
            scalar("b", 2, Type::Double),
            scalar("c", 3, Type::Sint32),
            scalar("d", 4, Type::Int64),
            repeated("e", 5, Type::Uint32),
            scalar("f", 6, Type::Uint64),
            scalar("g", 7, Type::Sint64),
            scalar("h", 8, Type::Fixed32),
            scalar("i", 9, Type::Fixed64),
            scalar("j", 10, Type::Sfixed32),
            scalar("k", 11, Type::Sfixed64),
            scalar("l", 12, Type::Float),
            typed("m", 13, Type::Enum, "Corpus"),
            scalar("n", 14, Type::Bytes),
            scalar("o", 15, Type::Bool),
            repeated("p", 16, Type::String),
            typed("child", 17, Type::Message, "Foo"),
            in_oneof(scalar("name", 18, Type::String), 0),
            in_oneof(scalar("id", 19, Type::Int32), 0),
        ],
    );
    foo.oneof_decl.push(oneof("choice"));
    proto.message_type.push(foo);

    proto.enum_type.push(enumeration(
        "Corpus",
        &[("CORPUS_UNIVERSAL", 0), ("CORPUS_WEB", 1), ("CORPUS_NEWS", 2)],
    ));
    proto
}

fn generate(files: &[FileDescriptorProto], name: &str, config: &GeneratorConfig) -> String {
    let schema = resolve(files).unwrap();
    let id = schema.file_by_name(name).unwrap();
    generate_file(&schema, id, config).unwrap().content
}

/// Everything after the header comment block
fn body(content: &str) -> &str {
    content.split_once("\n\n").map_or("", |(_, body)| body)
}

#[test]
fn test_simple_proto_matches_reference() {
    let content = generate(&[simple_proto()], "simple.proto", &GeneratorConfig::default());
    let (_, expected) = SIMPLE_RS.split_once("#![allow(dead_code)]\n\n").unwrap();
    assert_eq!(body(&content), expected);
}

#[test]
fn test_header() {
    let schema = resolve(&[simple_proto()]).unwrap();
    let id = schema.file_by_name("simple.proto").unwrap();
    let generated = generate_file(&schema, id, &GeneratorConfig::default()).unwrap();
    assert_eq!(generated.name, "simple.rs");

    let header: Vec<&str> = generated.content.lines().take(3).collect();
    assert_eq!(header[0], "// This file is @generated by protoc-gen-tagwire. Do not edit.");
    assert_eq!(header[1], "// source: simple.proto");
    assert_eq!(header[2], format!("// descriptor digest: {}", schema.file(id).digest));

    let without_digest = generate(
        &[simple_proto()],
        "simple.proto",
        &GeneratorConfig::new().emit_digest(false),
    );
    assert!(!without_digest.contains("descriptor digest"));
}

#[test]
fn test_empty_message() {
    let mut proto = file("empty.proto", "");
    proto.message_type.push(message("Empty", vec![]));
    let content = generate(&[proto], "empty.proto", &GeneratorConfig::default());

    let expected = "\
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Empty {
}

impl ::tagwire::Message for Empty {
    fn encode_raw<B: ::tagwire::bytes::BufMut>(&self, _buf: &mut B) {}

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: ::tagwire::WireType,
        reader: &mut ::tagwire::WireReader<'_>,
        _ctx: ::tagwire::DecodeContext,
    ) -> ::tagwire::Result<()> {
        match number {
            _ => ::tagwire::wire::skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        0
    }
}
";
    assert_eq!(body(&content), expected);
}

#[test]
fn test_relative_paths_within_file() {
    let mut outer = message("Outer", vec![]);
    outer.nested_type.push(message("A", vec![typed("b", 1, Type::Message, "B")]));
    outer.nested_type.push(message("B", vec![]));
    let mut proto = file("paths.proto", "pkg");
    proto.message_type.push(outer);
    proto.message_type.push(message(
        "Other",
        vec![typed("b", 1, Type::Message, "Outer.B")],
    ));

    let content = generate(&[proto], "paths.proto", &GeneratorConfig::default());
    // Inside `outer`, the sibling is reachable directly
    assert!(content.contains("        pub b: ::core::option::Option<B>,\n"));
    // From the file root, through the nested module
    assert!(content.contains("    pub b: ::core::option::Option<outer::B>,\n"));
}

#[test]
fn test_cross_file_paths() {
    let mut common = file("shared/common.proto", "shared");
    let mut wrapper = message("Wrapper", vec![]);
    wrapper.nested_type.push(message("Item", vec![]));
    common.message_type.push(wrapper);
    common.enum_type.push(enumeration("Level", &[("LEVEL_LOW", 0), ("LEVEL_HIGH", 1)]));

    let mut api = file("api.proto", "api");
    api.dependency.push("shared/common.proto".into());
    let mut request = message(
        "Request",
        vec![
            typed("item", 1, Type::Message, "shared.Wrapper.Item"),
            typed("level", 2, Type::Enum, ".shared.Level"),
        ],
    );
    request.nested_type.push(message(
        "Part",
        vec![typed("item", 1, Type::Message, "shared.Wrapper.Item")],
    ));
    api.message_type.push(request);

    let content = generate(&[common, api], "api.proto", &GeneratorConfig::default());
    assert!(content.contains(
        "pub item: ::core::option::Option<super::shared_common::wrapper::Item>,"
    ));
    assert!(content.contains(
        "pub item: ::core::option::Option<super::super::shared_common::wrapper::Item>,"
    ));
    assert!(content.contains("pub fn level(&self) -> super::shared_common::Level {"));
}

#[test]
fn test_mutual_recursion_is_boxed() {
    let mut proto = file("tree.proto", "");
    proto.message_type.push(message("A", vec![typed("b", 1, Type::Message, "B")]));
    proto.message_type.push(message(
        "B",
        vec![
            typed("a", 1, Type::Message, "A"),
            FieldDescriptorProto {
                label: Label::Repeated as i32,
                ..typed("many", 2, Type::Message, "A")
            },
        ],
    ));

    let content = generate(&[proto], "tree.proto", &GeneratorConfig::default());
    assert!(content.contains("pub b: ::core::option::Option<::std::boxed::Box<B>>,"));
    assert!(content.contains("pub a: ::core::option::Option<::std::boxed::Box<A>>,"));
    assert!(content.contains("pub many: ::std::vec::Vec<A>,"));
}

#[test]
fn test_boxed_oneof_member() {
    let mut node = message(
        "Node",
        vec![
            in_oneof(typed("next", 1, Type::Message, "Node"), 0),
            in_oneof(scalar("leaf", 2, Type::Int64), 0),
        ],
    );
    node.oneof_decl.push(oneof("kind"));
    let mut proto = file("list.proto", "");
    proto.message_type.push(node);

    let content = generate(&[proto], "list.proto", &GeneratorConfig::default());
    assert!(content.contains("        Next(::std::boxed::Box<super::Node>),\n"));
    assert!(content.contains(
        "let mut value: ::std::boxed::Box<Node> = ::core::default::Default::default();"
    ));
    assert!(content.contains(
        "::tagwire::encoding::message::merge(wire_type, &mut *value, reader, ctx)?;"
    ));
    assert!(content.contains("::tagwire::encoding::message::encode(1, &**value, buf);"));
}

#[test]
fn test_enum_aliases_and_default() {
    let mut proto = file("status.proto", "");
    proto.enum_type.push(enumeration(
        "Status",
        &[("STATUS_FAILED", -1), ("STATUS_OK", 0), ("STATUS_FINE", 0)],
    ));
    let content = generate(&[proto], "status.proto", &GeneratorConfig::default());

    assert!(content.contains("    Failed = -1,\n    Ok = 0,\n}"));
    assert!(content.contains(
        "    #[allow(non_upper_case_globals)]\n    pub const Fine: Self = Self::Ok;\n\n"
    ));
    assert!(content.contains("\"STATUS_FINE\" => ::core::option::Option::Some(Self::Ok),"));
    assert!(content.contains("    fn default() -> Self {\n        Self::Ok\n    }"));
    assert!(!content.contains("0 => ::core::result::Result::Ok(Self::Fine)"));
}

#[test]
fn test_keywords_and_btree_map() {
    let mut msg = message("Item", vec![scalar("type", 1, Type::Int32)]);
    map_field(&mut msg, "Item", "by_id", 2, Type::Uint64, scalar("", 0, Type::Bytes));
    let mut proto = file("item.proto", "");
    proto.message_type.push(msg);

    let content = generate(&[proto], "item.proto", &GeneratorConfig::new().btree_map(true));
    assert!(content.contains("pub r#type: i32,"));
    assert!(content.contains("1 => ::tagwire::encoding::int32::merge(wire_type, &mut self.r#type, reader, ctx),"));
    assert!(content.contains("pub by_id: ::std::collections::BTreeMap<u64, ::std::vec::Vec<u8>>,"));
    assert!(!content.contains("ByIdEntry"));
}

#[test]
fn test_runtime_path_and_indent() {
    let mut proto = file("one.proto", "");
    proto.message_type.push(message("One", vec![scalar("v", 1, Type::Bool)]));
    let config = GeneratorConfig::new().runtime_path("crate::rt").indent_str("  ");
    let content = generate(&[proto], "one.proto", &config);

    assert!(content.contains("impl crate::rt::Message for One {\n  fn encode_raw<B: crate::rt::bytes::BufMut>"));
    assert!(content.contains("    if self.v {\n      crate::rt::encoding::bool::encode(1, &self.v, buf);"));
}

#[test]
fn test_index_and_file_names() {
    assert_eq!(output_file_name("google/protobuf/empty.proto"), "google_protobuf_empty.rs");

    let mut dependency = file("b/dep.proto", "");
    dependency.message_type.push(message("Dep", vec![]));
    let mut main = file("a.proto", "");
    main.dependency.push("b/dep.proto".into());
    let schema = resolve(&[main, dependency]).unwrap();
    let files: Vec<FileId> = schema.files().map(|(id, _)| id).collect();

    let index = generate_index(&schema, &files, &GeneratorConfig::default()).unwrap();
    assert_eq!(index.name, "mod.rs");
    assert_eq!(
        index.content,
        "// This file is @generated by protoc-gen-tagwire. Do not edit.\n\npub mod a;\npub mod b_dep;\n"
    );
}
