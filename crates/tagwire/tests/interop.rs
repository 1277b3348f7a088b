//! Differential tests against `prost` and `prost-reflect`.
//!
//! Bytes produced by either side must decode to the same values on the
//! other side.

#[path = "../../../testdata/simple.rs"]
mod common;

use common::{foo, BasicMap, Foo, Test1};
use pretty_assertions::assert_eq;
use prost_reflect::{DescriptorPool, DynamicMessage, MapKey, Value};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet, MessageOptions,
};
use std::collections::HashMap;
use tagwire::Message;

#[derive(Clone, PartialEq, prost::Message)]
struct ProstTest1 {
    #[prost(int32, tag = "1")]
    a: i32,
}

#[derive(Clone, PartialEq, prost::Oneof)]
enum ProstChoice {
    #[prost(string, tag = "18")]
    Name(String),
    #[prost(int32, tag = "19")]
    Id(i32),
}

#[derive(Clone, PartialEq, prost::Message)]
struct ProstFoo {
    #[prost(int32, tag = "1")]
    a: i32,
    #[prost(double, tag = "2")]
    b: f64,
    #[prost(sint32, tag = "3")]
    c: i32,
    #[prost(int64, tag = "4")]
    d: i64,
    #[prost(uint32, repeated, tag = "5")]
    e: Vec<u32>,
    #[prost(uint64, tag = "6")]
    f: u64,
    #[prost(sint64, tag = "7")]
    g: i64,
    #[prost(fixed32, tag = "8")]
    h: u32,
    #[prost(fixed64, tag = "9")]
    i: u64,
    #[prost(sfixed32, tag = "10")]
    j: i32,
    #[prost(sfixed64, tag = "11")]
    k: i64,
    #[prost(float, tag = "12")]
    l: f32,
    #[prost(int32, tag = "13")]
    m: i32,
    #[prost(bytes = "vec", tag = "14")]
    n: Vec<u8>,
    #[prost(bool, tag = "15")]
    o: bool,
    #[prost(string, repeated, tag = "16")]
    p: Vec<String>,
    #[prost(message, optional, boxed, tag = "17")]
    child: Option<Box<ProstFoo>>,
    #[prost(oneof = "ProstChoice", tags = "18, 19")]
    choice: Option<ProstChoice>,
}

#[derive(Clone, PartialEq, prost::Message)]
struct ProstBasicMap {
    #[prost(map = "string, int32", tag = "1")]
    map_field: HashMap<String, i32>,
}

fn sample_foo() -> Foo {
    Foo {
        a: -100,
        b: 2.5,
        c: -23,
        d: i64::MIN,
        e: vec![5, 4, 2, 1, u32::MAX],
        f: u64::MAX,
        g: -20,
        h: 200,
        i: 900,
        j: -23,
        k: 55,
        l: 0.5,
        m: 2,
        n: b"raw".to_vec(),
        o: true,
        p: vec!["alpha".into(), String::new()],
        child: Some(Box::new(Foo {
            p: vec!["nested".into()],
            choice: Some(foo::Choice::Id(-1)),
            ..Default::default()
        })),
        choice: Some(foo::Choice::Name("outer".into())),
    }
}

fn to_prost(msg: &Foo) -> ProstFoo {
    ProstFoo {
        a: msg.a,
        b: msg.b,
        c: msg.c,
        d: msg.d,
        e: msg.e.clone(),
        f: msg.f,
        g: msg.g,
        h: msg.h,
        i: msg.i,
        j: msg.j,
        k: msg.k,
        l: msg.l,
        m: msg.m,
        n: msg.n.clone(),
        o: msg.o,
        p: msg.p.clone(),
        child: msg.child.as_deref().map(|child| Box::new(to_prost(child))),
        choice: msg.choice.as_ref().map(|choice| match choice {
            foo::Choice::Name(name) => ProstChoice::Name(name.clone()),
            foo::Choice::Id(id) => ProstChoice::Id(*id),
        }),
    }
}

#[test]
fn test_test1_bytes_match_prost() {
    let ours = Test1 { a: 150 }.encode_to_vec();
    let theirs = prost::Message::encode_to_vec(&ProstTest1 { a: 150 });
    assert_eq!(ours, theirs);
}

#[test]
fn test_foo_bytes_match_prost() {
    let msg = sample_foo();
    let ours = msg.encode_to_vec();
    let theirs = prost::Message::encode_to_vec(&to_prost(&msg));
    assert_eq!(ours, theirs);
}

#[test]
fn test_prost_decodes_our_output() {
    let msg = sample_foo();
    let decoded = <ProstFoo as prost::Message>::decode(msg.encode_to_vec().as_slice()).unwrap();
    assert_eq!(decoded, to_prost(&msg));
}

#[test]
fn test_we_decode_prost_output() {
    let msg = sample_foo();
    let bytes = prost::Message::encode_to_vec(&to_prost(&msg));
    assert_eq!(Foo::decode(&bytes).unwrap(), msg);
}

#[test]
fn test_map_interop_with_prost() {
    let map_field: HashMap<String, i32> = [("A", 1), ("B", 2), ("", 0)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

    let ours = BasicMap {
        map_field: map_field.clone(),
    };
    let decoded = <ProstBasicMap as prost::Message>::decode(ours.encode_to_vec().as_slice()).unwrap();
    assert_eq!(decoded.map_field, map_field);

    // prost omits default keys and values inside entries
    let theirs = prost::Message::encode_to_vec(&ProstBasicMap {
        map_field: map_field.clone(),
    });
    assert_eq!(BasicMap::decode(&theirs).unwrap().map_field, map_field);
}

/// Descriptor for `simple.BasicMap` as protoc would emit it.
fn basic_map_descriptor() -> FileDescriptorSet {
    let scalar = |name: &str, number: i32, ty: Type| FieldDescriptorProto {
        name: Some(name.into()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    };

    let entry = DescriptorProto {
        name: Some("MapFieldEntry".into()),
        field: vec![scalar("key", 1, Type::String), scalar("value", 2, Type::Int32)],
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    };

    let message = DescriptorProto {
        name: Some("BasicMap".into()),
        field: vec![FieldDescriptorProto {
            name: Some("map_field".into()),
            number: Some(1),
            label: Some(Label::Repeated as i32),
            r#type: Some(Type::Message as i32),
            type_name: Some(".simple.BasicMap.MapFieldEntry".into()),
            json_name: Some("mapField".into()),
            ..Default::default()
        }],
        nested_type: vec![entry],
        ..Default::default()
    };

    FileDescriptorSet {
        file: vec![FileDescriptorProto {
            name: Some("simple.proto".into()),
            package: Some("simple".into()),
            message_type: vec![message],
            syntax: Some("proto3".into()),
            ..Default::default()
        }],
    }
}

#[test]
fn test_map_interop_with_dynamic_message() {
    let pool = DescriptorPool::from_file_descriptor_set(basic_map_descriptor()).unwrap();
    let descriptor = pool.get_message_by_name("simple.BasicMap").unwrap();

    let mut entries = HashMap::new();
    for (key, value) in [("A", 1), ("B", 2), ("C", 3)] {
        entries.insert(MapKey::String(key.into()), Value::I32(value));
    }
    let mut dynamic = DynamicMessage::new(descriptor.clone());
    dynamic.set_field_by_name("map_field", Value::Map(entries));

    let bytes = prost::Message::encode_to_vec(&dynamic);
    let ours = BasicMap::decode(&bytes).unwrap();
    assert_eq!(ours.map_field.len(), 3);
    assert_eq!(ours.map_field["A"], 1);
    assert_eq!(ours.map_field["C"], 3);

    let back = DynamicMessage::decode(descriptor, ours.encode_to_vec().as_slice()).unwrap();
    let value = back.get_field_by_name("map_field").unwrap();
    let map = value.as_map().unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map[&MapKey::String("B".into())], Value::I32(2));
}
