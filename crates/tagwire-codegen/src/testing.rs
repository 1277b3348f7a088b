//! Descriptor builders for unit tests.

use crate::protocol::field_descriptor_proto::{Label, Type};
use crate::protocol::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FieldOptions, FileDescriptorProto, MessageOptions, OneofDescriptorProto,
};

pub(crate) fn file(name: &str, package: &str) -> FileDescriptorProto {
    FileDescriptorProto {
        name: name.into(),
        package: package.into(),
        syntax: "proto3".into(),
        ..Default::default()
    }
}

pub(crate) fn message(name: &str, field: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: name.into(),
        field,
        ..Default::default()
    }
}

pub(crate) fn scalar(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: name.into(),
        number,
        label: Label::Optional as i32,
        r#type: ty as i32,
        ..Default::default()
    }
}

pub(crate) fn repeated(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        label: Label::Repeated as i32,
        ..scalar(name, number, ty)
    }
}

pub(crate) fn typed(name: &str, number: i32, ty: Type, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: type_name.into(),
        ..scalar(name, number, ty)
    }
}

pub(crate) fn packed(mut field: FieldDescriptorProto, packed: bool) -> FieldDescriptorProto {
    field.options = Some(FieldOptions {
        packed: Some(packed),
    });
    field
}

pub(crate) fn in_oneof(mut field: FieldDescriptorProto, index: i32) -> FieldDescriptorProto {
    field.oneof_index = Some(index);
    field
}

pub(crate) fn oneof(name: &str) -> OneofDescriptorProto {
    OneofDescriptorProto { name: name.into() }
}

pub(crate) fn enumeration(name: &str, values: &[(&str, i32)]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: name.into(),
        value: values
            .iter()
            .map(|(name, number)| EnumValueDescriptorProto {
                name: (*name).into(),
                number: *number,
            })
            .collect(),
    }
}

/// A map field plus the entry message protoc synthesizes for it.
pub(crate) fn map_field(
    parent: &mut DescriptorProto,
    parent_full_name: &str,
    name: &str,
    number: i32,
    key: Type,
    value: FieldDescriptorProto,
) {
    let entry_name = format!("{}Entry", crate::codegen::names::to_upper_camel(name));
    parent.nested_type.push(DescriptorProto {
        name: entry_name.clone(),
        field: vec![scalar("key", 1, key), FieldDescriptorProto { name: "value".into(), number: 2, ..value }],
        options: Some(MessageOptions {
            map_entry: Some(true),
        }),
        ..Default::default()
    });
    parent.field.push(FieldDescriptorProto {
        label: Label::Repeated as i32,
        ..typed(name, number, Type::Message, &format!(".{parent_full_name}.{entry_name}"))
    });
}
