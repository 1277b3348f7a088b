//! Identifier conversion from protobuf names to Rust names.

/// Strict and reserved Rust keywords
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

fn is_keyword(ident: &str) -> bool {
    KEYWORDS.contains(&ident)
}

/// Splits a name into words at underscores, punctuation and case changes.
///
/// `HTTPServer` yields `HTTP`, `Server`; `map_field` yields `map`, `field`.
fn words(name: &str) -> Vec<&str> {
    let mut words = Vec::new();

    for segment in name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|segment| !segment.is_empty())
    {
        let bytes = segment.as_bytes();
        let mut start = 0;
        for i in 1..bytes.len() {
            let (prev, cur) = (bytes[i - 1], bytes[i]);
            let next_is_lower = bytes.get(i + 1).is_some_and(u8::is_ascii_lowercase);
            let boundary = ((prev.is_ascii_lowercase() || prev.is_ascii_digit())
                && cur.is_ascii_uppercase())
                || (prev.is_ascii_uppercase() && cur.is_ascii_uppercase() && next_is_lower);
            if boundary {
                words.push(&segment[start..i]);
                start = i;
            }
        }
        words.push(&segment[start..]);
    }

    words
}

/// Converts to `UpperCamelCase`
pub fn to_upper_camel(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    for word in words(name) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.push(first.to_ascii_uppercase());
            result.extend(chars.map(|c| c.to_ascii_lowercase()));
        }
    }
    result
}

/// Converts to `snake_case`
pub fn to_snake(name: &str) -> String {
    words(name)
        .iter()
        .map(|word| word.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Type or variant identifier for a protobuf name
pub fn type_ident(name: &str) -> String {
    let ident = to_upper_camel(name);
    if ident == "Self" {
        return "Self_".to_string();
    }
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{ident}");
    }
    ident
}

/// Field or method identifier for a protobuf name
pub fn field_ident(name: &str) -> String {
    let ident = to_snake(name);
    if NON_RAW_KEYWORDS.contains(&ident.as_str()) {
        format!("{ident}_")
    } else if is_keyword(&ident) {
        format!("r#{ident}")
    } else if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{ident}")
    } else {
        ident
    }
}

/// Module identifier for a message's nested types
pub fn module_ident(name: &str) -> String {
    let ident = to_snake(name);
    if is_keyword(&ident) {
        format!("{ident}_")
    } else {
        ident
    }
}

/// Module name for a `.proto` file, e.g. `google/protobuf/any.proto` to
/// `google_protobuf_any`
pub fn file_module(proto_name: &str) -> String {
    let stem = proto_name.strip_suffix(".proto").unwrap_or(proto_name);
    let ident = module_ident(stem);
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{ident}")
    } else {
        ident
    }
}

/// Variant name for an enum value, with the enum's own name stripped from
/// the front when what remains is still a valid identifier.
///
/// `Corpus` / `CORPUS_WEB` gives `Web`.
pub fn enum_variant(enum_name: &str, value_name: &str) -> String {
    let prefix = to_upper_camel(enum_name);
    let camel = to_upper_camel(value_name);

    match camel.strip_prefix(&prefix) {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_uppercase()) => type_ident(rest),
        _ => type_ident(&camel),
    }
}
