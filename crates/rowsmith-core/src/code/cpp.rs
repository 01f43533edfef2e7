use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::code::{CodeEmitter, Language};
use crate::error::Result;
use crate::generate::engine::Dataset;
use crate::generate::value::{float_literal, Value};

static NON_IDENTIFIER_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("static pattern compiles"));

const CPP_KEYWORDS: &[&str] = &[
    "auto", "bool", "break", "case", "char", "class", "const", "continue", "default", "delete",
    "do", "double", "else", "enum", "explicit", "false", "float", "for", "friend", "goto", "if",
    "int", "long", "namespace", "new", "nullptr", "operator", "private", "protected", "public",
    "return", "short", "signed", "sizeof", "static", "struct", "switch", "template", "this",
    "throw", "true", "try", "typedef", "typename", "union", "unsigned", "using", "virtual", "void",
    "volatile", "while",
];

/// Member type inferred from every value in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CppType {
    Bool,
    Integer,
    Double,
    Text,
}

impl CppType {
    fn name(self) -> &'static str {
        match self {
            CppType::Bool => "bool",
            CppType::Integer => "long long",
            CppType::Double => "double",
            CppType::Text => "std::string",
        }
    }
}

#[derive(Debug)]
struct Member {
    label: String,
    ident: String,
    ty: CppType,
    optional: bool,
}

/// A `struct Record` with per-column member types, a `std::vector<Record>`
/// literal, and a print loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct CppEmitter;

impl CodeEmitter for CppEmitter {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn emit(&self, dataset: &Dataset) -> Result<String> {
        let members = infer_members(dataset);
        let mut out = String::from(
            "#include <iostream>\n#include <optional>\n#include <string>\n#include <vector>\n\n",
        );

        out.push_str("struct Record {\n");
        for m in &members {
            if m.optional {
                out.push_str(&format!("    std::optional<{}> {};\n", m.ty.name(), m.ident));
            } else {
                out.push_str(&format!("    {} {};\n", m.ty.name(), m.ident));
            }
        }
        out.push_str("};\n\n");

        out.push_str(
            "template <typename T>\nvoid print_field(const T& value) {\n    std::cout << value;\n}\n\n\
             template <typename T>\nvoid print_field(const std::optional<T>& value) {\n    \
             if (value) {\n        std::cout << *value;\n    } else {\n        std::cout << \"null\";\n    }\n}\n\n",
        );

        out.push_str("int main() {\n");
        if dataset.is_empty() {
            out.push_str("    std::vector<Record> data;\n\n");
        } else {
            out.push_str("    std::vector<Record> data = {\n");
            for row in dataset {
                let values: Vec<String> = members
                    .iter()
                    .map(|m| cpp_literal(row.get(&m.label).unwrap_or(&Value::Null), m))
                    .collect();
                out.push_str(&format!("        {{{}}},\n", values.join(", ")));
            }
            out.push_str("    };\n\n");
        }

        out.push_str("    std::cout << std::boolalpha;\n");
        out.push_str("    for (const auto& record : data) {\n");
        for (i, m) in members.iter().enumerate() {
            let sep = if i == 0 { "" } else { ", " };
            out.push_str(&format!(
                "        std::cout << {};\n        print_field(record.{});\n",
                cpp_string(&format!("{}{}=", sep, m.label)),
                m.ident
            ));
        }
        out.push_str("        std::cout << std::endl;\n    }\n    return 0;\n}\n");
        Ok(out)
    }
}

fn infer_members(dataset: &Dataset) -> Vec<Member> {
    let mut used = HashSet::new();
    dataset
        .columns()
        .into_iter()
        .map(|label| {
            let mut ty: Option<CppType> = None;
            let mut optional = false;
            for row in dataset {
                let value = row.get(label).unwrap_or(&Value::Null);
                let seen = match value {
                    Value::Null => {
                        optional = true;
                        continue;
                    }
                    Value::Float(f) if !f.is_finite() => {
                        optional = true;
                        continue;
                    }
                    Value::Bool(_) => CppType::Bool,
                    Value::Int(_) => CppType::Integer,
                    Value::Float(_) => CppType::Double,
                    _ => CppType::Text,
                };
                ty = Some(match (ty, seen) {
                    (None, t) => t,
                    (Some(a), b) if a == b => a,
                    (Some(CppType::Integer), CppType::Double)
                    | (Some(CppType::Double), CppType::Integer) => CppType::Double,
                    _ => CppType::Text,
                });
            }

            let mut ident = member_ident(label);
            while !used.insert(ident.clone()) {
                ident.push('_');
            }
            Member {
                label: label.to_string(),
                ident,
                ty: ty.unwrap_or(CppType::Text),
                optional,
            }
        })
        .collect()
}

/// Sanitize a field name into a C++ identifier.
fn member_ident(name: &str) -> String {
    let mut ident = NON_IDENTIFIER_CHARS.replace_all(name, "_").into_owned();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if CPP_KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

fn cpp_literal(value: &Value, member: &Member) -> String {
    match (value, member.ty) {
        (Value::Null, _) => "std::nullopt".to_string(),
        (Value::Float(f), _) if !f.is_finite() => "std::nullopt".to_string(),
        (Value::Bool(b), CppType::Bool) => b.to_string(),
        (Value::Int(i), CppType::Integer) => integer_literal(*i),
        (Value::Int(i), CppType::Double) => float_literal(*i as f64),
        (Value::Float(f), CppType::Double) => float_literal(*f),
        (other, _) => cpp_string(&other.to_text()),
    }
}

fn integer_literal(i: i64) -> String {
    if i == i64::MIN {
        // The literal 9223372036854775808LL does not fit before negation.
        "(-9223372036854775807LL - 1)".to_string()
    } else if i32::try_from(i).is_ok() {
        i.to_string()
    } else {
        format!("{}LL", i)
    }
}

/// C++ string literal. Control characters use octal escapes, which cannot
/// swallow a following digit the way `\x` escapes do.
fn cpp_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '?' => out.push_str("\\?"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\{:03o}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
