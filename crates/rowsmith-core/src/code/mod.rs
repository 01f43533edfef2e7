//! # Code Emitters
//!
//! Render a dataset as a literal declaration in Python, C++, Java, or
//! JavaScript, followed by a loop that prints each record. Row order and
//! field order are preserved. Strings, temporal values, and UUIDs become
//! string literals; numbers and booleans stay bare.

pub mod cpp;
pub mod java;
pub mod javascript;
pub mod python;

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, RowsmithError};
use crate::generate::engine::Dataset;

/// Target programming language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    Cpp,
    Java,
    JavaScript,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Python,
        Language::Cpp,
        Language::Java,
        Language::JavaScript,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::JavaScript => "javascript",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::JavaScript => "js",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = RowsmithError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "cpp" | "c++" | "cplusplus" => Ok(Language::Cpp),
            "java" => Ok(Language::Java),
            "javascript" | "js" | "node" => Ok(Language::JavaScript),
            other => Err(RowsmithError::config(format!(
                "Unknown language '{}'. Expected one of: python, cpp, java, javascript",
                other
            ))),
        }
    }
}

/// Capability to render a dataset as source code.
pub trait CodeEmitter {
    fn language(&self) -> Language;

    fn emit(&self, dataset: &Dataset) -> Result<String>;
}

pub fn emitter_for(language: Language) -> Box<dyn CodeEmitter> {
    match language {
        Language::Python => Box::new(python::PythonEmitter),
        Language::Cpp => Box::new(cpp::CppEmitter),
        Language::Java => Box::new(java::JavaEmitter),
        Language::JavaScript => Box::new(javascript::JavaScriptEmitter),
    }
}

pub fn render_code(dataset: &Dataset, language: Language) -> Result<String> {
    emitter_for(language).emit(dataset)
}

/// Double-quoted string literal with JSON escapes, which Python, Java, and
/// JavaScript all accept.
pub(crate) fn quoted(s: &str) -> Result<String> {
    crate::output::json::json_key(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parsing() {
        assert_eq!("C++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("js".parse::<Language>().unwrap(), Language::JavaScript);
        assert!(matches!(
            "cobol".parse::<Language>(),
            Err(RowsmithError::Configuration { .. })
        ));
    }

    #[test]
    fn test_quoted_escapes() {
        assert_eq!(quoted("a\"b\\c\n").unwrap(), r#""a\"b\\c\n""#);
    }
}
