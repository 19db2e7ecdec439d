use std::fmt;

use facade_serde::{BitReader, BitWrite, Serde, SerdeErr};
use thiserror::Error;

/// Namespace assumed when an identifier string carries none
pub const DEFAULT_NAMESPACE: &str = "minecraft";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("Identifier namespace '{namespace}' contains invalid characters")]
    InvalidNamespace { namespace: String },

    #[error("Identifier path '{path}' contains invalid characters")]
    InvalidPath { path: String },
}

/// A namespaced identifier such as `facade:ruby_block`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    namespace: String,
    path: String,
}

impl Identifier {
    /// Creates an Identifier from a namespace and a path
    ///
    /// # Panics
    ///
    /// Panics if either part contains characters outside of the allowed set.
    /// Use `try_new` for input that did not originate in this process.
    pub fn new(namespace: &str, path: &str) -> Self {
        Self::try_new(namespace, path).expect("invalid identifier")
    }

    pub fn try_new(namespace: &str, path: &str) -> Result<Self, IdentifierError> {
        if namespace.is_empty() || !namespace.chars().all(is_valid_namespace_char) {
            return Err(IdentifierError::InvalidNamespace {
                namespace: namespace.to_string(),
            });
        }
        if path.is_empty() || !path.chars().all(is_valid_path_char) {
            return Err(IdentifierError::InvalidPath {
                path: path.to_string(),
            });
        }
        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Parses `namespace:path`, or a bare `path` in the default namespace
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        match value.split_once(':') {
            Some((namespace, path)) => Self::try_new(namespace, path),
            None => Self::try_new(DEFAULT_NAMESPACE, value),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

fn is_valid_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
}

fn is_valid_path_char(c: char) -> bool {
    is_valid_namespace_char(c) || c == '/'
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl Serde for Identifier {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.to_string().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let value = String::de(reader)?;
        Self::parse(&value).map_err(|_| SerdeErr)
    }

    fn bit_length(&self) -> u32 {
        self.to_string().bit_length()
    }
}
