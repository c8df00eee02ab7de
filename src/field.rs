use std::fmt;

/// Declared semantic type of a configuration field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldKind {
    /// `String`
    String,
    /// Any signed integer width, `i8` through `i128` and `isize`
    Int,
    /// `bool`
    Bool,
    /// Any other type; the loader never writes these fields
    Unsupported,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Int => write!(f, "int"),
            Self::Bool => write!(f, "bool"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Compile-time metadata of one field, generated by `#[derive(EnvConfig)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldDescriptor {
    /// Struct field name
    pub name: &'static str,
    /// Declared type
    pub kind: FieldKind,
    /// Environment variable to read, empty when not set
    pub env: &'static str,
    /// Fallback literal, empty when not set
    pub default: &'static str,
    /// Whether the field is marked required
    pub required: bool,
}

impl FieldDescriptor {
    pub const fn new(
        name: &'static str,
        kind: FieldKind,
        env: &'static str,
        default: &'static str,
        required: bool,
    ) -> Self {
        Self {
            name,
            kind,
            env,
            default,
            required,
        }
    }

    /// A field with neither an environment variable nor a default is left untouched
    pub fn is_skipped(&self) -> bool {
        self.env.is_empty() && self.default.is_empty()
    }

    pub fn has_default(&self) -> bool {
        !self.default.is_empty()
    }
}
