//! The erased Java type model the rest of the workspace works with.
//!
//! Everything here is what a method descriptor can express: primitives,
//! classes named by their dotted binary name, and arrays of either. Generic
//! signatures are never read, so type variables and wildcards cannot occur.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    /// The Java source spelling of this primitive.
    pub fn java_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.java_name())
    }
}

/// A class or interface, identified by its dotted binary name
/// (`java.util.Map$Entry`). Nested classes keep the `$` separator; the
/// source-level spelling is recovered with [`ClassType::source_name`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassType(String);

impl ClassType {
    pub fn new(binary_name: impl Into<String>) -> Self {
        Self(binary_name.into())
    }

    pub fn binary_name(&self) -> &str {
        &self.0
    }

    /// The package portion of the name, or `""` for the default package.
    pub fn package_name(&self) -> &str {
        self.0.rsplit_once('.').map(|(pkg, _)| pkg).unwrap_or("")
    }

    /// The name after the last `.`, with any nested-class `$` intact.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit_once('.').map(|(_, name)| name).unwrap_or(&self.0)
    }

    /// The fully qualified source spelling (`$` becomes `.`).
    pub fn source_name(&self) -> String {
        self.0.replace('$', ".")
    }

    /// Whether this class lives in the `java.*` namespace. Such classes are
    /// treated as an opaque, always-available part of the platform.
    pub fn is_jdk(&self) -> bool {
        self.package_name().starts_with("java.")
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An array type, normalized so the element is never itself an array.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayType {
    pub element: Box<Type>,
    pub dimensions: u8,
}

impl ArrayType {
    pub fn new(element: Type, dimensions: u8) -> Self {
        debug_assert!(dimensions >= 1);
        debug_assert!(!matches!(element, Type::Array(_)));
        Self {
            element: Box::new(element),
            dimensions,
        }
    }
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.element)?;
        for _ in 0..self.dimensions {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Primitive(PrimitiveType),
    Class(ClassType),
    Array(ArrayType),
}

impl Type {
    pub fn class(binary_name: impl Into<String>) -> Self {
        Type::Class(ClassType::new(binary_name))
    }

    /// The Java source spelling of this type, suitable for a declaration.
    pub fn source_name(&self) -> String {
        match self {
            Type::Primitive(p) => p.java_name().to_string(),
            Type::Class(ct) => ct.source_name(),
            Type::Array(arr) => {
                let mut name = arr.element.source_name();
                for _ in 0..arr.dimensions {
                    name.push_str("[]");
                }
                name
            }
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => p.fmt(f),
            Type::Class(ct) => ct.fmt(f),
            Type::Array(arr) => arr.fmt(f),
        }
    }
}
