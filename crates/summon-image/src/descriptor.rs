//! Field and method descriptor parsing (JVMS §4.3).
//!
//! Descriptors are the erased view of a signature, which is exactly the level
//! this workspace reasons at: every parsed type is a primitive, a class, or
//! an array of one of those.

use crate::error::ClassfileError;
use crate::types::{ArrayType, ClassType, PrimitiveType, Type};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub parameters: Vec<Type>,
    /// `None` for `void`.
    pub return_type: Option<Type>,
}

/// Parse a field descriptor such as `I`, `[[D`, or `Ljava/lang/String;`.
pub fn parse_field_descriptor(descriptor: &str) -> Result<Type, ClassfileError> {
    let mut cursor = Cursor::new(descriptor);
    let ty = cursor.parse_type()?;
    cursor.expect_end()?;
    Ok(ty)
}

/// Parse a method descriptor such as `(IJLjava/lang/String;)[B`.
pub fn parse_method_descriptor(descriptor: &str) -> Result<MethodDescriptor, ClassfileError> {
    let mut cursor = Cursor::new(descriptor);
    cursor.expect(b'(')?;
    let mut parameters = Vec::new();
    while cursor.peek() != Some(b')') {
        parameters.push(cursor.parse_type()?);
    }
    cursor.expect(b')')?;
    let return_type = if cursor.peek() == Some(b'V') {
        cursor.advance();
        None
    } else {
        Some(cursor.parse_type()?)
    };
    cursor.expect_end()?;
    Ok(MethodDescriptor {
        parameters,
        return_type,
    })
}

struct Cursor<'a> {
    descriptor: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(descriptor: &'a str) -> Self {
        Self { descriptor, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.descriptor.as_bytes().get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn invalid(&self) -> ClassfileError {
        ClassfileError::InvalidDescriptor(self.descriptor.to_string())
    }

    fn expect(&mut self, byte: u8) -> Result<(), ClassfileError> {
        if self.peek() == Some(byte) {
            self.advance();
            Ok(())
        } else {
            Err(self.invalid())
        }
    }

    fn expect_end(&self) -> Result<(), ClassfileError> {
        if self.pos == self.descriptor.len() {
            Ok(())
        } else {
            Err(self.invalid())
        }
    }

    fn parse_type(&mut self) -> Result<Type, ClassfileError> {
        let mut dimensions = 0u8;
        while self.peek() == Some(b'[') {
            self.advance();
            // The JVM caps array types at 255 dimensions.
            dimensions = dimensions.checked_add(1).ok_or_else(|| self.invalid())?;
        }

        let element = match self.peek() {
            Some(b'Z') => Type::Primitive(PrimitiveType::Boolean),
            Some(b'B') => Type::Primitive(PrimitiveType::Byte),
            Some(b'S') => Type::Primitive(PrimitiveType::Short),
            Some(b'C') => Type::Primitive(PrimitiveType::Char),
            Some(b'I') => Type::Primitive(PrimitiveType::Int),
            Some(b'J') => Type::Primitive(PrimitiveType::Long),
            Some(b'F') => Type::Primitive(PrimitiveType::Float),
            Some(b'D') => Type::Primitive(PrimitiveType::Double),
            Some(b'L') => {
                self.advance();
                let start = self.pos;
                while let Some(byte) = self.peek() {
                    if byte == b';' {
                        break;
                    }
                    self.advance();
                }
                if self.peek() != Some(b';') || self.pos == start {
                    return Err(self.invalid());
                }
                let internal = &self.descriptor[start..self.pos];
                self.advance();
                return self.wrap(Type::Class(ClassType::new(internal.replace('/', "."))), dimensions);
            }
            _ => return Err(self.invalid()),
        };
        self.advance();
        self.wrap(element, dimensions)
    }

    fn wrap(&self, element: Type, dimensions: u8) -> Result<Type, ClassfileError> {
        if dimensions == 0 {
            Ok(element)
        } else {
            Ok(Type::Array(ArrayType::new(element, dimensions)))
        }
    }
}
