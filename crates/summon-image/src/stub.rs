//! Class and method stubs: the slice of a loaded classfile the miner needs.

use serde::{Deserialize, Serialize};

use crate::types::{ClassType, Type};

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_STATIC: u16 = 0x0008;

pub const CONSTRUCTOR_NAME: &str = "<init>";
pub const CLASS_INITIALIZER_NAME: &str = "<clinit>";

/// A method as the image sees it: erased parameter and return types, raw
/// access flags, and the class that declares it. Identity is structural, so
/// two references to the same method compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodStub {
    pub declaring: ClassType,
    pub name: String,
    pub access_flags: u16,
    pub parameters: Vec<Type>,
    /// `None` for `void`.
    pub return_type: Option<Type>,
}

impl MethodStub {
    pub fn is_public(&self) -> bool {
        self.access_flags & ACC_PUBLIC != 0
    }

    pub fn is_static(&self) -> bool {
        self.access_flags & ACC_STATIC != 0
    }

    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStub {
    pub ty: ClassType,
    pub access_flags: u16,
    pub superclass: Option<ClassType>,
    pub interfaces: Vec<ClassType>,
    pub methods: Vec<MethodStub>,
}

impl ClassStub {
    pub fn name(&self) -> &str {
        self.ty.binary_name()
    }

    pub fn is_public(&self) -> bool {
        self.access_flags & ACC_PUBLIC != 0
    }
}
