//! A read-only image of loaded Java bytecode.
//!
//! The image is the substrate everything else in this workspace mines: a flat
//! list of [`ClassStub`]s with erased method signatures, assembled either
//! directly (tests, embedders) or by scanning jars. The [`View`] trait is the
//! seam consumers depend on; [`Image`] is the in-memory implementation.
//!
//! The model is deliberately shallow. There is no resolution, no generics,
//! and no field information — just enough shape to answer "which public
//! constructors, factories, and subtypes exist for this class?".

mod classfile;
mod descriptor;
mod error;
mod jar;
mod stub;
mod types;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

pub use classfile::parse_class;
pub use descriptor::{parse_field_descriptor, parse_method_descriptor, MethodDescriptor};
pub use error::ClassfileError;
pub use jar::read_jar;
pub use stub::{
    ClassStub, MethodStub, ACC_PUBLIC, ACC_STATIC, CLASS_INITIALIZER_NAME, CONSTRUCTOR_NAME,
};
pub use types::{ArrayType, ClassType, PrimitiveType, Type};

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Read-only access to a set of loaded classes.
///
/// `classes` must enumerate in a stable order: everything downstream (index
/// construction, candidate ordering, ultimately generated source) inherits
/// its determinism from this order.
pub trait View {
    fn classes(&self) -> &[ClassStub];

    fn class(&self, ty: &ClassType) -> Option<&ClassStub>;
}

/// An in-memory [`View`] over class stubs, in insertion order.
#[derive(Debug, Default)]
pub struct Image {
    classes: Vec<ClassStub>,
    by_name: HashMap<String, usize>,
}

impl Image {
    pub fn new(classes: Vec<ClassStub>) -> Self {
        let mut image = Image::default();
        for class in classes {
            image.insert(class);
        }
        image
    }

    /// Scan jars in order. Later occurrences of an already-seen class name
    /// are shadowed by the earlier entry, like a classpath.
    pub fn from_jars<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ImageError> {
        let mut image = Image::default();
        for path in paths {
            for class in jar::read_jar(path.as_ref())? {
                image.insert(class);
            }
        }
        Ok(image)
    }

    fn insert(&mut self, class: ClassStub) {
        let name = class.name().to_string();
        match self.by_name.entry(name) {
            Entry::Occupied(_) => {
                tracing::debug!(class = %class.ty, "duplicate class shadowed by earlier entry");
            }
            Entry::Vacant(slot) => {
                slot.insert(self.classes.len());
                self.classes.push(class);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl View for Image {
    fn classes(&self) -> &[ClassStub] {
        &self.classes
    }

    fn class(&self, ty: &ClassType) -> Option<&ClassStub> {
        self.by_name
            .get(ty.binary_name())
            .map(|&index| &self.classes[index])
    }
}
