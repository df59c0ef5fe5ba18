//! A deliberately minimal classfile reader.
//!
//! The image only needs names, access flags, supertypes, and method
//! descriptors, so this reader retains just the Utf8 and Class constants,
//! skips every other constant by its fixed size, discards fields, and skips
//! all attributes by their declared length. Anything after the method table
//! is ignored.

use crate::descriptor::parse_method_descriptor;
use crate::error::ClassfileError;
use crate::stub::{ClassStub, MethodStub};
use crate::types::ClassType;

const MAGIC: u32 = 0xCAFE_BABE;

/// Parse the bytes of a single `.class` file into a [`ClassStub`].
pub fn parse_class(bytes: &[u8]) -> Result<ClassStub, ClassfileError> {
    let mut reader = Reader::new(bytes);

    let magic = reader.read_u4()?;
    if magic != MAGIC {
        return Err(ClassfileError::InvalidMagic(magic));
    }
    let _minor = reader.read_u2()?;
    let _major = reader.read_u2()?;

    let pool = ConstantPool::parse(&mut reader)?;

    let access_flags = reader.read_u2()?;
    let ty = pool.class_name(reader.read_u2()?)?;

    let super_index = reader.read_u2()?;
    let superclass = if super_index == 0 {
        None
    } else {
        Some(pool.class_name(super_index)?)
    };

    let interface_count = reader.read_u2()? as usize;
    let mut interfaces = Vec::with_capacity(interface_count);
    for _ in 0..interface_count {
        interfaces.push(pool.class_name(reader.read_u2()?)?);
    }

    let field_count = reader.read_u2()? as usize;
    for _ in 0..field_count {
        // access_flags, name_index, descriptor_index
        reader.skip(6)?;
        skip_attributes(&mut reader)?;
    }

    let method_count = reader.read_u2()? as usize;
    let mut methods = Vec::with_capacity(method_count);
    for _ in 0..method_count {
        let flags = reader.read_u2()?;
        let name = pool.utf8(reader.read_u2()?)?.to_string();
        let descriptor = pool.utf8(reader.read_u2()?)?;
        skip_attributes(&mut reader)?;

        let parsed = parse_method_descriptor(descriptor)?;
        methods.push(MethodStub {
            declaring: ty.clone(),
            name,
            access_flags: flags,
            parameters: parsed.parameters,
            return_type: parsed.return_type,
        });
    }

    Ok(ClassStub {
        ty,
        access_flags,
        superclass,
        interfaces,
        methods,
    })
}

fn skip_attributes(reader: &mut Reader<'_>) -> Result<(), ClassfileError> {
    let count = reader.read_u2()? as usize;
    for _ in 0..count {
        let _name_index = reader.read_u2()?;
        let length = reader.read_u4()? as usize;
        reader.skip(length)?;
    }
    Ok(())
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn read_u1(&mut self) -> Result<u8, ClassfileError> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or(ClassfileError::UnexpectedEof)?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_u2(&mut self) -> Result<u16, ClassfileError> {
        Ok(u16::from_be_bytes(self.read_n::<2>()?))
    }

    fn read_u4(&mut self) -> Result<u32, ClassfileError> {
        Ok(u32::from_be_bytes(self.read_n::<4>()?))
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ClassfileError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(ClassfileError::UnexpectedEof)?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> Result<(), ClassfileError> {
        self.read_bytes(len).map(|_| ())
    }

    fn read_n<const N: usize>(&mut self) -> Result<[u8; N], ClassfileError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }
}

#[derive(Clone)]
enum Constant {
    Utf8(String),
    Class { name_index: u16 },
    /// Present but irrelevant here (numbers, member refs, dynamic info, ...).
    Other,
}

impl Constant {
    fn kind(&self) -> &'static str {
        match self {
            Constant::Utf8(_) => "Utf8",
            Constant::Class { .. } => "Class",
            Constant::Other => "unsupported constant",
        }
    }
}

struct ConstantPool {
    entries: Vec<Option<Constant>>,
}

impl ConstantPool {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, ClassfileError> {
        let count = reader.read_u2()? as usize;
        let mut entries: Vec<Option<Constant>> = vec![None; count];

        let mut index = 1usize;
        while index < count {
            let tag = reader.read_u1()?;
            let mut wide = false;
            let entry = match tag {
                // Utf8
                1 => {
                    let len = reader.read_u2()? as usize;
                    let bytes = reader.read_bytes(len)?;
                    let text = std::str::from_utf8(bytes)
                        .map_err(|_| ClassfileError::InvalidUtf8)?
                        .to_string();
                    Constant::Utf8(text)
                }
                // Class
                7 => Constant::Class {
                    name_index: reader.read_u2()?,
                },
                // Integer, Float, member refs, NameAndType, Dynamic, InvokeDynamic
                3 | 4 | 9 | 10 | 11 | 12 | 17 | 18 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                // String, MethodType, Module, Package
                8 | 16 | 19 | 20 => {
                    reader.skip(2)?;
                    Constant::Other
                }
                // MethodHandle
                15 => {
                    reader.skip(3)?;
                    Constant::Other
                }
                // Long, Double: eight bytes and two pool slots
                5 | 6 => {
                    reader.skip(8)?;
                    wide = true;
                    Constant::Other
                }
                other => return Err(ClassfileError::UnknownConstantTag(other)),
            };
            entries[index] = Some(entry);
            index += if wide { 2 } else { 1 };
        }

        Ok(Self { entries })
    }

    fn get(&self, index: u16) -> Result<&Constant, ClassfileError> {
        self.entries
            .get(index as usize)
            .and_then(Option::as_ref)
            .ok_or(ClassfileError::BadConstantIndex(index))
    }

    fn utf8(&self, index: u16) -> Result<&str, ClassfileError> {
        match self.get(index)? {
            Constant::Utf8(text) => Ok(text),
            other => Err(ClassfileError::ConstantTypeMismatch {
                index,
                expected: "Utf8",
                found: other.kind(),
            }),
        }
    }

    fn class_name(&self, index: u16) -> Result<ClassType, ClassfileError> {
        match self.get(index)? {
            Constant::Class { name_index } => {
                let internal = self.utf8(*name_index)?;
                Ok(ClassType::new(internal.replace('/', ".")))
            }
            other => Err(ClassfileError::ConstantTypeMismatch {
                index,
                expected: "Class",
                found: other.kind(),
            }),
        }
    }
}
