use thiserror::Error;

/// Failure while reading a single classfile. A bad classfile only ever costs
/// its own entry: jar scanning logs and skips it.
#[derive(Debug, Error)]
pub enum ClassfileError {
    #[error("unexpected end of classfile")]
    UnexpectedEof,
    #[error("invalid classfile magic: 0x{0:08x}")]
    InvalidMagic(u32),
    #[error("constant pool index {0} is out of range or unusable")]
    BadConstantIndex(u16),
    #[error("constant pool index {index} holds a {found}, expected {expected}")]
    ConstantTypeMismatch {
        index: u16,
        expected: &'static str,
        found: &'static str,
    },
    #[error("unknown constant pool tag: {0}")]
    UnknownConstantTag(u8),
    #[error("constant pool string is not valid utf-8")]
    InvalidUtf8,
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
}
