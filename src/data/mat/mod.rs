/// MATLAB Level 5 MAT-file support.
///
/// A file is a 128-byte header followed by tagged data elements:
/// ```text
///  ┌────────────┬──────────────────────┬──────────────────────┬──
///  │ header 128 │ tag │ miMATRIX ...    │ tag │ miCOMPRESSED   │ ...
///  └────────────┴──────────────────────┴──────────────────────┴──
/// ```
/// Each top-level element is one named variable, either stored directly as
/// `miMATRIX` or as a zlib stream that inflates to a `miMATRIX` element.

pub mod reader;
pub mod value;
pub mod writer;

pub use reader::{read_variable, read_variable_from_file};
pub use value::{CellArray, CharArray, MatValue, NumericArray, StructArray};

pub(crate) const HEADER_LEN: usize = 128;
pub(crate) const HEADER_TEXT_LEN: usize = 116;

// Data element types.
pub(crate) const MI_INT8: u32 = 1;
pub(crate) const MI_UINT8: u32 = 2;
pub(crate) const MI_INT16: u32 = 3;
pub(crate) const MI_UINT16: u32 = 4;
pub(crate) const MI_INT32: u32 = 5;
pub(crate) const MI_UINT32: u32 = 6;
pub(crate) const MI_SINGLE: u32 = 7;
pub(crate) const MI_DOUBLE: u32 = 9;
pub(crate) const MI_INT64: u32 = 12;
pub(crate) const MI_UINT64: u32 = 13;
pub(crate) const MI_MATRIX: u32 = 14;
pub(crate) const MI_COMPRESSED: u32 = 15;
pub(crate) const MI_UTF8: u32 = 16;
pub(crate) const MI_UTF16: u32 = 17;
pub(crate) const MI_UTF32: u32 = 18;

// Array classes (low byte of the array flags).
pub(crate) const MX_CELL: u8 = 1;
pub(crate) const MX_STRUCT: u8 = 2;
pub(crate) const MX_CHAR: u8 = 4;
pub(crate) const MX_DOUBLE: u8 = 6;
pub(crate) const MX_UINT64: u8 = 15;

pub(crate) const FLAG_COMPLEX: u32 = 0x0800;

/// Byte order of a MAT-file, taken from the header's endian indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// `MI` written as a native u16 reads back as `IM` on little-endian machines.
    pub fn from_indicator(bytes: [u8; 2]) -> Option<Self> {
        match &bytes {
            b"IM" => Some(Endian::Little),
            b"MI" => Some(Endian::Big),
            _ => None,
        }
    }

    pub(crate) fn u16(self, b: [u8; 2]) -> u16 {
        match self {
            Endian::Little => u16::from_le_bytes(b),
            Endian::Big => u16::from_be_bytes(b),
        }
    }

    pub(crate) fn u32(self, b: [u8; 4]) -> u32 {
        match self {
            Endian::Little => u32::from_le_bytes(b),
            Endian::Big => u32::from_be_bytes(b),
        }
    }

    pub(crate) fn u64(self, b: [u8; 8]) -> u64 {
        match self {
            Endian::Little => u64::from_le_bytes(b),
            Endian::Big => u64::from_be_bytes(b),
        }
    }
}

/// Bytes needed to pad `len` to the 8-byte element boundary.
pub(crate) fn padding(len: usize) -> usize {
    (8 - len % 8) % 8
}
