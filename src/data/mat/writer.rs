use std::io::{self, Write};
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::value::MatValue;
use super::*;

/// Minimum field name slot in a struct, matching what MATLAB writes.
const FIELD_NAME_WIDTH: usize = 32;

// ---------------------------------------------------------------------------
// MatWriter – little-endian Level 5 output
// ---------------------------------------------------------------------------

/// Builds a little-endian Level 5 MAT-file in memory.
///
/// Numeric arrays are written as `double`, char arrays as UTF-16 code units.
pub struct MatWriter {
    compress: bool,
    out: Vec<u8>,
}

impl MatWriter {
    /// Start a file. With `compress`, every variable is wrapped in a zlib
    /// `miCOMPRESSED` element, as `save -v7` does.
    pub fn new(compress: bool) -> Self {
        let mut text = format!(
            "MATLAB 5.0 MAT-file, Platform: {}, Created by: rusty-faces",
            std::env::consts::OS
        )
        .into_bytes();
        text.resize(HEADER_TEXT_LEN, b' ');

        let mut out = Vec::with_capacity(HEADER_LEN);
        out.extend_from_slice(&text);
        out.extend_from_slice(&[0u8; 8]); // subsystem data offset
        out.extend_from_slice(&0x0100u16.to_le_bytes());
        out.extend_from_slice(b"IM");

        Self { compress, out }
    }

    /// Append a top-level variable.
    pub fn add(&mut self, name: &str, value: &MatValue) -> io::Result<&mut Self> {
        let element = matrix_element(name, value);
        if self.compress {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&element)?;
            let compressed = encoder.finish()?;
            push_tag(&mut self.out, MI_COMPRESSED, compressed.len());
            self.out.extend_from_slice(&compressed);
        } else {
            self.out.extend_from_slice(&element);
        }
        Ok(self)
    }

    pub fn finish(self) -> Vec<u8> {
        self.out
    }

    pub fn write_to(self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.out)
    }
}

// ---------------------------------------------------------------------------
// Element encoding
// ---------------------------------------------------------------------------

fn push_tag(out: &mut Vec<u8>, data_type: u32, nbytes: usize) {
    out.extend_from_slice(&data_type.to_le_bytes());
    out.extend_from_slice(&(nbytes as u32).to_le_bytes());
}

fn push_element(out: &mut Vec<u8>, data_type: u32, data: &[u8]) {
    push_tag(out, data_type, data.len());
    out.extend_from_slice(data);
    out.resize(out.len() + padding(data.len()), 0);
}

/// Packed form for payloads of 1 to 4 bytes.
fn push_small_element(out: &mut Vec<u8>, data_type: u32, data: &[u8]) {
    debug_assert!(!data.is_empty() && data.len() <= 4);
    let tag = (data.len() as u32) << 16 | data_type;
    out.extend_from_slice(&tag.to_le_bytes());
    let mut payload = [0u8; 4];
    payload[..data.len()].copy_from_slice(data);
    out.extend_from_slice(&payload);
}

fn matrix_element(name: &str, value: &MatValue) -> Vec<u8> {
    let (class, dims) = match value {
        MatValue::Numeric(a) => (MX_DOUBLE, &a.dims),
        MatValue::Char(a) => (MX_CHAR, &a.dims),
        MatValue::Cell(a) => (MX_CELL, &a.dims),
        MatValue::Struct(a) => (MX_STRUCT, &a.dims),
    };

    let mut body = Vec::new();

    let mut flags = Vec::with_capacity(8);
    flags.extend_from_slice(&(class as u32).to_le_bytes());
    flags.extend_from_slice(&0u32.to_le_bytes());
    push_element(&mut body, MI_UINT32, &flags);

    let dims: Vec<u8> = dims
        .iter()
        .flat_map(|&d| (d as i32).to_le_bytes())
        .collect();
    push_element(&mut body, MI_INT32, &dims);

    match name.len() {
        1..=4 => push_small_element(&mut body, MI_INT8, name.as_bytes()),
        _ => push_element(&mut body, MI_INT8, name.as_bytes()),
    }

    match value {
        MatValue::Numeric(a) => {
            let data: Vec<u8> = a.values.iter().flat_map(|v| v.to_le_bytes()).collect();
            push_element(&mut body, MI_DOUBLE, &data);
        }
        MatValue::Char(a) => {
            let data: Vec<u8> = a
                .text
                .encode_utf16()
                .flat_map(|u| u.to_le_bytes())
                .collect();
            push_element(&mut body, MI_UINT16, &data);
        }
        MatValue::Cell(a) => {
            for cell in &a.cells {
                body.extend_from_slice(&matrix_element("", cell));
            }
        }
        MatValue::Struct(a) => {
            let longest = a.field_names.iter().map(String::len).max().unwrap_or(0);
            let width = FIELD_NAME_WIDTH.max(longest + 1);
            push_small_element(&mut body, MI_INT32, &(width as i32).to_le_bytes());

            let mut names = vec![0u8; width * a.field_names.len()];
            for (i, field) in a.field_names.iter().enumerate() {
                names[i * width..i * width + field.len()].copy_from_slice(field.as_bytes());
            }
            push_element(&mut body, MI_INT8, &names);

            for element in &a.elements {
                for field in element {
                    body.extend_from_slice(&matrix_element("", field));
                }
            }
        }
    }

    let mut out = Vec::with_capacity(body.len() + 8);
    push_tag(&mut out, MI_MATRIX, body.len());
    out.extend_from_slice(&body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::mat::value::{CharArray, NumericArray, StructArray};

    #[test]
    fn header_carries_version_and_endian_indicator() {
        let bytes = MatWriter::new(false).finish();
        assert_eq!(bytes.len(), HEADER_LEN);
        assert!(bytes.starts_with(b"MATLAB 5.0 MAT-file"));
        assert_eq!(&bytes[124..126], &[0x00, 0x01]);
        assert_eq!(&bytes[126..128], b"IM");
        assert_eq!(Endian::from_indicator([bytes[126], bytes[127]]), Some(Endian::Little));
    }

    #[test]
    fn uncompressed_elements_stay_eight_byte_aligned() {
        let value: MatValue = StructArray::scalar(vec![
            ("name", CharArray::from_text("odd").into()),
            ("face_score", NumericArray::row(vec![1.5]).into()),
        ])
        .into();
        let mut writer = MatWriter::new(false);
        writer.add("a_long_variable_name", &value).unwrap();
        assert_eq!(writer.finish().len() % 8, 0);
    }

    #[test]
    fn struct_field_names_use_packed_length_tag() {
        let value: MatValue = StructArray::scalar(vec![("x", NumericArray::empty().into())]).into();
        let element = matrix_element("s", &value);
        // tag(8) + flags(16) + dims(16) + packed name(8), then packed width.
        let width_tag = u32::from_le_bytes([element[48], element[49], element[50], element[51]]);
        assert_eq!(width_tag, 4 << 16 | MI_INT32);
    }
}
