use std::io::Read;
use std::path::Path;

use flate2::read::ZlibDecoder;
use log::{debug, warn};

use super::value::{CellArray, CharArray, MatValue, NumericArray, StructArray};
use super::*;
use crate::data::error::{ArchiveError, FormatError};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read the top-level variable `name` from a MAT-file on disk.
pub fn read_variable_from_file(path: &Path, name: &str) -> Result<MatValue, ArchiveError> {
    let bytes = std::fs::read(path)?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(read_variable(&bytes, name)?)
}

/// Read the top-level variable `name` from an in-memory MAT-file.
///
/// Variables are scanned in file order; only the matching one is decoded past
/// its name.
pub fn read_variable(bytes: &[u8], name: &str) -> Result<MatValue, FormatError> {
    let endian = parse_file_header(bytes)?;
    let mut cursor = Cursor::new(&bytes[HEADER_LEN..], endian);

    while !cursor.is_empty() {
        let element = cursor.read_element()?;
        let inflated;
        let matrix = match element.data_type {
            MI_MATRIX => element.data,
            MI_COMPRESSED => {
                inflated = inflate(element.data)?;
                let inner = Cursor::new(&inflated, endian).read_element()?;
                if inner.data_type != MI_MATRIX {
                    warn!(
                        "skipping compressed element holding data type {}",
                        inner.data_type
                    );
                    continue;
                }
                inner.data
            }
            other => {
                warn!("skipping top-level element of data type {other}");
                continue;
            }
        };

        let mut body = Cursor::new(matrix, endian);
        let header = parse_matrix_header(&mut body)?;
        if header.name != name {
            debug!("skipping variable '{}'", header.name);
            continue;
        }
        debug!("decoding variable '{}' with dims {:?}", header.name, header.dims);
        return parse_matrix_body(&header, &mut body);
    }

    Err(FormatError::MissingVariable(name.to_string()))
}

// ---------------------------------------------------------------------------
// File header
// ---------------------------------------------------------------------------

fn parse_file_header(bytes: &[u8]) -> Result<Endian, FormatError> {
    if bytes.len() < HEADER_LEN {
        return Err(FormatError::NotMatFile(format!(
            "{} bytes is shorter than the {HEADER_LEN}-byte header",
            bytes.len()
        )));
    }

    let text = String::from_utf8_lossy(&bytes[..HEADER_TEXT_LEN]);
    if text.starts_with("MATLAB 7.3") {
        return Err(FormatError::Unsupported(
            "MAT 7.3 (HDF5-based) files".to_string(),
        ));
    }

    let endian = Endian::from_indicator([bytes[126], bytes[127]])
        .ok_or_else(|| FormatError::NotMatFile("missing endian indicator".to_string()))?;
    let version = endian.u16([bytes[124], bytes[125]]);
    if version != 0x0100 {
        return Err(FormatError::NotMatFile(format!(
            "unexpected version {version:#06x}"
        )));
    }
    Ok(endian)
}

fn inflate(data: &[u8]) -> Result<Vec<u8>, FormatError> {
    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| FormatError::Malformed(format!("inflating compressed element: {e}")))?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// Data elements
// ---------------------------------------------------------------------------

struct Element<'a> {
    data_type: u32,
    data: &'a [u8],
}

struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8], endian: Endian) -> Self {
        Self {
            buf,
            pos: 0,
            endian,
        }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| {
                FormatError::Malformed(format!(
                    "{n} bytes at offset {} run past the end of a {}-byte container",
                    self.pos,
                    self.buf.len()
                ))
            })?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32, FormatError> {
        let b = self.take(4)?;
        Ok(self.endian.u32(bytes(b)))
    }

    /// Read one tagged element, handling the small (packed) tag format.
    fn read_element(&mut self) -> Result<Element<'a>, FormatError> {
        let first = self.read_u32()?;

        // Small element: byte count in the upper half, 4 data bytes follow.
        if first >> 16 != 0 {
            let nbytes = (first >> 16) as usize;
            if nbytes > 4 {
                return Err(FormatError::Malformed(format!(
                    "small data element claims {nbytes} bytes"
                )));
            }
            let raw = self.take(4)?;
            return Ok(Element {
                data_type: first & 0xFFFF,
                data: &raw[..nbytes],
            });
        }

        let nbytes = self.read_u32()? as usize;
        let data = self.take(nbytes)?;
        // Compressed elements are written unpadded.
        if first != MI_COMPRESSED {
            self.pos = (self.pos + padding(nbytes)).min(self.buf.len());
        }
        Ok(Element {
            data_type: first,
            data,
        })
    }

    fn read_typed(&mut self, expected: u32, what: &str) -> Result<Element<'a>, FormatError> {
        let element = self.read_element()?;
        if element.data_type != expected {
            return Err(FormatError::Malformed(format!(
                "{what}: expected data type {expected}, found {}",
                element.data_type
            )));
        }
        Ok(element)
    }
}

/// Copy a slice known to be `N` bytes long into an array.
fn bytes<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&slice[..N]);
    out
}

// ---------------------------------------------------------------------------
// miMATRIX
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct MatrixHeader {
    class: u8,
    complex: bool,
    dims: Vec<usize>,
    name: String,
}

fn parse_matrix_header(cur: &mut Cursor<'_>) -> Result<MatrixHeader, FormatError> {
    let endian = cur.endian;

    let flags = cur.read_typed(MI_UINT32, "array flags")?;
    if flags.data.len() < 8 {
        return Err(FormatError::Malformed("array flags shorter than 8 bytes".to_string()));
    }
    let flags = endian.u32(bytes(flags.data));

    let dims = cur.read_typed(MI_INT32, "dimensions")?;
    let dims = dims
        .data
        .chunks_exact(4)
        .map(|c| {
            let d = endian.u32(bytes(c)) as i32;
            usize::try_from(d)
                .map_err(|_| FormatError::Malformed(format!("negative dimension {d}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let name = cur.read_typed(MI_INT8, "array name")?;
    let name = String::from_utf8_lossy(name.data).into_owned();

    Ok(MatrixHeader {
        class: (flags & 0xFF) as u8,
        complex: flags & FLAG_COMPLEX != 0,
        dims,
        name,
    })
}

/// Every nested entry takes at least an 8-byte tag, so a container cannot
/// hold more entries than its remaining bytes allow.
fn check_entries(cur: &Cursor<'_>, entries: Option<usize>, name: &str) -> Result<usize, FormatError> {
    let limit = cur.remaining() / 8;
    match entries {
        Some(n) if n <= limit => Ok(n),
        _ => Err(FormatError::Malformed(format!(
            "'{name}' claims more entries than its {} remaining bytes can hold",
            cur.remaining()
        ))),
    }
}

fn parse_matrix_body(header: &MatrixHeader, cur: &mut Cursor<'_>) -> Result<MatValue, FormatError> {
    let numel = header
        .dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| {
            FormatError::Malformed(format!(
                "dims {:?} of '{}' overflow the element count",
                header.dims, header.name
            ))
        })?;
    let dims = header.dims.clone();

    match header.class {
        MX_CELL => {
            check_entries(cur, Some(numel), &header.name)?;
            let cells = (0..numel)
                .map(|_| parse_nested(cur))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(CellArray { dims, cells }.into())
        }
        MX_STRUCT => {
            let width = cur.read_typed(MI_INT32, "field name length")?;
            if width.data.len() < 4 {
                return Err(FormatError::Malformed("empty field name length".to_string()));
            }
            let width = cur.endian.u32(bytes(width.data)) as usize;
            let names = cur.read_typed(MI_INT8, "field names")?;
            let field_names: Vec<String> = if width == 0 {
                Vec::new()
            } else {
                names.data.chunks(width).map(field_name).collect()
            };

            // A field-less struct still needs its elements bounded.
            let slots = match field_names.len() {
                0 if numel <= 1 => Some(0),
                fields => numel.checked_mul(fields.max(1)),
            };
            check_entries(cur, slots, &header.name)?;

            let mut elements = Vec::with_capacity(numel);
            for _ in 0..numel {
                let values = field_names
                    .iter()
                    .map(|_| parse_nested(cur))
                    .collect::<Result<Vec<_>, _>>()?;
                elements.push(values);
            }
            Ok(StructArray {
                dims,
                field_names,
                elements,
            }
            .into())
        }
        MX_CHAR => {
            let real = cur.read_element()?;
            let text = decode_chars(&real, &dims, cur.endian)?;
            Ok(CharArray { dims, text }.into())
        }
        MX_DOUBLE..=MX_UINT64 => {
            let real = cur.read_element()?;
            let values = decode_numbers(&real, cur.endian)?;
            if values.len() != numel {
                return Err(FormatError::Malformed(format!(
                    "numeric array '{}' has {} values for dims {:?}",
                    header.name,
                    values.len(),
                    dims
                )));
            }
            if header.complex {
                debug!("dropping imaginary part of '{}'", header.name);
            }
            Ok(NumericArray { dims, values }.into())
        }
        other => Err(FormatError::Unsupported(format!("array class {other}"))),
    }
}

/// A `miMATRIX` nested inside a cell or struct. Zero-length ones are `[]`.
fn parse_nested(cur: &mut Cursor<'_>) -> Result<MatValue, FormatError> {
    let element = cur.read_typed(MI_MATRIX, "container entry")?;
    if element.data.is_empty() {
        return Ok(NumericArray::empty().into());
    }
    let mut inner = Cursor::new(element.data, cur.endian);
    let header = parse_matrix_header(&mut inner)?;
    parse_matrix_body(&header, &mut inner)
}

fn field_name(chunk: &[u8]) -> String {
    let end = chunk.iter().position(|&b| b == 0).unwrap_or(chunk.len());
    String::from_utf8_lossy(&chunk[..end]).into_owned()
}

// ---------------------------------------------------------------------------
// Element payloads
// ---------------------------------------------------------------------------

fn widen<const N: usize>(data: &[u8], f: impl Fn([u8; N]) -> f64) -> Result<Vec<f64>, FormatError> {
    if data.len() % N != 0 {
        return Err(FormatError::Malformed(format!(
            "{} bytes is not a multiple of the {N}-byte element width",
            data.len()
        )));
    }
    Ok(data.chunks_exact(N).map(|c| f(bytes(c))).collect())
}

fn decode_numbers(element: &Element<'_>, endian: Endian) -> Result<Vec<f64>, FormatError> {
    let data = element.data;
    match element.data_type {
        MI_INT8 => widen::<1>(data, |b| b[0] as i8 as f64),
        MI_UINT8 => widen::<1>(data, |b| b[0] as f64),
        MI_INT16 => widen::<2>(data, |b| endian.u16(b) as i16 as f64),
        MI_UINT16 => widen::<2>(data, |b| endian.u16(b) as f64),
        MI_INT32 => widen::<4>(data, |b| endian.u32(b) as i32 as f64),
        MI_UINT32 => widen::<4>(data, |b| endian.u32(b) as f64),
        MI_SINGLE => widen::<4>(data, |b| f32::from_bits(endian.u32(b)) as f64),
        MI_DOUBLE => widen::<8>(data, |b| f64::from_bits(endian.u64(b))),
        MI_INT64 => widen::<8>(data, |b| endian.u64(b) as i64 as f64),
        MI_UINT64 => widen::<8>(data, |b| endian.u64(b) as f64),
        other => Err(FormatError::Unsupported(format!(
            "numeric data stored as type {other}"
        ))),
    }
}

fn decode_chars(element: &Element<'_>, dims: &[usize], endian: Endian) -> Result<String, FormatError> {
    let data = element.data;
    let chars: Vec<char> = match element.data_type {
        MI_UINT16 | MI_UTF16 => {
            let units = data.chunks_exact(2).map(|c| endian.u16(bytes(c)));
            char::decode_utf16(units)
                .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect()
        }
        MI_UTF8 => String::from_utf8_lossy(data).chars().collect(),
        MI_UINT8 | MI_INT8 => data.iter().map(|&b| b as char).collect(),
        MI_UTF32 | MI_UINT32 => data
            .chunks_exact(4)
            .map(|c| char::from_u32(endian.u32(bytes(c))).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect(),
        other => {
            return Err(FormatError::Unsupported(format!(
                "char data stored as type {other}"
            )))
        }
    };

    // Char matrices are column-major; rebuild rows when the shape allows it.
    match dims {
        [rows, cols] if *rows > 1 && rows * cols == chars.len() => {
            let lines: Vec<String> = (0..*rows)
                .map(|r| {
                    let line: String = (0..*cols).map(|c| chars[c * rows + r]).collect();
                    line.trim_end().to_string()
                })
                .collect();
            Ok(lines.join("\n"))
        }
        _ => Ok(chars.into_iter().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::mat::writer::MatWriter;

    fn sample_struct() -> MatValue {
        StructArray::scalar(vec![
            ("dob", NumericArray::row(vec![723671.0, 730486.0]).into()),
            (
                "name",
                CellArray::row(vec![
                    CharArray::from_text("Ada Lovelace").into(),
                    NumericArray::empty().into(),
                ])
                .into(),
            ),
        ])
        .into()
    }

    #[test]
    fn reads_back_uncompressed_variable() {
        let mut writer = MatWriter::new(false);
        writer.add("wiki", &sample_struct()).unwrap();
        let bytes = writer.finish();

        let value = read_variable(&bytes, "wiki").unwrap();
        assert_eq!(value, sample_struct());
    }

    #[test]
    fn reads_back_compressed_variable_among_others() {
        let other: MatValue = NumericArray::row(vec![1.0, 2.0, 3.0]).into();
        let mut writer = MatWriter::new(true);
        writer.add("other", &other).unwrap();
        writer.add("imdb", &sample_struct()).unwrap();
        let bytes = writer.finish();

        assert_eq!(read_variable(&bytes, "imdb").unwrap(), sample_struct());
        assert_eq!(read_variable(&bytes, "other").unwrap(), other);
    }

    #[test]
    fn missing_variable_is_a_format_error() {
        let mut writer = MatWriter::new(true);
        writer.add("wiki", &sample_struct()).unwrap();
        let err = read_variable(&writer.finish(), "imdb").unwrap_err();
        assert_eq!(err, FormatError::MissingVariable("imdb".to_string()));
    }

    #[test]
    fn rejects_short_and_hdf5_files() {
        assert!(matches!(
            read_variable(b"hello", "wiki"),
            Err(FormatError::NotMatFile(_))
        ));

        let mut header = vec![b' '; HEADER_LEN];
        header[..10].copy_from_slice(b"MATLAB 7.3");
        assert!(matches!(
            read_variable(&header, "wiki"),
            Err(FormatError::Unsupported(_))
        ));
    }

    #[test]
    fn truncated_element_is_malformed() {
        let mut writer = MatWriter::new(false);
        writer.add("wiki", &sample_struct()).unwrap();
        let mut bytes = writer.finish();
        bytes.truncate(bytes.len() - 20);
        assert!(matches!(
            read_variable(&bytes, "wiki"),
            Err(FormatError::Malformed(_))
        ));
    }

    /// Hand-built big-endian file holding a 1x1 double named `x`.
    fn big_endian_scalar(value: f64) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend(MI_UINT32.to_be_bytes());
        body.extend(8u32.to_be_bytes());
        body.extend((MX_DOUBLE as u32).to_be_bytes());
        body.extend(0u32.to_be_bytes());
        body.extend(MI_INT32.to_be_bytes());
        body.extend(8u32.to_be_bytes());
        body.extend(1i32.to_be_bytes());
        body.extend(1i32.to_be_bytes());
        // Packed name element.
        body.extend((1u32 << 16 | MI_INT8).to_be_bytes());
        body.extend([b'x', 0, 0, 0]);
        body.extend(MI_DOUBLE.to_be_bytes());
        body.extend(8u32.to_be_bytes());
        body.extend(value.to_be_bytes());

        let mut file = vec![b' '; HEADER_TEXT_LEN];
        file[..10].copy_from_slice(b"MATLAB 5.0");
        file.extend([0u8; 8]);
        file.extend(0x0100u16.to_be_bytes());
        file.extend(b"MI");
        file.extend(MI_MATRIX.to_be_bytes());
        file.extend((body.len() as u32).to_be_bytes());
        file.extend(body);
        file
    }

    #[test]
    fn reads_big_endian_files() {
        let value = read_variable(&big_endian_scalar(42.5), "x").unwrap();
        assert_eq!(
            value,
            MatValue::from(NumericArray {
                dims: vec![1, 1],
                values: vec![42.5],
            })
        );
    }

    /// Little-endian file holding a struct header named `s` with field
    /// `dob` and the given dims, but no element data.
    fn struct_without_elements(dims: &[i32]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend(MI_UINT32.to_le_bytes());
        body.extend(8u32.to_le_bytes());
        body.extend((MX_STRUCT as u32).to_le_bytes());
        body.extend(0u32.to_le_bytes());
        body.extend(MI_INT32.to_le_bytes());
        body.extend((dims.len() as u32 * 4).to_le_bytes());
        for d in dims {
            body.extend(d.to_le_bytes());
        }
        body.resize(body.len() + padding(dims.len() * 4), 0);
        body.extend((1u32 << 16 | MI_INT8).to_le_bytes());
        body.extend([b's', 0, 0, 0]);
        body.extend((4u32 << 16 | MI_INT32).to_le_bytes());
        body.extend(8i32.to_le_bytes());
        body.extend(MI_INT8.to_le_bytes());
        body.extend(8u32.to_le_bytes());
        body.extend(*b"dob\0\0\0\0\0");

        let mut file = MatWriter::new(false).finish();
        file.extend(MI_MATRIX.to_le_bytes());
        file.extend((body.len() as u32).to_le_bytes());
        file.extend(body);
        file
    }

    #[test]
    fn huge_struct_dims_are_malformed() {
        let err = read_variable(&struct_without_elements(&[1 << 30, 1 << 30]), "s").unwrap_err();
        assert!(matches!(err, FormatError::Malformed(_)), "{err:?}");
    }

    #[test]
    fn overflowing_element_count_is_malformed() {
        let err = read_variable(&struct_without_elements(&[i32::MAX; 3]), "s").unwrap_err();
        assert!(matches!(err, FormatError::Malformed(_)), "{err:?}");
    }

    #[test]
    fn multi_row_char_arrays_are_split_into_lines() {
        // ["ab"; "cd"] stored column-major: a c b d
        let data: Vec<u8> = "acbd".encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        let element = Element {
            data_type: MI_UINT16,
            data: &data,
        };
        let text = decode_chars(&element, &[2, 2], Endian::Little).unwrap();
        assert_eq!(text, "ab\ncd");
    }

    #[test]
    fn narrow_integer_storage_is_widened() {
        let data = [0xFFu8, 0x01];
        let element = Element {
            data_type: MI_INT8,
            data: &data,
        };
        assert_eq!(decode_numbers(&element, Endian::Little).unwrap(), vec![-1.0, 1.0]);
    }
}
