use std::fmt;

// ---------------------------------------------------------------------------
// MatValue – one decoded MATLAB array
// ---------------------------------------------------------------------------

/// A decoded MATLAB array. Only the classes that appear in face-metadata
/// archives are represented; everything else is rejected by the reader.
#[derive(Debug, Clone, PartialEq)]
pub enum MatValue {
    Numeric(NumericArray),
    Char(CharArray),
    Cell(CellArray),
    Struct(StructArray),
}

/// Any numeric or logical class, widened to `f64` (real part only).
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    pub dims: Vec<usize>,
    /// Column-major values, `dims.iter().product()` long.
    pub values: Vec<f64>,
}

/// A char array decoded to text. Multi-row arrays are joined with `\n`.
#[derive(Debug, Clone, PartialEq)]
pub struct CharArray {
    pub dims: Vec<usize>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellArray {
    pub dims: Vec<usize>,
    /// Column-major cells.
    pub cells: Vec<MatValue>,
}

/// A struct array: every element carries one value per field.
#[derive(Debug, Clone, PartialEq)]
pub struct StructArray {
    pub dims: Vec<usize>,
    pub field_names: Vec<String>,
    /// `elements[i][j]` is field `field_names[j]` of element `i`.
    pub elements: Vec<Vec<MatValue>>,
}

impl NumericArray {
    /// A `1×N` row vector.
    pub fn row(values: Vec<f64>) -> Self {
        Self {
            dims: vec![1, values.len()],
            values,
        }
    }

    /// The `0×0` empty matrix, `[]` in MATLAB.
    pub fn empty() -> Self {
        Self {
            dims: vec![0, 0],
            values: Vec::new(),
        }
    }
}

impl CharArray {
    pub fn from_text(text: &str) -> Self {
        Self {
            dims: vec![1, text.encode_utf16().count()],
            text: text.to_string(),
        }
    }
}

impl CellArray {
    pub fn row(cells: Vec<MatValue>) -> Self {
        Self {
            dims: vec![1, cells.len()],
            cells,
        }
    }
}

impl StructArray {
    /// A `1×1` struct built from `(field, value)` pairs.
    pub fn scalar(fields: Vec<(&str, MatValue)>) -> Self {
        let (names, values): (Vec<_>, Vec<_>) = fields
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .unzip();
        Self {
            dims: vec![1, 1],
            field_names: names,
            elements: vec![values],
        }
    }

    /// Number of struct elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Look a field up by name on the given element.
    pub fn field(&self, element: usize, name: &str) -> Option<&MatValue> {
        let idx = self.field_names.iter().position(|f| f == name)?;
        self.elements.get(element)?.get(idx)
    }
}

impl MatValue {
    /// Total number of elements (product of the dimensions).
    pub fn numel(&self) -> usize {
        match self {
            MatValue::Numeric(a) => a.values.len(),
            MatValue::Char(a) => a.dims.iter().product(),
            MatValue::Cell(a) => a.cells.len(),
            MatValue::Struct(a) => a.elements.len(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MatValue::Numeric(_) => "numeric",
            MatValue::Char(_) => "char",
            MatValue::Cell(_) => "cell",
            MatValue::Struct(_) => "struct",
        }
    }

    pub fn as_numeric(&self) -> Option<&NumericArray> {
        match self {
            MatValue::Numeric(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_cell(&self) -> Option<&CellArray> {
        match self {
            MatValue::Cell(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructArray> {
        match self {
            MatValue::Struct(a) => Some(a),
            _ => None,
        }
    }

    /// Text content of a char array. An empty numeric matrix reads as `""`,
    /// which is how MATLAB stores a missing string inside a cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MatValue::Char(a) => Some(&a.text),
            MatValue::Numeric(a) if a.values.is_empty() => Some(""),
            _ => None,
        }
    }
}

impl fmt::Display for MatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims = match self {
            MatValue::Numeric(a) => &a.dims,
            MatValue::Char(a) => &a.dims,
            MatValue::Cell(a) => &a.dims,
            MatValue::Struct(a) => &a.dims,
        };
        let shape: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
        write!(f, "{} {}", shape.join("x"), self.kind())
    }
}

impl From<NumericArray> for MatValue {
    fn from(a: NumericArray) -> Self {
        MatValue::Numeric(a)
    }
}

impl From<CharArray> for MatValue {
    fn from(a: CharArray) -> Self {
        MatValue::Char(a)
    }
}

impl From<CellArray> for MatValue {
    fn from(a: CellArray) -> Self {
        MatValue::Cell(a)
    }
}

impl From<StructArray> for MatValue {
    fn from(a: StructArray) -> Self {
        MatValue::Struct(a)
    }
}
