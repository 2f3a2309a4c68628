use std::fmt;

use anyhow::{bail, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl CellValue {
    /// Guess the type of a raw text field, the way `pd.read_csv` would.
    ///
    /// Empty fields are `Null`; integers win over floats; `True`/`False`
    /// (either case) are booleans; everything else stays a string.
    pub fn guess(s: &str) -> CellValue {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        match s {
            "True" | "true" => CellValue::Bool(true),
            "False" | "false" => CellValue::Bool(false),
            _ => CellValue::String(s.to_string()),
        }
    }

    /// Render the value as a CSV field.
    ///
    /// Floats keep a decimal point (`1.0`, never `1`) so they reload as
    /// floats; `Null` is the empty field.
    pub fn to_field(&self) -> String {
        match self {
            CellValue::String(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(v) => format!("{v:?}"),
            CellValue::Bool(true) => "True".to_string(),
            CellValue::Bool(false) => "False".to_string(),
            CellValue::Null => String::new(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Integer(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::String(v.to_string())
    }
}

// ---------------------------------------------------------------------------
// Table – one DataFrame
// ---------------------------------------------------------------------------

/// A rectangular table: ordered column names and rows of equal width.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// An empty table with the given header.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from named columns of equal length.
    pub fn from_columns(columns: Vec<(String, Vec<CellValue>)>) -> Result<Self> {
        let n_rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != n_rows) {
            bail!(
                "column '{name}' has {} values but the first column has {n_rows}",
                values.len()
            );
        }

        let mut table = Table::new(columns.iter().map(|(name, _)| name.clone()));
        let mut iters: Vec<_> = columns.into_iter().map(|(_, v)| v.into_iter()).collect();
        for _ in 0..n_rows {
            let row = iters.iter_mut().filter_map(Iterator::next).collect();
            table.rows.push(row);
        }
        Ok(table)
    }

    /// Append a row; its width must match the header.
    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<()> {
        if row.len() != self.columns.len() {
            bail!(
                "row {} has {} cells but the table has {} columns",
                self.rows.len(),
                row.len(),
                self.columns.len()
            );
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&CellValue>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Dataset – what a capture session persists
// ---------------------------------------------------------------------------

/// The data handed to a capture session. Held by shared borrow, so a
/// session can serialize it but never mutate it.
#[derive(Debug, Clone, Copy)]
pub enum Dataset<'a> {
    /// One table, written as `data.csv`.
    Single(&'a Table),
    /// A sequence of tables, written as `data0.csv`, `data1.csv`, ...
    Many(&'a [Table]),
}

impl<'a> Dataset<'a> {
    /// The tables in write order.
    pub fn tables(&self) -> Vec<&'a Table> {
        match *self {
            Dataset::Single(t) => vec![t],
            Dataset::Many(ts) => ts.iter().collect(),
        }
    }

    /// File name for the table at `index`.
    pub fn file_name(&self, index: usize) -> String {
        match self {
            Dataset::Single(_) => "data.csv".to_string(),
            Dataset::Many(_) => format!("data{index}.csv"),
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Dataset::Many(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess_follows_pandas_dtypes() {
        assert_eq!(CellValue::guess(""), CellValue::Null);
        assert_eq!(CellValue::guess("42"), CellValue::Integer(42));
        assert_eq!(CellValue::guess("-0.5"), CellValue::Float(-0.5));
        assert_eq!(CellValue::guess("True"), CellValue::Bool(true));
        assert_eq!(CellValue::guess("Sample_A"), CellValue::from("Sample_A"));
    }

    #[test]
    fn integral_floats_keep_their_decimal_point() {
        assert_eq!(CellValue::Float(1.0).to_field(), "1.0");
        assert_eq!(CellValue::guess(&CellValue::Float(1.0).to_field()), CellValue::Float(1.0));
        assert_eq!(CellValue::Float(0.1).to_field(), "0.1");
    }

    #[test]
    fn from_columns_transposes() {
        let t = Table::from_columns(vec![
            ("x".to_string(), vec![1i64.into(), 2i64.into()]),
            ("y".to_string(), vec![CellValue::Float(0.5), CellValue::Null]),
        ])
        .unwrap();
        assert_eq!(t.columns(), ["x", "y"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows()[1], vec![CellValue::Integer(2), CellValue::Null]);
        assert_eq!(t.column("y").unwrap(), vec![&CellValue::Float(0.5), &CellValue::Null]);
    }

    #[test]
    fn ragged_input_is_rejected() {
        let err = Table::from_columns(vec![
            ("x".to_string(), vec![1i64.into()]),
            ("y".to_string(), vec![]),
        ]);
        assert!(err.is_err());

        let mut t = Table::new(["a", "b"]);
        assert!(t.push_row(vec![CellValue::Null]).is_err());
        assert!(t.is_empty());
    }

    #[test]
    fn dataset_file_names() {
        let t = Table::new(["x"]);
        assert_eq!(Dataset::Single(&t).file_name(0), "data.csv");
        let many = vec![t.clone(), t];
        let ds = Dataset::Many(&many);
        assert_eq!(ds.file_name(1), "data1.csv");
        assert_eq!(ds.tables().len(), 2);
    }
}
