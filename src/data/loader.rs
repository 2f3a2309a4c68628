use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::compute::{cast_with_options, CastOptions};
use arrow::datatypes::DataType;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per row (the format plotis writes)
/// * `.json`    – `[{ "x": 1.0, "y": 2.0, ... }, ...]`
/// * `.parquet` – flat columns of strings, numbers, bools, dates or times
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    log::debug!("loading table from {}", path.display());
    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Every field is typed with [`CellValue::guess`], so a table written by
/// [`super::writer`] reloads cell for cell.
pub fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    read_csv(&mut reader)
}

pub(crate) fn read_csv<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<Table> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut table = Table::new(headers);
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row = record.iter().map(CellValue::guess).collect();
        table.push_row(row)?;
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "x": 0.0, "y": 0.0, "sample": "A" },
///   { "x": 0.1, "y": 0.0998, "sample": "A" }
/// ]
/// ```
///
/// Columns are taken from the first record; later records must carry the
/// same keys (a missing key is `Null`).
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let columns: Vec<String> = match records.first() {
        Some(first) => first
            .as_object()
            .context("Row 0 is not a JSON object")?
            .keys()
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    let mut table = Table::new(columns.clone());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        if let Some(extra) = obj.keys().find(|k| !columns.contains(k)) {
            bail!("Row {i}: unexpected key '{extra}'");
        }

        let row = columns
            .iter()
            .map(|c| obj.get(c).map(json_to_cell).unwrap_or(CellValue::Null))
            .collect();
        table.push_row(row)?;
    }

    Ok(table)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Every integer width becomes
/// `Integer`, every float width `Float`, dates and times are rendered as
/// ISO-8601 text and categoricals are decoded. Any other column type is an
/// error rather than a lossy guess.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut table = Table::new(columns.clone());
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let cols: Vec<Column> = batch
            .columns()
            .iter()
            .zip(&columns)
            .map(|(col, name)| Column::from_arrow(col).with_context(|| format!("column '{name}'")))
            .collect::<Result<_>>()?;

        for row in 0..batch.num_rows() {
            table.push_row(cols.iter().map(|c| c.cell(row)).collect())?;
        }
    }

    Ok(table)
}

// -- Parquet / Arrow helpers --

/// An Arrow column normalised to one of the types a cell can hold.
enum Column {
    Int(Int64Array),
    Float(Float64Array),
    Str(StringArray),
    Bool(BooleanArray),
    /// Pre-rendered text (dates, times, durations).
    Text(Vec<Option<String>>),
    Null,
}

impl Column {
    fn from_arrow(col: &ArrayRef) -> Result<Self> {
        match col.data_type() {
            DataType::Null => Ok(Column::Null),
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => Ok(Column::Int(downcast(&strict_cast(col, &DataType::Int64)?)?)),
            DataType::Float16 | DataType::Float32 | DataType::Float64 => {
                Ok(Column::Float(downcast(&strict_cast(col, &DataType::Float64)?)?))
            }
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
                Ok(Column::Str(downcast(&strict_cast(col, &DataType::Utf8)?)?))
            }
            DataType::Boolean => Ok(Column::Bool(downcast(col)?)),
            DataType::Dictionary(_, values) => {
                Self::from_arrow(&strict_cast(col, values.as_ref())?)
            }
            DataType::Date32
            | DataType::Date64
            | DataType::Timestamp(_, _)
            | DataType::Time32(_)
            | DataType::Time64(_)
            | DataType::Duration(_) => {
                let options = FormatOptions::default();
                let formatter = ArrayFormatter::try_new(col.as_ref(), &options)
                    .context("formatting temporal column")?;
                let text = (0..col.len())
                    .map(|i| (!col.is_null(i)).then(|| formatter.value(i).to_string()))
                    .collect();
                Ok(Column::Text(text))
            }
            other => bail!("unsupported column type {other:?}"),
        }
    }

    fn cell(&self, row: usize) -> CellValue {
        match self {
            Column::Int(a) if a.is_valid(row) => CellValue::Integer(a.value(row)),
            Column::Float(a) if a.is_valid(row) => CellValue::Float(a.value(row)),
            Column::Str(a) if a.is_valid(row) => CellValue::String(a.value(row).to_string()),
            Column::Bool(a) if a.is_valid(row) => CellValue::Bool(a.value(row)),
            Column::Text(v) => v[row].clone().map_or(CellValue::Null, CellValue::String),
            _ => CellValue::Null,
        }
    }
}

/// Cast that fails on overflow instead of nulling the value.
fn strict_cast(col: &ArrayRef, to: &DataType) -> Result<ArrayRef> {
    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    cast_with_options(col, to, &options)
        .with_context(|| format!("converting {:?} to {to:?}", col.data_type()))
}

fn downcast<A: Array + Clone + 'static>(col: &ArrayRef) -> Result<A> {
    col.as_any()
        .downcast_ref::<A>()
        .cloned()
        .with_context(|| format!("unexpected array for {:?}", col.data_type()))
}
