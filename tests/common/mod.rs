//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use plotis::{CellValue, Table};

/// Path of a Python fixture under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// A small sinus table with a label column.
pub fn sinus_table() -> Table {
    let n = 8;
    let x: Vec<f64> = (0..n).map(|i| i as f64 * 0.5).collect();
    let mut table = Table::new(["x", "y", "label"]);
    for (i, v) in x.iter().enumerate() {
        let label = if i % 2 == 0 { CellValue::from("even") } else { CellValue::Null };
        table
            .push_row(vec![CellValue::Float(*v), CellValue::Float(v.sin()), label])
            .unwrap();
    }
    table
}

/// A table of integer columns.
pub fn count_table(offset: i64) -> Table {
    let mut table = Table::new(["x", "y"]);
    for i in 0..5 {
        table
            .push_row(vec![CellValue::Integer(i), CellValue::Integer(i * i + offset)])
            .unwrap();
    }
    table
}
