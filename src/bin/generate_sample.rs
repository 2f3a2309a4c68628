//! Write a demo dataset and a script that captures a plot of it.
//!
//! ```text
//! cargo run --bin generate_sample -- demo
//! plotis capture demo/plot_sinus.py --figpath demo/sinus_curve --data demo/sinus.parquet
//! ```

use std::f64::consts::PI;
use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use plotis::data::writer::write_csv;
use plotis::{CellValue, Table};

const N_POINTS: usize = 50;

const SCRIPT: &str = r#""""Plot a sinus curve and package it with PlotIs."""

import pandas as pd

from plotis import PlotIs


def run() -> None:
    sample_data = pd.read_parquet("sinus.parquet")
    figure_folder = "sinus_curve"

    with PlotIs(figure_folder, sample_data):
        import matplotlib.pyplot as plt

        # Plots data
        plt.plot(sample_data["x"], sample_data["y"])
        plt.title("Sinus function")
        plt.xlabel("x")
        plt.ylabel("sin(x)")

        # Saves plot
        plt.savefig("sinus.png")


if __name__ == "__main__":
    run()
"#;

fn main() {
    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "demo".to_string()));
    std::fs::create_dir_all(&out_dir).expect("Failed to create output directory");

    // x: 0 → 4π, like np.linspace(0, 4*math.pi)
    let x: Vec<f64> = (0..N_POINTS)
        .map(|i| 4.0 * PI * i as f64 / (N_POINTS - 1) as f64)
        .collect();
    let y: Vec<f64> = x.iter().map(|v| v.sin()).collect();
    let half: Vec<&str> = x
        .iter()
        .map(|v| if *v < 2.0 * PI { "first" } else { "second" })
        .collect();

    // Parquet
    let schema = Arc::new(Schema::new(vec![
        Field::new("x", DataType::Float64, false),
        Field::new("y", DataType::Float64, false),
        Field::new("period", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(x.clone())),
            Arc::new(Float64Array::from(y.clone())),
            Arc::new(StringArray::from(half.clone())),
        ],
    )
    .expect("Failed to create RecordBatch");

    let parquet_path = out_dir.join("sinus.parquet");
    let file = std::fs::File::create(&parquet_path).expect("Failed to create parquet file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    // CSV
    let table = Table::from_columns(vec![
        ("x".to_string(), x.into_iter().map(CellValue::from).collect()),
        ("y".to_string(), y.into_iter().map(CellValue::from).collect()),
        ("period".to_string(), half.into_iter().map(CellValue::from).collect()),
    ])
    .expect("Columns have equal length");
    let csv_path = out_dir.join("sinus.csv");
    let csv_file = std::fs::File::create(&csv_path).expect("Failed to create CSV file");
    write_csv(&table, csv_file).expect("Failed to write CSV");

    // Script
    let script_path = out_dir.join("plot_sinus.py");
    std::fs::write(&script_path, SCRIPT).expect("Failed to write script");

    println!(
        "Wrote {N_POINTS} points to {} and {}, script {}",
        parquet_path.display(),
        csv_path.display(),
        script_path.display()
    );
}
