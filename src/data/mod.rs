/// Data layer: tabular types, loading and CSV persistence.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  ordered columns, rows of CellValue
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  Table → data.csv next to run.py
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod writer;
