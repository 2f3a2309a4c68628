use std::io::Write;

use super::model::Table;

/// Serialize a table as CSV: header row, then one record per row.
///
/// No index column is written, so `pd.read_csv(path)` gives back the same
/// columns.
pub fn write_csv<W: Write>(table: &Table, out: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|c| c.to_field()))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;
    use crate::data::model::CellValue;

    fn sample() -> Table {
        let mut t = Table::new(["x", "y", "note", "ok"]);
        t.push_row(vec![CellValue::Float(1.0), 0i64.into(), "a, b".into(), true.into()])
            .unwrap();
        t.push_row(vec![CellValue::Float(2.5), CellValue::Null, "plain".into(), false.into()])
            .unwrap();
        t
    }

    #[test]
    fn writes_pandas_friendly_csv() {
        let mut buf = Vec::new();
        write_csv(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "x,y,note,ok\n1.0,0,\"a, b\",True\n2.5,,plain,False\n"
        );
    }

    #[test]
    fn reloads_cell_for_cell() {
        let table = sample();
        let mut buf = Vec::new();
        write_csv(&table, &mut buf).unwrap();

        let mut reader = csv::Reader::from_reader(buf.as_slice());
        assert_eq!(read_csv(&mut reader).unwrap(), table);
    }
}
