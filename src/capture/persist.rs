use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::data::model::Dataset;
use crate::data::writer::write_csv;
use crate::error::{CaptureError, CaptureResult};

/// Paths written by [`persist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub data_files: Vec<PathBuf>,
    pub script: PathBuf,
}

/// Write the dataset(s) and script into `output_dir`.
///
/// The directory is created if needed. Each file goes to a temporary file
/// in the same directory and is renamed over its target, so readers never
/// see a half-written file. Data files are renamed first and the script
/// last; a failure in between leaves the new data beside the previous
/// script.
///
/// New files get the mode a plain `open(path, "w")` would give them (0o666
/// less the umask); an overwritten file keeps its previous mode.
pub fn persist(
    output_dir: &Path,
    dataset: &Dataset<'_>,
    script_name: &str,
    script: &[String],
) -> CaptureResult<Written> {
    fs::create_dir_all(output_dir).map_err(|e| CaptureError::persist(output_dir, e))?;

    let mut data_files = Vec::new();
    for (i, table) in dataset.tables().into_iter().enumerate() {
        let path = output_dir.join(dataset.file_name(i));
        write_atomic(&path, |file| {
            write_csv(table, file).map_err(std::io::Error::from)
        })?;
        log::info!("wrote {} ({} rows)", path.display(), table.len());
        data_files.push(path);
    }

    let script_path = output_dir.join(script_name);
    write_atomic(&script_path, |file| {
        script.iter().try_for_each(|line| file.write_all(line.as_bytes()))
    })?;
    log::info!("wrote {}", script_path.display());

    Ok(Written {
        data_files,
        script: script_path,
    })
}

fn write_atomic<F>(path: &Path, fill: F) -> CaptureResult<()>
where
    F: FnOnce(&mut fs::File) -> std::io::Result<()>,
{
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder
        .tempfile_in(dir)
        .map_err(|e| CaptureError::persist(path, e))?;
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| CaptureError::persist(path, e))?;
    }
    fill(tmp.as_file_mut())
        .and_then(|()| tmp.as_file_mut().flush())
        .map_err(|e| CaptureError::persist(path, e))?;
    tmp.persist(path)
        .map_err(|e| CaptureError::persist(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Table;
    use tempfile::tempdir;

    #[test]
    fn creates_nested_directory_and_overwrites() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("figs/sinus");
        let mut table = Table::new(["x"]);
        table.push_row(vec![1i64.into()]).unwrap();

        let script = vec!["print(1)\n".to_string()];
        let written = persist(&out, &Dataset::Single(&table), "run.py", &script).unwrap();
        assert_eq!(written.data_files, vec![out.join("data.csv")]);
        assert_eq!(fs::read_to_string(out.join("data.csv")).unwrap(), "x\n1\n");

        let script = vec!["print(2)\n".to_string()];
        persist(&out, &Dataset::Single(&table), "run.py", &script).unwrap();
        assert_eq!(fs::read_to_string(&written.script).unwrap(), "print(2)\n");
    }

    #[test]
    fn many_tables_are_numbered_from_zero() {
        let dir = tempdir().unwrap();
        let tables = vec![Table::new(["a"]), Table::new(["b"]), Table::new(["c"])];
        let written = persist(dir.path(), &Dataset::Many(&tables), "run.py", &[]).unwrap();

        let names: Vec<_> = written
            .data_files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["data0.csv", "data1.csv", "data2.csv"]);
        assert_eq!(fs::read_to_string(dir.path().join("data2.csv")).unwrap(), "c\n");
    }

    #[cfg(unix)]
    #[test]
    fn file_modes_match_a_plain_write() {
        use std::os::unix::fs::PermissionsExt;
        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;

        let dir = tempdir().unwrap();
        let plain = dir.path().join("plain.txt");
        fs::write(&plain, "").unwrap();

        let out = dir.path().join("out");
        let table = Table::new(["x"]);
        let script = vec!["print(1)\n".to_string()];
        let written = persist(&out, &Dataset::Single(&table), "run.py", &script).unwrap();
        assert_eq!(mode(&written.data_files[0]), mode(&plain));
        assert_eq!(mode(&written.script), mode(&plain));

        fs::set_permissions(&written.script, fs::Permissions::from_mode(0o640)).unwrap();
        persist(&out, &Dataset::Single(&table), "run.py", &script).unwrap();
        assert_eq!(mode(&written.script), 0o640);
        assert_eq!(mode(&written.data_files[0]), mode(&plain));
    }
}
