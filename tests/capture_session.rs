mod common;

use std::fs;

use plotis::capture::{resolve_extent, SourceText};
use plotis::data::loader::load_csv;
use plotis::{
    capture, with_capture, CaptureConfig, CaptureContext, CaptureError, CaptureSession, Dataset,
    TerminalCall,
};
use tempfile::tempdir;

use common::{count_table, fixture, sinus_table};

const SINUS_SCRIPT: &str = "\
import pandas as pd
import matplotlib.pyplot as plt

sample_data = pd.read_csv(\"data.csv\")
import matplotlib.pyplot as plt

# Plots data
plt.plot(sample_data[\"x\"], sample_data[\"y\"])
plt.title(\"Sinus function\")

plt.xlabel(\"x\")
plt.ylabel(\"sin(x)\")

# Saves plot
plt.savefig(\"figure.png\")
";

#[test]
fn extent_of_fixture_block() {
    let source = SourceText::read(&fixture("sinus_plot.py")).unwrap();
    assert_eq!(resolve_extent(source.lines(), 18, false), 29);

    let mut padded = source.lines().to_vec();
    padded.extend(["\n".to_string(), "    \n".to_string(), "\n".to_string()]);
    assert_eq!(resolve_extent(&padded, 18, false), 29);
}

#[test]
fn sinus_block_is_packaged() {
    let out = tempdir().unwrap();
    let figpath = out.path().join("sinus_curve");
    let table = sinus_table();
    let config = CaptureConfig::default();

    let report = capture(
        &CaptureContext::new(fixture("sinus_plot.py"), 18),
        &figpath,
        Dataset::Single(&table),
        &config,
    )
    .unwrap();

    assert_eq!((report.block_start, report.block_end), (19, 29));
    assert_eq!(report.script, figpath.join("run.py"));
    assert_eq!(fs::read_to_string(&report.script).unwrap(), SINUS_SCRIPT);

    // Reloading what the script's read_csv statement points at gives the
    // original table back.
    assert_eq!(report.data_files, vec![figpath.join("data.csv")]);
    assert_eq!(load_csv(&report.data_files[0]).unwrap(), table);
}

#[test]
fn repeated_sessions_write_identical_bytes() {
    let out = tempdir().unwrap();
    let table = sinus_table();
    let config = CaptureConfig::default();
    let context = CaptureContext::new(fixture("sinus_plot.py"), 18);

    let first = capture(&context, out.path(), Dataset::Single(&table), &config).unwrap();
    let script = fs::read(&first.script).unwrap();
    let data = fs::read(&first.data_files[0]).unwrap();

    let second = capture(&context, out.path(), Dataset::Single(&table), &config).unwrap();
    assert_eq!(fs::read(&second.script).unwrap(), script);
    assert_eq!(fs::read(&second.data_files[0]).unwrap(), data);
}

#[test]
fn nested_block_fails_on_entry_and_writes_nothing() {
    let out = tempdir().unwrap();
    let figpath = out.path().join("mockfig1");
    let table = count_table(0);
    let config = CaptureConfig::default();

    let err = CaptureSession::enter(
        &CaptureContext::new(fixture("nested.py"), 7),
        &figpath,
        Dataset::Single(&table),
        &config,
    )
    .unwrap_err();

    assert!(matches!(err, CaptureError::NestedCaptureNotSupported { line: 11 }));
    assert!(!figpath.exists());
}

#[test]
fn inner_block_of_nested_file_is_capturable() {
    let out = tempdir().unwrap();
    let table = count_table(0);
    let config = CaptureConfig::default();

    let report = capture(
        &CaptureContext::new(fixture("nested.py"), 11),
        out.path(),
        Dataset::Single(&table),
        &config,
    )
    .unwrap();
    assert_eq!((report.block_start, report.block_end), (12, 15));

    let script = fs::read_to_string(&report.script).unwrap();
    assert!(script.contains("mock_data = pd.read_csv(\"data.csv\")\n"));
    assert!(script.contains("\nplt.plot(mock_data[\"a\"], mock_data[\"x\"])\n"));
}

#[test]
fn second_savefig_is_rejected() {
    let table = count_table(0);
    let config = CaptureConfig::default();

    let err = CaptureSession::enter(
        &CaptureContext::new(fixture("two_figures.py"), 7),
        "unused",
        Dataset::Single(&table),
        &config,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        CaptureError::MultipleFiguresNotSupported {
            call: TerminalCall::Save,
            count: 2
        }
    ));
}

#[test]
fn show_call_is_kept_and_save_appended() {
    let out = tempdir().unwrap();
    let table = count_table(0);
    let config = CaptureConfig::default();

    let report = capture(
        &CaptureContext::new(fixture("show_and_lists.py"), 7),
        out.path(),
        Dataset::Single(&table),
        &config,
    )
    .unwrap();

    let script = fs::read_to_string(&report.script).unwrap();
    assert!(script.ends_with(
        "df = pd.read_csv(\"data.csv\")\n\
         df.plot(x=\"x\", y=\"y\")\n\
         plt.show()\n\
         plt.savefig(\"figure.png\")\n"
    ));
}

#[test]
fn list_literal_binding_gets_one_file_per_table() {
    let out = tempdir().unwrap();
    let tables = vec![count_table(0), count_table(100)];
    let config = CaptureConfig::default();

    let report = capture(
        &CaptureContext::new(fixture("show_and_lists.py"), 13),
        out.path(),
        Dataset::Many(&tables),
        &config,
    )
    .unwrap();

    assert_eq!(report.data_files.len(), 2);
    assert_eq!(load_csv(&out.path().join("data0.csv")).unwrap(), tables[0]);
    assert_eq!(load_csv(&out.path().join("data1.csv")).unwrap(), tables[1]);

    let script = fs::read_to_string(&report.script).unwrap();
    assert!(script.contains(
        "train = pd.read_csv(\"data0.csv\")\ntest = pd.read_csv(\"data1.csv\")\n"
    ));
    assert!(script.ends_with("plt.savefig(\"compare.png\")\n"));
}

#[test]
fn malformed_openings_are_invalid_syntax() {
    let table = count_table(0);
    let config = CaptureConfig::default();

    for line in [20, 21, 22] {
        let err = CaptureSession::enter(
            &CaptureContext::new(fixture("show_and_lists.py"), line),
            "unused",
            Dataset::Single(&table),
            &config,
        )
        .unwrap_err();
        assert!(
            matches!(err, CaptureError::InvalidInvocationSyntax { line: l, .. } if l == line),
            "line {line}: {err}"
        );
    }
}

#[test]
fn unbound_data_fails_on_exit_before_writing() {
    let out = tempdir().unwrap();
    let figpath = out.path().join("out");
    let table = count_table(0);
    let config = CaptureConfig::default();

    let session = CaptureSession::enter(
        &CaptureContext::new(fixture("show_and_lists.py"), 26),
        &figpath,
        Dataset::Single(&table),
        &config,
    )
    .unwrap();
    let err = session.exit().unwrap_err();

    assert!(matches!(err, CaptureError::DataBindingUnresolvable { .. }));
    assert!(!figpath.exists());
}

#[test]
fn missing_line_is_context_unavailable() {
    let table = count_table(0);
    let config = CaptureConfig::default();

    let err = CaptureSession::enter(
        &CaptureContext::new(fixture("sinus_plot.py"), 999),
        "unused",
        Dataset::Single(&table),
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, CaptureError::ContextUnavailable { line: 999, .. }));
}

#[test]
fn scoped_body_sees_the_session() {
    let out = tempdir().unwrap();
    let table = sinus_table();
    let config = CaptureConfig::default();

    let (captured, report) = with_capture(
        &CaptureContext::new(fixture("sinus_plot.py"), 18),
        out.path(),
        Dataset::Single(&table),
        &config,
        |session| {
            assert_eq!(session.invocation().alias.as_deref(), Some("pi"));
            session.captured_lines().len()
        },
    )
    .unwrap();

    assert_eq!(captured, 11);
    assert!(report.script.exists());
}

#[test]
fn custom_constructor_and_names() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("plot.py");
    fs::write(
        &source,
        "with Capture(path, data=df):\n    df.plot()\n    plt.savefig(\"x.png\")\n",
    )
    .unwrap();

    let config = CaptureConfig::from_toml(
        "constructor = \"Capture\"\nscript_name = \"replay.py\"\nfigure_name = \"plot.svg\"\n",
    )
    .unwrap();
    let table = count_table(0);
    let out = dir.path().join("fig");

    let report = capture(
        &CaptureContext::new(&source, 1),
        &out,
        Dataset::Single(&table),
        &config,
    )
    .unwrap();

    assert_eq!(report.script, out.join("replay.py"));
    assert_eq!(
        fs::read_to_string(&report.script).unwrap(),
        "import pandas as pd\nimport matplotlib.pyplot as plt\n\n\
         df = pd.read_csv(\"data.csv\")\ndf.plot()\nplt.savefig(\"plot.svg\")\n"
    );
}
