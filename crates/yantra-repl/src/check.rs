//! `yantra check`: validate program files from disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use yantra_kernel::{ValidationReport, Validator, ValidatorConfig};

/// How `check` prints its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `<file>:<line>: <message>`, one diagnostic per line.
    Human,
    /// A JSON array of [`FileReport`]s.
    Json,
}

/// The report for one checked file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    #[serde(flatten)]
    pub report: ValidationReport,
}

/// Overall outcome of a `check` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Clean,
    Diagnostics,
}

impl CheckStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            CheckStatus::Clean => 0,
            CheckStatus::Diagnostics => 1,
        }
    }
}

/// Read and validate every file. Stops at the first unreadable file.
pub fn check_files(paths: &[PathBuf], config: ValidatorConfig) -> Result<Vec<FileReport>> {
    let validator = Validator::with_config(config);
    paths
        .iter()
        .map(|path| {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            tracing::debug!(file = %path.display(), "checking");
            Ok(FileReport {
                file: path.clone(),
                report: validator.report(&source),
            })
        })
        .collect()
}

/// Write `reports` in `format` and summarize them.
pub fn write_reports(
    reports: &[FileReport],
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<CheckStatus> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, reports).context("failed to write JSON")?;
            writeln!(out)?;
        }
        OutputFormat::Human => {
            for file in reports {
                write_human(&file.file, &file.report, out)?;
            }
        }
    }

    let status = if reports.iter().all(|r| r.report.is_valid) {
        CheckStatus::Clean
    } else {
        CheckStatus::Diagnostics
    };
    Ok(status)
}

fn write_human(path: &Path, report: &ValidationReport, out: &mut impl Write) -> Result<()> {
    if report.is_valid {
        writeln!(out, "{}: ok", path.display())?;
        return Ok(());
    }
    for diagnostic in &report.diagnostics {
        writeln!(
            out,
            "{}:{}: {}",
            path.display(),
            diagnostic.line,
            diagnostic.message
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use yantra_kernel::Diagnostic;

    fn report(file: &str, code: &str, diagnostics: Vec<Diagnostic>) -> FileReport {
        FileReport {
            file: PathBuf::from(file),
            report: ValidationReport::new(code, diagnostics),
        }
    }

    #[test]
    fn human_output_lists_each_diagnostic() {
        let reports = vec![
            report("good.yb", "PADAM a:ANKHE;", vec![]),
            report(
                "bad.yb",
                "PADAM sum:ANKHE;\nsum = a + b;",
                vec![
                    Diagnostic::undeclared(2, "a"),
                    Diagnostic::undeclared(2, "b"),
                ],
            ),
        ];
        let mut out = Vec::new();
        let status = write_reports(&reports, OutputFormat::Human, &mut out).expect("write");
        assert_eq!(status, CheckStatus::Diagnostics);
        assert_eq!(status.exit_code(), 1);
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "good.yb: ok\nbad.yb:2: Undeclared variable 'a'.\nbad.yb:2: Undeclared variable 'b'.\n"
        );
    }

    #[test]
    fn json_output_flattens_report() {
        let reports = vec![report("x.yb", "PADAM a:ANKHE", vec![Diagnostic::missing_semicolon(1)])];
        let mut out = Vec::new();
        write_reports(&reports, OutputFormat::Json, &mut out).expect("write");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value[0]["file"], "x.yb");
        assert_eq!(value[0]["code"], "PADAM a:ANKHE");
        assert_eq!(value[0]["is_valid"], false);
        assert_eq!(value[0]["diagnostics"][0]["line"], 1);
        assert_eq!(value[0]["diagnostics"][0]["message"], "Missing semicolon.");
    }

    #[test]
    fn all_valid_is_clean() {
        let reports = vec![report("a.yb", "", vec![])];
        let status = write_reports(&reports, OutputFormat::Human, &mut Vec::<u8>::new()).expect("write");
        assert_eq!(status, CheckStatus::Clean);
        assert_eq!(status.exit_code(), 0);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = check_files(&[PathBuf::from("/nonexistent/prog.yb")], ValidatorConfig::default())
            .expect_err("missing file");
        assert!(err.to_string().contains("/nonexistent/prog.yb"));
    }
}
