//! Replay report.
//!
//! One JSON document per replay, printed to stdout and optionally saved
//! next to the scenario.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Component, Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// The first assertion that did not hold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionFailure {
    pub step_index: usize,
    pub assertion: String,
    pub message: String,
}

/// Outcome of replaying one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Scenario file stem, when replayed from disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    pub status: ReportStatus,
    pub failed_step_index: Option<usize>,
    pub assertion: Option<String>,
    pub message: Option<String>,
    pub steps_run: usize,
    /// Virtual clock when the replay stopped
    pub elapsed_ms: u64,
    /// Ripple records still queued when the replay stopped
    pub ripples_in_flight: usize,
}

impl ReplayReport {
    /// Build a report from where the replay stopped.
    pub fn new(
        steps_run: usize,
        elapsed_ms: u64,
        ripples_in_flight: usize,
        failure: Option<AssertionFailure>,
    ) -> Self {
        let status = if failure.is_some() {
            ReportStatus::Failed
        } else {
            ReportStatus::Passed
        };
        let (failed_step_index, assertion, message) = match failure {
            Some(f) => (Some(f.step_index), Some(f.assertion), Some(f.message)),
            None => (None, None, None),
        };
        Self {
            scenario: None,
            status,
            failed_step_index,
            assertion,
            message,
            steps_run,
            elapsed_ms,
            ripples_in_flight,
        }
    }

    pub fn with_scenario(mut self, name: impl Into<String>) -> Self {
        self.scenario = Some(name.into());
        self
    }

    pub fn is_passed(&self) -> bool {
        self.status == ReportStatus::Passed
    }

    /// Save as pretty JSON to a relative `.json` path, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        check_report_path(path)?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        self.write_to_writer(&mut out)?;
        out.flush()?;
        Ok(())
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Reports stay inside the working directory and are always JSON.
fn check_report_path(path: &Path) -> Result<()> {
    let escapes = path.has_root()
        || path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
    if escapes {
        bail!("report path {} must stay under the working directory", path.display());
    }
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        bail!("report path {} must end in .json", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_paths() {
        assert!(check_report_path(Path::new("/tmp/report.json")).is_err());
        assert!(check_report_path(Path::new("../report.json")).is_err());
        assert!(check_report_path(Path::new("out/report.txt")).is_err());
        assert!(check_report_path(Path::new("out/report.json")).is_ok());
    }

    #[test]
    fn test_failed_report_json() {
        let failure = AssertionFailure {
            step_index: 2,
            assertion: "assert_queue_len".into(),
            message: "expected 0".into(),
        };
        let report = ReplayReport::new(3, 650, 1, Some(failure)).with_scenario("press_release");
        let mut out = Vec::new();
        report.write_to_writer(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"scenario\": \"press_release\""));
        assert!(text.contains("\"status\": \"failed\""));
        assert!(text.contains("\"failed_step_index\": 2"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_passed_report_omits_scenario() {
        let report = ReplayReport::new(4, 100, 0, None);
        assert!(report.is_passed());

        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("scenario"));
        assert!(json.contains("\"failed_step_index\":null"));
    }
}
