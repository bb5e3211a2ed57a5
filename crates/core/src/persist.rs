use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ReportConfig;
use crate::model::ProfileResult;
use crate::views::comment::CommentSource;
use crate::views::report::ReportRenderer;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Write `report` to `path` as UTF-8, creating missing parent directories.
///
/// The file handle lives only inside this function and is closed on every
/// return path.
pub fn write_report(path: &Path, report: &str) -> Result<(), PersistError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PersistError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let write_err = |source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(write_err)?);
    writer.write_all(report.as_bytes()).map_err(write_err)?;
    writer.flush().map_err(write_err)
}

impl ProfileResult {
    /// Render the full report and save it to `path`.
    ///
    /// Failures are logged and reported as `false`, never propagated.
    pub fn save(&self, path: &Path, config: &ReportConfig, comments: &dyn CommentSource) -> bool {
        let report = ReportRenderer::new(self, config, comments).render();
        match write_report(path, &report) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), bytes = report.len(), "saved profiler results");
                true
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "could not save profiler results");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LocationInfo, LocationPath, SampleStore};
    use crate::views::comment::FixedComment;
    use tickprof_protocol::RunWindow;

    fn result() -> ProfileResult {
        let store: SampleStore = [
            (LocationPath::root(), LocationInfo::new(100, 1)),
            (LocationPath::root().child("a"), LocationInfo::new(40, 1)),
            (LocationPath::root().child("b"), LocationInfo::new(40, 1)),
        ]
        .into_iter()
        .collect();
        ProfileResult::new(store, RunWindow::new(0, 1_000_000_000, 0, 20)).unwrap()
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug").join("profiling").join("tick.txt");
        let result = result();
        let config = ReportConfig::default();
        let comment = FixedComment::new("saved");

        assert!(result.save(&path, &config, &comment));
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            ReportRenderer::new(&result, &config, &comment).render()
        );
        assert!(written.contains("[00] a(1/0) - 40.00%/40.00%\n"));
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tick.txt");
        fs::write(&path, "stale contents that are longer than nothing").unwrap();

        assert!(result().save(&path, &ReportConfig::default(), &FixedComment::new("x")));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("---- Tick Profiler Results ----\n"));
        assert!(!written.contains("stale"));
    }

    #[test]
    fn save_reports_failure_instead_of_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        let path = blocker.join("tick.txt");

        assert!(!result().save(&path, &ReportConfig::default(), &FixedComment::new("x")));
    }

    #[test]
    fn write_report_names_the_failing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        let err = write_report(&blocker.join("sub").join("out.txt"), "x").unwrap_err();
        assert!(matches!(err, PersistError::CreateDir { .. }));
        assert!(err.to_string().contains("file"));
    }
}
