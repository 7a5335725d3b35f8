use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::error::PersistenceError;
use super::types::{GradeReport, validate_exam_id};

/// File name of the per-exam report log.
pub const REPORTS_FILE: &str = "reports.jsonl";

#[async_trait]
/// Persists graded reports keyed by exam identifier.
pub trait ReportStore: Send + Sync {
    /// Appends `report` under its exam identifier.
    async fn save(&self, report: &GradeReport) -> Result<(), PersistenceError>;

    /// Exam identifiers with at least one stored report, sorted.
    async fn list_exams(&self) -> Result<Vec<String>, PersistenceError>;

    /// Reports of `exam_id` in insertion order. Unknown exams yield an empty list.
    async fn list_reports(&self, exam_id: &str) -> Result<Vec<GradeReport>, PersistenceError>;
}

/// One JSON line per report at `<root>/<exam_id>/reports.jsonl`.
#[derive(Debug)]
pub struct FileReportStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileReportStore {
    /// Does not touch the filesystem; directories are created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn exam_file(&self, exam_id: &str) -> PathBuf {
        self.root.join(exam_id).join(REPORTS_FILE)
    }
}

fn io_error(path: &Path, err: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

#[async_trait]
impl ReportStore for FileReportStore {
    async fn save(&self, report: &GradeReport) -> Result<(), PersistenceError> {
        validate_exam_id(&report.exam_id)?;

        let mut line =
            serde_json::to_string(report).map_err(|e| PersistenceError::Serialization {
                reason: e.to_string(),
            })?;
        line.push('\n');

        let path = self.exam_file(&report.exam_id);
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, e))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| io_error(&path, e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| io_error(&path, e))?;
        file.flush().await.map_err(|e| io_error(&path, e))?;

        info!(
            exam_id = %report.exam_id,
            student = report.student_name.as_deref().unwrap_or("-"),
            "Saved grade report"
        );
        Ok(())
    }

    async fn list_exams(&self) -> Result<Vec<String>, PersistenceError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.root, e)),
        };

        let mut exams = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error(&self.root, e))?
        {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if validate_exam_id(&name).is_err() {
                continue;
            }
            if tokio::fs::try_exists(entry.path().join(REPORTS_FILE))
                .await
                .unwrap_or(false)
            {
                exams.push(name);
            }
        }

        exams.sort();
        Ok(exams)
    }

    async fn list_reports(&self, exam_id: &str) -> Result<Vec<GradeReport>, PersistenceError> {
        validate_exam_id(exam_id)?;
        let path = self.exam_file(exam_id);

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&path, e)),
        };

        let reports = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(offset, line)| {
                serde_json::from_str(line).map_err(|e| PersistenceError::Corrupt {
                    path: path.clone(),
                    line: offset + 1,
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<GradeReport>, _>>()?;

        debug!(exam_id = exam_id, reports = reports.len(), "Listed reports");
        Ok(reports)
    }
}

#[cfg(any(test, feature = "mock"))]
/// In-memory [`ReportStore`]; can be switched to fail every save.
#[derive(Debug, Default, Clone)]
pub struct MockReportStore {
    reports: std::sync::Arc<
        parking_lot::RwLock<std::collections::BTreeMap<String, Vec<GradeReport>>>,
    >,
    fail_saves: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

#[cfg(any(test, feature = "mock"))]
impl MockReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves
            .store(fail, std::sync::atomic::Ordering::Relaxed);
    }

    /// Total reports across all exams.
    pub fn len(&self) -> usize {
        self.reports.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl ReportStore for MockReportStore {
    async fn save(&self, report: &GradeReport) -> Result<(), PersistenceError> {
        validate_exam_id(&report.exam_id)?;
        if self.fail_saves.load(std::sync::atomic::Ordering::Relaxed) {
            return Err(PersistenceError::Unavailable {
                reason: "mock store configured to fail".to_string(),
            });
        }
        self.reports
            .write()
            .entry(report.exam_id.clone())
            .or_default()
            .push(report.clone());
        Ok(())
    }

    async fn list_exams(&self) -> Result<Vec<String>, PersistenceError> {
        Ok(self.reports.read().keys().cloned().collect())
    }

    async fn list_reports(&self, exam_id: &str) -> Result<Vec<GradeReport>, PersistenceError> {
        validate_exam_id(exam_id)?;
        Ok(self
            .reports
            .read()
            .get(exam_id)
            .cloned()
            .unwrap_or_default())
    }
}
