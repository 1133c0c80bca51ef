use crate::adapters::{storage_for, OutputFormat};
use crate::domain::ports::RecordStorage;
use crate::domain::student_data::StudentData;
use crate::utils::error::{RecordError, Result};
use std::path::{Path, PathBuf};

/// 單一後端的儲存結果
#[derive(Debug)]
pub struct BackendOutcome {
    pub format: &'static str,
    pub result: Result<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ExportReport {
    pub outcomes: Vec<BackendOutcome>,
}

impl ExportReport {
    pub fn saved_files(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(PathBuf::as_path))
            .collect()
    }

    pub fn failures(&self) -> Vec<(&'static str, &RecordError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.format, e)))
            .collect()
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn any_succeeded(&self) -> bool {
        self.outcomes.iter().any(|o| o.result.is_ok())
    }
}

/// Runs every configured backend against one export record.
pub struct ExportEngine {
    storages: Vec<Box<dyn RecordStorage>>,
}

impl ExportEngine {
    pub fn new(storages: Vec<Box<dyn RecordStorage>>) -> Self {
        Self { storages }
    }

    pub fn with_formats(formats: &[OutputFormat], csv_bom: bool) -> Self {
        Self::new(
            formats
                .iter()
                .map(|format| storage_for(*format, csv_bom))
                .collect(),
        )
    }

    /// A failing backend is recorded and the remaining ones still run.
    pub fn run(&self, data: &StudentData, filename_stem: &str) -> Result<ExportReport> {
        tracing::info!(
            "📤 Exporting {} to {} format(s)",
            data.student().full_name(),
            self.storages.len()
        );

        let record = data.export()?;
        let mut report = ExportReport::default();

        for storage in &self.storages {
            let result = storage.save(&record, filename_stem);
            match &result {
                Ok(path) => {
                    tracing::info!("✅ {} saved to {}", storage.format_name(), path.display())
                }
                Err(e) => tracing::error!("❌ {} export failed: {}", storage.format_name(), e),
            }
            report.outcomes.push(BackendOutcome {
                format: storage.format_name(),
                result,
            });
        }

        if !report.any_succeeded() {
            tracing::warn!("No output file could be saved");
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::ExportRecord;
    use crate::domain::{DesiredPerformance, RealPerformance, Student};
    use chrono::NaiveDate;
    use std::io;
    use tempfile::TempDir;

    struct FailingStorage;

    impl RecordStorage for FailingStorage {
        fn format_name(&self) -> &'static str {
            "BROKEN"
        }

        fn extension(&self) -> &'static str {
            "broken"
        }

        fn render(&self, _record: &ExportRecord) -> io::Result<Vec<u8>> {
            Err(io::Error::new(io::ErrorKind::Other, "encoder exploded"))
        }
    }

    fn sample_data() -> StudentData {
        let subjects = ["Math", "Physics"];
        StudentData::new(
            Student::new(
                "Doe",
                "John",
                "Michael",
                "CS-1",
                NaiveDate::from_ymd_opt(2001, 2, 3).unwrap(),
                None,
            )
            .unwrap(),
            RealPerformance::new(&subjects, &[70, 80]).unwrap(),
            DesiredPerformance::new(&subjects, &[90, 80]).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_partial_failure_is_reported_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let stem = temp_dir.path().join("report");
        let stem = stem.to_str().unwrap();

        let engine = ExportEngine::new(vec![
            Box::new(FailingStorage),
            storage_for(OutputFormat::Json, true),
        ]);
        let report = engine.run(&sample_data(), stem).unwrap();

        assert!(!report.all_succeeded());
        assert!(report.any_succeeded());
        assert_eq!(report.saved_files().len(), 1);

        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "BROKEN");
        match failures[0].1 {
            RecordError::StorageError { message, .. } => {
                assert!(message.contains("encoder exploded"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(temp_dir.path().join("report.json").exists());
    }

    #[test]
    fn test_all_formats_written() {
        let temp_dir = TempDir::new().unwrap();
        let stem = temp_dir.path().join("student_data");

        let engine = ExportEngine::with_formats(&OutputFormat::ALL, false);
        let report = engine.run(&sample_data(), stem.to_str().unwrap()).unwrap();

        assert!(report.all_succeeded());
        for ext in ["json", "xml", "csv"] {
            assert!(temp_dir.path().join(format!("student_data.{}", ext)).exists());
        }
    }
}
