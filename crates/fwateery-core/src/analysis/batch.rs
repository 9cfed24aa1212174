//! Sequential processing of several invoice images.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use super::{ImageSubmission, InvoiceAnalyzer, Result};
use crate::error::AnalysisError;
use crate::models::config::DEFAULT_MAX_IMAGE_BYTES;
use crate::models::invoice::InvoiceRecord;
use crate::models::language::Language;
use crate::normalize::apply_business_rules;

/// One image that could not be turned into invoices.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Aggregate outcome of a batch.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Images that produced at least one invoice.
    pub succeeded: usize,
    /// Images that failed.
    pub failed: usize,
    /// Normalized records, in the order they were produced.
    pub records: Vec<InvoiceRecord>,
    /// Failure details, one per failed image.
    pub failures: Vec<BatchFailure>,
    /// Wall time of the whole batch.
    pub processing_time_ms: u64,
}

impl BatchSummary {
    /// "N succeeded, M failed" in the given language.
    pub fn message(&self, lang: Language) -> String {
        lang.batch_outcome(self.succeeded, self.failed)
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Runs images through an analyzer one at a time and normalizes the results.
pub struct BatchProcessor<'a, A: InvoiceAnalyzer> {
    analyzer: &'a A,
    language: Language,
    attach_images: bool,
    max_image_bytes: u64,
    today: Option<NaiveDate>,
}

impl<'a, A: InvoiceAnalyzer> BatchProcessor<'a, A> {
    pub fn new(analyzer: &'a A, language: Language) -> Self {
        Self {
            analyzer,
            language,
            attach_images: true,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            today: None,
        }
    }

    /// Keep the source image on each record.
    pub fn with_attached_images(mut self, attach: bool) -> Self {
        self.attach_images = attach;
        self
    }

    /// Set the per-image size limit.
    pub fn with_max_image_bytes(mut self, max: u64) -> Self {
        self.max_image_bytes = max;
        self
    }

    /// Fix the date used for invoices without one.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Analyze one submission and normalize every invoice found in it.
    pub fn process_submission(&self, submission: &ImageSubmission) -> Result<Vec<InvoiceRecord>> {
        let extractions = self.analyzer.analyze(submission, self.language)?;
        if extractions.is_empty() {
            return Err(AnalysisError::NoInvoicesFound);
        }

        let today = self.today.unwrap_or_else(|| Utc::now().date_naive());
        let image = self.attach_images.then(|| submission.data_url.clone());

        Ok(extractions
            .into_iter()
            .map(|raw| {
                InvoiceRecord::from_extraction(apply_business_rules(raw), self.language, image.clone(), today)
            })
            .collect())
    }

    /// Load and process one image file.
    pub fn process_path(&self, path: &Path) -> Result<Vec<InvoiceRecord>> {
        let submission = ImageSubmission::from_path(path, self.max_image_bytes)?;
        self.process_submission(&submission)
    }

    /// Process every path in order. A failing image is recorded and the
    /// batch moves on; `on_item` is told about each image as it finishes.
    pub fn run<F>(&self, paths: &[PathBuf], mut on_item: F) -> BatchSummary
    where
        F: FnMut(&Path, &Result<Vec<InvoiceRecord>>),
    {
        let start = Instant::now();
        let mut summary = BatchSummary::default();

        for path in paths {
            let result = self.process_path(path);
            on_item(path, &result);

            match result {
                Ok(records) => {
                    debug!("{}: {} invoice(s)", path.display(), records.len());
                    summary.succeeded += 1;
                    summary.records.extend(records);
                }
                Err(e) => {
                    warn!("Failed to process {}: {}", path.display(), e);
                    summary.failed += 1;
                    summary.failures.push(BatchFailure {
                        path: path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        summary.processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Batch finished: {} succeeded, {} failed, {} invoice(s)",
            summary.succeeded,
            summary.failed,
            summary.records.len()
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::RawExtraction;
    use std::cell::RefCell;
    use std::fs;

    /// Answers by file name: `fail*` errors, `empty*` finds nothing,
    /// anything else yields one X-Ray and one consultation.
    struct StubAnalyzer {
        calls: RefCell<Vec<PathBuf>>,
    }

    impl StubAnalyzer {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl InvoiceAnalyzer for StubAnalyzer {
        fn analyze(&self, submission: &ImageSubmission, _lang: Language) -> Result<Vec<RawExtraction>> {
            self.calls.borrow_mut().push(submission.path.clone());
            let name = submission.path.file_name().unwrap().to_string_lossy().to_string();

            if name.starts_with("fail") {
                return Err(AnalysisError::Collaborator("model unavailable".to_string()));
            }
            if name.starts_with("empty") {
                return Ok(Vec::new());
            }

            Ok(vec![
                RawExtraction {
                    patient_name: Some(name.clone()),
                    procedure: Some("X-Ray".to_string()),
                    price: Some("45000".to_string()),
                    date: Some("2024-01-06".to_string()),
                    day_name: None,
                },
                RawExtraction {
                    patient_name: Some(name),
                    procedure: Some("Consultation".to_string()),
                    price: Some("999".to_string()),
                    date: None,
                    day_name: None,
                },
            ])
        }
    }

    fn write_images(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                fs::write(&path, b"img").unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn test_partial_failure_is_tallied() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_images(dir.path(), &["one.png", "fail.png", "three.png"]);

        let analyzer = StubAnalyzer::new();
        let processor = BatchProcessor::new(&analyzer, Language::En)
            .with_today(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap());

        let mut seen = Vec::new();
        let summary = processor.run(&paths, |path, result| seen.push((path.to_path_buf(), result.is_ok())));

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures[0].path, paths[1]);
        assert_eq!(summary.message(Language::En), "2 succeeded, 1 failed");
        assert_eq!(seen.len(), 3);
        assert!(!seen[1].1);

        // calls are strictly in submission order
        assert_eq!(*analyzer.calls.borrow(), paths);
    }

    #[test]
    fn test_records_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_images(dir.path(), &["scan.png"]);

        let analyzer = StubAnalyzer::new();
        let summary = BatchProcessor::new(&analyzer, Language::En)
            .with_today(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap())
            .run(&paths, |_, _| {});

        assert_eq!(summary.records.len(), 2);
        assert_eq!(summary.records[0].price, "450");
        assert_eq!(summary.records[0].day_name, "Saturday");
        assert_eq!(summary.records[1].price, "130");
        assert_eq!(summary.records[1].date, "2024-05-20");
        assert_ne!(summary.records[0].id, summary.records[1].id);
        assert!(summary.records[0]
            .original_image
            .as_deref()
            .unwrap()
            .starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_no_invoices_counts_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_images(dir.path(), &["empty.jpg"]);

        let analyzer = StubAnalyzer::new();
        let summary = BatchProcessor::new(&analyzer, Language::Ar)
            .with_attached_images(false)
            .run(&paths, |_, _| {});

        assert_eq!(summary.failed, 1);
        assert!(summary.records.is_empty());
        assert_eq!(summary.failures[0].error, AnalysisError::NoInvoicesFound.to_string());
    }

    #[test]
    fn test_unsupported_file_never_reaches_analyzer() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_images(dir.path(), &["notes.txt"]);

        let analyzer = StubAnalyzer::new();
        let summary = BatchProcessor::new(&analyzer, Language::En).run(&paths, |_, _| {});

        assert_eq!(summary.failed, 1);
        assert!(analyzer.calls.borrow().is_empty());
    }

    #[test]
    fn test_images_not_attached_when_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_images(dir.path(), &["scan.png"]);

        let analyzer = StubAnalyzer::new();
        let summary = BatchProcessor::new(&analyzer, Language::En)
            .with_attached_images(false)
            .run(&paths, |_, _| {});

        assert!(summary.records.iter().all(|r| r.original_image.is_none()));
    }
}
