//! Conversion report types.
//!
//! Every conversion returns a report next to its output: what was read, what
//! was written, and anything a user should know about the result even though
//! the conversion succeeded.

use serde::Serialize;
use std::fmt;

/// A report generated during a manifest conversion.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversionReport {
    /// Task name (`bbox`, `segmentation`, `video-tracking`).
    pub task: String,
    /// Counts of what was read and written.
    pub counts: ConversionCounts,
    /// Issues noticed during conversion.
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    /// Create a new empty report for a task.
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            ..Default::default()
        }
    }

    /// Add an issue to the report.
    pub fn add(&mut self, issue: ConversionIssue) {
        self.issues.push(issue);
    }

    /// Count of warning-level issues.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Warning)
            .count()
    }

    /// Count of info-level issues.
    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Info)
            .count()
    }

    /// Issues carrying `code`.
    pub fn issues_with(&self, code: ConversionIssueCode) -> impl Iterator<Item = &ConversionIssue> {
        self.issues.iter().filter(move |i| i.code == code)
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Converted {} manifest:", self.task)?;
        writeln!(
            f,
            "  {} records, {} images, {} categories, {} annotations",
            self.counts.records,
            self.counts.images,
            self.counts.categories,
            self.counts.annotations
        )?;
        if self.counts.sequences > 0 {
            writeln!(
                f,
                "  {} sequences, {} frames",
                self.counts.sequences, self.counts.frames
            )?;
        }

        let warnings = self.warning_count();
        if warnings > 0 {
            writeln!(f)?;
            writeln!(f, "Warnings ({}):", warnings)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Warning)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        let infos = self.info_count();
        if infos > 0 {
            writeln!(f)?;
            writeln!(f, "Notes ({}):", infos)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Info)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        Ok(())
    }
}

/// Counts of manifest and output elements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionCounts {
    /// Manifest lines read.
    pub records: usize,
    pub images: usize,
    pub categories: usize,
    pub annotations: usize,
    /// Video sequences (zero for image jobs).
    pub sequences: usize,
    /// Video frame documents (zero for image jobs).
    pub frames: usize,
}

/// A single issue discovered during conversion.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionIssue {
    pub severity: ConversionSeverity,
    pub code: ConversionIssueCode,
    pub message: String,
}

impl ConversionIssue {
    /// Create a warning-level issue (the output may not mean what the
    /// labels meant).
    pub fn warning(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Create an info-level issue.
    pub fn info(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Info,
            code,
            message: message.into(),
        }
    }
}

/// Severity level for conversion issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSeverity {
    Warning,
    Info,
}

/// Stable issue codes for programmatic consumption.
///
/// These codes are part of the JSON report and should remain stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionIssueCode {
    /// Label-image pixels that are neither background nor a legend color.
    UnmatchedPixels,
    /// A simplified polygon ring collapsed to zero area.
    DegeneratePolygon,
    /// A class-map entry replaced a different name for the same class id.
    ClassMapOverwrite,
    /// A video frame without boxes.
    EmptyFrame,
    /// A sequence's category list repeats ids.
    DuplicateTrackCategories,
}
