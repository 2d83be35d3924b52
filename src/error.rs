#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

/// An enum to represent the ways a record store operation can fail.
///
/// None of these are fatal: each one is local to the operation that raised it
/// and leaves the store exactly as it was.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The grade did not parse as an integer, or fell outside `0..=100`.
    #[error("Grade must be between 0 to 100, got `{input}`.")]
    InvalidGrade {
        /// the grade as it was supplied
        input: String,
    },
    /// The student name was empty (or only whitespace).
    #[error("Student name cannot be empty.")]
    EmptyName,
    /// The operation targeted a student that is not in the store.
    #[error("Student `{name}` not found.")]
    NotFound {
        /// name that was looked up
        name: String,
    },
    /// Writing the CSV snapshot failed.
    #[error("CSV export to {} failed: {source}", .path.display())]
    ExportFailed {
        /// destination of the export
        path:   PathBuf,
        /// underlying writer error, I/O included
        #[source]
        source: csv::Error,
    },
}

impl StoreError {
    /// Returns true if the error was caused by bad user input rather than by
    /// the state of the store or the filesystem.
    pub fn is_rejected_input(&self) -> bool {
        matches!(self, StoreError::InvalidGrade { .. } | StoreError::EmptyName)
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_bad_input_counts_as_rejected_input() {
        let bad_grade = StoreError::InvalidGrade {
            input: "ninety".into(),
        };
        let missing = StoreError::NotFound {
            name: "Bob".into(),
        };
        let export = StoreError::ExportFailed {
            path:   PathBuf::from("out.csv"),
            source: std::io::Error::other("disk full").into(),
        };

        assert!(bad_grade.is_rejected_input());
        assert!(StoreError::EmptyName.is_rejected_input());
        assert!(!missing.is_rejected_input());
        assert!(!export.is_rejected_input());
    }
}
