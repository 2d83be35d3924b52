#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
};

use tracing::{Level, field};

use crate::record::{Grade, StudentName};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// The store operation an event is about.
pub enum Operation {
    /// [`crate::store::RecordStore::add`]
    Add,
    /// [`crate::store::RecordStore::update`]
    Update,
    /// [`crate::store::RecordStore::delete`]
    Delete,
    /// [`crate::store::RecordStore::export_csv`]
    Export,
}

impl Operation {
    /// Returns the lowercase verb for the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Export => "export",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Something log-worthy that happened inside a record store.
///
/// Every call to `add`, `update`, `delete` or `export_csv` produces exactly one
/// of these, whether it succeeded or not.
pub enum StoreEvent {
    /// A new student was inserted.
    Added {
        /// student inserted
        name:  StudentName,
        /// grade recorded
        grade: Grade,
    },
    /// `add` hit an existing student and replaced their grade.
    Overwritten {
        /// student whose grade was replaced
        name:     StudentName,
        /// grade that was lost
        previous: Grade,
        /// grade now on record
        grade:    Grade,
    },
    /// An existing student's grade was changed by `update`.
    Updated {
        /// student updated
        name:  StudentName,
        /// new grade
        grade: Grade,
    },
    /// A student was removed.
    Deleted {
        /// student removed
        name: StudentName,
    },
    /// The store was written to a CSV file.
    Exported {
        /// file written
        path:    PathBuf,
        /// number of data rows written
        records: usize,
    },
    /// An operation failed and left the store unchanged.
    Rejected {
        /// the failed operation
        op:     Operation,
        /// rendered error
        reason: String,
    },
}

impl StoreEvent {
    /// Severity the event should be logged at.
    pub fn level(&self) -> Level {
        match self {
            StoreEvent::Added { .. }
            | StoreEvent::Updated { .. }
            | StoreEvent::Deleted { .. }
            | StoreEvent::Exported { .. } => Level::INFO,
            StoreEvent::Overwritten { .. } => Level::WARN,
            StoreEvent::Rejected { .. } => Level::ERROR,
        }
    }

    /// Returns the student the event is about, if any.
    pub fn student(&self) -> Option<&StudentName> {
        match self {
            StoreEvent::Added { name, .. }
            | StoreEvent::Overwritten { name, .. }
            | StoreEvent::Updated { name, .. }
            | StoreEvent::Deleted { name } => Some(name),
            StoreEvent::Exported { .. } | StoreEvent::Rejected { .. } => None,
        }
    }

    /// Returns the grade now on record, for events that set one.
    pub fn grade(&self) -> Option<Grade> {
        match self {
            StoreEvent::Added { grade, .. }
            | StoreEvent::Overwritten { grade, .. }
            | StoreEvent::Updated { grade, .. } => Some(*grade),
            _ => None,
        }
    }

    /// Returns the file written, for export events.
    pub fn path(&self) -> Option<&Path> {
        match self {
            StoreEvent::Exported { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Returns the operation this event belongs to.
    pub fn operation(&self) -> Operation {
        match self {
            StoreEvent::Added { .. } | StoreEvent::Overwritten { .. } => Operation::Add,
            StoreEvent::Updated { .. } => Operation::Update,
            StoreEvent::Deleted { .. } => Operation::Delete,
            StoreEvent::Exported { .. } => Operation::Export,
            StoreEvent::Rejected { op, .. } => *op,
        }
    }
}

impl Display for StoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreEvent::Added { name, grade } => {
                write!(f, "Added student {name} with grade {grade}.")
            }
            StoreEvent::Overwritten {
                name,
                previous,
                grade,
            } => write!(
                f,
                "Student {name} already exists. Overwriting grade {previous} with {grade}."
            ),
            StoreEvent::Updated { name, grade } => {
                write!(f, "Updated {name} to new grade {grade}.")
            }
            StoreEvent::Deleted { name } => write!(f, "{name} has been successfully deleted."),
            StoreEvent::Exported { path, records } => write!(
                f,
                "Exported {records} student record(s) to {}",
                path.display()
            ),
            StoreEvent::Rejected { op, reason } => write!(f, "Failed to {op} student: {reason}"),
        }
    }
}

/// Receives the events a record store produces.
///
/// The store owns its sink, so swapping the sink is how callers redirect or
/// capture the store's log.
pub trait EventSink {
    /// Handles a single event.
    fn record(&mut self, event: &StoreEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn record(&mut self, event: &StoreEvent) {
        (**self).record(event);
    }
}

#[derive(Copy, Clone, Debug, Default)]
/// Forwards events to `tracing` at the level given by [`StoreEvent::level`].
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, event: &StoreEvent) {
        let op = event.operation().as_str();
        let student = event.student().map(field::display);
        let grade = event.grade().map(Grade::value);
        let path = event.path().map(|p| field::display(p.display()));

        let level = event.level();
        if level == Level::ERROR {
            tracing::error!(op, student, grade, path, "{event}");
        } else if level == Level::WARN {
            tracing::warn!(op, student, grade, path, "{event}");
        } else if level == Level::INFO {
            tracing::info!(op, student, grade, path, "{event}");
        } else if level == Level::DEBUG {
            tracing::debug!(op, student, grade, path, "{event}");
        } else {
            tracing::trace!(op, student, grade, path, "{event}");
        }
    }
}

#[derive(Clone, Debug, Default)]
/// Keeps every event in memory, in the order received.
pub struct MemorySink {
    /// events received so far
    events: Vec<StoreEvent>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the events received so far.
    pub fn events(&self) -> &[StoreEvent] {
        &self.events
    }

    /// Removes and returns the events received so far.
    pub fn take(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for MemorySink {
    fn record(&mut self, event: &StoreEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_follow_outcome() {
        let alice = StudentName::new("Alice").unwrap();
        let grade = Grade::new(90).unwrap();

        let added = StoreEvent::Added {
            name: alice.clone(),
            grade,
        };
        let overwritten = StoreEvent::Overwritten {
            name: alice,
            previous: Grade::new(80).unwrap(),
            grade,
        };
        let rejected = StoreEvent::Rejected {
            op:     Operation::Delete,
            reason: "Student `Bob` not found.".into(),
        };

        assert_eq!(added.level(), Level::INFO);
        assert_eq!(overwritten.level(), Level::WARN);
        assert_eq!(rejected.level(), Level::ERROR);
        assert_eq!(overwritten.operation(), Operation::Add);
        assert_eq!(rejected.operation(), Operation::Delete);
        assert!(rejected.to_string().contains("delete"));

        assert_eq!(overwritten.student().map(StudentName::as_str), Some("Alice"));
        assert_eq!(overwritten.grade(), Some(grade));
        assert_eq!(rejected.student(), None);
        assert_eq!(rejected.grade(), None);
        let exported = StoreEvent::Exported {
            path:    PathBuf::from("out.csv"),
            records: 2,
        };
        assert_eq!(exported.path(), Some(Path::new("out.csv")));
        assert_eq!(added.path(), None);
    }
}
