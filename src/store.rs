#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::{
    error::{StoreError, StoreResult},
    events::{EventSink, Operation, StoreEvent, TracingSink},
    export,
    record::{Grade, StudentName, StudentRecord, ToGrade},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// What a successful [`RecordStore::add`] did.
pub enum AddOutcome {
    /// The student was not on record and has been inserted.
    Inserted,
    /// The student was already on record; their grade was replaced.
    Overwritten {
        /// the grade that was replaced
        previous: Grade,
    },
}

/// An in-memory grade book mapping student names to grades.
///
/// Entries iterate in insertion order; replacing a grade keeps the student's
/// position. Every mutating operation and every export reports exactly one
/// [`StoreEvent`] to the store's sink, success or failure.
#[derive(Debug)]
pub struct RecordStore<S = TracingSink> {
    /// name -> grade, in insertion order
    grades: IndexMap<StudentName, Grade>,
    /// where events go
    sink:   S,
}

impl Default for RecordStore<TracingSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore<TracingSink> {
    /// Creates an empty store that logs through `tracing`.
    pub fn new() -> Self {
        Self::with_sink(TracingSink)
    }
}

impl<S: EventSink> RecordStore<S> {
    /// Creates an empty store reporting events to `sink`.
    pub fn with_sink(sink: S) -> Self {
        Self {
            grades: IndexMap::new(),
            sink,
        }
    }

    /// Records `grade` for `name`.
    ///
    /// If the student is already on record their previous grade is replaced,
    /// which is reported as a warning rather than an error.
    ///
    /// * `name`: student name, stored verbatim; a blank name is
    ///   [`StoreError::EmptyName`]
    /// * `grade`: anything convertible to a grade, eg. `90` or `"90"`
    pub fn add(&mut self, name: &str, grade: impl ToGrade) -> StoreResult<AddOutcome> {
        let grade = match grade.to_grade() {
            Ok(grade) => grade,
            Err(e) => return self.reject(Operation::Add, e),
        };
        let name = match StudentName::new(name) {
            Ok(name) => name,
            Err(e) => return self.reject(Operation::Add, e),
        };

        match self.grades.insert(name.clone(), grade) {
            Some(previous) => {
                self.emit(StoreEvent::Overwritten {
                    name,
                    previous,
                    grade,
                });
                Ok(AddOutcome::Overwritten { previous })
            }
            None => {
                self.emit(StoreEvent::Added { name, grade });
                Ok(AddOutcome::Inserted)
            }
        }
    }

    /// Replaces the grade of a student already on record.
    ///
    /// The grade is validated before the student is looked up, so a bad grade
    /// for an unknown student is reported as [`StoreError::InvalidGrade`].
    /// Any name that is not on record, a blank one included, is
    /// [`StoreError::NotFound`].
    pub fn update(&mut self, name: &str, grade: impl ToGrade) -> StoreResult<Grade> {
        let grade = match grade.to_grade() {
            Ok(grade) => grade,
            Err(e) => return self.reject(Operation::Update, e),
        };

        let Some((_, key, slot)) = self.grades.get_full_mut(name) else {
            return self.reject(Operation::Update, StoreError::NotFound {
                name: name.to_owned(),
            });
        };
        let previous = std::mem::replace(slot, grade);
        let name = key.clone();

        self.emit(StoreEvent::Updated { name, grade });
        Ok(previous)
    }

    /// Removes a student, returning the grade they had.
    ///
    /// Any name that is not on record, a blank one included, is
    /// [`StoreError::NotFound`].
    pub fn delete(&mut self, name: &str) -> StoreResult<Grade> {
        match self.grades.shift_remove_entry(name) {
            Some((name, grade)) => {
                self.emit(StoreEvent::Deleted { name });
                Ok(grade)
            }
            None => self.reject(Operation::Delete, StoreError::NotFound {
                name: name.to_owned(),
            }),
        }
    }

    /// Returns a snapshot of every record, in insertion order.
    ///
    /// An empty vector means the store is empty; it is not an error.
    pub fn list_all(&self) -> Vec<StudentRecord> {
        self.records().collect()
    }

    /// Iterates over the records without copying the whole store.
    pub fn records(&self) -> impl Iterator<Item = StudentRecord> + '_ {
        self.grades
            .iter()
            .map(|(name, grade)| StudentRecord::new(name.clone(), *grade))
    }

    /// Returns the grade on record for `name`, if any.
    pub fn get(&self, name: &str) -> Option<Grade> {
        self.grades.get(name).copied()
    }

    /// Returns true if `name` is on record.
    pub fn contains(&self, name: &str) -> bool {
        self.grades.contains_key(name)
    }

    /// Number of students on record.
    pub fn len(&self) -> usize {
        self.grades.len()
    }

    /// Returns true if no students are on record.
    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    /// Writes the store to `path` as CSV, replacing any existing file.
    ///
    /// The output is a header row `Student_name,Grade` followed by one row
    /// per student in insertion order. Returns the path written.
    pub fn export_csv(&mut self, path: impl AsRef<Path>) -> StoreResult<PathBuf> {
        let path = path.as_ref().to_path_buf();
        let snapshot = self.list_all();

        match export::write_csv_file(&path, &snapshot) {
            Ok(records) => {
                self.emit(StoreEvent::Exported {
                    path: path.clone(),
                    records,
                });
                Ok(path)
            }
            Err(source) => self.reject(Operation::Export, StoreError::ExportFailed {
                path,
                source,
            }),
        }
    }

    /// Returns the event sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the event sink, mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the store, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Reports an event to the sink.
    fn emit(&mut self, event: StoreEvent) {
        self.sink.record(&event);
    }

    /// Reports a failed operation and hands the error back to the caller.
    fn reject<T>(&mut self, op: Operation, error: StoreError) -> StoreResult<T> {
        self.emit(StoreEvent::Rejected {
            op,
            reason: error.to_string(),
        });
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;

    #[test]
    fn overwrite_keeps_position() {
        let mut store = RecordStore::with_sink(MemorySink::new());
        store.add("Alice", 90).unwrap();
        store.add("Bob", 60).unwrap();
        assert_eq!(
            store.add("Alice", 75).unwrap(),
            AddOutcome::Overwritten {
                previous: Grade::new(90).unwrap(),
            }
        );

        let names: Vec<_> = store.records().map(|r| r.name.to_string()).collect();
        assert_eq!(names, ["Alice", "Bob"]);
        assert_eq!(store.get("Alice").map(Grade::value), Some(75));
    }

    #[test]
    fn delete_keeps_relative_order() {
        let mut store = RecordStore::with_sink(MemorySink::new());
        for (name, grade) in [("A", 1), ("B", 2), ("C", 3)] {
            store.add(name, grade).unwrap();
        }
        store.delete("B").unwrap();

        let names: Vec<_> = store.records().map(|r| r.name.to_string()).collect();
        assert_eq!(names, ["A", "C"]);
    }

    #[test]
    fn empty_name_is_rejected_and_logged() {
        let mut store = RecordStore::with_sink(MemorySink::new());
        assert!(matches!(store.add("  ", 50), Err(StoreError::EmptyName)));
        assert!(store.is_empty());
        assert_eq!(store.sink().events().len(), 1);
    }
}
