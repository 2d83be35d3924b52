#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{io, path::Path};

use crate::record::StudentRecord;

/// Default file name for CSV exports
pub const DEFAULT_EXPORT_PATH: &str = "student_management.csv";

/// Header row of every export
pub const CSV_HEADER: [&str; 2] = ["Student_name", "Grade"];

/// Returns a CSV writer builder configured for grade book exports.
fn builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'));
    builder
}

/// Writes the header and one row per record to `writer`, in iteration order.
///
/// The header is written even when there are no records.
pub fn write_csv<'a, W, I>(writer: W, records: I) -> csv::Result<usize>
where
    W: io::Write,
    I: IntoIterator<Item = &'a StudentRecord>,
{
    let mut writer = builder().from_writer(writer);
    write_rows(&mut writer, records)
}

/// Creates (or truncates) the file at `path` and writes the records to it.
///
/// Returns the number of data rows written.
pub fn write_csv_file<'a, I>(path: &Path, records: I) -> csv::Result<usize>
where
    I: IntoIterator<Item = &'a StudentRecord>,
{
    let mut writer = builder().from_path(path)?;
    write_rows(&mut writer, records)
}

/// Writes header and rows, then flushes so write errors are not lost on drop.
fn write_rows<'a, W, I>(writer: &mut csv::Writer<W>, records: I) -> csv::Result<usize>
where
    W: io::Write,
    I: IntoIterator<Item = &'a StudentRecord>,
{
    writer.write_record(CSV_HEADER)?;
    let mut rows = 0;
    for record in records {
        writer.serialize(record)?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Grade, StudentName};

    fn record(name: &str, grade: i64) -> StudentRecord {
        StudentRecord::new(StudentName::new(name).unwrap(), Grade::new(grade).unwrap())
    }

    #[test]
    fn empty_export_still_has_header() {
        let mut out = Vec::new();
        let rows = write_csv(&mut out, &Vec::<StudentRecord>::new()).unwrap();
        assert_eq!(rows, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "Student_name,Grade\n");
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let records = vec![record("Lovelace, Ada", 100), record("Bob", 7)];
        let mut out = Vec::new();
        write_csv(&mut out, &records).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Student_name,Grade\n\"Lovelace, Ada\",100\nBob,7\n"
        );
    }
}
