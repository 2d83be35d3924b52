#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    borrow::Borrow,
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error::{StoreError, StoreResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// A grade that is known to lie within `Grade::MIN..=Grade::MAX`.
pub struct Grade(u8);

impl Grade {
    /// Lowest grade a student can receive.
    pub const MIN: Grade = Grade(0);
    /// Highest grade a student can receive.
    pub const MAX: Grade = Grade(100);

    /// Creates a new grade, failing with [`StoreError::InvalidGrade`] if
    /// `value` is outside `0..=100`.
    pub fn new(value: i64) -> StoreResult<Self> {
        if (i64::from(Self::MIN.0)..=i64::from(Self::MAX.0)).contains(&value) {
            Ok(Grade(value as u8))
        } else {
            Err(StoreError::InvalidGrade {
                input: value.to_string(),
            })
        }
    }

    /// Returns the numeric grade value.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Grade {
    type Err = StoreError;

    /// Parses a grade typed by a user, eg. ` 87 `.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = trimmed.parse::<i64>().map_err(|_| StoreError::InvalidGrade {
            input: trimmed.to_owned(),
        })?;
        Grade::new(value)
    }
}

/// Anything a store operation accepts as a grade.
///
/// Integers are range checked; text is parsed as an integer first. Both
/// failures surface as [`StoreError::InvalidGrade`].
pub trait ToGrade {
    /// Validates `self` into a [`Grade`].
    fn to_grade(&self) -> StoreResult<Grade>;
}

impl ToGrade for Grade {
    fn to_grade(&self) -> StoreResult<Grade> {
        Ok(*self)
    }
}

/// Implements [`ToGrade`] for integer types by widening to `i64`.
macro_rules! to_grade_for_ints {
    ($($ty:ty),*) => {
        $(
            impl ToGrade for $ty {
                fn to_grade(&self) -> StoreResult<Grade> {
                    i64::try_from(*self)
                        .map_err(|_| StoreError::InvalidGrade { input: self.to_string() })
                        .and_then(Grade::new)
                }
            }
        )*
    };
}

to_grade_for_ints!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl ToGrade for str {
    fn to_grade(&self) -> StoreResult<Grade> {
        self.parse()
    }
}

impl ToGrade for String {
    fn to_grade(&self) -> StoreResult<Grade> {
        self.as_str().parse()
    }
}

impl<T: ToGrade + ?Sized> ToGrade for &T {
    fn to_grade(&self) -> StoreResult<Grade> {
        (**self).to_grade()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// A student's name: never blank, stored exactly as given and compared
/// case-sensitively.
pub struct StudentName(String);

impl StudentName {
    /// Creates a name, rejecting one that is empty or only whitespace.
    ///
    /// The name is kept verbatim; trimming user input is the caller's job.
    pub fn new(name: impl AsRef<str>) -> StoreResult<Self> {
        let name = name.as_ref();
        if name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        Ok(StudentName(name.to_owned()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StudentName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StudentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for StudentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Tabled, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// A single row of the grade book, as listed and exported.
pub struct StudentRecord {
    /// * `name`: the student's name
    #[tabled(rename = "Student")]
    #[serde(rename = "Student_name")]
    pub name:  StudentName,
    /// * `grade`: the grade on record for the student
    #[tabled(rename = "Grade")]
    #[serde(rename = "Grade")]
    pub grade: Grade,
}

impl StudentRecord {
    /// Creates a new record from already validated parts.
    pub fn new(name: StudentName, grade: Grade) -> Self {
        Self { name, grade }
    }
}

impl Display for StudentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.grade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_bounds_are_inclusive() {
        assert_eq!(Grade::new(0).unwrap(), Grade::MIN);
        assert_eq!(Grade::new(100).unwrap(), Grade::MAX);
        assert!(Grade::new(-1).is_err());
        assert!(Grade::new(101).is_err());
    }

    #[test]
    fn grade_text_is_trimmed_then_parsed() {
        assert_eq!(" 42 ".parse::<Grade>().unwrap().value(), 42);
        match "4.5".parse::<Grade>() {
            Err(StoreError::InvalidGrade { input }) => assert_eq!(input, "4.5"),
            other => panic!("expected InvalidGrade, got {other:?}"),
        }
        assert!("".parse::<Grade>().is_err());
        assert!("99999999999999999999999".parse::<Grade>().is_err());
    }

    #[test]
    fn wide_integers_do_not_wrap() {
        assert!(u64::MAX.to_grade().is_err());
        assert!(256u16.to_grade().is_err());
        assert_eq!(7u64.to_grade().unwrap().value(), 7);
    }

    #[test]
    fn names_are_kept_verbatim_and_must_not_be_blank() {
        assert_eq!(StudentName::new(" Alice ").unwrap().as_str(), " Alice ");
        assert!(matches!(StudentName::new(""), Err(StoreError::EmptyName)));
        assert!(matches!(StudentName::new("   "), Err(StoreError::EmptyName)));
        assert_ne!(StudentName::new("alice").unwrap(), StudentName::new("Alice").unwrap());
    }
}
