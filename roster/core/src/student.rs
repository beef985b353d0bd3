use crate::record::{Collection, Filter, Record, RecordId, ValidationError, require};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// School year a student is enrolled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Grade {
    X,
    XI,
}

impl Grade {
    pub const ALL: [Grade; 2] = [Grade::X, Grade::XI];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::X => "X",
            Grade::XI => "XI",
        }
    }
}

impl Display for Grade {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        require("grade", s)?;
        Grade::ALL
            .into_iter()
            .find(|grade| grade.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownGrade(s.to_string()))
    }
}

/// Vocational major offered by the school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Major {
    #[cfg_attr(feature = "serde", serde(rename = "RPL"))]
    Rpl,
    Animasi,
    Broadcasting,
    #[cfg_attr(feature = "serde", serde(rename = "TKJ"))]
    Tkj,
    #[cfg_attr(feature = "serde", serde(rename = "TE"))]
    Te,
}

impl Major {
    pub const ALL: [Major; 5] = [
        Major::Rpl,
        Major::Animasi,
        Major::Broadcasting,
        Major::Tkj,
        Major::Te,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Major::Rpl => "RPL",
            Major::Animasi => "Animasi",
            Major::Broadcasting => "Broadcasting",
            Major::Tkj => "TKJ",
            Major::Te => "TE",
        }
    }
}

impl Display for Major {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Major {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        require("major", s)?;
        Major::ALL
            .into_iter()
            .find(|major| major.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownMajor(s.to_string()))
    }
}

/// A student on the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Student {
    pub id: RecordId,
    pub name: String,
    pub grade: Grade,
    pub major: Major,
}

/// Raw form input for a new student.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFields {
    pub name: String,
    pub grade: String,
    pub major: String,
}

/// Partial form input for editing a student. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub major: Option<String>,
}

impl From<StudentFields> for StudentPatch {
    fn from(fields: StudentFields) -> Self {
        StudentPatch {
            name: Some(fields.name),
            grade: Some(fields.grade),
            major: Some(fields.major),
        }
    }
}

impl Record for Student {
    type Fields = StudentFields;
    type Patch = StudentPatch;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create(id: RecordId, fields: StudentFields) -> Result<Self, ValidationError> {
        require("name", &fields.name)?;
        let grade = fields.grade.parse()?;
        let major = fields.major.parse()?;
        Ok(Student {
            id,
            name: fields.name,
            grade,
            major,
        })
    }

    fn merge(&self, patch: StudentPatch) -> Result<Self, ValidationError> {
        let mut merged = self.clone();
        if let Some(name) = patch.name {
            require("name", &name)?;
            merged.name = name;
        }
        if let Some(grade) = patch.grade {
            merged.grade = grade.parse()?;
        }
        if let Some(major) = patch.major {
            merged.major = major.parse()?;
        }
        Ok(merged)
    }
}

/// Case-insensitive search over student name and major.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    needle: String,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        let raw = query.into();
        let needle = raw.to_lowercase();
        SearchQuery { raw, needle }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }
}

impl Filter<Student> for SearchQuery {
    fn matches(&self, student: &Student) -> bool {
        student.name.to_lowercase().contains(&self.needle)
            || student.major.as_str().to_lowercase().contains(&self.needle)
    }
}

impl Collection<Student> {
    /// Number of students per major. Majors without students are absent.
    pub fn major_counts(&self) -> BTreeMap<Major, usize> {
        self.iter().fold(BTreeMap::new(), |mut counts, student| {
            *counts.entry(student.major).or_insert(0) += 1;
            counts
        })
    }
}
