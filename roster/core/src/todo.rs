use crate::record::{Collection, Filter, Record, RecordId, ValidationError, require};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Todo {
    pub id: RecordId,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFields {
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl Record for Todo {
    type Fields = TodoFields;
    type Patch = TodoPatch;

    fn id(&self) -> &RecordId {
        &self.id
    }

    /// New todos always start out active.
    fn create(id: RecordId, fields: TodoFields) -> Result<Self, ValidationError> {
        require("title", &fields.title)?;
        Ok(Todo {
            id,
            title: fields.title,
            completed: false,
        })
    }

    fn merge(&self, patch: TodoPatch) -> Result<Self, ValidationError> {
        let mut merged = self.clone();
        if let Some(title) = patch.title {
            require("title", &title)?;
            merged.title = title;
        }
        if let Some(completed) = patch.completed {
            merged.completed = completed;
        }
        Ok(merged)
    }
}

impl Collection<Todo> {
    /// Flips `completed` on the todo with `id`. Unknown ids are ignored.
    pub fn toggle_completed_by_id(&self, id: &RecordId) -> Self {
        self.replace_by_id(id, |todo| Todo {
            completed: !todo.completed,
            ..todo.clone()
        })
    }

    /// Number of todos not yet completed.
    pub fn remaining(&self) -> usize {
        self.iter().filter(|todo| !todo.completed).count()
    }
}

/// Three-way selector over todo completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        }
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" => Ok(StatusFilter::Completed),
            _ => Err(ValidationError::UnknownStatus(s.to_string())),
        }
    }
}

impl Filter<Todo> for StatusFilter {
    fn matches(&self, todo: &Todo) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !todo.completed,
            StatusFilter::Completed => todo.completed,
        }
    }
}
