//! Screen state containers.
//!
//! Each state bundles a collection with the UI-mode flags that decide what a
//! confirm action does. Transitions borrow the current state and return the
//! next one; a failed transition leaves the caller's state as it was.

use crate::record::{Collection, RecordId, ValidationError};
use crate::student::{Major, SearchQuery, Student, StudentFields, StudentPatch};
use crate::todo::{StatusFilter, Todo, TodoFields, TodoPatch};
use std::collections::BTreeMap;

/// Whether the add/edit dialog is open, and for which record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DialogMode {
    #[default]
    Closed,
    Adding,
    Editing(RecordId),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterState {
    pub students: Collection<Student>,
    pub query: SearchQuery,
    pub dialog: DialogMode,
    pub pending_delete: Option<RecordId>,
}

impl RosterState {
    pub fn new(students: Collection<Student>) -> Self {
        RosterState {
            students,
            ..Default::default()
        }
    }

    pub fn open_add(&self) -> Self {
        RosterState {
            dialog: DialogMode::Adding,
            ..self.clone()
        }
    }

    /// Opens the edit dialog for `id`. Unknown ids leave the state as is.
    pub fn open_edit(&self, id: &RecordId) -> Self {
        if !self.students.contains(id) {
            return self.clone();
        }
        RosterState {
            dialog: DialogMode::Editing(id.clone()),
            ..self.clone()
        }
    }

    pub fn close_dialog(&self) -> Self {
        RosterState {
            dialog: DialogMode::Closed,
            ..self.clone()
        }
    }

    /// Confirms the dialog: adds a student or rewrites the one being edited,
    /// then closes the dialog. With the dialog closed nothing happens.
    pub fn submit(&self, fields: StudentFields) -> Result<Self, ValidationError> {
        let students = match &self.dialog {
            DialogMode::Closed => return Ok(self.clone()),
            DialogMode::Adding => self.students.add(fields)?.0,
            DialogMode::Editing(id) => self.students.update_by_id(id, StudentPatch::from(fields))?,
        };
        Ok(RosterState {
            students,
            dialog: DialogMode::Closed,
            ..self.clone()
        })
    }

    /// Applies `patch` to one student without going through the dialog.
    pub fn edit(&self, id: &RecordId, patch: StudentPatch) -> Result<Self, ValidationError> {
        Ok(RosterState {
            students: self.students.update_by_id(id, patch)?,
            ..self.clone()
        })
    }

    pub fn request_delete(&self, id: &RecordId) -> Self {
        RosterState {
            pending_delete: Some(id.clone()),
            ..self.clone()
        }
    }

    pub fn cancel_delete(&self) -> Self {
        RosterState {
            pending_delete: None,
            ..self.clone()
        }
    }

    /// Deletes the student awaiting confirmation, if any.
    pub fn confirm_delete(&self) -> Self {
        let students = match &self.pending_delete {
            Some(id) => self.students.delete_by_id(id),
            None => self.students.clone(),
        };
        RosterState {
            students,
            pending_delete: None,
            ..self.clone()
        }
    }

    pub fn search(&self, query: impl Into<String>) -> Self {
        RosterState {
            query: SearchQuery::new(query),
            ..self.clone()
        }
    }

    pub fn visible(&self) -> Vec<&Student> {
        self.students.filtered(&self.query)
    }

    pub fn major_counts(&self) -> BTreeMap<Major, usize> {
        self.students.major_counts()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoState {
    pub todos: Collection<Todo>,
    pub filter: StatusFilter,
    pub editing: Option<RecordId>,
}

impl TodoState {
    pub fn new(todos: Collection<Todo>) -> Self {
        TodoState {
            todos,
            ..Default::default()
        }
    }

    pub fn add(&self, title: impl Into<String>) -> Result<Self, ValidationError> {
        let (todos, _) = self.todos.add(TodoFields {
            title: title.into(),
        })?;
        Ok(TodoState {
            todos,
            ..self.clone()
        })
    }

    pub fn toggle(&self, id: &RecordId) -> Self {
        TodoState {
            todos: self.todos.toggle_completed_by_id(id),
            ..self.clone()
        }
    }

    /// Deletes a todo; an open editor for that todo is closed.
    pub fn delete(&self, id: &RecordId) -> Self {
        let editing = self.editing.clone().filter(|editing| editing != id);
        TodoState {
            todos: self.todos.delete_by_id(id),
            editing,
            ..self.clone()
        }
    }

    pub fn start_edit(&self, id: &RecordId) -> Self {
        if !self.todos.contains(id) {
            return self.clone();
        }
        TodoState {
            editing: Some(id.clone()),
            ..self.clone()
        }
    }

    pub fn cancel_edit(&self) -> Self {
        TodoState {
            editing: None,
            ..self.clone()
        }
    }

    /// Renames the todo being edited and closes the editor.
    pub fn save_edit(&self, title: impl Into<String>) -> Result<Self, ValidationError> {
        let Some(id) = &self.editing else {
            return Ok(self.clone());
        };
        let todos = self.todos.update_by_id(
            id,
            TodoPatch {
                title: Some(title.into()),
                completed: None,
            },
        )?;
        Ok(TodoState {
            todos,
            editing: None,
            ..self.clone()
        })
    }

    pub fn set_filter(&self, filter: StatusFilter) -> Self {
        TodoState {
            filter,
            ..self.clone()
        }
    }

    pub fn visible(&self) -> Vec<&Todo> {
        self.todos.filtered(&self.filter)
    }

    pub fn remaining(&self) -> usize {
        self.todos.remaining()
    }
}
