//! Core records, collection mutators and filters for Roster.
pub mod profile;
pub mod record;
pub mod screen;
pub mod student;
pub mod todo;

pub use profile::{Profile, ProfileEdit};
pub use record::{Collection, Filter, Record, RecordId, ValidationError};
pub use screen::{DialogMode, RosterState, TodoState};
pub use student::{Grade, Major, SearchQuery, Student, StudentFields, StudentPatch};
pub use todo::{StatusFilter, Todo, TodoFields, TodoPatch};
