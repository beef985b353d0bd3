#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Single-record student form. Every field is free text and may be empty.
///
/// Stored under the field names used by existing on-device data; fields
/// missing from a stored snapshot read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Profile {
    #[cfg_attr(feature = "serde", serde(rename = "nama"))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "umur"))]
    pub age: String,
    #[cfg_attr(feature = "serde", serde(rename = "kelas"))]
    pub class: String,
    #[cfg_attr(feature = "serde", serde(rename = "jurusan"))]
    pub major: String,
}

/// Edits to apply to a [`Profile`]. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEdit {
    pub name: Option<String>,
    pub age: Option<String>,
    pub class: Option<String>,
    pub major: Option<String>,
}

impl Profile {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.age.is_empty()
            && self.class.is_empty()
            && self.major.is_empty()
    }

    pub fn with_edit(&self, edit: ProfileEdit) -> Self {
        Profile {
            name: edit.name.unwrap_or_else(|| self.name.clone()),
            age: edit.age.unwrap_or_else(|| self.age.clone()),
            class: edit.class.unwrap_or_else(|| self.class.clone()),
            major: edit.major.unwrap_or_else(|| self.major.clone()),
        }
    }
}
