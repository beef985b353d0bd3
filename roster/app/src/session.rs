//! Screen sessions.
//!
//! A session owns one screen state for its lifetime. The store is read once
//! when the session opens; after that the in-memory state is authoritative and
//! every transition that changes the persisted part is saved in full.

use crate::records::RecordStore;
use roster_core::{Collection, Profile, RosterState, Student, Todo, TodoState};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Screen state with a part that is persisted under a storage key.
pub trait Persisted {
    type Stored: Serialize + DeserializeOwned + Default + PartialEq;

    fn restore(stored: Self::Stored) -> Self;

    fn stored(&self) -> &Self::Stored;
}

impl Persisted for RosterState {
    type Stored = Collection<Student>;

    fn restore(stored: Self::Stored) -> Self {
        RosterState::new(stored)
    }

    fn stored(&self) -> &Self::Stored {
        &self.students
    }
}

impl Persisted for TodoState {
    type Stored = Collection<Todo>;

    fn restore(stored: Self::Stored) -> Self {
        TodoState::new(stored)
    }

    fn stored(&self) -> &Self::Stored {
        &self.todos
    }
}

impl Persisted for Profile {
    type Stored = Profile;

    fn restore(stored: Self::Stored) -> Self {
        stored
    }

    fn stored(&self) -> &Self::Stored {
        self
    }
}

pub type RosterSession = Session<RosterState>;
pub type TodoSession = Session<TodoState>;
pub type ProfileSession = Session<Profile>;

pub struct Session<S> {
    records: RecordStore,
    key: String,
    state: S,
}

impl<S: Persisted> Session<S> {
    /// Loads the stored value for `key` and builds the initial state from it.
    #[tracing::instrument(skip(records))]
    pub async fn open(records: RecordStore, key: &str) -> Self {
        let stored = records.load::<S::Stored>(key).await;
        Session {
            records,
            key: key.to_string(),
            state: S::restore(stored),
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Applies an infallible transition.
    pub fn update(&mut self, transition: impl FnOnce(&S) -> S) {
        let next = transition(&self.state);
        self.commit(next);
    }

    /// Applies a transition that may be rejected. On `Err` the state is kept
    /// and nothing is written.
    pub fn try_update<E>(&mut self, transition: impl FnOnce(&S) -> Result<S, E>) -> Result<(), E> {
        let next = transition(&self.state)?;
        self.commit(next);
        Ok(())
    }

    /// Applies a transition and stores the result even when the persisted
    /// part did not change, as a form's save button does.
    pub fn submit(&mut self, transition: impl FnOnce(&S) -> S) {
        self.state = transition(&self.state);
        self.records.save(&self.key, self.state.stored());
    }

    /// Waits for this session's queued writes (and any issued before them).
    pub async fn flush(&self) {
        self.records.flush().await;
    }

    fn commit(&mut self, next: S) {
        let changed = next.stored() != self.state.stored();
        self.state = next;
        if changed {
            self.records.save(&self.key, self.state.stored());
        }
    }
}

impl Session<Profile> {
    /// Deletes the stored profile and empties the form.
    pub fn clear(&mut self) {
        self.records.clear(&self.key);
        self.state = Profile::default();
    }
}
