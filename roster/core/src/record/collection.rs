use super::{Filter, Record, RecordId, ValidationError};
use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered set of records owned by one screen.
///
/// Insertion order is kept; every mutator borrows the current collection and
/// returns a new one, leaving the original untouched.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Collection<R> {
    records: Vec<R>,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Collection {
            records: Vec::new(),
        }
    }
}

impl<R> From<Vec<R>> for Collection<R> {
    fn from(records: Vec<R>) -> Self {
        Collection { records }
    }
}

impl<R: Record> Collection<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn get(&self, id: &RecordId) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.get(id).is_some()
    }

    /// Appends a new record created now. Returns the new collection and the id
    /// assigned to the record.
    pub fn add(&self, fields: R::Fields) -> Result<(Self, RecordId), ValidationError> {
        self.add_at(fields, Utc::now())
    }

    /// Appends a new record whose id is derived from `at`.
    ///
    /// When the timestamp is already taken, the next free millisecond is used.
    pub fn add_at(
        &self,
        fields: R::Fields,
        at: DateTime<Utc>,
    ) -> Result<(Self, RecordId), ValidationError> {
        let id = self.next_id(at);
        let record = R::create(id.clone(), fields)?;

        let mut records = self.records.clone();
        records.push(record);
        Ok((Collection { records }, id))
    }

    /// Merges `patch` into the record with `id`.
    ///
    /// An unknown id leaves the collection unchanged.
    pub fn update_by_id(&self, id: &RecordId, patch: R::Patch) -> Result<Self, ValidationError> {
        let Some(position) = self.position(id) else {
            return Ok(self.clone());
        };

        let updated = self.records[position].merge(patch)?;
        let mut records = self.records.clone();
        records[position] = updated;
        Ok(Collection { records })
    }

    /// Removes the record with `id`, if present.
    pub fn delete_by_id(&self, id: &RecordId) -> Self {
        let records = self
            .records
            .iter()
            .filter(|record| record.id() != id)
            .cloned()
            .collect();
        Collection { records }
    }

    /// Replaces the record with `id` by `f(record)`. The id of the result must
    /// stay the same.
    pub(crate) fn replace_by_id(&self, id: &RecordId, f: impl FnOnce(&R) -> R) -> Self {
        let mut records = self.records.clone();
        if let Some(position) = self.position(id) {
            records[position] = f(&self.records[position]);
        }
        Collection { records }
    }

    /// Records matching `filter`, in collection order.
    pub fn filtered<F: Filter<R> + ?Sized>(&self, filter: &F) -> Vec<&R> {
        self.records
            .iter()
            .filter(|record| filter.matches(record))
            .collect()
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    fn next_id(&self, at: DateTime<Utc>) -> RecordId {
        let mut millis = at.timestamp_millis();
        loop {
            let id = RecordId::from_millis(millis);
            if !self.contains(&id) {
                return id;
            }
            millis += 1;
        }
    }
}

impl<'a, R> IntoIterator for &'a Collection<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::{StatusFilter, Todo, TodoFields, TodoPatch};

    fn fields(title: &str) -> TodoFields {
        TodoFields {
            title: title.to_string(),
        }
    }

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    #[test]
    fn add_appends_record_with_fresh_id() {
        let todos = Collection::<Todo>::new();

        let (todos, first) = todos.add_at(fields("Buy milk"), at(1_000)).unwrap();
        let (todos, second) = todos.add_at(fields("Walk dog"), at(2_000)).unwrap();

        assert_eq!(todos.len(), 2);
        assert_eq!(first, RecordId::new("1000"));
        assert_eq!(second, RecordId::new("2000"));
        assert_eq!(todos.records()[0].title, "Buy milk");
        assert_eq!(todos.records()[1].title, "Walk dog");
    }

    #[test]
    fn add_within_same_millisecond_still_yields_unique_ids() {
        let todos = Collection::<Todo>::new();

        let (todos, first) = todos.add_at(fields("a"), at(5_000)).unwrap();
        let (todos, second) = todos.add_at(fields("b"), at(5_000)).unwrap();
        let (todos, third) = todos.add_at(fields("c"), at(5_000)).unwrap();

        assert_eq!(todos.len(), 3);
        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_ne!(first, third);
    }

    #[test]
    fn add_rejects_blank_fields_and_leaves_collection_unchanged() {
        let (todos, _) = Collection::<Todo>::new().add(fields("Existing")).unwrap();

        let result = todos.add(fields("   "));

        assert_eq!(result, Err(ValidationError::MissingField("title")));
        assert_eq!(todos.len(), 1);
    }

    #[test]
    fn add_allows_duplicate_titles() {
        let todos = Collection::<Todo>::new();

        let (todos, _) = todos.add_at(fields("Same"), at(1)).unwrap();
        let (todos, _) = todos.add_at(fields("Same"), at(2)).unwrap();

        assert_eq!(todos.len(), 2);
    }

    #[test]
    fn update_by_id_merges_only_provided_fields() {
        let (todos, id) = Collection::<Todo>::new().add(fields("Draft")).unwrap();
        let todos = todos.toggle_completed_by_id(&id);

        let todos = todos
            .update_by_id(
                &id,
                TodoPatch {
                    title: Some("Final".to_string()),
                    completed: None,
                },
            )
            .unwrap();

        let todo = todos.get(&id).unwrap();
        assert_eq!(todo.title, "Final");
        assert!(todo.completed);
        assert_eq!(todo.id, id);
    }

    #[test]
    fn update_by_unknown_id_is_a_silent_no_op() {
        let (todos, _) = Collection::<Todo>::new().add(fields("Keep")).unwrap();

        let updated = todos
            .update_by_id(
                &RecordId::new("missing"),
                TodoPatch {
                    title: Some("Changed".to_string()),
                    completed: None,
                },
            )
            .unwrap();

        assert_eq!(updated, todos);
    }

    #[test]
    fn update_with_blank_title_is_rejected() {
        let (todos, id) = Collection::<Todo>::new().add(fields("Keep")).unwrap();

        let result = todos.update_by_id(
            &id,
            TodoPatch {
                title: Some(" ".to_string()),
                completed: None,
            },
        );

        assert_eq!(result, Err(ValidationError::MissingField("title")));
    }

    #[test]
    fn delete_by_id_removes_exactly_one_record() {
        let todos = Collection::<Todo>::new();
        let (todos, first) = todos.add_at(fields("a"), at(1)).unwrap();
        let (todos, _) = todos.add_at(fields("b"), at(2)).unwrap();

        let remaining = todos.delete_by_id(&first);

        assert_eq!(remaining.len(), 1);
        assert!(!remaining.contains(&first));
        assert_eq!(todos.len(), 2, "source collection must not change");
    }

    #[test]
    fn delete_by_unknown_id_returns_equal_collection() {
        let (todos, _) = Collection::<Todo>::new().add(fields("a")).unwrap();

        assert_eq!(todos.delete_by_id(&RecordId::new("nope")), todos);
    }

    #[test]
    fn operations_accept_empty_collection() {
        let empty = Collection::<Todo>::new();
        let id = RecordId::new("1");

        assert!(empty.delete_by_id(&id).is_empty());
        assert!(empty.toggle_completed_by_id(&id).is_empty());
        assert!(
            empty
                .update_by_id(&id, TodoPatch::default())
                .unwrap()
                .is_empty()
        );
        assert!(empty.filtered(&StatusFilter::All).is_empty());
    }
}
