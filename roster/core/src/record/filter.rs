/// Predicate deriving a display subset of a collection.
///
/// Implementations must be pure: no interior mutation, no side effects.
pub trait Filter<R> {
    fn matches(&self, record: &R) -> bool;
}

impl<R, F> Filter<R> for F
where
    F: Fn(&R) -> bool,
{
    fn matches(&self, record: &R) -> bool {
        self(record)
    }
}
