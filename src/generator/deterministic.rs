//! Namespaced identifier generator.

use crate::Id;
use uuid::Uuid;

/// Represents a generator of name-based identifiers using UUIDv5.
///
/// The namespace UUID is itself derived with UUIDv5 from the namespace string against the nil
/// UUID, so two generators built from the same string agree on every name.
///
/// # Examples
///
/// ```rust
/// use sortable_id::generator::IdDeterministic;
///
/// let a = IdDeterministic::new("example.com");
/// let b = IdDeterministic::new("example.com");
/// assert_eq!(a.generate("alice"), b.generate("alice"));
/// assert_ne!(a.generate("alice"), a.generate("bob"));
/// ```
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct IdDeterministic {
    namespace: Uuid,
}

impl IdDeterministic {
    /// Creates a generator for `namespace`.
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: Uuid::new_v5(&Uuid::nil(), namespace.as_bytes()),
        }
    }

    /// Returns the namespace UUID derived from the namespace string.
    pub fn namespace(&self) -> Id {
        Id::from(self.namespace)
    }

    /// Generates the identifier of `name` within this namespace.
    pub fn generate(&self, name: &str) -> Id {
        Id::from(Uuid::new_v5(&self.namespace, name.as_bytes()))
    }
}

impl Default for IdDeterministic {
    /// Creates a generator for the empty namespace string.
    fn default() -> Self {
        Self::new("")
    }
}

/// Supports operations as an infinite iterator that yields the identifier of the empty name for
/// each call of `next()`.
impl Iterator for IdDeterministic {
    type Item = Id;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate(""))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl std::iter::FusedIterator for IdDeterministic {}
