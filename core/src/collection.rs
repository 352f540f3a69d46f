//! Helpers for id-addressed entity collections
//!
//! The site state keeps each entity kind in an ordered `Vec`. These helpers
//! produce the next version of such a collection without touching the
//! current one, which is what every add/update/delete transition needs.
//!
//! # Examples
//!
//! ```
//! use gathering_core::collection::{appended, removed, replaced, Identified};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Note {
//!     id: String,
//!     body: String,
//! }
//!
//! impl Identified for Note {
//!     fn id(&self) -> &str {
//!         &self.id
//!     }
//! }
//!
//! let notes = vec![Note { id: "a".into(), body: "first".into() }];
//! let notes = appended(&notes, Note { id: "b".into(), body: "second".into() });
//! let notes = replaced(&notes, &Note { id: "a".into(), body: "edited".into() });
//! let notes = removed(&notes, "b");
//!
//! assert_eq!(notes, vec![Note { id: "a".into(), body: "edited".into() }]);
//! ```

/// An entity addressed by a string id
pub trait Identified {
    /// The entity's id within its collection
    fn id(&self) -> &str;
}

/// Returns a copy of `items` with `item` appended at the end
#[must_use]
pub fn appended<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend_from_slice(items);
    next.push(item);
    next
}

/// Returns a copy of `items` where every entry sharing `item`'s id is replaced
///
/// Order is preserved. When no entry matches, the copy equals the input.
#[must_use]
pub fn replaced<T: Identified + Clone>(items: &[T], item: &T) -> Vec<T> {
    items
        .iter()
        .map(|existing| {
            if existing.id() == item.id() {
                item.clone()
            } else {
                existing.clone()
            }
        })
        .collect()
}

/// Returns a copy of `items` without any entry whose id equals `id`
#[must_use]
pub fn removed<T: Identified + Clone>(items: &[T], id: &str) -> Vec<T> {
    items
        .iter()
        .filter(|existing| existing.id() != id)
        .cloned()
        .collect()
}

/// Finds the first entry with the given id
///
/// A miss is an ordinary outcome and yields `None`.
#[must_use]
pub fn find<'a, T: Identified>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Item {
        id: String,
        value: u8,
    }

    impl Identified for Item {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn item(id: &str, value: u8) -> Item {
        Item {
            id: id.to_string(),
            value,
        }
    }

    #[test]
    fn replaced_touches_every_duplicate() {
        let items = vec![item("x", 1), item("y", 2), item("x", 3)];
        let next = replaced(&items, &item("x", 9));
        assert_eq!(next, vec![item("x", 9), item("y", 2), item("x", 9)]);
    }

    #[test]
    fn replaced_without_match_is_unchanged() {
        let items = vec![item("x", 1)];
        assert_eq!(replaced(&items, &item("missing", 7)), items);
    }

    #[test]
    fn removed_drops_all_matches() {
        let items = vec![item("x", 1), item("y", 2), item("x", 3)];
        assert_eq!(removed(&items, "x"), vec![item("y", 2)]);
    }

    #[test]
    fn find_returns_first_match_or_none() {
        let items = vec![item("x", 1), item("x", 2)];
        assert_eq!(find(&items, "x").map(|i| i.value), Some(1));
        assert!(find(&items, "nope").is_none());
    }

    proptest! {
        #[test]
        fn append_then_remove_restores_collection(values in proptest::collection::vec(0u8..10, 0..20)) {
            let items: Vec<Item> = values
                .iter()
                .enumerate()
                .map(|(i, v)| item(&i.to_string(), *v))
                .collect();
            let fresh = item("fresh", 42);
            let restored = removed(&appended(&items, fresh), "fresh");
            prop_assert_eq!(restored, items);
        }
    }
}
