//! In-memory search filtering over fetched lists.
//!
//! Every list page in the panel fetches its full collection once and then
//! narrows it with a free-text query. Filtering does not run on every change
//! of the query: callers set the query and then trigger [`SearchState::apply_filter`]
//! explicitly (in the panel, on form submission).
//!
//! # Matching convention
//!
//! Each item is rendered into a single [`Haystack`] of labelled fields
//! (`"id:<id> nome:<name> tel:<phone>"`). Both the haystack and the query go
//! through [`normalize`], and the test is substring containment. A query can
//! therefore target a field (`nome:ana`) or match across field boundaries,
//! and it ignores case and accents.
//!
//! ```rust
//! use bicho_core::{Haystack, SearchState};
//!
//! struct Person {
//!     id: &'static str,
//!     name: &'static str,
//! }
//!
//! fn matches(person: &Person, query: &str) -> bool {
//!     Haystack::new()
//!         .field("id", person.id)
//!         .field("nome", person.name)
//!         .contains(query)
//! }
//!
//! let mut search = SearchState::new(
//!     vec![Person { id: "1", name: "Ana" }, Person { id: "2", name: "Bea" }],
//!     matches,
//! );
//! search.set_query("ANA");
//! search.apply_filter();
//! assert_eq!(search.len(), 1);
//! ```

use std::fmt::Display;

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Predicate deciding whether an item matches an already-normalized query.
pub type SearchPredicate<T> = fn(&T, &str) -> bool;

/// Fold a string for matching: lower case, no diacritics, no whitespace.
///
/// Input is decomposed first, so precomposed (`"ã"`) and combining
/// (`"a\u{303}"`) spellings fold to the same base letter.
#[must_use]
pub fn normalize(input: &str) -> String {
    input
        .nfd()
        .flat_map(char::to_lowercase)
        .filter(|c| !c.is_whitespace() && !is_combining_mark(*c))
        .collect()
}

/// A searchable rendering of one item: labelled fields joined by spaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Haystack(String);

impl Haystack {
    /// Start an empty haystack.
    #[must_use]
    pub const fn new() -> Self {
        Self(String::new())
    }

    /// Append a `label:value` field.
    #[must_use]
    pub fn field(mut self, label: &str, value: impl Display) -> Self {
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        self.0.push_str(label);
        self.0.push(':');
        self.0.push_str(&value.to_string());
        self
    }

    /// Append every field of `other`, e.g. the winners nested in an animal.
    #[must_use]
    pub fn extend(mut self, other: &Self) -> Self {
        if other.0.is_empty() {
            return self;
        }
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        self.0.push_str(&other.0);
        self
    }

    /// The raw, un-normalized text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the normalized haystack contains `normalized_query`.
    #[must_use]
    pub fn contains(&self, normalized_query: &str) -> bool {
        normalize(&self.0).contains(normalized_query)
    }
}

/// A source list, a query, and the filtered view derived from them.
///
/// The filtered view is always a subsequence of the source in source order.
/// With an empty query it equals the source.
#[derive(Debug, Clone)]
pub struct SearchState<T> {
    source: Vec<T>,
    query: String,
    /// Indices into `source` of the items currently in view.
    view: Vec<usize>,
    predicate: SearchPredicate<T>,
}

impl<T> SearchState<T> {
    /// Capture `source` and show all of it.
    #[must_use]
    pub fn new(source: Vec<T>, predicate: SearchPredicate<T>) -> Self {
        let view = (0..source.len()).collect();
        Self {
            source,
            query: String::new(),
            view,
            predicate,
        }
    }

    /// Replace the query. The view is unchanged until [`Self::apply_filter`].
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Recompute the view from the source and the current query.
    ///
    /// Panics raised by the predicate propagate to the caller.
    pub fn apply_filter(&mut self) {
        let needle = normalize(&self.query);
        if needle.is_empty() {
            self.view = (0..self.source.len()).collect();
            return;
        }

        let predicate = self.predicate;
        self.view = self
            .source
            .iter()
            .enumerate()
            .filter(|(_, item)| predicate(item, &needle))
            .map(|(i, _)| i)
            .collect();
    }

    /// The current query as typed.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The full source list.
    #[must_use]
    pub fn source(&self) -> &[T] {
        &self.source
    }

    /// Items currently in view, in source order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.view.iter().filter_map(|&i| self.source.get(i))
    }

    /// Number of items in view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.view.len()
    }

    /// Whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }
}

impl<T: Clone> SearchState<T> {
    /// Clone the items in view.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.values().cloned().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Person {
        id: String,
        name: String,
    }

    fn person(id: &str, name: &str) -> Person {
        Person {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn by_person(p: &Person, query: &str) -> bool {
        Haystack::new()
            .field("id", &p.id)
            .field("nome", &p.name)
            .contains(query)
    }

    fn by_text(s: &String, query: &str) -> bool {
        normalize(s).contains(query)
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  João Ávila "), "joaoavila");
        assert_eq!(normalize("AÇÃO"), "acao");
        assert_eq!(normalize("não"), "nao");
        assert_eq!(normalize("Leão Peña"), "leaopena");
    }

    #[test]
    fn test_decomposed_accents_fold() {
        let nfd_name = "Joa\u{303}o";
        assert_eq!(normalize(nfd_name), "joao");

        let precomposed = Haystack::new().field("nome", "João");
        assert!(precomposed.contains(&normalize(nfd_name)));

        let decomposed = Haystack::new().field("nome", nfd_name);
        assert!(decomposed.contains(&normalize("JOÃO")));
        assert!(decomposed.contains(&normalize("nome:joao")));
    }

    #[test]
    fn test_initial_view_is_source() {
        let search = SearchState::new(vec![person("1", "Ana"), person("2", "Bea")], by_person);
        assert_eq!(search.len(), 2);
        assert_eq!(search.query(), "");
    }

    #[test]
    fn test_case_insensitive_match() {
        let mut search = SearchState::new(vec![person("1", "Ana"), person("2", "Bea")], by_person);
        search.set_query("ana");
        search.apply_filter();
        assert_eq!(search.to_vec(), vec![person("1", "Ana")]);
    }

    #[test]
    fn test_set_query_does_not_filter() {
        let mut search = SearchState::new(vec![person("1", "Ana"), person("2", "Bea")], by_person);
        search.set_query("bea");
        assert_eq!(search.len(), 2);
        search.apply_filter();
        assert_eq!(search.to_vec(), vec![person("2", "Bea")]);
    }

    #[test]
    fn test_accent_tolerant_and_labelled() {
        let mut search = SearchState::new(
            vec![person("1", "João"), person("2", "Joana")],
            by_person,
        );
        search.set_query("nome:JOAO");
        search.apply_filter();
        assert_eq!(search.to_vec(), vec![person("1", "João")]);
    }

    #[test]
    fn test_matches_across_fields() {
        let mut search = SearchState::new(vec![person("7", "Ana"), person("8", "Ana")], by_person);
        search.set_query("7 nome:an");
        search.apply_filter();
        assert_eq!(search.to_vec(), vec![person("7", "Ana")]);
    }

    #[test]
    fn test_empty_query_restores_source() {
        let mut search = SearchState::new(vec![person("1", "Ana"), person("2", "Bea")], by_person);
        search.set_query("zzz");
        search.apply_filter();
        assert!(search.is_empty());

        search.set_query("   ");
        search.apply_filter();
        assert_eq!(search.len(), 2);
    }

    #[test]
    fn test_haystack_extend() {
        let nested = Haystack::new().field("vencedornome", "Bia");
        let hay = Haystack::new().field("id", 1).extend(&nested);
        assert_eq!(hay.as_str(), "id:1 vencedornome:Bia");
        assert!(hay.contains("vencedornome:bia"));
        assert_eq!(Haystack::new().extend(&Haystack::new()).as_str(), "");
    }

    proptest! {
        #[test]
        fn prop_view_is_ordered_subsequence(
            source in proptest::collection::vec("[a-cA-C ]{0,6}", 0..20),
            query in "[a-c]{0,3}",
        ) {
            let mut search = SearchState::new(source.clone(), by_text);
            search.set_query(query);
            search.apply_filter();

            let mut rest = source.iter();
            for item in search.values() {
                prop_assert!(rest.any(|s| s == item));
            }
        }

        #[test]
        fn prop_apply_filter_is_idempotent(
            source in proptest::collection::vec("[a-c]{0,6}", 0..20),
            query in "[a-c]{0,3}",
        ) {
            let mut search = SearchState::new(source, by_text);
            search.set_query(query);
            search.apply_filter();
            let once = search.to_vec();
            search.apply_filter();
            prop_assert_eq!(once, search.to_vec());
        }

        #[test]
        fn prop_empty_query_restores_source(
            source in proptest::collection::vec("[a-c]{0,6}", 0..20),
            query in "[a-c]{1,3}",
        ) {
            let mut search = SearchState::new(source.clone(), by_text);
            search.set_query(query);
            search.apply_filter();
            search.set_query("");
            search.apply_filter();
            prop_assert_eq!(search.to_vec(), source);
        }
    }
}
