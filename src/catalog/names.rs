//! Sorted command-name lists and their set operations.
//!
//! A `Catalog` is filled in arbitrary order, then sorted and deduplicated
//! once. Exclusion relies on both sides being sorted and walks them together
//! instead of searching one inside the other.

use std::cmp::Ordering;

/// One discovered command name, without the helper prefix.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CommandName(String);

impl CommandName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Ordered collection of command names from one provenance.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Catalog {
    entries: Vec<CommandName>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a name without restoring order; call `sort` + `uniq` after a batch.
    pub fn add(&mut self, name: impl Into<String>) {
        self.entries.push(CommandName::new(name));
    }

    /// Move every entry of `other` into this catalog, leaving `other` empty.
    pub fn append(&mut self, other: &mut Catalog) {
        self.entries.append(&mut other.entries);
    }

    /// Sort by name in byte order.
    pub fn sort(&mut self) {
        self.entries.sort();
    }

    /// Collapse runs of equal names into their first occurrence.
    ///
    /// Only adjacent duplicates are removed, so the catalog must be sorted.
    pub fn uniq(&mut self) {
        self.entries.dedup();
    }

    /// Sort then deduplicate.
    pub fn normalize(&mut self) {
        self.sort();
        self.uniq();
    }

    /// Remove every entry whose name also appears in `excludes`.
    ///
    /// Both catalogs must be sorted; the walk is a single co-sorted merge.
    pub fn exclude(&mut self, excludes: &Catalog) {
        let mut kept = Vec::with_capacity(self.entries.len());
        let mut remaining = std::mem::take(&mut self.entries).into_iter().peekable();
        let mut ei = 0;

        while let Some(candidate) = remaining.peek() {
            let Some(exclude) = excludes.entries.get(ei) else {
                break;
            };
            match candidate.cmp(exclude) {
                Ordering::Less => {
                    if let Some(entry) = remaining.next() {
                        kept.push(entry);
                    }
                }
                Ordering::Equal => {
                    remaining.next();
                    ei += 1;
                }
                Ordering::Greater => ei += 1,
            }
        }

        kept.extend(remaining);
        self.entries = kept;
    }

    /// Exact-name membership test.
    ///
    /// Binary search, so the catalog must be sorted.
    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .binary_search_by(|entry| entry.as_str().cmp(name))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(CommandName::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Catalog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(CommandName::new).collect(),
        }
    }
}
