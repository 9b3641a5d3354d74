//! Tag sets: small unordered collections of short string labels.
//!
//! Tags supplement an index's identifier for disambiguation and display.
//! The set is kept sorted and deduplicated regardless of insertion order,
//! and parses from comma-separated text with whitespace ignored.

use std::fmt;

use smallvec::SmallVec;

/// A small sorted set of short string labels.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TagSet {
    tags: SmallVec<[String; 4]>,
}

impl TagSet {
    /// Create an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated tag list; whitespace is stripped, empty
    /// entries are dropped.
    pub fn parse(text: &str) -> Self {
        let mut ts = TagSet::new();
        for piece in text.split(',') {
            let tag: String = piece.chars().filter(|c| !c.is_whitespace()).collect();
            if !tag.is_empty() {
                ts.add_tag(&tag);
            }
        }
        ts
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// True if no tags are present.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Membership test for a single tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.binary_search_by(|t| t.as_str().cmp(tag)).is_ok()
    }

    /// True if every tag of `other` is present in `self`.
    pub fn has_tags(&self, other: &TagSet) -> bool {
        other.iter().all(|t| self.has_tag(t))
    }

    /// Insert a tag, keeping sorted order; duplicates are ignored.
    pub fn add_tag(&mut self, tag: &str) {
        if let Err(pos) = self.tags.binary_search_by(|t| t.as_str().cmp(tag)) {
            self.tags.insert(pos, tag.to_owned());
        }
    }

    /// Insert every tag of `other`.
    pub fn add_tags(&mut self, other: &TagSet) {
        for t in other.iter() {
            self.add_tag(t);
        }
    }

    /// Remove a tag; returns whether it was present.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        match self.tags.binary_search_by(|t| t.as_str().cmp(tag)) {
            Ok(pos) => {
                self.tags.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Remove every tag of `other`.
    pub fn remove_tags(&mut self, other: &TagSet) {
        for t in other.iter() {
            self.remove_tag(t);
        }
    }

    /// Remove the tags of `old` and insert the tags of `new`.
    ///
    /// The caller decides whether the replacement applies (typically only
    /// when all of `old` is present).
    pub fn replace_tags(&mut self, old: &TagSet, new: &TagSet) {
        self.remove_tags(old);
        self.add_tags(new);
    }

    /// Iterate over tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.as_str())
    }
}

impl From<&str> for TagSet {
    fn from(text: &str) -> Self {
        TagSet::parse(text)
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, t) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", t)?;
        }
        Ok(())
    }
}
