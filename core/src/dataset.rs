//! In-memory DICOM data sets and item sequences.
//!
//! A [`DataSet`] is an ordered mapping from tags to data elements.
//! It starts out mutable, accepting insertions, and is sealed with
//! [`DataSet::lock`] at the end of every successful parse. Once locked,
//! the set is read-only and may be shared between readers freely.

use crate::dictionary::DataDictionary;
use crate::header::{Header, Tag};
use crate::DataElement;
use snafu::{Backtrace, Snafu};
use std::collections::BTreeMap;

/// Error type for data set and sequence manipulation.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Attempted to insert an element with a tag
    /// which is already present in the data set.
    #[snafu(display("Data element {} is already in the data set", tag))]
    DuplicateTag { tag: Tag, backtrace: Backtrace },
    /// Attempted to mutate a locked data set or sequence.
    #[snafu(display("Cannot mutate a locked data set"))]
    Locked { backtrace: Backtrace },
    /// The requested data element is not in the data set.
    #[snafu(display("No data element {} in the data set", tag))]
    NoSuchDataElement { tag: Tag, backtrace: Backtrace },
    /// The requested attribute keyword is not in the dictionary.
    #[snafu(display("Unknown attribute name `{}`", name))]
    NoSuchAttributeName { name: String, backtrace: Backtrace },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An in-memory DICOM data set,
/// mapping tags to data elements in ascending tag order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DataSet {
    entries: BTreeMap<Tag, DataElement>,
    locked: bool,
}

impl DataSet {
    /// Create a new empty, mutable data set.
    pub fn new() -> Self {
        DataSet::default()
    }

    /// Insert a data element into the data set.
    ///
    /// Fails if the data set is locked
    /// or if an element with the same tag is already present.
    pub fn insert(&mut self, element: DataElement) -> Result<()> {
        snafu::ensure!(!self.locked, LockedSnafu);
        let tag = element.tag();
        snafu::ensure!(!self.entries.contains_key(&tag), DuplicateTagSnafu { tag });
        self.entries.insert(tag, element);
        Ok(())
    }

    /// Retrieve a particular data element by its tag.
    pub fn element<T: Into<Tag>>(&self, tag: T) -> Result<&DataElement> {
        let tag = tag.into();
        self.entries
            .get(&tag)
            .ok_or_else(|| NoSuchDataElementSnafu { tag }.build())
    }

    /// Retrieve a particular data element by its attribute keyword
    /// (e.g. "PatientName"), resolved through the given dictionary.
    pub fn element_by_name(
        &self,
        name: &str,
        dict: &impl DataDictionary,
    ) -> Result<&DataElement> {
        let tag = dict
            .by_name(name)
            .ok_or_else(|| NoSuchAttributeNameSnafu { name }.build())?;
        self.element(tag)
    }

    /// Retrieve a particular data element by its tag,
    /// or `None` if it is not in the data set.
    pub fn get<T: Into<Tag>>(&self, tag: T) -> Option<&DataElement> {
        self.entries.get(&tag.into())
    }

    /// Check whether the data set contains an element with the given tag.
    pub fn contains<T: Into<Tag>>(&self, tag: T) -> bool {
        self.entries.contains_key(&tag.into())
    }

    /// The number of data elements in the data set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the data set has no elements.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the data elements in ascending tag order.
    pub fn iter(&self) -> impl Iterator<Item = &DataElement> {
        self.entries.values()
    }

    /// Seal the data set, making it read-only.
    /// This transition is one-way.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Check whether the data set has been sealed.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = &'a DataElement;
    type IntoIter = std::collections::btree_map::Values<'a, Tag, DataElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

impl IntoIterator for DataSet {
    type Item = DataElement;
    type IntoIter = Iter;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            inner: self.entries.into_iter(),
        }
    }
}

/// Base iterator type for an owned data set traversal.
#[derive(Debug)]
pub struct Iter {
    inner: std::collections::btree_map::IntoIter<Tag, DataElement>,
}

impl Iterator for Iter {
    type Item = DataElement;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|x| x.1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An ordered list of data sets,
/// the items of a sequence data element.
///
/// The lifecycle mirrors [`DataSet`]:
/// mutable while the parser appends items, sealed afterwards.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Sequence {
    items: Vec<DataSet>,
    locked: bool,
}

impl Sequence {
    /// Create a new empty, mutable sequence.
    pub fn new() -> Self {
        Sequence::default()
    }

    /// Append an item to the sequence, taking ownership of it.
    ///
    /// Fails if the sequence is locked.
    pub fn append(&mut self, item: DataSet) -> Result<()> {
        snafu::ensure!(!self.locked, LockedSnafu);
        self.items.push(item);
        Ok(())
    }

    /// Retrieve the item data set at the given index.
    pub fn item(&self, index: usize) -> Option<&DataSet> {
        self.items.get(index)
    }

    /// The number of items in the sequence.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the sequence has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the item data sets in order.
    pub fn iter(&self) -> std::slice::Iter<DataSet> {
        self.items.iter()
    }

    /// Seal the sequence, making it read-only.
    /// This transition is one-way.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Check whether the sequence has been sealed.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a DataSet;
    type IntoIter = std::slice::Iter<'a, DataSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
