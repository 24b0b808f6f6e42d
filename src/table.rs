//! Small linear-scan association table used for the registries that are too
//! short to justify a hash map: the URL scheme lookup and the Cache-Control
//! directive lookup.

use crate::util::eq_nocase;
use std::ops::Index;
use std::slice::SliceIndex;

#[derive(Clone, Debug)]
pub struct Table<T> {
    pub elements: Vec<(Vec<u8>, T)>,
}

impl<T> Index<usize> for Table<T> {
    type Output = (Vec<u8>, T);
    fn index(&self, idx: usize) -> &(Vec<u8>, T) {
        &self.elements[idx]
    }
}

impl<'a, T> IntoIterator for &'a Table<T> {
    type Item = &'a (Vec<u8>, T);
    type IntoIter = std::slice::Iter<'a, (Vec<u8>, T)>;

    fn into_iter(self) -> std::slice::Iter<'a, (Vec<u8>, T)> {
        self.elements.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Table<T> {
    type Item = &'a mut (Vec<u8>, T);
    type IntoIter = std::slice::IterMut<'a, (Vec<u8>, T)>;

    fn into_iter(self) -> std::slice::IterMut<'a, (Vec<u8>, T)> {
        self.elements.iter_mut()
    }
}

impl<T> IntoIterator for Table<T> {
    type Item = (Vec<u8>, T);
    type IntoIter = std::vec::IntoIter<(Vec<u8>, T)>;

    fn into_iter(self) -> std::vec::IntoIter<(Vec<u8>, T)> {
        self.elements.into_iter()
    }
}

impl<T> Table<T> {
    /// Make a new owned Table with given capacity
    pub fn with_capacity(size: usize) -> Self {
        Self {
            elements: Vec::with_capacity(size),
        }
    }

    /// Add a new tuple (key, item) to the table
    pub fn add<K: Into<Vec<u8>>>(&mut self, key: K, item: T) {
        self.elements.push((key.into(), item));
    }

    pub fn get<I>(&self, index: I) -> Option<&I::Output>
    where
        I: SliceIndex<[(Vec<u8>, T)]>,
    {
        self.elements.get(index)
    }

    pub fn get_mut<I>(&mut self, index: I) -> Option<&mut I::Output>
    where
        I: SliceIndex<[(Vec<u8>, T)]>,
    {
        self.elements.get_mut(index)
    }

    /// Search the table for the first tuple with a key matching the given
    /// slice, ignoring ascii case.
    ///
    /// Returns None if no match is found.
    pub fn get_nocase<K: AsRef<[u8]>>(&self, key: K) -> Option<&(Vec<u8>, T)> {
        self.elements
            .iter()
            .find(|x| eq_nocase(&x.0, key.as_ref()))
    }

    /// Search the table for the first tuple with a key matching the given
    /// slice, ignoring ascii case.
    ///
    /// Returns None if no match is found.
    pub fn get_nocase_mut<K: AsRef<[u8]>>(&mut self, key: K) -> Option<&mut (Vec<u8>, T)> {
        self.elements
            .iter_mut()
            .find(|x| eq_nocase(&x.0, key.as_ref()))
    }

    /// Returns the number of elements in the table
    pub fn size(&self) -> usize {
        self.elements.len()
    }
}
