//! # Ordered Container
//!
//! A sequence that either keeps insertion order or, when given a comparator,
//! keeps itself sorted as elements are added.
//!
//! ## Sorted Insert
//! ```text
//! add(4) into [1, 3, 4, 5] with ascending comparator:
//!
//!   cmp(4, 1) = Greater → keep walking
//!   cmp(4, 3) = Greater → keep walking
//!   cmp(4, 4) = Equal   → insert here
//!
//!   result: [1, 3, 4*, 4, 5]   (new element lands before its equals)
//! ```
//!
//! Index operations work on positions, not keys, and never re-sort.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Three-way comparator used for sorted insertion.
pub type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering>;

/// Comparator-driven ordered sequence.
pub struct SortedList<T> {
    elements: Vec<T>,
    comparator: Option<Comparator<T>>,
}

impl<T> SortedList<T> {
    /// A list that appends at the tail.
    pub fn new() -> Self {
        SortedList {
            elements: Vec::new(),
            comparator: None,
        }
    }

    /// A list that inserts each added element at its sorted position.
    pub fn with_comparator<F>(comparator: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        SortedList {
            elements: Vec::new(),
            comparator: Some(Box::new(comparator)),
        }
    }

    /// Adds an element at the tail, or before the first element it does not
    /// compare greater than.
    pub fn add(&mut self, value: T) {
        let position = match &self.comparator {
            Some(cmp) => self
                .elements
                .iter()
                .position(|existing| cmp(&value, existing) != Ordering::Greater)
                .unwrap_or(self.elements.len()),
            None => self.elements.len(),
        };
        self.elements.insert(position, value);
    }

    /// Inserts at a position in `[0, len]`, ignoring the comparator.
    pub fn insert(&mut self, index: usize, value: T) -> CoreResult<()> {
        if index > self.elements.len() {
            return Err(self.out_of_range(index));
        }
        self.elements.insert(index, value);
        Ok(())
    }

    pub fn get(&self, index: usize) -> CoreResult<&T> {
        self.elements
            .get(index)
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Removes and returns the element at `index`.
    pub fn remove(&mut self, index: usize) -> CoreResult<T> {
        self.check(index)?;
        Ok(self.elements.remove(index))
    }

    /// Swaps in a new element at `index`, returning the old one.
    pub fn replace(&mut self, index: usize, value: T) -> CoreResult<T> {
        self.check(index)?;
        Ok(std::mem::replace(&mut self.elements[index], value))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn is_sorted_mode(&self) -> bool {
        self.comparator.is_some()
    }

    fn check(&self, index: usize) -> CoreResult<()> {
        if index < self.elements.len() {
            Ok(())
        } else {
            Err(self.out_of_range(index))
        }
    }

    fn out_of_range(&self, index: usize) -> CoreError {
        CoreError::IndexOutOfRange {
            index,
            len: self.elements.len(),
        }
    }
}

impl<T> Default for SortedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for SortedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedList")
            .field("elements", &self.elements)
            .field("sorted", &self.is_sorted_mode())
            .finish()
    }
}

impl<T> Extend<T> for SortedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a SortedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<T> IntoIterator for SortedList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ascending() -> SortedList<i32> {
        SortedList::with_comparator(|a: &i32, b: &i32| a.cmp(b))
    }

    fn collect(list: &SortedList<i32>) -> Vec<i32> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_sorted_add() {
        let mut list = ascending();
        list.extend([5, 3, 8, 1]);
        assert_eq!(collect(&list), vec![1, 3, 5, 8]);
    }

    #[test]
    fn test_unsorted_add_keeps_insertion_order() {
        let mut list = SortedList::new();
        list.extend([5, 3, 8, 1]);
        assert_eq!(collect(&list), vec![5, 3, 8, 1]);
        assert!(!list.is_sorted_mode());
    }

    #[test]
    fn test_new_element_goes_before_equals() {
        let mut list = SortedList::with_comparator(|a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0));
        list.extend([(1, 'a'), (2, 'a'), (2, 'b'), (3, 'a')]);
        let tags: Vec<(i32, char)> = list.iter().copied().collect();
        assert_eq!(tags, vec![(1, 'a'), (2, 'b'), (2, 'a'), (3, 'a')]);
    }

    #[test]
    fn test_descending_comparator() {
        let mut list = SortedList::with_comparator(|a: &i32, b: &i32| b.cmp(a));
        list.extend([5, 3, 8, 1]);
        assert_eq!(collect(&list), vec![8, 5, 3, 1]);
    }

    #[test]
    fn test_index_operations() {
        let mut list = SortedList::new();
        list.extend([10, 20, 30]);

        assert_eq!(*list.get(1).unwrap(), 20);
        list.insert(3, 40).unwrap();
        list.insert(0, 5).unwrap();
        assert_eq!(collect(&list), vec![5, 10, 20, 30, 40]);

        assert_eq!(list.remove(2).unwrap(), 20);
        assert_eq!(list.replace(0, 1).unwrap(), 5);
        assert_eq!(collect(&list), vec![1, 10, 30, 40]);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_bounds_violations() {
        let mut list = SortedList::new();
        list.extend([1, 2, 3]);

        assert_eq!(
            list.get(3).unwrap_err(),
            CoreError::IndexOutOfRange { index: 3, len: 3 }
        );
        assert!(list.remove(3).is_err());
        assert!(list.replace(7, 0).is_err());
        assert!(list.insert(4, 0).is_err());
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_clear_and_empty() {
        let mut list = ascending();
        assert!(list.is_empty());
        list.add(1);
        assert!(!list.is_empty());
        list.clear();
        assert!(list.is_empty());
        assert!(list.get(0).is_err());
    }
}
