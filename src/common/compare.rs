//! Pluggable total order.
//!
//! A [`Comparator`] wraps a two-argument ordering function and derives all
//! comparison predicates from it. It is used wherever the crate needs an order
//! chosen by the caller, most notably for arranging nodes along the axes of an
//! [adjacency matrix layout](crate::layout::AdjacencyMatrixLayout::order_by).
//!
//! Comparators are immutable values. [`Comparator::reverse`] and
//! [`Comparator::then`] build new comparators and leave the receiver as it
//! was, so one instance can be shared among multiple ordering contexts.
//!
//! # Examples
//!
//! ```
//! use callmap::common::Comparator;
//!
//! let by_len = Comparator::by_key(|s: &&str| s.len());
//! let longest_first = by_len.reverse();
//!
//! let mut names = vec!["main", "f", "parse_args"];
//! longest_first.sort(&mut names);
//!
//! assert_eq!(names, vec!["parse_args", "main", "f"]);
//! assert!(by_len.less_than(&"f", &"main"));
//! ```

use std::{cmp::Ordering, fmt, rc::Rc};

pub struct Comparator<T: ?Sized> {
    compare: Rc<dyn Fn(&T, &T) -> Ordering>,
}

impl<T: ?Sized + 'static> Comparator<T> {
    pub fn from_fn<F>(compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        Self {
            compare: Rc::new(compare),
        }
    }

    /// The order given by the [`Ord`] implementation of `T`.
    pub fn natural() -> Self
    where
        T: Ord,
    {
        Self::from_fn(T::cmp)
    }

    /// Orders the values by the natural order of the extracted key.
    pub fn by_key<U, F>(key: F) -> Self
    where
        U: Ord,
        F: Fn(&T) -> U + 'static,
    {
        Self::from_fn(move |a, b| key(a).cmp(&key(b)))
    }

    /// Returns a comparator of the opposite order.
    pub fn reverse(&self) -> Self {
        let inner = Rc::clone(&self.compare);
        Self::from_fn(move |a, b| inner(b, a))
    }

    /// Returns a comparator that breaks ties of this one using `other`.
    pub fn then(&self, other: &Comparator<T>) -> Self {
        let first = Rc::clone(&self.compare);
        let second = Rc::clone(&other.compare);
        Self::from_fn(move |a, b| first(a, b).then_with(|| second(a, b)))
    }
}

impl<T: ?Sized> Comparator<T> {
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.compare)(a, b)
    }

    pub fn equal(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    pub fn less_than(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    pub fn greater_than(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) == Ordering::Greater
    }

    pub fn less_or_equal(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) != Ordering::Greater
    }

    pub fn greater_or_equal(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) != Ordering::Less
    }

    /// Sorts the slice in this order. The sort is stable.
    pub fn sort(&self, values: &mut [T])
    where
        T: Sized,
    {
        values.sort_by(|a, b| self.compare(a, b));
    }

    /// Returns the first minimal element of the iterator.
    pub fn min<'a, I>(&self, values: I) -> Option<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
    {
        values.into_iter().fold(None, |min, value| match min {
            Some(min) if self.less_or_equal(min, value) => Some(min),
            _ => Some(value),
        })
    }

    /// Returns the first maximal element of the iterator.
    pub fn max<'a, I>(&self, values: I) -> Option<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
    {
        values.into_iter().fold(None, |max, value| match max {
            Some(max) if self.greater_or_equal(max, value) => Some(max),
            _ => Some(value),
        })
    }
}

impl<T: ?Sized> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        Self {
            compare: Rc::clone(&self.compare),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Comparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparator").finish_non_exhaustive()
    }
}

impl<T: Ord + 'static> Default for Comparator<T> {
    fn default() -> Self {
        Self::natural()
    }
}
