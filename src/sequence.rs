//! Ordered input sequences.

use crate::input::{respects_refractory, Input};
use std::ops::{Deref, DerefMut};

/// An ordered, finite list of inputs.
///
/// Dereferences to a slice, so indexing, iteration and `len` work as usual.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence<I> {
    inputs: Vec<I>,
}

impl<I> Sequence<I> {
    /// Creates an empty sequence.
    #[must_use]
    pub const fn new() -> Self {
        Self { inputs: Vec::new() }
    }

    /// Creates an empty sequence with room for `capacity` inputs.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inputs: Vec::with_capacity(capacity),
        }
    }

    /// Appends an input.
    pub fn push(&mut self, input: I) {
        self.inputs.push(input);
    }

    /// Removes and returns the last input.
    pub fn pop(&mut self) -> Option<I> {
        self.inputs.pop()
    }
}

impl<I: Input> Sequence<I> {
    /// A sequence of `len` empty inputs.
    #[must_use]
    pub fn silent(len: usize) -> Self {
        Self {
            inputs: vec![I::default(); len],
        }
    }

    /// True when no input spikes. The empty sequence is trivial.
    pub fn is_trivial(&self) -> bool {
        self.inputs.iter().all(Input::is_empty)
    }

    /// Smallest period `p <= len / 2` such that every input repeats the one
    /// `p` steps earlier, or `len` when there is none.
    pub fn period(&self) -> usize {
        let n = self.inputs.len();
        (1..=n / 2)
            .find(|&p| (p..n).all(|i| self.inputs[i] == self.inputs[i - p]))
            .unwrap_or(n)
    }

    /// True when consecutive inputs obey the refractory rule.
    pub fn is_refractory(&self) -> bool {
        self.inputs
            .windows(2)
            .all(|pair| respects_refractory(&pair[0], &pair[1]))
    }

    /// True when the refractory rule also holds from the last input back to
    /// the first.
    pub fn is_circular_refractory(&self) -> bool {
        if !self.is_refractory() {
            return false;
        }
        match (self.inputs.last(), self.inputs.first()) {
            (Some(last), Some(first)) if self.inputs.len() >= 2 => {
                respects_refractory(last, first)
            }
            _ => true,
        }
    }
}

impl<I> Default for Sequence<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Deref for Sequence<I> {
    type Target = [I];

    fn deref(&self) -> &Self::Target {
        &self.inputs
    }
}

impl<I> DerefMut for Sequence<I> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inputs
    }
}

impl<I> From<Vec<I>> for Sequence<I> {
    fn from(inputs: Vec<I>) -> Self {
        Self { inputs }
    }
}

impl<I, const N: usize> From<[I; N]> for Sequence<I> {
    fn from(inputs: [I; N]) -> Self {
        Self {
            inputs: inputs.into(),
        }
    }
}

impl<I> FromIterator<I> for Sequence<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self {
            inputs: iter.into_iter().collect(),
        }
    }
}

impl<I> IntoIterator for Sequence<I> {
    type Item = I;
    type IntoIter = std::vec::IntoIter<I>;

    fn into_iter(self) -> Self::IntoIter {
        self.inputs.into_iter()
    }
}

impl<'a, I> IntoIterator for &'a Sequence<I> {
    type Item = &'a I;
    type IntoIter = std::slice::Iter<'a, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.inputs.iter()
    }
}
