//! Source stages: sequences that read directly from data rather than from
//! another stage.

use std::fmt;

use crate::cursor::{Cursor, Operation};
use crate::error::QueryError;
use crate::stage::{Stage, impl_compose};

// ---------------------------------------------------------------------------
// Iterator-backed sources
// ---------------------------------------------------------------------------

/// Cursor over a cloneable iterator.
///
/// Holds the element under the cursor and the rest of the iterator. Two
/// cursors are equal when they are at the same ordinal, or both exhausted.
/// An end sentinel carries no iterator.
pub struct IterCursor<I: Iterator> {
    rest: Option<I>,
    head: Option<I::Item>,
    index: usize,
}

impl<I: Iterator> IterCursor<I> {
    /// Creates a cursor at the first element of `iter`.
    pub fn start(mut iter: I) -> Self {
        let head = iter.next();
        Self {
            rest: Some(iter),
            head,
            index: 0,
        }
    }

    /// Creates an exhausted cursor, usable as an end sentinel.
    pub fn finished() -> Self {
        Self {
            rest: None,
            head: None,
            index: 0,
        }
    }

    fn ordinal(&self) -> Option<usize> {
        self.head.as_ref().map(|_| self.index)
    }
}

impl<I> Clone for IterCursor<I>
where
    I: Iterator + Clone,
    I::Item: Clone,
{
    fn clone(&self) -> Self {
        Self {
            rest: self.rest.clone(),
            head: self.head.clone(),
            index: self.index,
        }
    }
}

impl<I: Iterator> PartialEq for IterCursor<I> {
    fn eq(&self, other: &Self) -> bool {
        self.ordinal() == other.ordinal()
    }
}

impl<I: Iterator> fmt::Debug for IterCursor<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterCursor")
            .field("ordinal", &self.ordinal())
            .finish_non_exhaustive()
    }
}

impl<I> Cursor for IterCursor<I>
where
    I: Iterator + Clone,
    I::Item: Clone,
{
    type Item = I::Item;

    fn is_end(&self) -> bool {
        self.head.is_none()
    }

    fn try_read(&self) -> Result<Self::Item, QueryError> {
        self.head
            .clone()
            .ok_or(QueryError::past_end("lift", Operation::Read))
    }

    fn try_advance(&mut self) -> Result<(), QueryError> {
        if self.head.is_none() {
            return Err(QueryError::past_end("lift", Operation::Advance));
        }
        self.head = self.rest.as_mut().and_then(Iterator::next);
        self.index += 1;
        Ok(())
    }
}

/// Source stage over a cloneable iterator.
///
/// The iterator is cloned for every `begin`; the first element is pulled
/// only when a cursor is created.
#[derive(Debug, Clone)]
pub struct Lift<I> {
    iter: I,
}

impl<I> Stage for Lift<I>
where
    I: Iterator + Clone,
    I::Item: Clone,
{
    type Item = I::Item;
    type Cursor = IterCursor<I>;

    fn begin(&self) -> Self::Cursor {
        IterCursor::start(self.iter.clone())
    }

    fn end(&self) -> Self::Cursor {
        IterCursor::finished()
    }
}

impl_compose!([I] Lift<I>);

/// Wraps any iterable whose iterator can be cloned into a source stage.
///
/// ```
/// use lazy_query::{lift, Stage};
///
/// let letters = lift("abc".chars());
/// assert_eq!(letters.iter().collect::<String>(), "abc");
/// ```
pub fn lift<T>(items: T) -> Lift<T::IntoIter>
where
    T: IntoIterator,
    T::IntoIter: Clone,
{
    Lift {
        iter: items.into_iter(),
    }
}

// ---------------------------------------------------------------------------
// Explicit cursor pairs
// ---------------------------------------------------------------------------

/// Source stage over an explicit begin/end cursor pair.
#[derive(Debug, Clone)]
pub struct Span<C> {
    first: C,
    last: C,
}

impl<C: Cursor> Stage for Span<C> {
    type Item = C::Item;
    type Cursor = C;

    fn begin(&self) -> Self::Cursor {
        self.first.clone()
    }

    fn end(&self) -> Self::Cursor {
        self.last.clone()
    }
}

impl_compose!([C] Span<C>);

/// Wraps a begin/end cursor pair into a source stage.
///
/// `last` must be reachable from `first` by advancing, or compare equal to
/// it, for iteration to terminate.
pub fn span<C: Cursor>(first: C, last: C) -> Span<C> {
    Span { first, last }
}

// ---------------------------------------------------------------------------
// Integer ranges
// ---------------------------------------------------------------------------

/// Cursor over an integer range.
#[derive(Debug, Clone, Copy)]
pub struct IntCursor {
    current: i64,
    end: i64,
}

impl IntCursor {
    /// Creates a cursor at `current` in a range ending at `end`.
    pub fn new(current: i64, end: i64) -> Self {
        Self { current, end }
    }

    pub fn value(&self) -> i64 {
        self.current
    }
}

impl PartialEq for IntCursor {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl Eq for IntCursor {}

impl Cursor for IntCursor {
    type Item = i64;

    fn is_end(&self) -> bool {
        self.current == self.end
    }

    fn try_read(&self) -> Result<i64, QueryError> {
        if self.is_end() {
            return Err(QueryError::past_end("range", Operation::Read));
        }
        Ok(self.current)
    }

    fn try_advance(&mut self) -> Result<(), QueryError> {
        if self.is_end() {
            return Err(QueryError::past_end("range", Operation::Advance));
        }
        self.current = self
            .current
            .checked_add(1)
            .ok_or(QueryError::RangeOverflow { at: self.current })?;
        Ok(())
    }
}

/// Source stage over the half-open integer range `[begin, end)`.
///
/// An unbounded range stores `end = begin - 1`. Its end cursor is never
/// reached by advancing from `begin`, so iterating it alone does not
/// terminate: bound it with [`zip_with`](crate::zip_with) against a finite
/// stage, or cap the iteration (e.g. `iter().take(n)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    begin: i64,
    end: i64,
}

impl IntRange {
    /// Returns `true` for ranges built by [`from_range_infinite`].
    pub fn is_unbounded(&self) -> bool {
        self.end < self.begin
    }
}

impl Stage for IntRange {
    type Item = i64;
    type Cursor = IntCursor;

    fn begin(&self) -> Self::Cursor {
        IntCursor::new(self.begin, self.end)
    }

    fn end(&self) -> Self::Cursor {
        IntCursor::new(self.end, self.end)
    }
}

impl_compose!(IntRange);

/// Creates the finite range `[begin, end)`.
///
/// An inverted range (`end < begin`) is empty.
pub fn from_range(begin: i64, end: i64) -> IntRange {
    IntRange {
        begin,
        end: end.max(begin),
    }
}

/// Creates the unbounded range `begin, begin + 1, ...`.
pub fn from_range_infinite(begin: i64) -> IntRange {
    IntRange {
        begin,
        end: begin.wrapping_sub(1),
    }
}
