//! The cursor abstraction shared by every stage.
//!
//! A cursor is a comparable, advanceable position inside a stage. A stage
//! hands out a begin and an end cursor; iteration reads and advances the
//! begin cursor until it compares equal to the end cursor.

use std::fmt;
use std::iter::FusedIterator;

use crate::error::QueryError;

/// The operations a stage or cursor performs, used in errors and traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Begin,
    End,
    Read,
    Advance,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Begin => "begin",
            Operation::End => "end",
            Operation::Read => "read",
            Operation::Advance => "advance",
        };
        f.write_str(name)
    }
}

/// A position inside a stage.
///
/// Cursors are plain values: cloning one yields an independent position
/// that can be advanced without affecting the original.
pub trait Cursor: Clone + PartialEq {
    /// The element produced by reading the cursor.
    type Item;

    /// Returns `true` if the cursor sits on its end sentinel.
    fn is_end(&self) -> bool;

    /// Reads the element under the cursor.
    fn try_read(&self) -> Result<Self::Item, QueryError>;

    /// Moves the cursor to the next element.
    fn try_advance(&mut self) -> Result<(), QueryError>;

    /// Reads the element under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at its end.
    fn read(&self) -> Self::Item {
        match self.try_read() {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }

    /// Moves the cursor to the next element.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at its end or an integer range overflows.
    fn advance(&mut self) {
        if let Err(err) = self.try_advance() {
            panic!("{err}");
        }
    }
}

/// A std iterator over a begin/end cursor pair.
///
/// Stops as soon as the current cursor compares equal to the end cursor.
/// The cursor is advanced at the start of the following `next`, so a
/// consumer that stops after `n` elements never moves past the `n`th one.
#[derive(Debug, Clone)]
pub struct Iter<C> {
    current: C,
    end: C,
    pending_advance: bool,
}

impl<C: Cursor> Iter<C> {
    pub fn new(begin: C, end: C) -> Self {
        Self {
            current: begin,
            end,
            pending_advance: false,
        }
    }

    /// The cursor of the element last returned by `next`, or the begin
    /// cursor before the first call.
    pub fn position(&self) -> &C {
        &self.current
    }
}

impl<C: Cursor> Iterator for Iter<C> {
    type Item = C::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pending_advance {
            self.current.advance();
            self.pending_advance = false;
        }
        if self.current == self.end {
            return None;
        }
        let item = self.current.read();
        self.pending_advance = true;
        Some(item)
    }
}

impl<C: Cursor> FusedIterator for Iter<C> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::IntCursor;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Begin.to_string(), "begin");
        assert_eq!(Operation::Advance.to_string(), "advance");
    }

    #[test]
    fn test_iter_stops_at_end() {
        let iter = Iter::new(IntCursor::new(3, 6), IntCursor::new(6, 6));
        assert_eq!(iter.collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn test_iter_is_fused() {
        let mut iter = Iter::new(IntCursor::new(0, 1), IntCursor::new(1, 1));
        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
        assert!(iter.position().is_end());
    }

    #[test]
    fn test_iter_advances_on_demand() {
        let mut iter = Iter::new(IntCursor::new(0, 10), IntCursor::new(10, 10));
        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.position().value(), 0);
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.position().value(), 1);
    }

    #[test]
    fn test_iter_take_stops_at_last_integer() {
        let start = i64::MAX - 2;
        let end = start - 1;
        let iter = Iter::new(IntCursor::new(start, end), IntCursor::new(end, end));
        assert_eq!(
            iter.take(3).collect::<Vec<_>>(),
            vec![i64::MAX - 2, i64::MAX - 1, i64::MAX]
        );
    }

    #[test]
    #[should_panic(expected = "cannot read past the end")]
    fn test_read_at_end_panics() {
        IntCursor::new(4, 4).read();
    }

    #[test]
    #[should_panic(expected = "cannot advance past the end")]
    fn test_advance_at_end_panics() {
        IntCursor::new(4, 4).advance();
    }
}
