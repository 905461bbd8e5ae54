//! Sort stage: realizes its upstream once into an ordered buffer.
//!
//! The buffer is computed on the first `begin` or `end` call and cached for
//! the lifetime of the stage. Cursors hold a shared handle to the buffer and
//! an index into it.

use std::cell::OnceCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::cursor::{Cursor, Operation};
use crate::error::QueryError;
use crate::stage::{Stage, StageBuilder, impl_compose};

/// Sort direction for [`order_by_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// Cursor into a realized, ordered buffer.
pub struct SortedCursor<T> {
    buffer: Rc<[T]>,
    index: usize,
}

impl<T> SortedCursor<T> {
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for SortedCursor<T> {
    fn clone(&self) -> Self {
        Self {
            buffer: Rc::clone(&self.buffer),
            index: self.index,
        }
    }
}

impl<T> PartialEq for SortedCursor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> fmt::Debug for SortedCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedCursor")
            .field("index", &self.index)
            .field("len", &self.buffer.len())
            .finish()
    }
}

impl<T: Clone> Cursor for SortedCursor<T> {
    type Item = T;

    fn is_end(&self) -> bool {
        self.index >= self.buffer.len()
    }

    fn try_read(&self) -> Result<T, QueryError> {
        self.buffer
            .get(self.index)
            .cloned()
            .ok_or(QueryError::past_end("order_by", Operation::Read))
    }

    fn try_advance(&mut self) -> Result<(), QueryError> {
        if self.is_end() {
            return Err(QueryError::past_end("order_by", Operation::Advance));
        }
        self.index += 1;
        Ok(())
    }
}

/// Stage yielding the upstream elements in sorted order.
///
/// Sorting is stable: elements the predicate considers equivalent keep
/// their upstream order in both directions.
pub struct OrderBy<S: Stage, F> {
    upstream: S,
    less: F,
    direction: Direction,
    sorted: OnceCell<Rc<[S::Item]>>,
}

impl<S, F> Clone for OrderBy<S, F>
where
    S: Stage + Clone,
    F: Clone,
{
    fn clone(&self) -> Self {
        Self {
            upstream: self.upstream.clone(),
            less: self.less.clone(),
            direction: self.direction,
            sorted: self.sorted.clone(),
        }
    }
}

impl<S: Stage + fmt::Debug, F> fmt::Debug for OrderBy<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBy")
            .field("upstream", &self.upstream)
            .field("direction", &self.direction)
            .field("realized", &self.sorted.get().is_some())
            .finish_non_exhaustive()
    }
}

impl<S, F> OrderBy<S, F>
where
    S: Stage,
    F: Fn(&S::Item, &S::Item) -> bool,
{
    /// Returns `true` once the sorted buffer has been computed.
    pub fn is_realized(&self) -> bool {
        self.sorted.get().is_some()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn realize(&self) -> &Rc<[S::Item]> {
        self.sorted.get_or_init(|| {
            let mut items: Vec<S::Item> = self.upstream.iter().collect();
            match self.direction {
                Direction::Ascending => items.sort_by(|a, b| ordering(&self.less, a, b)),
                Direction::Descending => items.sort_by(|a, b| ordering(&self.less, b, a)),
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(
                len = items.len(),
                direction = ?self.direction,
                "realized sorted buffer"
            );
            items.into()
        })
    }
}

/// Derives a total ordering from a strict-weak `less` predicate.
fn ordering<T, F>(less: &F, a: &T, b: &T) -> Ordering
where
    F: Fn(&T, &T) -> bool,
{
    if less(a, b) {
        Ordering::Less
    } else if less(b, a) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

impl<S, F> Stage for OrderBy<S, F>
where
    S: Stage,
    S::Item: Clone,
    F: Fn(&S::Item, &S::Item) -> bool,
{
    type Item = S::Item;
    type Cursor = SortedCursor<S::Item>;

    fn begin(&self) -> Self::Cursor {
        SortedCursor {
            buffer: Rc::clone(self.realize()),
            index: 0,
        }
    }

    fn end(&self) -> Self::Cursor {
        let buffer = Rc::clone(self.realize());
        let index = buffer.len();
        SortedCursor { buffer, index }
    }
}

impl_compose!([S: Stage, F] OrderBy<S, F>);

/// Builder for [`OrderBy`].
#[derive(Debug, Clone)]
pub struct OrderByBuilder<F> {
    less: F,
    direction: Direction,
}

impl<F> OrderByBuilder<F> {
    pub fn new(less: F, direction: Direction) -> Self {
        Self { less, direction }
    }
}

impl<S, F> StageBuilder<S> for OrderByBuilder<F>
where
    S: Stage,
    S::Item: Clone,
    F: Fn(&S::Item, &S::Item) -> bool,
{
    type Output = OrderBy<S, F>;

    fn build(self, upstream: S) -> Self::Output {
        OrderBy {
            upstream,
            less: self.less,
            direction: self.direction,
            sorted: OnceCell::new(),
        }
    }
}

/// Sorts ascending: `less(a, b)` means `a` comes before `b`.
pub fn order_by<T, F>(less: F) -> OrderByBuilder<F>
where
    F: Fn(&T, &T) -> bool,
{
    OrderByBuilder::new(less, Direction::Ascending)
}

/// Sorts descending: `less(a, b)` means `b` comes before `a`.
pub fn order_by_descending<T, F>(less: F) -> OrderByBuilder<F>
where
    F: Fn(&T, &T) -> bool,
{
    OrderByBuilder::new(less, Direction::Descending)
}

/// Sorts in the given direction.
pub fn order_by_with<T, F>(less: F, direction: Direction) -> OrderByBuilder<F>
where
    F: Fn(&T, &T) -> bool,
{
    OrderByBuilder::new(less, direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{from_range, lift};
    use std::cell::Cell;

    fn by_key(a: &(i32, char), b: &(i32, char)) -> bool {
        a.0 < b.0
    }

    #[test]
    fn test_order_by_ascending() {
        let stage = lift(vec![3, 1, 2]) >> order_by(|a: &i32, b: &i32| a < b);
        assert_eq!(stage.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_order_by_descending() {
        let stage = lift(vec![3, 1, 2]) >> order_by_descending(|a: &i32, b: &i32| a < b);
        assert_eq!(stage.iter().collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn test_order_by_is_stable() {
        let input = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')];
        let asc = lift(input.clone()) >> order_by(by_key);
        assert_eq!(
            asc.iter().collect::<Vec<_>>(),
            vec![(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]
        );

        let desc = lift(input) >> order_by_with(by_key, Direction::Descending);
        assert_eq!(
            desc.iter().collect::<Vec<_>>(),
            vec![(2, 'a'), (2, 'c'), (1, 'b'), (1, 'd')]
        );
    }

    #[test]
    fn test_order_by_realizes_lazily_and_once() {
        let calls = Cell::new(0);
        let stage = lift(vec![5, 4, 3, 2, 1])
            >> order_by(|a: &i32, b: &i32| {
                calls.set(calls.get() + 1);
                a < b
            });
        assert!(!stage.is_realized());
        assert_eq!(calls.get(), 0);

        let first: Vec<i32> = stage.iter().collect();
        assert!(stage.is_realized());
        let after_first = calls.get();
        assert!(after_first > 0);

        let second: Vec<i32> = stage.iter().collect();
        let _ = (stage.begin(), stage.end());
        assert_eq!(first, second);
        assert_eq!(calls.get(), after_first);
    }

    #[test]
    fn test_order_by_empty_never_compares() {
        let calls = Cell::new(0);
        let stage = from_range(0, 0)
            >> order_by(|a: &i64, b: &i64| {
                calls.set(calls.get() + 1);
                a < b
            });
        assert!(stage.is_empty());
        assert!(stage.begin() == stage.end());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_order_by_cursors_share_buffer() {
        let stage = lift(vec!['c', 'a', 'b']) >> order_by(|a: &char, b: &char| a < b);
        let mut a = stage.begin();
        let b = a.clone();
        a.advance();
        assert_eq!(a.index(), 1);
        assert_eq!(b.index(), 0);
        assert_eq!(a.read(), 'b');
        assert_eq!(b.read(), 'a');
        assert_eq!(stage.end().index(), 3);
    }

    #[test]
    fn test_clone_keeps_realized_buffer() {
        let stage = lift(vec![2, 1]) >> order_by(|a: &i32, b: &i32| a < b);
        let _ = stage.begin();
        let copy = stage.clone();
        assert!(copy.is_realized());
        assert_eq!(copy.iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_sorted_cursor_past_end() {
        let stage = lift(vec![1]) >> order_by(|a: &i32, b: &i32| a < b);
        let mut cursor = stage.end();
        assert_eq!(
            cursor.try_read(),
            Err(QueryError::past_end("order_by", Operation::Read))
        );
        assert!(cursor.try_advance().is_err());
    }
}
