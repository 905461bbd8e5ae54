//! Filter stage: yields only the upstream elements that satisfy a predicate.

use std::fmt;

use crate::cursor::{Cursor, Operation};
use crate::error::QueryError;
use crate::stage::{Stage, StageBuilder, impl_compose};

/// Cursor of a [`Filter`] stage.
///
/// Always either at the upstream end or on an element that satisfies the
/// predicate.
#[derive(Clone)]
pub struct FilterCursor<C, P> {
    current: C,
    last: C,
    predicate: P,
}

impl<C, P> FilterCursor<C, P>
where
    C: Cursor,
    P: Fn(&C::Item) -> bool,
{
    fn seek(current: C, last: C, predicate: P) -> Self {
        let mut cursor = Self {
            current,
            last,
            predicate,
        };
        if let Err(err) = cursor.skip_rejected() {
            panic!("{err}");
        }
        cursor
    }

    /// Steps forward until the current element satisfies the predicate or
    /// the upstream end is reached.
    fn skip_rejected(&mut self) -> Result<(), QueryError> {
        while self.current != self.last {
            if (self.predicate)(&self.current.try_read()?) {
                break;
            }
            self.current.try_advance()?;
        }
        Ok(())
    }
}

impl<C: PartialEq, P> PartialEq for FilterCursor<C, P> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<C, P> Cursor for FilterCursor<C, P>
where
    C: Cursor,
    P: Fn(&C::Item) -> bool + Clone,
{
    type Item = C::Item;

    fn is_end(&self) -> bool {
        self.current == self.last
    }

    fn try_read(&self) -> Result<Self::Item, QueryError> {
        if self.is_end() {
            return Err(QueryError::past_end("filter", Operation::Read));
        }
        self.current.try_read()
    }

    fn try_advance(&mut self) -> Result<(), QueryError> {
        if self.is_end() {
            return Err(QueryError::past_end("filter", Operation::Advance));
        }
        self.current.try_advance()?;
        self.skip_rejected()
    }
}

/// Stage yielding the upstream elements for which the predicate holds.
#[derive(Clone)]
pub struct Filter<S, P> {
    upstream: S,
    predicate: P,
}

impl<S: fmt::Debug, P> fmt::Debug for Filter<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("upstream", &self.upstream)
            .finish_non_exhaustive()
    }
}

impl<S, P> Stage for Filter<S, P>
where
    S: Stage,
    P: Fn(&S::Item) -> bool + Clone,
{
    type Item = S::Item;
    type Cursor = FilterCursor<S::Cursor, P>;

    /// Scans forward to the first matching element.
    ///
    /// # Panics
    ///
    /// Panics if the scan overflows an integer range.
    fn begin(&self) -> Self::Cursor {
        FilterCursor::seek(
            self.upstream.begin(),
            self.upstream.end(),
            self.predicate.clone(),
        )
    }

    fn end(&self) -> Self::Cursor {
        let last = self.upstream.end();
        FilterCursor {
            current: last.clone(),
            last,
            predicate: self.predicate.clone(),
        }
    }
}

impl_compose!([S, P] Filter<S, P>);

/// Builder for [`Filter`].
#[derive(Debug, Clone)]
pub struct FilterBuilder<P> {
    predicate: P,
}

impl<S, P> StageBuilder<S> for FilterBuilder<P>
where
    S: Stage,
    P: Fn(&S::Item) -> bool + Clone,
{
    type Output = Filter<S, P>;

    fn build(self, upstream: S) -> Self::Output {
        Filter {
            upstream,
            predicate: self.predicate,
        }
    }
}

/// Keeps only the elements for which `predicate` returns `true`.
pub fn filter<T, P>(predicate: P) -> FilterBuilder<P>
where
    P: Fn(&T) -> bool + Clone,
{
    FilterBuilder { predicate }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{from_range, from_range_infinite, lift};
    use std::cell::Cell;

    #[test]
    fn test_filter_keeps_matching_in_order() {
        let stage = lift(vec![5, 2, 8, 3, 6]) >> filter(|x: &i32| x % 2 == 0);
        assert_eq!(stage.iter().collect::<Vec<_>>(), vec![2, 8, 6]);
    }

    #[test]
    fn test_filter_first_element_rejected() {
        let stage = lift("xxaxb".chars()) >> filter(|c: &char| *c != 'x');
        assert_eq!(stage.iter().collect::<String>(), "ab");
    }

    #[test]
    fn test_filter_empty_source() {
        let stage = lift(Vec::<i32>::new()) >> filter(|_: &i32| true);
        assert!(stage.begin() == stage.end());
        assert_eq!(stage.iter().count(), 0);
    }

    #[test]
    fn test_filter_nothing_matches() {
        let stage = from_range(0, 10) >> filter(|x: &i64| *x > 100);
        assert!(stage.is_empty());
    }

    #[test]
    fn test_filter_begin_is_on_match() {
        let stage = from_range(0, 10) >> filter(|x: &i64| x % 4 == 3);
        let cursor = stage.begin();
        assert_eq!(cursor.read(), 3);
        assert!(!cursor.is_end());
    }

    #[test]
    fn test_filter_equality_ignores_predicate() {
        let stage = from_range(0, 5) >> filter(|x: &i64| *x >= 2);
        let mut a = stage.begin();
        let b = stage.begin();
        assert!(a == b);
        a.advance();
        assert!(a != b);
    }

    #[test]
    fn test_filter_over_infinite_range_with_cap() {
        let stage = from_range_infinite(1) >> filter(|x: &i64| x % 3 == 0);
        assert_eq!(stage.iter().take(3).collect::<Vec<_>>(), vec![3, 6, 9]);
    }

    #[test]
    fn test_filter_is_lazy() {
        let calls = Cell::new(0);
        let stage = from_range(0, 100) >> filter(|x: &i64| {
            calls.set(calls.get() + 1);
            x % 10 == 0
        });
        assert_eq!(calls.get(), 0);
        let mut cursor = stage.begin();
        assert_eq!(calls.get(), 1);
        cursor.advance();
        assert_eq!(cursor.read(), 10);
        assert_eq!(calls.get(), 11);
    }

    #[test]
    fn test_filter_cursor_past_end() {
        let stage = from_range(0, 3) >> filter(|x: &i64| *x == 2);
        let mut cursor = stage.begin();
        cursor.advance();
        assert!(cursor.is_end());
        assert_eq!(
            cursor.try_read(),
            Err(QueryError::past_end("filter", Operation::Read))
        );
        assert_eq!(
            cursor.try_advance(),
            Err(QueryError::past_end("filter", Operation::Advance))
        );
    }
}
