//! Flattening stage: expands each upstream element into a sequence and
//! yields the concatenation of those sequences.

use crate::cursor::{Cursor, Operation};
use crate::error::QueryError;
use crate::source::IterCursor;
use crate::stage::{Stage, StageBuilder, impl_compose};

/// Cursor of a [`SelectMany`] stage.
///
/// Either at the upstream end, or on an element of a non-empty inner
/// sequence. Empty inner sequences are skipped.
pub struct SelectManyCursor<C, F, I: Iterator> {
    outer: C,
    last: C,
    inner: Option<IterCursor<I>>,
    expand: F,
}

impl<C, F, I> Clone for SelectManyCursor<C, F, I>
where
    C: Clone,
    F: Clone,
    I: Iterator + Clone,
    I::Item: Clone,
{
    fn clone(&self) -> Self {
        Self {
            outer: self.outer.clone(),
            last: self.last.clone(),
            inner: self.inner.clone(),
            expand: self.expand.clone(),
        }
    }
}

impl<C: PartialEq, F, I: Iterator> PartialEq for SelectManyCursor<C, F, I> {
    fn eq(&self, other: &Self) -> bool {
        if self.outer != other.outer {
            return false;
        }
        if self.outer == self.last {
            return true;
        }
        self.inner == other.inner
    }
}

impl<C, F, U, I> SelectManyCursor<C, F, I>
where
    C: Cursor,
    F: Fn(C::Item) -> U,
    U: IntoIterator<IntoIter = I>,
    I: Iterator + Clone,
    I::Item: Clone,
{
    fn seek(outer: C, last: C, expand: F) -> Self {
        let mut cursor = Self {
            outer,
            last,
            inner: None,
            expand,
        };
        if let Err(err) = cursor.fill() {
            panic!("{err}");
        }
        cursor
    }

    /// Expands upstream elements until one yields a non-empty sequence or
    /// the upstream end is reached.
    fn fill(&mut self) -> Result<(), QueryError> {
        while self.outer != self.last {
            let inner = IterCursor::start((self.expand)(self.outer.try_read()?).into_iter());
            if !inner.is_end() {
                self.inner = Some(inner);
                return Ok(());
            }
            self.outer.try_advance()?;
        }
        self.inner = None;
        Ok(())
    }
}

impl<C, F, U, I> Cursor for SelectManyCursor<C, F, I>
where
    C: Cursor,
    F: Fn(C::Item) -> U + Clone,
    U: IntoIterator<IntoIter = I>,
    I: Iterator + Clone,
    I::Item: Clone,
{
    type Item = I::Item;

    fn is_end(&self) -> bool {
        self.outer == self.last
    }

    fn try_read(&self) -> Result<Self::Item, QueryError> {
        match &self.inner {
            Some(inner) if !self.is_end() => inner.try_read(),
            _ => Err(QueryError::past_end("select_many", Operation::Read)),
        }
    }

    fn try_advance(&mut self) -> Result<(), QueryError> {
        if self.is_end() {
            return Err(QueryError::past_end("select_many", Operation::Advance));
        }
        let Some(inner) = self.inner.as_mut() else {
            return Err(QueryError::past_end("select_many", Operation::Advance));
        };
        inner.try_advance()?;
        if inner.is_end() {
            self.outer.try_advance()?;
            self.fill()?;
        }
        Ok(())
    }
}

/// Stage concatenating the sequences produced by an expansion function.
#[derive(Clone)]
pub struct SelectMany<S, F> {
    upstream: S,
    expand: F,
}

impl<S, F, U> Stage for SelectMany<S, F>
where
    S: Stage,
    F: Fn(S::Item) -> U + Clone,
    U: IntoIterator,
    U::IntoIter: Clone,
    U::Item: Clone,
{
    type Item = U::Item;
    type Cursor = SelectManyCursor<S::Cursor, F, U::IntoIter>;

    fn begin(&self) -> Self::Cursor {
        SelectManyCursor::seek(
            self.upstream.begin(),
            self.upstream.end(),
            self.expand.clone(),
        )
    }

    fn end(&self) -> Self::Cursor {
        let last = self.upstream.end();
        SelectManyCursor {
            outer: last.clone(),
            last,
            inner: None,
            expand: self.expand.clone(),
        }
    }
}

impl_compose!([S, F] SelectMany<S, F>);

/// Builder for [`SelectMany`].
#[derive(Debug, Clone)]
pub struct SelectManyBuilder<F> {
    expand: F,
}

impl<S, F, U> StageBuilder<S> for SelectManyBuilder<F>
where
    S: Stage,
    F: Fn(S::Item) -> U + Clone,
    U: IntoIterator,
    U::IntoIter: Clone,
    U::Item: Clone,
{
    type Output = SelectMany<S, F>;

    fn build(self, upstream: S) -> Self::Output {
        SelectMany {
            upstream,
            expand: self.expand,
        }
    }
}

/// Expands every element into a sequence and flattens the results.
pub fn select_many<T, U, F>(expand: F) -> SelectManyBuilder<F>
where
    F: Fn(T) -> U + Clone,
    U: IntoIterator,
{
    SelectManyBuilder { expand }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order_by::order_by;
    use crate::source::{from_range, lift};

    #[test]
    fn test_select_many_flattens() {
        let stage = lift(vec!["ab", "c"]) >> select_many(|s: &str| s.chars().collect::<Vec<_>>());
        assert_eq!(stage.iter().collect::<String>(), "abc");
    }

    #[test]
    fn test_select_many_skips_empty_inner() {
        let stage = from_range(0, 5) >> select_many(|n: i64| vec![n; n as usize % 3]);
        assert_eq!(stage.iter().collect::<Vec<_>>(), vec![1, 2, 2, 4]);
    }

    #[test]
    fn test_select_many_all_empty() {
        let stage = from_range(0, 4) >> select_many(|_: i64| Vec::<i64>::new());
        assert!(stage.is_empty());
        assert!(stage.begin() == stage.end());
    }

    #[test]
    fn test_select_many_ranges() {
        let stage = from_range(1, 4) >> select_many(|n: i64| 0..n);
        assert_eq!(stage.iter().collect::<Vec<_>>(), vec![0, 0, 1, 0, 1, 2]);
    }

    #[test]
    fn test_select_many_then_sort() {
        let stage = lift(vec!["cab", "", "d"])
            >> select_many(|s: &str| s.chars().collect::<Vec<_>>())
            >> order_by(|a: &char, b: &char| a < b);
        assert_eq!(stage.iter().collect::<String>(), "abcd");
    }

    #[test]
    fn test_select_many_cursor_equality() {
        let stage = lift(vec![2usize, 2]) >> select_many(|n: usize| vec!['x'; n]);
        let mut a = stage.begin();
        let b = stage.begin();
        assert!(a == b);
        a.advance();
        assert!(a != b);
        a.advance();
        a.advance();
        a.advance();
        assert!(a == stage.end());
        assert_eq!(
            a.try_advance(),
            Err(QueryError::past_end("select_many", Operation::Advance))
        );
    }
}
