//! Project stage: maps each upstream element through a generator when read.

use crate::cursor::{Cursor, Operation};
use crate::error::QueryError;
use crate::stage::{Stage, StageBuilder, impl_compose};

/// Cursor of a [`Select`] stage. Positioned exactly like its upstream cursor.
#[derive(Clone)]
pub struct SelectCursor<C, G> {
    current: C,
    generator: G,
}

impl<C: PartialEq, G> PartialEq for SelectCursor<C, G> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<C, G, T> Cursor for SelectCursor<C, G>
where
    C: Cursor,
    G: Fn(C::Item) -> T + Clone,
{
    type Item = T;

    fn is_end(&self) -> bool {
        self.current.is_end()
    }

    fn try_read(&self) -> Result<T, QueryError> {
        if self.is_end() {
            return Err(QueryError::past_end("select", Operation::Read));
        }
        self.current.try_read().map(|item| (self.generator)(item))
    }

    fn try_advance(&mut self) -> Result<(), QueryError> {
        if self.is_end() {
            return Err(QueryError::past_end("select", Operation::Advance));
        }
        self.current.try_advance()
    }
}

/// Stage applying a generator to every upstream element.
#[derive(Clone)]
pub struct Select<S, G> {
    upstream: S,
    generator: G,
}

impl<S, G, T> Stage for Select<S, G>
where
    S: Stage,
    G: Fn(S::Item) -> T + Clone,
{
    type Item = T;
    type Cursor = SelectCursor<S::Cursor, G>;

    fn begin(&self) -> Self::Cursor {
        SelectCursor {
            current: self.upstream.begin(),
            generator: self.generator.clone(),
        }
    }

    fn end(&self) -> Self::Cursor {
        SelectCursor {
            current: self.upstream.end(),
            generator: self.generator.clone(),
        }
    }
}

impl_compose!([S, G] Select<S, G>);

/// Builder for [`Select`].
#[derive(Debug, Clone)]
pub struct SelectBuilder<G> {
    generator: G,
}

impl<S, G, T> StageBuilder<S> for SelectBuilder<G>
where
    S: Stage,
    G: Fn(S::Item) -> T + Clone,
{
    type Output = Select<S, G>;

    fn build(self, upstream: S) -> Self::Output {
        Select {
            upstream,
            generator: self.generator,
        }
    }
}

/// Maps every element through `generator`.
///
/// The generator runs each time an element is read and should be pure.
pub fn select<T, U, G>(generator: G) -> SelectBuilder<G>
where
    G: Fn(T) -> U + Clone,
{
    SelectBuilder { generator }
}
