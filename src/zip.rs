//! Zip stage: walks two independent stages in lockstep.

use crate::cursor::{Cursor, Operation};
use crate::error::QueryError;
use crate::stage::{Stage, StageBuilder, impl_compose};

/// Cursor of a [`ZipWith`] stage.
///
/// Two zip cursors are equal as soon as either side matches its
/// counterpart, so the zipped sequence ends when the shorter side ends.
#[derive(Debug, Clone)]
pub struct ZipCursor<A, B> {
    left: A,
    right: B,
}

impl<A: PartialEq, B: PartialEq> PartialEq for ZipCursor<A, B> {
    fn eq(&self, other: &Self) -> bool {
        self.left == other.left || self.right == other.right
    }
}

impl<A: Cursor, B: Cursor> Cursor for ZipCursor<A, B> {
    type Item = (A::Item, B::Item);

    fn is_end(&self) -> bool {
        self.left.is_end() || self.right.is_end()
    }

    fn try_read(&self) -> Result<Self::Item, QueryError> {
        if self.is_end() {
            return Err(QueryError::past_end("zip_with", Operation::Read));
        }
        Ok((self.left.try_read()?, self.right.try_read()?))
    }

    fn try_advance(&mut self) -> Result<(), QueryError> {
        if self.is_end() {
            return Err(QueryError::past_end("zip_with", Operation::Advance));
        }
        let mut left = self.left.clone();
        let mut right = self.right.clone();
        left.try_advance()?;
        right.try_advance()?;
        self.left = left;
        self.right = right;
        Ok(())
    }
}

/// Stage pairing the elements of two stages.
#[derive(Debug, Clone)]
pub struct ZipWith<S, O> {
    upstream: S,
    other: O,
}

impl<S: Stage, O: Stage> Stage for ZipWith<S, O> {
    type Item = (S::Item, O::Item);
    type Cursor = ZipCursor<S::Cursor, O::Cursor>;

    fn begin(&self) -> Self::Cursor {
        ZipCursor {
            left: self.upstream.begin(),
            right: self.other.begin(),
        }
    }

    fn end(&self) -> Self::Cursor {
        ZipCursor {
            left: self.upstream.end(),
            right: self.other.end(),
        }
    }
}

impl_compose!([S, O] ZipWith<S, O>);

/// Builder for [`ZipWith`]; owns the second stage.
#[derive(Debug, Clone)]
pub struct ZipWithBuilder<O> {
    other: O,
}

impl<S: Stage, O: Stage> StageBuilder<S> for ZipWithBuilder<O> {
    type Output = ZipWith<S, O>;

    fn build(self, upstream: S) -> Self::Output {
        ZipWith {
            upstream,
            other: self.other,
        }
    }
}

/// Pairs each element with the element at the same position in `other`.
///
/// Yields as many pairs as the shorter of the two stages. Zipping two
/// unbounded stages never terminates.
pub fn zip_with<O: Stage>(other: O) -> ZipWithBuilder<O> {
    ZipWithBuilder { other }
}
