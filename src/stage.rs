//! The stage and builder traits, and the `>>` composition operator.
//!
//! A [`Stage`] exposes a begin/end cursor pair over its elements. A
//! [`StageBuilder`] holds only the parameters of a transformation and turns
//! an upstream stage into a new one. The type of the new stage is resolved
//! from the upstream stage and the builder at compile time.

use crate::cursor::{Cursor, Iter};

/// A lazily evaluated sequence.
pub trait Stage {
    /// The element type produced by this stage's cursors.
    type Item;

    /// The cursor type used to walk this stage.
    type Cursor: Cursor<Item = Self::Item>;

    /// Returns a cursor at the first element, or the end cursor if the stage
    /// has no elements.
    fn begin(&self) -> Self::Cursor;

    /// Returns the end sentinel.
    fn end(&self) -> Self::Cursor;

    /// Returns `true` if the stage yields no elements.
    fn is_empty(&self) -> bool {
        self.begin() == self.end()
    }

    /// Iterates the stage from begin to end.
    ///
    /// The iterator does not terminate on its own if the stage is unbounded.
    fn iter(&self) -> Iter<Self::Cursor> {
        Iter::new(self.begin(), self.end())
    }

    /// Applies a builder to this stage. Same as `self >> builder`.
    fn pipe<B>(self, builder: B) -> B::Output
    where
        Self: Sized,
        B: StageBuilder<Self>,
    {
        builder.build(self)
    }
}

/// Turns an upstream stage into a new stage.
pub trait StageBuilder<S: Stage> {
    /// The stage produced by [`build`](StageBuilder::build).
    type Output: Stage;

    fn build(self, upstream: S) -> Self::Output;
}

/// Implements `>>` and `IntoIterator` for a stage type.
///
/// Takes the impl generics in brackets followed by the type, e.g.
/// `impl_compose!([S, P] Filter<S, P>);`.
macro_rules! impl_compose {
    ([$($params:tt)*] $ty:ty) => {
        impl<$($params)*, B> std::ops::Shr<B> for $ty
        where
            $ty: $crate::stage::Stage,
            B: $crate::stage::StageBuilder<$ty>,
        {
            type Output = B::Output;

            fn shr(self, builder: B) -> Self::Output {
                builder.build(self)
            }
        }

        impl<$($params)*> IntoIterator for $ty
        where
            $ty: $crate::stage::Stage,
        {
            type Item = <$ty as $crate::stage::Stage>::Item;
            type IntoIter = $crate::cursor::Iter<<$ty as $crate::stage::Stage>::Cursor>;

            fn into_iter(self) -> Self::IntoIter {
                $crate::stage::Stage::iter(&self)
            }
        }

        impl<'q, $($params)*> IntoIterator for &'q $ty
        where
            $ty: $crate::stage::Stage,
        {
            type Item = <$ty as $crate::stage::Stage>::Item;
            type IntoIter = $crate::cursor::Iter<<$ty as $crate::stage::Stage>::Cursor>;

            fn into_iter(self) -> Self::IntoIter {
                $crate::stage::Stage::iter(self)
            }
        }
    };
    ($ty:ty) => {
        impl<B> std::ops::Shr<B> for $ty
        where
            B: $crate::stage::StageBuilder<$ty>,
        {
            type Output = B::Output;

            fn shr(self, builder: B) -> Self::Output {
                builder.build(self)
            }
        }

        impl IntoIterator for $ty {
            type Item = <$ty as $crate::stage::Stage>::Item;
            type IntoIter = $crate::cursor::Iter<<$ty as $crate::stage::Stage>::Cursor>;

            fn into_iter(self) -> Self::IntoIter {
                $crate::stage::Stage::iter(&self)
            }
        }

        impl<'q> IntoIterator for &'q $ty {
            type Item = <$ty as $crate::stage::Stage>::Item;
            type IntoIter = $crate::cursor::Iter<<$ty as $crate::stage::Stage>::Cursor>;

            fn into_iter(self) -> Self::IntoIter {
                $crate::stage::Stage::iter(self)
            }
        }
    };
}

pub(crate) use impl_compose;

/// The identity stage: yields exactly the upstream elements.
#[derive(Debug, Clone)]
pub struct PassThrough<S> {
    upstream: S,
}

impl<S: Stage> Stage for PassThrough<S> {
    type Item = S::Item;
    type Cursor = S::Cursor;

    fn begin(&self) -> Self::Cursor {
        self.upstream.begin()
    }

    fn end(&self) -> Self::Cursor {
        self.upstream.end()
    }
}

impl_compose!([S] PassThrough<S>);

/// Builder for [`PassThrough`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughBuilder;

impl<S: Stage> StageBuilder<S> for PassThroughBuilder {
    type Output = PassThrough<S>;

    fn build(self, upstream: S) -> Self::Output {
        PassThrough { upstream }
    }
}

/// Creates an identity stage builder.
pub fn pass_through() -> PassThroughBuilder {
    PassThroughBuilder
}
