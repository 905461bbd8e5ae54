//! # lazy-query
//!
//! Lazy, composable sequence queries.
//!
//! A query starts from a source stage and is extended one stage at a time
//! with the `>>` operator. Each stage exposes a begin/end pair of cursors;
//! nothing is evaluated until a cursor is read or advanced, except sorting,
//! which realizes its input once and caches the result.
//!
//! ## Overview
//!
//! - **Sources**: [`lift`] over any cloneable iterator, [`span`] over an
//!   explicit cursor pair, [`from_range`] and [`from_range_infinite`] over
//!   integers
//! - **Stages**: [`pass_through`], [`filter`], [`select`], [`select_many`],
//!   [`order_by`], [`zip_with`], [`trace`]
//! - **Termination**: a sequence ends when its current cursor compares equal
//!   to its end cursor
//!
//! ## Example
//!
//! ```
//! use lazy_query::{filter, from_range, select, Stage};
//!
//! let squares = from_range(1, 11)
//!     >> filter(|x: &i64| x % 2 == 0)
//!     >> select(|x: i64| x * x);
//!
//! let result: Vec<i64> = squares.iter().collect();
//! assert_eq!(result, vec![4, 16, 36, 64, 100]);
//! ```
//!
//! An unbounded range never reaches its end on its own; pair it with a
//! finite sequence:
//!
//! ```
//! use lazy_query::{from_range_infinite, lift, order_by_descending, select, zip_with};
//!
//! let reversed = lift("Hello, World!".chars())
//!     >> zip_with(from_range_infinite(0))
//!     >> order_by_descending(|a: &(char, i64), b: &(char, i64)| a.1 < b.1)
//!     >> select(|(c, _): (char, i64)| c);
//!
//! let text: String = reversed.into_iter().collect();
//! assert_eq!(text, "!dlroW ,olleH");
//! ```

pub mod cursor;
pub mod error;
pub mod filter;
pub mod observer;
pub mod order_by;
pub mod select;
pub mod select_many;
pub mod source;
pub mod stage;
pub mod zip;

pub use cursor::{Cursor, Iter, Operation};
pub use error::QueryError;
pub use filter::{Filter, FilterBuilder, FilterCursor, filter};
#[cfg(feature = "tracing")]
pub use observer::TracingObserver;
pub use observer::{NoopObserver, Observer, TraceBuilder, Traced, TracedCursor, trace, trace_with};
pub use order_by::{
    Direction, OrderBy, OrderByBuilder, SortedCursor, order_by, order_by_descending,
    order_by_with,
};
pub use select::{Select, SelectBuilder, SelectCursor, select};
pub use select_many::{SelectMany, SelectManyBuilder, SelectManyCursor, select_many};
pub use source::{
    IntCursor, IntRange, IterCursor, Lift, Span, from_range, from_range_infinite, lift, span,
};
pub use stage::{PassThrough, PassThroughBuilder, Stage, StageBuilder, pass_through};
pub use zip::{ZipCursor, ZipWith, ZipWithBuilder, zip_with};
