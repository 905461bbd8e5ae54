//! Error types for cursor operations.

use thiserror::Error;

use crate::cursor::Operation;

/// Errors raised by the checked cursor operations.
///
/// Reaching the end of a sequence is not an error; it is signalled by the
/// current cursor comparing equal to the end cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A read or advance was attempted on a cursor that is already at its end.
    #[error("cannot {operation} past the end of a {stage} sequence")]
    PastEnd {
        stage: &'static str,
        operation: Operation,
    },

    /// An integer range was advanced beyond `i64::MAX`.
    #[error("integer range overflowed after {at}")]
    RangeOverflow { at: i64 },
}

impl QueryError {
    pub(crate) fn past_end(stage: &'static str, operation: Operation) -> Self {
        QueryError::PastEnd { stage, operation }
    }
}
