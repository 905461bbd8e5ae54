//! Lifecycle tracing for lazy-query pipelines.
//!
//! This crate provides an observer that records every begin, end, read and
//! advance of traced stages, with nesting depth, so the on-demand evaluation
//! order of a pipeline can be inspected after the fact.

pub mod debug_trace;

pub use debug_trace::{Phase, TraceEvent, TraceRecorder};
