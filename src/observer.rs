//! Diagnostic hook: observes the lifecycle of a stage without changing its
//! results.
//!
//! Wrap any stage with [`trace`] (no-op observer) or [`trace_with`] to get
//! `enter`/`exit` notifications for every begin, end, read and advance.
//! Nested traced stages produce nested notifications.

use std::fmt;
use std::rc::Rc;

use crate::cursor::{Cursor, Operation};
use crate::error::QueryError;
use crate::stage::{Stage, StageBuilder, impl_compose};

/// Receives notifications from a [`Traced`] stage and its cursors.
pub trait Observer {
    fn enter(&self, stage: &str, operation: Operation) {
        let _ = (stage, operation);
    }

    fn exit(&self, stage: &str, operation: Operation) {
        let _ = (stage, operation);
    }
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Observer forwarding notifications to `tracing` at trace level.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

#[cfg(feature = "tracing")]
impl Observer for TracingObserver {
    fn enter(&self, stage: &str, operation: Operation) {
        tracing::trace!(stage, %operation, "enter");
    }

    fn exit(&self, stage: &str, operation: Operation) {
        tracing::trace!(stage, %operation, "exit");
    }
}

/// Reports `enter` on creation and `exit` on drop.
struct Scope<'a, O: Observer> {
    observer: &'a O,
    stage: &'a str,
    operation: Operation,
}

impl<'a, O: Observer> Scope<'a, O> {
    fn enter(observer: &'a O, stage: &'a str, operation: Operation) -> Self {
        observer.enter(stage, operation);
        Self {
            observer,
            stage,
            operation,
        }
    }
}

impl<O: Observer> Drop for Scope<'_, O> {
    fn drop(&mut self) {
        self.observer.exit(self.stage, self.operation);
    }
}

/// Cursor of a [`Traced`] stage.
#[derive(Clone)]
pub struct TracedCursor<C, O> {
    inner: C,
    name: Rc<str>,
    observer: O,
}

impl<C: PartialEq, O> PartialEq for TracedCursor<C, O> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<C, O> Cursor for TracedCursor<C, O>
where
    C: Cursor,
    O: Observer + Clone,
{
    type Item = C::Item;

    fn is_end(&self) -> bool {
        self.inner.is_end()
    }

    fn try_read(&self) -> Result<Self::Item, QueryError> {
        let _scope = Scope::enter(&self.observer, &self.name, Operation::Read);
        self.inner.try_read()
    }

    fn try_advance(&mut self) -> Result<(), QueryError> {
        let _scope = Scope::enter(&self.observer, &self.name, Operation::Advance);
        self.inner.try_advance()
    }
}

/// Stage reporting its lifecycle to an observer; yields the upstream
/// elements unchanged.
#[derive(Clone)]
pub struct Traced<S, O> {
    upstream: S,
    name: Rc<str>,
    observer: O,
}

impl<S, O> Traced<S, O> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<S: fmt::Debug, O> fmt::Debug for Traced<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traced")
            .field("name", &self.name)
            .field("upstream", &self.upstream)
            .finish_non_exhaustive()
    }
}

impl<S, O> Traced<S, O>
where
    S: Stage,
    O: Observer + Clone,
{
    fn wrap(&self, inner: S::Cursor) -> TracedCursor<S::Cursor, O> {
        TracedCursor {
            inner,
            name: Rc::clone(&self.name),
            observer: self.observer.clone(),
        }
    }
}

impl<S, O> Stage for Traced<S, O>
where
    S: Stage,
    O: Observer + Clone,
{
    type Item = S::Item;
    type Cursor = TracedCursor<S::Cursor, O>;

    fn begin(&self) -> Self::Cursor {
        let _scope = Scope::enter(&self.observer, &self.name, Operation::Begin);
        self.wrap(self.upstream.begin())
    }

    fn end(&self) -> Self::Cursor {
        let _scope = Scope::enter(&self.observer, &self.name, Operation::End);
        self.wrap(self.upstream.end())
    }
}

impl_compose!([S, O] Traced<S, O>);

/// Builder for [`Traced`].
#[derive(Debug, Clone)]
pub struct TraceBuilder<O> {
    name: Rc<str>,
    observer: O,
}

impl<S, O> StageBuilder<S> for TraceBuilder<O>
where
    S: Stage,
    O: Observer + Clone,
{
    type Output = Traced<S, O>;

    fn build(self, upstream: S) -> Self::Output {
        Traced {
            upstream,
            name: self.name,
            observer: self.observer,
        }
    }
}

/// Names the upstream stage for tracing, with a no-op observer.
pub fn trace(name: impl Into<Rc<str>>) -> TraceBuilder<NoopObserver> {
    trace_with(name, NoopObserver)
}

/// Names the upstream stage and reports its lifecycle to `observer`.
pub fn trace_with<O: Observer + Clone>(name: impl Into<Rc<str>>, observer: O) -> TraceBuilder<O> {
    TraceBuilder {
        name: name.into(),
        observer,
    }
}
