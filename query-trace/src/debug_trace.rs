//! Debug trace types for traced query stages.
//!
//! A [`TraceRecorder`] is an [`Observer`]: attach it to stages with
//! `trace_with(name, recorder.clone())` and every notification is appended
//! to a shared event log.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use lazy_query::{Observer, Operation};

/// Whether an event marks the start or the end of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Enter,
    Exit,
}

/// One recorded notification.
///
/// `depth` is the number of operations already open when the event was
/// recorded; an operation's enter and exit share the same depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub depth: usize,
    pub stage: String,
    pub operation: Operation,
    pub phase: Phase,
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self.phase {
            Phase::Enter => "enter",
            Phase::Exit => "exit",
        };
        write!(
            f,
            "[{}] \t{}::{} {}",
            self.depth, self.stage, self.operation, phase
        )
    }
}

#[derive(Debug, Default)]
struct RecorderState {
    depth: usize,
    events: Vec<TraceEvent>,
}

/// Observer that records events into a log shared by all its clones.
#[derive(Debug, Clone, Default)]
pub struct TraceRecorder {
    state: Rc<RefCell<RecorderState>>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every event recorded so far.
    pub fn events(&self) -> Vec<TraceEvent> {
        self.state.borrow().events.clone()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().events.is_empty()
    }

    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.depth = 0;
        state.events.clear();
    }

    /// Counts recorded `Enter` events for the given stage and operation.
    pub fn count(&self, stage: &str, operation: Operation) -> usize {
        self.state
            .borrow()
            .events
            .iter()
            .filter(|e| e.phase == Phase::Enter && e.stage == stage && e.operation == operation)
            .count()
    }

    /// Renders the log, one event per line.
    pub fn render(&self) -> String {
        self.state
            .borrow()
            .events
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Observer for TraceRecorder {
    fn enter(&self, stage: &str, operation: Operation) {
        let mut state = self.state.borrow_mut();
        let depth = state.depth;
        state.events.push(TraceEvent {
            depth,
            stage: stage.to_string(),
            operation,
            phase: Phase::Enter,
        });
        state.depth += 1;
    }

    fn exit(&self, stage: &str, operation: Operation) {
        let mut state = self.state.borrow_mut();
        state.depth = state.depth.saturating_sub(1);
        let depth = state.depth;
        state.events.push(TraceEvent {
            depth,
            stage: stage.to_string(),
            operation,
            phase: Phase::Exit,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_query::{
        Cursor, Stage, filter, from_range, lift, order_by, select, trace_with, zip_with,
    };

    #[test]
    fn test_trace_event_display() {
        let event = TraceEvent {
            depth: 2,
            stage: "where".to_string(),
            operation: Operation::Advance,
            phase: Phase::Exit,
        };
        assert_eq!(event.to_string(), "[2] \twhere::advance exit");
    }

    #[test]
    fn test_recorder_depth_nesting() {
        let recorder = TraceRecorder::new();
        recorder.enter("outer", Operation::Read);
        recorder.enter("inner", Operation::Read);
        recorder.exit("inner", Operation::Read);
        recorder.exit("outer", Operation::Read);

        let depths: Vec<usize> = recorder.events().iter().map(|e| e.depth).collect();
        assert_eq!(depths, vec![0, 1, 1, 0]);
        assert_eq!(recorder.len(), 4);
    }

    #[test]
    fn test_recorder_clear() {
        let recorder = TraceRecorder::new();
        recorder.enter("a", Operation::Begin);
        recorder.clear();
        assert!(recorder.is_empty());
        assert_eq!(recorder.render(), "");
    }

    #[test]
    fn test_filter_skips_without_extra_reads() {
        let recorder = TraceRecorder::new();
        let query = from_range(0, 6)
            >> trace_with("source", recorder.clone())
            >> filter(|x: &i64| x % 3 == 2)
            >> trace_with("where", recorder.clone());

        let result: Vec<i64> = query.iter().collect();
        assert_eq!(result, vec![2, 5]);
        // Every source element is read exactly once by the filter scan, and
        // once more for each element actually yielded.
        assert_eq!(recorder.count("source", Operation::Read), 6 + 2);
        assert_eq!(recorder.count("where", Operation::Read), 2);
        assert_eq!(recorder.count("where", Operation::Advance), 2);
    }

    #[test]
    fn test_take_does_not_advance_past_last_taken() {
        let recorder = TraceRecorder::new();
        let query = from_range(0, 6) >> trace_with("source", recorder.clone());

        let first: Vec<i64> = query.iter().take(1).collect();
        assert_eq!(first, vec![0]);
        assert_eq!(recorder.count("source", Operation::Read), 1);
        assert_eq!(recorder.count("source", Operation::Advance), 0);
    }

    #[test]
    fn test_sort_reads_upstream_once() {
        let recorder = TraceRecorder::new();
        let query = lift(vec![3, 1, 2])
            >> trace_with("source", recorder.clone())
            >> order_by(|a: &i32, b: &i32| a < b);

        let first: Vec<i32> = query.iter().collect();
        let second: Vec<i32> = query.iter().collect();
        assert_eq!(first, second);
        assert_eq!(recorder.count("source", Operation::Begin), 1);
        assert_eq!(recorder.count("source", Operation::Read), 3);
    }

    #[test]
    fn test_nothing_recorded_before_iteration() {
        let recorder = TraceRecorder::new();
        let query = lift("ab".chars())
            >> trace_with("chars", recorder.clone())
            >> zip_with(from_range(0, 2))
            >> select(|(c, i): (char, i64)| format!("{c}{i}"));
        assert!(recorder.is_empty());

        let cursor = query.begin();
        assert_eq!(cursor.read(), "a0");
        assert_eq!(recorder.count("chars", Operation::Begin), 1);
        assert_eq!(recorder.count("chars", Operation::Read), 1);
    }
}
