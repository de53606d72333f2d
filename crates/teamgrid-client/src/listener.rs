//! Grid event listener trait and event types

use chrono::NaiveDate;

/// Event delivered to grid listeners when an assignment's timeline changes.
#[derive(Clone, Debug)]
pub struct GridChangeEvent {
    pub assignment_id: i64,
    pub dates: Vec<NaiveDate>,
}

/// Trait for receiving timeline change events.
///
/// Implement this to re-render cells after an optimistic edit is applied,
/// confirmed, or rolled back.
pub trait GridEventListener: Send + Sync + 'static {
    /// Called when the assignment's timeline has changed.
    fn on_event(&self, event: GridChangeEvent);
}

/// A simple listener that invokes a closure.
pub struct FnGridListener<F>
where
    F: Fn(GridChangeEvent) + Send + Sync + 'static,
{
    f: F,
}

impl<F> FnGridListener<F>
where
    F: Fn(GridChangeEvent) + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> GridEventListener for FnGridListener<F>
where
    F: Fn(GridChangeEvent) + Send + Sync + 'static,
{
    fn on_event(&self, event: GridChangeEvent) {
        (self.f)(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_fn_grid_listener() {
        let called = Arc::new(AtomicBool::new(false));
        let called_clone = called.clone();

        let listener = FnGridListener::new(move |event: GridChangeEvent| {
            assert_eq!(event.assignment_id, 12);
            called_clone.store(true, Ordering::SeqCst);
        });

        listener.on_event(GridChangeEvent {
            assignment_id: 12,
            dates: vec![],
        });

        assert!(called.load(Ordering::SeqCst));
    }
}
