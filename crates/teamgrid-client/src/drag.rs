//! Pointer-driven drag controller
//!
//! Client-local state machine for drag-to-create, drag-to-delete, and
//! drag-to-move interactions. The state lives outside any render tree;
//! cells subscribe per date and are only notified when their own highlight
//! state may have changed, so a pointer-move never forces a full-grid
//! re-render.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use dashmap::DashMap;

use crate::listener::{GridChangeEvent, GridEventListener};

/// What a press starts, derived from buttons and modifier keys
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressModifier {
    /// Plain primary-button press
    Plain,
    /// Secondary button or platform modifier held
    Delete,
    /// Alternate modifier held
    Move,
}

/// Active drag mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Create,
    Delete,
    Move,
}

/// Drag controller state
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging {
        mode: DragMode,
        assignment_id: i64,
        anchor: NaiveDate,
        current: NaiveDate,
        /// Maximal contiguous assigned run containing the anchor, move mode only
        move_source: Option<(NaiveDate, NaiveDate)>,
        /// Days between the source start and the anchor, move mode only
        anchor_offset: i64,
    },
}

/// Mutation resolved from a finished drag
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    CreateRange {
        assignment_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    DeleteRange {
        assignment_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    MoveBlock {
        assignment_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        new_start_date: NaiveDate,
        new_end_date: NaiveDate,
    },
}

/// Drag state machine with per-cell change notification
pub struct DragController {
    state: DragState,
    cell_listeners: DashMap<NaiveDate, Vec<Arc<dyn GridEventListener>>>,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
            cell_listeners: DashMap::new(),
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Register a listener for one date cell.
    pub fn subscribe_cell(&self, date: NaiveDate, listener: Arc<dyn GridEventListener>) {
        self.cell_listeners.entry(date).or_default().push(listener);
    }

    /// Remove all listeners of one date cell.
    pub fn unsubscribe_cell(&self, date: NaiveDate) {
        self.cell_listeners.remove(&date);
    }

    /// Pointer press on a date cell.
    ///
    /// `assigned` is the current day set of the pressed assignment. A plain
    /// press on an unassigned cell starts a create drag; a delete-modifier
    /// press on an assigned cell starts a delete drag; a move-modifier press
    /// on an assigned cell starts a move drag, capturing the contiguous
    /// block under the anchor. Any other combination is ignored.
    pub fn press(
        &mut self,
        assignment_id: i64,
        date: NaiveDate,
        assigned: &BTreeSet<NaiveDate>,
        modifier: PressModifier,
    ) {
        if self.state != DragState::Idle {
            return;
        }

        let is_assigned = assigned.contains(&date);
        let next = match modifier {
            PressModifier::Plain if !is_assigned => DragState::Dragging {
                mode: DragMode::Create,
                assignment_id,
                anchor: date,
                current: date,
                move_source: None,
                anchor_offset: 0,
            },
            PressModifier::Delete if is_assigned => DragState::Dragging {
                mode: DragMode::Delete,
                assignment_id,
                anchor: date,
                current: date,
                move_source: None,
                anchor_offset: 0,
            },
            PressModifier::Move if is_assigned => {
                let (block_start, block_end) = contiguous_block(assigned, date);
                DragState::Dragging {
                    mode: DragMode::Move,
                    assignment_id,
                    anchor: date,
                    current: date,
                    move_source: Some((block_start, block_end)),
                    anchor_offset: (date - block_start).num_days(),
                }
            }
            _ => return,
        };

        self.transition(next);
    }

    /// Pointer entered a date cell while dragging.
    pub fn enter(&mut self, date: NaiveDate) {
        let next = match &self.state {
            DragState::Idle => return,
            DragState::Dragging {
                mode,
                assignment_id,
                anchor,
                move_source,
                anchor_offset,
                ..
            } => DragState::Dragging {
                mode: *mode,
                assignment_id: *assignment_id,
                anchor: *anchor,
                current: date,
                move_source: *move_source,
                anchor_offset: *anchor_offset,
            },
        };
        self.transition(next);
    }

    /// Pointer released.
    ///
    /// Valid regardless of where the pointer ended up; the outcome is
    /// resolved from the final state. A drag with no net effect resolves
    /// to `None`.
    pub fn release(&mut self) -> Option<DragOutcome> {
        let outcome = match &self.state {
            DragState::Idle => None,
            DragState::Dragging {
                mode,
                assignment_id,
                anchor,
                current,
                move_source,
                anchor_offset,
            } => {
                let (start_date, end_date) = normalized(*anchor, *current);
                match mode {
                    DragMode::Create => Some(DragOutcome::CreateRange {
                        assignment_id: *assignment_id,
                        start_date,
                        end_date,
                    }),
                    DragMode::Delete => Some(DragOutcome::DeleteRange {
                        assignment_id: *assignment_id,
                        start_date,
                        end_date,
                    }),
                    DragMode::Move => match move_source {
                        Some((source_start, source_end)) => {
                            let new_start_date = shift(*current, -*anchor_offset);
                            if new_start_date == *source_start {
                                None
                            } else {
                                let span = (*source_end - *source_start).num_days();
                                Some(DragOutcome::MoveBlock {
                                    assignment_id: *assignment_id,
                                    start_date: *source_start,
                                    end_date: *source_end,
                                    new_start_date,
                                    new_end_date: shift(new_start_date, span),
                                })
                            }
                        }
                        None => None,
                    },
                }
            }
        };

        self.transition(DragState::Idle);
        outcome
    }

    /// Abandon the drag without resolving an outcome.
    pub fn cancel(&mut self) {
        self.transition(DragState::Idle);
    }

    /// Swap in the next state and notify every cell whose highlight changed.
    fn transition(&mut self, next: DragState) {
        let before = affected_dates(&self.state);
        let after = affected_dates(&next);
        let assignment_id = match (&next, &self.state) {
            (DragState::Dragging { assignment_id, .. }, _) => *assignment_id,
            (_, DragState::Dragging { assignment_id, .. }) => *assignment_id,
            _ => 0,
        };

        self.state = next;

        for date in before.symmetric_difference(&after) {
            if let Some(listeners) = self.cell_listeners.get(date) {
                let event = GridChangeEvent {
                    assignment_id,
                    dates: vec![*date],
                };
                for listener in listeners.iter() {
                    listener.on_event(event.clone());
                }
            }
        }
    }
}

/// Dates whose rendering depends on the given state
fn affected_dates(state: &DragState) -> BTreeSet<NaiveDate> {
    match state {
        DragState::Idle => BTreeSet::new(),
        DragState::Dragging {
            mode: DragMode::Create | DragMode::Delete,
            anchor,
            current,
            ..
        } => {
            let (start, end) = normalized(*anchor, *current);
            range_dates(start, end)
        }
        DragState::Dragging {
            mode: DragMode::Move,
            current,
            move_source,
            anchor_offset,
            ..
        } => {
            let mut dates = BTreeSet::new();
            if let Some((source_start, source_end)) = move_source {
                dates.extend(range_dates(*source_start, *source_end));
                let span = (*source_end - *source_start).num_days();
                let dest_start = shift(*current, -*anchor_offset);
                dates.extend(range_dates(dest_start, shift(dest_start, span)));
            }
            dates
        }
    }
}

/// Maximal contiguous run of `days` containing `anchor`
fn contiguous_block(days: &BTreeSet<NaiveDate>, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
    let mut start = anchor;
    while let Some(prev) = start.pred_opt() {
        if !days.contains(&prev) {
            break;
        }
        start = prev;
    }
    let mut end = anchor;
    while let Some(next) = end.succ_opt() {
        if !days.contains(&next) {
            break;
        }
        end = next;
    }
    (start, end)
}

fn normalized(a: NaiveDate, b: NaiveDate) -> (NaiveDate, NaiveDate) {
    if a <= b { (a, b) } else { (b, a) }
}

fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

fn range_dates(start: NaiveDate, end: NaiveDate) -> BTreeSet<NaiveDate> {
    std::iter::successors(Some(start), |date| {
        date.succ_opt().filter(|next| *next <= end)
    })
    .collect()
}
