// Schedule change event handling
// Provides event-driven notifications for timeline and roster mutations

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info};

/// Type of schedule change event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ScheduleChangeType {
    /// Day assignments were created or deleted
    DayAssignmentsChanged,
    /// Assignment groups were created, resized, merged, or split
    AssignmentGroupsChanged,
    /// An assignment was created or deleted
    AssignmentChanged,
    /// A milestone was created, updated, or deleted
    MilestoneChanged,
    /// A day off was created or deleted
    DayOffChanged,
}

impl std::fmt::Display for ScheduleChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleChangeType::DayAssignmentsChanged => write!(f, "DAY_ASSIGNMENTS_CHANGED"),
            ScheduleChangeType::AssignmentGroupsChanged => write!(f, "ASSIGNMENT_GROUPS_CHANGED"),
            ScheduleChangeType::AssignmentChanged => write!(f, "ASSIGNMENT_CHANGED"),
            ScheduleChangeType::MilestoneChanged => write!(f, "MILESTONE_CHANGED"),
            ScheduleChangeType::DayOffChanged => write!(f, "DAY_OFF_CHANGED"),
        }
    }
}

/// Schedule change event
///
/// Carries the scope a subscriber needs for targeted cache invalidation:
/// the assignment and the affected dates where they are known.
#[derive(Clone, Debug)]
pub struct ScheduleChangeEvent {
    /// Type of change
    pub change_type: ScheduleChangeType,
    /// The affected assignment, when the change is scoped to one
    pub assignment_id: Option<i64>,
    /// The affected project, for milestone and assignment changes
    pub project_id: Option<i64>,
    /// The affected member, for day off and assignment changes
    pub member_id: Option<i64>,
    /// The affected calendar days, when known
    pub dates: Vec<NaiveDate>,
    /// Timestamp of the event
    pub timestamp: i64,
}

impl ScheduleChangeEvent {
    /// Create a day assignments change event
    pub fn day_assignments_changed(assignment_id: i64, dates: Vec<NaiveDate>) -> Self {
        Self {
            change_type: ScheduleChangeType::DayAssignmentsChanged,
            assignment_id: Some(assignment_id),
            project_id: None,
            member_id: None,
            dates,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create an assignment groups change event
    pub fn assignment_groups_changed(assignment_id: i64) -> Self {
        Self {
            change_type: ScheduleChangeType::AssignmentGroupsChanged,
            assignment_id: Some(assignment_id),
            project_id: None,
            member_id: None,
            dates: Vec::new(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create an assignment change event
    pub fn assignment_changed(assignment_id: i64, project_id: i64, member_id: i64) -> Self {
        Self {
            change_type: ScheduleChangeType::AssignmentChanged,
            assignment_id: Some(assignment_id),
            project_id: Some(project_id),
            member_id: Some(member_id),
            dates: Vec::new(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create a milestone change event
    pub fn milestone_changed(project_id: i64, date: NaiveDate) -> Self {
        Self {
            change_type: ScheduleChangeType::MilestoneChanged,
            assignment_id: None,
            project_id: Some(project_id),
            member_id: None,
            dates: vec![date],
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create a day off change event
    pub fn day_off_changed(member_id: i64, date: NaiveDate) -> Self {
        Self {
            change_type: ScheduleChangeType::DayOffChanged,
            assignment_id: None,
            project_id: None,
            member_id: Some(member_id),
            dates: vec![date],
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Trait for handling schedule change events
#[async_trait::async_trait]
pub trait ScheduleChangeListener: Send + Sync {
    /// Called when a schedule change event occurs
    async fn on_schedule_change(&self, event: &ScheduleChangeEvent);
}

/// Schedule change event publisher
/// Manages subscriptions and broadcasts events to listeners
pub struct ScheduleChangeEventPublisher {
    /// Broadcast sender for events
    broadcast_tx: broadcast::Sender<ScheduleChangeEvent>,
    /// Registered listeners
    listeners: Arc<RwLock<Vec<Arc<dyn ScheduleChangeListener>>>>,
    /// Whether the publisher is running
    running: Arc<RwLock<bool>>,
}

impl ScheduleChangeEventPublisher {
    /// Create a new event publisher
    pub fn new(queue_size: usize) -> Self {
        let (broadcast_tx, _) = broadcast::channel(queue_size);

        Self {
            broadcast_tx,
            listeners: Arc::new(RwLock::new(Vec::new())),
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// Start the event publisher
    pub async fn start(&self) {
        let mut running = self.running.write().await;
        if *running {
            return;
        }
        *running = true;
        info!("Starting schedule change event publisher");
    }

    /// Stop the event publisher
    pub async fn stop(&self) {
        let mut running = self.running.write().await;
        *running = false;
        info!("Stopped schedule change event publisher");
    }

    /// Register a listener for schedule change events
    pub async fn register_listener(&self, listener: Arc<dyn ScheduleChangeListener>) {
        let mut listeners = self.listeners.write().await;
        listeners.push(listener);
        debug!(
            "Registered schedule change listener, total: {}",
            listeners.len()
        );
    }

    /// Publish a schedule change event
    pub async fn publish(&self, event: ScheduleChangeEvent) {
        let is_running = *self.running.read().await;
        if !is_running {
            return;
        }

        debug!("Publishing schedule change event: {}", event.change_type);

        // Broadcast to subscribers
        let _ = self.broadcast_tx.send(event.clone());

        // Notify listeners
        let listeners = self.listeners.read().await;
        for listener in listeners.iter() {
            listener.on_schedule_change(&event).await;
        }
    }

    /// Subscribe to schedule change events
    pub fn subscribe(&self) -> broadcast::Receiver<ScheduleChangeEvent> {
        self.broadcast_tx.subscribe()
    }
}

/// A simple logging listener for debugging
pub struct LoggingScheduleChangeListener;

#[async_trait::async_trait]
impl ScheduleChangeListener for LoggingScheduleChangeListener {
    async fn on_schedule_change(&self, event: &ScheduleChangeEvent) {
        match event.change_type {
            ScheduleChangeType::DayAssignmentsChanged => {
                debug!(
                    "[ScheduleEvent] Day assignments changed: assignment {:?}, {} day(s)",
                    event.assignment_id,
                    event.dates.len()
                );
            }
            ScheduleChangeType::AssignmentGroupsChanged => {
                debug!(
                    "[ScheduleEvent] Assignment groups changed: assignment {:?}",
                    event.assignment_id
                );
            }
            ScheduleChangeType::AssignmentChanged => {
                info!(
                    "[ScheduleEvent] Assignment changed: {:?} (project {:?}, member {:?})",
                    event.assignment_id, event.project_id, event.member_id
                );
            }
            ScheduleChangeType::MilestoneChanged => {
                debug!(
                    "[ScheduleEvent] Milestone changed: project {:?}",
                    event.project_id
                );
            }
            ScheduleChangeType::DayOffChanged => {
                debug!(
                    "[ScheduleEvent] Day off changed: member {:?}",
                    event.member_id
                );
            }
        }
    }
}
