//! Timeline orchestrator
//!
//! Coordinates the cache, the transport, and the warning gate. Every
//! mutation is applied to the local cache first and dispatched to the
//! server afterwards; a rejected dispatch restores the cache from a
//! checkpoint taken before the edit. Concurrent edits from other clients
//! are reconciled by calling [`TimelineClient::refetch`].

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use dashmap::DashMap;
use tracing::debug;

use teamgrid_api::model::DateRangeQuery;
use teamgrid_api::timeline::model::{
    AssignmentGroupInfo, DayAssignmentInfo, MoveAssignmentBlockRequest,
};
use teamgrid_common::Priority;
use teamgrid_core::calendar::{NonWorkingReason, WorkSchedule, non_working_reasons};

use crate::cache::GridCache;
use crate::drag::DragOutcome;
use crate::error::{ClientError, Result};
use crate::listener::{GridChangeEvent, GridEventListener};
use crate::transport::ScheduleTransport;

/// A date a pending operation would touch even though it is non-working
#[derive(Clone, Debug, PartialEq)]
pub struct DateWarning {
    pub date: NaiveDate,
    pub reasons: Vec<NonWorkingReason>,
}

/// Result of a warning-gated operation
#[derive(Clone, Debug, PartialEq)]
pub enum ApplyOutcome<T> {
    /// The mutation was dispatched and confirmed by the server
    Applied(T),
    /// Nothing was dispatched; re-invoke with `confirmed` to proceed
    NeedsConfirmation(Vec<DateWarning>),
}

/// What a dispatched drag did
#[derive(Clone, Debug, PartialEq)]
pub enum DragEffect {
    Created(Vec<DayAssignmentInfo>),
    Deleted(usize),
    Moved { merged_days: u32 },
}

/// Client-side orchestrator for the assignment timeline
pub struct TimelineClient {
    transport: Arc<dyn ScheduleTransport>,
    cache: GridCache,
    subscriptions: DashMap<i64, Vec<Arc<dyn GridEventListener>>>,
    warn_non_working: bool,
}

impl TimelineClient {
    pub fn new(transport: Arc<dyn ScheduleTransport>) -> Self {
        Self {
            transport,
            cache: GridCache::new(),
            subscriptions: DashMap::new(),
            warn_non_working: true,
        }
    }

    /// Enable or disable the non-working-day confirmation gate.
    pub fn with_warnings_enabled(mut self, enabled: bool) -> Self {
        self.warn_non_working = enabled;
        self
    }

    pub fn cache(&self) -> &GridCache {
        &self.cache
    }

    /// Subscribe to timeline changes of one assignment.
    pub fn subscribe(&self, assignment_id: i64, listener: Arc<dyn GridEventListener>) {
        self.subscriptions
            .entry(assignment_id)
            .or_default()
            .push(listener);
    }

    /// Remove all listeners of one assignment.
    pub fn unsubscribe(&self, assignment_id: i64) {
        self.subscriptions.remove(&assignment_id);
    }

    fn notify(&self, assignment_id: i64, dates: Vec<NaiveDate>) {
        if let Some(listeners) = self.subscriptions.get(&assignment_id) {
            let event = GridChangeEvent {
                assignment_id,
                dates,
            };
            for listener in listeners.iter() {
                listener.on_event(event.clone());
            }
        }
    }

    /// Fetch a window of days and groups into the cache.
    pub async fn load_range(&self, query: &DateRangeQuery) -> Result<()> {
        let days = self.transport.fetch_days(query).await?;
        let groups = self.transport.fetch_groups(query).await?;
        debug!(
            "loaded {} days and {} groups for {}..{}",
            days.len(),
            groups.len(),
            query.start_date,
            query.end_date
        );
        self.cache.prime_days(days);
        self.cache.prime_groups(groups);
        Ok(())
    }

    /// Re-fetch a window, replacing whatever the cache held for it.
    ///
    /// This is the reconciliation path after edits from other clients.
    pub async fn refetch(&self, query: &DateRangeQuery) -> Result<()> {
        let days = self.transport.fetch_days(query).await?;
        let groups = self.transport.fetch_groups(query).await?;

        let mut touched: BTreeSet<i64> = self.assignments_in_window(query);
        self.cache.clear_window(query.start_date, query.end_date);
        for day in &days {
            touched.insert(day.assignment_id);
        }
        self.cache.prime_days(days);
        self.cache.prime_groups(groups);

        let window: Vec<NaiveDate> = dates_between(query.start_date, query.end_date);
        for assignment_id in touched {
            self.notify(assignment_id, window.clone());
        }
        Ok(())
    }

    fn assignments_in_window(&self, query: &DateRangeQuery) -> BTreeSet<i64> {
        self.subscriptions
            .iter()
            .map(|entry| *entry.key())
            .filter(|id| {
                self.cache
                    .assignment_days(*id)
                    .iter()
                    .any(|date| *date >= query.start_date && *date <= query.end_date)
            })
            .collect()
    }

    /// Evaluate the non-working-day warnings for a pending range.
    pub fn pending_warnings(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        schedule: &WorkSchedule,
        day_offs: &BTreeSet<NaiveDate>,
    ) -> Vec<DateWarning> {
        dates_between(start_date, end_date)
            .into_iter()
            .filter_map(|date| {
                let reasons = non_working_reasons(date, schedule, day_offs);
                if reasons.is_empty() {
                    None
                } else {
                    Some(DateWarning { date, reasons })
                }
            })
            .collect()
    }

    fn gate(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        schedule: &WorkSchedule,
        day_offs: &BTreeSet<NaiveDate>,
        confirmed: bool,
    ) -> Vec<DateWarning> {
        if !self.warn_non_working || confirmed {
            return Vec::new();
        }
        self.pending_warnings(start_date, end_date, schedule, day_offs)
    }

    /// Create one day assignment with an optional comment.
    pub async fn create_day(
        &self,
        assignment_id: i64,
        date: NaiveDate,
        comment: Option<String>,
        schedule: &WorkSchedule,
        day_offs: &BTreeSet<NaiveDate>,
        confirmed: bool,
    ) -> Result<ApplyOutcome<DayAssignmentInfo>> {
        let warnings = self.gate(date, date, schedule, day_offs, confirmed);
        if !warnings.is_empty() {
            return Ok(ApplyOutcome::NeedsConfirmation(warnings));
        }

        let checkpoint = self.cache.checkpoint(assignment_id);
        if self.cache.day_at(assignment_id, date).is_none() {
            self.cache.insert_day(DayAssignmentInfo {
                id: self.cache.provisional_id(),
                assignment_id,
                date,
                comment: comment.clone(),
            });
            self.notify(assignment_id, vec![date]);
        }

        match self.transport.create_day(assignment_id, date, comment).await {
            Ok(created) => {
                self.cache.remove_day(assignment_id, date);
                self.cache.insert_day(created.clone());
                self.notify(assignment_id, vec![date]);
                Ok(ApplyOutcome::Applied(created))
            }
            Err(err) => {
                self.cache.restore(checkpoint);
                self.notify(assignment_id, vec![date]);
                Err(rolled_back(err))
            }
        }
    }

    /// Create day assignments over an inclusive date range.
    ///
    /// Dates already assigned pass through untouched; the server plans the
    /// same way, so the batch is safe to send in full.
    pub async fn create_day_range(
        &self,
        assignment_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        schedule: &WorkSchedule,
        day_offs: &BTreeSet<NaiveDate>,
        confirmed: bool,
    ) -> Result<ApplyOutcome<Vec<DayAssignmentInfo>>> {
        let warnings = self.gate(start_date, end_date, schedule, day_offs, confirmed);
        if !warnings.is_empty() {
            return Ok(ApplyOutcome::NeedsConfirmation(warnings));
        }

        let dates = dates_between(start_date, end_date);
        let checkpoint = self.cache.checkpoint(assignment_id);
        let mut provisional = Vec::new();
        for date in &dates {
            if self.cache.day_at(assignment_id, *date).is_none() {
                self.cache.insert_day(DayAssignmentInfo {
                    id: self.cache.provisional_id(),
                    assignment_id,
                    date: *date,
                    comment: None,
                });
                provisional.push(*date);
            }
        }
        self.notify(assignment_id, dates.clone());

        match self.transport.create_days(assignment_id, dates.clone()).await {
            Ok(created) => {
                for date in provisional {
                    self.cache.remove_day(assignment_id, date);
                }
                self.cache.prime_days(created.clone());
                self.notify(assignment_id, dates);
                Ok(ApplyOutcome::Applied(created))
            }
            Err(err) => {
                self.cache.restore(checkpoint);
                self.notify(assignment_id, dates);
                Err(rolled_back(err))
            }
        }
    }

    /// Delete every assigned day in an inclusive date range.
    ///
    /// Returns how many rows were deleted. A range with nothing assigned
    /// dispatches nothing.
    pub async fn delete_day_range(
        &self,
        assignment_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<usize> {
        let dates = dates_between(start_date, end_date);
        let targets: Vec<DayAssignmentInfo> = dates
            .iter()
            .filter_map(|date| self.cache.day_at(assignment_id, *date))
            .collect();
        if targets.is_empty() {
            return Ok(0);
        }

        let checkpoint = self.cache.checkpoint(assignment_id);
        for day in &targets {
            self.cache.remove_day(assignment_id, day.date);
        }
        self.notify(assignment_id, dates.clone());

        let result = if let [single] = targets.as_slice() {
            self.transport.delete_day(single.id).await
        } else {
            self.transport
                .delete_days(targets.iter().map(|day| day.id).collect())
                .await
        };

        match result {
            Ok(()) => {
                self.notify(assignment_id, dates);
                Ok(targets.len())
            }
            Err(err) => {
                self.cache.restore(checkpoint);
                self.notify(assignment_id, dates);
                Err(rolled_back(err))
            }
        }
    }

    /// Create an assignment group over already-assigned days.
    ///
    /// A 409 from the server surfaces as [`ClientError::Conflict`] after
    /// rollback, carrying the existing group's id so the caller can offer a
    /// metadata update on it instead.
    pub async fn create_group(
        &self,
        assignment_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        priority: Priority,
        comment: Option<String>,
    ) -> Result<AssignmentGroupInfo> {
        let checkpoint = self.cache.checkpoint(assignment_id);
        let provisional_id = self.cache.provisional_id();
        self.cache.insert_group(AssignmentGroupInfo {
            id: provisional_id,
            assignment_id,
            start_date,
            end_date,
            priority,
            comment: comment.clone(),
        });
        let dates = dates_between(start_date, end_date);
        self.notify(assignment_id, dates.clone());

        match self
            .transport
            .create_group(assignment_id, start_date, end_date, priority, comment)
            .await
        {
            Ok(group) => {
                self.cache.remove_group(provisional_id);
                self.cache.insert_group(group.clone());
                self.notify(assignment_id, dates);
                Ok(group)
            }
            Err(err) => {
                self.cache.restore(checkpoint);
                self.notify(assignment_id, dates);
                Err(rolled_back(err))
            }
        }
    }

    /// Update the priority or comment of an assignment group.
    pub async fn update_group(
        &self,
        id: i64,
        priority: Option<Priority>,
        comment: Option<String>,
    ) -> Result<AssignmentGroupInfo> {
        let previous = self.cache.group(id);
        if let Some(group) = &previous {
            let mut updated = group.clone();
            if let Some(priority) = priority {
                updated.priority = priority;
            }
            if let Some(comment) = &comment {
                updated.comment = if comment.is_empty() {
                    None
                } else {
                    Some(comment.clone())
                };
            }
            self.cache.insert_group(updated.clone());
            self.notify(
                updated.assignment_id,
                dates_between(updated.start_date, updated.end_date),
            );
        }

        match self.transport.update_group(id, priority, comment).await {
            Ok(group) => {
                self.cache.insert_group(group.clone());
                self.notify(
                    group.assignment_id,
                    dates_between(group.start_date, group.end_date),
                );
                Ok(group)
            }
            Err(err) => {
                if let Some(group) = previous {
                    let assignment_id = group.assignment_id;
                    let dates = dates_between(group.start_date, group.end_date);
                    self.cache.insert_group(group);
                    self.notify(assignment_id, dates);
                }
                Err(rolled_back(err))
            }
        }
    }

    /// Move a contiguous block of assigned days.
    ///
    /// The warning gate evaluates the destination range. On success the
    /// server reports how many destination days were absorbed into the
    /// moved block.
    #[allow(clippy::too_many_arguments)]
    pub async fn move_block(
        &self,
        assignment_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        new_start_date: NaiveDate,
        new_end_date: NaiveDate,
        schedule: &WorkSchedule,
        day_offs: &BTreeSet<NaiveDate>,
        confirmed: bool,
    ) -> Result<ApplyOutcome<u32>> {
        let warnings = self.gate(new_start_date, new_end_date, schedule, day_offs, confirmed);
        if !warnings.is_empty() {
            return Ok(ApplyOutcome::NeedsConfirmation(warnings));
        }

        let checkpoint = self.cache.checkpoint(assignment_id);
        let offset = (new_start_date - start_date).num_days();
        self.apply_move_locally(assignment_id, start_date, end_date, offset);

        let mut dates = dates_between(start_date, end_date);
        dates.extend(dates_between(new_start_date, new_end_date));
        self.notify(assignment_id, dates.clone());

        let request = MoveAssignmentBlockRequest {
            assignment_id,
            start_date,
            end_date,
            new_start_date,
            new_end_date,
        };
        match self.transport.move_block(request).await {
            Ok(response) => {
                self.notify(assignment_id, dates);
                Ok(ApplyOutcome::Applied(response.merged_days))
            }
            Err(err) => {
                self.cache.restore(checkpoint);
                self.notify(assignment_id, dates);
                Err(rolled_back(err))
            }
        }
    }

    /// Shift cached source rows and contained groups by the day offset,
    /// letting rows already present at the destination absorb collisions.
    fn apply_move_locally(
        &self,
        assignment_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        offset: i64,
    ) {
        let moved: Vec<DayAssignmentInfo> = dates_between(start_date, end_date)
            .into_iter()
            .filter_map(|date| self.cache.remove_day(assignment_id, date))
            .collect();
        for mut day in moved {
            let landing = shift(day.date, offset);
            if self.cache.day_at(assignment_id, landing).is_none() {
                day.date = landing;
                self.cache.insert_day(day);
            }
        }

        for mut group in self.cache.assignment_groups(assignment_id) {
            if group.start_date >= start_date && group.end_date <= end_date {
                group.start_date = shift(group.start_date, offset);
                group.end_date = shift(group.end_date, offset);
                self.cache.insert_group(group);
            }
        }
    }

    /// Dispatch a resolved drag outcome.
    pub async fn apply_drag(
        &self,
        outcome: DragOutcome,
        schedule: &WorkSchedule,
        day_offs: &BTreeSet<NaiveDate>,
        confirmed: bool,
    ) -> Result<ApplyOutcome<DragEffect>> {
        match outcome {
            DragOutcome::CreateRange {
                assignment_id,
                start_date,
                end_date,
            } => {
                let applied = self
                    .create_day_range(
                        assignment_id,
                        start_date,
                        end_date,
                        schedule,
                        day_offs,
                        confirmed,
                    )
                    .await?;
                Ok(match applied {
                    ApplyOutcome::Applied(created) => {
                        ApplyOutcome::Applied(DragEffect::Created(created))
                    }
                    ApplyOutcome::NeedsConfirmation(warnings) => {
                        ApplyOutcome::NeedsConfirmation(warnings)
                    }
                })
            }
            DragOutcome::DeleteRange {
                assignment_id,
                start_date,
                end_date,
            } => {
                let deleted = self
                    .delete_day_range(assignment_id, start_date, end_date)
                    .await?;
                Ok(ApplyOutcome::Applied(DragEffect::Deleted(deleted)))
            }
            DragOutcome::MoveBlock {
                assignment_id,
                start_date,
                end_date,
                new_start_date,
                new_end_date,
            } => {
                let applied = self
                    .move_block(
                        assignment_id,
                        start_date,
                        end_date,
                        new_start_date,
                        new_end_date,
                        schedule,
                        day_offs,
                        confirmed,
                    )
                    .await?;
                Ok(match applied {
                    ApplyOutcome::Applied(merged_days) => {
                        ApplyOutcome::Applied(DragEffect::Moved { merged_days })
                    }
                    ApplyOutcome::NeedsConfirmation(warnings) => {
                        ApplyOutcome::NeedsConfirmation(warnings)
                    }
                })
            }
        }
    }
}

/// Keep conflicts first-class so callers can offer the metadata-update
/// fallback; everything else wraps into the rollback error.
fn rolled_back(err: ClientError) -> ClientError {
    match err {
        ClientError::Conflict { .. } => err,
        other => ClientError::RolledBack(Box::new(other)),
    }
}

fn dates_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    std::iter::successors(Some(start), |date| {
        date.succ_opt().filter(|next| *next <= end)
    })
    .collect()
}

fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use teamgrid_api::timeline::model::MoveAssignmentBlockResponse;

    use crate::listener::FnGridListener;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, day).unwrap()
    }

    /// Transport double that fabricates server rows and records calls
    #[derive(Default)]
    struct FakeTransport {
        next_id: AtomicI64,
        calls: AtomicUsize,
        merged_days: u32,
        batch_dates: Mutex<Vec<NaiveDate>>,
    }

    impl FakeTransport {
        fn new() -> Self {
            Self {
                next_id: AtomicI64::new(100),
                ..Default::default()
            }
        }

        fn id(&self) -> i64 {
            self.next_id.fetch_add(1, Ordering::SeqCst)
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ScheduleTransport for FakeTransport {
        async fn create_day(
            &self,
            assignment_id: i64,
            date: NaiveDate,
            comment: Option<String>,
        ) -> Result<DayAssignmentInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(DayAssignmentInfo {
                id: self.id(),
                assignment_id,
                date,
                comment,
            })
        }

        async fn create_days(
            &self,
            assignment_id: i64,
            dates: Vec<NaiveDate>,
        ) -> Result<Vec<DayAssignmentInfo>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.batch_dates.lock().unwrap() = dates.clone();
            Ok(dates
                .into_iter()
                .map(|date| DayAssignmentInfo {
                    id: self.id(),
                    assignment_id,
                    date,
                    comment: None,
                })
                .collect())
        }

        async fn delete_day(&self, _id: i64) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn delete_days(&self, _ids: Vec<i64>) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn create_group(
            &self,
            assignment_id: i64,
            start_date: NaiveDate,
            end_date: NaiveDate,
            priority: Priority,
            comment: Option<String>,
        ) -> Result<AssignmentGroupInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AssignmentGroupInfo {
                id: self.id(),
                assignment_id,
                start_date,
                end_date,
                priority,
                comment,
            })
        }

        async fn update_group(
            &self,
            id: i64,
            priority: Option<Priority>,
            comment: Option<String>,
        ) -> Result<AssignmentGroupInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AssignmentGroupInfo {
                id,
                assignment_id: 12,
                start_date: date(1),
                end_date: date(2),
                priority: priority.unwrap_or_default(),
                comment,
            })
        }

        async fn move_block(
            &self,
            request: MoveAssignmentBlockRequest,
        ) -> Result<MoveAssignmentBlockResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _ = request;
            Ok(MoveAssignmentBlockResponse {
                merged_days: self.merged_days,
            })
        }

        async fn fetch_days(&self, _query: &DateRangeQuery) -> Result<Vec<DayAssignmentInfo>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }

        async fn fetch_groups(
            &self,
            _query: &DateRangeQuery,
        ) -> Result<Vec<AssignmentGroupInfo>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }
    }

    /// Transport double that rejects every mutation
    struct FailingTransport;

    #[async_trait]
    impl ScheduleTransport for FailingTransport {
        async fn create_day(
            &self,
            _assignment_id: i64,
            _date: NaiveDate,
            _comment: Option<String>,
        ) -> Result<DayAssignmentInfo> {
            Err(server_error())
        }

        async fn create_days(
            &self,
            _assignment_id: i64,
            _dates: Vec<NaiveDate>,
        ) -> Result<Vec<DayAssignmentInfo>> {
            Err(server_error())
        }

        async fn delete_day(&self, _id: i64) -> Result<()> {
            Err(server_error())
        }

        async fn delete_days(&self, _ids: Vec<i64>) -> Result<()> {
            Err(server_error())
        }

        async fn create_group(
            &self,
            _assignment_id: i64,
            _start_date: NaiveDate,
            _end_date: NaiveDate,
            _priority: Priority,
            _comment: Option<String>,
        ) -> Result<AssignmentGroupInfo> {
            Err(ClientError::Conflict {
                existing_group_id: 31,
            })
        }

        async fn update_group(
            &self,
            _id: i64,
            _priority: Option<Priority>,
            _comment: Option<String>,
        ) -> Result<AssignmentGroupInfo> {
            Err(server_error())
        }

        async fn move_block(
            &self,
            _request: MoveAssignmentBlockRequest,
        ) -> Result<MoveAssignmentBlockResponse> {
            Err(server_error())
        }

        async fn fetch_days(&self, _query: &DateRangeQuery) -> Result<Vec<DayAssignmentInfo>> {
            Err(server_error())
        }

        async fn fetch_groups(
            &self,
            _query: &DateRangeQuery,
        ) -> Result<Vec<AssignmentGroupInfo>> {
            Err(server_error())
        }
    }

    fn server_error() -> ClientError {
        ClientError::ServerError {
            status: 500,
            message: "storage unavailable".to_string(),
        }
    }

    fn weekdays() -> WorkSchedule {
        WorkSchedule::default()
    }

    fn no_day_offs() -> BTreeSet<NaiveDate> {
        BTreeSet::new()
    }

    fn seeded_day(client: &TimelineClient, id: i64, assignment_id: i64, d: u32) {
        client.cache().insert_day(DayAssignmentInfo {
            id,
            assignment_id,
            date: date(d),
            comment: None,
        });
    }

    #[tokio::test]
    async fn test_create_range_replaces_provisional_rows() {
        let transport = Arc::new(FakeTransport::new());
        let client = TimelineClient::new(transport.clone());

        // 2026-06-01 is a Monday
        let outcome = client
            .create_day_range(12, date(1), date(3), &weekdays(), &no_day_offs(), false)
            .await
            .unwrap();

        let ApplyOutcome::Applied(created) = outcome else {
            panic!("expected applied outcome");
        };
        assert_eq!(created.len(), 3);
        for day in client.cache().assignment_days(12) {
            let row = client.cache().day_at(12, day).unwrap();
            assert!(row.id >= 100, "provisional id {} survived", row.id);
        }
        assert_eq!(*transport.batch_dates.lock().unwrap(), dates_between(date(1), date(3)));
    }

    #[tokio::test]
    async fn test_create_range_rolls_back_on_server_error() {
        let client = TimelineClient::new(Arc::new(FailingTransport));
        seeded_day(&client, 1, 12, 1);

        let err = client
            .create_day_range(12, date(2), date(4), &weekdays(), &no_day_offs(), true)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::RolledBack(_)));
        assert_eq!(
            client.cache().assignment_days(12),
            BTreeSet::from([date(1)])
        );
    }

    #[tokio::test]
    async fn test_warning_gate_blocks_until_confirmed() {
        let transport = Arc::new(FakeTransport::new());
        let client = TimelineClient::new(transport.clone());

        // 2026-06-06 is a Saturday
        let outcome = client
            .create_day_range(12, date(5), date(8), &weekdays(), &no_day_offs(), false)
            .await
            .unwrap();

        let ApplyOutcome::NeedsConfirmation(warnings) = outcome else {
            panic!("expected confirmation request");
        };
        assert_eq!(
            warnings.iter().map(|w| w.date).collect::<Vec<_>>(),
            vec![date(6), date(7)]
        );
        assert_eq!(transport.calls(), 0);

        let outcome = client
            .create_day_range(12, date(5), date(8), &weekdays(), &no_day_offs(), true)
            .await
            .unwrap();
        assert!(matches!(outcome, ApplyOutcome::Applied(_)));
        // The confirmed dispatch covers the whole range, flagged days included
        assert_eq!(
            *transport.batch_dates.lock().unwrap(),
            dates_between(date(5), date(8))
        );
    }

    #[tokio::test]
    async fn test_warning_gate_can_be_disabled() {
        let transport = Arc::new(FakeTransport::new());
        let client = TimelineClient::new(transport.clone()).with_warnings_enabled(false);

        let outcome = client
            .create_day_range(12, date(6), date(6), &weekdays(), &no_day_offs(), false)
            .await
            .unwrap();
        assert!(matches!(outcome, ApplyOutcome::Applied(_)));
    }

    #[tokio::test]
    async fn test_delete_range_skips_unassigned_and_restores_on_error() {
        let client = TimelineClient::new(Arc::new(FailingTransport));
        seeded_day(&client, 1, 12, 2);
        seeded_day(&client, 2, 12, 3);

        let err = client
            .delete_day_range(12, date(1), date(4))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::RolledBack(_)));
        assert_eq!(
            client.cache().assignment_days(12),
            BTreeSet::from([date(2), date(3)])
        );
    }

    #[tokio::test]
    async fn test_delete_range_with_nothing_assigned_dispatches_nothing() {
        let transport = Arc::new(FakeTransport::new());
        let client = TimelineClient::new(transport.clone());

        let deleted = client.delete_day_range(12, date(1), date(4)).await.unwrap();

        assert_eq!(deleted, 0);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_group_conflict_surfaces_after_rollback() {
        let client = TimelineClient::new(Arc::new(FailingTransport));
        seeded_day(&client, 1, 12, 1);
        seeded_day(&client, 2, 12, 2);

        let err = client
            .create_group(12, date(1), date(2), Priority::High, None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ClientError::Conflict {
                existing_group_id: 31
            }
        ));
        assert!(client.cache().assignment_groups(12).is_empty());
    }

    #[tokio::test]
    async fn test_move_updates_cache_and_reports_merged_days() {
        let transport = Arc::new(FakeTransport {
            next_id: AtomicI64::new(100),
            merged_days: 1,
            ..Default::default()
        });
        let client = TimelineClient::new(transport.clone());
        seeded_day(&client, 1, 12, 1);
        seeded_day(&client, 2, 12, 2);
        seeded_day(&client, 3, 12, 4);

        let outcome = client
            .move_block(
                12,
                date(1),
                date(2),
                date(3),
                date(4),
                &weekdays(),
                &no_day_offs(),
                true,
            )
            .await
            .unwrap();

        assert_eq!(outcome, ApplyOutcome::Applied(1));
        assert_eq!(
            client.cache().assignment_days(12),
            BTreeSet::from([date(3), date(4)])
        );
    }

    #[tokio::test]
    async fn test_apply_drag_dispatches_create() {
        let transport = Arc::new(FakeTransport::new());
        let client = TimelineClient::new(transport.clone());

        let outcome = client
            .apply_drag(
                DragOutcome::CreateRange {
                    assignment_id: 12,
                    start_date: date(1),
                    end_date: date(2),
                },
                &weekdays(),
                &no_day_offs(),
                false,
            )
            .await
            .unwrap();

        let ApplyOutcome::Applied(DragEffect::Created(created)) = outcome else {
            panic!("expected created effect");
        };
        assert_eq!(created.len(), 2);
    }

    #[tokio::test]
    async fn test_listeners_see_optimistic_and_confirmed_states() {
        let transport = Arc::new(FakeTransport::new());
        let client = TimelineClient::new(transport.clone());
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();
        client.subscribe(
            12,
            Arc::new(FnGridListener::new(move |event| {
                assert_eq!(event.assignment_id, 12);
                seen_clone.fetch_add(1, Ordering::SeqCst);
            })),
        );

        client
            .create_day_range(12, date(1), date(1), &weekdays(), &no_day_offs(), true)
            .await
            .unwrap();

        // One notification for the optimistic apply, one on confirmation
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
