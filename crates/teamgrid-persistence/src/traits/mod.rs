//! Store traits implemented by every storage backend.
//!
//! Both backends satisfy the same contracts: the external database
//! (MySQL/PostgreSQL) and the in-process memory store used in standalone
//! mode and tests.

pub mod calendar;
pub mod roster;
pub mod timeline;

pub use calendar::CalendarStore;
pub use roster::RosterStore;
pub use timeline::TimelineStore;

use async_trait::async_trait;

use crate::model::StorageMode;

/// Everything a schedule storage backend provides, as one object-safe
/// bound for `Arc<dyn ScheduleStore>` handles.
#[async_trait]
pub trait ScheduleStore: TimelineStore + RosterStore + CalendarStore + Send + Sync {
    /// Which backend this store runs on
    fn storage_mode(&self) -> StorageMode;

    /// Verify the backend is reachable
    async fn health_check(&self) -> anyhow::Result<()>;
}
