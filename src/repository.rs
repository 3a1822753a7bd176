//! The seam between the journal core and the remote mood API.
//!
//! The core never implements this contract itself; it consumes whatever the
//! service wires in (see [`crate::client::HttpMoodRepository`]). Errors come
//! back as [`JournalError`] kinds: `NotFound` for unknown ids, `Unreachable`
//! for transport failures and `Rejected` for server-side validation.

use crate::errors::Result;
use crate::models::{MoodEntry, NewMoodEntry, TagGroup};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

/// Absolute interval used to narrow a listing. Inclusive on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

#[async_trait]
pub trait MoodRepository: Send + Sync {
    /// All entries, or only those inside `filter`. No ordering or paging is
    /// promised; callers aggregate the same way either way.
    async fn list_entries(&self, filter: Option<&DateRange>) -> Result<Vec<MoodEntry>>;

    async fn get_entry(&self, id: &str) -> Result<MoodEntry>;

    async fn create_entry(&self, entry: &NewMoodEntry) -> Result<MoodEntry>;

    async fn update_entry(&self, id: &str, entry: &NewMoodEntry) -> Result<MoodEntry>;

    async fn delete_entry(&self, id: &str) -> Result<()>;

    async fn list_tag_groups(&self) -> Result<Vec<TagGroup>>;
}
