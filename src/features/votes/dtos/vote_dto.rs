use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::lifecycle::Priority;

/// Vote outcome with the counts the report service now holds
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VoteResultDto {
    pub report_id: i64,
    pub voted: bool,
    /// Server-side count after the change
    pub upvote_count: u32,
    pub priority: Option<Priority>,
}
