use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::Session;
use crate::features::votes::dtos::VoteResultDto;
use crate::features::votes::VoteMarkerStore;
use crate::modules::civic_api::CivicApi;

const ALREADY_VOTED: &str = "Already voted";

/// Community verification votes.
///
/// Votes are fire-then-refetch: the count returned is whatever the report
/// service reports after the change, never a local increment.
pub struct VoteService {
    api: Arc<dyn CivicApi>,
    markers: VoteMarkerStore,
}

impl VoteService {
    pub fn new(api: Arc<dyn CivicApi>, markers: VoteMarkerStore) -> Self {
        Self { api, markers }
    }

    pub async fn cast(&self, session: &Session, report_id: i64) -> Result<VoteResultDto> {
        let user_id = session.user_id();
        if self.markers.has_voted(user_id, report_id).await {
            return Err(AppError::Conflict(ALREADY_VOTED.to_string()));
        }

        match self.api.cast_vote(session.token(), report_id).await {
            Ok(_) => {
                self.markers.mark(user_id, report_id).await;
                tracing::info!("User {} voted on report {}", user_id, report_id);
            }
            Err(AppError::BadRequest(detail)) if detail.contains(ALREADY_VOTED) => {
                // The service already holds this vote; remember it locally
                self.markers.mark(user_id, report_id).await;
                return Err(AppError::Conflict(ALREADY_VOTED.to_string()));
            }
            Err(e) => return Err(e),
        }

        self.refetch(report_id, true).await
    }

    pub async fn remove(&self, session: &Session, report_id: i64) -> Result<VoteResultDto> {
        let user_id = session.user_id();
        let result = self.api.remove_vote(session.token(), report_id).await;

        // Either way the vote is gone upstream
        if matches!(result, Ok(()) | Err(AppError::NotFound(_))) {
            self.markers.clear(user_id, report_id).await;
        }
        result?;

        tracing::info!("User {} removed vote on report {}", user_id, report_id);
        self.refetch(report_id, false).await
    }

    async fn refetch(&self, report_id: i64, voted: bool) -> Result<VoteResultDto> {
        let report = self.api.get_report(report_id).await?;
        Ok(VoteResultDto {
            report_id,
            voted,
            upvote_count: report.upvote_count,
            priority: report.priority,
        })
    }
}
