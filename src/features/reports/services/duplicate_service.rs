use std::sync::Arc;

use crate::core::error::Result;
use crate::features::lifecycle::IssueType;
use crate::features::reports::dtos::DuplicateCandidateDto;
use crate::modules::civic_api::{CivicApi, IssueReport, ReportQuery};
use crate::shared::constants::REPORT_SCAN_LIMIT;
use crate::shared::geo::GeoPoint;

/// Open reports of `issue_type` within `radius_meters` of `point`, nearest first.
///
/// Pure geometry over the given snapshot; advisory only.
pub fn find_duplicates(
    reports: &[IssueReport],
    issue_type: IssueType,
    point: GeoPoint,
    radius_meters: f64,
) -> Vec<DuplicateCandidateDto> {
    let mut candidates: Vec<DuplicateCandidateDto> = reports
        .iter()
        .filter(|r| r.issue_type == Some(issue_type) && r.is_open())
        .filter_map(|r| {
            let distance = point.distance_to(&r.location());
            (distance <= radius_meters).then(|| DuplicateCandidateDto {
                id: r.id,
                title: r.title.clone(),
                status: r.status,
                upvote_count: r.upvote_count,
                distance_meters: (distance * 10.0).round() / 10.0,
            })
        })
        .collect();

    candidates.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    candidates
}

/// Nearby-report lookup used before and during submission
pub struct DuplicateService {
    api: Arc<dyn CivicApi>,
    radius_meters: f64,
}

impl DuplicateService {
    pub fn new(api: Arc<dyn CivicApi>, radius_meters: f64) -> Self {
        Self { api, radius_meters }
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    pub async fn find_nearby(
        &self,
        issue_type: IssueType,
        point: GeoPoint,
    ) -> Result<Vec<DuplicateCandidateDto>> {
        let query = ReportQuery {
            issue_type: Some(issue_type),
            status: None,
            skip: 0,
            limit: REPORT_SCAN_LIMIT,
        };
        let reports = self.api.list_reports(&query).await?;

        let duplicates = find_duplicates(&reports, issue_type, point, self.radius_meters);
        if !duplicates.is_empty() {
            tracing::debug!(
                "Found {} possible duplicates for {} at ({}, {})",
                duplicates.len(),
                issue_type,
                point.lat,
                point.lng
            );
        }
        Ok(duplicates)
    }
}
