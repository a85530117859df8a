use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::lifecycle::models::UNKNOWN_STATUS_COLOR;
use crate::features::lifecycle::{IssueType, ReportStatus};
use crate::modules::civic_api::IssueReport;

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct MapQuery {
    /// Center latitude; requires `lng`
    pub lat: Option<f64>,
    /// Center longitude; requires `lat`
    pub lng: Option<f64>,
    /// Meters around the center; one of the configured radius options
    pub radius: Option<u32>,
    pub issue_type: Option<IssueType>,
    pub status: Option<ReportStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MapMarkerDto {
    pub id: i64,
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    pub status: Option<ReportStatus>,
    pub color: String,
    pub issue_type: Option<IssueType>,
    pub icon: String,
    pub sla_breached: bool,
    /// Distance from the requested center, when one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
}

impl MapMarkerDto {
    pub fn from_report(
        report: &IssueReport,
        sla_breached: bool,
        distance_meters: Option<f64>,
    ) -> Self {
        Self {
            id: report.id,
            lat: report.latitude,
            lng: report.longitude,
            title: report.title.clone(),
            status: report.status,
            color: report
                .status
                .map(|s| s.color())
                .unwrap_or(UNKNOWN_STATUS_COLOR)
                .to_string(),
            issue_type: report.issue_type,
            icon: report
                .issue_type
                .unwrap_or(IssueType::Other)
                .icon()
                .to_string(),
            sla_breached,
            distance_meters,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RadiusOptionDto {
    pub value: u32,
    pub label: String,
}

impl RadiusOptionDto {
    pub fn new(meters: u32) -> Self {
        let label = if meters >= 1000 && meters % 1000 == 0 {
            format!("{} km", meters / 1000)
        } else if meters >= 1000 {
            format!("{:.1} km", f64::from(meters) / 1000.0)
        } else {
            format!("{} m", meters)
        };
        Self {
            value: meters,
            label,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MapOptionsDto {
    pub radius_options: Vec<RadiusOptionDto>,
    /// Radius used when a center is given without one
    pub default_radius: Option<u32>,
    pub duplicate_radius_meters: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_labels() {
        assert_eq!(RadiusOptionDto::new(2000).label, "2 km");
        assert_eq!(RadiusOptionDto::new(1500).label, "1.5 km");
        assert_eq!(RadiusOptionDto::new(500).label, "500 m");
    }
}
