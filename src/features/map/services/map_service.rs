use chrono::Utc;
use std::sync::Arc;

use crate::core::config::MapConfig;
use crate::core::error::{AppError, Result};
use crate::features::map::dtos::{MapMarkerDto, MapOptionsDto, MapQuery, RadiusOptionDto};
use crate::modules::civic_api::{CivicApi, ReportQuery};
use crate::shared::constants::REPORT_SCAN_LIMIT;
use crate::shared::geo::GeoPoint;

/// Circular area markers are restricted to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapArea {
    pub center: GeoPoint,
    pub radius_meters: u32,
}

pub struct MapService {
    api: Arc<dyn CivicApi>,
    config: MapConfig,
}

impl MapService {
    pub fn new(api: Arc<dyn CivicApi>, config: MapConfig) -> Self {
        Self { api, config }
    }

    pub fn options(&self) -> MapOptionsDto {
        MapOptionsDto {
            radius_options: self
                .config
                .radius_options
                .iter()
                .copied()
                .map(RadiusOptionDto::new)
                .collect(),
            default_radius: self.default_radius(),
            duplicate_radius_meters: self.config.duplicate_radius_meters,
        }
    }

    /// Validate the center/radius part of a map query
    pub fn area(&self, query: &MapQuery) -> Result<Option<MapArea>> {
        let center = match (query.lat, query.lng) {
            (Some(lat), Some(lng)) => GeoPoint::new(lat, lng),
            (None, None) => {
                if query.radius.is_some() {
                    return Err(AppError::BadRequest(
                        "radius requires lat and lng".to_string(),
                    ));
                }
                return Ok(None);
            }
            _ => {
                return Err(AppError::BadRequest(
                    "lat and lng must be given together".to_string(),
                ))
            }
        };

        if !center.is_valid() {
            return Err(AppError::Validation(
                "lat must be within [-90, 90] and lng within [-180, 180]".to_string(),
            ));
        }

        let radius_meters = match query.radius {
            Some(radius) if self.config.radius_options.contains(&radius) => radius,
            Some(radius) => {
                return Err(AppError::Validation(format!(
                    "radius {} is not one of {:?}",
                    radius, self.config.radius_options
                )))
            }
            None => self.default_radius().ok_or_else(|| {
                AppError::Internal("No map radius options configured".to_string())
            })?,
        };

        Ok(Some(MapArea {
            center,
            radius_meters,
        }))
    }

    pub async fn markers(&self, query: &MapQuery) -> Result<Vec<MapMarkerDto>> {
        let area = self.area(query)?;
        let upstream = ReportQuery {
            issue_type: query.issue_type,
            status: query.status,
            skip: 0,
            limit: REPORT_SCAN_LIMIT,
        };
        let reports = self.api.list_reports(&upstream).await?;
        let now = Utc::now();

        let markers: Vec<MapMarkerDto> = reports
            .iter()
            .filter_map(|report| {
                let distance = match area {
                    Some(area) => {
                        let d = area.center.distance_to(&report.location());
                        if d > f64::from(area.radius_meters) {
                            return None;
                        }
                        Some(d.round())
                    }
                    None => None,
                };
                Some(MapMarkerDto::from_report(
                    report,
                    report.is_overdue(now),
                    distance,
                ))
            })
            .collect();

        tracing::debug!(
            "Map query {:?} matched {} of {} reports",
            area,
            markers.len(),
            reports.len()
        );
        Ok(markers)
    }

    /// Widest configured option
    fn default_radius(&self) -> Option<u32> {
        self.config.radius_options.iter().copied().max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::FakeCivicApi;

    fn service() -> MapService {
        MapService::new(Arc::new(FakeCivicApi::new()), MapConfig::default())
    }

    fn query(lat: Option<f64>, lng: Option<f64>, radius: Option<u32>) -> MapQuery {
        MapQuery {
            lat,
            lng,
            radius,
            issue_type: None,
            status: None,
        }
    }

    #[test]
    fn test_area_defaults_to_widest_radius() {
        let area = service()
            .area(&query(Some(17.5), Some(78.4), None))
            .unwrap()
            .unwrap();
        assert_eq!(area.radius_meters, 2000);
    }

    #[test]
    fn test_area_rejects_unlisted_radius() {
        assert!(matches!(
            service().area(&query(Some(17.5), Some(78.4), Some(300))),
            Err(AppError::Validation(_))
        ));
        assert!(service()
            .area(&query(Some(17.5), Some(78.4), Some(500)))
            .is_ok());
    }

    #[test]
    fn test_area_needs_both_coordinates() {
        assert!(matches!(
            service().area(&query(Some(17.5), None, None)),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            service().area(&query(None, None, Some(500))),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(service().area(&query(None, None, None)).unwrap(), None);
    }
}
