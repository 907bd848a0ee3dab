use geo::Point;

use crate::define_index_newtype;

define_index_newtype!(LocationIdx, Location);

/// A physical node: depot, pickup site, or delivery site. Zone `0` is
/// reserved for depots.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Location {
    external_id: String,
    point: Point<f64>,
    default_service_duration: i64,
    zone: i64,
}

impl Location {
    pub fn new(
        external_id: impl Into<String>,
        lat: f64,
        lon: f64,
        default_service_duration: i64,
        zone: i64,
    ) -> Self {
        Location {
            external_id: external_id.into(),
            point: Point::new(lon, lat),
            default_service_duration,
            zone,
        }
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    pub fn default_service_duration(&self) -> i64 {
        self.default_service_duration
    }

    pub fn zone(&self) -> i64 {
        self.zone
    }

    pub fn is_depot_zone(&self) -> bool {
        self.zone == 0
    }
}
