use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::countdown::Countdown;
use crate::core::position::Position;

#[derive(Debug, Serialize)]
pub struct PositionDto {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_km: f64,
    pub timestamp: i64,
}

impl From<&Position> for PositionDto {
    fn from(p: &Position) -> Self {
        PositionDto {
            latitude: p.latitude,
            longitude: p.longitude,
            altitude_km: p.altitude,
            timestamp: p.timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PassDto {
    pub name: &'static str,
    pub norad_id: u64,
    pub start_time: DateTime<Utc>,
    pub duration_min: u32,
    pub max_elevation_deg: f64,
    pub direction: &'static str,
    pub visibility: &'static str,
    pub starts_in: Countdown,
}
