use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean ISS orbital altitude in kilometers. The open-notify feed carries no
/// altitude, so samples are filled with this constant.
pub const ISS_MEAN_ALTITUDE_KM: f64 = 408.0;

/// A single satellite position fix. Ephemeral: fetched, optionally logged to
/// the sink, displayed, discarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Kilometers above the surface.
    pub altitude: f64,
    /// Seconds since the Unix epoch, as reported by the feed.
    pub timestamp: i64,
    pub azimuth: Option<f64>,
    pub elevation: Option<f64>,
    pub ra: Option<f64>,
    pub dec: Option<f64>,
}

#[derive(Debug, Error)]
pub enum PositionParseError {
    #[error("malformed response body: {0}")]
    Body(#[from] serde_json::Error),
    #[error("malformed {field}: {value:?}")]
    Coordinate { field: &'static str, value: String },
}

/// Wire format of the open-notify `iss-now` endpoint. Coordinates arrive as
/// string-encoded decimals.
#[derive(Debug, Deserialize)]
struct PositionBody {
    #[serde(default)]
    iss_position: Option<CoordinatesBody>,
    timestamp: i64,
}

#[derive(Debug, Deserialize)]
struct CoordinatesBody {
    latitude: String,
    longitude: String,
}

/// Parses a raw response body into a [`Position`].
///
/// Returns `Ok(None)` when the body is well-formed JSON but carries no
/// `iss_position` object; that is the feed's "no data" shape, not an error.
pub fn parse_position_body(body: &str) -> Result<Option<Position>, PositionParseError> {
    let parsed: PositionBody = serde_json::from_str(body)?;
    let coords = match parsed.iss_position {
        Some(c) => c,
        None => return Ok(None),
    };

    let latitude = parse_coordinate("latitude", &coords.latitude)?;
    let longitude = parse_coordinate("longitude", &coords.longitude)?;

    Ok(Some(Position {
        latitude,
        longitude,
        altitude: ISS_MEAN_ALTITUDE_KM,
        timestamp: parsed.timestamp,
        azimuth: None,
        elevation: None,
        ra: None,
        dec: None,
    }))
}

fn parse_coordinate(field: &'static str, value: &str) -> Result<f64, PositionParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| PositionParseError::Coordinate {
            field,
            value: value.to_string(),
        })
}
