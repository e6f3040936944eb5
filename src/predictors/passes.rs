use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::utils::config::DEMO_API_KEY;

/// An upcoming visibility window for a satellite over a ground location.
#[derive(Debug, Clone, PartialEq)]
pub struct PassRecord {
    pub name: &'static str,
    pub norad_id: u64,
    pub start_time: DateTime<Utc>,
    pub duration_min: u32,
    pub max_elevation_deg: f64,
    /// Ground-track heading label, e.g. "NW to SE".
    pub direction: &'static str,
}

/// Naked-eye visibility rating for a pass, from its peak elevation.
pub fn visibility(max_elevation_deg: f64) -> &'static str {
    if max_elevation_deg >= 50.0 {
        "Excellent"
    } else if max_elevation_deg >= 30.0 {
        "Good"
    } else {
        "Fair"
    }
}

struct DemoPass {
    name: &'static str,
    norad_id: u64,
    offset_hours: f64,
    duration_min: u32,
    max_elevation_deg: f64,
    direction: &'static str,
}

// Demo schedule: a plausible few days of passes, anchored to the query time.
const DEMO_SCHEDULE: &[DemoPass] = &[
    DemoPass { name: "ISS (International Space Station)", norad_id: 25544, offset_hours: 2.0, duration_min: 6, max_elevation_deg: 67.0, direction: "NW to SE" },
    DemoPass { name: "Starlink-1007", norad_id: 44235, offset_hours: 8.0, duration_min: 4, max_elevation_deg: 42.0, direction: "SW to NE" },
    DemoPass { name: "Hubble Space Telescope", norad_id: 20580, offset_hours: 24.0, duration_min: 5, max_elevation_deg: 28.0, direction: "W to E" },
    DemoPass { name: "ISS (International Space Station)", norad_id: 25544, offset_hours: 36.0, duration_min: 7, max_elevation_deg: 54.0, direction: "NNW to SSE" },
    DemoPass { name: "Starlink-2156", norad_id: 47439, offset_hours: 48.0, duration_min: 3, max_elevation_deg: 35.0, direction: "N to S" },
    DemoPass { name: "ISS (International Space Station)", norad_id: 25544, offset_hours: 72.0, duration_min: 6, max_elevation_deg: 71.0, direction: "W to E" },
];

/// Source of upcoming-pass data. Currently serves the demo schedule; orbital
/// correctness is out of scope for the dashboard.
pub struct PassProvider;

impl PassProvider {
    // TODO: wire the N2YO visualpasses feed once a real key is provisioned.
    pub fn new(api_key: &str) -> Self {
        if api_key == DEMO_API_KEY {
            info!("No upstream pass-feed key configured, serving the demo schedule");
        } else {
            warn!("Pass-feed key is set but the upstream feed is not wired yet, serving the demo schedule");
        }
        PassProvider
    }

    /// Upcoming passes over a ground location, soonest first.
    ///
    /// The demo schedule is location-independent; `now` is a parameter so the
    /// result is deterministic under test.
    pub fn upcoming_passes(&self, _lat: f64, _lon: f64, now: DateTime<Utc>) -> Vec<PassRecord> {
        let mut passes: Vec<PassRecord> = DEMO_SCHEDULE
            .iter()
            .map(|p| PassRecord {
                name: p.name,
                norad_id: p.norad_id,
                start_time: now + Duration::minutes((p.offset_hours * 60.0) as i64),
                duration_min: p.duration_min,
                max_elevation_deg: p.max_elevation_deg,
                direction: p.direction,
            })
            .collect();
        passes.sort_by_key(|p| p.start_time);
        passes
    }
}
