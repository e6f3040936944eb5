use serde::Serialize;

/// A forward-geocoding match for a city search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityMatch {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

const MAX_RESULTS: usize = 5;

// Demo gazetteer. A real deployment would call a geocoding service here; the
// dashboard only needs enough cities to exercise search.
const CITIES: &[CityMatch] = &[
    CityMatch { name: "New York, NY, USA", lat: 40.7128, lon: -74.0060 },
    CityMatch { name: "London, England, UK", lat: 51.5074, lon: -0.1278 },
    CityMatch { name: "Tokyo, Japan", lat: 35.6762, lon: 139.6503 },
    CityMatch { name: "Paris, France", lat: 48.8566, lon: 2.3522 },
    CityMatch { name: "Sydney, Australia", lat: -33.8688, lon: 151.2093 },
    CityMatch { name: "Los Angeles, CA, USA", lat: 34.0522, lon: -118.2437 },
    CityMatch { name: "Berlin, Germany", lat: 52.5200, lon: 13.4050 },
    CityMatch { name: "Moscow, Russia", lat: 55.7558, lon: 37.6176 },
    CityMatch { name: "Beijing, China", lat: 39.9042, lon: 116.4074 },
    CityMatch { name: "Mumbai, India", lat: 19.0760, lon: 72.8777 },
];

/// Case-insensitive substring search over the city table, capped at five
/// results in table order.
pub fn search_cities(query: &str) -> Vec<CityMatch> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    CITIES
        .iter()
        .filter(|city| city.name.to_lowercase().contains(&needle))
        .take(MAX_RESULTS)
        .cloned()
        .collect()
}
