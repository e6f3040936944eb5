use std::fs;
use std::path::Path;

use rusqlite::{params, Connection};
use thiserror::Error;

use crate::core::position::Position;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Opens the telemetry sink, creating the schema on first use.
///
/// The sink is write-only from the service's point of view: position samples
/// and search events are inserted and never read back.
pub fn open_or_init(path: &Path) -> Result<Connection, DbError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    let conn = Connection::open(path)?;
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        CREATE TABLE IF NOT EXISTS position_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            altitude REAL NOT NULL,
            azimuth REAL,
            elevation REAL,
            ra REAL,
            dec REAL,
            logged_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS search_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            city TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            passes_found INTEGER NOT NULL,
            status TEXT NOT NULL,
            logged_at TEXT NOT NULL
        );
        "#,
    )?;
    Ok(conn)
}

pub fn insert_position(conn: &Connection, position: &Position) -> Result<(), DbError> {
    conn.execute(
        "INSERT INTO position_log (latitude, longitude, altitude, azimuth, elevation, ra, dec, logged_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            position.latitude,
            position.longitude,
            position.altitude,
            position.azimuth,
            position.elevation,
            position.ra,
            position.dec,
            chrono::Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn insert_search(
    conn: &Connection,
    city: &str,
    latitude: f64,
    longitude: f64,
    passes_found: usize,
    status: &str,
) -> Result<(), DbError> {
    conn.execute(
        "INSERT INTO search_log (city, latitude, longitude, passes_found, status, logged_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            city,
            latitude,
            longitude,
            passes_found as i64,
            status,
            chrono::Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{insert_position, insert_search, open_or_init};
    use crate::core::position::Position;

    #[test]
    fn position_rows_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_or_init(&dir.path().join("sink.sqlite")).unwrap();

        let position = Position {
            latitude: 10.5,
            longitude: -20.25,
            altitude: 408.0,
            timestamp: 1_700_000_000,
            azimuth: None,
            elevation: None,
            ra: None,
            dec: None,
        };
        insert_position(&conn, &position).unwrap();

        let (lat, lon, alt): (f64, f64, f64) = conn
            .query_row(
                "SELECT latitude, longitude, altitude FROM position_log",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(lat, 10.5);
        assert_eq!(lon, -20.25);
        assert_eq!(alt, 408.0);
    }

    #[test]
    fn search_rows_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_or_init(&dir.path().join("sink.sqlite")).unwrap();

        insert_search(&conn, "Location 40.71, -74.01", 40.71, -74.01, 6, "success").unwrap();

        let (city, count, status): (String, i64, String) = conn
            .query_row(
                "SELECT city, passes_found, status FROM search_log",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(city, "Location 40.71, -74.01");
        assert_eq!(count, 6);
        assert_eq!(status, "success");
    }
}
