use crate::db::Database;
use crate::error::Result;
use crate::models::{Recommendation, SensorReading, StoredRecommendation};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Row};
use tracing::warn;

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(row: &Row, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column_index(row, column),
                Type::Text,
                Box::new(e),
            )
        })
}

fn column_index(row: &Row, column: &str) -> usize {
    let stmt: &rusqlite::Statement = row.as_ref();
    stmt.column_index(column).unwrap_or(0)
}

// Sensor Reading Queries

impl Database {
    pub fn save_reading(&self, reading: &SensorReading) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO sensor_readings
                    (sensor_id, soil_moisture, temperature_c, humidity, timestamp)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    reading.sensor_id,
                    reading.soil_moisture,
                    reading.temperature_c,
                    reading.humidity,
                    format_timestamp(&reading.timestamp),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn latest_reading(&self, sensor_id: &str) -> Result<Option<SensorReading>> {
        self.with_conn(|conn| {
            conn.query_row(
                r#"
                SELECT * FROM sensor_readings
                WHERE sensor_id = ?1
                ORDER BY timestamp DESC, id DESC
                LIMIT 1
                "#,
                [sensor_id],
                row_to_reading,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    /// Up to `limit` readings for a sensor, newest first.
    pub fn reading_history(&self, sensor_id: &str, limit: usize) -> Result<Vec<SensorReading>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT * FROM sensor_readings
                WHERE sensor_id = ?1
                ORDER BY timestamp DESC, id DESC
                LIMIT ?2
                "#,
            )?;
            let readings = stmt
                .query_map(params![sensor_id, limit as i64], row_to_reading)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(readings)
        })
    }

    /// Latest reading of every sensor, ordered by sensor id.
    pub fn list_sensors(&self) -> Result<Vec<SensorReading>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, sensor_id, soil_moisture, temperature_c, humidity, timestamp
                FROM (
                    SELECT *, ROW_NUMBER() OVER (
                        PARTITION BY sensor_id ORDER BY timestamp DESC, id DESC
                    ) AS rn
                    FROM sensor_readings
                )
                WHERE rn = 1
                ORDER BY sensor_id
                "#,
            )?;
            let readings = stmt
                .query_map([], row_to_reading)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(readings)
        })
    }
}

fn row_to_reading(row: &Row) -> rusqlite::Result<SensorReading> {
    Ok(SensorReading {
        id: Some(row.get("id")?),
        sensor_id: row.get("sensor_id")?,
        soil_moisture: row.get("soil_moisture")?,
        temperature_c: row.get("temperature_c")?,
        humidity: row.get("humidity")?,
        timestamp: parse_timestamp(row, "timestamp")?,
    })
}

// Recommendation Audit Queries

impl Database {
    /// Append a recommendation to the audit trail. Records are never updated.
    pub fn append_recommendation(
        &self,
        sensor_id: &str,
        recommendation: &Recommendation,
    ) -> Result<i64> {
        let data = serde_json::to_string(recommendation)?;
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO recommendations (sensor_id, recommendation_data, timestamp)
                VALUES (?1, ?2, ?3)
                "#,
                params![
                    sensor_id,
                    data,
                    format_timestamp(&recommendation.generated_at)
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn recommendation_history(
        &self,
        sensor_id: &str,
        limit: usize,
    ) -> Result<Vec<StoredRecommendation>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT * FROM recommendations
                WHERE sensor_id = ?1
                ORDER BY timestamp DESC, id DESC
                LIMIT ?2
                "#,
            )?;
            let records = stmt
                .query_map(params![sensor_id, limit as i64], row_to_stored_recommendation)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
    }
}

fn row_to_stored_recommendation(row: &Row) -> rusqlite::Result<StoredRecommendation> {
    let id: i64 = row.get("id")?;
    let data: String = row.get("recommendation_data")?;

    let recommendation: Recommendation = serde_json::from_str(&data).map_err(|e| {
        warn!(id, error = %e, "Recommendation record is not valid JSON");
        rusqlite::Error::FromSqlConversionFailure(
            column_index(row, "recommendation_data"),
            Type::Text,
            Box::new(e),
        )
    })?;

    Ok(StoredRecommendation {
        id,
        sensor_id: row.get("sensor_id")?,
        recommendation,
        created_at: parse_timestamp(row, "created_at")?,
    })
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
