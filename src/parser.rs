//! JSON decoders for the station, route and air-quality feeds.
//!
//! Decoding is lenient per record: an entry that does not match the record
//! shape is logged and skipped. Only a body that is not JSON at all fails.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::network::records::{AqiRecord, RouteRecord, StationRecord};

/// Decodes a TfL `StopPoint/Mode` response (`{"stopPoints": [...]}`).
/// A bare array of stop points is accepted too.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<StationRecord>> {
    let json: Value = serde_json::from_slice(bytes).context("station feed is not valid JSON")?;
    let items = match json {
        Value::Object(mut obj) => obj.remove("stopPoints").unwrap_or(Value::Null),
        other => other,
    };
    Ok(decode_records("station", items))
}

/// Decodes a TfL `Line/Mode/{mode}/Route` response (an array of lines).
pub fn parse_routes(bytes: &[u8]) -> Result<Vec<RouteRecord>> {
    let json: Value = serde_json::from_slice(bytes).context("route feed is not valid JSON")?;
    Ok(decode_records("route", json))
}

/// Decodes a WAQI `search` response (`{"status": "ok", "data": [...]}`).
///
/// WAQI reports errors as `{"status": "error", "data": "<message>"}`; that
/// yields no records.
pub fn parse_air_quality(bytes: &[u8]) -> Result<Vec<AqiRecord>> {
    let json: Value = serde_json::from_slice(bytes).context("AQI feed is not valid JSON")?;
    let Value::Object(mut obj) = json else {
        warn!("AQI feed is not a JSON object");
        return Ok(Vec::new());
    };
    if let Some(Value::String(status)) = obj.get("status") {
        if status != "ok" {
            warn!(status = %status, data = ?obj.get("data"), "AQI feed returned an error status");
        }
    }
    Ok(decode_records("aqi", obj.remove("data").unwrap_or(Value::Null)))
}

fn decode_records<T: DeserializeOwned>(kind: &'static str, items: Value) -> Vec<T> {
    let Value::Array(items) = items else {
        warn!(kind, "Feed has no record array");
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(kind, index = i, error = %e, "Skipping undecodable record");
                None
            }
        })
        .collect()
}
