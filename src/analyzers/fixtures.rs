//! Ping builders shared by the analyzer tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::parser::{Direction, PingStatus, PositionPing};

pub const LINE: &str = "1001";

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
}

pub fn at(seconds: i64) -> DateTime<Utc> {
    base_time() + Duration::seconds(seconds)
}

/// A ping on [`LINE`], inbound, heading nowhere in particular.
pub fn ping(vehicle: &str, station: &str, status: PingStatus, seconds: i64) -> PositionPing {
    PositionPing {
        line_id: LINE.to_string(),
        station_name: station.to_string(),
        vehicle_id: vehicle.to_string(),
        direction: Direction::Inbound,
        status,
        destination_station: "Terminal".to_string(),
        is_express: false,
        observed_at: at(seconds),
    }
}

pub fn arrived(vehicle: &str, station: &str, seconds: i64) -> PositionPing {
    ping(vehicle, station, PingStatus::Arrived, seconds)
}

pub fn departed(vehicle: &str, station: &str, seconds: i64) -> PositionPing {
    ping(vehicle, station, PingStatus::Departed, seconds)
}
