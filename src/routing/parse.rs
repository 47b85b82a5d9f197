use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeZone};

use crate::{
    routing::RoutingError,
    structures::{LatLng, exchange::RequestTime, plan::Address},
};

/// Start or destination as handed to a router: either free text to be
/// resolved, or an already built address.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressInput {
    Text(String),
    Address(Address),
}

impl From<&str> for AddressInput {
    fn from(value: &str) -> Self {
        AddressInput::Text(value.to_string())
    }
}

impl From<String> for AddressInput {
    fn from(value: String) -> Self {
        AddressInput::Text(value)
    }
}

impl From<Address> for AddressInput {
    fn from(value: Address) -> Self {
        AddressInput::Address(value)
    }
}

impl From<LatLng> for AddressInput {
    fn from(value: LatLng) -> Self {
        AddressInput::Address(Address::new(value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimeInput {
    Now,
    At(DateTime<Local>),
    Text(String),
}

impl From<DateTime<Local>> for TimeInput {
    fn from(value: DateTime<Local>) -> Self {
        TimeInput::At(value)
    }
}

impl From<&str> for TimeInput {
    fn from(value: &str) -> Self {
        TimeInput::Text(value.to_string())
    }
}

/// Parses `"lng,lat[,name]"`. Note the longitude comes first.
pub fn parse_coord_string(input: &str) -> Result<Address, RoutingError> {
    let mut parts = input.splitn(3, ',');
    let lng = parts.next().map(str::trim).and_then(|s| s.parse::<f64>().ok());
    let lat = parts.next().map(str::trim).and_then(|s| s.parse::<f64>().ok());
    let name = parts.next().map(str::trim).filter(|s| !s.is_empty());

    let (Some(lng), Some(lat)) = (lng, lat) else {
        return Err(RoutingError::InvalidCoordinate(input.to_string()));
    };
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(RoutingError::InvalidCoordinate(input.to_string()));
    }

    let address = Address::new(LatLng::new(lat, lng));
    Ok(match name {
        Some(name) => address.with_name(name),
        None => address,
    })
}

pub fn parse_address(input: AddressInput) -> Result<Address, RoutingError> {
    match input {
        AddressInput::Address(address) => Ok(address),
        AddressInput::Text(text) => parse_coord_string(&text),
    }
}

pub fn parse_time(input: TimeInput) -> RequestTime {
    match input {
        TimeInput::Now => RequestTime::now(),
        TimeInput::At(t) => RequestTime::At(t),
        TimeInput::Text(text) => parse_time_string(&text),
    }
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` in local time, and `HH:MM`
/// for today. Anything else is returned as [`RequestTime::Unparsed`].
pub fn parse_time_string(input: &str) -> RequestTime {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return RequestTime::now();
    }

    if let Ok(t) = DateTime::parse_from_rfc3339(trimmed) {
        return RequestTime::At(t.with_timezone(&Local));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            if let Some(t) = Local.from_local_datetime(&naive).earliest() {
                return RequestTime::At(t);
            }
        }
    }

    if let Ok(time) = NaiveTime::parse_from_str(trimmed, "%H:%M") {
        let naive = Local::now().date_naive().and_time(time);
        if let Some(t) = Local.from_local_datetime(&naive).earliest() {
            return RequestTime::At(t);
        }
    }

    RequestTime::Unparsed(input.to_string())
}
