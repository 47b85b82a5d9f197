use chrono::{DateTime, Local};

use crate::structures::LatLng;

/// An arbitrary place, optionally labelled and timed.
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub location: LatLng,
    pub name: Option<String>,
    pub time: Option<DateTime<Local>>,
}

impl Address {
    pub fn new(location: LatLng) -> Address {
        Address {
            location,
            name: None,
            time: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Address {
        self.name = Some(name.into());
        self
    }

    pub fn with_time(mut self, time: DateTime<Local>) -> Address {
        self.time = Some(time);
        self
    }

    /// The display name, or the coordinates rounded to two decimals.
    pub fn title(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!(
                "{:.2},{:.2}",
                self.location.latitude, self.location.longitude
            ),
        }
    }

    pub fn time_string(&self) -> Option<String> {
        self.time.map(|t| t.format("%H:%M").to_string())
    }
}

/// A fixed, named transit location.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub address: Address,
    pub id: String,
    pub platform: Option<String>,
    pub source: Option<String>,
}

impl Stop {
    pub fn new(id: impl Into<String>, address: Address) -> Stop {
        Stop {
            address,
            id: id.into(),
            platform: None,
            source: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Place {
    Address(Address),
    Stop(Stop),
}

impl Place {
    pub fn address(&self) -> &Address {
        match self {
            Place::Address(a) => a,
            Place::Stop(s) => &s.address,
        }
    }

    pub fn address_mut(&mut self) -> &mut Address {
        match self {
            Place::Address(a) => a,
            Place::Stop(s) => &mut s.address,
        }
    }

    pub fn location(&self) -> LatLng {
        self.address().location
    }

    pub fn time(&self) -> Option<DateTime<Local>> {
        self.address().time
    }

    pub fn title(&self) -> String {
        self.address().title()
    }

    pub fn time_string(&self) -> Option<String> {
        self.address().time_string()
    }

    pub fn as_stop(&self) -> Option<&Stop> {
        match self {
            Place::Stop(s) => Some(s),
            Place::Address(_) => None,
        }
    }
}

impl From<Address> for Place {
    fn from(address: Address) -> Self {
        Place::Address(address)
    }
}

impl From<Stop> for Place {
    fn from(stop: Stop) -> Self {
        Place::Stop(stop)
    }
}
