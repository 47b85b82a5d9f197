use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportType {
    Walk,
    Car,
    Bike,
    Bus,
    Tram,
    Subway,
    Metro,
    Train,
    HighspeedTrain,
    BusRapid,
    Transit,
    Wait,
}

impl TransportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportType::Walk => "walk",
            TransportType::Car => "car",
            TransportType::Bike => "bike",
            TransportType::Bus => "bus",
            TransportType::Tram => "tram",
            TransportType::Subway => "subway",
            TransportType::Metro => "metro",
            TransportType::Train => "train",
            TransportType::HighspeedTrain => "highspeed_train",
            TransportType::BusRapid => "bus_rapid",
            TransportType::Transit => "transit",
            TransportType::Wait => "wait",
        }
    }

    pub fn is_transit(&self) -> bool {
        !matches!(
            self,
            TransportType::Walk | TransportType::Car | TransportType::Bike | TransportType::Wait
        )
    }
}

impl Display for TransportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transport {
    pub kind: TransportType,
    pub name: Option<String>,
    /// `#rrggbb`
    pub color: Option<String>,
    pub headsign: Option<String>,
}

impl Transport {
    pub fn new(kind: TransportType) -> Transport {
        Transport {
            kind,
            name: None,
            color: None,
            headsign: None,
        }
    }

    pub fn named(kind: TransportType, name: impl Into<String>) -> Transport {
        Transport {
            name: Some(name.into()),
            ..Transport::new(kind)
        }
    }

    /// Identity is the mode and the line name; colour and headsign are
    /// presentation only.
    pub fn is_same(&self, other: &Transport) -> bool {
        self.kind == other.kind && self.name == other.name
    }
}
