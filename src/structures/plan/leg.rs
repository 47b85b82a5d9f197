use crate::structures::{
    LatLng,
    plan::{Place, Transport},
};

/// One transport-mode segment of a route.
///
/// `geometry` holds the intermediate points only; `departure` and `arrival`
/// are the endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub id: Option<String>,
    pub departure: Place,
    pub arrival: Place,
    pub transport: Transport,
    pub geometry: Vec<LatLng>,
    /// meters
    pub distance: f64,
    pub summary: Option<String>,
    pub steps: Vec<Place>,
}

impl Leg {
    pub fn new(departure: Place, arrival: Place, transport: Transport) -> Leg {
        Leg {
            id: None,
            departure,
            arrival,
            transport,
            geometry: Vec::new(),
            distance: 0.0,
            summary: None,
            steps: Vec::new(),
        }
    }

    /// Appends `other` to this leg. The former arrival becomes a geometry
    /// point and `other.departure` becomes a step.
    pub fn extend_leg(&mut self, other: Leg) {
        self.geometry.push(self.arrival.location());
        self.geometry.extend(other.geometry);
        self.arrival = other.arrival;
        self.distance += other.distance;
        self.steps.push(other.departure);
        self.steps.extend(other.steps);
    }

    pub fn duration_ms(&self) -> Option<i64> {
        match (self.departure.time(), self.arrival.time()) {
            (Some(dep), Some(arr)) => Some((arr - dep).num_milliseconds()),
            _ => None,
        }
    }
}

/// Collapses consecutive legs sharing the same transport into one.
pub fn merge_legs(legs: Vec<Leg>) -> Vec<Leg> {
    let mut merged: Vec<Leg> = Vec::with_capacity(legs.len());
    for leg in legs {
        match merged.last_mut() {
            Some(last) if last.transport.is_same(&leg.transport) => last.extend_leg(leg),
            _ => merged.push(leg),
        }
    }
    merged
}
