use crate::structures::plan::{Leg, Place};

/// One candidate itinerary, as produced by a router.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: String,
    /// Type tag of the router that produced this route.
    pub router: String,
    pub departure: Place,
    pub arrival: Place,
    pub legs: Vec<Leg>,
}

impl Route {
    /// Builds a route spanning `legs`. Returns `None` when `legs` is empty.
    pub fn from_legs(id: impl Into<String>, router: impl Into<String>, legs: Vec<Leg>) -> Option<Route> {
        let departure = legs.first()?.departure.clone();
        let arrival = legs.last()?.arrival.clone();
        Some(Route {
            id: id.into(),
            router: router.into(),
            departure,
            arrival,
            legs,
        })
    }

    pub fn duration_ms(&self) -> Option<i64> {
        match (self.departure.time(), self.arrival.time()) {
            (Some(dep), Some(arr)) => Some((arr - dep).num_milliseconds()),
            _ => None,
        }
    }

    /// Human readable travel time, empty when times are unknown.
    pub fn duration(&self) -> String {
        self.duration_ms().map(format_duration).unwrap_or_default()
    }

    pub fn distance(&self) -> f64 {
        self.legs.iter().map(|l| l.distance).sum()
    }
}

fn unit(value: i64, singular: &str, plural: &str) -> String {
    if value == 1 {
        format!("{value} {singular}")
    } else {
        format!("{value} {plural}")
    }
}

/// Formats a span as `"1 hr 2 mins 3 secs"`, leaving out zero components.
/// A zero or negative span is the empty string.
pub fn format_duration(ms: i64) -> String {
    let total_secs = ms.max(0) / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(unit(hours, "hr", "hrs"));
    }
    if minutes > 0 {
        parts.push(unit(minutes, "min", "mins"));
    }
    if seconds > 0 {
        parts.push(unit(seconds, "sec", "secs"));
    }
    parts.join(" ")
}
