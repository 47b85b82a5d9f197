use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use crate::structures::{
    exchange::{Exchange, Lifecycle, RequestType},
    plan::{Address, Stop},
};

/// Departure time attached to a request.
///
/// Strings that could not be understood are kept as they were given instead
/// of being rejected; routers decide what to do with them.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestTime {
    At(DateTime<Local>),
    Unparsed(String),
}

impl RequestTime {
    pub fn now() -> RequestTime {
        RequestTime::At(Local::now())
    }

    pub fn instant(&self) -> Option<DateTime<Local>> {
        match self {
            RequestTime::At(t) => Some(*t),
            RequestTime::Unparsed(_) => None,
        }
    }

    pub fn or_now(&self) -> DateTime<Local> {
        self.instant().unwrap_or_else(Local::now)
    }
}

pub type Extra = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub router: String,
    pub start: Option<Address>,
    pub dest: Option<Address>,
    pub time: RequestTime,
    pub extra: Extra,
    /// Per-child requests of a composite router, in declaration order.
    pub children: Vec<RouteRequest>,
    lifecycle: Lifecycle,
}

impl RouteRequest {
    pub fn new(
        router: impl Into<String>,
        start: Option<Address>,
        dest: Option<Address>,
        time: RequestTime,
        extra: Extra,
    ) -> RouteRequest {
        RouteRequest {
            router: router.into(),
            start,
            dest,
            time,
            extra,
            children: Vec::new(),
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn resolve(&mut self) {
        self.lifecycle.resolve(RequestType::Route, None);
    }

    /// Both endpoints, if the request is usable.
    pub fn endpoints(&self) -> Option<(&Address, &Address)> {
        if self.error().is_some() {
            return None;
        }
        Some((self.start.as_ref()?, self.dest.as_ref()?))
    }
}

impl Exchange for RouteRequest {
    fn request_type(&self) -> RequestType {
        RequestType::Route
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }
}

/// Departures from a single stop.
#[derive(Debug, Clone)]
pub struct BoardRequest {
    pub router: String,
    pub stop: Option<Stop>,
    pub time: RequestTime,
    lifecycle: Lifecycle,
}

impl BoardRequest {
    pub fn new(router: impl Into<String>, stop: Option<Stop>, time: RequestTime) -> BoardRequest {
        BoardRequest {
            router: router.into(),
            stop,
            time,
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn resolve(&mut self) {
        self.lifecycle.resolve(RequestType::Board, None);
    }
}

impl Exchange for BoardRequest {
    fn request_type(&self) -> RequestType {
        RequestType::Board
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }
}

/// Stops (and their departures) around a location.
#[derive(Debug, Clone)]
pub struct MultiboardRequest {
    pub router: String,
    pub location: Option<Address>,
    pub time: RequestTime,
    /// meters
    pub radius: f64,
    pub limit: usize,
    lifecycle: Lifecycle,
}

impl MultiboardRequest {
    pub fn new(
        router: impl Into<String>,
        location: Option<Address>,
        time: RequestTime,
        radius: f64,
        limit: usize,
    ) -> MultiboardRequest {
        MultiboardRequest {
            router: router.into(),
            location,
            time,
            radius,
            limit,
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn resolve(&mut self) {
        self.lifecycle.resolve(RequestType::Multiboard, None);
    }
}

impl Exchange for MultiboardRequest {
    fn request_type(&self) -> RequestType {
        RequestType::Multiboard
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }
}
