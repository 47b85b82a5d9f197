use std::sync::Arc;

use crate::structures::{
    exchange::{BoardRequest, Exchange, Lifecycle, MultiboardRequest, RequestType, RouteRequest},
    plan::{Leg, Route, Stop},
};

#[derive(Debug, Clone)]
pub struct RouteResponse {
    pub request: Arc<RouteRequest>,
    pub routes: Vec<Arc<Route>>,
    lifecycle: Lifecycle,
}

impl RouteResponse {
    pub fn new(request: Arc<RouteRequest>) -> RouteResponse {
        RouteResponse {
            request,
            routes: Vec::new(),
            lifecycle: Lifecycle::new(),
        }
    }

    /// A response already failed with the request's own error.
    pub fn from_failed_request(request: Arc<RouteRequest>) -> RouteResponse {
        let error = request.error().unwrap_or("invalid request").to_string();
        let mut response = RouteResponse::new(request);
        response.fail(error);
        response
    }

    pub fn resolve(&mut self, routes: Vec<Arc<Route>>) {
        self.resolve_with(routes, None);
    }

    /// Resolves with routes and an optional non-fatal error.
    pub fn resolve_with(&mut self, routes: Vec<Arc<Route>>, error: Option<String>) {
        self.routes = routes;
        self.lifecycle.resolve(RequestType::Route, error);
    }
}

impl Exchange for RouteResponse {
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

#[derive(Debug, Clone)]
pub struct BoardResponse {
    pub request: Arc<BoardRequest>,
    pub departures: Vec<Leg>,
    lifecycle: Lifecycle,
}

impl BoardResponse {
    pub fn new(request: Arc<BoardRequest>) -> BoardResponse {
        BoardResponse {
            request,
            departures: Vec::new(),
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn resolve(&mut self, departures: Vec<Leg>) {
        self.departures = departures;
        self.lifecycle.resolve(RequestType::Board, None);
    }
}

impl Exchange for BoardResponse {
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

#[derive(Debug, Clone)]
pub struct MultiboardResponse {
    pub request: Arc<MultiboardRequest>,
    pub stops: Vec<Stop>,
    lifecycle: Lifecycle,
}

impl MultiboardResponse {
    pub fn new(request: Arc<MultiboardRequest>) -> MultiboardResponse {
        MultiboardResponse {
            request,
            stops: Vec::new(),
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn resolve(&mut self, stops: Vec<Stop>) {
        self.stops = stops;
        self.lifecycle.resolve(RequestType::Multiboard, None);
    }
}

impl Exchange for MultiboardResponse {
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
