use std::sync::Arc;

use crate::structures::{
    exchange::{RouteRequest, RouteResponse},
    plan::Route,
};

/// Identifies the [`RouteSource`](crate::source::RouteSource) an event came from.
pub type SourceId = u64;

#[derive(Debug, Clone)]
pub enum RouteEvent {
    Request {
        request: Arc<RouteRequest>,
        source: SourceId,
    },
    /// `intermediate` responses are progress snapshots; a final one follows.
    Response {
        response: Arc<RouteResponse>,
        intermediate: bool,
        source: SourceId,
    },
    Clear {
        source: SourceId,
    },
    Selected {
        route: Arc<Route>,
        source: SourceId,
    },
    Deselected {
        route: Arc<Route>,
        source: SourceId,
    },
    /// Transient highlight, does not touch the selection.
    Emphasized {
        route: Option<Arc<Route>>,
        accent: Option<String>,
        is_selected: bool,
        source: SourceId,
    },
}

impl RouteEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RouteEvent::Request { .. } => "request",
            RouteEvent::Response { .. } => "response",
            RouteEvent::Clear { .. } => "clear",
            RouteEvent::Selected { .. } => "selected",
            RouteEvent::Deselected { .. } => "deselected",
            RouteEvent::Emphasized { .. } => "emphasized",
        }
    }

    pub fn source(&self) -> SourceId {
        match self {
            RouteEvent::Request { source, .. }
            | RouteEvent::Response { source, .. }
            | RouteEvent::Clear { source }
            | RouteEvent::Selected { source, .. }
            | RouteEvent::Deselected { source, .. }
            | RouteEvent::Emphasized { source, .. } => *source,
        }
    }
}
