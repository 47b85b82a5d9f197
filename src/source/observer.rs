use std::sync::Arc;

use tracing::info;

use crate::{
    source::{RouteEvent, RouteSource, SubscriptionId},
    structures::{
        exchange::{Exchange, RouteRequest, RouteResponse},
        plan::Route,
    },
};

/// Hooks called for each event of the attached [`RouteSource`]. All of them
/// do nothing by default.
pub trait RouteObserver: Send + Sync {
    fn on_route_request(&self, _request: &Arc<RouteRequest>) {}

    fn on_route_response(&self, _response: &Arc<RouteResponse>, _intermediate: bool) {}

    fn on_route_clear(&self) {}

    fn on_route_selected(&self, _route: &Arc<Route>) {}

    fn on_route_deselected(&self, _route: &Arc<Route>) {}

    fn on_route_emphasized(&self, _route: Option<&Arc<Route>>, _accent: Option<&str>, _is_selected: bool) {}

    fn handle_route_event(&self, event: &RouteEvent) {
        match event {
            RouteEvent::Request { request, .. } => self.on_route_request(request),
            RouteEvent::Response {
                response,
                intermediate,
                ..
            } => self.on_route_response(response, *intermediate),
            RouteEvent::Clear { .. } => self.on_route_clear(),
            RouteEvent::Selected { route, .. } => self.on_route_selected(route),
            RouteEvent::Deselected { route, .. } => self.on_route_deselected(route),
            RouteEvent::Emphasized {
                route,
                accent,
                is_selected,
                ..
            } => self.on_route_emphasized(route.as_ref(), accent.as_deref(), *is_selected),
        }
    }
}

/// Keeps one observer attached to at most one [`RouteSource`].
pub struct ObserverBinding {
    observer: Arc<dyn RouteObserver>,
    attached: Option<(Arc<RouteSource>, SubscriptionId)>,
}

impl ObserverBinding {
    pub fn new(observer: Arc<dyn RouteObserver>) -> ObserverBinding {
        ObserverBinding {
            observer,
            attached: None,
        }
    }

    pub fn route_source(&self) -> Option<&Arc<RouteSource>> {
        self.attached.as_ref().map(|(source, _)| source)
    }

    /// Detaches from the current source, resetting the observer with a
    /// local clear, then attaches to `source` and replays its state:
    /// request, response, selection. Passing the source already attached
    /// does nothing: no clear, no replay.
    pub fn set_route_source(&mut self, source: Option<Arc<RouteSource>>) {
        if let (Some((current, _)), Some(next)) = (&self.attached, &source) {
            if Arc::ptr_eq(current, next) {
                return;
            }
        }

        if let Some((previous, id)) = self.attached.take() {
            previous.unsubscribe(id);
            self.observer.on_route_clear();
        }

        let Some(source) = source else {
            return;
        };
        let (id, snapshot) = source.attach(self.observer.clone());
        self.attached = Some((source, id));

        if let Some(request) = &snapshot.request {
            self.observer.on_route_request(request);
            if let Some(response) = &snapshot.response {
                self.observer
                    .on_route_response(response, snapshot.intermediate);
            }
        }
        if let Some(route) = &snapshot.selected {
            self.observer.on_route_selected(route);
        }
    }
}

impl Drop for ObserverBinding {
    fn drop(&mut self) {
        if let Some((source, id)) = self.attached.take() {
            source.unsubscribe(id);
        }
    }
}

/// Logs every event it sees.
pub struct TracingObserver {
    label: String,
}

impl TracingObserver {
    pub fn new(label: impl Into<String>) -> TracingObserver {
        TracingObserver {
            label: label.into(),
        }
    }
}

impl RouteObserver for TracingObserver {
    fn on_route_request(&self, request: &Arc<RouteRequest>) {
        info!("[{}] request via {}", self.label, request.router);
    }

    fn on_route_response(&self, response: &Arc<RouteResponse>, intermediate: bool) {
        if intermediate {
            info!(
                "[{}] progress: {} routes so far",
                self.label,
                response.routes.len()
            );
            return;
        }
        match response.error() {
            Some(error) => info!(
                "[{}] response with {} routes, error: {error}",
                self.label,
                response.routes.len()
            ),
            None => info!(
                "[{}] response with {} routes in {:.3}s",
                self.label,
                response.routes.len(),
                response.elapsed().unwrap_or_default()
            ),
        }
        for route in &response.routes {
            info!(
                "[{}]   {} ({}) {} -> {}: {} legs, {:.0} m, {}",
                self.label,
                route.id,
                route.router,
                route.departure.title(),
                route.arrival.title(),
                route.legs.len(),
                route.distance(),
                route.duration()
            );
        }
    }

    fn on_route_clear(&self) {
        info!("[{}] cleared", self.label);
    }

    fn on_route_selected(&self, route: &Arc<Route>) {
        info!("[{}] selected {}", self.label, route.id);
    }

    fn on_route_deselected(&self, route: &Arc<Route>) {
        info!("[{}] deselected {}", self.label, route.id);
    }

    fn on_route_emphasized(&self, route: Option<&Arc<Route>>, accent: Option<&str>, is_selected: bool) {
        info!(
            "[{}] emphasized {:?} accent={:?} selected={is_selected}",
            self.label,
            route.map(|r| r.id.as_str()),
            accent
        );
    }
}
