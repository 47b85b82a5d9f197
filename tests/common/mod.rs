#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use mc_routing::{
    routing::{ProgressFn, Router, RoutingError},
    source::RouteObserver,
    structures::{
        LatLng,
        exchange::{Exchange, RouteRequest, RouteResponse},
        plan::{Address, Leg, Place, Route, Transport, TransportType},
    },
};
use parking_lot::Mutex;

pub fn route(id: &str, router: &str) -> Arc<Route> {
    let leg = Leg::new(
        Place::Address(Address::new(LatLng::new(50.84, 4.35)).with_name("a")),
        Place::Address(Address::new(LatLng::new(50.83, 4.33)).with_name("b")),
        Transport::new(TransportType::Walk),
    );
    Arc::new(Route::from_legs(id, router, vec![leg]).unwrap())
}

/// Router answering from a script.
pub struct StubRouter {
    name: String,
    routes: Vec<Arc<Route>>,
    error: Option<String>,
    progress: usize,
    delay: Duration,
    delays: HashMap<String, Duration>,
    unavailable: Option<String>,
    panics: bool,
    calls: AtomicUsize,
}

impl StubRouter {
    pub fn new(name: &str) -> StubRouter {
        StubRouter {
            name: name.to_string(),
            routes: Vec::new(),
            error: None,
            progress: 0,
            delay: Duration::ZERO,
            delays: HashMap::new(),
            unavailable: None,
            panics: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_routes(mut self, ids: &[&str]) -> StubRouter {
        self.routes = ids.iter().map(|id| route(id, &self.name)).collect();
        self
    }

    pub fn with_error(mut self, error: &str) -> StubRouter {
        self.error = Some(error.to_string());
        self
    }

    /// Number of progress callbacks before resolving.
    pub fn with_progress(mut self, progress: usize) -> StubRouter {
        self.progress = progress;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> StubRouter {
        self.delay = delay;
        self
    }

    /// Delay applied when the start address is titled `start`.
    pub fn with_delay_for(mut self, start: &str, delay: Duration) -> StubRouter {
        self.delays.insert(start.to_string(), delay);
        self
    }

    pub fn unavailable(mut self, reason: &str) -> StubRouter {
        self.unavailable = Some(reason.to_string());
        self
    }

    pub fn panicking(mut self) -> StubRouter {
        self.panics = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Router for StubRouter {
    fn router_type(&self) -> &str {
        &self.name
    }

    async fn get_router(&self) -> Result<(), RoutingError> {
        match &self.unavailable {
            Some(reason) => Err(RoutingError::RouterUnavailable(reason.clone())),
            None => Ok(()),
        }
    }

    async fn exec_route_request(
        &self,
        request: Arc<RouteRequest>,
        on_progress: Option<ProgressFn<'_>>,
    ) -> RouteResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panics {
            panic!("{} exploded", self.name);
        }
        if request.endpoints().is_none() {
            return RouteResponse::from_failed_request(request);
        }

        let delay = request
            .start
            .as_ref()
            .and_then(|s| self.delays.get(&s.title()))
            .copied()
            .unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(on_progress) = on_progress {
            for i in 0..self.progress {
                let mut partial = RouteResponse::new(request.clone());
                partial.routes = self.routes.iter().take(i + 1).cloned().collect();
                on_progress(partial);
            }
        }

        let mut response = RouteResponse::new(request);
        response.resolve_with(self.routes.clone(), self.error.clone());
        response
    }
}

/// Observer writing one line per callback.
#[derive(Default)]
pub struct Recorder {
    lines: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }

    fn push(&self, line: String) {
        self.lines.lock().push(line);
    }
}

impl RouteObserver for Recorder {
    fn on_route_request(&self, request: &Arc<RouteRequest>) {
        let start = request
            .start
            .as_ref()
            .map(|s| s.title())
            .unwrap_or_else(|| "?".to_string());
        match request.error() {
            Some(error) => self.push(format!("request {start} error={error}")),
            None => self.push(format!("request {start}")),
        }
    }

    fn on_route_response(&self, response: &Arc<RouteResponse>, intermediate: bool) {
        let kind = if intermediate { "partial" } else { "final" };
        let ids: Vec<&str> = response.routes.iter().map(|r| r.id.as_str()).collect();
        match response.error() {
            Some(error) => self.push(format!("response {kind} [{}] error={error}", ids.join(","))),
            None => self.push(format!("response {kind} [{}]", ids.join(","))),
        }
    }

    fn on_route_clear(&self) {
        self.push("clear".to_string());
    }

    fn on_route_selected(&self, route: &Arc<Route>) {
        self.push(format!("selected {}", route.id));
    }

    fn on_route_deselected(&self, route: &Arc<Route>) {
        self.push(format!("deselected {}", route.id));
    }

    fn on_route_emphasized(&self, route: Option<&Arc<Route>>, accent: Option<&str>, is_selected: bool) {
        self.push(format!(
            "emphasized {} accent={} selected={is_selected}",
            route.map(|r| r.id.as_str()).unwrap_or("-"),
            accent.unwrap_or("-")
        ));
    }
}
