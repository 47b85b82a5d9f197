use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    routing::{AddressInput, Router, TimeInput},
    source::{RouteEvent, RouteObserver, SourceId},
    structures::{
        exchange::{Exchange, Extra, RouteRequest, RouteResponse},
        plan::Route,
    },
};

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

pub type SubscriptionId = u64;

/// What happens to responses of an attempt superseded by a newer `set_route`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Superseded attempts still emit their `response` events.
    Deliver,
    /// Only the latest attempt emits `response` events.
    #[default]
    Drop,
}

/// How `set_route` treats the stored departure time.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeUpdate {
    Keep,
    Clear,
    Set(TimeInput),
}

impl From<TimeInput> for TimeUpdate {
    fn from(value: TimeInput) -> Self {
        TimeUpdate::Set(value)
    }
}

/// State replayed to an observer when it attaches.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub request: Option<Arc<RouteRequest>>,
    pub response: Option<Arc<RouteResponse>>,
    pub intermediate: bool,
    pub selected: Option<Arc<Route>>,
}

#[derive(Default)]
struct SourceState {
    start: Option<AddressInput>,
    dest: Option<AddressInput>,
    time: Option<TimeInput>,
    route_request: Option<Arc<RouteRequest>>,
    route_response: Option<Arc<RouteResponse>>,
    intermediate: bool,
    route_selected: Option<Arc<Route>>,
    subscribers: Vec<(SubscriptionId, Arc<dyn RouteObserver>)>,
    next_subscription: SubscriptionId,
}

type Subscribers = Vec<(SubscriptionId, Arc<dyn RouteObserver>)>;

/// Owns start/dest/time, drives a router and broadcasts the request
/// lifecycle and selection state to its observers.
///
/// Events are delivered synchronously, outside of the internal lock, in
/// subscription order.
pub struct RouteSource {
    id: SourceId,
    router: Arc<dyn Router>,
    stale_policy: StalePolicy,
    generation: AtomicU64,
    state: Mutex<SourceState>,
}

impl RouteSource {
    pub fn new(router: Arc<dyn Router>) -> RouteSource {
        RouteSource {
            id: NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed),
            router,
            stale_policy: StalePolicy::default(),
            generation: AtomicU64::new(0),
            state: Mutex::new(SourceState::default()),
        }
    }

    pub fn with_stale_policy(mut self, policy: StalePolicy) -> RouteSource {
        self.stale_policy = policy;
        self
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn router(&self) -> &Arc<dyn Router> {
        &self.router
    }

    pub fn stale_policy(&self) -> StalePolicy {
        self.stale_policy
    }

    pub fn start(&self) -> Option<AddressInput> {
        self.state.lock().start.clone()
    }

    pub fn dest(&self) -> Option<AddressInput> {
        self.state.lock().dest.clone()
    }

    pub fn time(&self) -> Option<TimeInput> {
        self.state.lock().time.clone()
    }

    pub fn route_request(&self) -> Option<Arc<RouteRequest>> {
        self.state.lock().route_request.clone()
    }

    pub fn route_response(&self) -> Option<Arc<RouteResponse>> {
        self.state.lock().route_response.clone()
    }

    pub fn route_selected(&self) -> Option<Arc<Route>> {
        self.state.lock().route_selected.clone()
    }

    /// Bumped by every routing attempt and every clear. Responses of an
    /// older generation are stale.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self, observer: Arc<dyn RouteObserver>) -> SubscriptionId {
        self.attach(observer).0
    }

    /// Subscribes and captures the current state under the same lock, so no
    /// event can slip between the snapshot and the subscription.
    pub fn attach(&self, observer: Arc<dyn RouteObserver>) -> (SubscriptionId, Snapshot) {
        let mut state = self.state.lock();
        state.next_subscription += 1;
        let id = state.next_subscription;
        state.subscribers.push((id, observer));
        let snapshot = Snapshot {
            request: state.route_request.clone(),
            response: state.route_response.clone(),
            intermediate: state.intermediate,
            selected: state.route_selected.clone(),
        };
        (id, snapshot)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.lock();
        let before = state.subscribers.len();
        state.subscribers.retain(|(sid, _)| *sid != id);
        before != state.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }

    fn deliver(subscribers: &Subscribers, event: RouteEvent) {
        for (_, observer) in subscribers {
            observer.handle_route_event(&event);
        }
    }

    /// Applies `update` to the state and emits whatever events it returns.
    fn update<F>(&self, update: F)
    where
        F: FnOnce(&mut SourceState) -> Vec<RouteEvent>,
    {
        let (events, subscribers) = {
            let mut state = self.state.lock();
            let events = update(&mut state);
            (events, state.subscribers.clone())
        };
        for event in events {
            debug!("source {}: emitting {}", self.id, event.name());
            RouteSource::deliver(&subscribers, event);
        }
    }

    /// Updates the inputs and, when both endpoints are known, runs one
    /// routing attempt: `request`, any intermediate `response`s, then the
    /// final `response`.
    pub async fn set_route(
        &self,
        start: Option<AddressInput>,
        dest: Option<AddressInput>,
        time: TimeUpdate,
    ) {
        let (start, dest, time) = {
            let mut state = self.state.lock();
            state.start = start;
            state.dest = dest;
            match time {
                TimeUpdate::Keep => {}
                TimeUpdate::Clear => state.time = None,
                TimeUpdate::Set(t) => state.time = Some(t),
            }
            (state.start.clone(), state.dest.clone(), state.time.clone())
        };

        let (Some(start), Some(dest)) = (start, dest) else {
            self.clear_route();
            return;
        };

        self.deselect_route();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Err(e) = self.router.get_router().await {
            warn!(
                "source {}: {} router not ready, abandoning route attempt: {e}",
                self.id,
                self.router.router_type()
            );
            return;
        }

        let request = Arc::new(self.router.build_route_request(
            start,
            dest,
            time.unwrap_or(TimeInput::Now),
            Extra::new(),
        ));
        info!(
            "source {}: route attempt {generation} via {}",
            self.id, request.router
        );
        self.request_route(request.clone());

        let on_progress = |partial: RouteResponse| {
            if self.accepts(generation) {
                self.response_route(Arc::new(partial), true);
            } else {
                debug!("source {}: dropping progress of stale attempt {generation}", self.id);
            }
        };
        let response = self
            .router
            .exec_route_request(request, Some(&on_progress))
            .await;

        if let Some(error) = response.error() {
            info!("source {}: route attempt {generation} failed: {error}", self.id);
        }
        if self.accepts(generation) {
            self.response_route(Arc::new(response), false);
        } else {
            debug!("source {}: dropping response of stale attempt {generation}", self.id);
        }
    }

    fn accepts(&self, generation: u64) -> bool {
        self.stale_policy == StalePolicy::Deliver
            || self.generation.load(Ordering::SeqCst) == generation
    }

    pub fn request_route(&self, request: Arc<RouteRequest>) {
        let source = self.id;
        self.update(|state| {
            state.route_request = Some(request.clone());
            state.route_response = None;
            state.intermediate = false;
            vec![RouteEvent::Request { request, source }]
        });
    }

    pub fn response_route(&self, response: Arc<RouteResponse>, intermediate: bool) {
        let source = self.id;
        self.update(|state| {
            state.route_response = Some(response.clone());
            state.intermediate = intermediate;
            vec![RouteEvent::Response {
                response,
                intermediate,
                source,
            }]
        });
    }

    /// Drops the selection and the last exchange, then emits `clear`. Any
    /// attempt still in flight becomes stale.
    pub fn clear_route(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let source = self.id;
        self.update(|state| {
            let mut events = Vec::with_capacity(2);
            if let Some(route) = state.route_selected.take() {
                events.push(RouteEvent::Deselected { route, source });
            }
            state.route_request = None;
            state.route_response = None;
            state.intermediate = false;
            events.push(RouteEvent::Clear { source });
            events
        });
    }

    pub fn select_route(&self, route: Arc<Route>) {
        let source = self.id;
        self.update(|state| {
            if let Some(current) = &state.route_selected {
                if Arc::ptr_eq(current, &route) {
                    return Vec::new();
                }
            }
            let mut events = Vec::with_capacity(2);
            if let Some(previous) = state.route_selected.replace(route.clone()) {
                events.push(RouteEvent::Deselected {
                    route: previous,
                    source,
                });
            }
            events.push(RouteEvent::Selected { route, source });
            events
        });
    }

    pub fn deselect_route(&self) {
        let source = self.id;
        self.update(|state| match state.route_selected.take() {
            Some(route) => vec![RouteEvent::Deselected { route, source }],
            None => Vec::new(),
        });
    }

    pub fn emphasize_route(&self, route: Option<Arc<Route>>, accent: Option<String>) {
        let source = self.id;
        self.update(|state| {
            let is_selected = match (&route, &state.route_selected) {
                (Some(route), Some(selected)) => Arc::ptr_eq(route, selected),
                _ => false,
            };
            vec![RouteEvent::Emphasized {
                route,
                accent,
                is_selected,
                source,
            }]
        });
    }
}
