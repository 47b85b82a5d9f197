use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    routing::{ProgressFn, Router},
    structures::{
        RoutingParameters,
        exchange::{Exchange, RequestTime, RouteRequest, RouteResponse},
        plan::{Address, Leg, Place, Route, Transport, TransportType, merge_legs},
    },
};

/// Offline router producing a straight walking route between the endpoints.
pub struct MockupRouter {
    name: String,
    params: RoutingParameters,
    delay: Option<Duration>,
    segments: usize,
}

impl MockupRouter {
    pub fn new(name: impl Into<String>, params: RoutingParameters) -> MockupRouter {
        MockupRouter {
            name: name.into(),
            params,
            delay: None,
            segments: 3,
        }
    }

    /// Simulated network latency.
    pub fn with_delay(mut self, delay: Duration) -> MockupRouter {
        self.delay = Some(delay);
        self
    }

    pub fn with_segments(mut self, segments: usize) -> MockupRouter {
        self.segments = segments.max(1);
        self
    }

    fn plan(&self, request: &RouteRequest, start: &Address, dest: &Address) -> Option<Route> {
        let departure_time = match &request.time {
            RequestTime::At(t) => *t,
            RequestTime::Unparsed(raw) => {
                warn!("{}: cannot read time '{raw}', leaving now", self.name);
                request.time.or_now()
            }
        };

        let total = start.location.dist(dest.location);
        let segment_length = total / self.segments as f64;
        let segment_duration =
            chrono::Duration::milliseconds(self.params.walk_duration_ms(segment_length));

        let mut places = Vec::with_capacity(self.segments + 1);
        places.push(Place::Address(start.clone().with_time(departure_time)));
        for i in 1..self.segments {
            let location = start
                .location
                .lerp(dest.location, i as f64 / self.segments as f64);
            places.push(Place::Address(
                Address::new(location).with_time(departure_time + segment_duration * i as i32),
            ));
        }
        places.push(Place::Address(
            dest.clone()
                .with_time(departure_time + segment_duration * self.segments as i32),
        ));

        let segments = places
            .windows(2)
            .map(|pair| {
                let mut leg = Leg::new(
                    pair[0].clone(),
                    pair[1].clone(),
                    Transport::new(TransportType::Walk),
                );
                leg.distance = segment_length;
                leg
            })
            .collect();

        let mut legs = merge_legs(segments);
        for (idx, leg) in legs.iter_mut().enumerate() {
            leg.id = Some(format!("{}-leg-{idx}", self.name));
            leg.summary = Some(format!("Walk {:.0} m", leg.distance));
        }

        Route::from_legs(
            format!("{}-{}", self.name, departure_time.timestamp()),
            self.router_type(),
            legs,
        )
    }
}

#[async_trait]
impl Router for MockupRouter {
    fn router_type(&self) -> &str {
        &self.name
    }

    async fn exec_route_request(
        &self,
        request: Arc<RouteRequest>,
        _on_progress: Option<ProgressFn<'_>>,
    ) -> RouteResponse {
        let Some((start, dest)) = request.endpoints() else {
            return RouteResponse::from_failed_request(request.clone());
        };
        let route = self.plan(&request, start, dest);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut response = RouteResponse::new(request.clone());
        match route {
            Some(route) => {
                debug!("{}: planned {} ({})", self.name, route.id, route.duration());
                response.resolve(vec![Arc::new(route)]);
            }
            None => response.fail(format!("{}: no route found", self.name)),
        }
        response
    }
}
