use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use kdtree::KdTree;
use tracing::{debug, error};

use crate::{
    routing::{
        AddressInput, ProgressFn, Router, RoutingError, TimeInput, parse_coord_string, parse_time,
    },
    structures::{
        LatLng,
        exchange::{Exchange, MultiboardRequest, MultiboardResponse, RouteRequest, RouteResponse},
        plan::{Address, Stop},
    },
};

/// Resolves named places and stops from a fixed table, then hands routing
/// over to an inner router.
pub struct LookupRouter {
    places: HashMap<String, Address>,
    stops: Vec<Stop>,
    stops_tree: KdTree<f64, usize, [f64; 2]>,
    inner: Arc<dyn Router>,
}

impl LookupRouter {
    pub fn new(inner: Arc<dyn Router>) -> LookupRouter {
        LookupRouter {
            places: HashMap::new(),
            stops: Vec::new(),
            stops_tree: KdTree::new(2),
            inner,
        }
    }

    pub fn add_place(&mut self, name: impl Into<String>, location: LatLng) {
        let name = name.into();
        let address = Address::new(location).with_name(name.clone());
        self.places.insert(name, address);
    }

    pub fn add_stop(&mut self, stop: Stop) -> Result<(), RoutingError> {
        let idx = self.stops.len();
        self.stops_tree
            .add(stop.address.location.as_array(), idx)
            .map_err(|e| RoutingError::InvalidCoordinate(format!("stop {}: {e:?}", stop.id)))?;
        self.stops.push(stop);
        Ok(())
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    fn find_stop(&self, key: &str) -> Option<&Stop> {
        self.stops
            .iter()
            .find(|s| s.id == key || s.address.name.as_deref() == Some(key))
    }

    fn nearest_stops(&self, location: LatLng, radius: f64, limit: usize) -> Result<Vec<Stop>, RoutingError> {
        if self.stops.is_empty() {
            return Ok(Vec::new());
        }
        match self
            .stops_tree
            .iter_nearest(&location.as_array(), &LatLng::distance)
        {
            Ok(it) => Ok(it
                .take_while(|(dist, _)| *dist <= radius)
                .take(limit)
                .map(|(_, idx)| self.stops[*idx].clone())
                .collect()),
            Err(e) => {
                error!("Failed to search stops around {location}: {e:?}");
                Err(RoutingError::InvalidCoordinate(location.to_string()))
            }
        }
    }
}

#[async_trait]
impl Router for LookupRouter {
    fn router_type(&self) -> &str {
        "lookup"
    }

    async fn get_router(&self) -> Result<(), RoutingError> {
        self.inner.get_router().await
    }

    fn resolve_address(&self, input: AddressInput) -> Result<Address, RoutingError> {
        let key = match input {
            AddressInput::Address(address) => return Ok(address),
            AddressInput::Text(key) => key,
        };
        if let Some(address) = self.places.get(&key) {
            return Ok(address.clone());
        }
        if let Some(stop) = self.find_stop(&key) {
            return Ok(stop.address.clone());
        }
        parse_coord_string(&key).map_err(|_| RoutingError::UnknownLocation(key))
    }

    async fn exec_route_request(
        &self,
        request: Arc<RouteRequest>,
        on_progress: Option<ProgressFn<'_>>,
    ) -> RouteResponse {
        if request.endpoints().is_none() {
            return RouteResponse::from_failed_request(request);
        }
        debug!(
            "lookup: delegating to {} router",
            self.inner.router_type()
        );
        self.inner.exec_route_request(request, on_progress).await
    }

    fn build_multiboard_request(
        &self,
        location: AddressInput,
        time: TimeInput,
        radius: f64,
        limit: usize,
    ) -> Result<MultiboardRequest, RoutingError> {
        let time = parse_time(time);
        let location = self.resolve_address(location);
        let error = match &location {
            Err(e) => Some(e.to_string()),
            Ok(_) if radius < 0.0 => Some(format!("Negative search radius {radius}")),
            Ok(_) => None,
        };
        let mut request =
            MultiboardRequest::new(self.router_type(), location.ok(), time, radius, limit);
        match error {
            Some(error) => request.fail(error),
            None => request.resolve(),
        }
        Ok(request)
    }

    async fn exec_multiboard_request(&self, request: Arc<MultiboardRequest>) -> MultiboardResponse {
        let mut response = MultiboardResponse::new(request.clone());
        if let Some(error) = request.error() {
            response.fail(error);
            return response;
        }
        let Some(location) = &request.location else {
            response.fail(RoutingError::MissingInput("location").to_string());
            return response;
        };

        match self.nearest_stops(location.location, request.radius, request.limit) {
            Ok(stops) => response.resolve(stops),
            Err(e) => response.fail(e.to_string()),
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        routing::MockupRouter,
        structures::{RoutingParameters, exchange::Extra},
    };

    fn router() -> LookupRouter {
        let inner = Arc::new(MockupRouter::new("mockup", RoutingParameters::default()));
        let mut router = LookupRouter::new(inner);
        router.add_place("home", LatLng::new(50.8466, 4.3528));
        for (id, name, lat, lng) in [
            ("midi", "Bruxelles-Midi", 50.8357, 4.3363),
            ("central", "Bruxelles-Central", 50.8454, 4.3571),
            ("nord", "Bruxelles-Nord", 50.8660, 4.3617),
        ] {
            router
                .add_stop(Stop::new(id, Address::new(LatLng::new(lat, lng)).with_name(name)))
                .unwrap();
        }
        router
    }

    #[test]
    fn resolves_places_stops_and_coordinates() {
        let router = router();
        assert_eq!(
            router.resolve_address("home".into()).unwrap().title(),
            "home"
        );
        assert_eq!(
            router.resolve_address("Bruxelles-Nord".into()).unwrap().title(),
            "Bruxelles-Nord"
        );
        assert_eq!(
            router.resolve_address("4.0,50.0".into()).unwrap().location,
            LatLng::new(50.0, 4.0)
        );
    }

    #[tokio::test]
    async fn unknown_name_fails_without_routing() {
        let router = router();
        let request = router.build_route_request(
            "home".into(),
            "atlantis".into(),
            TimeInput::Now,
            Extra::new(),
        );
        assert_eq!(request.error(), Some("Unknown location 'atlantis'"));
        assert_eq!(request.router, "lookup");

        let response = router.exec_route_request(Arc::new(request), None).await;
        assert_eq!(response.error(), Some("Unknown location 'atlantis'"));
        assert!(response.routes.is_empty());
    }

    #[tokio::test]
    async fn named_route_is_delegated() {
        let router = router();
        let request = router.build_route_request(
            "home".into(),
            "midi".into(),
            TimeInput::Now,
            Extra::new(),
        );
        let response = router.exec_route_request(Arc::new(request), None).await;
        assert_eq!(response.error(), None);
        assert_eq!(response.routes.len(), 1);
        assert_eq!(response.routes[0].arrival.title(), "Bruxelles-Midi");
    }

    #[tokio::test]
    async fn multiboard_returns_nearest_stops_within_radius() {
        let router = router();
        let request = router
            .build_multiboard_request("home".into(), TimeInput::Now, 1000.0, 10)
            .unwrap();
        let response = router.exec_multiboard_request(Arc::new(request)).await;
        assert_eq!(response.error(), None);
        let ids: Vec<&str> = response.stops.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["central"]);

        let request = router
            .build_multiboard_request("home".into(), TimeInput::Now, 5000.0, 2)
            .unwrap();
        let response = router.exec_multiboard_request(Arc::new(request)).await;
        let ids: Vec<&str> = response.stops.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["central", "midi"]);
    }

    #[test]
    fn multiboard_request_settles_once() {
        let router = router();
        let request = router
            .build_multiboard_request("home".into(), TimeInput::Now, 500.0, 5)
            .unwrap();
        assert!(request.is_settled());
        assert_eq!(request.error(), None);

        let request = router
            .build_multiboard_request("nowhere".into(), TimeInput::Now, -1.0, 5)
            .unwrap();
        assert_eq!(request.lifecycle().transitions(), 1);
        assert_eq!(request.error(), Some("Unknown location 'nowhere'"));

        let request = router
            .build_multiboard_request("home".into(), TimeInput::Now, -1.0, 5)
            .unwrap();
        assert_eq!(request.error(), Some("Negative search radius -1"));
    }

    #[tokio::test]
    async fn board_requests_are_unimplemented() {
        let router = router();
        let stop = router.find_stop("midi").unwrap().clone();
        assert_eq!(
            router.build_board_request(stop, TimeInput::Now).unwrap_err(),
            RoutingError::Unimplemented("board")
        );
    }
}
