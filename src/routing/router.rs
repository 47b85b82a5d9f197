use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::{
    routing::{AddressInput, RoutingError, TimeInput, parse_address, parse_time},
    structures::{
        exchange::{
            BoardRequest, BoardResponse, Exchange, Extra, MultiboardRequest, MultiboardResponse,
            RouteRequest, RouteResponse,
        },
        plan::{Address, Stop},
    },
};

/// Receives merged partial responses before the final one.
pub type ProgressFn<'a> = &'a (dyn Fn(RouteResponse) + Send + Sync);

/// A routing backend.
///
/// `exec_*` never fail: every error ends up in the returned response's error
/// slot. Implementations must tolerate concurrent calls with independent
/// requests.
#[async_trait]
pub trait Router: Send + Sync {
    /// Backend tag, e.g. `"mockup"`, `"lookup"`, `"union"`.
    fn router_type(&self) -> &str;

    /// Resolves once the backend finished its own setup.
    async fn get_router(&self) -> Result<(), RoutingError> {
        Ok(())
    }

    fn resolve_address(&self, input: AddressInput) -> Result<Address, RoutingError> {
        parse_address(input)
    }

    /// Builds a request without any I/O. Unusable inputs fail the request
    /// instead of returning an error.
    fn build_route_request(
        &self,
        start: AddressInput,
        dest: AddressInput,
        time: TimeInput,
        extra: Extra,
    ) -> RouteRequest {
        let time = parse_time(time);
        let start = self.resolve_address(start);
        let dest = self.resolve_address(dest);

        let error = match (&start, &dest) {
            (Err(e), _) | (_, Err(e)) => Some(e.to_string()),
            _ => None,
        };
        let mut request = RouteRequest::new(
            self.router_type(),
            start.ok(),
            dest.ok(),
            time,
            extra,
        );
        match error {
            Some(error) => {
                debug!("{}: route request rejected: {error}", self.router_type());
                request.fail(error);
            }
            None => request.resolve(),
        }
        request
    }

    async fn exec_route_request(
        &self,
        request: Arc<RouteRequest>,
        on_progress: Option<ProgressFn<'_>>,
    ) -> RouteResponse;

    fn build_board_request(&self, _stop: Stop, _time: TimeInput) -> Result<BoardRequest, RoutingError> {
        Err(RoutingError::Unimplemented("board"))
    }

    async fn exec_board_request(&self, request: Arc<BoardRequest>) -> BoardResponse {
        let mut response = BoardResponse::new(request);
        response.fail(RoutingError::Unimplemented("board").to_string());
        response
    }

    fn build_multiboard_request(
        &self,
        _location: AddressInput,
        _time: TimeInput,
        _radius: f64,
        _limit: usize,
    ) -> Result<MultiboardRequest, RoutingError> {
        Err(RoutingError::Unimplemented("multiboard"))
    }

    async fn exec_multiboard_request(&self, request: Arc<MultiboardRequest>) -> MultiboardResponse {
        let mut response = MultiboardResponse::new(request);
        response.fail(RoutingError::Unimplemented("multiboard").to_string());
        response
    }
}
