use std::{any::Any, panic::AssertUnwindSafe, sync::Arc};

use async_trait::async_trait;
use futures::{
    FutureExt, StreamExt,
    future::join_all,
    stream::FuturesUnordered,
};
use tracing::{debug, error, warn};

use crate::{
    routing::{AddressInput, ProgressFn, Router, RoutingError, TimeInput, parse_time},
    structures::exchange::{Exchange, Extra, RouteRequest, RouteResponse},
};

/// Separator between child errors in the merged error string.
pub const ERROR_SEPARATOR: &str = "; ";

/// Fans one request out to several routers and merges what they return.
pub struct UnionRouter {
    children: Vec<Arc<dyn Router>>,
}

impl UnionRouter {
    pub fn new(children: Vec<Arc<dyn Router>>) -> UnionRouter {
        UnionRouter { children }
    }

    pub fn children(&self) -> &[Arc<dyn Router>] {
        &self.children
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[async_trait]
impl Router for UnionRouter {
    fn router_type(&self) -> &str {
        "union"
    }

    /// Ready as soon as one child is; fails only when every child failed.
    async fn get_router(&self) -> Result<(), RoutingError> {
        if self.children.is_empty() {
            return Err(RoutingError::RouterUnavailable(
                "union router has no children".to_string(),
            ));
        }
        let results = join_all(self.children.iter().map(|c| c.get_router())).await;
        let mut errors = Vec::new();
        for (child, result) in self.children.iter().zip(results) {
            if let Err(e) = result {
                warn!("union: child {} unavailable: {e}", child.router_type());
                errors.push(e.to_string());
            }
        }
        if errors.len() == self.children.len() {
            return Err(RoutingError::RouterUnavailable(errors.join(ERROR_SEPARATOR)));
        }
        Ok(())
    }

    fn build_route_request(
        &self,
        start: AddressInput,
        dest: AddressInput,
        time: TimeInput,
        extra: Extra,
    ) -> RouteRequest {
        let children: Vec<RouteRequest> = self
            .children
            .iter()
            .map(|child| {
                child.build_route_request(start.clone(), dest.clone(), time.clone(), extra.clone())
            })
            .collect();

        let usable = children.iter().find(|c| c.endpoints().is_some());
        let mut request = RouteRequest::new(
            self.router_type(),
            usable.and_then(|c| c.start.clone()),
            usable.and_then(|c| c.dest.clone()),
            parse_time(time),
            extra,
        );
        request.children = children;
        request.resolve();
        request
    }

    async fn exec_route_request(
        &self,
        request: Arc<RouteRequest>,
        on_progress: Option<ProgressFn<'_>>,
    ) -> RouteResponse {
        if request.children.len() != self.children.len() {
            let mut response = RouteResponse::new(request.clone());
            response.fail(format!(
                "union request carries {} child requests for {} routers",
                request.children.len(),
                self.children.len()
            ));
            return response;
        }

        let mut pending: FuturesUnordered<_> = self
            .children
            .iter()
            .zip(request.children.iter().cloned())
            .enumerate()
            .map(|(idx, (router, child))| async move {
                let child = Arc::new(child);
                let outcome = AssertUnwindSafe(router.exec_route_request(child.clone(), None))
                    .catch_unwind()
                    .await;
                let response = match outcome {
                    Ok(response) => response,
                    Err(payload) => {
                        let err = RoutingError::ChildPanicked {
                            router: router.router_type().to_string(),
                            message: panic_message(payload.as_ref()),
                        };
                        error!("union: {err}");
                        let mut response = RouteResponse::new(child);
                        response.fail(err.to_string());
                        response
                    }
                };
                (idx, response)
            })
            .collect();

        let mut merged = RouteResponse::new(request.clone());
        let mut settled: Vec<Option<RouteResponse>> = vec![None; self.children.len()];

        while let Some((idx, response)) = pending.next().await {
            debug!(
                "union: {} settled with {} routes (error: {:?})",
                self.children[idx].router_type(),
                response.routes.len(),
                response.error()
            );
            merged.routes.extend(response.routes.iter().cloned());
            if let Some(on_progress) = on_progress {
                on_progress(merged.clone());
            }
            settled[idx] = Some(response);
        }

        let mut routes = Vec::new();
        let mut errors = Vec::new();
        for response in settled.into_iter().flatten() {
            if let Some(error) = response.error() {
                errors.push(error.to_string());
            }
            routes.extend(response.routes);
        }
        let error = Some(errors.join(ERROR_SEPARATOR)).filter(|e| !e.is_empty());

        merged.resolve_with(routes, error);
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        routing::MockupRouter,
        structures::RoutingParameters,
    };

    #[test]
    fn builds_one_request_per_child() {
        let union = UnionRouter::new(vec![
            Arc::new(MockupRouter::new("a", RoutingParameters::default())),
            Arc::new(MockupRouter::new("b", RoutingParameters::default())),
        ]);
        let request = union.build_route_request(
            "4.35,50.84".into(),
            "4.33,50.83".into(),
            TimeInput::Now,
            Extra::new(),
        );
        assert_eq!(request.router, "union");
        let routers: Vec<&str> = request.children.iter().map(|c| c.router.as_str()).collect();
        assert_eq!(routers, vec!["a", "b"]);
        assert!(request.endpoints().is_some());
        assert!(request.is_settled());
    }

    #[tokio::test]
    async fn mismatched_request_fails() {
        let union = UnionRouter::new(vec![Arc::new(MockupRouter::new(
            "a",
            RoutingParameters::default(),
        ))]);
        let request = RouteRequest::new("union", None, None, parse_time(TimeInput::Now), Extra::new());
        let response = union.exec_route_request(Arc::new(request), None).await;
        assert!(response.error().unwrap().contains("0 child requests for 1 routers"));
    }

    #[tokio::test]
    async fn empty_union_is_unavailable() {
        let union = UnionRouter::new(vec![]);
        assert!(matches!(
            union.get_router().await,
            Err(RoutingError::RouterUnavailable(_))
        ));
    }
}
