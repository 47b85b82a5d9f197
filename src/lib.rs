//! Route sources, observers and routers.
//!
//! A [`RouteSource`](source::RouteSource) owns start, destination and time,
//! asks a [`Router`](routing::Router) for routes and broadcasts the request
//! lifecycle and the selection state to any number of
//! [`RouteObserver`](source::RouteObserver)s.

pub mod routing;
pub mod services;
pub mod source;
pub mod structures;
