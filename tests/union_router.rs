mod common;

use std::{sync::Arc, time::Duration};

use common::{Recorder, StubRouter};
use mc_routing::{
    routing::{
        LookupRouter, MockupRouter, Router, RoutingError, TimeInput, UnionRouter,
    },
    source::{RouteSource, TimeUpdate},
    structures::{
        LatLng, RoutingParameters,
        exchange::{Exchange, Extra, RouteResponse},
    },
};
use parking_lot::Mutex;

const START: &str = "4.3528,50.8466";
const DEST: &str = "4.3363,50.8357";

fn ids(response: &RouteResponse) -> Vec<String> {
    response.routes.iter().map(|r| r.id.clone()).collect()
}

async fn run(union: &UnionRouter, progress: &Mutex<Vec<Vec<String>>>) -> RouteResponse {
    let request = union.build_route_request(START.into(), DEST.into(), TimeInput::Now, Extra::new());
    let on_progress = |partial: RouteResponse| progress.lock().push(ids(&partial));
    union
        .exec_route_request(Arc::new(request), Some(&on_progress))
        .await
}

#[tokio::test]
async fn merges_in_declared_order_and_joins_errors() {
    let union = UnionRouter::new(vec![
        Arc::new(StubRouter::new("one").with_routes(&["r1"])),
        Arc::new(StubRouter::new("two").with_error("E2")),
        Arc::new(StubRouter::new("three").with_routes(&["r3"])),
    ]);
    let progress = Mutex::new(Vec::new());

    let response = run(&union, &progress).await;

    assert_eq!(ids(&response), vec!["r1", "r3"]);
    assert_eq!(response.error(), Some("E2"));
    assert_eq!(progress.lock().len(), 3);
}

#[tokio::test]
async fn progress_follows_settlement_order() {
    let union = UnionRouter::new(vec![
        Arc::new(
            StubRouter::new("slow")
                .with_routes(&["slow"])
                .with_delay(Duration::from_millis(60)),
        ),
        Arc::new(StubRouter::new("fast").with_routes(&["fast"])),
    ]);
    let progress = Mutex::new(Vec::new());

    let response = run(&union, &progress).await;

    assert_eq!(
        *progress.lock(),
        vec![vec!["fast".to_string()], vec!["fast".to_string(), "slow".to_string()]]
    );
    assert_eq!(ids(&response), vec!["slow", "fast"]);
    assert_eq!(response.error(), None);
}

#[tokio::test]
async fn all_errors_are_collected() {
    let union = UnionRouter::new(vec![
        Arc::new(StubRouter::new("a").with_error("E1")),
        Arc::new(StubRouter::new("b").with_error("E2")),
    ]);
    let progress = Mutex::new(Vec::new());

    let response = run(&union, &progress).await;

    assert!(response.routes.is_empty());
    assert_eq!(response.error(), Some("E1; E2"));
}

#[tokio::test]
async fn a_panicking_child_does_not_abort_the_union() {
    let union = UnionRouter::new(vec![
        Arc::new(StubRouter::new("boom").panicking()),
        Arc::new(StubRouter::new("ok").with_routes(&["r2"])),
    ]);
    let progress = Mutex::new(Vec::new());

    let response = run(&union, &progress).await;

    assert_eq!(ids(&response), vec!["r2"]);
    assert_eq!(response.error(), Some("boom panicked: boom exploded"));
}

#[tokio::test]
async fn children_build_their_requests_independently() {
    let mut lookup = LookupRouter::new(Arc::new(MockupRouter::new(
        "mockup",
        RoutingParameters::default(),
    )));
    lookup.add_place("home", LatLng::new(50.8466, 4.3528));
    let union = UnionRouter::new(vec![
        Arc::new(MockupRouter::new("direct", RoutingParameters::default())),
        Arc::new(lookup),
    ]);

    let request = union.build_route_request("home".into(), DEST.into(), TimeInput::Now, Extra::new());
    assert_eq!(
        request.children[0].error(),
        Some("Invalid coordinate 'home'")
    );
    assert_eq!(request.children[1].error(), None);
    assert_eq!(request.start.as_ref().unwrap().title(), "home");

    let response = union.exec_route_request(Arc::new(request), None).await;
    assert_eq!(response.routes.len(), 1);
    assert_eq!(response.routes[0].departure.title(), "home");
    assert_eq!(response.error(), Some("Invalid coordinate 'home'"));
}

#[tokio::test]
async fn readiness_needs_one_usable_child() {
    let partly = UnionRouter::new(vec![
        Arc::new(StubRouter::new("a").unavailable("no key")),
        Arc::new(StubRouter::new("b")),
    ]);
    assert_eq!(partly.get_router().await, Ok(()));

    let none = UnionRouter::new(vec![
        Arc::new(StubRouter::new("a").unavailable("no key")),
        Arc::new(StubRouter::new("b").unavailable("offline")),
    ]);
    assert_eq!(
        none.get_router().await,
        Err(RoutingError::RouterUnavailable(
            "Router unavailable: no key; Router unavailable: offline".to_string()
        ))
    );
}

#[tokio::test]
async fn union_progress_reaches_observers_as_intermediate_responses() {
    let union = Arc::new(UnionRouter::new(vec![
        Arc::new(StubRouter::new("one").with_routes(&["r1"])),
        Arc::new(
            StubRouter::new("two")
                .with_routes(&["r2"])
                .with_delay(Duration::from_millis(30)),
        ),
    ]));
    let source = RouteSource::new(union);
    let recorder = Arc::new(Recorder::default());
    source.subscribe(recorder.clone());

    source
        .set_route(Some(START.into()), Some(DEST.into()), TimeUpdate::Clear)
        .await;

    assert_eq!(
        recorder.take(),
        vec![
            "request 50.85,4.35",
            "response partial [r1]",
            "response partial [r1,r2]",
            "response final [r1,r2]",
        ]
    );
}
