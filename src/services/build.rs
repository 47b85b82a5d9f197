use std::{sync::Arc, time::Duration};

use tracing::info;

use crate::{
    routing::{LookupRouter, MockupRouter, Router, UnionRouter},
    structures::{
        LatLng, RouterConfig, RoutingParameters,
        plan::{Address, Stop},
    },
};

/// Turns a router configuration tree into a ready-to-use router.
pub fn build_router(
    config: &RouterConfig,
    params: RoutingParameters,
) -> Result<Arc<dyn Router>, String> {
    let router: Arc<dyn Router> = match config {
        RouterConfig::Mockup(c) => {
            let mut router = MockupRouter::new(config.label(), params);
            if let Some(delay) = c.delay_ms {
                router = router.with_delay(Duration::from_millis(delay));
            }
            if let Some(segments) = c.segments {
                router = router.with_segments(segments);
            }
            Arc::new(router)
        }
        RouterConfig::Lookup(c) => {
            let inner = build_router(&c.inner, params)?;
            let mut router = LookupRouter::new(inner);
            for place in &c.places {
                router.add_place(place.name.clone(), LatLng::new(place.lat, place.lng));
            }
            for entry in &c.stops {
                let mut address = Address::new(LatLng::new(entry.lat, entry.lng));
                address.name = entry.name.clone();
                let mut stop = Stop::new(entry.id.clone(), address);
                stop.platform = entry.platform.clone();
                stop.source = Some("config".to_string());
                router
                    .add_stop(stop)
                    .map_err(|e| format!("Failed to index stop '{}': {e}", entry.id))?;
            }
            info!(
                "Lookup router ready with {} places and {} stops",
                c.places.len(),
                router.stop_count()
            );
            Arc::new(router)
        }
        RouterConfig::Union(c) => {
            let children = c
                .children
                .iter()
                .map(|child| build_router(child, params))
                .collect::<Result<Vec<_>, _>>()?;
            info!("Union router over {} children", children.len());
            Arc::new(UnionRouter::new(children))
        }
    };
    Ok(router)
}
