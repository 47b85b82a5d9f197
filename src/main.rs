use std::{env, process::ExitCode, sync::Arc};

use mc_routing::{
    routing::TimeInput,
    services::build_router,
    source::{ObserverBinding, RouteSource, TimeUpdate, TracingObserver},
    structures::{Config, exchange::Exchange},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <config.yml> <start> <dest> [time]", args[0]);
        return ExitCode::FAILURE;
    }

    let config = match Config::load(&args[1]) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let router = match build_router(&config.router, config.routing.parameters()) {
        Ok(router) => router,
        Err(e) => {
            error!("Failed to build router '{}': {e}", config.router.label());
            return ExitCode::FAILURE;
        }
    };

    let source = Arc::new(RouteSource::new(router).with_stale_policy(config.routing.stale_responses));
    let mut binding = ObserverBinding::new(Arc::new(TracingObserver::new("routes")));
    binding.set_route_source(Some(source.clone()));

    let time = match args.get(4) {
        Some(time) => TimeUpdate::Set(TimeInput::Text(time.clone())),
        None => TimeUpdate::Clear,
    };
    source
        .set_route(Some(args[2].clone().into()), Some(args[3].clone().into()), time)
        .await;

    match source.route_response() {
        Some(response) => {
            if let Some(error) = response.error() {
                error!("Routing failed: {error}");
                return ExitCode::FAILURE;
            }
            if let Some(best) = response.routes.first() {
                source.select_route(best.clone());
            }
            info!("Done in {:.3}s", response.elapsed().unwrap_or_default());
            ExitCode::SUCCESS
        }
        None => {
            error!("No route response, router unavailable?");
            ExitCode::FAILURE
        }
    }
}
