use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use ra_traffic::{TrafficConfig, TrafficService, TrafficStatusRequest, build_advisory, logging, web};

const USAGE: &str = "Usage: ra-traffic [--config <path>] [serve | check <query>]";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1).peekable();
    let mut config_path = None;
    if args.peek().map(String::as_str) == Some("--config") {
        args.next();
        config_path = Some(PathBuf::from(args.next().context(USAGE)?));
    }

    let config = TrafficConfig::load_from_path(config_path)?;
    let telemetry = logging::init(&config.logging)?;

    let outcome = run(&config, args).await;
    telemetry.shutdown()?;
    outcome
}

async fn run(config: &TrafficConfig, mut args: impl Iterator<Item = String>) -> Result<()> {
    let service = Arc::new(TrafficService::from_config(config)?);

    match args.next().as_deref() {
        None | Some("serve") => web::run(config.server.port, service).await,
        Some("check") => {
            let query = args.collect::<Vec<_>>().join(" ");
            let status = service
                .get_traffic_status(&TrafficStatusRequest::new(query))
                .await
                .map_err(|e| anyhow::anyhow!("{} ({})", e.user_message(), e.code()))?;
            println!("{}", build_advisory(&status));
            println!(
                "Normal: {} min | In traffic: {} min | Distance: {:.1} km",
                status.normal_travel_minutes,
                status.traffic_travel_minutes,
                status.route_summary.distance_km
            );
            Ok(())
        }
        Some(other) => bail!("Unknown command '{other}'. {USAGE}"),
    }
}
