#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;
    use std::path::PathBuf;

    use chrono::Local;
    use content_calendar::{Planner, PlannerConfig, http_api, logging};

    let verbosity = std::env::var("CONTENT_CALENDAR_VERBOSE")
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .unwrap_or(1);
    logging::init(verbosity);

    let config_path = std::env::var("CONTENT_CALENDAR_CONFIG").ok().map(PathBuf::from);
    let config = PlannerConfig::load_or_default(config_path.as_deref())?;
    let addr: SocketAddr = config.http_addr.parse()?;

    let planner = Planner::from_config(&config, Local::now().date_naive())?;
    println!("content-calendar HTTP API listening on http://{addr}");
    http_api::serve(addr, planner).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
