use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use transit_server::planner::PlannerConfig;
use transit_server::timetable::{InMemoryTimetable, TimetableConfig};
use transit_server::web::{AppState, create_router};

/// Process-level settings, read once from the environment.
#[derive(Debug, Clone, PartialEq)]
struct ServerConfig {
    bind_addr: SocketAddr,
    timetable_path: PathBuf,
    city: String,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid TRANSIT_BIND_ADDR {value:?}: {source}")]
struct BadBindAddr {
    value: String,
    source: std::net::AddrParseError,
}

impl ServerConfig {
    fn from_env() -> Result<Self, BadBindAddr> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BadBindAddr> {
        let value = lookup("TRANSIT_BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_string());
        let bind_addr = value
            .parse()
            .map_err(|source| BadBindAddr { value, source })?;

        Ok(Self {
            bind_addr,
            timetable_path: lookup("TRANSIT_TIMETABLE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| TimetableConfig::default().path),
            city: lookup("TRANSIT_CITY").unwrap_or_else(|| "wroclaw".to_string()),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let server = ServerConfig::from_env()?;

    let timetable = InMemoryTimetable::load(&TimetableConfig::new(&server.timetable_path))?;
    let state = AppState::new(timetable, PlannerConfig::default(), &server.city);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(server.bind_addr).await?;
    info!(
        addr = %server.bind_addr,
        city = %server.city,
        "transit server listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
