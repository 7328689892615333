use std::net::SocketAddr;
use std::str::FromStr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use charge_router::catalog::StationCatalog;
use charge_router::ranking::RankingConfig;
use charge_router::web::{AppState, create_router};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_STATIONS: &str = "data/stations.json";
const DEFAULT_LOG_FILTER: &str = "charge_router=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load the station snapshot (fail fast if unreadable)
    let stations_path =
        std::env::var("CHARGE_ROUTER_STATIONS").unwrap_or_else(|_| DEFAULT_STATIONS.to_string());
    let catalog = StationCatalog::from_path(&stations_path)?;

    let config = config_from_env();
    info!(
        top_k = config.top_k,
        speed_kmh = config.assumed_speed_kmh,
        "ranking configuration"
    );

    let state = AppState::new(catalog, config);
    let app = create_router(state);

    let default_addr: SocketAddr = DEFAULT_ADDR.parse()?;
    let addr = env_or("CHARGE_ROUTER_ADDR", default_addr, |_| true);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "charge router listening");
    info!("endpoints: GET /health, GET /stations/stats, GET /stations/nearest, GET /stations/:id");
    info!("endpoints: POST /stations/rank, POST /trips/plan, POST /routes/alternatives");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Ranking configuration with environment overrides applied.
fn config_from_env() -> RankingConfig {
    let defaults = RankingConfig::default();
    RankingConfig {
        top_k: env_or("CHARGE_ROUTER_TOP_K", defaults.top_k, |&k| k > 0),
        assumed_speed_kmh: env_or(
            "CHARGE_ROUTER_SPEED_KMH",
            defaults.assumed_speed_kmh,
            |&s: &f64| s.is_finite() && s > 0.0,
        ),
        ..defaults
    }
}

/// Read and parse an environment variable, falling back to `default` when it
/// is unset, unparsable, or rejected by `valid`.
fn env_or<T>(name: &str, default: T, valid: impl Fn(&T) -> bool) -> T
where
    T: FromStr + std::fmt::Display,
{
    let Ok(raw) = std::env::var(name) else {
        return default;
    };
    match raw.parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            warn!(variable = name, value = %raw, fallback = %default, "ignoring invalid setting");
            default
        }
    }
}
