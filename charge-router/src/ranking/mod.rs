//! Ranking queries over a set of candidate stations.

mod config;
mod coordinator;
mod trip;

pub use config::RankingConfig;
pub use coordinator::{RankedResult, RankedStation, RankingCoordinator, RouteOption};
pub use trip::{TripLeg, TripPlan};
