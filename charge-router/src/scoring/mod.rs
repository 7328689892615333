//! Station scoring.
//!
//! Each station gets a composite score in [0, 1]: a weighted mean of its
//! min-max normalized features, with distance and price inverted.
//! [`route_efficiency`] is an absolute 0-100 figure alongside it.

mod efficiency;
mod engine;
mod weights;

pub use efficiency::route_efficiency;
pub use engine::{NormalizedFeatures, RawFeatures, ScoredStation, score_stations};
pub use weights::ScoreWeights;
