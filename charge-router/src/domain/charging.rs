//! Charger hardware and status enums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical connector standard offered by a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Connector {
    /// Combined Charging System (DC fast charging)
    #[serde(rename = "CCS")]
    Ccs,
    /// CHAdeMO (DC fast charging)
    #[serde(rename = "CHAdeMO")]
    Chademo,
    /// IEC 62196 Type 2 / Mennekes (AC)
    #[serde(rename = "Type 2")]
    Type2,
    /// SAE J1772 (AC, North America)
    #[serde(rename = "J1772")]
    J1772,
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Connector::Ccs => "CCS",
            Connector::Chademo => "CHAdeMO",
            Connector::Type2 => "Type 2",
            Connector::J1772 => "J1772",
        })
    }
}

/// Current status of a station.
///
/// Accepts the legacy dataset labels "In Use" and "Maintenance" as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Availability {
    Available,
    #[serde(alias = "In Use")]
    Occupied,
    #[serde(alias = "Maintenance")]
    Offline,
}

impl Availability {
    /// Numeric desirability used as a scoring feature.
    pub fn score_value(self) -> f64 {
        match self {
            Availability::Available => 1.0,
            Availability::Occupied => 0.5,
            Availability::Offline => 0.0,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Availability::Available => "Available",
            Availability::Occupied => "Occupied",
            Availability::Offline => "Offline",
        })
    }
}
