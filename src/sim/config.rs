use serde;

use crate::util::constants;

/// Building parameters the simulation is constructed from. Missing
/// fields in a JSON config fall back to the defaults.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub floor_count: u8,
    pub elevator_count: usize,
    pub capacity: usize,
    pub travel_time_ms: u64,
}

impl Default for SimConfig {
    fn default() -> SimConfig {
        SimConfig {
            floor_count: constants::DEFAULT_NUM_FLOORS,
            elevator_count: constants::DEFAULT_NUM_ELEVATORS,
            capacity: constants::DEFAULT_CAPACITY,
            travel_time_ms: constants::DEFAULT_TRAVEL_TIME_MS,
        }
    }
}

impl SimConfig {
    pub fn from_json(text: &str) -> Result<SimConfig, serde_json::Error> {
        serde_json::from_str(text)
    }
}
