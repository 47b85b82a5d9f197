use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoutingParameters {
    pub walking_speed: usize, // mm/s (1000x m/s, 278x km/h)
}

impl Default for RoutingParameters {
    fn default() -> Self {
        RoutingParameters {
            walking_speed: 5 * 278,
        }
    }
}

impl RoutingParameters {
    pub fn walk_duration_ms(&self, distance: f64) -> i64 {
        (distance * 1_000_000.0 / self.walking_speed.max(1) as f64) as i64
    }
}
