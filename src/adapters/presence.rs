//! Simulated occupancy for the host simulator.

use log::debug;

use crate::app::ports::{OccupancySensor, SensorError};

/// Reports "occupied" for `occupied_polls` consecutive reads, then "clear"
/// once, then starts over.  Each door cycle therefore sees exactly
/// `occupied_polls` `WAIT_MSG` bytes before the lock closes.
#[derive(Debug, Clone)]
pub struct PresenceSimulator {
    occupied_polls: u32,
    seen: u32,
}

impl PresenceSimulator {
    pub fn new(occupied_polls: u32) -> Self {
        Self {
            occupied_polls,
            seen: 0,
        }
    }
}

impl OccupancySensor for PresenceSimulator {
    fn is_occupied(&mut self) -> Result<bool, SensorError> {
        if self.seen < self.occupied_polls {
            self.seen += 1;
            debug!("presence: occupied ({}/{})", self.seen, self.occupied_polls);
            return Ok(true);
        }
        self.seen = 0;
        Ok(false)
    }
}
