use serde;
use std::collections::VecDeque;

use crate::building::passenger::Passenger;

/// One floor of the building: two FIFO queues of waiting passengers
/// (split by travel direction) and the ids of elevators currently
/// processing a stop here.
///
/// Queues are only ever touched by the dispatcher; the direction split is
/// decided once at enqueue time from the passenger's destination.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Floor {
    floor_number: u8,
    pub up_queue: VecDeque<Passenger>,
    pub down_queue: VecDeque<Passenger>,
    stopped_elevators: Vec<usize>,
}

impl Floor {
    pub fn new(floor_number: u8) -> Floor {
        Floor {
            floor_number,
            up_queue: VecDeque::new(),
            down_queue: VecDeque::new(),
            stopped_elevators: Vec::new(),
        }
    }

    pub fn floor_number(&self) -> u8 {
        self.floor_number
    }

    /// Routes the passenger into the up or down queue. Returns `false`
    /// without enqueueing when the destination is this very floor.
    pub fn enqueue(&mut self, passenger: Passenger) -> bool {
        if passenger.destination > self.floor_number {
            self.up_queue.push_back(passenger);
            true
        } else if passenger.destination < self.floor_number {
            self.down_queue.push_back(passenger);
            true
        } else {
            false
        }
    }

    pub fn has_waiting(&self) -> bool {
        !self.up_queue.is_empty() || !self.down_queue.is_empty()
    }

    pub fn mark_stopped(&mut self, elevator_id: usize) {
        if !self.stopped_elevators.contains(&elevator_id) {
            self.stopped_elevators.push(elevator_id);
        }
    }

    pub fn unmark_stopped(&mut self, elevator_id: usize) {
        self.stopped_elevators.retain(|&id| id != elevator_id);
    }

    pub fn stopped_elevators(&self) -> &[usize] {
        &self.stopped_elevators
    }

    pub fn clear_up_queue(&mut self) {
        self.up_queue.clear();
    }

    pub fn clear_down_queue(&mut self) {
        self.down_queue.clear();
    }

    /// Empties both queues and forgets any stopped-elevator bookkeeping.
    pub fn reset(&mut self) {
        self.up_queue.clear();
        self.down_queue.clear();
        self.stopped_elevators.clear();
    }
}
