//! Ordered set of floors an elevator still intends to visit.
use serde;
use std::vec::Vec;

/// Sorted, duplicate-free list of pending floor stops.
///
/// Kept as a sorted `Vec` with binary-search insertion; the handful of
/// floors an elevator serves never justifies a tree.
///
/// # Example
/// ```rust
/// use elevator_sim::elevator::stop_list::StopList;
/// let mut stops = StopList::new();
/// stops.insert(4);
/// stops.insert(9);
/// assert_eq!(stops.min_above(4), Some(9));
/// ```
#[derive(PartialEq, Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct StopList {
    stops: Vec<u8>,
}

impl StopList {
    pub fn new() -> StopList {
        StopList { stops: Vec::new() }
    }

    /// Inserts a floor, keeping the list sorted. Returns `false` when the
    /// floor was already pending.
    pub fn insert(&mut self, floor: u8) -> bool {
        match self.stops.binary_search(&floor) {
            Ok(_) => false,
            Err(pos) => {
                self.stops.insert(pos, floor);
                true
            }
        }
    }

    /// Removes a floor. Returns `false` when it was not pending.
    pub fn remove(&mut self, floor: u8) -> bool {
        match self.stops.binary_search(&floor) {
            Ok(pos) => {
                self.stops.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub fn contains(&self, floor: u8) -> bool {
        self.stops.binary_search(&floor).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn min(&self) -> Option<u8> {
        self.stops.first().copied()
    }

    pub fn max(&self) -> Option<u8> {
        self.stops.last().copied()
    }

    /// Nearest pending stop strictly above `floor`.
    pub fn min_above(&self, floor: u8) -> Option<u8> {
        self.stops.iter().copied().find(|&s| s > floor)
    }

    /// Farthest pending stop strictly above `floor`.
    pub fn max_above(&self, floor: u8) -> Option<u8> {
        self.stops.iter().rev().copied().find(|&s| s > floor)
    }

    /// Nearest pending stop strictly below `floor`.
    pub fn max_below(&self, floor: u8) -> Option<u8> {
        self.stops.iter().rev().copied().find(|&s| s < floor)
    }

    /// Farthest pending stop strictly below `floor`.
    pub fn min_below(&self, floor: u8) -> Option<u8> {
        self.stops.iter().copied().find(|&s| s < floor)
    }

    pub fn any_above(&self, floor: u8) -> bool {
        self.min_above(floor).is_some()
    }

    pub fn any_below(&self, floor: u8) -> bool {
        self.max_below(floor).is_some()
    }

    pub fn clear(&mut self) {
        self.stops.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.stops.iter().copied()
    }
}
