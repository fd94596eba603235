use crossbeam_channel as cbc;
use serde;

use crate::building::passenger::Passenger;
use crate::elevator::stop_list::StopList;

#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    Up,
    Down,
    Idle,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Status {
    Idle,
    Moving,
    Stopped,
}

/// Message an elevator posts to the dispatcher when it reaches a stop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Arrival {
    pub elevator_id: usize,
    pub floor: u8,
}

/// Snapshot of everything the dispatcher (or a status display) needs to
/// know about one elevator: `status`, `dirn`, `floor`, pending `stops`
/// and the passengers currently riding.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElevatorInfo {
    pub id: usize,
    pub name: String,
    pub capacity: usize,
    pub floor: u8,
    pub next_stop: Option<u8>,
    pub dirn: Direction,
    pub status: Status,
    pub stops: StopList,
    pub riders: Vec<Passenger>,
    pub travel_time_ms: u64,
}

/// Capability set of a dispatch-managed car: report position, direction
/// and status, accept stop requests, load and unload passengers, and
/// advance one motion step at a time.
pub trait Elevator: Send {
    fn info(&self) -> ElevatorInfo;
    fn id(&self) -> usize;
    fn name(&self) -> &str;
    fn capacity(&self) -> usize;
    fn current_floor(&self) -> u8;
    fn next_stop(&self) -> Option<u8>;
    fn direction(&self) -> Direction;
    fn status(&self) -> Status;
    fn stops(&self) -> &StopList;
    fn riders(&self) -> &[Passenger];

    fn passenger_count(&self) -> usize {
        self.riders().len()
    }

    fn has_spare_capacity(&self) -> bool {
        self.passenger_count() < self.capacity()
    }

    fn add_floor_stop(&mut self, floor: u8);
    fn remove_floor_stop(&mut self, floor: u8);
    fn clear_floor_stops(&mut self);
    fn set_direction(&mut self, dirn: Direction);
    fn recompute_next_stop(&mut self);

    /// Advances the motion state machine by one step (at most one floor).
    fn step(&mut self);

    fn load_passenger(&mut self, passenger: Passenger) -> bool;
    fn unload_at_current_floor(&mut self) -> Vec<Passenger>;

    fn set_floor(&mut self, floor: u8);
    fn reset(&mut self);
}

pub fn floor_distance(a: u8, b: u8) -> u8 {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// The standard car. Holds its own state plus the transmitter it posts
/// arrival messages on; the dispatcher owns the receiving end and is the
/// single consumer.
#[derive(Clone, Debug)]
pub struct StdElevator {
    arrival_tx: cbc::Sender<Arrival>,
    info: ElevatorInfo,
}

impl StdElevator {
    pub fn new(
        id: usize,
        name: &str,
        capacity: usize,
        travel_time_ms: u64,
        arrival_tx: cbc::Sender<Arrival>,
    ) -> StdElevator {
        StdElevator {
            arrival_tx,
            info: ElevatorInfo {
                id,
                name: name.to_string(),
                capacity,
                floor: 0,
                next_stop: None,
                dirn: Direction::Idle,
                status: Status::Idle,
                stops: StopList::new(),
                riders: Vec::new(),
                travel_time_ms,
            },
        }
    }

    /// Rebuilds a car from a snapshot, e.g. to probe dispatch decisions
    /// against hypothetical elevator states.
    pub fn from_info(info: ElevatorInfo, arrival_tx: cbc::Sender<Arrival>) -> StdElevator {
        StdElevator { arrival_tx, info }
    }

    /// Best next stop given the current travel direction: finish the run
    /// in this direction before reversing to the farthest stop behind.
    fn find_next_stop(&self) -> Option<u8> {
        let floor = self.info.floor;
        let stops = &self.info.stops;
        match self.info.dirn {
            Direction::Up | Direction::Idle => {
                stops.min_above(floor).or_else(|| stops.max_below(floor))
            }
            Direction::Down => stops.max_below(floor).or_else(|| stops.min_above(floor)),
        }
    }

    /// A car that has somewhere to go must not report an idle direction.
    fn lean_toward_target(&mut self) {
        if self.info.dirn == Direction::Idle {
            if let Some(target) = self.info.next_stop {
                self.info.dirn = if target > self.info.floor {
                    Direction::Up
                } else {
                    Direction::Down
                };
            }
        }
    }

    fn arrive(&mut self, floor: u8) {
        self.info.stops.remove(floor);
        self.info.status = Status::Stopped;
        self.recompute_next_stop();
        self.arrival_tx
            .send(Arrival {
                elevator_id: self.info.id,
                floor,
            })
            .unwrap();
    }
}

impl Elevator for StdElevator {
    fn info(&self) -> ElevatorInfo {
        self.info.clone()
    }
    fn id(&self) -> usize {
        self.info.id
    }
    fn name(&self) -> &str {
        &self.info.name
    }
    fn capacity(&self) -> usize {
        self.info.capacity
    }
    fn current_floor(&self) -> u8 {
        self.info.floor
    }
    fn next_stop(&self) -> Option<u8> {
        self.info.next_stop
    }
    fn direction(&self) -> Direction {
        self.info.dirn
    }
    fn status(&self) -> Status {
        self.info.status
    }
    fn stops(&self) -> &StopList {
        &self.info.stops
    }
    fn riders(&self) -> &[Passenger] {
        &self.info.riders
    }

    /// Registers a floor stop and re-targets `next_stop`:
    /// * no target yet - adopt the new floor,
    /// * idle - adopt it only when strictly closer than the current target,
    /// * en route - adopt it only when it lies between the current floor
    ///   and the target in the direction of travel, so a late request can
    ///   never drag a moving car into a premature reversal.
    fn add_floor_stop(&mut self, floor: u8) {
        if !self.info.stops.insert(floor) {
            return; // already pending
        }

        let current = self.info.floor;
        let target = match self.info.next_stop {
            None => {
                self.info.next_stop = Some(floor);
                self.lean_toward_target();
                return;
            }
            Some(t) => t,
        };

        if self.info.status == Status::Idle {
            if floor_distance(current, floor) < floor_distance(current, target) {
                self.info.next_stop = Some(floor);
            }
            self.lean_toward_target();
            return;
        }

        // Only a stop strictly between here and the target may preempt it.
        match self.info.dirn {
            Direction::Up if current < floor && floor < target => {
                self.info.next_stop = Some(floor);
            }
            Direction::Down if target < floor && floor < current => {
                self.info.next_stop = Some(floor);
            }
            _ => {}
        }
    }

    fn remove_floor_stop(&mut self, floor: u8) {
        self.info.stops.remove(floor);
    }

    fn clear_floor_stops(&mut self) {
        self.info.stops.clear();
        self.info.next_stop = None;
    }

    fn set_direction(&mut self, dirn: Direction) {
        self.info.dirn = dirn;
    }

    fn recompute_next_stop(&mut self) {
        self.info.next_stop = self.find_next_stop();
        match self.info.next_stop {
            Some(_) => self.lean_toward_target(),
            None => {
                self.info.status = Status::Idle;
                self.info.dirn = Direction::Idle;
            }
        }
    }

    fn step(&mut self) {
        let target = match self.info.next_stop {
            Some(t) => t,
            None => return,
        };
        if target == self.info.floor {
            // Requested where we already are; process the stop without moving.
            self.arrive(target);
            return;
        }
        self.info.status = Status::Moving;
        if target > self.info.floor {
            self.info.dirn = Direction::Up;
            self.info.floor += 1;
        } else {
            self.info.dirn = Direction::Down;
            self.info.floor -= 1;
        }
        if self.info.floor == target {
            self.arrive(target);
        }
    }

    fn load_passenger(&mut self, passenger: Passenger) -> bool {
        if self.info.riders.len() >= self.info.capacity {
            return false;
        }
        let destination = passenger.destination;
        self.info.riders.push(passenger);
        self.add_floor_stop(destination);
        true
    }

    fn unload_at_current_floor(&mut self) -> Vec<Passenger> {
        let here = self.info.floor;
        let mut unloaded = Vec::new();
        self.info.riders.retain(|p| {
            if p.destination == here {
                unloaded.push(*p);
                false
            } else {
                true
            }
        });
        unloaded
    }

    fn set_floor(&mut self, floor: u8) {
        self.info.floor = floor;
        self.info.status = Status::Idle;
        self.info.dirn = Direction::Idle;
        self.info.next_stop = None;
        if !self.info.stops.is_empty() {
            self.recompute_next_stop();
        }
    }

    fn reset(&mut self) {
        self.info.floor = 0;
        self.info.next_stop = None;
        self.info.dirn = Direction::Idle;
        self.info.status = Status::Idle;
        self.info.stops.clear();
        self.info.riders.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn make_elevator(start_floor: u8) -> (StdElevator, cbc::Receiver<Arrival>) {
        let (arrival_tx, arrival_rx) = cbc::unbounded::<Arrival>();
        let mut elevator = StdElevator::new(0, "Elevator 0", 10, 0, arrival_tx);
        elevator.set_floor(start_floor);
        (elevator, arrival_rx)
    }

    /// Steps until the next arrival fires. Panics when the car never gets
    /// anywhere, which keeps broken motion logic from hanging the tests.
    fn drive_to_next_stop(elevator: &mut StdElevator, arrival_rx: &cbc::Receiver<Arrival>) -> u8 {
        for _ in 0..100 {
            elevator.step();
            if let Ok(arrival) = arrival_rx.try_recv() {
                return arrival.floor;
            }
        }
        panic!("elevator never arrived anywhere");
    }

    #[test]
    fn it_initializes_correctly() {
        let (arrival_tx, _arrival_rx) = cbc::unbounded::<Arrival>();
        let elevator = StdElevator::new(3, "Elevator 3", 10, 1000, arrival_tx);
        assert_eq!(elevator.id(), 3);
        assert_eq!(elevator.name(), "Elevator 3");
        assert_eq!(elevator.current_floor(), 0);
        assert_eq!(elevator.next_stop(), None);
        assert_eq!(elevator.status(), Status::Idle);
        assert_eq!(elevator.direction(), Direction::Idle);
        assert!(elevator.stops().is_empty());
        assert!(elevator.riders().is_empty());
    }

    #[test]
    fn it_adopts_the_first_stop_as_next_stop() {
        let (mut elevator, _rx) = make_elevator(0);
        elevator.add_floor_stop(5);
        assert!(elevator.stops().contains(5));
        assert_eq!(elevator.next_stop(), Some(5));
    }

    #[test]
    fn it_prefers_the_closer_stop_while_idle() {
        let (mut elevator, _rx) = make_elevator(5);
        elevator.add_floor_stop(10);
        elevator.add_floor_stop(4);
        assert_eq!(elevator.next_stop(), Some(4));

        let (mut elevator, _rx) = make_elevator(5);
        elevator.add_floor_stop(9);
        elevator.add_floor_stop(6);
        assert_eq!(elevator.next_stop(), Some(6));
    }

    #[test]
    fn it_keeps_the_target_when_the_new_stop_is_farther() {
        let (mut elevator, _rx) = make_elevator(5);
        elevator.add_floor_stop(7);
        elevator.add_floor_stop(12);
        assert_eq!(elevator.next_stop(), Some(7));

        let (mut elevator, _rx) = make_elevator(5);
        elevator.add_floor_stop(6);
        elevator.add_floor_stop(2);
        assert_eq!(elevator.next_stop(), Some(6));
    }

    #[test]
    fn it_treats_a_repeated_stop_as_a_no_op() {
        let (mut elevator, _rx) = make_elevator(0);
        elevator.add_floor_stop(5);
        let before = elevator.info();
        elevator.add_floor_stop(5);
        assert_eq!(elevator.info(), before);
        assert_eq!(elevator.stops().len(), 1);
    }

    #[test]
    fn it_continues_in_the_direction_of_travel_after_a_stop() {
        let (mut elevator, rx) = make_elevator(0);
        elevator.add_floor_stop(5);
        elevator.add_floor_stop(15);
        elevator.add_floor_stop(35);
        assert_eq!(drive_to_next_stop(&mut elevator, &rx), 5);
        assert_eq!(elevator.next_stop(), Some(15));
    }

    #[test]
    fn it_reverses_only_after_finishing_the_run() {
        // 1 is closer than 10 while idle, so the car serves 1 first and
        // only then swings back up.
        let (mut elevator, rx) = make_elevator(5);
        elevator.add_floor_stop(10);
        elevator.add_floor_stop(1);
        assert_eq!(elevator.next_stop(), Some(1));
        assert_eq!(drive_to_next_stop(&mut elevator, &rx), 1);
        assert_eq!(elevator.next_stop(), Some(10));
    }

    #[test]
    fn it_does_not_let_an_opposite_stop_preempt_the_target() {
        let (mut elevator, rx) = make_elevator(10);
        elevator.add_floor_stop(13);
        elevator.add_floor_stop(16);
        assert_eq!(drive_to_next_stop(&mut elevator, &rx), 13);
        elevator.add_floor_stop(12);
        assert_eq!(elevator.next_stop(), Some(16));
    }

    #[test]
    fn it_lets_an_on_the_way_stop_preempt_the_target() {
        let (mut elevator, rx) = make_elevator(10);
        elevator.add_floor_stop(13);
        elevator.add_floor_stop(18);
        assert_eq!(drive_to_next_stop(&mut elevator, &rx), 13);
        elevator.add_floor_stop(17);
        assert_eq!(elevator.next_stop(), Some(17));
    }

    #[test]
    fn it_returns_to_idle_after_its_only_stop() {
        let (mut elevator, rx) = make_elevator(0);
        elevator.add_floor_stop(5);
        assert_eq!(drive_to_next_stop(&mut elevator, &rx), 5);
        assert_eq!(elevator.status(), Status::Idle);
        assert_eq!(elevator.direction(), Direction::Idle);
        assert_eq!(elevator.next_stop(), None);
        assert!(elevator.stops().is_empty());
    }

    #[test]
    fn it_processes_a_stop_at_the_current_floor_without_moving() {
        let (mut elevator, rx) = make_elevator(4);
        elevator.add_floor_stop(4);
        elevator.step();
        assert_eq!(rx.try_recv().map(|a| a.floor), Ok(4));
        assert_eq!(elevator.current_floor(), 4);
        assert!(elevator.stops().is_empty());
    }

    #[test]
    fn clearing_stops_also_clears_the_target() {
        let (mut elevator, _rx) = make_elevator(0);
        elevator.add_floor_stop(5);
        elevator.add_floor_stop(15);
        elevator.clear_floor_stops();
        assert!(elevator.stops().is_empty());
        assert_eq!(elevator.next_stop(), None);
    }

    #[test]
    fn a_car_rebuilt_from_a_snapshot_drives_to_its_stop() {
        let (mut elevator, _rx) = make_elevator(3);
        elevator.add_floor_stop(6);
        let (arrival_tx, arrival_rx) = cbc::unbounded::<Arrival>();
        let mut rebuilt = StdElevator::from_info(elevator.info(), arrival_tx);
        assert_eq!(drive_to_next_stop(&mut rebuilt, &arrival_rx), 6);
        assert_eq!(rebuilt.status(), Status::Idle);
    }

    #[test]
    fn it_loads_passengers_and_registers_their_stops() {
        let (mut elevator, _rx) = make_elevator(0);
        assert!(elevator.load_passenger(Passenger::new(0, 5)));
        assert_eq!(elevator.passenger_count(), 1);
        assert!(elevator.stops().contains(5));
    }

    #[test]
    fn it_refuses_loads_at_capacity() {
        let (arrival_tx, _rx) = cbc::unbounded::<Arrival>();
        let mut elevator = StdElevator::new(0, "Elevator 0", 2, 0, arrival_tx);
        assert!(elevator.load_passenger(Passenger::new(0, 5)));
        assert!(elevator.load_passenger(Passenger::new(1, 6)));
        assert!(!elevator.load_passenger(Passenger::new(2, 7)));
        assert_eq!(elevator.passenger_count(), 2);
        assert!(!elevator.stops().contains(7));
    }

    #[test]
    fn it_unloads_only_passengers_for_this_floor() {
        let (mut elevator, rx) = make_elevator(0);
        elevator.load_passenger(Passenger::new(0, 5));
        elevator.load_passenger(Passenger::new(1, 10));
        elevator.load_passenger(Passenger::new(2, 15));
        assert_eq!(drive_to_next_stop(&mut elevator, &rx), 5);
        let unloaded = elevator.unload_at_current_floor();
        assert_eq!(unloaded.len(), 1);
        assert_eq!(unloaded[0].destination, 5);
        assert_eq!(elevator.passenger_count(), 2);
    }

    #[test]
    fn it_clears_state_on_reset() {
        let (mut elevator, rx) = make_elevator(0);
        elevator.load_passenger(Passenger::new(0, 5));
        elevator.load_passenger(Passenger::new(1, 10));
        drive_to_next_stop(&mut elevator, &rx);
        elevator.reset();
        assert_eq!(elevator.current_floor(), 0);
        assert_eq!(elevator.next_stop(), None);
        assert_eq!(elevator.status(), Status::Idle);
        assert_eq!(elevator.direction(), Direction::Idle);
        assert!(elevator.stops().is_empty());
        assert!(elevator.riders().is_empty());
    }
}
