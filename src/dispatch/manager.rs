//! Central dispatcher: owns every floor and every elevator, assigns hall
//! calls, and processes arrival messages posted by the cars.
use crossbeam_channel as cbc;
use std::collections::BTreeSet;

use crate::building::floor::Floor;
use crate::building::passenger::{Passenger, PassengerIdSource};
use crate::diagnostics::rolling_log::RollingLog;
use crate::dispatch::cost;
use crate::elevator::fsm::{Arrival, Direction, Elevator, ElevatorInfo, StdElevator, Status};
use crate::sim::error::SimError;
use crate::util::constants;

pub struct ElevatorManager {
    floors: Vec<Floor>,
    elevators: Vec<Box<dyn Elevator>>,
    requests_up: BTreeSet<u8>,
    requests_down: BTreeSet<u8>,
    id_source: PassengerIdSource,
    arrival_tx: cbc::Sender<Arrival>,
    arrival_rx: cbc::Receiver<Arrival>,
    log: RollingLog,
    floor_count: u8,
}

impl ElevatorManager {
    pub fn new() -> ElevatorManager {
        let (arrival_tx, arrival_rx) = cbc::unbounded::<Arrival>();
        ElevatorManager {
            floors: Vec::new(),
            elevators: Vec::new(),
            requests_up: BTreeSet::new(),
            requests_down: BTreeSet::new(),
            id_source: PassengerIdSource::new(),
            arrival_tx,
            arrival_rx,
            log: RollingLog::new(constants::LOG_CAPACITY),
            floor_count: 0,
        }
    }

    /// Builds the building: floors `0..floor_count` and `elevator_count`
    /// cars named `"Elevator i"`, all parked at floor 0. Any previous
    /// building is discarded first.
    pub fn setup(
        &mut self,
        floor_count: u8,
        elevator_count: usize,
        capacity: usize,
        travel_time_ms: u64,
    ) {
        self.reset();
        self.floor_count = floor_count;
        for f in 0..floor_count {
            self.floors.push(Floor::new(f));
        }
        for i in 0..elevator_count {
            let name = format!("Elevator {}", i);
            self.elevators.push(Box::new(StdElevator::new(
                i,
                &name,
                capacity,
                travel_time_ms,
                self.arrival_tx.clone(),
            )));
        }
        self.log.add(&format!(
            "setup: {} floors, {} elevators",
            floor_count, elevator_count
        ));
    }

    /// Adds a car built elsewhere, e.g. an alternate `Elevator`
    /// implementation. It must post arrivals on `arrival_sender()`.
    pub fn add_elevator(&mut self, elevator: Box<dyn Elevator>) {
        self.elevators.push(elevator);
    }

    pub fn arrival_sender(&self) -> cbc::Sender<Arrival> {
        self.arrival_tx.clone()
    }

    pub fn floor_count(&self) -> u8 {
        self.floor_count
    }
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }
    pub fn elevators(&self) -> &[Box<dyn Elevator>] {
        &self.elevators
    }
    pub fn requests_up(&self) -> &BTreeSet<u8> {
        &self.requests_up
    }
    pub fn requests_down(&self) -> &BTreeSet<u8> {
        &self.requests_down
    }

    pub fn elevator_infos(&self) -> Vec<ElevatorInfo> {
        self.elevators.iter().map(|e| e.info()).collect()
    }

    pub fn recent_log(&self, n: usize) -> Vec<String> {
        self.log.recent(n)
    }

    fn check_floor(&self, floor: u8) -> Result<(), SimError> {
        if floor >= self.floor_count {
            return Err(SimError::FloorOutOfRange {
                floor,
                floor_count: self.floor_count,
            });
        }
        Ok(())
    }

    pub fn add_passenger(&mut self, origin: u8, destination: u8) -> Result<bool, SimError> {
        self.add_passengers(origin, destination, 1)
    }

    /// Creates `count` passengers waiting at `origin` for `destination`
    /// and triggers one dispatch for the resulting direction. Both floors
    /// are validated before anything is mutated; a request for the floor
    /// the passengers are already on is a quiet no-op (`Ok(false)`).
    pub fn add_passengers(
        &mut self,
        origin: u8,
        destination: u8,
        count: usize,
    ) -> Result<bool, SimError> {
        self.check_floor(origin)?;
        self.check_floor(destination)?;
        if origin == destination {
            return Ok(false);
        }

        for _ in 0..count {
            let passenger = Passenger::new(self.id_source.next_id(), destination);
            self.floors[origin as usize].enqueue(passenger);
        }
        let dirn = if destination > origin {
            self.requests_up.insert(origin);
            Direction::Up
        } else {
            self.requests_down.insert(origin);
            Direction::Down
        };
        self.log.add(&format!(
            "{} passenger(s) at floor {} for floor {}",
            count, origin, destination
        ));
        self.dispatch(origin, dirn);
        Ok(true)
    }

    /// Exposes the selection algorithm without its side effect.
    pub fn choose_elevator(&self, floor: u8, dirn: Direction) -> Option<usize> {
        cost::choose_elevator(&self.elevators, floor, dirn)
    }

    /// Runs the selection algorithm and hands the chosen car a stop at
    /// `floor`. The passengers stay queued; loading happens on arrival.
    pub fn dispatch(&mut self, floor: u8, dirn: Direction) -> Option<usize> {
        match cost::choose_elevator(&self.elevators, floor, dirn) {
            Some(idx) => {
                self.elevators[idx].add_floor_stop(floor);
                let name = self.elevators[idx].name().to_string();
                self.log.add(&format!("{} dispatched to floor {}", name, floor));
                Some(idx)
            }
            None => {
                self.log
                    .add(&format!("no elevator available for floor {}", floor));
                None
            }
        }
    }

    /// Handles one arrival message: unload, pick the serving direction,
    /// load FIFO from the matching queue, settle the car, and when
    /// passengers are left behind send a second car after them.
    pub fn on_arrival(&mut self, elevator_id: usize, floor: u8) {
        let idx = match self.elevators.iter().position(|e| e.id() == elevator_id) {
            Some(i) => i,
            None => return,
        };

        self.floors[floor as usize].mark_stopped(elevator_id);
        // The motion procedure already removed the stop; callers invoking
        // this directly get the same cleanup.
        self.elevators[idx].remove_floor_stop(floor);

        let unloaded = self.elevators[idx].unload_at_current_floor();
        if !unloaded.is_empty() {
            let name = self.elevators[idx].name().to_string();
            self.log.add(&format!(
                "{} unloaded {} passenger(s) at floor {}",
                name,
                unloaded.len(),
                floor
            ));
        }

        let serving = {
            let elevator = &self.elevators[idx];
            let floor_rec = &self.floors[floor as usize];
            if !elevator.stops().is_empty() && elevator.direction() != Direction::Idle {
                elevator.direction()
            } else if floor_rec.up_queue.len() > floor_rec.down_queue.len() {
                Direction::Up
            } else {
                Direction::Down
            }
        };

        let mut loaded = 0usize;
        {
            let elevator = &mut self.elevators[idx];
            let floor_rec = &mut self.floors[floor as usize];
            let queue = if serving == Direction::Down {
                &mut floor_rec.down_queue
            } else {
                &mut floor_rec.up_queue
            };
            if !queue.is_empty() {
                elevator.set_direction(serving);
            }
            while elevator.has_spare_capacity() {
                let passenger = match queue.pop_front() {
                    Some(p) => p,
                    None => break,
                };
                elevator.load_passenger(passenger);
                loaded += 1;
            }
            if queue.is_empty() {
                if serving == Direction::Down {
                    self.requests_down.remove(&floor);
                } else {
                    self.requests_up.remove(&floor);
                }
            }
        }
        if loaded > 0 {
            let name = self.elevators[idx].name().to_string();
            self.log.add(&format!(
                "{} loaded {} passenger(s) at floor {}",
                name, loaded, floor
            ));
        }

        self.elevators[idx].recompute_next_stop();
        self.floors[floor as usize].unmark_stopped(elevator_id);

        let (leftover_serving, leftover_opposite) = {
            let floor_rec = &self.floors[floor as usize];
            let (served, other) = if serving == Direction::Down {
                (&floor_rec.down_queue, &floor_rec.up_queue)
            } else {
                (&floor_rec.up_queue, &floor_rec.down_queue)
            };
            (!served.is_empty(), !other.is_empty())
        };
        if leftover_serving {
            self.dispatch(floor, serving);
        }
        // This stop also consumed the hall call for the other direction;
        // anyone still waiting that way needs a fresh dispatch.
        if leftover_opposite {
            let opposite = if serving == Direction::Down {
                Direction::Up
            } else {
                Direction::Down
            };
            self.dispatch(floor, opposite);
        }
    }

    /// One simulation step: every car advances by at most one floor, then
    /// all resulting arrivals are processed before returning, so dispatch
    /// decisions never observe a car mid-update. Returns the number of
    /// arrivals handled.
    pub fn tick(&mut self) -> usize {
        for elevator in self.elevators.iter_mut() {
            elevator.step();
        }
        let arrivals: Vec<Arrival> = self.arrival_rx.try_iter().collect();
        let count = arrivals.len();
        for arrival in arrivals {
            self.on_arrival(arrival.elevator_id, arrival.floor);
        }
        count
    }

    /// Ticks until every car is idle again (bounded, so a call no car can
    /// serve cannot spin forever).
    pub fn move_all(&mut self) {
        for _ in 0..constants::MAX_DRIVE_TICKS {
            let busy = self
                .elevators
                .iter()
                .any(|e| e.status() != Status::Idle || e.next_stop().is_some());
            if !busy {
                break;
            }
            self.tick();
        }
    }

    /// Test/debug hook: teleports a car and returns it to idle.
    pub fn set_elevator_floor(&mut self, elevator_index: usize, floor: u8) -> Result<(), SimError> {
        self.check_floor(floor)?;
        match self.elevators.get_mut(elevator_index) {
            Some(elevator) => {
                elevator.set_floor(floor);
                Ok(())
            }
            None => Err(SimError::UnknownElevator(elevator_index)),
        }
    }

    /// Tears the building down: floors, elevators, request bookkeeping
    /// and the passenger id counter all go back to zero.
    pub fn reset(&mut self) {
        self.floors.clear();
        self.elevators.clear();
        self.requests_up.clear();
        self.requests_down.clear();
        self.id_source.reset();
        self.floor_count = 0;
        while self.arrival_rx.try_recv().is_ok() {}
    }
}
