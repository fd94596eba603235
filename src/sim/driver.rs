//! Simulation facade and the real-time run loop.
use crossbeam_channel as cbc;
use std::time;

use crate::dispatch::manager::ElevatorManager;
use crate::elevator::fsm::ElevatorInfo;
use crate::sim::config::SimConfig;
use crate::sim::error::SimError;

/// Owns the dispatcher plus the config it was built from and exposes the
/// handful of operations a driver or UI needs.
pub struct BuildingSim {
    config: SimConfig,
    pub manager: ElevatorManager,
}

impl BuildingSim {
    pub fn new(config: SimConfig) -> BuildingSim {
        let mut manager = ElevatorManager::new();
        manager.setup(
            config.floor_count,
            config.elevator_count,
            config.capacity,
            config.travel_time_ms,
        );
        BuildingSim { config, manager }
    }

    pub fn config(&self) -> SimConfig {
        self.config
    }

    pub fn add_passenger(&mut self, origin: u8, destination: u8) -> Result<bool, SimError> {
        self.manager.add_passenger(origin, destination)
    }

    pub fn add_passengers(
        &mut self,
        origin: u8,
        destination: u8,
        count: usize,
    ) -> Result<bool, SimError> {
        self.manager.add_passengers(origin, destination, count)
    }

    pub fn set_elevator_floor(&mut self, elevator: usize, floor: u8) -> Result<(), SimError> {
        self.manager.set_elevator_floor(elevator, floor)
    }

    pub fn tick(&mut self) -> usize {
        self.manager.tick()
    }

    pub fn move_all(&mut self) {
        self.manager.move_all()
    }

    pub fn reset(&mut self) {
        self.manager.reset()
    }

    pub fn status(&self) -> Vec<ElevatorInfo> {
        self.manager.elevator_infos()
    }

    pub fn recent_log(&self, n: usize) -> Vec<String> {
        self.manager.recent_log(n)
    }
}

/// Commands the run loop accepts while the simulation is live.
#[derive(Clone, Debug)]
pub enum SimCommand {
    AddPassengers {
        origin: u8,
        destination: u8,
        count: usize,
    },
    SetElevatorFloor {
        elevator: usize,
        floor: u8,
    },
    Reset,
}

/// Drives the simulation in real time: one tick per configured
/// per-floor travel time, with a status snapshot published after each.
/// Commands are applied between ticks, so no reader ever sees a car
/// mid-update. Terminates on the quit channel or when either peer
/// channel closes.
pub fn run(
    mut sim: BuildingSim,
    command_rx: cbc::Receiver<SimCommand>,
    status_tx: cbc::Sender<Vec<ElevatorInfo>>,
    quit_rx: cbc::Receiver<()>,
) {
    let period = time::Duration::from_millis(sim.config().travel_time_ms.max(1));
    let ticker = cbc::tick(period);
    loop {
        cbc::select! {
            recv(ticker) -> _ => {
                sim.tick();
                if status_tx.send(sim.status()).is_err() {
                    break; // status consumer gone, shut down
                }
            },
            recv(command_rx) -> msg => {
                match msg {
                    Ok(SimCommand::AddPassengers { origin, destination, count }) => {
                        if let Err(e) = sim.add_passengers(origin, destination, count) {
                            println!("rejected request: {}", e);
                        }
                    }
                    Ok(SimCommand::SetElevatorFloor { elevator, floor }) => {
                        if let Err(e) = sim.set_elevator_floor(elevator, floor) {
                            println!("rejected request: {}", e);
                        }
                    }
                    Ok(SimCommand::Reset) => sim.reset(),
                    Err(_) => break,
                }
            },
            recv(quit_rx) -> _ => break,
        }
    }
}
