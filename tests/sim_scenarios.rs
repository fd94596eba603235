use elevator_sim::elevator::fsm::Status;
use elevator_sim::sim::config::SimConfig;
use elevator_sim::sim::driver::BuildingSim;
use elevator_sim::sim::error::SimError;

fn make_sim(floor_count: u8, elevator_count: usize, capacity: usize) -> BuildingSim {
    BuildingSim::new(SimConfig {
        floor_count,
        elevator_count,
        capacity,
        travel_time_ms: 0,
    })
}

#[test]
fn requests_in_opposite_directions_get_separate_elevators() {
    let mut sim = make_sim(10, 2, 5);
    sim.add_passenger(1, 6).unwrap();
    sim.add_passenger(4, 2).unwrap();

    let infos = sim.status();
    let first = infos.iter().find(|i| i.stops.contains(1));
    let second = infos.iter().find(|i| i.stops.contains(4));
    assert!(first.is_some(), "one elevator should be going to floor 1");
    assert!(second.is_some(), "one elevator should be going to floor 4");
    assert_ne!(first.unwrap().id, second.unwrap().id);
}

#[test]
fn a_passenger_near_a_parked_elevator_is_driven_home() {
    let mut sim = make_sim(25, 2, 5);
    sim.set_elevator_floor(1, 20).unwrap();
    sim.add_passenger(19, 21).unwrap();

    sim.move_all();

    let infos = sim.status();
    assert!(
        infos.iter().any(|i| i.floor == 21),
        "one elevator should end at floor 21"
    );
    assert!(infos.iter().all(|i| i.riders.is_empty()));
    assert!(infos.iter().all(|i| i.status == Status::Idle));
}

#[test]
fn an_overfull_floor_is_drained_by_two_elevators() {
    let mut sim = make_sim(10, 2, 3);
    sim.set_elevator_floor(0, 5).unwrap();
    sim.add_passengers(5, 7, 5).unwrap();

    sim.move_all();

    assert!(sim.manager.floors()[5].up_queue.is_empty());
    let infos = sim.status();
    assert!(infos.iter().all(|i| i.riders.is_empty()));
    assert!(infos.iter().all(|i| i.status == Status::Idle));
}

#[test]
fn opposing_requests_on_one_car_are_served_in_turn() {
    let mut sim = make_sim(10, 1, 8);
    sim.set_elevator_floor(0, 5).unwrap();
    sim.add_passengers(5, 8, 1).unwrap();
    sim.add_passengers(5, 1, 2).unwrap();

    sim.move_all();

    assert!(sim.manager.floors()[5].up_queue.is_empty());
    assert!(sim.manager.floors()[5].down_queue.is_empty());
    let infos = sim.status();
    assert!(infos[0].riders.is_empty());
    assert_eq!(infos[0].status, Status::Idle);
}

#[test]
fn invalid_requests_are_rejected_before_any_state_changes() {
    let mut sim = make_sim(10, 2, 5);
    assert_eq!(
        sim.add_passenger(10, 3),
        Err(SimError::FloorOutOfRange {
            floor: 10,
            floor_count: 10
        })
    );
    assert_eq!(sim.add_passenger(4, 4), Ok(false));
    assert!(sim.manager.floors().iter().all(|f| !f.has_waiting()));
    assert!(sim.status().iter().all(|i| i.stops.is_empty()));
}

#[test]
fn the_rolling_log_traces_the_run() {
    let mut sim = make_sim(10, 2, 5);
    sim.add_passenger(0, 5).unwrap();
    sim.move_all();

    let entries = sim.recent_log(32);
    assert!(!entries.is_empty());
    assert!(entries.iter().any(|e| e.contains("dispatched")));
    assert!(entries.iter().any(|e| e.contains("unloaded")));
}

#[test]
fn reset_clears_the_whole_building() {
    let mut sim = make_sim(10, 2, 5);
    sim.add_passenger(0, 5).unwrap();
    sim.reset();

    assert!(sim.status().is_empty());
    assert!(sim.manager.floors().is_empty());
    assert!(sim.manager.requests_up().is_empty());
    assert!(sim.manager.requests_down().is_empty());
}
