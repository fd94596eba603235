use std::env;
use std::sync::mpsc;
use std::thread::spawn;

use crossbeam_channel as cbc;
use rand::Rng;

use elevator_sim::elevator::fsm::{Direction, ElevatorInfo};
use elevator_sim::sim::config::SimConfig;
use elevator_sim::sim::driver::{run, BuildingSim, SimCommand};

fn direction_symbol(dirn: Direction) -> &'static str {
    match dirn {
        Direction::Up => "↑",
        Direction::Down => "↓",
        Direction::Idle => "-",
    }
}

fn format_status(info: &ElevatorInfo) -> String {
    let stops: Vec<String> = info.stops.iter().map(|f| f.to_string()).collect();
    let stops = if stops.is_empty() {
        "none".to_string()
    } else {
        stops.join(", ")
    };
    format!(
        "[{}] floor {} {}  |  passengers: {}  |  stops: {}",
        info.name,
        info.floor,
        direction_symbol(info.dirn),
        info.riders.len(),
        stops
    )
}

// Either a single path to a JSON config, or positional numbers:
// floors elevators capacity travel_time_ms
fn parse_config(args: &[String]) -> SimConfig {
    if args.len() == 1 && args[0].ends_with(".json") {
        let text = std::fs::read_to_string(&args[0]).unwrap();
        return SimConfig::from_json(&text).unwrap();
    }
    let mut config = SimConfig::default();
    if !args.is_empty() {
        config.floor_count = args[0].parse().unwrap();
    }
    if args.len() > 1 {
        config.elevator_count = args[1].parse().unwrap();
    }
    if args.len() > 2 {
        config.capacity = args[2].parse().unwrap();
    }
    if args.len() > 3 {
        config.travel_time_ms = args[3].parse().unwrap();
    }
    config
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let json_status = args.iter().any(|a| a.as_str() == "--json");
    let args: Vec<String> = args.into_iter().filter(|a| a.as_str() != "--json").collect();
    let config = parse_config(&args);

    println!("Building simulation started:\n{:#?}", config);

    let sim = BuildingSim::new(config);

    let (command_tx, command_rx) = cbc::unbounded::<SimCommand>();
    let (status_tx, status_rx) = cbc::unbounded::<Vec<ElevatorInfo>>();
    let (_quit_tx, quit_rx) = cbc::unbounded::<()>();

    spawn(move || {
        run(sim, command_rx, status_tx, quit_rx);
    });

    // Periodically drop a random passenger somewhere in the building.
    let (spawn_tick_tx, spawn_tick_rx) = mpsc::channel::<()>();
    let spawn_timer = timer::MessageTimer::new(spawn_tick_tx);
    let _guard = spawn_timer.schedule_repeating(chrono::Duration::seconds(3), ());
    {
        let command_tx = command_tx.clone();
        let floor_count = config.floor_count;
        spawn(move || {
            let mut rng = rand::thread_rng();
            loop {
                match spawn_tick_rx.recv() {
                    Ok(()) => {
                        let origin = rng.gen_range(0, floor_count);
                        let destination = rng.gen_range(0, floor_count);
                        if origin != destination {
                            command_tx
                                .send(SimCommand::AddPassengers {
                                    origin,
                                    destination,
                                    count: 1,
                                })
                                .unwrap();
                        }
                    }
                    Err(_) => break,
                }
            }
        });
    }

    for infos in status_rx.iter() {
        if json_status {
            println!("{}", serde_json::to_string(&infos).unwrap());
        } else {
            println!("{}", "-".repeat(72));
            for info in infos.iter() {
                println!("{}", format_status(info));
            }
        }
    }
}
