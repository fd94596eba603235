//! Elevator selection for hall calls.
use crate::elevator::fsm::{floor_distance, Direction, Elevator, Status};

/// Picks the elevator that should answer a hall call at `floor` in the
/// requested direction. Cars with spare capacity are considered first;
/// only when every car is full does the whole fleet become eligible.
/// Returns `None` when there are no elevators at all.
///
/// Ordered cases, first match wins:
/// 1. a car already at the floor and not in transit,
/// 2. the closest car heading here in the requested direction, or a free
///    idle car (idle takes an exact distance tie),
/// 3. the car with the cheapest turnaround,
/// 4. any remaining candidate.
pub fn choose_elevator(
    elevators: &[Box<dyn Elevator>],
    floor: u8,
    dirn: Direction,
) -> Option<usize> {
    let mut candidates: Vec<usize> = (0..elevators.len())
        .filter(|&i| elevators[i].has_spare_capacity())
        .collect();
    if candidates.is_empty() {
        candidates = (0..elevators.len()).collect();
    }
    if candidates.is_empty() {
        return None;
    }

    for &i in &candidates {
        let elevator = &elevators[i];
        if elevator.current_floor() == floor
            && (elevator.status() == Status::Idle || elevator.status() == Status::Stopped)
        {
            return Some(i);
        }
    }

    let mut best: Option<(usize, u8, bool)> = None;
    for &i in &candidates {
        let elevator = &elevators[i];
        let moving_toward = elevator.status() == Status::Moving
            && elevator.direction() == dirn
            && match dirn {
                Direction::Up => elevator.current_floor() < floor,
                Direction::Down => elevator.current_floor() > floor,
                Direction::Idle => false,
            };
        let idle_free = elevator.status() == Status::Idle && elevator.stops().is_empty();
        if !moving_toward && !idle_free {
            continue;
        }
        let dist = floor_distance(elevator.current_floor(), floor);
        let better = match best {
            None => true,
            Some((_, best_dist, best_idle)) => {
                dist < best_dist || (dist == best_dist && idle_free && !best_idle)
            }
        };
        if better {
            best = Some((i, dist, idle_free));
        }
    }
    if let Some((i, _, _)) = best {
        return Some(i);
    }

    let mut best: Option<(usize, usize)> = None;
    for &i in &candidates {
        let cost = turnaround_cost(elevators[i].as_ref(), floor, dirn);
        if cost == usize::MAX {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, best_cost)) => cost < best_cost,
        };
        if better {
            best = Some((i, cost));
        }
    }
    if let Some((i, _)) = best {
        return Some(i);
    }

    candidates.first().copied()
}

/// Travel needed for a busy car to finish its current run and come back
/// for `floor`: distance to the reversal point plus the leg back.
///
/// Returns `usize::MAX` for a car whose post-reversal sweep would carry
/// it past the requested floor against the requested direction while it
/// still holds stops beyond it - such a car overshoots the call and
/// cannot serve it this cycle.
pub fn turnaround_cost(elevator: &dyn Elevator, floor: u8, dirn: Direction) -> usize {
    let current = elevator.current_floor();
    let stops = elevator.stops();
    let extent = match elevator.direction() {
        Direction::Up => stops.max_above(current).unwrap_or(current),
        Direction::Down => stops.min_below(current).unwrap_or(current),
        Direction::Idle => current,
    };
    if floor < extent && dirn == Direction::Up && stops.any_below(floor) {
        return usize::MAX;
    }
    if floor > extent && dirn == Direction::Down && stops.any_above(floor) {
        return usize::MAX;
    }
    floor_distance(current, extent) as usize + floor_distance(extent, floor) as usize
}
