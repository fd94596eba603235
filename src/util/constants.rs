pub const DEFAULT_NUM_FLOORS: u8 = 10;
pub const DEFAULT_NUM_ELEVATORS: usize = 2;
pub const DEFAULT_CAPACITY: usize = 8;
pub const DEFAULT_TRAVEL_TIME_MS: u64 = 1000;

pub const LOG_CAPACITY: usize = 32;

/// Upper bound on the ticks `move_all` will run before giving up,
/// so a request no elevator can serve cannot spin the driver forever.
pub const MAX_DRIVE_TICKS: usize = 10_000;
