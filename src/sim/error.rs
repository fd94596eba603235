use thiserror::Error;

/// Validation failures surfaced to the caller. Everything else in the
/// core is either a quiet no-op or a total function over valid inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("floor {floor} is outside the building (valid floors are 0..{floor_count})")]
    FloorOutOfRange { floor: u8, floor_count: u8 },
    #[error("no elevator with index {0}")]
    UnknownElevator(usize),
}
