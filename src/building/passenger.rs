use serde;

/// A rider: identity plus the floor they want to reach. Passengers are
/// created when a request is accepted and dropped when they leave an
/// elevator at their destination; at any moment exactly one floor queue
/// or one elevator holds them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Passenger {
    pub id: usize,
    pub destination: u8,
}

impl Passenger {
    pub fn new(id: usize, destination: u8) -> Passenger {
        Passenger { id, destination }
    }
}

/// Monotonic id source owned by whoever creates passengers, so a
/// simulation can be rebuilt from scratch with predictable ids.
#[derive(Clone, Debug, Default)]
pub struct PassengerIdSource {
    next: usize,
}

impl PassengerIdSource {
    pub fn new() -> PassengerIdSource {
        PassengerIdSource { next: 0 }
    }

    pub fn next_id(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}
