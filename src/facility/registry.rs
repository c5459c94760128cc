//! Identity registry
//!
//! Tracks which identities hold the two guard seats. Every identity not seated
//! is ordinary staff; the registry never holds more or fewer than two guards.

use crate::facility::error::{AccessError, AccessResult};
use crate::types::{GuardSeat, IdentityId, Role};
use serde::{Deserialize, Serialize};

/// Role assignments for the facility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRegistry {
    /// Guard identities indexed by seat
    seats: [IdentityId; 2],
}

impl IdentityRegistry {
    /// Create a registry seating the two founding guards
    ///
    /// The guards must be distinct; `Facility::new` checks this before
    /// constructing the registry.
    pub fn new(first_guard: IdentityId, second_guard: IdentityId) -> Self {
        Self { seats: [first_guard, second_guard] }
    }

    /// Check whether an identity currently holds a guard seat
    pub fn is_guard(&self, id: IdentityId) -> bool {
        self.seats.contains(&id)
    }

    /// Role of an identity
    pub fn role_of(&self, id: IdentityId) -> Role {
        if self.is_guard(id) {
            Role::Guard
        } else {
            Role::Ordinary
        }
    }

    /// Both current guards, in seat order
    pub fn guards(&self) -> [IdentityId; 2] {
        self.seats
    }

    /// Guard holding a seat
    pub fn guard_at(&self, seat: GuardSeat) -> IdentityId {
        self.seats[seat.index()]
    }

    /// Seat held by an identity, if any
    pub fn seat_of(&self, id: IdentityId) -> Option<GuardSeat> {
        GuardSeat::ALL.into_iter().find(|seat| self.seats[seat.index()] == id)
    }

    /// Promote a staff identity into a seat and demote the seat's holder
    ///
    /// Promotion and demotion happen together so the registry always holds
    /// exactly two guards. Returns the demoted former guard.
    pub fn hand_over(&mut self, seat: GuardSeat, candidate: IdentityId) -> AccessResult<IdentityId> {
        if self.is_guard(candidate) {
            return Err(AccessError::AlreadyGuard(candidate));
        }

        let demoted = std::mem::replace(&mut self.seats[seat.index()], candidate);
        Ok(demoted)
    }

    /// Whether the two seats hold distinct identities
    pub fn is_consistent(&self) -> bool {
        self.seats[0] != self.seats[1]
    }
}
