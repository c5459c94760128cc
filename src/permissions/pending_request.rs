//! Pending access requests
//!
//! A pending request records its direction and, per guard seat, which guard
//! approved it.

use crate::types::{Direction, GuardSeat, IdentityId};
use serde::{Deserialize, Serialize};

/// A directional request awaiting dual approval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequest {
    /// Whether the requester wants in or out
    pub direction: Direction,
    /// Approving guard per seat
    approvals: [Option<IdentityId>; 2],
}

impl PendingRequest {
    /// Create an unapproved request
    pub fn new(direction: Direction) -> Self {
        Self { direction, approvals: [None, None] }
    }

    /// Record a guard's approval for its seat
    ///
    /// Returns `false` when the same guard had already approved; the request
    /// is unchanged in that case.
    pub fn approve(&mut self, seat: GuardSeat, guard: IdentityId) -> bool {
        let slot = &mut self.approvals[seat.index()];
        if *slot == Some(guard) {
            return false;
        }
        *slot = Some(guard);
        true
    }

    /// Guard that approved for a seat, if any
    pub fn approver(&self, seat: GuardSeat) -> Option<IdentityId> {
        self.approvals[seat.index()]
    }

    /// Whether the current holder of a seat has approved
    ///
    /// An approval recorded by a guard who has since been replaced does not count.
    pub fn is_approved_by_seat(&self, seat: GuardSeat, guards: [IdentityId; 2]) -> bool {
        self.approver(seat) == Some(guards[seat.index()])
    }

    /// Approved by the current first-seat guard
    pub fn approved_by_first_guard(&self, guards: [IdentityId; 2]) -> bool {
        self.is_approved_by_seat(GuardSeat::First, guards)
    }

    /// Approved by the current second-seat guard
    pub fn approved_by_second_guard(&self, guards: [IdentityId; 2]) -> bool {
        self.is_approved_by_seat(GuardSeat::Second, guards)
    }

    /// Approved by both current guards
    pub fn is_fully_approved(&self, guards: [IdentityId; 2]) -> bool {
        guards[0] != guards[1]
            && self.approved_by_first_guard(guards)
            && self.approved_by_second_guard(guards)
    }
}
