//! Request ledger
//!
//! Maps each requester to at most one pending request. Submitting replaces
//! whatever was pending, approvals included; consuming removes the request
//! and its approvals together.

use crate::facility::error::{AccessError, AccessResult};
use crate::permissions::PendingRequest;
use crate::types::{Direction, GuardSeat, IdentityId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pending requests keyed by requester
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestLedger {
    pending: HashMap<IdentityId, PendingRequest>,
}

impl RequestLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh unapproved request, overwriting any pending one
    pub fn submit(&mut self, requester: IdentityId, direction: Direction) {
        self.pending.insert(requester, PendingRequest::new(direction));
    }

    /// Record a guard's approval for a pending request
    ///
    /// Fails with `NoSuchRequest` when nothing is pending and with
    /// `WrongDirection` when the pending request goes the other way. Returns
    /// whether the approval was new.
    pub fn approve(
        &mut self,
        requester: IdentityId,
        seat: GuardSeat,
        guard: IdentityId,
        direction: Direction,
    ) -> AccessResult<bool> {
        let request =
            self.pending.get_mut(&requester).ok_or(AccessError::NoSuchRequest(requester))?;

        if request.direction != direction {
            return Err(AccessError::WrongDirection { expected: direction, actual: request.direction });
        }

        Ok(request.approve(seat, guard))
    }

    /// Whether the requester's pending request is approved by both current guards
    pub fn is_fully_approved(&self, requester: IdentityId, guards: [IdentityId; 2]) -> bool {
        self.pending.get(&requester).is_some_and(|request| request.is_fully_approved(guards))
    }

    /// Whether a fully approved request in the given direction is pending
    pub fn is_fully_approved_for(
        &self,
        requester: IdentityId,
        direction: Direction,
        guards: [IdentityId; 2],
    ) -> bool {
        self.pending
            .get(&requester)
            .is_some_and(|request| request.direction == direction && request.is_fully_approved(guards))
    }

    /// Remove a fully approved request and return its direction
    pub fn consume(&mut self, requester: IdentityId, guards: [IdentityId; 2]) -> AccessResult<Direction> {
        let request = self.pending.get(&requester).ok_or(AccessError::NoSuchRequest(requester))?;

        if !request.is_fully_approved(guards) {
            return Err(AccessError::NotFullyApproved(requester));
        }

        let direction = request.direction;
        self.pending.remove(&requester);
        Ok(direction)
    }

    /// Pending request of an identity
    pub fn get(&self, requester: IdentityId) -> Option<&PendingRequest> {
        self.pending.get(&requester)
    }

    /// Whether the identity has a pending request
    pub fn contains(&self, requester: IdentityId) -> bool {
        self.pending.contains_key(&requester)
    }

    /// Number of pending requests
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if the ledger is empty
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Iterate over pending requests
    pub fn iter(&self) -> impl Iterator<Item = (IdentityId, &PendingRequest)> + '_ {
        self.pending.iter().map(|(id, request)| (*id, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guards() -> [IdentityId; 2] {
        [IdentityId::new(), IdentityId::new()]
    }

    #[test]
    fn test_approve_without_request() {
        let mut ledger = RequestLedger::new();
        let guards = guards();
        let staff = IdentityId::new();

        assert_eq!(
            ledger.approve(staff, GuardSeat::First, guards[0], Direction::Entry),
            Err(AccessError::NoSuchRequest(staff))
        );
    }

    #[test]
    fn test_approve_wrong_direction() {
        let mut ledger = RequestLedger::new();
        let guards = guards();
        let staff = IdentityId::new();

        ledger.submit(staff, Direction::Exit);

        assert_eq!(
            ledger.approve(staff, GuardSeat::First, guards[0], Direction::Entry),
            Err(AccessError::WrongDirection { expected: Direction::Entry, actual: Direction::Exit })
        );
        assert!(ledger.get(staff).unwrap().approver(GuardSeat::First).is_none());
    }

    #[test]
    fn test_consume_requires_both() {
        let mut ledger = RequestLedger::new();
        let guards = guards();
        let staff = IdentityId::new();

        ledger.submit(staff, Direction::Entry);
        assert!(ledger.approve(staff, GuardSeat::First, guards[0], Direction::Entry).unwrap());
        assert!(!ledger.approve(staff, GuardSeat::First, guards[0], Direction::Entry).unwrap());

        assert_eq!(ledger.consume(staff, guards), Err(AccessError::NotFullyApproved(staff)));
        assert!(ledger.contains(staff));

        ledger.approve(staff, GuardSeat::Second, guards[1], Direction::Entry).unwrap();
        assert!(ledger.is_fully_approved(staff, guards));
        assert!(ledger.is_fully_approved_for(staff, Direction::Entry, guards));
        assert!(!ledger.is_fully_approved_for(staff, Direction::Exit, guards));

        assert_eq!(ledger.consume(staff, guards), Ok(Direction::Entry));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_submit_resets_approvals() {
        let mut ledger = RequestLedger::new();
        let guards = guards();
        let staff = IdentityId::new();

        ledger.submit(staff, Direction::Entry);
        ledger.approve(staff, GuardSeat::First, guards[0], Direction::Entry).unwrap();
        ledger.approve(staff, GuardSeat::Second, guards[1], Direction::Entry).unwrap();

        ledger.submit(staff, Direction::Entry);

        assert!(!ledger.is_fully_approved(staff, guards));
        assert_eq!(ledger.len(), 1);
    }
}
