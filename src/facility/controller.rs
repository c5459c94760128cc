//! Access controller
//!
//! This module contains the `Facility`, the single authority owning occupancy,
//! pending requests, guard roles, the shift-change record and the audit log.
//!
//! Per identity the entry/exit lifecycle is:
//!
//! ```text
//! Outside --make_request(Entry)--> EntryRequested --both guards approve--> EntryApproved
//!    ^                                                                         |
//!    |                                                                       enter
//!    |                                                                         v
//! ExitApproved <--both guards approve-- ExitRequested <--make_request(Exit)-- Inside
//!    |
//!   exit --> Outside
//! ```
//!
//! Every operation checks all of its preconditions before the first mutation,
//! so a failed call leaves the facility exactly as it was.

use crate::events::{AuditEntry, AuditEvent, AuditLog};
use crate::facility::error::{AccessError, AccessResult};
use crate::facility::occupancy::OccupancyTracker;
use crate::facility::registry::IdentityRegistry;
use crate::facility::shift_change::ShiftChange;
use crate::permissions::{PendingRequest, RequestLedger};
use crate::types::config::capacity;
use crate::types::{ConfigValidationError, Direction, FacilityConfig, IdentityId, Role, ShiftPhase};
use serde::Serialize;
use tracing::{debug, error, instrument};

/// The guarded facility
#[derive(Debug, Clone, Serialize)]
pub struct Facility {
    /// Guard seat assignments
    pub(crate) registry: IdentityRegistry,
    /// Identities inside
    pub(crate) occupancy: OccupancyTracker,
    /// Pending entry and exit requests
    pub(crate) ledger: RequestLedger,
    /// Guard handover record
    pub(crate) shift: ShiftChange,
    /// Successful transitions
    pub(crate) log: AuditLog,
}

impl Facility {
    /// Create a facility with its two founding guards inside
    pub fn new(capacity: usize, founding_guards: [IdentityId; 2]) -> Result<Self, ConfigValidationError> {
        if capacity < capacity::MINIMUM {
            return Err(ConfigValidationError::InvalidCapacity {
                value: capacity,
                minimum: capacity::MINIMUM,
            });
        }

        let [first, second] = founding_guards;
        if first == second {
            return Err(ConfigValidationError::DuplicateFoundingGuards(first));
        }

        let mut occupancy = OccupancyTracker::new(capacity);
        for guard in founding_guards {
            occupancy.add(guard).map_err(|_| ConfigValidationError::InvalidCapacity {
                value: capacity,
                minimum: capacity::MINIMUM,
            })?;
        }

        crate::facility_event!(info, "Facility opened", capacity = capacity, first_guard = first, second_guard = second);

        Ok(Self {
            registry: IdentityRegistry::new(first, second),
            occupancy,
            ledger: RequestLedger::new(),
            shift: ShiftChange::new(),
            log: AuditLog::new(),
        })
    }

    /// Create a facility from a run configuration
    pub fn from_config(config: &FacilityConfig) -> Result<Self, ConfigValidationError> {
        Self::new(config.capacity, config.resolve_founding_guards())
    }

    /// Submit an entry or exit request for the caller
    ///
    /// Replaces any request the caller already had pending, clearing its
    /// approvals.
    #[instrument(skip(self), fields(caller = %caller))]
    pub fn make_request(&mut self, caller: IdentityId, direction: Direction) -> AccessResult<()> {
        let result = self.check_request(caller, direction);
        if let Err(e) = &result {
            debug!(error = %e, "Request rejected");
            return result;
        }

        if self.ledger.contains(caller) {
            debug!("Overwriting pending request");
        }
        self.ledger.submit(caller, direction);

        crate::facility_event!(info, "Request submitted", identity = caller, direction = direction);
        Ok(())
    }

    fn check_request(&self, caller: IdentityId, direction: Direction) -> AccessResult<()> {
        match direction {
            Direction::Entry if self.occupancy.contains(caller) => Err(AccessError::AlreadyInside(caller)),
            Direction::Entry => Ok(()),
            Direction::Exit if !self.occupancy.contains(caller) => Err(AccessError::NotInside(caller)),
            Direction::Exit if self.registry.is_guard(caller) => Err(AccessError::GuardsCannotExit(caller)),
            Direction::Exit => Ok(()),
        }
    }

    /// Approve a pending entry request as one of the guards
    #[instrument(skip(self), fields(caller = %caller, requester = %requester))]
    pub fn approve_entry(&mut self, caller: IdentityId, requester: IdentityId) -> AccessResult<()> {
        self.approve(caller, requester, Direction::Entry)
    }

    /// Approve a pending exit request as one of the guards
    #[instrument(skip(self), fields(caller = %caller, requester = %requester))]
    pub fn approve_exit(&mut self, caller: IdentityId, requester: IdentityId) -> AccessResult<()> {
        self.approve(caller, requester, Direction::Exit)
    }

    fn approve(&mut self, caller: IdentityId, requester: IdentityId, direction: Direction) -> AccessResult<()> {
        let seat = match self.registry.seat_of(caller) {
            Some(seat) => seat,
            None => {
                debug!("Approval by non-guard rejected");
                return Err(AccessError::NotAGuard(caller));
            }
        };

        if direction == Direction::Exit && self.registry.is_guard(requester) {
            debug!("Exit approval for a guard rejected");
            return Err(AccessError::GuardsCannotExit(requester));
        }

        match self.ledger.approve(requester, seat, caller, direction) {
            Ok(true) => {
                crate::facility_event!(info, "Approval recorded", requester = requester, seat = seat, direction = direction);
                Ok(())
            }
            Ok(false) => {
                debug!("Repeated approval ignored");
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "Approval rejected");
                Err(e)
            }
        }
    }

    /// Enter the facility on a fully approved entry request
    #[instrument(skip(self), fields(caller = %caller))]
    pub fn enter(&mut self, caller: IdentityId) -> AccessResult<()> {
        let guards = self.registry.guards();

        let precheck = if !self.ledger.is_fully_approved_for(caller, Direction::Entry, guards) {
            Err(AccessError::NotFullyApproved(caller))
        } else if self.occupancy.contains(caller) {
            Err(AccessError::AlreadyInside(caller))
        } else if self.occupancy.is_full() {
            Err(AccessError::CapacityExceeded { capacity: self.occupancy.capacity() })
        } else {
            Ok(())
        };
        if let Err(e) = precheck {
            debug!(error = %e, "Entry rejected");
            return Err(e);
        }

        self.ledger.consume(caller, guards)?;
        self.occupancy.add(caller)?;
        self.shift.note_entered(caller);
        self.log.append(AuditEvent::Entered(caller));

        crate::facility_event!(info, "Entered", identity = caller, occupancy = self.occupancy.count());
        Ok(())
    }

    /// Leave the facility on a fully approved exit request
    #[instrument(skip(self), fields(caller = %caller))]
    pub fn exit(&mut self, caller: IdentityId) -> AccessResult<()> {
        let guards = self.registry.guards();

        // A request made before promotion must not let a guard walk out
        let precheck = if self.registry.is_guard(caller) {
            Err(AccessError::GuardsCannotExit(caller))
        } else if !self.ledger.is_fully_approved_for(caller, Direction::Exit, guards) {
            Err(AccessError::NotFullyApproved(caller))
        } else if !self.occupancy.contains(caller) {
            Err(AccessError::NotPresent(caller))
        } else {
            Ok(())
        };
        if let Err(e) = precheck {
            debug!(error = %e, "Exit rejected");
            return Err(e);
        }

        self.ledger.consume(caller, guards)?;
        self.occupancy.remove(caller)?;
        self.shift.note_exited(caller);
        self.log.append(AuditEvent::Exited(caller));

        crate::facility_event!(info, "Exited", identity = caller, occupancy = self.occupancy.count());
        Ok(())
    }

    /// Human-readable audit log in append order
    pub fn get_log(&self) -> Vec<String> {
        self.log.messages()
    }

    /// Audit entries with sequence numbers and timestamps
    pub fn audit_entries(&self) -> &[AuditEntry] {
        self.log.entries()
    }

    /// The audit log
    pub fn audit_log(&self) -> &AuditLog {
        &self.log
    }

    /// Whether an identity currently holds a guard seat
    pub fn is_guard(&self, id: IdentityId) -> bool {
        self.registry.is_guard(id)
    }

    /// Role of an identity
    pub fn role_of(&self, id: IdentityId) -> Role {
        self.registry.role_of(id)
    }

    /// Both current guards, in seat order
    pub fn guards(&self) -> [IdentityId; 2] {
        self.registry.guards()
    }

    /// Whether an identity is inside
    pub fn is_inside(&self, id: IdentityId) -> bool {
        self.occupancy.contains(id)
    }

    /// Number of identities inside
    pub fn occupancy_count(&self) -> usize {
        self.occupancy.count()
    }

    /// Identities inside, in identity order
    pub fn occupants(&self) -> Vec<IdentityId> {
        self.occupancy.iter().collect()
    }

    /// Facility capacity
    pub fn capacity(&self) -> usize {
        self.occupancy.capacity()
    }

    /// Pending request of an identity
    pub fn pending_request(&self, id: IdentityId) -> Option<&PendingRequest> {
        self.ledger.get(id)
    }

    /// Whether an identity's pending request is approved by both current guards
    pub fn is_fully_approved(&self, id: IdentityId) -> bool {
        self.ledger.is_fully_approved(id, self.registry.guards())
    }

    /// Number of pending requests
    pub fn pending_count(&self) -> usize {
        self.ledger.len()
    }

    /// Guard handover record
    pub fn shift_change(&self) -> &ShiftChange {
        &self.shift
    }

    /// Current handover phase
    pub fn shift_phase(&self) -> ShiftPhase {
        self.shift.phase()
    }

    /// Verify the facility invariants
    ///
    /// Occupancy within capacity, exactly two distinct guards, both guards
    /// inside, and a handover record that matches its phase.
    pub fn check_invariants(&self) -> Result<(), String> {
        let result = self.collect_invariant_violation();
        if let Err(violation) = &result {
            error!(violation = %violation, "Facility invariant violated");
        }
        result
    }

    fn collect_invariant_violation(&self) -> Result<(), String> {
        if self.occupancy.count() > self.occupancy.capacity() {
            return Err(format!(
                "Occupancy {} exceeds capacity {}",
                self.occupancy.count(),
                self.occupancy.capacity()
            ));
        }

        if !self.registry.is_consistent() {
            return Err("Both guard seats hold the same identity".to_string());
        }

        for guard in self.registry.guards() {
            if !self.occupancy.contains(guard) {
                return Err(format!("Guard {} is not inside", guard));
            }
        }

        self.shift.validate(&self.registry, &self.occupancy)
    }
}
