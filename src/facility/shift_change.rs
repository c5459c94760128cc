//! Guard shift change
//!
//! A full handover replaces both guard seats, one half at a time. Each half
//! runs:
//!
//! ```text
//! request_shift_change (candidate, outside)   -> Requested
//! approve_shift_change (a guard, room left)   -> Approved
//! candidate enters through the normal entry protocol -> InProgress
//! complete_shift_change (a guard)             -> AwaitingSecondHalf | Complete
//! ```
//!
//! The replaced guard stays inside as ordinary staff and leaves through the
//! normal exit protocol. At most one half is in flight at a time, and the seat
//! it replaces is fixed when the half is requested.

use crate::events::AuditEvent;
use crate::facility::controller::Facility;
use crate::facility::error::{AccessError, AccessResult};
use crate::facility::occupancy::OccupancyTracker;
use crate::facility::registry::IdentityRegistry;
use crate::types::{GuardSeat, IdentityId, ShiftPhase};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// The half-handover currently in flight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfHandover {
    /// Staff identity taking the seat
    pub candidate: IdentityId,
    /// Seat being replaced
    pub seat: GuardSeat,
    /// Guard who approved the candidate
    pub approving_guard: Option<IdentityId>,
}

/// Handover phase plus the in-flight half, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftChange {
    phase: ShiftPhase,
    half: Option<HalfHandover>,
    /// "Shift change started" has been logged for the current handover
    #[serde(default)]
    started: bool,
}

impl Default for ShiftChange {
    fn default() -> Self {
        Self::new()
    }
}

impl ShiftChange {
    /// No handover started
    pub fn new() -> Self {
        Self { phase: ShiftPhase::None, half: None, started: false }
    }

    /// Current phase
    pub fn phase(&self) -> ShiftPhase {
        self.phase
    }

    /// The in-flight half, if any
    pub fn half(&self) -> Option<&HalfHandover> {
        self.half.as_ref()
    }

    /// Candidate of the in-flight half
    pub fn candidate(&self) -> Option<IdentityId> {
        self.half.as_ref().map(|half| half.candidate)
    }

    /// Seat replaced by the in-flight half
    pub fn seat(&self) -> Option<GuardSeat> {
        self.half.as_ref().map(|half| half.seat)
    }

    /// Guard who approved the in-flight half
    pub fn approving_guard(&self) -> Option<IdentityId> {
        self.half.as_ref().and_then(|half| half.approving_guard)
    }

    /// Whether the current handover has been logged as started
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Requested candidate who already came in through the entry protocol
    fn candidate_waiting_inside(&self, occupancy: &OccupancyTracker) -> bool {
        self.phase == ShiftPhase::Requested
            && self.candidate().is_some_and(|candidate| occupancy.contains(candidate))
    }

    pub(crate) fn note_entered(&mut self, id: IdentityId) {
        if self.phase == ShiftPhase::Approved && self.candidate() == Some(id) {
            self.phase = ShiftPhase::InProgress;
        }
    }

    pub(crate) fn note_exited(&mut self, id: IdentityId) {
        if self.phase == ShiftPhase::InProgress && self.candidate() == Some(id) {
            self.phase = ShiftPhase::Approved;
        }
    }

    /// Phase a cancelled half falls back to
    fn phase_before(seat: GuardSeat) -> ShiftPhase {
        match seat {
            GuardSeat::First => ShiftPhase::None,
            GuardSeat::Second => ShiftPhase::AwaitingSecondHalf,
        }
    }

    /// Check the record against the facility it belongs to
    pub(crate) fn validate(
        &self,
        registry: &IdentityRegistry,
        occupancy: &OccupancyTracker,
    ) -> Result<(), String> {
        match (&self.half, self.phase.is_in_flight()) {
            (Some(_), false) => {
                return Err(format!("Handover record present in phase {}", self.phase));
            }
            (None, true) => return Err(format!("Phase {} without a handover record", self.phase)),
            _ => {}
        }

        if self.phase == ShiftPhase::AwaitingSecondHalf && !self.started {
            return Err("Second half pending without a started handover".to_string());
        }
        if self.phase.is_approved() && !self.started {
            return Err(format!("Phase {} before the handover was started", self.phase));
        }

        let Some(half) = &self.half else {
            return Ok(());
        };

        if registry.is_guard(half.candidate) {
            return Err(format!("Candidate {} already holds a guard seat", half.candidate));
        }
        if self.phase.is_approved() != half.approving_guard.is_some() {
            return Err(format!("Phase {} disagrees with recorded approval", self.phase));
        }
        // A requested candidate may already have come in through the entry protocol
        let inside = occupancy.contains(half.candidate);
        if self.phase.is_approved() && (self.phase == ShiftPhase::InProgress) != inside {
            return Err(format!(
                "Phase {} disagrees with candidate presence ({})",
                self.phase,
                if inside { "inside" } else { "outside" }
            ));
        }

        Ok(())
    }
}

impl Facility {
    /// Ask to take the next guard seat; the caller is the candidate
    #[instrument(skip(self), fields(caller = %caller))]
    pub fn request_shift_change(&mut self, caller: IdentityId) -> AccessResult<()> {
        // Guards are always inside
        let precheck = if self.occupancy.contains(caller) {
            Err(AccessError::AlreadyInside(caller))
        } else {
            self.shift.phase.next_seat().ok_or(AccessError::ShiftChangeInProgress)
        };

        let seat = match precheck {
            Ok(seat) => seat,
            Err(e) => {
                debug!(error = %e, "Shift change request rejected");
                return Err(e);
            }
        };

        self.shift.half = Some(HalfHandover { candidate: caller, seat, approving_guard: None });
        self.shift.phase = ShiftPhase::Requested;

        crate::facility_event!(info, "Shift change requested", candidate = caller, seat = seat);
        Ok(())
    }

    /// Approve the requested half-handover as one of the guards
    ///
    /// Needs room for the candidate to enter unless the candidate is already
    /// inside. Approving a half that is already approved changes nothing, but
    /// still fails with `FacilityFull` at capacity.
    #[instrument(skip(self), fields(caller = %caller))]
    pub fn approve_shift_change(&mut self, caller: IdentityId) -> AccessResult<()> {
        let precheck = if !self.registry.is_guard(caller) {
            Err(AccessError::NotAGuard(caller))
        } else if !self.shift.phase.is_in_flight() {
            Err(AccessError::NoShiftChangeRequested)
        } else if self.occupancy.is_full() && !self.shift.candidate_waiting_inside(&self.occupancy) {
            Err(AccessError::FacilityFull)
        } else {
            Ok(())
        };
        if let Err(e) = precheck {
            debug!(error = %e, "Shift change approval rejected");
            return Err(e);
        }

        if self.shift.phase.is_approved() {
            debug!("Shift change already approved");
            return Ok(());
        }

        let (candidate, seat) = match self.shift.half.as_mut() {
            Some(half) => {
                half.approving_guard = Some(caller);
                (half.candidate, half.seat)
            }
            None => return Err(AccessError::NoShiftChangeRequested),
        };
        self.shift.phase = if self.occupancy.contains(candidate) {
            ShiftPhase::InProgress
        } else {
            ShiftPhase::Approved
        };

        if !self.shift.started {
            self.shift.started = true;
            self.log.append(AuditEvent::ShiftChangeStarted);
        }

        crate::facility_event!(info, "Shift change approved", approver = caller, seat = seat);
        Ok(())
    }

    /// Seat the candidate and demote the guard it replaces
    ///
    /// Returns the demoted former guard, who is still inside and leaves
    /// through the normal exit protocol.
    #[instrument(skip(self), fields(caller = %caller))]
    pub fn complete_shift_change(&mut self, caller: IdentityId) -> AccessResult<IdentityId> {
        let precheck = if !self.registry.is_guard(caller) {
            Err(AccessError::NotAGuard(caller))
        } else {
            match &self.shift.half {
                Some(half) if self.shift.phase.is_approved() => {
                    if self.occupancy.contains(half.candidate) {
                        Ok((half.candidate, half.seat))
                    } else {
                        Err(AccessError::CandidateNotInside(half.candidate))
                    }
                }
                _ => Err(AccessError::NotApproved),
            }
        };

        let (candidate, seat) = match precheck {
            Ok(pair) => pair,
            Err(e) => {
                debug!(error = %e, "Shift change completion rejected");
                return Err(e);
            }
        };

        let demoted = self.registry.hand_over(seat, candidate)?;
        self.shift.half = None;
        self.shift.phase = match seat {
            GuardSeat::First => ShiftPhase::AwaitingSecondHalf,
            GuardSeat::Second => ShiftPhase::Complete,
        };

        self.log.append(AuditEvent::guard_changed(seat));
        if seat == GuardSeat::Second {
            self.shift.started = false;
            self.log.append(AuditEvent::ShiftChangeEnded);
        }

        crate::facility_event!(info, "Guard seat handed over", seat = seat, new_guard = candidate, former_guard = demoted);
        Ok(demoted)
    }

    /// Cancel the in-flight half-handover as one of the guards
    ///
    /// A candidate who already entered stays inside as ordinary staff.
    #[instrument(skip(self), fields(caller = %caller))]
    pub fn reject_shift_change(&mut self, caller: IdentityId) -> AccessResult<()> {
        let precheck = if !self.registry.is_guard(caller) {
            Err(AccessError::NotAGuard(caller))
        } else {
            self.shift.seat().ok_or(AccessError::NoShiftChangeRequested)
        };

        let seat = match precheck {
            Ok(seat) => seat,
            Err(e) => {
                debug!(error = %e, "Shift change rejection refused");
                return Err(e);
            }
        };

        self.shift.half = None;
        self.shift.phase = ShiftChange::phase_before(seat);
        self.log.append(AuditEvent::ShiftChangeRejected);

        crate::facility_event!(info, "Shift change rejected", rejected_by = caller, seat = seat);
        Ok(())
    }
}
