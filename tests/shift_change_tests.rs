//! Tests for the supervised guard handover
//!
//! Covers both half-handovers, the preconditions of every shift-change
//! operation, rejection, and how approvals behave once a seat changes hands.

use guarded_facility::*;

fn facility() -> (Facility, [IdentityId; 2]) {
    let guards = [IdentityId::new(), IdentityId::new()];
    (Facility::new(3, guards).unwrap(), guards)
}

fn approve_both(facility: &mut Facility, who: IdentityId, direction: Direction) {
    for guard in facility.guards() {
        match direction {
            Direction::Entry => facility.approve_entry(guard, who).unwrap(),
            Direction::Exit => facility.approve_exit(guard, who).unwrap(),
        }
    }
}

fn pass(facility: &mut Facility, who: IdentityId, direction: Direction) {
    facility.make_request(who, direction).unwrap();
    approve_both(facility, who, direction);
    match direction {
        Direction::Entry => facility.enter(who).unwrap(),
        Direction::Exit => facility.exit(who).unwrap(),
    }
}

/// Request, approve and bring the candidate inside, ready for completion
fn stage_half(facility: &mut Facility, candidate: IdentityId, approver: IdentityId) {
    facility.request_shift_change(candidate).unwrap();
    facility.approve_shift_change(approver).unwrap();
    pass(facility, candidate, Direction::Entry);
}

/// The first half seats the candidate and demotes the first guard
#[test]
fn test_first_half_handover() {
    let (mut facility, guards) = facility();
    let candidate = IdentityId::new();

    facility.request_shift_change(candidate).unwrap();
    assert_eq!(facility.shift_phase(), ShiftPhase::Requested);

    facility.approve_shift_change(guards[1]).unwrap();
    assert_eq!(facility.shift_phase(), ShiftPhase::Approved);

    pass(&mut facility, candidate, Direction::Entry);
    assert_eq!(facility.shift_phase(), ShiftPhase::InProgress);

    let demoted = facility.complete_shift_change(guards[1]).unwrap();

    assert_eq!(demoted, guards[0]);
    assert_eq!(facility.guards(), [candidate, guards[1]]);
    assert_eq!(facility.role_of(guards[0]), Role::Ordinary);
    assert!(facility.is_inside(guards[0]));
    assert_eq!(facility.shift_phase(), ShiftPhase::AwaitingSecondHalf);

    // The former guard now leaves like anyone else
    pass(&mut facility, guards[0], Direction::Exit);
    assert!(!facility.is_inside(guards[0]));

    assert_eq!(
        facility.get_log(),
        vec![
            "Shift change started".to_string(),
            format!("{} entered", candidate),
            "First guard changed".to_string(),
            format!("{} exited", guards[0]),
        ]
    );
    assert!(facility.check_invariants().is_ok());
}

/// Both halves in sequence replace both guards
#[test]
fn test_full_handover_log() {
    let (mut facility, guards) = facility();
    let first = IdentityId::new();
    let second = IdentityId::new();

    stage_half(&mut facility, first, guards[1]);
    facility.complete_shift_change(guards[1]).unwrap();
    pass(&mut facility, guards[0], Direction::Exit);

    stage_half(&mut facility, second, first);
    let demoted = facility.complete_shift_change(first).unwrap();
    assert_eq!(demoted, guards[1]);
    pass(&mut facility, guards[1], Direction::Exit);

    assert_eq!(facility.guards(), [first, second]);
    assert_eq!(facility.shift_phase(), ShiftPhase::Complete);
    assert_eq!(
        facility.get_log(),
        vec![
            "Shift change started".to_string(),
            format!("{} entered", first),
            "First guard changed".to_string(),
            format!("{} exited", guards[0]),
            format!("{} entered", second),
            "Second guard changed".to_string(),
            "Shift change ended".to_string(),
            format!("{} exited", guards[1]),
        ]
    );
}

/// A completed handover allows a new one to start from the first seat
#[test]
fn test_new_handover_after_complete() {
    let (mut facility, guards) = facility();
    let [first, second, third] = [IdentityId::new(), IdentityId::new(), IdentityId::new()];

    stage_half(&mut facility, first, guards[1]);
    facility.complete_shift_change(guards[1]).unwrap();
    pass(&mut facility, guards[0], Direction::Exit);
    stage_half(&mut facility, second, first);
    facility.complete_shift_change(first).unwrap();
    pass(&mut facility, guards[1], Direction::Exit);

    facility.request_shift_change(third).unwrap();
    assert_eq!(facility.shift_change().seat(), Some(GuardSeat::First));
}

/// Approval needs room for the candidate
#[test]
fn test_approval_fails_when_full() {
    let (mut facility, guards) = facility();
    let staff = IdentityId::new();
    let candidate = IdentityId::new();

    pass(&mut facility, staff, Direction::Entry);
    facility.request_shift_change(candidate).unwrap();

    assert_eq!(facility.approve_shift_change(guards[0]), Err(AccessError::FacilityFull));
    assert_eq!(facility.shift_phase(), ShiftPhase::Requested);
    assert!(facility.get_log().iter().all(|line| line != "Shift change started"));
}

/// Once the candidate is in, nobody else fits
#[test]
fn test_entry_during_shift_change_blocked_by_capacity() {
    let (mut facility, guards) = facility();
    let candidate = IdentityId::new();
    let staff = IdentityId::new();

    stage_half(&mut facility, candidate, guards[0]);

    facility.make_request(staff, Direction::Entry).unwrap();
    approve_both(&mut facility, staff, Direction::Entry);
    assert_eq!(facility.enter(staff), Err(AccessError::CapacityExceeded { capacity: 3 }));
}

/// Preconditions of each shift-change operation
#[test]
fn test_shift_change_preconditions() {
    let (mut facility, guards) = facility();
    let candidate = IdentityId::new();
    let other = IdentityId::new();

    assert_eq!(facility.approve_shift_change(guards[0]), Err(AccessError::NoShiftChangeRequested));
    assert_eq!(facility.complete_shift_change(guards[0]), Err(AccessError::NotApproved));
    assert_eq!(facility.reject_shift_change(guards[0]), Err(AccessError::NoShiftChangeRequested));
    assert_eq!(facility.request_shift_change(guards[0]), Err(AccessError::AlreadyInside(guards[0])));

    facility.request_shift_change(candidate).unwrap();
    assert_eq!(facility.request_shift_change(other), Err(AccessError::ShiftChangeInProgress));
    assert_eq!(facility.approve_shift_change(candidate), Err(AccessError::NotAGuard(candidate)));
    assert_eq!(facility.complete_shift_change(guards[0]), Err(AccessError::NotApproved));

    facility.approve_shift_change(guards[0]).unwrap();
    assert_eq!(facility.complete_shift_change(other), Err(AccessError::NotAGuard(other)));
    assert_eq!(
        facility.complete_shift_change(guards[1]),
        Err(AccessError::CandidateNotInside(candidate))
    );

    assert_eq!(facility.guards(), guards);
    assert!(facility.check_invariants().is_ok());
}

/// Approving an approved half again is a no-op
#[test]
fn test_repeated_shift_change_approval() {
    let (mut facility, guards) = facility();
    let candidate = IdentityId::new();

    facility.request_shift_change(candidate).unwrap();
    facility.approve_shift_change(guards[0]).unwrap();
    facility.approve_shift_change(guards[1]).unwrap();

    assert_eq!(facility.shift_change().approving_guard(), Some(guards[0]));
    assert_eq!(facility.get_log(), vec!["Shift change started".to_string()]);
}

/// A candidate who is already inside moves straight to in-progress on approval
#[test]
fn test_candidate_entering_before_approval() {
    let (mut facility, guards) = facility();
    let candidate = IdentityId::new();

    facility.request_shift_change(candidate).unwrap();
    pass(&mut facility, candidate, Direction::Entry);
    assert_eq!(facility.shift_phase(), ShiftPhase::Requested);
    assert_eq!(facility.occupancy_count(), facility.capacity());

    // The candidate already holds the last place, so no room is needed
    facility.approve_shift_change(guards[0]).unwrap();
    assert_eq!(facility.shift_phase(), ShiftPhase::InProgress);
    assert!(facility.check_invariants().is_ok());

    assert_eq!(facility.complete_shift_change(guards[0]).unwrap(), guards[0]);
    assert_eq!(facility.guards(), [candidate, guards[1]]);
}

/// A full facility still refuses a requested candidate who is outside
#[test]
fn test_approval_fails_when_full_with_candidate_outside() {
    let (mut facility, guards) = facility();
    let candidate = IdentityId::new();
    let staff = IdentityId::new();

    facility.request_shift_change(candidate).unwrap();
    pass(&mut facility, staff, Direction::Entry);

    assert_eq!(facility.approve_shift_change(guards[0]), Err(AccessError::FacilityFull));
    assert_eq!(facility.shift_phase(), ShiftPhase::Requested);
}

/// Approving again once the candidate fills the facility fails
#[test]
fn test_repeated_approval_at_capacity() {
    let (mut facility, guards) = facility();
    let candidate = IdentityId::new();

    stage_half(&mut facility, candidate, guards[0]);
    assert_eq!(facility.occupancy_count(), 3);

    assert_eq!(facility.approve_shift_change(guards[1]), Err(AccessError::FacilityFull));
    assert_eq!(facility.shift_phase(), ShiftPhase::InProgress);
    assert_eq!(facility.shift_change().approving_guard(), Some(guards[0]));
}

/// The handover is logged as started once, however many halves are rejected
#[test]
fn test_started_logged_once_across_rejections() {
    let (mut facility, guards) = facility();
    let rejected = IdentityId::new();
    let first = IdentityId::new();
    let second = IdentityId::new();

    facility.request_shift_change(rejected).unwrap();
    facility.approve_shift_change(guards[0]).unwrap();
    facility.reject_shift_change(guards[1]).unwrap();
    assert!(facility.shift_change().is_started());

    stage_half(&mut facility, first, guards[1]);
    facility.complete_shift_change(guards[1]).unwrap();
    pass(&mut facility, guards[0], Direction::Exit);
    stage_half(&mut facility, second, first);
    facility.complete_shift_change(first).unwrap();
    assert!(!facility.shift_change().is_started());

    let log = facility.get_log();
    assert_eq!(log.iter().filter(|line| *line == "Shift change started").count(), 1);
    assert_eq!(&log[..2], ["Shift change started".to_string(), "Shift change rejected".to_string()]);
    assert_eq!(log.last().map(String::as_str), Some("Shift change ended"));
    assert!(facility.check_invariants().is_ok());
}

/// A handover after a completed one is logged as a new start
#[test]
fn test_new_handover_after_complete_logs_start() {
    let (mut facility, guards) = facility();
    let candidates = [IdentityId::new(), IdentityId::new()];

    stage_half(&mut facility, candidates[0], guards[1]);
    facility.complete_shift_change(guards[1]).unwrap();
    pass(&mut facility, guards[0], Direction::Exit);
    stage_half(&mut facility, candidates[1], candidates[0]);
    facility.complete_shift_change(candidates[0]).unwrap();
    pass(&mut facility, guards[1], Direction::Exit);

    facility.request_shift_change(IdentityId::new()).unwrap();
    facility.approve_shift_change(candidates[0]).unwrap();

    let log = facility.get_log();
    assert_eq!(log.iter().filter(|line| *line == "Shift change started").count(), 2);
    assert_eq!(log.last().map(String::as_str), Some("Shift change started"));
}

/// A candidate leaving before completion takes the half back to approved
#[test]
fn test_candidate_leaving_reverts_to_approved() {
    let (mut facility, guards) = facility();
    let candidate = IdentityId::new();

    stage_half(&mut facility, candidate, guards[0]);
    pass(&mut facility, candidate, Direction::Exit);

    assert_eq!(facility.shift_phase(), ShiftPhase::Approved);
    assert_eq!(
        facility.complete_shift_change(guards[0]),
        Err(AccessError::CandidateNotInside(candidate))
    );
    assert!(facility.check_invariants().is_ok());
}

/// Rejection cancels the half and the candidate stays ordinary staff
#[test]
fn test_reject_shift_change() {
    let (mut facility, guards) = facility();
    let candidate = IdentityId::new();
    let replacement = IdentityId::new();

    stage_half(&mut facility, candidate, guards[0]);
    assert_eq!(facility.reject_shift_change(candidate), Err(AccessError::NotAGuard(candidate)));

    facility.reject_shift_change(guards[1]).unwrap();

    assert_eq!(facility.shift_phase(), ShiftPhase::None);
    assert_eq!(facility.guards(), guards);
    assert!(facility.is_inside(candidate));
    assert_eq!(facility.role_of(candidate), Role::Ordinary);
    assert_eq!(facility.complete_shift_change(guards[0]), Err(AccessError::NotApproved));
    assert_eq!(facility.get_log().last().map(String::as_str), Some("Shift change rejected"));

    // The rejected candidate leaves normally and someone else may try
    pass(&mut facility, candidate, Direction::Exit);
    facility.request_shift_change(replacement).unwrap();
    assert!(facility.check_invariants().is_ok());
}

/// Rejecting the second half keeps the first half in place
#[test]
fn test_reject_second_half() {
    let (mut facility, guards) = facility();
    let first = IdentityId::new();
    let second = IdentityId::new();

    stage_half(&mut facility, first, guards[1]);
    facility.complete_shift_change(guards[1]).unwrap();
    pass(&mut facility, guards[0], Direction::Exit);

    facility.request_shift_change(second).unwrap();
    facility.reject_shift_change(first).unwrap();

    assert_eq!(facility.shift_phase(), ShiftPhase::AwaitingSecondHalf);
    assert_eq!(facility.guards(), [first, guards[1]]);
}

/// Approvals from a guard who has been replaced no longer count
#[test]
fn test_approval_from_replaced_guard_is_stale() {
    let (mut facility, guards) = facility();
    let candidate = IdentityId::new();
    let waiting = IdentityId::new();

    facility.make_request(waiting, Direction::Entry).unwrap();
    approve_both(&mut facility, waiting, Direction::Entry);
    assert!(facility.is_fully_approved(waiting));

    stage_half(&mut facility, candidate, guards[1]);
    facility.complete_shift_change(guards[1]).unwrap();

    assert!(!facility.is_fully_approved(waiting));
    assert_eq!(facility.approve_entry(guards[0], waiting), Err(AccessError::NotAGuard(guards[0])));

    facility.approve_entry(candidate, waiting).unwrap();
    assert!(facility.is_fully_approved(waiting));
}

/// An exit approved before promotion cannot be used by the new guard
#[test]
fn test_promoted_candidate_cannot_use_old_exit_request() {
    let (mut facility, guards) = facility();
    let candidate = IdentityId::new();

    stage_half(&mut facility, candidate, guards[0]);
    facility.make_request(candidate, Direction::Exit).unwrap();
    approve_both(&mut facility, candidate, Direction::Exit);

    facility.complete_shift_change(guards[0]).unwrap();

    assert_eq!(facility.exit(candidate), Err(AccessError::GuardsCannotExit(candidate)));
    assert!(facility.is_inside(candidate));
    assert!(facility.check_invariants().is_ok());
}

/// Shift-change bookkeeping shows up in the typed audit entries
#[test]
fn test_audit_entries_are_sequenced() {
    let (mut facility, guards) = facility();
    let candidate = IdentityId::new();

    stage_half(&mut facility, candidate, guards[0]);
    facility.complete_shift_change(guards[0]).unwrap();

    let entries = facility.audit_entries();
    assert_eq!(entries.len(), 3);
    for (index, entry) in entries.iter().enumerate() {
        assert_eq!(entry.sequence, index as u64);
    }
    assert_eq!(entries[0].event, AuditEvent::ShiftChangeStarted);
    assert_eq!(entries[1].event, AuditEvent::Entered(candidate));
    assert_eq!(entries[2].event, AuditEvent::FirstGuardChanged);
    assert!(entries[0].recorded_at <= entries[2].recorded_at);
}
