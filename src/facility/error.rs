//! Access-control error types
//!
//! Every facility operation either completes or fails with one of these errors
//! and leaves all facility state unchanged.

use crate::types::{Direction, IdentityId};
use thiserror::Error;

/// Broad class of an access-control failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The caller lacks the required role
    Authorization,
    /// The identity or handover is not in the required phase
    StatePrecondition,
    /// The facility has no room
    ResourceLimit,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Authorization => write!(f, "Authorization"),
            ErrorCategory::StatePrecondition => write!(f, "State Precondition"),
            ErrorCategory::ResourceLimit => write!(f, "Resource Limit"),
        }
    }
}

/// Errors returned by facility operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Caller is not one of the two current guards
    #[error("{0} is not a guard")]
    NotAGuard(IdentityId),

    /// Guards only leave through a shift change
    #[error("guards cannot exit: {0} holds a guard seat")]
    GuardsCannotExit(IdentityId),

    /// Handover candidate already holds a guard seat
    #[error("{0} is already a guard")]
    AlreadyGuard(IdentityId),

    /// Identity is already inside
    #[error("{0} is already inside")]
    AlreadyInside(IdentityId),

    /// Identity is not inside
    #[error("{0} is not inside")]
    NotInside(IdentityId),

    /// Pending request lacks approval from both guards
    #[error("request of {0} is not approved by both guards")]
    NotFullyApproved(IdentityId),

    /// No request is pending for the identity
    #[error("no pending request for {0}")]
    NoSuchRequest(IdentityId),

    /// Approval direction does not match the pending request
    #[error("pending request is for {actual}, not {expected}")]
    WrongDirection {
        /// Direction the approval was for
        expected: Direction,
        /// Direction of the pending request
        actual: Direction,
    },

    /// No approved half-handover exists
    #[error("no approved shift change")]
    NotApproved,

    /// No half-handover awaits approval
    #[error("no shift change has been requested")]
    NoShiftChangeRequested,

    /// A half-handover is already in flight
    #[error("a shift change is already in progress")]
    ShiftChangeInProgress,

    /// Shift-change candidate has not entered yet
    #[error("shift change candidate {0} is not inside")]
    CandidateNotInside(IdentityId),

    /// Occupancy is at capacity
    #[error("already {capacity} people")]
    CapacityExceeded {
        /// Facility capacity
        capacity: usize,
    },

    /// No room for a handover candidate
    #[error("facility is full")]
    FacilityFull,

    /// Identity is absent from occupancy
    #[error("{0} is not present")]
    NotPresent(IdentityId),
}

impl AccessError {
    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            AccessError::NotAGuard(_) | AccessError::GuardsCannotExit(_) | AccessError::AlreadyGuard(_) => {
                ErrorCategory::Authorization
            }
            AccessError::CapacityExceeded { .. } | AccessError::FacilityFull => {
                ErrorCategory::ResourceLimit
            }
            AccessError::AlreadyInside(_)
            | AccessError::NotInside(_)
            | AccessError::NotFullyApproved(_)
            | AccessError::NoSuchRequest(_)
            | AccessError::WrongDirection { .. }
            | AccessError::NotApproved
            | AccessError::NoShiftChangeRequested
            | AccessError::ShiftChangeInProgress
            | AccessError::CandidateNotInside(_)
            | AccessError::NotPresent(_) => ErrorCategory::StatePrecondition,
        }
    }

    /// Short stable label, used for statistics keys
    pub fn label(&self) -> &'static str {
        match self {
            AccessError::NotAGuard(_) => "NotAGuard",
            AccessError::GuardsCannotExit(_) => "GuardsCannotExit",
            AccessError::AlreadyGuard(_) => "AlreadyGuard",
            AccessError::AlreadyInside(_) => "AlreadyInside",
            AccessError::NotInside(_) => "NotInside",
            AccessError::NotFullyApproved(_) => "NotFullyApproved",
            AccessError::NoSuchRequest(_) => "NoSuchRequest",
            AccessError::WrongDirection { .. } => "WrongDirection",
            AccessError::NotApproved => "NotApproved",
            AccessError::NoShiftChangeRequested => "NoShiftChangeRequested",
            AccessError::ShiftChangeInProgress => "ShiftChangeInProgress",
            AccessError::CandidateNotInside(_) => "CandidateNotInside",
            AccessError::CapacityExceeded { .. } => "CapacityExceeded",
            AccessError::FacilityFull => "FacilityFull",
            AccessError::NotPresent(_) => "NotPresent",
        }
    }
}

/// Result type for facility operations
pub type AccessResult<T> = Result<T, AccessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message() {
        let error = AccessError::CapacityExceeded { capacity: 3 };
        assert_eq!(error.to_string(), "already 3 people");
    }

    #[test]
    fn test_wrong_direction_message() {
        let error = AccessError::WrongDirection { expected: Direction::Entry, actual: Direction::Exit };
        assert_eq!(error.to_string(), "pending request is for exit, not entry");
    }

    #[test]
    fn test_error_categories() {
        let id = IdentityId::new();

        assert_eq!(AccessError::NotAGuard(id).category(), ErrorCategory::Authorization);
        assert_eq!(AccessError::GuardsCannotExit(id).category(), ErrorCategory::Authorization);
        assert_eq!(AccessError::AlreadyInside(id).category(), ErrorCategory::StatePrecondition);
        assert_eq!(AccessError::NotApproved.category(), ErrorCategory::StatePrecondition);
        assert_eq!(AccessError::FacilityFull.category(), ErrorCategory::ResourceLimit);
        assert_eq!(
            AccessError::CapacityExceeded { capacity: 3 }.category(),
            ErrorCategory::ResourceLimit
        );
    }

    #[test]
    fn test_error_labels() {
        assert_eq!(AccessError::FacilityFull.label(), "FacilityFull");
        assert_eq!(AccessError::NotFullyApproved(IdentityId::new()).label(), "NotFullyApproved");
    }
}
