//! The guarded facility
//!
//! This module contains the access-control state machine and its parts.
//!
//! # Overview
//!
//! - **IdentityRegistry**: the two guard seats; everyone else is staff
//! - **OccupancyTracker**: who is inside, bounded by capacity
//! - **Facility**: the access controller; owns every piece of state and
//!   applies requests, dual approvals, entries, exits and shift changes
//! - **ShiftChange**: the handover record driving guard replacement
//! - **SharedFacility**: one mutex around a facility for multi-threaded callers
//! - **AccessError**: typed failures, each leaving the facility unchanged
//!
//! # Usage Example
//!
//! ```rust
//! use guarded_facility::facility::*;
//! use guarded_facility::types::*;
//!
//! let guards = [IdentityId::new(), IdentityId::new()];
//! let mut facility = Facility::new(3, guards).unwrap();
//!
//! let staff = IdentityId::new();
//! facility.make_request(staff, Direction::Entry).unwrap();
//! facility.approve_entry(guards[0], staff).unwrap();
//! assert!(facility.enter(staff).is_err());
//!
//! facility.approve_entry(guards[1], staff).unwrap();
//! facility.enter(staff).unwrap();
//! assert_eq!(facility.get_log(), vec![format!("{} entered", staff)]);
//! ```

pub mod controller;
pub mod error;
pub mod occupancy;
pub mod registry;
pub mod shared;
pub mod shift_change;

// Re-export all public types for convenience
pub use controller::Facility;
pub use error::{AccessError, AccessResult, ErrorCategory};
pub use occupancy::OccupancyTracker;
pub use registry::IdentityRegistry;
pub use shared::SharedFacility;
pub use shift_change::{HalfHandover, ShiftChange};
