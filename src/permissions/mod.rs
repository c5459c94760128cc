//! Pending requests and dual approval
//!
//! This module holds the request ledger: at most one pending entry or exit
//! request per identity, with the approval recorded by each guard seat.
//!
//! # Usage Example
//!
//! ```rust
//! use guarded_facility::permissions::*;
//! use guarded_facility::types::*;
//!
//! let guards = [IdentityId::new(), IdentityId::new()];
//! let staff = IdentityId::new();
//!
//! let mut ledger = RequestLedger::new();
//! ledger.submit(staff, Direction::Entry);
//! ledger.approve(staff, GuardSeat::First, guards[0], Direction::Entry).unwrap();
//! assert!(!ledger.is_fully_approved(staff, guards));
//!
//! ledger.approve(staff, GuardSeat::Second, guards[1], Direction::Entry).unwrap();
//! assert_eq!(ledger.consume(staff, guards).unwrap(), Direction::Entry);
//! ```

pub mod ledger;
pub mod pending_request;

// Re-export all public types for convenience
pub use ledger::*;
pub use pending_request::*;
