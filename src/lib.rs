//! Guarded Facility
//!
//! An access-control state machine for a single secured facility. Exactly two
//! guards are inside at all times; everyone else enters and leaves only after
//! both guards approve the specific request. Guards are replaced one seat at a
//! time through a supervised shift change, and every successful transition is
//! appended to an audit log.
//!
//! ## Key Features
//!
//! - **Dual approval**: entry and exit need both current guards to approve
//! - **Bounded occupancy**: a fixed capacity that always includes both guards
//! - **Shift change**: two half-handovers, each seating one new guard
//! - **Audit log**: append-only record of entries, exits and guard changes
//! - **Drills**: seeded random operations with invariant checks after each step
//!
//! ## Quick Start
//!
//! ```rust
//! use guarded_facility::*;
//!
//! let guards = [IdentityId::new(), IdentityId::new()];
//! let mut facility = Facility::new(3, guards)?;
//!
//! let candidate = IdentityId::new();
//! facility.request_shift_change(candidate)?;
//! facility.approve_shift_change(guards[0])?;
//!
//! facility.make_request(candidate, Direction::Entry)?;
//! facility.approve_entry(guards[0], candidate)?;
//! facility.approve_entry(guards[1], candidate)?;
//! facility.enter(candidate)?;
//!
//! let demoted = facility.complete_shift_change(guards[1])?;
//! assert_eq!(demoted, guards[0]);
//! assert!(facility.is_guard(candidate));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Identifiers, enums and configuration
//! - [`permissions`]: Pending requests and their per-seat approvals
//! - [`facility`]: The access controller, occupancy, guard seats and shift change
//! - [`events`]: The audit log
//! - [`simulation`]: Scripted handovers, random drills, statistics and logging
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Types     │◄───┤ Permissions │◄───┤  Facility   │
//! │ Identifiers │    │ Requests    │    │ Controller  │
//! │ Enums       │    │ Approvals   │    │ Shift change│
//! │ Config      │    │             │    │ Occupancy   │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!                                          ▲       │
//!                    ┌─────────────┐       │       ▼
//!                    │ Simulation  ├───────┘ ┌─────────────┐
//!                    │ Drill       │         │   Events    │
//!                    │ Handover    │         │ Audit log   │
//!                    └─────────────┘         └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod events;
pub mod facility;
pub mod permissions;
pub mod simulation;
pub mod types;

// Core types and identifiers
pub use types::{
    ConfigValidationError, Direction, FacilityConfig, GuardSeat, IdentityId, OutputFormat, Role,
    RunMode, ShiftPhase,
};

// Requests and approvals
pub use permissions::{PendingRequest, RequestLedger};

// Access controller
pub use facility::{AccessError, AccessResult, ErrorCategory, Facility, SharedFacility};

// Audit log
pub use events::{AuditEntry, AuditEvent, AuditLog};

// Runs
pub use simulation::{
    run_drill, run_full_handover, DrillEngine, DrillReport, HandoverReport, HandoverScenario,
    LoggingConfig, RunStatistics, SimulationError, SimulationResult,
};
