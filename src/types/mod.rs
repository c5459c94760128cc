//! Core types and identifiers for the guarded facility
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the access-control state machine.
//!
//! # Overview
//!
//! - **Identifiers**: UUID-based opaque identity handles
//! - **Enums**: Roles, request directions, guard seats and shift-change phases
//! - **Configuration**: Facility configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use guarded_facility::types::*;
//!
//! let staff = IdentityId::new();
//! let direction = Direction::from(true);
//! assert_eq!(direction, Direction::Entry);
//!
//! let config = FacilityConfig { capacity: 4, ..Default::default() };
//! assert!(config.validate().is_ok());
//! # let _ = staff;
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
