//! Audit events
//!
//! The facility records every successful transition in an append-only audit
//! log. Failed calls are never recorded; they surface only as errors.
//!
//! # Usage Example
//!
//! ```rust
//! use guarded_facility::events::*;
//! use guarded_facility::types::IdentityId;
//!
//! let staff = IdentityId::new();
//! let mut log = AuditLog::new();
//! log.append(AuditEvent::Entered(staff));
//!
//! assert_eq!(log.messages(), vec![format!("{} entered", staff)]);
//! ```

pub mod audit;

// Re-export all public types for convenience
pub use audit::*;
