//! Runs against a facility
//!
//! Two ways to exercise a facility end to end:
//!
//! - **HandoverScenario**: scripted replacement of both guards, one seat at a time
//! - **DrillEngine**: seeded random operations with invariant checks after every step
//!
//! Plus the supporting pieces: run statistics, run-level errors and the
//! tracing setup used by the binary.
//!
//! # Usage Example
//!
//! ```rust
//! use guarded_facility::simulation::*;
//! use guarded_facility::types::*;
//!
//! let config = FacilityConfig { seed: Some(3), steps: 50, ..Default::default() };
//!
//! let report = run_drill(&config).unwrap();
//! assert_eq!(report.statistics.steps, 50);
//!
//! let handover = run_full_handover(&config).unwrap();
//! assert_eq!(handover.statistics.seats_handed_over, 2);
//! ```

pub mod drill;
pub mod error;
pub mod logging;
pub mod scenario;
pub mod statistics;

// Re-export all public types for convenience
pub use drill::*;
pub use error::*;
pub use logging::*;
pub use scenario::*;
pub use statistics::*;
