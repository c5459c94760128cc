//! Enumeration types for the guarded facility
//!
//! This module contains the enumerations used throughout the access-control
//! state machine (roles, request directions, guard seats, shift-change phases)
//! and the ones used by the binary (output format, run mode).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role held by an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// One of the two authorized guards
    Guard,
    /// Any other identity (staff)
    Ordinary,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Guard => write!(f, "Guard"),
            Role::Ordinary => write!(f, "Ordinary"),
        }
    }
}

/// Direction of a pending access request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Request to enter the facility
    Entry,
    /// Request to leave the facility
    Exit,
}

impl Direction {
    /// Map the boolean form used by `makeRequest(isEntry)` callers
    pub fn from_is_entry(is_entry: bool) -> Self {
        if is_entry {
            Direction::Entry
        } else {
            Direction::Exit
        }
    }

    /// Whether this is an entry request
    pub fn is_entry(&self) -> bool {
        matches!(self, Direction::Entry)
    }
}

impl From<bool> for Direction {
    fn from(is_entry: bool) -> Self {
        Self::from_is_entry(is_entry)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Entry => write!(f, "entry"),
            Direction::Exit => write!(f, "exit"),
        }
    }
}

/// One of the two guard positions
///
/// A full handover replaces the first seat, then the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuardSeat {
    /// Seat replaced by the first half-handover
    First,
    /// Seat replaced by the second half-handover
    Second,
}

impl GuardSeat {
    /// Both seats in handover order
    pub const ALL: [GuardSeat; 2] = [GuardSeat::First, GuardSeat::Second];

    /// Array index of the seat
    pub fn index(&self) -> usize {
        match self {
            GuardSeat::First => 0,
            GuardSeat::Second => 1,
        }
    }

    /// The other seat
    pub fn other(&self) -> Self {
        match self {
            GuardSeat::First => GuardSeat::Second,
            GuardSeat::Second => GuardSeat::First,
        }
    }
}

impl fmt::Display for GuardSeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardSeat::First => write!(f, "first"),
            GuardSeat::Second => write!(f, "second"),
        }
    }
}

/// Phase of the overall guard handover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftPhase {
    /// No handover has started
    None,
    /// A candidate asked to take a guard seat
    Requested,
    /// A guard approved the candidate
    Approved,
    /// The approved candidate is inside and awaits completion
    InProgress,
    /// The first seat changed hands; the second half has not completed
    AwaitingSecondHalf,
    /// Both seats changed hands
    Complete,
}

impl ShiftPhase {
    /// Whether a half-handover is currently in flight
    pub fn is_in_flight(&self) -> bool {
        matches!(self, ShiftPhase::Requested | ShiftPhase::Approved | ShiftPhase::InProgress)
    }

    /// Whether the in-flight half has been approved by a guard
    pub fn is_approved(&self) -> bool {
        matches!(self, ShiftPhase::Approved | ShiftPhase::InProgress)
    }

    /// Seat the next half-handover replaces, if one may start from this phase
    pub fn next_seat(&self) -> Option<GuardSeat> {
        match self {
            ShiftPhase::None | ShiftPhase::Complete => Some(GuardSeat::First),
            ShiftPhase::AwaitingSecondHalf => Some(GuardSeat::Second),
            ShiftPhase::Requested | ShiftPhase::Approved | ShiftPhase::InProgress => None,
        }
    }
}

impl fmt::Display for ShiftPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftPhase::None => write!(f, "None"),
            ShiftPhase::Requested => write!(f, "Requested"),
            ShiftPhase::Approved => write!(f, "Approved"),
            ShiftPhase::InProgress => write!(f, "In Progress"),
            ShiftPhase::AwaitingSecondHalf => write!(f, "Awaiting Second Half"),
            ShiftPhase::Complete => write!(f, "Complete"),
        }
    }
}

/// Output formats for the audit log report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// One human-readable line per entry
    Text,
    /// JSON document with entries and statistics
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "Text"),
            OutputFormat::Json => write!(f, "JSON"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// What the binary runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunMode {
    /// Scripted full two-seat guard handover
    Handover,
    /// Seeded randomized operation drill with invariant checks
    Drill,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Handover => write!(f, "handover"),
            RunMode::Drill => write!(f, "drill"),
        }
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "handover" | "shift-change" => Ok(RunMode::Handover),
            "drill" => Ok(RunMode::Drill),
            _ => Err(format!("Unknown run mode: {}", s)),
        }
    }
}
