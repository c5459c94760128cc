//! Append-only audit log
//!
//! Records successful transitions only. Entries are never removed or reordered;
//! their order is the record of what happened when.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{GuardSeat, IdentityId};

/// A successful transition worth recording
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "identity", rename_all = "snake_case")]
pub enum AuditEvent {
    /// Identity entered the facility
    Entered(IdentityId),
    /// Identity left the facility
    Exited(IdentityId),
    /// First approval of an overall guard handover
    ShiftChangeStarted,
    /// First seat changed hands
    FirstGuardChanged,
    /// Second seat changed hands
    SecondGuardChanged,
    /// Both seats changed hands
    ShiftChangeEnded,
    /// An in-flight half-handover was cancelled by a guard
    ShiftChangeRejected,
}

impl AuditEvent {
    /// Event recorded when a seat changes hands
    pub fn guard_changed(seat: GuardSeat) -> Self {
        match seat {
            GuardSeat::First => AuditEvent::FirstGuardChanged,
            GuardSeat::Second => AuditEvent::SecondGuardChanged,
        }
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditEvent::Entered(id) => write!(f, "{} entered", id),
            AuditEvent::Exited(id) => write!(f, "{} exited", id),
            AuditEvent::ShiftChangeStarted => write!(f, "Shift change started"),
            AuditEvent::FirstGuardChanged => write!(f, "First guard changed"),
            AuditEvent::SecondGuardChanged => write!(f, "Second guard changed"),
            AuditEvent::ShiftChangeEnded => write!(f, "Shift change ended"),
            AuditEvent::ShiftChangeRejected => write!(f, "Shift change rejected"),
        }
    }
}

/// A recorded event with its position and time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Zero-based position in the log
    pub sequence: u64,
    /// When the transition was applied
    pub recorded_at: DateTime<Utc>,
    /// What happened
    #[serde(flatten)]
    pub event: AuditEvent,
    /// Human-readable form of the event
    pub message: String,
}

/// Ordered list of audit entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event stamped with the current time
    pub fn append(&mut self, event: AuditEvent) -> &AuditEntry {
        self.append_at(event, Utc::now())
    }

    /// Append an event with an explicit timestamp
    pub fn append_at(&mut self, event: AuditEvent, recorded_at: DateTime<Utc>) -> &AuditEntry {
        let entry = AuditEntry {
            sequence: self.entries.len() as u64,
            recorded_at,
            message: event.to_string(),
            event,
        };
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Messages in append order
    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.message.clone()).collect()
    }

    /// All entries in append order
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&AuditEntry> {
        self.entries.last()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count entries matching a predicate
    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&AuditEvent) -> bool,
    {
        self.entries.iter().filter(|entry| predicate(&entry.event)).count()
    }

    /// Render the log as JSON lines, one entry per line
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&serde_json::to_string(entry)?);
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_event_wording() {
        let id = IdentityId::from_u128(0xabc);
        let mut log = AuditLog::new();

        log.append(AuditEvent::Entered(id));
        log.append(AuditEvent::ShiftChangeStarted);
        log.append(AuditEvent::guard_changed(GuardSeat::First));
        log.append(AuditEvent::guard_changed(GuardSeat::Second));
        log.append(AuditEvent::ShiftChangeEnded);
        log.append(AuditEvent::Exited(id));

        assert_eq!(
            log.messages(),
            vec![
                format!("{} entered", id),
                "Shift change started".to_string(),
                "First guard changed".to_string(),
                "Second guard changed".to_string(),
                "Shift change ended".to_string(),
                format!("{} exited", id),
            ]
        );
    }

    #[test]
    fn test_sequence_numbers_follow_append_order() {
        let mut log = AuditLog::new();
        assert!(log.is_empty());

        log.append(AuditEvent::ShiftChangeStarted);
        log.append(AuditEvent::ShiftChangeRejected);

        let sequences: Vec<u64> = log.entries().iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![0, 1]);
        assert_eq!(log.last().unwrap().event, AuditEvent::ShiftChangeRejected);
    }

    #[test]
    fn test_jsonl_output() {
        let id = IdentityId::new();
        let mut log = AuditLog::new();
        log.append(AuditEvent::Entered(id));
        log.append(AuditEvent::ShiftChangeEnded);

        let jsonl = log.to_jsonl().unwrap();
        let lines: Vec<&str> = jsonl.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "entered");
        assert_eq!(first["identity"], id.to_string());
        assert_eq!(first["sequence"], 0);

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "shift_change_ended");
        assert_eq!(second["message"], "Shift change ended");
    }

    #[test]
    fn test_count_where() {
        let mut log = AuditLog::new();
        log.append(AuditEvent::Entered(IdentityId::new()));
        log.append(AuditEvent::Entered(IdentityId::new()));
        log.append(AuditEvent::Exited(IdentityId::new()));

        assert_eq!(log.count_where(|e| matches!(e, AuditEvent::Entered(_))), 2);
    }
}
