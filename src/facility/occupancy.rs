//! Occupancy tracking
//!
//! The set of identities currently inside, bounded by a capacity fixed at
//! construction.

use crate::facility::error::{AccessError, AccessResult};
use crate::types::IdentityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identities inside the facility
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupancyTracker {
    /// Maximum number of occupants
    capacity: usize,
    /// Current occupants
    inside: BTreeSet<IdentityId>,
}

impl OccupancyTracker {
    /// Create an empty tracker
    pub fn new(capacity: usize) -> Self {
        Self { capacity, inside: BTreeSet::new() }
    }

    /// Check if an identity is inside
    pub fn contains(&self, id: IdentityId) -> bool {
        self.inside.contains(&id)
    }

    /// Number of occupants
    pub fn count(&self) -> usize {
        self.inside.len()
    }

    /// Maximum number of occupants
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether no one else fits
    pub fn is_full(&self) -> bool {
        self.count() >= self.capacity
    }

    /// Admit an identity
    pub fn add(&mut self, id: IdentityId) -> AccessResult<()> {
        if self.contains(id) {
            return Err(AccessError::AlreadyInside(id));
        }
        if self.is_full() {
            return Err(AccessError::CapacityExceeded { capacity: self.capacity });
        }

        self.inside.insert(id);
        Ok(())
    }

    /// Release an identity
    pub fn remove(&mut self, id: IdentityId) -> AccessResult<()> {
        if !self.inside.remove(&id) {
            return Err(AccessError::NotPresent(id));
        }
        Ok(())
    }

    /// Iterate over occupants in identity order
    pub fn iter(&self) -> impl Iterator<Item = IdentityId> + '_ {
        self.inside.iter().copied()
    }
}
