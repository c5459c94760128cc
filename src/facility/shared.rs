//! Shared facility handle
//!
//! Wraps the facility in one mutex so that callers on different threads see
//! the same serial order of operations as a single-threaded authority. Every
//! operation runs to completion under the lock; there is no other
//! synchronization, and at most one shift change can be in flight because the
//! handover record lives behind the same lock.

use crate::facility::controller::Facility;
use crate::facility::error::AccessResult;
use crate::types::{Direction, IdentityId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable, thread-safe handle to one facility
#[derive(Debug, Clone)]
pub struct SharedFacility {
    inner: Arc<Mutex<Facility>>,
}

impl SharedFacility {
    /// Share a facility
    pub fn new(facility: Facility) -> Self {
        Self { inner: Arc::new(Mutex::new(facility)) }
    }

    fn lock(&self) -> MutexGuard<'_, Facility> {
        // Operations never leave partial state behind, so a poisoned lock
        // still guards a consistent facility.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a closure with exclusive access to the facility
    pub fn with<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&mut Facility) -> T,
    {
        let mut guard = self.lock();
        f(&mut guard)
    }

    /// See [`Facility::make_request`]
    pub fn make_request(&self, caller: IdentityId, direction: Direction) -> AccessResult<()> {
        self.with(|f| f.make_request(caller, direction))
    }

    /// See [`Facility::approve_entry`]
    pub fn approve_entry(&self, caller: IdentityId, requester: IdentityId) -> AccessResult<()> {
        self.with(|f| f.approve_entry(caller, requester))
    }

    /// See [`Facility::approve_exit`]
    pub fn approve_exit(&self, caller: IdentityId, requester: IdentityId) -> AccessResult<()> {
        self.with(|f| f.approve_exit(caller, requester))
    }

    /// See [`Facility::enter`]
    pub fn enter(&self, caller: IdentityId) -> AccessResult<()> {
        self.with(|f| f.enter(caller))
    }

    /// See [`Facility::exit`]
    pub fn exit(&self, caller: IdentityId) -> AccessResult<()> {
        self.with(|f| f.exit(caller))
    }

    /// See [`Facility::request_shift_change`]
    pub fn request_shift_change(&self, caller: IdentityId) -> AccessResult<()> {
        self.with(|f| f.request_shift_change(caller))
    }

    /// See [`Facility::approve_shift_change`]
    pub fn approve_shift_change(&self, caller: IdentityId) -> AccessResult<()> {
        self.with(|f| f.approve_shift_change(caller))
    }

    /// See [`Facility::complete_shift_change`]
    pub fn complete_shift_change(&self, caller: IdentityId) -> AccessResult<IdentityId> {
        self.with(|f| f.complete_shift_change(caller))
    }

    /// See [`Facility::reject_shift_change`]
    pub fn reject_shift_change(&self, caller: IdentityId) -> AccessResult<()> {
        self.with(|f| f.reject_shift_change(caller))
    }

    /// See [`Facility::get_log`]
    pub fn get_log(&self) -> Vec<String> {
        self.with(|f| f.get_log())
    }

    /// Copy of the current facility state
    pub fn snapshot(&self) -> Facility {
        self.with(|f| f.clone())
    }
}
