//! Scripted full guard handover
//!
//! Replaces both guards, one seat at a time, using only the public facility
//! operations. Each former guard leaves through the normal dual-approval exit
//! once demoted.

use crate::facility::{AccessError, Facility};
use crate::simulation::error::{SimulationError, SimulationResult, StepContext};
use crate::simulation::statistics::RunStatistics;
use crate::types::{Direction, FacilityConfig, GuardSeat, IdentityId};
use serde::Serialize;
use std::time::Instant;
use tracing::info;

/// Outcome of a scripted handover
#[derive(Debug, Clone, Serialize)]
pub struct HandoverReport {
    /// Guards at the start of the run
    pub former_guards: [IdentityId; 2],
    /// Guards at the end of the run
    pub new_guards: [IdentityId; 2],
    /// Facility state after the run
    pub facility: Facility,
    /// Per-operation counts
    pub statistics: RunStatistics,
}

/// Drives one facility through a complete two-seat handover
#[derive(Debug)]
pub struct HandoverScenario {
    facility: Facility,
    candidates: [IdentityId; 2],
    statistics: RunStatistics,
}

impl HandoverScenario {
    /// Build the scenario from a run configuration with fresh candidates
    pub fn from_config(config: &FacilityConfig) -> SimulationResult<Self> {
        let facility = Facility::from_config(config)?;
        Ok(Self::new(facility, [IdentityId::new(), IdentityId::new()]))
    }

    /// Build the scenario for an existing facility and two candidates
    pub fn new(facility: Facility, candidates: [IdentityId; 2]) -> Self {
        Self { facility, candidates, statistics: RunStatistics::new() }
    }

    /// Run both half-handovers
    pub fn run(mut self) -> SimulationResult<HandoverReport> {
        let _span = crate::run_span!("handover", capacity = self.facility.capacity()).entered();
        let started = Instant::now();
        let former_guards = self.facility.guards();

        for (seat, candidate) in GuardSeat::ALL.into_iter().zip(self.candidates) {
            self.half_handover(seat, candidate)?;
        }

        self.verify()?;
        self.statistics.duration = started.elapsed();

        let new_guards = self.facility.guards();
        info!(former = ?former_guards, new = ?new_guards, "Handover complete");

        Ok(HandoverReport {
            former_guards,
            new_guards,
            facility: self.facility,
            statistics: self.statistics,
        })
    }

    fn half_handover(&mut self, seat: GuardSeat, candidate: IdentityId) -> SimulationResult<()> {
        let outgoing = self.facility.guards()[seat.index()];
        let staying = self.facility.guards()[seat.other().index()];

        let result = self.facility.request_shift_change(candidate);
        self.track("request_shift_change", result, "candidate requests the seat")?;

        let result = self.facility.approve_shift_change(staying);
        self.track("approve_shift_change", result, "staying guard approves")?;

        self.move_through(candidate, Direction::Entry, "candidate enters")?;

        let result = self.facility.complete_shift_change(staying);
        let demoted = self.track("complete_shift_change", result, "staying guard completes")?;
        self.statistics.seats_handed_over += 1;
        if demoted != outgoing {
            return Err(SimulationError::InvariantViolation {
                step: self.statistics.steps,
                violation: format!("Seat {} demoted {} instead of {}", seat, demoted, outgoing),
            });
        }

        self.move_through(demoted, Direction::Exit, "former guard exits")
    }

    /// Request, collect both approvals and pass through the door
    fn move_through(&mut self, who: IdentityId, direction: Direction, step: &str) -> SimulationResult<()> {
        let result = self.facility.make_request(who, direction);
        self.track("make_request", result, step)?;

        for guard in self.facility.guards() {
            let (name, result) = match direction {
                Direction::Entry => ("approve_entry", self.facility.approve_entry(guard, who)),
                Direction::Exit => ("approve_exit", self.facility.approve_exit(guard, who)),
            };
            self.track(name, result, step)?;
        }

        match direction {
            Direction::Entry => {
                let result = self.facility.enter(who);
                self.track("enter", result, step)?;
                self.statistics.entries += 1;
            }
            Direction::Exit => {
                let result = self.facility.exit(who);
                self.track("exit", result, step)?;
                self.statistics.exits += 1;
            }
        }
        Ok(())
    }

    fn track<T>(&mut self, operation: &'static str, result: Result<T, AccessError>, step: &str) -> SimulationResult<T> {
        self.statistics.steps += 1;
        self.statistics.record(operation, &result);
        self.statistics.observe_occupancy(self.facility.occupancy_count());
        let value = result.step(step)?;
        self.verify()?;
        Ok(value)
    }

    fn verify(&mut self) -> SimulationResult<()> {
        self.facility
            .check_invariants()
            .map_err(|violation| SimulationError::InvariantViolation { step: self.statistics.steps, violation })?;
        self.statistics.invariant_checks += 1;
        Ok(())
    }
}

/// Run a full handover for the given configuration
pub fn run_full_handover(config: &FacilityConfig) -> SimulationResult<HandoverReport> {
    HandoverScenario::from_config(config)?.run()
}
