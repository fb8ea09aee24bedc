//! Ordered phases of a deal's life
//!
//! A timeline is a list of contiguous spans. Walking it yields one step per
//! month carrying both the global projection month and the month's position
//! inside its own phase, so phase-local schedules (a refinance loan starting
//! at period 1) and global schedules (rent escalation) are never confused.

use super::cashflows::Phase;

/// A contiguous run of months in one phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSpan {
    pub phase: Phase,
    /// Global month the span starts at (1-indexed)
    pub first_month: u32,
    pub months: u32,
}

impl PhaseSpan {
    pub fn last_month(&self) -> u32 {
        self.first_month + self.months - 1
    }

    pub fn contains(&self, month: u32) -> bool {
        self.months > 0 && month >= self.first_month && month <= self.last_month()
    }
}

/// One month of a timeline walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub phase: Phase,
    /// Projection month (1-indexed)
    pub global_month: u32,
    /// Month within the phase (1-indexed)
    pub local_month: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    spans: Vec<PhaseSpan>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a phase lasting `months`; zero-length phases are dropped
    pub fn then(mut self, phase: Phase, months: u32) -> Self {
        if months > 0 {
            let first_month = self.total_months() + 1;
            self.spans.push(PhaseSpan { phase, first_month, months });
        }
        self
    }

    pub fn spans(&self) -> &[PhaseSpan] {
        &self.spans
    }

    pub fn total_months(&self) -> u32 {
        self.spans.iter().map(|s| s.months).sum()
    }

    pub fn phase_at(&self, month: u32) -> Option<Phase> {
        self.spans.iter().find(|s| s.contains(month)).map(|s| s.phase)
    }

    pub fn steps(&self) -> impl Iterator<Item = Step> + '_ {
        self.spans.iter().flat_map(|span| {
            (1..=span.months).map(move |local_month| Step {
                phase: span.phase,
                global_month: span.first_month + local_month - 1,
                local_month,
            })
        })
    }
}
