//! Bounded in-memory list of saved what-if scenarios.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{BudgetMode, BudgetRecommendations, PaycheckBreakdown, WizardData};
use crate::planner::BudgetPlan;

/// Saving beyond this many scenarios evicts the oldest.
pub const MAX_SCENARIOS: usize = 5;

/// Snapshot of the wizard and its computed results at save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedScenario {
    pub id: u64,
    pub name: String,
    pub wizard: WizardData,
    pub mode: BudgetMode,
    pub breakdown: PaycheckBreakdown,
    pub recommendations: BudgetRecommendations,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioBook {
    scenarios: VecDeque<SavedScenario>,
    next_id: u64,
}

impl ScenarioBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves a snapshot stamped with the current time and returns its id.
    pub fn save(
        &mut self,
        name: impl Into<String>,
        wizard: &WizardData,
        plan: &BudgetPlan,
    ) -> u64 {
        self.save_at(name, wizard, plan, Utc::now())
    }

    /// Saves a snapshot with an explicit timestamp and returns its id.
    pub fn save_at(
        &mut self,
        name: impl Into<String>,
        wizard: &WizardData,
        plan: &BudgetPlan,
        created_at: DateTime<Utc>,
    ) -> u64 {
        while self.scenarios.len() >= MAX_SCENARIOS {
            let Some(evicted) = self.scenarios.pop_front() else {
                break;
            };
            debug!(id = evicted.id, name = %evicted.name, "evicted oldest scenario");
        }

        let id = self.next_id;
        self.next_id += 1;
        self.scenarios.push_back(SavedScenario {
            id,
            name: name.into(),
            wizard: wizard.clone(),
            mode: plan.mode,
            breakdown: plan.breakdown.clone(),
            recommendations: plan.recommendations.clone(),
            created_at,
        });
        id
    }

    pub fn get(
        &self,
        id: u64,
    ) -> Option<&SavedScenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// Removes a scenario; unknown ids are a no-op.
    pub fn delete(
        &mut self,
        id: u64,
    ) -> Option<SavedScenario> {
        let index = self.scenarios.iter().position(|s| s.id == id)?;
        self.scenarios.remove(index)
    }

    /// Scenarios from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &SavedScenario> {
        self.scenarios.iter()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
