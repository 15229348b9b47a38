pub mod calculations;
pub mod models;
pub mod planner;
pub mod scenario;

#[cfg(test)]
mod test_fixtures;

pub use calculations::*;
pub use models::*;
pub use planner::{
    BudgetAllocation, BudgetOverrides, BudgetPlan, BudgetPlanner, DebtSummary,
    build_paycheck_input,
};
pub use scenario::{MAX_SCENARIOS, SavedScenario, ScenarioBook};
