//! Glue between parsed command-line input and the planning engine.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use budget_core::{
    BudgetMode, BudgetOverrides, BudgetPlan, BudgetPlanner, ScenarioBook, TaxTables, WizardData,
};
use budget_data::{DEFAULT_TAX_YEAR, TaxTableLoader, builtin_tables};
use tracing::{debug, info};

use crate::{csv_loader, wizard_file};

/// Wizard answers ready for planning, with the file's budget choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub wizard: WizardData,
    pub mode: Option<BudgetMode>,
    pub overrides: BudgetOverrides,
}

/// Loads tax tables from `dir`, or the embedded tables when `None`.
pub fn load_tables(dir: Option<&Path>) -> Result<TaxTables> {
    match dir {
        Some(dir) => {
            let tables = TaxTableLoader::load_from_dir(dir)
                .with_context(|| format!("failed to load tax tables from {}", dir.display()))?;
            info!(dir = %dir.display(), tax_year = tables.tax_year(), "loaded tax tables");
            Ok(tables)
        }
        None => builtin_tables(DEFAULT_TAX_YEAR)
            .ok_or_else(|| anyhow!("no embedded tax tables for {DEFAULT_TAX_YEAR}"))?
            .context("embedded tax tables are invalid"),
    }
}

/// Reads the wizard file, swapping in the debts CSV when one is given.
pub fn load_request(
    wizard_path: &Path,
    debts_path: Option<&Path>,
) -> Result<PlanRequest> {
    let (mut wizard, budget) = wizard_file::load_from_file(wizard_path)
        .with_context(|| format!("failed to load wizard file {}", wizard_path.display()))?;

    if let Some(path) = debts_path {
        wizard.debts = csv_loader::load_from_file(path)
            .with_context(|| format!("failed to load debts from {}", path.display()))?;
        wizard_file::validate(&wizard).context("debts CSV failed validation")?;
    }

    Ok(PlanRequest {
        wizard,
        mode: budget.mode,
        overrides: budget.overrides(),
    })
}

/// Flag values win over values from the wizard file.
pub fn merge_overrides(
    file: BudgetOverrides,
    flags: BudgetOverrides,
) -> BudgetOverrides {
    BudgetOverrides {
        rent: flags.rent.or(file.rent),
        groceries: flags.groceries.or(file.groceries),
        lifestyle: flags.lifestyle.or(file.lifestyle),
        utilities: flags.utilities.or(file.utilities),
    }
}

pub fn run_plan(
    tables: &TaxTables,
    wizard: &WizardData,
    mode: BudgetMode,
    overrides: &BudgetOverrides,
) -> Result<BudgetPlan> {
    wizard_file::validate_overrides(overrides).context("invalid budget override")?;
    let plan = BudgetPlanner::new(tables).plan(wizard, mode, overrides);
    debug!(
        mode = mode.as_str(),
        net_monthly = %plan.breakdown.net_monthly,
        "plan ready"
    );
    Ok(plan)
}

/// Plans every budget mode and keeps each result as a saved scenario.
pub fn compare_modes(
    tables: &TaxTables,
    wizard: &WizardData,
    overrides: &BudgetOverrides,
) -> Result<ScenarioBook> {
    let mut book = ScenarioBook::new();
    for mode in BudgetMode::all() {
        let plan = run_plan(tables, wizard, *mode, overrides)?;
        book.save(mode.as_str(), wizard, &plan);
    }
    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn embedded_tables_load_without_directory() {
        let tables = load_tables(None).expect("embedded tables");

        assert_eq!(tables.tax_year(), DEFAULT_TAX_YEAR);
    }

    #[test]
    fn missing_table_directory_is_reported() {
        let err = load_tables(Some(Path::new("no/such/tables"))).unwrap_err();

        assert!(err.to_string().contains("no/such/tables"), "got: {err}");
    }

    #[test]
    fn flags_take_precedence_over_file_overrides() {
        let file = BudgetOverrides {
            rent: Some(dec!(1200)),
            groceries: Some(dec!(450)),
            ..Default::default()
        };
        let flags = BudgetOverrides {
            rent: Some(dec!(1500)),
            utilities: Some(dec!(180)),
            ..Default::default()
        };

        let merged = merge_overrides(file, flags);

        assert_eq!(
            merged,
            BudgetOverrides {
                rent: Some(dec!(1500)),
                groceries: Some(dec!(450)),
                lifestyle: None,
                utilities: Some(dec!(180)),
            }
        );
    }

    #[test]
    fn negative_override_fails_the_plan() {
        let tables = load_tables(None).expect("embedded tables");
        let overrides = BudgetOverrides {
            rent: Some(dec!(-1)),
            ..Default::default()
        };

        let err = run_plan(&tables, &WizardData::demo(), BudgetMode::Balanced, &overrides)
            .unwrap_err();

        assert!(format!("{err:#}").contains("budget.rent"), "got: {err:#}");
    }

    #[test]
    fn compare_saves_one_scenario_per_mode() {
        let tables = load_tables(None).expect("embedded tables");

        let book = compare_modes(&tables, &WizardData::demo(), &BudgetOverrides::default())
            .expect("compare");

        let modes: Vec<BudgetMode> = book.iter().map(|s| s.mode).collect();
        assert_eq!(modes, BudgetMode::all().to_vec());
        let names: Vec<&str> = book.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["conservative", "balanced", "lifestyle"]);
        // Net pay does not depend on the budget mode.
        assert!(
            book.iter()
                .all(|s| s.breakdown.net_monthly == dec!(4745.64))
        );
    }
}
