use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use budget_core::{FilingStatus, StateTaxConfig, TaxTables};
use budget_data::{DEFAULT_TAX_YEAR, TaxTableLoader, builtin_tables};
use clap::Parser;

/// Validate a tax tables directory and print what it contains.
///
/// The directory must hold three files:
/// - federal_brackets.csv: tax_year, filing_status, min_income, max_income, rate
/// - state_tax.csv: state_code, kind (none, flat, progressive), min_income, max_income, rate
/// - tax_year.toml: tax_year, [standard_deduction], [fica]
///
/// Without `--dir` the embedded tables are checked instead.
#[derive(Parser, Debug)]
#[command(name = "budget-tables")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory containing the three tax table files
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Embedded tax year to check when no directory is given
    #[arg(short = 'y', long, default_value_t = DEFAULT_TAX_YEAR)]
    tax_year: i32,

    /// Print the brackets of a single state
    #[arg(short, long)]
    state: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let tables = match &args.dir {
        Some(dir) => {
            println!("Loading tax tables from: {}", dir.display());
            TaxTableLoader::load_from_dir(dir)
                .with_context(|| format!("Failed to load tables from: {}", dir.display()))?
        }
        None => {
            println!("Checking embedded tax tables for {}", args.tax_year);
            match builtin_tables(args.tax_year) {
                Some(result) => result.context("Embedded tables are invalid")?,
                None => bail!("No embedded tables for tax year {}", args.tax_year),
            }
        }
    };

    print_summary(&tables);

    if let Some(code) = &args.state {
        let code = code.to_ascii_uppercase();
        match tables.state(&code) {
            Some(config) => print_state(&code, config),
            None => bail!("State {code} is not in the tables"),
        }
    }

    Ok(())
}

fn print_summary(tables: &TaxTables) {
    println!("Tax year {} is valid.", tables.tax_year());
    for status in FilingStatus::all() {
        let schedule = tables.federal(*status);
        println!(
            "  {:<24} standard deduction {:>10}, {} brackets",
            status.label(),
            schedule.standard_deduction,
            schedule.brackets.len()
        );
    }

    let (mut none, mut flat, mut progressive) = (0, 0, 0);
    for code in tables.state_codes() {
        match tables.state(code) {
            Some(StateTaxConfig::None) => none += 1,
            Some(StateTaxConfig::Flat { .. }) => flat += 1,
            Some(StateTaxConfig::Progressive { .. }) => progressive += 1,
            None => {}
        }
    }
    println!(
        "  {} states: {none} without income tax, {flat} flat, {progressive} progressive",
        none + flat + progressive
    );
}

fn print_state(
    code: &str,
    config: &StateTaxConfig,
) {
    match config {
        StateTaxConfig::None => println!("{code}: no state income tax"),
        StateTaxConfig::Flat { rate } => println!("{code}: flat {rate}"),
        StateTaxConfig::Progressive { brackets } => {
            println!("{code}: progressive");
            for bracket in brackets {
                let max = bracket
                    .max
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "and up".to_string());
                println!("  {:>10} - {:<10} {}", bracket.min, max, bracket.rate);
            }
        }
    }
}
