use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use budget_cli::{
    app, csv_loader, logging,
    report::{ComparisonReport, PaycheckReport, PlanReport, ScheduleReport, to_json},
    utils::{format_money, parse_decimal},
    wizard_file,
};
use budget_core::{
    BudgetMode, BudgetOverrides, PAYOFF_MONTHS_CAP, PayoffStrategy, PaycheckCalculator,
    WizardData, build_paycheck_input, max_car_price_from_payment, monthly_payment_from_price,
    payoff_schedule, simulate_payoff,
};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Paycheck and budget planner.
///
/// Turns salary, location, benefits and debts into net pay, a monthly budget
/// and a debt payoff plan.
#[derive(Debug, Parser)]
#[command(name = "budget-cli", version, about)]
struct Cli {
    /// Log filter, e.g. `debug` or `info,budget_core=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Hide log output on the console.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a monthly budget from a wizard file.
    Plan(PlanArgs),

    /// Plan the built-in demo profile.
    Demo {
        #[arg(long, value_parser = parse_mode)]
        mode: Option<BudgetMode>,

        #[arg(long)]
        json: bool,
    },

    /// Show one paycheck from gross to net.
    Paycheck {
        #[arg(short, long)]
        wizard: PathBuf,

        #[command(flatten)]
        tables: TablesArg,

        #[arg(long)]
        json: bool,
    },

    /// Plan every budget mode and compare them side by side.
    Compare {
        #[command(flatten)]
        input: WizardArgs,

        #[arg(long)]
        json: bool,
    },

    /// Car affordability helpers.
    Car {
        #[command(subcommand)]
        command: CarCommand,
    },

    /// Months to pay off one balance at a fixed monthly payment.
    Payoff {
        #[arg(long, value_parser = parse_decimal)]
        balance: Decimal,

        /// Annual percentage rate, e.g. 24.99
        #[arg(long, value_parser = parse_decimal)]
        apr: Decimal,

        #[arg(long, value_parser = parse_decimal)]
        payment: Decimal,
    },

    /// Order debts from a CSV file and estimate each payoff.
    Schedule {
        #[arg(short, long)]
        debts: PathBuf,

        #[arg(long, value_parser = parse_strategy, default_value = "avalanche")]
        strategy: PayoffStrategy,

        /// Extra monthly payment put toward the first debt in order.
        #[arg(long, value_parser = parse_decimal, default_value = "0")]
        extra: Decimal,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
enum CarCommand {
    /// Most expensive car a monthly payment can buy.
    Price {
        #[arg(long, value_parser = parse_decimal)]
        payment: Decimal,

        #[arg(long, value_parser = parse_decimal)]
        apr: Decimal,

        /// Loan term in months.
        #[arg(long)]
        term: u32,

        #[arg(long, value_parser = parse_decimal, default_value = "0")]
        down: Decimal,
    },

    /// Monthly payment for a loan amount.
    Payment {
        #[arg(long, value_parser = parse_decimal)]
        principal: Decimal,

        #[arg(long, value_parser = parse_decimal)]
        apr: Decimal,

        /// Loan term in months.
        #[arg(long)]
        term: u32,
    },
}

#[derive(Debug, Args)]
struct TablesArg {
    /// Directory with federal_brackets.csv, state_tax.csv and tax_year.toml.
    /// Defaults to the embedded tables.
    #[arg(long = "tables")]
    dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct WizardArgs {
    /// Wizard answers as TOML.
    #[arg(short, long)]
    wizard: PathBuf,

    /// Debts CSV (id,type,balance,apr,minimum_payment); replaces debts in the
    /// wizard file.
    #[arg(short, long)]
    debts: Option<PathBuf>,

    #[command(flatten)]
    tables: TablesArg,
}

#[derive(Debug, Args)]
struct PlanArgs {
    #[command(flatten)]
    input: WizardArgs,

    /// conservative, balanced or lifestyle. Defaults to the wizard file's
    /// choice, then balanced.
    #[arg(long, value_parser = parse_mode)]
    mode: Option<BudgetMode>,

    #[arg(long, value_parser = parse_decimal)]
    rent: Option<Decimal>,

    #[arg(long, value_parser = parse_decimal)]
    groceries: Option<Decimal>,

    #[arg(long, value_parser = parse_decimal)]
    lifestyle: Option<Decimal>,

    #[arg(long, value_parser = parse_decimal)]
    utilities: Option<Decimal>,

    #[arg(long)]
    json: bool,
}

impl PlanArgs {
    fn overrides(&self) -> BudgetOverrides {
        BudgetOverrides {
            rent: self.rent,
            groceries: self.groceries,
            lifestyle: self.lifestyle,
            utilities: self.utilities,
        }
    }
}

fn parse_mode(s: &str) -> Result<BudgetMode, String> {
    BudgetMode::parse(&s.trim().to_ascii_lowercase())
        .ok_or_else(|| format!("unknown budget mode '{s}' (conservative, balanced, lifestyle)"))
}

fn parse_strategy(s: &str) -> Result<PayoffStrategy, String> {
    PayoffStrategy::parse(&s.trim().to_ascii_lowercase())
        .ok_or_else(|| format!("unknown payoff strategy '{s}' (avalanche, snowball)"))
}

// ─── commands ────────────────────────────────────────────────────────────────

fn run_plan(args: &PlanArgs) -> Result<()> {
    let tables = app::load_tables(args.input.tables.dir.as_deref())?;
    let request = app::load_request(&args.input.wizard, args.input.debts.as_deref())?;
    let mode = args.mode.or(request.mode).unwrap_or_default();
    let overrides = app::merge_overrides(request.overrides, args.overrides());

    let plan = app::run_plan(&tables, &request.wizard, mode, &overrides)?;
    if args.json {
        println!("{}", to_json(&plan)?);
    } else {
        print!("{}", PlanReport(&plan));
    }
    Ok(())
}

fn run_demo(
    mode: Option<BudgetMode>,
    json: bool,
) -> Result<()> {
    let tables = app::load_tables(None)?;
    let wizard = WizardData::demo();
    let plan = app::run_plan(
        &tables,
        &wizard,
        mode.unwrap_or_default(),
        &BudgetOverrides::default(),
    )?;
    if json {
        println!("{}", to_json(&plan)?);
    } else {
        print!("{}", PlanReport(&plan));
    }
    Ok(())
}

fn run_paycheck(
    wizard_path: &Path,
    tables_dir: Option<&Path>,
    json: bool,
) -> Result<()> {
    let tables = app::load_tables(tables_dir)?;
    let request = app::load_request(wizard_path, None)?;
    let input = build_paycheck_input(&request.wizard);
    let breakdown = PaycheckCalculator::new(&tables).compute(&input);

    if json {
        println!("{}", to_json(&breakdown)?);
    } else {
        print!(
            "{}",
            PaycheckReport {
                breakdown: &breakdown,
                pay_frequency: input.pay_frequency,
            }
        );
    }
    Ok(())
}

fn run_compare(
    input: &WizardArgs,
    json: bool,
) -> Result<()> {
    let tables = app::load_tables(input.tables.dir.as_deref())?;
    let request = app::load_request(&input.wizard, input.debts.as_deref())?;
    let book = app::compare_modes(&tables, &request.wizard, &request.overrides)?;

    if json {
        let scenarios: Vec<_> = book.iter().collect();
        println!("{}", to_json(&scenarios)?);
    } else {
        print!("{}", ComparisonReport(&book));
    }
    Ok(())
}

fn run_car(command: &CarCommand) -> Result<()> {
    match *command {
        CarCommand::Price {
            payment,
            apr,
            term,
            down,
        } => {
            wizard_file::validate_loan(apr, &[("payment", payment), ("down", down)])?;
            let price = max_car_price_from_payment(payment, apr, term, down);
            println!("Maximum car price: {}", format_money(price));
        }
        CarCommand::Payment {
            principal,
            apr,
            term,
        } => {
            wizard_file::validate_loan(apr, &[("principal", principal)])?;
            let payment = monthly_payment_from_price(principal, apr, term);
            println!("Monthly payment: {}", format_money(payment));
        }
    }
    Ok(())
}

fn run_payoff(
    balance: Decimal,
    apr: Decimal,
    payment: Decimal,
) -> Result<()> {
    wizard_file::validate_loan(apr, &[("balance", balance), ("payment", payment)])?;
    let (months, paid_off) = simulate_payoff(balance, apr, payment);
    if paid_off {
        println!("Paid off in {months} months at {}/mo", format_money(payment));
    } else {
        println!(
            "Not paid off within {PAYOFF_MONTHS_CAP} months at {}/mo",
            format_money(payment)
        );
    }
    Ok(())
}

fn run_schedule(
    debts_path: &Path,
    strategy: PayoffStrategy,
    extra: Decimal,
    json: bool,
) -> Result<()> {
    let debts = csv_loader::load_from_file(debts_path)
        .with_context(|| format!("failed to load debts from {}", debts_path.display()))?;
    wizard_file::validate_debts(&debts)?;
    wizard_file::validate_extra_payment(extra)?;

    let schedule = payoff_schedule(&debts, strategy, extra);
    if json {
        println!("{}", to_json(&schedule)?);
    } else {
        print!(
            "{}",
            ScheduleReport {
                strategy,
                schedule: &schedule,
            }
        );
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref())?;
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }
    if cli.quiet {
        logging::set_console_enabled(false)?;
    }
    debug!(command = ?cli.command, "starting");

    match &cli.command {
        Command::Plan(args) => run_plan(args)?,
        Command::Demo { mode, json } => run_demo(*mode, *json)?,
        Command::Paycheck {
            wizard,
            tables,
            json,
        } => run_paycheck(wizard, tables.dir.as_deref(), *json)?,
        Command::Compare { input, json } => run_compare(input, *json)?,
        Command::Car { command } => run_car(command)?,
        Command::Payoff {
            balance,
            apr,
            payment,
        } => run_payoff(*balance, *apr, *payment)?,
        Command::Schedule {
            debts,
            strategy,
            extra,
            json,
        } => run_schedule(debts, *strategy, *extra, *json)?,
    }

    Ok(())
}
