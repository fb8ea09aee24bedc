//! Deal Projection CLI
//!
//! Projects one or more deals and writes the monthly ledger to CSV

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use deal_projection::assumptions::loader::DEFAULT_ASSUMPTIONS_PATH;
use deal_projection::deal::{advisory_warnings, load_deals};
use deal_projection::projection::StrategyMetrics;
use deal_projection::rehab::{
    load_catalog, load_selections, standard_catalog, total_rehab_cost, QualityTier,
};
use deal_projection::{Assumptions, ScenarioRunner, Strategy, StrategyResult};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TemplateArg {
    BuyHold,
    Brrrr,
    Flip,
}

impl From<TemplateArg> for Strategy {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::BuyHold => Strategy::BuyHold,
            TemplateArg::Brrrr => Strategy::Brrrr,
            TemplateArg::Flip => Strategy::Flip,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum QualityArg {
    A,
    B,
    C,
}

impl From<QualityArg> for QualityTier {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::A => QualityTier::A,
            QualityArg::B => QualityTier::B,
            QualityArg::C => QualityTier::C,
        }
    }
}

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Deal JSON file (one strategy-tagged object or an array)
    deal: Option<PathBuf>,

    /// Start from a strategy template instead of a deal file
    #[arg(short, long, value_enum, conflicts_with = "deal")]
    template: Option<TemplateArg>,

    /// Assumption overrides (`name,value` CSV); data/assumptions.csv is used when present
    #[arg(short, long)]
    assumptions: Option<PathBuf>,

    /// Reset every rate in the deal to the assumption table
    #[arg(long)]
    apply_assumptions: bool,

    /// Rehab catalog CSV; the built-in catalog is used when omitted
    #[arg(long)]
    rehab_catalog: Option<PathBuf>,

    /// Rehab selections CSV; its total replaces the deal's rehab cost
    #[arg(long)]
    rehab_selections: Option<PathBuf>,

    /// Finish quality for rehab pricing
    #[arg(long, value_enum, default_value = "b")]
    quality: QualityArg,

    /// Monthly ledger output
    #[arg(short, long, default_value = "deal_projection_monthly.csv")]
    output: PathBuf,

    /// Write the analysis summary as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Annual rows to print
    #[arg(long, default_value_t = 5)]
    years: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let assumptions = load_assumptions(cli.assumptions.as_deref())?;
    let runner = ScenarioRunner::with_assumptions(assumptions);

    let mut deals = match (&cli.deal, cli.template) {
        (Some(path), _) => load_deals(path)
            .with_context(|| format!("Failed to load deals from {}", path.display()))?,
        (None, Some(template)) => vec![runner.template(template.into())],
        (None, None) => bail!("Provide a deal file or --template"),
    };
    if deals.is_empty() {
        bail!("No deals to project");
    }

    if cli.apply_assumptions {
        for deal in &mut deals {
            runner.assumptions().apply_to(deal);
        }
    }

    if let Some(selections_path) = &cli.rehab_selections {
        let rehab_cost = rehab_budget(&cli, runner.assumptions(), selections_path)?;
        println!("Rehab budget ({}): ${:.2}", QualityTier::from(cli.quality).label(), rehab_cost);
        deals = deals.into_iter().map(|d| d.with_rehab_cost(rehab_cost)).collect();
    }

    let results = runner.run_batch(&deals);

    for (idx, (deal, result)) in deals.iter().zip(&results).enumerate() {
        println!("\nDeal {} ({})", idx + 1, deal.strategy().as_str());
        println!("{}", "=".repeat(40));
        for warning in advisory_warnings(deal) {
            println!("  warning: {}", warning);
        }
        print_metrics(result);
        print_annual(result, cli.years);

        let output = ledger_path(&cli.output, idx, deals.len());
        write_ledger(result, &output)?;
        println!("Monthly ledger written to {}", output.display());
    }

    if let Some(path) = &cli.summary_json {
        let summaries: Vec<_> = results.iter().map(StrategyResult::summary).collect();
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        if summaries.len() == 1 {
            serde_json::to_writer_pretty(file, &summaries[0])?;
        } else {
            serde_json::to_writer_pretty(file, &summaries)?;
        }
        println!("Summary written to {}", path.display());
    }

    Ok(())
}

fn load_assumptions(path: Option<&Path>) -> Result<Assumptions> {
    let default_path = Path::new(DEFAULT_ASSUMPTIONS_PATH);
    let path = match path {
        Some(p) => p,
        None if default_path.exists() => default_path,
        None => return Ok(Assumptions::default()),
    };
    Assumptions::from_csv_path(path)
        .with_context(|| format!("Failed to load assumptions from {}", path.display()))
}

fn rehab_budget(cli: &Cli, assumptions: &Assumptions, selections_path: &Path) -> Result<f64> {
    let catalog = match &cli.rehab_catalog {
        Some(path) => load_catalog(path)
            .with_context(|| format!("Failed to load rehab catalog from {}", path.display()))?,
        None => standard_catalog(),
    };
    let selections = load_selections(selections_path)
        .with_context(|| format!("Failed to load rehab selections from {}", selections_path.display()))?;

    Ok(total_rehab_cost(&catalog, &selections, cli.quality.into(), &assumptions.rehab_tiers))
}

fn print_metrics(result: &StrategyResult) {
    match result.metrics() {
        StrategyMetrics::Rental(m) => {
            println!("  Cash required:       ${:.2}", m.cash_required);
            println!("  Year-one cash flow:  ${:.2}", m.year_one_cash_flow);
            println!("  Cash-on-cash:        {:.2}%", m.cash_on_cash_return * 100.0);
            println!("  DSCR:                {}", format_dscr(m.dscr));
            println!("  Total return:        ${:.2}", m.total_return);
        }
        StrategyMetrics::Brrrr(m) => {
            println!("  Refinance loan:      ${:.2}", m.refi_proceeds);
            println!("  Bridge interest:     ${:.2}", m.bridge_interest);
            println!("  Cash left in deal:   ${:.2}", m.cash_left_in_deal);
            println!("  Cash required:       ${:.2}", m.rental.cash_required);
            println!("  Year-one cash flow:  ${:.2}", m.rental.year_one_cash_flow);
            println!("  Cash-on-cash:        {:.2}%", m.rental.cash_on_cash_return * 100.0);
            println!("  DSCR:                {}", format_dscr(m.rental.dscr));
            println!("  Total return:        ${:.2}", m.rental.total_return);
        }
        StrategyMetrics::Flip(m) => {
            println!("  Hold months:         {}", m.hold_months);
            println!("  Total cash required: ${:.2}", m.total_cash_required);
            println!("  Profit before tax:   ${:.2}", m.profit_before_tax);
            println!("  Profit after tax:    ${:.2}", m.profit_after_tax);
            println!("  ROI:                 {:.2}%", m.roi * 100.0);
        }
    }
}

fn format_dscr(dscr: Option<f64>) -> String {
    dscr.map(|d| format!("{:.2}", d)).unwrap_or_else(|| "n/a".to_string())
}

fn print_annual(result: &StrategyResult, years: usize) {
    let Some(annual) = result.annual() else {
        return;
    };

    println!();
    println!("{:>4} {:>12} {:>12} {:>12} {:>10} {:>10} {:>12}",
        "Year", "Value", "Debt", "Equity", "Rent", "CashFlow", "TotalReturn");
    println!("{}", "-".repeat(80));
    for year in annual.iter().take(years) {
        println!("{:>4} {:>12.0} {:>12.0} {:>12.0} {:>10.0} {:>10.0} {:>12.0}",
            year.year,
            year.value,
            year.debt,
            year.equity,
            year.rent,
            year.cash_flow,
            year.total_return,
        );
    }
}

fn ledger_path(base: &Path, idx: usize, count: usize) -> PathBuf {
    if count == 1 {
        return base.to_path_buf();
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("deal_projection_monthly");
    base.with_file_name(format!("{}_{}.csv", stem, idx + 1))
}

fn write_ledger(result: &StrategyResult, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in result.monthly() {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
