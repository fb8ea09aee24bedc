//! Sweep a deal across a grid of annual interest rates
//!
//! Outputs one CSV row per rate with the deal's headline metrics

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use deal_projection::deal::load_deals;
use deal_projection::projection::{RentalMetrics, StrategyMetrics};
use deal_projection::ScenarioRunner;
use serde::Serialize;

#[derive(Parser)]
#[command(version, about = "Project a deal across a range of interest rates")]
struct Cli {
    /// Deal JSON file; the first deal is swept
    deal: PathBuf,

    /// Lowest annual rate
    #[arg(long, default_value_t = 0.04)]
    from: f64,

    /// Highest annual rate (inclusive)
    #[arg(long, default_value_t = 0.10)]
    to: f64,

    /// Rate increment
    #[arg(long, default_value_t = 0.0025)]
    step: f64,

    #[arg(short, long, default_value = "rate_sweep_output.csv")]
    output: PathBuf,
}

/// One output line; columns that do not apply to the strategy stay empty
#[derive(Debug, Serialize)]
struct SweepRow {
    interest_rate_annual: f64,
    cash_required: f64,
    year_one_cash_flow: Option<f64>,
    cash_on_cash_return: Option<f64>,
    dscr: Option<f64>,
    total_return: Option<f64>,
    profit_before_tax: Option<f64>,
    roi: Option<f64>,
}

impl SweepRow {
    fn new(rate: f64, metrics: StrategyMetrics) -> Self {
        match metrics {
            StrategyMetrics::Rental(m) => Self::rental(rate, &m),
            StrategyMetrics::Brrrr(m) => Self::rental(rate, &m.rental),
            StrategyMetrics::Flip(m) => Self {
                interest_rate_annual: rate,
                cash_required: m.total_cash_required,
                year_one_cash_flow: None,
                cash_on_cash_return: None,
                dscr: None,
                total_return: None,
                profit_before_tax: Some(m.profit_before_tax),
                roi: Some(m.roi),
            },
        }
    }

    fn rental(rate: f64, m: &RentalMetrics) -> Self {
        Self {
            interest_rate_annual: rate,
            cash_required: m.cash_required,
            year_one_cash_flow: Some(m.year_one_cash_flow),
            cash_on_cash_return: Some(m.cash_on_cash_return),
            dscr: m.dscr,
            total_return: Some(m.total_return),
            profit_before_tax: None,
            roi: None,
        }
    }
}

fn rate_grid(from: f64, to: f64, step: f64) -> Vec<f64> {
    let count = ((to - from) / step + 1e-9).floor() as usize + 1;
    (0..count).map(|i| from + step * i as f64).collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.step.is_nan() || cli.step <= 0.0 || cli.to < cli.from {
        bail!("Rate range must be increasing with a positive step");
    }

    let start = Instant::now();
    let deals = load_deals(&cli.deal)
        .with_context(|| format!("Failed to load deals from {}", cli.deal.display()))?;
    let Some(deal) = deals.first() else {
        bail!("No deals in {}", cli.deal.display());
    };

    let rates = rate_grid(cli.from, cli.to, cli.step);
    println!("Sweeping {} deal across {} rates...", deal.strategy().as_str(), rates.len());

    let runner = ScenarioRunner::new();
    let sweep = runner.rate_sensitivity(deal, &rates);

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;
    for point in sweep {
        writer.serialize(SweepRow::new(point.interest_rate_annual, point.result.metrics()))?;
    }
    writer.flush()?;

    println!("Output written to {}", cli.output.display());
    println!("Total time: {:?}", start.elapsed());
    Ok(())
}
