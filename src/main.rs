//! Mineral Eval CLI
//!
//! Evaluates a mineral/royalty deal from a JSON file and prints its returns,
//! or sweeps gas prices across the same deal.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use mineral_eval::deal::{load_deal_config, load_type_curve};
use mineral_eval::{evaluate_deal, DealInputs, EvaluationSummary, Ledger, Scenario, ScenarioRunner, TypeCurveLibrary};

/// Royalty basis for net royalty acres
const BASE_ROYALTY: f64 = 0.125;

#[derive(Parser)]
#[command(name = "mineral-eval", version, about = "Mineral and royalty interest deal evaluation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate one deal and print its summary
    Evaluate {
        /// Deal definition (JSON)
        #[arg(long)]
        deal: PathBuf,

        /// Monthly type curve (CSV: Month,Gas[,Oil]) for profiles without one
        #[arg(long)]
        type_curve: Option<PathBuf>,

        /// Write the full monthly ledger to this CSV path
        #[arg(long)]
        ledger: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Evaluate the deal at several flat gas prices
    Sweep {
        /// Deal definition (JSON)
        #[arg(long)]
        deal: PathBuf,

        /// Monthly type curve (CSV: Month,Gas[,Oil]) for profiles without one
        #[arg(long)]
        type_curve: Option<PathBuf>,

        /// Comma-separated gas prices, $/Mcf
        #[arg(long, value_delimiter = ',', required = true)]
        gas_prices: Vec<f64>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Evaluate { deal, type_curve, ledger, json } => {
            run_evaluate(&deal, type_curve.as_deref(), ledger.as_deref(), json)
        }
        Command::Sweep { deal, type_curve, gas_prices, json } => {
            run_sweep(&deal, type_curve.as_deref(), &gas_prices, json)
        }
    }
}

/// Read, attach the optional type curve, and validate
fn load_inputs(deal_path: &Path, type_curve_path: Option<&Path>) -> Result<DealInputs> {
    let mut config = load_deal_config(deal_path)
        .with_context(|| format!("reading deal {}", deal_path.display()))?;

    if let Some(path) = type_curve_path {
        let curve = load_type_curve(path)
            .with_context(|| format!("reading type curve {}", path.display()))?;
        let curve_id = config.type_curve_id.clone().unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "type_curve".to_string())
        });

        let mut library = TypeCurveLibrary::new();
        library.insert(curve_id.clone(), curve);
        config.type_curve_id = Some(curve_id);
        config.attach_type_curve(&library)?;
    }

    DealInputs::new(config).with_context(|| format!("invalid deal {}", deal_path.display()))
}

fn run_evaluate(deal_path: &Path, type_curve: Option<&Path>, ledger_path: Option<&Path>, json: bool) -> Result<()> {
    let deal = load_inputs(deal_path, type_curve)?;
    let evaluation = evaluate_deal(&deal);

    if let Some(path) = ledger_path {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        evaluation
            .ledger
            .write_csv(BufWriter::new(file))
            .with_context(|| format!("writing ledger to {}", path.display()))?;
        log::info!("Ledger written to {}", path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&evaluation.summary)?);
        return Ok(());
    }

    println!("Deal: {}", display_name(&deal));
    println!("======================\n");
    println!("  Tracts: {}", deal.tracts().len());
    let nra: f64 = deal.tracts().iter().map(|t| t.net_royalty_acres(BASE_ROYALTY)).sum();
    println!("  Net royalty acres (1/8 basis): {:.4}", nra);
    println!("  NRI: {:.6}%", deal.total_nri() * 100.0);
    println!("  Acquisition: ${:.2}", deal.config().acquisition.cost);
    println!("  First sales: month {} ({})", deal.first_sales_month(), deal.date_for_month(deal.first_sales_month()));
    println!();

    print_ledger_head(&evaluation.ledger, deal.first_sales_month(), 12);
    print_summary(&evaluation.summary);

    if let Some(path) = ledger_path {
        println!("\nFull ledger written to: {}", path.display());
    }
    Ok(())
}

fn run_sweep(deal_path: &Path, type_curve: Option<&Path>, gas_prices: &[f64], json: bool) -> Result<()> {
    let deal = load_inputs(deal_path, type_curve)?;
    let name = display_name(&deal).to_string();
    let runner = ScenarioRunner::new(deal);
    let results = runner.run_scenarios(&Scenario::gas_price_sweep(gas_prices))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!("Gas price sweep: {}", name);
    println!("{:>12} {:>10} {:>8} {:>14} {:>8}", "Scenario", "IRR", "MoM", "NPV10", "Payback");
    println!("{}", "-".repeat(56));
    for result in &results {
        let s = &result.summary;
        println!(
            "{:>12} {:>10} {:>8} {:>14} {:>8}",
            result.label,
            fmt_pct(s.irr),
            fmt_multiple(s.mom),
            s.npv_at(0.10).map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string()),
            s.payback_month.map(|m| m.to_string()).unwrap_or_else(|| "never".to_string()),
        );
    }
    Ok(())
}

fn print_ledger_head(ledger: &Ledger, first_month: u32, count: usize) {
    println!("Ledger from first sales ({} months shown):", count);
    println!(
        "{:>5} {:>10} {:>5} {:>12} {:>12} {:>12} {:>10} {:>12} {:>14}",
        "Month", "Date", "Ramp", "GrossGas", "GrossOil", "Revenue", "Taxes", "NetCF", "Cumulative"
    );
    println!("{}", "-".repeat(100));

    for row in ledger.iter().skip(first_month as usize).take(count) {
        println!(
            "{:>5} {:>10} {:>5.2} {:>12.2} {:>12.2} {:>12.2} {:>10.2} {:>12.2} {:>14.2}",
            row.month,
            row.date,
            row.ramp_fraction,
            row.gross_gas,
            row.gross_oil,
            row.gross_revenue,
            row.total_taxes(),
            row.net_cash_flow,
            row.cumulative_net_cash_flow,
        );
    }
}

fn print_summary(summary: &EvaluationSummary) {
    println!("\nSummary:");
    println!("  Months: {}", summary.months);
    println!("  IRR (nominal): {}", fmt_pct(summary.irr));
    println!("  IRR (effective): {}", fmt_pct(summary.irr_effective));
    println!("  MoM: {}", fmt_multiple(summary.mom));
    match summary.payback_month {
        Some(m) => println!("  Payback: month {}", m),
        None => println!("  Payback: never"),
    }
    println!("  Gross Revenue: ${:.2}", summary.total_gross_revenue);
    println!("  Taxes: ${:.2}", summary.total_taxes);
    println!("  Net Revenue: ${:.2}", summary.total_net_revenue);
    println!("  Investment: ${:.2}", summary.total_investment);
    println!("  Profit: ${:.2}", summary.total_profit);

    println!("\nNPV by discount rate:");
    for point in &summary.npv {
        println!("  {:>6.1}%: ${:>14.2}", point.rate * 100.0, point.npv);
    }
}

fn display_name(deal: &DealInputs) -> &str {
    if deal.name().is_empty() {
        "(unnamed)"
    } else {
        deal.name()
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}%", v * 100.0)).unwrap_or_else(|| "n/a".to_string())
}

fn fmt_multiple(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}x")).unwrap_or_else(|| "n/a".to_string())
}
