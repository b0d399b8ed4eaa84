//! Headless QA harness for the MiniCup core crate.
mod scenarios;

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;

use scenarios::{ScenarioReport, run_distribution, run_economy, run_rally};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scenario {
    /// Reward economy across simulated days
    Economy,
    /// Empirical shot-outcome distributions
    Distribution,
    /// Session billing and recording audit
    Rally,
    /// Run every scenario
    All,
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Economy => "economy",
            Self::Distribution => "distribution",
            Self::Rally => "rally",
            Self::All => "all",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Parser)]
#[command(name = "minicup-tester", version)]
#[command(about = "Headless QA for the MiniCup penalty-kick core")]
struct Args {
    /// Scenario to run
    #[arg(long, value_enum, default_value_t = Scenario::All)]
    scenario: Scenario,

    /// Seed for deterministic RNG streams
    #[arg(long, default_value_t = 4242)]
    seed: u64,

    /// Simulated days for the economy scenario
    #[arg(long, default_value_t = 7)]
    days: u32,

    /// Kicks sampled by the distribution scenario
    #[arg(long, default_value_t = 20_000)]
    sample_size: u32,
}

fn print_report(report: &ScenarioReport) {
    let header = if report.passed() {
        format!("PASS {}", report.name).green().bold()
    } else {
        format!("FAIL {}", report.name).red().bold()
    };
    println!("{header}");
    for check in &report.checks {
        let mark = if check.passed {
            "ok".green()
        } else {
            "failed".red()
        };
        println!("  [{mark}] {} - {}", check.label, check.detail);
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let reports: Vec<ScenarioReport> = match args.scenario {
        Scenario::Economy => vec![run_economy(args.days)],
        Scenario::Distribution => vec![run_distribution(args.seed, args.sample_size)],
        Scenario::Rally => vec![run_rally(args.seed)],
        Scenario::All => vec![
            run_economy(args.days),
            run_distribution(args.seed, args.sample_size),
            run_rally(args.seed),
        ],
    };

    for report in &reports {
        print_report(report);
    }

    let failed: Vec<&str> = reports
        .iter()
        .filter(|r| !r.passed())
        .map(|r| r.name)
        .collect();
    if !failed.is_empty() {
        bail!("scenarios failed: {}", failed.join(", "));
    }
    println!("{}", "all scenarios passed".green());
    Ok(())
}
