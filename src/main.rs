use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use staffing_recon::sync::{self, Reconciliation};
use staffing_recon::{ReconConfig, ReconError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ReconError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Report(args) => execute_report(args),
        Command::Compare(args) => execute_compare(args),
    }
}

fn execute_report(args: ReportArgs) -> Result<()> {
    let config = args.inputs.resolve_config()?;
    let outcome = sync::reconcile_files(
        &args.inputs.customer,
        &args.inputs.database,
        &args.output,
        &config,
    )?;
    print_outcome(&outcome);
    Ok(())
}

fn execute_compare(args: InputArgs) -> Result<()> {
    let config = args.resolve_config()?;
    let outcome = sync::compare_files(&args.customer, &args.database, &config)?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &Reconciliation) {
    print!("{}", outcome.summary_text);
    println!();
    println!(
        "Итого часов: заказчик={}, база={}",
        outcome.customer_total(),
        outcome.database_total()
    );
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ReconError::MissingInput(path.to_path_buf()))
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Reconcile store working hours between a customer sheet and a database export."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare both files and write the Excel discrepancy report.
    Report(ReportArgs),
    /// Compare both files and print the textual summary only.
    Compare(InputArgs),
}

#[derive(clap::Args)]
struct InputArgs {
    /// Customer workbook (stores × days matrix or row-wise).
    #[arg(long)]
    customer: PathBuf,

    /// Database export workbook.
    #[arg(long)]
    database: PathBuf,

    /// Optional JSON file overriding reconciliation settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Home city dropped in front of another city name.
    #[arg(long)]
    home_city: Option<String>,

    /// Year used for `D.M` day headers.
    #[arg(long)]
    year: Option<i32>,

    /// Hour delta from which a mismatch is critical, e.g. `1,00`.
    #[arg(long)]
    threshold: Option<String>,
}

#[derive(clap::Args)]
struct ReportArgs {
    #[command(flatten)]
    inputs: InputArgs,

    /// Output path of the `.xlsx` report.
    #[arg(long)]
    output: PathBuf,
}

impl InputArgs {
    fn resolve_config(&self) -> Result<ReconConfig> {
        ensure_exists(&self.customer)?;
        ensure_exists(&self.database)?;

        let mut config = match &self.config {
            Some(path) => {
                ensure_exists(path)?;
                ReconConfig::load(path)?
            }
            None => ReconConfig::default(),
        };
        if let Some(city) = &self.home_city {
            config = config.with_home_city(city);
        }
        if let Some(year) = self.year {
            config = config.with_year(year);
        }
        if let Some(threshold) = &self.threshold {
            config = config.with_threshold_str(threshold).ok_or_else(|| {
                ReconError::InvalidConfig(format!("invalid threshold '{threshold}'"))
            })?;
        }
        Ok(config)
    }
}
