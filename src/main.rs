use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser, Debug)]
#[command(name = "vatc", version, about = "UK VAT return calculator for boxes 1 to 9")]
struct Cli {
    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate the nine boxes for a period
    Calculate(cmd::calculate::CalculateCommand),
    /// Print a draft return as JSON
    Prepare(cmd::prepare::PrepareCommand),
    /// Labelled boxes with the submission payload
    Preview(cmd::preview::PreviewCommand),
    /// Compare two periods box by box
    Compare(cmd::compare::CompareCommand),
    /// Estimate the next liability from filed returns
    Estimate(cmd::estimate::EstimateCommand),
    /// Yearly totals of records and returns
    Stats(cmd::stats::StatsCommand),
    /// Recalculate a saved return and report discrepancies
    Check(cmd::check::CheckCommand),
    /// Print the expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logger = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            logger.parse_filters(&filters);
        }
        Err(_) if cli.verbose => {
            logger.filter_level(log::LevelFilter::Debug);
        }
        Err(_) => {
            logger.filter_level(log::LevelFilter::Warn);
        }
    }
    logger.init();

    match cli.command {
        Command::Calculate(cmd) => cmd.exec(),
        Command::Prepare(cmd) => cmd.exec(),
        Command::Preview(cmd) => cmd.exec(),
        Command::Compare(cmd) => cmd.exec(),
        Command::Estimate(cmd) => cmd.exec(),
        Command::Stats(cmd) => cmd.exec(),
        Command::Check(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
