//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves settings
//! - installs logging
//! - opens a `Session` (dataset store + scoring engine)
//! - prints reports or runs the dashboard

use clap::Parser;

use crate::analytics::MAX_HISTOGRAM_BINS;
use crate::cli::{BoxArgs, Cli, Command, CountsArgs, HistArgs, ScatterArgs, ScoreArgs, rewrite_args};
use crate::config::Settings;
use crate::error::{AppError, EXIT_INPUT, EXIT_RUNTIME};

pub mod session;

pub use session::Session;

/// Entry point for the `crisk` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    let settings = Settings::resolve(&cli.global);
    let is_tui = matches!(cli.command, Command::Tui);
    crate::logging::init(settings.log_filter.as_deref(), is_tui);

    let session = Session::open(&settings);

    match cli.command {
        Command::Summary => handle_summary(&session),
        Command::Hist(args) => handle_hist(&session, &args),
        Command::Counts(args) => handle_counts(&session, &args),
        Command::Scatter(args) => handle_scatter(&session, &args),
        Command::Box(args) => handle_box(&session, &args),
        Command::Score(args) => handle_score(&session, &args),
        Command::Tui => crate::tui::run(&session),
    }
}

fn handle_summary(session: &Session) -> Result<(), AppError> {
    let dataset = session.dataset()?;
    let kpis = session.aggregator()?.kpis();
    println!("{}", crate::report::format_summary(dataset, &kpis));
    Ok(())
}

fn handle_hist(session: &Session, args: &HistArgs) -> Result<(), AppError> {
    check_bins(args.bins)?;
    let bins = session.aggregator()?.histogram(args.column, args.bins);
    println!("{}", crate::report::format_histogram(args.column, &bins, args.width));
    Ok(())
}

fn check_bins(bins: usize) -> Result<(), AppError> {
    if bins == 0 || bins > MAX_HISTOGRAM_BINS {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("--bins must be between 1 and {MAX_HISTOGRAM_BINS} (got {bins})"),
        ));
    }
    Ok(())
}

fn handle_counts(session: &Session, args: &CountsArgs) -> Result<(), AppError> {
    let counts = session.aggregator()?.value_counts(args.column);
    println!("{}", crate::report::format_counts(args.column, &counts, 40));
    Ok(())
}

fn handle_scatter(session: &Session, args: &ScatterArgs) -> Result<(), AppError> {
    let points = session.aggregator()?.scatter_pairs(args.x, args.y);
    println!(
        "{}",
        crate::plot::render_scatter(&points, args.width, args.height, args.x.name(), args.y.name())
    );
    Ok(())
}

fn handle_box(session: &Session, args: &BoxArgs) -> Result<(), AppError> {
    let grouped = session.aggregator()?.grouped_distribution(args.category, args.numeric);
    println!(
        "{}",
        crate::report::format_box_table(args.category, args.numeric, &grouped.box_summaries())
    );
    Ok(())
}

fn handle_score(session: &Session, args: &ScoreArgs) -> Result<(), AppError> {
    let scored = session.score(&args.to_form())?;
    if args.json {
        let json = serde_json::to_string_pretty(&scored)
            .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to encode result: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", crate::report::format_scored(&scored));
    }
    Ok(())
}
