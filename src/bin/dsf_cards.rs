//! CLI tool stamping cross-referenced station numbers onto score cards and comp cards

use clap::Parser;
use dsf_cards::layout::{DEFAULT_COMP_CARD_COLUMNS, DEFAULT_COMP_CARD_ROWS};
use dsf_cards::{process_cards, RunOptions, RunSummary};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "dsf-cards", version)]
#[command(about = "Stamp station numbers onto score card and comp card PDFs", long_about = None)]
struct Cli {
    /// PDF file with score cards
    score_cards: PathBuf,

    /// PDF file with comp cards
    comp_cards: PathBuf,

    /// Comp card rows per page
    #[arg(
        short = 'r',
        long,
        default_value_t = DEFAULT_COMP_CARD_ROWS as u32,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    rows: u32,

    /// Comp card columns per page
    #[arg(
        short = 'c',
        long,
        default_value_t = DEFAULT_COMP_CARD_COLUMNS as u32,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    columns: u32,

    /// Comp card left margin in points (default: widest event name)
    #[arg(long, allow_negative_numbers = true)]
    left_margin: Option<f32>,

    /// Comp card top margin in points
    #[arg(long, allow_negative_numbers = true)]
    top_margin: Option<f32>,

    /// Score card output file (default: <input>_out.pdf)
    #[arg(long = "score-out")]
    score_card_output: Option<PathBuf>,

    /// Comp card output file (default: <input>_out.pdf)
    #[arg(long = "comp-out")]
    comp_card_output: Option<PathBuf>,

    /// Write extracted text and parsed records to diagnostic files
    #[arg(long)]
    debug: bool,

    /// Directory for diagnostic files (implies --debug)
    #[arg(long)]
    debug_dir: Option<PathBuf>,
}

impl Cli {
    fn into_options(self) -> RunOptions {
        let mut options = RunOptions::new(self.score_cards, self.comp_cards);
        options.comp_card_rows = self.rows as usize;
        options.comp_card_columns = self.columns as usize;
        options.comp_card_left_margin = self.left_margin;
        options.comp_card_top_margin = self.top_margin;
        options.score_card_output = self.score_card_output;
        options.comp_card_output = self.comp_card_output;
        options.diagnostics_dir = match (self.debug, self.debug_dir) {
            (_, Some(dir)) => Some(dir),
            (true, None) => Some(PathBuf::from(".")),
            (false, None) => None,
        };
        options
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    println!("DSF Cards - version {}", env!("CARGO_PKG_VERSION"));
    println!();

    let options = cli.into_options();
    match process_cards(&options) {
        Ok(summary) => print_summary(&summary),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!("Score cards: {}", summary.score_cards);
    if let Some(anomaly) = &summary.score_card_anomaly {
        println!("  stopped early: {}", anomaly);
    }
    println!("Comp cards: {}", summary.comp_cards);
    if let Some(anomaly) = &summary.comp_card_anomaly {
        println!("  stopped early: {}", anomaly);
    }
    println!("Comp card left margin: {:.2}", summary.comp_card_left_margin);
    println!();
    println!(
        "Score card output: {} ({} stamps on {} of {} pages)",
        summary.score_card_output.display(),
        summary.score_card_stamps.stamps,
        summary.score_card_stamps.stamped_pages,
        summary.score_card_stamps.pages
    );
    println!(
        "Comp card output: {} ({} stamps on {} of {} pages)",
        summary.comp_card_output.display(),
        summary.comp_card_stamps.stamps,
        summary.comp_card_stamps.stamped_pages,
        summary.comp_card_stamps.pages
    );
    if summary.unresolved_events > 0 {
        println!(
            "Events without a matching score card: {}",
            summary.unresolved_events
        );
    }
    println!();
    println!("Finished!");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("dsf-cards").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let options = parse(&["s.pdf", "c.pdf"]).unwrap().into_options();
        assert_eq!(options.score_card_input, PathBuf::from("s.pdf"));
        assert_eq!(options.comp_card_input, PathBuf::from("c.pdf"));
        assert_eq!(options.comp_card_rows, DEFAULT_COMP_CARD_ROWS);
        assert_eq!(options.comp_card_columns, DEFAULT_COMP_CARD_COLUMNS);
        assert_eq!(options.comp_card_left_margin, None);
        assert_eq!(options.comp_card_top_margin, None);
        assert_eq!(options.diagnostics_dir, None);
    }

    #[test]
    fn test_grid_and_outputs_reach_options() {
        let options = parse(&[
            "s.pdf",
            "c.pdf",
            "-r",
            "2",
            "--columns",
            "5",
            "--score-out",
            "a.pdf",
            "--comp-out",
            "b.pdf",
        ])
        .unwrap()
        .into_options();
        assert_eq!(options.comp_card_rows, 2);
        assert_eq!(options.comp_card_columns, 5);
        assert_eq!(options.score_card_output, Some(PathBuf::from("a.pdf")));
        assert_eq!(options.comp_card_output, Some(PathBuf::from("b.pdf")));
    }

    #[test]
    fn test_negative_margins_are_values() {
        let options = parse(&["s.pdf", "c.pdf", "--left-margin", "-5", "--top-margin", "-2.5"])
            .unwrap()
            .into_options();
        assert_eq!(options.comp_card_left_margin, Some(-5.0));
        assert_eq!(options.comp_card_top_margin, Some(-2.5));
    }

    #[test]
    fn test_debug_dir_implies_debug() {
        let options = parse(&["s.pdf", "c.pdf", "--debug-dir", "dumps"])
            .unwrap()
            .into_options();
        assert_eq!(options.diagnostics_dir, Some(PathBuf::from("dumps")));

        let options = parse(&["s.pdf", "c.pdf", "--debug"]).unwrap().into_options();
        assert_eq!(options.diagnostics_dir, Some(PathBuf::from(".")));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let err = parse(&["s.pdf", "c.pdf", "--landscape"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_missing_value_is_rejected() {
        assert!(parse(&["s.pdf", "c.pdf", "--rows"]).is_err());
        assert!(parse(&["s.pdf", "c.pdf", "--left-margin"]).is_err());
    }

    #[test]
    fn test_single_positional_is_rejected() {
        let err = parse(&["s.pdf"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_empty_grid_is_rejected() {
        assert!(parse(&["s.pdf", "c.pdf", "--rows", "0"]).is_err());
        assert!(parse(&["s.pdf", "c.pdf", "-c", "0"]).is_err());
        assert!(parse(&["s.pdf", "c.pdf", "--rows", "two"]).is_err());
    }
}
