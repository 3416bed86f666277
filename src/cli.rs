use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::Category;

/// Find service orders in a report that are not yet in the shared reference sheet
#[derive(Parser, Debug)]
#[command(name = "order-cleanse", version)]
#[command(about = "Filter new service orders against the shared reference sheet")]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter, dedup and export new orders for one category
    Clean(CleanArgs),
    /// Show sheets, headers and which categories an upload can run
    Inspect(InspectArgs),
}

fn parse_category(s: &str) -> Result<Category, String> {
    s.parse::<Category>().map_err(|e| e.to_string())
}

#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    /// Uploaded report (.xlsx, .xls, .ods or .csv)
    #[arg(long, short)]
    pub input: PathBuf,

    /// Category: wsa, modoroso or wappr
    #[arg(long, short, value_parser = parse_category)]
    pub category: Category,

    /// Worksheet of the report to read (first sheet when omitted)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Keep only orders created in these months (repeat or comma-separate, 1-12)
    #[arg(long = "month", value_delimiter = ',', value_parser = clap::value_parser!(u32).range(1..=12))]
    pub months: Vec<u32>,

    /// Local export of the reference spreadsheet
    #[arg(long, conflicts_with = "reference_sheet_id")]
    pub reference_workbook: Option<PathBuf>,

    /// Id of the reference Google spreadsheet (shared by link)
    #[arg(long)]
    pub reference_sheet_id: Option<String>,

    /// Result file (.xlsx or .csv); defaults to new_orders_<category>_<timestamp>.xlsx
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// JSON file overriding report column names
    #[arg(long)]
    pub columns: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub summary_json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Report to inspect
    #[arg(long, short)]
    pub input: PathBuf,

    /// Worksheet to inspect (first sheet when omitted)
    #[arg(long)]
    pub sheet: Option<String>,

    /// JSON file overriding report column names
    #[arg(long)]
    pub columns: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clean_with_months() {
        let cli = Cli::try_parse_from([
            "order-cleanse",
            "clean",
            "-i",
            "report.xlsx",
            "-c",
            "WSA",
            "--month",
            "1,2",
            "--month",
            "12",
        ])
        .unwrap();
        match cli.command {
            Command::Clean(args) => {
                assert_eq!(args.category, Category::Wsa);
                assert_eq!(args.months, vec![1, 2, 12]);
                assert!(!args.summary_json);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_month_out_of_range_and_both_references() {
        assert!(Cli::try_parse_from(["order-cleanse", "clean", "-i", "r.xlsx", "-c", "wsa", "--month", "13"]).is_err());
        assert!(Cli::try_parse_from([
            "order-cleanse",
            "clean",
            "-i",
            "r.xlsx",
            "-c",
            "wsa",
            "--reference-workbook",
            "ref.xlsx",
            "--reference-sheet-id",
            "abc"
        ])
        .is_err());
    }
}
