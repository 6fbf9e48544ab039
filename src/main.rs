use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::form::build_record;
use crate::funds::{bundled_funds, filter_candidates, load_fund_list};
use crate::portfolio::{group_by_fund, Portfolio};
use crate::record::{InvestmentRecord, MUTUAL_FUND};
use crate::report::{render_report, write_pdf};
use crate::store::{Persisted, Store, INVESTMENTS_KEY};
use crate::tui::Tab;

use clap::{arg, ArgMatches, Command};
use eyre::WrapErr;
use serde::Deserialize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod chart;
mod error;
mod events;
mod form;
mod funds;
mod portfolio;
mod record;
mod report;
mod store;
mod tui;

const APP_NAME: &str = "sip_tracker";
const CONFIG_NAME: &str = "config";

#[derive(Serialize, Deserialize)]
struct Config {
    database_path: String,
    report_file: String,
    fund_list_file: Option<String>,
    log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "sip_tracker_db".to_string(),
            report_file: report::DEFAULT_REPORT_FILE.to_string(),
            fund_list_file: None,
            log_file: "sip_tracker.log".to_string(),
        }
    }
}

fn cli() -> Command {
    Command::new(APP_NAME)
        .about("Track SIP investments in mutual funds")
        .arg_required_else_help(true)
        .subcommand(Command::new("config").about("Print the path to the config file"))
        .subcommand(
            Command::new("add")
                .about("Record a new SIP investment")
                .arg(arg!(--name <NAME> "Fund name").required(true))
                .arg(arg!(--amount <AMOUNT> "Monthly SIP amount").required(true))
                .arg(arg!(--duration <MONTHS> "SIP duration in months").required(true))
                .arg(arg!(--current <AMOUNT> "Current market value").required(true))
                .arg(arg!(--"start-date" <DATE> "Start date as YYYY-MM-DD").required(true))
                .arg(
                    arg!(--"type" <TYPE> "Investment type")
                        .required(false)
                        .value_parser([MUTUAL_FUND])
                        .default_value(MUTUAL_FUND),
                ),
        )
        .subcommand(Command::new("balances").about("Show every SIP grouped by fund"))
        .subcommand(Command::new("performance").about("Show ROI and annualized return per fund"))
        .subcommand(Command::new("allocation").about("Show how current value splits across funds"))
        .subcommand(
            Command::new("report")
                .about("Write the PDF performance report")
                .arg(arg!([FILE] "Output file, defaults to the configured report file"))
                .arg(arg!(--text "Print the report pages instead of writing a PDF")),
        )
        .subcommand(
            Command::new("funds")
                .about("List known fund names matching a query")
                .arg(arg!([QUERY] "Part of a fund name")),
        )
        .subcommand(Command::new("reset").about("Delete all saved investments"))
        .subcommand(
            Command::new("tui")
                .about("Open the interactive dashboard")
                .arg(
                    arg!(--tab <TAB> "Tab to open on (overview, records)")
                        .required(false)
                        .value_parser(["overview", "records"]),
                ),
        )
}

fn init_tracing(log_file: Option<&Path>) -> eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .wrap_err_with(|| format!("Error opening log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn fund_names(cfg: &Config) -> eyre::Result<Vec<String>> {
    match &cfg.fund_list_file {
        Some(path) => Ok(load_fund_list(path)?),
        None => Ok(bundled_funds().to_vec()),
    }
}

fn load_records(store: &Store) -> Vec<InvestmentRecord> {
    store.load(INVESTMENTS_KEY, Vec::new())
}

fn add_record(store: Store, matches: &ArgMatches) -> eyre::Result<InvestmentRecord> {
    let value = |id: &str| {
        matches
            .get_one::<String>(id)
            .map(String::as_str)
            .unwrap_or_default()
    };
    let record = build_record(
        matches.get_one::<String>("type").map(String::as_str),
        value("name"),
        value("amount"),
        value("duration"),
        value("current"),
        value("start-date"),
    )?;

    let mut investments = Persisted::new(store, INVESTMENTS_KEY, Vec::new());
    investments
        .update(|list| list.push(record.clone()))
        .wrap_err("Error saving investment")?;
    Ok(record)
}

fn main() -> eyre::Result<()> {
    let cfg: Config =
        confy::load(APP_NAME, CONFIG_NAME).wrap_err("Error loading configuration")?;

    let matches = cli().get_matches();

    let log_file = matches
        .subcommand_matches("tui")
        .map(|_| Path::new(&cfg.log_file));
    init_tracing(log_file)?;

    if let Some(_matches) = matches.subcommand_matches("config") {
        let path = confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)?;
        println!("Your config file is located here: \n{}", path.display());
        return Ok(());
    }

    if let Some(matches) = matches.subcommand_matches("funds") {
        let names = fund_names(&cfg)?;
        let query = matches.get_one::<String>("QUERY").map(String::as_str);
        let found: Vec<&str> = match query {
            Some(q) if !q.is_empty() => filter_candidates(q, &names),
            _ => names.iter().map(String::as_str).collect(),
        };
        for name in found {
            println!("{name}");
        }
        return Ok(());
    }

    let store = Store::open(&cfg.database_path)
        .wrap_err_with(|| format!("Error opening database {}", cfg.database_path))?;

    match matches.subcommand() {
        Some(("add", sub)) => {
            let record = add_record(store, sub)?;
            println!(
                "Added SIP of {} for {} months in {}",
                record.get_sip_amount(),
                record.get_sip_duration(),
                record.get_name()
            );
        }
        Some(("reset", _)) => {
            store.reset().wrap_err("Error clearing saved data")?;
            println!("All saved investments were deleted.");
        }
        Some(("report", sub)) => {
            let file = sub
                .get_one::<String>("FILE")
                .cloned()
                .unwrap_or_else(|| cfg.report_file.clone());
            let records = load_records(&store);
            let document = render_report(&group_by_fund(&records));
            if sub.get_flag("text") {
                print!("{}", document.to_plain_text());
                return Ok(());
            }
            write_pdf(&document, Path::new(&file))
                .wrap_err_with(|| format!("Error writing report to {file}"))?;
            tracing::info!("Report has {} pages", document.pages.len());
            println!("Report written to {file}");
        }
        Some(("tui", sub)) => {
            let tab = sub
                .get_one::<String>("tab")
                .and_then(|t| Tab::from_str(t));
            tui::run_tui(store, fund_names(&cfg)?, PathBuf::from(&cfg.report_file), tab)
                .wrap_err("Error running dashboard")?;
        }
        Some((subcommand @ ("balances" | "performance" | "allocation"), _)) => {
            let portfolio = Portfolio::new(load_records(&store));
            if portfolio.is_empty() {
                println!("No investments yet. Add one with `{APP_NAME} add`.");
                return Ok(());
            }
            match subcommand {
                "balances" => portfolio.print_balances(),
                "performance" => portfolio.print_performance(),
                _ => {
                    portfolio.draw_pie_chart();
                    portfolio.print_allocation();
                }
            }
        }
        _ => {
            cli().print_help()?;
        }
    }

    Ok(())
}
