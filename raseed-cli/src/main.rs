use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use raseed_core::{time, TimeExpressionKind, MAX_WINDOW_SIZE};
use raseed_ingest::{load_receipts, IngestReport};
use raseed_insights::{
    absence_statement, consolidate_items, ground_question, DashboardSnapshot, Grounding, Interpretation,
    QuestionInterpreter,
};
use std::path::PathBuf;

mod config;
mod logging;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "raseed",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("RASEED_BUILD_SHA"), ")"),
    about = "Receipt spending summaries and grounded spending questions"
)]
struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct Source {
    /// Receipts file (.json array or flat .csv); defaults to ~/.raseed/receipts.json
    #[arg(long)]
    receipts: Option<PathBuf>,

    /// Reference "now": RFC 3339, "YYYY-MM-DD HH:MM" or "YYYY-MM-DD" (default: today)
    #[arg(long)]
    now: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// This month's total, category breakdown and rolling monthly totals
    Summary {
        #[command(flatten)]
        source: Source,

        /// Months in the rolling series (default from config, normally 3)
        #[arg(long, value_parser = clap::value_parser!(u64).range(..=MAX_WINDOW_SIZE as u64))]
        window: Option<u64>,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,

        /// Print the compact categories / amounts / periods JSON used for savings suggestions
        #[arg(long, conflicts_with = "json")]
        spending_data: bool,
    },

    /// Show the receipts inside a period: this_month, last_month, this_week, last_week, unbounded
    Scope {
        #[command(flatten)]
        source: Source,

        #[arg(long)]
        kind: String,

        #[arg(long)]
        json: bool,
    },

    /// Ground a spending question in the receipts for the period it asks about
    Ask {
        #[command(flatten)]
        source: Source,

        /// Print the grounding result as JSON instead of the prompt text
        #[arg(long)]
        json: bool,

        /// The question, e.g. "how much did I spend last month?"
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,
    },

    /// Every distinct item bought, in first-seen order
    ShoppingList {
        #[command(flatten)]
        source: Source,
    },

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.raseed/config.toml with default values
    Init,
    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match cli.command {
        Command::Summary {
            source,
            window,
            json,
            spending_data,
        } => {
            let cfg = config::load_config()?;
            let (report, reference) = load_source(&source, &cfg)?;
            let window = window.map_or(cfg.dashboard.window_size, |w| w as usize);

            let snapshot = DashboardSnapshot::build(&report.receipts, reference, window)?;
            if spending_data {
                println!("{}", snapshot.spending_data_json()?);
            } else if json {
                println!("{}", snapshot.to_json()?);
            } else {
                note_skipped(&report);
                print!("{}", snapshot.render_text());
            }
        }

        Command::Scope { source, kind, json } => {
            let cfg = config::load_config()?;
            let kind: TimeExpressionKind = kind
                .parse()
                .with_context(|| format!("cannot interpret time expression '{kind}'"))?;
            let (report, reference) = load_source(&source, &cfg)?;

            let (window, scoped) = raseed_core::scope_receipts(&report.receipts, kind, reference)
                .with_context(|| format!("cannot resolve {kind} relative to {reference}"))?;
            if json {
                let out = serde_json::json!({ "kind": kind, "window": window, "scoped": scoped });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                note_skipped(&report);
                println!("Window: {} ({})", window, kind);
                if scoped.is_empty {
                    println!("{}", absence_statement(kind, window));
                }
                for r in &scoped.matched {
                    println!("- {} | {} | {:.2}", r.date, r.store_name, r.total);
                }
                if scoped.skipped > 0 {
                    println!("\n{} receipt(s) with unreadable dates left out", scoped.skipped);
                }
            }
        }

        Command::Ask { source, json, question } => {
            let cfg = config::load_config()?;
            let question = question.join(" ");
            let interpreter = QuestionInterpreter::new()?;

            let kind = match interpreter.interpret(&question) {
                Interpretation::Kind(kind) => kind,
                Interpretation::Unsupported(phrase) => bail!(
                    "cannot interpret the period in this question ('{phrase}'); \
                     ask about this month, last month, this week or last week"
                ),
            };
            tracing::debug!(%kind, "interpreted question");

            let (report, reference) = load_source(&source, &cfg)?;
            let grounding = ground_question(
                &question,
                kind,
                &report.receipts,
                reference,
                cfg.ask.max_receipts_in_prompt,
            )?;

            if json {
                println!("{}", serde_json::to_string_pretty(&grounding)?);
                return Ok(());
            }
            match grounding {
                Grounding::NoData { statement, .. } => println!("{statement}"),
                Grounding::Context(ctx) => print!("{}", ctx.render_prompt()?),
            }
        }

        Command::ShoppingList { source } => {
            let cfg = config::load_config()?;
            let (report, _) = load_source(&source, &cfg)?;
            let items = consolidate_items(&report.receipts);
            if items.is_empty() {
                println!("No items found.");
            }
            for item in items {
                println!("- {item}");
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

/// Load receipts and resolve the reference date. A bad `--now` aborts.
fn load_source(source: &Source, cfg: &Config) -> Result<(IngestReport, NaiveDate)> {
    let reference = match &source.now {
        Some(now) => time::parse_reference_instant(now, &cfg.locale.timezone)
            .with_context(|| format!("cannot interpret reference instant '{now}'"))?,
        None => time::today_in(&cfg.locale.timezone)?,
    };

    let path = match &source.receipts {
        Some(p) => p.clone(),
        None => state::default_receipts_path()?,
    };
    if !path.exists() {
        bail!("receipts not found: {} (pass --receipts <path>)", path.display());
    }

    let report = load_receipts(&path).with_context(|| format!("loading {}", path.display()))?;
    Ok((report, reference))
}

fn note_skipped(report: &IngestReport) {
    let n = report.skipped_count();
    if n > 0 {
        println!("({n} record(s) skipped while loading)\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_collects_question_words() {
        let cli = Cli::parse_from(["raseed", "ask", "--now", "2025-07-15", "how", "much", "last", "month"]);
        let Command::Ask { source, question, json } = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(question.join(" "), "how much last month");
        assert_eq!(source.now.as_deref(), Some("2025-07-15"));
        assert!(!json);
    }

    #[test]
    fn test_window_flag_is_bounded() {
        let ok = Cli::try_parse_from(["raseed", "summary", "--window", "12"]).unwrap();
        let Command::Summary { window, .. } = ok.command else {
            panic!("expected summary");
        };
        assert_eq!(window, Some(12));

        assert!(Cli::try_parse_from(["raseed", "summary", "--window", "1201"]).is_err());
        assert!(Cli::try_parse_from(["raseed", "summary", "--window", "18446744073709551615"]).is_err());
    }

    #[test]
    fn test_spending_data_flag_excludes_json() {
        let cli = Cli::try_parse_from(["raseed", "summary", "--spending-data"]).unwrap();
        assert!(matches!(cli.command, Command::Summary { spending_data: true, json: false, .. }));
        assert!(Cli::try_parse_from(["raseed", "summary", "--spending-data", "--json"]).is_err());
    }

    #[test]
    fn test_long_version_carries_build_sha() {
        let cmd = Cli::command();
        let long = cmd.get_long_version().map(|v| v.to_string()).unwrap_or_default();
        assert!(long.starts_with(env!("CARGO_PKG_VERSION")));
        assert!(long.contains(env!("RASEED_BUILD_SHA")));
    }

    #[test]
    fn test_load_source_uses_now_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipts.json");
        std::fs::write(&path, r#"[{"date": "2025-07-01", "storeName": "Grocer", "total": 3.5}]"#).unwrap();

        let source = Source {
            receipts: Some(path),
            now: Some("2025-07-15 09:30".to_string()),
        };
        let (report, reference) = load_source(&source, &Config::default()).unwrap();
        assert_eq!(report.receipts.len(), 1);
        assert_eq!(reference, NaiveDate::from_ymd_opt(2025, 7, 15).unwrap());
    }

    #[test]
    fn test_load_source_rejects_bad_now_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Source {
            receipts: Some(dir.path().join("nope.json")),
            now: Some("2025-07-15".to_string()),
        };
        assert!(load_source(&missing, &Config::default()).is_err());

        let bad_now = Source {
            receipts: Some(dir.path().join("nope.json")),
            now: Some("next tuesday-ish".to_string()),
        };
        let err = load_source(&bad_now, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("reference instant"));
    }
}
