// dailyboard CLI - combine per-team daily report sheets into one board

mod board;
mod exit_codes;
mod init;
mod inspect;
mod layout;
mod text;
mod util;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use dailyboard_config::Settings;

use exit_codes::{EXIT_ERROR, EXIT_OUTPUT, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "dailyboard")]
#[command(about = "Combine per-team daily report spreadsheets into one dashboard")]
#[command(version, long_version = long_version())]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file (default: <config dir>/dailyboard/settings.toml)
    #[arg(long, global = true, env = "DAILYBOARD_SETTINGS", value_name = "FILE")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the board from every team's report
    #[command(after_help = "\
Examples:
  dailyboard build --layout daily.toml
  dailyboard build -l daily.toml --team heavy=in/heavy.xlsx --team dock=in/dock.xlsx -o board.html
  dailyboard build -l daily.toml --date 2026-10-16 --xlsx board.xlsx --csv board-csv --print
  dailyboard build -l daily.toml --strict --quiet")]
    Build(board::BuildArgs),

    /// Check a layout file and summarize its teams and sections
    #[command(after_help = "\
Examples:
  dailyboard validate --layout daily.toml")]
    Validate {
        /// Layout TOML
        #[arg(long, short = 'l', env = "DAILYBOARD_LAYOUT")]
        layout: Option<PathBuf>,
    },

    /// List the anchor-column cells of a report sheet, with row numbers
    #[command(after_help = "\
Examples:
  dailyboard inspect in/heavy.xlsx
  dailyboard inspect in/heavy.xlsx --sheets
  dailyboard inspect in/dock.xlsx --sheet 일일보고 --column B --rows 60
  dailyboard inspect in/heavy.xlsx --layout daily.toml --team heavy")]
    Inspect {
        /// Report file (xlsx, xls, xlsb, ods, csv, tsv)
        file: PathBuf,

        /// Sheet name (default: the team's sheet, else the first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Column to list: 0-based index or letter (default: the team's anchor column, else A)
        #[arg(long)]
        column: Option<String>,

        /// Only scan the first N rows
        #[arg(long, value_name = "N")]
        rows: Option<usize>,

        /// List sheet names and exit
        #[arg(long)]
        sheets: bool,

        /// Layout TOML (with --team)
        #[arg(long, short = 'l', env = "DAILYBOARD_LAYOUT")]
        layout: Option<PathBuf>,

        /// Also report where this team's sections are located
        #[arg(long, value_name = "ID")]
        team: Option<String>,
    },

    /// Write a commented starter layout for three teams
    Init {
        /// Layout file to create
        #[arg(default_value = "dailyboard.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,

        /// Also create the per-user settings file if missing
        #[arg(long)]
        user_settings: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("DAILYBOARD_GIT_HASH"), ")",
        "\nreport:  dailyboard-report ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("DAILYBOARD_TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_settings(cli.settings.as_deref()).and_then(|settings| match cli.command {
        Commands::Build(args) => board::cmd_build(args, &settings),
        Commands::Validate { layout } => board::cmd_validate(layout, &settings),
        Commands::Inspect {
            file,
            sheet,
            column,
            rows,
            sheets,
            layout,
            team,
        } => inspect::cmd_inspect(
            inspect::InspectArgs {
                file,
                sheet,
                column,
                rows,
                sheets,
                layout,
                team,
            },
            &settings,
        ),
        Commands::Init {
            path,
            force,
            user_settings,
        } => init::cmd_init(&path, force, user_settings),
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();
}

fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    let loaded = match path {
        Some(p) => Settings::load_from(p),
        None => Settings::load(),
    };
    loaded.map_err(|e| CliError {
        code: EXIT_ERROR,
        message: e.to_string(),
        hint: Some("fix or remove the settings file, or point --settings elsewhere".into()),
    })
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
