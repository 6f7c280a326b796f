use crate::commands::{
    run_analytics_export, run_roster_import, run_roster_template, AnalyticsExportArgs,
    RosterImportArgs, RosterTemplateArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use talentark::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "TalentArk",
    about = "Run the TalentArk directory service and roster tooling from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Workforce analytics over the directory
    Analytics {
        #[command(subcommand)]
        command: AnalyticsCommand,
    },
    /// Roster spreadsheet import tooling
    Roster {
        #[command(subcommand)]
        command: RosterCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AnalyticsCommand {
    /// Export the analytics snapshot as JSON to a local file
    Export(AnalyticsExportArgs),
}

#[derive(Subcommand, Debug)]
enum RosterCommand {
    /// Validate a roster sheet and import the accepted rows
    Import(RosterImportArgs),
    /// Write the roster template CSV with its example rows
    Template(RosterTemplateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Analytics {
            command: AnalyticsCommand::Export(args),
        } => run_analytics_export(args),
        Command::Roster {
            command: RosterCommand::Import(args),
        } => run_roster_import(args),
        Command::Roster {
            command: RosterCommand::Template(args),
        } => run_roster_template(args),
    }
}
