use crate::demo::{run_demo, run_rank, DemoArgs, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use talent_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Talent AI",
    about = "Rank mandate longlists and report on similarity bias from the command line",
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
    /// Rank a candidate CSV export against a set of mandate terms
    Rank(RankArgs),
    /// Score the bundled demo mandates and print the weekly bias summary
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Preload the demo mandates so the scoring endpoints have data to serve
    #[arg(long)]
    pub(crate) seed_demo: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rank(args) => run_rank(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["talent-ai-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn rank_splits_terms_on_commas() {
        let cli = Cli::try_parse_from([
            "talent-ai-api",
            "rank",
            "--candidates",
            "longlist.csv",
            "--terms",
            "Infra Debt,Renewables",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Rank(args)) => {
                assert_eq!(args.terms, vec!["Infra Debt", "Renewables"]);
                assert_eq!(args.mandate_id, "adhoc");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
