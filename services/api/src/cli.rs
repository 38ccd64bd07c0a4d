use crate::demo::{run_demo, run_inventory, run_score, DemoArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use trait_flow::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Trait Flow",
    about = "Run the Trait Flow journaling service or explore it from the command line",
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
    /// Print the ten-item personality inventory
    Inventory,
    /// Score a set of inventory answers and print the trait profile
    Score(ScoreArgs),
    /// Walk through onboarding, a check-in and the personalized message it produces
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
    /// Preload a few days of sample check-ins and messages
    #[arg(long)]
    pub(crate) seed_demo_data: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Inventory => run_inventory(),
        Command::Score(args) => run_score(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
