//! Exchange Explorer CLI - browse message exchanges and export flowcharts

mod cli;
mod colorizer;

use clap::Parser;

#[tokio::main]
async fn main() {
    // Logging is initialized inside run() once the flags are known
    let cli_args = cli::Cli::parse();

    let mut app = cli::ExplorerApp::new();

    if let Err(e) = app.run(cli_args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
