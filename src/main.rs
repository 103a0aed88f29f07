use anyhow::Result;
use campuschat::cli::CliArgs;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    campuschat::run(args).await
}
