// cli/src/main.rs

use anyhow::Result;
use hospital_cli::cli::start_cli;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    start_cli().await
}
