// src/main.rs

use assetdag::errors::unwrap_all_errors;
use assetdag::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            for (depth, message) in unwrap_all_errors(Some(&err)).iter().enumerate() {
                eprintln!("{}{message}", "  ".repeat(depth));
            }
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<i32> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    Ok(run(args).await?)
}
