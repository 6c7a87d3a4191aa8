use std::process::ExitCode;

use artifact_forge::PipelineError;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod telemetry;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Optional .env; real environment variables win.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<PipelineError>() {
                Some(failure) => {
                    eprintln!("generation failed at the {} stage: {failure}", failure.stage())
                }
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
