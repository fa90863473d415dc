use anyhow::Context;
use clap::Parser;
use tokio::runtime::Runtime;
use tracing::debug;

use chatnotify::card::build_card;
use chatnotify::cli::{Cli, Commands};
use chatnotify::config::Config;
use chatnotify::context::RunContext;
use chatnotify::input::RawInputs;
use chatnotify::logging;
use chatnotify::sender::{deliver, Envelope};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let rt = Runtime::new().context("Starting async runtime")?;
    rt.block_on(async {
        match cli.command {
            Commands::Send { inputs } => {
                let request = RawInputs::from(inputs).into_request()?;
                let config = Config::load(cli.config.clone())?;
                let ctx = RunContext::from_env();
                debug!(?ctx, "run context");

                let card = build_card(&request, &ctx, &config.assets);
                let client = reqwest::Client::builder()
                    .user_agent(concat!("chatnotify/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .context("Building HTTP client")?;
                deliver(&client, &request.url, &request.name, &card)
                    .await
                    .into_result()?;
            }
            Commands::Render { inputs } => {
                let request = RawInputs::from(inputs).into_preview()?;
                let config = Config::load(cli.config.clone())?;
                let ctx = RunContext::from_env();

                let card = build_card(&request, &ctx, &config.assets);
                let envelope = Envelope::new(&request.name, &card);
                println!("{}", serde_json::to_string_pretty(&envelope)?);
            }
            Commands::Version { json } => {
                if json {
                    let info = serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "commit": option_env!("GIT_SHA").unwrap_or("unknown"),
                        "build_date": option_env!("BUILD_DATE").unwrap_or("unknown"),
                    });
                    println!("{}", serde_json::to_string_pretty(&info)?);
                } else {
                    println!(
                        "chatnotify {} (commit: {}, built: {})",
                        env!("CARGO_PKG_VERSION"),
                        option_env!("GIT_SHA").unwrap_or("unknown"),
                        option_env!("BUILD_DATE").unwrap_or("unknown"),
                    );
                }
            }
        }
        Ok(())
    })
}
