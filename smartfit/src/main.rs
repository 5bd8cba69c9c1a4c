use anyhow::Result;
use clap::Parser;

use smartfit::Config;
use smartfit_common::OutputFormat;

mod cli;
mod handlers;

use cli::{Cli, Commands};
use handlers::{CommandContext, ScanArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    smartfit_common::init_tracing("smartfit", cli.verbose)?;

    let config = match &cli.config {
        Some(path) => Config::load_from(Some(path.as_path()))?,
        None => Config::load()?,
    };
    let ctx = CommandContext::new(config, OutputFormat::from_json_flag(cli.json))?;

    match cli.command {
        Commands::Scan {
            image,
            user,
            gender,
            style,
            clothing_type,
        } => {
            let args = ScanArgs {
                image,
                user,
                gender,
                style,
                clothing_type,
            };
            handlers::scan(&ctx, args).await?;
        }
        Commands::History { user } => {
            handlers::history(&ctx, user).await?;
        }
        Commands::Detail { key, user } => {
            handlers::detail(&ctx, user, &key).await?;
        }
        Commands::Delete { key, user } => {
            handlers::delete(&ctx, user, &key).await?;
        }
        Commands::News {
            query,
            from,
            to,
            sort_by,
        } => {
            handlers::news(&ctx, query, from, to, sort_by).await?;
        }
    }

    Ok(())
}
