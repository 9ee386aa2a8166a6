// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::{Cli, Commands};
use vetclinic_client::ApiError;

mod cli;
mod commands;
mod logging;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let Cli {
        api_url,
        state_dir,
        command,
    } = Cli::parse();

    let ctx = match command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => commands::context(api_url.as_deref(), state_dir)?,
    };

    let result = match command {
        Commands::Admin(cmd) => commands::admin(&ctx, cmd).await,
        Commands::Portal(cmd) => commands::portal(&ctx, cmd).await,
        Commands::Version => Ok(()),
    };

    match result {
        Err(Error::Api(e @ ApiError::Unauthenticated { .. })) => {
            let message = e.user_message();
            match ctx.handle_error(&e).await {
                Some(route) => Err(Error::Custom(format!(
                    "{message} Sign in at {}",
                    route.path()
                ))),
                None => Err(Error::Api(e)),
            }
        }
        other => other,
    }
}
