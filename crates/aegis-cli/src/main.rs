//! `aegisctl` - command-line utilities for the Aegis platform.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aegis_cli::profile::ProfileStore;
use aegis_cli::session::Session;
use aegis_cli::{commands, output, Cli, Commands, ImageCommands, RepoCommands, VmCommands};
use aegis_cli::{CodeRepoCommands, ProfileCommands, ScopeCommands};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing; --debug wins over --verbose
    let default_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let outcome = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(anyhow::Error::from)
        .and_then(|runtime| runtime.block_on(run(&cli)));

    // Exit contract: 0 on success, 1 on any fatal error; non-verbose mode
    // prints the JSON error envelope to stdout
    if let Err(err) = outcome {
        if cli.verbose {
            eprintln!("Error: {err:#}");
        } else {
            output::print_error(&format!("{err:#}"));
        }
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Setup => {
            let store = ProfileStore::open_default()?;
            commands::setup::run(&store)
        }
        Commands::Profile { command } => {
            let store = ProfileStore::open_default()?;
            match command {
                ProfileCommands::List => commands::profile::list(&store, cli.verbose),
                ProfileCommands::Info { profile_name } => {
                    commands::profile::info(&store, profile_name.as_deref(), cli.verbose)
                }
                ProfileCommands::Delete { profile_name } => {
                    commands::profile::delete(&store, profile_name)
                }
                ProfileCommands::SetDefault { profile_name } => {
                    commands::profile::set_default(&store, profile_name)
                }
            }
        }
        Commands::Images { command } => {
            let session = Session::connect(cli.profile.as_deref()).await?;
            match command {
                ImageCommands::Cleanup(args) => {
                    commands::images::cleanup(&session, args, cli.verbose).await
                }
                ImageCommands::Delete(args) => {
                    commands::images::delete(&session, args, cli.verbose).await
                }
            }
        }
        Commands::Repos { command } => {
            let session = Session::connect(cli.profile.as_deref()).await?;
            match command {
                RepoCommands::Delete(args) => {
                    commands::repos::delete(&session, args, cli.verbose).await
                }
            }
        }
        Commands::Vm { command } => {
            let session = Session::connect(cli.profile.as_deref()).await?;
            match command {
                VmCommands::List(args) => commands::vm::list(&session, args, cli.verbose).await,
                VmCommands::Count(args) => commands::vm::count(&session, args, cli.verbose).await,
            }
        }
        Commands::Scopes { command } => {
            let session = Session::connect(cli.profile.as_deref()).await?;
            match command {
                ScopeCommands::List => commands::scopes::list(&session, cli.verbose).await,
            }
        }
        Commands::CodeRepos { command } => {
            let session = Session::connect(cli.profile.as_deref()).await?;
            match command {
                CodeRepoCommands::List => commands::code_repos::list(&session, cli.verbose).await,
                CodeRepoCommands::Count => commands::code_repos::count(&session, cli.verbose).await,
            }
        }
    }
}
