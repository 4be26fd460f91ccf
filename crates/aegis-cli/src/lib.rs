//! # aegis-cli
//!
//! Command-line utilities for the Aegis platform.
//!
//! ## Commands
//!
//! - `aegisctl setup` - Interactive credential setup
//! - `aegisctl profile {list,info,delete,set-default}` - Profile management
//! - `aegisctl images {cleanup,delete}` - Stale image removal (dry-run by default)
//! - `aegisctl repos delete` - Repository deletion (dry-run by default)
//! - `aegisctl vm {list,count}` - VM inventory extraction
//! - `aegisctl scopes list` - Application scope listing
//! - `aegisctl code-repos {list,count}` - Supply Chain code repositories
//!
//! Output is JSON by default; `-v/--verbose` switches to human-readable
//! tables. Fatal errors print `{"error": "..."}` and exit with status 1.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
// CLI uses print! macros intentionally
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

pub mod commands;
pub mod output;
pub mod profile;
pub mod session;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Bulk cleanup and inventory utilities for the Aegis platform.
#[derive(Debug, Parser)]
#[command(name = "aegisctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Human-readable output instead of JSON.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log request and pagination details.
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Named credential profile to use.
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Interactive credential setup.
    Setup,
    /// Profile management.
    Profile {
        /// Profile action.
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Image inventory actions.
    Images {
        /// Image action.
        #[command(subcommand)]
        command: ImageCommands,
    },
    /// Registry repository actions.
    Repos {
        /// Repository action.
        #[command(subcommand)]
        command: RepoCommands,
    },
    /// VM inventory actions.
    Vm {
        /// VM action.
        #[command(subcommand)]
        command: VmCommands,
    },
    /// Application scope actions.
    Scopes {
        /// Scope action.
        #[command(subcommand)]
        command: ScopeCommands,
    },
    /// Supply Chain code repository actions.
    CodeRepos {
        /// Code repository action.
        #[command(subcommand)]
        command: CodeRepoCommands,
    },
}

/// Profile management subcommands.
#[derive(Debug, Subcommand)]
pub enum ProfileCommands {
    /// List all profiles.
    List,
    /// Show profile details (all profiles when no name is given).
    Info {
        /// Profile name.
        profile_name: Option<String>,
    },
    /// Delete a profile and its stored secret.
    Delete {
        /// Profile name.
        profile_name: String,
    },
    /// Set the default profile.
    SetDefault {
        /// Profile name.
        profile_name: String,
    },
}

/// Image subcommands.
#[derive(Debug, Subcommand)]
pub enum ImageCommands {
    /// Remove stale images, optionally from a CSV export (dry-run by default).
    Cleanup(ImageCleanupArgs),
    /// Delete stale images via the listing API (dry-run by default).
    Delete(ImageSelectArgs),
}

/// Stale-image selection shared by the image commands.
#[derive(Debug, Args)]
pub struct ImageSelectArgs {
    /// Actually delete; without this flag the run only reports.
    #[arg(long)]
    pub apply: bool,

    /// Only images older than this many days.
    #[arg(long, default_value_t = 90)]
    pub days: u32,

    /// Restrict to one registry.
    #[arg(long)]
    pub registry: Option<String>,

    /// Restrict to one application scope.
    #[arg(long)]
    pub scope: Option<String>,
}

/// Arguments for `images cleanup`.
#[derive(Debug, Args)]
pub struct ImageCleanupArgs {
    /// Selection criteria.
    #[command(flatten)]
    pub selection: ImageSelectArgs,

    /// CSV export (`image_id,image_name,registry_id,created`) to drive the
    /// run instead of the listing API.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Images per delete call in file mode.
    #[arg(long, default_value_t = 200)]
    pub batch_size: usize,
}

/// Repository subcommands.
#[derive(Debug, Subcommand)]
pub enum RepoCommands {
    /// Delete repositories (dry-run by default).
    Delete(RepoDeleteArgs),
}

/// Arguments for `repos delete`.
#[derive(Debug, Args)]
pub struct RepoDeleteArgs {
    /// Actually delete; without this flag the run only reports.
    #[arg(long)]
    pub apply: bool,

    /// Restrict to one registry.
    #[arg(long)]
    pub registry: Option<String>,

    /// Shorthand for `--registry "Host Images"`.
    #[arg(long, conflicts_with = "registry")]
    pub host_images: bool,

    /// Only delete repositories that hold no images.
    #[arg(long)]
    pub empty_only: bool,
}

/// VM subcommands.
#[derive(Debug, Subcommand)]
pub enum VmCommands {
    /// List VMs with optional client-side filters.
    List(VmListArgs),
    /// Count VMs, optionally with a coverage breakdown.
    Count(VmCountArgs),
}

/// Arguments for `vm list`.
#[derive(Debug, Args)]
pub struct VmListArgs {
    /// Restrict to one application scope (server-side).
    #[arg(long)]
    pub scope: Option<String>,

    /// Keep only VMs from this cloud provider.
    #[arg(long)]
    pub cloud: Option<String>,

    /// Keep only VMs from this region.
    #[arg(long)]
    pub region: Option<String>,

    /// Keep only VMs at this risk level.
    #[arg(long)]
    pub risk_level: Option<String>,

    /// Keep only VMs with no enforcer-class coverage.
    #[arg(long)]
    pub no_enforcer: bool,

    /// Write the filtered VMs to stdout as CSV.
    #[arg(long)]
    pub csv: bool,
}

/// Arguments for `vm count`.
#[derive(Debug, Args)]
pub struct VmCountArgs {
    /// Restrict to one application scope (server-side).
    #[arg(long)]
    pub scope: Option<String>,

    /// Fetch the full inventory and break counts down by coverage, cloud,
    /// and risk.
    #[arg(long)]
    pub breakdown: bool,
}

/// Scope subcommands.
#[derive(Debug, Subcommand)]
pub enum ScopeCommands {
    /// List all application scopes.
    List,
}

/// Code repository subcommands.
#[derive(Debug, Subcommand)]
pub enum CodeRepoCommands {
    /// List all code repositories.
    List,
    /// Count code repositories.
    Count,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn global_flags_parse_anywhere_in_the_argument_list() {
        let cli = Cli::parse_from([
            "aegisctl", "images", "cleanup", "--days", "30", "-v", "-p", "prod",
        ]);
        assert!(cli.verbose);
        assert!(!cli.debug);
        assert_eq!(cli.profile.as_deref(), Some("prod"));
        match cli.command {
            Commands::Images {
                command: ImageCommands::Cleanup(args),
            } => {
                assert_eq!(args.selection.days, 30);
                assert!(!args.selection.apply);
                assert_eq!(args.batch_size, 200);
                assert!(args.file.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn image_delete_defaults_to_dry_run_over_90_days() {
        let cli = Cli::parse_from(["aegisctl", "images", "delete"]);
        match cli.command {
            Commands::Images {
                command: ImageCommands::Delete(args),
            } => {
                assert!(!args.apply);
                assert_eq!(args.days, 90);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn repos_delete_parses_empty_only_and_apply() {
        let cli = Cli::parse_from([
            "aegisctl",
            "-d",
            "repos",
            "delete",
            "--registry",
            "Harbor",
            "--empty-only",
            "--apply",
        ]);
        assert!(cli.debug);
        match cli.command {
            Commands::Repos {
                command: RepoCommands::Delete(args),
            } => {
                assert!(args.apply);
                assert!(args.empty_only);
                assert_eq!(args.registry.as_deref(), Some("Harbor"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn host_images_is_shorthand_for_the_registry_name() {
        let cli = Cli::parse_from(["aegisctl", "repos", "delete", "--host-images"]);
        match cli.command {
            Commands::Repos {
                command: RepoCommands::Delete(args),
            } => {
                assert!(args.host_images);
                assert!(args.registry.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let conflict = Cli::try_parse_from([
            "aegisctl",
            "repos",
            "delete",
            "--host-images",
            "--registry",
            "Harbor",
        ]);
        assert!(conflict.is_err());
    }

    #[test]
    fn profile_set_default_uses_kebab_case() {
        let cli = Cli::parse_from(["aegisctl", "profile", "set-default", "staging"]);
        match cli.command {
            Commands::Profile {
                command: ProfileCommands::SetDefault { profile_name },
            } => assert_eq!(profile_name, "staging"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn vm_list_parses_risk_level_and_csv() {
        let cli = Cli::parse_from([
            "aegisctl",
            "vm",
            "list",
            "--risk-level",
            "critical",
            "--no-enforcer",
            "--csv",
        ]);
        match cli.command {
            Commands::Vm {
                command: VmCommands::List(args),
            } => {
                assert_eq!(args.risk_level.as_deref(), Some("critical"));
                assert!(args.no_enforcer);
                assert!(args.csv);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn vm_count_breakdown_flag_parses() {
        let cli = Cli::parse_from(["aegisctl", "vm", "count", "--breakdown", "--scope", "prod"]);
        match cli.command {
            Commands::Vm {
                command: VmCommands::Count(args),
            } => {
                assert!(args.breakdown);
                assert_eq!(args.scope.as_deref(), Some("prod"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
