// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sitewright")]
#[command(about = "Debian host provisioning for web application deployments")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new sitewright.yml configuration file
    Init {
        /// Domain for the nginx site and certificate
        #[arg(long)]
        domain: Option<String>,

        /// Contact email for certificate registration
        #[arg(long)]
        email: Option<String>,

        /// Local port the application listens on
        #[arg(long)]
        port: Option<u16>,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Provision the host: refresh indexes, install packages, configure SSL
    Provision,

    /// Install a single package with lock handling and retries
    Install {
        /// Debian package name
        package: String,
    },

    /// Configure nginx and request a Let's Encrypt certificate
    Ssl,

    /// Inspect or wait for package manager locks
    Locks {
        /// Wait for the locks to clear instead of a single check
        #[arg(long)]
        wait: bool,

        /// Wait timeout in seconds (defaults to lock_timeout from config)
        #[arg(long)]
        timeout: Option<u64>,
    },
}
