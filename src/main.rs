// ABOUTME: Entry point for the sitewright CLI application.
// ABOUTME: Parses arguments and dispatches to the provisioning components.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use sitewright::apt::{DEFAULT_LOCK_TIMEOUT, LockWaiter, PackageInstaller};
use sitewright::config::{self, DeployConfig};
use sitewright::error::{Error, Result};
use sitewright::logger::Logger;
use sitewright::process::HostExecutor;
use sitewright::ssl::SslProvisioner;
use sitewright::types::PackageName;
use std::env;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init {
            domain,
            email,
            port,
            force,
        } => {
            let cwd = env::current_dir().expect("Failed to get current directory");
            config::init_config(&cwd, domain.as_deref(), email.as_deref(), port, force)
        }
        Commands::Provision => {
            let cwd = env::current_dir().expect("Failed to get current directory");
            let config = DeployConfig::discover(&cwd)?;
            provision(config).await
        }
        Commands::Install { package } => {
            let package =
                PackageName::new(&package).map_err(|e| Error::InvalidConfig(e.to_string()))?;
            install(&package).await
        }
        Commands::Ssl => {
            let cwd = env::current_dir().expect("Failed to get current directory");
            let config = DeployConfig::discover(&cwd)?;
            ssl(config).await
        }
        Commands::Locks { wait, timeout } => locks(wait, timeout).await,
    }
}

fn init_logger(config: Option<&DeployConfig>) -> Logger {
    match config.and_then(|c| c.log_file.as_deref()) {
        Some(path) => Logger::file_backed(path),
        None => Logger::init(),
    }
}

/// Run the full provisioning sequence against the local host.
async fn provision(config: DeployConfig) -> Result<()> {
    let logger = init_logger(Some(&config));
    let host = gethostname::gethostname();
    logger.log(
        &format!("Provisioning {}...", host.to_string_lossy()),
        "🚀",
    );

    let executor = HostExecutor::new();
    let installer = PackageInstaller::new(&executor, &logger);

    installer.update_packages().await?;

    for package in config.packages.iter() {
        installer.install_package(package).await?;
    }

    let provisioner = SslProvisioner::new(&executor, &logger, &config);
    if !provisioner.setup_ssl().await? {
        logger.warning("Continuing without SSL");
    }

    logger.success("Provisioning complete");
    Ok(())
}

/// Install a single package with the usual lock handling.
async fn install(package: &PackageName) -> Result<()> {
    let logger = Logger::init();
    let executor = HostExecutor::new();
    let installer = PackageInstaller::new(&executor, &logger);

    installer.install_package(package).await?;
    Ok(())
}

/// Run the SSL step alone.
async fn ssl(config: DeployConfig) -> Result<()> {
    let logger = init_logger(Some(&config));
    let executor = HostExecutor::new();
    let provisioner = SslProvisioner::new(&executor, &logger, &config);

    if !provisioner.setup_ssl().await? {
        logger.warning("SSL setup incomplete");
    }
    Ok(())
}

/// Report lock indicator state, or wait for the locks to clear.
async fn locks(wait: bool, timeout: Option<u64>) -> Result<()> {
    let logger = Logger::init();
    let executor = HostExecutor::new();
    let waiter = LockWaiter::new(&executor, &logger);

    if wait {
        let cwd = env::current_dir().expect("Failed to get current directory");
        let timeout = timeout
            .map(Duration::from_secs)
            .or_else(|| DeployConfig::discover(&cwd).ok().map(|c| c.lock_timeout))
            .unwrap_or(DEFAULT_LOCK_TIMEOUT);
        waiter.wait_for_locks(timeout).await;
    } else if waiter.check_locks().await {
        logger.warning("Package manager locks are held");
    } else {
        logger.success("No package manager locks held");
    }

    Ok(())
}
