//! ipsetctl - atomic management of ipset hash sets.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use ipsetctl::cli::{Cli, Commands};
use ipsetctl::commands::{self, resolve_tool, warn_if_not_root};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if !matches!(cli.command, Commands::Version | Commands::Test { .. }) {
        warn_if_not_root();
    }

    let ipset = cli.ipset.as_deref();

    match cli.command {
        Commands::Create { name, spec } => commands::create::run(resolve_tool(ipset)?, &name, &spec),
        Commands::Add { name, entry, timeout } => {
            commands::add::run(resolve_tool(ipset)?, &name, &entry, timeout)
        }
        Commands::Del { name, entry } => commands::del::run(resolve_tool(ipset)?, &name, &entry),
        Commands::Test { name, entry } => {
            // 1 means absent, 2 means the check itself failed
            match resolve_tool(ipset).and_then(|tool| commands::test::run(tool, &name, &entry)) {
                Ok(true) => Ok(()),
                Ok(false) => std::process::exit(1),
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    std::process::exit(2);
                }
            }
        }
        Commands::Flush { name } => commands::flush::run(resolve_tool(ipset)?, &name),
        Commands::Destroy { name } => commands::destroy::run(resolve_tool(ipset)?, &name),
        Commands::Swap { from, to } => commands::swap::run(resolve_tool(ipset)?, &from, &to),
        Commands::Refresh { name, file, spec, lock_dir } => {
            commands::refresh::run(resolve_tool(ipset)?, &name, &file, &spec, &lock_dir)
        }
        Commands::Sync => commands::sync::run(&cli.config, ipset),
        Commands::Version => {
            println!("ipsetctl {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
