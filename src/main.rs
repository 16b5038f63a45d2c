mod catalog;
mod config;
mod git;
mod lock;
mod mirror;
mod provider;
mod sync;
mod types;

use clap::{Parser, Subcommand};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::git::GitCli;
use crate::mirror::Mirror;
use crate::provider::Provider;
use crate::sync::run_pass;

#[derive(Parser)]
#[command(
    name = "repokeep",
    about = "Keep local bare mirrors of a catalog of remote git repositories"
)]
struct Cli {
    /// Mirror root directory (defaults to ~/repos)
    #[arg(long, global = true)]
    root: Option<String>,

    /// Catalog database file (defaults to db.sqlite3)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone or update every cataloged repository
    Sync {
        /// Report planned actions without running git
        #[arg(long)]
        dry_run: bool,
    },

    /// List cataloged repositories and their mirror state
    List {
        /// Long format: include local path and remote URLs
        #[arg(short, long)]
        long: bool,
    },

    /// Check external dependencies
    Doctor,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::new(cli.root.as_deref(), cli.db.as_deref());

    let result = match cli.command {
        Commands::Sync { dry_run } => cmd_sync(config.with_dry_run(dry_run)),
        Commands::List { long } => cmd_list(&config, long),
        Commands::Doctor => cmd_doctor(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_sync(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let git = GitCli::new();

    let catalog = Catalog::open(&config.db_path)?;
    catalog.ensure_schema()?;

    let report = run_pass(&config, &catalog, &git)?;
    catalog.close()?;

    for failure in &report.failures {
        eprintln!("failed {}: {}", failure.identity, failure.reason);
    }
    println!("Sync pass finished: {}", report);

    if !report.is_clean() {
        return Err(format!("{} entries failed", report.failures.len()).into());
    }
    Ok(())
}

fn cmd_list(config: &Config, long: bool) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::open(&config.db_path)?;
    catalog.ensure_schema()?;

    let mut printed = 0usize;
    {
        let mut cursor = catalog.entries()?;
        for row in cursor.rows()? {
            let entry = row?;
            printed += 1;

            let key = match entry.repo_key() {
                Ok(key) => key,
                Err(e) => {
                    println!(
                        "{:<40} {:>8}",
                        format!("{}/{}", entry.user_name, entry.repo_name),
                        "invalid"
                    );
                    eprintln!("row {}: {}", entry.id, e);
                    continue;
                }
            };

            let mirror = Mirror::new(key, Provider::Github, &config.root);
            let state = if mirror.exists() { "cloned" } else { "missing" };

            println!("{:<40} {:>8}", mirror.key().to_string(), state);
            if long {
                println!("    path:  {}", mirror.local_path().display());
                println!("    https: {}", mirror.https_url());
                println!("    ssh:   {}", mirror.ssh_url());
            }
        }
    }

    if printed == 0 {
        println!("No repositories cataloged");
    }

    catalog.close()?;
    Ok(())
}

fn cmd_doctor(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("repokeep system check\n");

    let git_ok = GitCli::new().available();
    println!(
        "[{}] git: {}",
        if git_ok { "OK" } else { "FAIL" },
        if git_ok { "available" } else { "not found" }
    );

    let db_ok = config.db_path.exists();
    println!(
        "[{}] catalog: {}",
        if db_ok { "OK" } else { "INFO" },
        if db_ok {
            format!("{}", config.db_path.display())
        } else {
            format!(
                "{} (will be created on first sync)",
                config.db_path.display()
            )
        }
    );

    let root_ok = config.root.is_dir();
    println!(
        "[{}] mirror root: {}",
        if root_ok { "OK" } else { "INFO" },
        if root_ok {
            format!("{}", config.root.display())
        } else {
            format!(
                "{} (will be created on first clone)",
                config.root.display()
            )
        }
    );

    if !git_ok {
        std::process::exit(1);
    }

    Ok(())
}
