use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use colored::Colorize;
use devurls::config::{project_config_path, save_config, user_config_path};
use devurls::{
    Config, ConfigOverrides, Detection, EnvFileOutcome, ExportFormat, LoadedConfig, ProcessEnv,
    SyncReport, Updater, format_urls, load_config, logging,
};
use std::env;
use std::path::{Path, PathBuf};

/// Main CLI structure for the devurls application.
///
/// Without a subcommand, devurls runs `sync`, which is what workspace
/// start-up tasks are expected to call.
#[derive(Parser)]
#[command(name = "devurls")]
#[command(about = "Record cloud workspace dev-server URLs in your .env file", long_about = None)]
struct Cli {
    /// Configuration file to use instead of devurls.toml or the user config
    #[arg(short, long, global = true, env = "DEVURLS_CONFIG")]
    config: Option<PathBuf>,
    /// Print diagnostic logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    /// The subcommand to execute
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Append the derived URLs to the env file unless already present
    Sync(SyncArgs),
    /// Print the derived URLs without writing any file
    Urls {
        /// Environment variable holding the workspace URL
        #[arg(long)]
        var: Option<String>,
        /// Print `export KEY="URL"` lines for use with eval
        #[arg(long, conflicts_with = "json")]
        export: bool,
        /// Print a JSON object
        #[arg(long)]
        json: bool,
    },
    /// Manage devurls configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Default)]
struct SyncArgs {
    /// Env file to update
    #[arg(short, long)]
    env_file: Option<PathBuf>,
    /// Environment variable holding the workspace URL
    #[arg(long)]
    var: Option<String>,
    /// How an existing entry is detected: substring or key
    #[arg(short, long)]
    detection: Option<Detection>,
    /// Also write the admin login summary file
    #[arg(long, conflicts_with = "no_summary")]
    summary: bool,
    /// Do not write the summary file, even if configured
    #[arg(long)]
    no_summary: bool,
    /// Where to write the summary file
    #[arg(long)]
    summary_path: Option<PathBuf>,
    /// Create the env file if it does not exist
    #[arg(long)]
    create: bool,
}

impl SyncArgs {
    fn overrides(self) -> ConfigOverrides {
        let summary = match (self.summary, self.no_summary) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        ConfigOverrides {
            env_var: self.var,
            env_file: self.env_file,
            detection: self.detection,
            summary,
            summary_path: self.summary_path,
            create_missing: self.create,
        }
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Create a configuration file interactively
    Init {
        /// Write the user configuration instead of ./devurls.toml
        #[arg(long)]
        global: bool,
    },
    /// Show the effective configuration and where it came from
    Show,
}

fn load(explicit: Option<&Path>, project_dir: &Path) -> Result<LoadedConfig> {
    let user_path = user_config_path().ok();
    load_config(explicit, project_dir, user_path.as_deref())
        .wrap_err("Failed to load devurls configuration")
}

fn print_report(report: &SyncReport) {
    if report.created_env_file {
        println!("{} Created {}", "✓".green(), report.env_file.display());
    }

    match report.outcome {
        EnvFileOutcome::Appended => {
            println!(
                "{} Appended {} entries to {}",
                "✓".green(),
                report.urls.len(),
                report.env_file.display()
            );
            for url in &report.urls {
                println!("  {}", url.entry().cyan());
            }
        }
        EnvFileOutcome::AlreadyPresent => {
            println!(
                "{} {} already present in {}, not modifying file",
                "✓".green(),
                report.sentinel.bold(),
                report.env_file.display()
            );
        }
    }

    if let Some(summary) = &report.summary {
        println!("{} Wrote login summary to {}", "✓".green(), summary.display());
    }
}

fn config_init(path: &Path) -> devurls::Result<()> {
    use inquire::{Confirm, Select, Text};

    if path.exists() {
        let overwrite = Confirm::new(&format!("{} already exists. Overwrite?", path.display()))
            .with_default(false)
            .prompt()?;

        if !overwrite {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let mut config = Config::default();

    config.workspace.env_var =
        Text::new("Environment variable holding the workspace URL:")
            .with_default(&config.workspace.env_var)
            .prompt()?;

    config.env_file.path = PathBuf::from(
        Text::new("Env file to update:")
            .with_default(".env")
            .prompt()?,
    );

    let detection = Select::new(
        "How should an existing entry be detected?",
        vec!["substring", "key"],
    )
    .with_help_message("'substring' matches any line mentioning the key, 'key' only KEY=VALUE entries")
    .prompt()?;
    config.env_file.detection = detection.parse()?;

    config.summary.enabled = Confirm::new("Write an admin login summary file on every run?")
        .with_default(false)
        .prompt()?;

    save_config(path, &config)?;
    println!("\n{} Configuration saved to {}", "✓".green(), path.display());
    Ok(())
}

/// Main entry point for the devurls CLI application.
fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let project_dir = env::current_dir().wrap_err("Failed to determine working directory")?;
    let explicit = cli.config.as_deref();

    match cli
        .command
        .unwrap_or_else(|| Commands::Sync(SyncArgs::default()))
    {
        Commands::Sync(args) => {
            let mut loaded = load(explicit, &project_dir)?;
            args.overrides().apply(&mut loaded.config);

            let updater = Updater::new(loaded.config).wrap_err("Invalid configuration")?;
            let report = updater
                .run(&ProcessEnv)
                .wrap_err("Failed to sync workspace URLs")?;
            print_report(&report);
            Ok(())
        }
        Commands::Urls { var, export, json } => {
            let mut loaded = load(explicit, &project_dir)?;
            ConfigOverrides {
                env_var: var,
                ..ConfigOverrides::default()
            }
            .apply(&mut loaded.config);

            let format = if json {
                ExportFormat::Json
            } else if export {
                ExportFormat::Shell
            } else {
                ExportFormat::Dotenv
            };

            let updater = Updater::new(loaded.config).wrap_err("Invalid configuration")?;
            let urls = updater
                .derive(&ProcessEnv)
                .wrap_err("Failed to derive workspace URLs")?;
            print!("{}", format_urls(&urls, format)?);
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { global } => {
                let path = if global {
                    user_config_path()?
                } else {
                    project_config_path(&project_dir)
                };
                config_init(&path).wrap_err("Failed to initialize configuration")
            }
            ConfigAction::Show => {
                let loaded = load(explicit, &project_dir)?;
                println!("Configuration: {}\n", loaded.source);
                print!("{}", toml::to_string_pretty(&loaded.config)?);
                Ok(())
            }
        },
    }
}
