use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use filehash_cli::config::{AppConfig, ConfigManager, get_config};
use filehash_cli::error::{CliError, exit_code_for};
use filehash_cli::intake;
use filehash_cli::orchestrators::hash_orchestrator::{
    HashOptions, InterruptGuard, RenderOptions, apply_combiner_override, hash_paths,
    print_problems, render_run,
};
use filehash_cli::orchestrators::session_shell;
use filehash_cli::output::OutputFormat;
use filehash_cli::progress::{format_throughput, throughput_mbps};
use filehash_cli::terminal;
use filehash_core::error::ValidationError;
use filehash_core::format::{format_duration, format_file_size, pluralize};
use filehash_core::hashing::registry;
use filehash_core::{HashAlgorithm, HashCalculator, HashConfig, StrategyHint};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "filehash")]
#[command(author, version, about = "Filehash - Multi-algorithm file hashing", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate digests for one or more files
    Hash {
        /// Files to hash
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Hash algorithm to use (can be specified multiple times)
        #[arg(short, long = "algorithm", value_name = "NAME")]
        algorithms: Vec<String>,

        /// Algorithm used for the combined hash
        #[arg(long, value_name = "NAME")]
        combiner: Option<String>,

        /// Output format (defaults to output.default_format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Handlebars template used with --format template
        #[arg(long)]
        template: Option<String>,

        /// Also write .txt and .csv exports into this directory
        #[arg(long, value_name = "DIR")]
        export_dir: Option<PathBuf>,

        /// Hashing strategy
        #[arg(long, value_enum, default_value = "auto")]
        strategy: StrategyArg,

        /// Disable progress bar display
        #[arg(long)]
        no_progress: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// List supported hash algorithms
    Algorithms,

    /// Check a file against an expected digest
    Verify {
        /// File to check
        file: PathBuf,

        /// Expected digest in hex
        expected: String,

        /// Hash algorithm (defaults to engine.default_algorithm)
        #[arg(short, long, value_name = "NAME")]
        algorithm: Option<String>,
    },

    /// Start an interactive hashing session
    Session {
        /// Disable progress bar display
        #[arg(long)]
        no_progress: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., engine.chunk_size)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., engine.chunk_size)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration values
    List,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    Auto,
    Sequential,
    Parallel,
}

impl From<StrategyArg> for StrategyHint {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => StrategyHint::Automatic,
            StrategyArg::Sequential => StrategyHint::PreferSequential,
            StrategyArg::Parallel => StrategyHint::PreferParallel,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let debug = cli.debug;

    // Initialize logging based on debug flag
    if debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("filehash_core", log::LevelFilter::Debug)
            .filter_module("filehash_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if let Err(e) = run(cli.command).await {
        match e.downcast_ref::<CliError>() {
            Some(cli_error) => eprint!("{}", cli_error.format_for_user(debug)),
            None => eprintln!("{}", format!("Error: {e:#}").red()),
        }
        std::process::exit(exit_code_for(&e) as i32);
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Hash {
            files,
            algorithms,
            combiner,
            format,
            template,
            export_dir,
            strategy,
            no_progress,
            no_color,
        } => {
            let mut config = load_config()?;
            config.apply_cli_overrides(no_color, no_progress);
            apply_combiner_override(&mut config.engine, combiner.as_deref())?;

            let format = match format {
                Some(format) => format,
                None => OutputFormat::from_string(&config.output.default_format)?,
            };
            if format == OutputFormat::Template && template.is_none() {
                return Err(CliError::misuse("--format template requires --template").into());
            }

            let algorithms = if algorithms.is_empty() {
                vec![config.engine.default_algorithm().display_name().to_string()]
            } else {
                algorithms
            };

            hash_command(
                config,
                HashOptions {
                    paths: files,
                    algorithms,
                    strategy: strategy.into(),
                    show_progress: false,
                },
                format,
                template,
                export_dir,
            )
            .await?;
        }
        Commands::Algorithms => {
            algorithms_command()?;
        }
        Commands::Verify {
            file,
            expected,
            algorithm,
        } => {
            verify_command(load_config()?, file, expected, algorithm).await?;
        }
        Commands::Session {
            no_progress,
            no_color,
        } => {
            let mut config = load_config()?;
            config.apply_cli_overrides(no_color, no_progress);
            apply_color_choice(&config);
            session_shell::run(config).await?;
        }
        Commands::Config { command } => {
            config_command(command)?;
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    get_config().context("Failed to load configuration")
}

fn apply_color_choice(config: &AppConfig) -> bool {
    let use_color = terminal::should_use_color(config.output.color_enabled);
    if !use_color {
        colored::control::set_override(false);
    }
    use_color
}

async fn hash_command(
    config: AppConfig,
    mut options: HashOptions,
    format: OutputFormat,
    template: Option<String>,
    export_dir: Option<PathBuf>,
) -> Result<()> {
    let use_color = apply_color_choice(&config);
    options.show_progress = terminal::should_show_progress(config.output.progress_enabled);
    log::debug!(
        "Hashing {} with {:?} ({:?})",
        pluralize(options.paths.len(), "path", None),
        options.algorithms,
        options.strategy
    );

    let run = hash_paths(&config.engine, &options, &InterruptGuard::install()).await?;
    print_problems(&run);
    run.ensure_hashed()?;

    render_run(
        &run,
        &RenderOptions {
            format,
            template,
            use_color,
            interactive: terminal::is_interactive(),
            export_dir,
            export_filename_template: config.output.export_filename_template.clone(),
        },
    )?;

    if terminal::is_interactive() {
        let bytes = run.bytes_hashed();
        eprintln!(
            "{} Hashed {} ({}) in {} ({})",
            "✓".green(),
            pluralize(run.report.appended.len(), "file", None),
            format_file_size(bytes),
            format_duration(run.elapsed.as_secs_f64()),
            format_throughput(throughput_mbps(bytes, run.elapsed))
        );
    }

    Ok(())
}

fn algorithms_command() -> Result<()> {
    let default = load_config()
        .map(|config| config.engine.default_algorithm())
        .unwrap_or(HashAlgorithm::DEFAULT);

    println!("{:<10} {:<10} {:>5}", "ID", "NAME", "BITS");
    for entry in registry::entries() {
        let marker = if entry.algorithm == default {
            " (default)"
        } else {
            ""
        };
        println!(
            "{:<10} {:<10} {:>5}{marker}",
            entry.id,
            entry.display_name,
            entry.output_len * 8
        );
    }

    Ok(())
}

async fn verify_command(
    config: AppConfig,
    file: PathBuf,
    expected: String,
    algorithm: Option<String>,
) -> Result<()> {
    let algorithm = match algorithm {
        Some(name) => name
            .parse::<HashAlgorithm>()
            .map_err(CliError::from_core)?,
        None => config.engine.default_algorithm(),
    };

    let max = config.engine.max_file_size;
    let record = intake::read_file(&file, max)
        .await
        .map_err(|e| CliError::from_core(e.into()))?;
    if record.payload.len() as u64 != record.size {
        return Err(CliError::from_validation(&ValidationError::FileTooLarge {
            size: record.size,
            max,
        })
        .with_context("path", &file.display().to_string())
        .into());
    }

    let calculator =
        HashCalculator::new().with_config(HashConfig::with_chunk_size(config.engine.chunk_size));
    let payload = record.payload.clone();
    let matches = tokio::task::spawn_blocking(move || {
        calculator.verify(&payload, algorithm, &expected)
    })
    .await
    .context("Verification task failed")?
    .map_err(CliError::from_core)?;

    if matches {
        println!(
            "{} {}: {} OK",
            "✓".green(),
            record.name,
            algorithm.display_name()
        );
        Ok(())
    } else {
        println!(
            "{} {}: {} MISMATCH",
            "✗".red(),
            record.name,
            algorithm.display_name()
        );
        Err(CliError::general("Digest does not match").into())
    }
}

fn config_command(command: ConfigCommand) -> Result<()> {
    let mut manager = ConfigManager::new();

    match command {
        ConfigCommand::Get { key } => {
            println!("{}", manager.get(&key)?);
        }
        ConfigCommand::Set { key, value } => {
            manager.set(&key, &value)?;
            eprintln!("{}", format!("Set {key} = {value}").green());
            eprintln!(
                "Configuration saved to: {}",
                manager.get_config_path().display()
            );
        }
        ConfigCommand::List => {
            let items = manager.list()?;
            eprintln!("{}", "Configuration:".bold().blue());
            eprintln!("Config file: {}", manager.get_config_path().display());
            eprintln!();

            // Group items by section
            let mut sections: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
            for (key, value) in items {
                let (section, name) = key.split_once('.').unwrap_or(("general", key.as_str()));
                sections
                    .entry(section.to_string())
                    .or_default()
                    .push((name.to_string(), value));
            }

            for (section, items) in sections {
                println!("[{}]", section.yellow());
                for (key, value) in items {
                    println!("  {} = {}", key.cyan(), value);
                }
                println!();
            }
        }
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
