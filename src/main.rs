use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use modscan::{
    checker::{version, NvdIndex, OsvResolver},
    config::Config,
    exposure::ExposureChecker,
    input,
    model::{AdvisoryFact, Verdict},
    output::{format_report, print_report, OutputFormat},
    repo::GithubSource,
};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Exit codes for CI integration
mod exit_codes {
    pub const SAFE: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const VULNERABLE: u8 = 2;
    pub const INCONCLUSIVE: u8 = 3;
}

#[derive(Parser)]
#[command(name = "modscan")]
#[command(
    author,
    version,
    about = "Check whether a Go repository is exposed to a known vulnerable module version"
)]
struct Cli {
    /// Output format (text, json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Enable debug-level logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a repository against a CVE
    Cve {
        /// GitHub repository URL
        repo_url: String,
        /// CVE identifier (CVE-YYYY-XXXX)
        cve_id: String,
    },

    /// Check a repository against a Go advisory ID
    Go {
        /// GitHub repository URL
        repo_url: String,
        /// Go advisory identifier (GO-YYYY-NNNN)
        go_id: String,
    },

    /// Check a repository against a package and fixed version directly
    Pkg {
        /// GitHub repository URL
        repo_url: String,
        /// Module path of the vulnerable package
        package: String,
        /// Version the vulnerability is fixed in
        fixed_version: String,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();

    init_tracing(cli.verbose || config.verbose);

    let format_str = cli.format.clone().unwrap_or(config.default_format.clone());
    let format = OutputFormat::from_str(&format_str).map_err(|e| anyhow::anyhow!(e))?;
    let is_interactive = format == OutputFormat::Text && cli.output.is_none();

    match cli.command {
        Commands::Cve { repo_url, cve_id } => {
            let repo_url = input::validate_repo_url(&repo_url)?;
            let cve_id = input::validate_cve(&cve_id)?;

            let progress = spinner(is_interactive, "Resolving advisory...");

            let nvd = NvdIndex::new(&config);
            if !nvd.exists(&cve_id).await? {
                if let Some(pb) = progress {
                    pb.finish_and_clear();
                }
                anyhow::bail!("CVE ID not found in NVD database");
            }

            let resolver = OsvResolver::new(&config);
            let go_id = resolver.resolve_go_id(&cve_id).await?;
            tracing::debug!(%go_id, "resolved Go advisory ID");

            let fact = resolver.resolve_fact(&go_id).await?;
            finish_resolution(progress, &fact);

            check_exposure(&config, &repo_url, &fact, format, cli.output, is_interactive).await
        }

        Commands::Go { repo_url, go_id } => {
            let repo_url = input::validate_repo_url(&repo_url)?;
            let go_id = input::validate_go_id(&go_id)?;

            let progress = spinner(is_interactive, "Resolving advisory...");

            let resolver = OsvResolver::new(&config);
            let fact = resolver.resolve_fact(&go_id).await?;
            finish_resolution(progress, &fact);

            check_exposure(&config, &repo_url, &fact, format, cli.output, is_interactive).await
        }

        Commands::Pkg {
            repo_url,
            package,
            fixed_version,
        } => {
            let repo_url = input::validate_repo_url(&repo_url)?;
            let fixed_version = version::normalize(&fixed_version)?;
            let fact = AdvisoryFact {
                advisory_id: String::new(),
                package,
                fixed_version,
            };

            check_exposure(&config, &repo_url, &fact, format, cli.output, is_interactive).await
        }

        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SAFE)
        }
    }
}

async fn check_exposure(
    config: &Config,
    repo_url: &str,
    fact: &AdvisoryFact,
    format: OutputFormat,
    output_file: Option<String>,
    is_interactive: bool,
) -> Result<u8> {
    let progress = spinner(is_interactive, "Checking repository dependencies...");

    let checker = ExposureChecker::new(GithubSource::new(config));
    let report = checker
        .check(repo_url, &fact.package, &fact.fixed_version)
        .await?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    if let Some(path) = output_file {
        std::fs::write(&path, format_report(&report, format)?)?;
        if is_interactive {
            println!("Report written to: {}", path);
        }
    } else {
        print_report(&report, format)?;
    }

    Ok(match report.verdict {
        Verdict::Inconclusive => exit_codes::INCONCLUSIVE,
        v if v.is_vulnerable() => exit_codes::VULNERABLE,
        _ => exit_codes::SAFE,
    })
}

fn finish_resolution(progress: Option<ProgressBar>, fact: &AdvisoryFact) {
    tracing::debug!(package = %fact.package, fixed = %fact.fixed_version, "resolved advisory fact");
    if let Some(pb) = progress {
        pb.finish_with_message(format!(
            "Advisory {}: {} fixed in {}",
            fact.advisory_id, fact.package, fact.fixed_version
        ));
    }
}

fn spinner(is_interactive: bool, message: &str) -> Option<ProgressBar> {
    if !is_interactive {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    Some(pb)
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "modscan=debug" } else { "modscan=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    // Show current config
    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'modscan config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
