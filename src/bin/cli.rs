use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rn_ci_gen::prelude::*;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rn-ci-gen")]
#[command(about = "Generate CI pipelines for React Native projects", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a pipeline from a preset or config file
    Generate {
        /// Preset kind (overrides `kind` in the config file)
        #[arg(value_name = "PRESET")]
        preset: Option<String>,

        /// Path to a JSON or YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file (default: <DIR>/.github/workflows/<kind>.yaml or <DIR>/bitrise.yml)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base directory for the default output path
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Print the YAML to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,

        /// Also run yamllint (and bitrise validate for Bitrise output)
        #[arg(long)]
        lint: bool,
    },

    /// List available presets
    ListPresets,

    /// Print the secrets a config requires
    Secrets {
        /// Path to a JSON or YAML config file
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Check a generated pipeline file
    Validate {
        /// Path to the generated YAML file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Target CI system (default: bitrise for bitrise.yml, otherwise github)
        #[arg(short, long, value_parser = ["github", "bitrise"])]
        platform: Option<String>,

        /// Run yamllint and bitrise validate in addition to the structure check
        #[arg(long)]
        external: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "rn_ci_gen=debug"
    } else {
        "rn_ci_gen=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            tracing::debug!(error = ?e, "Command failed");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let generator = Generator::default();

    match cli.command {
        Commands::Generate {
            preset,
            config,
            output,
            dir,
            stdout,
            lint,
        } => generate(&generator, preset, config, output, dir, stdout, lint).await,
        Commands::ListPresets => list_presets(&generator),
        Commands::Secrets { config } => secrets(&generator, &config),
        Commands::Validate {
            file,
            platform,
            external,
        } => validate(file, platform, external).await,
    }
}

/// Raw config from the file and/or positional preset
fn load_config(preset: Option<String>, config: Option<&Path>) -> anyhow::Result<Value> {
    let mut value = match config {
        Some(path) => ConfigLoader::load_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Value::Object(Default::default()),
    };

    if let Some(kind) = preset {
        match value.as_object_mut() {
            Some(map) => {
                map.insert("kind".to_string(), Value::String(kind));
            }
            None => anyhow::bail!("Config file must contain an object"),
        }
    } else if config.is_none() {
        anyhow::bail!("Either a preset or --config is required");
    }
    Ok(value)
}

async fn generate(
    generator: &Generator,
    preset: Option<String>,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    dir: PathBuf,
    stdout: bool,
    lint: bool,
) -> anyhow::Result<bool> {
    let value = load_config(preset, config.as_deref())?;

    let result = match generator.generate_value(value) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(false);
        }
    };

    if lint {
        let options = LintOptions {
            yamllint: true,
            bitrise: result.platform == CiPlatform::Bitrise,
        };
        if let Err(e) = validate_async(&result.yaml, result.platform, &options).await {
            eprintln!("Error: {}", e);
            return Ok(false);
        }
    }

    if stdout {
        print!("{}", result.yaml);
        eprintln!("\n{}", result.secrets_summary);
        return Ok(true);
    }

    let path = output.unwrap_or_else(|| dir.join(result.default_path()));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, &result.yaml)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✓ Wrote {} ({})", path.display(), result.platform.as_str());
    println!("\n{}", result.secrets_summary);
    Ok(true)
}

fn list_presets(generator: &Generator) -> anyhow::Result<bool> {
    println!("Available presets:\n");
    for kind in generator.available_presets() {
        println!("  {}", kind);
    }
    Ok(true)
}

fn secrets(generator: &Generator, config: &Path) -> anyhow::Result<bool> {
    let value = load_config(None, Some(config))?;
    match generator.generate_value(value) {
        Ok(result) => {
            println!("{}", result.secrets_summary);
            Ok(true)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Ok(false)
        }
    }
}

async fn validate(file: PathBuf, platform: Option<String>, external: bool) -> anyhow::Result<bool> {
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }

    let platform = match platform.as_deref() {
        Some("bitrise") => CiPlatform::Bitrise,
        Some(_) => CiPlatform::Github,
        None => infer_platform(&file),
    };

    let yaml = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let result = if external {
        validate_async(&yaml, platform, &LintOptions::all()).await
    } else {
        validate_sync(&yaml, platform)
    };

    match result {
        Ok(_) => {
            println!("✓ {} is valid ({})", file.display(), platform.as_str());
            Ok(true)
        }
        Err(e) => {
            eprintln!("✗ {}: {}", file.display(), e);
            Ok(false)
        }
    }
}

fn infer_platform(file: &Path) -> CiPlatform {
    let is_bitrise = file
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("bitrise"));
    if is_bitrise {
        CiPlatform::Bitrise
    } else {
        CiPlatform::Github
    }
}
