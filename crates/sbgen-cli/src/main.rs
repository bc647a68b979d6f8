use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use sbgen_core::config::{self, CONFIG_FILE_NAME, SbgenConfig};
use sbgen_core::error::{ConfigError, SpecError};
use sbgen_core::ir::IrSpec;
use sbgen_core::{parse, transform};
use sbgen_spring::GenerateError;
use sbgen_spring::event::{self, GenerateEvent, GenerateResponse, Status};
use sbgen_spring::type_mapper::java_type;

#[derive(Parser)]
#[command(name = "sbgen", about = "Spring Boot project generator for OpenAPI 3.x", version)]
struct Cli {
    /// Config file to read instead of ./.sbgen.yaml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Spring Boot project from an OpenAPI spec
    Generate {
        /// Path to the OpenAPI spec file (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory for the generated project
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate an OpenAPI spec
    Validate {
        /// Path to the OpenAPI spec file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show the operations and method names that would be generated
    Inspect {
        /// Path to the OpenAPI spec file
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new sbgen configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Run a JSON generation event, as a function host would
    Invoke {
        /// Event file, or `-` for stdin
        #[arg(long, default_value = "-")]
        event: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(usage_exit_code(&err));
        }
    };

    let result = match cli.command {
        Commands::Generate { input, output } => cmd_generate(cli.config, input, output),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Invoke { event } => cmd_invoke(&event),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "sbgen", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Exit code for invalid command lines, kept apart from the input-error code.
const USAGE_EXIT_CODE: u8 = 64;

/// 0 for `--help` and `--version`, [`USAGE_EXIT_CODE`] for usage errors.
fn usage_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() { USAGE_EXIT_CODE } else { 0 }
}

/// 2 for input errors, 3 for write errors, 4 for internal defects, 1 otherwise.
fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(err) = err.downcast_ref::<GenerateError>() {
        return err.exit_code();
    }
    if err.downcast_ref::<SpecError>().is_some() || err.downcast_ref::<ConfigError>().is_some() {
        return 2;
    }
    1
}

/// Load the project config: an explicit path must exist, the default may not.
fn load_config(explicit: Option<PathBuf>) -> Result<SbgenConfig> {
    match explicit {
        Some(path) => config::load_config(&path)?.ok_or_else(|| {
            anyhow::Error::from(ConfigError::Invalid(format!(
                "config file {} not found",
                path.display()
            )))
        }),
        None => Ok(config::load_config(Path::new(CONFIG_FILE_NAME))?.unwrap_or_default()),
    }
}

fn load_ir(path: &Path) -> Result<IrSpec> {
    let doc = parse::load(path)?;
    Ok(transform::transform(&doc)?)
}

fn cmd_generate(
    config_path: Option<PathBuf>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let cfg = load_config(config_path)?;
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let output = output.unwrap_or_else(|| PathBuf::from(&cfg.output));

    eprintln!("Generating {} → {}", input.display(), output.display());
    match sbgen_spring::generate(&input, &output, &cfg.project) {
        Ok(report) => {
            for path in &report.written {
                eprintln!("  wrote {}", path.display());
            }
            eprintln!(
                "Generated {} files with {} operations in {}",
                report.written.len(),
                report.operations,
                report.output_dir.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if let GenerateError::Write(write) = &err {
                eprintln!("Written before the failure:");
                for path in &write.written {
                    eprintln!("  {}", path.display());
                }
            }
            Err(err.into())
        }
    }
}

fn cmd_validate(input: PathBuf) -> Result<ExitCode> {
    let doc = parse::load(&input)?;
    let title = doc
        .info
        .as_ref()
        .and_then(|info| info.title.as_deref())
        .unwrap_or("(untitled)");
    eprintln!("Valid OpenAPI spec: {title}");
    if let Some(version) = doc.info.as_ref().and_then(|info| info.version.as_deref()) {
        eprintln!("  Version: {version}");
    }
    eprintln!("  Paths: {}", doc.paths.len());

    let ir = transform::transform(&doc)?;
    eprintln!("  Operations: {}", ir.operations.len());
    if let Some(base) = &ir.base_path {
        eprintln!("  Base path: {base}");
    }

    eprintln!("Validation successful.");
    Ok(ExitCode::SUCCESS)
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<ExitCode> {
    let ir = load_ir(&input)?;
    let summary = build_inspect_summary(&ir);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{yaml}");
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{json}");
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn build_inspect_summary(ir: &IrSpec) -> serde_json::Value {
    let operations: Vec<serde_json::Value> = ir
        .operations
        .iter()
        .map(|named| {
            let op = &named.operation;
            let parameters: Vec<serde_json::Value> = op
                .parameters
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "name": p.name,
                        "in": p.location.as_str(),
                        "required": p.required,
                        "type": java_type(&p.type_hint, p.format.as_deref()),
                    })
                })
                .collect();
            serde_json::json!({
                "name": named.method_name,
                "method": op.method.as_str(),
                "path": op.path,
                "deprecated": op.deprecated,
                "tags": op.tags,
                "parameters": parameters,
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": ir.info.title,
            "version": ir.info.version,
        },
        "base_path": ir.base_path,
        "operations": operations,
    })
}

fn cmd_init(force: bool) -> Result<ExitCode> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_invoke(source: &str) -> Result<ExitCode> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read event from stdin")?;
        buf
    } else {
        fs::read_to_string(source).with_context(|| format!("failed to read {source}"))?
    };
    let response = match serde_json::from_str::<GenerateEvent>(&raw) {
        Ok(event) => event::handle(&event),
        Err(err) => GenerateResponse {
            status: Status::InputError,
            written: Vec::new(),
            error: Some(format!("invalid event: {err}")),
        },
    };
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(ExitCode::from(match response.status {
        Status::Ok => 0,
        Status::InputError => 2,
        Status::WriteError => 3,
        Status::InternalError => 4,
    }))
}
