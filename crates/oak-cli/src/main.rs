use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use oak_core::config::{self, CONFIG_FILE_NAME, OakConfig, TargetSelection};
use oak_core::normalize;
use oak_core::parse::parameter::ParameterLocation;
use oak_core::{EmitContext, Emitter, GeneratedFile, IndexedOperation, index_operations};
use oak_mock_data::MockDataEmitter;
use oak_react_query::HooksEmitter;
use oak_typescript::{ApiClientEmitter, TypeDefinitionsEmitter};

#[derive(Parser)]
#[command(name = "oak", about = "OpenAPI 3.x to TypeScript generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate TypeScript artifacts from an OpenAPI document
    Generate(GenerateArgs),

    /// Print the operation index of an OpenAPI document
    Inspect {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new oak configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Path to the OpenAPI document (YAML or JSON)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory the artifacts are written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Generate type definitions
    #[arg(long)]
    types: bool,

    /// Generate the API client
    #[arg(long)]
    api_client: bool,

    /// Generate mock response data
    #[arg(long)]
    mock_data: bool,

    /// Generate React Query hooks
    #[arg(long)]
    react_query: bool,

    /// Seed for reproducible mock data
    #[arg(long)]
    seed: Option<u64>,

    /// How many times one $ref may be expanded while generating a mock value
    #[arg(long)]
    cycle_limit: Option<usize>,
}

impl GenerateArgs {
    fn targets(&self) -> TargetSelection {
        TargetSelection {
            types: self.types,
            api_client: self.api_client,
            mock_data: self.mock_data,
            react_query: self.react_query,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => cmd_generate(args),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oak", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<OakConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let config = config::load_config(&config_path)?;
    if config.is_some() {
        log::debug!("loaded {}", config_path.display());
    }
    Ok(config)
}

/// Write generated files to disk under the given base directory.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = args
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.input));
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.output));

    // Flags on the command line replace the configured selection.
    let requested = if args.targets() == TargetSelection::default() {
        cfg.targets
    } else {
        args.targets()
    };
    let targets = requested.resolve();
    let seed = args.seed.or(cfg.mock.seed);
    let cycle_limit = args.cycle_limit.unwrap_or(cfg.mock.cycle_limit);

    let document = normalize::normalize_file(&input).with_context(|| {
        format!(
            "OpenAPI document at {} could not be parsed. Make sure it exists and is valid",
            input.display()
        )
    })?;
    let operations = index_operations(&document);
    let imports = cfg.files.import_paths();
    let ctx = EmitContext {
        document: &document,
        operations: &operations,
        imports: &imports,
    };

    let mut selected: Vec<(Box<dyn Emitter>, &str)> = Vec::new();
    if targets.types {
        selected.push((Box::new(TypeDefinitionsEmitter), &cfg.files.type_definitions));
    }
    if targets.api_client {
        selected.push((Box::new(ApiClientEmitter::new()), &cfg.files.api_client));
    }
    if targets.mock_data {
        let emitter = MockDataEmitter::new(seed).with_cycle_limit(cycle_limit);
        selected.push((Box::new(emitter), &cfg.files.mock_data));
    }
    if targets.react_query {
        selected.push((Box::new(HooksEmitter::new()), &cfg.files.react_query));
    }

    let files: Vec<GeneratedFile> = selected
        .iter_mut()
        .map(|(emitter, file_name)| emitter.generate(&ctx, *file_name))
        .collect();

    fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;
    write_files(&output_dir, &files)?;

    eprintln!(
        "Generated {} files for {} operations in {}",
        files.len(),
        operations.len(),
        output_dir.display()
    );
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<()> {
    let document = normalize::normalize_file(&input)
        .with_context(|| format!("failed to load {}", input.display()))?;
    let operations = index_operations(&document);

    let summary = serde_json::json!({
        "info": {
            "title": document.info.title,
            "version": document.info.version,
            "openapi": document.openapi,
        },
        "operations": operations.iter().map(operation_summary).collect::<Vec<_>>(),
    });

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn operation_summary(op: &IndexedOperation) -> serde_json::Value {
    let parameters: Vec<serde_json::Value> = op
        .parameters
        .iter()
        .filter(|p| matches!(p.location, ParameterLocation::Path | ParameterLocation::Query))
        .map(|p| {
            serde_json::json!({
                "name": p.name,
                "in": p.location.as_str(),
                "required": p.is_required(),
            })
        })
        .collect();
    let responses: Vec<&str> = op.json_responses().map(|(status, _)| status).collect();

    serde_json::json!({
        "operation_id": op.operation_id(),
        "method": op.method.as_str(),
        "path": op.path,
        "type_name": op.name.type_name,
        "value_name": op.name.value_name,
        "parameters": parameters,
        "request_body": op.request_body.as_ref().map(|b| &b.content_type),
        "json_responses": responses,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
