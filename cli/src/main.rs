use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use type2cli_core::{SchemaPackage, TypeSchema};
use type2cli_extract::bundle::{bundle_schema_files, collect_schema_paths, load_and_validate_schemas};
use type2cli_extract::output::{OutputFormat, format_package, format_schema};
use type2cli_extract::source::{collect_source_paths, read_sources};
use type2cli_extract::{GeneratorConfig, ensure_documented, extract_package};

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "type2cli")]
#[command(version, about = "Extract subcommand schemas from Rust types")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract schemas for one or more types from Rust source.
    Extract(ExtractArgs),
    /// Validate one or more schema or package JSON files.
    Validate(ValidateArgs),
    /// Bundle schema JSON files into a SchemaPackage file.
    Bundle(BundleArgs),
    /// Run an extraction described by a YAML config file.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Comma-separated type names (e.g. Bar,Repo).
    #[arg(long, short = 't')]
    types: String,
    /// Source files and/or directories to scan.
    #[arg(default_value = ".")]
    inputs: Vec<PathBuf>,
    /// Descend into subdirectories.
    #[arg(long, short = 'r')]
    recursive: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Directory to write one schema file per type.
    #[arg(long, short = 'o', conflicts_with = "write")]
    output: Option<PathBuf>,
    /// Write schema files into the current directory instead of stdout.
    #[arg(short = 'w')]
    write: bool,
    /// Fail when any operation lacks documentation.
    #[arg(long)]
    require_docs: bool,
    /// Also consider methods of trait impls.
    #[arg(long)]
    include_trait_impls: bool,
    /// Only consider `pub` functions.
    #[arg(long)]
    public_only: bool,
    /// Record that operations printing nothing should not print the receiver.
    #[arg(long)]
    no_receiver_print: bool,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema files and/or directories containing schema JSON files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct BundleArgs {
    /// Schema files and/or directories containing schema JSON files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output JSON bundle path.
    #[arg(long)]
    output: PathBuf,
    /// Optional bundle name metadata.
    #[arg(long)]
    name: Option<String>,
}

#[derive(Debug, Args)]
struct ConfigArgs {
    /// Path to the generator config.
    #[arg(long, default_value = "type2cli.yml")]
    config: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Extract(args) => run_extract(args),
        Command::Validate(args) => run_validate(args),
        Command::Bundle(args) => run_bundle(args),
        Command::Config(args) => run_config(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_extract(args: ExtractArgs) -> Result<(), String> {
    let types = parse_csv_list(&args.types);
    if types.is_empty() {
        return Err("--types must name at least one type".to_string());
    }

    let mut config = GeneratorConfig::new(types);
    config.sources = args.inputs;
    config.recursive = args.recursive;
    config.format = args.format;
    config.require_docs = args.require_docs;
    config.include_trait_impls = args.include_trait_impls;
    config.public_only = args.public_only;
    config.receiver_print = !args.no_receiver_print;
    config.output_dir = match (args.output, args.write) {
        (Some(dir), _) => Some(dir),
        (None, true) => Some(PathBuf::from(".")),
        (None, false) => None,
    };

    run_generator(&config)
}

fn run_config(args: ConfigArgs) -> Result<(), String> {
    let config = GeneratorConfig::load(&args.config)
        .map_err(|e| format!("Failed to load config '{}': {e}", args.config.display()))?;
    debug!(config = %args.config.display(), types = ?config.types, "loaded generator config");
    run_generator(&config)
}

fn run_generator(config: &GeneratorConfig) -> Result<(), String> {
    let paths = collect_source_paths(&config.sources, config.recursive).map_err(|e| e.to_string())?;
    let units = read_sources(&paths).map_err(|e| e.to_string())?;
    let mut package = extract_package(&config.types, &units, &config.extract_options())
        .map_err(|e| e.to_string())?;
    for schema in &mut package.schemas {
        schema.receiver_print = config.receiver_print;
    }

    if config.require_docs {
        for schema in &package.schemas {
            ensure_documented(schema).map_err(|e| e.to_string())?;
        }
    }

    for schema in &package.schemas {
        if schema.operations.is_empty() {
            eprintln!(
                "warning: no operations found for type '{}' in {} file(s)",
                schema.type_name,
                paths.len()
            );
        }
    }

    match &config.output_dir {
        Some(dir) => write_schema_files(&package, dir, config.format),
        None => print_package(&package, config.format),
    }
}

fn write_schema_files(
    package: &SchemaPackage,
    dir: &Path,
    format: OutputFormat,
) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|err| {
        format!(
            "Failed to create output directory '{}': {err}",
            dir.display()
        )
    })?;

    for schema in &package.schemas {
        let path = dir.join(schema_file_name(schema, format));
        let raw = format_schema(schema, format)?;
        fs::write(&path, raw)
            .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
        println!("{}", path.display());
    }

    Ok(())
}

fn print_package(package: &SchemaPackage, format: OutputFormat) -> Result<(), String> {
    let raw = match package.schemas.as_slice() {
        [single] => format_schema(single, format)?,
        _ => format_package(package, format)?,
    };
    println!("{}", raw.trim_end());
    Ok(())
}

fn schema_file_name(schema: &TypeSchema, format: OutputFormat) -> String {
    format!(
        "{}_type2cli.{}",
        schema.type_name.to_lowercase(),
        format.extension()
    )
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let paths = collect_schema_paths(&args.inputs).map_err(|e| e.to_string())?;
    let schemas = load_and_validate_schemas(&paths).map_err(|e| e.to_string())?;
    println!(
        "Validated {} schema file(s) for {} type(s).",
        paths.len(),
        schemas.len()
    );
    Ok(())
}

fn run_bundle(args: BundleArgs) -> Result<(), String> {
    let paths = collect_schema_paths(&args.inputs).map_err(|e| e.to_string())?;
    let package =
        bundle_schema_files(&paths, PACKAGE_VERSION, args.name).map_err(|e| e.to_string())?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }

    let raw = serde_json::to_string_pretty(&package)
        .map_err(|err| format!("Failed to serialize schema bundle: {err}"))?;
    fs::write(&args.output, raw)
        .map_err(|err| format!("Failed to write '{}': {err}", args.output.display()))?;

    println!(
        "Bundled {} schema(s) into '{}'.",
        package.schema_count(),
        args.output.display()
    );

    Ok(())
}

fn parse_csv_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_list() {
        assert_eq!(parse_csv_list("Bar, Repo,,"), vec!["Bar", "Repo"]);
        assert!(parse_csv_list(" , ").is_empty());
    }

    #[test]
    fn test_schema_file_name() {
        let schema = TypeSchema::new("HeightBar");
        assert_eq!(
            schema_file_name(&schema, OutputFormat::Yaml),
            "heightbar_type2cli.yaml"
        );
    }

    #[test]
    fn test_cli_parses_extract_flags() {
        let cli = Cli::try_parse_from([
            "type2cli", "extract", "--types", "Bar", "-r", "-w", "--format", "markdown", "src",
        ])
        .unwrap();
        match cli.command {
            Command::Extract(args) => {
                assert!(args.recursive);
                assert!(args.write);
                assert_eq!(args.format, OutputFormat::Markdown);
                assert_eq!(args.inputs, vec![PathBuf::from("src")]);
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(
            Cli::try_parse_from(["type2cli", "extract", "--types", "Bar", "-w", "-o", "out"])
                .is_err()
        );
    }
}
