//! Output formatting for schemas and packages.

use serde::{Deserialize, Serialize};
use type2cli_core::{OperationDescriptor, SchemaPackage, TypeSchema};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Markdown,
    Table,
}

impl OutputFormat {
    /// File extension used when writing this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Markdown => "md",
            Self::Table => "txt",
        }
    }
}

/// Formats a schema in the requested output format.
pub fn format_schema(schema: &TypeSchema, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(schema)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(schema).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(schema_to_markdown(schema)),
        OutputFormat::Table => Ok(schema_to_table(schema)),
    }
}

/// Formats a package in the requested output format.
pub fn format_package(package: &SchemaPackage, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(package)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(package).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(package
            .schemas
            .iter()
            .map(schema_to_markdown)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Table => Ok(package
            .schemas
            .iter()
            .map(schema_to_table)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn usage(op: &OperationDescriptor) -> String {
    let mut out = op.command_name();
    for arg in &op.argument_names {
        out.push_str(&format!(" <{arg}>"));
    }
    out
}

fn first_line(docs: &str) -> &str {
    docs.lines().next().unwrap_or("")
}

fn schema_to_markdown(schema: &TypeSchema) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", schema.command_name));
    out.push_str(&format!("**Type:** `{}`\n\n", schema.type_name));

    let constructors: Vec<_> = schema.constructors().collect();
    if !constructors.is_empty() {
        out.push_str("## Constructors\n\n");
        out.push_str("| Usage | Description |\n");
        out.push_str("|-------|-------------|\n");
        for op in constructors {
            out.push_str(&format!(
                "| `{}` | {} |\n",
                usage(op),
                first_line(&op.documentation)
            ));
        }
        out.push('\n');
    }

    let instance: Vec<_> = schema.instance_operations().collect();
    if !instance.is_empty() {
        out.push_str("## Operations\n\n");
        out.push_str("| Usage | Description |\n");
        out.push_str("|-------|-------------|\n");
        for op in instance {
            out.push_str(&format!(
                "| `{}` | {} |\n",
                usage(op),
                first_line(&op.documentation)
            ));
        }
        out.push('\n');
    }

    out
}

fn schema_to_table(schema: &TypeSchema) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Command: {}  Type: {}  Operations: {}\n",
        schema.command_name,
        schema.type_name,
        schema.operations.len()
    ));

    if !schema.operations.is_empty() {
        let usages: Vec<(String, &OperationDescriptor)> = schema
            .operations
            .values()
            .map(|op| (usage(op), op))
            .collect();
        let max_usage = usages.iter().map(|(u, _)| u.len()).max().unwrap_or(4);

        out.push_str("\nSubcommands:\n");
        for (usage, op) in &usages {
            out.push_str(&format!(
                "  {:<width$}  {:<11}  {}\n",
                usage,
                op.kind.to_string(),
                first_line(&op.documentation),
                width = max_usage
            ));
        }
    }

    out
}
