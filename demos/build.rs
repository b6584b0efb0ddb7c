use std::env;
use std::fs;
use std::path::PathBuf;

use type2cli_extract::{SourceUnit, ensure_documented, extract};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let source = PathBuf::from("src/bar.rs");
    println!("cargo:rerun-if-changed={}", source.display());

    let unit = SourceUnit::read(&source)?;
    let schema = extract("Bar", &[unit])?;
    ensure_documented(&schema)?;

    let out = PathBuf::from(env::var("OUT_DIR")?).join("bar_type2cli.json");
    fs::write(out, schema.to_json_pretty()?)?;
    Ok(())
}
