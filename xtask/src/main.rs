use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(name = "xtask", about = "k8s-schema-fixup workspace tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Validate definitions documents against schemas/definitions.schema.json
    /// (defaults to every fixture under tests/fixtures)
    ValidateFixtures { files: Vec<PathBuf> },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::ValidateFixtures { files } => {
            let files = if files.is_empty() { fixture_files()? } else { files };
            validate_fixtures(&files)
        }
    }
}

fn fixture_files() -> Result<Vec<PathBuf>> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../tests/fixtures");
    let mut files = vec![];
    for e in fs::read_dir(&dir).with_context(|| format!("read {}", dir.display()))? {
        let p = e?.path();
        if p.extension().is_some_and(|x| x == "json") {
            files.push(p);
        }
    }
    files.sort();
    Ok(files)
}

fn validate_fixtures(files: &[PathBuf]) -> Result<()> {
    let schema_text = include_str!("../../schemas/definitions.schema.json");
    let schema: serde_json::Value = serde_json::from_str(schema_text)?;
    let compiled = jsonschema::validator_for(&schema)?;
    let mut failed = false;
    for path in files {
        let data_text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let data: serde_json::Value =
            serde_json::from_str(&data_text).with_context(|| format!("parse {}", path.display()))?;
        let errors: Vec<_> = compiled.iter_errors(&data).collect();
        if errors.is_empty() {
            println!("OK: {}", path.display());
            continue;
        }
        failed = true;
        eprintln!("Invalid: {}", path.display());
        for e in errors {
            eprintln!("- {}", e);
        }
    }
    if failed {
        std::process::exit(1);
    }
    Ok(())
}
