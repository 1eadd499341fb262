// k8s-schema-fixup/src/main.rs

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::{
    io::{self, IsTerminal},
    path::PathBuf,
};
use tracing::warn;

use k8s_schema_fixup::{
    config::{self, Config, PartialConfig},
    document, kind_enum, one_of, refs, RefBase, SchemaError, Strictness,
};

#[derive(Parser)]
#[command(name = "k8s-schema-fixup", version, about = "Post-process Kubernetes JSON Schema definitions")]
struct Cli {
    /// TOML config file (default: ./k8s-schema-fixup.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args)]
struct InputArgs {
    /// Schema document to read; '-' reads stdin [default: definitions.json]
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Add `enum: [<ShortName>]` to every `kind` property that lacks one
    BackfillKind {
        #[command(flatten)]
        input: InputArgs,
        /// Skip malformed definitions instead of failing
        #[arg(long)]
        permissive: bool,
    },
    /// Print a `oneOf` schema referencing every definition
    OneOf {
        #[command(flatten)]
        input: InputArgs,
        /// URI of the definitions document, used as the `$ref` base
        #[arg(long)]
        base_uri: Option<String>,
        /// Warn about `$ref`s to definitions missing from the document
        #[arg(long)]
        check_refs: bool,
    },
    /// List `$ref`s to definitions missing from the document
    CheckRefs {
        #[command(flatten)]
        input: InputArgs,
    },
}

impl Cmd {
    fn overlay(&self) -> PartialConfig {
        match self {
            Cmd::BackfillKind { input, permissive } => PartialConfig {
                input: input.input.clone(),
                strictness: permissive.then_some(Strictness::Permissive),
                ..Default::default()
            },
            Cmd::OneOf { input, base_uri, .. } => PartialConfig {
                input: input.input.clone(),
                base_uri: base_uri.clone(),
                ..Default::default()
            },
            Cmd::CheckRefs { input } => PartialConfig { input: input.input.clone(), ..Default::default() },
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("resolve working directory")?;
    let cfg = config::resolve(cli.config.as_deref(), &cwd, &cli.cmd.overlay())?;

    match cli.cmd {
        Cmd::BackfillKind { .. } => backfill_kind(&cfg),
        Cmd::OneOf { check_refs, .. } => one_of(&cfg, check_refs),
        Cmd::CheckRefs { .. } => check_refs(&cfg),
    }
}

fn backfill_kind(cfg: &Config) -> Result<()> {
    let mut doc = document::load(&cfg.input)?;
    kind_enum::backfill(&mut doc, cfg.strictness)
        .with_context(|| format!("backfill kind enums in {}", cfg.input.display()))?;
    document::emit(io::stdout().lock(), &doc)?;
    Ok(())
}

fn one_of(cfg: &Config, check: bool) -> Result<()> {
    let base = RefBase::new(cfg.base_uri.clone().ok_or(SchemaError::MissingBaseUri)?)?;
    let doc = document::load(&cfg.input)?;
    if check {
        for dangling in refs::dangling_refs(&doc)? {
            warn!(from = %dangling.from, target = %dangling.target, pointer = %dangling.pointer, "unresolvable $ref");
        }
    }
    let out = one_of::aggregate(&doc, &base)
        .with_context(|| format!("aggregate definitions in {}", cfg.input.display()))?;
    document::emit(io::stdout().lock(), &out)?;
    Ok(())
}

fn check_refs(cfg: &Config) -> Result<()> {
    let doc = document::load(&cfg.input)?;
    let dangling = refs::dangling_refs(&doc)?;
    if !dangling.is_empty() {
        eprintln!("Unresolvable references: {}", cfg.input.display());
        for d in &dangling {
            println!("{d}");
        }
        std::process::exit(1);
    }
    eprintln!("OK: {}", cfg.input.display());
    Ok(())
}
