use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{DocumentTree, EditSession, EditorConfig, Mutation};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use super::resolve;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Document to edit (JSON node tree)
    pub document: PathBuf,

    /// Mutation script (JSON array)
    pub script: PathBuf,

    /// Write the edited document here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stop at the first mutation that fails
    #[arg(long)]
    pub strict: bool,
}

/// Outcome of replaying one script
#[derive(Debug)]
pub struct ReplayReport {
    pub tree: DocumentTree,
    pub applied: usize,
    pub skipped: usize,
    pub failures: Vec<(usize, String)>,
    pub undo_levels: usize,
    pub redo_levels: usize,
}

pub fn replay(args: ReplayArgs, cwd: &str) -> Result<()> {
    let config = EditorConfig::load(&PathBuf::from(cwd))?;
    let document_path = resolve(cwd, &args.document);
    let script_path = resolve(cwd, &args.script);

    let source = fs::read_to_string(&document_path)
        .with_context(|| format!("Cannot read document {}", document_path.display()))?;
    let script = fs::read_to_string(&script_path)
        .with_context(|| format!("Cannot read script {}", script_path.display()))?;

    // Generated ids use the configured seed, so they stay stable across files.
    let tree = DocumentTree::from_json_str(&config.id_seed, &source)?;
    let mutations = Mutation::parse_script(&script)?;

    eprintln!(
        "{} {} mutations on {}",
        "▶".bright_blue(),
        mutations.len(),
        document_path.display()
    );

    let report = replay_mutations(tree, &mutations, &config, args.strict)?;

    for (index, error) in &report.failures {
        eprintln!("  {} #{} {}", "✗".red(), index, error);
    }
    eprintln!(
        "  {} {} applied, {} skipped, {} failed",
        "✓".green(),
        report.applied,
        report.skipped,
        report.failures.len()
    );
    eprintln!(
        "  History: {} undo, {} redo",
        report.undo_levels, report.redo_levels
    );

    let json = report.tree.to_json_string()?;
    match &args.output {
        Some(output) => {
            let output = resolve(cwd, output);
            fs::write(&output, json)?;
            eprintln!("  {} Wrote {}", "✓".green(), output.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Apply `mutations` in order.
///
/// Failing mutations are collected, or abort the replay when `strict` is set.
/// An undo or redo with nothing to replay counts as skipped.
pub fn replay_mutations(
    tree: DocumentTree,
    mutations: &[Mutation],
    config: &EditorConfig,
    strict: bool,
) -> Result<ReplayReport> {
    let mut session = EditSession::new("replay", tree, config);
    let mut applied = 0;
    let mut skipped = 0;
    let mut failures = Vec::new();

    for (index, mutation) in mutations.iter().enumerate() {
        match mutation.apply(&mut session) {
            Ok(true) => applied += 1,
            Ok(false) => skipped += 1,
            Err(e) if strict => {
                return Err(anyhow!("mutation #{} ({}) failed: {}", index, mutation.name(), e));
            }
            Err(e) => failures.push((index, format!("{}: {}", mutation.name(), e))),
        }
    }

    session.canvas().check_integrity()?;
    info!(applied, skipped, failed = failures.len(), "replay finished");

    let undo_levels = session.history().undo_levels();
    let redo_levels = session.history().redo_levels();
    Ok(ReplayReport {
        tree: session.into_tree(),
        applied,
        skipped,
        failures,
        undo_levels,
        redo_levels,
    })
}
