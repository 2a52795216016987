use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{EditorConfig, NodeDefinition, DEFAULT_CONFIG_NAME};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// File name of the starter document
    #[arg(short, long, default_value = "page.json")]
    pub document: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Pagecraft project...".bright_blue().bold());

    let config_json = serde_json::to_string_pretty(&EditorConfig::default())?;
    fs::write(&config_path, config_json)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let document_path = PathBuf::from(cwd).join(&args.document);
    if !document_path.exists() {
        fs::write(&document_path, starter_document().to_json_string()?)?;
        println!("  {} Created {}", "✓".green(), args.document);
    }

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: pagecraft inspect {}", args.document);
    println!("  2. Write a mutation script (a JSON array of edits)");
    println!("  3. Run: pagecraft replay {} script.json -o out.json", args.document);

    Ok(())
}

fn starter_document() -> NodeDefinition {
    NodeDefinition::new("body")
        .with_id("page")
        .with_child(
            NodeDefinition::new("header")
                .with_id("header")
                .with_child(NodeDefinition::new("h1").with_id("title").with_content("Welcome")),
        )
        .with_child(
            NodeDefinition::new("main")
                .with_id("content")
                .with_class("stack")
                .with_child(
                    NodeDefinition::new("p")
                        .with_id("intro")
                        .with_content("Drag blocks here to build your page."),
                ),
        )
        .with_child(NodeDefinition::new("footer").with_id("footer"))
}
