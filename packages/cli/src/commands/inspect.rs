use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_editor::DocumentTree;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{document_name, resolve};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Document file, or a directory of .json documents
    pub input: PathBuf,

    /// Also print attributes, classes and style
    #[arg(short, long)]
    pub detailed: bool,
}

pub fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let input = resolve(cwd, &args.input);

    let files = if input.is_file() {
        vec![input]
    } else if input.is_dir() {
        find_json_files(&input)
    } else {
        return Err(anyhow!("Input path does not exist: {}", input.display()));
    };

    let mut invalid = 0;
    for file in &files {
        match load(file) {
            Ok(tree) => {
                println!("{} {} ({} nodes)", "✓".green(), file.display(), tree.len());
                print!("{}", outline(&tree, args.detailed));
            }
            Err(e) => {
                invalid += 1;
                println!("{} {}: {}", "✗".red(), file.display(), e);
            }
        }
    }

    if invalid > 0 {
        return Err(anyhow!("{} of {} documents are invalid", invalid, files.len()));
    }
    Ok(())
}

fn load(path: &Path) -> Result<DocumentTree> {
    let source = fs::read_to_string(path)?;
    let tree = DocumentTree::from_json_str(&document_name(path), &source)?;
    tree.check_integrity()?;
    Ok(tree)
}

/// Indented outline of the tree, one node per line
pub fn outline(tree: &DocumentTree, detailed: bool) -> String {
    let mut out = String::new();
    if let Some(root) = tree.root_id() {
        write_node(tree, root, 1, detailed, &mut out);
    }
    out
}

fn write_node(tree: &DocumentTree, id: &str, depth: usize, detailed: bool, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };

    let indent = "  ".repeat(depth);
    let mut line = format!(
        "{}{} {}",
        indent,
        node.tag_name().bright_white(),
        format!("#{}", node.id()).dimmed()
    );
    if !node.content().is_empty() {
        line.push_str(&format!(" {:?}", node.content()));
    }
    out.push_str(&line);
    out.push('\n');

    if detailed {
        let mut details = Vec::new();
        if !node.classes().is_empty() {
            details.push(format!("class: {}", node.classes().join(" ")));
        }
        details.extend(node.attributes().iter().map(|(name, value)| format!("@{}: {}", name, value)));
        details.extend(node.style().iter().map(|(property, value)| format!("{}: {}", property, value)));
        for detail in details {
            out.push_str(&format!("{}  {}\n", indent, detail));
        }
    }

    for child in node.children() {
        write_node(tree, child, depth + 1, detailed, out);
    }
}

fn find_json_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && path.extension().map(|e| e == "json").unwrap_or(false))
        .filter(|path| path.file_name().map(|n| n != pagecraft_editor::DEFAULT_CONFIG_NAME).unwrap_or(true))
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_lists_every_node() {
        colored::control::set_override(false);
        let tree = DocumentTree::from_json_str(
            "outline",
            r#"{
                "tagName": "body",
                "attributes": { "id": "root" },
                "components": [
                    { "tagName": "h1", "attributes": { "id": "title" }, "content": "Hi", "classes": ["big"] }
                ]
            }"#,
        )
        .unwrap();

        let text = outline(&tree, true);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  body #root");
        assert_eq!(lines[1], "    h1 #title \"Hi\"");
        assert_eq!(lines[2], "      class: big");
    }

    #[test]
    fn test_inspect_directory_skips_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"{ "tagName": "body" }"#).unwrap();
        fs::write(dir.path().join(pagecraft_editor::DEFAULT_CONFIG_NAME), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let files = find_json_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.json"));
    }

    #[test]
    fn test_inspect_reports_invalid_documents() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let result = inspect(
            InspectArgs {
                input: PathBuf::from("."),
                detailed: false,
            },
            &dir.path().display().to_string(),
        );
        assert!(result.is_err());
    }
}
