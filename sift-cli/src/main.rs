//! sift command-line front end
//!
//! Parses one HTML document and prints the nodes a selector matches.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use serde_json::Value;
use sift::html::print_tree;
use sift::{Document, DomTree, NodeId, Selector, clear_warnings, load_path, load_reader, parse, to_json_value};

/// sift: run CSS-like selectors against HTML
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # All links in a page
    sift 'a[href]' index.html

    # First matching heading, as JSON
    sift --first --json 'h1, h2' index.html

    # Inline HTML
    sift --html '<ul><li>a</li><li>b</li></ul>' 'li:last-child' --text

    # Read from stdin
    curl -s https://example.com | sift 'p'
"#)]
struct Cli {
    /// Selector to run, e.g. `div.main > img[src$='png']`
    selector: String,

    /// HTML file to read; stdin when omitted
    #[arg(value_name = "FILE", conflicts_with = "html")]
    path: Option<PathBuf>,

    /// Parse HTML string directly instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Print only the first match
    #[arg(short, long)]
    first: bool,

    /// Print matches as a JSON array of node objects
    #[arg(short, long, conflicts_with_all = ["tree", "text"])]
    json: bool,

    /// Print each match with its whole subtree
    #[arg(short, long, conflicts_with = "text")]
    tree: bool,

    /// Print each match's inner text
    #[arg(long)]
    text: bool,

    /// Do not print the match count
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    clear_warnings();

    let tree = load_tree(&cli)?;
    let doc = Document::new(&tree);
    let selector = Selector::compile(&cli.selector);

    let mut matches = doc.select_compiled(&selector);
    if cli.first {
        matches.truncate(1);
    }

    if cli.json {
        print_json(&tree, &matches);
    } else {
        for &id in &matches {
            print_match(&cli, &tree, id);
        }
    }

    if !cli.quiet {
        let summary = format!("{} match(es) for `{}`", matches.len(), selector.source());
        if matches.is_empty() {
            eprintln!("{}", summary.yellow());
        } else {
            eprintln!("{}", summary.green());
        }
    }
    Ok(())
}

/// Load the document from `--html`, a file, or stdin.
fn load_tree(cli: &Cli) -> Result<DomTree> {
    if let Some(ref html) = cli.html {
        return Ok(parse(html));
    }
    if let Some(ref path) = cli.path {
        return load_path(path).with_context(|| format!("could not load {}", path.display()));
    }
    if io::stdin().is_terminal() {
        bail!("no input: pass a FILE, --html, or pipe HTML on stdin");
    }
    load_reader(io::stdin().lock()).context("could not read stdin")
}

fn print_match(cli: &Cli, tree: &DomTree, id: NodeId) {
    let Some(node) = tree.get(id) else {
        return;
    };
    if cli.text {
        println!("{}", tree.inner_text(id));
    } else if cli.tree {
        print_tree(tree, id, 0);
    } else if node.is_text() {
        println!("{:?}", node.text);
    } else {
        println!("<{}>", node.bold());
    }
}

fn print_json(tree: &DomTree, matches: &[NodeId]) {
    let json = Value::Array(matches.iter().map(|&id| to_json_value(tree, id)).collect());
    println!(
        "{}",
        serde_json::to_string_pretty(&json).unwrap_or_else(|_| "[]".to_string())
    );
}
