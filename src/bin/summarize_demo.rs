//! Print the composed summary for an abstract read from a file (or stdin).
//!
//! Usage: summarize_demo [ABSTRACT_FILE] [CATEGORY]

use std::io::Read as _;

use anyhow::{Context, Result};
use literature_digest::{summarize, CategoryConfig};

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let mut args = std::env::args().skip(1);
    let text = match args.next().filter(|a| a != "-") {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    let cfg = CategoryConfig::load_default()?;
    let category = match args.next() {
        Some(name) => Some(
            cfg.category(&name)
                .with_context(|| format!("unknown category `{name}`; known: {:?}", cfg.names()))?,
        ),
        None => None,
    };

    let s = summarize(&text, category);
    println!("{}", serde_json::to_string_pretty(&s)?);
    Ok(())
}
