//! `simian add --db <path> <images>...`
//!
//! Each image becomes one entry. Its attributes are the `--attr` pairs
//! plus `path`, the file it was read from. The new entry ids are printed
//! one per line as `<id>\t<path>`.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde_json::Value;
use tracing::info;

use simian_core::{Attributes, SimianConfig};

use super::{finish, load_image, open_index};

/// Attribute key recording the source file of an entry.
pub const PATH_ATTRIBUTE: &str = "path";

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Index database directory (default: storage.path from the configuration)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Images to add
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Extra attribute stored with every added image, as key=value.
    /// Values that parse as JSON are stored as JSON, anything else as a string.
    #[arg(long = "attr", value_parser = parse_attribute)]
    pub attributes: Vec<(String, Value)>,
}

/// Parse a `key=value` attribute.
pub fn parse_attribute(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got \"{}\"", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("attribute key is empty in \"{}\"", raw));
    }
    if key == PATH_ATTRIBUTE {
        return Err(format!("\"{}\" is set from the image file name", PATH_ATTRIBUTE));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

pub fn handle_add(args: AddArgs, config: &SimianConfig) -> i32 {
    finish("add", run(&args, config))
}

fn run(args: &AddArgs, config: &SimianConfig) -> anyhow::Result<()> {
    let index = open_index(args.db.as_deref(), config)?;

    let shared: Attributes = args.attributes.iter().cloned().collect();

    for path in &args.images {
        let image = load_image(path)?;

        let mut attributes = shared.clone();
        attributes.insert(
            PATH_ATTRIBUTE.to_string(),
            Value::String(path.display().to_string()),
        );

        let id = index
            .insert(&image, attributes)
            .with_context(|| format!("Failed to add {}", path.display()))?;
        println!("{}\t{}", id, path.display());
    }

    index.store().flush_all()?;
    info!(added = args.images.len(), "Images added");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attribute_string_and_json() {
        assert_eq!(
            parse_attribute("album=holiday 2019").unwrap(),
            ("album".to_string(), Value::String("holiday 2019".into()))
        );
        assert_eq!(
            parse_attribute("rating=4").unwrap(),
            ("rating".to_string(), serde_json::json!(4))
        );
        assert_eq!(
            parse_attribute("tags=[\"a\",\"b\"]").unwrap().1,
            serde_json::json!(["a", "b"])
        );
    }

    #[test]
    fn test_parse_attribute_splits_on_first_equals() {
        let (key, value) = parse_attribute("query=a=b").unwrap();
        assert_eq!(key, "query");
        assert_eq!(value, Value::String("a=b".into()));
    }

    #[test]
    fn test_parse_attribute_rejects_bad_input() {
        assert!(parse_attribute("no-separator").is_err());
        assert!(parse_attribute("=value").is_err());
        assert!(parse_attribute("path=/tmp/x.png").is_err());
    }
}
