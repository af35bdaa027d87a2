//! `simian query --db <path> <image>`

use std::path::PathBuf;

use clap::Args;
use serde_json::json;
use tracing::info;

use simian_core::{Judgment, NearMatch, SimianConfig};

use super::{finish, load_image, open_index};

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Index database directory (default: storage.path from the configuration)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Query image
    pub image: PathBuf,

    /// Maximum number of matches to print
    #[arg(long, default_value_t = 10)]
    pub max_results: usize,

    /// Largest difference to accept; raised to the index split threshold when lower
    #[arg(long, default_value_t = 0.1)]
    pub max_difference: f64,
}

pub fn handle_query(args: QueryArgs, config: &SimianConfig) -> i32 {
    finish("query", run(&args, config))
}

fn run(args: &QueryArgs, config: &SimianConfig) -> anyhow::Result<()> {
    let index = open_index(args.db.as_deref(), config)?;
    let image = load_image(&args.image)?;

    let matches = index.find_nearest(&image, args.max_results, args.max_difference)?;
    info!(found = matches.len(), "Query complete");

    for near in &matches {
        println!("{}", match_line(near));
    }
    Ok(())
}

/// One JSON object per match.
fn match_line(near: &NearMatch) -> serde_json::Value {
    json!({
        "id": near.entry.id(),
        "difference": near.difference,
        "judgment": Judgment::from_difference(near.difference).as_str(),
        "attributes": near.entry.attributes(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use simian_core::{Attributes, Fingerprint, IndexEntry};

    #[test]
    fn test_match_line_fields() {
        let mut attributes = Attributes::new();
        attributes.insert("path".into(), json!("a.png"));
        let entry = IndexEntry::new(Fingerprint::from_samples(vec![0; 64]), attributes);
        let id = entry.id();

        let line = match_line(&NearMatch {
            entry,
            difference: 0.0625,
        });
        assert_eq!(line["id"], json!(id));
        assert_eq!(line["difference"], json!(0.0625));
        assert_eq!(line["judgment"], json!("variation"));
        assert_eq!(line["attributes"]["path"], json!("a.png"));
    }
}
