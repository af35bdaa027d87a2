//! `simian stats --db <path>`

use std::path::PathBuf;

use clap::Args;

use simian_core::SimianConfig;

use super::{finish, open_index};

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Index database directory (default: storage.path from the configuration)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

pub fn handle_stats(args: StatsArgs, config: &SimianConfig) -> i32 {
    finish("stats", run(&args, config))
}

fn run(args: &StatsArgs, config: &SimianConfig) -> anyhow::Result<()> {
    let index = open_index(args.db.as_deref(), config)?;
    let stats = index.stats()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
