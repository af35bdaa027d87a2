//! `simian compare <a> <b>`

use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use simian_core::{Fingerprint, Judgment};

use super::{finish, load_image};

#[derive(Args, Debug)]
pub struct CompareArgs {
    pub first: PathBuf,
    pub second: PathBuf,
}

pub fn handle_compare(args: CompareArgs) -> i32 {
    finish("compare", run(&args))
}

fn run(args: &CompareArgs) -> anyhow::Result<()> {
    let first = Fingerprint::from_image(&load_image(&args.first)?)?;
    let second = Fingerprint::from_image(&load_image(&args.second)?)?;

    let difference = first.distance(&second);
    debug!(first = %first, second = %second, difference, "Compared");
    println!("{}", format_comparison(difference));
    Ok(())
}

fn format_comparison(difference: f64) -> String {
    format!("{:.4} ({})", difference, Judgment::from_difference(difference))
}
