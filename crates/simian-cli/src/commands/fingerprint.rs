//! `simian fingerprint <image>`

use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use simian_core::config::constants::codec::FINGERPRINT_SIDE;
use simian_core::fingerprint::codec;
use simian_core::Fingerprint;

use super::{finish, load_image};

#[derive(Args, Debug)]
pub struct FingerprintArgs {
    /// Image file to fingerprint
    pub image: PathBuf,
}

pub fn handle_fingerprint(args: FingerprintArgs) -> i32 {
    finish("fingerprint", run(&args))
}

fn run(args: &FingerprintArgs) -> anyhow::Result<()> {
    let image = load_image(&args.image)?;

    if tracing::enabled!(tracing::Level::DEBUG) {
        let matrix = codec::coefficient_matrix(&image)?;
        for row in matrix.chunks(FINGERPRINT_SIDE) {
            debug!(?row, "coefficients");
        }
    }

    let fingerprint = Fingerprint::from_image(&image)?;
    println!("{}", fingerprint);
    Ok(())
}
