//! Runs one of spec.md §8's end-to-end scenarios by name.

use anyhow::{bail, Result};

fn main() -> Result<()> {
    let scenario = std::env::args().nth(1).unwrap_or_else(|| "s1".to_string());

    match scenario.as_str() {
        "s1" => material_recon_core::examples::s1::run(),
        "s2" => material_recon_core::examples::s2::run(),
        "s3" => material_recon_core::examples::s3::run(),
        other => bail!("unknown scenario {other:?}; expected one of s1, s2, s3"),
    }

    Ok(())
}
