use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use log::info;

use softexp::{FitConstants, Harness, Sweep};

fn main() -> Result<()> {
    let _logger = common::setup_logging("info");

    let constants = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading fit constants from {}", path);
            FitConstants::from_yaml_file(&path)?
        }
        None => FitConstants::default(),
    };
    info!("Fit constants: {:?}", constants);

    let sweep = Sweep::softmax();
    let harness = Harness::new(constants);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = harness
        .report(&sweep, &mut out)
        .context("Failed to write report")?;
    out.flush().context("Failed to flush report")?;

    info!("{}", summary);

    Ok(())
}
