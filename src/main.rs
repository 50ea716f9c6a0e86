use anyhow::{Context, Result};
use sioread::{sioread, SampleData, SioReader};
use tracing::{info, warn, Level};

mod utils;

use crate::utils::conf_helper::{parse_cli, USAGE};

fn main() -> Result<()> {
    let opts = parse_cli(std::env::args().skip(1))?;

    tracing_subscriber::fmt()
        .with_max_level(if opts.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let path = opts.args.file_path.clone().context(USAGE)?;

    if opts.header_only {
        let reader = SioReader::open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        println!("{}", serde_json::to_string_pretty(reader.header())?);
        return Ok(());
    }

    let output = sioread(&opts.args)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    println!("{}", serde_json::to_string_pretty(&output.header)?);
    for notice in &output.notices {
        warn!("{}", serde_json::to_string(notice)?);
    }

    match &output.data {
        SampleData::Empty => info!("No samples requested"),
        SampleData::Data(x) => {
            let channels = if opts.args.channels.is_empty() {
                (0..x.ncols() as i64).collect()
            } else {
                opts.args.channels.clone()
            };
            info!("Window: {} samples x {} channels", x.nrows(), x.ncols());
            for (col, channel) in x.columns().into_iter().zip(channels) {
                let min = col.iter().copied().fold(f64::INFINITY, f64::min);
                let max = col.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let mean = col.mean().unwrap_or(0.0);
                println!("channel {channel:>3}: min={min:.6} max={max:.6} mean={mean:.6}");
            }
        }
    }

    Ok(())
}
