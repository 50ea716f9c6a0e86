// Example usage of the SIO reader: pull one FFT window from two channels

use sioread::{sioread, FileHeader, ReadArgs, Result};
use tracing::{info, Level};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    // Pick the window length from the FFT resolution we want
    let fs = 1500.0_f64;
    let df = 0.1_f64;
    let n = (fs / df).log2().ceil().exp2() as i64; // power of 2
    let t = n as f64 / fs;
    let df = 1.0 / t;
    info!("FFT length {} ({:.3} s, {:.4} Hz bins)", n, t, df);

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/name_of_file.sio".to_string());

    let args = ReadArgs::new(path)
        .start(n / 2 + 1)
        .count(n)
        .channels([1, 2]);
    let output = sioread(&args)?;

    // n x 2 matrix, one column per requested channel
    let (rows, cols) = output.data.shape();
    info!("Data: {} x {}", rows, cols);

    for (key, value) in output.header.fields() {
        info!("{}: {}", key, value);
    }
    info!("{}", FileHeader::DESCRIPTION);

    Ok(())
}
