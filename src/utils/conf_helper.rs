use anyhow::{bail, Context, Result};
use sioread::ReadArgs;
use std::fs;
use tracing::info;

/// Command-line options on top of the read parameters.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub args: ReadArgs,
    pub header_only: bool,
    pub verbose: bool,
}

pub const USAGE: &str = "\
usage: sioread <file.sio> [--start N] [--count N] [--channels a,b,..]
               [--request request.json] [--header-only] [-v]";

/// Builds read arguments from the command line.
///
/// A `--request` JSON file is loaded first; flags given on the command line
/// override its fields.
pub fn parse_cli<I: IntoIterator<Item = String>>(argv: I) -> Result<CliOptions> {
    let mut opts = CliOptions::default();
    let mut overrides = ReadArgs::default();
    let mut request_file = None;
    let mut channels = None;

    let mut it = argv.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--start" => overrides.start_sample = Some(next_number(&mut it, "--start")?),
            "--count" => overrides.sample_count = Some(next_number(&mut it, "--count")?),
            "--channels" => {
                let list = it.next().context("--channels needs a value")?;
                channels = Some(parse_channels(&list)?);
            }
            "--request" => request_file = Some(it.next().context("--request needs a path")?),
            "--header-only" => opts.header_only = true,
            "-v" | "--verbose" => opts.verbose = true,
            "-h" | "--help" => bail!("{}", USAGE),
            flag if flag.starts_with('-') => bail!("unknown option {flag}\n{USAGE}"),
            path => overrides.file_path = Some(path.into()),
        }
    }

    let mut args = match request_file {
        Some(file_path) => load_request(&file_path)?,
        None => ReadArgs::default(),
    };
    if overrides.file_path.is_some() {
        args.file_path = overrides.file_path;
    }
    if overrides.start_sample.is_some() {
        args.start_sample = overrides.start_sample;
    }
    if overrides.sample_count.is_some() {
        args.sample_count = overrides.sample_count;
    }
    if let Some(channels) = channels {
        args.channels = channels;
    }

    opts.args = args;
    Ok(opts)
}

pub fn load_request(file_path: &str) -> Result<ReadArgs> {
    let data = fs::read_to_string(file_path)
        .with_context(|| format!("File read Error: {file_path}"))?;

    let args = ReadArgs::from_json(&data)
        .with_context(|| format!("JSON Parse Error: {file_path}"))?;

    info!("Loaded read request from {}", file_path);
    Ok(args)
}

fn next_number<I: Iterator<Item = String>>(it: &mut I, flag: &str) -> Result<i64> {
    let value = it.next().with_context(|| format!("{flag} needs a value"))?;
    value
        .parse()
        .with_context(|| format!("{flag}: not an integer: {value}"))
}

fn parse_channels(list: &str) -> Result<Vec<i64>> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.trim()
                .parse::<i64>()
                .with_context(|| format!("bad channel number: {s}"))
        })
        .collect()
}
