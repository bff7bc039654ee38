use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "llc-stats")]
#[command(author = "Pedro Ortiz Suarez <pedro@commoncrawl.org>")]
#[command(version = "0.1.0")]
#[command(about = "Compute sum, count and average of a file of sampled values", long_about = None)]
pub struct Args {
    /// File with a single value on each line (zstd-compressed files are decompressed)
    #[arg(value_name = "INPUT FILE")]
    pub src: PathBuf,
}

/// Message printed when the argument count is wrong.
pub fn usage(program: &str) -> String {
    format!(
        "Invalid number of Arguments\nUsage: {} <InputFile>\nInputFile contains single values on each line",
        program
    )
}
