use crate::encoding::Encoding;
use crate::types::Region;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "fastaidx")]
#[command(about = "Extract regions from an indexed FASTA file")]
pub struct Config {
    /// FASTA file to read sequences from
    pub fasta: PathBuf,

    /// Regions to extract: NAME, NAME:BEG or NAME:BEG-END (1-based, inclusive).
    /// Every sequence is printed when none are given.
    pub regions: Vec<Region>,

    /// Index file (defaults to <FASTA>.fai)
    #[arg(short, long, env = "FASTAIDX_INDEX")]
    pub index: Option<PathBuf>,

    /// Encoding applied to extracted bases
    #[arg(short, long, value_enum, env = "FASTAIDX_ENCODING", default_value = "raw")]
    pub encoding: Encoding,

    /// Bases per output line, 0 for no wrapping
    #[arg(long, env = "FASTAIDX_LINE_WIDTH", default_value = "60")]
    pub line_width: usize,

    /// Minimum bytes read from the FASTA file per cache refill
    #[arg(long, env = "FASTAIDX_MIN_READ_SIZE", default_value = "8192")]
    pub min_read_size: usize,

    /// Print sequence names and lengths from the index as JSON and exit
    #[arg(long)]
    pub lengths: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

impl Config {
    pub fn effective_index_path(&self) -> PathBuf {
        self.index.clone().unwrap_or_else(|| {
            let mut path = self.fasta.clone().into_os_string();
            path.push(".fai");
            PathBuf::from(path)
        })
    }
}
