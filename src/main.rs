use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fastaidx::{
    Config, Fasta, IndexCatalog, IndexedFasta, Options,
    types::{Region, SequenceInfo},
};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing; stdout carries the sequences.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let index_path = config.effective_index_path();
    let index = File::open(&index_path)
        .with_context(|| format!("failed to open index {}", index_path.display()))?;
    let catalog = IndexCatalog::from_reader(BufReader::new(index))
        .with_context(|| format!("failed to parse index {}", index_path.display()))?;
    tracing::info!("Loaded {} sequences from {:?}", catalog.len(), index_path);

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if config.lengths {
        let infos: Vec<SequenceInfo> = catalog
            .iter()
            .map(|entry| SequenceInfo {
                name: entry.name.clone(),
                length: entry.length,
            })
            .collect();
        serde_json::to_writer_pretty(&mut out, &infos)?;
        writeln!(out)?;
        out.flush()?;
        return Ok(());
    }

    let fasta = File::open(&config.fasta)
        .with_context(|| format!("failed to open {}", config.fasta.display()))?;
    let options = Options::default()
        .with_encoding(config.encoding)
        .with_min_read_size(config.min_read_size);
    let reader = IndexedFasta::from_catalog(Some(fasta), catalog, options);

    let regions: Vec<Region> = if config.regions.is_empty() {
        reader.seq_names().iter().map(Region::whole).collect()
    } else {
        config.regions.clone()
    };

    let mut failed = 0;
    for region in &regions {
        match extract(&reader, region) {
            Ok(bases) => write_record(&mut out, &region.to_string(), &bases, config.line_width)?,
            Err(e) if e.is_request_error() => {
                tracing::warn!("Skipping {}: {}", region, e);
                failed += 1;
            }
            Err(e) => return Err(e).with_context(|| format!("failed to extract {}", region)),
        }
    }
    out.flush()?;

    if failed > 0 {
        anyhow::bail!("{} of {} regions could not be extracted", failed, regions.len());
    }
    Ok(())
}

fn extract(reader: &IndexedFasta<File>, region: &Region) -> fastaidx::Result<Vec<u8>> {
    let length = reader.len(&region.name)?;
    let (start, end) = region.resolve(length);
    // Empty sequences still get a record when dumped whole.
    if length == 0 && region.end.is_none() && start == 0 {
        return Ok(Vec::new());
    }
    reader.get_bytes(&region.name, start, end)
}

fn write_record<W: Write>(
    out: &mut W,
    name: &str,
    bases: &[u8],
    line_width: usize,
) -> std::io::Result<()> {
    writeln!(out, ">{}", name)?;
    if line_width == 0 {
        out.write_all(bases)?;
        return writeln!(out);
    }
    for line in bases.chunks(line_width) {
        out.write_all(line)?;
        writeln!(out)?;
    }
    Ok(())
}
