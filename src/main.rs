//! FastDNA CLI entry point
//!
//! Fetch sub-sequences from packed 4-bit genome assemblies.

use clap::{Parser, Subcommand, ValueEnum};
use fast_dna::core::{
    parse_locations, sort_locations, AssemblyCache, DirLocator, FetchOptions, IoStrategy,
    StoreConfig,
};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

/// I/O strategy for packed files (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum IoStrategyArg {
    /// Memory map large files, read small ones per request
    #[default]
    #[value(name = "auto")]
    Auto,
    /// Always memory map
    #[value(name = "mmap")]
    Mmap,
    /// Always open and read per request
    #[value(name = "read")]
    Read,
}

impl From<IoStrategyArg> for IoStrategy {
    fn from(arg: IoStrategyArg) -> Self {
        match arg {
            IoStrategyArg::Auto => IoStrategy::Auto,
            IoStrategyArg::Mmap => IoStrategy::MemoryMapped,
            IoStrategyArg::Read => IoStrategy::PerRequest,
        }
    }
}

#[derive(Parser)]
#[command(name = "fast-dna")]
#[command(about = "Random-access sequence retrieval from packed 4-bit genomes")]
#[command(version)]
#[command(author = "FastDNA Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch sequence for one or more locations (chr1:100-200)
    Fetch {
        /// Genome root holding one directory per assembly
        #[arg(short = 'd', long)]
        dir: PathBuf,
        /// Assembly name, e.g. hg19
        #[arg(short = 'a', long)]
        assembly: String,
        /// Locations to fetch
        #[arg(required = true)]
        locations: Vec<String>,
        /// Reverse the sequence
        #[arg(long)]
        rev: bool,
        /// Complement the sequence
        #[arg(long)]
        comp: bool,
        /// Reverse complement (same as --rev --comp)
        #[arg(long)]
        revcomp: bool,
        /// Output case: upper or lower (default: as stored)
        #[arg(short = 'f', long, default_value = "")]
        format: String,
        /// Repeat mask mode: N replaces soft-masked bases with N
        #[arg(short = 'm', long, default_value = "")]
        mask: String,
        /// I/O strategy for packed files
        #[arg(long = "io", default_value = "auto")]
        io_strategy: IoStrategyArg,
    },
    /// List chromosomes available in an assembly
    Chroms {
        /// Genome root holding one directory per assembly
        #[arg(short = 'd', long)]
        dir: PathBuf,
        /// Assembly name, e.g. hg19
        #[arg(short = 'a', long)]
        assembly: String,
    },
    /// Sort locations by chromosome, start, end
    Sort {
        /// Locations to sort
        #[arg(required = true)]
        locations: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match cli.command {
        Commands::Fetch {
            dir,
            assembly,
            locations,
            rev,
            comp,
            revcomp,
            format,
            mask,
            io_strategy,
        } => {
            let start = Instant::now();
            let locations = parse_locations(&locations)?;
            let options = FetchOptions::from_modes(rev || revcomp, comp || revcomp, &format, &mask);
            let config = StoreConfig {
                io_strategy: io_strategy.into(),
            };
            let cache = AssemblyCache::with_config(DirLocator::new(dir), config);

            let sequences = cache.get_sequences(&assembly, &locations, &options)?;
            for seq in &sequences {
                writeln!(out, ">{}", seq.location)?;
                writeln!(out, "{}", seq.sequence)?;
            }

            log::info!(
                "fetched {} locations in {:.3}s",
                sequences.len(),
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Chroms { dir, assembly } => {
            let cache = AssemblyCache::from_root(dir);
            for chrom in cache.resolve(&assembly)?.chromosomes()? {
                writeln!(out, "{}", chrom)?;
            }
        }

        Commands::Sort { locations } => {
            let mut locations = parse_locations(&locations)?;
            sort_locations(&mut locations);
            for location in &locations {
                writeln!(out, "{}", location)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}
