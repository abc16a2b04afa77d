use clap::Parser;
use indicatif::MultiProgress;
use log::info;
use readsplit::io_utils::{open_input, open_output, species_name, OutputCompression};
use readsplit::{
    passthrough, LogObserver, ProgressBarObserver, ProgressObserver, SplitConfig, SplitPipeline,
    SplitStats,
};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Split long reads into overlapping fixed-length FASTQ fragments"
)]
struct Args {
    /// Single-end FASTA/FASTQ input (use '-' for stdin). Supports .gz and .zst compressed files.
    input: Option<String>,

    /// First file of a paired-end run
    #[arg(long)]
    p1: Option<String>,

    /// Second file of a paired-end run
    #[arg(long)]
    p2: Option<String>,

    /// Output file (single-end, stdout if omitted) or base name (paired-end, required)
    #[arg(short, long)]
    output: Option<String>,

    /// Compress output with gzip
    #[arg(long)]
    gz: bool,

    /// Compress output with zstd
    #[arg(long)]
    zstd: bool,

    /// Fragment length
    #[arg(long, default_value_t = 100)]
    split_len: usize,

    /// Bases shared by consecutive fragments
    #[arg(long, default_value_t = 0)]
    split_overlap: usize,

    /// Reads of at most this length are written unsplit
    #[arg(long, default_value_t = 100)]
    split_min_read_len: usize,

    /// Copy the input through without splitting
    #[arg(long)]
    no_split: bool,

    /// Species name used in logs and the summary (default: derived from the input file name)
    #[arg(long)]
    species_name: Option<String>,

    /// Show progress spinners on stderr
    #[arg(long)]
    progress: bool,

    /// Debug logging
    #[arg(long)]
    debug: bool,
}

enum Outcome {
    Split(SplitStats),
    Copied(u64),
}

struct Job<'a> {
    input: &'a str,
    output: Option<PathBuf>,
    compression: OutputCompression,
    config: SplitConfig,
    no_split: bool,
    label: &'a str,
}

impl Job<'_> {
    fn run(&self, multi: Option<&MultiProgress>) -> Result<Outcome, Box<dyn Error>> {
        let reader = open_input(self.input)?;
        let mut writer = open_output(self.output.as_deref(), self.compression)?;

        if self.no_split {
            info!("Copying {} unchanged", self.input);
            let copied = passthrough(reader, &mut writer)?;
            writer.finish()?;
            return Ok(Outcome::Copied(copied));
        }

        info!("Splitting reads from {}", self.input);
        let observer: Box<dyn ProgressObserver> = match multi {
            Some(multi) => {
                let message = format!("Splitting reads {}", self.label).trim_end().to_string();
                Box::new(ProgressBarObserver::new(message)?.in_multi(multi))
            }
            None => Box::new(LogObserver),
        };
        let pipeline = SplitPipeline::with_observer(self.config, observer)?;
        let stats = pipeline.run(reader, &mut writer)?;
        writer.finish()?;
        if stats.recovered > 0 {
            info!(
                "{}: {} reads had a quality block not matching their sequence length",
                self.input, stats.recovered
            );
        }
        Ok(Outcome::Split(stats))
    }
}

fn summary(label: &str, outcome: &Outcome) -> Vec<String> {
    let prefix = if label.is_empty() {
        String::new()
    } else {
        format!("{} ", label)
    };
    match outcome {
        Outcome::Split(stats) => vec![
            format!("{}reads: {}", prefix, stats.records),
            format!("{}split reads: {}", prefix, stats.split_records),
            format!("{}fragments: {}", prefix, stats.fragments),
        ],
        Outcome::Copied(bytes) => vec![format!("{}bytes copied: {}", prefix, bytes)],
    }
}

fn paired_output(base: &str, mate: &str, compression: OutputCompression) -> PathBuf {
    PathBuf::from(format!("{}_{}.fastq{}", base, mate, compression.extension()))
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if args.gz && args.zstd {
        return Err("--gz and --zstd are mutually exclusive".into());
    }
    let compression = if args.gz {
        OutputCompression::Gzip
    } else if args.zstd {
        OutputCompression::Zstd
    } else {
        OutputCompression::None
    };

    let config = SplitConfig {
        window_length: args.split_len,
        overlap: args.split_overlap,
        min_read_length: args.split_min_read_len,
    };
    if !args.no_split {
        config.window_spec()?;
    }

    let multi = args.progress.then(MultiProgress::new);
    let mut lines = Vec::new();

    let species = match (&args.input, &args.p1, &args.p2) {
        (Some(input), None, None) => {
            let species = args.species_name.clone().unwrap_or_else(|| species_name(input));
            info!("Species: {}", species);
            let job = Job {
                input,
                output: args.output.as_ref().map(PathBuf::from),
                compression,
                config,
                no_split: args.no_split,
                label: "",
            };
            lines.extend(summary("", &job.run(multi.as_ref())?));
            species
        }
        (None, Some(p1), Some(p2)) => {
            let base = args
                .output
                .as_deref()
                .ok_or("--output is required for paired-end input (--p1/--p2)")?;
            let species = args.species_name.clone().unwrap_or_else(|| species_name(p1));
            info!("Species: {}", species);
            let jobs: Vec<Job> = [(p1, "R1"), (p2, "R2")]
                .into_iter()
                .map(|(input, mate)| Job {
                    input: input.as_str(),
                    output: Some(paired_output(base, mate, compression)),
                    compression,
                    config,
                    no_split: args.no_split,
                    label: mate,
                })
                .collect();
            // mates are independent runs; errors cross the thread boundary as text
            let (r1, r2) = rayon::join(
                || jobs[0].run(multi.as_ref()).map_err(|e| e.to_string()),
                || jobs[1].run(multi.as_ref()).map_err(|e| e.to_string()),
            );
            lines.extend(summary("R1", &r1?));
            lines.extend(summary("R2", &r2?));
            species
        }
        _ => return Err("provide either one input file or both --p1 and --p2".into()),
    };

    let to_file = args.output.is_some();
    let species_line = format!("species: {}", species);
    for line in std::iter::once(&species_line).chain(lines.iter()) {
        if to_file {
            println!("{}", line);
        } else {
            eprintln!("{}", line);
        }
    }
    Ok(())
}
