use crate::error::Result;
use crate::fastq::{write_fragment, Fragment, FragmentBases};
use crate::progress::ProgressObserver;
use crate::reader::RecordReader;
use crate::record::{Bases, SequenceRecord};
use crate::window::WindowSpec;
use std::io::{self, BufRead, Read, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitConfig {
    pub window_length: usize,
    pub overlap: usize,
    /// Reads of at most this many bases are emitted whole.
    pub min_read_length: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            window_length: 100,
            overlap: 0,
            min_read_length: 100,
        }
    }
}

impl SplitConfig {
    pub fn window_spec(&self) -> Result<WindowSpec> {
        WindowSpec::new(self.window_length, self.overlap)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SplitStats {
    pub records: usize,
    /// Records long enough to be cut into windows.
    pub split_records: usize,
    pub fragments: usize,
    /// FASTQ records whose quality block was repaired: dropped when cut short,
    /// truncated when longer than the sequence.
    pub recovered: usize,
}

pub struct SplitPipeline<O = ()> {
    spec: WindowSpec,
    min_read_length: usize,
    observer: O,
}

impl SplitPipeline<()> {
    pub fn new(config: SplitConfig) -> Result<Self> {
        Self::with_observer(config, ())
    }
}

impl<O: ProgressObserver> SplitPipeline<O> {
    /// Fails on an invalid window geometry before any input is touched.
    pub fn with_observer(config: SplitConfig, observer: O) -> Result<Self> {
        Ok(Self {
            spec: config.window_spec()?,
            min_read_length: config.min_read_length,
            observer,
        })
    }

    pub fn fragments<'a>(&self, record: &'a SequenceRecord) -> Vec<Fragment<'a>> {
        let read_id = record.read_id();
        if record.seq().len() <= self.min_read_length {
            let bases = match &record.bases {
                Bases::SequenceOnly { seq } => FragmentBases::SequenceOnly(seq),
                Bases::WithQuality { seq, qual } => FragmentBases::WithQuality { seq, qual },
            };
            return vec![Fragment {
                read_id,
                index: None,
                bases,
            }];
        }

        self.spec
            .ranges(record.seq().len())
            .into_iter()
            .enumerate()
            .map(|(i, range)| {
                let bases = match &record.bases {
                    Bases::SequenceOnly { seq } => FragmentBases::SequenceOnly(&seq[range]),
                    Bases::WithQuality { seq, qual } => FragmentBases::WithQuality {
                        seq: &seq[range.clone()],
                        qual: &qual[range],
                    },
                };
                Fragment {
                    read_id,
                    index: Some(i + 1),
                    bases,
                }
            })
            .collect()
    }

    /// Split every record of `input` and write the FASTQ blocks to `out`.
    pub fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> Result<SplitStats> {
        let mut reader = RecordReader::new(input);
        let mut stats = SplitStats::default();

        while let Some(record) = reader.next_record()? {
            let fragments = self.fragments(&record);
            for fragment in &fragments {
                write_fragment(out, fragment)?;
            }

            stats.records += 1;
            stats.fragments += fragments.len();
            if record.seq().len() > self.min_read_length {
                stats.split_records += 1;
            }
            self.observer.on_record(record.read_id(), fragments.len());
        }
        out.flush()?;

        stats.recovered = reader.recovered();
        self.observer.on_finish(&stats);
        Ok(stats)
    }

    /// Split `input` into one in-memory FASTQ text.
    pub fn split_to_vec<R: BufRead>(&self, input: R) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.run(input, &mut out)?;
        Ok(out)
    }
}

/// Copy `input` to `out` unchanged, for runs with splitting disabled.
pub fn passthrough<R: Read, W: Write>(mut input: R, out: &mut W) -> Result<u64> {
    let copied = io::copy(&mut input, out)?;
    out.flush()?;
    Ok(copied)
}
