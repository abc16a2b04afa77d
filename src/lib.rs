//! Re-segment sequencing reads into fixed-length, overlapping FASTQ fragments.
//!
//! Records are streamed from FASTA or FASTQ input by [`RecordReader`], reads
//! longer than a threshold are cut into windows by [`WindowSpec`], and every
//! fragment is written as a 4-line FASTQ block by [`write_fragment`].
//! [`SplitPipeline`] ties the three together.

pub mod error;
pub mod fastq;
pub mod io_utils;
pub mod pipeline;
pub mod progress;
pub mod reader;
pub mod record;
pub mod window;

pub use error::{Result, SplitError};
pub use fastq::{format_fragment, write_fragment, Fragment, FragmentBases};
pub use pipeline::{passthrough, SplitConfig, SplitPipeline, SplitStats};
pub use progress::{LogObserver, ProgressBarObserver, ProgressObserver};
pub use reader::RecordReader;
pub use record::{Bases, SequenceRecord};
pub use window::WindowSpec;
