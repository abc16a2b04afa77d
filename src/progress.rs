//! Progress observers injected into the split pipeline.
//!
//! Observers only watch: they receive each processed read and the final
//! statistics and cannot change what the pipeline writes.

use crate::pipeline::SplitStats;
use indicatif::style::TemplateError;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::debug;
use std::time::Duration;

pub trait ProgressObserver {
    fn on_record(&self, read_id: &[u8], fragments: usize);

    fn on_finish(&self, _stats: &SplitStats) {}
}

/// Silent observer.
impl ProgressObserver for () {
    fn on_record(&self, _read_id: &[u8], _fragments: usize) {}
}

impl<O: ProgressObserver + ?Sized> ProgressObserver for &O {
    fn on_record(&self, read_id: &[u8], fragments: usize) {
        (**self).on_record(read_id, fragments)
    }

    fn on_finish(&self, stats: &SplitStats) {
        (**self).on_finish(stats)
    }
}

impl<O: ProgressObserver + ?Sized> ProgressObserver for Box<O> {
    fn on_record(&self, read_id: &[u8], fragments: usize) {
        (**self).on_record(read_id, fragments)
    }

    fn on_finish(&self, stats: &SplitStats) {
        (**self).on_finish(stats)
    }
}

/// Reports every read at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_record(&self, read_id: &[u8], fragments: usize) {
        debug!(
            "Process read {} ({} fragments)",
            String::from_utf8_lossy(read_id),
            fragments
        );
    }
}

/// Spinner counting processed reads.
pub struct ProgressBarObserver {
    pb: ProgressBar,
}

impl ProgressBarObserver {
    pub fn new(message: impl Into<String>) -> Result<Self, TemplateError> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} {pos} reads [{elapsed_precise}]")?,
        );
        pb.set_message(message.into());
        pb.enable_steady_tick(Duration::from_millis(200));
        Ok(Self { pb })
    }

    /// Attach the spinner to `multi` so several inputs can report at once.
    pub fn in_multi(self, multi: &MultiProgress) -> Self {
        Self {
            pb: multi.add(self.pb),
        }
    }
}

impl ProgressObserver for ProgressBarObserver {
    fn on_record(&self, read_id: &[u8], fragments: usize) {
        self.pb.inc(1);
        LogObserver.on_record(read_id, fragments);
    }

    fn on_finish(&self, stats: &SplitStats) {
        self.pb.finish_with_message(format!(
            "Split {} reads into {} fragments",
            stats.records, stats.fragments
        ));
    }
}
