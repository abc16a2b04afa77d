//! Streaming FASTA/FASTQ record reader.
//!
//! The reader walks the input line by line, carrying at most one line of
//! lookahead between records. FASTA and FASTQ records may be mixed in one
//! stream, and both sequence and quality bodies may be wrapped over any number
//! of lines. A FASTQ record whose quality block ends before it covers the
//! sequence is emitted without qualities and ends the stream; a quality block
//! that runs past the sequence is cut to the sequence length.

use crate::error::Result;
use crate::record::{Bases, SequenceRecord};
use log::debug;
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SeekHeader,
    ReadSequence,
    ReadQuality,
    Finished,
}

pub struct RecordReader<R> {
    inner: R,
    state: State,
    pending: Option<Vec<u8>>,
    exhausted: bool,
    header: Vec<u8>,
    seq: Vec<u8>,
    recovered: usize,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            state: State::SeekHeader,
            pending: None,
            exhausted: false,
            header: Vec::new(),
            seq: Vec::new(),
            recovered: 0,
        }
    }

    /// Number of FASTQ records whose quality block did not match the
    /// sequence length and was repaired.
    pub fn recovered(&self) -> usize {
        self.recovered
    }

    fn read_line(&mut self) -> Result<Option<Vec<u8>>> {
        if self.exhausted {
            return Ok(None);
        }
        let mut line = Vec::new();
        if self.inner.read_until(b'\n', &mut line)? == 0 {
            self.exhausted = true;
            return Ok(None);
        }
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    fn take_record(&mut self, qual: Option<Vec<u8>>) -> SequenceRecord {
        let header = std::mem::take(&mut self.header);
        let seq = std::mem::take(&mut self.seq);
        let bases = match qual {
            Some(qual) => Bases::WithQuality { seq, qual },
            None => Bases::SequenceOnly { seq },
        };
        SequenceRecord { header, bases }
    }

    pub fn next_record(&mut self) -> Result<Option<SequenceRecord>> {
        loop {
            match self.state {
                State::Finished => return Ok(None),
                State::SeekHeader => {
                    if self.pending.is_none() {
                        while let Some(line) = self.read_line()? {
                            if matches!(line.first(), Some(b'>' | b'@')) {
                                self.pending = Some(line);
                                break;
                            }
                        }
                    }
                    match self.pending.take() {
                        Some(line) => {
                            self.header = line[1..].to_vec();
                            self.seq.clear();
                            self.state = State::ReadSequence;
                        }
                        None => self.state = State::Finished,
                    }
                }
                State::ReadSequence => {
                    while let Some(line) = self.read_line()? {
                        if matches!(line.first(), Some(b'@' | b'+' | b'>')) {
                            self.pending = Some(line);
                            break;
                        }
                        self.seq.extend_from_slice(&line);
                    }
                    match self.pending.as_deref() {
                        Some([b'+', ..]) => {
                            self.pending = None;
                            self.state = State::ReadQuality;
                        }
                        Some(_) => {
                            self.state = State::SeekHeader;
                            return Ok(Some(self.take_record(None)));
                        }
                        None => {
                            self.state = State::Finished;
                            return Ok(Some(self.take_record(None)));
                        }
                    }
                }
                State::ReadQuality => {
                    let mut qual = Vec::with_capacity(self.seq.len());
                    let mut complete = false;
                    while let Some(line) = self.read_line()? {
                        qual.extend_from_slice(&line);
                        if qual.len() >= self.seq.len() {
                            complete = true;
                            break;
                        }
                    }
                    if !complete {
                        debug!(
                            "Quality of read {} ends early ({} of {} bases), keeping sequence only",
                            String::from_utf8_lossy(crate::record::read_id(&self.header)),
                            qual.len(),
                            self.seq.len()
                        );
                        self.recovered += 1;
                        self.state = State::Finished;
                        return Ok(Some(self.take_record(None)));
                    }
                    if qual.len() > self.seq.len() {
                        debug!(
                            "Quality of read {} overruns its sequence ({} of {} bases), truncating",
                            String::from_utf8_lossy(crate::record::read_id(&self.header)),
                            qual.len(),
                            self.seq.len()
                        );
                        self.recovered += 1;
                        qual.truncate(self.seq.len());
                    }
                    self.state = State::SeekHeader;
                    return Ok(Some(self.take_record(Some(qual))));
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<SequenceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
