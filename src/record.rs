/// Residues of one read, with or without per-base qualities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bases {
    SequenceOnly { seq: Vec<u8> },
    WithQuality { seq: Vec<u8>, qual: Vec<u8> },
}

/// One parsed FASTA or FASTQ record.
///
/// `header` is the raw header line without its `>`/`@` marker, description
/// text included. Records are short-lived: the pipeline turns each one into
/// fragments and drops it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub header: Vec<u8>,
    pub bases: Bases,
}

impl SequenceRecord {
    pub fn seq(&self) -> &[u8] {
        match &self.bases {
            Bases::SequenceOnly { seq } | Bases::WithQuality { seq, .. } => seq,
        }
    }

    pub fn qual(&self) -> Option<&[u8]> {
        match &self.bases {
            Bases::SequenceOnly { .. } => None,
            Bases::WithQuality { qual, .. } => Some(qual),
        }
    }

    /// Header truncated at the first whitespace.
    pub fn read_id(&self) -> &[u8] {
        read_id(&self.header)
    }
}

pub fn read_id(header: &[u8]) -> &[u8] {
    let end = header
        .iter()
        .position(|b| b.is_ascii_whitespace())
        .unwrap_or(header.len());
    &header[..end]
}
