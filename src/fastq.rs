use std::io::{self, Write};

/// Bases of one output fragment, borrowed from the parent record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentBases<'a> {
    SequenceOnly(&'a [u8]),
    WithQuality { seq: &'a [u8], qual: &'a [u8] },
}

impl<'a> FragmentBases<'a> {
    pub fn seq(&self) -> &'a [u8] {
        match *self {
            FragmentBases::SequenceOnly(seq) | FragmentBases::WithQuality { seq, .. } => seq,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub read_id: &'a [u8],
    /// 1-based window number; `None` when the read was not split.
    pub index: Option<usize>,
    pub bases: FragmentBases<'a>,
}

/// Write `fragment` as a 4-line FASTQ block.
///
/// Both the `@` and `+` lines carry `<id>[_<index>] length=<n>`. A fragment
/// without qualities gets an empty fourth line.
pub fn write_fragment<W: Write>(out: &mut W, fragment: &Fragment) -> io::Result<()> {
    let seq = fragment.bases.seq();
    for marker in [b'@', b'+'] {
        out.write_all(&[marker])?;
        out.write_all(fragment.read_id)?;
        if let Some(index) = fragment.index {
            write!(out, "_{}", index)?;
        }
        writeln!(out, " length={}", seq.len())?;
        if marker == b'@' {
            out.write_all(seq)?;
            out.write_all(b"\n")?;
        }
    }
    match fragment.bases {
        FragmentBases::WithQuality { qual, .. } => out.write_all(qual)?,
        FragmentBases::SequenceOnly(_) => {}
    }
    out.write_all(b"\n")
}

pub fn format_fragment(fragment: &Fragment) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(2 * fragment.bases.seq().len() + 64);
    write_fragment(&mut buf, fragment)?;
    Ok(buf)
}
