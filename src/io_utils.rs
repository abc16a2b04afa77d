use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCompression {
    None,
    Gzip,
    Zstd,
}

impl OutputCompression {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputCompression::None => "",
            OutputCompression::Gzip => ".gz",
            OutputCompression::Zstd => ".zst",
        }
    }
}

/// Sniff the first bytes of `br` and wrap it in the matching decoder.
fn decoded<R: BufRead + 'static>(mut br: R) -> io::Result<Box<dyn BufRead>> {
    let (is_gz, is_zstd) = {
        let buf = br.fill_buf()?;
        (buf.starts_with(&GZIP_MAGIC), buf.starts_with(&ZSTD_MAGIC))
    };
    if is_gz {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(br))))
    } else if is_zstd {
        Ok(Box::new(BufReader::new(zstd::stream::read::Decoder::with_buffer(br)?)))
    } else {
        Ok(Box::new(br))
    }
}

/// Open `path` (or stdin for `-`) as a line-readable stream, transparently
/// decompressing gzip and zstd content.
pub fn open_input(path: &str) -> Result<Box<dyn BufRead>, Box<dyn Error>> {
    let reader = if path == "-" {
        decoded(BufReader::new(io::stdin()))?
    } else {
        let f = File::open(path).map_err(|e| format!("cannot open {}: {}", path, e))?;
        decoded(BufReader::new(f))?
    };
    Ok(reader)
}

type Sink = BufWriter<Box<dyn Write>>;

/// Output stream that must be closed with [`OutputWriter::finish`] so that
/// errors while writing the gzip trailer or the last zstd frame surface.
pub enum OutputWriter {
    Plain(Sink),
    Gzip(GzEncoder<Sink>),
    Zstd(zstd::stream::write::Encoder<'static, Sink>),
}

impl OutputWriter {
    pub fn new(sink: Box<dyn Write>, compression: OutputCompression) -> io::Result<Self> {
        let sink = BufWriter::new(sink);
        Ok(match compression {
            OutputCompression::None => OutputWriter::Plain(sink),
            OutputCompression::Gzip => {
                OutputWriter::Gzip(GzEncoder::new(sink, Compression::default()))
            }
            OutputCompression::Zstd => {
                OutputWriter::Zstd(zstd::stream::write::Encoder::new(sink, 0)?)
            }
        })
    }

    /// Write any compression trailer and flush the underlying sink.
    pub fn finish(self) -> io::Result<()> {
        let mut sink = match self {
            OutputWriter::Plain(sink) => sink,
            OutputWriter::Gzip(gz) => gz.finish()?,
            OutputWriter::Zstd(zst) => zst.finish()?,
        };
        sink.flush()
    }
}

impl Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputWriter::Plain(w) => w.write(buf),
            OutputWriter::Gzip(w) => w.write(buf),
            OutputWriter::Zstd(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputWriter::Plain(w) => w.flush(),
            OutputWriter::Gzip(w) => w.flush(),
            OutputWriter::Zstd(w) => w.flush(),
        }
    }
}

/// Open `path` (stdout when `None`) for writing with the requested compression.
pub fn open_output(
    path: Option<&Path>,
    compression: OutputCompression,
) -> Result<OutputWriter, Box<dyn Error>> {
    let sink: Box<dyn Write> = match path {
        Some(p) => Box::new(File::create(p)?),
        None => Box::new(io::stdout()),
    };
    Ok(OutputWriter::new(sink, compression)?)
}

/// Species name derived from a read file path: the file name up to its first `.`.
pub fn species_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .filter(|n| !n.is_empty() && *n != "-")
        .unwrap_or("stdin")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::NamedTempFile;

    fn read_all(path: &str) -> Result<String, Box<dyn Error>> {
        let mut reader = open_input(path)?;
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        Ok(buf)
    }

    #[test]
    fn open_plain_file_reads_contents() -> Result<(), Box<dyn Error>> {
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, ">r1\nACGT\n")?;
        let path = tmp.path().to_str().unwrap().to_string();

        assert_eq!(read_all(&path)?, ">r1\nACGT\n");
        Ok(())
    }

    #[test]
    fn open_gz_file_reads_decompressed() -> Result<(), Box<dyn Error>> {
        let tmp = NamedTempFile::new()?;
        let path = tmp.path().to_str().unwrap().to_string();
        {
            let f = File::create(&path)?;
            let mut gz = GzEncoder::new(f, Compression::default());
            write!(gz, "@r1\nACGT\n+\nIIII\n")?;
            gz.finish()?;
        }

        assert_eq!(read_all(&path)?, "@r1\nACGT\n+\nIIII\n");
        Ok(())
    }

    #[test]
    fn open_zstd_file_reads_decompressed() -> Result<(), Box<dyn Error>> {
        let tmp = NamedTempFile::new()?;
        let path = tmp.path().to_str().unwrap().to_string();
        std::fs::write(&path, zstd::encode_all(&b">r1\nAC\n"[..], 0)?)?;

        assert_eq!(read_all(&path)?, ">r1\nAC\n");
        Ok(())
    }

    #[test]
    fn truncated_gz_is_an_io_error() -> Result<(), Box<dyn Error>> {
        let mut gz = GzEncoder::new(Vec::new(), Compression::default());
        gz.write_all(&b"@r1\nACGTACGTACGTACGT\n+\nIIIIIIIIIIIIIIII\n".repeat(50))?;
        let bytes = gz.finish()?;
        let tmp = NamedTempFile::new()?;
        std::fs::write(tmp.path(), &bytes[..bytes.len() / 2])?;

        let mut reader = open_input(tmp.path().to_str().unwrap())?;
        let mut buf = Vec::new();
        assert!(reader.read_to_end(&mut buf).is_err());
        Ok(())
    }

    #[test]
    fn missing_file_is_reported() {
        let err = open_input("/nonexistent/reads.fq").err().unwrap();
        assert!(err.to_string().contains("/nonexistent/reads.fq"));
    }

    #[test]
    fn gz_output_round_trips() -> Result<(), Box<dyn Error>> {
        let tmp = NamedTempFile::new()?;
        {
            let mut out = open_output(Some(tmp.path()), OutputCompression::Gzip)?;
            out.write_all(b"@r1 length=2\nAC\n+r1 length=2\nII\n")?;
            out.finish()?;
        }
        assert_eq!(
            read_all(tmp.path().to_str().unwrap())?,
            "@r1 length=2\nAC\n+r1 length=2\nII\n"
        );
        Ok(())
    }

    #[test]
    fn zstd_output_round_trips() -> Result<(), Box<dyn Error>> {
        let tmp = NamedTempFile::new()?;
        let mut out = open_output(Some(tmp.path()), OutputCompression::Zstd)?;
        out.write_all(b">r1\nACGT\n")?;
        out.finish()?;

        assert_eq!(read_all(tmp.path().to_str().unwrap())?, ">r1\nACGT\n");
        Ok(())
    }

    /// Accepts nothing, like a full disk.
    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "no space left on device"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn finish_reports_write_failures() {
        for compression in [
            OutputCompression::None,
            OutputCompression::Gzip,
            OutputCompression::Zstd,
        ] {
            let mut out = OutputWriter::new(Box::new(FullDisk), compression).unwrap();
            // small writes stay buffered; the failure shows up on finish
            out.write_all(b"@r1 length=2\nAC\n+r1 length=2\nII\n").unwrap();
            let err = out.finish().unwrap_err();
            assert!(err.to_string().contains("no space left"), "{:?}", compression);
        }
    }

    #[test]
    fn species_name_from_path() {
        assert_eq!(species_name("/data/reads/ECOLI.R1.fq.gz"), "ECOLI");
        assert_eq!(species_name("sample.fastq"), "sample");
        assert_eq!(species_name("-"), "stdin");
    }
}
