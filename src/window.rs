use crate::error::{Result, SplitError};
use std::ops::Range;

/// Validated window geometry: `length > 0` and `overlap < length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    length: usize,
    overlap: usize,
}

impl WindowSpec {
    pub fn new(length: usize, overlap: usize) -> Result<Self> {
        if length == 0 {
            return Err(SplitError::invalid_config("window length must be positive"));
        }
        if overlap >= length {
            return Err(SplitError::invalid_config(format!(
                "overlap ({}) must be smaller than window length ({})",
                overlap, length
            )));
        }
        Ok(Self { length, overlap })
    }

    pub fn step(&self) -> usize {
        self.length - self.overlap
    }

    /// Window boundaries over a sequence of `len` bases.
    ///
    /// Windows start every `step` bases from offset 0. The first window that
    /// would run past the end is replaced by the last `length` bases and ends
    /// the list, so every window is `length` long unless the whole sequence is
    /// shorter than that. The replacement may repeat the previous window.
    pub fn ranges(&self, len: usize) -> Vec<Range<usize>> {
        if len == self.length {
            return vec![0..len];
        }
        let mut out = Vec::with_capacity(len / self.step() + 1);
        let mut start = 0;
        while start < len {
            let end = start + self.length;
            if end > len {
                out.push(len.saturating_sub(self.length)..len);
                break;
            }
            out.push(start..end);
            start += self.step();
        }
        out
    }

    pub fn split<'a>(&self, s: &'a [u8]) -> Vec<&'a [u8]> {
        self.ranges(s.len()).into_iter().map(|r| &s[r]).collect()
    }
}

/// Convenience wrapper validating the geometry on every call.
pub fn split(s: &[u8], length: usize, overlap: usize) -> Result<Vec<&[u8]>> {
    Ok(WindowSpec::new(length, overlap)?.split(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windows(s: &str, length: usize, overlap: usize) -> Vec<String> {
        split(s.as_bytes(), length, overlap)
            .unwrap()
            .into_iter()
            .map(|w| String::from_utf8(w.to_vec()).unwrap())
            .collect()
    }

    #[test]
    fn tail_window_is_replaced_by_suffix() {
        assert_eq!(
            windows("ACGTACGTAC", 4, 1),
            vec!["ACGT", "TACG", "GTAC", "GTAC"]
        );
    }

    #[test]
    fn windows_after_short_one_are_dropped() {
        // starts 0,2,4,6; the window at 4 is the first short one
        assert_eq!(windows("ABCDEFGH", 5, 3), vec!["ABCDE", "CDEFG", "DEFGH"]);
        // a window ending exactly at the tail is followed by its own repeat
        assert_eq!(windows("ABCDEFG", 3, 1), vec!["ABC", "CDE", "EFG", "EFG"]);
    }

    #[test]
    fn exact_multiple_is_untouched() {
        assert_eq!(windows("AAAACCCCGGGG", 4, 0), vec!["AAAA", "CCCC", "GGGG"]);
    }

    #[test]
    fn sequence_of_window_length_is_one_window() {
        assert_eq!(windows("ACGT", 4, 0), vec!["ACGT"]);
        assert_eq!(windows("ACGT", 4, 3), vec!["ACGT"]);
    }

    #[test]
    fn shorter_than_window_is_kept_whole() {
        assert_eq!(windows("ACG", 4, 1), vec!["ACG"]);
        assert!(windows("", 4, 1).is_empty());
    }

    #[test]
    fn every_window_has_full_length() {
        let seq: Vec<u8> = (0..257u32).map(|i| b"ACGT"[(i % 4) as usize]).collect();
        for length in 1..20 {
            for overlap in 0..length {
                let spec = WindowSpec::new(length, overlap).unwrap();
                let ws = spec.split(&seq);
                assert!(!ws.is_empty());
                assert!(ws.iter().all(|w| w.len() == length));
                assert_eq!(ws.last().unwrap(), &&seq[seq.len() - length..]);
            }
        }
    }

    #[test]
    fn quality_uses_identical_boundaries() {
        let spec = WindowSpec::new(4, 1).unwrap();
        let seq = b"ACGTACGTAC";
        let qual = b"0123456789";
        let s = spec.split(seq);
        let q = spec.split(qual);
        assert_eq!(q, vec![&b"0123"[..], &b"3456"[..], &b"6789"[..], &b"6789"[..]]);
        assert!(s.iter().zip(&q).all(|(a, b)| a.len() == b.len()));
    }

    #[test]
    fn rejects_non_positive_step() {
        assert!(matches!(
            WindowSpec::new(4, 4),
            Err(SplitError::InvalidConfig { .. })
        ));
        assert!(WindowSpec::new(4, 9).is_err());
        assert!(WindowSpec::new(0, 0).is_err());
        assert!(split(b"ACGT", 2, 2).is_err());
    }
}
