//! Single byte-range requests (`Range: bytes=...`)
//!
//! Only one range per request is honoured; multi-range or malformed headers
//! are ignored and the whole file is served, as RFC 9110 permits.

/// What part of a file of known length to serve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
    /// No usable Range header
    Whole,
    /// Inclusive byte positions
    Partial { start: u64, end: u64 },
    /// Range lies outside the file (416)
    Unsatisfiable,
}

impl ByteRange {
    pub fn parse(header: Option<&str>, len: u64) -> Self {
        let Some(spec) = header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
            return Self::Whole;
        };
        if spec.contains(',') {
            return Self::Whole;
        }
        let Some((first, last)) = spec.split_once('-') else {
            return Self::Whole;
        };
        let (first, last) = (first.trim(), last.trim());

        match (first.is_empty(), last.is_empty()) {
            // bytes=-N: final N bytes
            (true, false) => match last.parse::<u64>() {
                Ok(0) => Self::Unsatisfiable,
                Ok(_) if len == 0 => Self::Unsatisfiable,
                Ok(n) => Self::Partial {
                    start: len.saturating_sub(n),
                    end: len - 1,
                },
                Err(_) => Self::Whole,
            },
            // bytes=N- or bytes=N-M
            (false, _) => {
                let Ok(start) = first.parse::<u64>() else {
                    return Self::Whole;
                };
                let end = if last.is_empty() {
                    len.saturating_sub(1)
                } else {
                    match last.parse::<u64>() {
                        Ok(e) if e >= start => e.min(len.saturating_sub(1)),
                        _ => return Self::Whole,
                    }
                };
                if start >= len {
                    Self::Unsatisfiable
                } else {
                    Self::Partial { start, end }
                }
            }
            (true, true) => Self::Whole,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_header() {
        assert_eq!(ByteRange::parse(None, 100), ByteRange::Whole);
        assert_eq!(ByteRange::parse(Some("items=0-9"), 100), ByteRange::Whole);
    }

    #[test]
    fn test_bounded_range() {
        assert_eq!(
            ByteRange::parse(Some("bytes=0-9"), 100),
            ByteRange::Partial { start: 0, end: 9 }
        );
        assert_eq!(
            ByteRange::parse(Some("bytes=90-500"), 100),
            ByteRange::Partial { start: 90, end: 99 }
        );
    }

    #[test]
    fn test_open_range() {
        assert_eq!(
            ByteRange::parse(Some("bytes=50-"), 100),
            ByteRange::Partial { start: 50, end: 99 }
        );
    }

    #[test]
    fn test_suffix_range() {
        assert_eq!(
            ByteRange::parse(Some("bytes=-20"), 100),
            ByteRange::Partial { start: 80, end: 99 }
        );
        assert_eq!(
            ByteRange::parse(Some("bytes=-500"), 100),
            ByteRange::Partial { start: 0, end: 99 }
        );
        assert_eq!(ByteRange::parse(Some("bytes=-0"), 100), ByteRange::Unsatisfiable);
    }

    #[test]
    fn test_unsatisfiable() {
        assert_eq!(ByteRange::parse(Some("bytes=100-"), 100), ByteRange::Unsatisfiable);
        assert_eq!(ByteRange::parse(Some("bytes=0-"), 0), ByteRange::Unsatisfiable);
    }

    #[test]
    fn test_ignored_forms() {
        assert_eq!(ByteRange::parse(Some("bytes=a-b"), 100), ByteRange::Whole);
        assert_eq!(ByteRange::parse(Some("bytes=9-0"), 100), ByteRange::Whole);
        assert_eq!(ByteRange::parse(Some("bytes=0-9,20-29"), 100), ByteRange::Whole);
        assert_eq!(ByteRange::parse(Some("bytes=-"), 100), ByteRange::Whole);
    }
}
