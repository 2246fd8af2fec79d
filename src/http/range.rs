//! HTTP Range header parsing (RFC 7233, single `bytes` range only).

/// A parsed byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte position.
    pub start: usize,
    /// Last byte position; `None` means to end of file.
    pub end: Option<usize>,
}

impl ByteRange {
    /// Actual last byte position for a file of the given size.
    #[inline]
    pub fn end_position(&self, file_size: usize) -> usize {
        self.end.unwrap_or_else(|| file_size.saturating_sub(1))
    }
}

/// Outcome of parsing a Range header.
#[derive(Debug)]
pub enum RangeParseResult {
    /// Satisfiable range; answer 206.
    Valid(ByteRange),
    /// Start beyond end of file; answer 416.
    NotSatisfiable,
    /// No header, non-bytes unit, or malformed; serve the full body.
    None,
}

/// Parse a Range header value against a known file size.
///
/// Supported forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
/// Multi-range requests are ignored (full body is served).
pub fn parse_range_header(range_header: Option<&str>, file_size: usize) -> RangeParseResult {
    let Some(header) = range_header else {
        return RangeParseResult::None;
    };
    let Some(ranges) = header.strip_prefix("bytes=") else {
        return RangeParseResult::None;
    };
    if ranges.contains(',') {
        return RangeParseResult::None;
    }

    let Some((start_str, end_str)) = ranges.split_once('-') else {
        return RangeParseResult::None;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if start_str.is_empty() {
        // Suffix form: last N bytes.
        let Ok(suffix) = end_str.parse::<usize>() else {
            return RangeParseResult::None;
        };
        // A zero-length representation has no satisfiable range.
        if suffix == 0 || file_size == 0 {
            return RangeParseResult::NotSatisfiable;
        }
        return RangeParseResult::Valid(ByteRange {
            start: file_size.saturating_sub(suffix),
            end: Some(file_size.saturating_sub(1)),
        });
    }

    let Ok(start) = start_str.parse::<usize>() else {
        return RangeParseResult::None;
    };
    if start >= file_size {
        return RangeParseResult::NotSatisfiable;
    }

    let end = if end_str.is_empty() {
        None
    } else {
        let Ok(e) = end_str.parse::<usize>() else {
            return RangeParseResult::None;
        };
        if start > e {
            return RangeParseResult::NotSatisfiable;
        }
        Some(e.min(file_size - 1))
    };

    RangeParseResult::Valid(ByteRange { start, end })
}
