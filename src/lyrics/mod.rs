//! Timed-lyrics parsing and synchronization.
//!
//! Parses uploaded lyrics documents in the timed-line format `[MM:SS.ss]text`
//! into an ordered sequence of playback offsets suitable for synchronized
//! display. Lines that don't match the format are dropped and reported, never
//! fatal.

/// Upper bound (exclusive) for a lyric line offset, in seconds.
///
/// The timed-line format caps tracks at one hour; anything at or past this
/// bound is treated as a corrupt timestamp and rejected.
pub const MAX_OFFSET_SECONDS: f64 = 3600.0;

/// A single synchronized lyric line.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    /// Playback time at which the line becomes active, in seconds.
    pub offset_seconds: f64,
    /// The lyric text (may be empty).
    pub text: String,
}

/// Why a line was excluded from the parse result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The line does not match the `[MM:SS.ss]text` shape.
    Malformed,
    /// The line matched but its offset falls outside `[0, 3600)`.
    OutOfRange,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Malformed => "not a timed lyric line",
            RejectReason::OutOfRange => "timestamp out of range",
        }
    }
}

/// A line excluded from the parse result, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct RejectedLine {
    /// 1-based line number in the uploaded document.
    pub line_number: usize,
    /// The offending line, trimmed.
    pub content: String,
    pub reason: RejectReason,
}

/// Result of parsing one lyrics document.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// Accepted lines, sorted ascending by offset (ties keep document order).
    pub lines: Vec<LyricLine>,
    /// Lines that were dropped, in document order.
    pub rejected: Vec<RejectedLine>,
}

impl ParseOutcome {
    /// Emit one informational event per rejected line.
    pub fn log_rejections(&self) {
        for rejected in &self.rejected {
            tracing::info!(
                line = rejected.line_number,
                content = %rejected.content,
                "skipped lyric line: {}",
                rejected.reason.as_str()
            );
        }
    }
}

/// Parse a lyrics document into an ordered sequence of [`LyricLine`]s.
///
/// Pure and deterministic: splits the document into lines, drops blank lines,
/// matches each remaining line against the strict `[MM:SS.ss]text` shape
/// (two-digit minutes, two-digit seconds, two-digit centiseconds), validates
/// the offset against [`MAX_OFFSET_SECONDS`], and stably sorts the accepted
/// lines by offset. Malformed or out-of-range lines land in
/// [`ParseOutcome::rejected`]; one bad line never aborts the document. An
/// empty document yields an empty outcome, not an error.
pub fn parse_document(document: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for (index, raw) in document.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match parse_timed_line(line) {
            Ok(lyric) => outcome.lines.push(lyric),
            Err(reason) => outcome.rejected.push(RejectedLine {
                line_number: index + 1,
                content: line.to_string(),
                reason,
            }),
        }
    }

    // Stable sort: simultaneous lines keep their document order.
    outcome
        .lines
        .sort_by(|a, b| a.offset_seconds.total_cmp(&b.offset_seconds));

    outcome
}

/// Parse a lyrics document, keeping only the accepted lines.
pub fn parse(document: &str) -> Vec<LyricLine> {
    parse_document(document).lines
}

/// Match a single trimmed line against the `[MM:SS.ss]text` shape.
fn parse_timed_line(line: &str) -> Result<LyricLine, RejectReason> {
    // Fixed-width prefix: [ M M : S S . s s ]  -- ten ASCII bytes.
    let bytes = line.as_bytes();
    if bytes.len() < 10
        || bytes[0] != b'['
        || bytes[3] != b':'
        || bytes[6] != b'.'
        || bytes[9] != b']'
    {
        return Err(RejectReason::Malformed);
    }
    let digits_ok = [1, 2, 4, 5, 7, 8]
        .iter()
        .all(|&i| bytes[i].is_ascii_digit());
    if !digits_ok {
        return Err(RejectReason::Malformed);
    }

    // The checked prefix is all ASCII, so these slices are on char boundaries.
    let minutes: u32 = line[1..3].parse().map_err(|_| RejectReason::Malformed)?;
    let seconds: f64 = line[4..9].parse().map_err(|_| RejectReason::Malformed)?;

    let offset_seconds = f64::from(minutes) * 60.0 + seconds;
    if !(0.0..MAX_OFFSET_SECONDS).contains(&offset_seconds) {
        return Err(RejectReason::OutOfRange);
    }

    Ok(LyricLine {
        offset_seconds,
        text: line[10..].trim().to_string(),
    })
}

/// Render a sequence back to canonical timed-line text.
///
/// Re-parsing the rendered text yields the same sequence, provided the input
/// offsets are in range (which [`parse_document`] guarantees for its output).
pub fn render(lines: &[LyricLine]) -> String {
    let mut out = String::new();
    for line in lines {
        let centis = (line.offset_seconds * 100.0).round() as u64;
        out.push_str(&format!(
            "[{:02}:{:02}.{:02}]{}\n",
            centis / 6000,
            centis % 6000 / 100,
            centis % 100,
            line.text
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(offset_seconds: f64, text: &str) -> LyricLine {
        LyricLine {
            offset_seconds,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_parse_sorts_by_offset() {
        let lines = parse("[00:01.50]Hello\n[00:00.00]World");
        assert_eq!(lines, vec![line(0.0, "World"), line(1.5, "Hello")]);
    }

    #[test]
    fn test_parse_ties_keep_document_order() {
        let lines = parse("[00:05.00]A\n[00:05.00]B");
        assert_eq!(lines, vec![line(5.0, "A"), line(5.0, "B")]);
    }

    #[test]
    fn test_parse_drops_malformed_lines() {
        let outcome = parse_document("not a timed line\n[00:02.00]Valid");
        assert_eq!(outcome.lines, vec![line(2.0, "Valid")]);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].line_number, 1);
        assert_eq!(outcome.rejected[0].reason, RejectReason::Malformed);
    }

    #[test]
    fn test_parse_rejects_out_of_range_offset() {
        // 99 minutes is 5999.99s, past the one-hour bound.
        let outcome = parse_document("[99:59.99]Too late");
        assert!(outcome.lines.is_empty());
        assert_eq!(outcome.rejected[0].reason, RejectReason::OutOfRange);
    }

    #[test]
    fn test_parse_boundary_offsets() {
        // 59:59.99 is the last representable in-range timestamp.
        let lines = parse("[59:59.99]last");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].offset_seconds < MAX_OFFSET_SECONDS);

        // Exactly one hour is out.
        assert!(parse("[60:00.00]over").is_empty());
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n   \n").is_empty());
    }

    #[test]
    fn test_parse_trims_text() {
        let lines = parse("[00:10.25]   padded text   ");
        assert_eq!(lines, vec![line(10.25, "padded text")]);
    }

    #[test]
    fn test_parse_keeps_empty_text() {
        // Instrumental gap markers carry a timestamp with no text.
        let lines = parse("[00:30.00]");
        assert_eq!(lines, vec![line(30.0, "")]);
    }

    #[test]
    fn test_parse_rejects_loose_shapes() {
        // One-digit minutes, missing centiseconds, metadata tags, stray
        // whitespace inside the bracket: all malformed under the strict shape.
        for doc in [
            "[0:01.50]short minutes",
            "[00:01]no centiseconds",
            "[00:01.5]one centisecond digit",
            "[ar:Artist]metadata",
            "[00 01.50]no colon",
            "00:01.50]no opening bracket",
        ] {
            let outcome = parse_document(doc);
            assert!(outcome.lines.is_empty(), "accepted: {doc}");
            assert_eq!(outcome.rejected.len(), 1);
        }
    }

    #[test]
    fn test_one_valid_line_among_many_malformed() {
        let mut doc = String::new();
        for i in 0..99 {
            doc.push_str(&format!("garbage {i}\n"));
        }
        doc.push_str("[00:01.00]kept");

        let outcome = parse_document(&doc);
        assert_eq!(outcome.lines, vec![line(1.0, "kept")]);
        assert_eq!(outcome.rejected.len(), 99);
    }

    #[test]
    fn test_parse_handles_multibyte_text() {
        let lines = parse("[00:03.25]歌詞のテスト");
        assert_eq!(lines, vec![line(3.25, "歌詞のテスト")]);

        // Multibyte garbage where digits should be must not panic.
        assert!(parse("[ää:bb.cc]text").is_empty());
    }

    #[test]
    fn test_render_round_trip() {
        let first = parse("[00:01.50]Hello\n[00:00.00]World\n[00:05.00]A\n[00:05.00]B");
        let second = parse(&render(&first));
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_canonical_format() {
        let rendered = render(&[line(83.07, "mid"), line(0.0, "")]);
        assert_eq!(rendered, "[01:23.07]mid\n[00:00.00]\n");
    }
}
