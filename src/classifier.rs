//! Diagnostic classification for validator output.
//!
//! ffmpeg's error-severity stderr is noisy even for healthy Matroska
//! files. A fixed rule set filters the line shapes known to be harmless;
//! any line that survives every rule marks the file as corrupt.
//!
//! ## Rule set
//! - Muxer timestamp-ordering warnings are always benign (the null muxer
//!   complains about out-of-order timestamps that players tolerate).
//! - "Last message repeated" continuation markers are always benign.
//! - "header missing" is benign at any nonzero stream offset and fatal at
//!   offset zero (no header at the very start of the stream means the
//!   file cannot be decoded at all).

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Muxer complaint about out-of-order timestamps during stream copy.
const BENIGN_MUXER_DTS: &str = "non monotonically increasing dts to muxer";

/// Continuation marker printed instead of repeating the previous line.
const BENIGN_REPEAT: &str = "Last message repeated";

/// One filtering rule applied to a single diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRule {
    /// The line is discarded when it contains the literal substring.
    Benign(&'static str),
    /// `<hex>] header missing` (case-insensitive): the run of hex digits
    /// immediately preceding `]` is the stream offset. Nonzero offsets
    /// are benign, offset zero is fatal.
    HeaderMissingAtOffset,
}

/// The fixed, ordered rule set. Rules are independent; every rule is
/// consulted before a line is deemed an error.
pub const RULES: &[LineRule] = &[
    LineRule::Benign(BENIGN_MUXER_DTS),
    LineRule::Benign(BENIGN_REPEAT),
    LineRule::HeaderMissingAtOffset,
];

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Unparsable hex offset in diagnostic line: {line}")]
    OffsetParse { line: String },
}

/// Verdict for one validation run's diagnostic text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    error_lines: Vec<String>,
}

impl Verdict {
    /// True iff no diagnostic line survived the rule set.
    pub fn passed(&self) -> bool {
        self.error_lines.is_empty()
    }

    /// Lines that survived every rule, in emission order.
    pub fn error_lines(&self) -> &[String] {
        &self.error_lines
    }
}

fn header_missing_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)([0-9a-f]+)\] header missing").expect("hardcoded pattern compiles")
    })
}

/// Classify the raw diagnostic text of one validation run.
///
/// Line endings are normalized and blank lines dropped before the rule
/// set is applied. Empty input trivially passes.
pub fn classify(raw: &str) -> Result<Verdict, ClassifyError> {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut error_lines = Vec::new();

    for line in normalized.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if !line_is_benign(line)? {
            error_lines.push(line.to_string());
        }
    }

    Ok(Verdict { error_lines })
}

fn line_is_benign(line: &str) -> Result<bool, ClassifyError> {
    for rule in RULES {
        match rule {
            LineRule::Benign(needle) => {
                if line.contains(needle) {
                    return Ok(true);
                }
            }
            LineRule::HeaderMissingAtOffset => {
                if let Some(caps) = header_missing_re().captures(line) {
                    let digits = &caps[1];
                    let offset = u64::from_str_radix(digits, 16).map_err(|_| {
                        ClassifyError::OffsetParse {
                            line: line.to_string(),
                        }
                    })?;
                    if offset > 0 {
                        return Ok(true);
                    }
                }
            }
        }
    }
    Ok(false)
}
