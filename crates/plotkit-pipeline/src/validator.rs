//! Command validation.
//!
//! Advisory hardening in front of the transport layer. The emitter only
//! produces well-formed commands, so on a healthy run this is a no-op
//! filter; its value is catching a malformed-configuration edge case (a NaN
//! coordinate, a mangled hand-edited file) before it reaches the machine.
//! A single bad line never aborts an otherwise valid program: malformed
//! lines are dropped, logged, and reported back to the caller.

/// A line that failed validation, with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    pub index: usize,
    pub line: String,
}

/// Outcome of validating a command sequence.
///
/// `accepted` is an order-preserving subsequence of the input; nothing is
/// reordered or synthesized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub accepted: Vec<String>,
    pub rejected: Vec<RejectedLine>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Syntactic filter over G-code command text.
pub struct CommandValidator;

impl CommandValidator {
    /// Split a command sequence into well-formed and rejected lines.
    pub fn validate(lines: &[String]) -> ValidationReport {
        let mut report = ValidationReport::default();
        for (index, line) in lines.iter().enumerate() {
            if Self::is_well_formed(line) {
                report.accepted.push(line.clone());
            } else {
                tracing::warn!(index, line = line.as_str(), "dropping malformed command");
                report.rejected.push(RejectedLine {
                    index,
                    line: line.clone(),
                });
            }
        }
        report
    }

    /// Whether a single line belongs to one of the known command families.
    pub fn is_well_formed(line: &str) -> bool {
        let trimmed = line.trim();
        // Blank lines and comments are no-ops, not errors.
        if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('(') {
            return true;
        }

        let mut tokens = trimmed.split_whitespace();
        let head = match tokens.next() {
            Some(t) => t,
            None => return true,
        };

        match head {
            // Modal selectors and simple words take no operands.
            "G21" | "G90" | "G17" | "G94" | "G54" | "M5" | "M30" => tokens.next().is_none(),
            // Tool-on, optionally with a spindle speed word.
            "M3" => match tokens.next() {
                None => true,
                Some(s) => {
                    integer_word(s, 'S').is_some() && tokens.next().is_none()
                }
            },
            // Travel move: X and Y with finite operands.
            "G0" => {
                let rest: Vec<&str> = tokens.collect();
                matches!(rest.as_slice(), &[x, y]
                    if float_word(x, 'X').is_some() && float_word(y, 'Y').is_some())
            }
            // Draw move, or feed-rate selection with a positive feed.
            "G1" => {
                let rest: Vec<&str> = tokens.collect();
                match rest.as_slice() {
                    &[f] => float_word(f, 'F').is_some_and(|v| v > 0.0),
                    &[x, y] => {
                        float_word(x, 'X').is_some() && float_word(y, 'Y').is_some()
                    }
                    _ => false,
                }
            }
            // Dwell with a non-negative duration in seconds.
            "G4" => match (tokens.next(), tokens.next()) {
                (Some(p), None) => float_word(p, 'P').is_some_and(|v| v >= 0.0),
                _ => false,
            },
            _ => false,
        }
    }
}

/// Parse a word like `X12.5`, requiring a finite value.
fn float_word(token: &str, letter: char) -> Option<f64> {
    token
        .strip_prefix(letter)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn integer_word(token: &str, letter: char) -> Option<i64> {
    token.strip_prefix(letter)?.parse::<i64>().ok()
}
