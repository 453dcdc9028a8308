//! Cosmos SDK `Dec` formatting.
//!
//! On the wire a `Dec` is the decimal string of its value scaled by 10^18
//! (`"1500000000000000000"` is 1.5). The chain's JSON output inserts the
//! decimal point; this module does the same for rendered responses.

/// Number of fractional digits carried by a `Dec`.
pub const DEC_PRECISION: usize = 18;

/// Format a wire-format `Dec` with the decimal point in place.
///
/// Strings that are not a plain optionally-signed integer (already
/// formatted, or garbage) are returned unchanged. An empty string is the
/// zero value.
#[must_use]
pub fn format_dec(raw: &str) -> String {
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    if digits.is_empty() {
        if negative {
            return raw.to_string();
        }
        return format!("0.{}", "0".repeat(DEC_PRECISION));
    }

    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return raw.to_string();
    }

    let padded = if digits.len() <= DEC_PRECISION {
        format!("{digits:0>width$}", width = DEC_PRECISION + 1)
    } else {
        digits.to_string()
    };

    let (int_part, frac_part) = padded.split_at(padded.len() - DEC_PRECISION);
    let int_part = int_part.trim_start_matches('0');
    let int_part = if int_part.is_empty() { "0" } else { int_part };

    let is_zero = int_part == "0" && frac_part.bytes().all(|b| b == b'0');
    let sign = if negative && !is_zero { "-" } else { "" };

    format!("{sign}{int_part}.{frac_part}")
}
