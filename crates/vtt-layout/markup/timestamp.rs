//! Inline cue timestamp parsing
//!
//! Accepts `H+:MM:SS.mmm` and `MM:SS.mmm`. In the two-field form a leading
//! field above 59 is read as `hours:minutes` with zero seconds.

use smallvec::SmallVec;

/// Parse an inline timestamp body (without angle brackets) into seconds
///
/// # Example
///
/// ```rust
/// use vtt_layout::markup::parse_timestamp;
///
/// assert_eq!(parse_timestamp("00:01.500"), Some(1.5));
/// assert_eq!(parse_timestamp("1:02:03.000"), Some(3723.0));
/// assert_eq!(parse_timestamp("90:30.000"), Some(90.0 * 3600.0 + 30.0 * 60.0));
/// assert_eq!(parse_timestamp("1:2.3"), None);
/// ```
#[must_use]
pub fn parse_timestamp(input: &str) -> Option<f64> {
    let (clock, millis) = input.split_once('.')?;
    let millis = fixed_digits(millis, 3)?;

    let fields: SmallVec<[&str; 3]> = clock.split(':').collect();
    let (hours, minutes, seconds) = match fields.as_slice() {
        [first, second] => {
            let first = leading_digits(first)?;
            let second = fixed_digits(second, 2)?;
            if first > 59 {
                (first, second, 0)
            } else {
                (0, first, second)
            }
        }
        [hours, minutes, seconds] => (
            leading_digits(hours)?,
            fixed_digits(minutes, 2)?,
            fixed_digits(seconds, 2)?,
        ),
        _ => return None,
    };

    Some(
        (hours as f64).mul_add(3600.0, minutes as f64 * 60.0)
            + seconds as f64
            + millis as f64 / 1000.0,
    )
}

/// Parse a field of one or more ASCII digits
fn leading_digits(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Parse a field of exactly `width` ASCII digits
fn fixed_digits(field: &str, width: usize) -> Option<u64> {
    if field.len() != width {
        return None;
    }
    leading_digits(field)
}
