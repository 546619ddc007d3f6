/*!
 * Timestamp conversion from SRT to ASS.
 *
 * SRT writes `HH:MM:SS,mmm`; ASS wants `H:MM:SS.cc` with no leading zero on
 * the hours and exactly two fractional digits. The fractional part is taken
 * digit-wise: extra digits are truncated, missing ones are padded with `0`,
 * so `,4` becomes `.40` and `,456` becomes `.45`.
 */

use log::debug;

use crate::errors::TimeFormatError;

/// Returned for any timestamp that cannot be converted
pub const ZERO_TIME: &str = "0:00:00.00";

/// Convert an SRT timestamp to an ASS timestamp, falling back to [`ZERO_TIME`].
pub fn srt_to_ass(raw: &str) -> String {
    match try_srt_to_ass(raw) {
        Ok(converted) => converted,
        Err(e) => {
            debug!("{}; using {}", e, ZERO_TIME);
            ZERO_TIME.to_string()
        }
    }
}

/// Convert an SRT timestamp to an ASS timestamp.
///
/// A missing fractional part is read as `00`. A `.` is accepted in place of
/// the comma since some encoders emit it.
pub fn try_srt_to_ass(raw: &str) -> Result<String, TimeFormatError> {
    let input = raw.trim();
    let fail = |reason| TimeFormatError { input: input.to_string(), reason };

    if input.is_empty() {
        return Err(fail("empty timestamp"));
    }

    let (clock, fraction) = match input.split_once([',', '.']) {
        Some((clock, fraction)) => (clock, fraction),
        None => (input, ""),
    };

    let mut parts = clock.split(':');
    let (Some(hours), Some(minutes), Some(seconds), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(fail("expected hours:minutes:seconds"));
    };

    let hours = parse_component(hours).ok_or_else(|| fail("hours are not a number"))?;
    let minutes = parse_component(minutes).ok_or_else(|| fail("minutes are not a number"))?;
    let seconds = parse_component(seconds).ok_or_else(|| fail("seconds are not a number"))?;

    if minutes >= 60 || seconds >= 60 {
        return Err(fail("minutes or seconds out of range"));
    }

    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(fail("fractional part is not a number"));
    }

    let mut centis: String = fraction.chars().take(2).collect();
    while centis.len() < 2 {
        centis.push('0');
    }

    Ok(format!("{}:{:02}:{:02}.{}", hours, minutes, seconds, centis))
}

fn parse_component(value: &str) -> Option<u32> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
