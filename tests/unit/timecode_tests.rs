/*!
 * Tests for SRT to ASS timestamp conversion
 */

use dualsub::timecode::{ZERO_TIME, srt_to_ass, try_srt_to_ass};

#[test]
fn test_srt_to_ass_withMilliseconds_shouldTruncateToCentiseconds() {
    assert_eq!(srt_to_ass("00:00:04,400"), "0:00:04.40");
    assert_eq!(srt_to_ass("00:00:04,459"), "0:00:04.45");
    assert_eq!(srt_to_ass("12:34:56,789"), "12:34:56.78");
}

#[test]
fn test_srt_to_ass_withShortFraction_shouldPad() {
    assert_eq!(srt_to_ass("01:02:03,5"), "1:02:03.50");
    assert_eq!(srt_to_ass("01:02:03"), "1:02:03.00");
}

#[test]
fn test_srt_to_ass_withDotSeparatorAndWhitespace_shouldConvert() {
    assert_eq!(srt_to_ass("  00:01:02.030 "), "0:01:02.03");
}

#[test]
fn test_srt_to_ass_withMalformedInput_shouldFallBackToZero() {
    for raw in ["", "garbage", "00:00", "aa:00:01,000", "00:61:00,000", "00:00:01,abc", "1:2:3:4,000"] {
        assert_eq!(srt_to_ass(raw), ZERO_TIME, "input {:?}", raw);
    }
}

#[test]
fn test_try_srt_to_ass_withMalformedInput_shouldReportInput() {
    let err = try_srt_to_ass("00:99:00,000").unwrap_err();
    assert_eq!(err.input, "00:99:00,000");
    assert!(err.to_string().contains("00:99:00,000"));
}
