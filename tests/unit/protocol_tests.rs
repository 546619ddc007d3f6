/*!
 * Tests for the slot-tagged translation protocol
 */

use dualsub::subtitle_processor::{Batch, CaptionEntry};
use dualsub::translation::SlotTranslation;
use dualsub::translation::protocol::{decode_response, encode_batch, system_directive};

fn batch(texts: &[&str]) -> Batch {
    Batch {
        index: 0,
        entries: texts
            .iter()
            .enumerate()
            .map(|(i, t)| CaptionEntry::new(i, "00:00:00,000", "00:00:01,000", *t))
            .collect(),
    }
}

/// Test that every slot is recovered whatever order the answer lines come in
#[test]
fn test_decode_response_withReversedAnswer_shouldRecoverEverySlot() {
    let source = batch(&["one", "two", "three", "four"]);
    let encoded = encode_batch(&source);

    let mut answer: Vec<String> = encoded
        .lines()
        .map(|line| {
            let (slot, text) = line.split_once('|').unwrap();
            format!("{}|{} translated", slot, text)
        })
        .collect();
    answer.reverse();

    let result = decode_response(&answer.join("\n"), source.len());
    assert_eq!(
        result.texts(),
        vec![Some("one translated"), Some("two translated"), Some("three translated"), Some("four translated")]
    );
}

/// Test resilience against commentary, partial tags and duplicates
#[test]
fn test_decode_response_withMalformedLines_shouldNotMisassign() {
    let response = "Sure! Here is the translation:\n\
                    ```\n\
                    1|deux\n\
                    |orphan text\n\
                    x|not a slot\n\
                    7|out of range\n\
                    0 | un\n\
                    1|DEUX\n\
                    ```";
    let result = decode_response(response, 3);

    assert_eq!(result.get(0), Some(&SlotTranslation::Translated("un".to_string())));
    assert_eq!(result.get(1), Some(&SlotTranslation::Translated("DEUX".to_string())));
    assert_eq!(result.get(2), Some(&SlotTranslation::Failed));
    assert_eq!(result.len(), 3);
}

/// Test that an empty or unrelated response yields an all-failed result
#[test]
fn test_decode_response_withNoTaggedLines_shouldFailEverySlot() {
    assert_eq!(decode_response("", 2).failed_count(), 2);
    assert_eq!(decode_response("I cannot help with that.", 2).failed_count(), 2);
}

/// Test that a tag with nothing after it leaves the slot failed
#[test]
fn test_decode_response_withEmptyText_shouldLeaveSlotFailed() {
    let result = decode_response("0|   \n1|ok", 2);
    assert_eq!(result.texts(), vec![None, Some("ok")]);
}

/// Test that captions with separators or line breaks stay one line each
#[test]
fn test_encode_batch_withSeparatorInText_shouldStillRoundTrip() {
    let source = batch(&["a|b", "line\nbreak"]);
    let encoded = encode_batch(&source);

    assert_eq!(encoded.lines().count(), 2);
    let result = decode_response(&encoded, 2);
    assert_eq!(result.texts(), vec![Some("a|b"), Some("line break")]);
}

/// Test the directive names both languages and the line count
#[test]
fn test_system_directive_shouldStateTheRules() {
    let directive = system_directive("English", "Chinese", 12);
    assert!(directive.contains("English"));
    assert!(directive.contains("Chinese"));
    assert!(directive.contains("12"));
    assert!(directive.contains("<number>|"));
}
