/*!
 * Tests for output events and ASS rendering
 */

use dualsub::assembler::{ASS_HEADER, EventStyle, PLACEHOLDER_TEXT, assemble, render_document};
use dualsub::subtitle_processor::{SubtitleCollection, split_into_batches};
use dualsub::translation::{SlotTranslation, TranslationResult};
use dualsub::translation::protocol::{decode_response, encode_batch};
use crate::common;

/// Test the event count law and translated-first ordering on a whole file
#[test]
fn test_assemble_withEchoedTranslations_shouldEmitTwoEventsPerEntry() {
    let entries = SubtitleCollection::parse_srt_string(common::SAMPLE_SRT).unwrap();
    let batches = split_into_batches(&entries, 2);
    let results: Vec<TranslationResult> = batches
        .iter()
        .map(|b| decode_response(&encode_batch(b), b.len()))
        .collect();

    let events = assemble(&entries, &results, 2);

    assert_eq!(events.len(), 2 * entries.len());
    for (pair, entry) in events.chunks(2).zip(&entries) {
        assert_eq!(pair[0].style, EventStyle::Secondary);
        assert_eq!(pair[1].style, EventStyle::Default);
        assert_eq!(pair[0].start, pair[1].start);
        assert_eq!(pair[0].end, pair[1].end);
        assert_eq!(pair[0].text, entry.text);
        assert_eq!(pair[1].text, entry.text);
    }
}

/// Test that only the failed slots get the placeholder
#[test]
fn test_assemble_withPartiallyFailedBatch_shouldOnlyReplaceFailedSlots() {
    let entries = SubtitleCollection::parse_srt_string(common::SAMPLE_SRT).unwrap();
    let results = vec![TranslationResult::from_slots(vec![
        SlotTranslation::Failed,
        SlotTranslation::Translated("deux".to_string()),
        SlotTranslation::Translated("trois".to_string()),
    ])];

    let events = assemble(&entries, &results, 3);
    let translated: Vec<&str> = events.iter().step_by(2).map(|e| e.text.as_str()).collect();
    assert_eq!(translated, vec![PLACEHOLDER_TEXT, "deux", "trois"]);
    assert!(!PLACEHOLDER_TEXT.is_empty());
}

/// Test the rendered document layout
#[test]
fn test_render_document_shouldStartWithHeaderAndListEvents() {
    let entries = SubtitleCollection::parse_srt_string(common::SAMPLE_SRT).unwrap();
    let events = assemble(&entries, &[], 10);
    let document = render_document(&events);

    assert!(document.starts_with(ASS_HEADER));
    let dialogue_lines: Vec<&str> = document.lines().filter(|l| l.starts_with("Dialogue:")).collect();
    assert_eq!(dialogue_lines.len(), 6);
    assert_eq!(
        dialogue_lines[2],
        format!("Dialogue: 0,0:00:05.00,0:00:09.50,Secondary,NTP,0000,0000,0000,,{}", PLACEHOLDER_TEXT)
    );
    assert_eq!(
        dialogue_lines[3],
        "Dialogue: 0,0:00:05.00,0:00:09.50,Default,NTP,0000,0000,0000,,It contains multiple lines."
    );
}
