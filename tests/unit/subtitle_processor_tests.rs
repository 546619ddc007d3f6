/*!
 * Tests for caption parsing and batching
 */

use dualsub::errors::SubtitleError;
use dualsub::subtitle_processor::{CaptionEntry, SubtitleCollection, split_into_batches};
use crate::common;

fn numbered_entries(count: usize) -> Vec<CaptionEntry> {
    (0..count)
        .map(|i| CaptionEntry::new(i, "00:00:00,000", "00:00:01,000", format!("caption {}", i)))
        .collect()
}

/// Test that a well-formed file parses with dense indices
#[test]
fn test_parse_srt_string_withSampleFile_shouldProduceOrderedEntries() {
    let entries = SubtitleCollection::parse_srt_string(common::SAMPLE_SRT).unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries.iter().map(|e| e.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(entries[1].text, "It contains multiple lines.");
    assert_eq!(entries[1].start_raw, "00:00:05,000");
    assert_eq!(entries[1].end_raw, "00:00:09,500");
}

/// Test tolerance of Windows line endings and runs of blank lines
#[test]
fn test_parse_srt_string_withCrlfAndExtraBlankLines_shouldSplitBlocks() {
    let content = "1\r\n00:00:01,000 --> 00:00:02,000\r\nFirst\r\n\r\n\r\n \r\n2\r\n00:00:03,000 --> 00:00:04,000\r\nSecond\r\n";
    let entries = SubtitleCollection::parse_srt_string(content).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text, "First");
    assert_eq!(entries[1].text, "Second");
}

/// Test that a block with a time range but no text is dropped
#[test]
fn test_parse_srt_string_withBlockWithoutText_shouldDropIt() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\n\n2\n00:00:03,000 --> 00:00:04,000\nKept\n";
    let entries = SubtitleCollection::parse_srt_string(content).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].index, 0);
    assert_eq!(entries[0].text, "Kept");
}

/// Test that blocks without a range delimiter are ignored and indices stay dense
#[test]
fn test_parse_srt_string_withJunkBlocks_shouldKeepIndicesDense() {
    let content = "WEBVTT header junk\n\n00:00:01,000 --> 00:00:02,000\nNo number\n\nnot a caption\n\n7\n00:00:03,000 --> 00:00:04,000\nSeventh\n";
    let entries = SubtitleCollection::parse_srt_string(content).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text, "No number");
    assert_eq!(entries[1].index, 1);
}

/// Test that nothing recognizable is a parse error
#[test]
fn test_parse_srt_string_withNoCaptions_shouldFail() {
    let err = SubtitleCollection::parse_srt_string("hello\n\nworld\n").unwrap_err();
    assert_eq!(err, SubtitleError::NoCaptions { blocks: 2 });

    assert!(SubtitleCollection::parse_srt_string("").is_err());
}

/// Test that a byte order mark does not hide the first block
#[test]
fn test_parse_srt_string_withBom_shouldParseFirstBlock() {
    let content = "\u{feff}1\n00:00:01,000 --> 00:00:02,000\nHi\n";
    let entries = SubtitleCollection::parse_srt_string(content).unwrap();
    assert_eq!(entries[0].text, "Hi");
}

/// Test the partition law for a range of batch sizes
#[test]
fn test_split_into_batches_forAnyBatchSize_shouldPartitionEntries() {
    let entries = numbered_entries(23);

    for batch_size in 1..=30 {
        let batches = split_into_batches(&entries, batch_size);

        assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= batch_size));
        assert_eq!(batches.iter().map(|b| b.index).collect::<Vec<_>>(), (0..batches.len()).collect::<Vec<_>>());

        let flattened: Vec<CaptionEntry> = batches.into_iter().flat_map(|b| b.entries).collect();
        assert_eq!(flattened, entries, "batch size {}", batch_size);
    }
}

/// Test the three entries, batch size two scenario
#[test]
fn test_split_into_batches_withThreeEntriesAndSizeTwo_shouldGiveTwoBatches() {
    let batches = split_into_batches(&numbered_entries(3), 2);

    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].len(), 2);
    assert_eq!(batches[1].entries[0].index, 2);
}

/// Test that a zero batch size does not loop or panic
#[test]
fn test_split_into_batches_withZeroSize_shouldUseSingletons() {
    let batches = split_into_batches(&numbered_entries(3), 0);
    assert_eq!(batches.len(), 3);
    assert!(split_into_batches(&[], 5).is_empty());
}

/// Test collection construction from a file's content
#[test]
fn test_from_srt_string_shouldKeepSourcePath() {
    let collection = SubtitleCollection::from_srt_string("episode.srt", common::SAMPLE_SRT).unwrap();
    assert_eq!(collection.source_file, std::path::PathBuf::from("episode.srt"));
    assert_eq!(collection.split_into_batches(2).len(), 2);
}
