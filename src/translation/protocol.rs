/*!
 * Slot-tagged line protocol between the batcher and the translator.
 *
 * Every caption of a batch travels as one line `<slot>|<text>`, where `slot`
 * is the caption's position inside the batch. Translators may reorder, drop,
 * merge or annotate lines, so decoding never trusts line order: a response
 * line only counts if it starts with a slot number followed by `|`, and it is
 * written to that slot. Everything else in the response is ignored.
 */

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::subtitle_processor::Batch;

use super::result::{SlotTranslation, TranslationResult};

/// Version tag of the line format, logged with each request
pub const PROTOCOL_VERSION: &str = "v1";

/// Separator between the slot identifier and the text
pub const SLOT_SEPARATOR: char = '|';

/// `<digits> |<text>` with optional whitespace around the slot
static SLOT_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s*\|(.*)$").expect("Invalid slot line regex")
});

/// Encode a batch as slot-tagged lines, one per entry.
///
/// Any line breaks or separators inside a caption are flattened so that one
/// entry is always exactly one line.
pub fn encode_batch(batch: &Batch) -> String {
    batch
        .entries
        .iter()
        .enumerate()
        .map(|(slot, entry)| encode_line(slot, &entry.text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn encode_line(slot: usize, text: &str) -> String {
    let flattened = text
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    format!("{}{}{}", slot, SLOT_SEPARATOR, flattened)
}

/// Decode a translator response into a result with `slot_count` slots.
///
/// Lines that do not carry a slot tag, carry an out-of-range slot, or carry
/// no text are ignored. When a slot appears more than once, the last line wins.
pub fn decode_response(response: &str, slot_count: usize) -> TranslationResult {
    let mut slots = vec![SlotTranslation::Failed; slot_count];
    let mut ignored = 0;

    for line in response.lines() {
        let Some(caps) = SLOT_LINE_REGEX.captures(line) else {
            if !line.trim().is_empty() {
                ignored += 1;
            }
            continue;
        };

        let slot = match caps[1].parse::<usize>() {
            Ok(slot) if slot < slot_count => slot,
            _ => {
                trace!("Ignoring out-of-range slot line: {}", line);
                ignored += 1;
                continue;
            }
        };

        let text = caps[2].trim();
        if text.is_empty() {
            continue;
        }

        if matches!(slots[slot], SlotTranslation::Translated(_)) {
            debug!("Slot {} appears more than once in response, keeping the last one", slot);
        }
        slots[slot] = SlotTranslation::Translated(text.to_string());
    }

    if ignored > 0 {
        debug!("Ignored {} untagged or out-of-range response lines", ignored);
    }

    TranslationResult::from_slots(slots)
}

/// System-level directive sent alongside every batch
pub fn system_directive(source_language: &str, target_language: &str, line_count: usize) -> String {
    format!(
        "You are a professional subtitle translator. Translate each line from {source} to {target}.\n\
         Every input line has the form `<number>|<text>`.\n\
         Rules:\n\
         1. Translate line by line. Do not merge, split or reorder lines.\n\
         2. Keep the `<number>|` prefix of every line exactly as it is.\n\
         3. Output exactly {count} lines, one per input line, and nothing else: no notes, no explanations, no code fences.",
        source = source_language,
        target = target_language,
        count = line_count,
    )
}
