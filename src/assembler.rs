/*!
 * Bilingual subtitle assembly.
 *
 * Every caption becomes two output events sharing its time range: the
 * translated line in the `Secondary` style followed by the original line in
 * the `Default` style. Events are emitted in source order.
 */

use std::fmt;

use log::warn;

use crate::subtitle_processor::CaptionEntry;
use crate::timecode;
use crate::translation::result::TranslationResult;

/// Text written in place of a translation that is unavailable
pub const PLACEHOLDER_TEXT: &str = "[translation unavailable]";

/// Actor name written on every dialogue line
pub const EVENT_NAME: &str = "NTP";

/// Script header declaring the two styles used by the events
pub const ASS_HEADER: &str = "[Script Info]
ScriptType: v4.00+
WrapStyle: 0
ScaledBorderAndShadow: yes
PlayResX: 1920
PlayResY: 1080

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,52,&H00FFFFFF,&H000000FF,&H00000000,&H64000000,0,0,0,0,100,100,0,0,1,2,1,2,20,20,30,1
Style: Secondary,Microsoft YaHei,64,&H0000FFFF,&H000000FF,&H00000000,&H64000000,-1,0,0,0,100,100,0,0,1,2,1,2,20,20,90,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";

/// Style tag of an output event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStyle {
    /// Original caption text
    Default,
    /// Translated caption text
    Secondary,
}

impl fmt::Display for EventStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "Default"),
            Self::Secondary => write!(f, "Secondary"),
        }
    }
}

/// One rendered dialogue line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEvent {
    // @field: Start time in ASS format
    pub start: String,
    // @field: End time in ASS format
    pub end: String,
    pub style: EventStyle,
    pub text: String,
}

impl fmt::Display for OutputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dialogue: 0,{},{},{},{},0000,0000,0000,,{}",
            self.start, self.end, self.style, EVENT_NAME, self.text
        )
    }
}

/// Build the output events for `entries` from the per-batch results.
///
/// Entry `i` reads slot `i % batch_size` of result `i / batch_size`. A missing
/// result or a failed slot yields [`PLACEHOLDER_TEXT`]. Always returns exactly
/// two events per entry.
pub fn assemble(entries: &[CaptionEntry], results: &[TranslationResult], batch_size: usize) -> Vec<OutputEvent> {
    let batch_size = batch_size.max(1);
    let mut events = Vec::with_capacity(entries.len() * 2);
    let mut unavailable = 0;

    for (position, entry) in entries.iter().enumerate() {
        let translated = results
            .get(position / batch_size)
            .and_then(|result| result.get(position % batch_size))
            .and_then(|slot| slot.text());

        let translated = match translated {
            Some(text) => text.to_string(),
            None => {
                unavailable += 1;
                PLACEHOLDER_TEXT.to_string()
            }
        };

        let start = timecode::srt_to_ass(&entry.start_raw);
        let end = timecode::srt_to_ass(&entry.end_raw);

        events.push(OutputEvent {
            start: start.clone(),
            end: end.clone(),
            style: EventStyle::Secondary,
            text: translated,
        });
        events.push(OutputEvent {
            start,
            end,
            style: EventStyle::Default,
            text: entry.text.clone(),
        });
    }

    if unavailable > 0 {
        warn!("{} of {} captions have no translation", unavailable, entries.len());
    }

    events
}

/// Render a complete ASS document from output events
pub fn render_document(events: &[OutputEvent]) -> String {
    let mut document = String::from(ASS_HEADER);
    for event in events {
        document.push_str(&event.to_string());
        document.push('\n');
    }
    document
}
