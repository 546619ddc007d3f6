/*!
 * Per-batch translation results.
 */

/// Outcome of one slot of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotTranslation {
    /// The translator returned text for this slot
    Translated(String),
    /// No usable text came back for this slot
    Failed,
}

impl SlotTranslation {
    /// Translated text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Translated(text) => Some(text),
            Self::Failed => None,
        }
    }
}

/// Translations for one batch, aligned with the batch's local slot index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    slots: Vec<SlotTranslation>,
}

impl TranslationResult {
    /// Build a result from already decoded slots
    pub fn from_slots(slots: Vec<SlotTranslation>) -> Self {
        Self { slots }
    }

    /// A result where every one of `slot_count` slots failed
    pub fn all_failed(slot_count: usize) -> Self {
        Self {
            slots: vec![SlotTranslation::Failed; slot_count],
        }
    }

    /// Slot at `slot`, `None` if out of range
    pub fn get(&self, slot: usize) -> Option<&SlotTranslation> {
        self.slots.get(slot)
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the result has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of failed slots
    pub fn failed_count(&self) -> usize {
        self.slots.iter().filter(|s| matches!(s, SlotTranslation::Failed)).count()
    }

    /// Slot texts in slot order
    pub fn texts(&self) -> Vec<Option<&str>> {
        self.slots.iter().map(SlotTranslation::text).collect()
    }
}
