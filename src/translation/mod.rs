/*!
 * Batch translation of caption text.
 *
 * This module turns batches of captions into per-batch translation results.
 * It is split into several submodules:
 *
 * - `protocol`: Slot-tagged line encoding and decoding, and the translator directive
 * - `result`: Per-slot outcomes of one batch
 * - `core`: Per-batch translation with timeout, retry and degradation
 * - `batch`: Concurrent or sequential dispatch of all batches of a file
 * - `concurrency`: Per-backend dispatch defaults
 */

// Re-export main types for easier usage
pub use self::batch::{BatchTranslator, DispatchOutcome};
pub use self::concurrency::{DispatchMode, ProviderProfile};
pub use self::core::{TokenUsageStats, TranslationOptions, TranslationService};
pub use self::result::{SlotTranslation, TranslationResult};

// Submodules
pub mod batch;
pub mod concurrency;
pub mod core;
pub mod protocol;
pub mod result;
