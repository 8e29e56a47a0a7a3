//! Sentence filter traits.

/// Stateless sentence check: the same sentence always gets the same answer.
///
/// [super::sentence::Validity] combines the length and letter checks
/// configured by `data_processing.sentence_filter`.
pub trait Filter<T> {
    /// `true` if `item` is kept.
    fn detect(&self, item: T) -> bool;
}

/// Stateful sentence check, whose answer depends on previously seen sentences.
///
/// Used by [super::sentence::Unique] to drop exact duplicates within a language.
pub trait FilterMut<T> {
    /// `true` if `item` is kept. Records `item` as seen.
    fn detect_mut(&mut self, item: T) -> bool;
}
