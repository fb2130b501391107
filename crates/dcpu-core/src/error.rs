use thiserror::Error;

/// Failure to register a write hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum HookError {
    /// The low bound of the range lies above the (inclusive) high bound.
    #[error("hook range is inverted: low {low:#06x} is above high {high:#06x}")]
    InvertedRange {
        /// Requested low bound.
        low: u16,
        /// Requested inclusive high bound.
        high: u16,
    },
}

/// Failure to enqueue an interrupt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum InterruptError {
    /// The pending-interrupt queue already holds `capacity` messages.
    #[error("interrupt queue is full ({capacity} messages pending)")]
    QueueFull {
        /// Configured queue capacity.
        capacity: usize,
    },
}

/// Failure to convert or place a program image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ImageError {
    /// A byte image must contain whole 16-bit words.
    #[error("image length {len} is not a whole number of 16-bit words")]
    OddLength {
        /// Length of the rejected image in bytes.
        len: usize,
    },
    /// The image would run past the end of the 64K-word address space.
    #[error("{words} words loaded at {origin:#06x} run past the end of memory")]
    TooLarge {
        /// Load address of the first word.
        origin: u16,
        /// Number of words in the image.
        words: usize,
    },
}
