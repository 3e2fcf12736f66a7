//! # Error Types
//!
//! This module defines all error types for the tonal library.
//!
//! Core errors (chord grammar, renderers, scale translation) are raised
//! synchronously at the point of detection and never retried or swallowed.
//! Boundary errors (`UnsupportedConversion`, `ExternalTool`, `Io`) come from
//! the format-conversion layer only.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TonalError {
    /// A note-name string that does not match the letter/accidental/octave grammar.
    #[error("Invalid note name: {0}")]
    InvalidNote(String),

    /// A chord symbol with no parseable root at position 0.
    #[error("Invalid chord symbol: {0}")]
    InvalidChord(String),

    /// A chord quality/extension string absent from the interval table.
    #[error("Unknown chord quality/extension: {0:?}")]
    UnknownQuality(String),

    /// A progression entry that is neither a symbol nor a symbol:duration pair.
    #[error("Invalid chord sequence entry: {0}")]
    InvalidSequenceEntry(String),

    /// A renderer name with no registered strategy.
    #[error("Unknown chord renderer: {name} (available: {available})")]
    RendererNotFound { name: String, available: String },

    /// A scale-family selector with no built-in family.
    #[error("Unknown scale family: {0}")]
    UnknownScale(String),

    /// A translation anchor note absent from its own scale window.
    #[error("Note {note} is not in the {scale} scale")]
    NoteNotInScale { note: String, scale: String },

    /// A (source format, destination format) pair with no converter.
    #[error("Unsupported conversion: {from} -> {to}")]
    UnsupportedConversion { from: String, to: String },

    /// MusicXML input the converter cannot read.
    #[error("Malformed score: {0}")]
    MalformedScore(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An external synthesizer or OMR subprocess that could not run or failed.
    #[error("External tool error: {0}")]
    ExternalTool(String),

    #[error("MIDI write error: {0}")]
    MidiWrite(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
