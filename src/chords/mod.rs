//! # Chords Module
//!
//! Chord symbol strings to timed MIDI events.
//!
//! ## Sub-modules
//! - `symbols` - chord grammar: root scan, quality/extension interval table
//! - `render` - rendering strategies (simultaneous, arpeggio) and the registry
//! - `sequence` - progression normalization and the MIDI/WAV drivers
//!
//! ## Entry Points
//! - [`chord_to_pitches`] - `"Cmaj7"` to `[60, 64, 67, 71]`
//! - [`render_progression`] - progression to a flat event stream
//! - [`chords_to_midi`] / [`chords_to_wav`] - progression to a file

mod render;
mod sequence;
mod symbols;


pub use render::{Arpeggio, ChordRenderer, RendererRegistry, Simultaneous};
pub use sequence::{
    chords_to_midi, chords_to_wav, normalize, parse_progression, progression_from_yaml,
    render_progression, ChordEntry, TimedChord, DEFAULT_DURATION,
};
pub use symbols::{alias_pairs, canonical_qualities, chord_to_pitches, parse_root, resolve_intervals};
