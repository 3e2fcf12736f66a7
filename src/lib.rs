pub mod chords;
pub mod config;
pub mod convert;
pub mod error;
pub mod midi;
pub mod pitch;
pub mod scale;

pub use chords::{
    chord_to_pitches, chords_to_midi, chords_to_wav, render_progression, ChordEntry,
    ChordRenderer, RendererRegistry, TimedChord,
};
pub use config::Config;
pub use convert::{convert, convert_bytes, sniff_format, Format};
pub use error::TonalError;
pub use midi::{EventKind, MidiEvent};
pub use pitch::{Accidental, NoteName, PitchName};
pub use scale::{
    translate, translate_in_scale, translate_tracks_in_scale, Motif, ScaleFamily, ScaleWindow,
    Steps,
};
