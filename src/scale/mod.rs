//! # Scale Module
//!
//! Scale families, scale windows, and in-scale translation.
//!
//! ## Sub-modules
//! - `family` - pluggable scale families (major, harmonic minor)
//! - `window` - ordered, spelled scale members around a reference pitch
//! - `translate` - the translation engine over notes, tracks, and motifs
//!
//! ## Entry Points
//! - [`translate_in_scale`] / [`translate_tracks_in_scale`] - string-based
//!   major-scale convenience entries
//! - [`translate`] - the general motif/steps/family form

mod family;
mod translate;
mod window;

pub use family::{family_for_name, HarmonicMinor, Major, ScaleFamily};
pub use translate::{
    translate, translate_in_scale, translate_note, translate_track, translate_tracks,
    translate_tracks_in_scale, Motif, Steps,
};
pub use window::{ScaleWindow, WINDOW_RADIUS};
