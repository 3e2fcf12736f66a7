//! Chord progression normalization and rendering.
//!
//! A progression is an ordered sequence of entries, each a bare chord symbol
//! or a (symbol, duration) pair. Normalization fills in the default duration
//! and preserves order; rendering drives a [`ChordRenderer`] over the
//! normalized sequence to produce a flat MIDI event stream.

use crate::chords::render::ChordRenderer;
use crate::chords::symbols::chord_to_pitches;
use crate::config::Config;
use crate::convert::midi_to_wav;
use crate::error::TonalError;
use crate::midi::{write_midi_file, MidiEvent, DEFAULT_PROGRAM};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Duration, in ticks, of progression entries that do not carry their own.
pub const DEFAULT_DURATION: u32 = 960;

/// One progression entry: `Cmaj7` or `(Cmaj7, 480)`.
///
/// The YAML form is either a plain string or a two-element sequence; any
/// other shape is rejected when the progression is read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ChordEntry {
    Symbol(String),
    Timed(String, u32),
}

impl FromStr for ChordEntry {
    type Err = TonalError;

    /// Text form: `Cmaj7` or `Cmaj7:480`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TonalError::InvalidSequenceEntry(s.to_string());
        match s.split_once(':') {
            None if s.is_empty() => Err(invalid()),
            None => Ok(ChordEntry::Symbol(s.to_string())),
            Some((symbol, ticks)) => {
                if symbol.is_empty() {
                    return Err(invalid());
                }
                let duration = ticks.parse::<u32>().map_err(|_| invalid())?;
                Ok(ChordEntry::Timed(symbol.to_string(), duration))
            }
        }
    }
}

/// A chord symbol with an explicit duration in ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedChord {
    pub symbol: String,
    pub duration: u32,
}

/// Normalize a progression into uniform timed chords, preserving order.
pub fn normalize(entries: &[ChordEntry], default_duration: u32) -> Vec<TimedChord> {
    entries
        .iter()
        .map(|entry| match entry {
            ChordEntry::Symbol(symbol) => TimedChord {
                symbol: symbol.clone(),
                duration: default_duration,
            },
            ChordEntry::Timed(symbol, duration) => TimedChord {
                symbol: symbol.clone(),
                duration: *duration,
            },
        })
        .collect()
}

/// Parse a whitespace-separated text progression (`"Bdim:120 G7 Cmaj7"`).
pub fn parse_progression(text: &str) -> Result<Vec<ChordEntry>, TonalError> {
    text.split_whitespace().map(ChordEntry::from_str).collect()
}

/// Parse a YAML progression: a sequence of strings or [symbol, ticks] pairs.
pub fn progression_from_yaml(yaml: &str) -> Result<Vec<ChordEntry>, TonalError> {
    serde_yaml::from_str(yaml).map_err(|e| TonalError::InvalidSequenceEntry(e.to_string()))
}

/// Render a progression to a flat MIDI event stream.
///
/// A program-select event is emitted once before the first chord. Each entry
/// resolves through the chord grammar; a chord whose pitch set comes back
/// empty is skipped without emitting events.
pub fn render_progression(
    entries: &[ChordEntry],
    renderer: &dyn ChordRenderer,
) -> Result<Vec<MidiEvent>, TonalError> {
    let mut events = vec![MidiEvent::program_change(DEFAULT_PROGRAM, 0)];
    for chord in normalize(entries, DEFAULT_DURATION) {
        let pitches = chord_to_pitches(&chord.symbol)?;
        if pitches.is_empty() {
            continue;
        }
        renderer.render(&pitches, &mut events, chord.duration);
    }
    Ok(events)
}

/// Render a progression and write it to a MIDI file.
pub fn chords_to_midi(
    entries: &[ChordEntry],
    renderer: &dyn ChordRenderer,
    path: &Path,
) -> Result<(), TonalError> {
    let events = render_progression(entries, renderer)?;
    write_midi_file(&events, path)
}

/// Render a progression straight to a WAV file, staging the MIDI through a
/// temporary file and synthesizing with the configured external engine.
pub fn chords_to_wav(
    entries: &[ChordEntry],
    renderer: &dyn ChordRenderer,
    path: &Path,
    config: &Config,
) -> Result<PathBuf, TonalError> {
    let staging = tempfile::Builder::new()
        .prefix("tonal-chords")
        .suffix(".mid")
        .tempfile()?;
    chords_to_midi(entries, renderer, staging.path())?;
    midi_to_wav(staging.path(), path, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_str() {
        assert_eq!(
            "Cmaj7".parse::<ChordEntry>().unwrap(),
            ChordEntry::Symbol("Cmaj7".into())
        );
        assert_eq!(
            "Bdim:120".parse::<ChordEntry>().unwrap(),
            ChordEntry::Timed("Bdim".into(), 120)
        );
    }

    #[test]
    fn test_entry_from_str_rejects_malformed() {
        assert!("".parse::<ChordEntry>().is_err());
        assert!(":120".parse::<ChordEntry>().is_err());
        assert!("Cmaj7:".parse::<ChordEntry>().is_err());
        assert!("Cmaj7:abc".parse::<ChordEntry>().is_err());
        assert!("Cmaj7:-4".parse::<ChordEntry>().is_err());
    }

    #[test]
    fn test_normalize_preserves_order_and_defaults() {
        let entries = vec![
            ChordEntry::Timed("Bdim".into(), 120),
            ChordEntry::Symbol("G7".into()),
            ChordEntry::Symbol("Cmaj7".into()),
        ];
        let timed = normalize(&entries, DEFAULT_DURATION);
        assert_eq!(timed.len(), 3);
        assert_eq!(timed[0].symbol, "Bdim");
        assert_eq!(timed[0].duration, 120);
        assert_eq!(timed[1].symbol, "G7");
        assert_eq!(timed[1].duration, DEFAULT_DURATION);
        assert_eq!(timed[2].symbol, "Cmaj7");
    }

    #[test]
    fn test_progression_from_yaml_mixed_shapes() {
        let yaml = "- [Bdim, 120]\n- [Em11, 120]\n- G7\n- Cmaj7\n";
        let entries = progression_from_yaml(yaml).unwrap();
        assert_eq!(entries[0], ChordEntry::Timed("Bdim".into(), 120));
        assert_eq!(entries[2], ChordEntry::Symbol("G7".into()));
    }

    #[test]
    fn test_progression_from_yaml_rejects_other_shapes() {
        assert!(progression_from_yaml("- {symbol: G7}\n").is_err());
        assert!(progression_from_yaml("- [G7, 120, 7]\n").is_err());
    }
}
