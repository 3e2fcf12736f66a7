//! In-scale translation of notes, tracks, and multi-track motifs.
//!
//! The primitive moves a single note N scale-steps within a window freshly
//! anchored at that note, wrapping modularly at the window edges. Tracks
//! translate note-by-note (each note gets its own window, so high and low
//! notes shift relative to their own positions), and multi-track motifs
//! translate track-by-track. A sequence of step values translates the whole
//! motif once per value and concatenates the results track-wise, extending a
//! motif into a phrase.

use crate::error::TonalError;
use crate::pitch::PitchName;
use crate::scale::family::ScaleFamily;
use crate::scale::window::ScaleWindow;

/// A melodic unit: one note, one voice, or several index-aligned voices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Motif {
    Note(PitchName),
    Track(Vec<PitchName>),
    Tracks(Vec<Vec<PitchName>>),
}

impl Motif {
    /// The motif's voices as MIDI note numbers, single notes and tracks
    /// yielding one voice.
    pub fn voices(&self) -> Vec<Vec<u8>> {
        fn to_midi(notes: &[PitchName]) -> Vec<u8> {
            notes.iter().map(|n| n.midi().clamp(0, 127) as u8).collect()
        }
        match self {
            Motif::Note(note) => vec![to_midi(&[*note])],
            Motif::Track(track) => vec![to_midi(track)],
            Motif::Tracks(tracks) => tracks.iter().map(|t| to_midi(t)).collect(),
        }
    }
}

/// A single step count, or an ordered sequence applied one after another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Steps {
    Single(i32),
    Sequence(Vec<i32>),
}

impl From<i32> for Steps {
    fn from(steps: i32) -> Self {
        Steps::Single(steps)
    }
}

impl From<Vec<i32>> for Steps {
    fn from(steps: Vec<i32>) -> Self {
        Steps::Sequence(steps)
    }
}

/// Translate one note by `steps` scale-steps within the window anchored at
/// the note itself.
///
/// Fails with [`TonalError::NoteNotInScale`] when the note is foreign to the
/// scale (a chromatic passing tone, or an enharmonic respelling of a scale
/// member): translation is only defined for scale-native notes.
pub fn translate_note(
    note: PitchName,
    steps: i32,
    tonic: &str,
    family: &dyn ScaleFamily,
) -> Result<PitchName, TonalError> {
    let window = ScaleWindow::build(note, tonic, family)?;
    let index = window
        .position(note)
        .ok_or_else(|| TonalError::NoteNotInScale {
            note: note.to_string(),
            scale: format!("{} {}", tonic, family.name()),
        })?;
    let new_index = (index as i64 + steps as i64).rem_euclid(window.len() as i64) as usize;
    Ok(window.at(new_index))
}

/// Translate every note of a voice independently; same length, same order.
pub fn translate_track(
    track: &[PitchName],
    steps: i32,
    tonic: &str,
    family: &dyn ScaleFamily,
) -> Result<Vec<PitchName>, TonalError> {
    track
        .iter()
        .map(|&note| translate_note(note, steps, tonic, family))
        .collect()
}

/// Translate every voice independently; track count preserved.
pub fn translate_tracks(
    tracks: &[Vec<PitchName>],
    steps: i32,
    tonic: &str,
    family: &dyn ScaleFamily,
) -> Result<Vec<Vec<PitchName>>, TonalError> {
    tracks
        .iter()
        .map(|track| translate_track(track, steps, tonic, family))
        .collect()
}

/// Translate a motif. A [`Steps::Sequence`] produces one translated copy per
/// step value, concatenated track-wise (the i-th output voice is the i-th
/// voice of each per-step result, joined in step order); a single note
/// becomes a track of one note per step.
pub fn translate(
    motif: &Motif,
    steps: &Steps,
    tonic: &str,
    family: &dyn ScaleFamily,
) -> Result<Motif, TonalError> {
    match steps {
        Steps::Single(steps) => match motif {
            Motif::Note(note) => Ok(Motif::Note(translate_note(*note, *steps, tonic, family)?)),
            Motif::Track(track) => Ok(Motif::Track(translate_track(
                track, *steps, tonic, family,
            )?)),
            Motif::Tracks(tracks) => Ok(Motif::Tracks(translate_tracks(
                tracks, *steps, tonic, family,
            )?)),
        },
        Steps::Sequence(sequence) => {
            let parts = sequence
                .iter()
                .map(|&step| translate(motif, &Steps::Single(step), tonic, family))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(concatenate(motif, parts))
        }
    }
}

/// Join per-step results track-wise. Note motifs flatten into one track.
fn concatenate(motif: &Motif, parts: Vec<Motif>) -> Motif {
    match motif {
        Motif::Tracks(tracks) => {
            let mut joined: Vec<Vec<PitchName>> = vec![Vec::new(); tracks.len()];
            for part in parts {
                if let Motif::Tracks(part_tracks) = part {
                    for (voice, part_track) in joined.iter_mut().zip(part_tracks) {
                        voice.extend(part_track);
                    }
                }
            }
            Motif::Tracks(joined)
        }
        _ => {
            let mut joined = Vec::new();
            for part in parts {
                match part {
                    Motif::Note(note) => joined.push(note),
                    Motif::Track(track) => joined.extend(track),
                    Motif::Tracks(_) => unreachable!("single-voice motif translated to tracks"),
                }
            }
            Motif::Track(joined)
        }
    }
}

fn parse_track(notes: &[&str]) -> Result<Vec<PitchName>, TonalError> {
    notes.iter().map(|s| s.parse()).collect()
}

/// Translate a voice of note-name strings within a major scale.
///
/// ```
/// use tonal::scale::translate_in_scale;
///
/// let line = translate_in_scale(&["C4", "E4", "B3", "C4"], -2, "C").unwrap();
/// assert_eq!(line, vec!["A3", "C4", "G3", "A3"]);
/// ```
pub fn translate_in_scale(
    notes: &[&str],
    steps: impl Into<Steps>,
    tonic: &str,
) -> Result<Vec<String>, TonalError> {
    let motif = Motif::Track(parse_track(notes)?);
    match translate(&motif, &steps.into(), tonic, &crate::scale::Major)? {
        Motif::Track(track) => Ok(track.iter().map(|n| n.to_string()).collect()),
        _ => unreachable!("track motif translated to another shape"),
    }
}

/// Translate several voices of note-name strings within a major scale.
pub fn translate_tracks_in_scale(
    tracks: &[Vec<&str>],
    steps: impl Into<Steps>,
    tonic: &str,
) -> Result<Vec<Vec<String>>, TonalError> {
    let parsed = tracks
        .iter()
        .map(|track| parse_track(track))
        .collect::<Result<Vec<_>, _>>()?;
    let motif = Motif::Tracks(parsed);
    match translate(&motif, &steps.into(), tonic, &crate::scale::Major)? {
        Motif::Tracks(tracks) => Ok(tracks
            .iter()
            .map(|track| track.iter().map(|n| n.to_string()).collect())
            .collect()),
        _ => unreachable!("multi-track motif translated to another shape"),
    }
}
