//! Scale windows: the ordered, spelled scale members around a reference pitch.

use crate::error::TonalError;
use crate::pitch::{Accidental, NoteName, PitchName};
use crate::scale::family::ScaleFamily;
use std::str::FromStr;

/// Window radius in semitones either side of the reference pitch. Two
/// octaves each way is enough that a translation of up to an octave never
/// runs off the end, and is applied uniformly at every call site.
pub const WINDOW_RADIUS: i16 = 24;

/// One spelled scale degree: letter, accidental, and semitone offset from
/// the tonic.
#[derive(Debug, Clone, Copy)]
struct SpelledDegree {
    name: NoteName,
    accidental: Accidental,
    interval: u8,
}

/// Spell the seven degrees of `family` on consecutive letters starting at
/// the tonic, choosing each accidental to land on the required semitone.
fn spelled_degrees(tonic: PitchName, family: &dyn ScaleFamily) -> Vec<SpelledDegree> {
    family
        .intervals()
        .iter()
        .enumerate()
        .map(|(degree, &interval)| {
            let name = tonic.name.step_up(degree);
            let natural_gap = (name.semitone() - tonic.name.semitone()).rem_euclid(12);
            let offset = tonic.accidental.offset() + interval as i16 - natural_gap;
            match Accidental::from_offset(offset) {
                Some(accidental) => SpelledDegree {
                    name,
                    accidental,
                    interval,
                },
                // Triple accidentals only arise from exotic custom families;
                // fall back to an enharmonic respelling of the same pitch.
                None => {
                    let respelled =
                        PitchName::from_midi(60 + name.semitone() + offset, offset < 0);
                    SpelledDegree {
                        name: respelled.name,
                        accidental: respelled.accidental,
                        interval,
                    }
                }
            }
        })
        .collect()
}

/// The ordered pitch names of a scale within [`WINDOW_RADIUS`] semitones of
/// a reference pitch.
///
/// Contains the reference note (by name and octave) exactly once when the
/// reference is scale-native; a foreign reference simply is not found.
#[derive(Debug, Clone)]
pub struct ScaleWindow {
    notes: Vec<PitchName>,
}

impl ScaleWindow {
    /// Build the window anchored at `reference` for the scale `tonic` +
    /// `family`. The tonic is a bare note name without octave (`"C"`,
    /// `"Db"`, `"E"`).
    pub fn build(
        reference: PitchName,
        tonic: &str,
        family: &dyn ScaleFamily,
    ) -> Result<ScaleWindow, TonalError> {
        let tonic = PitchName::from_str(tonic)?;
        let degrees = spelled_degrees(tonic, family);
        let reference_midi = reference.midi();

        let mut notes = Vec::new();
        for octave in -3..=10 {
            let tonic_midi = 12 * (octave + 1) + tonic.name.semitone() + tonic.accidental.offset();
            for degree in &degrees {
                let midi = tonic_midi + degree.interval as i16;
                if midi < reference_midi - WINDOW_RADIUS || midi > reference_midi + WINDOW_RADIUS {
                    continue;
                }
                // Recover the display octave from the letter: spellings that
                // cross the octave boundary (Cb, B#) stay exact.
                let octave =
                    ((midi - degree.name.semitone() - degree.accidental.offset()) / 12 - 1) as i8;
                notes.push(PitchName::new(degree.name, degree.accidental, octave));
            }
        }

        Ok(ScaleWindow { notes })
    }

    pub fn notes(&self) -> &[PitchName] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Index of a note in the window, matching name and octave exactly.
    /// An enharmonic spelling of a member (`A#4` for `Bb4`) is not a match.
    pub fn position(&self, note: PitchName) -> Option<usize> {
        self.notes.iter().position(|&n| n == note)
    }

    pub fn at(&self, index: usize) -> PitchName {
        self.notes[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::family::{HarmonicMinor, Major};

    fn note(s: &str) -> PitchName {
        s.parse().unwrap()
    }

    #[test]
    fn test_c_major_window_around_c4() {
        let window = ScaleWindow::build(note("C4"), "C", &Major).unwrap();
        // C2..C6 inclusive: four octaves of seven degrees plus the top C
        assert_eq!(window.len(), 29);
        assert_eq!(window.at(0), note("C2"));
        assert_eq!(window.at(window.len() - 1), note("C6"));
        assert_eq!(window.position(note("C4")), Some(14));
    }

    #[test]
    fn test_window_is_ascending() {
        let window = ScaleWindow::build(note("G#5"), "A", &HarmonicMinor).unwrap();
        let midis: Vec<i16> = window.notes().iter().map(|n| n.midi()).collect();
        assert!(midis.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_window_contains_reference_once() {
        let window = ScaleWindow::build(note("E4"), "C", &Major).unwrap();
        let hits = window
            .notes()
            .iter()
            .filter(|&&n| n == note("E4"))
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_e_major_spelling() {
        let window = ScaleWindow::build(note("E4"), "E", &Major).unwrap();
        let start = window.position(note("E4")).unwrap();
        let names: Vec<String> = window.notes()[start..start + 7]
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, ["E4", "F#4", "G#4", "A4", "B4", "C#5", "D#5"]);
    }

    #[test]
    fn test_d_flat_major_spelling() {
        let window = ScaleWindow::build(note("Db4"), "Db", &Major).unwrap();
        let start = window.position(note("Db4")).unwrap();
        let names: Vec<String> = window.notes()[start..start + 7]
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, ["Db4", "Eb4", "F4", "Gb4", "Ab4", "Bb4", "C5"]);
    }

    #[test]
    fn test_a_harmonic_minor_raised_seventh() {
        let window = ScaleWindow::build(note("A4"), "A", &HarmonicMinor).unwrap();
        let start = window.position(note("A4")).unwrap();
        let names: Vec<String> = window.notes()[start..start + 7]
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, ["A4", "B4", "C5", "D5", "E5", "F5", "G#5"]);
    }

    #[test]
    fn test_sharp_tonic_double_sharp_spelling() {
        // G# harmonic minor's seventh degree is F double-sharp
        let window = ScaleWindow::build(note("G#4"), "G#", &HarmonicMinor).unwrap();
        assert!(window.position(note("F##4")).is_some());
    }

    #[test]
    fn test_foreign_note_is_not_found() {
        let window = ScaleWindow::build(note("C#4"), "C", &Major).unwrap();
        assert_eq!(window.position(note("C#4")), None);
        // and the enharmonic spelling of a member is not a match either
        let window = ScaleWindow::build(note("A#4"), "Db", &Major).unwrap();
        assert_eq!(window.position(note("A#4")), None);
        assert!(window.position(note("Bb4")).is_some());
    }
}
