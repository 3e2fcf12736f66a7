//! Note names and MIDI pitch numbers.
//!
//! A pitch has two representations that coexist across the library: an
//! absolute MIDI semitone number, and a spelled name (letter, accidental,
//! octave). Conversion between them is exact and total over the supported
//! grammar; enharmonic spellings (`D#4` / `Eb4`) are distinct names that map
//! to the same number.

use crate::error::TonalError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Letter names in ascending order within one octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NoteName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    /// Semitone offset of the natural note from C.
    pub fn semitone(self) -> i16 {
        match self {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NoteName::C => "C",
            NoteName::D => "D",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::G => "G",
            NoteName::A => "A",
            NoteName::B => "B",
        }
    }

    pub fn from_char(c: char) -> Option<NoteName> {
        match c.to_ascii_uppercase() {
            'C' => Some(NoteName::C),
            'D' => Some(NoteName::D),
            'E' => Some(NoteName::E),
            'F' => Some(NoteName::F),
            'G' => Some(NoteName::G),
            'A' => Some(NoteName::A),
            'B' => Some(NoteName::B),
            _ => None,
        }
    }

    /// The letter `steps` positions up the musical alphabet, wrapping past B.
    pub fn step_up(self, steps: usize) -> NoteName {
        const ORDER: [NoteName; 7] = [
            NoteName::C,
            NoteName::D,
            NoteName::E,
            NoteName::F,
            NoteName::G,
            NoteName::A,
            NoteName::B,
        ];
        let index = match self {
            NoteName::C => 0,
            NoteName::D => 1,
            NoteName::E => 2,
            NoteName::F => 3,
            NoteName::G => 4,
            NoteName::A => 5,
            NoteName::B => 6,
        };
        ORDER[(index + steps) % 7]
    }
}

/// Accidental applied to a letter name. Double accidentals occur in spelled
/// scales with sharp or flat tonics (e.g. the raised seventh of G# minor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Accidental {
    DoubleFlat,
    Flat,
    Natural,
    Sharp,
    DoubleSharp,
}

impl Accidental {
    /// Semitone adjustment relative to the natural letter.
    pub fn offset(self) -> i16 {
        match self {
            Accidental::DoubleFlat => -2,
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::DoubleSharp => 2,
        }
    }

    pub fn from_offset(offset: i16) -> Option<Accidental> {
        match offset {
            -2 => Some(Accidental::DoubleFlat),
            -1 => Some(Accidental::Flat),
            0 => Some(Accidental::Natural),
            1 => Some(Accidental::Sharp),
            2 => Some(Accidental::DoubleSharp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Accidental::DoubleFlat => "bb",
            Accidental::Flat => "b",
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::DoubleSharp => "##",
        }
    }
}

/// A spelled pitch: letter, accidental, octave. C4 = MIDI 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PitchName {
    pub name: NoteName,
    pub accidental: Accidental,
    pub octave: i8,
}

impl PitchName {
    pub fn new(name: NoteName, accidental: Accidental, octave: i8) -> Self {
        Self {
            name,
            accidental,
            octave,
        }
    }

    /// Absolute MIDI semitone number. Exact for every spelling, including
    /// ones that cross the octave boundary (Cb4 = 59, B#3 = 60).
    pub fn midi(&self) -> i16 {
        12 * (self.octave as i16 + 1) + self.name.semitone() + self.accidental.offset()
    }

    /// Spell a MIDI number. Black keys take the sharp spelling, or the flat
    /// one when `prefer_flat` is set.
    pub fn from_midi(midi: i16, prefer_flat: bool) -> PitchName {
        let octave = (midi.div_euclid(12) - 1) as i8;
        let (name, accidental) = match midi.rem_euclid(12) {
            0 => (NoteName::C, Accidental::Natural),
            1 if prefer_flat => (NoteName::D, Accidental::Flat),
            1 => (NoteName::C, Accidental::Sharp),
            2 => (NoteName::D, Accidental::Natural),
            3 if prefer_flat => (NoteName::E, Accidental::Flat),
            3 => (NoteName::D, Accidental::Sharp),
            4 => (NoteName::E, Accidental::Natural),
            5 => (NoteName::F, Accidental::Natural),
            6 if prefer_flat => (NoteName::G, Accidental::Flat),
            6 => (NoteName::F, Accidental::Sharp),
            7 => (NoteName::G, Accidental::Natural),
            8 if prefer_flat => (NoteName::A, Accidental::Flat),
            8 => (NoteName::G, Accidental::Sharp),
            9 => (NoteName::A, Accidental::Natural),
            10 if prefer_flat => (NoteName::B, Accidental::Flat),
            10 => (NoteName::A, Accidental::Sharp),
            11 => (NoteName::B, Accidental::Natural),
            _ => unreachable!(),
        };
        PitchName {
            name,
            accidental,
            octave,
        }
    }
}

impl FromStr for PitchName {
    type Err = TonalError;

    /// Parse `C4`, `G#5`, `Db4`, `F##3`. The octave defaults to 4 when
    /// omitted (`C` means `C4`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TonalError::InvalidNote(s.to_string());
        let mut chars = s.chars().peekable();

        let name = chars
            .next()
            .and_then(NoteName::from_char)
            .ok_or_else(invalid)?;

        let mut sharps: i16 = 0;
        let mut flats: i16 = 0;
        while let Some(&c) = chars.peek() {
            match c {
                '#' => sharps += 1,
                'b' => flats += 1,
                _ => break,
            }
            chars.next();
        }
        if sharps > 0 && flats > 0 {
            return Err(invalid());
        }
        let accidental = Accidental::from_offset(sharps - flats).ok_or_else(invalid)?;

        let rest: String = chars.collect();
        let octave = if rest.is_empty() {
            4
        } else {
            rest.parse::<i8>().map_err(|_| invalid())?
        };

        Ok(PitchName {
            name,
            accidental,
            octave,
        })
    }
}

impl fmt::Display for PitchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.name.as_str(),
            self.accidental.as_str(),
            self.octave
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> PitchName {
        s.parse().unwrap()
    }

    #[test]
    fn test_midi_numbers() {
        assert_eq!(parse("C4").midi(), 60);
        assert_eq!(parse("A4").midi(), 69);
        assert_eq!(parse("G#5").midi(), 80);
        assert_eq!(parse("Db4").midi(), 61);
        assert_eq!(parse("C-1").midi(), 0);
        // Spellings that cross the octave boundary stay exact
        assert_eq!(parse("Cb4").midi(), 59);
        assert_eq!(parse("B#3").midi(), 60);
    }

    #[test]
    fn test_enharmonic_spellings_are_distinct_names() {
        let sharp = parse("D#4");
        let flat = parse("Eb4");
        assert_eq!(sharp.midi(), flat.midi());
        assert_ne!(sharp, flat);
    }

    #[test]
    fn test_parse_display_round_trip() {
        for s in ["C4", "G#5", "Db4", "B3", "F##3", "Abb2", "A-1"] {
            assert_eq!(parse(s).to_string(), s);
        }
    }

    #[test]
    fn test_octave_defaults_to_four() {
        assert_eq!(parse("C"), parse("C4"));
        assert_eq!(parse("Bb"), parse("Bb4"));
    }

    #[test]
    fn test_invalid_note_names() {
        assert!("H4".parse::<PitchName>().is_err());
        assert!("".parse::<PitchName>().is_err());
        assert!("C#x".parse::<PitchName>().is_err());
        assert!("C###".parse::<PitchName>().is_err());
        assert!("C#b4".parse::<PitchName>().is_err());
    }

    #[test]
    fn test_from_midi_spelling() {
        assert_eq!(PitchName::from_midi(61, false).to_string(), "C#4");
        assert_eq!(PitchName::from_midi(61, true).to_string(), "Db4");
        assert_eq!(PitchName::from_midi(60, false).to_string(), "C4");
    }

    #[test]
    fn test_step_up_wraps_past_b() {
        assert_eq!(NoteName::A.step_up(2), NoteName::C);
        assert_eq!(NoteName::C.step_up(7), NoteName::C);
        assert_eq!(NoteName::E.step_up(3), NoteName::A);
    }
}
