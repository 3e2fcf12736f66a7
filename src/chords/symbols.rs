//! Chord symbol parsing.
//!
//! A chord symbol is `<root><quality-extension>`: the root is one letter A-G
//! with an optional `#` or `b`, and the remainder of the string is looked up
//! in the quality/extension table. An empty remainder is the major triad, so
//! `"C"` parses as C major.
//!
//! Both lookup tables are immutable process-wide statics built once at first
//! use. The quality table registers short aliases for every `maj`/`min`/`dim`
//! key (`M`/`m`/`°`), pointing at the same interval set; unknown components
//! are rejected, never guessed.

use crate::error::TonalError;
use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// Root note names to MIDI numbers, spanning one reference octave
    /// (C4 = 60). Enharmonic spellings map to the same number.
    static ref ROOT_PITCHES: HashMap<&'static str, u8> = {
        let mut m = HashMap::new();
        m.insert("C", 60);
        m.insert("C#", 61);
        m.insert("Db", 61);
        m.insert("D", 62);
        m.insert("D#", 63);
        m.insert("Eb", 63);
        m.insert("E", 64);
        m.insert("F", 65);
        m.insert("F#", 66);
        m.insert("Gb", 66);
        m.insert("G", 67);
        m.insert("G#", 68);
        m.insert("Ab", 68);
        m.insert("A", 69);
        m.insert("A#", 70);
        m.insert("Bb", 70);
        m.insert("B", 71);
        m
    };

    /// Quality/extension strings to semitone offsets from the root.
    /// Canonical keys plus derived aliases.
    static ref QUALITY_INTERVALS: HashMap<String, Vec<u8>> = {
        let canonical: &[(&str, &[u8])] = &[
            ("", &[0, 4, 7]), // bare root is a major triad
            ("maj", &[0, 4, 7]),
            ("min", &[0, 3, 7]),
            ("dim", &[0, 3, 6]),
            ("aug", &[0, 4, 8]),
            ("7", &[0, 4, 7, 10]),
            ("maj7", &[0, 4, 7, 11]),
            ("min7", &[0, 3, 7, 10]),
            ("minmaj7", &[0, 3, 7, 11]),
            ("dim7", &[0, 3, 6, 9]),
            ("hdim7", &[0, 3, 6, 10]),
            ("aug7", &[0, 4, 8, 10]),
            ("6", &[0, 4, 7, 9]),
            ("min6", &[0, 3, 7, 9]),
            ("9", &[0, 4, 7, 10, 14]),
            ("maj9", &[0, 4, 7, 11, 14]),
            ("min9", &[0, 3, 7, 10, 14]),
            ("11", &[0, 4, 7, 10, 14, 17]),
            ("maj11", &[0, 4, 7, 11, 14, 17]),
            ("min11", &[0, 3, 7, 10, 14, 17]),
            ("13", &[0, 4, 7, 10, 14, 17, 21]),
            ("maj13", &[0, 4, 7, 11, 14, 17, 21]),
            ("min13", &[0, 3, 7, 10, 14, 17, 21]),
        ];

        let mut m: HashMap<String, Vec<u8>> = HashMap::new();
        for (key, intervals) in canonical {
            m.insert((*key).to_string(), intervals.to_vec());
        }

        // Alias pass: maj -> M, min -> m, dim -> ° on leading substrings.
        let aliases: Vec<(String, Vec<u8>)> = m
            .iter()
            .filter_map(|(key, intervals)| {
                let alias = if key.starts_with("maj") {
                    key.replacen("maj", "M", 1)
                } else if key.starts_with("min") {
                    key.replacen("min", "m", 1)
                } else if key.starts_with("dim") {
                    key.replacen("dim", "°", 1)
                } else {
                    return None;
                };
                Some((alias, intervals.clone()))
            })
            .collect();
        m.extend(aliases);
        m
    };
}

/// The quality keys with a registered alias, paired with that alias.
/// Exposed for table-coverage tests.
pub fn alias_pairs() -> Vec<(String, String)> {
    QUALITY_INTERVALS
        .keys()
        .filter_map(|key| {
            let alias = if key.starts_with("maj") {
                key.replacen("maj", "M", 1)
            } else if key.starts_with("min") {
                key.replacen("min", "m", 1)
            } else if key.starts_with("dim") {
                key.replacen("dim", "°", 1)
            } else {
                return None;
            };
            Some((key.clone(), alias))
        })
        .collect()
}

/// All canonical quality keys (aliases excluded). Exposed for coverage tests.
pub fn canonical_qualities() -> Vec<&'static str> {
    vec![
        "", "maj", "min", "dim", "aug", "7", "maj7", "min7", "minmaj7", "dim7", "hdim7", "aug7",
        "6", "min6", "9", "maj9", "min9", "11", "maj11", "min11", "13", "maj13", "min13",
    ]
}

/// Extract the root name from the start of a chord symbol: one letter A-G
/// optionally followed by `#` or `b`.
pub fn parse_root(symbol: &str) -> Result<&str, TonalError> {
    let bytes = symbol.as_bytes();
    if !matches!(bytes.first(), Some(b'A'..=b'G')) {
        return Err(TonalError::InvalidChord(symbol.to_string()));
    }
    let len = match bytes.get(1) {
        Some(b'#') | Some(b'b') => 2,
        _ => 1,
    };
    Ok(&symbol[..len])
}

/// Look up the interval set for a quality/extension string (canonical key or
/// registered alias).
pub fn resolve_intervals(quality: &str) -> Result<&'static [u8], TonalError> {
    QUALITY_INTERVALS
        .get(quality)
        .map(|v| v.as_slice())
        .ok_or_else(|| TonalError::UnknownQuality(quality.to_string()))
}

/// Parse a chord symbol into MIDI note numbers: root pitch plus each interval
/// offset, ascending.
///
/// ```
/// use tonal::chords::chord_to_pitches;
///
/// assert_eq!(chord_to_pitches("Cmaj7").unwrap(), vec![60, 64, 67, 71]);
/// assert_eq!(chord_to_pitches("Am").unwrap(), vec![69, 72, 76]);
/// ```
pub fn chord_to_pitches(symbol: &str) -> Result<Vec<u8>, TonalError> {
    let root = parse_root(symbol)?;
    let quality = &symbol[root.len()..];

    // parse_root admits E#/B#/Cb/Fb shapes the root table has no entry for
    let root_pitch = ROOT_PITCHES
        .get(root)
        .copied()
        .ok_or_else(|| TonalError::InvalidChord(symbol.to_string()))?;

    let intervals = resolve_intervals(quality)?;
    Ok(intervals.iter().map(|&i| root_pitch + i).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_root() {
        assert_eq!(parse_root("Cmaj7").unwrap(), "C");
        assert_eq!(parse_root("F#m7").unwrap(), "F#");
        assert_eq!(parse_root("Bbmin9").unwrap(), "Bb");
        assert_eq!(parse_root("G").unwrap(), "G");
        assert!(parse_root("Hdim").is_err());
        assert!(parse_root("7").is_err());
        assert!(parse_root("").is_err());
    }

    #[test]
    fn test_bare_root_is_major_triad() {
        assert_eq!(chord_to_pitches("C").unwrap(), vec![60, 64, 67]);
        assert_eq!(chord_to_pitches("C").unwrap(), chord_to_pitches("Cmaj").unwrap());
    }

    #[test]
    fn test_known_chords() {
        assert_eq!(chord_to_pitches("Cmaj7").unwrap(), vec![60, 64, 67, 71]);
        assert_eq!(chord_to_pitches("G7").unwrap(), vec![67, 71, 74, 77]);
        assert_eq!(chord_to_pitches("Bdim").unwrap(), vec![71, 74, 77]);
        assert_eq!(chord_to_pitches("Dmin7").unwrap(), vec![62, 65, 69, 72]);
        assert_eq!(
            chord_to_pitches("Cmaj13").unwrap(),
            vec![60, 64, 67, 71, 74, 77, 81]
        );
    }

    #[test]
    fn test_aliases_resolve_to_same_intervals() {
        for (canonical, alias) in alias_pairs() {
            assert_eq!(
                resolve_intervals(&canonical).unwrap(),
                resolve_intervals(&alias).unwrap(),
                "alias {alias} diverges from {canonical}"
            );
        }
        // Spot checks
        assert_eq!(chord_to_pitches("Am").unwrap(), vec![69, 72, 76]);
        assert_eq!(chord_to_pitches("AM7").unwrap(), chord_to_pitches("Amaj7").unwrap());
        assert_eq!(chord_to_pitches("B°7").unwrap(), chord_to_pitches("Bdim7").unwrap());
        assert_eq!(chord_to_pitches("Em11").unwrap(), chord_to_pitches("Emin11").unwrap());
    }

    #[test]
    fn test_enharmonic_roots_share_pitch() {
        assert_eq!(chord_to_pitches("C#").unwrap(), chord_to_pitches("Db").unwrap());
        assert_eq!(chord_to_pitches("A#m").unwrap(), chord_to_pitches("Bbm").unwrap());
    }

    #[test]
    fn test_unknown_quality() {
        assert!(matches!(
            chord_to_pitches("Cxyz"),
            Err(TonalError::UnknownQuality(q)) if q == "xyz"
        ));
    }

    #[test]
    fn test_unsupported_root_spelling() {
        // parseable shape, but not in the root table
        assert!(matches!(
            chord_to_pitches("E#maj"),
            Err(TonalError::InvalidChord(_))
        ));
    }

    #[test]
    fn test_full_table_coverage() {
        // Every root spelling x every canonical quality parses to a
        // non-empty ascending pitch set rooted at the table pitch.
        let roots = [
            "C", "C#", "Db", "D", "D#", "Eb", "E", "F", "F#", "Gb", "G", "G#", "Ab", "A", "A#",
            "Bb", "B",
        ];
        for root in roots {
            for quality in canonical_qualities() {
                let symbol = format!("{root}{quality}");
                let pitches = chord_to_pitches(&symbol).unwrap();
                assert!(!pitches.is_empty());
                assert_eq!(pitches[0], *ROOT_PITCHES.get(root).unwrap());
                assert!(pitches.windows(2).all(|w| w[0] < w[1]), "{symbol} not ascending");
            }
        }
    }
}
