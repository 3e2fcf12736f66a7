//! Scale families: named interval patterns anchored at a tonic.

use crate::error::TonalError;

/// A heptatonic scale family, defined by the semitone offset of each of its
/// seven degrees from the tonic. One degree per letter name, so spelled
/// degrees follow consecutive letters (E major runs E F# G# A B C# D#).
pub trait ScaleFamily: Send + Sync {
    fn name(&self) -> &'static str;

    /// Semitone offsets of the seven degrees, ascending, starting at 0.
    fn intervals(&self) -> &'static [u8];
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Major;

impl ScaleFamily for Major {
    fn name(&self) -> &'static str {
        "major"
    }

    fn intervals(&self) -> &'static [u8] {
        &[0, 2, 4, 5, 7, 9, 11]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HarmonicMinor;

impl ScaleFamily for HarmonicMinor {
    fn name(&self) -> &'static str {
        "harmonic-minor"
    }

    fn intervals(&self) -> &'static [u8] {
        &[0, 2, 3, 5, 7, 8, 11]
    }
}

/// Resolve a scale-family selector string to a built-in family.
pub fn family_for_name(name: &str) -> Result<Box<dyn ScaleFamily>, TonalError> {
    match name {
        "major" => Ok(Box::new(Major)),
        "harmonic-minor" | "harmonic_minor" => Ok(Box::new(HarmonicMinor)),
        _ => Err(TonalError::UnknownScale(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_for_name() {
        assert_eq!(family_for_name("major").unwrap().name(), "major");
        assert_eq!(
            family_for_name("harmonic-minor").unwrap().name(),
            "harmonic-minor"
        );
        assert!(family_for_name("octatonic").is_err());
    }

    #[test]
    fn test_interval_shapes() {
        assert_eq!(Major.intervals().len(), 7);
        assert_eq!(HarmonicMinor.intervals().len(), 7);
        // harmonic minor's raised seventh
        assert_eq!(HarmonicMinor.intervals()[6], 11);
    }
}
