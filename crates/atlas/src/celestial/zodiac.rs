//! Zodiac signs and lunar-style phase names.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

// Glyphs carry U+FE0E so terminals render them as text, not emoji.
const SIGNS: [(ZodiacSign, &str, &str); 12] = [
    (ZodiacSign::Aries, "\u{2648}\u{FE0E}", "Aries"),
    (ZodiacSign::Taurus, "\u{2649}\u{FE0E}", "Taurus"),
    (ZodiacSign::Gemini, "\u{264A}\u{FE0E}", "Gemini"),
    (ZodiacSign::Cancer, "\u{264B}\u{FE0E}", "Cancer"),
    (ZodiacSign::Leo, "\u{264C}\u{FE0E}", "Leo"),
    (ZodiacSign::Virgo, "\u{264D}\u{FE0E}", "Virgo"),
    (ZodiacSign::Libra, "\u{264E}\u{FE0E}", "Libra"),
    (ZodiacSign::Scorpio, "\u{264F}\u{FE0E}", "Scorpio"),
    (ZodiacSign::Sagittarius, "\u{2650}\u{FE0E}", "Sagittarius"),
    (ZodiacSign::Capricorn, "\u{2651}\u{FE0E}", "Capricorn"),
    (ZodiacSign::Aquarius, "\u{2652}\u{FE0E}", "Aquarius"),
    (ZodiacSign::Pisces, "\u{2653}\u{FE0E}", "Pisces"),
];

impl ZodiacSign {
    /// Sign containing ecliptic longitude `lon`, any real value accepted.
    pub fn from_longitude(lon: f64) -> Self {
        let idx = (lon / 30.0).floor().rem_euclid(12.0) as usize;
        SIGNS[idx % 12].0
    }

    /// Position in the zodiac, Aries = 0
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn glyph(self) -> &'static str {
        SIGNS[self.index()].1
    }

    pub fn name(self) -> &'static str {
        SIGNS[self.index()].2
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.glyph(), self.name())
    }
}

/// Degrees past the start of the current sign, in [0, 30).
pub fn orb(lon: f64) -> f64 {
    lon.rem_euclid(30.0)
}

/// Named phase with its moon-phase emoji.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phase {
    pub name: String,
    pub emoji: &'static str,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji, self.name)
    }
}

enum PhaseName {
    /// "New {body}" / "Full {body}"
    Body(&'static str),
    /// "Waxing {x}" / "Waning {x}"
    Direction(&'static str),
    /// "First {x}" / "Last {x}"
    Ordinal(&'static str),
}

struct PhaseBin {
    min: f64,
    max: f64,
    name: PhaseName,
    waxing_emoji: &'static str,
    waning_emoji: &'static str,
}

// Half-open on the low end; the last bin reaches 1.01 so a fully lit disc lands in it.
static PHASES: [PhaseBin; 5] = [
    PhaseBin { min: 0.00, max: 0.20, name: PhaseName::Body("New"), waxing_emoji: "\u{1F311}", waning_emoji: "\u{1F311}" },
    PhaseBin { min: 0.20, max: 0.40, name: PhaseName::Direction("Crescent"), waxing_emoji: "\u{1F312}", waning_emoji: "\u{1F318}" },
    PhaseBin { min: 0.40, max: 0.60, name: PhaseName::Ordinal("Quarter"), waxing_emoji: "\u{1F313}", waning_emoji: "\u{1F317}" },
    PhaseBin { min: 0.60, max: 0.80, name: PhaseName::Direction("Gibbous"), waxing_emoji: "\u{1F314}", waning_emoji: "\u{1F316}" },
    PhaseBin { min: 0.80, max: 1.01, name: PhaseName::Body("Full"), waxing_emoji: "\u{1F315}", waning_emoji: "\u{1F315}" },
];

/// Phase for an illuminated fraction. The fraction is clamped into [0, 1].
pub fn phase_for(illuminated_fraction: f64, waxing: bool, body_name: &str) -> Phase {
    let fraction = if illuminated_fraction.is_nan() {
        0.0
    } else {
        illuminated_fraction.clamp(0.0, 1.0)
    };
    let bin = PHASES
        .iter()
        .find(|bin| bin.min <= fraction && fraction < bin.max)
        .unwrap_or(&PHASES[PHASES.len() - 1]);

    let name = match bin.name {
        PhaseName::Body(word) => format!("{word} {body_name}"),
        PhaseName::Direction(word) => {
            format!("{} {word}", if waxing { "Waxing" } else { "Waning" })
        }
        PhaseName::Ordinal(word) => format!("{} {word}", if waxing { "First" } else { "Last" }),
    };
    Phase {
        name,
        emoji: if waxing {
            bin.waxing_emoji
        } else {
            bin.waning_emoji
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_boundaries() {
        assert_eq!(ZodiacSign::from_longitude(0.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(29.999), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(30.0), ZodiacSign::Taurus);
        assert_eq!(ZodiacSign::from_longitude(359.999), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(360.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(-10.0), ZodiacSign::Pisces);
    }

    #[test]
    fn test_leo_glyph() {
        let leo = ZodiacSign::from_longitude(120.5);
        assert_eq!(leo.index(), 4);
        assert_eq!(leo.glyph(), "♌︎");
        assert_eq!(leo.name(), "Leo");
    }

    #[test]
    fn test_orb_wraps() {
        assert_eq!(orb(120.5), 0.5);
        assert_eq!(orb(-1.0), 29.0);
        assert_eq!(orb(30.0), 0.0);
    }

    #[test]
    fn test_phase_boundaries_go_up() {
        assert_eq!(phase_for(0.19, true, "Moon").name, "New Moon");
        assert_eq!(phase_for(0.20, true, "Moon").name, "Waxing Crescent");
        assert_eq!(phase_for(0.40, true, "Moon").name, "First Quarter");
        assert_eq!(phase_for(0.60, false, "Moon").name, "Waning Gibbous");
        assert_eq!(phase_for(0.80, false, "Moon").name, "Full Moon");
        assert_eq!(phase_for(1.0, true, "Moon").name, "Full Moon");
    }

    #[test]
    fn test_phase_emoji_follows_direction() {
        assert_eq!(phase_for(0.3, true, "Moon").emoji, "🌒");
        assert_eq!(phase_for(0.3, false, "Moon").emoji, "🌘");
        assert_eq!(phase_for(0.5, false, "Venus").name, "Last Quarter");
        assert_eq!(phase_for(0.5, false, "Venus").emoji, "🌗");
    }

    #[test]
    fn test_phase_clamps_out_of_range() {
        assert_eq!(phase_for(-0.001, true, "Moon").name, "New Moon");
        assert_eq!(phase_for(1.2, false, "Moon").name, "Full Moon");
    }
}
