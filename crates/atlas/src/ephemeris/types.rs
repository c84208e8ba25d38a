use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AtlasError;

/// Geographic observation point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees, north positive
    pub lat: f64,
    /// Longitude in degrees, east positive
    pub lon: f64,
    /// Altitude in meters above sea level
    pub alt: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }

    /// A new location offset by the given deltas. The receiver is left untouched.
    pub fn shifted(&self, dlat: f64, dlon: f64, dalt: f64) -> Self {
        Self {
            lat: self.lat + dlat,
            lon: self.lon + dlon,
            alt: self.alt + dalt,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6}, {:.1})", self.lat, self.lon, self.alt)
    }
}

// Swiss Ephemeris calculation flag bits
pub const FLG_SWIEPH: i32 = 2;
pub const FLG_HELCTR: i32 = 8;
pub const FLG_SPEED: i32 = 256;
pub const FLG_EQUATORIAL: i32 = 2 * 1024;
pub const FLG_BARYCTR: i32 = 16 * 1024;
pub const FLG_TOPOCTR: i32 = 32 * 1024;
pub const FLG_SIDEREAL: i32 = 64 * 1024;

/// Flags that are always set for position queries.
pub const BASE_FLAGS: i32 = FLG_SWIEPH | FLG_SPEED;

/// Observer origin. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceFrame {
    #[default]
    Geocentric,
    Topocentric,
    Heliocentric,
    Barycentric,
}

impl ReferenceFrame {
    pub fn bits(self) -> i32 {
        match self {
            ReferenceFrame::Geocentric => 0,
            ReferenceFrame::Topocentric => FLG_TOPOCTR,
            ReferenceFrame::Heliocentric => FLG_HELCTR,
            ReferenceFrame::Barycentric => FLG_BARYCTR,
        }
    }
}

/// Coordinate axis of a position result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    Ecliptic,
    Equatorial,
}

impl Axis {
    pub fn bits(self) -> i32 {
        match self {
            Axis::Ecliptic => 0,
            Axis::Equatorial => FLG_EQUATORIAL,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Ecliptic => "ecliptic",
            Axis::Equatorial => "equatorial",
        }
    }
}

impl FromStr for Axis {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ecliptic" => Ok(Axis::Ecliptic),
            "equatorial" => Ok(Axis::Equatorial),
            other => Err(AtlasError::configuration(
                "frame",
                other,
                &["ecliptic", "equatorial"],
            )),
        }
    }
}

/// Precession-correction models understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ayanamsa {
    FaganBradley,
    Lahiri,
    DeLuce,
    Raman,
    Krishnamurti,
    Yukteshwar,
}

impl Ayanamsa {
    /// Resolve the single-letter code used between the observatory and the facade.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'L' => Some(Ayanamsa::Lahiri),
            'F' => Some(Ayanamsa::FaganBradley),
            'K' => Some(Ayanamsa::Krishnamurti),
            'R' => Some(Ayanamsa::Raman),
            'Y' => Some(Ayanamsa::Yukteshwar),
            'D' => Some(Ayanamsa::DeLuce),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Ayanamsa::Lahiri => 'L',
            Ayanamsa::FaganBradley => 'F',
            Ayanamsa::Krishnamurti => 'K',
            Ayanamsa::Raman => 'R',
            Ayanamsa::Yukteshwar => 'Y',
            Ayanamsa::DeLuce => 'D',
        }
    }

    /// Swiss Ephemeris `SE_SIDM_*` constant
    pub fn sidereal_mode(self) -> i32 {
        match self {
            Ayanamsa::FaganBradley => 0,
            Ayanamsa::Lahiri => 1,
            Ayanamsa::DeLuce => 2,
            Ayanamsa::Raman => 3,
            Ayanamsa::Krishnamurti => 5,
            Ayanamsa::Yukteshwar => 7,
        }
    }
}

/// Zodiac group of the calculation flags.
///
/// `Sidereal(None)` only arises under the lenient sidereal policy, when the
/// engine falls back to its own default ayanamsa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zodiac {
    #[default]
    Tropical,
    Sidereal(Option<Ayanamsa>),
}

impl Zodiac {
    pub fn bits(self) -> i32 {
        match self {
            Zodiac::Tropical => 0,
            Zodiac::Sidereal(_) => FLG_SIDEREAL,
        }
    }

    pub fn kind(self) -> ZodiacKind {
        match self {
            Zodiac::Tropical => ZodiacKind::Tropical,
            Zodiac::Sidereal(_) => ZodiacKind::Sidereal,
        }
    }
}

/// Zodiac mode as requested by callers, before an ayanamsa is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacKind {
    #[default]
    Tropical,
    Sidereal,
}

impl FromStr for ZodiacKind {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tropical" => Ok(ZodiacKind::Tropical),
            "sidereal" => Ok(ZodiacKind::Sidereal),
            other => Err(AtlasError::configuration(
                "zodiac",
                other,
                &["tropical", "sidereal"],
            )),
        }
    }
}

impl fmt::Display for ZodiacKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZodiacKind::Tropical => f.write_str("tropical"),
            ZodiacKind::Sidereal => f.write_str("sidereal"),
        }
    }
}

/// The full calculation configuration handed to the engine with every query.
///
/// Each flag group is its own enum, so two members of one group can never be
/// active together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalcFlags {
    pub frame: ReferenceFrame,
    pub axis: Axis,
    pub zodiac: Zodiac,
}

impl CalcFlags {
    /// Engine bit-set for these flags
    pub fn bits(&self) -> i32 {
        BASE_FLAGS | self.frame.bits() | self.axis.bits() | self.zodiac.bits()
    }
}

impl fmt::Display for CalcFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}|{}|{:?} ({:#x})",
            self.frame,
            self.axis.as_str(),
            self.zodiac,
            self.bits()
        )
    }
}

/// Anything the observatory can be oriented to: an axis or a reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Ecliptic,
    Equatorial,
    Topocentric,
    Geocentric,
    Heliocentric,
    Barycentric,
}

impl From<Axis> for Orientation {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::Ecliptic => Orientation::Ecliptic,
            Axis::Equatorial => Orientation::Equatorial,
        }
    }
}

impl From<ReferenceFrame> for Orientation {
    fn from(frame: ReferenceFrame) -> Self {
        match frame {
            ReferenceFrame::Geocentric => Orientation::Geocentric,
            ReferenceFrame::Topocentric => Orientation::Topocentric,
            ReferenceFrame::Heliocentric => Orientation::Heliocentric,
            ReferenceFrame::Barycentric => Orientation::Barycentric,
        }
    }
}

impl FromStr for Orientation {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ecliptic" => Ok(Orientation::Ecliptic),
            "equatorial" => Ok(Orientation::Equatorial),
            "topocentric" => Ok(Orientation::Topocentric),
            "geocentric" => Ok(Orientation::Geocentric),
            "heliocentric" => Ok(Orientation::Heliocentric),
            "barycentric" => Ok(Orientation::Barycentric),
            other => Err(AtlasError::configuration(
                "orientation",
                other,
                &[
                    "ecliptic",
                    "equatorial",
                    "topocentric",
                    "geocentric",
                    "heliocentric",
                    "barycentric",
                ],
            )),
        }
    }
}

/// Ascendant, MC and the auxiliary points the engine reports with house cusps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Angles {
    pub ascendant: f64,
    pub midheaven: f64,
    pub armc: f64,
    pub vertex: f64,
}

impl Angles {
    pub fn imum_coeli(&self) -> f64 {
        (self.midheaven + 180.0).rem_euclid(360.0)
    }

    pub fn descendant(&self) -> f64 {
        (self.ascendant + 180.0).rem_euclid(360.0)
    }
}

/// House cusps and angles for one moment and place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseCusps {
    /// Engine house-system code
    pub system: char,
    /// Cusps of houses 1 through 12, in degrees
    pub cusps: [f64; 12],
    pub angles: Angles,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags_are_geocentric_ecliptic_tropical() {
        let flags = CalcFlags::default();
        assert_eq!(flags.bits(), FLG_SWIEPH | FLG_SPEED);
    }

    #[test]
    fn test_flag_groups_do_not_overlap() {
        let groups = [
            FLG_TOPOCTR | FLG_HELCTR | FLG_BARYCTR,
            FLG_EQUATORIAL,
            FLG_SIDEREAL,
            BASE_FLAGS,
        ];
        for (i, a) in groups.iter().enumerate() {
            for b in groups.iter().skip(i + 1) {
                assert_eq!(a & b, 0);
            }
        }
    }

    #[test]
    fn test_sidereal_equatorial_topocentric_bits() {
        let flags = CalcFlags {
            frame: ReferenceFrame::Topocentric,
            axis: Axis::Equatorial,
            zodiac: Zodiac::Sidereal(Some(Ayanamsa::Lahiri)),
        };
        assert_eq!(
            flags.bits(),
            BASE_FLAGS | FLG_TOPOCTR | FLG_EQUATORIAL | FLG_SIDEREAL
        );
    }

    #[test]
    fn test_ayanamsa_codes_round_trip() {
        for code in ['L', 'F', 'K', 'R', 'Y', 'D'] {
            let ayanamsa = Ayanamsa::from_code(code).unwrap();
            assert_eq!(ayanamsa.code(), code);
        }
        assert_eq!(Ayanamsa::from_code('l'), Some(Ayanamsa::Lahiri));
        assert_eq!(Ayanamsa::from_code('X'), None);
    }

    #[test]
    fn test_orientation_parse() {
        assert_eq!("Equatorial".parse::<Orientation>().unwrap(), Orientation::Equatorial);
        assert!(matches!(
            "sideways".parse::<Orientation>(),
            Err(AtlasError::Configuration { kind: "orientation", .. })
        ));
    }

    #[test]
    fn test_angles_opposites() {
        let angles = Angles {
            ascendant: 200.0,
            midheaven: 100.0,
            armc: 0.0,
            vertex: 0.0,
        };
        assert_eq!(angles.descendant(), 20.0);
        assert_eq!(angles.imum_coeli(), 280.0);
    }

    #[test]
    fn test_location_shift_is_a_new_value() {
        let home = Location::new(10.0, 20.0, 5.0);
        let moved = home.shifted(1.0, -2.0, 3.0);
        assert_eq!(moved, Location::new(11.0, 18.0, 8.0));
        assert_eq!(home, Location::new(10.0, 20.0, 5.0));
    }
}
