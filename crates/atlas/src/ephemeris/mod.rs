pub mod facade;
pub mod oracle;
#[cfg(any(test, feature = "testing"))]
pub mod scripted;
#[cfg(feature = "swisseph")]
pub mod swiss;
pub mod types;

pub use facade::{EphemerisFacade, SiderealPolicy, PHENOMENON_VALUES};
pub use oracle::{Ephemeris, RawHouses, RawReading};
#[cfg(any(test, feature = "testing"))]
pub use scripted::ScriptedEphemeris;
#[cfg(feature = "swisseph")]
pub use swiss::SwissEph;
pub use types::{
    Angles, Axis, Ayanamsa, CalcFlags, HouseCusps, Location, Orientation, ReferenceFrame,
    Zodiac, ZodiacKind,
};
