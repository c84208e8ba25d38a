pub mod state;
pub mod zodiac;

pub use state::{CelestialState, EclipticPosition, EquatorialPosition, Phenomenon};
pub use zodiac::{orb, phase_for, Phase, ZodiacSign};
