//! Observation pipeline over a numeric ephemeris engine.
//!
//! [`ephemeris::EphemerisFacade`] keeps the calculation flags, the
//! [`observatory::Observatory`] keeps time and place, and the
//! [`wizard::Wizard`] sequences both to fill a [`celestial::CelestialState`].

pub mod celestial;
pub mod ephemeris;
pub mod error;
pub mod observatory;
pub mod registry;
pub mod wizard;

pub use celestial::{CelestialState, Phase, ZodiacSign};
pub use ephemeris::{Axis, EphemerisFacade, Location, Orientation, ReferenceFrame, ZodiacKind};
pub use error::AtlasError;
pub use observatory::Observatory;
pub use registry::{BodyEntry, BodyRegistry};
pub use wizard::{ConjureRequest, Property, SharedWizard, Wizard};
