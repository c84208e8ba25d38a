use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::celestial::zodiac::{self, Phase, ZodiacSign};
use crate::ephemeris::{Axis, Location};
use crate::error::AtlasError;
use crate::observatory::PhenomenonProfile;

const POSITION_VALUES: usize = 6;
const PHENOMENON_FIELDS: usize = 6;

/// Ecliptic coordinates and their daily rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EclipticPosition {
    /// Longitude in degrees
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
    /// Distance in AU
    pub dist: f64,
    pub dlon: f64,
    pub dlat: f64,
    pub ddist: f64,
}

/// Equatorial coordinates and their daily rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquatorialPosition {
    /// Right ascension in degrees
    pub ra: f64,
    /// Declination in degrees
    pub dec: f64,
    /// Distance in AU
    pub dist: f64,
    pub dra: f64,
    pub ddec: f64,
    pub ddist: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Phenomenon {
    pub phase_angle: f64,
    pub illuminated_fraction: f64,
    pub elongation: f64,
    pub apparent_diameter: f64,
    pub apparent_magnitude: f64,
    pub waxing: bool,
}

/// Everything observed about one body at one moment and place.
///
/// Field groups start empty and are filled by the matching `apply_*` call.
/// The derived accessors fail with `AtlasError::UnsetField` until then.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CelestialState {
    pub id: i32,
    pub glyph: String,
    pub name: String,
    pub time: DateTime<Utc>,
    pub location: Location,
    ecliptic: Option<EclipticPosition>,
    equatorial: Option<EquatorialPosition>,
    phenomenon: Option<Phenomenon>,
}

impl CelestialState {
    pub fn new(id: i32, glyph: &str, name: &str, time: DateTime<Utc>, location: Location) -> Self {
        Self {
            id,
            glyph: glyph.to_string(),
            name: name.to_string(),
            time,
            location,
            ecliptic: None,
            equatorial: None,
            phenomenon: None,
        }
    }

    pub fn ecliptic(&self) -> Option<&EclipticPosition> {
        self.ecliptic.as_ref()
    }

    pub fn equatorial(&self) -> Option<&EquatorialPosition> {
        self.equatorial.as_ref()
    }

    pub fn phenomenon(&self) -> Option<&Phenomenon> {
        self.phenomenon.as_ref()
    }

    /// Store a six-value position reading under the field group for `axis`.
    pub fn apply_position(&mut self, values: &[f64], axis: Axis) -> Result<(), AtlasError> {
        let [a, b, c, d, e, f] = <[f64; POSITION_VALUES]>::try_from(values).map_err(|_| {
            AtlasError::Shape {
                context: match axis {
                    Axis::Ecliptic => "ecliptic position",
                    Axis::Equatorial => "equatorial position",
                },
                expected: POSITION_VALUES,
                found: values.len(),
            }
        })?;
        match axis {
            Axis::Ecliptic => {
                self.ecliptic = Some(EclipticPosition {
                    lon: a,
                    lat: b,
                    dist: c,
                    dlon: d,
                    dlat: e,
                    ddist: f,
                })
            }
            Axis::Equatorial => {
                self.equatorial = Some(EquatorialPosition {
                    ra: a,
                    dec: b,
                    dist: c,
                    dra: d,
                    ddec: e,
                    ddist: f,
                })
            }
        }
        Ok(())
    }

    pub fn apply_phenomenon(&mut self, profile: &PhenomenonProfile) -> Result<(), AtlasError> {
        let [phase_angle, illuminated_fraction, elongation, apparent_diameter, apparent_magnitude] =
            profile.values[..] else {
                return Err(AtlasError::Shape {
                    context: "phenomenon",
                    expected: PHENOMENON_FIELDS,
                    found: profile.arity(),
                });
            };
        self.phenomenon = Some(Phenomenon {
            phase_angle,
            illuminated_fraction,
            elongation,
            apparent_diameter,
            apparent_magnitude,
            waxing: profile.waxing,
        });
        Ok(())
    }

    /// Ecliptic longitude, required by the sign-based accessors.
    pub fn lon(&self) -> Result<f64, AtlasError> {
        self.ecliptic
            .map(|pos| pos.lon)
            .ok_or_else(|| self.unset("lon"))
    }

    pub fn sign(&self) -> Result<ZodiacSign, AtlasError> {
        Ok(ZodiacSign::from_longitude(self.lon()?))
    }

    /// Degrees into the current sign
    pub fn orb(&self) -> Result<f64, AtlasError> {
        Ok(zodiac::orb(self.lon()?))
    }

    pub fn retrograde(&self) -> Result<bool, AtlasError> {
        self.ecliptic
            .map(|pos| pos.dlon < 0.0)
            .ok_or_else(|| self.unset("dlon"))
    }

    pub fn phase(&self) -> Result<Phase, AtlasError> {
        let pheno = self
            .phenomenon
            .ok_or_else(|| self.unset("illuminated_fraction"))?;
        Ok(zodiac::phase_for(
            pheno.illuminated_fraction,
            pheno.waxing,
            &self.name,
        ))
    }

    fn unset(&self, field: &'static str) -> AtlasError {
        AtlasError::UnsetField {
            field,
            body: self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sun() -> CelestialState {
        CelestialState::new(0, "☉", "Sun", Utc::now(), Location::new(0.0, 0.0, 0.0))
    }

    #[test]
    fn test_fresh_state_has_no_derived_values() {
        let state = sun();
        assert!(matches!(state.sign(), Err(AtlasError::UnsetField { field: "lon", .. })));
        assert!(matches!(state.orb(), Err(AtlasError::UnsetField { .. })));
        assert!(matches!(state.retrograde(), Err(AtlasError::UnsetField { field: "dlon", .. })));
        assert!(matches!(state.phase(), Err(AtlasError::UnsetField { .. })));
    }

    #[test]
    fn test_apply_position_round_trip() {
        let mut state = sun();
        let values = [10.0, 1.5, 0.98, -0.2, 0.01, 0.0001];
        state.apply_position(&values, Axis::Equatorial).unwrap();
        let eq = state.equatorial().unwrap();
        assert_eq!(
            [eq.ra, eq.dec, eq.dist, eq.dra, eq.ddec, eq.ddist],
            values
        );
        assert!(state.ecliptic().is_none());
    }

    #[test]
    fn test_zero_longitude_is_set() {
        let mut state = sun();
        state
            .apply_position(&[0.0, 0.0, 1.0, 0.0, 0.0, 0.0], Axis::Ecliptic)
            .unwrap();
        assert_eq!(state.sign().unwrap(), ZodiacSign::Aries);
        assert!(!state.retrograde().unwrap());
    }

    #[test]
    fn test_apply_position_rejects_wrong_arity() {
        let mut state = sun();
        let err = state.apply_position(&[1.0, 2.0, 3.0], Axis::Ecliptic).unwrap_err();
        assert_eq!(
            err,
            AtlasError::Shape {
                context: "ecliptic position",
                expected: 6,
                found: 3
            }
        );
        assert!(state.ecliptic().is_none());
    }

    #[test]
    fn test_apply_phenomenon_rejects_wrong_arity() {
        let mut state = sun();
        let profile = PhenomenonProfile {
            values: vec![0.0, 0.5, 0.0, 0.0],
            waxing: true,
        };
        assert!(matches!(
            state.apply_phenomenon(&profile),
            Err(AtlasError::Shape { expected: 6, found: 5, .. })
        ));
        assert!(state.phenomenon().is_none());
    }

    #[test]
    fn test_retrograde_from_negative_speed() {
        let mut state = sun();
        state
            .apply_position(&[200.0, 0.0, 1.0, -0.05, 0.0, 0.0], Axis::Ecliptic)
            .unwrap();
        assert!(state.retrograde().unwrap());
    }
}
