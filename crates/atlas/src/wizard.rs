//! Orchestration: turns a named target into a populated `CelestialState`.
//!
//! The engine's flags, topocentric point and sidereal mode are global, so a
//! whole `conjure` call must run without interleaving. `conjure` takes
//! `&mut self` for that reason; share a wizard between threads only through
//! `SharedWizard`, holding the lock for the entire call.

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use crate::celestial::CelestialState;
use crate::ephemeris::{Axis, Ephemeris, Location, Orientation, ReferenceFrame, ZodiacKind};
use crate::error::AtlasError;
use crate::observatory::Observatory;
use crate::registry::BodyRegistry;

/// What to compute for a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    Position,
    Phenomenon,
}

impl FromStr for Property {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "position" => Ok(Property::Position),
            "phenomenon" => Ok(Property::Phenomenon),
            other => Err(AtlasError::configuration(
                "property",
                other,
                &["position", "phenomenon"],
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConjureRequest {
    pub time: DateTime<Utc>,
    pub location: Location,
    pub target: String,
    pub zodiac: ZodiacKind,
    pub ayanamsa: Option<String>,
    pub properties: Vec<Property>,
    /// Observed in this order; each axis at most once
    pub frames: Vec<Axis>,
    /// Reference frame every query of this request is made in
    pub origin: ReferenceFrame,
}

impl ConjureRequest {
    /// Tropical, geocentric, position and phenomenon, ecliptic then equatorial.
    pub fn new(time: DateTime<Utc>, location: Location, target: &str) -> Self {
        Self {
            time,
            location,
            target: target.to_string(),
            zodiac: ZodiacKind::Tropical,
            ayanamsa: None,
            properties: vec![Property::Position, Property::Phenomenon],
            frames: vec![Axis::Ecliptic, Axis::Equatorial],
            origin: ReferenceFrame::Geocentric,
        }
    }

    pub fn with_zodiac(mut self, zodiac: ZodiacKind, ayanamsa: Option<&str>) -> Self {
        self.zodiac = zodiac;
        self.ayanamsa = ayanamsa.map(str::to_string);
        self
    }

    pub fn with_properties(mut self, properties: &[Property]) -> Self {
        self.properties = properties.to_vec();
        self
    }

    pub fn with_frames(mut self, frames: &[Axis]) -> Self {
        self.frames = frames.to_vec();
        self
    }

    pub fn with_origin(mut self, origin: ReferenceFrame) -> Self {
        self.origin = origin;
        self
    }

    /// Same settings, different target
    pub fn retarget(&self, target: &str) -> Self {
        Self {
            target: target.to_string(),
            ..self.clone()
        }
    }
}

pub type SharedWizard<E> = Arc<Mutex<Wizard<E>>>;

#[derive(Debug)]
pub struct Wizard<E: Ephemeris> {
    observatory: Observatory<E>,
    registry: BodyRegistry,
}

impl<E: Ephemeris> Wizard<E> {
    pub fn new(observatory: Observatory<E>, registry: BodyRegistry) -> Self {
        info!(target: "wizard", "wizard ready ({} bodies registered)", registry.len());
        Self {
            observatory,
            registry,
        }
    }

    pub fn observatory(&self) -> &Observatory<E> {
        &self.observatory
    }

    pub fn observatory_mut(&mut self) -> &mut Observatory<E> {
        &mut self.observatory
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn into_shared(self) -> SharedWizard<E> {
        Arc::new(Mutex::new(self))
    }

    /// Observe one target. Either every requested property is filled in or
    /// the first failure is returned.
    pub fn conjure(&mut self, request: &ConjureRequest) -> Result<CelestialState, AtlasError> {
        self.run(request).inspect_err(|e| {
            error!(
                target: "wizard",
                "bad celestial state conjuring (time={}, location={}, target={}, zodiac={}, ayanamsa={:?}, properties={:?}, frames={:?}, origin={:?}): {}",
                request.time,
                request.location,
                request.target,
                request.zodiac,
                request.ayanamsa,
                request.properties,
                request.frames,
                request.origin,
                e
            );
        })
    }

    /// Conjure each of `targets` with the settings of `template`, in order.
    pub fn conjure_many<S: AsRef<str>>(
        &mut self,
        template: &ConjureRequest,
        targets: &[S],
    ) -> Result<Vec<CelestialState>, AtlasError> {
        targets
            .iter()
            .map(|target| self.conjure(&template.retarget(target.as_ref())))
            .collect()
    }

    fn run(&mut self, request: &ConjureRequest) -> Result<CelestialState, AtlasError> {
        let body = self
            .registry
            .lookup(&request.target)
            .cloned()
            .ok_or_else(|| AtlasError::UnknownTarget {
                name: request.target.clone(),
            })?;

        for (i, frame) in request.frames.iter().enumerate() {
            if request.frames[..i].contains(frame) {
                return Err(AtlasError::Configuration {
                    kind: "frames",
                    value: format!("{:?}", request.frames),
                    valid: vec!["each of ecliptic, equatorial at most once".to_string()],
                });
            }
        }

        let mut state = CelestialState::new(
            body.id,
            &body.glyph,
            &body.name,
            request.time,
            request.location,
        );

        self.observatory
            .set(Some(request.time), Some(request.location))
            .align(request.zodiac, request.ayanamsa.as_deref())?;
        // Nothing carries over from the previous request
        self.observatory
            .orient(Orientation::from(request.origin))
            .orient(Orientation::Ecliptic);

        if request.properties.contains(&Property::Position) {
            for &axis in &request.frames {
                self.observatory.orient(Orientation::from(axis));
                let position = self.observatory.observe(body.id)?;
                debug!(target: "wizard", "{} {} position: {:?}", body.name, axis.as_str(), position);
                state.apply_position(&position, axis)?;
            }
        }

        if request.properties.contains(&Property::Phenomenon) {
            let profile = self.observatory.profile(body.id)?;
            debug!(target: "wizard", "{} phenomenon: {:?}", body.name, profile);
            state.apply_phenomenon(&profile)?;
        }

        info!(
            target: "wizard",
            "conjured {} (id={}) at {}", body.name, body.id, request.time
        );
        Ok(state)
    }
}
