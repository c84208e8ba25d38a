use log::{debug, info, warn};
use std::time::Instant;

use crate::ephemeris::oracle::{Ephemeris, RawReading};
use crate::ephemeris::types::{
    Angles, Axis, Ayanamsa, CalcFlags, HouseCusps, ReferenceFrame, Zodiac,
};
use crate::error::AtlasError;

/// Number of phenomenon values kept from the engine output.
pub const PHENOMENON_VALUES: usize = 5;

/// How `use_sidereal` treats an ayanamsa code it does not recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SiderealPolicy {
    /// Reject the code and leave the flags untouched.
    #[default]
    Strict,
    /// Raise the sidereal flag anyway and let the engine use its default
    /// ayanamsa.
    Lenient,
}

/// Owns the engine handle together with the calculation flags sent with every
/// query.
///
/// Queries only read the flags; the `use_*` and `set_*` methods are the only
/// mutators.
#[derive(Debug)]
pub struct EphemerisFacade<E: Ephemeris> {
    engine: E,
    search_path: String,
    flags: CalcFlags,
    policy: SiderealPolicy,
}

impl<E: Ephemeris> EphemerisFacade<E> {
    pub fn new(engine: E, search_path: &str) -> Self {
        let mut facade = Self {
            engine,
            search_path: String::new(),
            flags: CalcFlags::default(),
            policy: SiderealPolicy::default(),
        };
        facade.set_search_path(search_path);
        info!(
            target: "ephemeris",
            "initialized ephemeris facade (path={:?}, flags={})", facade.search_path, facade.flags
        );
        facade
    }

    pub fn with_policy(mut self, policy: SiderealPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn flags(&self) -> CalcFlags {
        self.flags
    }

    pub fn search_path(&self) -> &str {
        &self.search_path
    }

    pub fn policy(&self) -> SiderealPolicy {
        self.policy
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn set_search_path(&mut self, path: &str) {
        self.engine.set_ephe_path(path);
        self.search_path = path.to_string();
        debug!(target: "ephemeris", "set ephemeris path to {:?}", path);
    }

    pub fn set_topography(&mut self, lat: f64, lon: f64, alt: f64) {
        self.engine.set_topo(lon, lat, alt);
        debug!(
            target: "ephemeris",
            "set ephemeris topography to (lat={:.6}, lon={:.6}, alt={:.1})", lat, lon, alt
        );
    }

    // Zodiac group

    pub fn use_tropical(&mut self) -> &mut Self {
        self.flags.zodiac = Zodiac::Tropical;
        self
    }

    /// Switch to the sidereal zodiac using a single-letter ayanamsa code.
    pub fn use_sidereal(&mut self, code: Option<char>) -> Result<&mut Self, AtlasError> {
        match code.and_then(Ayanamsa::from_code) {
            Some(ayanamsa) => {
                self.engine.set_sid_mode(ayanamsa.sidereal_mode());
                self.flags.zodiac = Zodiac::Sidereal(Some(ayanamsa));
            }
            None => match self.policy {
                SiderealPolicy::Strict => {
                    return Err(AtlasError::Configuration {
                        kind: "ayanamsa code",
                        value: code.map(String::from).unwrap_or_default(),
                        valid: ["L", "F", "K", "R", "Y", "D"]
                            .iter()
                            .map(|c| c.to_string())
                            .collect(),
                    });
                }
                SiderealPolicy::Lenient => {
                    warn!(
                        target: "ephemeris",
                        "unresolved ayanamsa code {:?}; engine default ayanamsa in effect", code
                    );
                    self.flags.zodiac = Zodiac::Sidereal(None);
                }
            },
        }
        Ok(self)
    }

    // Reference-frame group

    pub fn use_geocentric(&mut self) -> &mut Self {
        self.flags.frame = ReferenceFrame::Geocentric;
        self
    }

    pub fn use_topocentric(&mut self) -> &mut Self {
        self.flags.frame = ReferenceFrame::Topocentric;
        self
    }

    pub fn use_heliocentric(&mut self) -> &mut Self {
        self.flags.frame = ReferenceFrame::Heliocentric;
        self
    }

    pub fn use_barycentric(&mut self) -> &mut Self {
        self.flags.frame = ReferenceFrame::Barycentric;
        self
    }

    // Axis group

    pub fn use_ecliptic(&mut self) -> &mut Self {
        self.flags.axis = Axis::Ecliptic;
        self
    }

    pub fn use_equatorial(&mut self) -> &mut Self {
        self.flags.axis = Axis::Equatorial;
        self
    }

    /// Gregorian date and fractional UT hour to the engine time index.
    pub fn convert_to_time_index(&self, year: i32, month: u32, day: u32, hour: f64) -> f64 {
        self.engine.julday(year, month, day, hour)
    }

    pub fn query_ayanamsa(&self, time_index: f64) -> f64 {
        self.engine.get_ayanamsa_ut(time_index)
    }

    pub fn query_houses(
        &self,
        time_index: f64,
        lat: f64,
        lon: f64,
        system: char,
    ) -> Result<HouseCusps, AtlasError> {
        let started = Instant::now();
        let raw = self.engine.houses(time_index, lat, lon, system);
        debug!(
            target: "ephemeris",
            "houses(hsys={}, jd={:.6}, lat={:.6}, lon={:.6}) -> ret={}; took {:.2} ms",
            system, time_index, lat, lon, raw.status, elapsed_ms(started)
        );

        if raw.status < 0 {
            return Err(AtlasError::Engine {
                code: raw.status,
                operation: "houses",
                body: None,
                time_index,
            });
        }

        let cusps: [f64; 12] =
            raw.cusps
                .as_slice()
                .try_into()
                .map_err(|_| AtlasError::Shape {
                    context: "house cusps",
                    expected: 12,
                    found: raw.cusps.len(),
                })?;
        let angles = match raw.angles.as_slice() {
            [ascendant, midheaven, armc, vertex, ..] => Angles {
                ascendant: *ascendant,
                midheaven: *midheaven,
                armc: *armc,
                vertex: *vertex,
            },
            other => {
                return Err(AtlasError::Shape {
                    context: "house angles",
                    expected: 4,
                    found: other.len(),
                })
            }
        };

        Ok(HouseCusps {
            system,
            cusps,
            angles,
        })
    }

    /// Raw position query. The status code is handed back untouched; callers
    /// decide how to surface a negative one.
    pub fn query_position(&self, body: i32, time_index: f64) -> RawReading {
        let started = Instant::now();
        let reading = self.engine.calc_ut(time_index, body, self.flags);
        debug!(
            target: "ephemeris",
            "calc_ut(target={}, jd={:.6}, flags={}) -> ret={}; took {:.2} ms",
            body, time_index, self.flags, reading.status, elapsed_ms(started)
        );
        reading
    }

    /// The first five phenomenon values for `body`.
    pub fn query_phenomenon(&self, body: i32, time_index: f64) -> Result<Vec<f64>, AtlasError> {
        let started = Instant::now();
        let reading = self.engine.pheno_ut(time_index, body, self.flags);
        debug!(
            target: "ephemeris",
            "pheno_ut(target={}, jd={:.6}) -> ret={}; took {:.2} ms",
            body, time_index, reading.status, elapsed_ms(started)
        );

        if reading.status < 0 {
            return Err(AtlasError::Engine {
                code: reading.status,
                operation: "pheno_ut",
                body: Some(body),
                time_index,
            });
        }
        Ok(reading.values.into_iter().take(PHENOMENON_VALUES).collect())
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
