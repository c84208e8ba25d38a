//! In-memory engine that answers from a script instead of ephemeris files.
//!
//! Used by the test-suite and the benchmarks; it also records every call so
//! the order in which flags were sent can be checked afterwards.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::ephemeris::oracle::{Ephemeris, RawHouses, RawReading};
use crate::ephemeris::types::CalcFlags;

/// Tolerance when matching a scripted time index.
const JD_TOLERANCE: f64 = 1e-9;

/// One recorded `calc_ut`/`pheno_ut` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryCall {
    pub operation: &'static str,
    pub jd: f64,
    pub body: i32,
    pub flags: CalcFlags,
}

#[derive(Debug, Default)]
pub struct ScriptedEphemeris {
    positions: HashMap<i32, RawReading>,
    phenomena: HashMap<i32, Vec<(Option<f64>, RawReading)>>,
    houses: Option<RawHouses>,
    ayanamsa: f64,

    /// Last search path pushed to the engine
    pub ephe_path: Option<String>,
    /// Every topocentric point pushed, as (lon, lat, alt)
    pub topo_calls: Vec<(f64, f64, f64)>,
    /// Every sidereal mode pushed
    pub sid_modes: Vec<i32>,

    julday_calls: Cell<usize>,
    queries: RefCell<Vec<QueryCall>>,
}

impl ScriptedEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `calc_ut` for `body` with these values and status.
    pub fn with_position(mut self, body: i32, values: &[f64], status: i32) -> Self {
        self.positions.insert(
            body,
            RawReading {
                values: values.to_vec(),
                status,
            },
        );
        self
    }

    /// Answer `pheno_ut` for `body` at any time index not scripted more precisely.
    pub fn with_phenomenon(mut self, body: i32, values: &[f64]) -> Self {
        self.phenomena.entry(body).or_default().push((
            None,
            RawReading {
                values: values.to_vec(),
                status: 0,
            },
        ));
        self
    }

    /// Answer `pheno_ut` for `body` at exactly `jd`.
    pub fn with_phenomenon_at(mut self, body: i32, jd: f64, values: &[f64]) -> Self {
        self.phenomena.entry(body).or_default().push((
            Some(jd),
            RawReading {
                values: values.to_vec(),
                status: 0,
            },
        ));
        self
    }

    pub fn with_phenomenon_status(mut self, body: i32, status: i32) -> Self {
        self.phenomena.entry(body).or_default().push((
            None,
            RawReading {
                values: Vec::new(),
                status,
            },
        ));
        self
    }

    pub fn with_houses(mut self, cusps: &[f64], angles: &[f64], status: i32) -> Self {
        self.houses = Some(RawHouses {
            cusps: cusps.to_vec(),
            angles: angles.to_vec(),
            status,
        });
        self
    }

    pub fn with_ayanamsa(mut self, value: f64) -> Self {
        self.ayanamsa = value;
        self
    }

    /// How many times the calendar conversion ran.
    pub fn julday_calls(&self) -> usize {
        self.julday_calls.get()
    }

    /// Position and phenomenon queries in the order they were issued.
    pub fn queries(&self) -> Vec<QueryCall> {
        self.queries.borrow().clone()
    }

    fn record(&self, operation: &'static str, jd: f64, body: i32, flags: CalcFlags) {
        self.queries.borrow_mut().push(QueryCall {
            operation,
            jd,
            body,
            flags,
        });
    }
}

impl Ephemeris for ScriptedEphemeris {
    fn set_ephe_path(&mut self, path: &str) {
        self.ephe_path = Some(path.to_string());
    }

    fn set_topo(&mut self, lon: f64, lat: f64, alt: f64) {
        self.topo_calls.push((lon, lat, alt));
    }

    fn set_sid_mode(&mut self, mode: i32) {
        self.sid_modes.push(mode);
    }

    fn julday(&self, year: i32, month: u32, day: u32, hour: f64) -> f64 {
        self.julday_calls.set(self.julday_calls.get() + 1);
        gregorian_julian_day(year, month, day, hour)
    }

    fn get_ayanamsa_ut(&self, _jd: f64) -> f64 {
        self.ayanamsa
    }

    fn houses(&self, _jd: f64, _lat: f64, _lon: f64, _hsys: char) -> RawHouses {
        self.houses.clone().unwrap_or(RawHouses {
            cusps: Vec::new(),
            angles: Vec::new(),
            status: -1,
        })
    }

    fn calc_ut(&self, jd: f64, body: i32, flags: CalcFlags) -> RawReading {
        self.record("calc_ut", jd, body, flags);
        self.positions.get(&body).cloned().unwrap_or(RawReading {
            values: vec![0.0; 6],
            status: -1,
        })
    }

    fn pheno_ut(&self, jd: f64, body: i32, flags: CalcFlags) -> RawReading {
        self.record("pheno_ut", jd, body, flags);
        let Some(script) = self.phenomena.get(&body) else {
            return RawReading {
                values: vec![0.0; 20],
                status: -1,
            };
        };
        script
            .iter()
            .find(|(at, _)| matches!(at, Some(t) if (t - jd).abs() < JD_TOLERANCE))
            .or_else(|| script.iter().find(|(at, _)| at.is_none()))
            .map(|(_, reading)| reading.clone())
            .unwrap_or(RawReading {
                values: vec![0.0; 20],
                status: -1,
            })
    }
}

/// Julian day for a Gregorian calendar date (Meeus, ch. 7).
pub fn gregorian_julian_day(year: i32, month: u32, day: u32, hour: f64) -> f64 {
    let (y, m) = if month <= 2 {
        (year as f64 - 1.0, month as f64 + 12.0)
    } else {
        (year as f64, month as f64)
    };
    let a = (y / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();
    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day as f64 + b - 1524.5
        + hour / 24.0
}
