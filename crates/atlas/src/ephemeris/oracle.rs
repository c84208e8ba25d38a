//! Boundary to the numeric ephemeris engine.
//!
//! The engine is opaque: it turns a time index, a body id and a flag set into
//! numbers, and reports failures through a negative status code. Its settings
//! (search path, topocentric point, sidereal mode) are process-wide, which is
//! why the setters take `&mut self`.

use crate::ephemeris::types::CalcFlags;

/// Raw engine output: values plus the engine status code (negative on failure).
#[derive(Debug, Clone, PartialEq)]
pub struct RawReading {
    pub values: Vec<f64>,
    pub status: i32,
}

/// Raw house output from the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHouses {
    pub cusps: Vec<f64>,
    pub angles: Vec<f64>,
    pub status: i32,
}

pub trait Ephemeris {
    fn set_ephe_path(&mut self, path: &str);

    fn set_topo(&mut self, lon: f64, lat: f64, alt: f64);

    /// Select the engine's sidereal mode (`SE_SIDM_*`).
    fn set_sid_mode(&mut self, mode: i32);

    /// Gregorian calendar date to a continuous day count.
    fn julday(&self, year: i32, month: u32, day: u32, hour: f64) -> f64;

    fn get_ayanamsa_ut(&self, jd: f64) -> f64;

    fn houses(&self, jd: f64, lat: f64, lon: f64, hsys: char) -> RawHouses;

    /// Position and speed: 6 values in the axis selected by `flags`.
    fn calc_ut(&self, jd: f64, body: i32, flags: CalcFlags) -> RawReading;

    /// Phenomena: phase angle, illuminated fraction, elongation, apparent
    /// diameter, apparent magnitude, followed by whatever else the engine adds.
    fn pheno_ut(&self, jd: f64, body: i32, flags: CalcFlags) -> RawReading;
}

impl<E: Ephemeris + ?Sized> Ephemeris for Box<E> {
    fn set_ephe_path(&mut self, path: &str) {
        (**self).set_ephe_path(path)
    }

    fn set_topo(&mut self, lon: f64, lat: f64, alt: f64) {
        (**self).set_topo(lon, lat, alt)
    }

    fn set_sid_mode(&mut self, mode: i32) {
        (**self).set_sid_mode(mode)
    }

    fn julday(&self, year: i32, month: u32, day: u32, hour: f64) -> f64 {
        (**self).julday(year, month, day, hour)
    }

    fn get_ayanamsa_ut(&self, jd: f64) -> f64 {
        (**self).get_ayanamsa_ut(jd)
    }

    fn houses(&self, jd: f64, lat: f64, lon: f64, hsys: char) -> RawHouses {
        (**self).houses(jd, lat, lon, hsys)
    }

    fn calc_ut(&self, jd: f64, body: i32, flags: CalcFlags) -> RawReading {
        (**self).calc_ut(jd, body, flags)
    }

    fn pheno_ut(&self, jd: f64, body: i32, flags: CalcFlags) -> RawReading {
        (**self).pheno_ut(jd, body, flags)
    }
}
