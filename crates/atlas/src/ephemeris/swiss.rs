use std::env;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use libswisseph_sys::raw::{swe_pheno_ut, swe_set_sid_mode, swe_set_topo};
use log::{info, warn};
use swisseph::swe::{calc_ut, get_ayanamsa_ut, houses_ex, julday, set_ephe_path};
use swisseph::{AscMc, Cusp};

use crate::ephemeris::oracle::{Ephemeris, RawHouses, RawReading};
use crate::ephemeris::types::CalcFlags;
use crate::error::AtlasError;

// SE_GREG_CAL
const GREGORIAN: u32 = 1;
// swe_pheno_ut writes up to 20 attributes
const PHENO_ATTRIBUTES: usize = 20;
// AS_MAXCH
const ERROR_BUFFER: usize = 256;

/// The engine keeps its settings in process-wide C state, so only one handle
/// may be alive at a time.
static ENGINE_CLAIMED: AtomicBool = AtomicBool::new(false);

/// Native Swiss Ephemeris engine
#[derive(Debug)]
pub struct SwissEph {
    ephemeris_path: PathBuf,
}

impl SwissEph {
    /// Claim the engine. An empty `path` falls back to `SWISS_EPHEMERIS_PATH`.
    pub fn acquire(path: &str) -> Result<Self, AtlasError> {
        if ENGINE_CLAIMED.swap(true, Ordering::AcqRel) {
            return Err(AtlasError::Precondition {
                operation: "acquire Swiss Ephemeris",
                missing: "exclusive engine handle",
            });
        }

        let ephemeris_path = if path.is_empty() {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_default()
        } else {
            PathBuf::from(path)
        };
        if !ephemeris_path.as_os_str().is_empty() && !ephemeris_path.exists() {
            warn!(
                target: "ephemeris",
                "ephemeris path {} does not exist; the engine will fall back to its built-in model",
                ephemeris_path.display()
            );
        }

        info!(target: "ephemeris", "claimed Swiss Ephemeris (path={})", ephemeris_path.display());
        Ok(Self { ephemeris_path })
    }

    pub fn ephemeris_path(&self) -> &PathBuf {
        &self.ephemeris_path
    }
}

impl Drop for SwissEph {
    fn drop(&mut self) {
        ENGINE_CLAIMED.store(false, Ordering::Release);
    }
}

impl Ephemeris for SwissEph {
    fn set_ephe_path(&mut self, path: &str) {
        if !path.is_empty() {
            self.ephemeris_path = PathBuf::from(path);
        }
        set_ephe_path(&self.ephemeris_path.to_string_lossy());
    }

    fn set_topo(&mut self, lon: f64, lat: f64, alt: f64) {
        // SAFETY: plain values; the engine copies them into its global state.
        unsafe { swe_set_topo(lon, lat, alt) }
    }

    fn set_sid_mode(&mut self, mode: i32) {
        // SAFETY: as above. t0/ayan_t0 are only read for user-defined modes.
        unsafe { swe_set_sid_mode(mode, 0.0, 0.0) }
    }

    fn julday(&self, year: i32, month: u32, day: u32, hour: f64) -> f64 {
        julday(year, month as i32, day as i32, hour, GREGORIAN)
    }

    fn get_ayanamsa_ut(&self, jd: f64) -> f64 {
        get_ayanamsa_ut(jd)
    }

    fn houses(&self, jd: f64, lat: f64, lon: f64, hsys: char) -> RawHouses {
        let (c, a) = houses_ex(jd, 0, lat, lon, hsys as i32);
        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);
        RawHouses {
            cusps: vec![
                cusps.first, cusps.second, cusps.third, cusps.fourth,
                cusps.fifth, cusps.sixth, cusps.seventh, cusps.eighth,
                cusps.ninth, cusps.tenth, cusps.eleventh, cusps.twelfth,
            ],
            angles: vec![ascmc.ascendant, ascmc.mc, ascmc.armc, ascmc.vertex],
            status: 0,
        }
    }

    fn calc_ut(&self, jd: f64, body: i32, flags: CalcFlags) -> RawReading {
        match calc_ut(jd, body as u32, flags.bits() as u32) {
            Ok(result) => RawReading {
                values: result.out.iter().copied().collect(),
                status: 0,
            },
            Err(e) => {
                warn!(target: "ephemeris", "calc_ut failed for body {}: {}", body, e);
                RawReading {
                    values: Vec::new(),
                    status: -1,
                }
            }
        }
    }

    fn pheno_ut(&self, jd: f64, body: i32, flags: CalcFlags) -> RawReading {
        let mut attr = [0.0_f64; PHENO_ATTRIBUTES];
        let mut serr = [0 as c_char; ERROR_BUFFER];
        // SAFETY: both buffers are sized to what the engine may write.
        let status = unsafe {
            swe_pheno_ut(
                jd,
                body,
                flags.bits(),
                attr.as_mut_ptr(),
                serr.as_mut_ptr(),
            )
        };
        if status < 0 {
            // SAFETY: the engine NUL-terminates its message inside `serr`.
            let message = unsafe { CStr::from_ptr(serr.as_ptr()) }.to_string_lossy();
            warn!(target: "ephemeris", "pheno_ut failed for body {}: {}", body, message);
        }
        RawReading {
            values: attr.to_vec(),
            status,
        }
    }
}
