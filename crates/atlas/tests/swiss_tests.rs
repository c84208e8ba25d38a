//! Runs against the native engine. Needs `--features swisseph`; without files
//! under `SWISS_EPHEMERIS_PATH` the engine falls back to its analytic model.
#![cfg(feature = "swisseph")]

mod common;

use std::sync::Mutex;

use atlas::ephemeris::{EphemerisFacade, ReferenceFrame, SwissEph};
use atlas::{
    Axis, BodyRegistry, ConjureRequest, Observatory, Property, Wizard, ZodiacKind, ZodiacSign,
};
use common::{greenwich, j2000};

// One engine handle per process
static ENGINE: Mutex<()> = Mutex::new(());

fn wizard() -> Wizard<SwissEph> {
    let engine = SwissEph::acquire("").unwrap();
    let facade = EphemerisFacade::new(engine, "");
    Wizard::new(Observatory::new(facade), BodyRegistry::defaults())
}

#[test]
#[ignore = "links the native Swiss Ephemeris"]
fn test_sun_at_j2000_is_in_capricorn() {
    let _guard = ENGINE.lock().unwrap_or_else(|e| e.into_inner());
    let mut wizard = wizard();

    let request = ConjureRequest::new(j2000(), greenwich(), "sun")
        .with_properties(&[Property::Position])
        .with_frames(&[Axis::Ecliptic]);
    let state = wizard.conjure(&request).unwrap();

    // Apparent solar longitude at J2000 is about 280.37 degrees
    assert!((state.lon().unwrap() - 280.37).abs() < 0.05);
    assert_eq!(state.sign().unwrap(), ZodiacSign::Capricorn);
    assert!(!state.retrograde().unwrap());
}

#[test]
#[ignore = "links the native Swiss Ephemeris"]
fn test_topocentric_sidereal_moon_with_phenomena() {
    let _guard = ENGINE.lock().unwrap_or_else(|e| e.into_inner());
    let mut wizard = wizard();

    let request = ConjureRequest::new(j2000(), greenwich(), "moon")
        .with_zodiac(ZodiacKind::Sidereal, Some("lahiri"))
        .with_origin(ReferenceFrame::Topocentric);
    let state = wizard.conjure(&request).unwrap();

    let lon = state.lon().unwrap();
    assert!((0.0..360.0).contains(&lon));
    let pheno = state.phenomenon().unwrap();
    assert!((0.0..=1.0).contains(&pheno.illuminated_fraction));
    assert!(!state.phase().unwrap().name.is_empty());
    // Lahiri ayanamsa at J2000 is close to 23.85 degrees
    assert!((wizard.observatory().ayanamsa().unwrap() - 23.85).abs() < 0.1);
}

#[test]
#[ignore = "links the native Swiss Ephemeris"]
fn test_second_handle_is_refused() {
    let _guard = ENGINE.lock().unwrap_or_else(|e| e.into_inner());
    let _first = SwissEph::acquire("").unwrap();
    assert!(SwissEph::acquire("").is_err());
}
