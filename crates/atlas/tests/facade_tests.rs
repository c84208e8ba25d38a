use atlas::ephemeris::types::{FLG_BARYCTR, FLG_HELCTR, FLG_SIDEREAL, FLG_TOPOCTR};
use atlas::ephemeris::{
    Axis, Ayanamsa, EphemerisFacade, ReferenceFrame, ScriptedEphemeris, SiderealPolicy, Zodiac,
};
use atlas::AtlasError;
use proptest::prelude::*;

fn facade() -> EphemerisFacade<ScriptedEphemeris> {
    EphemerisFacade::new(ScriptedEphemeris::new(), "/opt/ephe")
}

#[test]
fn test_new_pushes_search_path() {
    let facade = facade();
    assert_eq!(facade.search_path(), "/opt/ephe");
    assert_eq!(facade.engine().ephe_path.as_deref(), Some("/opt/ephe"));
}

#[test]
fn test_topography_is_sent_lon_first() {
    let mut facade = facade();
    facade.set_topography(48.85, 2.35, 35.0);
    assert_eq!(facade.engine().topo_calls, vec![(2.35, 48.85, 35.0)]);
}

#[test]
fn test_frame_toggles_replace_each_other() {
    let mut facade = facade();
    facade.use_topocentric().use_heliocentric();
    assert_eq!(facade.flags().frame, ReferenceFrame::Heliocentric);
    assert_eq!(facade.flags().bits() & FLG_TOPOCTR, 0);

    facade.use_geocentric();
    assert_eq!(facade.flags().bits() & (FLG_TOPOCTR | FLG_HELCTR | FLG_BARYCTR), 0);
}

#[test]
fn test_axis_and_frame_are_independent() {
    let mut facade = facade();
    facade.use_equatorial().use_barycentric().use_ecliptic();
    assert_eq!(facade.flags().axis, Axis::Ecliptic);
    assert_eq!(facade.flags().frame, ReferenceFrame::Barycentric);
}

#[test]
fn test_sidereal_sets_engine_mode() {
    let mut facade = facade();
    facade.use_sidereal(Some('L')).unwrap();
    assert_eq!(facade.flags().zodiac, Zodiac::Sidereal(Some(Ayanamsa::Lahiri)));
    assert_eq!(facade.engine().sid_modes, vec![1]);
    assert_ne!(facade.flags().bits() & FLG_SIDEREAL, 0);

    facade.use_tropical();
    assert_eq!(facade.flags().bits() & FLG_SIDEREAL, 0);
}

#[test]
fn test_strict_policy_rejects_unknown_code() {
    let mut facade = facade();
    let err = facade.use_sidereal(Some('Q')).unwrap_err();
    assert!(matches!(err, AtlasError::Configuration { kind: "ayanamsa code", .. }));
    assert_eq!(facade.flags().zodiac, Zodiac::Tropical);
    assert!(facade.engine().sid_modes.is_empty());
}

#[test]
fn test_lenient_policy_falls_back_to_engine_default() {
    let mut facade = facade().with_policy(SiderealPolicy::Lenient);
    facade.use_sidereal(None).unwrap();
    assert_eq!(facade.flags().zodiac, Zodiac::Sidereal(None));
    assert!(facade.engine().sid_modes.is_empty());
}

#[test]
fn test_query_position_passes_status_through() {
    let engine = ScriptedEphemeris::new().with_position(4, &[1.0; 6], -2);
    let facade = EphemerisFacade::new(engine, "");
    let reading = facade.query_position(4, 2451545.0);
    assert_eq!(reading.status, -2);
}

#[test]
fn test_query_phenomenon_keeps_five_values() {
    let mut values = vec![0.1, 0.2, 0.3, 0.4, 0.5];
    values.extend(std::iter::repeat(9.0).take(15));
    let engine = ScriptedEphemeris::new().with_phenomenon(1, &values);
    let facade = EphemerisFacade::new(engine, "");
    assert_eq!(
        facade.query_phenomenon(1, 0.0).unwrap(),
        vec![0.1, 0.2, 0.3, 0.4, 0.5]
    );
}

#[test]
fn test_query_phenomenon_engine_error() {
    let engine = ScriptedEphemeris::new().with_phenomenon_status(1, -1);
    let facade = EphemerisFacade::new(engine, "");
    assert_eq!(
        facade.query_phenomenon(1, 10.0),
        Err(AtlasError::Engine {
            code: -1,
            operation: "pheno_ut",
            body: Some(1),
            time_index: 10.0
        })
    );
}

#[test]
fn test_query_houses_shapes() {
    let cusps: Vec<f64> = (0..12).map(|i| i as f64 * 30.0).collect();
    let engine = ScriptedEphemeris::new().with_houses(&cusps, &[15.0, 280.0, 281.0, 190.0, 0.0], 0);
    let facade = EphemerisFacade::new(engine, "");
    let houses = facade.query_houses(2451545.0, 51.0, 0.0, 'P').unwrap();
    assert_eq!(houses.cusps[11], 330.0);
    assert_eq!(houses.angles.ascendant, 15.0);
    assert_eq!(houses.angles.midheaven, 280.0);
    assert_eq!(houses.angles.descendant(), 195.0);

    let short = ScriptedEphemeris::new().with_houses(&cusps[..10], &[0.0; 4], 0);
    let facade = EphemerisFacade::new(short, "");
    assert!(matches!(
        facade.query_houses(0.0, 0.0, 0.0, 'P'),
        Err(AtlasError::Shape { expected: 12, found: 10, .. })
    ));
}

#[test]
fn test_query_houses_negative_status() {
    let engine = ScriptedEphemeris::new().with_houses(&[0.0; 12], &[0.0; 10], -1);
    let facade = EphemerisFacade::new(engine, "");
    assert!(matches!(
        facade.query_houses(0.0, 89.9, 0.0, 'P'),
        Err(AtlasError::Engine { operation: "houses", body: None, .. })
    ));
}

#[derive(Debug, Clone, Copy)]
enum Toggle {
    Geo,
    Topo,
    Helio,
    Bary,
    Ecliptic,
    Equatorial,
}

fn toggle() -> impl Strategy<Value = Toggle> {
    prop_oneof![
        Just(Toggle::Geo),
        Just(Toggle::Topo),
        Just(Toggle::Helio),
        Just(Toggle::Bary),
        Just(Toggle::Ecliptic),
        Just(Toggle::Equatorial),
    ]
}

proptest! {
    #[test]
    fn exactly_one_reference_frame_after_any_toggles(toggles in prop::collection::vec(toggle(), 0..32)) {
        let mut facade = facade();
        let mut last_frame = ReferenceFrame::Geocentric;
        for t in &toggles {
            match t {
                Toggle::Geo => { facade.use_geocentric(); last_frame = ReferenceFrame::Geocentric; }
                Toggle::Topo => { facade.use_topocentric(); last_frame = ReferenceFrame::Topocentric; }
                Toggle::Helio => { facade.use_heliocentric(); last_frame = ReferenceFrame::Heliocentric; }
                Toggle::Bary => { facade.use_barycentric(); last_frame = ReferenceFrame::Barycentric; }
                Toggle::Ecliptic => { facade.use_ecliptic(); }
                Toggle::Equatorial => { facade.use_equatorial(); }
            }
        }
        let frame_bits = facade.flags().bits() & (FLG_TOPOCTR | FLG_HELCTR | FLG_BARYCTR);
        prop_assert!(frame_bits.count_ones() <= 1);
        prop_assert_eq!(facade.flags().frame, last_frame);
        prop_assert_eq!(frame_bits, last_frame.bits());
    }
}
