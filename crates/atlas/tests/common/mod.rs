#![allow(dead_code)]

use atlas::ephemeris::{EphemerisFacade, ScriptedEphemeris};
use atlas::{BodyEntry, BodyRegistry, Location, Observatory, Wizard};
use chrono::{DateTime, TimeZone, Utc};

pub const SUN: i32 = 0;
pub const MOON: i32 = 1;

/// 2000-01-01 12:00 UTC, time index 2451545.0
pub fn j2000() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap()
}

pub fn greenwich() -> Location {
    Location::new(51.4769, 0.0, 46.0)
}

pub fn observatory(engine: ScriptedEphemeris) -> Observatory<ScriptedEphemeris> {
    Observatory::new(EphemerisFacade::new(engine, ""))
}

pub fn sun_only_registry() -> BodyRegistry {
    BodyRegistry::from_entries(vec![(
        "sun".to_string(),
        BodyEntry {
            id: SUN,
            glyph: "☉".to_string(),
            name: "Sun".to_string(),
        },
    )])
    .unwrap()
}

pub fn wizard(engine: ScriptedEphemeris) -> Wizard<ScriptedEphemeris> {
    Wizard::new(observatory(engine), BodyRegistry::defaults())
}
