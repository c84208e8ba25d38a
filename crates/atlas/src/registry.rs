//! Named bodies the wizard can resolve, keyed by lower-case name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One body as configured: engine id, glyph and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyEntry {
    pub id: i32,
    pub glyph: String,
    pub name: String,
}

/// Bodies shipped in a freshly written configuration, in file order.
pub const DEFAULT_BODIES: &[(&str, &str, &str, i32)] = &[
    ("sun", "☉", "Sun", 0),
    ("moon", "☽", "Moon", 1),
    ("mercury", "☿", "Mercury", 2),
    ("venus", "♀", "Venus", 3),
    ("mars", "♂", "Mars", 4),
    ("jupiter", "♃", "Jupiter", 5),
    ("saturn", "♄", "Saturn", 6),
    ("uranus", "♅", "Uranus", 7),
    ("neptune", "♆", "Neptune", 8),
    ("pluto", "⯓", "Pluto", 9),
    ("lilith", "⚸", "Lilith", 12),
    ("chiron", "⚷", "Chiron", 15),
    ("pholus", "⯛", "Pholus", 16),
    ("ceres", "⚳", "Ceres", 17),
    ("pallas", "⚴", "Pallas", 18),
    ("juno", "⚵", "Juno", 19),
    ("vesta", "⚶", "Vesta", 20),
];

/// Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyRegistry {
    bodies: BTreeMap<String, BodyEntry>,
}

impl BodyRegistry {
    /// Build from (name, entry) pairs. Names are lower-cased; `None` if two
    /// names collide after lower-casing.
    pub fn from_entries<I>(entries: I) -> Option<Self>
    where
        I: IntoIterator<Item = (String, BodyEntry)>,
    {
        let mut bodies = BTreeMap::new();
        for (name, entry) in entries {
            if bodies.insert(name.to_lowercase(), entry).is_some() {
                return None;
            }
        }
        Some(Self { bodies })
    }

    pub fn defaults() -> Self {
        let bodies = DEFAULT_BODIES
            .iter()
            .map(|(key, glyph, name, id)| {
                (
                    key.to_string(),
                    BodyEntry {
                        id: *id,
                        glyph: glyph.to_string(),
                        name: name.to_string(),
                    },
                )
            })
            .collect();
        Self { bodies }
    }

    /// Case-insensitive lookup
    pub fn lookup(&self, name: &str) -> Option<&BodyEntry> {
        self.bodies.get(&name.trim().to_lowercase())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bodies.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
