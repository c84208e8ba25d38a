use atlas::{BodyEntry, BodyRegistry, Location};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV: &str = "ATLAS_CONFIG";
/// Ephemeris data directory used when the config leaves `[ephemeris] path` empty.
pub const EPHEMERIS_PATH_ENV: &str = "SWISS_EPHEMERIS_PATH";

/// Written verbatim when no config file exists yet.
pub const DEFAULT_CONFIG: &str = r#"# Atlas configuration
[ephemeris]
path = ""

[location]
lat = 0.00
lon = 0.00
alt = 4.00

[celestials]
sun     = { glyph = "☉", name = "Sun",     id = 0 }
moon    = { glyph = "☽", name = "Moon",    id = 1 }
mercury = { glyph = "☿", name = "Mercury", id = 2 }
venus   = { glyph = "♀", name = "Venus",   id = 3 }
mars    = { glyph = "♂", name = "Mars",    id = 4 }
jupiter = { glyph = "♃", name = "Jupiter", id = 5 }
saturn  = { glyph = "♄", name = "Saturn",  id = 6 }
uranus  = { glyph = "♅", name = "Uranus",  id = 7 }
neptune = { glyph = "♆", name = "Neptune", id = 8 }
pluto   = { glyph = "⯓", name = "Pluto",   id = 9 }
lilith  = { glyph = "⚸", name = "Lilith",  id = 12 }
chiron  = { glyph = "⚷", name = "Chiron",  id = 15 }
pholus  = { glyph = "⯛", name = "Pholus",  id = 16 }
ceres   = { glyph = "⚳", name = "Ceres",   id = 17 }
pallas  = { glyph = "⚴", name = "Pallas",  id = 18 }
juno    = { glyph = "⚵", name = "Juno",    id = 19 }
vesta   = { glyph = "⚶", name = "Vesta",   id = 20 }
"#;

#[derive(Debug, Clone, Default, Deserialize)]
struct EphemerisToml {
    #[serde(default)]
    path: String,
}

#[derive(Debug, Clone, Deserialize)]
struct LocationToml {
    #[serde(default, alias = "latitude")]
    lat: f64,
    #[serde(default, alias = "longitude")]
    lon: f64,
    #[serde(default = "default_alt", alias = "altitude")]
    alt: f64,
}

impl Default for LocationToml {
    fn default() -> Self {
        Self {
            lat: 0.0,
            lon: 0.0,
            alt: default_alt(),
        }
    }
}

fn default_alt() -> f64 {
    4.0
}

#[derive(Debug, Clone, Deserialize)]
struct BodyToml {
    glyph: String,
    name: String,
    id: i32,
}

#[derive(Debug, Clone, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    ephemeris: EphemerisToml,
    #[serde(default)]
    location: LocationToml,
    #[serde(default)]
    celestials: Option<BTreeMap<String, BodyToml>>,
}

/// Loaded and validated configuration.
#[derive(Debug, Clone)]
pub struct AtlasConfig {
    pub source: PathBuf,
    ephemeris_path: String,
    location: Location,
    registry: BodyRegistry,
}

impl AtlasConfig {
    pub fn from_toml_str(text: &str, source: &Path) -> anyhow::Result<Self> {
        let root: RootConfigToml = toml::from_str(text)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {e}", source.display()))?;

        let registry = match root.celestials {
            Some(bodies) => BodyRegistry::from_entries(bodies.into_iter().map(|(key, body)| {
                (
                    key,
                    BodyEntry {
                        id: body.id,
                        glyph: body.glyph,
                        name: body.name,
                    },
                )
            }))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Duplicate [celestials] names in {} (names are case-insensitive)",
                    source.display()
                )
            })?,
            None => BodyRegistry::defaults(),
        };

        let LocationToml { lat, lon, alt } = root.location;
        Ok(Self {
            source: source.to_path_buf(),
            ephemeris_path: root.ephemeris.path,
            location: Location::new(lat, lon, alt),
            registry,
        })
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    /// Configured ephemeris search path, or `SWISS_EPHEMERIS_PATH` when the
    /// configured one is empty.
    pub fn ephemeris_path(&self) -> String {
        if self.ephemeris_path.trim().is_empty() {
            env::var(EPHEMERIS_PATH_ENV).unwrap_or_default()
        } else {
            self.ephemeris_path.clone()
        }
    }
}

/// `ATLAS_CONFIG` if set, otherwise `~/.config/atlas/atlas.toml`.
pub fn config_path() -> anyhow::Result<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not resolve home directory (set {CONFIG_ENV})"))?;
    Ok(home.join(".config").join("atlas").join("atlas.toml"))
}

/// Read the config at `path`, writing `DEFAULT_CONFIG` there first if it is missing.
pub fn load_or_init(path: &Path) -> anyhow::Result<AtlasConfig> {
    if !path.exists() {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", dir.display()))?;
        }
        fs::write(path, DEFAULT_CONFIG)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;
        log::warn!(target: "config", "config missing - created default at {}", path.display());
    }

    let text = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let config = AtlasConfig::from_toml_str(&text, path)?;
    log::info!(target: "config", "config loaded from {}", path.display());
    Ok(config)
}
