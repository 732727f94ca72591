//! Runtime-tweakable parameters of the simulation.

use crate::physics::{collision::ContactMode, ResolutionMode};

/// What kind of shape [`Sandbox::spawn_shape`][crate::Sandbox::spawn_shape] creates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub enum SpawnShape {
    /// A random convex polygon.
    #[default]
    Polygon,
    /// A circle of random radius.
    Circle,
}

/// Parameters shared by every body in a [`World`][crate::World].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct WorldConfig {
    /// Downward acceleration in metres per second squared.
    pub gravity: f64,
    /// Linear and angular drag coefficient.
    pub drag: f64,
    /// Fraction of penetration removed per collision when resolving with impulses.
    pub positional_correction: f64,
    pub resolution: ResolutionMode,
    pub contact_mode: ContactMode,
    pub spawn_shape: SpawnShape,
    /// Whether contact points are passed on to the debug drawer.
    pub show_contact_points: bool,
    /// Multiplier from pointer movement to the force applied when letting go of a body.
    pub release_force_scale: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            gravity: 9.8,
            drag: 0.7,
            positional_correction: 0.2,
            resolution: ResolutionMode::Impulse,
            contact_mode: ContactMode::Precise,
            spawn_shape: SpawnShape::Polygon,
            show_contact_points: true,
            release_force_scale: 5000.0,
        }
    }
}

/// A value given to [`WorldConfig::set`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Float(f64),
    Text(String),
}

impl ConfigValue {
    fn kind(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Float(_) => "float",
            ConfigValue::Text(_) => "text",
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<f64> for ConfigValue {
    fn from(x: f64) -> Self {
        ConfigValue::Float(x)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Text(s.to_string())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("No option named {0:?}")]
    UnknownOption(String),
    #[error("Option {name} expects {expected}, got a {got} value")]
    WrongType {
        name: &'static str,
        expected: &'static str,
        got: &'static str,
    },
    #[error("{value:?} is not a valid value for option {name}")]
    InvalidValue { name: &'static str, value: String },
    #[error("Option {name} is out of range: {value}")]
    OutOfRange { name: &'static str, value: f64 },
    #[cfg(feature = "serde-types")]
    #[error("Failed to parse config")]
    Ron(#[from] ron::Error),
}

type Setter = fn(&mut WorldConfig, ConfigValue) -> Result<(), ConfigError>;

/// Every option that can be changed with [`WorldConfig::set`], in the order they're documented.
pub const OPTION_NAMES: [&str; 8] = [
    "shape_spawn_type",
    "impulse_resolution",
    "calculate_contact_points",
    "show_contact_points",
    "gravity",
    "drag",
    "positional_correction",
    "release_force_scale",
];

const SETTERS: [(&str, Setter); 8] = [
    ("shape_spawn_type", set_spawn_shape),
    ("impulse_resolution", set_resolution),
    ("calculate_contact_points", set_contact_mode),
    ("show_contact_points", set_show_contact_points),
    ("gravity", set_gravity),
    ("drag", set_drag),
    ("positional_correction", set_positional_correction),
    ("release_force_scale", set_release_force_scale),
];

fn set_show_contact_points(c: &mut WorldConfig, v: ConfigValue) -> Result<(), ConfigError> {
    c.show_contact_points = boolean("show_contact_points", v)?;
    Ok(())
}

fn set_gravity(c: &mut WorldConfig, v: ConfigValue) -> Result<(), ConfigError> {
    c.gravity = float("gravity", v)?;
    Ok(())
}

fn set_drag(c: &mut WorldConfig, v: ConfigValue) -> Result<(), ConfigError> {
    c.drag = float("drag", v)?;
    Ok(())
}

fn set_positional_correction(c: &mut WorldConfig, v: ConfigValue) -> Result<(), ConfigError> {
    c.positional_correction = float("positional_correction", v)?;
    Ok(())
}

fn set_release_force_scale(c: &mut WorldConfig, v: ConfigValue) -> Result<(), ConfigError> {
    c.release_force_scale = float("release_force_scale", v)?;
    Ok(())
}

fn set_spawn_shape(c: &mut WorldConfig, v: ConfigValue) -> Result<(), ConfigError> {
    c.spawn_shape = match text("shape_spawn_type", v)?.as_str() {
        "polygon" => SpawnShape::Polygon,
        "circle" => SpawnShape::Circle,
        other => return Err(invalid("shape_spawn_type", other)),
    };
    Ok(())
}

fn set_resolution(c: &mut WorldConfig, v: ConfigValue) -> Result<(), ConfigError> {
    const NAME: &str = "impulse_resolution";
    c.resolution = match v {
        ConfigValue::Bool(true) => ResolutionMode::Impulse,
        ConfigValue::Bool(false) => ResolutionMode::PositionalOnly,
        ConfigValue::Text(s) => match s.as_str() {
            "impulse" => ResolutionMode::Impulse,
            "positional" => ResolutionMode::PositionalOnly,
            other => return Err(invalid(NAME, other)),
        },
        other => return Err(wrong_type(NAME, "bool or text", &other)),
    };
    Ok(())
}

fn set_contact_mode(c: &mut WorldConfig, v: ConfigValue) -> Result<(), ConfigError> {
    const NAME: &str = "calculate_contact_points";
    c.contact_mode = match v {
        ConfigValue::Bool(true) => ContactMode::Precise,
        ConfigValue::Bool(false) => ContactMode::Centroid,
        ConfigValue::Text(s) => match s.as_str() {
            "precise" => ContactMode::Precise,
            "centroid" => ContactMode::Centroid,
            other => return Err(invalid(NAME, other)),
        },
        other => return Err(wrong_type(NAME, "bool or text", &other)),
    };
    Ok(())
}

fn wrong_type(name: &'static str, expected: &'static str, got: &ConfigValue) -> ConfigError {
    ConfigError::WrongType {
        name,
        expected,
        got: got.kind(),
    }
}

fn invalid(name: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    }
}

fn boolean(name: &'static str, v: ConfigValue) -> Result<bool, ConfigError> {
    match v {
        ConfigValue::Bool(b) => Ok(b),
        other => Err(wrong_type(name, "bool", &other)),
    }
}

fn float(name: &'static str, v: ConfigValue) -> Result<f64, ConfigError> {
    match v {
        ConfigValue::Float(x) => Ok(x),
        other => Err(wrong_type(name, "float", &other)),
    }
}

fn text(name: &'static str, v: ConfigValue) -> Result<String, ConfigError> {
    match v {
        ConfigValue::Text(s) => Ok(s),
        other => Err(wrong_type(name, "text", &other)),
    }
}

impl WorldConfig {
    /// Set an option by name.
    ///
    /// The config is validated after the change,
    /// and left as it was if the new value is rejected.
    pub fn set(&mut self, name: &str, value: impl Into<ConfigValue>) -> Result<(), ConfigError> {
        let setter = SETTERS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, s)| *s)
            .ok_or_else(|| ConfigError::UnknownOption(name.to_string()))?;

        let mut changed = self.clone();
        setter(&mut changed, value.into())?;
        changed.validate()?;
        *self = changed;
        log::debug!("config option {} changed", name);
        Ok(())
    }

    /// Check that every numeric parameter makes sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("gravity", self.gravity),
            ("drag", self.drag),
            ("release_force_scale", self.release_force_scale),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::OutOfRange { name, value });
            }
        }
        let c = self.positional_correction;
        if !(c > 0.0 && c <= 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "positional_correction",
                value: c,
            });
        }
        Ok(())
    }

    /// Parse a config written in RON. Missing fields get their default values.
    #[cfg(feature = "serde-types")]
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a RON config from a file.
    #[cfg(feature = "serde-types")]
    pub fn read_from_file(file: std::fs::File) -> Result<Self, ConfigError> {
        use std::io::Read;

        let mut reader = std::io::BufReader::new(file);
        let mut source = String::new();
        reader
            .read_to_string(&mut source)
            .map_err(ron::Error::from)?;
        Self::from_ron(&source)
    }
}
