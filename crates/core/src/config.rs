use crate::hex::Orientation;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Configuration that defines a simulation. Two simulations run with the same
/// config will always be identical.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SimulationConfig {
    /// RNG seed to use for all randomized processes during the simulation.
    ///
    /// When deserializing a config, this field supports a few options:
    /// - If the value is an integer that fits into `u64`, use that value
    /// - If it's a string that can be parsed into a `u64`, use the parsed
    ///   value
    /// - If it's any other string, hash it and use the hash value
    /// - If it's anything else (out of range number, float, array, etc.),
    ///   error
    ///
    /// Regardless of how the seed value is input, it will always be serialized
    /// as a number.
    #[serde(deserialize_with = "serde_seed::deserialize")]
    pub seed: u64,

    /// Number of agents to place on the map. Can't be more than the number of
    /// open cells.
    #[validate(range(min = 0, max = 100000))]
    pub agents: usize,

    /// The fraction of cells that get blocked off at the start of the
    /// simulation. Agents can never stand on or path through blocked cells.
    #[validate(range(min = 0.0, max = 0.9))]
    pub obstacle_fraction: f64,

    /// Number of steps to run for
    pub ticks: u32,

    /// Longest path (in steps) an agent will consider. If the agent's goal is
    /// further away than this, it's treated as unreachable. `None` means no
    /// limit.
    pub max_path_cost: Option<usize>,

    /// Shape of the map. Nested tables have to come last for TOML output.
    #[validate]
    pub map: MapConfig,
}

/// Configuration for the shape of a map. Maps are always hexagons centered on
/// the origin.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MapConfig {
    /// Distance from the center of the map to the edge (in cells). A radius
    /// of 0 is a single cell.
    #[validate(range(min = 0, max = 10000))]
    pub radius: u16,

    /// How cells get laid out in the plane. Only matters for output.
    pub orientation: Orientation,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            // Danger! This means the default will vary between calls!
            seed: rand::random(),
            agents: 10,
            obstacle_fraction: 0.2,
            ticks: 100,
            max_path_cost: None,
            map: MapConfig::default(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            radius: 10,
            orientation: Orientation::default(),
        }
    }
}

/// The seed field has some fancy deserialization behavior implemented here. See
/// the `seed` field definition for a description.
mod serde_seed {
    use fnv::FnvHasher;
    use serde::{de::Visitor, Deserializer};
    use std::{
        convert::TryInto,
        fmt,
        hash::{Hash, Hasher},
    };

    macro_rules! impl_visit {
        ($fname:ident, $type:ty) => {
            fn $fname<E>(self, value: $type) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.try_into().map_err(|_| {
                    E::custom(format!("seed out of range: {}", value))
                })
            }
        };
    }

    struct SeedVisitor;

    impl<'de> Visitor<'de> for SeedVisitor {
        type Value = u64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or string")
        }

        impl_visit!(visit_u8, u8);
        impl_visit!(visit_u16, u16);
        impl_visit!(visit_u32, u32);
        impl_visit!(visit_u64, u64);
        impl_visit!(visit_i8, i8);
        impl_visit!(visit_i16, i16);
        impl_visit!(visit_i32, i32);
        impl_visit!(visit_i64, i64);

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            match value.parse::<u64>() {
                Ok(seed) => Ok(seed),
                Err(_) => {
                    let mut hasher = FnvHasher::default();
                    value.hash(&mut hasher);
                    Ok(hasher.finish())
                }
            }
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Multiple input types are accepted, so there's no type hint to give
        deserializer.deserialize_any(SeedVisitor)
    }
}
