//! Load cases

use std::fmt;

use serde::{Deserialize, Serialize};

/// Nature of the loads grouped in a load case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoadType {
    #[default]
    Default,
    Dead,
    Live,
    Snow,
    Wind,
    Quake,
    Crane,
    Other,
}

/// A load case groups related loads under a common name
///
/// Two load cases are the same case when both name and type match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadCase {
    /// Name of the load case
    pub name: String,
    /// Type of the load case
    pub load_type: LoadType,
}

impl LoadCase {
    /// Create a new load case
    pub fn new(name: &str, load_type: LoadType) -> Self {
        Self {
            name: name.to_string(),
            load_type,
        }
    }

    /// Common load case names
    pub fn dead() -> Self {
        Self::new("Dead", LoadType::Dead)
    }

    pub fn live() -> Self {
        Self::new("Live", LoadType::Live)
    }

    pub fn wind() -> Self {
        Self::new("Wind", LoadType::Wind)
    }

    /// Case used for support settlements
    pub fn settlement() -> Self {
        Self::new("Settlement", LoadType::Other)
    }
}

impl Default for LoadCase {
    fn default() -> Self {
        Self::new("Default", LoadType::Default)
    }
}

impl fmt::Display for LoadCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.name, self.load_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_includes_type() {
        assert_eq!(LoadCase::dead(), LoadCase::new("Dead", LoadType::Dead));
        assert_ne!(LoadCase::dead(), LoadCase::new("Dead", LoadType::Live));
        assert_eq!(LoadCase::default().load_type, LoadType::Default);
    }
}
