//! Node loads and support settlements

use serde::{Deserialize, Serialize};

use super::LoadCase;
use crate::results::{Displacement, Force};

/// A load applied directly to a node, in global coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodalLoad {
    /// Forces and moments
    pub force: Force,
    /// Load case this load belongs to
    pub case: LoadCase,
}

impl NodalLoad {
    /// Create a new node load with all components
    pub fn new(force: Force, case: LoadCase) -> Self {
        Self { force, case }
    }

    /// Create a force-only node load
    pub fn force(fx: f64, fy: f64, fz: f64, case: LoadCase) -> Self {
        Self::new(Force::from_array([fx, fy, fz, 0.0, 0.0, 0.0]), case)
    }

    /// Create a moment-only node load
    pub fn moment(mx: f64, my: f64, mz: f64, case: LoadCase) -> Self {
        Self::new(Force::from_array([0.0, 0.0, 0.0, mx, my, mz]), case)
    }

    /// Create a load in Y direction
    pub fn fy(value: f64, case: LoadCase) -> Self {
        Self::force(0.0, value, 0.0, case)
    }
}

/// A prescribed displacement of the constrained DOFs of a node
///
/// Only the components of fixed DOFs are used; components of free DOFs are
/// ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub displacement: Displacement,
    pub case: LoadCase,
}

impl Settlement {
    pub fn new(displacement: Displacement, case: LoadCase) -> Self {
        Self { displacement, case }
    }
}
