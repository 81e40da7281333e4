//! Node - a point in 3D space carrying six degrees of freedom

use serde::{Deserialize, Serialize};

use super::Constraints;
use crate::loads::{NodalLoad, Settlement};
use crate::math::Vec3;

/// A 3D node in the finite element model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
    /// Constraint state of the six DOFs
    pub constraints: Constraints,

    /// Label assigned when added to a model
    #[serde(skip)]
    pub(crate) label: String,

    /// Index assigned during solve
    #[serde(skip)]
    pub(crate) index: Option<usize>,

    /// Loads applied directly to this node
    #[serde(default)]
    pub(crate) loads: Vec<NodalLoad>,

    /// Prescribed settlements of the constrained DOFs
    #[serde(default)]
    pub(crate) settlements: Vec<Settlement>,

    /// Elements connected to this node, rebuilt after each solve
    #[serde(skip)]
    pub(crate) connected_elements: Vec<usize>,
}

impl Node {
    /// Create a new unconstrained node at the given coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            constraints: Constraints::released(),
            label: String::new(),
            index: None,
            loads: Vec::new(),
            settlements: Vec::new(),
            connected_elements: Vec::new(),
        }
    }

    /// Set the constraints
    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Label of the node in its model
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Index assigned by the last solve
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Get the coordinates as a vector
    pub fn location(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        (other.location() - self.location()).norm()
    }

    /// Loads applied to this node
    pub fn loads(&self) -> &[NodalLoad] {
        &self.loads
    }

    /// Settlements prescribed on this node
    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    /// Indices of the elements connected to this node
    ///
    /// Empty until the model has been solved.
    pub fn connected_elements(&self) -> &[usize] {
        &self.connected_elements
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}
