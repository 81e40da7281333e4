//! Flat three-node shell element

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Material, MaterialProvider};

/// Formulations carried by a triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriangleBehaviour {
    /// In-plane (membrane) action only
    #[default]
    Membrane,
    /// Membrane with drilling stabilisation of the in-plane rotation
    MembraneWithDrilling,
}

#[derive(Debug, Clone)]
pub struct TriangleElement {
    pub material: Arc<dyn MaterialProvider>,
    pub thickness: f64,
    pub behaviour: TriangleBehaviour,
}

impl TriangleElement {
    pub fn new(material: Arc<dyn MaterialProvider>, thickness: f64) -> Self {
        Self {
            material,
            thickness,
            behaviour: TriangleBehaviour::Membrane,
        }
    }

    pub fn uniform(material: Material, thickness: f64) -> Self {
        Self::new(Arc::new(material), thickness)
    }

    pub fn with_behaviour(mut self, behaviour: TriangleBehaviour) -> Self {
        self.behaviour = behaviour;
        self
    }
}
