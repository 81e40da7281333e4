//! Four-node quadrilateral shell element
//!
//! The element can be declared in a model but no formulation is coded for
//! it yet: stiffness, mass, damping and loads all report
//! [`FEAError::UnsupportedOperation`](crate::error::FEAError::UnsupportedOperation).

use std::sync::Arc;

use super::{Material, MaterialProvider};

/// A general quadrilateral shell element
#[derive(Debug, Clone)]
pub struct QuadElement {
    pub material: Arc<dyn MaterialProvider>,
    pub thickness: f64,
    /// In-plane action
    pub membrane: bool,
    /// Out-of-plane plate bending
    pub bending: bool,
    /// Drilling stabilisation
    pub drilling: bool,
}

impl QuadElement {
    pub fn new(material: Arc<dyn MaterialProvider>, thickness: f64) -> Self {
        Self {
            material,
            thickness,
            membrane: true,
            bending: true,
            drilling: true,
        }
    }

    pub fn uniform(material: Material, thickness: f64) -> Self {
        Self::new(Arc::new(material), thickness)
    }
}
