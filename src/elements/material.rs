//! Material properties

use std::fmt;

use serde::{Deserialize, Serialize};

/// Material properties for structural analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus) in Pa
    pub e: f64,
    /// Shear modulus in Pa
    pub g: f64,
    /// Poisson's ratio
    pub nu: f64,
    /// Density in kg/m³
    pub rho: f64,
    /// Viscous damping coefficient per unit volume
    #[serde(default)]
    pub mu: f64,
}

impl Material {
    /// Create a new material with given properties
    pub fn new(e: f64, g: f64, nu: f64, rho: f64) -> Self {
        Self {
            e,
            g,
            nu,
            rho,
            mu: 0.0,
        }
    }

    /// Create a new isotropic material from E and nu
    /// G is calculated as E / (2 * (1 + nu))
    pub fn isotropic(e: f64, nu: f64, rho: f64) -> Self {
        let g = e / (2.0 * (1.0 + nu));
        Self::new(e, g, nu, rho)
    }

    /// Set the damping coefficient
    pub fn with_damping(mut self, mu: f64) -> Self {
        self.mu = mu;
        self
    }

    /// Create a standard steel material
    pub fn steel() -> Self {
        Self::new(200e9, 77e9, 0.3, 7850.0)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}

/// Source of material properties at a point of an element
///
/// Queried at every integration point with the element's isoparametric
/// coordinates, so spatially varying materials are honoured.
pub trait MaterialProvider: fmt::Debug + Send + Sync {
    fn material_at(&self, iso: &[f64]) -> Material;
}

impl MaterialProvider for Material {
    fn material_at(&self, _iso: &[f64]) -> Material {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isotropic_material() {
        let mat = Material::isotropic(200e9, 0.3, 7850.0);
        let expected_g = 200e9 / (2.0 * 1.3);
        assert!((mat.g - expected_g).abs() < 1.0);
    }

    #[test]
    fn test_uniform_provider() {
        let steel = Material::steel();
        assert_eq!(steel.material_at(&[0.3]), steel);
    }
}
