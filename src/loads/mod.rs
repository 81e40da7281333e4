//! Load cases, nodal loads and element loads

mod concentrated;
mod load_case;
mod nodal;
mod uniform;

use serde::{Deserialize, Serialize};

pub use concentrated::ConcentratedLoad;
pub use load_case::{LoadCase, LoadType};
pub use nodal::{NodalLoad, Settlement};
pub use uniform::{uniform_beam_end_loads, UniformLoad};

use crate::elements::ElementContext;
use crate::error::FEAResult;
use crate::math::{Vec, Vec3};
use crate::results::{Displacement, Force};

/// Direction of an element load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadDirection {
    X,
    Y,
    Z,
}

impl LoadDirection {
    /// Unit vector along this direction
    pub fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::x(),
            Self::Y => Vec3::y(),
            Self::Z => Vec3::z(),
        }
    }
}

/// Coordinate system an element load is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoordinationSystem {
    #[default]
    Global,
    Local,
}

/// A load applied on an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementLoad {
    Uniform(UniformLoad),
    Concentrated(ConcentratedLoad),
}

impl ElementLoad {
    /// Load case of the load
    pub fn case(&self) -> &LoadCase {
        match self {
            Self::Uniform(load) => &load.case,
            Self::Concentrated(load) => &load.case,
        }
    }

    /// Equivalent nodal loads in the element's local frame, six per node
    pub fn equivalent_nodal_loads(&self, ctx: &ElementContext) -> FEAResult<Vec> {
        match self {
            Self::Uniform(load) => load.equivalent_nodal_loads(ctx),
            Self::Concentrated(load) => load.equivalent_nodal_loads(ctx),
        }
    }

    /// Frame end loads with both ends fixed, before hinge condensation
    pub(crate) fn fixed_end_loads(&self, ctx: &ElementContext) -> FEAResult<Vec> {
        match self {
            Self::Uniform(load) => load.fixed_end_loads(ctx),
            Self::Concentrated(load) => load.fixed_end_loads(ctx),
        }
    }

    /// Internal force of the fixed-fixed member carrying only this load
    pub(crate) fn internal_force_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Force> {
        match self {
            Self::Uniform(load) => load.internal_force_at(ctx, iso),
            Self::Concentrated(load) => load.internal_force_at(ctx, iso),
        }
    }

    /// Displacement of the fixed-fixed member carrying only this load
    pub(crate) fn displacement_at(
        &self,
        ctx: &ElementContext,
        iso: &[f64],
    ) -> FEAResult<Displacement> {
        match self {
            Self::Uniform(load) => load.displacement_at(ctx, iso),
            Self::Concentrated(load) => load.displacement_at(ctx, iso),
        }
    }
}

impl From<UniformLoad> for ElementLoad {
    fn from(load: UniformLoad) -> Self {
        Self::Uniform(load)
    }
}

impl From<ConcentratedLoad> for ElementLoad {
    fn from(load: ConcentratedLoad) -> Self {
        Self::Concentrated(load)
    }
}

/// Vector of a load in the element's local frame
pub(crate) fn to_local(ctx: &ElementContext, v: Vec3, system: CoordinationSystem) -> Vec3 {
    match system {
        CoordinationSystem::Global => ctx.lambda * v,
        CoordinationSystem::Local => v,
    }
}

/// Distance from the start node of a line element for an iso coordinate
pub(crate) fn iso_to_position(iso: &[f64], length: f64) -> FEAResult<f64> {
    let xi = crate::helpers::xi(iso)?;
    Ok((xi + 1.0) * length / 2.0)
}
