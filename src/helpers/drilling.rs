//! Artificial drilling stiffness for flat triangles
//!
//! Membrane triangles carry no stiffness against in-plane rotation. This
//! helper couples the three Rz DOFs through a small spring network so that
//! shells built from triangles remain non-singular.

use super::cst::{planar_jacobian, shape, CENTROID};
use super::{ElementHelper, LocalDof};
use crate::elements::{Dof, ElementContext};
use crate::error::FEAResult;
use crate::math::gauss::IntegrationDomain;
use crate::math::Mat;
use crate::results::{Displacement, StressTensor};

/// Drilling stiffness as a fraction of the membrane rigidity E·t·A
pub const DRILLING_STIFFNESS_FACTOR: f64 = 1e-3;

#[derive(Debug, Clone, Copy, Default)]
pub struct DrillingDofHelper;

impl ElementHelper for DrillingDofHelper {
    fn name(&self) -> &'static str {
        "drilling DOF helper"
    }

    fn domain(&self) -> IntegrationDomain {
        IntegrationDomain::Triangle
    }

    fn dof_order(&self) -> Vec<LocalDof> {
        (0..3).map(|node| LocalDof::new(node, Dof::Rz)).collect()
    }

    fn n_matrix_at(&self, _ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        Ok(Mat::from_row_slice(1, 3, &shape(iso)?))
    }

    fn j_matrix_at(&self, ctx: &ElementContext, _iso: &[f64]) -> FEAResult<Mat> {
        Ok(planar_jacobian(ctx))
    }

    fn n_max_order(&self, _ctx: &ElementContext) -> [usize; 3] {
        [1, 1, 0]
    }

    /// Spring network with zero energy under equal rotation of all nodes
    fn local_stiffness(&self, ctx: &ElementContext) -> FEAResult<Mat> {
        let triangle = ctx.triangle()?;
        let e = triangle.material.material_at(&CENTROID).e;
        let area = self.det_j_at(ctx, &CENTROID)? / 2.0;
        let k = DRILLING_STIFFNESS_FACTOR * e * triangle.thickness * area;

        #[rustfmt::skip]
        let pattern = Mat::from_row_slice(3, 3, &[
             1.0, -0.5, -0.5,
            -0.5,  1.0, -0.5,
            -0.5, -0.5,  1.0,
        ]);
        Ok(pattern * k)
    }

    fn local_internal_force_at(
        &self,
        _ctx: &ElementContext,
        _local: &[Displacement],
        _iso: &[f64],
    ) -> FEAResult<Vec<(Dof, f64)>> {
        Ok(vec![])
    }

    fn local_stress_at(
        &self,
        _ctx: &ElementContext,
        _local: &[Displacement],
        _iso: &[f64],
    ) -> FEAResult<StressTensor> {
        Ok(StressTensor::default())
    }

    fn local_displacement_at(
        &self,
        ctx: &ElementContext,
        local: &[Displacement],
        iso: &[f64],
    ) -> FEAResult<Vec<(Dof, f64)>> {
        let rz = self.n_matrix_at(ctx, iso)? * self.gather(local);
        Ok(vec![(Dof::Rz, rz[0])])
    }
}
