//! Saint-Venant torsion of two-node frame elements

use super::{xi, ElementHelper, LocalDof};
use crate::elements::{Dof, ElementContext};
use crate::error::FEAResult;
use crate::math::gauss::IntegrationDomain;
use crate::math::Mat;
use crate::results::Displacement;

/// Linear twist along local x, constant torque G·J·θ'
#[derive(Debug, Clone, Copy, Default)]
pub struct ShaftHelper;

impl ElementHelper for ShaftHelper {
    fn name(&self) -> &'static str {
        "shaft helper"
    }

    fn domain(&self) -> IntegrationDomain {
        IntegrationDomain::Line
    }

    fn dof_order(&self) -> Vec<LocalDof> {
        vec![LocalDof::new(0, Dof::Rx), LocalDof::new(1, Dof::Rx)]
    }

    fn b_matrix_at(&self, ctx: &ElementContext, _iso: &[f64]) -> FEAResult<Mat> {
        let l = ctx.length();
        Ok(Mat::from_row_slice(1, 2, &[-1.0 / l, 1.0 / l]))
    }

    fn d_matrix_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        let frame = ctx.frame()?;
        let g = frame.material.material_at(iso).g;
        Ok(Mat::from_element(1, 1, g * frame.section.section_at(iso).j))
    }

    fn n_matrix_at(&self, _ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        let xi = xi(iso)?;
        Ok(Mat::from_row_slice(1, 2, &[(1.0 - xi) / 2.0, (1.0 + xi) / 2.0]))
    }

    fn j_matrix_at(&self, ctx: &ElementContext, _iso: &[f64]) -> FEAResult<Mat> {
        Ok(Mat::from_element(1, 1, ctx.length() / 2.0))
    }

    // Rotary inertia of the section about the member axis
    fn rho_matrix_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        let frame = ctx.frame()?;
        let rho = frame.material.material_at(iso).rho;
        Ok(Mat::from_element(1, 1, rho * frame.section.section_at(iso).ip()))
    }

    fn mu_matrix_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        let frame = ctx.frame()?;
        let mu = frame.material.material_at(iso).mu;
        Ok(Mat::from_element(1, 1, mu * frame.section.section_at(iso).ip()))
    }

    fn n_max_order(&self, _ctx: &ElementContext) -> [usize; 3] {
        [1, 0, 0]
    }

    fn local_internal_force_at(
        &self,
        ctx: &ElementContext,
        local: &[Displacement],
        iso: &[f64],
    ) -> FEAResult<Vec<(Dof, f64)>> {
        let torque = self.d_matrix_at(ctx, iso)? * self.b_matrix_at(ctx, iso)? * self.gather(local);
        Ok(vec![(Dof::Rx, torque[0])])
    }

    fn local_displacement_at(
        &self,
        ctx: &ElementContext,
        local: &[Displacement],
        iso: &[f64],
    ) -> FEAResult<Vec<(Dof, f64)>> {
        let twist = self.n_matrix_at(ctx, iso)? * self.gather(local);
        Ok(vec![(Dof::Rx, twist[0])])
    }
}
