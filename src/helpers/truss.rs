//! Axial bar formulation of two-node frame elements

use super::{xi, ElementHelper, LocalDof};
use crate::elements::{Dof, ElementContext};
use crate::error::FEAResult;
use crate::math::gauss::IntegrationDomain;
use crate::math::Mat;
use crate::results::Displacement;

/// Linear axial displacement along local x, constant normal force
#[derive(Debug, Clone, Copy, Default)]
pub struct TrussHelper;

impl ElementHelper for TrussHelper {
    fn name(&self) -> &'static str {
        "truss helper"
    }

    fn domain(&self) -> IntegrationDomain {
        IntegrationDomain::Line
    }

    fn dof_order(&self) -> Vec<LocalDof> {
        vec![LocalDof::new(0, Dof::Dx), LocalDof::new(1, Dof::Dx)]
    }

    fn b_matrix_at(&self, ctx: &ElementContext, _iso: &[f64]) -> FEAResult<Mat> {
        let l = ctx.length();
        Ok(Mat::from_row_slice(1, 2, &[-1.0 / l, 1.0 / l]))
    }

    fn d_matrix_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        let frame = ctx.frame()?;
        let e = frame.material.material_at(iso).e;
        let a = frame.section.section_at(iso).a;
        Ok(Mat::from_element(1, 1, e * a))
    }

    fn n_matrix_at(&self, _ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        let xi = xi(iso)?;
        Ok(Mat::from_row_slice(1, 2, &[(1.0 - xi) / 2.0, (1.0 + xi) / 2.0]))
    }

    fn j_matrix_at(&self, ctx: &ElementContext, _iso: &[f64]) -> FEAResult<Mat> {
        Ok(Mat::from_element(1, 1, ctx.length() / 2.0))
    }

    fn rho_matrix_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        let frame = ctx.frame()?;
        let rho = frame.material.material_at(iso).rho;
        Ok(Mat::from_element(1, 1, rho * frame.section.section_at(iso).a))
    }

    fn mu_matrix_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        let frame = ctx.frame()?;
        let mu = frame.material.material_at(iso).mu;
        Ok(Mat::from_element(1, 1, mu * frame.section.section_at(iso).a))
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
        let u = self.gather(local);
        let n = self.d_matrix_at(ctx, iso)? * self.b_matrix_at(ctx, iso)? * u;
        Ok(vec![(Dof::Dx, n[0])])
    }

    fn local_displacement_at(
        &self,
        ctx: &ElementContext,
        local: &[Displacement],
        iso: &[f64],
    ) -> FEAResult<Vec<(Dof, f64)>> {
        let u = self.n_matrix_at(ctx, iso)? * self.gather(local);
        Ok(vec![(Dof::Dx, u[0])])
    }
}
