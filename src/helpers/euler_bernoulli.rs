//! Euler-Bernoulli bending of two-node frame elements
//!
//! Cubic Hermite interpolation of the transverse displacement. Bending
//! about local z uses (v, θz) with θz = v'; bending about local y uses
//! (w, θy) with θy = -w'. Internal forces follow
//! `Mz = EIz v''`, `Vy = -EIz v'''`, `My = -EIy w''`, `Vz = -EIy w'''`.

use super::{xi, ElementHelper, LocalDof};
use crate::elements::{BendingAxis, Dof, ElementContext};
use crate::error::FEAResult;
use crate::math::gauss::IntegrationDomain;
use crate::math::Mat;
use crate::results::Displacement;

/// Beam bending about one local axis
#[derive(Debug, Clone, Copy)]
pub struct EulerBernoulliHelper {
    pub axis: BendingAxis,
}

impl EulerBernoulliHelper {
    pub fn new(axis: BendingAxis) -> Self {
        Self { axis }
    }

    /// Translation and rotation DOFs of this bending plane
    fn dofs(&self) -> (Dof, Dof) {
        match self.axis {
            BendingAxis::Z => (Dof::Dy, Dof::Rz),
            BendingAxis::Y => (Dof::Dz, Dof::Ry),
        }
    }

    /// Sign relating nodal rotation to the slope of the transverse displacement
    fn sign(&self) -> f64 {
        match self.axis {
            BendingAxis::Z => 1.0,
            BendingAxis::Y => -1.0,
        }
    }

    fn rigidity_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<f64> {
        let frame = ctx.frame()?;
        let e = frame.material.material_at(iso).e;
        let section = frame.section.section_at(iso);
        Ok(match self.axis {
            BendingAxis::Z => e * section.iz,
            BendingAxis::Y => e * section.iy,
        })
    }

    /// Row giving the slope dv/dx of the transverse displacement
    fn slope_row(&self, l: f64, xi: f64) -> [f64; 4] {
        let s = self.sign();
        let scale = 2.0 / l;
        [
            scale * (-3.0 + 3.0 * xi * xi) / 4.0,
            s * (-1.0 - 2.0 * xi + 3.0 * xi * xi) / 4.0,
            scale * (3.0 - 3.0 * xi * xi) / 4.0,
            s * (-1.0 + 2.0 * xi + 3.0 * xi * xi) / 4.0,
        ]
    }

    /// Row giving the third derivative of the transverse displacement
    fn third_derivative_row(&self, l: f64) -> [f64; 4] {
        let s = self.sign();
        let l2 = l * l;
        [12.0 / (l2 * l), s * 6.0 / l2, -12.0 / (l2 * l), s * 6.0 / l2]
    }
}

impl ElementHelper for EulerBernoulliHelper {
    fn name(&self) -> &'static str {
        match self.axis {
            BendingAxis::Z => "Euler-Bernoulli helper (bending about z)",
            BendingAxis::Y => "Euler-Bernoulli helper (bending about y)",
        }
    }

    fn domain(&self) -> IntegrationDomain {
        IntegrationDomain::Line
    }

    fn dof_order(&self) -> Vec<LocalDof> {
        let (t, r) = self.dofs();
        vec![
            LocalDof::new(0, t),
            LocalDof::new(0, r),
            LocalDof::new(1, t),
            LocalDof::new(1, r),
        ]
    }

    /// Curvature row: second derivative of the transverse displacement
    fn b_matrix_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        let l = ctx.length();
        let xi = xi(iso)?;
        let s = self.sign();
        Ok(Mat::from_row_slice(
            1,
            4,
            &[
                6.0 * xi / (l * l),
                s * (3.0 * xi - 1.0) / l,
                -6.0 * xi / (l * l),
                s * (3.0 * xi + 1.0) / l,
            ],
        ))
    }

    fn d_matrix_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        Ok(Mat::from_element(1, 1, self.rigidity_at(ctx, iso)?))
    }

    fn n_matrix_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        let l = ctx.length();
        let xi = xi(iso)?;
        let s = self.sign();
        Ok(Mat::from_row_slice(
            1,
            4,
            &[
                (2.0 - 3.0 * xi + xi.powi(3)) / 4.0,
                s * l / 2.0 * (1.0 - xi - xi * xi + xi.powi(3)) / 4.0,
                (2.0 + 3.0 * xi - xi.powi(3)) / 4.0,
                s * l / 2.0 * (-1.0 - xi + xi * xi + xi.powi(3)) / 4.0,
            ],
        ))
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

    fn b_max_order(&self, _ctx: &ElementContext) -> [usize; 3] {
        [1, 0, 0]
    }

    fn n_max_order(&self, _ctx: &ElementContext) -> [usize; 3] {
        [3, 0, 0]
    }

    fn local_internal_force_at(
        &self,
        ctx: &ElementContext,
        local: &[Displacement],
        iso: &[f64],
    ) -> FEAResult<Vec<(Dof, f64)>> {
        let u = self.gather(local);
        let ei = self.rigidity_at(ctx, iso)?;
        let curvature = (self.b_matrix_at(ctx, iso)? * &u)[0];
        let third: f64 = self
            .third_derivative_row(ctx.length())
            .iter()
            .zip(u.iter())
            .map(|(c, v)| c * v)
            .sum();

        let shear = -ei * third;
        Ok(match self.axis {
            BendingAxis::Z => vec![(Dof::Dy, shear), (Dof::Rz, ei * curvature)],
            BendingAxis::Y => vec![(Dof::Dz, shear), (Dof::Ry, -ei * curvature)],
        })
    }

    fn local_displacement_at(
        &self,
        ctx: &ElementContext,
        local: &[Displacement],
        iso: &[f64],
    ) -> FEAResult<Vec<(Dof, f64)>> {
        let u = self.gather(local);
        let deflection = (self.n_matrix_at(ctx, iso)? * &u)[0];
        let slope: f64 = self
            .slope_row(ctx.length(), xi(iso)?)
            .iter()
            .zip(u.iter())
            .map(|(c, v)| c * v)
            .sum();

        let (t, r) = self.dofs();
        Ok(vec![(t, deflection), (r, self.sign() * slope)])
    }
}
