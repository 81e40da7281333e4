//! Constant strain triangle in plane stress

use super::{iso_point, ElementHelper, LocalDof};
use crate::elements::{Dof, ElementContext};
use crate::error::{FEAError, FEAResult};
use crate::math::gauss::IntegrationDomain;
use crate::math::Mat;
use crate::results::{Displacement, StressTensor};

/// Shape function derivatives with respect to (ξ, η), one row per node
#[rustfmt::skip]
const DN_DXI: [f64; 6] = [
    -1.0, -1.0,
     1.0,  0.0,
     0.0,  1.0,
];

/// Centroid of the reference triangle
pub(super) const CENTROID: [f64; 2] = [1.0 / 3.0, 1.0 / 3.0];

/// Jacobian of a flat triangle in its local (x, y) plane
pub(super) fn planar_jacobian(ctx: &ElementContext) -> Mat {
    let p = &ctx.local_locations;
    Mat::from_row_slice(
        2,
        2,
        &[
            p[1].x - p[0].x,
            p[2].x - p[0].x,
            p[1].y - p[0].y,
            p[2].y - p[0].y,
        ],
    )
}

/// Linear triangle shape functions
pub(super) fn shape(iso: &[f64]) -> FEAResult<[f64; 3]> {
    let [xi, eta] = iso_point::<2>(iso)?;
    Ok([1.0 - xi - eta, xi, eta])
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CstHelper;

impl CstHelper {
    fn dn_dx(ctx: &ElementContext) -> FEAResult<Mat> {
        let j_inv = planar_jacobian(ctx).try_inverse().ok_or_else(|| {
            FEAError::InvalidTopology(format!(
                "triangle '{}' has collinear nodes",
                ctx.element.label()
            ))
        })?;
        Ok(Mat::from_row_slice(3, 2, &DN_DXI) * j_inv)
    }

    /// Plane stress constitutive matrix without the thickness factor
    fn plane_stress(e: f64, nu: f64) -> Mat {
        let c = e / (1.0 - nu * nu);
        Mat::from_row_slice(
            3,
            3,
            &[c, c * nu, 0.0, c * nu, c, 0.0, 0.0, 0.0, c * (1.0 - nu) / 2.0],
        )
    }
}

impl ElementHelper for CstHelper {
    fn name(&self) -> &'static str {
        "CST helper"
    }

    fn domain(&self) -> IntegrationDomain {
        IntegrationDomain::Triangle
    }

    fn dof_order(&self) -> Vec<LocalDof> {
        (0..3)
            .flat_map(|node| [LocalDof::new(node, Dof::Dx), LocalDof::new(node, Dof::Dy)])
            .collect()
    }

    fn b_matrix_at(&self, ctx: &ElementContext, _iso: &[f64]) -> FEAResult<Mat> {
        let dn = Self::dn_dx(ctx)?;
        let mut b = Mat::zeros(3, 6);
        for node in 0..3 {
            let (bx, cy) = (dn[(node, 0)], dn[(node, 1)]);
            b[(0, 2 * node)] = bx;
            b[(1, 2 * node + 1)] = cy;
            b[(2, 2 * node)] = cy;
            b[(2, 2 * node + 1)] = bx;
        }
        Ok(b)
    }

    /// Membrane rigidity: plane stress matrix times thickness
    fn d_matrix_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        let triangle = ctx.triangle()?;
        let material = triangle.material.material_at(iso);
        Ok(Self::plane_stress(material.e, material.nu) * triangle.thickness)
    }

    fn n_matrix_at(&self, _ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        let mut n = Mat::zeros(2, 6);
        for (node, value) in shape(iso)?.iter().enumerate() {
            n[(0, 2 * node)] = *value;
            n[(1, 2 * node + 1)] = *value;
        }
        Ok(n)
    }

    fn j_matrix_at(&self, ctx: &ElementContext, _iso: &[f64]) -> FEAResult<Mat> {
        Ok(planar_jacobian(ctx))
    }

    fn rho_matrix_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        let triangle = ctx.triangle()?;
        let rho = triangle.material.material_at(iso).rho;
        Ok(Mat::identity(2, 2) * (rho * triangle.thickness))
    }

    fn mu_matrix_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        let triangle = ctx.triangle()?;
        let mu = triangle.material.material_at(iso).mu;
        Ok(Mat::identity(2, 2) * (mu * triangle.thickness))
    }

    fn n_max_order(&self, _ctx: &ElementContext) -> [usize; 3] {
        [1, 1, 0]
    }

    fn local_stress_at(
        &self,
        ctx: &ElementContext,
        local: &[Displacement],
        iso: &[f64],
    ) -> FEAResult<StressTensor> {
        let material = ctx.triangle()?.material.material_at(iso);
        let strain = self.b_matrix_at(ctx, iso)? * self.gather(local);
        let s = Self::plane_stress(material.e, material.nu) * strain;
        Ok(StressTensor::plane(s[0], s[1], s[2]))
    }

    fn local_displacement_at(
        &self,
        ctx: &ElementContext,
        local: &[Displacement],
        iso: &[f64],
    ) -> FEAResult<Vec<(Dof, f64)>> {
        let u = self.n_matrix_at(ctx, iso)? * self.gather(local);
        Ok(vec![(Dof::Dx, u[0]), (Dof::Dy, u[1])])
    }
}
