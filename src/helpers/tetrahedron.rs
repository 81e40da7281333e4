//! Linear four-node tetrahedron (constant strain solid)

use super::{iso_point, ElementHelper, LocalDof};
use crate::elements::{Dof, ElementContext};
use crate::error::{FEAError, FEAResult};
use crate::math::gauss::IntegrationDomain;
use crate::math::{Mat, Mat3, Vec};
use crate::results::{Displacement, StressTensor};

/// Shape function derivatives with respect to (ξ, η, ζ), one row per node
#[rustfmt::skip]
const DN_DXI: [f64; 12] = [
    -1.0, -1.0, -1.0,
     1.0,  0.0,  0.0,
     0.0,  1.0,  0.0,
     0.0,  0.0,  1.0,
];

const TRANSLATIONS: [Dof; 3] = [Dof::Dx, Dof::Dy, Dof::Dz];

#[derive(Debug, Clone, Copy, Default)]
pub struct TetrahedronHelper;

impl TetrahedronHelper {
    fn jacobian(ctx: &ElementContext) -> Mat3 {
        let p = &ctx.local_locations;
        Mat3::from_columns(&[p[1] - p[0], p[2] - p[0], p[3] - p[0]])
    }

    /// Shape function derivatives with respect to (x, y, z), one row per node
    fn dn_dx(ctx: &ElementContext) -> FEAResult<Mat> {
        let j_inv = Self::jacobian(ctx).try_inverse().ok_or_else(|| {
            FEAError::InvalidTopology(format!(
                "tetrahedron '{}' has coplanar nodes",
                ctx.element.label()
            ))
        })?;
        let dn_dxi = Mat::from_row_slice(4, 3, &DN_DXI);
        let j_inv = Mat::from_iterator(3, 3, j_inv.iter().copied());
        Ok(dn_dxi * j_inv)
    }

    fn isotropic_d(e: f64, nu: f64) -> Mat {
        let lambda = e * nu / ((1.0 + nu) * (1.0 - 2.0 * nu));
        let mu = e / (2.0 * (1.0 + nu));
        let mut d = Mat::zeros(6, 6);
        for i in 0..3 {
            for j in 0..3 {
                d[(i, j)] = lambda;
            }
            d[(i, i)] += 2.0 * mu;
            d[(i + 3, i + 3)] = mu;
        }
        d
    }

    fn density(&self, value: f64) -> Mat {
        Mat::identity(3, 3) * value
    }
}

impl ElementHelper for TetrahedronHelper {
    fn name(&self) -> &'static str {
        "tetrahedron helper"
    }

    fn domain(&self) -> IntegrationDomain {
        IntegrationDomain::Tetrahedron
    }

    fn dof_order(&self) -> std::vec::Vec<LocalDof> {
        (0..4)
            .flat_map(|node| TRANSLATIONS.iter().map(move |&dof| LocalDof::new(node, dof)))
            .collect()
    }

    fn b_matrix_at(&self, ctx: &ElementContext, _iso: &[f64]) -> FEAResult<Mat> {
        let dn = Self::dn_dx(ctx)?;
        let mut b = Mat::zeros(6, 12);
        for node in 0..4 {
            let (bx, cy, dz) = (dn[(node, 0)], dn[(node, 1)], dn[(node, 2)]);
            let col = 3 * node;
            b[(0, col)] = bx;
            b[(1, col + 1)] = cy;
            b[(2, col + 2)] = dz;
            b[(3, col)] = cy;
            b[(3, col + 1)] = bx;
            b[(4, col + 1)] = dz;
            b[(4, col + 2)] = cy;
            b[(5, col)] = dz;
            b[(5, col + 2)] = bx;
        }
        Ok(b)
    }

    fn d_matrix_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        let material = ctx.tetrahedron()?.material.material_at(iso);
        Ok(Self::isotropic_d(material.e, material.nu))
    }

    fn n_matrix_at(&self, _ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        let [xi, eta, zeta] = iso_point::<3>(iso)?;
        let shape = [1.0 - xi - eta - zeta, xi, eta, zeta];
        let mut n = Mat::zeros(3, 12);
        for (node, value) in shape.iter().enumerate() {
            for axis in 0..3 {
                n[(axis, 3 * node + axis)] = *value;
            }
        }
        Ok(n)
    }

    fn j_matrix_at(&self, ctx: &ElementContext, _iso: &[f64]) -> FEAResult<Mat> {
        Ok(Mat::from_iterator(3, 3, Self::jacobian(ctx).iter().copied()))
    }

    fn rho_matrix_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        Ok(self.density(ctx.tetrahedron()?.material.material_at(iso).rho))
    }

    fn mu_matrix_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Mat> {
        Ok(self.density(ctx.tetrahedron()?.material.material_at(iso).mu))
    }

    fn n_max_order(&self, _ctx: &ElementContext) -> [usize; 3] {
        [1, 1, 1]
    }

    fn local_stress_at(
        &self,
        ctx: &ElementContext,
        local: &[Displacement],
        iso: &[f64],
    ) -> FEAResult<StressTensor> {
        let strain = self.b_matrix_at(ctx, iso)? * self.gather(local);
        let stress: Vec = self.d_matrix_at(ctx, iso)? * strain;
        Ok(StressTensor::from_voigt(std::array::from_fn(|i| stress[i])))
    }

    fn local_displacement_at(
        &self,
        ctx: &ElementContext,
        local: &[Displacement],
        iso: &[f64],
    ) -> FEAResult<std::vec::Vec<(Dof, f64)>> {
        let u = self.n_matrix_at(ctx, iso)? * self.gather(local);
        Ok(TRANSLATIONS.iter().zip(u.iter()).map(|(&d, &v)| (d, v)).collect())
    }
}
