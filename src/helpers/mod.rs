//! Element helpers
//!
//! A helper is a stateless algorithm object implementing one formulation
//! (axial bar, beam bending, torsion, solid, membrane, drilling) over a
//! subset of an element's degrees of freedom. Elements sum the contributions
//! of their active helpers, each expanded to the element's full
//! six-DOF-per-node local space through [`ElementHelper::dof_order`].
//!
//! Operations that make no sense for a formulation return
//! [`FEAError::UnsupportedOperation`] instead of zeros.

mod cst;
mod drilling;
mod euler_bernoulli;
mod shaft;
mod tetrahedron;
mod truss;

pub use cst::CstHelper;
pub use drilling::DrillingDofHelper;
pub use euler_bernoulli::EulerBernoulliHelper;
pub use shaft::ShaftHelper;
pub use tetrahedron::TetrahedronHelper;
pub use truss::TrussHelper;

use crate::elements::{Dof, ElementContext};
use crate::error::{FEAError, FEAResult};
use crate::math::gauss::{integrate, IntegrationDomain};
use crate::math::{Mat, Vec};
use crate::results::{Displacement, StressTensor};

/// One row/column of a helper matrix: which element node and which DOF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalDof {
    pub node: usize,
    pub dof: Dof,
}

impl LocalDof {
    pub const fn new(node: usize, dof: Dof) -> Self {
        Self { node, dof }
    }

    /// Position in the element's six-DOF-per-node local space
    #[inline]
    pub fn element_index(&self) -> usize {
        6 * self.node + self.dof.index()
    }
}

/// Per-direction integration orders: `2 * a + b`
fn combined_orders(a: [usize; 3], b: [usize; 3]) -> [usize; 3] {
    std::array::from_fn(|i| 2 * a[i] + b[i])
}

/// Common capability interface of all element formulations
///
/// Matrices are expressed in the element's local frame; `iso` holds the
/// isoparametric coordinates of the evaluation point.
pub trait ElementHelper: Send + Sync {
    /// Name used in error messages
    fn name(&self) -> &'static str;

    /// Reference domain of the isoparametric coordinates
    fn domain(&self) -> IntegrationDomain;

    /// Element node and DOF of every helper row/column
    fn dof_order(&self) -> std::vec::Vec<LocalDof>;

    /// Strain-displacement matrix
    fn b_matrix_at(&self, _ctx: &ElementContext, _iso: &[f64]) -> FEAResult<Mat> {
        Err(FEAError::unsupported("B matrix", self.name()))
    }

    /// Constitutive matrix
    fn d_matrix_at(&self, _ctx: &ElementContext, _iso: &[f64]) -> FEAResult<Mat> {
        Err(FEAError::unsupported("D matrix", self.name()))
    }

    /// Shape function matrix
    fn n_matrix_at(&self, _ctx: &ElementContext, _iso: &[f64]) -> FEAResult<Mat> {
        Err(FEAError::unsupported("N matrix", self.name()))
    }

    /// Jacobian of the isoparametric to local mapping
    fn j_matrix_at(&self, _ctx: &ElementContext, _iso: &[f64]) -> FEAResult<Mat> {
        Err(FEAError::unsupported("Jacobian", self.name()))
    }

    /// Mass density matrix for the consistent mass matrix
    fn rho_matrix_at(&self, _ctx: &ElementContext, _iso: &[f64]) -> FEAResult<Mat> {
        Err(FEAError::unsupported("mass matrix", self.name()))
    }

    /// Damping density matrix for the consistent damping matrix
    fn mu_matrix_at(&self, _ctx: &ElementContext, _iso: &[f64]) -> FEAResult<Mat> {
        Err(FEAError::unsupported("damping matrix", self.name()))
    }

    /// Polynomial order of B in each isoparametric direction
    fn b_max_order(&self, _ctx: &ElementContext) -> [usize; 3] {
        [0, 0, 0]
    }

    /// Polynomial order of det J in each isoparametric direction
    fn det_j_order(&self, _ctx: &ElementContext) -> [usize; 3] {
        [0, 0, 0]
    }

    /// Polynomial order of N in each isoparametric direction
    fn n_max_order(&self, _ctx: &ElementContext) -> [usize; 3] {
        [0, 0, 0]
    }

    /// Determinant of the Jacobian; non-positive values mean degenerate geometry
    fn det_j_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<f64> {
        let det = self.j_matrix_at(ctx, iso)?.determinant();
        if det <= 0.0 || !det.is_finite() {
            return Err(FEAError::InvalidTopology(format!(
                "{} has a non-positive Jacobian determinant ({det}) in element '{}'",
                self.name(),
                ctx.element.label()
            )));
        }
        Ok(det)
    }

    /// Local stiffness matrix ∫ Bᵗ D B |J|
    fn local_stiffness(&self, ctx: &ElementContext) -> FEAResult<Mat> {
        let orders = combined_orders(self.b_max_order(ctx), self.det_j_order(ctx));
        integrate(self.domain(), orders, |iso| {
            let b = self.b_matrix_at(ctx, iso)?;
            let d = self.d_matrix_at(ctx, iso)?;
            let det_j = self.det_j_at(ctx, iso)?;
            Ok(b.transpose() * d * b * det_j)
        })
    }

    /// Consistent mass matrix ∫ Nᵗ ρ N |J|
    fn local_mass(&self, ctx: &ElementContext) -> FEAResult<Mat> {
        let orders = combined_orders(self.n_max_order(ctx), self.det_j_order(ctx));
        integrate(self.domain(), orders, |iso| {
            let n = self.n_matrix_at(ctx, iso)?;
            let rho = self.rho_matrix_at(ctx, iso)?;
            let det_j = self.det_j_at(ctx, iso)?;
            Ok(n.transpose() * rho * n * det_j)
        })
    }

    /// Consistent damping matrix ∫ Nᵗ μ N |J|
    fn local_damping(&self, ctx: &ElementContext) -> FEAResult<Mat> {
        let orders = combined_orders(self.n_max_order(ctx), self.det_j_order(ctx));
        integrate(self.domain(), orders, |iso| {
            let n = self.n_matrix_at(ctx, iso)?;
            let mu = self.mu_matrix_at(ctx, iso)?;
            let det_j = self.det_j_at(ctx, iso)?;
            Ok(n.transpose() * mu * n * det_j)
        })
    }

    /// Helper DOF values picked from per-node local displacements
    fn gather(&self, local: &[Displacement]) -> Vec {
        let dofs = self.dof_order();
        Vec::from_iterator(
            dofs.len(),
            dofs.iter().map(|ld| local[ld.node].get(ld.dof)),
        )
    }

    /// Internal forces (D·B·u) at a point, per force component
    fn local_internal_force_at(
        &self,
        _ctx: &ElementContext,
        _local: &[Displacement],
        _iso: &[f64],
    ) -> FEAResult<std::vec::Vec<(Dof, f64)>> {
        Err(FEAError::unsupported("internal force", self.name()))
    }

    /// Stress tensor at a point
    fn local_stress_at(
        &self,
        _ctx: &ElementContext,
        _local: &[Displacement],
        _iso: &[f64],
    ) -> FEAResult<StressTensor> {
        Err(FEAError::unsupported("stress", self.name()))
    }

    /// Interpolated displacements (N·u) at a point
    fn local_displacement_at(
        &self,
        _ctx: &ElementContext,
        _local: &[Displacement],
        _iso: &[f64],
    ) -> FEAResult<std::vec::Vec<(Dof, f64)>> {
        Err(FEAError::unsupported("displacement interpolation", self.name()))
    }
}

/// Scatter a helper matrix into an element matrix of `6 * nodes` rows
pub fn expand_to_element(dofs: &[LocalDof], k: &Mat, nodes: usize) -> Mat {
    let mut full = Mat::zeros(6 * nodes, 6 * nodes);
    for (i, di) in dofs.iter().enumerate() {
        for (j, dj) in dofs.iter().enumerate() {
            full[(di.element_index(), dj.element_index())] += k[(i, j)];
        }
    }
    full
}

/// Isoparametric point with exactly `N` coordinates
pub(crate) fn iso_point<const N: usize>(iso: &[f64]) -> FEAResult<[f64; N]> {
    <[f64; N]>::try_from(iso).map_err(|_| {
        FEAError::InvalidInput(format!(
            "expected {} isoparametric coordinates, got {}",
            N,
            iso.len()
        ))
    })
}

/// Coordinate of a line element point
#[inline]
pub(crate) fn xi(iso: &[f64]) -> FEAResult<f64> {
    Ok(iso_point::<1>(iso)?[0])
}
