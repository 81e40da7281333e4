//! Uniformly distributed loads
//!
//! On frames the intensity is per unit length, on triangles per unit area
//! and on tetrahedra per unit volume.

use serde::{Deserialize, Serialize};

use super::{iso_to_position, to_local, CoordinationSystem, LoadCase, LoadDirection};
use crate::elements::{BendingAxis, ElementContext, ElementKind, FrameElement};
use crate::error::{FEAError, FEAResult};
use crate::math::{Vec, Vec3};
use crate::results::{Displacement, Force};

/// A uniform load over the whole element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformLoad {
    /// Load intensity
    pub magnitude: f64,
    /// Load direction
    pub direction: LoadDirection,
    /// Coordinate system of `direction`
    pub coordination_system: CoordinationSystem,
    /// Load case
    pub case: LoadCase,
}

/// End loads `[V_start, M_start, V_end, M_end]` of a span under uniform load
///
/// `w` acts along local y and the moments are about local z; for loads along
/// local z the moments change sign. An end flagged free carries no moment.
pub fn uniform_beam_end_loads(w: f64, l: f64, start_free: bool, end_free: bool) -> [f64; 4] {
    let l2 = l * l;
    match (start_free, end_free) {
        (false, false) => [w * l / 2.0, w * l2 / 12.0, w * l / 2.0, -w * l2 / 12.0],
        (true, false) => [3.0 * w * l / 8.0, 0.0, 5.0 * w * l / 8.0, -w * l2 / 8.0],
        (false, true) => [5.0 * w * l / 8.0, w * l2 / 8.0, 3.0 * w * l / 8.0, 0.0],
        (true, true) => [w * l / 2.0, 0.0, w * l / 2.0, 0.0],
    }
}

impl UniformLoad {
    /// Create a new uniform load
    pub fn new(
        magnitude: f64,
        direction: LoadDirection,
        coordination_system: CoordinationSystem,
        case: LoadCase,
    ) -> Self {
        Self {
            magnitude,
            direction,
            coordination_system,
            case,
        }
    }

    /// Uniform load along a global axis
    pub fn global(magnitude: f64, direction: LoadDirection, case: LoadCase) -> Self {
        Self::new(magnitude, direction, CoordinationSystem::Global, case)
    }

    /// Uniform load along a local axis of the element
    pub fn local(magnitude: f64, direction: LoadDirection, case: LoadCase) -> Self {
        Self::new(magnitude, direction, CoordinationSystem::Local, case)
    }

    fn local_intensity(&self, ctx: &ElementContext) -> Vec3 {
        to_local(ctx, self.direction.unit() * self.magnitude, self.coordination_system)
    }

    fn frame_end_loads(&self, ctx: &ElementContext, frame: &FrameElement, with_hinges: bool) -> Vec {
        let l = ctx.length();
        let w = self.local_intensity(ctx);
        let ends = |axis: BendingAxis| {
            let active = frame.behaviour.bends_about(axis);
            if with_hinges {
                frame.moment_free_ends(axis)
            } else {
                (!active, !active)
            }
        };

        let mut f = Vec::zeros(12);
        f[0] = w.x * l / 2.0;
        f[6] = w.x * l / 2.0;

        let (start_free, end_free) = ends(BendingAxis::Z);
        let [v0, m0, v1, m1] = uniform_beam_end_loads(w.y, l, start_free, end_free);
        f[1] = v0;
        f[5] = m0;
        f[7] = v1;
        f[11] = m1;

        let (start_free, end_free) = ends(BendingAxis::Y);
        let [v0, m0, v1, m1] = uniform_beam_end_loads(w.z, l, start_free, end_free);
        f[2] = v0;
        f[4] = -m0;
        f[8] = v1;
        f[10] = -m1;

        f
    }

    /// Equivalent nodal loads in the element's local frame
    pub fn equivalent_nodal_loads(&self, ctx: &ElementContext) -> FEAResult<Vec> {
        match &ctx.element.kind {
            ElementKind::Frame(frame) => Ok(self.frame_end_loads(ctx, frame, true)),
            ElementKind::Triangle(_) => {
                let e1 = ctx.locations[1] - ctx.locations[0];
                let e2 = ctx.locations[2] - ctx.locations[0];
                let area = e1.cross(&e2).norm() / 2.0;
                Ok(lumped_translations(self.local_intensity(ctx) * area / 3.0, 3))
            }
            ElementKind::Tetrahedron(_) => {
                let p = &ctx.locations;
                let volume = (p[1] - p[0]).dot(&(p[2] - p[0]).cross(&(p[3] - p[0]))).abs() / 6.0;
                Ok(lumped_translations(self.local_intensity(ctx) * volume / 4.0, 4))
            }
            ElementKind::Quad(_) => Err(FEAError::unsupported(
                "uniform load",
                "quadrilateral elements",
            )),
        }
    }

    pub(crate) fn fixed_end_loads(&self, ctx: &ElementContext) -> FEAResult<Vec> {
        let frame = ctx.frame()?;
        Ok(self.frame_end_loads(ctx, frame, false))
    }

    pub(crate) fn internal_force_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Force> {
        let ElementKind::Frame(frame) = &ctx.element.kind else {
            return Ok(Force::default());
        };

        let l = ctx.length();
        let x = iso_to_position(iso, l)?;
        let w = self.local_intensity(ctx);
        let b = &frame.behaviour;

        // Fixed-fixed span: shear w (L/2 - x), moment w (L² - 6Lx + 6x²) / 12
        let shear = l / 2.0 - x;
        let moment = (l * l - 6.0 * l * x + 6.0 * x * x) / 12.0;

        let mut force = Force::default();
        if b.axial {
            force.fx = w.x * shear;
        }
        if b.bending_z {
            force.fy = w.y * shear;
            force.mz = w.y * moment;
        }
        if b.bending_y {
            force.fz = w.z * shear;
            force.my = -w.z * moment;
        }
        Ok(force)
    }

    pub(crate) fn displacement_at(
        &self,
        ctx: &ElementContext,
        iso: &[f64],
    ) -> FEAResult<Displacement> {
        let ElementKind::Frame(frame) = &ctx.element.kind else {
            return Ok(Displacement::default());
        };

        let l = ctx.length();
        let x = iso_to_position(iso, l)?;
        let w = self.local_intensity(ctx);
        let b = &frame.behaviour;
        let mat = frame.material.material_at(&[0.0]);
        let sec = frame.section.section_at(&[0.0]);

        let deflection = x * x * (l - x) * (l - x) / 24.0;
        let slope = x * (l - x) * (l - 2.0 * x) / 12.0;

        let mut disp = Displacement::default();
        if b.axial {
            disp.dx = w.x * x * (l - x) / (2.0 * mat.e * sec.a);
        }
        if b.bending_z {
            disp.dy = w.y * deflection / (mat.e * sec.iz);
            disp.rz = w.y * slope / (mat.e * sec.iz);
        }
        if b.bending_y {
            disp.dz = w.z * deflection / (mat.e * sec.iy);
            disp.ry = -w.z * slope / (mat.e * sec.iy);
        }
        Ok(disp)
    }
}

/// Same translational force on every node, six DOFs per node
fn lumped_translations(per_node: Vec3, nodes: usize) -> Vec {
    let mut f = Vec::zeros(6 * nodes);
    for n in 0..nodes {
        f[6 * n] = per_node.x;
        f[6 * n + 1] = per_node.y;
        f[6 * n + 2] = per_node.z;
    }
    f
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_end_loads_balance_total_load() {
        for (start, end) in [(false, false), (true, false), (false, true), (true, true)] {
            let [v0, _, v1, _] = uniform_beam_end_loads(-2.0, 6.0, start, end);
            assert_relative_eq!(v0 + v1, -12.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_end_loads_moment_equilibrium() {
        // Sum of moments about the start node is zero for every release combination
        let (w, l) = (3.0, 4.0);
        for (start, end) in [(false, false), (true, false), (false, true), (true, true)] {
            let [_, m0, v1, m1] = uniform_beam_end_loads(w, l, start, end);
            let resultant = m0 + m1 + v1 * l - w * l * l / 2.0;
            assert_relative_eq!(resultant, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_propped_end_loads() {
        let [v0, m0, v1, m1] = uniform_beam_end_loads(8.0, 2.0, true, false);
        assert_relative_eq!(v0, 6.0);
        assert_relative_eq!(m0, 0.0);
        assert_relative_eq!(v1, 10.0);
        assert_relative_eq!(m1, -4.0);
    }
}
