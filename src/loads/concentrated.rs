//! Concentrated loads on frame elements

use serde::{Deserialize, Serialize};

use super::{iso_to_position, to_local, CoordinationSystem, LoadCase};
use crate::elements::{ElementContext, FrameElement};
use crate::error::{FEAError, FEAResult};
use crate::math::{condense_loads, Vec, Vec3};
use crate::results::{Displacement, Force};

/// A concentrated force on a frame element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentratedLoad {
    /// Force in X direction
    pub fx: f64,
    /// Force in Y direction
    pub fy: f64,
    /// Force in Z direction
    pub fz: f64,
    /// Distance from the start node
    pub position: f64,
    /// Coordinate system of the force components
    pub coordination_system: CoordinationSystem,
    /// Load case
    pub case: LoadCase,
}

impl ConcentratedLoad {
    /// Create a new concentrated load
    pub fn new(
        fx: f64,
        fy: f64,
        fz: f64,
        position: f64,
        coordination_system: CoordinationSystem,
        case: LoadCase,
    ) -> Self {
        Self {
            fx,
            fy,
            fz,
            position,
            coordination_system,
            case,
        }
    }

    /// Create a downward (negative global Y) concentrated load
    pub fn downward(magnitude: f64, position: f64, case: LoadCase) -> Self {
        Self::new(0.0, -magnitude.abs(), 0.0, position, CoordinationSystem::Global, case)
    }

    fn local_force(&self, ctx: &ElementContext) -> Vec3 {
        to_local(ctx, Vec3::new(self.fx, self.fy, self.fz), self.coordination_system)
    }

    /// Distances (a, b) of the load from the start and end nodes
    fn spans(&self, length: f64) -> FEAResult<(f64, f64)> {
        if !(0.0..=length).contains(&self.position) {
            return Err(FEAError::InvalidInput(format!(
                "concentrated load at {} is outside the element of length {}",
                self.position, length
            )));
        }
        Ok((self.position, length - self.position))
    }

    fn frame_end_loads(&self, ctx: &ElementContext, frame: &FrameElement) -> FEAResult<Vec> {
        let l = ctx.length();
        let (a, b) = self.spans(l)?;
        let p = self.local_force(ctx);
        let (l2, l3) = (l * l, l * l * l);

        let mut f = Vec::zeros(12);
        f[0] = p.x * b / l;
        f[6] = p.x * a / l;

        if frame.behaviour.bending_z {
            f[1] = p.y * b * b * (3.0 * a + b) / l3;
            f[5] = p.y * a * b * b / l2;
            f[7] = p.y * a * a * (a + 3.0 * b) / l3;
            f[11] = -p.y * a * a * b / l2;
        } else {
            f[1] = p.y * b / l;
            f[7] = p.y * a / l;
        }

        if frame.behaviour.bending_y {
            f[2] = p.z * b * b * (3.0 * a + b) / l3;
            f[4] = -p.z * a * b * b / l2;
            f[8] = p.z * a * a * (a + 3.0 * b) / l3;
            f[10] = p.z * a * a * b / l2;
        } else {
            f[2] = p.z * b / l;
            f[8] = p.z * a / l;
        }

        Ok(f)
    }

    /// Equivalent nodal loads in the element's local frame
    ///
    /// Hinged ends are handled by condensing the fixed-end loads through the
    /// element stiffness.
    pub fn equivalent_nodal_loads(&self, ctx: &ElementContext) -> FEAResult<Vec> {
        let frame = ctx.frame()?;
        let fixed = self.frame_end_loads(ctx, frame)?;
        let released = frame.released_dofs();
        if released.is_empty() {
            return Ok(fixed);
        }
        let k = ctx.element.unreleased_local_stiffness(ctx)?;
        condense_loads(&fixed, &k, &released)
    }

    pub(crate) fn fixed_end_loads(&self, ctx: &ElementContext) -> FEAResult<Vec> {
        self.frame_end_loads(ctx, ctx.frame()?)
    }

    pub(crate) fn internal_force_at(&self, ctx: &ElementContext, iso: &[f64]) -> FEAResult<Force> {
        let frame = ctx.frame()?;
        let l = ctx.length();
        let (a, _) = self.spans(l)?;
        let x = iso_to_position(iso, l)?;
        let f = self.frame_end_loads(ctx, frame)?;

        let at = Vec3::new(x, 0.0, 0.0);
        // Resultant on the segment [0, x]: start reaction plus the load if passed
        let start_reaction = -Force::from_array([f[0], f[1], f[2], f[3], f[4], f[5]]);
        let mut left = start_reaction.moved(&Vec3::zeros(), &at);
        if x > a {
            let load = Force::from_vectors(self.local_force(ctx), Vec3::zeros());
            left += load.moved(&Vec3::new(a, 0.0, 0.0), &at);
        }

        let mut force = -left;
        let b = &frame.behaviour;
        if !b.axial {
            force.fx = 0.0;
        }
        if !b.bending_z {
            force.fy = 0.0;
            force.mz = 0.0;
        }
        if !b.bending_y {
            force.fz = 0.0;
            force.my = 0.0;
        }
        force.mx = 0.0;
        Ok(force)
    }

    pub(crate) fn displacement_at(
        &self,
        ctx: &ElementContext,
        iso: &[f64],
    ) -> FEAResult<Displacement> {
        let frame = ctx.frame()?;
        let l = ctx.length();
        let (a, b) = self.spans(l)?;
        let x = iso_to_position(iso, l)?;
        let p = self.local_force(ctx);
        let mat = frame.material.material_at(&[0.0]);
        let sec = frame.section.section_at(&[0.0]);
        let bh = &frame.behaviour;

        let mut disp = Displacement::default();
        if bh.axial {
            let u = if x <= a { b * x } else { a * (l - x) };
            disp.dx = p.x * u / (mat.e * sec.a * l);
        }
        let (deflection, slope) = fixed_beam_point_load_shape(a, b, l, x);
        if bh.bending_z {
            disp.dy = p.y * deflection / (mat.e * sec.iz);
            disp.rz = p.y * slope / (mat.e * sec.iz);
        }
        if bh.bending_y {
            disp.dz = p.z * deflection / (mat.e * sec.iy);
            disp.ry = -p.z * slope / (mat.e * sec.iy);
        }
        Ok(disp)
    }
}

/// Deflection and slope (times EI, per unit load) of a fixed-fixed beam
/// with a point load at distance `a` from the start
fn fixed_beam_point_load_shape(a: f64, b: f64, l: f64, x: f64) -> (f64, f64) {
    let l3 = l * l * l;
    if x <= a {
        let deflection = b * b * x * x * (3.0 * a * l - (3.0 * a + b) * x) / (6.0 * l3);
        let slope = b * b * x * (2.0 * a * l - (3.0 * a + b) * x) / (2.0 * l3);
        (deflection, slope)
    } else {
        let xr = l - x;
        let deflection = a * a * xr * xr * (3.0 * b * l - (3.0 * b + a) * xr) / (6.0 * l3);
        let slope = -a * a * xr * (2.0 * b * l - (3.0 * b + a) * xr) / (2.0 * l3);
        (deflection, slope)
    }
}
