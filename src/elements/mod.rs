//! Structural elements module
//!
//! An [`Element`] references its nodes by label, carries one family variant
//! ([`ElementKind`]) and the element loads applied to it. The numerical work
//! is delegated to the helpers of the family (see [`crate::helpers`]); the
//! element sums their contributions in its local frame and rotates the
//! result to global coordinates.

mod constraint;
mod frame;
mod material;
mod node;
mod quad;
mod section;
mod tetrahedron;
mod triangle;

pub use constraint::{Constraints, Dof, DofConstraint};
pub use frame::{BendingAxis, FrameBehaviour, FrameElement};
pub use material::{Material, MaterialProvider};
pub use node::Node;
pub use quad::QuadElement;
pub use section::{Section, SectionProvider};
pub use tetrahedron::TetrahedronElement;
pub use triangle::{TriangleBehaviour, TriangleElement};

use crate::error::{FEAError, FEAResult};
use crate::helpers::{
    expand_to_element, CstHelper, DrillingDofHelper, ElementHelper, EulerBernoulliHelper,
    ShaftHelper, TetrahedronHelper, TrussHelper,
};
use crate::loads::{ElementLoad, LoadCase};
use crate::math::{
    block_transformation, condense_stiffness, frame_lambda, recover_released, triangle_lambda, Mat,
    Mat3, Vec, Vec3,
};
use crate::results::{Displacement, Force, StressTensor};

/// Element family with its family-specific data
#[derive(Debug, Clone)]
pub enum ElementKind {
    Frame(FrameElement),
    Triangle(TriangleElement),
    Tetrahedron(TetrahedronElement),
    Quad(QuadElement),
}

impl ElementKind {
    /// Number of nodes of the family
    pub fn node_count(&self) -> usize {
        match self {
            Self::Frame(_) => 2,
            Self::Triangle(_) => 3,
            Self::Tetrahedron(_) | Self::Quad(_) => 4,
        }
    }

    pub fn family_name(&self) -> &'static str {
        match self {
            Self::Frame(_) => "frame",
            Self::Triangle(_) => "triangle",
            Self::Tetrahedron(_) => "tetrahedron",
            Self::Quad(_) => "quadrilateral",
        }
    }
}

/// A finite element
#[derive(Debug, Clone)]
pub struct Element {
    /// Label, assigned when the element is added to a model
    pub(crate) label: String,
    /// Node labels in element order
    nodes: std::vec::Vec<String>,
    /// Node positions in the model, resolved when added to a model
    pub(crate) node_indices: std::vec::Vec<usize>,
    pub kind: ElementKind,
    pub(crate) loads: std::vec::Vec<ElementLoad>,
}

impl Element {
    fn with_nodes(nodes: &[&str], kind: ElementKind) -> Self {
        Self {
            label: String::new(),
            nodes: nodes.iter().map(|n| n.to_string()).collect(),
            node_indices: std::vec::Vec::new(),
            kind,
            loads: std::vec::Vec::new(),
        }
    }

    /// Two-node frame element from `start` to `end`
    pub fn frame(start: &str, end: &str, frame: FrameElement) -> Self {
        Self::with_nodes(&[start, end], ElementKind::Frame(frame))
    }

    pub fn triangle(nodes: [&str; 3], triangle: TriangleElement) -> Self {
        Self::with_nodes(&nodes, ElementKind::Triangle(triangle))
    }

    pub fn tetrahedron(nodes: [&str; 4], tetrahedron: TetrahedronElement) -> Self {
        Self::with_nodes(&nodes, ElementKind::Tetrahedron(tetrahedron))
    }

    pub fn quad(nodes: [&str; 4], quad: QuadElement) -> Self {
        Self::with_nodes(&nodes, ElementKind::Quad(quad))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Node labels in element order
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn loads(&self) -> &[ElementLoad] {
        &self.loads
    }

    /// Active helpers of the element
    pub fn helpers(&self) -> FEAResult<std::vec::Vec<Box<dyn ElementHelper>>> {
        let mut helpers: std::vec::Vec<Box<dyn ElementHelper>> = std::vec::Vec::new();
        match &self.kind {
            ElementKind::Frame(frame) => {
                let b = &frame.behaviour;
                if b.axial {
                    helpers.push(Box::new(TrussHelper));
                }
                if b.bending_y {
                    helpers.push(Box::new(EulerBernoulliHelper::new(BendingAxis::Y)));
                }
                if b.bending_z {
                    helpers.push(Box::new(EulerBernoulliHelper::new(BendingAxis::Z)));
                }
                if b.torsion {
                    helpers.push(Box::new(ShaftHelper));
                }
            }
            ElementKind::Triangle(triangle) => {
                helpers.push(Box::new(CstHelper));
                if triangle.behaviour == TriangleBehaviour::MembraneWithDrilling {
                    helpers.push(Box::new(DrillingDofHelper));
                }
            }
            ElementKind::Tetrahedron(_) => helpers.push(Box::new(TetrahedronHelper)),
            ElementKind::Quad(_) => {
                return Err(FEAError::UnsupportedOperation(
                    "quadrilateral shell formulation is not implemented".to_string(),
                ))
            }
        }
        Ok(helpers)
    }

    /// Geometric context of the element from the model's nodes
    pub fn context(&self, nodes: &[Node]) -> FEAResult<ElementContext<'_>> {
        if self.node_indices.len() != self.nodes.len() {
            return Err(FEAError::InvalidTopology(format!(
                "element '{}' has unresolved nodes",
                self.label
            )));
        }
        let locations = self
            .node_indices
            .iter()
            .zip(&self.nodes)
            .map(|(&i, label)| {
                nodes
                    .get(i)
                    .map(Node::location)
                    .ok_or_else(|| FEAError::NodeNotFound(label.clone()))
            })
            .collect::<FEAResult<std::vec::Vec<_>>>()?;
        ElementContext::new(self, locations)
    }

    /// Local DOFs condensed out by releases
    pub fn released_dofs(&self) -> std::vec::Vec<usize> {
        match &self.kind {
            ElementKind::Frame(frame) => frame.released_dofs(),
            _ => std::vec::Vec::new(),
        }
    }

    /// Block-diagonal rotation from global to local element DOFs
    pub fn transformation(&self, ctx: &ElementContext) -> Mat {
        block_transformation(&ctx.lambda, 2 * ctx.node_count())
    }

    fn sum_helpers(
        &self,
        ctx: &ElementContext,
        matrix: impl Fn(&dyn ElementHelper) -> FEAResult<Mat>,
    ) -> FEAResult<Mat> {
        let n = ctx.node_count();
        let mut k = Mat::zeros(6 * n, 6 * n);
        for helper in self.helpers()? {
            let local = matrix(helper.as_ref())?;
            k += expand_to_element(&helper.dof_order(), &local, n);
        }
        Ok(k)
    }

    /// Local stiffness before releases are condensed
    pub(crate) fn unreleased_local_stiffness(&self, ctx: &ElementContext) -> FEAResult<Mat> {
        self.sum_helpers(ctx, |h| h.local_stiffness(ctx))
    }

    /// Local stiffness with releases condensed out
    pub fn local_stiffness(&self, ctx: &ElementContext) -> FEAResult<Mat> {
        let k = self.unreleased_local_stiffness(ctx)?;
        condense_stiffness(&k, &self.released_dofs())
    }

    fn to_global(&self, ctx: &ElementContext, local: &Mat) -> Mat {
        let t = self.transformation(ctx);
        t.transpose() * local * t
    }

    /// Global stiffness matrix `Tᵗ K T`
    pub fn global_stiffness(&self, nodes: &[Node]) -> FEAResult<Mat> {
        let ctx = self.context(nodes)?;
        Ok(self.to_global(&ctx, &self.local_stiffness(&ctx)?))
    }

    /// Global consistent mass matrix
    pub fn global_mass(&self, nodes: &[Node]) -> FEAResult<Mat> {
        let ctx = self.context(nodes)?;
        let m = self.sum_helpers(&ctx, |h| h.local_mass(&ctx))?;
        Ok(self.to_global(&ctx, &m))
    }

    /// Global consistent damping matrix
    pub fn global_damping(&self, nodes: &[Node]) -> FEAResult<Mat> {
        let ctx = self.context(nodes)?;
        let c = self.sum_helpers(&ctx, |h| h.local_damping(&ctx))?;
        Ok(self.to_global(&ctx, &c))
    }

    /// Global DOF numbers of the element, six per node
    pub fn global_dofs(&self) -> std::vec::Vec<usize> {
        self.node_indices
            .iter()
            .flat_map(|&i| (0..6).map(move |d| 6 * i + d))
            .collect()
    }

    fn case_loads<'a>(&'a self, case: &'a LoadCase) -> impl Iterator<Item = &'a ElementLoad> {
        self.loads.iter().filter(move |load| load.case() == case)
    }

    /// Equivalent nodal loads of one load case in global coordinates
    pub fn global_equivalent_nodal_loads(&self, nodes: &[Node], case: &LoadCase) -> FEAResult<Vec> {
        let ctx = self.context(nodes)?;
        let mut f = Vec::zeros(6 * ctx.node_count());
        for load in self.case_loads(case) {
            f += load.equivalent_nodal_loads(&ctx)?;
        }
        Ok(self.transformation(&ctx).transpose() * f)
    }

    /// Nodal displacements in the local frame, released DOFs recovered
    pub fn local_displacements(
        &self,
        ctx: &ElementContext,
        global: &[Displacement],
        case: &LoadCase,
    ) -> FEAResult<std::vec::Vec<Displacement>> {
        let n = ctx.node_count();
        if global.len() != n {
            return Err(FEAError::InvalidInput(format!(
                "element '{}' expects {} nodal displacements, got {}",
                self.label,
                n,
                global.len()
            )));
        }
        let d = Vec::from_iterator(6 * n, global.iter().flat_map(|g| g.as_array()));
        let mut u = self.transformation(ctx) * d;

        let released = self.released_dofs();
        if !released.is_empty() {
            let k = self.unreleased_local_stiffness(ctx)?;
            let mut fer = Vec::zeros(6 * n);
            for load in self.case_loads(case) {
                fer -= load.fixed_end_loads(ctx)?;
            }
            u = recover_released(&u, &k, &fer, &released)?;
        }

        Ok((0..n)
            .map(|i| Displacement::from_array(std::array::from_fn(|d| u[6 * i + d])))
            .collect())
    }

    /// Active helpers, once `iso` is known to match their integration domain
    fn helpers_at(&self, iso: &[f64]) -> FEAResult<std::vec::Vec<Box<dyn ElementHelper>>> {
        let helpers = self.helpers()?;
        for helper in &helpers {
            let expected = helper.domain().dimension();
            if iso.len() != expected {
                return Err(FEAError::InvalidInput(format!(
                    "{} element '{}' expects {} isoparametric coordinates, got {}",
                    self.kind.family_name(),
                    self.label,
                    expected,
                    iso.len()
                )));
            }
        }
        Ok(helpers)
    }

    /// Internal forces at an isoparametric point, in the local frame
    ///
    /// `global` holds the displacements of the element's nodes.
    pub fn internal_force_at(
        &self,
        nodes: &[Node],
        global: &[Displacement],
        iso: &[f64],
        case: &LoadCase,
    ) -> FEAResult<Force> {
        let helpers = self.helpers_at(iso)?;
        let ctx = self.context(nodes)?;
        let local = self.local_displacements(&ctx, global, case)?;
        let mut force = Force::default();
        for helper in helpers {
            for (dof, value) in helper.local_internal_force_at(&ctx, &local, iso)? {
                force.add_to(dof, value);
            }
        }
        if matches!(self.kind, ElementKind::Frame(_)) {
            for load in self.case_loads(case) {
                force += load.internal_force_at(&ctx, iso)?;
            }
        }
        Ok(force)
    }

    /// Interpolated displacement at an isoparametric point, in the local frame
    pub fn displacement_at(
        &self,
        nodes: &[Node],
        global: &[Displacement],
        iso: &[f64],
        case: &LoadCase,
    ) -> FEAResult<Displacement> {
        let helpers = self.helpers_at(iso)?;
        let ctx = self.context(nodes)?;
        let local = self.local_displacements(&ctx, global, case)?;
        let mut disp = Displacement::default();
        for helper in helpers {
            for (dof, value) in helper.local_displacement_at(&ctx, &local, iso)? {
                disp.set(dof, disp.get(dof) + value);
            }
        }
        if matches!(self.kind, ElementKind::Frame(_)) {
            for load in self.case_loads(case) {
                disp = disp + load.displacement_at(&ctx, iso)?;
            }
        }
        Ok(disp)
    }

    /// Stress tensor at an isoparametric point, in the local frame
    pub fn stress_at(
        &self,
        nodes: &[Node],
        global: &[Displacement],
        iso: &[f64],
        case: &LoadCase,
    ) -> FEAResult<StressTensor> {
        let helpers = self.helpers_at(iso)?;
        let ctx = self.context(nodes)?;
        let local = self.local_displacements(&ctx, global, case)?;
        let mut stress = StressTensor::default();
        for helper in helpers {
            stress = stress + helper.local_stress_at(&ctx, &local, iso)?;
        }
        Ok(stress)
    }
}

/// Geometry of an element evaluated against the model's nodes
#[derive(Debug, Clone)]
pub struct ElementContext<'a> {
    pub element: &'a Element,
    /// Node locations in global coordinates
    pub locations: std::vec::Vec<Vec3>,
    /// Node locations in the local frame, relative to the first node
    pub local_locations: std::vec::Vec<Vec3>,
    /// Direction cosines, rows are the local axes in global coordinates
    pub lambda: Mat3,
}

impl<'a> ElementContext<'a> {
    /// Build the context of `element` with nodes at `locations`
    pub fn new(element: &'a Element, locations: std::vec::Vec<Vec3>) -> FEAResult<Self> {
        let expected = element.kind.node_count();
        if locations.len() != expected {
            return Err(FEAError::InvalidTopology(format!(
                "{} element '{}' needs {} nodes, got {}",
                element.kind.family_name(),
                element.label,
                expected,
                locations.len()
            )));
        }

        let lambda = match &element.kind {
            ElementKind::Frame(frame) => {
                frame_lambda(&locations[0], &locations[1], frame.web_rotation)?
            }
            ElementKind::Triangle(_) | ElementKind::Quad(_) => {
                triangle_lambda(&locations[0], &locations[1], &locations[2])?
            }
            ElementKind::Tetrahedron(_) => Mat3::identity(),
        };
        let local_locations = locations
            .iter()
            .map(|p| lambda * (p - locations[0]))
            .collect();

        Ok(Self {
            element,
            locations,
            local_locations,
            lambda,
        })
    }

    pub fn node_count(&self) -> usize {
        self.locations.len()
    }

    /// Distance between the first two nodes
    pub fn length(&self) -> f64 {
        (self.locations[1] - self.locations[0]).norm()
    }

    fn wrong_family(&self, expected: &str) -> FEAError {
        FEAError::InvalidInput(format!(
            "element '{}' is a {} element, not a {} element",
            self.element.label,
            self.element.kind.family_name(),
            expected
        ))
    }

    pub fn frame(&self) -> FEAResult<&'a FrameElement> {
        match &self.element.kind {
            ElementKind::Frame(frame) => Ok(frame),
            _ => Err(self.wrong_family("frame")),
        }
    }

    pub fn triangle(&self) -> FEAResult<&'a TriangleElement> {
        match &self.element.kind {
            ElementKind::Triangle(triangle) => Ok(triangle),
            _ => Err(self.wrong_family("triangle")),
        }
    }

    pub fn tetrahedron(&self) -> FEAResult<&'a TetrahedronElement> {
        match &self.element.kind {
            ElementKind::Tetrahedron(tetrahedron) => Ok(tetrahedron),
            _ => Err(self.wrong_family("tetrahedron")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::{LoadDirection, UniformLoad};
    use approx::assert_relative_eq;

    fn frame_element(frame: FrameElement) -> Element {
        let mut element = Element::frame("A", "B", frame);
        element.label = "M1".to_string();
        element
    }

    fn count_near_zero(k: &Mat, tol: f64) -> usize {
        let scale = k.amax();
        k.clone()
            .symmetric_eigen()
            .eigenvalues
            .iter()
            .filter(|v| v.abs() < tol * scale)
            .count()
    }

    #[test]
    fn test_frame_local_stiffness_terms() {
        let (e, a, iy, iz, j, l) = (200e9, 0.01, 2e-5, 8e-5, 1e-5, 4.0);
        let material = Material::isotropic(e, 0.3, 7850.0);
        let element = frame_element(FrameElement::uniform(material, Section::new(a, iy, iz, j)));
        let ctx = ElementContext::new(&element, vec![Vec3::zeros(), Vec3::new(l, 0.0, 0.0)]).unwrap();
        let k = element.local_stiffness(&ctx).unwrap();

        assert_relative_eq!(k[(0, 0)], e * a / l, max_relative = 1e-10);
        assert_relative_eq!(k[(0, 6)], -e * a / l, max_relative = 1e-10);
        assert_relative_eq!(k[(1, 1)], 12.0 * e * iz / l.powi(3), max_relative = 1e-10);
        assert_relative_eq!(k[(1, 5)], 6.0 * e * iz / l.powi(2), max_relative = 1e-10);
        assert_relative_eq!(k[(5, 11)], 2.0 * e * iz / l, max_relative = 1e-10);
        assert_relative_eq!(k[(2, 2)], 12.0 * e * iy / l.powi(3), max_relative = 1e-10);
        assert_relative_eq!(k[(2, 4)], -6.0 * e * iy / l.powi(2), max_relative = 1e-10);
        assert_relative_eq!(k[(4, 4)], 4.0 * e * iy / l, max_relative = 1e-10);
        assert_relative_eq!(k[(3, 3)], material.g * j / l, max_relative = 1e-10);
    }

    #[test]
    fn test_frame_rigid_body_modes() {
        let element = frame_element(FrameElement::uniform(Material::steel(), Section::rectangular(0.2, 0.4)));
        let ctx = ElementContext::new(
            &element,
            vec![Vec3::new(1.0, 2.0, 0.5), Vec3::new(4.0, 6.0, -1.5)],
        )
        .unwrap();
        let k = element.local_stiffness(&ctx).unwrap();
        let kg = element.to_global(&ctx, &k);

        assert_relative_eq!(kg.clone(), kg.transpose(), max_relative = 1e-9);
        assert_eq!(count_near_zero(&kg, 1e-10), 6);
    }

    #[test]
    fn test_tetrahedron_rigid_body_modes() {
        let mut element = Element::tetrahedron(["a", "b", "c", "d"], TetrahedronElement::uniform(Material::steel()));
        element.label = "T1".to_string();
        let ctx = ElementContext::new(
            &element,
            vec![
                Vec3::zeros(),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.2, 1.1, 0.0),
                Vec3::new(0.3, 0.4, 0.9),
            ],
        )
        .unwrap();
        let k = element.local_stiffness(&ctx).unwrap();

        // Translational DOFs only; the 12 rotation rows stay empty
        let dofs: std::vec::Vec<usize> = (0..4).flat_map(|n| (0..3).map(move |d| 6 * n + d)).collect();
        let kt = k.select_rows(&dofs).select_columns(&dofs);
        assert_eq!(count_near_zero(&kt, 1e-10), 6);
    }

    #[test]
    fn test_inverted_tetrahedron_is_rejected() {
        let element = Element::tetrahedron(["a", "b", "c", "d"], TetrahedronElement::uniform(Material::steel()));
        let ctx = ElementContext::new(
            &element,
            vec![
                Vec3::zeros(),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
        )
        .unwrap();
        assert!(matches!(
            element.local_stiffness(&ctx),
            Err(FEAError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_cst_stiffness_rows_sum_to_zero() {
        let element = Element::triangle(["a", "b", "c"], TriangleElement::uniform(Material::steel(), 0.01));
        let ctx = ElementContext::new(
            &element,
            vec![Vec3::zeros(), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.5, 1.5, 0.0)],
        )
        .unwrap();
        let k = element.local_stiffness(&ctx).unwrap();
        for i in 0..18 {
            let sum_x: f64 = (0..3).map(|n| k[(i, 6 * n)]).sum();
            let sum_y: f64 = (0..3).map(|n| k[(i, 6 * n + 1)]).sum();
            assert_relative_eq!(sum_x, 0.0, epsilon = 1e-3);
            assert_relative_eq!(sum_y, 0.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_drilling_triangle_has_no_mass() {
        let triangle = TriangleElement::uniform(Material::steel(), 0.01)
            .with_behaviour(TriangleBehaviour::MembraneWithDrilling);
        let element = Element::triangle(["a", "b", "c"], triangle);
        let ctx = ElementContext::new(
            &element,
            vec![Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
        )
        .unwrap();

        let k = element.local_stiffness(&ctx).unwrap();
        assert!(k[(5, 5)] > 0.0);

        let result = element.sum_helpers(&ctx, |h| h.local_mass(&ctx));
        assert!(matches!(result, Err(FEAError::UnsupportedOperation(_))));
    }

    #[test]
    fn test_truss_mass_matrix() {
        let (rho, a, l) = (7850.0, 0.01, 2.0);
        let material = Material::isotropic(200e9, 0.3, rho);
        let element = frame_element(
            FrameElement::uniform(material, Section::new(a, 1e-6, 1e-6, 1e-6))
                .with_behaviour(FrameBehaviour::TRUSS),
        );
        let ctx = ElementContext::new(&element, vec![Vec3::zeros(), Vec3::new(l, 0.0, 0.0)]).unwrap();
        let m = element.sum_helpers(&ctx, |h| h.local_mass(&ctx)).unwrap();

        let total = rho * a * l;
        assert_relative_eq!(m[(0, 0)], total / 3.0, max_relative = 1e-10);
        assert_relative_eq!(m[(0, 6)], total / 6.0, max_relative = 1e-10);
    }

    #[test]
    fn test_quad_is_unsupported() {
        let element = Element::quad(["a", "b", "c", "d"], QuadElement::uniform(Material::steel(), 0.01));
        let ctx = ElementContext::new(
            &element,
            vec![
                Vec3::zeros(),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
        )
        .unwrap();
        assert!(matches!(
            element.local_stiffness(&ctx),
            Err(FEAError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_wrong_node_count_is_rejected() {
        let element = Element::tetrahedron(["a", "b", "c", "d"], TetrahedronElement::uniform(Material::steel()));
        let result = ElementContext::new(&element, vec![Vec3::zeros(), Vec3::x()]);
        assert!(matches!(result, Err(FEAError::InvalidTopology(_))));
    }

    #[test]
    fn test_hinged_end_recovers_rotation() {
        // Propped cantilever: fixed at A, hinged member end at B on a roller
        let (e, iz, l, w) = (200e9, 1e-4, 5.0, -10e3);
        let frame = FrameElement::uniform(
            Material::isotropic(e, 0.3, 0.0),
            Section::new(0.01, 1e-4, iz, 1e-4),
        )
        .with_behaviour(FrameBehaviour::BEAM)
        .with_hinges(false, true);
        let mut element = frame_element(frame);
        let case = LoadCase::default();
        element
            .loads
            .push(UniformLoad::local(w, LoadDirection::Y, case.clone()).into());

        let ctx = ElementContext::new(&element, vec![Vec3::zeros(), Vec3::new(l, 0.0, 0.0)]).unwrap();
        let global = [Displacement::default(), Displacement::default()];
        let local = element.local_displacements(&ctx, &global, &case).unwrap();

        // End slope of a propped cantilever: -wL³/(48EI), upwards under a downward load
        assert_relative_eq!(local[1].rz, -w * l.powi(3) / (48.0 * e * iz), max_relative = 1e-9);
    }
}
