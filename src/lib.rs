//! FEA Static - a static linear finite element analysis engine
//!
//! Elements are composed from small formulations ("helpers"): axial bars,
//! Euler-Bernoulli bending, torsion, linear tetrahedra and membrane
//! triangles. The model assembles the global stiffness in sparse form,
//! splits it by free and fixed DOFs, factorizes the free-free block once
//! with a sparse Cholesky decomposition and reuses the factor for every
//! load case.
//!
//! ## Example
//! ```rust
//! use fea_static::prelude::*;
//!
//! let mut model = Model::new();
//!
//! model
//!     .add_node("N1", Node::new(0.0, 0.0, 0.0).with_constraints(Constraints::fixed()))
//!     .unwrap();
//! model.add_node("N2", Node::new(10.0, 0.0, 0.0)).unwrap();
//!
//! let frame = FrameElement::uniform(
//!     Material::new(200e9, 77e9, 0.3, 7850.0),
//!     Section::new(7.65e-3, 204e-6, 17.3e-6, 0.3e-6),
//! );
//! model.add_element("M1", Element::frame("N1", "N2", frame)).unwrap();
//!
//! let dead = LoadCase::dead();
//! model
//!     .add_nodal_load("N2", NodalLoad::force(0.0, -10000.0, 0.0, dead.clone()))
//!     .unwrap();
//!
//! model.solve_cases(&[dead.clone()]).unwrap();
//! let displacement = model.node_displacement("N2", &dead).unwrap();
//! assert!(displacement.dy < 0.0);
//! ```

pub mod analysis;
pub mod elements;
pub mod error;
pub mod helpers;
pub mod loads;
pub mod math;
pub mod model;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{AnalysisResult, SolverConfiguration};
    pub use crate::elements::{
        BendingAxis, Constraints, Dof, DofConstraint, Element, ElementKind, FrameBehaviour,
        FrameElement, Material, MaterialProvider, Node, QuadElement, Section, SectionProvider,
        TetrahedronElement, TriangleBehaviour, TriangleElement,
    };
    pub use crate::error::{FEAError, FEAResult};
    pub use crate::loads::{
        ConcentratedLoad, CoordinationSystem, ElementLoad, LoadCase, LoadDirection, LoadType,
        NodalLoad, Settlement, UniformLoad,
    };
    pub use crate::math::ColumnOrdering;
    pub use crate::model::Model;
    pub use crate::results::{AnalysisSummary, Displacement, Force, StressTensor};
}
