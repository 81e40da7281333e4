//! Assembly, factorization reuse and support behaviour of the solver

use approx::assert_relative_eq;
use fea_static::math::Vec3;
use fea_static::prelude::*;

const E: f64 = 200e9;
const IZ: f64 = 8.0e-5;

fn steel_frame() -> FrameElement {
    FrameElement::uniform(
        Material::isotropic(E, 0.3, 7850.0),
        Section::new(0.01, 6.0e-5, IZ, 2.0e-5),
    )
}

/// Three-legged space frame loaded in two cases
fn space_frame() -> (Model, LoadCase, LoadCase) {
    let mut model = Model::new();
    let base = [("B1", 0.0, 0.0), ("B2", 4.0, 0.0), ("B3", 0.0, 3.0)];
    for (label, x, z) in base {
        model
            .add_node(label, Node::new(x, 0.0, z).with_constraints(Constraints::fixed()))
            .unwrap();
    }
    for (label, x, z) in [("T1", 0.0, 0.0), ("T2", 4.0, 0.0), ("T3", 0.0, 3.0)] {
        model.add_node(label, Node::new(x, 3.0, z)).unwrap();
    }

    let frame = steel_frame();
    for (label, i, j) in [
        ("C1", "B1", "T1"),
        ("C2", "B2", "T2"),
        ("C3", "B3", "T3"),
        ("G12", "T1", "T2"),
        ("G13", "T1", "T3"),
        ("G23", "T2", "T3"),
    ] {
        model
            .add_element(label, Element::frame(i, j, frame.clone()))
            .unwrap();
    }

    let dead = LoadCase::dead();
    let wind = LoadCase::wind();
    model
        .add_nodal_load("T2", NodalLoad::force(1000.0, 0.0, -500.0, dead.clone()))
        .unwrap();
    model
        .add_element_load("G12", UniformLoad::global(-5000.0, LoadDirection::Y, dead.clone()))
        .unwrap();
    model
        .add_element_load(
            "G13",
            ConcentratedLoad::new(2000.0, 0.0, 0.0, 1.0, CoordinationSystem::Global, dead.clone()),
        )
        .unwrap();
    model
        .add_nodal_load("T3", NodalLoad::force(0.0, 0.0, 8000.0, wind.clone()))
        .unwrap();
    model
        .add_element_load("C1", UniformLoad::global(1500.0, LoadDirection::Z, wind.clone()))
        .unwrap();

    (model, dead, wind)
}

fn total_reaction(model: &Model, case: &LoadCase) -> Vec3 {
    ["B1", "B2", "B3"]
        .iter()
        .map(|label| model.node_reaction(label, case).unwrap().force())
        .sum()
}

#[test]
fn fully_restrained_model_has_no_unknowns() {
    let mut model = Model::new();
    model
        .add_node("A", Node::new(0.0, 0.0, 0.0).with_constraints(Constraints::fixed()))
        .unwrap();
    model
        .add_node("B", Node::new(2.0, 0.0, 0.0).with_constraints(Constraints::fixed()))
        .unwrap();
    model
        .add_element("M", Element::frame("A", "B", steel_frame()))
        .unwrap();
    model.solve().unwrap();

    let case = LoadCase::default();
    let summary = model.summary().unwrap();
    assert_eq!(summary.free_dofs, 0);
    assert_eq!(summary.fixed_dofs, 12);
    assert_eq!(model.node_displacement("B", &case).unwrap(), Displacement::default());
    assert_eq!(model.node_reaction("A", &case).unwrap(), Force::default());
}

#[test]
fn reactions_balance_applied_loads() {
    let (mut model, dead, wind) = space_frame();
    model.solve_cases(&[dead.clone(), wind.clone()]).unwrap();

    let dead_total = total_reaction(&model, &dead);
    assert_relative_eq!(dead_total.x, -3000.0, max_relative = 1e-9);
    assert_relative_eq!(dead_total.y, 20000.0, max_relative = 1e-9);
    assert_relative_eq!(dead_total.z, 500.0, max_relative = 1e-9);

    let wind_total = total_reaction(&model, &wind);
    assert_relative_eq!(wind_total.x, 0.0, epsilon = 1e-6);
    assert_relative_eq!(wind_total.y, 0.0, epsilon = 1e-6);
    assert_relative_eq!(wind_total.z, -8000.0 - 1500.0 * 3.0, max_relative = 1e-9);
}

#[test]
fn one_factorization_serves_every_load_case() {
    let (mut model, dead, wind) = space_frame();
    let cases: std::vec::Vec<LoadCase> = [dead, wind]
        .into_iter()
        .chain((0..4).map(|i| LoadCase::new(&format!("Extra {}", i), LoadType::Other)))
        .collect();

    model.solve_cases(&cases).unwrap();
    assert_eq!(model.factorization_count(), 1);
    assert_eq!(model.summary().unwrap().load_cases.len(), cases.len());

    model.solve_cases(&cases[..1]).unwrap();
    assert_eq!(model.factorization_count(), 2);
    assert_eq!(model.summary().unwrap().factorizations, 2);
}

#[test]
fn repeated_solves_are_bitwise_identical() {
    let (mut model, dead, wind) = space_frame();

    model.solve_cases(&[dead.clone()]).unwrap();
    let first = model.last_result().unwrap().displacement_vector(&dead).unwrap();

    model.solve_cases(&[dead.clone(), wind.clone()]).unwrap();
    let second = model.last_result().unwrap().displacement_vector(&dead).unwrap();

    assert_eq!(first, second);
}

#[test]
fn unsolved_case_is_reported() {
    let (mut model, dead, wind) = space_frame();
    model.solve_cases(&[dead]).unwrap();

    assert!(matches!(
        model.node_displacement("T1", &wind),
        Err(FEAError::LoadCaseNotFound(_))
    ));
}

#[test]
fn shared_node_collects_stiffness_of_both_elements() {
    let (l1, l2, a): (f64, f64, f64) = (2.0, 3.0, 0.01);
    let truss = FrameElement::uniform(
        Material::isotropic(E, 0.3, 7850.0),
        Section::new(a, 1e-6, 1e-6, 1e-6),
    )
    .with_behaviour(FrameBehaviour::TRUSS);

    let mut model = Model::new();
    model.add_node("A", Node::new(0.0, 0.0, 0.0)).unwrap();
    model.add_node("B", Node::new(l1, 0.0, 0.0)).unwrap();
    model.add_node("C", Node::new(l1 + l2, 0.0, 0.0)).unwrap();
    model.add_element("AB", Element::frame("A", "B", truss.clone())).unwrap();
    model.add_element("BC", Element::frame("B", "C", truss)).unwrap();

    let k = model.global_stiffness().unwrap();
    let entry = |i: usize, j: usize| k.get_entry(i, j).map_or(0.0, |e| e.into_value());

    // DX of node B is global DOF 6
    assert_relative_eq!(entry(6, 6), E * a / l1 + E * a / l2, max_relative = 1e-12);
    assert_relative_eq!(entry(0, 6), -E * a / l1, max_relative = 1e-12);
    assert_relative_eq!(entry(6, 12), -E * a / l2, max_relative = 1e-12);
    assert_eq!(entry(0, 12), 0.0);
}

#[test]
fn free_dof_without_stiffness_names_the_node() {
    let truss = steel_frame().with_behaviour(FrameBehaviour::TRUSS);
    let mut model = Model::new();
    model
        .add_node("Support", Node::new(0.0, 0.0, 0.0).with_constraints(Constraints::fixed()))
        .unwrap();
    model.add_node("Tip", Node::new(1.0, 0.0, 0.0)).unwrap();
    model.add_element("Bar", Element::frame("Support", "Tip", truss)).unwrap();

    let err = model.solve().unwrap_err();
    assert!(matches!(err, FEAError::NonPositiveDefinite(_)));
    assert!(err.to_string().contains("Tip"));
    assert!(!model.is_analyzed());
    assert_eq!(model.factorization_count(), 0);
}

#[test]
fn unsupported_element_fails_the_solve() {
    let (mut model, dead, _) = space_frame();
    model.solve_cases(&[dead.clone()]).unwrap();

    model
        .add_element(
            "Slab",
            Element::quad(
                ["T1", "T2", "T3", "B3"],
                QuadElement::uniform(Material::steel(), 0.2),
            ),
        )
        .unwrap();
    assert!(!model.is_analyzed());

    let err = model.solve_cases(&[dead]).unwrap_err();
    assert!(matches!(err, FEAError::UnsupportedOperation(_)));
    assert!(!model.is_analyzed());
    assert_eq!(model.factorization_count(), 1);
}

#[test]
fn orderings_agree() {
    let (mut model, dead, _) = space_frame();
    let mut solutions = std::vec::Vec::new();
    for ordering in [
        ColumnOrdering::Natural,
        ColumnOrdering::ReverseCuthillMcKee,
        ColumnOrdering::MinimumDegree,
    ] {
        let config = SolverConfiguration::new(&[dead.clone()]).with_ordering(ordering);
        model.solve_with(&config).unwrap();
        solutions.push(model.last_result().unwrap().displacement_vector(&dead).unwrap());
    }

    let scale = solutions[0].amax();
    for other in &solutions[1..] {
        for (a, b) in solutions[0].iter().zip(other.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9 * scale);
        }
    }
}

fn settled_beam(settlement_case: LoadCase) -> Model {
    let mut model = Model::new();
    model
        .add_node("N1", Node::new(0.0, 0.0, 0.0).with_constraints(Constraints::fixed()))
        .unwrap();
    model
        .add_node("N2", Node::new(5.0, 0.0, 0.0).with_constraints(Constraints::fixed()))
        .unwrap();
    model
        .add_element("M1", Element::frame("N1", "N2", steel_frame()))
        .unwrap();

    let drop = Displacement {
        dy: -0.01,
        ..Default::default()
    };
    model
        .add_settlement("N2", Settlement::new(drop, settlement_case))
        .unwrap();
    model
}

#[test]
fn settlement_of_a_fixed_end() {
    let (l, delta): (f64, f64) = (5.0, -0.01);
    let settlement = LoadCase::settlement();
    let case = LoadCase::default();
    let mut model = settled_beam(settlement.clone());
    let config = SolverConfiguration::new(&[case.clone()]).with_settlements(settlement);
    model.solve_with(&config).unwrap();

    assert_relative_eq!(model.node_displacement("N2", &case).unwrap().dy, delta);

    let start = model.node_reaction("N1", &case).unwrap();
    let end = model.node_reaction("N2", &case).unwrap();
    let shear = 12.0 * E * IZ * delta / l.powi(3);
    let moment = 6.0 * E * IZ * delta / l.powi(2);
    assert_relative_eq!(start.fy, -shear, max_relative = 1e-9);
    assert_relative_eq!(end.fy, shear, max_relative = 1e-9);
    assert_relative_eq!(start.mz, -moment, max_relative = 1e-9);
    assert_relative_eq!(end.mz, -moment, max_relative = 1e-9);
}

#[test]
fn settlement_needs_its_case_configured() {
    let case = LoadCase::default();
    let mut model = settled_beam(LoadCase::settlement());
    model.solve_cases(&[case.clone()]).unwrap();

    assert_eq!(model.node_displacement("N2", &case).unwrap().dy, 0.0);
    assert_eq!(model.node_reaction("N1", &case).unwrap(), Force::default());
    assert!(model.last_result().unwrap().settlements_case().is_none());
}

#[test]
fn failed_load_assembly_does_not_count_a_factorization() {
    let (mut model, dead, _) = space_frame();
    model.solve_cases(&[dead.clone()]).unwrap();
    assert_eq!(model.factorization_count(), 1);

    // G13 is 3 m long
    model
        .add_element_load(
            "G13",
            ConcentratedLoad::new(0.0, -1e3, 0.0, 4.5, CoordinationSystem::Global, dead.clone()),
        )
        .unwrap();
    let err = model.solve_cases(&[dead]).unwrap_err();
    assert!(matches!(err, FEAError::InvalidInput(_)));
    assert!(!model.is_analyzed());
    assert_eq!(model.factorization_count(), 1);
}

#[test]
fn settled_support_drags_the_interior_node() {
    let (l, delta): (f64, f64) = (6.0, -0.012);
    let mut model = Model::new();
    model
        .add_node("A", Node::new(0.0, 0.0, 0.0).with_constraints(Constraints::fixed()))
        .unwrap();
    model.add_node("B", Node::new(l / 2.0, 0.0, 0.0)).unwrap();
    model
        .add_node("C", Node::new(l, 0.0, 0.0).with_constraints(Constraints::fixed()))
        .unwrap();
    model
        .add_element("AB", Element::frame("A", "B", steel_frame()))
        .unwrap();
    model
        .add_element("BC", Element::frame("B", "C", steel_frame()))
        .unwrap();

    let settlement = LoadCase::settlement();
    let drop = Displacement {
        dy: delta,
        ..Default::default()
    };
    model
        .add_settlement("C", Settlement::new(drop, settlement.clone()))
        .unwrap();

    let case = LoadCase::default();
    let config = SolverConfiguration::new(&[case.clone()]).with_settlements(settlement);
    model.solve_with(&config).unwrap();

    // Cubic v(x) = δ (3x²/L² - 2x³/L³) between the clamped ends
    let b = model.node_displacement("B", &case).unwrap();
    assert_relative_eq!(b.dy, delta / 2.0, max_relative = 1e-9);
    assert_relative_eq!(b.rz, 1.5 * delta / l, max_relative = 1e-9);
    assert_relative_eq!(b.dx, 0.0, epsilon = 1e-12);

    let start = model.node_reaction("A", &case).unwrap();
    let end = model.node_reaction("C", &case).unwrap();
    assert_relative_eq!(start.fy, -end.fy, max_relative = 1e-9);
    assert_relative_eq!(start.fy, -12.0 * E * IZ * delta / l.powi(3), max_relative = 1e-9);
}

#[test]
fn unloaded_cantilever_stays_put() {
    let mut model = Model::new();
    model
        .add_node("Root", Node::new(0.0, 0.0, 0.0).with_constraints(Constraints::fixed()))
        .unwrap();
    model.add_node("Tip", Node::new(3.0, 1.0, -2.0)).unwrap();
    model
        .add_element("M", Element::frame("Root", "Tip", steel_frame()))
        .unwrap();
    model.solve().unwrap();

    let case = LoadCase::default();
    assert_eq!(model.node_displacement("Tip", &case).unwrap(), Displacement::default());
    assert_eq!(model.node_reaction("Root", &case).unwrap(), Force::default());
    let force = model.element_internal_force_at("M", &[0.3], &case).unwrap();
    assert_eq!(force, Force::default());
}

#[test]
fn element_mass_and_damping_matrices() {
    let (rho, mu, a, l): (f64, f64, f64, f64) = (7850.0, 120.0, 0.01, 2.5);
    let material = Material::isotropic(E, 0.3, rho).with_damping(mu);
    let mut model = Model::new();
    for (label, x, y) in [("A", 0.0, 0.0), ("B", l, 0.0), ("C", l, l), ("D", 0.0, l)] {
        model.add_node(label, Node::new(x, y, 0.0)).unwrap();
    }
    let frame = FrameElement::uniform(material, Section::new(a, 6.0e-5, IZ, 2.0e-5));
    model.add_element("Beam", Element::frame("A", "B", frame)).unwrap();
    let drilling = TriangleElement::uniform(material, 0.01)
        .with_behaviour(TriangleBehaviour::MembraneWithDrilling);
    model
        .add_element("Plate", Element::triangle(["A", "B", "C"], drilling))
        .unwrap();
    let slab = QuadElement::uniform(material, 0.2);
    model
        .add_element("Slab", Element::quad(["A", "B", "C", "D"], slab))
        .unwrap();

    let beam = model.element("Beam").unwrap();
    let m = beam.global_mass(model.nodes()).unwrap();
    let c = beam.global_damping(model.nodes()).unwrap();
    assert_eq!(m.shape(), (12, 12));
    assert_relative_eq!(m.clone(), m.transpose(), epsilon = 1e-12 * m.amax());
    // Consistent axial and transverse terms
    assert_relative_eq!(m[(0, 0)], rho * a * l / 3.0, max_relative = 1e-10);
    assert_relative_eq!(m[(0, 6)], rho * a * l / 6.0, max_relative = 1e-10);
    assert_relative_eq!(m[(1, 1)], 13.0 * rho * a * l / 35.0, max_relative = 1e-10);
    assert_relative_eq!(c[(0, 0)], mu * a * l / 3.0, max_relative = 1e-10);
    assert_relative_eq!(c[(1, 1)], 13.0 * mu * a * l / 35.0, max_relative = 1e-10);

    for label in ["Plate", "Slab"] {
        let element = model.element(label).unwrap();
        assert!(matches!(
            element.global_mass(model.nodes()),
            Err(FEAError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            element.global_damping(model.nodes()),
            Err(FEAError::UnsupportedOperation(_))
        ));
    }
}

#[test]
fn editing_a_node_discards_the_result() {
    let (mut model, dead, _) = space_frame();
    model.solve_cases(&[dead.clone()]).unwrap();
    assert!(model.node_displacement("T2", &dead).unwrap().dx.abs() > 0.0);

    model.node_mut("T2").unwrap().constraints = Constraints::fixed();
    assert!(!model.is_analyzed());

    model.solve_cases(&[dead.clone()]).unwrap();
    assert_eq!(model.node_displacement("T2", &dead).unwrap(), Displacement::default());
    assert!(model.node_reaction("T2", &dead).unwrap().fx.abs() > 0.0);
}
