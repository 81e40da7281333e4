//! FEA Static Example - Simple Portal Frame
//!
//! Run with `RUST_LOG=debug` to see the phase timings of the solver.

use anyhow::Result;
use fea_static::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== FEA Static Example: Portal Frame ===\n");

    let mut model = Model::new();

    // W12x26 section (approximate properties, metric)
    let frame = FrameElement::uniform(
        Material::steel(),
        Section::new(0.00494, 8.49e-5, 7.2e-6, 1.25e-7),
    );

    //     N3 -------- N4
    //     |          |
    //     |          |
    //     N1        N2
    //   Fixed     Fixed
    let height = 4.0;
    let span = 6.0;

    model.add_node("N1", Node::new(0.0, 0.0, 0.0).with_constraints(Constraints::fixed()))?;
    model.add_node("N2", Node::new(span, 0.0, 0.0).with_constraints(Constraints::fixed()))?;
    model.add_node("N3", Node::new(0.0, height, 0.0))?;
    model.add_node("N4", Node::new(span, height, 0.0))?;

    model.add_element("Col1", Element::frame("N1", "N3", frame.clone()))?;
    model.add_element("Col2", Element::frame("N2", "N4", frame.clone()))?;
    model.add_element("Beam", Element::frame("N3", "N4", frame))?;

    // Dead load: 20 kN/m downward on the beam
    let dead = LoadCase::dead();
    model.add_element_load(
        "Beam",
        UniformLoad::global(-20000.0, LoadDirection::Y, dead.clone()),
    )?;

    // Wind: 10 kN at roof level and 5 kN at midspan of the left column
    let wind = LoadCase::wind();
    model.add_nodal_load("N3", NodalLoad::force(10000.0, 0.0, 0.0, wind.clone()))?;
    model.add_element_load(
        "Col1",
        ConcentratedLoad::new(5000.0, 0.0, 0.0, height / 2.0, CoordinationSystem::Global, wind.clone()),
    )?;

    println!("Running linear analysis...\n");
    model.solve_cases(&[dead.clone(), wind.clone()])?;

    for case in [&dead, &wind] {
        println!("=== Results for {} ===\n", case);

        println!("Node Displacements:");
        for node in ["N1", "N2", "N3", "N4"] {
            let disp = model.node_displacement(node, case)?;
            println!(
                "  {}: DX={:.4}mm, DY={:.4}mm, RZ={:.6}rad",
                node,
                disp.dx * 1000.0,
                disp.dy * 1000.0,
                disp.rz
            );
        }

        println!("\nSupport Reactions:");
        for node in ["N1", "N2"] {
            let rxn = model.node_reaction(node, case)?;
            println!(
                "  {}: FX={:.2}kN, FY={:.2}kN, MZ={:.2}kN·m",
                node,
                rxn.fx / 1000.0,
                rxn.fy / 1000.0,
                rxn.mz / 1000.0
            );
        }

        println!("\nMember Forces (local, start / middle / end):");
        for member in ["Col1", "Col2", "Beam"] {
            let forces = [-1.0, 0.0, 1.0]
                .iter()
                .map(|&xi| model.element_internal_force_at(member, &[xi], case))
                .collect::<FEAResult<Vec<_>>>()?;
            println!(
                "  {}: N={:.2}kN, Vy={:.2}/{:.2}/{:.2}kN, Mz={:.2}/{:.2}/{:.2}kN·m",
                member,
                forces[0].fx / 1000.0,
                forces[0].fy / 1000.0,
                forces[1].fy / 1000.0,
                forces[2].fy / 1000.0,
                forces[0].mz / 1000.0,
                forces[1].mz / 1000.0,
                forces[2].mz / 1000.0
            );
        }
        println!();
    }

    let summary = model.summary()?;
    println!("Summary:");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    println!("\n=== Analysis Complete ===");
    Ok(())
}
