//! Benchmarks for the static solver

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fea_static::prelude::*;

fn create_cantilever_model() -> Model {
    let mut model = Model::new();

    model
        .add_node("N1", Node::new(0.0, 0.0, 0.0).with_constraints(Constraints::fixed()))
        .unwrap();
    model.add_node("N2", Node::new(10.0, 0.0, 0.0)).unwrap();

    let frame = FrameElement::uniform(Material::steel(), Section::rectangular(0.3, 0.5));
    model.add_element("M1", Element::frame("N1", "N2", frame)).unwrap();
    model
        .add_nodal_load("N2", NodalLoad::fy(-10000.0, LoadCase::default()))
        .unwrap();

    model
}

fn create_multi_story_frame(stories: usize, bays: usize, cases: &[LoadCase]) -> Model {
    let mut model = Model::new();

    let column = FrameElement::uniform(Material::steel(), Section::rectangular(0.4, 0.4));
    let beam = FrameElement::uniform(Material::steel(), Section::rectangular(0.3, 0.6));

    let story_height = 3.5;
    let bay_width = 6.0;

    for story in 0..=stories {
        for bay in 0..=bays {
            let x = bay as f64 * bay_width;
            let y = story as f64 * story_height;
            let mut node = Node::new(x, y, 0.0);
            if story == 0 {
                node = node.with_constraints(Constraints::fixed());
            }
            model.add_node(&format!("N{}_{}", story, bay), node).unwrap();
        }
    }

    for story in 0..stories {
        for bay in 0..=bays {
            let i_node = format!("N{}_{}", story, bay);
            let j_node = format!("N{}_{}", story + 1, bay);
            model
                .add_element(
                    &format!("Col{}_{}", story, bay),
                    Element::frame(&i_node, &j_node, column.clone()),
                )
                .unwrap();
        }
    }

    for story in 1..=stories {
        for bay in 0..bays {
            let label = format!("Beam{}_{}", story, bay);
            let i_node = format!("N{}_{}", story, bay);
            let j_node = format!("N{}_{}", story, bay + 1);
            model
                .add_element(&label, Element::frame(&i_node, &j_node, beam.clone()))
                .unwrap();
            for (k, case) in cases.iter().enumerate() {
                let w = -10000.0 * (k + 1) as f64;
                model
                    .add_element_load(&label, UniformLoad::global(w, LoadDirection::Y, case.clone()))
                    .unwrap();
            }
        }
    }

    model
}

fn benchmark_cantilever(c: &mut Criterion) {
    c.bench_function("cantilever_linear", |b| {
        b.iter(|| {
            let mut model = create_cantilever_model();
            model.solve().unwrap();
            black_box(&model);
        })
    });
}

fn benchmark_small_frame(c: &mut Criterion) {
    let cases = [LoadCase::dead()];
    c.bench_function("frame_3story_2bay_linear", |b| {
        b.iter(|| {
            let mut model = create_multi_story_frame(3, 2, &cases);
            model.solve_cases(&cases).unwrap();
            black_box(&model);
        })
    });
}

fn benchmark_medium_frame(c: &mut Criterion) {
    let cases = [LoadCase::dead()];
    c.bench_function("frame_10story_5bay_linear", |b| {
        b.iter(|| {
            let mut model = create_multi_story_frame(10, 5, &cases);
            model.solve_cases(&cases).unwrap();
            black_box(&model);
        })
    });
}

/// Eight load cases share one factorization
fn benchmark_many_load_cases(c: &mut Criterion) {
    let cases: Vec<LoadCase> = (0..8)
        .map(|i| LoadCase::new(&format!("Case {}", i), LoadType::Other))
        .collect();
    c.bench_function("frame_10story_5bay_8cases", |b| {
        b.iter(|| {
            let mut model = create_multi_story_frame(10, 5, &cases);
            model.solve_cases(&cases).unwrap();
            black_box(&model);
        })
    });
}

fn benchmark_orderings(c: &mut Criterion) {
    let cases = [LoadCase::dead()];
    let mut group = c.benchmark_group("ordering_10story_5bay");
    for ordering in [
        ColumnOrdering::Natural,
        ColumnOrdering::ReverseCuthillMcKee,
        ColumnOrdering::MinimumDegree,
    ] {
        let config = SolverConfiguration::new(&cases).with_ordering(ordering);
        group.bench_function(format!("{:?}", ordering), |b| {
            b.iter(|| {
                let mut model = create_multi_story_frame(10, 5, &cases);
                model.solve_with(&config).unwrap();
                black_box(&model);
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_cantilever,
    benchmark_small_frame,
    benchmark_medium_frame,
    benchmark_many_load_cases,
    benchmark_orderings,
);

criterion_main!(benches);
