use criterion::{criterion_group, criterion_main, Criterion};

use rota::{
    model::Model,
    problems::rostering::{Roster, RosterConfig},
};

fn permutation_enumeration(c: &mut Criterion) {
    c.bench_function("enumerate_5x5_permutations", |b| {
        b.iter(|| {
            let mut model = Model::new();
            let vars: Vec<_> = (0..5)
                .map(|i| model.new_var(0, 4, format!("v{i}")).unwrap())
                .collect();
            model.post_all_different(&vars).unwrap();
            let (solutions, _) = model.solve_all(&vars).unwrap();
            assert_eq!(solutions.count(), 120);
        })
    });
}

fn rostering_first_solution(c: &mut Criterion) {
    let roster = Roster::build(RosterConfig::default()).unwrap();
    c.bench_function("rostering_first_solution", |b| {
        b.iter(|| {
            let (solutions, _) = roster.solve_first().unwrap();
            assert_eq!(solutions.count(), 1);
        })
    });
}

criterion_group!(benches, permutation_enumeration, rostering_first_solution);
criterion_main!(benches);
