use criterion::{black_box, criterion_group, criterion_main, Criterion};
use treerules::{Matrix, PathRuleExtractor, Tree, TreeArrays};

/// Complete tree halving [0, 1) on alternating features, so every
/// leaf covers a cell of a regular grid.
fn complete_tree(depth: usize, n_features: usize) -> TreeArrays {
    let n_nodes = (1 << (depth + 1)) - 1;
    let mut arrays = TreeArrays {
        feature: vec![-2; n_nodes],
        threshold: vec![-2.0; n_nodes],
        children_left: vec![-1; n_nodes],
        children_right: vec![-1; n_nodes],
        value: vec![vec![0.0, 0.0]; n_nodes],
        classes: vec!["neg".to_string(), "pos".to_string()],
    };
    // Each stack entry is a node, its depth and the [lo, hi) cell per feature.
    let mut stack = vec![(0_usize, 0_usize, vec![(0.0_f64, 1.0_f64); n_features])];
    let mut next = 1;
    while let Some((idx, d, cell)) = stack.pop() {
        if d == depth {
            arrays.value[idx] = if idx % 2 == 0 { vec![1.0, 3.0] } else { vec![3.0, 1.0] };
            continue;
        }
        let f = d % n_features;
        let (lo, hi) = cell[f];
        let mid = (lo + hi) / 2.0;
        let (left, right) = (next, next + 1);
        next += 2;
        arrays.feature[idx] = f as i64;
        arrays.threshold[idx] = mid;
        arrays.children_left[idx] = left as i64;
        arrays.children_right[idx] = right as i64;
        let mut left_cell = cell.clone();
        left_cell[f] = (lo, mid);
        let mut right_cell = cell;
        right_cell[f] = (mid, hi);
        stack.push((left, d + 1, left_cell));
        stack.push((right, d + 1, right_cell));
    }
    arrays
}

pub fn extract_benchmarks(c: &mut Criterion) {
    let depth = 10;
    let n_features = 2;
    let tree = Tree::from_arrays(&complete_tree(depth, n_features)).unwrap();

    // A grid of 64 x 64 cell centres reaches all 1024 leaves.
    let side = 64;
    let mut data_vec = Vec::with_capacity(side * side * n_features);
    for f in 0..n_features {
        for i in 0..side * side {
            let k = if f == 0 { i / side } else { i % side };
            data_vec.push((k as f64 + 0.5) / side as f64);
        }
    }
    let data = Matrix::new(&data_vec, side * side, n_features);
    let feature_names = vec!["u".to_string(), "v".to_string()];

    let serial = PathRuleExtractor::new(feature_names.clone(), "label");
    let parallel = PathRuleExtractor::new(feature_names, "label").set_parallel(true);

    c.bench_function("apply", |b| b.iter(|| tree.apply(black_box(&data), false)));
    c.bench_function("extract rules", |b| {
        b.iter(|| serial.extract_rules(black_box(&tree), black_box(&data)).unwrap())
    });
    c.bench_function("extract rules parallel", |b| {
        b.iter(|| parallel.extract_rules(black_box(&tree), black_box(&data)).unwrap())
    });
}

criterion_group!(benches, extract_benchmarks);
criterion_main!(benches);
