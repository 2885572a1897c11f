use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use steptree::{AnyTree, SearchTree, TreeConfig, TreeKind};

/// Helper to bench a function on a tree.
/// It creates a group for the given name and closure and runs it for various sizes and
/// kinds of trees before finishing the group. The closure gets the largest value in the tree.
fn bench_helper(c: &mut Criterion, name: &str, f: impl Fn(&AnyTree<i32>, i32) -> usize) {
    let mut group = c.benchmark_group(name);

    for num_levels in [3, 7, 11, 15] {
        let num_nodes = 2i32.pow(num_levels) - 1;
        let largest_element_in_tree = num_nodes - 1;

        for kind in TreeKind::ALL {
            let config = TreeConfig::new().with_kind(kind).with_degree(3);
            let Ok(empty) = AnyTree::new(&config) else {
                continue;
            };
            // Scrambled so the unbalanced tree doesn't degenerate into a list.
            let tree = (0..num_nodes).fold(empty, |tree, x| {
                tree.add((x * 7919) % num_nodes)
            });

            let id = BenchmarkId::new(kind.name(), largest_element_in_tree);
            group.bench_function(id, |b| {
                b.iter(|| f(black_box(&tree), black_box(largest_element_in_tree)))
            });
        }
    }

    group.finish();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_helper(c, "add-with-steps", |tree, i| {
        tree.add_with_steps(i + 1).len()
    });
    bench_helper(c, "remove-with-steps", |tree, i| {
        tree.remove_with_steps(&i).len()
    });
    bench_helper(c, "remove-miss", |tree, i| {
        tree.remove_with_steps(&(i + 1)).len()
    });
    bench_helper(c, "contains", |tree, i| usize::from(tree.contains(&i)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
