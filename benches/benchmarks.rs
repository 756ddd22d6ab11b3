use asset_constgen::ident::sanitize_identifier;
use asset_constgen::render::SourceFile;
use asset_constgen::tree::ClassNode;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sample_paths(count: usize) -> Vec<String> {
    let folders = ["Audio/Sfx", "Audio/Music", "UI/Icons", "UI/Panels [HD]", "Props", "Fx/Hit & Spark"];
    let mut paths: Vec<String> = (0..count)
        .map(|i| format!("{}/asset-{:04}.v{}", folders[i % folders.len()], i, i % 3))
        .collect();
    paths.sort();
    paths
}

fn benchmark_tree_build(c: &mut Criterion) {
    let paths = sample_paths(5_000);

    c.bench_function("build_tree_5000_paths", |b| {
        b.iter(|| {
            let mut root = ClassNode::new("ResourcesConstants");
            for path in &paths {
                let leaf = sanitize_identifier(path.rsplit('/').next().unwrap_or(path));
                root.insert_path(path, &leaf);
            }
            black_box(root.constant_count())
        });
    });
}

fn benchmark_render(c: &mut Criterion) {
    let mut root = ClassNode::new("ResourcesConstants");
    for path in sample_paths(5_000) {
        let leaf = sanitize_identifier(path.rsplit('/').next().unwrap_or(&path));
        root.insert_path(&path, &leaf);
    }

    c.bench_function("render_5000_constants", |b| {
        b.iter(|| black_box(SourceFile::new(&root).render()));
    });
}

criterion_group!(benches, benchmark_tree_build, benchmark_render);
criterion_main!(benches);
