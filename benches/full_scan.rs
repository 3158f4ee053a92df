use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fathom::{Engine, EngineConfig};
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;

/// A Python project where every third module imports `auth` and the rest
/// only mention it in a string.
fn create_test_repo(file_count: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    std::fs::create_dir_all(root.join("pkg")).unwrap();
    std::fs::write(
        root.join("pkg/auth.py"),
        "def login(user):\n    return user\n\nclass Session:\n    pass\n",
    )
    .unwrap();

    for i in 0..file_count {
        let header = if i % 3 == 0 {
            "from pkg.auth import login, Session\n"
        } else {
            "LABEL = \"auth disabled\"\n"
        };
        let content = format!(
            r#"{header}
def handler_{i}(request):
    user = request.user
    session = login(user)
    return session


class View{i}:
    def get(self):
        return handler_{i}(self)
"#
        );

        let path = if i % 2 == 0 {
            root.join("pkg").join(format!("mod_{}.py", i))
        } else {
            root.join(format!("file_{}.py", i))
        };

        let mut file = File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    temp_dir
}

fn full_scan_benchmark(c: &mut Criterion) {
    let engine = Engine::new(EngineConfig::default()).unwrap();

    let mut group = c.benchmark_group("analyze_impact");
    group.sample_size(20);

    for count in [10, 100, 500] {
        let repo = create_test_repo(count);
        let target = repo.path().join("pkg/auth.py");
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let _ = engine.analyze_impact(&target, repo.path(), Some("rename login"));
            })
        });
    }

    group.finish();
}

criterion_group!(benches, full_scan_benchmark);
criterion_main!(benches);
