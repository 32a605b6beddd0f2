use criterion::{criterion_group, criterion_main, Criterion};

use service::auth::CredentialHasher;
use service::domain::UserInput;
use service::file::FileUserStore;
use service::UserService;

fn bench_authenticate(c: &mut Criterion) {
    let path = std::env::temp_dir().join(format!("auth_bench_{}.json", uuid::Uuid::new_v4()));

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    let svc = rt.block_on(async {
        let store = FileUserStore::new(&path).await.unwrap();
        let svc = UserService::new(store, CredentialHasher::default());
        svc.create(UserInput { email: "bench@example.com".into(), password: "Benchmark1".into() })
            .await
            .unwrap();
        svc
    });

    c.bench_function("user_authenticate", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.authenticate("bench@example.com", "Benchmark1")).unwrap();
        });
    });

    let _ = std::fs::remove_file(&path);
}

criterion_group!(benches, bench_authenticate);
criterion_main!(benches);
