use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use seat_booking::{BookingConfig, BookingCoordinator, Discipline, SeatRegistry};

fn benchmark_pessimistic_booking(c: &mut Criterion) {
    c.bench_function("registry_book_pessimistic_40", |b| {
        b.iter(|| {
            let registry = SeatRegistry::new(40).unwrap();
            for seat_id in 1..=40 {
                black_box(registry.book_pessimistic(seat_id).unwrap());
            }
        })
    });
}

fn benchmark_optimistic_booking(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    c.bench_function("registry_book_optimistic_40", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let registry = SeatRegistry::new(40).unwrap();
                for seat_id in 1..=40 {
                    black_box(registry.book_optimistic(seat_id, 3).await.unwrap());
                }
            })
        })
    });
}

fn benchmark_contended_workload(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("coordinator_contended_workload");

    for discipline in [Discipline::Pessimistic, Discipline::Optimistic] {
        group.bench_with_input(
            BenchmarkId::from_parameter(discipline),
            &discipline,
            |b, &discipline| {
                b.iter(|| {
                    runtime.block_on(async {
                        let mut config = BookingConfig::for_testing(40, 8);
                        config.booking.discipline = discipline;
                        let coordinator = BookingCoordinator::new(config).unwrap();
                        coordinator.start().unwrap();
                        for round in 0..4 {
                            for seat_id in 1..=40 {
                                coordinator.enqueue(format!("user-{round}"), seat_id).unwrap();
                            }
                        }
                        coordinator.shutdown().await.unwrap();
                        black_box(coordinator.metrics_snapshot())
                    })
                })
            },
        );
    }

    group.finish();
}

fn benchmark_snapshot(c: &mut Criterion) {
    let registry = SeatRegistry::new(1_000).unwrap();
    c.bench_function("registry_snapshot_1000", |b| b.iter(|| black_box(registry.snapshot())));
}

criterion_group!(
    benches,
    benchmark_pessimistic_booking,
    benchmark_optimistic_booking,
    benchmark_contended_workload,
    benchmark_snapshot
);
criterion_main!(benches);
