use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use models::enums::{Department, Role, TrackGauge};
use service::auth::domain::{LoginInput, SessionUser};
use service::auth::repository::mock::MockAuthRepository;
use service::auth::AuthService;
use service::schedule::pattern::SchedulePattern;
use service::validation::{order_sections, validate_composition, PassengerCarSpec, RailcarSpec, SectionLink};

fn bench_order_sections(c: &mut Criterion) {
    // 500 sections in a line, requested back to front
    let found: Vec<SectionLink> = (0..500)
        .map(|i| SectionLink { id: i, track_gauge: TrackGauge::Standard, start_station_id: i, end_station_id: i + 1 })
        .collect();
    let requested: Vec<i32> = (0..500).rev().collect();

    c.bench_function("order_sections_500", |b| {
        b.iter(|| order_sections(black_box(&requested), black_box(&found)).unwrap());
    });
}

fn bench_composition(c: &mut Criterion) {
    let railcar = RailcarSpec { id: 0, track_gauge: TrackGauge::Metre, max_tractive_force: i32::MAX };
    let cars: Vec<PassengerCarSpec> = (1..=64)
        .map(|id| PassengerCarSpec { id, track_gauge: TrackGauge::Metre, max_weight: 1_000 })
        .collect();

    c.bench_function("validate_composition_64", |b| {
        b.iter(|| validate_composition(black_box(&railcar), black_box(&cars)).unwrap());
    });
}

fn bench_expand(c: &mut Criterion) {
    let pattern = SchedulePattern {
        start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        end_date: Some(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()),
        start_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        end_time: Some(NaiveTime::from_hms_opt(6, 45, 0).unwrap()),
        weekdays: vec![1, 2, 3, 4, 5],
        interval_minutes: Some(15),
    };

    c.bench_function("schedule_expand_year", |b| {
        b.iter(|| black_box(&pattern).expand().unwrap());
    });
}

fn bench_login(c: &mut Criterion) {
    let repo = Arc::new(MockAuthRepository::default());
    repo.insert(
        SessionUser {
            ssn: "1234010190".into(),
            username: "bench.user".into(),
            first_name: "Bench".into(),
            last_name: "User".into(),
            role: Role::Employee,
            department: Department::Crew,
        },
        "Benchmark1",
    )
    .unwrap();
    let svc = AuthService::new(repo, Duration::from_secs(600), 100_000);
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            let input = LoginInput { username: Some("bench.user".into()), password: Some("Benchmark1".into()) };
            rt.block_on(svc.login(input)).unwrap()
        });
    });
}

criterion_group!(benches, bench_order_sections, bench_composition, bench_expand, bench_login);
criterion_main!(benches);
