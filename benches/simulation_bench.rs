//! Performance benchmarks for the lasersim simulator.
//!
//! Run with: `cargo bench`
//! Or for specific bench: `cargo bench --bench simulation_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use num_complex::Complex64;

use lasersim::component::shared;
use lasersim::constants::LaserConstants;
use lasersim::devices::{
    AsymmetricMachZehnderInterferometer, CurrentDriver, DelayLine, Laser, SinglePhotonDetector,
    TimeProbe,
};
use lasersim::{Clock, Connection, SharedComponent, Simulator};

const DT: f64 = 1.0e-13;

fn clock(ticks: u64) -> Clock {
    let mut clock = Clock::new(DT).unwrap();
    clock.configure(ticks as f64 * DT, None).unwrap();
    clock
}

// ============================================================================
// Scheduler Benchmarks
// ============================================================================

fn bench_probe_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("probe_chain");

    for length in [1usize, 10, 100].iter() {
        group.throughput(Throughput::Elements(*length as u64));
        group.bench_with_input(BenchmarkId::new("probes", length), length, |b, &length| {
            let probes: Vec<SharedComponent> = (0..length)
                .map(|i| shared(TimeProbe::new(format!("p{i}"), false)) as SharedComponent)
                .collect();

            let mut connections = vec![Connection::source(vec![probes[0].clone()]).unwrap()];
            for pair in probes.windows(2) {
                connections.push(Connection::new(vec![pair[0].clone()], vec![pair[1].clone()]).unwrap());
            }

            let mut sim = Simulator::new(clock(100));
            sim.set(connections);

            b.iter(|| {
                sim.reset(true);
                black_box(sim.simulate());
            });
        });
    }

    group.finish();
}

// ============================================================================
// Laser Benchmarks
// ============================================================================

fn bench_laser_step(c: &mut Criterion) {
    let constants = LaserConstants::default();
    let current = 1.5 * constants.threshold_current();

    c.bench_function("laser_step", |b| {
        let mut laser = Laser::new("laser", constants);
        let mut t = 0.0;
        b.iter(|| {
            laser.step(black_box(current), None, t, DT);
            t += DT;
        });
    });
}

fn bench_driven_laser(c: &mut Criterion) {
    let mut group = c.benchmark_group("driven_laser");
    let constants = LaserConstants::default();

    for ticks in [1_000u64, 10_000].iter() {
        group.throughput(Throughput::Elements(*ticks));
        group.bench_with_input(BenchmarkId::new("ticks", ticks), ticks, |b, &ticks| {
            let driver = shared(CurrentDriver::constant(
                "driver",
                1.5 * constants.threshold_current(),
                false,
            ));
            let laser = shared(Laser::new("laser", constants).with_recording(true));

            let mut sim = Simulator::new(clock(ticks)).with_recording(true);
            sim.set(vec![
                Connection::source(vec![driver.clone()]).unwrap(),
                Connection::new(vec![driver.clone()], vec![laser.clone()]).unwrap(),
            ]);

            b.iter(|| {
                sim.reset(true);
                black_box(sim.simulate());
            });
        });
    }

    group.finish();
}

// ============================================================================
// Optics Benchmarks
// ============================================================================

fn bench_delay_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("delay_line");

    for size in [1usize, 100, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("push", size), size, |b, &size| {
            let mut line = DelayLine::new(size as f64 * DT, DT).unwrap();
            let sample = Complex64::new(1.0, 0.5);
            b.iter(|| black_box(line.push(black_box(sample))));
        });
    }

    group.finish();
}

fn bench_interferometer_pipeline(c: &mut Criterion) {
    let constants = LaserConstants::default();

    c.bench_function("interferometer_pipeline", |b| {
        let driver = shared(CurrentDriver::constant(
            "driver",
            1.5 * constants.threshold_current(),
            false,
        ));
        let laser = shared(Laser::new("laser", constants));
        let amzi = shared(
            AsymmetricMachZehnderInterferometer::new("amzi", 10.0 * DT, DT, 0.5, 0.5, false)
                .unwrap(),
        );
        let spd = shared(SinglePhotonDetector::new("spd", constants.eta, 1, false).unwrap());

        let mut sim = Simulator::new(clock(1_000));
        sim.set(vec![
            Connection::source(vec![driver.clone()]).unwrap(),
            Connection::new(vec![driver.clone()], vec![laser.clone()]).unwrap(),
            Connection::new(vec![laser.clone()], vec![amzi.clone()]).unwrap(),
            Connection::new(vec![amzi.clone()], vec![spd.clone()]).unwrap(),
        ]);

        b.iter(|| {
            sim.reset(true);
            black_box(sim.simulate());
        });
    });
}

// ============================================================================
// Criterion Groups
// ============================================================================

criterion_group!(
    benches,
    bench_probe_chain,
    bench_laser_step,
    bench_driven_laser,
    bench_delay_line,
    bench_interferometer_pipeline,
);

criterion_main!(benches);
