//! Integration tests for the Simulator.
//!
//! These tests verify end-to-end simulation scenarios including:
//! - Probe chains and same-tick propagation
//! - Lasers driven by current drivers, free-running and injection locked
//! - Optical pipelines through attenuators, interferometers and detectors
//! - Determinism and reset behavior

use lasersim::component::shared;
use lasersim::constants::LaserConstants;
use lasersim::devices::{
    AsymmetricMachZehnderInterferometer, CurrentDriver, Laser, PhaseSensitiveSpd,
    SinglePhotonDetector, TimeProbe, VariableOpticalAttenuator,
};
use lasersim::noise::LangevinNoise;
use lasersim::{Clock, Connection, Recordable, SimConfig, Simulator, Steppable};

// ============================================================================
// Helpers
// ============================================================================

fn clock(step: f64, horizon: f64) -> Clock {
    let mut clock = Clock::new(step).unwrap();
    clock.configure(horizon, None).unwrap();
    clock
}

const DT: f64 = 1.0e-13;

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// ============================================================================
// Probe Tests
// ============================================================================

#[test]
fn test_probe_run_records_every_tick() {
    let probe = shared(TimeProbe::new("probe", true));
    let mut sim = Simulator::new(clock(0.025, 2.0)).with_recording(true);
    sim.set(vec![Connection::source(vec![probe.clone()]).unwrap()]);

    assert_eq!(sim.simulate(), 80);

    let time = sim.get_data();
    assert_eq!(time.len(), 80);
    assert_eq!(time[0], 0.0);
    assert!((time[79] - 1.975).abs() < 1e-12);

    let probe = probe.borrow();
    let signal = probe.recorder().series("signal").unwrap();
    assert_eq!(signal, time);
    assert_eq!(probe.recorder().aligned_time(time), time);
}

#[test]
fn test_chained_probes_see_same_tick() {
    let a = shared(TimeProbe::new("a", true));
    let b = shared(TimeProbe::new("b", true));
    let c = shared(TimeProbe::new("c", true));

    let mut sim = Simulator::new(clock(0.1, 1.0));
    sim.set(vec![
        Connection::source(vec![a.clone()]).unwrap(),
        Connection::new(vec![a.clone()], vec![b.clone()]).unwrap(),
        Connection::new(vec![b.clone()], vec![c.clone()]).unwrap(),
    ]);
    sim.simulate();

    let a = a.borrow().get_recorded()["signal"].clone();
    assert_eq!(a.len(), 10);
    assert_eq!(b.borrow().get_recorded()["signal"], a);
    assert_eq!(c.borrow().get_recorded()["signal"], a);
}

#[test]
fn test_reverse_order_lags_one_tick() {
    let a = shared(TimeProbe::new("a", true));
    let b = shared(TimeProbe::new("b", true));

    // b reads a before a has advanced, so b sees the previous tick.
    let mut sim = Simulator::new(clock(1.0, 4.0));
    sim.set(vec![
        Connection::new(vec![a.clone()], vec![b.clone()]).unwrap(),
        Connection::source(vec![a.clone()]).unwrap(),
    ]);
    sim.simulate();

    assert_eq!(a.borrow().get_recorded()["signal"], vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(b.borrow().get_recorded()["signal"], vec![0.0, 0.0, 1.0, 2.0]);
}

#[test]
fn test_config_drives_clock() {
    let config = SimConfig::builder()
        .step_size(0.5)
        .horizon(3.0)
        .start_time(1.0)
        .record(true)
        .build()
        .unwrap();

    let probe = shared(TimeProbe::new("probe", true));
    let mut sim = Simulator::new(config.build_clock().unwrap()).with_recording(config.record);
    sim.set(vec![Connection::source(vec![probe.clone()]).unwrap()]);

    assert_eq!(sim.simulate(), config.tick_count());
    assert_eq!(sim.get_data(), &[1.0, 1.5, 2.0, 2.5]);
}

// ============================================================================
// Laser Tests
// ============================================================================

#[test]
fn test_undriven_laser_coarse_run() {
    let laser = shared(Laser::new("laser", LaserConstants::default()).with_recording(true));
    let mut sim = Simulator::new(clock(0.025, 2.0)).with_recording(true);
    sim.set(vec![Connection::source(vec![laser.clone()]).unwrap()]);

    assert_eq!(sim.simulate(), 80);
    assert!(!sim.clock().is_running());
    assert_eq!(sim.get_data().len(), 80);

    let recorded = laser.borrow().get_recorded();
    assert_eq!(recorded["carrier"].len(), 80);
    assert!(recorded["carrier"].iter().all(|&n| n >= lasersim::FLOOR_EPSILON));
    assert!(recorded["photon"].iter().all(|&s| s >= lasersim::FLOOR_EPSILON));
    assert!(recorded["current"].iter().all(|&i| i == 0.0));
}

#[test]
fn test_driven_laser_turns_on() {
    let constants = LaserConstants::default();
    let driver = shared(CurrentDriver::constant(
        "driver",
        1.5 * constants.threshold_current(),
        true,
    ));
    let laser = shared(Laser::new("laser", constants).with_recording(true));

    let mut sim = Simulator::new(clock(DT, 4.0e-9)).with_recording(true);
    sim.set(vec![
        Connection::source(vec![driver.clone()]).unwrap(),
        Connection::new(vec![driver.clone()], vec![laser.clone()]).unwrap(),
    ]);
    let ticks = sim.simulate() as usize;

    let laser = laser.borrow();
    let recorded = laser.get_recorded();
    for key in ["current", "photon", "carrier", "phase"] {
        assert_eq!(recorded[key].len(), ticks, "{key}");
    }
    assert!(recorded["current"]
        .iter()
        .all(|&i| i == driver.borrow().current()));

    let photon = &recorded["photon"];
    let tail = mean(&photon[ticks / 2..]);
    assert!(tail > 1.0e19, "tail photon density {tail:e}");
    assert!(tail > 1.0e3 * photon[0]);
    assert!(laser.power() > 0.0);
}

#[test]
fn test_noisy_laser_is_reproducible() {
    let run = || {
        let constants = LaserConstants::default();
        let driver = shared(CurrentDriver::constant("driver", 0.025, false));
        let mut laser = Laser::new("laser", constants).with_recording(true);
        laser.set_noise(
            LangevinNoise::new(0.0, 1.0e30, 1).unwrap(),
            LangevinNoise::new(0.0, 1.0e27, 2).unwrap(),
            LangevinNoise::new(0.0, 1.0e9, 3).unwrap(),
        );
        let laser = shared(laser);

        let mut sim = Simulator::new(clock(DT, 5.0e-11));
        sim.set(vec![
            Connection::source(vec![driver.clone()]).unwrap(),
            Connection::new(vec![driver], vec![laser.clone()]).unwrap(),
        ]);
        sim.simulate();
        let recorded = laser.borrow().get_recorded();
        recorded
    };

    let first = run();
    let second = run();
    assert_eq!(first, second);
    assert!(first["photon"].iter().all(|&s| s >= lasersim::FLOOR_EPSILON));
}

#[test]
fn test_injection_locked_slave() {
    let constants = LaserConstants::default();
    let bias = 1.5 * constants.threshold_current();

    let build = |locked: bool| {
        let driver = shared(CurrentDriver::constant("driver", bias, false));
        let master = shared(Laser::new("master", constants));
        let mut slave = Laser::new("slave", constants).with_recording(true);
        if locked {
            slave.set_master(&master.borrow());
        }
        let slave = shared(slave);

        let mut sim = Simulator::new(clock(DT, 2.0e-9));
        sim.set(vec![
            Connection::source(vec![driver.clone()]).unwrap(),
            Connection::new(vec![driver.clone()], vec![master.clone()]).unwrap(),
            Connection::new(vec![driver.clone(), master.clone()], vec![slave.clone()]).unwrap(),
        ]);
        sim.simulate();
        slave
    };

    let locked = build(true);
    let free = build(false);

    assert!(locked.borrow().is_locked());
    assert_eq!(locked.borrow().detuning(), Some(0.0));

    let locked_photon = locked.borrow().get_recorded()["photon"].clone();
    let free_photon = free.borrow().get_recorded()["photon"].clone();
    assert!(locked_photon.iter().all(|s| s.is_finite()));
    assert_ne!(locked_photon, free_photon);
}

#[test]
fn test_reset_then_rerun_matches() {
    let constants = LaserConstants::default();
    let driver = shared(CurrentDriver::constant("driver", 0.03, true));
    let laser = shared(Laser::new("laser", constants).with_recording(true));
    let spd = shared(SinglePhotonDetector::new("spd", 0.2, 9, true).unwrap());

    let mut sim = Simulator::new(clock(DT, 2.0e-11)).with_recording(true);
    sim.set(vec![
        Connection::source(vec![driver.clone()]).unwrap(),
        Connection::new(vec![driver.clone()], vec![laser.clone()]).unwrap(),
        Connection::new(vec![laser.clone()], vec![spd.clone()]).unwrap(),
    ]);

    sim.simulate();
    let laser_first = laser.borrow().get_recorded();
    let spd_first = spd.borrow().get_recorded();
    let time_first = sim.get_data().to_vec();

    sim.reset(true);
    assert!(laser.borrow().recorder().is_empty());
    sim.simulate();

    assert_eq!(laser.borrow().get_recorded(), laser_first);
    assert_eq!(spd.borrow().get_recorded(), spd_first);
    assert_eq!(sim.get_data(), time_first.as_slice());
}

// ============================================================================
// Optical Pipeline Tests
// ============================================================================

#[test]
fn test_laser_through_interferometer() {
    let constants = LaserConstants::default();
    let driver = shared(CurrentDriver::constant(
        "driver",
        1.5 * constants.threshold_current(),
        false,
    ));
    let laser = shared(Laser::new("laser", constants).with_recording(true));
    let voa = shared(VariableOpticalAttenuator::new("voa", 3.0, true).unwrap());
    let mut amzi =
        AsymmetricMachZehnderInterferometer::new("amzi", 5.0 * DT, DT, 0.5, 0.5, true).unwrap();
    amzi.set_phases(0.0, std::f64::consts::FRAC_PI_2);
    let amzi = shared(amzi);
    let spd = shared(
        SinglePhotonDetector::new("spd", 1.0, 3, true)
            .unwrap()
            .with_counting(false),
    );
    let psd = shared(
        PhaseSensitiveSpd::new("psd", 0.0, 1.0, 4, true)
            .unwrap()
            .with_counting(false),
    );

    let mut sim = Simulator::new(clock(DT, 1.0e-10)).with_recording(true);
    sim.set(vec![
        Connection::source(vec![driver.clone()]).unwrap(),
        Connection::new(vec![driver.clone()], vec![laser.clone()]).unwrap(),
        Connection::new(vec![laser.clone()], vec![voa.clone(), psd.clone()]).unwrap(),
        Connection::new(vec![voa.clone()], vec![amzi.clone()]).unwrap(),
        Connection::new(vec![amzi.clone()], vec![spd.clone()]).unwrap(),
    ]);
    let ticks = sim.simulate() as usize;

    let time = sim.get_data();
    for recorder_len in [
        laser.borrow().recorder().len(),
        voa.borrow().recorder().len(),
        amzi.borrow().recorder().len(),
        spd.borrow().recorder().len(),
        psd.borrow().recorder().len(),
    ] {
        assert_eq!(recorder_len, ticks);
    }
    assert_eq!(spd.borrow().recorder().aligned_time(time).len(), ticks);

    // The downstream detector sees port 1 of the interferometer on the same tick.
    let amzi_port1 = amzi.borrow().get_recorded()["intensity"].clone();
    let spd_intensity = spd.borrow().get_recorded()["intensity"].clone();
    for (a, b) in amzi_port1.iter().zip(&spd_intensity) {
        assert!((a - b).abs() <= 1e-12 * a.abs().max(1.0));
    }

    // The attenuator passes half the power (3 dB, within rounding).
    let laser_field = laser.borrow().electric_field();
    let voa_out = voa.borrow().output();
    let ratio = voa_out.norm_sqr() / laser_field.norm_sqr();
    assert!((ratio - 10f64.powf(-0.3)).abs() < 1e-9);

    // A phase-sensitive detector never exceeds the plain intensity.
    let psd_intensity = psd.borrow().get_recorded()["intensity"].clone();
    let photon = laser.borrow().get_recorded()["photon"].clone();
    for (p, s) in psd_intensity.iter().zip(&photon) {
        assert!(*p >= 0.0);
        assert!(*p <= s * (1.0 + 1e-9));
    }
}

#[test]
fn test_simulator_reports_components() {
    let a = shared(TimeProbe::new("a", false));
    let b = shared(TimeProbe::new("b", false));
    let mut sim = Simulator::new(clock(1.0, 3.0));
    sim.set(vec![
        Connection::source(vec![a.clone()]).unwrap(),
        Connection::new(vec![a.clone()], vec![b.clone()]).unwrap(),
    ]);
    sim.simulate();

    let names: Vec<String> = sim
        .components()
        .iter()
        .map(|c| c.borrow().name().to_string())
        .collect();
    assert_eq!(names, vec!["a", "b"]);

    let stats = sim.export_stats();
    assert_eq!(stats["ticks_executed"], 3);
    assert_eq!(stats["component_advances"], 6);
}
