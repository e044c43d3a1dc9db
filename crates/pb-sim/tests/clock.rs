use pb_sim::{CHANNELS, SimOptions, SimulationClock, TICK_INTERVAL_S};
use proptest::prelude::*;

fn seeded(duration_s: f64, speed_multiplier: f64) -> SimulationClock {
    SimulationClock::new(&SimOptions {
        duration_s,
        speed_multiplier,
        seed: Some(99),
    })
    .unwrap()
}

#[test]
fn default_run_produces_one_hundred_samples() {
    let mut clock = seeded(10.0, 1.0);
    assert!(clock.start());

    let mut completions = 0;
    // A little over 10 s of wall time in 50 ms frames.
    for _ in 0..220 {
        completions += clock
            .advance_wall(TICK_INTERVAL_S / 2.0)
            .iter()
            .filter(|o| o.completed)
            .count();
    }
    assert_eq!(completions, 1);
    assert!(clock.is_complete());
    assert!(!clock.is_running());
    assert_eq!(clock.samples().len(), 100);
}

#[test]
fn samples_carry_all_channels() {
    let mut clock = seeded(2.0, 1.0);
    clock.run_to_completion();
    let sample = clock.samples()[0];
    for name in CHANNELS {
        assert!(sample.channel(name).is_some(), "missing {name}");
    }
}

#[test]
fn reset_clears_everything() {
    let mut clock = seeded(1.0, 1.0);
    clock.run_to_completion();
    clock.reset();
    assert_eq!(clock.progress(), 0.0);
    assert!(clock.samples().is_empty());
    assert!(!clock.is_running());
}

proptest! {
    #[test]
    fn progress_is_monotonic_and_clamped(
        duration in 1.0f64..60.0,
        speed in 0.1f64..10.0,
    ) {
        let mut clock = seeded(duration, speed);
        clock.start();
        let mut last = clock.progress();
        let mut completions = 0;
        while let Some(outcome) = clock.tick() {
            prop_assert!(clock.progress() >= last);
            prop_assert!(clock.progress() <= 100.0);
            last = clock.progress();
            if outcome.completed {
                completions += 1;
            }
        }
        prop_assert_eq!(completions, 1);
        prop_assert_eq!(clock.progress(), 100.0);
        prop_assert!(clock.tick().is_none());
    }

    #[test]
    fn sample_times_increase_within_duration(
        duration in 1.0f64..60.0,
        speed in 0.1f64..10.0,
    ) {
        let mut clock = seeded(duration, speed);
        clock.run_to_completion();
        let times: Vec<f64> = clock.samples().iter().map(|s| s.time).collect();
        prop_assert!(times.windows(2).all(|w| w[0] < w[1]));
        let last = *times.last().unwrap();
        prop_assert!((last - duration).abs() < 1e-9);
    }

    #[test]
    fn pause_then_start_resumes(ticks_before in 1usize..20) {
        let mut clock = seeded(60.0, 1.0);
        clock.start();
        for _ in 0..ticks_before {
            clock.tick();
        }
        let progress = clock.progress();
        clock.pause();
        prop_assert!(clock.tick().is_none());
        prop_assert_eq!(clock.progress(), progress);

        prop_assert!(clock.start());
        clock.tick();
        prop_assert!(clock.progress() > progress);
        prop_assert_eq!(clock.samples().len(), ticks_before + 1);
    }

    #[test]
    fn duration_change_mid_run_keeps_times_increasing(
        ticks_before in 1usize..200,
        new_duration in 1.0f64..60.0,
    ) {
        let mut clock = seeded(30.0, 1.0);
        clock.start();
        for _ in 0..ticks_before {
            clock.tick();
        }
        let now = clock.time();
        if clock.set_duration(new_duration).is_ok() {
            prop_assert!(new_duration > now);
            prop_assert!((clock.time() - now).abs() < 1e-9);
        } else {
            prop_assert!(new_duration <= now);
        }
        clock.run_to_completion();

        let times: Vec<f64> = clock.samples().iter().map(|s| s.time).collect();
        prop_assert!(times.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(clock.is_complete());
    }
}
