use super::*;

#[test]
fn new_timer_reports_the_interval_as_first_step() {
    let timer = Timer::new(50.0);
    assert_eq!(timer.last_step_duration(), Duration::from_millis(20));
    assert_eq!(timer.frequency(), 50.0);
}

#[test]
fn tick_measures_roughly_one_interval() {
    let mut timer = Timer::new(100.0);
    timer.start();
    timer.tick();
    let step = timer.last_step_duration();
    assert!(step >= Duration::from_millis(8), "step was {step:?}");
    assert!(step < Duration::from_millis(100), "step was {step:?}");
}

#[test]
fn restart_excludes_time_spent_before_it() {
    let mut timer = Timer::new(100.0);
    timer.start();
    // Simulated pause: wall time passes without ticking.
    thread::sleep(Duration::from_millis(80));
    timer.start();
    timer.tick();
    let step = timer.last_step_duration();
    assert!(step < Duration::from_millis(60), "step was {step:?}");
}

#[test]
fn set_frequency_changes_the_deadline_spacing() {
    let mut timer = Timer::new(10.0);
    timer.set_frequency(200.0);
    timer.start();
    let before = Instant::now();
    timer.tick();
    assert!(before.elapsed() < Duration::from_millis(60));
}

#[test]
#[should_panic(expected = "timer frequency must be positive")]
fn zero_frequency_panics() {
    Timer::new(0.0);
}

#[test]
fn meter_reports_zero_until_a_window_completes() {
    let mut meter = FrequencyMeter::new();
    meter.count();
    meter.count();
    assert_eq!(meter.frequency(), 0.0);
}

#[test]
fn meter_measures_over_a_one_second_window() {
    let mut meter = FrequencyMeter::new();
    for _ in 0..5 {
        meter.count();
    }
    thread::sleep(Duration::from_millis(1050));
    meter.count();
    let hz = meter.frequency();
    assert!(hz > 0.0 && hz < 60.0, "frequency was {hz}");
}
