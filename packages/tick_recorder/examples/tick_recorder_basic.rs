//! Profiles the phases of a small workload with a shared recorder.

use std::thread;

use tick_recorder::Recorder;

fn main() -> tick_recorder::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let start = tick_recorder::init()?;
    println!(
        "Clock: {} (mode {}), process start tick {start}",
        tick_recorder::active_mode(),
        tick_recorder::active_mode().id()
    );

    let recorder = Recorder::new();

    let whole = recorder.start()?;

    let setup = recorder.start()?;
    let data: Vec<u64> = (0..100_000).collect();
    let setup_ticks = recorder.stop(setup)?;

    let compute = recorder.start()?;
    let sum = thread::scope(|s| {
        let halves = data.split_at(data.len() / 2);
        let left = s.spawn(|| halves.0.iter().sum::<u64>());
        let right = s.spawn(|| halves.1.iter().sum::<u64>());

        left.join().unwrap() + right.join().unwrap()
    });
    let compute_ticks = recorder.stop(compute)?;

    let whole_ticks = recorder.stop(whole)?;

    println!("Sum: {sum}");
    println!("Setup:   {setup_ticks} ticks");
    println!("Compute: {compute_ticks} ticks");
    println!("Total:   {whole_ticks} ticks");
    println!("Raw marks: {:?}", recorder.snapshot());
    println!(
        "Ticks since process start: {}",
        tick_recorder::elapsed_since_start()?
    );

    recorder.clear();
    println!("Recorder holds {} timestamps after clear", recorder.len());

    Ok(())
}
