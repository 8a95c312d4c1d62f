//! Run summary printout.

use supervisor::RunStats;

/// Print a human-readable summary after a supervised run.
pub fn print_summary(stats: &RunStats) {
    println!("\n=== Run Summary ===\n");
    println!("  Duration:         {:.2}s", stats.duration.as_secs_f64());
    println!("  Processes:        {}", stats.spawned);
    println!("  Sensor restarts:  {}", stats.restarts);
    println!("  Emitters done:    {}", stats.emitter_exits);
    println!(
        "  Ended by:         {}",
        if stats.idle_shutdown {
            "idle timeout"
        } else {
            "interruption"
        }
    );
    println!();
}
