//! Period detection example.
//!
//! Run with: cargo run --example detect_period

use anofox_seasonality::detection::{detect_periods, SeasonalityDetector};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("anofox_seasonality=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== Period Detection Example ===\n");

    let series: Vec<f64> = (0..144)
        .map(|i| {
            let t = i as f64;
            2.0 * (2.0 * std::f64::consts::PI * t / 12.0).sin()
                + (2.0 * std::f64::consts::PI * t / 4.0).cos()
        })
        .collect();

    println!("Default detector: {:?}\n", detect_periods(&series));

    let detector = SeasonalityDetector::builder()
        .min_period(2)
        .max_period(36)
        .threshold(0.1)
        .build()
        .unwrap();

    println!("--- Periodogram ---");
    let periodogram = detector.periodogram(&series);
    for (period, power) in periodogram.iter().filter(|(_, power)| *power > 0.05) {
        let bar = "#".repeat((power * 40.0).round() as usize);
        println!("{:>4} {:.4} {}", period, power, bar);
    }

    println!("\n--- Peaks ---");
    for peak in detector.peaks(&series) {
        println!(
            "period {:>3} power {:.4} (neighbours {:?} / {:?})",
            peak.period, peak.power, peak.prev_period, peak.next_period
        );
    }

    println!("\nTop 2 periods: {:?}", detector.detect(&series, 2));
    println!("\n=== Example Complete ===");
}
