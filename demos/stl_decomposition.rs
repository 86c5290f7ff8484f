//! STL and MSTL decomposition example.
//!
//! Run with: cargo run --example stl_decomposition
//! Set `RUST_LOG=anofox_seasonality=debug` to see fit events.

use anofox_seasonality::seasonality::{MSTLConfig, STLConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("anofox_seasonality=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== STL Decomposition Example ===\n");

    println!("STL (Seasonal-Trend decomposition using LOESS) breaks down a");
    println!("time series into three additive components:");
    println!("  Y = Trend + Seasonal + Remainder\n");

    // Generate sample data with trend and seasonality
    let period = 12;
    let n = 120; // 10 years of monthly data

    let series: Vec<f64> = (0..n)
        .map(|i| {
            let trend = 0.1 * i as f64;
            let seasonal = 10.0 * (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin();
            let noise = 0.5 * ((i as f64 * 0.7).cos());
            trend + seasonal + noise
        })
        .collect();

    println!("Generated: {} observations with period={}\n", n, period);

    // 1. Basic STL Decomposition
    println!("--- Basic STL Decomposition ---");

    let stl = STLConfig::new(period).unwrap();
    println!(
        "Spans: seasonal={}, trend={}, low-pass={}",
        stl.seasonal_smoother(),
        stl.trend_smoother(),
        stl.low_pass_smoother()
    );
    let result = stl.fit(&series).unwrap();

    let max_reconstruction_error: f64 = series
        .iter()
        .zip(result.reconstruct())
        .map(|(y, r)| (y - r).abs())
        .fold(0.0, f64::max);
    println!("Max reconstruction error: {:.2e}", max_reconstruction_error);
    println!("Seasonal strength: {:.4}", result.seasonal_strength());
    println!("Trend strength:    {:.4}", result.trend_strength());

    println!("\nFirst cycle:");
    println!("{:>4} {:>10} {:>10} {:>10}", "t", "trend", "seasonal", "remainder");
    for i in 0..period {
        println!(
            "{:>4} {:>10.3} {:>10.3} {:>10.3}",
            i, result.trend[i], result.seasonal[i], result.remainder[i]
        );
    }

    // 2. Robust STL with outliers
    println!("\n--- Robust STL ---");

    let mut contaminated = series.clone();
    contaminated[30] += 50.0;
    contaminated[75] -= 40.0;

    let robust = STLConfig::builder()
        .period(period)
        .iterations(6)
        .robust(true)
        .build()
        .unwrap()
        .fit(&contaminated)
        .unwrap();
    println!("Weight at t=30: {:.4}", robust.weights[30]);
    println!("Weight at t=75: {:.4}", robust.weights[75]);
    println!("Remainder at t=30: {:.2}", robust.remainder[30]);

    // 3. MSTL with two periods
    println!("\n--- MSTL Decomposition ---");

    let hourly: Vec<f64> = (0..24 * 7 * 3)
        .map(|i| {
            let t = i as f64;
            let daily = 3.0 * (2.0 * std::f64::consts::PI * t / 24.0).sin();
            let weekly = 5.0 * (2.0 * std::f64::consts::PI * t / 168.0).cos();
            50.0 + daily + weekly
        })
        .collect();

    let mstl = MSTLConfig::builder()
        .periods(vec![24, 168])
        .build()
        .unwrap()
        .fit(&hourly)
        .unwrap();

    for (idx, period) in mstl.seasonal_periods.iter().enumerate() {
        println!(
            "Period {:>3}: strength {:.4}",
            period,
            mstl.seasonal_strength(idx).unwrap_or(0.0)
        );
    }
    println!("Trend strength: {:.4}", mstl.trend_strength());

    println!("\n=== Example Complete ===");
}
