//! Automatic seasonality analysis example.
//!
//! Run with: cargo run --example seasonality

use anofox_seasonality::detection::SeasonalityDetector;
use anofox_seasonality::seasonality::{Decomposition, SeasonalityAnalyzer};
use tracing_subscriber::EnvFilter;

fn report(label: &str, analyzer: &SeasonalityAnalyzer, series: &[f64]) {
    println!("--- {} ---", label);
    let analysis = match analyzer.analyze(series, None) {
        Ok(analysis) => analysis,
        Err(e) => {
            println!("Analysis failed: {}\n", e);
            return;
        }
    };

    println!("Detected periods:  {:?}", analysis.detected_periods);
    println!("Selected period:   {:?}", analysis.selected_period);
    let method = match &analysis.decomposition {
        Decomposition::TrendOnly { .. } => "trend only",
        Decomposition::Stl(_) => "STL",
        Decomposition::Mstl(_) => "MSTL",
    };
    println!("Decomposition:     {}", method);
    println!("Seasonal strength: {:.4}", analysis.seasonal_strength);
    println!("Trend strength:    {:.4}", analysis.trend_strength);
    for (period, strength) in &analysis.period_strengths {
        println!("  period {:>3}: {:.4}", period, strength);
    }

    let verdict = if analysis.is_strong() {
        "strong"
    } else if analysis.is_moderate() {
        "moderate"
    } else if analysis.is_seasonal() {
        "weak"
    } else {
        "none"
    };
    println!("Seasonality:       {}\n", verdict);
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("anofox_seasonality=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== Seasonality Analysis Example ===\n");

    let analyzer = SeasonalityAnalyzer::new(
        SeasonalityDetector::builder()
            .min_period(2)
            .threshold(0.3)
            .build()
            .unwrap(),
    );

    let monthly: Vec<f64> = (0..96)
        .map(|i| 100.0 + 12.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin())
        .collect();
    report("Monthly data, period 12", &analyzer, &monthly);

    let hourly: Vec<f64> = (0..336)
        .map(|i| {
            let t = i as f64;
            (2.0 * std::f64::consts::PI * t / 24.0).sin()
                + 0.7 * (2.0 * std::f64::consts::PI * t / 7.0).sin()
        })
        .collect();
    report("Two interleaved cycles", &analyzer, &hourly);

    let trend: Vec<f64> = (0..60).map(|i| 3.0 + 0.4 * i as f64).collect();
    report("Pure trend", &analyzer, &trend);

    println!("--- Known period ---");
    let analysis = analyzer.analyze(&monthly, Some(12)).unwrap();
    let components = analysis.components();
    let max_error = monthly
        .iter()
        .zip(components.reconstruct())
        .map(|(y, r)| (y - r).abs())
        .fold(0.0, f64::max);
    println!("Reconstruction error with override: {:.2e}", max_error);

    println!("\n=== Example Complete ===");
}
