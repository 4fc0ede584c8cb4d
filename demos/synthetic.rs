//! Fit WEASEL on a synthetic two-class panel, save the model and reload it.
//!
//! Run with: cargo run -p weasel --example synthetic
//! Set `RUST_LOG=weasel=debug` for per-window logs.

use anyhow::{Context, Result};
use ndarray::{s, Array3};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use weasel::{TrainedModel, WeaselClassifier, WeaselConfig};

fn make_panel(n_samples: usize, seq_len: usize, seed: u64) -> (Array3<f64>, Vec<String>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut x = Array3::zeros((n_samples, 1, seq_len));
    let mut y = Vec::with_capacity(n_samples);

    for i in 0..n_samples {
        // "burst" series carry a short high-frequency segment at a random offset
        let burst = i % 2 == 1;
        let offset = rng.gen_range(0..seq_len / 2);
        for t in 0..seq_len {
            let base = (0.1 * t as f64).sin();
            let extra = if burst && (offset..offset + 20).contains(&t) {
                (2.5 * t as f64).sin()
            } else {
                0.0
            };
            x[[i, 0, t]] = base + extra + rng.gen::<f64>() * 0.2;
        }
        y.push(if burst { "burst" } else { "smooth" }.to_string());
    }
    (x, y)
}

fn main() -> Result<()> {
    // Setup logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("weasel=info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .init();

    let (x, y) = make_panel(80, 120, 7);
    let x_train = x.slice(s![..60, .., ..]).to_owned();
    let x_test = x.slice(s![60.., .., ..]).to_owned();

    let config = WeaselConfig::default()
        .with_n_jobs(0)
        .with_window_inc(4)
        .with_random_state(Some(42));
    let mut clf = WeaselClassifier::new(config);
    let summary = clf.fit(&x_train, &y[..60]).context("fitting WEASEL")?;

    println!(
        "windows: {} (step {}), features: {}, fit time: {:.2}s",
        summary.windows.len(),
        summary.window_inc,
        summary.n_features,
        summary.fit_time_secs
    );
    println!("test accuracy: {:.3}", clf.score(&x_test, &y[60..])?);

    let dir = std::env::temp_dir().join("weasel-demo");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("model.json");
    clf.model()
        .context("classifier has no model after fit")?
        .save(&path)?;

    let reloaded: TrainedModel<String> = TrainedModel::load(&path)?;
    let proba = reloaded.predict_proba(&x_test)?;
    println!("classes: {:?}", reloaded.classes());
    println!("first test row probabilities: {:?}", proba.row(0).to_vec());

    Ok(())
}
