use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

use stressinv::inversion::Inversion;
use stressinv::settings::{self, CliArgs};

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let settings = settings::load_config(&args)?;
    tracing::info!("{}", settings);

    let mut inversion = Inversion::from_settings(settings)?.with_progress(true);
    inversion.solve()?;
    if inversion.settings.surface {
        inversion.evaluate_surface()?;
    }

    if args.json {
        let report = serde_json::json!({
            "outcome": inversion.outcome,
            "surface": inversion.surface.as_ref().map(|s| serde_json::json!({
                "shape": s.shape(),
                "min": s.min(),
                "max": s.max(),
                "argmin": s.argmin(),
            })),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Some(outcome) = &inversion.outcome {
        println!("{}", outcome);
    }
    if let Some(surface) = &inversion.surface {
        let (rows, columns) = surface.shape();
        println!("Misfit surface: {} k nodes x {} theta nodes", rows, columns);
        if let (Some(min), Some(max)) = (surface.min(), surface.max()) {
            println!("  - Range: [{:.6}, {:.6}]", min, max);
        }
        if let Some(best) = surface.argmin() {
            println!("  - Minimum: {}", best);
        }
    }
    Ok(())
}
