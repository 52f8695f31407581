use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::domain::{validate_grid_size, validate_iterations, KRange};
use crate::grid::GridSearch;
use crate::montecarlo::RandomSearch;
use crate::observation::{Pairing, StructuralType};

/// Search strategy used by [`crate::inversion::Inversion::solve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    MonteCarlo,
    Grid,
}

/// A file of normals that all share one structural type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub path: PathBuf,
    pub kind: StructuralType,
}

/// Runtime configuration for an inversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub strategy: Strategy,
    pub iterations: usize,
    pub grid_size: usize,
    #[serde(default)]
    pub k_range: KRange,
    pub seed: Option<u64>,
    #[serde(default)]
    pub pairing: Pairing,
    /// Also evaluate the full misfit surface over the grid.
    #[serde(default)]
    pub surface: bool,
    #[serde(default)]
    pub data: Vec<DataSource>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strategy: Strategy::MonteCarlo,
            iterations: 10_000,
            grid_size: 50,
            k_range: KRange::default(),
            seed: None,
            pairing: Pairing::default(),
            surface: false,
            data: Vec::new(),
        }
    }
}

impl Settings {
    /// Checks the search domain before any sampling is attempted.
    pub fn validate(&self) -> crate::error::Result<()> {
        self.k_range.validate()?;
        match self.strategy {
            Strategy::MonteCarlo => validate_iterations(self.iterations)?,
            Strategy::Grid => validate_grid_size(self.grid_size)?,
        }
        if self.surface {
            validate_grid_size(self.grid_size)?;
        }
        Ok(())
    }

    pub fn random_search(&self) -> RandomSearch {
        let search = RandomSearch::new(self.iterations)
            .with_k_range(self.k_range)
            .with_pairing(self.pairing);
        match self.seed {
            Some(seed) => search.with_seed(seed),
            None => search,
        }
    }

    pub fn grid_search(&self) -> GridSearch {
        GridSearch::new(self.grid_size)
            .with_k_range(self.k_range)
            .with_pairing(self.pairing)
    }

    /// Number of samples the configured strategy will score.
    pub fn samples(&self) -> usize {
        match self.strategy {
            Strategy::MonteCarlo => self.iterations,
            Strategy::Grid => self.grid_size * self.grid_size,
        }
    }

    fn apply(&mut self, args: &CliArgs) {
        if let Some(iterations) = args.monte_carlo {
            self.strategy = Strategy::MonteCarlo;
            self.iterations = iterations;
        } else if let Some(grid_size) = args.grid {
            self.strategy = Strategy::Grid;
            self.grid_size = grid_size;
        }
        if let Some(seed) = args.seed {
            self.seed = Some(seed);
        }
        if let Some(min) = args.k_min {
            self.k_range.min = min;
        }
        if let Some(max) = args.k_max {
            self.k_range.max = max;
        }
        if args.swapped {
            self.pairing = Pairing::Swapped;
        }
        if args.surface {
            self.surface = true;
        }

        let joints = args.joints.iter().map(|path| DataSource {
            path: path.clone(),
            kind: StructuralType::Joint,
        });
        let stylolites = args.stylolites.iter().map(|path| DataSource {
            path: path.clone(),
            kind: StructuralType::Stylolite,
        });
        let sources: Vec<DataSource> = joints.chain(stylolites).collect();
        // data given on the command line replaces the configured sources
        if !sources.is_empty() {
            self.data = sources;
        }
    }
}

/// Loads `config/default.toml` only, without environment or command-line overrides.
pub fn load_default_config() -> Result<Settings> {
    let root = retrieve_project_root()?;
    let settings = build(&root.join("config/default.toml"), false)?;
    settings.validate()?;
    Ok(settings)
}

/// Loads the layered configuration: file, then `STRESSINV_*` variables, then `args`.
pub fn load_config(args: &CliArgs) -> Result<Settings> {
    let config_file = match &args.config {
        Some(path) => path.clone(),
        None => {
            let root = retrieve_project_root()?;
            let local_config = root.join("config/local.toml");
            if local_config.exists() {
                local_config
            } else {
                root.join("config/default.toml")
            }
        }
    };
    tracing::info!(file = %config_file.display(), "using configuration");

    let mut settings = build(&config_file, true)?;
    settings.apply(args);
    settings.validate()?;

    tracing::debug!(?settings, "resolved settings");
    Ok(settings)
}

fn build(config_file: &Path, with_env: bool) -> Result<Settings> {
    let mut builder = Config::builder().add_source(File::from(config_file).required(true));
    if with_env {
        builder = builder.add_source(
            Environment::with_prefix("stressinv")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
    }
    let config = builder
        .build()
        .with_context(|| format!("loading configuration from {}", config_file.display()))?;
    config
        .try_deserialize()
        .with_context(|| format!("deserializing configuration from {}", config_file.display()))
}

/// Retrieve the project root directory, the one holding `config/`.
/// Tried in order:
/// 1. the CARGO_MANIFEST_DIR environment variable (cargo run, cargo test),
/// 2. the STRESSINV_ROOT_DIR environment variable,
/// 3. the nearest ancestor of the executable with a "config" subdirectory.
fn retrieve_project_root() -> Result<PathBuf> {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        return Ok(PathBuf::from(manifest_dir));
    }
    if let Ok(path) = env::var("STRESSINV_ROOT_DIR") {
        return Ok(PathBuf::from(path));
    }

    let exe_path = env::current_exe().context("locating the current executable")?;
    exe_path
        .ancestors()
        .skip(1)
        .find(|dir| dir.join("config").is_dir())
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("could not find a project root with a config directory"))
}

#[derive(Parser, Debug, Default)]
#[command(version, about = "Invert fracture orientations for the best-fitting 2-D remote stress")]
pub struct CliArgs {
    /// Configuration file to use instead of config/local.toml or config/default.toml.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use the Monte Carlo search with the given number of iterations.
    #[arg(long, group = "strategy", value_name = "ITERATIONS")]
    pub monte_carlo: Option<usize>,

    /// Use the grid search with the given number of nodes per axis.
    #[arg(long, group = "strategy", value_name = "SIZE")]
    pub grid: Option<usize>,

    /// Random seed for the Monte Carlo search.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Lower bound of the stress ratio range.
    #[arg(long)]
    pub k_min: Option<f64>,

    /// Upper bound of the stress ratio range.
    #[arg(long)]
    pub k_max: Option<f64>,

    /// Score joints against S1 and stylolites against S3.
    #[arg(long)]
    pub swapped: bool,

    /// Files of joint normals, separated by spaces.
    #[arg(short, long, num_args = 1.., value_delimiter = ' ')]
    pub joints: Vec<PathBuf>,

    /// Files of stylolite normals, separated by spaces.
    #[arg(long, num_args = 1.., value_delimiter = ' ')]
    pub stylolites: Vec<PathBuf>,

    /// Also evaluate the misfit surface over the grid.
    #[arg(long)]
    pub surface: bool,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Settings:
  - Strategy: {:?}
  - Iterations: {}
  - Grid Size: {}
  - Stress Ratio Range: [{}, {}]
  - Seed: {:?}
  - Pairing: {:?}
  - Data Sources: {}
  ",
            self.strategy,
            self.iterations,
            self.grid_size,
            self.k_range.min,
            self.k_range.max,
            self.seed,
            self.pairing,
            self.data.len(),
        )
    }
}
