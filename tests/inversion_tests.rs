use std::io::Write;
use std::path::{Path, PathBuf};

use stressinv::{
    grid::GridSearch,
    inversion::Inversion,
    loader,
    montecarlo::RandomSearch,
    observation::{Observation, StructuralType},
    settings::{self, CliArgs, DataSource, Strategy},
    InversionError,
};

// Fixture normals scatter about 4 degrees around a stress ellipse at 60 degrees
const TRUE_THETA: f64 = 60.0;
const THETA_TOL: f64 = 5.0;

fn test_data(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/test_data")
        .join(name)
}

fn fixture_observations() -> Vec<Observation> {
    let mut observations =
        loader::load_observations(test_data("joints.txt"), StructuralType::Joint).unwrap();
    observations.extend(
        loader::load_observations(test_data("stylolites.txt"), StructuralType::Stylolite)
            .unwrap(),
    );
    observations
}

fn fixture_sources() -> Vec<DataSource> {
    vec![
        DataSource {
            path: test_data("joints.txt"),
            kind: StructuralType::Joint,
        },
        DataSource {
            path: test_data("stylolites.txt"),
            kind: StructuralType::Stylolite,
        },
    ]
}

#[test]
fn fixtures_load_with_their_types() {
    let observations = fixture_observations();
    assert_eq!(observations.len(), 22);
    let joints = observations
        .iter()
        .filter(|o| o.structural_type() == StructuralType::Joint)
        .count();
    assert_eq!(joints, 12);
    for obs in &observations {
        assert!((obs.normal().norm() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn grid_recovers_fixture_orientation() {
    let best = GridSearch::new(91).run(&fixture_observations()).unwrap();
    assert!(
        (best.best_theta - TRUE_THETA).abs() < THETA_TOL,
        "theta {}",
        best.best_theta
    );
    assert!(best.best_misfit < 0.01, "misfit {}", best.best_misfit);
}

#[test]
fn monte_carlo_recovers_fixture_orientation() {
    let best = RandomSearch::new(20_000)
        .with_seed(7)
        .run(&fixture_observations())
        .unwrap();
    assert!(
        (best.best_theta - TRUE_THETA).abs() < THETA_TOL,
        "theta {}",
        best.best_theta
    );
    assert!(best.best_misfit < 0.01, "misfit {}", best.best_misfit);
}

#[test]
fn seeded_inversion_is_reproducible() {
    let settings = settings::Settings {
        iterations: 5_000,
        seed: Some(42),
        data: fixture_sources(),
        ..settings::load_default_config().unwrap()
    };
    let mut first = Inversion::from_settings(settings.clone()).unwrap();
    let mut second = Inversion::from_settings(settings).unwrap();
    let a = first.solve().unwrap().clone();
    let b = second.solve().unwrap().clone();
    assert_eq!(a.best, b.best);
    assert_eq!(a.improvements, b.improvements);
    assert_eq!(a.evaluated, 5_000);
    assert!(!a.aborted);
}

#[test]
fn malformed_file_reports_line() {
    match loader::load_observations(test_data("malformed.txt"), StructuralType::Joint) {
        Err(InversionError::MalformedRecord { line, .. }) => assert_eq!(line, 2),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn missing_source_fails_with_context() {
    let settings = settings::Settings {
        data: vec![DataSource {
            path: test_data("absent.txt"),
            kind: StructuralType::Joint,
        }],
        ..Default::default()
    };
    let err = Inversion::from_settings(settings).unwrap_err();
    assert!(err.to_string().contains("absent.txt"), "{}", err);
}

#[test]
fn config_file_drives_grid_inversion() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    write!(
        file,
        r#"
strategy = "grid"
iterations = 100
grid_size = 46
pairing = "standard"
surface = true

[k_range]
min = 0.2
max = 1.0

[[data]]
path = "{}"
kind = "joint"

[[data]]
path = "{}"
kind = "stylo"
"#,
        test_data("joints.txt").display(),
        test_data("stylolites.txt").display(),
    )
    .unwrap();

    let args = CliArgs {
        config: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let settings = settings::load_config(&args).unwrap();

    assert_eq!(settings.strategy, Strategy::Grid);
    assert_eq!(settings.grid_size, 46);
    assert_eq!(settings.data.len(), 2);
    assert_eq!(settings.data[1].kind, StructuralType::Stylolite);

    let mut inversion = Inversion::from_settings(settings).unwrap();
    let best = inversion.solve().unwrap().best;
    assert!((best.best_theta - TRUE_THETA).abs() < THETA_TOL);
    assert!(best.best_k >= 0.2);

    let surface = inversion.evaluate_surface().unwrap();
    assert_eq!(surface.shape(), (46, 46));
    assert_eq!(surface.argmin(), Some(best));
}

#[test]
fn outcome_serializes_to_json() {
    let mut inversion = Inversion::new(
        fixture_observations(),
        settings::Settings {
            strategy: Strategy::Grid,
            grid_size: 10,
            ..Default::default()
        },
    )
    .unwrap();
    let outcome = inversion.solve().unwrap();
    let json = serde_json::to_value(outcome).unwrap();
    assert_eq!(json["evaluated"], 100);
    assert_eq!(json["aborted"], false);
    assert!(json["best"]["best_theta"].is_number());
    assert!(json["improvements"].as_array().is_some_and(|a| !a.is_empty()));
}
