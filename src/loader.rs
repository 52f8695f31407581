//! Reading fracture normals from line-oriented text files.
//!
//! Each record holds the two components of a plane normal separated by
//! whitespace. Blank lines and `#` comments are skipped, and any tokens after
//! the first two are ignored. Every record of one source gets the same
//! structural type.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use itertools::Itertools;
use nalgebra::Vector2;

use crate::error::{InversionError, Result};
use crate::observation::{Observation, StructuralType};

pub fn read_observations<R: BufRead>(
    reader: R,
    structural_type: StructuralType,
) -> Result<Vec<Observation>> {
    let mut observations = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let record = line.trim();
        if record.is_empty() || record.starts_with('#') {
            continue;
        }
        let normal = parse_normal(record).map_err(|reason| InversionError::MalformedRecord {
            line: index + 1,
            reason,
        })?;
        observations.push(Observation::new(normal, structural_type));
    }
    Ok(observations)
}

pub fn load_observations<P: AsRef<Path>>(
    path: P,
    structural_type: StructuralType,
) -> Result<Vec<Observation>> {
    let file = File::open(path.as_ref())?;
    let observations = read_observations(BufReader::new(file), structural_type)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        count = observations.len(),
        kind = %structural_type,
        "loaded observations"
    );
    Ok(observations)
}

fn parse_normal(record: &str) -> std::result::Result<Vector2<f64>, String> {
    let (x, y) = record
        .split_whitespace()
        .next_tuple()
        .ok_or_else(|| format!("expected two components, got '{}'", record))?;
    let parse = |token: &str| {
        token
            .parse::<f64>()
            .map_err(|_| format!("'{}' is not a number", token))
    };
    let normal = Vector2::new(parse(x)?, parse(y)?);
    if !normal.iter().all(|c| c.is_finite()) {
        return Err(format!("non-finite component in '{}'", record));
    }
    Ok(normal)
}
