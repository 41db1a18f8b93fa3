//! Reads a point-set CSV into the dimension-major layout `clue_clustering::points::PointStore`
//! expects, and writes a finished clustering back out in the same schema.
//!
//! Schema: header row, then one row per point with `dim` coordinate columns followed
//! by a weight column (comma-separated) -- the same layout the upstream CLUEstering
//! `read_csv` helper produces, bit for bit: `coords[point_id + d * n_points]`.

use std::io::Write;

use csv::{ReaderBuilder, StringRecord};

use crate::errors::IngestError;
use crate::utils::{open_file, out_writer};

/// A point set loaded from CSV, laid out exactly as
/// `clue_clustering::points::PointStore::load` expects: `coords` is dimension-major
/// (`coords[i + d * n]`), `weights` has one entry per point.
#[derive(Debug, Clone)]
pub struct LoadedPoints {
    pub coords: Vec<f64>,
    pub weights: Vec<f64>,
    pub n: usize,
    pub dim: usize,
}

fn parse_field(record: &StringRecord, col: usize, row_text: &str) -> Result<f64, IngestError> {
    let field = record.get(col).ok_or_else(|| IngestError::InvalidSchema {
        reason: format!("row has no column {col}"),
        row: row_text.to_string(),
    })?;
    field.trim().parse::<f64>().map_err(|_| IngestError::InvalidSchema {
        reason: format!("column {col} ('{field}') is not a valid number"),
        row: row_text.to_string(),
    })
}

/// Loads a point set from `path`. The number of coordinate dimensions is inferred
/// from the header: `dim = header.len() - 1`, the last column being the weight.
///
/// Fails with [`IngestError::Io`] if the file cannot be opened, with
/// [`IngestError::Csv`] on a malformed CSV stream, and with
/// [`IngestError::InvalidSchema`] if a row's column count or field types don't
/// match the header.
pub fn load_points_csv(path: &str) -> Result<LoadedPoints, IngestError> {
    let reader = open_file(path)?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let header = rdr.headers()?.clone();
    if header.len() < 2 {
        return Err(IngestError::InvalidSchema {
            reason: "header must list at least one coordinate column and a weight column".to_string(),
            row: header.iter().collect::<Vec<_>>().join(","),
        });
    }
    let dim = header.len() - 1;

    let mut coord_rows: Vec<Vec<f64>> = Vec::new();
    let mut weights: Vec<f64> = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let row_text = record.iter().collect::<Vec<_>>().join(",");
        if record.len() != dim + 1 {
            return Err(IngestError::InvalidSchema {
                reason: format!("expected {} columns, found {}", dim + 1, record.len()),
                row: row_text,
            });
        }
        let mut row = Vec::with_capacity(dim);
        for d in 0..dim {
            row.push(parse_field(&record, d, &row_text)?);
        }
        let weight = parse_field(&record, dim, &row_text)?;
        coord_rows.push(row);
        weights.push(weight);
    }

    let n = coord_rows.len();
    let mut coords = vec![0.0; n * dim];
    for (i, row) in coord_rows.iter().enumerate() {
        for (d, value) in row.iter().enumerate() {
            coords[i + d * n] = *value;
        }
    }

    Ok(LoadedPoints { coords, weights, n, dim })
}

/// Writes a finished clustering back to CSV, mirroring the upstream
/// `read_output` contract: coordinate columns, weight, `is_seed`, `cluster_id`.
///
/// `coords` is dimension-major (`coords[i + d * n]`), matching [`LoadedPoints`].
pub fn write_clusters_csv(
    path: &str,
    coords: &[f64],
    weights: &[f64],
    dim: usize,
    clusters: &[i32],
    is_seed: &[bool],
) -> Result<(), IngestError> {
    let n = weights.len();
    let mut w = out_writer(path, false);

    let mut header: Vec<String> = (0..dim).map(|d| format!("coord_{d}")).collect();
    header.push("weight".to_string());
    header.push("is_seed".to_string());
    header.push("cluster_id".to_string());
    writeln!(w, "{}", header.join(","))?;

    for i in 0..n {
        let mut fields: Vec<String> = (0..dim).map(|d| coords[i + d * n].to_string()).collect();
        fields.push(weights[i].to_string());
        fields.push(if is_seed[i] { "1".to_string() } else { "0".to_string() });
        fields.push(clusters[i].to_string());
        writeln!(w, "{}", fields.join(","))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_a_simple_point_set() {
        let path = "clue_io_points_test_load.csv";
        fs::write(path, "x,y,weight\n0.0,0.0,1.0\n1.0,1.0,2.0\n").unwrap();
        let loaded = load_points_csv(path).unwrap();
        fs::remove_file(path).unwrap();

        assert_eq!(loaded.n, 2);
        assert_eq!(loaded.dim, 2);
        assert_eq!(loaded.weights, vec![1.0, 2.0]);
        // dimension-major: coords[point_id + dim * n]
        assert_eq!(loaded.coords[0], 0.0); // point 0, dim 0
        assert_eq!(loaded.coords[1], 1.0); // point 1, dim 0
        assert_eq!(loaded.coords[2], 0.0); // point 0, dim 1
        assert_eq!(loaded.coords[3], 1.0); // point 1, dim 1
    }

    #[test]
    fn rejects_rows_with_wrong_column_count() {
        let path = "clue_io_points_test_bad_row.csv";
        fs::write(path, "x,y,weight\n0.0,0.0,1.0\n1.0,1.0\n").unwrap();
        let result = load_points_csv(path);
        fs::remove_file(path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_non_numeric_fields() {
        let path = "clue_io_points_test_nan.csv";
        fs::write(path, "x,weight\nabc,1.0\n").unwrap();
        let result = load_points_csv(path);
        fs::remove_file(path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn round_trips_cluster_assignment() {
        let path = "clue_io_points_test_write.csv";
        let n = 2usize;
        let coords = vec![0.0, 1.0]; // dim 0 column, n=2
        let weights = vec![1.0, 1.0];
        let clusters = vec![0, 0];
        let is_seed = vec![true, false];
        write_clusters_csv(path, &coords, &weights, 1, &clusters, &is_seed).unwrap();
        let content = fs::read_to_string(path).unwrap();
        fs::remove_file(path).unwrap();
        assert!(content.starts_with("coord_0,weight,is_seed,cluster_id\n"));
        assert_eq!(content.lines().count(), n + 1);
    }
}
