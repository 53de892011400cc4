//! CSV plumbing for the `fastmap_csv` binary: points in, FastMap embedding out.

use std::io;

use clap::Parser;
use fastmat::{LinalgError, Matrix};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("row {row}, column {col}: cannot parse {value:?} as a number")]
    Parse {
        row: usize,
        col: usize,
        value: String,
    },

    #[error(transparent)]
    Matrix(#[from] LinalgError),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Embed CSV points from stdin with FastMap and write the embedding as CSV to stdout.
#[derive(Parser, Debug, Clone, Copy, PartialEq, Eq)]
#[command(name = "fastmap_csv")]
pub struct Options {
    /// Number of FastMap axes to extract
    #[arg(default_value_t = 2)]
    pub target_dim: usize,

    /// Size of the worker pool, defaults to one thread per core
    #[arg(long)]
    pub threads: Option<usize>,
}

/// Reads one point per headerless CSV record.
/// All records must have the same number of fields.
pub fn read_points<R: io::Read>(reader: R) -> Result<Matrix<f64>, CliError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let rows = rdr
        .records()
        .enumerate()
        .map(|(row, record)| {
            let record = record?;
            record
                .iter()
                .enumerate()
                .map(|(col, entry)| {
                    entry.parse::<f64>().map_err(|_| CliError::Parse {
                        row,
                        col,
                        value: entry.to_owned(),
                    })
                })
                .collect::<Result<Vec<f64>, CliError>>()
        })
        .collect::<Result<Vec<_>, CliError>>()?;

    Ok(Matrix::from_rows(rows)?)
}

pub fn write_embedding<W: io::Write>(writer: W, embedding: &Matrix<f64>) -> Result<(), CliError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for row in embedding.rows() {
        wtr.write_record(row.iter().map(|x| x.to_string()))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}
