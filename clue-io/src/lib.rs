//! CSV ingestion and egress for the CLUE clustering engine.
//!
//! `clue-clustering` never touches a file: the pipeline works on in-memory, dimension-major
//! coordinate buffers. This crate is the external collaborator that turns a CSV file into such
//! buffers, and turns a finished clustering back into a CSV file. It is deliberately a thin,
//! non-core layer — see the crate's `errors` module for why its failures are kept out of
//! `clue_clustering::ClueError`.
//!
//! # Opening an input stream, which might be gzip'ed
//!
//! The [open_file()] function opens a file of a given name. If that file name
//! has ``.gz`` suffix, the returned ``BufRead`` is automatically uncompressed:
//!
//! ```
//! use clue_io::open_file;
//! # use std::io;
//! # fn main() -> Result<(), io::Error> {
//! let reader = open_file("tests/test_files/points.csv")?;
//! let reader_gzipped = open_file("tests/test_files/points.csv.gz")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Unified opening of an output stream
//!
//! [out_writer()] opens a file for writing. If the given name is ``"stdout"`` or ``"stderr"``,
//! it writes to the appropriate stream rather than to a file:
//!
//! ```
//! use std::fs;
//! use clue_io::out_writer;
//! let mut to_stream = out_writer("", true);
//! to_stream = out_writer("stdout", true);
//! assert!(fs::metadata("stdout").is_err());
//! let mut to_file = out_writer("clue_io_doctest.out", false);
//! assert!(fs::metadata("clue_io_doctest.out").is_ok());
//! # fs::remove_file("clue_io_doctest.out").expect("Can't remove a test file");
//! ```
//!
//! # Loading a point set for clustering
//!
//! [load_points_csv()] reads the schema described in the crate's [`points`] module and returns
//! buffers laid out exactly the way [`clue_clustering::points::PointStore::load`] expects them.
#![allow(clippy::needless_return)]
mod utils;
mod points;
pub mod errors;

pub use utils::*;
pub use points::{load_points_csv, write_clusters_csv, LoadedPoints};
pub use errors::IngestError;
