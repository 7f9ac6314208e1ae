//! Python bindings for fastaidx using PyO3
//!
//! Provides a Python interface for random access to indexed FASTA files.

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
use std::collections::HashMap;

#[cfg(feature = "python")]
use std::fs::File;

#[cfg(feature = "python")]
use std::io::BufReader;

#[cfg(feature = "python")]
use crate::{Encoding, Error, Fasta, Options};

/// Python module for fastaidx
#[cfg(feature = "python")]
#[pymodule]
fn fastaidx(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<IndexedFasta>()?;
    m.add_function(wrap_pyfunction!(reference_lengths, m)?)?;
    Ok(())
}

#[cfg(feature = "python")]
impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        use pyo3::exceptions::{PyIOError, PyKeyError, PyRuntimeError, PyValueError};
        match err {
            Error::NotFound(_) => PyKeyError::new_err(err.to_string()),
            Error::Format { .. }
            | Error::InvalidRange { .. }
            | Error::OutOfBounds { .. }
            | Error::InvalidRegion(_)
            | Error::InvalidData(_) => PyValueError::new_err(err.to_string()),
            Error::Io(_) | Error::UnexpectedEof { .. } => PyIOError::new_err(err.to_string()),
            Error::NoSource | Error::Internal(_) => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

#[cfg(feature = "python")]
fn open_index(path: &str) -> PyResult<BufReader<File>> {
    let file = File::open(path).map_err(Error::from)?;
    Ok(BufReader::new(file))
}

/// Indexed FASTA file that can be queried by region
#[cfg(feature = "python")]
#[pyclass]
pub struct IndexedFasta {
    inner: crate::IndexedFasta<File>,
}

#[cfg(feature = "python")]
#[pymethods]
impl IndexedFasta {
    #[new]
    #[pyo3(signature = (fasta_path, index_path=None, encoding="raw"))]
    fn new(fasta_path: String, index_path: Option<String>, encoding: &str) -> PyResult<Self> {
        let encoding = <Encoding as clap::ValueEnum>::from_str(encoding, true).map_err(|_| {
            pyo3::exceptions::PyValueError::new_err(format!("unknown encoding: {}", encoding))
        })?;
        let index_path = index_path.unwrap_or_else(|| format!("{}.fai", fasta_path));

        let fasta = File::open(&fasta_path).map_err(Error::from)?;
        let inner = crate::IndexedFasta::new(
            fasta,
            open_index(&index_path)?,
            Options::default().with_encoding(encoding),
        )?;
        Ok(Self { inner })
    }

    /// Bases [start, end) of a sequence, 0-based
    fn get(&self, name: &str, start: u64, end: u64) -> PyResult<String> {
        Ok(self.inner.get(name, start, end)?)
    }

    /// Length of a sequence in bases
    fn seq_len(&self, name: &str) -> PyResult<u64> {
        Ok(self.inner.len(name)?)
    }

    /// Sequence names in file order
    fn seq_names(&self) -> Vec<String> {
        self.inner.seq_names().to_vec()
    }
}

/// Map of sequence name to length, read from the index alone
#[cfg(feature = "python")]
#[pyfunction]
fn reference_lengths(index_path: &str) -> PyResult<HashMap<String, u64>> {
    Ok(crate::reference_lengths(open_index(index_path)?)?)
}
