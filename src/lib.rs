pub mod cache;
pub mod config;
pub mod encoding;
pub mod error;
pub mod fasta;
pub mod index;
pub mod layout;
pub mod types;

#[cfg(feature = "python")]
pub mod python;

pub use config::Config;
pub use encoding::{Encoding, Transform};
pub use error::{Error, Result};
pub use fasta::{Fasta, IndexedFasta, Options};
pub use index::{IndexCatalog, IndexEntry, reference_lengths};
