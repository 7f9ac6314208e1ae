//! In-place transforms applied to extracted sequence bytes.

/// Post-processing step run over each extracted sequence before it is returned.
pub trait Transform: Send + Sync {
    fn apply(&self, seq: &mut [u8]);
}

impl<F> Transform for F
where
    F: Fn(&mut [u8]) + Send + Sync,
{
    fn apply(&self, seq: &mut [u8]) {
        self(seq)
    }
}

/// Built-in base encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Encoding {
    /// Bases exactly as stored in the file
    #[default]
    Raw,
    /// Upper-case A/C/G/T; anything else becomes N
    CleanAscii,
    /// 4-bit base codes: A=1, C=2, G=4, T=8, anything else 15
    Seq8,
}

impl Transform for Encoding {
    fn apply(&self, seq: &mut [u8]) {
        match self {
            Encoding::Raw => {}
            Encoding::CleanAscii => clean_ascii(seq),
            Encoding::Seq8 => ascii_to_seq8(seq),
        }
    }
}

pub fn clean_ascii(seq: &mut [u8]) {
    for b in seq.iter_mut() {
        *b = match b.to_ascii_uppercase() {
            c @ (b'A' | b'C' | b'G' | b'T') => c,
            _ => b'N',
        };
    }
}

pub fn ascii_to_seq8(seq: &mut [u8]) {
    for b in seq.iter_mut() {
        *b = match b.to_ascii_uppercase() {
            b'A' => 1,
            b'C' => 2,
            b'G' => 4,
            b'T' => 8,
            _ => 15,
        };
    }
}
