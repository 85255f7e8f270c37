use thiserror::Error;

use crate::error::MolError;

/// Errors produced when reading a SMILES or extended SMILES string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmilesError {
    #[error("unexpected end of SMILES")]
    UnexpectedEnd,

    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },

    #[error("invalid element '{text}' at position {pos}")]
    InvalidElement { pos: usize, text: String },

    #[error("unclosed bracket atom starting at position {pos}")]
    UnclosedBracket { pos: usize },

    /// A ring-opening digit was never matched by a ring-closing digit.
    #[error("unclosed ring {digit}")]
    UnclosedRing { digit: u16 },

    #[error("unmatched parenthesis at position {pos}")]
    UnmatchedParen { pos: usize },

    #[error("invalid charge at position {pos}")]
    InvalidCharge { pos: usize },

    #[error("number overflow at position {pos}")]
    NumberOverflow { pos: usize },

    /// A ring-closure digit with no atom to attach to, or closing on itself.
    #[error("invalid ring bond {digit} at position {pos}")]
    InvalidRingBond { digit: u16, pos: usize },

    #[error("empty SMILES string")]
    EmptyInput,

    /// Both ends of a ring closure name a bond, and they disagree.
    #[error("conflicting bond types on ring closure {digit}")]
    RingBondConflict { digit: u16 },

    /// The `|...|` extension block after the SMILES could not be read.
    #[error("malformed extension block at position {pos}: {reason}")]
    InvalidExtension { pos: usize, reason: &'static str },

    /// More R-group labels than placeholder atoms.
    #[error("{labels} R-group labels for {placeholders} placeholder atoms")]
    LabelMismatch { labels: usize, placeholders: usize },

    /// The parsed graph breaks a structural rule (e.g. a duplicate bond).
    #[error(transparent)]
    Structure(#[from] MolError),
}
