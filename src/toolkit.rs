//! The seam to a text-handling chemistry toolkit.
//!
//! The merge engine never parses or writes text itself. Attachment resolution
//! and callers that want to observe results go through [`Toolkit`], and
//! [`SmilesToolkit`] is the implementation shipped with the crate.

use crate::attachment::AttachmentList;
use crate::mol::Molecule;
use crate::smiles::{parse_smiles, write_smiles, SmilesError};

/// Output notation for [`Toolkit::serialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Format {
    /// Plain SMILES; placeholders carry their group id as an atom class.
    #[default]
    Smiles,
    /// ChemAxon extended SMILES with a `|$...$|` label block.
    ExtendedSmiles,
}

pub trait Toolkit {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build a molecule from text.
    fn parse(&self, text: &str) -> Result<Molecule, Self::Error>;

    /// Build a molecule and attach the table describing its R-groups.
    fn molecule(&self, text: &str, attachments: AttachmentList) -> Result<Molecule, Self::Error> {
        Ok(self.parse(text)?.with_attachments(attachments))
    }

    fn serialize(&self, mol: &Molecule, format: Format) -> String;

    /// Whether `text` parses to a non-empty molecule.
    fn validate(&self, text: &str) -> bool {
        self.parse(text).is_ok_and(|mol| mol.atom_count() > 0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SmilesToolkit;

impl Toolkit for SmilesToolkit {
    type Error = SmilesError;

    fn parse(&self, text: &str) -> Result<Molecule, SmilesError> {
        parse_smiles(text)
    }

    fn serialize(&self, mol: &Molecule, format: Format) -> String {
        write_smiles(mol, format)
    }
}
