//! SMILES and ChemAxon extended SMILES reading and writing.
//!
//! [`parse_smiles`] accepts plain SMILES (`[*:n]` names a placeholder's group
//! directly) and extended SMILES, where a trailing `|$...$|` block labels the
//! placeholders `_R<n>`. [`to_smiles`] and [`to_extended_smiles`] write the
//! two flavours back.

mod builder;
pub mod error;
mod extended;
mod parse_tree;
mod tokenizer;
mod writer;

use crate::mol::Molecule;
pub use error::SmilesError;
pub use writer::{to_extended_smiles, to_smiles};
pub(crate) use builder::bond_order_sum;
pub(crate) use writer::write_smiles;

pub fn parse_smiles(s: &str) -> Result<Molecule, SmilesError> {
    let (smiles, extension) = extended::split_extension(s);
    if smiles.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tokens = tokenizer::tokenize(smiles)?;
    if tokens.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tree = parse_tree::build_parse_tree(&tokens)?;
    let mut mol = builder::build_mol(&tree)?;
    if let Some(extension) = extension {
        extended::apply_labels(&mut mol, extension)?;
    }
    Ok(mol)
}
