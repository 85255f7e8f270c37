//! Capping R-groups with the fragments named in a molecule's attachment table.

use log::debug;
use thiserror::Error;

use crate::error::MolError;
use crate::merge::merge_into;
use crate::mol::Molecule;
use crate::registry::{find_r_group, r_groups};
use crate::toolkit::Toolkit;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("no attachment describes R-group {0}")]
    MissingAttachment(u32),

    #[error("attachment {label} could not be read")]
    Fragment {
        label: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Mol(#[from] MolError),
}

/// Replace the placeholder of group `id` with its attachment fragment.
///
/// The fragment is read by `toolkit` and must carry a placeholder with the
/// same group id. On error `mol` is unchanged.
pub fn resolve_attachment<T: Toolkit>(
    toolkit: &T,
    mol: &mut Molecule,
    id: u32,
) -> Result<(), ResolveError> {
    let attachment = mol
        .attachments()
        .by_group(id)
        .cloned()
        .ok_or(ResolveError::MissingAttachment(id))?;
    let target = find_r_group(mol, id)?;
    let fragment = toolkit
        .parse(&attachment.smiles)
        .map_err(|e| ResolveError::Fragment {
            label: attachment.label.clone(),
            source: Box::new(e),
        })?;
    let cap = find_r_group(&fragment, id)?;
    debug!(
        "capping R{} with {} ({})",
        id, attachment.capping_group, attachment.smiles
    );
    merge_into(mol, target, fragment, cap)?;
    Ok(())
}

/// Cap every R-group that has an attachment. Returns how many were capped.
///
/// Groups without an attachment are left in place.
pub fn resolve_all<T: Toolkit>(toolkit: &T, mol: &mut Molecule) -> Result<usize, ResolveError> {
    let ids: Vec<u32> = r_groups(mol)?
        .into_keys()
        .filter(|&id| mol.attachments().by_group(id).is_some())
        .collect();
    for &id in &ids {
        resolve_attachment(toolkit, mol, id)?;
    }
    debug!("resolved {} attachments", ids.len());
    Ok(ids.len())
}
