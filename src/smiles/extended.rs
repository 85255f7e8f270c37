//! ChemAxon extended SMILES: the `|...|` block after the SMILES string.
//!
//! Only the atom label section (`$label;label;...$`) is interpreted. `_R<n>`
//! labels name R-groups and are handed out, in order, to the placeholder atoms
//! in the order they appear in the SMILES. Other sections are skipped.

use log::debug;

use crate::atom::AtomKind;
use crate::mol::{AtomIdx, Molecule};
use crate::registry::placeholders;
use crate::smiles::error::SmilesError;

/// Split `"<smiles> |<extension>|"` into its two parts.
pub(crate) fn split_extension(text: &str) -> (&str, Option<&str>) {
    let text = text.trim();
    match text.find(char::is_whitespace) {
        Some(at) => {
            let rest = text[at..].trim_start();
            if rest.starts_with('|') {
                (text[..at].trim_end(), Some(rest))
            } else {
                (text, None)
            }
        }
        None => (text, None),
    }
}

/// Per-atom labels from the `$...$` section. Empty if there is none.
pub(crate) fn atom_labels(extension: &str) -> Result<Vec<String>, SmilesError> {
    let body = extension
        .strip_prefix('|')
        .and_then(|s| s.strip_suffix('|'))
        .ok_or(SmilesError::InvalidExtension {
            pos: 0,
            reason: "expected a block enclosed in '|'",
        })?;
    let Some(start) = body.find('$') else {
        return Ok(Vec::new());
    };
    let section = &body[start + 1..];
    let end = section.find('$').ok_or(SmilesError::InvalidExtension {
        pos: start + 1,
        reason: "unterminated atom label section",
    })?;
    if end + 1 < section.len() {
        debug!("skipping extension sections: {}", &section[end + 1..]);
    }
    Ok(section[..end].split(';').map(str::to_owned).collect())
}

/// Group ids named by `_R<n>` labels, in order.
pub(crate) fn r_group_ids(labels: &[String]) -> Result<Vec<u32>, SmilesError> {
    labels
        .iter()
        .filter_map(|label| label.strip_prefix("_R"))
        .map(|n| {
            n.parse().map_err(|_| SmilesError::InvalidExtension {
                pos: 0,
                reason: "R-group label without a number",
            })
        })
        .collect()
}

/// Apply the label section of `extension` to a freshly parsed molecule.
pub(crate) fn apply_labels(mol: &mut Molecule, extension: &str) -> Result<(), SmilesError> {
    let ids = r_group_ids(&atom_labels(extension)?)?;
    let targets: Vec<AtomIdx> = placeholders(mol);
    if ids.len() > targets.len() {
        return Err(SmilesError::LabelMismatch {
            labels: ids.len(),
            placeholders: targets.len(),
        });
    }
    for (atom, id) in targets.into_iter().zip(ids) {
        mol.atom_mut(atom).kind = AtomKind::RGroup(id);
    }
    Ok(())
}

/// The ` |$...$|` suffix for the given per-atom labels, or an empty string if
/// every label is empty.
pub(crate) fn label_block(labels: &[String]) -> String {
    if labels.iter().all(String::is_empty) {
        String::new()
    } else {
        format!(" |${}$|", labels.join(";"))
    }
}
