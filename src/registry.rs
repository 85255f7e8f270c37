//! R-group bookkeeping: which placeholder carries which group id.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::atom::GroupFlag;
use crate::error::{MolError, MolResult, SiteDefect, Violation};
use crate::mol::{AtomIdx, Mol};
use crate::traits::{HasRGroup, HasRGroupMut};

/// All placeholder atoms, in handle order.
pub fn placeholders<A: HasRGroup, B>(mol: &Mol<A, B>) -> Vec<AtomIdx> {
    mol.atoms()
        .filter(|&a| mol.atom(a).is_placeholder())
        .collect()
}

/// Map every assigned group id to its placeholder.
///
/// Unassigned placeholders (id `0`) are skipped. Fails with
/// [`MolError::AmbiguousGroup`] if an id is carried by more than one atom.
pub fn r_groups<A: HasRGroup, B>(mol: &Mol<A, B>) -> MolResult<BTreeMap<u32, AtomIdx>> {
    let mut seen: BTreeMap<u32, Vec<AtomIdx>> = BTreeMap::new();
    for atom in mol.atoms() {
        match mol.atom(atom).r_group_id() {
            Some(0) | None => {}
            Some(id) => seen.entry(id).or_default().push(atom),
        }
    }
    seen.into_iter()
        .map(|(id, atoms)| match atoms.as_slice() {
            [single] => Ok((id, *single)),
            _ => Err(MolError::AmbiguousGroup {
                id,
                count: atoms.len(),
            }),
        })
        .collect()
}

/// The unique placeholder carrying group `id`.
pub fn find_r_group<A: HasRGroup, B>(mol: &Mol<A, B>, id: u32) -> MolResult<AtomIdx> {
    let matches: Vec<AtomIdx> = mol
        .atoms()
        .filter(|&a| mol.atom(a).r_group_id() == Some(id))
        .collect();
    match matches.as_slice() {
        [] => Err(MolError::GroupNotFound(id)),
        [single] => Ok(*single),
        _ => Err(MolError::AmbiguousGroup {
            id,
            count: matches.len(),
        }),
    }
}

/// Like [`find_r_group`], but a missing group is `Ok(None)` unless `required`.
pub fn r_group_atom<A: HasRGroup, B>(
    mol: &Mol<A, B>,
    id: u32,
    required: bool,
) -> MolResult<Option<AtomIdx>> {
    match find_r_group(mol, id) {
        Ok(atom) => Ok(Some(atom)),
        Err(MolError::GroupNotFound(_)) if !required => Ok(None),
        Err(e) => Err(e),
    }
}

/// Relabel every unprocessed placeholder carrying `from` to `to`.
///
/// Rewritten atoms are marked [`GroupFlag::Processed`], so a second call in
/// the same pass, or a chained `to -> from` rewrite, leaves them alone.
/// Returns the number of atoms rewritten. Attachments are not touched.
pub fn renumber_r_group<A: HasRGroupMut, B>(mol: &mut Mol<A, B>, from: u32, to: u32) -> usize {
    let targets: Vec<AtomIdx> = mol
        .atoms()
        .filter(|&a| {
            let atom = mol.atom(a);
            atom.r_group_id() == Some(from) && atom.group_flag() != GroupFlag::Processed
        })
        .collect();
    let mut rewritten = 0;
    for atom in targets {
        match relabel_placeholder(mol, atom, to) {
            Ok(()) => rewritten += 1,
            Err(e) => warn!("renumbering R{from}: {e}"),
        }
    }
    if rewritten > 0 {
        debug!("renumbered R{from} to R{to} on {rewritten} atom(s)");
    }
    rewritten
}

/// Give placeholder `atom` group `id` and mark it processed.
pub fn relabel_placeholder<A: HasRGroupMut, B>(
    mol: &mut Mol<A, B>,
    atom: AtomIdx,
    id: u32,
) -> MolResult<()> {
    mol.try_atom_mut(atom)
        .ok_or(MolError::UnknownAtom(atom))?
        .set_r_group_id(id)
        .map_err(|_| MolError::NotAPlaceholder(atom))
}

/// Clear the processed flag on every atom, starting a new renumbering pass.
pub fn reset_group_flags<A: HasRGroupMut, B>(mol: &mut Mol<A, B>) {
    let atoms: Vec<AtomIdx> = mol.atoms().collect();
    for atom in atoms {
        mol.atom_mut(atom).set_group_flag(GroupFlag::None);
    }
}

/// Whether exactly one stereo descriptor lists `atom` as a ligand.
///
/// Only meaningful for atoms with at most one bond; anything more connected
/// is reported as [`MolError::MultipleConnections`].
pub fn is_single_stereo<A, B>(mol: &Mol<A, B>, atom: AtomIdx) -> MolResult<bool> {
    if !mol.contains_atom(atom) {
        return Err(MolError::UnknownAtom(atom));
    }
    let bonds = mol.degree(atom);
    if bonds > 1 {
        return Err(MolError::MultipleConnections { atom, bonds });
    }
    let count = mol
        .tetrahedral_stereo()
        .iter()
        .filter(|s| s.references(atom))
        .count();
    match count {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(Violation::StereoOverlap { atom, count }.into()),
    }
}

/// The single real atom a placeholder is bonded to.
pub fn placeholder_neighbor<A: HasRGroup, B>(mol: &Mol<A, B>, atom: AtomIdx) -> MolResult<AtomIdx> {
    let data = mol.try_atom(atom).ok_or(MolError::UnknownAtom(atom))?;
    if !data.is_placeholder() {
        return Err(MolError::InvalidRGroupAtom {
            atom,
            defect: SiteDefect::NotPlaceholder,
        });
    }
    let bonds: Vec<_> = mol.bonds_of(atom).collect();
    let [bond] = bonds.as_slice() else {
        return Err(MolError::InvalidRGroupAtom {
            atom,
            defect: SiteDefect::Bonds(bonds.len()),
        });
    };
    mol.other_end(*bond, atom)
        .filter(|&n| mol.contains_atom(n))
        .ok_or(MolError::DisconnectedMergeTarget(atom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mol::{Parity, TetrahedralStereo};
    use crate::{Atom, Bond, Element, Molecule};

    /// C1 carrying R1, C2 carrying R2, joined by a single bond.
    fn two_sites() -> (Molecule, [AtomIdx; 4]) {
        let mut mol = Molecule::new();
        let c1 = mol.add_atom(Atom::new(Element::C).with_hydrogens(2));
        let c2 = mol.add_atom(Atom::new(Element::C).with_hydrogens(2));
        let r1 = mol.add_atom(Atom::r_group(1));
        let r2 = mol.add_atom(Atom::r_group(2));
        mol.add_bond(c1, c2, Bond::default()).unwrap();
        mol.add_bond(c1, r1, Bond::default()).unwrap();
        mol.add_bond(c2, r2, Bond::default()).unwrap();
        (mol, [c1, c2, r1, r2])
    }

    #[test]
    fn lookup_by_id() {
        let (mol, [_, _, r1, r2]) = two_sites();
        assert_eq!(find_r_group(&mol, 1), Ok(r1));
        assert_eq!(find_r_group(&mol, 2), Ok(r2));
        assert_eq!(find_r_group(&mol, 3), Err(MolError::GroupNotFound(3)));
        let all = r_groups(&mol).unwrap();
        assert_eq!(all.into_iter().collect::<Vec<_>>(), vec![(1, r1), (2, r2)]);
    }

    #[test]
    fn optional_lookup() {
        let (mol, [_, _, r1, _]) = two_sites();
        assert_eq!(r_group_atom(&mol, 1, true), Ok(Some(r1)));
        assert_eq!(r_group_atom(&mol, 7, false), Ok(None));
        assert_eq!(r_group_atom(&mol, 7, true), Err(MolError::GroupNotFound(7)));
    }

    #[test]
    fn ambiguous_ids_are_reported() {
        let (mut mol, [c1, _, _, _]) = two_sites();
        let extra = mol.add_atom(Atom::r_group(2));
        mol.add_bond(c1, extra, Bond::default()).unwrap();
        assert_eq!(
            find_r_group(&mol, 2),
            Err(MolError::AmbiguousGroup { id: 2, count: 2 })
        );
        assert!(r_groups(&mol).is_err());
        // Ambiguity is not the same as absence.
        assert!(r_group_atom(&mol, 2, false).is_err());
    }

    #[test]
    fn renumber_is_idempotent_within_a_pass() {
        let (mut mol, [_, _, r1, r2]) = two_sites();
        assert_eq!(renumber_r_group(&mut mol, 1, 2), 1);
        // r1 now carries 2 but is processed, so swapping back is blocked.
        assert_eq!(renumber_r_group(&mut mol, 2, 1), 1);
        assert_eq!(mol.atom(r1).r_group_id(), Some(2));
        assert_eq!(mol.atom(r2).r_group_id(), Some(1));
        assert_eq!(renumber_r_group(&mut mol, 2, 5), 0);

        reset_group_flags(&mut mol);
        assert_eq!(renumber_r_group(&mut mol, 2, 5), 1);
        assert_eq!(find_r_group(&mol, 5), Ok(r1));
    }

    #[test]
    fn renumber_missing_group_is_a_no_op() {
        let (mut mol, _) = two_sites();
        assert_eq!(renumber_r_group(&mut mol, 9, 1), 0);
    }

    #[test]
    fn single_stereo_detection() {
        let mut mol = Molecule::new();
        let c = mol.add_atom(Atom::new(Element::C).with_hydrogens(1));
        let r = mol.add_atom(Atom::r_group(1));
        let o = mol.add_atom(Atom::new(Element::O).with_hydrogens(1));
        let n = mol.add_atom(Atom::new(Element::N).with_hydrogens(2));
        for x in [r, o, n] {
            mol.add_bond(c, x, Bond::default()).unwrap();
        }
        assert_eq!(is_single_stereo(&mol, r), Ok(false));
        mol.add_stereo(TetrahedralStereo::new(c, [r, c, o, n], Parity::Clockwise))
            .unwrap();
        assert_eq!(is_single_stereo(&mol, r), Ok(true));
        assert_eq!(
            is_single_stereo(&mol, c),
            Err(MolError::MultipleConnections { atom: c, bonds: 3 })
        );
    }

    #[test]
    fn relabel_reports_the_offending_atom() {
        let (mut mol, [c1, _, r1, _]) = two_sites();
        assert_eq!(
            relabel_placeholder(&mut mol, c1, 4),
            Err(MolError::NotAPlaceholder(c1))
        );
        assert_eq!(mol.atom(c1).r_group_id(), None);
        relabel_placeholder(&mut mol, r1, 4).unwrap();
        assert_eq!(find_r_group(&mol, 4), Ok(r1));
        assert_eq!(mol.atom(r1).group_flag(), GroupFlag::Processed);
    }

    #[test]
    fn descriptors_sharing_a_ligand_fail_loudly() {
        let mut mol = Molecule::new();
        let c1 = mol.add_atom(Atom::new(Element::C).with_hydrogens(1));
        let c2 = mol.add_atom(Atom::new(Element::C).with_hydrogens(1));
        let r = mol.add_atom(Atom::r_group(1));
        let f = mol.add_atom(Atom::new(Element::F));
        let cl = mol.add_atom(Atom::new(Element::Cl));
        let br = mol.add_atom(Atom::new(Element::Br));
        let i = mol.add_atom(Atom::new(Element::I));
        mol.add_bond(c1, c2, Bond::default()).unwrap();
        mol.add_bond(c1, r, Bond::default()).unwrap();
        for (center, x) in [(c1, f), (c2, cl), (c2, br), (c2, i)] {
            mol.add_bond(center, x, Bond::default()).unwrap();
        }
        mol.add_stereo(TetrahedralStereo::new(c1, [r, c1, c2, f], Parity::Clockwise))
            .unwrap();
        mol.add_stereo(TetrahedralStereo::new(c2, [c1, cl, br, i], Parity::Clockwise))
            .unwrap();
        assert_eq!(is_single_stereo(&mol, r), Ok(true));

        // Point the second descriptor at the placeholder as well.
        for s in mol.tetrahedral_stereo_mut() {
            if s.center == c2 {
                s.replace_ligand(i, r);
            }
        }
        assert_eq!(
            is_single_stereo(&mol, r),
            Err(Violation::StereoOverlap { atom: r, count: 2 }.into())
        );
    }

    #[test]
    fn neighbour_of_placeholder() {
        let (mol, [c1, c2, r1, _]) = two_sites();
        assert_eq!(placeholder_neighbor(&mol, r1), Ok(c1));
        assert_eq!(
            placeholder_neighbor(&mol, c2),
            Err(MolError::InvalidRGroupAtom {
                atom: c2,
                defect: SiteDefect::NotPlaceholder
            })
        );
    }
}
