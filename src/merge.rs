//! Fragment merging at R-group placeholders.
//!
//! A merge removes one placeholder from each side and bonds the two atoms
//! they were attached to. Tetrahedral descriptors that listed a removed
//! placeholder now list the atom that takes its place, in the same position,
//! so the configuration is unchanged. A wedge or hash on a placeholder bond
//! moves to the new bond with the placeholder substituted, keeping its anchor.
//!
//! Every check runs before the first mutation. A failed merge leaves the
//! target molecule exactly as it was.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace, warn};

use crate::bond::BondStereo;
use crate::error::{MolError, MolResult, SiteDefect, Violation};
use crate::mol::{AtomIdx, BondIdx, Mol};
use crate::registry::placeholder_neighbor;
use crate::traits::{HasBondStereo, HasBondStereoMut, HasRGroup};

/// A validated merge site: the placeholder, its single bond and the real atom
/// on the other end.
#[derive(Debug, Clone, Copy)]
struct Site {
    placeholder: AtomIdx,
    neighbor: AtomIdx,
    bond: BondIdx,
}

fn site<A: HasRGroup, B>(mol: &Mol<A, B>, placeholder: AtomIdx) -> MolResult<Site> {
    let neighbor = placeholder_neighbor(mol, placeholder)?;
    let bond = mol
        .bond_between(placeholder, neighbor)
        .ok_or(MolError::DisconnectedMergeTarget(placeholder))?;
    Ok(Site {
        placeholder,
        neighbor,
        bond,
    })
}

/// At most one descriptor may list a placeholder as a ligand.
fn check_stereo_references<A, B>(mol: &Mol<A, B>, atom: AtomIdx) -> MolResult<()> {
    let count = mol
        .tetrahedral_stereo()
        .iter()
        .filter(|s| s.references(atom))
        .count();
    if count > 1 {
        return Err(Violation::StereoOverlap { atom, count }.into());
    }
    Ok(())
}

/// Count the numbered groups left in `mol` once `consumed` are gone.
fn leftover_groups<A: HasRGroup, B>(
    mol: &Mol<A, B>,
    consumed: &[AtomIdx],
    counts: &mut BTreeMap<u32, usize>,
) {
    for atom in mol.atoms().filter(|a| !consumed.contains(a)) {
        match mol.atom(atom).r_group_id() {
            Some(id) if id != 0 => *counts.entry(id).or_default() += 1,
            _ => {}
        }
    }
}

/// Each group id may label at most one placeholder of the result.
fn check_unique_groups(counts: &BTreeMap<u32, usize>) -> MolResult<()> {
    match counts.iter().find(|(_, &count)| count > 1) {
        Some((&id, &count)) => Err(Violation::DuplicateGroup { id, count }.into()),
        None => Ok(()),
    }
}

/// The placeholder bond's direction, re-expressed with `replacement` standing
/// where the placeholder was.
fn carried_direction<A, B: HasBondStereo>(
    mol: &Mol<A, B>,
    site: &Site,
    replacement: AtomIdx,
) -> Option<(AtomIdx, AtomIdx, BondStereo)> {
    let stereo = mol.bond(site.bond).bond_stereo();
    if stereo == BondStereo::None {
        return None;
    }
    let (a1, a2) = mol.bond_endpoints(site.bond)?;
    let swap = |x: AtomIdx| if x == site.placeholder { replacement } else { x };
    Some((swap(a1), swap(a2), stereo))
}

/// Endpoints, in stored order, and direction of the bond a merge creates.
fn joining_bond<A, B: HasBondStereo>(
    first: &Mol<A, B>,
    a: &Site,
    second: &Mol<A, B>,
    b: &Site,
) -> (AtomIdx, AtomIdx, BondStereo) {
    let from_first = carried_direction(first, a, b.neighbor);
    let from_second = carried_direction(second, b, a.neighbor);
    match (from_first, from_second) {
        (Some(kept), Some(dropped)) => {
            if kept != dropped {
                warn!(
                    "both merge bonds carry a direction ({:?} at {}, {:?} at {}); keeping the first",
                    kept.2, kept.0, dropped.2, dropped.0
                );
            }
            kept
        }
        (Some(layout), None) | (None, Some(layout)) => layout,
        (None, None) => (a.neighbor, b.neighbor, BondStereo::None),
    }
}

fn rewrite_ligand<A, B>(mol: &mut Mol<A, B>, old: AtomIdx, new: AtomIdx) {
    for s in mol.tetrahedral_stereo_mut() {
        if s.references(old) && s.replace_ligand(old, new) {
            trace!("stereo at {}: ligand {} replaced by {}", s.center, old, new);
        }
    }
}

/// Drop attachments whose group no longer has a placeholder.
fn prune_attachments<A: HasRGroup, B>(mol: &mut Mol<A, B>) {
    let live: BTreeSet<u32> = mol
        .atoms()
        .filter_map(|a| mol.atom(a).r_group_id())
        .collect();
    mol.attachments_mut()
        .retain(|att| att.group_id().map_or(true, |id| live.contains(&id)));
}

fn new_bond<B: Default + HasBondStereoMut>(stereo: BondStereo) -> B {
    let mut bond = B::default();
    bond.set_bond_stereo(stereo);
    bond
}

/// Join `first` and `second` at the given placeholders and return the result.
///
/// See [`merge_into`] for the semantics; this is the by-value form.
///
/// ```
/// use chemsplice::{merge, registry::find_r_group, Atom, Bond, Element, Molecule};
///
/// let mut methyl = Molecule::new();
/// let c = methyl.add_atom(Atom::new(Element::C).with_hydrogens(3));
/// let r = methyl.add_atom(Atom::r_group(1));
/// methyl.add_bond(c, r, Bond::default()).unwrap();
///
/// let mut hydroxyl = Molecule::new();
/// let o = hydroxyl.add_atom(Atom::new(Element::O).with_hydrogens(1));
/// let r2 = hydroxyl.add_atom(Atom::r_group(2));
/// hydroxyl.add_bond(o, r2, Bond::default()).unwrap();
///
/// let methanol = merge(methyl, r, hydroxyl, r2).unwrap();
/// assert_eq!(methanol.atom_count(), 2);
/// assert!(methanol.bond_between(c, o).is_some());
/// assert!(find_r_group(&methanol, 1).is_err());
/// ```
pub fn merge<A, B>(
    mut first: Mol<A, B>,
    first_r: AtomIdx,
    second: Mol<A, B>,
    second_r: AtomIdx,
) -> MolResult<Mol<A, B>>
where
    A: HasRGroup,
    B: Default + HasBondStereoMut,
{
    merge_into(&mut first, first_r, second, second_r)?;
    Ok(first)
}

/// Merge `second` into `first`, consuming placeholder `first_r` of `first`
/// and `second_r` of `second`.
///
/// Handles from `second` remain valid in `first` afterwards. The result has
/// `atoms(first) + atoms(second) - 2` atoms and
/// `bonds(first) + bonds(second) - 1` bonds.
///
/// The placeholders left on both sides must carry distinct group ids.
/// Otherwise the merge fails with [`Violation::DuplicateGroup`]; renumber one
/// side with [`crate::registry::renumber_r_group`] and retry.
pub fn merge_into<A, B>(
    first: &mut Mol<A, B>,
    first_r: AtomIdx,
    mut second: Mol<A, B>,
    second_r: AtomIdx,
) -> MolResult<()>
where
    A: HasRGroup,
    B: Default + HasBondStereoMut,
{
    let a = site(first, first_r)?;
    let b = site(&second, second_r)?;
    check_stereo_references(first, a.placeholder)?;
    check_stereo_references(&second, b.placeholder)?;
    let mut groups = BTreeMap::new();
    leftover_groups(first, &[a.placeholder], &mut groups);
    leftover_groups(&second, &[b.placeholder], &mut groups);
    check_unique_groups(&groups)?;
    let (from, to, stereo) = joining_bond(first, &a, &second, &b);

    let expected_atoms = first.atom_count() + second.atom_count() - 2;
    let expected_bonds = first.bond_count() + second.bond_count() - 1;

    rewrite_ligand(first, a.placeholder, b.neighbor);
    rewrite_ligand(&mut second, b.placeholder, a.neighbor);
    first.remove_atom(a.placeholder);
    second.remove_atom(b.placeholder);
    first.absorb(second);
    first.add_bond(from, to, new_bond(stereo))?;
    prune_attachments(first);

    debug_assert_eq!(first.atom_count(), expected_atoms);
    debug_assert_eq!(first.bond_count(), expected_bonds);
    debug!(
        "merged at {} and {}: bonded {} to {} ({:?}), now {} atoms",
        first_r,
        second_r,
        a.neighbor,
        b.neighbor,
        stereo,
        first.atom_count()
    );
    Ok(())
}

/// Merge a molecule with itself at two of its placeholders, closing a ring.
///
/// The result has two atoms and one bond fewer. Fails if both placeholders
/// hang off the same atom, or off two atoms that are already bonded.
pub fn close_ring<A, B>(mol: &mut Mol<A, B>, first_r: AtomIdx, second_r: AtomIdx) -> MolResult<()>
where
    A: HasRGroup,
    B: Default + HasBondStereoMut,
{
    if first_r == second_r {
        return Err(MolError::InvalidRGroupAtom {
            atom: first_r,
            defect: SiteDefect::SameAtom,
        });
    }
    let a = site(mol, first_r)?;
    let b = site(mol, second_r)?;
    if a.neighbor == b.neighbor {
        return Err(Violation::SelfLoop(a.neighbor).into());
    }
    if mol.bond_between(a.neighbor, b.neighbor).is_some() {
        return Err(Violation::DuplicateBond(a.neighbor, b.neighbor).into());
    }
    check_stereo_references(mol, a.placeholder)?;
    check_stereo_references(mol, b.placeholder)?;
    let mut groups = BTreeMap::new();
    leftover_groups(mol, &[a.placeholder, b.placeholder], &mut groups);
    check_unique_groups(&groups)?;
    let (from, to, stereo) = joining_bond(mol, &a, mol, &b);

    let expected_atoms = mol.atom_count() - 2;
    let expected_bonds = mol.bond_count() - 1;

    rewrite_ligand(mol, a.placeholder, b.neighbor);
    rewrite_ligand(mol, b.placeholder, a.neighbor);
    mol.remove_atom(a.placeholder);
    mol.remove_atom(b.placeholder);
    mol.add_bond(from, to, new_bond(stereo))?;
    prune_attachments(mol);

    debug_assert_eq!(mol.atom_count(), expected_atoms);
    debug_assert_eq!(mol.bond_count(), expected_bonds);
    debug!(
        "closed ring at {} and {}: bonded {} to {}",
        first_r, second_r, a.neighbor, b.neighbor
    );
    Ok(())
}
