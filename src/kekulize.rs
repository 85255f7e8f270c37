//! Kekulé assignment for aromatic ring systems.
//!
//! Aromatic bonds, as read from lowercase SMILES atoms, are rewritten in
//! place as alternating single and double bonds. Every aromatic atom that is
//! one bond order short of its valence receives exactly one double bond,
//! found by growing a matching along augmenting paths.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::debug;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::element::Element;
use crate::error::{MolError, MolResult};
use crate::mol::{AtomIdx, BondIdx, Mol, Molecule};
use crate::smiles::bond_order_sum;

type Adjacency = BTreeMap<AtomIdx, Vec<(AtomIdx, BondIdx)>>;

impl Mol<Atom, Bond> {
    /// Replace every aromatic bond with a single or double bond.
    ///
    /// Atoms of a kekulized system lose their aromatic flag. Hydrogen counts,
    /// charges, stereo descriptors and attachments are kept. Fails with
    /// [`MolError::Unkekulizable`] if no assignment exists, leaving the
    /// molecule unchanged.
    ///
    /// ```
    /// use chemsplice::{parse_smiles, to_smiles, BondOrder};
    ///
    /// let mut benzene = parse_smiles("c1ccccc1").unwrap();
    /// benzene.dearomatize().unwrap();
    /// let doubles = benzene
    ///     .bonds()
    ///     .filter(|&b| benzene.bond(b).order == BondOrder::Double)
    ///     .count();
    /// assert_eq!(doubles, 3);
    /// assert!(!to_smiles(&benzene).contains('c'));
    /// ```
    pub fn dearomatize(&mut self) -> MolResult<()> {
        let adjacency = aromatic_adjacency(self);
        if adjacency.is_empty() {
            return Ok(());
        }

        let needs_double: BTreeSet<AtomIdx> = adjacency
            .keys()
            .copied()
            .filter(|&a| needs_double_bond(self, a))
            .collect();

        let mut matched: BTreeMap<AtomIdx, BondIdx> = BTreeMap::new();
        for &start in &needs_double {
            if !matched.contains_key(&start) {
                augment(self, &adjacency, &needs_double, &mut matched, start);
            }
        }

        let unmatched: Vec<AtomIdx> = needs_double
            .iter()
            .copied()
            .filter(|a| !matched.contains_key(a))
            .collect();
        if !unmatched.is_empty() {
            return Err(MolError::Unkekulizable(unmatched));
        }

        let doubles: BTreeSet<BondIdx> = matched.values().copied().collect();
        let aromatic: BTreeSet<BondIdx> = adjacency
            .values()
            .flatten()
            .map(|&(_, bond)| bond)
            .collect();
        for &bond in &aromatic {
            self.bond_mut(bond).order = if doubles.contains(&bond) {
                BondOrder::Double
            } else {
                BondOrder::Single
            };
        }
        for &atom in adjacency.keys() {
            self.atom_mut(atom).is_aromatic = false;
        }

        debug!(
            "kekulized {} aromatic bonds over {} atoms, {} double",
            aromatic.len(),
            adjacency.len(),
            doubles.len()
        );
        Ok(())
    }
}

fn aromatic_adjacency(mol: &Molecule) -> Adjacency {
    let mut adjacency = Adjacency::new();
    for bond in mol.bonds() {
        if mol.bond(bond).order != BondOrder::Aromatic {
            continue;
        }
        if let Some((a, b)) = mol.bond_endpoints(bond) {
            adjacency.entry(a).or_default().push((b, bond));
            adjacency.entry(b).or_default().push((a, bond));
        }
    }
    adjacency
}

/// An aromatic atom one bond short of its valence, or a bare charged atom
/// two short (e.g. `[n+]`).
fn needs_double_bond(mol: &Molecule, atom: AtomIdx) -> bool {
    let data = mol.atom(atom);
    let Some(element) = data.element() else {
        return false;
    };
    let used = bond_order_sum(mol, atom).saturating_add(data.hydrogen_count);
    let Some(target) = target_valence(element, used, data.formal_charge) else {
        return false;
    };
    let gap = target - used;
    gap == 1 || (gap == 2 && data.hydrogen_count == 0 && data.formal_charge != 0)
}

/// Smallest charge-adjusted default valence that fits `used`.
fn target_valence(element: Element, used: u8, formal_charge: i8) -> Option<u8> {
    element
        .default_valences()
        .iter()
        .filter_map(|&v| u8::try_from(i16::from(v) + i16::from(formal_charge)).ok())
        .filter(|&v| v > 0)
        .find(|&v| v >= used)
}

/// Breadth-first search for an alternating path from the unmatched `start`
/// to another unmatched atom. Flips the path if one is found.
fn augment(
    mol: &Molecule,
    adjacency: &Adjacency,
    needs_double: &BTreeSet<AtomIdx>,
    matched: &mut BTreeMap<AtomIdx, BondIdx>,
    start: AtomIdx,
) -> bool {
    let mut prev: BTreeMap<AtomIdx, (AtomIdx, BondIdx)> = BTreeMap::new();
    let mut visited = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(u) = queue.pop_front() {
        for &(v, bond) in adjacency.get(&u).into_iter().flatten() {
            if !needs_double.contains(&v) || visited.contains(&v) {
                continue;
            }
            if matched.get(&u) == Some(&bond) {
                continue;
            }
            visited.insert(v);
            prev.insert(v, (u, bond));

            let Some(&partner_bond) = matched.get(&v) else {
                flip_path(matched, &prev, start, v);
                return true;
            };
            let Some(w) = mol.other_end(partner_bond, v) else {
                continue;
            };
            if visited.insert(w) {
                prev.insert(w, (v, partner_bond));
                queue.push_back(w);
            }
        }
    }
    false
}

fn flip_path(
    matched: &mut BTreeMap<AtomIdx, BondIdx>,
    prev: &BTreeMap<AtomIdx, (AtomIdx, BondIdx)>,
    start: AtomIdx,
    end: AtomIdx,
) {
    let mut cur = end;
    let mut is_new_match = true;
    while cur != start {
        let Some(&(p, bond)) = prev.get(&cur) else {
            return;
        };
        if is_new_match {
            matched.insert(cur, bond);
            matched.insert(p, bond);
        }
        is_new_match = !is_new_match;
        cur = p;
    }
}

#[cfg(test)]
mod tests {
    use crate::formula::mol_formula;
    use crate::smiles::{parse_smiles, to_smiles};
    use crate::{AtomIdx, BondOrder, Molecule};

    fn kekulized(smiles: &str) -> Molecule {
        let mut mol = parse_smiles(smiles).unwrap();
        mol.dearomatize().unwrap();
        mol
    }

    fn count_double_bonds(mol: &Molecule) -> usize {
        mol.bonds()
            .filter(|&b| mol.bond(b).order == BondOrder::Double)
            .count()
    }

    /// No atom carries two double bonds and nothing aromatic is left.
    fn assert_valid_kekule(mol: &Molecule) {
        for atom in mol.atoms() {
            let doubles = mol
                .bonds_of(atom)
                .filter(|&b| mol.bond(b).order == BondOrder::Double)
                .count();
            assert!(doubles <= 1, "atom {atom} has {doubles} double bonds");
            assert!(!mol.atom(atom).is_aromatic);
        }
        assert!(mol.bonds().all(|b| mol.bond(b).order != BondOrder::Aromatic));
    }

    #[test]
    fn benzene() {
        let mol = kekulized("c1ccccc1");
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(count_double_bonds(&mol), 3);
        assert_valid_kekule(&mol);
        for atom in mol.atoms() {
            assert_eq!(mol.atom(atom).hydrogen_count, 1);
        }

        let written = to_smiles(&mol);
        let reread = parse_smiles(&written).unwrap();
        assert_eq!(mol_formula(&reread), "C6H6");
        assert_eq!(count_double_bonds(&reread), 3);
    }

    #[test]
    fn five_membered_heterocycles() {
        for (smiles, doubles) in [("c1cc[nH]c1", 2), ("o1cccc1", 2), ("s1cccc1", 2), ("c1c[nH]cn1", 2)] {
            let mol = kekulized(smiles);
            assert_eq!(count_double_bonds(&mol), doubles, "{smiles}");
            assert_valid_kekule(&mol);
        }
    }

    #[test]
    fn charged_rings() {
        for (smiles, doubles) in [("[n+]1ccccc1", 3), ("C[n+]1ccccc1", 3), ("[cH-]1cccc1", 2)] {
            let mol = kekulized(smiles);
            assert_eq!(count_double_bonds(&mol), doubles, "{smiles}");
            assert_valid_kekule(&mol);
        }
    }

    #[test]
    fn fused_systems() {
        let mol = kekulized("c1ccc2ccccc2c1");
        assert_eq!(count_double_bonds(&mol), 5);
        assert_valid_kekule(&mol);

        let adenine = kekulized("Nc1ncnc2[nH]cnc12");
        assert_eq!(count_double_bonds(&adenine), 4);
        assert_valid_kekule(&adenine);
        assert_eq!(mol_formula(&adenine), "C5H5N5");
    }

    #[test]
    fn substituents_stay_single() {
        let mol = kekulized("Oc1ccccc1");
        let ids: Vec<AtomIdx> = mol.atoms().collect();
        let bond = mol.bond_between(ids[0], ids[1]).unwrap();
        assert_eq!(mol.bond(bond).order, BondOrder::Single);
        assert_eq!(mol.atom(ids[0]).hydrogen_count, 1);
        assert_eq!(count_double_bonds(&mol), 3);
    }

    #[test]
    fn non_aromatic_molecule_is_untouched() {
        let mol = kekulized("C=CC");
        let orders: Vec<BondOrder> = mol.bonds().map(|b| mol.bond(b).order).collect();
        assert_eq!(orders, vec![BondOrder::Double, BondOrder::Single]);
    }

    #[test]
    fn placeholder_on_ring_nitrogen() {
        let mut mol = parse_smiles("[*:1]n1cnc2c1ncnc2N").unwrap();
        mol.dearomatize().unwrap();
        assert_eq!(count_double_bonds(&mol), 4);
        assert_valid_kekule(&mol);
        assert!(crate::registry::find_r_group(&mol, 1).is_ok());
    }

    #[test]
    fn odd_ring_fails_and_leaves_molecule_alone() {
        let mut mol = parse_smiles("c1cccc1").unwrap();
        let err = mol.dearomatize().unwrap_err();
        assert!(matches!(err, crate::MolError::Unkekulizable(ref atoms) if !atoms.is_empty()));
        assert!(mol.bonds().all(|b| mol.bond(b).order == BondOrder::Aromatic));
        assert!(mol.atoms().all(|a| mol.atom(a).is_aromatic));
    }
}
