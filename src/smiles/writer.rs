use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use crate::atom::{Atom, AtomKind};
use crate::bond::BondOrder;
use crate::graph_ops::connected_components;
use crate::mol::{AtomIdx, BondIdx, Molecule, Parity};
use crate::smiles::builder::{bond_order_sum, implicit_hydrogens};
use crate::smiles::extended::label_block;
use crate::toolkit::Format;

/// SMILES with placeholders written as `[*:n]`.
pub fn to_smiles(mol: &Molecule) -> String {
    write_smiles(mol, Format::Smiles)
}

/// SMILES with placeholders written as `*`, followed by a ChemAxon
/// `|$...$|` block carrying their `_R<n>` labels.
pub fn to_extended_smiles(mol: &Molecule) -> String {
    write_smiles(mol, Format::ExtendedSmiles)
}

pub(crate) fn write_smiles(mol: &Molecule, format: Format) -> String {
    let mut writer = Writer::new(mol, format);
    for (i, component) in connected_components(mol).into_iter().enumerate() {
        let Some(&start) = component.first() else {
            continue;
        };
        if i > 0 {
            writer.out.push('.');
        }
        writer.layout(start);
        writer.write_node(start);
    }

    let mut out = writer.out;
    if format == Format::ExtendedSmiles {
        let labels: Vec<String> = writer
            .written
            .iter()
            .map(|&a| match mol.atom(a).kind {
                AtomKind::RGroup(id) if id > 0 => format!("_R{id}"),
                _ => String::new(),
            })
            .collect();
        out.push_str(&label_block(&labels));
    }
    out
}

#[derive(Debug, Clone, Copy)]
struct RingBond {
    other: AtomIdx,
    bond: BondIdx,
}

struct Writer<'a> {
    mol: &'a Molecule,
    format: Format,
    visited: BTreeSet<AtomIdx>,
    used: BTreeSet<BondIdx>,
    parent: BTreeMap<AtomIdx, AtomIdx>,
    children: BTreeMap<AtomIdx, Vec<AtomIdx>>,
    /// Ring bonds whose digit is written first at this atom.
    ring_opens: BTreeMap<AtomIdx, Vec<RingBond>>,
    /// Ring bonds whose digit is written second at this atom.
    ring_closes: BTreeMap<AtomIdx, Vec<RingBond>>,
    digits: BTreeMap<BondIdx, u16>,
    free_digits: BTreeSet<u16>,
    next_digit: u16,
    written: Vec<AtomIdx>,
    out: String,
}

impl<'a> Writer<'a> {
    fn new(mol: &'a Molecule, format: Format) -> Self {
        Self {
            mol,
            format,
            visited: BTreeSet::new(),
            used: BTreeSet::new(),
            parent: BTreeMap::new(),
            children: BTreeMap::new(),
            ring_opens: BTreeMap::new(),
            ring_closes: BTreeMap::new(),
            digits: BTreeMap::new(),
            free_digits: BTreeSet::new(),
            next_digit: 1,
            written: Vec::new(),
            out: String::new(),
        }
    }

    fn adjacent(&self, atom: AtomIdx) -> Vec<(BondIdx, AtomIdx)> {
        self.mol
            .bonds_of(atom)
            .filter_map(|b| Some((b, self.mol.other_end(b, atom)?)))
            .collect()
    }

    /// Depth-first spanning tree of one component. Non-tree bonds become
    /// ring closures, opened at the atom visited first.
    fn layout(&mut self, start: AtomIdx) {
        self.visited.insert(start);
        let mut stack = vec![(start, self.adjacent(start), 0usize)];
        while let Some((node, adjacent, next)) = stack.last_mut() {
            let Some(&(bond, neighbor)) = adjacent.get(*next) else {
                stack.pop();
                continue;
            };
            *next += 1;
            let node = *node;
            if !self.used.insert(bond) {
                continue;
            }
            if self.visited.insert(neighbor) {
                self.parent.insert(neighbor, node);
                self.children.entry(node).or_default().push(neighbor);
                let adjacent = self.adjacent(neighbor);
                stack.push((neighbor, adjacent, 0));
            } else {
                self.ring_opens
                    .entry(neighbor)
                    .or_default()
                    .push(RingBond { other: node, bond });
                self.ring_closes.entry(node).or_default().push(RingBond {
                    other: neighbor,
                    bond,
                });
            }
        }
    }

    fn allocate_digit(&mut self) -> u16 {
        match self.free_digits.pop_first() {
            Some(d) => d,
            None => {
                let d = self.next_digit;
                self.next_digit += 1;
                d
            }
        }
    }

    fn write_node(&mut self, node: AtomIdx) {
        let closes = self.ring_closes.get(&node).cloned().unwrap_or_default();
        let opens = self.ring_opens.get(&node).cloned().unwrap_or_default();
        let kids = self.children.get(&node).cloned().unwrap_or_default();

        let parity = self.chirality(node, &closes, &opens, &kids);
        self.write_atom(node, parity);
        self.written.push(node);

        for rb in &closes {
            if let Some(d) = self.digits.remove(&rb.bond) {
                push_ring_digit(d, &mut self.out);
                self.free_digits.insert(d);
            }
        }
        for rb in &opens {
            let symbol = bond_symbol(self.mol, rb.bond, node, rb.other);
            self.out.push_str(symbol);
            let d = self.allocate_digit();
            self.digits.insert(rb.bond, d);
            push_ring_digit(d, &mut self.out);
        }

        let last = kids.len().saturating_sub(1);
        for (i, &child) in kids.iter().enumerate() {
            let is_branch = i < last;
            if is_branch {
                self.out.push('(');
            }
            if let Some(bond) = self.mol.bond_between(node, child) {
                self.out.push_str(bond_symbol(self.mol, bond, node, child));
            }
            self.write_node(child);
            if is_branch {
                self.out.push(')');
            }
        }
    }

    /// The `@`/`@@` to write, given the order the neighbours will appear in.
    fn chirality(
        &self,
        node: AtomIdx,
        closes: &[RingBond],
        opens: &[RingBond],
        kids: &[AtomIdx],
    ) -> Option<Parity> {
        let stereo = self.mol.tetrahedral_stereo_for(node)?;
        let mut order = Vec::with_capacity(4);
        order.extend(self.parent.get(&node).copied());
        if stereo.ligands.contains(&node) {
            order.push(node);
        }
        order.extend(closes.iter().map(|rb| rb.other));
        order.extend(opens.iter().map(|rb| rb.other));
        order.extend_from_slice(kids);
        let order: [AtomIdx; 4] = order.try_into().ok()?;
        stereo.parity_for(&order)
    }

    fn write_atom(&mut self, node: AtomIdx, parity: Option<Parity>) {
        let atom = self.mol.atom(node);
        let element = match atom.kind {
            AtomKind::RGroup(id) => {
                match (self.format, id) {
                    (Format::Smiles, id) if id > 0 => {
                        let _ = write!(self.out, "[*:{id}]");
                    }
                    _ => self.out.push('*'),
                }
                return;
            }
            AtomKind::Element(e) => e,
        };

        if parity.is_none() && can_write_bare(self.mol, node, atom) {
            push_symbol(element.symbol(), atom.is_aromatic, &mut self.out);
            return;
        }

        self.out.push('[');
        if atom.isotope != 0 {
            let _ = write!(self.out, "{}", atom.isotope);
        }
        push_symbol(element.symbol(), atom.is_aromatic, &mut self.out);
        match parity {
            Some(Parity::Anticlockwise) => self.out.push('@'),
            Some(Parity::Clockwise) => self.out.push_str("@@"),
            None => {}
        }
        match atom.hydrogen_count {
            0 => {}
            1 => self.out.push('H'),
            n => {
                let _ = write!(self.out, "H{n}");
            }
        }
        match atom.formal_charge {
            0 => {}
            1 => self.out.push('+'),
            -1 => self.out.push('-'),
            c if c > 0 => {
                let _ = write!(self.out, "+{c}");
            }
            c => {
                let _ = write!(self.out, "-{}", c.unsigned_abs());
            }
        }
        self.out.push(']');
    }
}

fn can_write_bare(mol: &Molecule, node: AtomIdx, atom: &Atom) -> bool {
    let Some(element) = atom.element() else {
        return false;
    };
    if !element.is_organic_subset() || atom.isotope != 0 || atom.formal_charge != 0 {
        return false;
    }
    if atom.is_aromatic && !matches!(element.symbol(), "B" | "C" | "N" | "O" | "P" | "S") {
        return false;
    }
    atom.hydrogen_count == implicit_hydrogens(element, atom.is_aromatic, bond_order_sum(mol, node))
}

fn push_symbol(symbol: &str, aromatic: bool, out: &mut String) {
    if aromatic {
        out.extend(symbol.chars().map(|c| c.to_ascii_lowercase()));
    } else {
        out.push_str(symbol);
    }
}

/// The bond character the reader needs to recover this bond's order.
fn bond_symbol(mol: &Molecule, bond: BondIdx, from: AtomIdx, to: AtomIdx) -> &'static str {
    let both_aromatic = mol.atom(from).is_aromatic && mol.atom(to).is_aromatic;
    match (mol.bond(bond).order, both_aromatic) {
        (BondOrder::Single, true) => "-",
        (BondOrder::Single, false) => "",
        (BondOrder::Double, _) => "=",
        (BondOrder::Triple, _) => "#",
        (BondOrder::Aromatic, true) => "",
        (BondOrder::Aromatic, false) => ":",
    }
}

fn push_ring_digit(d: u16, out: &mut String) {
    let _ = match d {
        0..=9 => write!(out, "{d}"),
        10..=99 => write!(out, "%{d}"),
        _ => write!(out, "%({d})"),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_ops::same_constitution;
    use crate::smiles::parse_smiles;

    fn round_trip(smiles: &str) -> (Molecule, Molecule, String) {
        let mol1 = parse_smiles(smiles).unwrap();
        let written = to_smiles(&mol1);
        let mol2 = parse_smiles(&written).unwrap_or_else(|e| {
            panic!("failed to re-parse '{written}' (from '{smiles}'): {e}");
        });
        (mol1, mol2, written)
    }

    #[test]
    fn simple_chains_are_reproduced() {
        for s in ["C", "CCO", "CC(=O)O", "C#N", "CC(C)(C)C", "[Na+].[Cl-]"] {
            let (_, _, written) = round_trip(s);
            assert_eq!(written, s);
        }
    }

    #[test]
    fn rings_reuse_digits() {
        let (mol1, mol2, written) = round_trip("C1CC1C1CC1");
        assert!(!written.contains('2'), "{written}");
        assert!(same_constitution(&mol1, &mol2));
    }

    #[test]
    fn aromatic_rings_round_trip() {
        for s in [
            "c1ccccc1",
            "c1ccc(-c2ccccc2)cc1",
            "Cn1cnc2c1c(=O)n(C)c(=O)n2C",
            "c1cc[nH]c1",
        ] {
            let (mol1, mol2, written) = round_trip(s);
            assert!(same_constitution(&mol1, &mol2), "{s} -> {written}");
        }
    }

    #[test]
    fn chirality_round_trips() {
        let (_, _, written) = round_trip("N[C@@H](C)C(=O)O");
        assert_eq!(written, "N[C@@H](C)C(=O)O");
        let (_, _, written) = round_trip("N[C@H](C)C(=O)O");
        assert_eq!(written, "N[C@H](C)C(=O)O");
    }

    #[test]
    fn lone_pair_chirality_round_trips() {
        for s in ["C[S@](=O)CC", "C[S@@](=O)CC"] {
            let (mol1, mol2, written) = round_trip(s);
            assert_eq!(written, s);
            assert_eq!(mol1.tetrahedral_stereo().len(), 1);
            assert_eq!(mol2.tetrahedral_stereo().len(), 1);
        }
    }

    #[test]
    fn chirality_follows_written_order() {
        let mut mol = parse_smiles("N[C@@H](C)C(=O)O").unwrap();
        let ids: Vec<AtomIdx> = mol.atoms().collect();
        // Same configuration, ligands listed with one swap.
        mol.add_stereo(crate::mol::TetrahedralStereo::new(
            ids[1],
            [ids[2], ids[1], ids[0], ids[3]],
            Parity::Anticlockwise,
        ))
        .unwrap();
        assert_eq!(to_smiles(&mol), "N[C@@H](C)C(=O)O");
    }

    #[test]
    fn placeholders_by_format() {
        let mol = parse_smiles("O[*] |$;_R2$|").unwrap();
        assert_eq!(to_smiles(&mol), "O[*:2]");
        assert_eq!(to_extended_smiles(&mol), "O* |$;_R2$|");
        let unlabelled = parse_smiles("CC*").unwrap();
        assert_eq!(to_extended_smiles(&unlabelled), "CC*");
    }

    #[test]
    fn bracket_atoms() {
        for s in ["[13CH4]", "[NH4+]", "[O-2]", "[Fe+3]", "[H]C([H])([H])[H]"] {
            let (_, _, written) = round_trip(s);
            assert_eq!(written, s);
        }
    }
}
