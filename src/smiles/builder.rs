use log::debug;

use crate::atom::{Atom, AtomKind};
use crate::bond::{Bond, BondOrder};
use crate::element::Element;
use crate::mol::{AtomIdx, Mol, Molecule, Parity, TetrahedralStereo};
use crate::smiles::error::SmilesError;
use crate::smiles::parse_tree::{ParseAtom, ParseTree};
use crate::smiles::tokenizer::{AtomToken, BondToken, ChiralityToken};
use crate::traits::HasBondOrder;

pub fn build_mol(tree: &ParseTree) -> Result<Molecule, SmilesError> {
    let mut mol = Molecule::new();
    let ids: Vec<AtomIdx> = tree
        .atoms
        .iter()
        .map(|parse_atom| mol.add_atom(atom_from_token(&parse_atom.token)))
        .collect();

    for (i, parse_atom) in tree.atoms.iter().enumerate() {
        for neighbor in &parse_atom.neighbors {
            let j = neighbor.atom_idx;
            if j <= i {
                continue;
            }
            let order = resolve_bond_order(
                neighbor.bond,
                parse_atom.token.is_aromatic,
                tree.atoms[j].token.is_aromatic,
            );
            mol.add_bond(ids[i], ids[j], Bond::new(order))?;
        }
    }

    resolve_hydrogen_counts(&mut mol, tree, &ids);
    resolve_chirality(&mut mol, tree, &ids)?;

    Ok(mol)
}

fn atom_from_token(tok: &AtomToken) -> Atom {
    let kind = match tok.element {
        Some(element) => AtomKind::Element(element),
        None => AtomKind::RGroup(tok.atom_class),
    };
    Atom {
        kind,
        formal_charge: tok.charge,
        isotope: tok.isotope,
        hydrogen_count: 0,
        is_aromatic: tok.is_aromatic,
        ..Atom::default()
    }
}

/// `/` and `\` are read as plain single bonds; double-bond geometry is not
/// kept.
fn resolve_bond_order(bond_tok: Option<BondToken>, from_aromatic: bool, to_aromatic: bool) -> BondOrder {
    match bond_tok {
        Some(BondToken::Single) | Some(BondToken::Up) | Some(BondToken::Down) => BondOrder::Single,
        Some(BondToken::Double) => BondOrder::Double,
        Some(BondToken::Triple) => BondOrder::Triple,
        Some(BondToken::Aromatic) => BondOrder::Aromatic,
        None if from_aromatic && to_aromatic => BondOrder::Aromatic,
        None => BondOrder::Single,
    }
}

fn resolve_hydrogen_counts(mol: &mut Molecule, tree: &ParseTree, ids: &[AtomIdx]) {
    for (parse_atom, &id) in tree.atoms.iter().zip(ids) {
        let tok = &parse_atom.token;
        let count = match tok.element {
            None => 0,
            Some(_) if tok.is_bracket => tok.hcount.unwrap_or(0),
            Some(element) => implicit_hydrogens(element, tok.is_aromatic, bond_order_sum(mol, id)),
        };
        mol.atom_mut(id).hydrogen_count = count;
    }
}

pub(crate) fn bond_order_sum<A, B: HasBondOrder>(mol: &Mol<A, B>, atom: AtomIdx) -> u8 {
    mol.bonds_of(atom)
        .fold(0u8, |sum, b| sum.saturating_add(mol.bond(b).bond_order().valence()))
}

/// Hydrogens a bare (unbracketed) atom receives: the smallest default
/// valence that fits the bonds, minus one for an aromatic atom.
pub(crate) fn implicit_hydrogens(element: Element, aromatic: bool, bond_sum: u8) -> u8 {
    let Some(&target) = element.default_valences().iter().find(|&&v| v >= bond_sum) else {
        return 0;
    };
    let h = target - bond_sum;
    if aromatic && h > 0 {
        h - 1
    } else {
        h
    }
}

/// Turn `@`/`@@` into descriptors. Ligands are listed in reading order with
/// a bracket hydrogen, or the lone pair of a three-connected centre, placed
/// right after the parent (or first, if there is no parent). Either one is
/// represented by the centre itself.
fn resolve_chirality(mol: &mut Molecule, tree: &ParseTree, ids: &[AtomIdx]) -> Result<(), SmilesError> {
    for (i, parse_atom) in tree.atoms.iter().enumerate() {
        let parity = match parse_atom.token.chirality {
            ChiralityToken::None => continue,
            ChiralityToken::Anticlockwise => Parity::Anticlockwise,
            ChiralityToken::Clockwise => Parity::Clockwise,
        };
        let center = ids[i];
        let ligands = ligand_order(parse_atom, center, ids);
        let count = ligands.len();
        let Ok(ligands) = <[AtomIdx; 4]>::try_from(ligands) else {
            debug!("ignoring chirality on atom {i}: {count} ligands");
            continue;
        };
        mol.add_stereo(TetrahedralStereo::new(center, ligands, parity))?;
    }
    Ok(())
}

fn ligand_order(parse_atom: &ParseAtom, center: AtomIdx, ids: &[AtomIdx]) -> Vec<AtomIdx> {
    let mut written = parse_atom.neighbors.iter().map(|n| ids[n.atom_idx]);
    let mut ligands = Vec::with_capacity(4);
    if parse_atom.parent.is_some() {
        ligands.extend(written.next());
    }
    let lone_pair = parse_atom.token.hcount.unwrap_or(0) == 0 && parse_atom.neighbors.len() == 3;
    if parse_atom.token.hcount == Some(1) || lone_pair {
        ligands.push(center);
    }
    ligands.extend(written);
    ligands
}
