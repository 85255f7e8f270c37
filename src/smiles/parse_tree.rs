use std::collections::BTreeMap;

use crate::smiles::error::SmilesError;
use crate::smiles::tokenizer::{AtomToken, BondToken, Token};

#[derive(Debug, Clone)]
pub struct ParseAtom {
    pub token: AtomToken,
    /// The atom this one was written after, if any. When present it is
    /// always `neighbors[0]`.
    pub parent: Option<usize>,
    /// Neighbours in the order SMILES stereo rules read them: parent, ring
    /// closures where their digit appears, then branches and the chain.
    pub neighbors: Vec<Neighbor>,
}

#[derive(Debug, Clone)]
pub struct Neighbor {
    pub bond: Option<BondToken>,
    pub atom_idx: usize,
}

#[derive(Debug, Clone)]
pub struct ParseTree {
    pub atoms: Vec<ParseAtom>,
}

struct RingOpen {
    atom: usize,
    bond: Option<BondToken>,
    /// Index into the opening atom's neighbour list reserved for the partner.
    slot: usize,
}

pub fn build_parse_tree(tokens: &[Token]) -> Result<ParseTree, SmilesError> {
    let mut atoms: Vec<ParseAtom> = Vec::new();
    let mut branches: Vec<(usize, usize)> = Vec::new();
    let mut current: Option<usize> = None;
    let mut pending_bond: Option<BondToken> = None;
    let mut ring_opens: BTreeMap<u16, RingOpen> = BTreeMap::new();

    for token in tokens {
        match token {
            Token::Atom(atom_tok) => {
                let idx = atoms.len();
                atoms.push(ParseAtom {
                    token: atom_tok.clone(),
                    parent: current,
                    neighbors: Vec::new(),
                });
                let bond = pending_bond.take();
                if let Some(cur) = current {
                    atoms[cur].neighbors.push(Neighbor {
                        bond,
                        atom_idx: idx,
                    });
                    atoms[idx].neighbors.push(Neighbor {
                        bond,
                        atom_idx: cur,
                    });
                }
                current = Some(idx);
            }
            Token::Bond(b) => {
                pending_bond = Some(*b);
            }
            Token::RingClosure { bond, digit, pos } => {
                let cur = current.ok_or(SmilesError::InvalidRingBond {
                    digit: *digit,
                    pos: *pos,
                })?;

                match ring_opens.remove(digit) {
                    Some(open) => {
                        if open.atom == cur {
                            return Err(SmilesError::InvalidRingBond {
                                digit: *digit,
                                pos: *pos,
                            });
                        }
                        let ring_bond = match (*bond, open.bond) {
                            (Some(b1), Some(b2)) if b1 != b2 => {
                                return Err(SmilesError::RingBondConflict { digit: *digit });
                            }
                            (b1, b2) => b1.or(b2),
                        };
                        atoms[open.atom].neighbors[open.slot] = Neighbor {
                            bond: ring_bond,
                            atom_idx: cur,
                        };
                        atoms[cur].neighbors.push(Neighbor {
                            bond: ring_bond,
                            atom_idx: open.atom,
                        });
                    }
                    None => {
                        let slot = atoms[cur].neighbors.len();
                        // Filled in when the ring closes.
                        atoms[cur].neighbors.push(Neighbor {
                            bond: None,
                            atom_idx: cur,
                        });
                        ring_opens.insert(
                            *digit,
                            RingOpen {
                                atom: cur,
                                bond: *bond,
                                slot,
                            },
                        );
                    }
                }
            }
            Token::OpenParen(pos) => {
                let cur = current.ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                branches.push((cur, *pos));
            }
            Token::CloseParen(pos) => {
                let (cur, _) = branches
                    .pop()
                    .ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                current = Some(cur);
                pending_bond = None;
            }
            Token::Dot(_) => {
                current = None;
                pending_bond = None;
            }
        }
    }

    if let Some(&(_, pos)) = branches.last() {
        return Err(SmilesError::UnmatchedParen { pos });
    }
    if let Some(&digit) = ring_opens.keys().next() {
        return Err(SmilesError::UnclosedRing { digit });
    }

    Ok(ParseTree { atoms })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::tokenizer::tokenize;

    fn tree(s: &str) -> ParseTree {
        build_parse_tree(&tokenize(s).unwrap()).unwrap()
    }

    fn neighbor_ids(tree: &ParseTree, i: usize) -> Vec<usize> {
        tree.atoms[i].neighbors.iter().map(|n| n.atom_idx).collect()
    }

    #[test]
    fn ethane_tree() {
        let tree = tree("CC");
        assert_eq!(tree.atoms.len(), 2);
        assert_eq!(neighbor_ids(&tree, 0), vec![1]);
        assert_eq!(tree.atoms[1].parent, Some(0));
    }

    #[test]
    fn cyclohexane_tree() {
        let tree = tree("C1CCCCC1");
        assert_eq!(tree.atoms.len(), 6);
        for atom in &tree.atoms {
            assert_eq!(atom.neighbors.len(), 2);
        }
    }

    #[test]
    fn ring_partner_sits_where_the_digit_was_written() {
        // Atom 1 reads: parent 0, ring partner 4, branch 2, chain 3.
        let tree = tree("CC1(F)CC1");
        assert_eq!(neighbor_ids(&tree, 1), vec![0, 4, 2, 3]);
    }

    #[test]
    fn branch_tree() {
        let tree = tree("CC(C)C");
        assert_eq!(tree.atoms.len(), 4);
        assert_eq!(neighbor_ids(&tree, 1), vec![0, 2, 3]);
        assert_eq!(tree.atoms[3].parent, Some(1));
    }

    #[test]
    fn ring_bond_from_either_end() {
        let t = tree("C=1CCC1");
        assert_eq!(t.atoms[0].neighbors[0].bond, Some(BondToken::Double));
        let t = tree("C1CCC=1");
        assert_eq!(t.atoms[0].neighbors[0].bond, Some(BondToken::Double));
    }

    #[test]
    fn conflicting_ring_bonds() {
        let tokens = tokenize("C=1CCC#1").unwrap();
        assert_eq!(
            build_parse_tree(&tokens).unwrap_err(),
            SmilesError::RingBondConflict { digit: 1 }
        );
    }

    #[test]
    fn unclosed_ring_error() {
        let tokens = tokenize("C1CC").unwrap();
        assert_eq!(
            build_parse_tree(&tokens).unwrap_err(),
            SmilesError::UnclosedRing { digit: 1 }
        );
    }

    #[test]
    fn unmatched_paren_error() {
        let tokens = tokenize("C(C").unwrap();
        assert_eq!(
            build_parse_tree(&tokens).unwrap_err(),
            SmilesError::UnmatchedParen { pos: 1 }
        );
        let tokens = tokenize("CC)").unwrap();
        assert!(build_parse_tree(&tokens).is_err());
    }

    #[test]
    fn disconnected() {
        let tree = tree("[Na+].[Cl-]");
        assert_eq!(tree.atoms.len(), 2);
        assert!(tree.atoms[0].neighbors.is_empty());
        assert_eq!(tree.atoms[1].parent, None);
    }
}
