//! Whole-graph queries used to observe merge results.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::mol::{AtomIdx, Mol};

/// Copy the topology into a dense petgraph graph.
fn compact<'m, A, B, N, E>(
    mol: &'m Mol<A, B>,
    node: impl Fn(&'m A) -> N,
    edge: impl Fn(&'m B) -> E,
) -> UnGraph<N, E> {
    let mut graph = UnGraph::with_capacity(mol.atom_count(), mol.bond_count());
    let mut index: BTreeMap<AtomIdx, NodeIndex> = BTreeMap::new();
    for atom in mol.atoms() {
        index.insert(atom, graph.add_node(node(mol.atom(atom))));
    }
    for bond in mol.bonds() {
        if let Some((a, b)) = mol.bond_endpoints(bond) {
            graph.add_edge(index[&a], index[&b], edge(mol.bond(bond)));
        }
    }
    graph
}

/// Atoms grouped by connected component. Each component is sorted, and
/// components are ordered by their smallest handle.
pub fn connected_components<A, B>(mol: &Mol<A, B>) -> Vec<Vec<AtomIdx>> {
    let mut visited = BTreeSet::new();
    let mut components = Vec::new();
    for start in mol.atoms() {
        if visited.contains(&start) {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            component.push(current);
            stack.extend(mol.neighbors(current).filter(|n| !visited.contains(n)));
        }
        component.sort();
        components.push(component);
    }
    components
}

pub fn num_components<A, B>(mol: &Mol<A, B>) -> usize {
    let graph = compact(mol, |_| (), |_| ());
    algo::connected_components(&graph)
}

/// True for a molecule with exactly one component. The empty molecule is not
/// connected.
pub fn is_connected<A, B>(mol: &Mol<A, B>) -> bool {
    num_components(mol) == 1
}

/// Number of independent rings: bonds − atoms + components.
pub fn ring_count<A, B>(mol: &Mol<A, B>) -> usize {
    (mol.bond_count() + num_components(mol)).saturating_sub(mol.atom_count())
}

/// Whether two molecules have the same constitution: an isomorphism that
/// matches atoms and bonds by `PartialEq` on their payloads. Stereo
/// descriptors and handles are ignored.
pub fn same_constitution<A, B>(first: &Mol<A, B>, second: &Mol<A, B>) -> bool
where
    A: PartialEq,
    B: PartialEq,
{
    if first.atom_count() != second.atom_count() || first.bond_count() != second.bond_count() {
        return false;
    }
    let g1 = compact(first, |a| a, |b| b);
    let g2 = compact(second, |a| a, |b| b);
    algo::is_isomorphic_matching(&g1, &g2, |a, b| a == b, |a, b| a == b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    #[test]
    fn components_are_ordered() {
        let mol = parse_smiles("[Na+].[Cl-].O").unwrap();
        let comps = connected_components(&mol);
        assert_eq!(comps.len(), 3);
        let ids: Vec<AtomIdx> = mol.atoms().collect();
        assert_eq!(comps, vec![vec![ids[0]], vec![ids[1]], vec![ids[2]]]);
        assert_eq!(num_components(&mol), 3);
        assert!(!is_connected(&mol));
    }

    #[test]
    fn single_component() {
        let mol = parse_smiles("CCO").unwrap();
        assert!(is_connected(&mol));
        assert_eq!(connected_components(&mol)[0].len(), 3);
    }

    #[test]
    fn empty_mol() {
        let mol: Mol<(), ()> = Mol::new();
        assert_eq!(num_components(&mol), 0);
        assert!(!is_connected(&mol));
        assert_eq!(ring_count(&mol), 0);
    }

    #[test]
    fn rings() {
        assert_eq!(ring_count(&parse_smiles("CCCC").unwrap()), 0);
        assert_eq!(ring_count(&parse_smiles("C1CCCCC1").unwrap()), 1);
        assert_eq!(ring_count(&parse_smiles("c1ccc2ccccc2c1").unwrap()), 2);
        assert_eq!(ring_count(&parse_smiles("C1CC1.C1CC1").unwrap()), 2);
    }

    #[test]
    fn constitution_ignores_atom_order() {
        let a = parse_smiles("OCC").unwrap();
        let b = parse_smiles("CCO").unwrap();
        assert!(same_constitution(&a, &b));
    }

    #[test]
    fn constitution_sees_bond_orders() {
        let a = parse_smiles("C=CC").unwrap();
        let b = parse_smiles("CCC").unwrap();
        assert!(!same_constitution(&a, &b));
        let c = parse_smiles("CC=C").unwrap();
        assert!(same_constitution(&a, &c));
    }
}
