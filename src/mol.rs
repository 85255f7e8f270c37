use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;

use crate::atom::Atom;
use crate::attachment::AttachmentList;
use crate::bond::Bond;
use crate::error::{MolError, MolResult, Violation};
use crate::traits::HasRGroup;

static NEXT_ATOM: AtomicU64 = AtomicU64::new(1);
static NEXT_BOND: AtomicU64 = AtomicU64::new(1);

/// Stable handle to an atom.
///
/// Handles are never reused. They survive removal of other atoms and stay
/// valid when a merge moves the atom into another molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomIdx(u64);

/// Stable handle to a bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BondIdx(u64);

impl AtomIdx {
    fn fresh() -> Self {
        AtomIdx(NEXT_ATOM.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl BondIdx {
    fn fresh() -> Self {
        BondIdx(NEXT_BOND.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AtomIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

impl fmt::Display for BondIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

/// Winding of ligands 2..4 when viewed from ligand 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parity {
    Clockwise,
    Anticlockwise,
}

impl Parity {
    pub fn inverted(self) -> Self {
        match self {
            Parity::Clockwise => Parity::Anticlockwise,
            Parity::Anticlockwise => Parity::Clockwise,
        }
    }
}

/// Tetrahedral chirality at `center`.
///
/// Looking from `ligands[0]` towards the center, `ligands[1..]` wind in the
/// direction given by `parity`. An implicit hydrogen or lone pair is written
/// as `center` itself at its position in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TetrahedralStereo {
    pub center: AtomIdx,
    pub ligands: [AtomIdx; 4],
    pub parity: Parity,
}

impl TetrahedralStereo {
    pub fn new(center: AtomIdx, ligands: [AtomIdx; 4], parity: Parity) -> Self {
        Self {
            center,
            ligands,
            parity,
        }
    }

    /// True if `atom` is one of the explicit ligands.
    pub fn references(&self, atom: AtomIdx) -> bool {
        atom != self.center && self.ligands.contains(&atom)
    }

    /// True if `atom` is the center or any ligand.
    pub fn mentions(&self, atom: AtomIdx) -> bool {
        self.center == atom || self.ligands.contains(&atom)
    }

    /// Swap one ligand for another in place, keeping its position and
    /// therefore the parity.
    pub fn replace_ligand(&mut self, old: AtomIdx, new: AtomIdx) -> bool {
        match self.ligands.iter_mut().find(|l| **l == old) {
            Some(slot) => {
                *slot = new;
                true
            }
            None => false,
        }
    }

    /// Parity of the same configuration with the ligands listed in `order`.
    ///
    /// Returns `None` if `order` is not a permutation of the ligands.
    pub fn parity_for(&self, order: &[AtomIdx; 4]) -> Option<Parity> {
        if !order.iter().all(|a| self.ligands.contains(a))
            || !self.ligands.iter().all(|a| order.contains(a))
        {
            return None;
        }
        if permutation_parity(&self.ligands, order) {
            Some(self.parity)
        } else {
            Some(self.parity.inverted())
        }
    }
}

struct Node<A> {
    id: AtomIdx,
    atom: A,
}

struct Edge<B> {
    id: BondIdx,
    bond: B,
}

/// A molecular graph with stable atom and bond handles.
///
/// `Mol` owns its atoms, bonds, tetrahedral stereo descriptors and attachment
/// table. Atom and bond data are generic; algorithms bound them with the
/// capability traits in [`crate::traits`].
pub struct Mol<A, B> {
    graph: StableUnGraph<Node<A>, Edge<B>>,
    atom_index: BTreeMap<AtomIdx, NodeIndex>,
    bond_index: BTreeMap<BondIdx, EdgeIndex>,
    tetrahedral_stereo: Vec<TetrahedralStereo>,
    attachments: AttachmentList,
}

/// The concrete molecule used by the SMILES adapter and attachment resolution.
pub type Molecule = Mol<Atom, Bond>;

impl<A, B> Mol<A, B> {
    pub fn new() -> Self {
        Self {
            graph: StableUnGraph::default(),
            atom_index: BTreeMap::new(),
            bond_index: BTreeMap::new(),
            tetrahedral_stereo: Vec::new(),
            attachments: AttachmentList::new(),
        }
    }

    fn node(&self, idx: AtomIdx) -> MolResult<NodeIndex> {
        self.atom_index
            .get(&idx)
            .copied()
            .ok_or(MolError::UnknownAtom(idx))
    }

    /// Panics if `idx` does not belong to this molecule.
    pub fn atom(&self, idx: AtomIdx) -> &A {
        &self.graph[self.atom_index[&idx]].atom
    }

    pub fn try_atom(&self, idx: AtomIdx) -> Option<&A> {
        self.atom_index.get(&idx).map(|&n| &self.graph[n].atom)
    }

    /// Panics if `idx` does not belong to this molecule.
    pub fn atom_mut(&mut self, idx: AtomIdx) -> &mut A {
        let n = self.atom_index[&idx];
        &mut self.graph[n].atom
    }

    pub fn try_atom_mut(&mut self, idx: AtomIdx) -> Option<&mut A> {
        let n = *self.atom_index.get(&idx)?;
        Some(&mut self.graph[n].atom)
    }

    /// Panics if `idx` does not belong to this molecule.
    pub fn bond(&self, idx: BondIdx) -> &B {
        &self.graph[self.bond_index[&idx]].bond
    }

    pub fn try_bond(&self, idx: BondIdx) -> Option<&B> {
        self.bond_index.get(&idx).map(|&e| &self.graph[e].bond)
    }

    /// Panics if `idx` does not belong to this molecule.
    pub fn bond_mut(&mut self, idx: BondIdx) -> &mut B {
        let e = self.bond_index[&idx];
        &mut self.graph[e].bond
    }

    pub fn contains_atom(&self, idx: AtomIdx) -> bool {
        self.atom_index.contains_key(&idx)
    }

    pub fn contains_bond(&self, idx: BondIdx) -> bool {
        self.bond_index.contains_key(&idx)
    }

    pub fn add_atom(&mut self, atom: A) -> AtomIdx {
        let id = AtomIdx::fresh();
        let n = self.graph.add_node(Node { id, atom });
        self.atom_index.insert(id, n);
        id
    }

    /// Bond `a` to `b`. The bond's stereo direction, if any, is anchored at `a`.
    ///
    /// Rejects unknown atoms, self-loops and a second bond between the same
    /// pair.
    pub fn add_bond(&mut self, a: AtomIdx, b: AtomIdx, bond: B) -> MolResult<BondIdx> {
        let na = self.node(a)?;
        let nb = self.node(b)?;
        if a == b {
            return Err(Violation::SelfLoop(a).into());
        }
        if self.graph.find_edge(na, nb).is_some() {
            return Err(Violation::DuplicateBond(a, b).into());
        }
        Ok(self.push_bond(na, nb, bond))
    }

    fn push_bond(&mut self, na: NodeIndex, nb: NodeIndex, bond: B) -> BondIdx {
        let id = BondIdx::fresh();
        let e = self.graph.add_edge(na, nb, Edge { id, bond });
        self.bond_index.insert(id, e);
        id
    }

    /// Remove an atom, its bonds, and every stereo descriptor that mentions it.
    pub fn remove_atom(&mut self, idx: AtomIdx) -> Option<A> {
        let n = self.atom_index.remove(&idx)?;
        let edges: Vec<EdgeIndex> = self.graph.edges(n).map(|e| e.id()).collect();
        for e in edges {
            if let Some(edge) = self.graph.remove_edge(e) {
                self.bond_index.remove(&edge.id);
            }
        }
        self.tetrahedral_stereo.retain(|s| !s.mentions(idx));
        self.graph.remove_node(n).map(|node| node.atom)
    }

    pub fn remove_bond(&mut self, idx: BondIdx) -> Option<B> {
        let e = self.bond_index.remove(&idx)?;
        self.graph.remove_edge(e).map(|edge| edge.bond)
    }

    /// Attach a tetrahedral descriptor, replacing any existing one at the
    /// same center.
    ///
    /// Every ligand must be the center itself (implicit H) or bonded to it.
    pub fn add_stereo(&mut self, stereo: TetrahedralStereo) -> MolResult<()> {
        let center = stereo.center;
        self.node(center)?;
        for &ligand in &stereo.ligands {
            if ligand == center {
                continue;
            }
            if !self.contains_atom(ligand) {
                return Err(Violation::DanglingLigand { center, ligand }.into());
            }
            if self.bond_between(center, ligand).is_none() {
                return Err(Violation::UnknownLigand { center, ligand }.into());
            }
        }
        self.tetrahedral_stereo.retain(|s| s.center != center);
        self.tetrahedral_stereo.push(stereo);
        Ok(())
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn degree(&self, idx: AtomIdx) -> usize {
        self.atom_index
            .get(&idx)
            .map_or(0, |&n| self.graph.edges(n).count())
    }

    /// Bonds of `idx` in creation order.
    pub fn bonds_of(&self, idx: AtomIdx) -> impl Iterator<Item = BondIdx> + '_ {
        let mut ids: Vec<BondIdx> = self
            .atom_index
            .get(&idx)
            .into_iter()
            .flat_map(|&n| self.graph.edges(n).map(|e| e.weight().id))
            .collect();
        ids.sort_unstable();
        ids.into_iter()
    }

    /// Neighbours of `idx`, ordered like [`Mol::bonds_of`].
    pub fn neighbors(&self, idx: AtomIdx) -> impl Iterator<Item = AtomIdx> + '_ {
        self.bonds_of(idx)
            .filter_map(move |b| self.other_end(b, idx))
    }

    pub fn atoms(&self) -> impl Iterator<Item = AtomIdx> + '_ {
        self.atom_index.keys().copied()
    }

    pub fn bonds(&self) -> impl Iterator<Item = BondIdx> + '_ {
        self.bond_index.keys().copied()
    }

    pub fn bond_between(&self, a: AtomIdx, b: AtomIdx) -> Option<BondIdx> {
        let na = *self.atom_index.get(&a)?;
        let nb = *self.atom_index.get(&b)?;
        self.graph.find_edge(na, nb).map(|e| self.graph[e].id)
    }

    /// Endpoints in stored orientation; the first is the stereo anchor.
    pub fn bond_endpoints(&self, idx: BondIdx) -> Option<(AtomIdx, AtomIdx)> {
        let e = *self.bond_index.get(&idx)?;
        let (a, b) = self.graph.edge_endpoints(e)?;
        Some((self.graph[a].id, self.graph[b].id))
    }

    pub fn other_end(&self, bond: BondIdx, atom: AtomIdx) -> Option<AtomIdx> {
        match self.bond_endpoints(bond)? {
            (a, b) if a == atom => Some(b),
            (a, b) if b == atom => Some(a),
            _ => None,
        }
    }

    pub fn tetrahedral_stereo(&self) -> &[TetrahedralStereo] {
        &self.tetrahedral_stereo
    }

    pub fn tetrahedral_stereo_for(&self, center: AtomIdx) -> Option<&TetrahedralStereo> {
        self.tetrahedral_stereo.iter().find(|s| s.center == center)
    }

    pub fn remove_tetrahedral_stereo(&mut self, center: AtomIdx) {
        self.tetrahedral_stereo.retain(|s| s.center != center);
    }

    pub(crate) fn tetrahedral_stereo_mut(&mut self) -> &mut [TetrahedralStereo] {
        &mut self.tetrahedral_stereo
    }

    pub fn attachments(&self) -> &AttachmentList {
        &self.attachments
    }

    pub fn attachments_mut(&mut self) -> &mut AttachmentList {
        &mut self.attachments
    }

    pub fn with_attachments(mut self, attachments: AttachmentList) -> Self {
        self.attachments = attachments;
        self
    }

    /// Move every atom, bond and descriptor of `other` into `self`, keeping
    /// their handles. Attachments are appended unless `self` already has one
    /// with the same label.
    pub(crate) fn absorb(&mut self, other: Mol<A, B>) {
        let mut graph = other.graph;
        let node_ids: Vec<NodeIndex> = graph.node_indices().collect();
        let edge_ids: Vec<EdgeIndex> = graph.edge_indices().collect();

        let mut edges = Vec::with_capacity(edge_ids.len());
        for e in edge_ids {
            let Some((a, b)) = graph.edge_endpoints(e) else {
                continue;
            };
            let (a, b) = (graph[a].id, graph[b].id);
            if let Some(edge) = graph.remove_edge(e) {
                edges.push((a, b, edge));
            }
        }
        for n in node_ids {
            if let Some(node) = graph.remove_node(n) {
                let id = node.id;
                let idx = self.graph.add_node(node);
                self.atom_index.insert(id, idx);
            }
        }
        for (a, b, edge) in edges {
            if let (Some(&na), Some(&nb)) = (self.atom_index.get(&a), self.atom_index.get(&b)) {
                let id = edge.id;
                let e = self.graph.add_edge(na, nb, edge);
                self.bond_index.insert(id, e);
            }
        }

        self.tetrahedral_stereo.extend(other.tetrahedral_stereo);
        for attachment in other.attachments.iter() {
            if self.attachments.by_label(&attachment.label).is_none() {
                self.attachments.push(attachment.clone());
            }
        }
    }
}

impl<A: HasRGroup, B> Mol<A, B> {
    /// Check every structural invariant and report the first violation.
    pub fn validate(&self) -> MolResult<()> {
        let mut groups: BTreeMap<u32, usize> = BTreeMap::new();
        for atom in self.atoms() {
            let Some(id) = self.atom(atom).r_group_id() else {
                continue;
            };
            let bonds = self.degree(atom);
            if bonds != 1 {
                return Err(Violation::PlaceholderValence { atom, bonds }.into());
            }
            let count = self
                .tetrahedral_stereo
                .iter()
                .filter(|s| s.references(atom))
                .count();
            if count > 1 {
                return Err(Violation::StereoOverlap { atom, count }.into());
            }
            if id != 0 {
                *groups.entry(id).or_default() += 1;
            }
        }
        if let Some((&id, &count)) = groups.iter().find(|(_, &count)| count > 1) {
            return Err(Violation::DuplicateGroup { id, count }.into());
        }

        for s in &self.tetrahedral_stereo {
            for &ligand in &s.ligands {
                if ligand == s.center {
                    continue;
                }
                if !self.contains_atom(ligand) {
                    return Err(Violation::DanglingLigand {
                        center: s.center,
                        ligand,
                    }
                    .into());
                }
                if self.bond_between(s.center, ligand).is_none() {
                    return Err(Violation::UnknownLigand {
                        center: s.center,
                        ligand,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

impl<A: Clone, B: Clone> Clone for Mol<A, B> {
    /// The clone gets fresh handles; stereo descriptors are remapped.
    fn clone(&self) -> Self {
        let mut out = Mol::new();
        let mut remap = BTreeMap::new();
        for (&id, &n) in &self.atom_index {
            remap.insert(id, out.add_atom(self.graph[n].atom.clone()));
        }
        let map = |a: AtomIdx| remap.get(&a).copied().unwrap_or(a);
        for &e in self.bond_index.values() {
            let Some((a, b)) = self.graph.edge_endpoints(e) else {
                continue;
            };
            let (a, b) = (map(self.graph[a].id), map(self.graph[b].id));
            if let (Some(&na), Some(&nb)) = (out.atom_index.get(&a), out.atom_index.get(&b)) {
                out.push_bond(na, nb, self.graph[e].bond.clone());
            }
        }
        out.tetrahedral_stereo = self
            .tetrahedral_stereo
            .iter()
            .map(|s| TetrahedralStereo {
                center: map(s.center),
                ligands: s.ligands.map(map),
                parity: s.parity,
            })
            .collect();
        out.attachments = self.attachments.clone();
        out
    }
}

impl<A, B> Default for Mol<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: fmt::Debug, B: fmt::Debug> fmt::Debug for Mol<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mol")
            .field("atom_count", &self.atom_count())
            .field("bond_count", &self.bond_count())
            .field("tetrahedral_stereo", &self.tetrahedral_stereo)
            .field("attachments", &self.attachments)
            .finish()
    }
}

/// True if `to` is an even permutation of `from`.
pub(crate) fn permutation_parity<T: Eq>(from: &[T], to: &[T]) -> bool {
    let n = from.len();
    if n != to.len() {
        return true;
    }
    let perm: Vec<usize> = from
        .iter()
        .map(|f| to.iter().position(|t| t == f).unwrap_or(0))
        .collect();
    let mut visited = vec![false; n];
    let mut swaps = 0usize;
    for i in 0..n {
        if visited[i] {
            continue;
        }
        let mut cycle_len = 0;
        let mut j = i;
        while !visited[j] {
            visited[j] = true;
            j = perm[j];
            cycle_len += 1;
        }
        swaps += cycle_len - 1;
    }
    swaps % 2 == 0
}
