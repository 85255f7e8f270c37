//! Error types for graph surgery on molecules.
//!
//! Every structural contract the registry or the merge engine checks has its
//! own variant, so callers can tell which contract was broken. Nothing here is
//! ever repaired silently.

use thiserror::Error;

use crate::mol::AtomIdx;

/// A broken structural invariant of a [`Mol`](crate::Mol).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// An R-group placeholder must have exactly one bond.
    #[error("R-group atom {atom} has {bonds} bonds, expected exactly one")]
    PlaceholderValence { atom: AtomIdx, bonds: usize },

    /// Two placeholders claim the same group id.
    #[error("R-group id {id} is carried by {count} atoms")]
    DuplicateGroup { id: u32, count: usize },

    /// A stereo descriptor names a ligand that is no longer in the molecule.
    #[error("stereo descriptor at {center} references missing atom {ligand}")]
    DanglingLigand { center: AtomIdx, ligand: AtomIdx },

    /// A stereo descriptor names an atom that is not bonded to its center.
    #[error("stereo descriptor at {center} lists {ligand}, which is not bonded to it")]
    UnknownLigand { center: AtomIdx, ligand: AtomIdx },

    /// A bond would join an atom to itself.
    #[error("bond would join atom {0} to itself")]
    SelfLoop(AtomIdx),

    /// A second bond between the same pair of atoms.
    #[error("atoms {0} and {1} are already bonded")]
    DuplicateBond(AtomIdx, AtomIdx),

    /// An atom is a ligand of more than one stereo descriptor.
    #[error("atom {atom} is a ligand of {count} stereo descriptors")]
    StereoOverlap { atom: AtomIdx, count: usize },
}

/// Why an atom cannot serve as a merge site.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteDefect {
    #[error("not an R-group placeholder")]
    NotPlaceholder,

    #[error("{0} incident bonds, expected exactly one")]
    Bonds(usize),

    #[error("both merge sites are the same atom")]
    SameAtom,
}

/// A group id was written to an atom that is not a placeholder.
///
/// Atom types return this without knowing their own handle;
/// [`relabel_placeholder`](crate::registry::relabel_placeholder) turns it
/// into [`MolError::NotAPlaceholder`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("a real atom cannot carry an R-group id")]
pub struct NotPlaceholder;

/// Errors from the R-group registry and the merge engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MolError {
    #[error("structural invariant violated: {0}")]
    StructuralInvariantViolation(#[from] Violation),

    #[error("no R-group atom carries id {0}")]
    GroupNotFound(u32),

    #[error("R-group id {id} is claimed by {count} atoms")]
    AmbiguousGroup { id: u32, count: usize },

    /// An R-group may only connect to one other atom.
    #[error("atom {atom} has {bonds} connections; an R-group allows a single connection")]
    MultipleConnections { atom: AtomIdx, bonds: usize },

    #[error("atom {atom} is not a valid R-group merge site: {defect}")]
    InvalidRGroupAtom { atom: AtomIdx, defect: SiteDefect },

    /// The placeholder's bond leads nowhere, which means the graph is corrupt.
    #[error("the neighbour of R-group atom {0} cannot be resolved")]
    DisconnectedMergeTarget(AtomIdx),

    #[error("atom {0} does not belong to this molecule")]
    UnknownAtom(AtomIdx),

    #[error("atom {0} is not an R-group placeholder")]
    NotAPlaceholder(AtomIdx),

    /// No alternating single/double assignment covers these aromatic atoms.
    #[error("cannot kekulize aromatic system: {} atom(s) left without a double bond", .0.len())]
    Unkekulizable(Vec<AtomIdx>),
}

/// Result type for molecular graph operations.
pub type MolResult<T> = Result<T, MolError>;
