pub mod atom;
pub mod attachment;
pub mod bond;
pub mod element;
pub mod error;
pub mod formula;
pub mod graph_ops;
pub mod kekulize;
pub mod merge;
pub mod mol;
pub mod registry;
pub mod resolve;
pub mod smiles;
pub mod toolkit;
pub mod traits;

pub use atom::{Atom, AtomKind, GroupFlag};
pub use attachment::{Attachment, AttachmentList};
pub use bond::{Bond, BondOrder, BondStereo};
pub use element::Element;
pub use error::{MolError, MolResult, NotPlaceholder, SiteDefect, Violation};
pub use formula::{average_mol_weight, exact_mol_weight, mol_formula, molecule_info, MoleculeInfo};
pub use merge::{close_ring, merge, merge_into};
pub use mol::{AtomIdx, BondIdx, Mol, Molecule, Parity, TetrahedralStereo};
pub use resolve::{resolve_all, resolve_attachment, ResolveError};
pub use smiles::{parse_smiles, to_extended_smiles, to_smiles, SmilesError};
pub use toolkit::{Format, SmilesToolkit, Toolkit};
pub use traits::{
    HasAtomicNum, HasBondOrder, HasBondStereo, HasBondStereoMut, HasFormalCharge,
    HasHydrogenCount, HasIsotope, HasRGroup, HasRGroupMut,
};
