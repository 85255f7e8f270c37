use crate::atom::GroupFlag;
use crate::bond::{BondOrder, BondStereo};
use crate::error::NotPlaceholder;

pub trait HasAtomicNum {
    fn atomic_num(&self) -> u8;
}

pub trait HasFormalCharge {
    fn formal_charge(&self) -> i8;
}

pub trait HasIsotope {
    fn isotope(&self) -> u16;
}

pub trait HasHydrogenCount {
    fn hydrogen_count(&self) -> u8;
}

/// Atoms that can act as R-group placeholders.
pub trait HasRGroup {
    /// The group id if this atom is a placeholder, `None` for a real atom.
    fn r_group_id(&self) -> Option<u32>;
    fn group_flag(&self) -> GroupFlag;

    fn is_placeholder(&self) -> bool {
        self.r_group_id().is_some()
    }
}

pub trait HasRGroupMut: HasRGroup {
    /// Relabel a placeholder and mark it processed. Fails on a real atom.
    fn set_r_group_id(&mut self, id: u32) -> Result<(), NotPlaceholder>;
    fn set_group_flag(&mut self, flag: GroupFlag);
}

pub trait HasBondOrder {
    fn bond_order(&self) -> BondOrder;
}

pub trait HasBondStereo {
    fn bond_stereo(&self) -> BondStereo;
}

pub trait HasBondStereoMut: HasBondStereo {
    fn set_bond_stereo(&mut self, stereo: BondStereo);
}
