/// Bond multiplicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Contribution to the valence of each endpoint.
    ///
    /// Aromatic bonds count as one; the aromatic atom rule in the SMILES
    /// reader accounts for the delocalised electron.
    pub fn valence(self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

/// Wedge/hash depiction marker, anchored at the bond's first atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BondStereo {
    #[default]
    None,
    /// Solid wedge: the far atom points towards the viewer.
    Wedge,
    /// Hashed wedge: the far atom points away from the viewer.
    Hash,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bond {
    pub order: BondOrder,
    pub stereo: BondStereo,
}

impl Bond {
    pub fn new(order: BondOrder) -> Self {
        Self {
            order,
            stereo: BondStereo::None,
        }
    }
}

impl crate::traits::HasBondOrder for Bond {
    fn bond_order(&self) -> BondOrder {
        self.order
    }
}

impl crate::traits::HasBondStereo for Bond {
    fn bond_stereo(&self) -> BondStereo {
        self.stereo
    }
}

impl crate::traits::HasBondStereoMut for Bond {
    fn set_bond_stereo(&mut self, stereo: BondStereo) {
        self.stereo = stereo;
    }
}
