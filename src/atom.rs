use crate::element::Element;
use crate::error::NotPlaceholder;

/// What occupies an atom position: a real element, or an R-group
/// placeholder marking an open substitution point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AtomKind {
    Element(Element),
    /// Placeholder carrying its group id. `0` means no id has been assigned.
    RGroup(u32),
}

/// Renumbering state of a placeholder.
///
/// A renumbering pass marks every placeholder it rewrites as
/// [`Processed`](GroupFlag::Processed) so that a later rewrite in the same
/// pass cannot move it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupFlag {
    #[default]
    None,
    Processed,
}

/// Default atom type for a molecular graph node.
///
/// `Atom` stores the things you would read off a structural formula plus the
/// R-group bookkeeping the merge engine needs. Stereochemistry is not stored
/// here; it lives in [`TetrahedralStereo`](crate::TetrahedralStereo)
/// descriptors on the [`Mol`](crate::Mol).
///
/// # Examples
///
/// ```
/// use chemsplice::{Atom, Element};
///
/// let carbon = Atom::new(Element::C).with_hydrogens(3);
/// assert_eq!(carbon.atomic_num(), 6);
///
/// let r1 = Atom::r_group(1);
/// assert!(r1.is_r_group());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub kind: AtomKind,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Mass number. `0` means natural isotopic abundance.
    pub isotope: u16,
    /// Number of implicit (suppressed) hydrogens. These are not graph nodes.
    pub hydrogen_count: u8,
    pub is_aromatic: bool,
    pub flag: GroupFlag,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            kind: AtomKind::Element(element),
            formal_charge: 0,
            isotope: 0,
            hydrogen_count: 0,
            is_aromatic: false,
            flag: GroupFlag::None,
        }
    }

    /// A placeholder atom for group `id`.
    pub fn r_group(id: u32) -> Self {
        Self {
            kind: AtomKind::RGroup(id),
            ..Self::new(Element::H)
        }
    }

    pub fn with_hydrogens(mut self, count: u8) -> Self {
        self.hydrogen_count = count;
        self
    }

    pub fn with_charge(mut self, charge: i8) -> Self {
        self.formal_charge = charge;
        self
    }

    pub fn aromatic(mut self) -> Self {
        self.is_aromatic = true;
        self
    }

    pub fn element(&self) -> Option<Element> {
        match self.kind {
            AtomKind::Element(e) => Some(e),
            AtomKind::RGroup(_) => None,
        }
    }

    /// Atomic number, or `0` for a placeholder.
    pub fn atomic_num(&self) -> u8 {
        self.element().map_or(0, Element::atomic_num)
    }

    pub fn is_r_group(&self) -> bool {
        matches!(self.kind, AtomKind::RGroup(_))
    }
}

impl Default for Atom {
    fn default() -> Self {
        Self::new(Element::C)
    }
}

impl crate::traits::HasAtomicNum for Atom {
    fn atomic_num(&self) -> u8 {
        Atom::atomic_num(self)
    }
}

impl crate::traits::HasFormalCharge for Atom {
    fn formal_charge(&self) -> i8 {
        self.formal_charge
    }
}

impl crate::traits::HasIsotope for Atom {
    fn isotope(&self) -> u16 {
        self.isotope
    }
}

impl crate::traits::HasHydrogenCount for Atom {
    fn hydrogen_count(&self) -> u8 {
        self.hydrogen_count
    }
}

impl crate::traits::HasRGroup for Atom {
    fn r_group_id(&self) -> Option<u32> {
        match self.kind {
            AtomKind::RGroup(id) => Some(id),
            AtomKind::Element(_) => None,
        }
    }

    fn group_flag(&self) -> GroupFlag {
        self.flag
    }
}

impl crate::traits::HasRGroupMut for Atom {
    fn set_r_group_id(&mut self, id: u32) -> Result<(), NotPlaceholder> {
        match &mut self.kind {
            AtomKind::RGroup(current) => {
                *current = id;
                self.flag = GroupFlag::Processed;
                Ok(())
            }
            AtomKind::Element(_) => Err(NotPlaceholder),
        }
    }

    fn set_group_flag(&mut self, flag: GroupFlag) {
        self.flag = flag;
    }
}
