/// A named fragment that can cap one R-group of a molecule.
///
/// `label` names the group (`"R1"`), `capping_group` is a short human
/// description of the cap (`"H"`, `"OH"`), and `smiles` holds the fragment
/// itself, written with a single placeholder carrying the same label.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attachment {
    pub id: String,
    pub label: String,
    pub capping_group: String,
    pub smiles: String,
}

impl Attachment {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        capping_group: impl Into<String>,
        smiles: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            capping_group: capping_group.into(),
            smiles: smiles.into(),
        }
    }

    /// Numeric group id parsed from the label, e.g. `"R3"` gives `3`.
    pub fn group_id(&self) -> Option<u32> {
        self.label
            .strip_prefix('R')
            .or_else(|| self.label.strip_prefix("_R"))
            .and_then(|n| n.parse().ok())
    }
}

/// Ordered attachment table of a molecule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttachmentList {
    items: Vec<Attachment>,
}

impl AttachmentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attachment: Attachment) {
        self.items.push(attachment);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attachment> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn by_label(&self, label: &str) -> Option<&Attachment> {
        self.items.iter().find(|a| a.label == label)
    }

    /// First attachment capping group `id`.
    pub fn by_group(&self, id: u32) -> Option<&Attachment> {
        self.items.iter().find(|a| a.group_id() == Some(id))
    }

    pub fn retain(&mut self, f: impl FnMut(&Attachment) -> bool) {
        self.items.retain(f);
    }
}

impl FromIterator<Attachment> for AttachmentList {
    fn from_iter<T: IntoIterator<Item = Attachment>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AttachmentList {
    type Item = &'a Attachment;
    type IntoIter = std::slice::Iter<'a, Attachment>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
