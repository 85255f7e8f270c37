//! Molecular formula and molecular weight of a molecule.
//!
//! [`mol_formula`] produces a Hill system string, [`average_mol_weight`]
//! gives the average molecular weight in daltons, and [`exact_mol_weight`]
//! gives the monoisotopic exact mass. R-group placeholders contribute
//! nothing to any of them. [`molecule_info`] bundles all three.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::element::{isotope_exact_mass, Element};
use crate::mol::Mol;
use crate::traits::{HasAtomicNum, HasFormalCharge, HasHydrogenCount, HasIsotope};

/// Summary of a molecule's composition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoleculeInfo {
    pub formula: String,
    /// Average molecular weight in daltons.
    pub molecular_weight: f64,
    /// Monoisotopic mass.
    pub exact_mass: f64,
}

pub fn molecule_info<A, B>(mol: &Mol<A, B>) -> MoleculeInfo
where
    A: HasAtomicNum + HasHydrogenCount + HasIsotope + HasFormalCharge,
{
    MoleculeInfo {
        formula: mol_formula(mol),
        molecular_weight: average_mol_weight(mol),
        exact_mass: exact_mol_weight(mol),
    }
}

fn total_mass<A, B>(mol: &Mol<A, B>, element_mass: fn(Element) -> f64) -> f64
where
    A: HasAtomicNum + HasHydrogenCount + HasIsotope,
{
    let h_mass = element_mass(Element::H);
    mol.atoms().fold(0.0, |acc, idx| {
        let a = mol.atom(idx);
        let Some(elem) = Element::from_atomic_num(a.atomic_num()) else {
            return acc;
        };
        let mass = match a.isotope() {
            0 => element_mass(elem),
            iso => isotope_exact_mass(a.atomic_num(), iso).unwrap_or_else(|| element_mass(elem)),
        };
        acc + mass + f64::from(a.hydrogen_count()) * h_mass
    })
}

/// Average molecular weight in daltons.
///
/// Atoms with an explicit isotope label use that isotope's exact mass.
pub fn average_mol_weight<A: HasAtomicNum + HasHydrogenCount + HasIsotope, B>(
    mol: &Mol<A, B>,
) -> f64 {
    total_mass(mol, Element::atomic_weight)
}

/// Monoisotopic exact mass, using the most abundant isotope of each element.
pub fn exact_mol_weight<A: HasAtomicNum + HasHydrogenCount + HasIsotope, B>(
    mol: &Mol<A, B>,
) -> f64 {
    total_mass(mol, Element::exact_mass)
}

/// Hill system formula: C first, then H, then the rest alphabetically. Without
/// carbon everything is alphabetical. Net charge is appended as `+`, `2+`,
/// `-`, `2-`.
pub fn mol_formula<A: HasAtomicNum + HasHydrogenCount + HasFormalCharge, B>(
    mol: &Mol<A, B>,
) -> String {
    let mut counts: BTreeMap<&'static str, u32> = BTreeMap::new();
    let mut net_charge: i32 = 0;

    for idx in mol.atoms() {
        let a = mol.atom(idx);
        let Some(elem) = Element::from_atomic_num(a.atomic_num()) else {
            continue;
        };
        *counts.entry(elem.symbol()).or_default() += 1;
        let hc = u32::from(a.hydrogen_count());
        if hc > 0 {
            *counts.entry("H").or_default() += hc;
        }
        net_charge += i32::from(a.formal_charge());
    }

    let mut result = String::new();
    if let Some(c) = counts.remove("C") {
        append_element(&mut result, "C", c);
        if let Some(h) = counts.remove("H") {
            append_element(&mut result, "H", h);
        }
    }
    for (sym, count) in &counts {
        append_element(&mut result, sym, *count);
    }

    match net_charge {
        0 => {}
        1 => result.push('+'),
        -1 => result.push('-'),
        n if n > 0 => {
            let _ = write!(result, "{n}+");
        }
        n => {
            let _ = write!(result, "{}-", n.unsigned_abs());
        }
    }
    result
}

fn append_element(buf: &mut String, symbol: &str, count: u32) {
    buf.push_str(symbol);
    if count > 1 {
        let _ = write!(buf, "{count}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bond::Bond;
    use crate::smiles::parse_smiles;

    fn assert_approx(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {expected} ± {tol}, got {actual}"
        );
    }

    fn formula(s: &str) -> String {
        mol_formula(&parse_smiles(s).unwrap())
    }

    #[test]
    fn simple_formulas() {
        assert_eq!(formula("C"), "CH4");
        assert_eq!(formula("c1ccccc1"), "C6H6");
        assert_eq!(formula("O"), "H2O");
        assert_eq!(formula("CCO"), "C2H6O");
        assert_eq!(formula("[Na+].[Cl-]"), "ClNa");
        assert_eq!(formula("[NH4+]"), "H4N+");
        assert_eq!(formula("[O-2]"), "O2-");
        assert_eq!(formula("[Fe]"), "Fe");
    }

    #[test]
    fn sildenafil_like_compound() {
        assert_eq!(
            formula("CCOC1=C(C=C(C=C1)S(=O)(=O)N1CCN(C)CC1)C1=NC2=C(N(C)N=C2CC)C(=O)N1"),
            "C21H28N6O4S"
        );
    }

    #[test]
    fn placeholders_are_ignored() {
        assert_eq!(formula("[*]OC[C@H]1O[C@@H]([*])[C@H](O[*])[C@@H]1O"), "C5H7O4");
        let mol = parse_smiles("C[*:1]").unwrap();
        assert_approx(average_mol_weight(&mol), 12.011 + 3.0 * 1.008, 0.01);
    }

    #[test]
    fn weights() {
        let mol = parse_smiles("C").unwrap();
        assert_approx(average_mol_weight(&mol), 16.043, 0.01);
        assert_approx(exact_mol_weight(&mol), 16.031, 0.01);
        let mol = parse_smiles("c1ccccc1").unwrap();
        assert_approx(average_mol_weight(&mol), 78.112, 0.01);
        assert_approx(exact_mol_weight(&mol), 78.047, 0.01);
    }

    #[test]
    fn isotopes_use_exact_mass() {
        let mol = parse_smiles("[2H]C([2H])([2H])[2H]").unwrap();
        assert_approx(exact_mol_weight(&mol), 12.0 + 4.0 * 2.01410177812, 1e-6);
        assert_approx(average_mol_weight(&mol), 12.011 + 4.0 * 2.01410177812, 1e-6);
    }

    #[test]
    fn empty_mol() {
        let mol: Mol<Atom, Bond> = Mol::new();
        assert_eq!(mol_formula(&mol), "");
        assert_eq!(average_mol_weight(&mol), 0.0);
    }

    #[test]
    fn info_bundles_everything() {
        let info = molecule_info(&parse_smiles("CCO").unwrap());
        assert_eq!(info.formula, "C2H6O");
        assert_approx(info.molecular_weight, 46.069, 0.01);
        assert_approx(info.exact_mass, 46.042, 0.01);
    }
}
