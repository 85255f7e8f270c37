//! Periodic table data used by the SMILES reader and the formula calculator.

use std::fmt;

/// A chemical element, identified by its atomic number (1–118).
///
/// Common elements are available as associated constants
/// (`Element::C`, `Element::N`, …); everything else is reachable through
/// [`Element::from_atomic_num`] or [`Element::from_symbol`].
///
/// ```
/// use chemsplice::Element;
///
/// assert_eq!(Element::from_symbol("Cl"), Some(Element::Cl));
/// assert_eq!(Element::O.atomic_num(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element(u8);

#[allow(non_upper_case_globals)]
impl Element {
    pub const H: Element = Element(1);
    pub const B: Element = Element(5);
    pub const C: Element = Element(6);
    pub const N: Element = Element(7);
    pub const O: Element = Element(8);
    pub const F: Element = Element(9);
    pub const Na: Element = Element(11);
    pub const Mg: Element = Element(12);
    pub const Si: Element = Element(14);
    pub const P: Element = Element(15);
    pub const S: Element = Element(16);
    pub const Cl: Element = Element(17);
    pub const K: Element = Element(19);
    pub const Ca: Element = Element(20);
    pub const Fe: Element = Element(26);
    pub const Zn: Element = Element(30);
    pub const As: Element = Element(33);
    pub const Se: Element = Element(34);
    pub const Br: Element = Element(35);
    pub const Te: Element = Element(52);
    pub const I: Element = Element(53);
    pub const At: Element = Element(85);

    pub fn from_atomic_num(n: u8) -> Option<Element> {
        (1..=ELEMENTS.len() as u8).contains(&n).then_some(Element(n))
    }

    pub fn from_symbol(s: &str) -> Option<Element> {
        ELEMENTS
            .iter()
            .position(|data| data.symbol == s)
            .map(|i| Element(i as u8 + 1))
    }

    pub fn atomic_num(self) -> u8 {
        self.0
    }

    pub fn symbol(self) -> &'static str {
        self.data().symbol
    }

    /// Standard atomic weight, averaged over natural isotopic abundance.
    pub fn atomic_weight(self) -> f64 {
        self.data().weight
    }

    /// Mass of the most abundant isotope.
    pub fn exact_mass(self) -> f64 {
        self.data().monoisotopic
    }

    /// Valence states tried in order when inferring implicit hydrogens.
    ///
    /// Empty for elements outside the SMILES organic subset; those never
    /// receive implicit hydrogens.
    pub fn default_valences(self) -> &'static [u8] {
        match self.0 {
            1 => &[1],
            5 => &[3],
            6 => &[4],
            7 | 15 | 33 => &[3, 5],
            8 => &[2],
            9 | 17 | 35 | 85 => &[1],
            14 | 32 => &[4],
            16 | 34 | 52 => &[2, 4, 6],
            53 => &[1, 3, 5, 7],
            _ => &[],
        }
    }

    /// Elements that may be written without brackets in SMILES.
    pub fn is_organic_subset(self) -> bool {
        matches!(self.0, 5 | 6 | 7 | 8 | 9 | 15 | 16 | 17 | 35 | 53)
    }

    fn data(self) -> &'static ElementData {
        &ELEMENTS[self.0 as usize - 1]
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Exact mass of a specific isotope, if tabulated.
pub fn isotope_exact_mass(atomic_num: u8, mass_number: u16) -> Option<f64> {
    ISOTOPES
        .iter()
        .find(|&&(z, a, _)| z == atomic_num && a == mass_number)
        .map(|&(_, _, mass)| mass)
}

struct ElementData {
    symbol: &'static str,
    weight: f64,
    monoisotopic: f64,
}

const fn el(symbol: &'static str, weight: f64, monoisotopic: f64) -> ElementData {
    ElementData {
        symbol,
        weight,
        monoisotopic,
    }
}

static ISOTOPES: &[(u8, u16, f64)] = &[
    (1, 2, 2.014_101_778),
    (1, 3, 3.016_049_278),
    (6, 13, 13.003_354_835),
    (6, 14, 14.003_241_988),
    (7, 15, 15.000_108_899),
    (8, 17, 16.999_131_757),
    (8, 18, 17.999_159_613),
    (15, 32, 31.973_907_64),
    (16, 34, 33.967_867_004),
    (35, 81, 80.916_290_563),
    (53, 125, 124.904_629_4),
    (53, 131, 130.906_124_6),
];

static ELEMENTS: [ElementData; 118] = [
    el("H", 1.008, 1.007_825_032),
    el("He", 4.002_602, 4.002_603_254),
    el("Li", 6.94, 7.016_004_548),
    el("Be", 9.012_182, 9.012_182_201),
    el("B", 10.81, 11.009_305_406),
    el("C", 12.011, 12.0),
    el("N", 14.007, 14.003_074_005),
    el("O", 15.999, 15.994_914_620),
    el("F", 18.998_403, 18.998_403_224),
    el("Ne", 20.1797, 19.992_440_175),
    el("Na", 22.989_769, 22.989_769_660),
    el("Mg", 24.305, 23.985_041_904),
    el("Al", 26.981_539, 26.981_538_627),
    el("Si", 28.085, 27.976_926_532),
    el("P", 30.973_762, 30.973_761_629),
    el("S", 32.06, 31.972_070_999),
    el("Cl", 35.45, 34.968_852_682),
    el("Ar", 39.948, 39.962_383_123),
    el("K", 39.0983, 38.963_706_679),
    el("Ca", 40.078, 39.962_590_983),
    el("Sc", 44.955_908, 44.955_911_909),
    el("Ti", 47.867, 47.947_946_281),
    el("V", 50.9415, 50.943_959_507),
    el("Cr", 51.9961, 51.940_507_472),
    el("Mn", 54.938_044, 54.938_045_141),
    el("Fe", 55.845, 55.934_937_475),
    el("Co", 58.933_194, 58.933_195_048),
    el("Ni", 58.6934, 57.935_342_907),
    el("Cu", 63.546, 62.929_597_474),
    el("Zn", 65.38, 63.929_142_222),
    el("Ga", 69.723, 68.925_573_587),
    el("Ge", 72.630, 73.921_177_767),
    el("As", 74.921_595, 74.921_596_478),
    el("Se", 78.971, 79.916_521_271),
    el("Br", 79.904, 78.918_337_087),
    el("Kr", 83.798, 83.911_506_687),
    el("Rb", 85.4678, 84.911_789_737),
    el("Sr", 87.62, 87.905_612_124),
    el("Y", 88.905_84, 88.905_848_295),
    el("Zr", 91.224, 89.904_704_416),
    el("Nb", 92.906_37, 92.906_378_058),
    el("Mo", 95.95, 97.905_408_169),
    el("Tc", 98.0, 97.907_216),
    el("Ru", 101.07, 101.904_349_312),
    el("Rh", 102.9055, 102.905_504_292),
    el("Pd", 106.42, 105.903_485_715),
    el("Ag", 107.8682, 106.905_096_820),
    el("Cd", 112.414, 113.903_358_540),
    el("In", 114.818, 114.903_878_484),
    el("Sn", 118.710, 119.902_194_676),
    el("Sb", 121.760, 120.903_815_686),
    el("Te", 127.60, 129.906_224_399),
    el("I", 126.904_47, 126.904_472_681),
    el("Xe", 131.293, 131.904_153_457),
    el("Cs", 132.905_452, 132.905_451_932),
    el("Ba", 137.327, 137.905_247_237),
    el("La", 138.905_47, 138.906_353_267),
    el("Ce", 140.116, 139.905_438_706),
    el("Pr", 140.907_66, 140.907_652_769),
    el("Nd", 144.242, 141.907_723_297),
    el("Pm", 145.0, 144.912_749_023),
    el("Sm", 150.36, 151.919_732_425),
    el("Eu", 151.964, 152.921_230_339),
    el("Gd", 157.25, 157.924_103_912),
    el("Tb", 158.925_35, 158.925_346_757),
    el("Dy", 162.500, 163.929_174_751),
    el("Ho", 164.930_33, 164.930_322_070),
    el("Er", 167.259, 165.930_293_061),
    el("Tm", 168.934_22, 168.934_213_250),
    el("Yb", 173.045, 173.938_862_089),
    el("Lu", 174.9668, 174.940_771_819),
    el("Hf", 178.49, 179.946_549_953),
    el("Ta", 180.947_88, 180.947_995_763),
    el("W", 183.84, 183.950_931_188),
    el("Re", 186.207, 186.955_753_109),
    el("Os", 190.23, 191.961_480_690),
    el("Ir", 192.217, 192.962_926_430),
    el("Pt", 195.084, 194.964_791_134),
    el("Au", 196.966_569, 196.966_568_662),
    el("Hg", 200.592, 201.970_643_011),
    el("Tl", 204.38, 204.974_427_541),
    el("Pb", 207.2, 207.976_652_071),
    el("Bi", 208.980_40, 208.980_398_734),
    el("Po", 209.0, 208.982_430_435),
    el("At", 210.0, 209.987_148),
    el("Rn", 222.0, 222.017_577_738),
    el("Fr", 223.0, 223.019_735_857),
    el("Ra", 226.0, 226.025_409_823),
    el("Ac", 227.0, 227.027_752_127),
    el("Th", 232.0377, 232.038_055_325),
    el("Pa", 231.035_88, 231.035_883_990),
    el("U", 238.028_91, 238.050_788_247),
    el("Np", 237.0, 237.048_173_444),
    el("Pu", 244.0, 244.064_203_907),
    el("Am", 243.0, 243.061_381_080),
    el("Cm", 247.0, 247.070_353_540),
    el("Bk", 247.0, 247.070_307_080),
    el("Cf", 251.0, 251.079_586_788),
    el("Es", 252.0, 252.082_980),
    el("Fm", 257.0, 257.095_104_724),
    el("Md", 258.0, 258.098_431_319),
    el("No", 259.0, 259.101_030),
    el("Lr", 262.0, 262.109_630),
    el("Rf", 267.0, 267.121_790),
    el("Db", 268.0, 268.125_670),
    el("Sg", 271.0, 271.133_930),
    el("Bh", 272.0, 272.138_260),
    el("Hs", 270.0, 270.134_290),
    el("Mt", 276.0, 276.151_590),
    el("Ds", 281.0, 281.164_510),
    el("Rg", 280.0, 280.165_140),
    el("Cn", 285.0, 285.177_120),
    el("Nh", 284.0, 284.178_730),
    el("Fl", 289.0, 289.190_420),
    el("Mc", 288.0, 288.192_740),
    el("Lv", 293.0, 293.204_490),
    el("Ts", 292.0, 292.207_460),
    el("Og", 294.0, 294.213_920),
];
