use crate::element::Element;
use crate::smiles::error::SmilesError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Atom(AtomToken),
    Bond(BondToken),
    RingClosure {
        bond: Option<BondToken>,
        digit: u16,
        pos: usize,
    },
    OpenParen(usize),
    CloseParen(usize),
    Dot(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomToken {
    /// `None` for the `*` wildcard.
    pub element: Option<Element>,
    pub is_aromatic: bool,
    pub isotope: u16,
    pub chirality: ChiralityToken,
    pub hcount: Option<u8>,
    pub charge: i8,
    pub atom_class: u32,
    pub is_bracket: bool,
    pub pos: usize,
}

impl AtomToken {
    fn bare(element: Option<Element>, is_aromatic: bool, pos: usize) -> Self {
        Self {
            element,
            is_aromatic,
            isotope: 0,
            chirality: ChiralityToken::None,
            hcount: None,
            charge: 0,
            atom_class: 0,
            is_bracket: false,
            pos,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChiralityToken {
    None,
    /// `@`
    Anticlockwise,
    /// `@@`
    Clockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondToken {
    Single,
    Double,
    Triple,
    Aromatic,
    Up,
    Down,
}

const AROMATIC_BRACKET: &[(&str, Element)] = &[
    ("se", Element::Se),
    ("te", Element::Te),
    ("as", Element::As),
    ("b", Element::B),
    ("c", Element::C),
    ("n", Element::N),
    ("o", Element::O),
    ("p", Element::P),
    ("s", Element::S),
];

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn starts_with(&self, pat: &str) -> bool {
        pat.chars().enumerate().all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn digit(&mut self) -> Option<u16> {
        let d = self.peek()?.to_digit(10)?;
        self.pos += 1;
        Some(d as u16)
    }

    /// A run of decimal digits, or `None` if there are none.
    fn number(&mut self) -> Result<Option<u32>, SmilesError> {
        let start = self.pos;
        let mut value: Option<u32> = None;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            value = Some(
                value
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(d))
                    .ok_or(SmilesError::NumberOverflow { pos: start })?,
            );
            self.pos += 1;
        }
        Ok(value)
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, SmilesError> {
    let mut cur = Cursor::new(input);
    let mut tokens = Vec::new();

    while let Some(c) = cur.peek() {
        let pos = cur.pos;
        let token = match c {
            c if c.is_whitespace() => {
                cur.bump();
                continue;
            }
            '[' => Token::Atom(bracket_atom(&mut cur)?),
            '*' => {
                cur.bump();
                Token::Atom(AtomToken::bare(None, false, pos))
            }
            '(' => {
                cur.bump();
                Token::OpenParen(pos)
            }
            ')' => {
                cur.bump();
                Token::CloseParen(pos)
            }
            '.' => {
                cur.bump();
                Token::Dot(pos)
            }
            '%' => {
                cur.bump();
                let (Some(tens), Some(ones)) = (cur.digit(), cur.digit()) else {
                    return Err(SmilesError::UnexpectedChar { pos, ch: '%' });
                };
                Token::RingClosure {
                    bond: take_pending_bond(&mut tokens),
                    digit: tens * 10 + ones,
                    pos,
                }
            }
            '0'..='9' => {
                let digit = cur.digit().unwrap_or_default();
                Token::RingClosure {
                    bond: take_pending_bond(&mut tokens),
                    digit,
                    pos,
                }
            }
            '-' | '=' | '#' | ':' | '/' | '\\' => {
                cur.bump();
                Token::Bond(match c {
                    '-' => BondToken::Single,
                    '=' => BondToken::Double,
                    '#' => BondToken::Triple,
                    ':' => BondToken::Aromatic,
                    '/' => BondToken::Up,
                    _ => BondToken::Down,
                })
            }
            _ => Token::Atom(organic_atom(&mut cur)?),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

fn take_pending_bond(tokens: &mut Vec<Token>) -> Option<BondToken> {
    match tokens.last() {
        Some(Token::Bond(b)) => {
            let b = *b;
            tokens.pop();
            Some(b)
        }
        _ => None,
    }
}

fn organic_atom(cur: &mut Cursor) -> Result<AtomToken, SmilesError> {
    let pos = cur.pos;
    for (symbol, element) in [("Cl", Element::Cl), ("Br", Element::Br)] {
        if cur.starts_with(symbol) {
            cur.pos += 2;
            return Ok(AtomToken::bare(Some(element), false, pos));
        }
    }
    let ch = cur.bump().ok_or(SmilesError::UnexpectedEnd)?;
    let (element, aromatic) = match ch {
        'B' => (Element::B, false),
        'C' => (Element::C, false),
        'N' => (Element::N, false),
        'O' => (Element::O, false),
        'P' => (Element::P, false),
        'S' => (Element::S, false),
        'F' => (Element::F, false),
        'I' => (Element::I, false),
        'b' => (Element::B, true),
        'c' => (Element::C, true),
        'n' => (Element::N, true),
        'o' => (Element::O, true),
        'p' => (Element::P, true),
        's' => (Element::S, true),
        _ => return Err(SmilesError::UnexpectedChar { pos, ch }),
    };
    Ok(AtomToken::bare(Some(element), aromatic, pos))
}

fn bracket_atom(cur: &mut Cursor) -> Result<AtomToken, SmilesError> {
    let start = cur.pos;
    cur.bump();

    let isotope = match cur.number()? {
        Some(n) => u16::try_from(n).map_err(|_| SmilesError::NumberOverflow { pos: start })?,
        None => 0,
    };
    let (element, is_aromatic) = bracket_element(cur, start)?;

    let chirality = if cur.eat('@') {
        if cur.eat('@') {
            ChiralityToken::Clockwise
        } else {
            ChiralityToken::Anticlockwise
        }
    } else {
        ChiralityToken::None
    };

    let hcount = if cur.eat('H') {
        Some(cur.digit().map_or(1, |d| d as u8))
    } else {
        None
    };

    let charge = bracket_charge(cur, start)?;

    let atom_class = if cur.eat(':') {
        cur.number()?
            .ok_or(SmilesError::UnexpectedChar { pos: cur.pos, ch: ':' })?
    } else {
        0
    };

    if !cur.eat(']') {
        return Err(SmilesError::UnclosedBracket { pos: start });
    }

    Ok(AtomToken {
        element,
        is_aromatic,
        isotope,
        chirality,
        hcount: Some(hcount.unwrap_or(0)),
        charge,
        atom_class,
        is_bracket: true,
        pos: start,
    })
}

fn bracket_element(cur: &mut Cursor, start: usize) -> Result<(Option<Element>, bool), SmilesError> {
    let first = cur.peek().ok_or(SmilesError::UnclosedBracket { pos: start })?;
    if first == '*' {
        cur.bump();
        return Ok((None, false));
    }

    if first.is_ascii_lowercase() {
        for &(symbol, element) in AROMATIC_BRACKET {
            if cur.starts_with(symbol) {
                cur.pos += symbol.len();
                return Ok((Some(element), true));
            }
        }
    }

    if first.is_ascii_uppercase() {
        if let Some(second) = cur.peek_at(1).filter(char::is_ascii_lowercase) {
            let symbol: String = [first, second].iter().collect();
            if let Some(e) = Element::from_symbol(&symbol) {
                cur.pos += 2;
                return Ok((Some(e), false));
            }
        }
        if let Some(e) = Element::from_symbol(&first.to_string()) {
            cur.pos += 1;
            return Ok((Some(e), false));
        }
    }

    Err(SmilesError::InvalidElement {
        pos: cur.pos,
        text: first.to_string(),
    })
}

/// `+`, `++`, `+2`, `-`, `--`, `-3`, or nothing.
fn bracket_charge(cur: &mut Cursor, start: usize) -> Result<i8, SmilesError> {
    let sign: i8 = match cur.peek() {
        Some('+') => 1,
        Some('-') => -1,
        _ => return Ok(0),
    };
    let symbol = if sign > 0 { '+' } else { '-' };
    cur.bump();

    let magnitude: i8 = if let Some(n) = cur.number()? {
        i8::try_from(n).map_err(|_| SmilesError::InvalidCharge { pos: start })?
    } else {
        let mut count: i8 = 1;
        while cur.eat(symbol) {
            count = count
                .checked_add(1)
                .ok_or(SmilesError::InvalidCharge { pos: start })?;
        }
        count
    };
    Ok(sign * magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_atom(s: &str) -> AtomToken {
        match tokenize(s).unwrap().as_slice() {
            [Token::Atom(a)] => a.clone(),
            other => panic!("expected one atom token, got {other:?}"),
        }
    }

    #[test]
    fn tokenize_methane() {
        let a = single_atom("C");
        assert_eq!(a.element, Some(Element::C));
        assert!(!a.is_bracket);
        assert!(!a.is_aromatic);
    }

    #[test]
    fn tokenize_ethene() {
        let tokens = tokenize("C=C").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1], Token::Bond(BondToken::Double));
    }

    #[test]
    fn two_letter_organic_atoms() {
        let tokens = tokenize("ClCBr").unwrap();
        let elements: Vec<_> = tokens
            .iter()
            .map(|t| match t {
                Token::Atom(a) => a.element,
                _ => None,
            })
            .collect();
        assert_eq!(
            elements,
            vec![Some(Element::Cl), Some(Element::C), Some(Element::Br)]
        );
    }

    #[test]
    fn tokenize_bracket_atom() {
        let a = single_atom("[NH4+]");
        assert_eq!(a.element, Some(Element::N));
        assert!(a.is_bracket);
        assert_eq!(a.hcount, Some(4));
        assert_eq!(a.charge, 1);
    }

    #[test]
    fn tokenize_isotope() {
        let a = single_atom("[13C]");
        assert_eq!(a.isotope, 13);
        assert_eq!(a.element, Some(Element::C));
    }

    #[test]
    fn explicit_hydrogen_atom() {
        let a = single_atom("[H]");
        assert_eq!(a.element, Some(Element::H));
        assert_eq!(a.hcount, Some(0));
    }

    #[test]
    fn wildcards() {
        let bare = single_atom("*");
        assert_eq!(bare.element, None);
        assert!(!bare.is_bracket);

        let mapped = single_atom("[*:12]");
        assert_eq!(mapped.element, None);
        assert_eq!(mapped.atom_class, 12);
    }

    #[test]
    fn ring_closure_takes_pending_bond() {
        let tokens = tokenize("C=1CC1").unwrap();
        assert_eq!(tokens.len(), 5);
        assert!(matches!(
            &tokens[1],
            Token::RingClosure {
                bond: Some(BondToken::Double),
                digit: 1,
                ..
            }
        ));
    }

    #[test]
    fn tokenize_percent_ring() {
        let tokens = tokenize("C%10CC-%10").unwrap();
        assert!(matches!(&tokens[1], Token::RingClosure { digit: 10, .. }));
        assert!(matches!(
            &tokens[4],
            Token::RingClosure {
                bond: Some(BondToken::Single),
                digit: 10,
                ..
            }
        ));
    }

    #[test]
    fn tokenize_chirality() {
        let a = single_atom("[C@@H]");
        assert_eq!(a.chirality, ChiralityToken::Clockwise);
        assert_eq!(a.hcount, Some(1));
        let b = single_atom("[C@]");
        assert_eq!(b.chirality, ChiralityToken::Anticlockwise);
    }

    #[test]
    fn tokenize_aromatic() {
        let tokens = tokenize("c1ccccc1").unwrap();
        assert_eq!(tokens.len(), 8);
        assert!(matches!(&tokens[0], Token::Atom(a) if a.is_aromatic));
    }

    #[test]
    fn bracket_aromatic_two_letter() {
        let a = single_atom("[se]");
        assert!(a.is_aromatic);
        assert_eq!(a.element, Some(Element::Se));
        let s = single_atom("[sH+]");
        assert_eq!(s.element, Some(Element::S));
        assert_eq!(s.hcount, Some(1));
    }

    #[test]
    fn charge_variants() {
        assert_eq!(single_atom("[O-]").charge, -1);
        assert_eq!(single_atom("[O-2]").charge, -2);
        assert_eq!(single_atom("[O--]").charge, -2);
        assert_eq!(single_atom("[Fe+++]").charge, 3);
        assert_eq!(single_atom("[Fe+3]").charge, 3);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            tokenize("C?"),
            Err(SmilesError::UnexpectedChar { pos: 1, ch: '?' })
        );
        assert_eq!(tokenize("[C"), Err(SmilesError::UnclosedBracket { pos: 0 }));
        assert!(matches!(
            tokenize("[Xx]"),
            Err(SmilesError::InvalidElement { .. })
        ));
    }
}
