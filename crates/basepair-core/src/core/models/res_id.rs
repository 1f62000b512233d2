use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Residue identifier: chain, sequence number, insertion code.
///
/// Totally ordered by chain, then number, then insertion code. The canonical
/// text form is `<chain><number>[<insertion>]`, with blank chain and
/// insertion characters omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResId {
    pub chain: char,
    pub number: i32,
    pub insertion: char,
}

impl ResId {
    pub fn new(chain: char, number: i32) -> Self {
        ResId {
            chain,
            number,
            insertion: ' ',
        }
    }

    pub fn with_insertion(chain: char, number: i32, insertion: char) -> Self {
        ResId {
            chain,
            number,
            insertion,
        }
    }
}

impl Default for ResId {
    fn default() -> Self {
        ResId::new(' ', -1)
    }
}

impl Ord for ResId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.chain
            .cmp(&other.chain)
            .then(self.number.cmp(&other.number))
            .then(self.insertion.cmp(&other.insertion))
    }
}

impl PartialOrd for ResId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ResId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.chain != ' ' {
            write!(f, "{}", self.chain)?;
        }
        write!(f, "{}", self.number)?;
        if self.insertion != ' ' {
            write!(f, "{}", self.insertion)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed residue id: '{0}'")]
pub struct ParseResIdError(pub String);

impl FromStr for ResId {
    type Err = ParseResIdError;

    /// Parses `<chain><number>[<insertion>]`, e.g. `A5`, `B-2`, `C12a`, `7`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars().peekable();

        let chain = match chars.peek() {
            Some(c) if c.is_ascii_alphabetic() => {
                let c = *c;
                chars.next();
                c
            }
            _ => ' ',
        };

        let mut digits = String::new();
        if matches!(chars.peek(), Some('-')) {
            digits.push('-');
            chars.next();
        }
        while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
            digits.push(chars.next().unwrap());
        }

        let number: i32 = digits
            .parse()
            .map_err(|_| ParseResIdError(s.to_string()))?;

        let insertion = match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => c,
            Some(_) => return Err(ParseResIdError(s.to_string())),
            None => ' ',
        };
        if chars.next().is_some() {
            return Err(ParseResIdError(s.to_string()));
        }

        Ok(ResId {
            chain,
            number,
            insertion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_form_round_trips() {
        for id in [
            ResId::new('A', 5),
            ResId::new('B', -2),
            ResId::with_insertion('C', 12, 'a'),
            ResId::new(' ', 7),
        ] {
            let parsed: ResId = id.to_string().parse().unwrap();
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn ordering_is_chain_then_number_then_insertion() {
        let mut ids = vec![
            ResId::with_insertion('A', 2, 'b'),
            ResId::new('B', 1),
            ResId::new('A', 2),
            ResId::new('A', 1),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                ResId::new('A', 1),
                ResId::new('A', 2),
                ResId::with_insertion('A', 2, 'b'),
                ResId::new('B', 1),
            ]
        );
    }

    #[test]
    fn malformed_ids_fail_to_parse() {
        assert!("".parse::<ResId>().is_err());
        assert!("A".parse::<ResId>().is_err());
        assert!("A5!".parse::<ResId>().is_err());
    }
}
