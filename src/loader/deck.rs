//! Deck list loader (.deck format)
//!
//! One entry per line: `<quantity> #<number> [name]`, for example
//! `4 #46 Charmander`. The name is optional and only used to warn about a
//! list that disagrees with the catalog. Blank lines, `//` comments and
//! `[section]` headers are skipped.

use crate::core::CardNumber;
use crate::{Result, TcgError};
use nom::character::complete::{char, digit1, space1};
use nom::combinator::{all_consuming, map_res, opt, rest};
use nom::sequence::{preceded, tuple};
use nom::IResult;
use std::fs;
use std::path::Path;

/// One line of a deck list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub count: u8,
    pub number: CardNumber,
    /// Name as written in the list, if any
    pub name: Option<String>,
}

/// A complete deck list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeckList {
    pub entries: Vec<DeckEntry>,
}

impl DeckList {
    pub fn total_cards(&self) -> usize {
        self.entries.iter().map(|e| e.count as usize).sum()
    }
}

fn decimal<T: std::str::FromStr>(input: &str) -> IResult<&str, T> {
    map_res(digit1, str::parse::<T>)(input)
}

fn deck_line(input: &str) -> IResult<&str, DeckEntry> {
    let (input, (count, _, _, number, name)) = tuple((
        decimal::<u8>,
        space1,
        char('#'),
        decimal::<u32>,
        opt(preceded(space1, rest)),
    ))(input)?;
    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    Ok((
        input,
        DeckEntry {
            count,
            number: CardNumber::new(number),
            name,
        },
    ))
}

/// Deck loader for .deck files
pub struct DeckLoader;

impl DeckLoader {
    pub fn load_from_file(path: &Path) -> Result<DeckList> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a deck from its text content
    pub fn parse(content: &str) -> Result<DeckList> {
        let mut entries = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("//") || line.starts_with('[') {
                continue;
            }
            let (_, entry) = all_consuming(deck_line)(line).map_err(|_| {
                TcgError::InvalidDeckFormat(format!(
                    "line {}: expected '<qty> #<number> [name]', got '{}'",
                    line_no + 1,
                    line
                ))
            })?;
            if entry.count == 0 {
                return Err(TcgError::InvalidDeckFormat(format!(
                    "line {}: quantity must be at least 1",
                    line_no + 1
                )));
            }
            entries.push(entry);
        }

        if entries.is_empty() {
            return Err(TcgError::InvalidDeckFormat("Empty deck".to_string()));
        }
        Ok(DeckList { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_deck() {
        let content = r#"
// Fire starter
[Creatures]
4 #46 Charmander
2 #24 Charmeleon

[Energy]
14 #98
"#;

        let deck = DeckLoader::parse(content).unwrap();
        assert_eq!(deck.entries.len(), 3);
        assert_eq!(deck.total_cards(), 20);
        assert_eq!(
            deck.entries[0],
            DeckEntry {
                count: 4,
                number: CardNumber::new(46),
                name: Some("Charmander".to_string()),
            }
        );
        assert_eq!(deck.entries[2].name, None);
    }

    #[test]
    fn test_rejects_bad_lines() {
        assert!(DeckLoader::parse("4 Charmander").is_err());
        assert!(DeckLoader::parse("0 #46 Charmander").is_err());
        assert!(DeckLoader::parse("// nothing here").is_err());
    }
}
