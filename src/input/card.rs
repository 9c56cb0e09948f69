/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! FEFF input card splitting

/// A keyword line of a FEFF deck and the lines that follow it
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Name of the card in uppercase (e.g., "ATOMS", "POTENTIALS")
    pub name: String,
    /// Text after the name on the keyword line
    pub value: String,
    /// Lines following the keyword line
    pub content: Vec<String>,
    /// Line number where the card starts in the input file
    pub line_number: usize,
}

/// Whether a line opens a card
///
/// Keywords start with a letter and contain only letters, digits and
/// underscores; case is ignored (`S02`, `edge`, `BEAM_ENERGY`).
pub fn is_card_name(s: &str) -> bool {
    let first_word = s.split_whitespace().next().unwrap_or("");

    first_word
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && first_word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Comment lines start with `*`, `#` or `!`
pub fn is_comment(s: &str) -> bool {
    s.starts_with('*') || s.starts_with('#') || s.starts_with('!')
}

/// Split deck text into cards, dropping blank and comment lines
pub fn parse_cards(text: &str) -> Vec<Card> {
    let mut cards = Vec::new();
    let mut current_card: Option<Card> = None;

    for (i, line) in text.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() || is_comment(trimmed) {
            continue;
        }

        if is_card_name(trimmed) {
            if let Some(card) = current_card.take() {
                cards.push(card);
            }

            let (name, rest) = match trimmed.split_once(char::is_whitespace) {
                Some((name, rest)) => (name, rest.trim()),
                None => (trimmed, ""),
            };

            current_card = Some(Card {
                name: name.to_uppercase(),
                value: rest.to_string(),
                content: Vec::new(),
                line_number: i + 1,
            });
        } else if let Some(card) = &mut current_card {
            card.content.push(trimmed.to_string());
        }
    }

    if let Some(card) = current_card {
        cards.push(card);
    }

    cards
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_names() {
        assert!(is_card_name("ATOMS"));
        assert!(is_card_name("S02 0.0"));
        assert!(is_card_name("edge K"));
        assert!(is_card_name("BEAM_ENERGY 100"));
        assert!(!is_card_name("0 8 O -1 -1 0.0001 0"));
        assert!(!is_card_name("-1.5 0.0 0.0 1 O"));
        assert!(!is_card_name("* comment"));
        assert!(!is_card_name(""));
    }

    #[test]
    fn test_parse_cards() {
        let deck = "* comment\nTITLE test\n\nEDGE K\nPOTENTIALS\n 0 8 O\n 1 27 Co\nEND\n";
        let cards = parse_cards(deck);
        let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["TITLE", "EDGE", "POTENTIALS", "END"]);
        assert_eq!(cards[1].value, "K");
        assert_eq!(cards[1].line_number, 4);
        assert_eq!(cards[2].content, vec!["0 8 O", "1 27 Co"]);
        assert_eq!(cards[2].value, "");
    }
}
