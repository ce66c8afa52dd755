//! Number-word literals.
//!
//! A run of identifier tokens can spell an integer in English or Polish:
//! `forty two`, `three hundred and seven`, `dwa tysiąc` (scale words only
//! for Polish). The parser consumes the maximal identifier run when the
//! first word could start a number and does not shadow a declared name; if
//! any word in the run is unknown the whole run collapses into one string
//! literal instead.

use berd_lex::TokenKind;
use berd_util::Result;

use crate::ast::{Expr, ExprKind};
use crate::Parser;

/// Classification of a single number word.
#[derive(Clone, Copy, Debug, PartialEq)]
enum NumWord {
    /// `zero` through `nineteen`.
    Unit(u64),
    /// `twenty` through `ninety`.
    Ten(u64),
    /// `hundred` - multiplies the current group.
    Hundred,
    /// Scale words, English and Polish: closes the current group.
    Scale(u64),
    /// `and` / `i` - glue, contributes nothing.
    Connector,
}

fn classify(word: &str) -> Option<NumWord> {
    Some(match word {
        "zero" => NumWord::Unit(0),
        "one" => NumWord::Unit(1),
        "two" => NumWord::Unit(2),
        "three" => NumWord::Unit(3),
        "four" => NumWord::Unit(4),
        "five" => NumWord::Unit(5),
        "six" => NumWord::Unit(6),
        "seven" => NumWord::Unit(7),
        "eight" => NumWord::Unit(8),
        "nine" => NumWord::Unit(9),
        "ten" => NumWord::Unit(10),
        "eleven" => NumWord::Unit(11),
        "twelve" => NumWord::Unit(12),
        "thirteen" => NumWord::Unit(13),
        "fourteen" => NumWord::Unit(14),
        "fifteen" => NumWord::Unit(15),
        "sixteen" => NumWord::Unit(16),
        "seventeen" => NumWord::Unit(17),
        "eighteen" => NumWord::Unit(18),
        "nineteen" => NumWord::Unit(19),
        "twenty" => NumWord::Ten(20),
        "thirty" => NumWord::Ten(30),
        "forty" => NumWord::Ten(40),
        "fifty" => NumWord::Ten(50),
        "sixty" => NumWord::Ten(60),
        "seventy" => NumWord::Ten(70),
        "eighty" => NumWord::Ten(80),
        "ninety" => NumWord::Ten(90),
        "hundred" => NumWord::Hundred,
        "thousand" | "tysiąc" => NumWord::Scale(1_000),
        "million" | "milion" => NumWord::Scale(1_000_000),
        "billion" | "miliard" => NumWord::Scale(1_000_000_000),
        "trillion" | "bilion" => NumWord::Scale(1_000_000_000_000),
        "quadrillion" | "biliard" => NumWord::Scale(1_000_000_000_000_000),
        "quintillion" | "trylion" => NumWord::Scale(1_000_000_000_000_000_000),
        "and" | "i" => NumWord::Connector,
        _ => return None,
    })
}

/// Whether `word` may begin a number-word run. Connectors cannot.
pub(crate) fn starts_number(word: &str) -> bool {
    !matches!(classify(word), None | Some(NumWord::Connector))
}

/// Converts a word sequence to its integer value.
///
/// Returns `None` when any word is unknown, the sequence starts with a
/// connector, or nothing numeric appears.
///
/// # Examples
///
/// ```
/// use berd_par::words_to_number;
///
/// assert_eq!(words_to_number(&["forty", "two"]), Some(42.0));
/// assert_eq!(
///     words_to_number(&["three", "hundred", "and", "seven"]),
///     Some(307.0)
/// );
/// assert_eq!(words_to_number(&["dwa", "miliard"]), None);
/// assert_eq!(words_to_number(&["two", "miliard"]), Some(2_000_000_000.0));
/// ```
pub fn words_to_number(words: &[&str]) -> Option<f64> {
    if words.is_empty() {
        return None;
    }
    let mut total = 0.0f64;
    let mut current = 0.0f64;
    let mut any_numeric = false;
    for (i, word) in words.iter().enumerate() {
        match classify(word)? {
            NumWord::Connector => {
                if i == 0 {
                    return None;
                }
            }
            NumWord::Unit(v) => {
                current += v as f64;
                any_numeric = true;
            }
            NumWord::Ten(v) => {
                current += v as f64;
                any_numeric = true;
            }
            NumWord::Hundred => {
                if current == 0.0 {
                    current = 100.0;
                } else {
                    current *= 100.0;
                }
                any_numeric = true;
            }
            NumWord::Scale(v) => {
                if current == 0.0 {
                    current = 1.0;
                }
                total += current * v as f64;
                current = 0.0;
                any_numeric = true;
            }
        }
    }
    if any_numeric {
        Some(total + current)
    } else {
        None
    }
}

impl Parser {
    /// Consumes the maximal identifier run starting at the cursor and turns
    /// it into either a number literal or a string-literal fallback.
    ///
    /// The caller has already checked that the first word can start a
    /// number and is not a declared name.
    pub(crate) fn parse_number_words(&mut self) -> Result<Expr> {
        let start = self.span();
        let mut end = start;
        let mut words = Vec::new();
        while let TokenKind::Ident(sym) = self.kind() {
            let sym = *sym;
            if self.is_stop_word(sym) {
                break;
            }
            words.push(sym);
            end = self.span();
            self.advance();
        }
        let texts: Vec<&str> = words.iter().map(|s| s.as_str()).collect();
        let span = start.to(end);
        match words_to_number(&texts) {
            Some(value) => Ok(Expr::new(ExprKind::Number(value), span)),
            None => Ok(Expr::new(ExprKind::Str(texts.join(" ")), span)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_units() {
        assert_eq!(words_to_number(&["zero"]), Some(0.0));
        assert_eq!(words_to_number(&["nineteen"]), Some(19.0));
    }

    #[test]
    fn test_tens_and_units() {
        assert_eq!(words_to_number(&["ninety", "nine"]), Some(99.0));
    }

    #[test]
    fn test_hundreds() {
        assert_eq!(words_to_number(&["hundred"]), Some(100.0));
        assert_eq!(
            words_to_number(&["two", "hundred", "thirty", "four"]),
            Some(234.0)
        );
    }

    #[test]
    fn test_scales() {
        assert_eq!(
            words_to_number(&["twelve", "thousand", "five"]),
            Some(12_005.0)
        );
        assert_eq!(words_to_number(&["three", "million"]), Some(3_000_000.0));
        assert_eq!(
            words_to_number(&["one", "quintillion"]),
            Some(1e18)
        );
    }

    #[test]
    fn test_polish_scales() {
        assert_eq!(words_to_number(&["two", "tysiąc"]), Some(2_000.0));
        assert_eq!(words_to_number(&["trylion"]), Some(1e18));
    }

    #[test]
    fn test_connectors() {
        assert_eq!(
            words_to_number(&["one", "hundred", "and", "one"]),
            Some(101.0)
        );
        assert_eq!(words_to_number(&["sto", "i", "jeden"]), None);
        assert_eq!(words_to_number(&["and", "one"]), None);
    }

    #[test]
    fn test_unknown_word() {
        assert_eq!(words_to_number(&["forty", "bananas"]), None);
    }

    #[test]
    fn test_connector_only() {
        assert_eq!(words_to_number(&["i"]), None);
    }
}
