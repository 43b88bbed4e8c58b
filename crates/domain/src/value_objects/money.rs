use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::lang;

/// Money style of a story: modern (dollars/cents) or fantasy
/// (gold/silver/copper, base unit silver: 10 silver = 1 gold,
/// 10 copper = 1 silver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoneyKind {
    Modern,
    Fantasy,
}

const MONEY_WORDS_FANTASY: &[&str] = &["gold", "silver", "copper", "coppers"];
const MONEY_WORDS_MODERN: &[&str] = &["dollar", "dollars", "cent", "cents"];

/// Display and parsing of money amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoneyFormatter {
    kind: MoneyKind,
}

impl MoneyFormatter {
    pub fn new(kind: MoneyKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> MoneyKind {
        self.kind
    }

    fn money_words(&self) -> &'static [&'static str] {
        match self.kind {
            MoneyKind::Fantasy => MONEY_WORDS_FANTASY,
            MoneyKind::Modern => MONEY_WORDS_MODERN,
        }
    }

    /// Long display form: "2 gold and 4 silver", "1 dollar and 5 cents".
    pub fn display(&self, amount: f64) -> String {
        self.display_zero(amount, "nothing")
    }

    pub fn display_zero(&self, amount: f64, zero_msg: &str) -> String {
        match self.kind {
            MoneyKind::Fantasy => {
                let gold = (amount / 10.0).floor() as i64;
                let rest = amount % 10.0;
                let silver = rest.floor() as i64;
                let copper = ((rest - rest.floor()) * 10.0).round() as i64;
                let mut result = Vec::new();
                if gold != 0 {
                    result.push(format!("{} gold", gold));
                }
                if silver != 0 {
                    result.push(format!("{} silver", silver));
                }
                if copper != 0 {
                    result.push(format!("{} copper", copper));
                }
                if result.is_empty() {
                    zero_msg.to_string()
                } else {
                    lang::join_and(result)
                }
            }
            MoneyKind::Modern => {
                let dollar = amount.floor() as i64;
                let cents = ((amount - amount.floor()) * 100.0).round() as i64;
                let mut result = Vec::new();
                if dollar != 0 {
                    result.push(format!("{} {}", dollar, lang::pluralize("dollar", dollar as u64)));
                }
                if cents != 0 {
                    result.push(format!("{} {}", cents, lang::pluralize("cent", cents as u64)));
                }
                if result.is_empty() {
                    zero_msg.to_string()
                } else {
                    lang::join_and(result)
                }
            }
        }
    }

    /// Short display form: "2g/4s/0c" or "$ 1.23".
    pub fn display_short(&self, amount: f64) -> String {
        match self.kind {
            MoneyKind::Fantasy => {
                let gold = (amount / 10.0).floor() as i64;
                let rest = amount % 10.0;
                let silver = rest.floor() as i64;
                let copper = ((rest - rest.floor()) * 10.0).round() as i64;
                format!("{}g/{}s/{}c", gold, silver, copper)
            }
            MoneyKind::Modern => format!("$ {:.2}", amount),
        }
    }

    /// Convert a compact string form ("11g/22s/33c", "$1234.55") to an
    /// amount in base units.
    fn amount_from_string(&self, coins: &str) -> Result<f64, WorldError> {
        match self.kind {
            MoneyKind::Fantasy => {
                if coins.is_empty() {
                    return Err(WorldError::parse("That's not an amount of money."));
                }
                let mut result = 0.0;
                for part in coins.split('/') {
                    let parse = |s: &str, factor: f64| -> Result<f64, WorldError> {
                        s.parse::<f64>()
                            .map(|v| v * factor)
                            .map_err(|_| WorldError::parse("That's not an amount of money."))
                    };
                    result += if let Some(number) = part.strip_suffix('g') {
                        parse(number, 10.0)?
                    } else if let Some(number) = part.strip_suffix('s') {
                        parse(number, 1.0)?
                    } else if let Some(number) = part.strip_suffix('c') {
                        parse(number, 0.1)?
                    } else {
                        return Err(WorldError::parse("That's not an amount of money."));
                    };
                }
                Ok(result)
            }
            MoneyKind::Modern => {
                if let Some(number) = coins.strip_prefix('$') {
                    number
                        .parse::<f64>()
                        .map_err(|_| WorldError::parse("That's not an amount of money."))
                } else {
                    Err(WorldError::parse("That's not an amount of money."))
                }
            }
        }
    }

    fn coin_value(&self, word: &str) -> f64 {
        match (self.kind, word) {
            (MoneyKind::Fantasy, "gold") => 10.0,
            (MoneyKind::Fantasy, "silver") => 1.0,
            (MoneyKind::Fantasy, "copper" | "coppers") => 0.1,
            (MoneyKind::Modern, "dollar" | "dollars") => 1.0,
            (MoneyKind::Modern, "cent" | "cents") => 0.01,
            _ => 0.0,
        }
    }

    /// Convert a sequence of words to the amount of money it
    /// represents: either the compact string form, possibly split in
    /// two tokens ("$ 12.50"), or the word form ("5 gold 3 copper").
    pub fn parse(&self, words: &[&str]) -> Result<f64, WorldError> {
        if words.len() == 1 {
            if let Ok(amount) = self.amount_from_string(words[0]) {
                return Ok(amount);
            }
        } else if words.len() == 2 {
            if let Ok(amount) = self.amount_from_string(&format!("{}{}", words[0], words[1])) {
                return Ok(amount);
            }
        }
        let money_words = self.money_words();
        if words.iter().any(|w| money_words.contains(w)) {
            // all words must be either an amount or a money word
            let mut total = 0.0;
            let mut seen: Vec<&str> = Vec::new();
            let mut amount: Option<f64> = None;
            for &word in words {
                if money_words.contains(&word) {
                    match amount.take() {
                        Some(value) => {
                            if seen.contains(&word) {
                                return Err(WorldError::parse("What amount?"));
                            }
                            seen.push(word);
                            total += value * self.coin_value(word);
                        }
                        None => return Err(WorldError::parse("What amount?")),
                    }
                } else {
                    amount = Some(
                        word.parse::<f64>()
                            .map_err(|_| WorldError::parse("What amount?"))?,
                    );
                }
            }
            return Ok(total);
        }
        Err(WorldError::parse("That is not an amount of money."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fantasy_display() {
        let fmt = MoneyFormatter::new(MoneyKind::Fantasy);
        assert_eq!(fmt.display(0.0), "nothing");
        assert_eq!(fmt.display(1.0), "1 silver");
        assert_eq!(fmt.display(24.3), "2 gold, 4 silver, and 3 copper");
        assert_eq!(fmt.display_short(24.3), "2g/4s/3c");
    }

    #[test]
    fn modern_display() {
        let fmt = MoneyFormatter::new(MoneyKind::Modern);
        assert_eq!(fmt.display(0.0), "nothing");
        assert_eq!(fmt.display(1.05), "1 dollar and 5 cents");
        assert_eq!(fmt.display(2.0), "2 dollars");
        assert_eq!(fmt.display_short(1.5), "$ 1.50");
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn fantasy_parse_short_and_word_forms() {
        let fmt = MoneyFormatter::new(MoneyKind::Fantasy);
        assert_close(fmt.parse(&["11g/22s/33c"]).unwrap(), 135.3);
        assert_close(fmt.parse(&["5", "gold", "3", "copper"]).unwrap(), 50.3);
        assert_close(fmt.parse(&["2", "silver"]).unwrap(), 2.0);
    }

    #[test]
    fn modern_parse_short_and_word_forms() {
        let fmt = MoneyFormatter::new(MoneyKind::Modern);
        assert_close(fmt.parse(&["$1234.55"]).unwrap(), 1234.55);
        assert_close(fmt.parse(&["$", "12.50"]).unwrap(), 12.50);
        assert_close(fmt.parse(&["3", "dollars", "25", "cents"]).unwrap(), 3.25);
    }

    #[test]
    fn malformed_amounts_are_rejected() {
        let fmt = MoneyFormatter::new(MoneyKind::Fantasy);
        assert_eq!(
            fmt.parse(&["gold"]).unwrap_err(),
            WorldError::parse("What amount?")
        );
        assert_eq!(
            fmt.parse(&["five", "gold"]).unwrap_err(),
            WorldError::parse("What amount?")
        );
        assert_eq!(
            fmt.parse(&["3", "gold", "4", "gold"]).unwrap_err(),
            WorldError::parse("What amount?")
        );
        assert_eq!(
            fmt.parse(&["sausage"]).unwrap_err(),
            WorldError::parse("That is not an amount of money.")
        );
        let modern = MoneyFormatter::new(MoneyKind::Modern);
        assert_eq!(
            modern.parse(&["1g"]).unwrap_err(),
            WorldError::parse("That is not an amount of money.")
        );
    }
}
