//! English language helpers used by the soul renderer and the
//! command output: articles, possessives, pluralization, list joining,
//! and the yes/no parser used by dialog validators.

use crate::error::WorldError;

/// Join a list of words to "a, b, and c" (two words: "a and b").
pub fn join<I, S>(words: I, conj: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let words: Vec<String> = words.into_iter().map(|w| w.as_ref().to_string()).collect();
    match words.len() {
        0 => String::new(),
        1 => words[0].clone(),
        2 => format!("{} {} {}", words[0], conj, words[1]),
        _ => format!(
            "{}, {} {}",
            words[..words.len() - 1].join(", "),
            conj,
            words[words.len() - 1]
        ),
    }
}

/// "and"-join, the common case.
pub fn join_and<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    join(words, "and")
}

const A_EXCEPTIONS: &[(&str, &str)] = &[
    ("universe", "a"),
    ("university", "a"),
    ("user", "a"),
    ("hour", "an"),
];

/// Prefix a word with "a" or "an". Simplistic: vowel check plus a
/// small exceptions table. Words already carrying an article pass
/// through untouched.
pub fn a(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    if word.starts_with("a ") || word.starts_with("an ") {
        return word.to_string();
    }
    let first_word = word.split_whitespace().next().unwrap_or(word).to_lowercase();
    if let Some((_, article)) = A_EXCEPTIONS.iter().find(|(w, _)| *w == first_word) {
        return format!("{} {}", article, word);
    }
    if word.starts_with(['a', 'e', 'i', 'o', 'u']) {
        format!("an {}", word)
    } else {
        format!("a {}", word)
    }
}

/// Add a fullstop to the end of a sentence if needed.
pub fn fullstop(sentence: &str) -> String {
    let sentence = sentence.trim_end();
    if sentence.ends_with(['!', '?', '.', ';', ':', '-', '=']) {
        sentence.to_string()
    } else {
        format!("{}.", sentence)
    }
}

/// Uppercase the first character, leave the rest alone.
pub fn capital(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn possessive_letter(name: &str) -> &'static str {
    if name.is_empty() || name.ends_with(" own") {
        ""
    } else {
        "'s"
    }
}

/// "mark" -> "mark's", "your own" stays as-is.
pub fn possessive(name: &str) -> String {
    format!("{}{}", name, possessive_letter(name))
}

/// Return the gerund of a verb: shoot -> shooting, poke -> poking.
pub fn fullverb(verb: &str) -> String {
    if let Some(stem) = verb.strip_suffix('e') {
        format!("{}ing", stem)
    } else {
        format!("{}ing", verb)
    }
}

const PLURAL_IRREGULARITIES: &[(&str, &str)] = &[
    ("mouse", "mice"),
    ("child", "children"),
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("aircraft", "aircraft"),
    ("fish", "fish"),
    ("headquarters", "headquarters"),
    ("sheep", "sheep"),
    ("species", "species"),
    ("cattle", "cattle"),
    ("scissors", "scissors"),
    ("trousers", "trousers"),
    ("pants", "pants"),
    ("tweezers", "tweezers"),
    ("congratulations", "congratulations"),
    ("pyjamas", "pyjamas"),
    ("photo", "photos"),
    ("piano", "pianos"),
];

/// Pluralize a word for the given amount.
pub fn pluralize(word: &str, amount: u64) -> String {
    if amount == 1 {
        return word.to_string();
    }
    if let Some((_, plural)) = PLURAL_IRREGULARITIES.iter().find(|(w, _)| *w == word) {
        return plural.to_string();
    }
    if let Some(stem) = word.strip_suffix("is") {
        return format!("{}es", stem);
    }
    if word.ends_with('z') {
        return format!("{}zes", word);
    }
    if word.ends_with('s') || word.ends_with("ch") || word.ends_with('x') || word.ends_with("sh") {
        return format!("{}es", word);
    }
    if let Some(stem) = word.strip_suffix('y') {
        return format!("{}ies", stem);
    }
    if let Some(stem) = word.strip_suffix("fe") {
        return format!("{}ves", stem);
    }
    if let Some(stem) = word.strip_suffix('f') {
        return format!("{}ves", stem);
    }
    if word.ends_with('o') && word.len() > 1 {
        let before = word.as_bytes()[word.len() - 2] as char;
        if !"aeiouy".contains(before) {
            return format!("{}es", word);
        }
    }
    format!("{}s", word)
}

const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty",
];

/// Spell a small number in words; larger numbers and un-spellable
/// fractions fall back to digits. Halves become "and a half".
pub fn spell_number(number: f64) -> String {
    let mut result = String::new();
    let mut number = number;
    if number < 0.0 {
        result.push_str("minus ");
        number = -number;
    }
    if number > 20.0 {
        return format!("{}{}", result, number);
    }
    let int_part = number.trunc() as usize;
    let fraction = number - number.trunc();
    let fraction_txt = if fraction == 0.0 {
        ""
    } else if fraction == 0.5 {
        " and a half"
    } else {
        return format!("{}", number);
    };
    format!("{}{}{}", result, NUMBER_WORDS[int_part], fraction_txt)
}

/// Parse a yes/no answer. Used as a dialog validator.
pub fn yesno(value: &str) -> Result<bool, WorldError> {
    match value.trim().to_lowercase().as_str() {
        "y" | "yes" | "sure" | "yep" | "yeah" | "yessir" | "sure thing" => Ok(true),
        "n" | "no" | "nope" | "no way" | "hell no" => Ok(false),
        _ => Err(WorldError::parse("That is not an understood yes or no.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_uses_oxford_comma_for_three_or_more() {
        assert_eq!(join_and(Vec::<&str>::new()), "");
        assert_eq!(join_and(["a"]), "a");
        assert_eq!(join_and(["a", "b"]), "a and b");
        assert_eq!(join_and(["a", "b", "c"]), "a, b, and c");
        assert_eq!(join(["a", "b", "c"], "or"), "a, b, or c");
    }

    #[test]
    fn article_selection() {
        assert_eq!(a("newspaper"), "a newspaper");
        assert_eq!(a("egg"), "an egg");
        assert_eq!(a("hour"), "an hour");
        assert_eq!(a("university"), "a university");
        assert_eq!(a("a boat"), "a boat");
        assert_eq!(a("an egg"), "an egg");
    }

    #[test]
    fn fullstop_only_when_needed() {
        assert_eq!(fullstop("You sweat"), "You sweat.");
        assert_eq!(fullstop("You sweat!"), "You sweat!");
        assert_eq!(fullstop("You sweat.  "), "You sweat.");
    }

    #[test]
    fn possessives() {
        assert_eq!(possessive("mark"), "mark's");
        assert_eq!(possessive("tess"), "tess's");
        assert_eq!(possessive("your own"), "your own");
    }

    #[test]
    fn plurals() {
        assert_eq!(pluralize("cat", 2), "cats");
        assert_eq!(pluralize("cat", 1), "cat");
        assert_eq!(pluralize("mouse", 2), "mice");
        assert_eq!(pluralize("box", 2), "boxes");
        assert_eq!(pluralize("city", 2), "cities");
        assert_eq!(pluralize("knife", 2), "knives");
        assert_eq!(pluralize("wolf", 2), "wolves");
        assert_eq!(pluralize("potato", 2), "potatoes");
        assert_eq!(pluralize("crisis", 2), "crises");
    }

    #[test]
    fn numbers_are_spelled_out() {
        assert_eq!(spell_number(0.0), "zero");
        assert_eq!(spell_number(13.0), "thirteen");
        assert_eq!(spell_number(2.5), "two and a half");
        assert_eq!(spell_number(-3.0), "minus three");
        assert_eq!(spell_number(21.0), "21");
    }

    #[test]
    fn fullverb_forms() {
        assert_eq!(fullverb("shoot"), "shooting");
        assert_eq!(fullverb("poke"), "poking");
    }

    #[test]
    fn yesno_parses_common_answers() {
        assert_eq!(yesno("y").unwrap(), true);
        assert_eq!(yesno("Sure").unwrap(), true);
        assert_eq!(yesno("nope").unwrap(), false);
        assert!(yesno("maybe").is_err());
    }
}
