//! The soul parser: turns a free-form utterance into a structured
//! [`ParseResult`], resolving action qualifiers, adverbs, body parts,
//! quoted messages and targets (livings, items and exits, including
//! multi-word names matched greedily).

use std::collections::{HashMap, HashSet};

use crate::adverbs;
use crate::entities::World;
use crate::error::WorldError;
use crate::ids::{ExitId, ItemId, LivingId};
use crate::lang;

use super::verbs;

/// A parsed target: a living, an item, or an exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetRef {
    Living(LivingId),
    Item(ItemId),
    Exit(ExitId),
}

/// Per-target parse info: the position of the target in the utterance
/// and the word immediately preceding it (commands use this to
/// distinguish "put X in Y" from "give X Y").
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WhoInfo {
    pub sequence: usize,
    pub previous_word: Option<String>,
}

/// The structured result of parsing one utterance.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub verb: String,
    pub qualifier: Option<String>,
    pub adverb: Option<String>,
    pub bodypart: Option<String>,
    pub message: String,
    pub args: Vec<String>,
    /// Targets in order of occurrence; duplicates are preserved.
    pub who_order: Vec<TargetRef>,
    pub who_info: HashMap<TargetRef, WhoInfo>,
    pub unrecognized: Vec<String>,
    /// The normalized input from the qualifier/verb onward; reparsing
    /// it yields an equivalent parse.
    pub unparsed: String,
}

impl ParseResult {
    pub fn new(verb: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            ..Default::default()
        }
    }

    pub fn has_targets(&self) -> bool {
        !self.who_order.is_empty()
    }

    /// Targets deduplicated, in order of first occurrence.
    pub fn unique_targets(&self) -> Vec<TargetRef> {
        let mut seen = Vec::new();
        for target in &self.who_order {
            if !seen.contains(target) {
                seen.push(*target);
            }
        }
        seen
    }

    pub fn first_living(&self) -> Option<LivingId> {
        self.who_order.iter().find_map(|t| match t {
            TargetRef::Living(id) => Some(*id),
            _ => None,
        })
    }

    pub fn first_item(&self) -> Option<ItemId> {
        self.who_order.iter().find_map(|t| match t {
            TargetRef::Item(id) => Some(*id),
            _ => None,
        })
    }

    pub fn first_exit(&self) -> Option<ExitId> {
        self.who_order.iter().find_map(|t| match t {
            TargetRef::Exit(id) => Some(*id),
            _ => None,
        })
    }

    fn add_target(&mut self, target: TargetRef, previous_word: Option<&str>) {
        self.who_info.insert(
            target,
            WhoInfo {
                sequence: self.who_order.len(),
                previous_word: previous_word.map(str::to_string),
            },
        );
        self.who_order.push(target);
    }

    fn remove_target(&mut self, target: TargetRef) {
        self.who_order.retain(|t| *t != target);
        self.who_info.remove(&target);
    }

    fn clear_targets(&mut self) {
        self.who_order.clear();
        self.who_info.clear();
    }
}

/// Whether the parsed verb is a soul emote or something the command
/// dispatcher must handle (external verb, or an exit to traverse).
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Soul(ParseResult),
    NonSoul(ParseResult),
}

impl ParseOutcome {
    pub fn into_result(self) -> ParseResult {
        match self {
            ParseOutcome::Soul(parsed) | ParseOutcome::NonSoul(parsed) => parsed,
        }
    }
}

const SKIP_WORDS: &[&str] = &["and", "&", "at", "to", "before", "in", "on", "the", "with"];

const PRONOUNS: &[&str] = &["them", "him", "her", "it"];

/// Pull a quoted substring (single or double quotes) out of the
/// command; it becomes the message. Returns the remaining command.
fn extract_message(cmd: &str) -> (String, Option<String>) {
    let chars: Vec<(usize, char)> = cmd.char_indices().collect();
    let mut open: Option<usize> = None;
    for (pos, (byte_idx, ch)) in chars.iter().enumerate() {
        if *ch != '\'' && *ch != '"' {
            continue;
        }
        match open {
            None => {
                let at_word_start =
                    pos == 0 || chars[pos - 1].1.is_whitespace();
                if at_word_start {
                    open = Some(*byte_idx);
                }
            }
            Some(start) => {
                let inner = &cmd[start + 1..*byte_idx];
                let rest = format!("{}{}", &cmd[..start], &cmd[byte_idx + ch.len_utf8()..]);
                return (rest, Some(inner.trim().to_string()));
            }
        }
    }
    (cmd.to_string(), None)
}

/// Names known around the actor, for greedy (longest-first) matching.
struct KnownNames {
    /// lowercase name -> (priority, target); lower priority wins.
    names: HashMap<String, (u8, TargetRef)>,
    max_words: usize,
}

impl KnownNames {
    fn build(world: &World, actor: LivingId) -> Self {
        let mut names: HashMap<String, (u8, TargetRef)> = HashMap::new();
        let mut add = |name: String, priority: u8, target: TargetRef| {
            let name = name.to_lowercase();
            if name.is_empty() {
                return;
            }
            let better_exists = names
                .get(&name)
                .map(|(existing, _)| *existing <= priority)
                .unwrap_or(false);
            if !better_exists {
                names.insert(name, (priority, target));
            }
        };
        let Some(living) = world.living(actor) else {
            return Self {
                names,
                max_words: 1,
            };
        };
        let location = living.location();
        if let Some(loc) = world.location(location) {
            for living_id in loc.livings() {
                if let Some(other) = world.living(*living_id) {
                    let target = TargetRef::Living(*living_id);
                    add(other.name().to_string(), 0, target);
                    for alias in other.aliases() {
                        add(alias.clone(), 1, target);
                    }
                    add(other.title().to_string(), 2, target);
                }
            }
            for item_id in loc.items() {
                if let Some(item) = world.item(*item_id) {
                    let target = TargetRef::Item(*item_id);
                    add(item.name().to_string(), 3, target);
                    for alias in item.aliases() {
                        add(alias.clone(), 4, target);
                    }
                    add(item.title().to_string(), 5, target);
                }
            }
            for (direction, exit_id) in loc.exits() {
                add(direction.clone(), 6, TargetRef::Exit(*exit_id));
            }
        }
        for item_id in living.inventory() {
            if let Some(item) = world.item(*item_id) {
                let target = TargetRef::Item(*item_id);
                add(item.name().to_string(), 3, target);
                for alias in item.aliases() {
                    add(alias.clone(), 4, target);
                }
                add(item.title().to_string(), 5, target);
            }
        }
        let max_words = names
            .keys()
            .map(|n| n.split_whitespace().count())
            .max()
            .unwrap_or(1);
        Self { names, max_words }
    }

    /// Greedily match the longest known name starting at `tokens[i]`.
    /// Returns the matched target, the canonical name, and the number
    /// of tokens consumed.
    fn match_at(&self, tokens: &[String], i: usize) -> Option<(TargetRef, String, usize)> {
        let available = tokens.len() - i;
        for len in (1..=self.max_words.min(available)).rev() {
            let candidate = tokens[i..i + len].join(" ").to_lowercase();
            if let Some((_, target)) = self.names.get(&candidate) {
                return Some((*target, candidate, len));
            }
        }
        None
    }

    /// Match only exits (used for verb-position exit detection).
    fn match_exit_at(&self, tokens: &[String], i: usize) -> Option<(ExitId, String, usize)> {
        let available = tokens.len() - i;
        for len in (1..=self.max_words.min(available)).rev() {
            let candidate = tokens[i..i + len].join(" ").to_lowercase();
            if let Some((_, TargetRef::Exit(exit))) = self.names.get(&candidate) {
                return Some((*exit, candidate, len));
            }
        }
        None
    }

    fn any_name_with_prefix(&self, prefix: &str) -> Option<String> {
        let mut candidates: Vec<&String> = self
            .names
            .keys()
            .filter(|name| name.starts_with(prefix))
            .collect();
        candidates.sort();
        candidates.first().map(|s| s.to_string())
    }
}

/// Parse a command string uttered by the actor.
///
/// `external_verbs` are the non-soul verbs the dispatcher knows about
/// (commands, custom story verbs); when the verb is one of those the
/// outcome is `NonSoul` and unknown words are collected as args rather
/// than rejected.
pub fn parse(
    world: &World,
    actor: LivingId,
    commandstring: &str,
    external_verbs: &HashSet<String>,
) -> Result<ParseOutcome, WorldError> {
    let (cmd, quoted_message) = extract_message(commandstring);
    let mut tokens: Vec<String> = cmd
        .split_whitespace()
        .map(|w| w.trim_end_matches([',', ';']).to_string())
        .filter(|w| !w.is_empty())
        .collect();
    if tokens.is_empty() {
        return Err(WorldError::parse("What?"));
    }

    let mut qualifier: Option<String> = None;
    if verbs::qualifier(&tokens[0]).is_some() {
        let word = tokens.remove(0);
        // spell-correct "dont"
        qualifier = Some(if word == "dont" { "don't".to_string() } else { word });
    }
    if !tokens.is_empty() && SKIP_WORDS.contains(&tokens[0].as_str()) {
        tokens.remove(0);
    }
    if tokens.is_empty() {
        return Err(WorldError::parse("What?"));
    }

    let names = KnownNames::build(world, actor);

    // Determine the verb: an external (command) verb, a soul verb, an
    // exit used as a verb ("door two"), or a movement verb followed by
    // an exit ("enter gate").
    let first = tokens[0].to_lowercase();
    let mut non_soul = false;
    let mut parsed;
    let mut consumed = 1;
    if external_verbs.contains(&first) {
        parsed = ParseResult::new(first);
        non_soul = true;
    } else if verbs::is_soul_verb(&first) {
        parsed = ParseResult::new(first);
    } else if let Some((exit, name, len)) = names.match_exit_at(&tokens, 0) {
        parsed = ParseResult::new(name);
        parsed.add_target(TargetRef::Exit(exit), None);
        consumed = len;
        non_soul = true;
    } else if verbs::MOVEMENT_VERBS.contains(&first.as_str()) && tokens.len() > 1 {
        if let Some((exit, name, len)) = names.match_exit_at(&tokens, 1) {
            parsed = ParseResult::new(name);
            parsed.add_target(TargetRef::Exit(exit), Some(&first));
            consumed = 1 + len;
            non_soul = true;
        } else {
            return Err(WorldError::UnknownVerb {
                verb: tokens[0].clone(),
                words: tokens[1..].to_vec(),
                qualifier,
            });
        }
    } else {
        return Err(WorldError::UnknownVerb {
            verb: tokens[0].clone(),
            words: tokens[1..].to_vec(),
            qualifier,
        });
    }
    parsed.qualifier = qualifier;

    let message_verb = verbs::verb_def(&parsed.verb)
        .map(|def| def.expects_message())
        .unwrap_or(false);
    let mut message_words: Vec<String> = Vec::new();
    let mut collect_message = false;
    let mut include_flag = true;
    let mut prev_token: Option<String> = Some(parsed.verb.clone());

    let mut i = consumed;
    while i < tokens.len() {
        let raw = tokens[i].clone();
        let word = raw.to_lowercase();
        if collect_message {
            message_words.push(raw);
            i += 1;
            continue;
        }
        if PRONOUNS.contains(&word.as_str()) {
            return Err(WorldError::parse("It is not clear who you mean."));
        } else if word == "me" || word == "myself" {
            if include_flag {
                parsed.add_target(TargetRef::Living(actor), prev_token.as_deref());
            } else {
                parsed.remove_target(TargetRef::Living(actor));
            }
            parsed.args.push(word.clone());
        } else if let Some(phrase) = verbs::body_part(&word) {
            if let Some(existing) = &parsed.bodypart {
                let existing_phrase = verbs::body_part(existing).unwrap_or(existing);
                return Err(WorldError::parse(format!(
                    "You can't do that both {} and {}.",
                    existing_phrase, phrase
                )));
            }
            parsed.bodypart = Some(word.clone());
        } else if word == "everyone" || word == "everybody" || word == "all" {
            if include_flag {
                let others = livings_here_except(world, actor);
                if others.is_empty() {
                    return Err(WorldError::parse("There is nobody here."));
                }
                for other in others {
                    parsed.add_target(TargetRef::Living(other), prev_token.as_deref());
                }
            } else {
                parsed.clear_targets();
            }
            parsed.args.push(word.clone());
        } else if word == "everything" {
            return Err(WorldError::parse(
                "You can't do something to everything around you, be more specific.",
            ));
        } else if word == "except" || word == "but" {
            include_flag = !include_flag;
        } else if adverbs::is_adverb(&word) {
            set_adverb(&mut parsed, &word)?;
        } else if let Some((target, name, len)) = names.match_at(&tokens, i) {
            if include_flag {
                parsed.add_target(target, prev_token.as_deref());
            } else {
                parsed.remove_target(target);
            }
            parsed.args.push(name.clone());
            prev_token = Some(tokens[i + len - 1].clone());
            i += len;
            continue;
        } else if message_verb && message_words.is_empty() && quoted_message.is_none() {
            collect_message = true;
            message_words.push(raw.clone());
        } else if SKIP_WORDS.contains(&word.as_str()) {
            // connective, ignore
        } else if non_soul {
            parsed.args.push(raw.clone());
            parsed.unrecognized.push(raw.clone());
        } else {
            handle_unknown_word(&mut parsed, &names, &word)?;
        }
        prev_token = Some(raw);
        i += 1;
    }

    parsed.message = match quoted_message {
        Some(message) => message,
        None => message_words.join(" "),
    };

    // Canonical remainder: reparsing it gives an equivalent parse.
    let mut unparsed_tokens: Vec<String> = Vec::new();
    if let Some(q) = &parsed.qualifier {
        unparsed_tokens.push(q.clone());
    }
    unparsed_tokens.extend(tokens.iter().cloned());
    let mut unparsed = unparsed_tokens.join(" ");
    if !parsed.message.is_empty() && !message_words_contains(&tokens, &parsed.message) {
        unparsed.push_str(&format!(" '{}'", parsed.message));
    }
    parsed.unparsed = unparsed;

    if non_soul {
        Ok(ParseOutcome::NonSoul(parsed))
    } else {
        Ok(ParseOutcome::Soul(parsed))
    }
}

fn message_words_contains(tokens: &[String], message: &str) -> bool {
    let joined = tokens.join(" ");
    !message.is_empty() && joined.contains(message)
}

fn livings_here_except(world: &World, actor: LivingId) -> Vec<LivingId> {
    let Some(living) = world.living(actor) else {
        return Vec::new();
    };
    let Some(location) = world.location(living.location()) else {
        return Vec::new();
    };
    location
        .livings()
        .iter()
        .filter(|id| **id != actor)
        .copied()
        .collect()
}

fn set_adverb(parsed: &mut ParseResult, adverb: &str) -> Result<(), WorldError> {
    if let Some(existing) = &parsed.adverb {
        return Err(WorldError::parse(format!(
            "You can't do that both {} and {}.",
            existing, adverb
        )));
    }
    parsed.adverb = Some(adverb.to_string());
    Ok(())
}

fn handle_unknown_word(
    parsed: &mut ParseResult,
    names: &KnownNames,
    word: &str,
) -> Result<(), WorldError> {
    // could it be the start of a name?
    if parsed.who_order.is_empty() {
        if let Some(name) = names.any_name_with_prefix(word) {
            return Err(WorldError::parse(format!("Did you mean {}?", name)));
        }
    }
    // could it be an adverb prefix?
    let candidates = adverbs::adverb_by_prefix(word, adverbs::MAX_PREFIX_RESULTS);
    match candidates.len() {
        1 => return set_adverb(parsed, candidates[0]),
        n if n > 1 => {
            return Err(WorldError::parse(format!(
                "What adverb did you mean: {}?",
                lang::join(candidates.iter().copied(), "or")
            )))
        }
        _ => {}
    }
    if verbs::is_soul_verb(word) || verbs::qualifier(word).is_some() || verbs::body_part(word).is_some()
    {
        return Err(WorldError::parse(format!(
            "The word {} makes no sense at that location.",
            word
        )));
    }
    Err(WorldError::parse(format!(
        "It's not clear what you mean by {}.",
        word
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Containment, Exit, ExitTarget, Item, Living, Location};
    use crate::value_objects::Gender;
    use crate::LocationId;

    struct Fixture {
        world: World,
        room: LocationId,
        julie: LivingId,
    }

    fn fixture() -> Fixture {
        let mut world = World::new();
        let room = world.add_location(Location::new("somewhere", "A room."));
        let julie = world
            .add_living(
                Living::new("julie", Gender::Female, "human")
                    .unwrap()
                    .with_title("Julie")
                    .as_player(),
                room,
            )
            .unwrap();
        Fixture { world, room, julie }
    }

    fn soul_parse(fx: &Fixture, cmd: &str) -> ParseResult {
        match parse(&fx.world, fx.julie, cmd, &HashSet::new()).unwrap() {
            ParseOutcome::Soul(parsed) => parsed,
            ParseOutcome::NonSoul(parsed) => panic!("expected soul parse, got {:?}", parsed),
        }
    }

    fn parse_err(fx: &Fixture, cmd: &str) -> WorldError {
        parse(&fx.world, fx.julie, cmd, &HashSet::new()).unwrap_err()
    }

    #[test]
    fn empty_and_fragmentary_input() {
        let fx = fixture();
        assert_eq!(parse_err(&fx, ""), WorldError::parse("What?"));
        assert_eq!(parse_err(&fx, "in"), WorldError::parse("What?"));
        assert_eq!(parse_err(&fx, "fail"), WorldError::parse("What?"));
        assert_eq!(parse_err(&fx, "fail in"), WorldError::parse("What?"));
        // a qualifier after a skip word is no longer a qualifier
        match parse_err(&fx, "in fail") {
            WorldError::UnknownVerb { verb, .. } => assert_eq!(verb, "fail"),
            other => panic!("unexpected {:?}", other),
        }
        let parsed = soul_parse(&fx, "in sit");
        assert_eq!(parsed.verb, "sit");
        assert!(parsed.qualifier.is_none());
        let parsed = soul_parse(&fx, "fail in sit");
        assert_eq!(parsed.qualifier.as_deref(), Some("fail"));
        assert_eq!(parsed.verb, "sit");
    }

    #[test]
    fn unknown_verbs_carry_their_words_and_qualifier() {
        let fx = fixture();
        match parse_err(&fx, "fail _unknown_verb_ herp derp") {
            WorldError::UnknownVerb {
                verb,
                words,
                qualifier,
            } => {
                assert_eq!(verb, "_unknown_verb_");
                assert_eq!(words, vec!["herp", "derp"]);
                assert_eq!(qualifier.as_deref(), Some("fail"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn dont_is_spell_corrected() {
        let fx = fixture();
        let parsed = soul_parse(&fx, "dont scream");
        assert_eq!(parsed.qualifier.as_deref(), Some("don't"));
        assert_eq!(parsed.verb, "scream");
    }

    #[test]
    fn lone_pronouns_are_ambiguous() {
        let fx = fixture();
        assert_eq!(
            parse_err(&fx, "smile at him"),
            WorldError::parse("It is not clear who you mean.")
        );
    }

    #[test]
    fn external_verbs_take_precedence_and_collect_args() {
        let mut fx = fixture();
        fx.world
            .add_living(
                Living::new("max", Gender::Male, "human").unwrap(),
                fx.room,
            )
            .unwrap();
        let external: HashSet<String> = ["sit".to_string()].into();
        match parse(&fx.world, fx.julie, "sit door1 zen", &external).unwrap() {
            ParseOutcome::NonSoul(parsed) => {
                assert_eq!(parsed.verb, "sit");
                assert_eq!(parsed.args, vec!["door1", "zen"]);
                assert_eq!(parsed.unrecognized, vec!["door1", "zen"]);
            }
            other => panic!("unexpected {:?}", other),
        }
        // the same input without the external verb is a parse error
        assert_eq!(
            parse_err(&fx, "sit door1"),
            WorldError::parse("It's not clear what you mean by door1.")
        );
        // an external verb repeated is an arg, not an adverb lookup
        let external: HashSet<String> = ["who".to_string()].into();
        match parse(&fx.world, fx.julie, "who who", &external).unwrap() {
            ParseOutcome::NonSoul(parsed) => {
                assert_eq!(parsed.verb, "who");
                assert_eq!(parsed.args, vec!["who"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn targets_keep_order_previous_word_and_duplicates() {
        let mut fx = fixture();
        let cat = fx
            .world
            .add_living(
                Living::new("cat", Gender::Neuter, "cat")
                    .unwrap()
                    .with_title("the hairy cat"),
                fx.room,
            )
            .unwrap();
        let kate = fx
            .world
            .add_living(
                Living::new("kate", Gender::Female, "human")
                    .unwrap()
                    .with_title("Kate"),
                fx.room,
            )
            .unwrap();
        let parsed = soul_parse(&fx, "smile at cat and kate and myself");
        assert_eq!(parsed.args, vec!["cat", "kate", "myself"]);
        assert_eq!(
            parsed.who_order,
            vec![
                TargetRef::Living(cat),
                TargetRef::Living(kate),
                TargetRef::Living(fx.julie)
            ]
        );
        let cat_info = &parsed.who_info[&TargetRef::Living(cat)];
        assert_eq!(cat_info.sequence, 0);
        assert_eq!(cat_info.previous_word.as_deref(), Some("at"));
        let kate_info = &parsed.who_info[&TargetRef::Living(kate)];
        assert_eq!(kate_info.sequence, 1);
        assert_eq!(kate_info.previous_word.as_deref(), Some("and"));
        // multiple occurrences are preserved in order
        let parsed = soul_parse(&fx, "smile at kate, cat and cat");
        assert_eq!(parsed.args, vec!["kate", "cat", "cat"]);
        assert_eq!(
            parsed.who_order,
            vec![
                TargetRef::Living(kate),
                TargetRef::Living(cat),
                TargetRef::Living(cat)
            ]
        );
    }

    #[test]
    fn all_targets_the_other_livings_but_never_the_actor() {
        let mut fx = fixture();
        let max = fx
            .world
            .add_living(Living::new("max", Gender::Male, "human").unwrap(), fx.room)
            .unwrap();
        let parsed = soul_parse(&fx, "grin at all");
        assert_eq!(parsed.who_order, vec![TargetRef::Living(max)]);
        let parsed = soul_parse(&fx, "grin at all and me");
        assert_eq!(
            parsed.who_order,
            vec![TargetRef::Living(max), TargetRef::Living(fx.julie)]
        );
    }

    #[test]
    fn all_alone_in_the_room_is_an_error() {
        let fx = fixture();
        assert_eq!(
            parse_err(&fx, "smile at all"),
            WorldError::parse("There is nobody here.")
        );
        assert_eq!(
            parse_err(&fx, "smile at everything"),
            WorldError::parse("You can't do something to everything around you, be more specific.")
        );
    }

    #[test]
    fn except_inverts_the_target_set() {
        let mut fx = fixture();
        let max = fx
            .world
            .add_living(Living::new("max", Gender::Male, "human").unwrap(), fx.room)
            .unwrap();
        let kate = fx
            .world
            .add_living(Living::new("kate", Gender::Female, "human").unwrap(), fx.room)
            .unwrap();
        let parsed = soul_parse(&fx, "smile at everyone except max");
        assert_eq!(parsed.who_order, vec![TargetRef::Living(kate)]);
        let _ = max;
    }

    #[test]
    fn bodyparts_and_adverbs_with_duplicate_errors() {
        let mut fx = fixture();
        fx.world
            .add_living(Living::new("max", Gender::Male, "human").unwrap(), fx.room)
            .unwrap();
        let parsed = soul_parse(&fx, "fail grin sickly at everyone head");
        assert_eq!(parsed.qualifier.as_deref(), Some("fail"));
        assert_eq!(parsed.adverb.as_deref(), Some("sickly"));
        assert_eq!(parsed.bodypart.as_deref(), Some("head"));
        assert_eq!(
            parse_err(&fx, "kick max side knee"),
            WorldError::parse("You can't do that both in the side and on the knee.")
        );
        assert_eq!(
            parse_err(&fx, "cough sickly and noisily"),
            WorldError::parse("You can't do that both sickly and noisily.")
        );
    }

    #[test]
    fn adverb_prefixes_resolve_or_list_candidates() {
        let fx = fixture();
        let parsed = soul_parse(&fx, "cough sic");
        assert_eq!(parsed.adverb.as_deref(), Some("sickly"));
        assert_eq!(
            parse_err(&fx, "cough si"),
            WorldError::parse(
                "What adverb did you mean: sickly, sideways, signally, significantly, or silently?"
            )
        );
        assert_eq!(
            parse_err(&fx, "cough hubbabubba"),
            WorldError::parse("It's not clear what you mean by hubbabubba.")
        );
    }

    #[test]
    fn name_prefixes_are_suggested() {
        let mut fx = fixture();
        fx.world
            .add_living(
                Living::new("brown bird", Gender::Female, "bird").unwrap(),
                fx.room,
            )
            .unwrap();
        assert_eq!(
            parse_err(&fx, "hug bird"),
            WorldError::parse("It's not clear what you mean by bird.")
        );
        assert_eq!(
            parse_err(&fx, "hug brown"),
            WorldError::parse("Did you mean brown bird?")
        );
    }

    #[test]
    fn multiword_names_and_unique_adverb_prefix_together() {
        let mut fx = fixture();
        let bird = fx
            .world
            .add_living(
                Living::new("brown bird", Gender::Female, "bird").unwrap(),
                fx.room,
            )
            .unwrap();
        let parsed = soul_parse(&fx, "hug brown bird affection");
        assert_eq!(parsed.verb, "hug");
        assert_eq!(parsed.adverb.as_deref(), Some("affectionately"));
        assert_eq!(parsed.who_order, vec![TargetRef::Living(bird)]);
    }

    #[test]
    fn quoted_messages_are_extracted_with_either_quote_kind() {
        let mut fx = fixture();
        fx.world
            .add_living(Living::new("max", Gender::Male, "human").unwrap(), fx.room)
            .unwrap();
        let parsed = soul_parse(&fx, "whisper \"hello there\"");
        assert_eq!(parsed.message, "hello there");
        let parsed = soul_parse(&fx, "yell 'why' angrily at max");
        assert_eq!(parsed.verb, "yell");
        assert_eq!(parsed.message, "why");
        assert_eq!(parsed.adverb.as_deref(), Some("angrily"));
        assert_eq!(parsed.who_order.len(), 1);
    }

    #[test]
    fn unquoted_trailing_words_become_the_message_for_message_verbs() {
        let fx = fixture();
        let parsed = soul_parse(&fx, "yell why me worry");
        assert_eq!(parsed.message, "why me worry");
    }

    #[test]
    fn exits_parse_as_verbs_and_as_movement_targets() {
        let mut fx = fixture();
        let gate = fx
            .world
            .add_exit(
                fx.room,
                Exit::new("gate", "The gate.", ExitTarget::Unbound("somewhere".into())),
            )
            .unwrap();
        let door1 = fx
            .world
            .add_exit(
                fx.room,
                Exit::new(
                    "door one",
                    "Door number one.",
                    ExitTarget::Unbound("somewhere".into()),
                ),
            )
            .unwrap();
        let door2 = fx
            .world
            .add_exit(
                fx.room,
                Exit::new(
                    "door two",
                    "Door number two.",
                    ExitTarget::Unbound("somewhere".into()),
                ),
            )
            .unwrap();
        // the exit name itself acts as the verb
        match parse(&fx.world, fx.julie, "door one", &HashSet::new()).unwrap() {
            ParseOutcome::NonSoul(parsed) => {
                assert_eq!(parsed.verb, "door one");
                assert_eq!(parsed.who_order, vec![TargetRef::Exit(door1)]);
            }
            other => panic!("unexpected {:?}", other),
        }
        // a movement verb consumes the exit
        match parse(&fx.world, fx.julie, "enter door two", &HashSet::new()).unwrap() {
            ParseOutcome::NonSoul(parsed) => {
                assert_eq!(parsed.verb, "door two");
                assert_eq!(parsed.who_order, vec![TargetRef::Exit(door2)]);
            }
            other => panic!("unexpected {:?}", other),
        }
        // an external movement verb keeps its own name and resolves the
        // exit as a target arg
        let external: HashSet<String> = ["enter".to_string()].into();
        match parse(&fx.world, fx.julie, "enter gate", &external).unwrap() {
            ParseOutcome::NonSoul(parsed) => {
                assert_eq!(parsed.verb, "enter");
                assert_eq!(parsed.args, vec!["gate"]);
                assert_eq!(parsed.who_order, vec![TargetRef::Exit(gate)]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn items_in_room_and_inventory_are_targets() {
        let mut fx = fixture();
        let paper = fx
            .world
            .add_item(Item::new("newspaper"), Containment::Location(fx.room))
            .unwrap();
        let parsed = soul_parse(&fx, "point at newspaper");
        assert_eq!(parsed.who_order, vec![TargetRef::Item(paper)]);
    }

    #[test]
    fn reparsing_the_unparsed_field_is_equivalent() {
        let mut fx = fixture();
        fx.world
            .add_living(Living::new("max", Gender::Male, "human").unwrap(), fx.room)
            .unwrap();
        let parsed = soul_parse(&fx, "fail yell 'why' angrily at max");
        let reparsed = soul_parse(&fx, &parsed.unparsed);
        assert_eq!(reparsed.verb, parsed.verb);
        assert_eq!(reparsed.qualifier, parsed.qualifier);
        assert_eq!(reparsed.adverb, parsed.adverb);
        assert_eq!(reparsed.message, parsed.message);
        assert_eq!(reparsed.who_order, parsed.who_order);
    }
}
