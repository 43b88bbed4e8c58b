//! The fixed adverb vocabulary.
//!
//! The list is sorted so that prefix lookup can binary search it; the
//! parser uses `adverb_by_prefix` to silently expand an unambiguous
//! prefix ("sic" -> "sickly") and to report the candidates when a
//! prefix is ambiguous.

/// Sorted list of all recognised adverbs.
pub const ADVERBS: &[&str] = &[
    "absently", "absentmindedly", "absurdly", "accusingly",
    "affectionately", "amazedly", "angrily", "anxiously",
    "apologetically", "appraisingly", "appreciatively", "approvingly",
    "arrogantly", "awkwardly", "badly", "barely",
    "bashfully", "beautifully", "begrudgingly", "bitterly",
    "blankly", "blindly", "boldly", "bravely",
    "briefly", "brightly", "briskly", "brutally",
    "calmly", "carefully", "carelessly", "casually",
    "cautiously", "cheerfully", "childishly", "clumsily",
    "coldly", "completely", "confusedly", "coyly",
    "crazily", "cruelly", "curiously", "cutely",
    "dangerously", "darkly", "dearly", "deeply",
    "defiantly", "deliberately", "delightedly", "desperately",
    "devilishly", "disappointedly", "disdainfully", "dismally",
    "dizzily", "doubtfully", "dreamily", "dubiously",
    "eagerly", "earnestly", "easily", "elegantly",
    "eloquently", "emotionally", "endlessly", "energetically",
    "enthusiastically", "enviously", "evilly", "exactly",
    "excitedly", "expectantly", "fanatically", "fearfully",
    "fiercely", "firmly", "fondly", "foolishly",
    "formally", "frantically", "freely", "frightenedly",
    "fully", "furiously", "generously", "gently",
    "gleefully", "gloomily", "gracefully", "gradually",
    "gratefully", "gravely", "greedily", "grimly",
    "grumpily", "guiltily", "happily", "hard",
    "harshly", "hastily", "heartily", "heavily",
    "helpfully", "helplessly", "hesitantly", "honestly",
    "hopefully", "hopelessly", "humbly", "hungrily",
    "hysterically", "icily", "immediately", "impatiently",
    "impishly", "incoherently", "incredulously", "indignantly",
    "innocently", "inquisitively", "insanely", "instantly",
    "intensely", "intently", "interestedly", "ironically",
    "irritably", "jealously", "jeeringly", "jokingly",
    "jovially", "joyfully", "kindly", "knowingly",
    "lazily", "lightly", "longingly", "loudly",
    "lovingly", "loyally", "madly", "meekly",
    "melodramatically", "menacingly", "merrily", "mightily",
    "mischievously", "miserably", "mockingly", "modestly",
    "mournfully", "mysteriously", "nastily", "neatly",
    "nervously", "nicely", "noisily", "nonchalantly",
    "obediently", "obligingly", "oddly", "ominously",
    "openly", "outrageously", "painfully", "passionately",
    "pathetically", "patiently", "peacefully", "perfectly",
    "personally", "physically", "playfully", "politely",
    "proudly", "quickly", "quietly", "quizzically",
    "rapidly", "really", "reassuringly", "recklessly",
    "regretfully", "reluctantly", "remorsefully", "repeatedly",
    "respectfully", "romantically", "rudely", "ruthlessly",
    "sadly", "sarcastically", "seductively", "seriously",
    "shamelessly", "sheepishly", "shyly", "sickly",
    "sideways", "signally", "significantly", "silently",
    "sleepily", "slowly", "slyly", "smugly",
    "softly", "solemnly", "stonily", "stubbornly",
    "stupidly", "suavely", "suddenly", "suggestively",
    "sullenly", "suspiciously", "sweetly", "tearfully",
    "tenderly", "tensely", "terribly", "thankfully",
    "thoughtfully", "tightly", "timidly", "tiredly",
    "tolerantly", "totally", "tremblingly", "triumphantly",
    "truly", "trustingly", "understandingly", "uneasily",
    "urgently", "vehemently", "viciously", "victoriously",
    "vigorously", "warily", "warmly", "weakly",
    "wearily", "weirdly", "wickedly", "wildly",
    "wisely", "wistfully", "wonderingly", "worriedly",
    "wryly", "zealously",
];

/// Default maximum number of adverbs returned by a prefix lookup.
pub const MAX_PREFIX_RESULTS: usize = 5;

/// Is the word exactly one of the recognised adverbs?
pub fn is_adverb(word: &str) -> bool {
    ADVERBS.binary_search(&word).is_ok()
}

/// Return the adverbs starting with the given prefix, at most `max`.
///
/// Binary search over the sorted list; the result is a contiguous,
/// lexicographically ordered slice.
pub fn adverb_by_prefix(prefix: &str, max: usize) -> &'static [&'static str] {
    let start = ADVERBS.partition_point(|adv| *adv < prefix);
    let mut end = start;
    while end < ADVERBS.len() && end - start < max && ADVERBS[end].starts_with(prefix) {
        end += 1;
    }
    &ADVERBS[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_is_sorted_and_unique() {
        for pair in ADVERBS.windows(2) {
            assert!(pair[0] < pair[1], "{} >= {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn unique_prefix_resolves_to_one_adverb() {
        assert_eq!(adverb_by_prefix("sic", MAX_PREFIX_RESULTS), &["sickly"]);
        assert_eq!(adverb_by_prefix("conf", MAX_PREFIX_RESULTS), &["confusedly"]);
    }

    #[test]
    fn ambiguous_prefix_lists_all_candidates() {
        assert_eq!(
            adverb_by_prefix("si", MAX_PREFIX_RESULTS),
            &["sickly", "sideways", "signally", "significantly", "silently"]
        );
    }

    #[test]
    fn prefix_results_are_contiguous_and_ordered() {
        let result = adverb_by_prefix("s", 50);
        for pair in result.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(result.iter().all(|adv| adv.starts_with('s')));
    }

    #[test]
    fn unknown_prefix_yields_nothing() {
        assert!(adverb_by_prefix("zzz", MAX_PREFIX_RESULTS).is_empty());
        assert!(!is_adverb("zzzically"));
        assert!(is_adverb("angrily"));
    }
}
