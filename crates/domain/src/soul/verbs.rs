//! The soul's emote verb table.
//!
//! Each verb is a tagged record: a verb type selecting how the
//! templates are combined, optional defaults (adverb, message, body
//! location), the template strings themselves, and the preposition
//! used when a target is present.
//!
//! Template escapes (always preceded by a space in the template text):
//! AT, HOW, IS, MSG, MY, POSS, SUBJ, WHAT, WHERE, WHO, YOUR.
//! A `$` trailing a verb stem is dropped for the actor viewpoint and
//! becomes "s" for the observer/target viewpoints.
//! If a default message starts with a single quote it is rendered
//! without quotes around it.

/// How a verb's templates are combined into the final action strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbType {
    /// adds HOW+AT   (you smile happily at Fritz)
    Defa,
    /// adds WHO+HOW   (you ignore Fritz completely)
    Prev,
    /// adds WHO+HOW+WHERE  (you stroke Anna softly on the shoulder)
    Phys,
    /// just adds HOW, won't show a target  (you sweat profusely)
    Shrt,
    /// alternate text when a target is present  (you shiver with fear / you fear Fritz)
    Pers,
    /// the template itself carries all escapes  (you snap your fingers at Fritz)
    Simp,
    /// separate actor/observer spellings  (you fall down / Player falls down)
    Deux,
    /// like Deux, plus two more texts used when there is a target
    Quad,
}

#[derive(Debug, Clone, Copy)]
pub struct VerbDef {
    pub vtype: VerbType,
    /// Default adverb when the player didn't give one.
    pub adverb: Option<&'static str>,
    /// Default message for message-carrying verbs.
    pub message: Option<&'static str>,
    /// Default WHERE phrase (already in full form, "on the head").
    pub where_default: Option<&'static str>,
    /// Extra text spliced in right after the verb stem (Prev/Phys/Shrt).
    pub extra: &'static str,
    /// Template strings; count depends on the verb type.
    pub templates: &'static [&'static str],
    /// Preposition put before WHO when a target is present; None means
    /// the template's AT slot is simply dropped.
    pub prep: Option<&'static str>,
}

impl VerbDef {
    const fn new(vtype: VerbType) -> Self {
        Self {
            vtype,
            adverb: None,
            message: None,
            where_default: None,
            extra: "",
            templates: &[],
            prep: None,
        }
    }

    const fn adverb(mut self, adverb: &'static str) -> Self {
        self.adverb = Some(adverb);
        self
    }

    const fn msg(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    const fn place(mut self, where_default: &'static str) -> Self {
        self.where_default = Some(where_default);
        self
    }

    /// Does this verb expect a free-text message (MSG or WHAT slot)?
    pub fn expects_message(&self) -> bool {
        self.templates
            .iter()
            .any(|t| t.contains("\nMSG") || t.contains("\nWHAT"))
    }
}

const fn defa(prep: &'static str) -> VerbDef {
    let mut def = VerbDef::new(VerbType::Defa);
    def.prep = Some(prep);
    def
}

const fn prev(extra: &'static str) -> VerbDef {
    let mut def = VerbDef::new(VerbType::Prev);
    def.extra = extra;
    def
}

const fn phys(extra: &'static str) -> VerbDef {
    let mut def = VerbDef::new(VerbType::Phys);
    def.extra = extra;
    def
}

const fn shrt(extra: &'static str) -> VerbDef {
    let mut def = VerbDef::new(VerbType::Shrt);
    def.extra = extra;
    def
}

const fn pers(templates: &'static [&'static str]) -> VerbDef {
    let mut def = VerbDef::new(VerbType::Pers);
    def.templates = templates;
    def
}

const fn simp(templates: &'static [&'static str]) -> VerbDef {
    let mut def = VerbDef::new(VerbType::Simp);
    def.templates = templates;
    def
}

const fn simp_at(templates: &'static [&'static str], prep: &'static str) -> VerbDef {
    let mut def = VerbDef::new(VerbType::Simp);
    def.templates = templates;
    def.prep = Some(prep);
    def
}

const fn deux(templates: &'static [&'static str]) -> VerbDef {
    let mut def = VerbDef::new(VerbType::Deux);
    def.templates = templates;
    def
}

const fn quad(templates: &'static [&'static str]) -> VerbDef {
    let mut def = VerbDef::new(VerbType::Quad);
    def.templates = templates;
    def
}

/// The full emote vocabulary. Verbs that exist as real commands (say,
/// tell, emote, search, wait in command-paced stories) are bound as
/// commands instead and deliberately absent here.
pub static VERBS: &[(&str, VerbDef)] = &[
    ("flex", deux(&["flex \nYOUR muscles \nHOW", "flexes \nYOUR muscles \nHOW"])),
    ("snort", simp_at(&["snort$ \nHOW \nAT"], "at")),
    ("pant", simp_at(&["pant$ \nHOW \nAT"], "at").adverb("heavily")),
    ("hmm", simp_at(&["hmm$ \nHOW \nAT"], "at")),
    ("ack", simp_at(&["ack$ \nHOW \nAT"], "at")),
    ("guffaw", simp_at(&["guffaw$ \nHOW \nAT"], "at")),
    ("raise", simp_at(&[" \nHOW raise$ an eyebrow \nAT"], "at")),
    ("snap", simp_at(&["snap$ \nYOUR fingers \nAT"], "at")),
    ("lust", defa("for")),
    ("burp", defa("at").adverb("rudely")),
    ("bump", defa("into").adverb("clumsily")),
    ("wink", defa("at").adverb("suggestively")),
    ("smile", defa("at").adverb("happily")),
    ("yawn", defa("at")),
    ("swoon", defa("at").adverb("romantically")),
    ("sneer", defa("at").adverb("disdainfully")),
    ("talk", simp_at(&["want$ to talk \nAT \nHOW"], "to")),
    ("beam", defa("at")),
    ("point", defa("at")),
    ("grin", defa("at").adverb("evilly")),
    ("laugh", defa("at")),
    ("nod", defa("at").adverb("solemnly")),
    ("wave", defa("at").adverb("happily")),
    ("cackle", defa("at").adverb("gleefully")),
    ("chuckle", defa("at")),
    ("bow", defa("to")),
    ("surrender", defa("to")),
    ("sit", defa("in front of").adverb("down")),
    ("stand", defa("in front of").adverb("up")),
    ("capitulate", defa("to").adverb("unconditionally")),
    ("glare", defa("at").adverb("stonily")),
    ("giggle", defa("at").adverb("merrily")),
    ("groan", defa("at")),
    ("grunt", defa("at")),
    ("growl", defa("at")),
    ("breathe", defa("at").adverb("heavily")),
    ("argh", defa("at")),
    ("scowl", defa("at").adverb("darkly")),
    ("snarl", defa("at")),
    ("recoil", defa("from").adverb("with fear")),
    ("moan", defa("at")),
    ("howl", defa("at").adverb("in pain")),
    ("puke", defa("on")),
    ("drool", defa("on")),
    ("sneeze", defa("at").adverb("loudly")),
    ("spit", defa("on")),
    ("stare", defa("at")),
    ("whistle", defa("at").adverb("appreciatively")),
    ("applaud", defa("")),
    ("leer", defa("at")),
    ("agree", defa("with")),
    ("believe", pers(&["believe$ in \nMYself \nHOW", "believe$ \nWHO \nHOW"])),
    ("understand", pers(&["understand$ \nHOW", "understand$ \nWHO \nHOW"])),
    ("disagree", defa("with")),
    ("fart", defa("at")),
    ("dance", defa("with")),
    ("spin", defa("around").adverb("dizzily")),
    ("flirt", defa("with")),
    ("meow", defa("at")),
    ("bark", defa("at")),
    ("slide", simp(&["slip$ and slide$ \nHOW"])),
    ("ogle", prev("")),
    ("eye", prev("").adverb("suspiciously")),
    ("pet", simp(&["pet$ \nWHO \nHOW \nWHERE"])),
    ("barf", defa("on")),
    ("listen", defa("to")),
    ("hear", simp_at(&["listen$ \nAT \nHOW"], "to")),
    ("purr", defa("at")),
    ("curtsy", defa("before")),
    ("puzzle", simp_at(&["look$ \nHOW puzzled \nAT"], "at")),
    ("grovel", defa("before")),
    ("tongue", simp_at(&["stick$ \nYOUR tongue out \nHOW \nAT"], "at")),
    ("swing", simp_at(&["swing$ \nYOUR arms \nHOW \nAT"], "at").adverb("wildly")),
    ("apologize", defa("to")),
    ("sorry", simp_at(&["apologize$ \nAT \nHOW"], "to")),
    ("complain", defa("about")),
    ("rotate", pers(&["rotate$ \nHOW", "rotate$ \nWHO \nHOW"])),
    ("excuse", pers(&[" \nHOW excuse$ \nMYself", " \nHOW excuse$ \nMYself to \nWHO"])),
    ("beg", pers(&["beg$ \nHOW", "beg$ \nWHO for mercy \nHOW"])),
    ("fear", pers(&["shiver$ \nHOW with fear", "fear$ \nWHO \nHOW"])),
    ("headshake", simp_at(&["shake$ \nYOUR head \nAT \nHOW"], "at")),
    ("shake", simp_at(&["shake$ \nAT \nHOW"], "").adverb("like a bowlful of jello")),
    ("jiggle", simp_at(&["jiggle$ \nAT \nHOW"], "").adverb("like a bowlful of jello")),
    ("stink", pers(&["smell$ \nYOUR armpits. Eeeww!", "smell$ \nPOSS armpits. Eeeww!"])),
    ("grimace", simp_at(&[" \nHOW make$ an awful face \nAT"], "at")),
    ("stomp", pers(&["stomp$ \nYOUR foot \nHOW", "stomp$ on \nPOSS foot \nHOW"])),
    ("snigger", defa("at").adverb("jeeringly")),
    ("watch", quad(&[
        "watch the surroundings \nHOW",
        "watches the surroundings \nHOW",
        "watch \nWHO \nHOW",
        "watches \nWHO \nHOW",
    ]).adverb("carefully")),
    ("scratch", quad(&[
        "scratch \nMYself \nHOW \nWHERE",
        "scratches \nMYself \nHOW \nWHERE",
        "scratch \nWHO \nHOW \nWHERE",
        "scratches \nWHO \nHOW \nWHERE",
    ]).place("on the head")),
    ("tap", pers(&["tap$ \nYOUR foot \nHOW", "tap$ \nWHO \nWHERE"])
        .adverb("impatiently")
        .place("on the shoulder")),
    ("wobble", simp_at(&["wobble$ \nAT \nHOW"], "")),
    ("move", simp_at(&["move$ out of the way \nHOW"], "").adverb("thoughtfully")),
    ("yodel", simp_at(&["yodel$ a merry tune \nHOW"], "")),
    ("spray", simp_at(&["spray$ \nHOW \nAT"], "all over")),
    ("spill", simp_at(&["spill$ \nYOUR drink \nHOW \nAT"], "all over")),
    ("melt", pers(&["melt$ from the heat", "melt$ \nHOW \nWHO"]).adverb("in front of")),
    ("hello", pers(&["greet$ everyone \nHOW", "greet$ \nWHO \nHOW"])),
    ("hi", pers(&["greet$ everyone \nHOW", "greet$ \nWHO \nHOW"])),
    ("wait", simp_at(&["wait$ \nHOW"], "")),
    ("grease", simp(&["grease$ \nWHO \nHOW"]).adverb("like a shiatsu")),
    ("oil", simp(&["oil$ \nWHO \nHOW"]).adverb("like a shiatsu")),
    ("sniff", pers(&["sniff$. What's that smell?", "sniff$ \nWHO. What's that smell?"])),
    ("smell", pers(&["sniff$. What's that smell?", "sniff$ \nWHO. What's that smell?"])),
    ("smoke", pers(&[
        "smoke$ a cigar, and blow$ out the smoke.",
        "smoke$ a cigar, and blow$ the smoke at \nWHO.",
    ])),
    // Message-based verbs
    ("curse", pers(&["curse$ \nWHAT \nHOW", "curse$ \nWHO \nHOW"])),
    ("swear", simp_at(&["swear$ \nWHAT \nAT \nHOW"], "before")),
    ("criticize", pers(&["criticize$ \nWHAT \nHOW", "criticize$ \nWHO \nHOW"])),
    ("lie", pers(&["lie$ \nMSG \nHOW", "lie$ to \nWHO \nHOW"])),
    ("mutter", pers(&["mutter$ \nMSG \nHOW", "mutter$ \nMSG to \nWHO \nHOW"]).msg("ehh...")),
    ("babble", simp_at(&["babble$ \nMSG \nHOW \nAT"], "to")
        .adverb("incoherently")
        .msg("'something")),
    ("chant", simp_at(&[" \nHOW chant$: \nWHAT"], "").msg("Hare Krishna Krishna Hare Hare")),
    ("sing", simp_at(&["sing$ \nWHAT \nHOW \nAT"], "to")),
    ("hiss", quad(&[
        "hiss \nMSG \nHOW",
        "hisses \nMSG \nHOW",
        "hiss \nMSG to \nWHO \nHOW",
        "hisses \nMSG to \nWHO \nHOW",
    ])),
    ("answer", simp_at(&[" \nHOW answer$ \nAT: \nWHAT"], "").msg("ehh...")),
    ("reply", quad(&[
        " \nHOW reply: \nWHAT",
        " \nHOW replies: \nWHAT",
        " \nHOW reply to \nWHO: \nWHAT",
        " \nHOW replies to \nWHO: \nWHAT",
    ]).msg("ehh...")),
    ("exclaim", simp_at(&[" \nHOW exclaim$ \nAT: \nWHAT!"], "").msg("no way")),
    ("quote", simp_at(&[" \nHOW quote$ \nAT \nMSG"], "to")),
    ("ask", simp_at(&[" \nHOW ask$ \nAT: \nWHAT?"], "").msg("ehh...")),
    ("request", simp_at(&[" \nHOW request$ \nAT \nWHAT"], "").msg("a moment")),
    ("consult", simp_at(&[" \nHOW consult$ \nAT \nWHAT"], "")),
    ("mumble", simp_at(&["mumble$ \nMSG \nHOW \nAT"], "to")),
    ("murmur", simp_at(&["murmur$ \nMSG \nHOW \nAT"], "to")),
    ("scream", simp_at(&["scream$ \nMSG \nHOW \nAT"], "at").adverb("loudly")),
    ("yell", simp_at(&["yell$ \nMSG \nHOW \nAT"], "at").adverb("in a high pitched voice")),
    ("command", simp(&["command$ \nWHO \nHOW to \nWHAT"]).msg("follow orders")),
    ("utter", simp_at(&[" \nHOW utter$ \nMSG \nAT"], "to").msg("ehh...")),
    ("whisper", simp_at(&["whisper$ \nMSG \nHOW \nAT"], "to")),
    // Verbs that require a person
    ("glance", simp(&["glance$ \nHOW at \nWHO"])),
    ("hide", simp(&["hide$ \nHOW behind \nWHO"])),
    ("finger", simp(&["give$ \nWHO the finger"])),
    ("mercy", simp(&["beg$ \nWHO for mercy"])),
    ("jerk", simp_at(&["jerk$ \nWHO \nHOW"], "").adverb("briskly")),
    ("insult", simp(&[" \nHOW spew$ profanities at \nWHO"]).adverb("angrily")),
    ("gripe", prev("to")),
    ("peer", prev("at")),
    ("gaze", prev("at")),
    ("chase", prev("after").adverb("angrily")),
    ("remember", simp_at(&["remember$ \nAT \nHOW"], "")),
    ("surprise", prev("")),
    ("pounce", phys("").adverb("playfully")),
    ("feel", phys("").adverb("softly")),
    ("bite", pers(&[" \nHOW bite$ \nYOUR lip", "bite$ \nWHO \nHOW \nWHERE"])),
    ("lick", simp(&["lick$ \nWHO \nHOW \nWHERE"])),
    ("caper", pers(&["caper$ \nHOW about", "caper$ around \nWHO \nHOW"]).adverb("merrily")),
    ("beep", pers(&[" \nHOW beep$ \nMYself \nWHERE", " \nHOW beep$ \nWHO \nWHERE"])
        .adverb("triumphantly")
        .place("on the nose")),
    ("blink", pers(&["blink$ \nHOW", "blink$ \nHOW at \nWHO"])),
    ("knock", phys("").place("on the head")),
    ("bonk", phys("").place("on the head")),
    ("bop", phys("").place("on the head")),
    ("stroke", phys("").place("on the cheek")),
    ("shove", phys("").adverb("briskly").place("to the side")),
    ("push", phys("").place("to the side")),
    ("pull", simp(&["pull$ at \nWHO"])),
    ("rub", phys("").adverb("gently").place("on the back")),
    ("hold", phys("").place("in \nYOUR arms")),
    ("embrace", phys("").place("in \nYOUR arms")),
    ("handshake", simp_at(&["shake$ hands with \nWHO"], "")),
    ("tickle", prev("")),
    ("worship", prev("")),
    ("admire", prev("")),
    ("mock", prev("")),
    ("tease", prev("")),
    ("taunt", prev("")),
    ("strangle", prev("")),
    ("hate", prev("")),
    ("kill", prev("")),
    ("attack", prev("")),
    ("fight", prev("")),
    ("fondle", prev("")),
    ("nominate", prev("")),
    ("startle", prev("")),
    ("turn", prev("\nYOUR head towards")),
    ("squeeze", prev("").adverb("fondly")),
    ("comfort", prev("")),
    ("nudge", phys("").adverb("suggestively")),
    ("slap", phys("").place("in the face")),
    ("hit", phys("").place("in the face")),
    ("kick", phys("").adverb("hard")),
    ("tackle", simp_at(&["tackle$ \nWHO \nHOW"], "")),
    ("spank", phys("").place("on the butt")),
    ("pat", phys("").place("on the head")),
    ("punch", deux(&["punch \nWHO \nHOW \nWHERE", "punches \nWHO \nHOW \nWHERE"])
        .place("in the eye")),
    ("hug", prev("")),
    ("want", prev("")),
    ("pinch", deux(&["pinch \nWHO \nHOW \nWHERE", "pinches \nWHO \nHOW \nWHERE"])),
    ("kiss", deux(&["kiss \nWHO \nHOW \nWHERE", "kisses \nWHO \nHOW \nWHERE"])),
    ("caress", deux(&["caress \nWHO \nHOW \nWHERE", "caresses \nWHO \nHOW \nWHERE"])
        .place("on the cheek")),
    ("smooch", deux(&["smooch \nWHO \nHOW", "smooches \nWHO \nHOW"])),
    ("envy", deux(&["envy \nWHO \nHOW", "envies \nWHO \nHOW"])),
    ("touch", deux(&["touch \nWHO \nHOW \nWHERE", "touches \nWHO \nHOW \nWHERE"])),
    ("knee", phys("").place("where it hurts")),
    ("love", prev("")),
    ("adore", prev("")),
    ("grope", prev("")),
    ("poke", phys("").place("in the ribs")),
    ("snuggle", prev("")),
    ("kneel", simp_at(&[" \nHOW fall$ on \nYOUR knees \nAT"], "in front of")),
    ("trust", prev("")),
    ("like", prev("")),
    ("greet", prev("")),
    ("welcome", prev("")),
    ("thank", prev("")),
    ("cuddle", prev("")),
    ("salute", prev("")),
    ("french", simp(&["give$ \nWHO a REAL kiss, it seems to last forever"])),
    ("nibble", simp(&["nibble$ \nHOW on \nPOSS ear"])),
    ("ruffle", simp(&["ruffle$ \nPOSS hair \nHOW"])),
    ("ignore", prev("")),
    ("forgive", prev("")),
    ("congratulate", prev("")),
    ("ayt", simp(&["wave$ \nYOUR hand in front of \nPOSS face, \nIS \nSUBJ \nHOW there?"])),
    ("judge", prev("")),
    // Verbs that don't need, nor use persons
    ("roll", simp(&["roll$ \nYOUR eyes \nHOW"]).adverb("to the ceiling")),
    ("boggle", simp(&["boggle$ \nHOW at the concept"])),
    ("cheer", shrt("").adverb("enthusiastically")),
    ("twiddle", simp(&["twiddle$ \nYOUR thumbs \nHOW"])),
    ("wiggle", simp_at(&["wiggle$ \nYOUR bottom \nAT \nHOW"], "at")),
    ("wrinkle", simp_at(&["wrinkle$ \nYOUR nose \nAT \nHOW"], "at")),
    ("thumb", simp(&[" \nHOW suck$ \nYOUR thumb"])),
    ("flip", simp(&["flip$ \nHOW head over heels"])),
    ("cry", deux(&["cry \nHOW", "cries \nHOW"])),
    ("ah", deux(&["go 'ah' \nHOW", "goes 'ah' \nHOW"])),
    ("halt!", deux(&["go 'Halt! Hammerzeit!' \nHOW", "goes 'Halt! Hammerzeit!' \nHOW"])),
    ("stop!", deux(&["go 'Stop! Hammertime!' \nHOW", "goes 'Stop! Hammertime!' \nHOW"])),
    ("clear", simp(&["clear$ \nYOUR throat \nHOW"])),
    ("sob", shrt("")),
    ("lag", shrt("").adverb("helplessly")),
    ("whine", shrt("")),
    ("cringe", simp(&["cringe$ \nHOW"]).adverb("in terror")),
    ("sweat", shrt("")),
    ("gurgle", shrt("")),
    ("grumble", shrt("")),
    ("panic", shrt("")),
    ("pace", simp(&["start$ pacing \nHOW"]).adverb("impatiently")),
    ("pale", simp(&["turn$ white as ashes \nHOW"])),
    ("die", deux(&[" \nHOW fall down and play dead", " \nHOW falls to the ground, dead"])),
    ("sleep", simp(&["yawn$ sleepily"])),
    ("wake", deux(&["are awake", "is awake"])),
    ("awake", deux(&["are awake", "is awake"])),
    ("stumble", shrt("")),
    ("bounce", shrt("").adverb("up and down")),
    ("sulk", shrt("").adverb("in the corner")),
    ("strut", shrt("").adverb("proudly")),
    ("snivel", shrt("").adverb("pathetically")),
    ("snore", shrt("")),
    ("clue", simp(&["need$ a clue \nHOW"])),
    ("stupid", simp(&["look$ \nHOW stupid"])),
    ("bored", simp(&["look$ \nHOW bored"])),
    ("repent", simp(&["repent$ \nYOUR sins"])),
    ("snicker", shrt("")),
    ("smirk", shrt("")),
    ("jump", simp(&["jump$ \nHOW"]).adverb("up and down in aggravation")),
    ("squint", shrt("")),
    ("huff", shrt("")),
    ("puff", shrt("")),
    ("fume", shrt("")),
    ("steam", shrt("")),
    ("choke", shrt("")),
    ("faint", shrt("")),
    ("shrug", shrt("")),
    ("pout", shrt("")),
    ("hiccup", shrt("")),
    ("frown", shrt("")),
    ("pray", simp_at(&["mumble$ a short prayer \nAT"], "to")),
    ("gasp", shrt("").adverb("in astonishment")),
    ("think", shrt("").adverb("carefully")),
    ("ponder", shrt("").adverb("over some problem")),
    ("wonder", defa("at")),
    ("clap", shrt("")),
    ("sigh", shrt("")),
    ("cough", shrt("").adverb("noisily")),
    ("shiver", shrt("").adverb("from the cold")),
    ("tremble", shrt("")),
    ("twitch", deux(&["twitch \nHOW", "twitches \nHOW"])),
    ("bitch", deux(&["bitch \nHOW", "bitches \nHOW"])),
    ("blush", deux(&["blush \nHOW", "blushes \nHOW"])),
    ("stretch", deux(&["stretch \nHOW", "stretches \nHOW"])),
    ("relax", deux(&["relax \nHOW", "relaxes \nHOW"])),
    ("duck", pers(&["duck$ \nHOW out of the way", "duck$ \nHOW out of \nPOSS way"])),
];

/// Look up a verb definition.
pub fn verb_def(verb: &str) -> Option<&'static VerbDef> {
    VERBS
        .iter()
        .find(|(name, _)| *name == verb)
        .map(|(_, def)| def)
}

pub fn is_soul_verb(verb: &str) -> bool {
    verb_def(verb).is_some()
}

/// Emote verbs with an aggressive character; targeted NPCs may react.
pub static AGGRESSIVE_VERBS: &[&str] = &[
    "attack", "barf", "bitch", "bite", "bonk", "bop", "bump", "burp", "caress", "chase", "curse",
    "feel", "fight", "finger", "fondle", "french", "grease", "grimace", "grope", "growl",
    "guffaw", "handshake", "hit", "hold", "hug", "insult", "jerk", "jiggle", "kick", "kill",
    "kiss", "knee", "knock", "lick", "mock", "nibble", "nudge", "oil", "pat", "pet", "pinch",
    "poke", "pounce", "puke", "push", "pull", "punch", "rotate", "rub", "ruffle", "scowl",
    "scratch", "shake", "shove", "slap", "smooch", "sneer", "snigger", "snuggle", "spank",
    "spill", "spit", "spray", "squeeze", "startle", "stomp", "strangle", "stroke", "surprise",
    "swing", "tackle", "tap", "taunt", "tease", "tickle", "tongue", "touch", "wiggle", "wobble",
    "wrinkle",
];

/// Emote verbs that accept inanimate items (and exits) as targets.
pub static NONLIVING_OK_VERBS: &[&str] = &[
    "admire", "adore", "answer", "argh", "ask", "babble", "barf", "bark", "beam", "bite",
    "blink", "bow", "breathe", "bump", "cackle", "caper", "capitulate", "chuckle", "complain",
    "cuddle", "curse", "drool", "embrace", "eye", "fear", "feel", "finger", "fondle", "gaze",
    "giggle", "glare", "glance", "grimace", "grin", "groan", "grope", "growl", "grunt",
    "guffaw", "hate", "headshake", "hide", "hiss", "hmm", "ignore", "jerk", "judge", "kick",
    "laugh", "leer", "lick", "like", "listen", "love", "lust", "meow", "moan", "mumble",
    "murmur", "mutter", "nod", "nominate", "ogle", "peer", "point", "puke", "pull", "push",
    "purr", "puzzle", "quote", "raise", "recoil", "reply", "rotate", "scowl", "scream",
    "shake", "shove", "sing", "smile", "snap", "snarl", "sneer", "sneeze", "smell", "sniff",
    "snigger", "snort", "spill", "spin", "spit", "spray", "stare", "surrender", "swing",
    "tongue", "touch", "trust", "turn", "understand", "utter", "want", "watch", "wave",
    "wiggle", "wobble", "worship", "wrinkle", "yawn",
];

/// Verbs used to move through an exit ("enter gate", "go north").
pub static MOVEMENT_VERBS: &[&str] = &["enter", "climb", "crawl", "go", "run", "move"];

/// qualifier -> (actor format, room format, use room default)
pub static ACTION_QUALIFIERS: &[(&str, (&str, &str, bool))] = &[
    ("suddenly", ("suddenly %s", "suddenly %s", true)),
    ("fail", ("try to %s, but fail miserably", "tries to %s, but fails miserably", false)),
    ("again", ("%s again", "%s again", true)),
    ("pretend", ("pretend to %s", "pretends to %s", false)),
    ("dont", ("don't %s", "doesn't %s", false)),
    ("don't", ("don't %s", "doesn't %s", false)),
    ("attempt", ("attempt to %s, without much success", "attempts to %s, without much success", false)),
];

/// Qualifiers that negate the action (the action never takes place).
pub static NEGATING_QUALIFIERS: &[&str] = &["fail", "pretend", "dont", "don't", "attempt"];

pub fn qualifier(word: &str) -> Option<&'static (&'static str, &'static str, bool)> {
    ACTION_QUALIFIERS
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, q)| q)
}

pub fn is_negating_qualifier(word: &str) -> bool {
    NEGATING_QUALIFIERS.contains(&word)
}

/// body part keyword -> the full WHERE phrase
pub static BODY_PARTS: &[(&str, &str)] = &[
    ("hand", "on the hand"),
    ("forehead", "on the forehead"),
    ("head", "on the head"),
    ("kneecap", "on the kneecap"),
    ("ankle", "in the ankle"),
    ("knee", "on the knee"),
    ("face", "in the face"),
    ("hurts", "where it hurts"),
    ("nuts", "where it hurts"),
    ("eye", "in the eye"),
    ("ear", "on the ear"),
    ("stomach", "in the stomach"),
    ("butt", "on the butt"),
    ("behind", "on the behind"),
    ("leg", "on the leg"),
    ("foot", "on the foot"),
    ("toe", "on the right toe"),
    ("nose", "on the nose"),
    ("neck", "in the neck"),
    ("back", "on the back"),
    ("arm", "on the arm"),
    ("chest", "on the chest"),
    ("cheek", "on the cheek"),
    ("side", "in the side"),
    ("everywhere", "everywhere"),
    ("shoulder", "on the shoulder"),
];

pub fn body_part(word: &str) -> Option<&'static str> {
    BODY_PARTS
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, phrase)| *phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggressive_and_nonliving_sets_are_subsets_of_the_verb_table() {
        for verb in AGGRESSIVE_VERBS {
            assert!(is_soul_verb(verb), "aggressive verb {} missing", verb);
        }
        for verb in NONLIVING_OK_VERBS {
            assert!(is_soul_verb(verb), "nonliving-ok verb {} missing", verb);
        }
    }

    #[test]
    fn template_counts_match_the_verb_types() {
        for (name, def) in VERBS {
            match def.vtype {
                VerbType::Defa | VerbType::Prev | VerbType::Phys | VerbType::Shrt => {
                    assert!(def.templates.is_empty(), "{} should have no templates", name)
                }
                VerbType::Simp => assert_eq!(def.templates.len(), 1, "{}", name),
                VerbType::Pers | VerbType::Deux => {
                    assert_eq!(def.templates.len(), 2, "{}", name)
                }
                VerbType::Quad => assert_eq!(def.templates.len(), 4, "{}", name),
            }
        }
    }

    #[test]
    fn message_verbs_are_detected_from_their_templates() {
        assert!(verb_def("yell").unwrap().expects_message());
        assert!(verb_def("whisper").unwrap().expects_message());
        assert!(!verb_def("smile").unwrap().expects_message());
    }

    #[test]
    fn qualifiers_and_body_parts_resolve() {
        assert!(qualifier("fail").is_some());
        assert!(qualifier("dont").is_some());
        assert!(is_negating_qualifier("pretend"));
        assert!(!is_negating_qualifier("suddenly"));
        assert_eq!(body_part("nose"), Some("on the nose"));
        assert_eq!(body_part("wing"), None);
    }

    #[test]
    fn verbs_table_has_no_duplicates() {
        for (i, (name, _)) in VERBS.iter().enumerate() {
            assert!(
                !VERBS[i + 1..].iter().any(|(other, _)| other == name),
                "duplicate verb {}",
                name
            );
        }
    }
}
