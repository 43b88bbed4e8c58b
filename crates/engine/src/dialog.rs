//! Async dialogs: multi-step prompts (login, character creation,
//! confirmations) interleaved with regular command handling.
//!
//! A dialog is a tagged state machine. The driver stores the active
//! dialog per connection together with the prompt it asked; when the
//! player's next input line arrives, the answer is validated and the
//! state machine advances (see the driver's `resume_dialog`).

use storyloom_domain::value_objects::races;
use storyloom_domain::{lang, Gender};
use storyloom_shared::PromptMode;

use crate::accounts;
use crate::charbuilder;

/// How a dialog answer is validated before the state machine sees it.
/// A failed validation re-prompts with the error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Anything goes (also used for "press enter" pauses).
    Any,
    YesNo,
    Gender,
    /// Account name rules (3-16 lowercase letters, not blocked).
    AccountName,
    Password,
    Email,
    PlayableRace,
    /// Single-player character name (3+ letters).
    IfName,
}

impl Validator {
    /// Validate and normalize an answer. Returns the normalized text,
    /// or the error message to re-prompt with.
    pub fn validate(&self, input: &str) -> Result<String, String> {
        let input = input.trim();
        match self {
            Validator::Any => Ok(input.to_string()),
            Validator::YesNo => match lang::yesno(input) {
                Ok(true) => Ok("yes".to_string()),
                Ok(false) => Ok("no".to_string()),
                Err(err) => Err(err.to_string()),
            },
            Validator::Gender => Gender::parse(input)
                .map(|g| g.letter().to_string())
                .map_err(|err| err.to_string()),
            Validator::AccountName => {
                let name = input.to_lowercase();
                accounts::accept_name(&name)
                    .map(|_| name)
                    .map_err(|err| err.to_string())
            }
            Validator::Password => accounts::accept_password(input)
                .map(|_| input.to_string())
                .map_err(|err| err.to_string()),
            Validator::Email => accounts::accept_email(input)
                .map(|_| input.to_string())
                .map_err(|err| err.to_string()),
            Validator::PlayableRace => {
                charbuilder::valid_playable_race(input).map_err(|err| err.to_string())
            }
            Validator::IfName => charbuilder::valid_if_name(input).map_err(|err| err.to_string()),
        }
    }
}

/// Character data gathered step by step by the builder dialogs.
#[derive(Debug, Clone, Default)]
pub struct CharData {
    pub name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub race: Option<String>,
    pub wizard: bool,
}

impl CharData {
    pub fn review_line(&self) -> String {
        format!(
            "<dim> name:</> {},  <dim>gender:</> {},  <dim>race:</> {},  <dim>email:</> {}",
            self.name.as_deref().unwrap_or("?"),
            self.gender.map(|g| g.long_name()).unwrap_or("?"),
            self.race.as_deref().unwrap_or("?"),
            self.email.as_deref().unwrap_or("-"),
        )
    }
}

/// The suspended position of a dialog.
#[derive(Debug, Clone)]
pub enum DialogState {
    // single player login
    IfAskLoadSave,
    IfBuilderName(CharData),
    IfBuilderGender(CharData),
    IfBuilderRace(CharData),
    IfBuilderWizard(CharData),
    /// The story's welcome prompt ("press enter to start").
    IfWelcomePause,

    // multiuser admin bootstrap (no wizard account exists yet)
    MudAdminName(CharData),
    MudAdminPassword(CharData),
    MudAdminEmail(CharData),
    MudAdminGender(CharData),
    MudAdminRace(CharData),
    MudAdminConfirm(CharData),

    // multiuser login
    MudLoginName,
    MudLoginPassword { name: String },
    /// Unknown name: create a new character with it?
    MudCreateConfirm(CharData),
    MudBuilderPassword(CharData),
    MudBuilderEmail(CharData),
    MudBuilderGender(CharData),
    MudBuilderRace(CharData),
    MudBuilderConfirm(CharData),
    /// The name is already logged in: kick the other session?
    MudTakeover { name: String },
    MudWelcomePause { name: String },

    // in-game confirmations
    QuitConfirm,
    /// Final acknowledgement after story completion.
    CompletionPause,
}

/// The question the driver asks for a given dialog state.
pub fn prompt_for(state: &DialogState) -> (PromptMode, String, Validator) {
    use DialogState::*;
    match state {
        IfAskLoadSave => (
            PromptMode::Input,
            "Do you want to load a saved game ('<bright>n</>' will start a new game)?".into(),
            Validator::YesNo,
        ),
        IfBuilderName(_) => (PromptMode::Input, "Name?".into(), Validator::IfName),
        IfBuilderGender(_) => (
            PromptMode::Input,
            "What is the gender of your player character (m/f/n)?".into(),
            Validator::Gender,
        ),
        IfBuilderRace(_) => (
            PromptMode::Input,
            format!(
                "You can choose one of the following races: {}. Player race?",
                lang::join_and(races::playable_races())
            ),
            Validator::PlayableRace,
        ),
        IfBuilderWizard(_) => (
            PromptMode::Input,
            "Do you want to play as a wizard?".into(),
            Validator::YesNo,
        ),
        IfWelcomePause | CompletionPause => (PromptMode::Input, String::new(), Validator::Any),
        MudAdminName(_) => (
            PromptMode::InputNoEcho,
            "Please type in the admin's player name.".into(),
            Validator::AccountName,
        ),
        MudAdminPassword(_) => (
            PromptMode::InputNoEcho,
            "Please type in the admin password.".into(),
            Validator::Password,
        ),
        MudAdminEmail(_) => (
            PromptMode::Input,
            "Please type in the admin's email address.".into(),
            Validator::Email,
        ),
        MudAdminGender(_) => (
            PromptMode::Input,
            "What is your gender (m/f/n)?".into(),
            Validator::Gender,
        ),
        MudAdminRace(_) => (
            PromptMode::Input,
            format!(
                "You can choose one of the following races: {}. Player race?",
                lang::join_and(races::playable_races())
            ),
            Validator::PlayableRace,
        ),
        MudAdminConfirm(_) => (
            PromptMode::Input,
            "You cannot change your name later. Do you want to create this admin account?".into(),
            Validator::YesNo,
        ),
        MudLoginName => (
            PromptMode::InputNoEcho,
            "Please type in your player name.".into(),
            Validator::AccountName,
        ),
        MudLoginPassword { .. } => (
            PromptMode::InputNoEcho,
            "Please type in your password.".into(),
            Validator::Any,
        ),
        MudCreateConfirm(_) => (
            PromptMode::Input,
            "Do you want to create a new character with this name?".into(),
            Validator::YesNo,
        ),
        MudBuilderPassword(_) => (
            PromptMode::InputNoEcho,
            "Please type in your desired password.".into(),
            Validator::Password,
        ),
        MudBuilderEmail(_) => (
            PromptMode::Input,
            "Please type in your email address.".into(),
            Validator::Email,
        ),
        MudBuilderGender(_) => (
            PromptMode::Input,
            "What is the gender of your player character (m/f/n)?".into(),
            Validator::Gender,
        ),
        MudBuilderRace(_) => (
            PromptMode::Input,
            format!(
                "You can choose one of the following races: {}. Player race?",
                lang::join_and(races::playable_races())
            ),
            Validator::PlayableRace,
        ),
        MudBuilderConfirm(_) => (
            PromptMode::Input,
            "You cannot change your name later. Do you want to create this character?".into(),
            Validator::YesNo,
        ),
        MudTakeover { .. } => (
            PromptMode::Input,
            "Do you want to kick them out and take over?".into(),
            Validator::YesNo,
        ),
        MudWelcomePause { .. } => (PromptMode::Input, String::new(), Validator::Any),
        QuitConfirm => (
            PromptMode::Input,
            "Are you sure you want to quit?".into(),
            Validator::YesNo,
        ),
    }
}

/// A dialog as stored by the driver, keyed on the connection.
pub struct ActiveDialog {
    pub state: DialogState,
    pub mode: PromptMode,
    pub prompt: String,
    pub validator: Validator,
}

impl ActiveDialog {
    pub fn begin(state: DialogState) -> Self {
        let (mode, prompt, validator) = prompt_for(&state);
        Self {
            state,
            mode,
            prompt,
            validator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yesno_validator_normalizes() {
        assert_eq!(Validator::YesNo.validate("Yep").unwrap(), "yes");
        assert_eq!(Validator::YesNo.validate(" n ").unwrap(), "no");
        assert_eq!(
            Validator::YesNo.validate("dunno").unwrap_err(),
            "That is not an understood yes or no."
        );
    }

    #[test]
    fn name_validator_lowercases() {
        assert_eq!(Validator::AccountName.validate("Julie").unwrap(), "julie");
        assert!(Validator::AccountName.validate("x").is_err());
    }

    #[test]
    fn passwords_are_not_echoed() {
        let (mode, _, validator) = prompt_for(&DialogState::MudLoginPassword {
            name: "julie".into(),
        });
        assert_eq!(mode, PromptMode::InputNoEcho);
        assert_eq!(validator, Validator::Any);
        let (mode, _, _) = prompt_for(&DialogState::MudBuilderPassword(CharData::default()));
        assert_eq!(mode, PromptMode::InputNoEcho);
    }

    #[test]
    fn review_line_shows_the_collected_data() {
        let data = CharData {
            name: Some("julie".into()),
            gender: Some(Gender::Female),
            race: Some("elf".into()),
            email: Some("j@example.com".into()),
            ..CharData::default()
        };
        let line = data.review_line();
        assert!(line.contains("julie"));
        assert!(line.contains("female"));
        assert!(line.contains("elf"));
    }
}
