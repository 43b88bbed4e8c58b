//! Login and dialog continuation: the state machine transitions for
//! the async dialogs (single player game start, multiuser login and
//! account creation, quit/completion confirmations).

use storyloom_domain::{lang, Gender, LivingId, Stats};

use crate::charbuilder::PlayerNaming;
use crate::dialog::{CharData, DialogState};
use crate::savegame::{self, SaveError};
use crate::story::Story;

use super::Driver;

/// What the loop should do after a dialog step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Continue,
    /// The player asked to leave (confirmed quit).
    SessionExit,
    /// Unrecoverable problem (incompatible savegame): exit code.
    Fatal(i32),
}

fn tell(driver: &mut Driver, conn_name: &str, message: &str) {
    if let Some(conn) = driver.sessions.get_mut(conn_name) {
        conn.player.tell_end(message);
    }
}

fn paragraph(driver: &mut Driver, conn_name: &str) {
    if let Some(conn) = driver.sessions.get_mut(conn_name) {
        conn.player.tell("\n");
    }
}

/// Kick off the single player game start dialog.
pub async fn begin_if_login(driver: &mut Driver, story: &mut dyn Story, conn_name: &str) {
    if driver.config.savegames_enabled {
        paragraph(driver, conn_name);
        driver.start_dialog(conn_name, DialogState::IfAskLoadSave);
    } else {
        start_new_if_game(driver, story, conn_name);
    }
}

/// Kick off the multiuser login dialog; when no wizard account exists
/// yet, the admin bootstrap dialog runs first.
pub async fn begin_mud_login(driver: &mut Driver, conn_name: &str) {
    let needs_admin = match &driver.accounts {
        Some(accounts) => accounts
            .all_accounts(Some("wizard"))
            .await
            .map(|wizards| wizards.is_empty())
            .unwrap_or(false),
        None => false,
    };
    if needs_admin {
        tell(
            driver,
            conn_name,
            "<bright>Welcome. There is no admin user registered. \
             You'll have to create the initial admin user to be able to start the mud.</>",
        );
        tell(driver, conn_name, "Creating new admin user.");
        driver.start_dialog(conn_name, DialogState::MudAdminName(CharData::default()));
    } else {
        tell(
            driver,
            conn_name,
            "<bright>Welcome. We would like to know your player name before you can continue.</>",
        );
        tell(
            driver,
            conn_name,
            "<dim>If you are not yet known with us, you can simply type in a new name. \
             Otherwise use the name you registered with.</>",
        );
        paragraph(driver, conn_name);
        driver.start_dialog(conn_name, DialogState::MudLoginName);
    }
}

/// Advance one dialog with a validated answer.
pub(super) async fn advance_dialog(
    driver: &mut Driver,
    story: &mut dyn Story,
    conn_name: &str,
    state: DialogState,
    answer: &str,
) -> DialogOutcome {
    use DialogState::*;
    match state {
        // ----- single player -----
        IfAskLoadSave => {
            if answer == "yes" {
                match savegame::load(driver) {
                    Ok(saved) => {
                        if let Ok(living) = savegame::apply(driver, conn_name, saved) {
                            // the session now goes by the saved player's name
                            let new_name = driver
                                .world
                                .living(living)
                                .map(|l| l.name().to_string())
                                .unwrap_or_else(|| conn_name.to_string());
                            tell(driver, &new_name, "Game loaded.");
                            if driver.config.display_gametime {
                                let clock = driver.clock.to_string();
                                tell(driver, &new_name, &format!("Game time: {}", clock));
                            }
                            paragraph(driver, &new_name);
                            let prompt = {
                                let mut ctx = driver.context();
                                story.welcome_savegame(&mut ctx, living)
                            };
                            match prompt {
                                Some(prompt) => driver.start_dialog_with_prompt(
                                    &new_name,
                                    IfWelcomePause,
                                    prompt,
                                ),
                                None => finish_login(driver, story, &new_name, false),
                            }
                            return DialogOutcome::Continue;
                        }
                        DialogOutcome::Continue
                    }
                    Err(SaveError::NotFound) => {
                        tell(driver, conn_name, "No saved game data found.");
                        start_new_if_game(driver, story, conn_name);
                        DialogOutcome::Continue
                    }
                    Err(err) => {
                        tell(
                            driver,
                            conn_name,
                            "There was a problem loading the saved game data:",
                        );
                        tell(driver, conn_name, &err.to_string());
                        driver.flush_all_output();
                        DialogOutcome::Fatal(10)
                    }
                }
            } else {
                start_new_if_game(driver, story, conn_name);
                DialogOutcome::Continue
            }
        }
        IfBuilderName(mut data) => {
            data.name = Some(answer.to_string());
            driver.start_dialog(conn_name, IfBuilderGender(data));
            DialogOutcome::Continue
        }
        IfBuilderGender(mut data) => {
            data.gender = Gender::parse(answer).ok();
            driver.start_dialog(conn_name, IfBuilderRace(data));
            DialogOutcome::Continue
        }
        IfBuilderRace(mut data) => {
            data.race = Some(answer.to_string());
            driver.start_dialog(conn_name, IfBuilderWizard(data));
            DialogOutcome::Continue
        }
        IfBuilderWizard(data) => {
            let mut naming = PlayerNaming::new(
                data.name.clone().unwrap_or_else(|| "player".to_string()),
                data.gender.unwrap_or(Gender::Neuter),
                data.race.clone().unwrap_or_else(|| "human".to_string()),
            );
            if answer == "yes" {
                naming = naming.wizard();
            }
            create_if_player(driver, story, conn_name, naming);
            DialogOutcome::Continue
        }
        IfWelcomePause => {
            finish_login(driver, story, conn_name, false);
            DialogOutcome::Continue
        }

        // ----- multiuser admin bootstrap -----
        MudAdminName(mut data) => {
            data.name = Some(answer.to_string());
            data.wizard = true;
            driver.start_dialog(conn_name, MudAdminPassword(data));
            DialogOutcome::Continue
        }
        MudAdminPassword(mut data) => {
            data.password = Some(answer.to_string());
            driver.start_dialog(conn_name, MudAdminEmail(data));
            DialogOutcome::Continue
        }
        MudAdminEmail(mut data) => {
            data.email = Some(answer.to_string());
            driver.start_dialog(conn_name, MudAdminGender(data));
            DialogOutcome::Continue
        }
        MudAdminGender(mut data) => {
            data.gender = Gender::parse(answer).ok();
            driver.start_dialog(conn_name, MudAdminRace(data));
            DialogOutcome::Continue
        }
        MudAdminRace(mut data) => {
            data.race = Some(answer.to_string());
            tell(driver, conn_name, "<bright>Please review your new character.</>");
            let review = data.review_line();
            tell(driver, conn_name, &review);
            driver.start_dialog(conn_name, MudAdminConfirm(data));
            DialogOutcome::Continue
        }
        MudAdminConfirm(data) => {
            if answer != "yes" {
                tell(driver, conn_name, "Creating new admin user.");
                driver.start_dialog(conn_name, MudAdminName(CharData::default()));
                return DialogOutcome::Continue;
            }
            match create_account(driver, &data, true).await {
                Ok(()) => {
                    tell(
                        driver,
                        conn_name,
                        "<it>Okay, your admin account is ready. You can try logging in.</it>",
                    );
                    paragraph(driver, conn_name);
                    driver.start_dialog(conn_name, MudLoginName);
                }
                Err(message) => {
                    tell(driver, conn_name, &message);
                    driver.start_dialog(conn_name, MudAdminName(CharData::default()));
                }
            }
            DialogOutcome::Continue
        }

        // ----- multiuser login -----
        MudLoginName => {
            let name = answer.to_string();
            let known = match &driver.accounts {
                Some(accounts) => accounts.get(&name).await.is_ok(),
                None => false,
            };
            if known {
                driver.start_dialog(conn_name, MudLoginPassword { name });
            } else if driver.restricted {
                tell(
                    driver,
                    conn_name,
                    "<bright>We're sorry, the mud is running in restricted mode at the moment. \
                     It is not allowed to create new characters right now. Please try again \
                     later.</>",
                );
                driver.start_dialog(conn_name, MudLoginName);
            } else {
                tell(
                    driver,
                    conn_name,
                    &format!("'<player>{}</>' is the name of a new character.", name),
                );
                let data = CharData {
                    name: Some(name),
                    ..CharData::default()
                };
                driver.start_dialog(conn_name, MudCreateConfirm(data));
            }
            DialogOutcome::Continue
        }
        MudCreateConfirm(data) => {
            if answer == "yes" {
                driver.start_dialog(conn_name, MudBuilderPassword(data));
            } else {
                driver.start_dialog(conn_name, MudLoginName);
            }
            DialogOutcome::Continue
        }
        MudBuilderPassword(mut data) => {
            data.password = Some(answer.to_string());
            driver.start_dialog(conn_name, MudBuilderEmail(data));
            DialogOutcome::Continue
        }
        MudBuilderEmail(mut data) => {
            data.email = Some(answer.to_string());
            driver.start_dialog(conn_name, MudBuilderGender(data));
            DialogOutcome::Continue
        }
        MudBuilderGender(mut data) => {
            data.gender = Gender::parse(answer).ok();
            driver.start_dialog(conn_name, MudBuilderRace(data));
            DialogOutcome::Continue
        }
        MudBuilderRace(mut data) => {
            data.race = Some(answer.to_string());
            tell(driver, conn_name, "<bright>Please review your new character.</>");
            let review = data.review_line();
            tell(driver, conn_name, &review);
            driver.start_dialog(conn_name, MudBuilderConfirm(data));
            DialogOutcome::Continue
        }
        MudBuilderConfirm(data) => {
            if answer != "yes" {
                driver.start_dialog(conn_name, MudLoginName);
                return DialogOutcome::Continue;
            }
            match create_account(driver, &data, false).await {
                Ok(()) => {
                    tell(
                        driver,
                        conn_name,
                        "<bright>Your new account has been created!</>  Go ahead and log in with it.",
                    );
                    paragraph(driver, conn_name);
                    driver.start_dialog(conn_name, MudLoginName);
                }
                Err(message) => {
                    tell(driver, conn_name, &message);
                    driver.start_dialog(conn_name, MudLoginName);
                }
            }
            DialogOutcome::Continue
        }
        MudLoginPassword { name } => {
            let valid = match &driver.accounts {
                Some(accounts) => accounts.valid_password(&name, answer).await,
                None => Err(crate::accounts::AccountError::InvalidLogin),
            };
            if let Err(err) = valid {
                tell(driver, conn_name, &format!("<it>{}</it>", err));
                driver.start_dialog(conn_name, MudLoginName);
                return DialogOutcome::Continue;
            }
            let account = match &driver.accounts {
                Some(accounts) => accounts.get(&name).await.ok(),
                None => None,
            };
            let Some(account) = account else {
                driver.start_dialog(conn_name, MudLoginName);
                return DialogOutcome::Continue;
            };
            if account.banned {
                tell(
                    driver,
                    conn_name,
                    "<bright>You have been banned by an admin!</>  Try logging in later or get \
                     in touch.",
                );
                driver.start_dialog(conn_name, MudLoginName);
                return DialogOutcome::Continue;
            }
            // maybe the account is already logged in from elsewhere
            let existing = driver
                .search_player(&name)
                .map(|conn| (conn.idle_seconds(), conn.living()));
            if let Some((idle, existing_living)) = existing {
                let location_name = driver
                    .world
                    .living(existing_living)
                    .and_then(|l| driver.world.location(l.location()))
                    .map(|loc| loc.name().to_string())
                    .unwrap_or_default();
                tell(
                    driver,
                    conn_name,
                    &format!(
                        "That player is already logged in elsewhere. Their current location \
                         is {} and their idle time is {} seconds.",
                        location_name, idle as u64
                    ),
                );
                if idle < 30.0 {
                    tell(driver, conn_name, "They are still active.");
                    driver.start_dialog(conn_name, MudLoginName);
                } else {
                    driver.start_dialog(conn_name, MudTakeover { name });
                }
                return DialogOutcome::Continue;
            }
            finalize_mud_login(driver, story, conn_name, &name).await
        }
        MudTakeover { name } => {
            if answer == "yes" {
                if let Some(existing) = driver.sessions.get_mut(&name) {
                    existing.player.tell("\n");
                    existing.player.tell_end(
                        "<it><rev>You are kicked from the game. Your account is now logged in \
                         from elsewhere.</>",
                    );
                }
                driver.disconnect_player(&name);
                finalize_mud_login(driver, story, conn_name, &name).await
            } else {
                tell(driver, conn_name, "Okay, leaving them in peace.");
                driver.start_dialog(conn_name, MudLoginName);
                DialogOutcome::Continue
            }
        }
        MudWelcomePause { name } => {
            finish_login(driver, story, &name, true);
            DialogOutcome::Continue
        }

        // ----- in-game confirmations -----
        QuitConfirm => {
            if answer == "yes" {
                DialogOutcome::SessionExit
            } else {
                tell(driver, conn_name, "Good, we're not done yet.");
                DialogOutcome::Continue
            }
        }
        CompletionPause => DialogOutcome::SessionExit,
    }
}

/// Create the single player character from the story config, or start
/// the builder dialog when the story doesn't provide one.
fn start_new_if_game(driver: &mut Driver, story: &mut dyn Story, conn_name: &str) {
    match &driver.config.player_name {
        Some(name) => {
            let naming = PlayerNaming::new(
                name.clone(),
                driver.config.player_gender.unwrap_or(Gender::Neuter),
                driver
                    .config
                    .player_race
                    .clone()
                    .unwrap_or_else(|| "human".to_string()),
            );
            let mut naming = naming;
            naming.money = driver.config.player_money;
            create_if_player(driver, story, conn_name, naming);
        }
        None => {
            driver.start_dialog(conn_name, DialogState::IfBuilderName(CharData::default()));
        }
    }
}

/// Apply a finished naming to the connecting player and continue with
/// the story's welcome.
fn create_if_player(
    driver: &mut Driver,
    story: &mut dyn Story,
    conn_name: &str,
    naming: PlayerNaming,
) {
    let Some(living_id) = driver.sessions.get(conn_name).map(|c| c.living()) else {
        return;
    };
    let stats = match naming.stats() {
        Ok(stats) => stats,
        Err(err) => {
            tell(driver, conn_name, &err.to_string());
            return;
        }
    };
    apply_identity(
        driver,
        living_id,
        &naming.name,
        naming.title(),
        stats,
        naming.money,
        naming.wizard,
    );
    driver.sessions.rename(conn_name, &naming.name);
    let start = start_location(driver, naming.wizard);
    let _ = driver.world.move_living(living_id, start);
    paragraph(driver, &naming.name);
    let prompt = {
        let mut ctx = driver.context();
        story.welcome(&mut ctx, living_id)
    };
    let name = naming.name.clone();
    match prompt {
        Some(prompt) => {
            driver.start_dialog_with_prompt(&name, DialogState::IfWelcomePause, prompt)
        }
        None => finish_login(driver, story, &name, false),
    }
}

fn apply_identity(
    driver: &mut Driver,
    living_id: LivingId,
    name: &str,
    title: String,
    stats: Stats,
    money: f64,
    wizard: bool,
) {
    if let Some(living) = driver.world.living_mut(living_id) {
        living.set_identity(name, title, stats);
        living.set_money(money);
        living.set_description(if wizard {
            "This wizard looks very important."
        } else {
            "A regular person."
        });
        living.revoke_privilege("wizard");
        if wizard {
            living.grant_privilege("wizard");
        }
        living.set_player(true);
    }
}

fn start_location(driver: &Driver, wizard: bool) -> storyloom_domain::LocationId {
    let name = if wizard {
        &driver.config.startlocation_wizard
    } else {
        &driver.config.startlocation_player
    };
    driver
        .world
        .find_location(name)
        .unwrap_or_else(|| driver.world.limbo())
}

/// Complete a successful multiuser login for the given account name.
async fn finalize_mud_login(
    driver: &mut Driver,
    story: &mut dyn Story,
    conn_name: &str,
    name: &str,
) -> DialogOutcome {
    let account = match &driver.accounts {
        Some(accounts) => match accounts.get(name).await {
            Ok(account) => account,
            Err(err) => {
                tell(driver, conn_name, &err.to_string());
                driver.start_dialog(conn_name, DialogState::MudLoginName);
                return DialogOutcome::Continue;
            }
        },
        None => {
            driver.start_dialog(conn_name, DialogState::MudLoginName);
            return DialogOutcome::Continue;
        }
    };
    let Some(living_id) = driver.sessions.get(conn_name).map(|c| c.living()) else {
        return DialogOutcome::Continue;
    };
    let wizard = account.is_wizard();
    apply_identity(
        driver,
        living_id,
        &account.name,
        lang::capital(&account.name),
        account.stats.clone(),
        0.0,
        wizard,
    );
    if let Some(living) = driver.world.living_mut(living_id) {
        living.set_privileges(account.privileges.clone());
    }
    driver.sessions.rename(conn_name, &account.name);
    if let Some(accounts) = driver.accounts.clone() {
        if let Err(err) = accounts.logged_in(&account.name).await {
            tracing::warn!(error = %err, "could not stamp login time");
        }
    }
    let start = start_location(driver, wizard);
    let _ = driver.world.move_living(living_id, start);
    driver.limbo_state.forget(living_id);
    paragraph(driver, &account.name);
    tell(
        driver,
        &account.name,
        &format!(
            "Welcome to {}, {}.",
            driver.config.name,
            lang::capital(&account.name)
        ),
    );
    let prompt = {
        let mut ctx = driver.context();
        story.welcome(&mut ctx, living_id)
    };
    match prompt {
        Some(prompt) => {
            let name = account.name.clone();
            driver.start_dialog_with_prompt(
                &name,
                DialogState::MudWelcomePause {
                    name: account.name.clone(),
                },
                prompt,
            );
            DialogOutcome::Continue
        }
        None => {
            finish_login(driver, story, &account.name, true);
            DialogOutcome::Continue
        }
    }
}

/// Last step of any login: initialize the player in the story and
/// force a look to get our bearings.
fn finish_login(driver: &mut Driver, story: &mut dyn Story, conn_name: &str, motd: bool) {
    let Some(living_id) = driver.sessions.get(conn_name).map(|c| c.living()) else {
        return;
    };
    {
        let mut ctx = driver.context();
        story.init_player(&mut ctx, living_id);
        if motd {
            ctx.tell_player_end(living_id, "There's currently no message-of-the-day.");
        }
        ctx.tell_player(living_id, "\n");
        ctx.look(living_id, Some(false));
    }
    if let Some(conn) = driver.sessions.get_mut(conn_name) {
        conn.need_new_input_prompt = true;
    }
    tracing::info!(connection = %conn_name, "login complete");
}

async fn create_account(
    driver: &mut Driver,
    data: &CharData,
    wizard: bool,
) -> Result<(), String> {
    let Some(accounts) = driver.accounts.clone() else {
        return Err("There is no accounts database.".to_string());
    };
    let name = data.name.clone().unwrap_or_default();
    let password = data.password.clone().unwrap_or_default();
    let email = data.email.clone().unwrap_or_default();
    let gender = data.gender.unwrap_or(Gender::Neuter);
    let race = data.race.clone().unwrap_or_else(|| "human".to_string());
    let stats = Stats::from_race(&race, gender).map_err(|err| err.to_string())?;
    let privileges: std::collections::BTreeSet<String> = if wizard {
        ["wizard".to_string()].into()
    } else {
        Default::default()
    };
    accounts
        .create(&name, &password, &email, stats, privileges)
        .await
        .map(|_| ())
        .map_err(|err| err.to_string())
}
