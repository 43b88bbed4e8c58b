//! The driver: owns the world, the sessions, the scheduler and the
//! pub/sub bus, dispatches player commands, and runs the server tick.
//!
//! Two loop variants share this core: the command/timer-paced single
//! player loop (`single`) and the timer-paced multiuser loop
//! (`multi`). The world is single-writer: every mutation happens on
//! the driver's task.

mod login;
pub mod single;
pub mod multi;

pub use login::{begin_if_login, begin_mud_login, DialogOutcome};

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Notify;

use storyloom_domain::soul::verbs as soul_verbs;
use storyloom_domain::soul::{self, ParseOutcome, ParseResult, TargetRef};
use storyloom_domain::{lang, GameClock, LivingId, World, WorldError};
use storyloom_domain::entities::Living;
use storyloom_domain::value_objects::Gender;

use crate::accounts::AccountsPort;
use crate::commands::{
    self, AccountOp, CommandError, CommandOutcome, CommandRegistry,
};
use crate::context::{Context, PendingAction};
use crate::dialog::{ActiveDialog, DialogState};
use crate::limbo::LimboState;
use crate::player::{PlayerConnection, Sessions};
use crate::ports::ConnectionIo;
use crate::pubsub::PubSub;
use crate::scheduler::{Deferred, DeferredOwner, Scheduler};
use crate::story::{GameMode, Story, StoryConfig};

/// A deferred or heartbeat action. Errors are logged and never abort
/// the tick.
pub type DeferredFn = fn(&mut Driver, &Deferred) -> anyhow::Result<()>;

/// The compass directions, used for the "you can't go there" hint.
pub static DIRECTIONS: &[&str] = &[
    "north", "east", "south", "west", "northeast", "northwest", "southeast", "southwest", "up",
    "down",
];

pub struct Driver {
    pub world: World,
    pub clock: GameClock,
    pub config: StoryConfig,
    pub game_mode: GameMode,
    pub sessions: Sessions,
    pub scheduler: Scheduler,
    pub pubsub: PubSub,
    pub commands: CommandRegistry,
    pub accounts: Option<Arc<dyn AccountsPort>>,
    pub after_actions: VecDeque<PendingAction>,
    pub pending_tells: VecDeque<PendingAction>,
    pub dialogs: HashMap<String, ActiveDialog>,
    actions: HashMap<String, DeferredFn>,
    heartbeats: Vec<(DeferredOwner, String)>,
    pub limbo_state: LimboState,
    /// Signalled by adapters whenever any connection has input.
    pub input_signal: Arc<Notify>,
    pub savegame_path: std::path::PathBuf,
    /// No new characters may be created (mud restricted mode).
    pub restricted: bool,
    started: Instant,
    pub server_started: DateTime<Utc>,
    pub loop_durations: VecDeque<f64>,
    pub stop: bool,
    pub exit_code: i32,
    connect_counter: u64,
}

impl Driver {
    /// Build the driver around a story. The story's `init` populates
    /// the world; unbound exits are resolved afterwards.
    pub fn create(story: &mut dyn Story, mode: GameMode) -> anyhow::Result<Self> {
        let mut config = story.config();
        config
            .validate(mode)
            .map_err(|err| anyhow::anyhow!("invalid story config: {}", err))?;
        let commands = CommandRegistry::create(mode)
            .map_err(|err| anyhow::anyhow!("invalid command registry: {}", err))?;
        let mut world = World::new();
        story
            .init(&mut world)
            .map_err(|err| anyhow::anyhow!("story init failed: {}", err))?;
        world
            .bind_exits()
            .map_err(|err| anyhow::anyhow!("world has dangling exits: {}", err))?;
        let server_started = Utc::now();
        let clock = GameClock::new(
            config.epoch_or(server_started),
            config.gametime_to_realtime,
        );
        let savegame_path = std::path::PathBuf::from(format!(
            "{}.savegame",
            config
                .name
                .to_lowercase()
                .replace([' ', '.', '\'', '"', '\\', '/', '*'], "_")
        ));
        let mut driver = Self {
            world,
            clock,
            config,
            game_mode: mode,
            sessions: Sessions::new(),
            scheduler: Scheduler::new(),
            pubsub: PubSub::new(),
            commands,
            accounts: None,
            after_actions: VecDeque::new(),
            pending_tells: VecDeque::new(),
            dialogs: HashMap::new(),
            actions: HashMap::new(),
            heartbeats: Vec::new(),
            limbo_state: LimboState::default(),
            input_signal: Arc::new(Notify::new()),
            savegame_path,
            restricted: false,
            started: Instant::now(),
            server_started,
            loop_durations: VecDeque::with_capacity(10),
            stop: false,
            exit_code: 0,
            connect_counter: 0,
        };
        crate::limbo::install(&mut driver)?;
        Ok(driver)
    }

    pub fn uptime_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Assemble a [`Context`] over the driver's state.
    pub fn context(&mut self) -> Context<'_> {
        let uptime_secs = self.started.elapsed().as_secs_f64();
        Context {
            world: &mut self.world,
            clock: &mut self.clock,
            config: &self.config,
            game_mode: self.game_mode,
            sessions: &mut self.sessions,
            scheduler: &self.scheduler,
            pubsub: &self.pubsub,
            after_actions: &mut self.after_actions,
            pending_tells: &mut self.pending_tells,
            uptime_secs,
        }
    }

    // ------------------------------------------------------------------
    // deferred actions and heartbeats

    /// Register a named action for deferreds and heartbeats.
    pub fn register_action(&mut self, name: impl Into<String>, func: DeferredFn) {
        self.actions.insert(name.into(), func);
    }

    fn require_action(&self, name: &str) -> Result<(), WorldError> {
        if self.actions.contains_key(name) {
            Ok(())
        } else {
            Err(WorldError::refused(format!(
                "cannot schedule unknown action: {}",
                name
            )))
        }
    }

    /// Schedule an action after the given number of real-time seconds.
    /// Unknown action names fail here, not at firing time.
    pub fn defer_secs(
        &self,
        seconds: f64,
        owner: DeferredOwner,
        action: &str,
        args: Vec<String>,
    ) -> Result<(), WorldError> {
        self.require_action(action)?;
        self.scheduler
            .defer_secs(&self.clock, seconds, owner, action, args);
        Ok(())
    }

    /// Schedule an action at an absolute game time.
    pub fn defer_at(
        &self,
        due: DateTime<Utc>,
        owner: DeferredOwner,
        action: &str,
        args: Vec<String>,
    ) -> Result<(), WorldError> {
        self.require_action(action)?;
        self.scheduler.defer_at(due, owner, action, args);
        Ok(())
    }

    /// Schedule a self-repeating action on a real-time cadence.
    pub fn defer_periodical(
        &self,
        seconds: f64,
        owner: DeferredOwner,
        action: &str,
        args: Vec<String>,
    ) -> Result<(), WorldError> {
        self.require_action(action)?;
        self.scheduler
            .defer_periodical(&self.clock, seconds, owner, action, args);
        Ok(())
    }

    pub fn register_heartbeat(&mut self, owner: DeferredOwner, action: &str) -> Result<(), WorldError> {
        self.require_action(action)?;
        self.heartbeats.push((owner, action.to_string()));
        Ok(())
    }

    pub fn unregister_heartbeat(&mut self, owner: &DeferredOwner) {
        self.heartbeats.retain(|(o, _)| o != owner);
    }

    // ------------------------------------------------------------------
    // the server tick

    /// Advance the clock, fan out heartbeats, fire due deferreds,
    /// drain the after-action queue and flush all output buffers.
    pub fn server_tick(&mut self) {
        self.clock
            .add_realtime(Duration::milliseconds(
                (self.config.server_tick_time * 1000.0) as i64,
            ));
        // snapshot: heartbeat handlers may mutate the subscriber set
        let heartbeats = self.heartbeats.clone();
        for (owner, action) in heartbeats {
            let deferred = Deferred {
                due: self.clock.clock(),
                sequence: 0,
                owner,
                action: action.clone(),
                args: Vec::new(),
                periodical: None,
            };
            self.fire_action(&deferred);
        }
        for deferred in self.scheduler.pop_due(self.clock.clock()) {
            self.fire_action(&deferred);
            if let Some(seconds) = deferred.periodical {
                self.scheduler.defer_periodical(
                    &self.clock,
                    seconds,
                    deferred.owner.clone(),
                    deferred.action.clone(),
                    deferred.args.clone(),
                );
            }
        }
        self.drain_after_actions();
        self.flush_all_output();
    }

    fn fire_action(&mut self, deferred: &Deferred) {
        let Some(func) = self.actions.get(&deferred.action).copied() else {
            tracing::error!(action = %deferred.action, "deferred action vanished from the registry");
            return;
        };
        if let Err(err) = func(self, deferred) {
            // one failing deferred never aborts the tick
            tracing::error!(
                action = %deferred.action,
                owner = %deferred.owner,
                error = %err,
                "error in deferred action (continuing)"
            );
        }
    }

    /// Run the queue of work scheduled to happen right after a player
    /// command.
    pub fn drain_after_actions(&mut self) {
        while let Some(action) = self.after_actions.pop_front() {
            self.run_pending_action(action);
        }
    }

    /// Run the end-of-iteration tells.
    pub fn drain_pending_tells(&mut self) {
        while let Some(action) = self.pending_tells.pop_front() {
            self.run_pending_action(action);
        }
    }

    fn run_pending_action(&mut self, action: PendingAction) {
        match action {
            PendingAction::Tell { living, message } => {
                self.context().tell_player_end(living, &message);
            }
            PendingAction::NotifyAction {
                location,
                actor,
                verb,
            } => {
                crate::limbo::notify_action(self, location, actor, &verb);
            }
            PendingAction::Disconnect { conn } => {
                self.disconnect_player(&conn);
            }
        }
    }

    /// Deliver wiretap events and flush every connection's buffer.
    pub fn flush_all_output(&mut self) {
        self.pubsub.sync_all();
        for conn in self.sessions.iter_mut() {
            conn.write_output();
        }
    }

    // ------------------------------------------------------------------
    // connections

    /// Create a new, not yet logged in player connection. The living
    /// starts out as a nondescript elemental in Limbo until the login
    /// or builder dialog gives it an identity.
    pub fn connect_player(&mut self, io: Box<dyn ConnectionIo>) -> anyhow::Result<String> {
        self.connect_counter += 1;
        let connect_name = format!("<connecting-{}>", self.connect_counter);
        let living = Living::new(connect_name.clone(), Gender::Neuter, "elemental")
            .map_err(|err| anyhow::anyhow!(err.to_string()))?
            .with_description("This player is still connecting to the game.")
            .as_player();
        let limbo = self.world.limbo();
        let living_id = self
            .world
            .add_living(living, limbo)
            .map_err(|err| anyhow::anyhow!(err.to_string()))?;
        let mut conn = PlayerConnection::new(connect_name.clone(), living_id, io);
        conn.clear_screen();
        self.print_game_intro(&mut conn);
        self.sessions.insert(conn);
        tracing::info!(connection = %connect_name, "player connection established");
        Ok(connect_name)
    }

    fn print_game_intro(&self, conn: &mut PlayerConnection) {
        conn.player.tell("\n");
        conn.player
            .tell_end(&format!("<monospaced><bright>'{}'</>", self.config.name));
        conn.player.tell_end(&format!("v{}", self.config.version));
        conn.player
            .tell_end(&format!("written by {}</monospaced>", self.config.author));
        if !self.config.author_address.is_empty() {
            conn.player.tell_end(&self.config.author_address);
        }
        conn.player.tell("\n");
    }

    /// Remove a player from the game: notify the room, detach the
    /// connection, and destroy the living and its belongings.
    pub fn disconnect_player(&mut self, conn_name: &str) {
        let Some(mut conn) = self.sessions.remove(conn_name) else {
            return;
        };
        let living = conn.living();
        if let Some(l) = self.world.living(living) {
            let subjective = lang::capital(l.subjective());
            let message = format!(
                "{{Actor}} suddenly shimmers and fades from sight. {} left the game.",
                subjective
            );
            self.context().tell_others(living, &message);
        }
        self.dialogs.remove(conn_name);
        conn.write_output();
        conn.destroy();
        self.scheduler
            .remove_for_owner(&DeferredOwner::Living(living));
        self.world.destroy_living(living);
        self.limbo_state.forget(living);
        tracing::info!(connection = %conn_name, "player disconnected");
    }

    /// Find a logged-in player by name.
    pub fn search_player(&self, name: &str) -> Option<&PlayerConnection> {
        self.sessions.get(name)
    }

    // ------------------------------------------------------------------
    // dialogs

    /// Put a dialog on a connection and ask its first question.
    pub fn start_dialog(&mut self, conn_name: &str, state: DialogState) {
        let dialog = ActiveDialog::begin(state);
        self.ask_dialog_prompt(conn_name, &dialog);
        self.dialogs.insert(conn_name.to_string(), dialog);
    }

    /// Like `start_dialog` with an overridden prompt (story welcome
    /// texts supply their own).
    pub fn start_dialog_with_prompt(&mut self, conn_name: &str, state: DialogState, prompt: String) {
        let mut dialog = ActiveDialog::begin(state);
        dialog.prompt = prompt;
        self.ask_dialog_prompt(conn_name, &dialog);
        self.dialogs.insert(conn_name.to_string(), dialog);
    }

    fn ask_dialog_prompt(&mut self, conn_name: &str, dialog: &ActiveDialog) {
        if let Some(conn) = self.sessions.get_mut(conn_name) {
            conn.write_output();
            conn.write_dialog_prompt(dialog.mode, &dialog.prompt);
        }
    }

    pub fn has_dialog(&self, conn_name: &str) -> bool {
        self.dialogs.contains_key(conn_name)
    }

    /// Validate a dialog answer and advance the dialog's state
    /// machine. Failed validation re-prompts and re-schedules.
    pub async fn resume_dialog(
        &mut self,
        story: &mut dyn Story,
        conn_name: &str,
        line: &str,
    ) -> DialogOutcome {
        let Some(dialog) = self.dialogs.remove(conn_name) else {
            return DialogOutcome::Continue;
        };
        match dialog.validator.validate(line) {
            Err(message) => {
                if let Some(conn) = self.sessions.get_mut(conn_name) {
                    conn.player.tell_end(&message);
                }
                self.ask_dialog_prompt(conn_name, &dialog);
                self.dialogs.insert(conn_name.to_string(), dialog);
                DialogOutcome::Continue
            }
            Ok(answer) => {
                login::advance_dialog(self, story, conn_name, dialog.state, &answer).await
            }
        }
    }

    // ------------------------------------------------------------------
    // command processing

    /// Process one command line from a connection. Handles the retry
    /// signals internally; unknown verbs, parse errors and refusals
    /// are reported to the player by the caller.
    pub async fn process_player_command(
        &mut self,
        story: &mut dyn Story,
        conn_name: &str,
        cmd: &str,
    ) -> Result<(), CommandError> {
        let mut cmd = cmd.to_string();
        // a leading non-letter abbreviation like ' or ? binds to the
        // rest of the line without a space
        if let Some(first) = cmd.chars().next() {
            if !first.is_alphanumeric() && commands::abbreviation(&first.to_string()).is_some() {
                cmd = format!("{} {}", first, &cmd[first.len_utf8()..]);
            }
        }
        loop {
            match self.dispatch_command(story, conn_name, &cmd).await {
                Err(CommandError::Retry(new_cmd)) => {
                    cmd = new_cmd;
                }
                other => return other,
            }
        }
    }

    async fn dispatch_command(
        &mut self,
        story: &mut dyn Story,
        conn_name: &str,
        cmd: &str,
    ) -> Result<(), CommandError> {
        let cmd = cmd.trim();
        if cmd.is_empty() {
            return Ok(());
        }
        let Some(conn) = self.sessions.get(conn_name) else {
            return Ok(());
        };
        let actor = conn.living();

        // expand the abbreviation map before parsing
        let (first_word, rest) = match cmd.split_once(char::is_whitespace) {
            Some((first, rest)) => (first, rest),
            None => (cmd, ""),
        };
        let verb_word = commands::abbreviation(first_word).unwrap_or(first_word);
        let cmd = if rest.is_empty() {
            verb_word.to_string()
        } else {
            format!("{} {}", verb_word, rest)
        };

        let privileges = self
            .world
            .living(actor)
            .map(|l| l.privileges().clone())
            .unwrap_or_default();
        let custom_verbs: HashSet<String> = story.custom_verbs().keys().cloned().collect();
        let mut external_verbs = self.commands.verbs_for(&privileges);
        external_verbs.extend(custom_verbs.iter().cloned());

        if self.commands.is_no_soul_parse(verb_word) {
            // the command wants the raw remainder of the line
            let mut parsed = ParseResult::new(verb_word);
            parsed.unparsed = rest.trim().to_string();
            self.bump_turns(conn_name);
            return self
                .invoke_command(story, conn_name, actor, &privileges, &parsed)
                .await;
        }

        match soul::parse(&self.world, actor, &cmd, &external_verbs)? {
            ParseOutcome::Soul(parsed) => {
                self.bump_turns(conn_name);
                self.socialize(actor, &parsed)?;
                Ok(())
            }
            ParseOutcome::NonSoul(parsed) => {
                if parsed.qualifier.is_some() {
                    // qualifiers only apply to soul emotes
                    return Err(WorldError::parse("That action doesn't support qualifiers.").into());
                }
                self.bump_turns(conn_name);
                if custom_verbs.contains(&parsed.verb) {
                    let handled = {
                        let mut ctx = self.context();
                        story.handle_custom_verb(&mut ctx, actor, &parsed.verb, &parsed.unparsed)
                    };
                    if handled {
                        self.queue_notify_action(actor, &parsed.verb);
                        return Ok(());
                    }
                    return Err(WorldError::parse("Please be more specific.").into());
                }
                if let Some(exit) = parsed.first_exit() {
                    let is_direction_verb = self
                        .world
                        .living(actor)
                        .and_then(|l| self.world.location(l.location()))
                        .map(|loc| loc.exit(&parsed.verb).is_some())
                        .unwrap_or(false);
                    if is_direction_verb {
                        return self.go_through_exit(actor, exit);
                    }
                }
                match self
                    .invoke_command(story, conn_name, actor, &privileges, &parsed)
                    .await
                {
                    Err(CommandError::RetrySoul) => {
                        self.socialize(actor, &parsed)?;
                        Ok(())
                    }
                    other => other,
                }
            }
        }
    }

    fn bump_turns(&mut self, conn_name: &str) {
        if let Some(conn) = self.sessions.get_mut(conn_name) {
            conn.player.turns += 1;
        }
    }

    async fn invoke_command(
        &mut self,
        story: &mut dyn Story,
        conn_name: &str,
        actor: LivingId,
        privileges: &std::collections::BTreeSet<String>,
        parsed: &ParseResult,
    ) -> Result<(), CommandError> {
        let Some(def) = self.commands.lookup(&parsed.verb, privileges) else {
            return Err(WorldError::parse("That doesn't make much sense.").into());
        };
        if let Some(required) = def.privilege {
            if !privileges.contains(required) {
                return Err(WorldError::security(format!(
                    "{} privilege required for verb {}",
                    required, parsed.verb
                ))
                .into());
            }
        }
        let outcome = {
            let mut ctx = self.context();
            (def.func)(&mut ctx, actor, parsed)?
        };
        match outcome {
            CommandOutcome::Ok => {}
            CommandOutcome::Dialog(state) => {
                self.start_dialog(conn_name, state);
            }
            CommandOutcome::Account(op) => {
                self.run_account_op(actor, op).await;
            }
            CommandOutcome::Save => {
                self.do_save(conn_name);
            }
            CommandOutcome::Wait(duration) => {
                self.do_wait(actor, duration);
            }
        }
        if def.enable_notify_action {
            self.queue_notify_action(actor, &parsed.verb);
        }
        Ok(())
    }

    fn queue_notify_action(&mut self, actor: LivingId, verb: &str) {
        if let Some(location) = self.world.living(actor).map(|l| l.location()) {
            self.after_actions.push_back(PendingAction::NotifyAction {
                location,
                actor,
                verb: verb.to_string(),
            });
        }
    }

    /// Render a soul emote and deliver the three viewpoint messages.
    pub fn socialize(&mut self, actor: LivingId, parsed: &ParseResult) -> Result<(), CommandError> {
        let messages = soul::render(&self.world, actor, parsed)?;
        let location = self
            .world
            .living(actor)
            .map(|l| l.location())
            .ok_or_else(|| WorldError::refused("You are no longer here."))?;
        let target_livings: Vec<LivingId> = messages
            .who
            .iter()
            .filter_map(|t| match t {
                TargetRef::Living(id) => Some(*id),
                _ => None,
            })
            .collect();
        {
            let mut ctx = self.context();
            ctx.tell_player_end(actor, &messages.player_msg);
            ctx.tell_location(
                location,
                &messages.room_msg,
                Some(actor),
                &target_livings,
                &messages.target_msg,
            );
        }
        // an aggressive emote provokes aggressive creatures, unless
        // the action was negated ("pretend to kick the dog")
        let negated = parsed
            .qualifier
            .as_deref()
            .map(soul_verbs::is_negating_qualifier)
            .unwrap_or(false);
        if soul_verbs::AGGRESSIVE_VERBS.contains(&parsed.verb.as_str()) && !negated {
            for target in target_livings {
                let provoked = self
                    .world
                    .living(target)
                    .map(|l| l.aggressive() && !l.is_player())
                    .unwrap_or(false);
                if provoked {
                    let title = self
                        .world
                        .living(target)
                        .map(|l| lang::capital(l.title()))
                        .unwrap_or_else(|| "It".to_string());
                    self.after_actions.push_back(PendingAction::Tell {
                        living: actor,
                        message: format!("{} glowers at you with seething anger.", title),
                    });
                }
            }
        }
        Ok(())
    }

    fn go_through_exit(&mut self, actor: LivingId, exit: storyloom_domain::ExitId) -> Result<(), CommandError> {
        let target = {
            let exit = self
                .world
                .exit(exit)
                .ok_or_else(|| WorldError::refused("You can't go there."))?;
            exit.allow_passage()?;
            exit.target_location()
                .ok_or_else(|| WorldError::refused("You can't go there."))?
        };
        self.context().move_living(actor, target, false)?;
        self.context().look(actor, None);
        Ok(())
    }

    async fn run_account_op(&mut self, actor: LivingId, op: AccountOp) {
        let Some(accounts) = self.accounts.clone() else {
            self.context()
                .tell_player_end(actor, "There is no accounts database in this mode.");
            return;
        };
        match op {
            AccountOp::List { having_privilege } => {
                match accounts.all_accounts(having_privilege.as_deref()).await {
                    Ok(all) => {
                        let mut ctx = self.context();
                        ctx.tell_player_end(actor, "Accounts:");
                        for account in all {
                            ctx.tell_player_end(
                                actor,
                                &format!(
                                    "  {} <dim>({}{}, created {})</>",
                                    account.name,
                                    if account.banned { "banned, " } else { "" },
                                    if account.is_wizard() { "wizard" } else { "player" },
                                    account.created.format("%Y-%m-%d"),
                                ),
                            );
                        }
                    }
                    Err(err) => {
                        self.context().tell_player_end(actor, &err.to_string());
                    }
                }
            }
            AccountOp::Ban { name } => {
                let result = accounts.ban(&name).await;
                self.report_account_result(actor, result, &format!("You banned {}.", name));
                self.force_reconnect(&name, "You have been banned by an admin.");
            }
            AccountOp::Unban { name } => {
                let result = accounts.unban(&name).await;
                self.report_account_result(actor, result, &format!("You unbanned {}.", name));
            }
            AccountOp::SetPrivileges { name, privileges } => {
                let privilege_set: std::collections::BTreeSet<String> =
                    privileges.into_iter().collect();
                let result = accounts.update_privileges(&name, privilege_set).await;
                self.report_account_result(
                    actor,
                    result,
                    &format!("You updated the privileges of {}.", name),
                );
                // a privilege change takes effect at the next login
                self.force_reconnect(
                    &name,
                    "Your privileges changed. You must log in again.",
                );
            }
        }
    }

    fn report_account_result(
        &mut self,
        actor: LivingId,
        result: Result<(), crate::accounts::AccountError>,
        success: &str,
    ) {
        let message = match result {
            Ok(()) => success.to_string(),
            Err(err) => err.to_string(),
        };
        self.context().tell_player_end(actor, &message);
    }

    /// Kick a logged-in player so their next login picks up changed
    /// account state.
    fn force_reconnect(&mut self, name: &str, notice: &str) {
        if let Some(conn) = self.sessions.get_mut(name) {
            conn.player.tell("\n");
            conn.player.tell_end(&format!("<it><rev>{}</>", notice));
            self.pending_tells.push_back(PendingAction::Disconnect {
                conn: name.to_string(),
            });
        }
    }

    fn do_save(&mut self, conn_name: &str) {
        match crate::savegame::save(self, conn_name) {
            Ok(()) => {
                let living = self.sessions.get(conn_name).map(|c| c.living());
                if let Some(living) = living {
                    let mut ctx = self.context();
                    ctx.tell_player_end(living, "Game saved.");
                    if ctx.config.display_gametime {
                        let clock = ctx.clock.to_string();
                        ctx.tell_player_end(living, &format!("Game time: {}", clock));
                    }
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "could not write savegame");
                let living = self.sessions.get(conn_name).map(|c| c.living());
                if let Some(living) = living {
                    self.context()
                        .tell_player_end(living, "There was a problem saving the game.");
                }
            }
        }
    }

    /// Let game time pass: run the appropriate number of server ticks.
    fn do_wait(&mut self, actor: LivingId, duration: Duration) {
        if self.clock.times_realtime() == 0 {
            // frozen clock: advance it directly and run a single tick
            self.clock.add_gametime(duration);
            self.server_tick();
            self.context().tell_player_end(actor, "Time passes.");
            return;
        }
        let game_secs = duration.num_milliseconds() as f64 / 1000.0;
        let tick_game_secs = self.config.server_tick_time * self.clock.times_realtime() as f64;
        let num_ticks = (game_secs / tick_game_secs) as u64;
        if num_ticks < 1 {
            self.context()
                .tell_player_end(actor, "It's no use waiting such a short while.");
            return;
        }
        for _ in 0..num_ticks {
            self.server_tick();
        }
        self.context().tell_player_end(actor, "Time passes.");
    }

    // ------------------------------------------------------------------
    // error funneling

    /// Surface a command failure to the player per its category.
    /// Returns the session-level signal, if any.
    pub fn report_command_error(
        &mut self,
        conn_name: &str,
        error: CommandError,
    ) -> Option<CommandError> {
        let living = self.sessions.get(conn_name).map(|c| c.living());
        let Some(living) = living else {
            return None;
        };
        match error {
            CommandError::World(WorldError::UnknownVerb { verb, .. }) => {
                let message = if DIRECTIONS.contains(&verb.as_str()) {
                    "You can't go in that direction.".to_string()
                } else {
                    format!("The verb '{}' is unrecognized.", verb)
                };
                self.context().tell_player_end(living, &message);
                None
            }
            CommandError::World(err) => {
                // parse errors and refusals are shown verbatim
                self.context().tell_player_end(living, &err.to_string());
                None
            }
            CommandError::RetrySoul | CommandError::Retry(_) => None,
            signal @ (CommandError::SessionExit | CommandError::StoryCompleted) => Some(signal),
        }
    }

    /// Tell the player about an internal error, in a monospaced block.
    pub fn report_internal_error(&mut self, conn_name: &str, detail: &str) {
        tracing::error!(connection = %conn_name, detail, "internal error in command");
        if let Some(conn) = self.sessions.get_mut(conn_name) {
            conn.player
                .tell_end("<bright><rev>* internal error (please report this):</>");
            conn.player
                .tell_unformatted(&format!("<monospaced>{}</monospaced>", detail));
        }
    }

    /// Disconnect players who idled beyond the allowed time
    /// (30 minutes, wizards 3 hours).
    pub fn disconnect_idling(&mut self) {
        let mut to_disconnect = Vec::new();
        for conn in self.sessions.iter() {
            let living = conn.living();
            let is_wizard = self
                .world
                .living(living)
                .map(|l| l.is_wizard())
                .unwrap_or(false);
            let idle_limit = if is_wizard { 3 * 60 * 60 } else { 30 * 60 } as f64;
            if conn.idle_seconds() > idle_limit {
                to_disconnect.push((conn.name.clone(), living, idle_limit as u64 / 60));
            }
        }
        for (name, living, limit_minutes) in to_disconnect {
            {
                let mut ctx = self.context();
                ctx.tell_player(living, "\n");
                ctx.tell_player_end(
                    living,
                    &format!(
                        "<it><rev>Automatic logout: You have been logged out because \
                         you've been idle for too long ({} minutes)</>",
                        limit_minutes
                    ),
                );
                ctx.tell_others(living, "{Actor} has been idling around for too long.");
            }
            self.disconnect_player(&name);
        }
    }
}
