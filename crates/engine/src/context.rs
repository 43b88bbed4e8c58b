//! The per-invocation context bundle.
//!
//! Every command function, deferred action and story hook receives a
//! [`Context`]: mutable access to the world and the sessions, the
//! clock, the validated story configuration, the scheduler and the
//! pub/sub bus. There is no global driver state; the driver constructs
//! a context from its own fields for the duration of one invocation.

use std::collections::VecDeque;

use storyloom_domain::value_objects::MoneyFormatter;
use storyloom_domain::{lang, GameClock, LivingId, LocationId, World};

use crate::player::Sessions;
use crate::pubsub::{PubSub, TopicName};
use crate::scheduler::Scheduler;
use crate::story::{GameMode, StoryConfig};

/// Work queued to run outside the current command.
#[derive(Debug, Clone)]
pub enum PendingAction {
    /// Notify the location that an action happened (NPC reactions).
    NotifyAction {
        location: LocationId,
        actor: LivingId,
        verb: String,
    },
    /// Tell a living something, at the end of the tick.
    Tell { living: LivingId, message: String },
    /// Disconnect a connection after its output flushed.
    Disconnect { conn: String },
}

pub struct Context<'a> {
    pub world: &'a mut World,
    pub clock: &'a mut GameClock,
    pub config: &'a StoryConfig,
    pub game_mode: GameMode,
    pub sessions: &'a mut Sessions,
    pub scheduler: &'a Scheduler,
    pub pubsub: &'a PubSub,
    /// Runs after the current player command returns, before the next
    /// tick completes.
    pub after_actions: &'a mut VecDeque<PendingAction>,
    /// Runs at the end of the current loop iteration.
    pub pending_tells: &'a mut VecDeque<PendingAction>,
    /// Server uptime, for status displays and idle checks.
    pub uptime_secs: f64,
}

impl Context<'_> {
    pub fn money_formatter(&self) -> Option<MoneyFormatter> {
        self.config.money_type.kind().map(MoneyFormatter::new)
    }

    /// Wiretap topic of a living.
    pub fn wiretap_living(&self, name: &str) -> TopicName {
        TopicName::pair("wiretap-living", name)
    }

    /// Wiretap topic of a location.
    pub fn wiretap_location(&self, name: &str) -> TopicName {
        TopicName::pair("wiretap-location", name)
    }

    /// Tell a living something. Players get it buffered on their
    /// screen; for all livings the message also goes to wiretaps.
    pub fn tell_player(&mut self, living: LivingId, message: &str) {
        self.deliver(living, message, false);
    }

    /// Like [`Context::tell_player`], ending the paragraph.
    pub fn tell_player_end(&mut self, living: LivingId, message: &str) {
        self.deliver(living, message, true);
    }

    fn deliver(&mut self, living: LivingId, message: &str, end: bool) {
        if message != "\n" {
            if let Some(name) = self.world.living(living).map(|l| l.name().to_string()) {
                let topic = self.pubsub.topic(self.wiretap_living(&name));
                topic.send((name, message.to_string()), false);
            }
        }
        if let Some(conn) = self.sessions.by_living(living) {
            if message == "\n" {
                conn.player.tell("\n");
            } else if end {
                conn.player.tell_end(message);
            } else {
                conn.player.tell(message);
            }
        }
    }

    /// Tell everyone in a location. Targets named in
    /// `specific_targets` get `specific_target_msg` instead; the
    /// excluded living (usually the actor) gets nothing. Synchronous:
    /// every recipient has the message buffered when this returns.
    pub fn tell_location(
        &mut self,
        location: LocationId,
        room_msg: &str,
        exclude: Option<LivingId>,
        specific_targets: &[LivingId],
        specific_target_msg: &str,
    ) {
        let livings: Vec<LivingId> = self
            .world
            .location(location)
            .map(|loc| loc.livings().to_vec())
            .unwrap_or_default();
        for living in livings {
            if Some(living) == exclude {
                continue;
            }
            if specific_targets.contains(&living) {
                self.tell_player_end(living, specific_target_msg);
            } else if !room_msg.is_empty() {
                self.tell_player_end(living, room_msg);
            }
        }
        if !room_msg.is_empty() {
            if let Some(name) = self.world.location(location).map(|l| l.name().to_string()) {
                let topic = self.pubsub.topic(self.wiretap_location(&name));
                topic.send((name, room_msg.to_string()), false);
            }
        }
    }

    /// Message the other livings in the actor's location. `{Actor}`
    /// and `{actor}` in the message expand to the actor's title.
    pub fn tell_others(&mut self, actor: LivingId, message: &str) {
        let Some(living) = self.world.living(actor) else {
            return;
        };
        let title = living.title().to_string();
        let location = living.location();
        let message = message
            .replace("{Actor}", &lang::capital(&title))
            .replace("{actor}", &title);
        self.tell_location(location, &message, Some(actor), &[], "");
    }

    /// Render the surroundings to a player, honoring brief mode and
    /// the story's exits setting, and remember the visited location.
    pub fn look(&mut self, player: LivingId, short: Option<bool>) {
        let Some(living) = self.world.living(player) else {
            return;
        };
        let location = living.location();
        let show_exits = self.config.show_exits_in_look;
        let (brief, known) = match self.sessions.by_living(player) {
            Some(conn) => (
                conn.player.brief,
                conn.player.known_locations.contains(&location),
            ),
            None => (0, false),
        };
        let short = short.unwrap_or(match brief {
            2 => true,
            1 => known,
            _ => false,
        });
        let paragraphs = self.world.look(location, Some(player), short, show_exits);
        if let Some(conn) = self.sessions.by_living(player) {
            conn.player.known_locations.insert(location);
            for paragraph in paragraphs {
                conn.player.tell_end(&paragraph);
            }
        }
    }

    /// Move a living to another location with the standard leave and
    /// arrive narration.
    pub fn move_living(
        &mut self,
        living: LivingId,
        target: LocationId,
        silent: bool,
    ) -> Result<(), storyloom_domain::WorldError> {
        let title = self
            .world
            .living(living)
            .map(|l| lang::capital(l.title()))
            .unwrap_or_else(|| "Someone".to_string());
        let origin = self.world.move_living(living, target)?;
        if !silent {
            self.tell_location(origin, &format!("{} leaves.", title), Some(living), &[], "");
            self.tell_location(target, &format!("{} arrives.", title), Some(living), &[], "");
        }
        Ok(())
    }

    /// Queue work to run right after the player's command completes.
    pub fn after_player_action(&mut self, action: PendingAction) {
        self.after_actions.push_back(action);
    }

    /// Queue a tell for the end of the loop iteration.
    pub fn pending_tell(&mut self, action: PendingAction) {
        self.pending_tells.push_back(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports;
    use crate::player::PlayerConnection;
    use std::sync::Arc;
    use storyloom_domain::entities::{Living, Location};
    use storyloom_domain::value_objects::Gender;
    use tokio::sync::Notify;

    struct Fixture {
        world: World,
        clock: GameClock,
        config: StoryConfig,
        sessions: Sessions,
        scheduler: Scheduler,
        pubsub: PubSub,
        after: VecDeque<PendingAction>,
        tells: VecDeque<PendingAction>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                world: World::new(),
                clock: GameClock::new(chrono::Utc::now(), 1),
                config: StoryConfig::default(),
                sessions: Sessions::new(),
                scheduler: Scheduler::new(),
                pubsub: PubSub::new(),
                after: VecDeque::new(),
                tells: VecDeque::new(),
            }
        }

        fn ctx(&mut self) -> Context<'_> {
            Context {
                world: &mut self.world,
                clock: &mut self.clock,
                config: &self.config,
                game_mode: GameMode::If,
                sessions: &mut self.sessions,
                scheduler: &self.scheduler,
                pubsub: &self.pubsub,
                after_actions: &mut self.after,
                pending_tells: &mut self.tells,
                uptime_secs: 0.0,
            }
        }
    }

    #[test]
    fn location_tell_reaches_everyone_but_the_excluded() {
        let mut fx = Fixture::new();
        let room = fx.world.add_location(Location::new("room", ""));
        let julie = fx
            .world
            .add_living(
                Living::new("julie", Gender::Female, "human").unwrap().as_player(),
                room,
            )
            .unwrap();
        let max = fx
            .world
            .add_living(
                Living::new("max", Gender::Male, "human").unwrap().as_player(),
                room,
            )
            .unwrap();
        let signal = Arc::new(Notify::new());
        let (io_julie, _a1) = ports::channel_io(signal.clone());
        let (io_max, _a2) = ports::channel_io(signal);
        fx.sessions
            .insert(PlayerConnection::new("julie", julie, Box::new(io_julie)));
        fx.sessions
            .insert(PlayerConnection::new("max", max, Box::new(io_max)));
        let mut ctx = fx.ctx();
        ctx.tell_location(room, "Julie grins.", Some(julie), &[max], "Julie grins at you.");
        let julie_out = fx.sessions.get_mut("julie").unwrap().player.take_output();
        assert!(julie_out.is_empty(), "the actor is excluded");
        let max_out = fx.sessions.get_mut("max").unwrap().player.take_output();
        assert!(max_out.plain_text().contains("Julie grins at you."));
    }

    #[test]
    fn move_living_narrates_leave_and_arrive() {
        let mut fx = Fixture::new();
        let here = fx.world.add_location(Location::new("here", ""));
        let there = fx.world.add_location(Location::new("there", ""));
        let julie = fx
            .world
            .add_living(
                Living::new("julie", Gender::Female, "human")
                    .unwrap()
                    .with_title("Julie")
                    .as_player(),
                here,
            )
            .unwrap();
        let watcher = fx
            .world
            .add_living(
                Living::new("max", Gender::Male, "human").unwrap().as_player(),
                there,
            )
            .unwrap();
        let signal = Arc::new(Notify::new());
        let (io, _adapter) = ports::channel_io(signal);
        fx.sessions
            .insert(PlayerConnection::new("max", watcher, Box::new(io)));
        fx.ctx().move_living(julie, there, false).unwrap();
        let seen = fx.sessions.get_mut("max").unwrap().player.take_output();
        assert!(seen.plain_text().contains("Julie arrives."));
    }
}
