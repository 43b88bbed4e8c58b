//! Story configuration and the story contract.
//!
//! A story supplies the world content and a handful of lifecycle
//! hooks; the engine drives everything else. The configuration is
//! validated once at startup and again when a savegame is loaded.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use storyloom_domain::value_objects::MoneyKind;
use storyloom_domain::{Gender, LivingId, World};

use crate::context::Context;

/// if = single player interactive fiction, mud = multiplayer server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    If,
    Mud,
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameMode::If => write!(f, "if"),
            GameMode::Mud => write!(f, "mud"),
        }
    }
}

impl std::str::FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "if" => Ok(GameMode::If),
            "mud" => Ok(GameMode::Mud),
            other => Err(format!("invalid game mode: {}", other)),
        }
    }
}

/// How the server tick is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickMethod {
    /// The tick advances when the player enters a command.
    Command,
    /// The tick advances on a timer.
    Timer,
}

/// Money style of the story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoneyType {
    Modern,
    Fantasy,
    None,
}

impl MoneyType {
    pub fn kind(&self) -> Option<MoneyKind> {
        match self {
            MoneyType::Modern => Some(MoneyKind::Modern),
            MoneyType::Fantasy => Some(MoneyKind::Fantasy),
            MoneyType::None => None,
        }
    }
}

/// The configuration settings of a story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryConfig {
    pub name: String,
    pub author: String,
    pub author_address: String,
    /// Arbitrary, but used to check savegames for compatibility.
    pub version: String,
    pub requires_engine: String,
    pub supported_modes: Vec<GameMode>,
    /// Set a name to create a prebuilt player; None uses the builder.
    pub player_name: Option<String>,
    pub player_gender: Option<Gender>,
    pub player_race: Option<String>,
    pub player_money: f64,
    pub money_type: MoneyType,
    pub server_tick_method: TickMethod,
    /// Time between server ticks in seconds.
    pub server_tick_time: f64,
    /// Game time runs this many times faster than real time (>= 0).
    pub gametime_to_realtime: u32,
    /// Max number of game-time hours the player may 'wait' (>= 0).
    pub max_wait_hours: u32,
    pub display_gametime: bool,
    /// Start date/time of the game clock; None starts at server start.
    pub epoch: Option<DateTime<Utc>>,
    pub startlocation_player: String,
    pub startlocation_wizard: String,
    pub savegames_enabled: bool,
    pub show_exits_in_look: bool,
    pub license_file: Option<String>,
    pub mud_host: Option<String>,
    pub mud_port: Option<u16>,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            name: "Unnamed story".to_string(),
            author: "Anonymous".to_string(),
            author_address: String::new(),
            version: "1.0".to_string(),
            requires_engine: "0.1".to_string(),
            supported_modes: vec![GameMode::If],
            player_name: None,
            player_gender: None,
            player_race: None,
            player_money: 0.0,
            money_type: MoneyType::None,
            server_tick_method: TickMethod::Command,
            server_tick_time: 5.0,
            gametime_to_realtime: 1,
            max_wait_hours: 2,
            display_gametime: false,
            epoch: None,
            startlocation_player: String::new(),
            startlocation_wizard: String::new(),
            savegames_enabled: true,
            show_exits_in_look: true,
            license_file: None,
            mud_host: None,
            mud_port: None,
        }
    }
}

impl StoryConfig {
    /// Validate the configuration for the selected game mode.
    /// The command tick method forces a 1:1 game time factor: every
    /// entered command advances the clock by exactly one tick.
    pub fn validate(&mut self, mode: GameMode) -> Result<(), String> {
        if self.supported_modes.is_empty() {
            return Err("story supports no game modes".to_string());
        }
        if !self.supported_modes.contains(&mode) {
            return Err(format!("driver mode '{}' not supported by this story", mode));
        }
        if mode != GameMode::If && self.server_tick_method == TickMethod::Command {
            return Err("'command' tick method can only be used in 'if' game mode".to_string());
        }
        if self.server_tick_time <= 0.0 {
            return Err("server tick time must be positive".to_string());
        }
        if self.server_tick_method == TickMethod::Command {
            self.gametime_to_realtime = 1;
        }
        if self.startlocation_player.is_empty() {
            return Err("story must name a player start location".to_string());
        }
        if mode == GameMode::Mud && (self.mud_host.is_none() || self.mud_port.is_none()) {
            return Err("mud mode requires mud_host and mud_port".to_string());
        }
        if self.startlocation_wizard.is_empty() {
            self.startlocation_wizard = self.startlocation_player.clone();
        }
        Ok(())
    }

    pub fn epoch_or(&self, fallback: DateTime<Utc>) -> DateTime<Utc> {
        self.epoch.unwrap_or(fallback)
    }
}

/// The story contract: configuration plus lifecycle hooks.
pub trait Story: Send {
    fn config(&self) -> StoryConfig;

    /// Populate the world. Called once when the driver starts.
    fn init(&mut self, world: &mut World) -> Result<(), String>;

    /// Called when a player object has been fully created.
    fn init_player(&mut self, ctx: &mut Context<'_>, player: LivingId) {
        let _ = (ctx, player);
    }

    /// Welcome text for a new game. An optional returned prompt pauses
    /// until the player presses enter.
    fn welcome(&mut self, ctx: &mut Context<'_>, player: LivingId) -> Option<String> {
        let name = ctx.config.name.clone();
        ctx.tell_player(player, &format!("<bright>Welcome to '{}'.</>", name));
        ctx.tell_player(player, "\n");
        Some("Press enter to start.".to_string())
    }

    /// Welcome text after loading a saved game.
    fn welcome_savegame(&mut self, ctx: &mut Context<'_>, player: LivingId) -> Option<String> {
        let name = ctx.config.name.clone();
        ctx.tell_player(player, &format!("<bright>Welcome back to '{}'.</>", name));
        ctx.tell_player(player, "\n");
        Some("Press enter to continue where you were before.".to_string())
    }

    /// Goodbye text when a player quits.
    fn goodbye(&mut self, ctx: &mut Context<'_>, player: LivingId) {
        ctx.tell_player(player, "Goodbye! We hope you enjoyed playing.");
        ctx.tell_player(player, "\n");
    }

    /// Finale when the player completes the story.
    fn completion(&mut self, ctx: &mut Context<'_>, player: LivingId) {
        ctx.tell_player(player, "<bright>Congratulations! You've finished the game!</>");
    }

    /// Custom verbs this story understands, mapped to help text.
    fn custom_verbs(&self) -> HashMap<String, String> {
        HashMap::new()
    }

    /// Handle a custom verb; return true when it was handled.
    fn handle_custom_verb(
        &mut self,
        ctx: &mut Context<'_>,
        player: LivingId,
        verb: &str,
        unparsed: &str,
    ) -> bool {
        let _ = (ctx, player, verb, unparsed);
        false
    }
}

/// Default epoch used by the built-in demo story.
pub fn demo_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2012, 4, 19, 14, 0, 0).single().unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_tick_forces_unit_time_factor() {
        let mut config = StoryConfig {
            startlocation_player: "town.square".into(),
            gametime_to_realtime: 99,
            ..StoryConfig::default()
        };
        config.validate(GameMode::If).unwrap();
        assert_eq!(config.gametime_to_realtime, 1);
        assert_eq!(config.startlocation_wizard, "town.square");
    }

    #[test]
    fn mud_mode_needs_host_port_and_support() {
        let mut config = StoryConfig {
            startlocation_player: "town.square".into(),
            server_tick_method: TickMethod::Timer,
            ..StoryConfig::default()
        };
        assert!(config.validate(GameMode::Mud).is_err());
        config.supported_modes = vec![GameMode::If, GameMode::Mud];
        assert!(config.validate(GameMode::Mud).is_err()); // missing host/port
        config.mud_host = Some("localhost".into());
        config.mud_port = Some(8180);
        config.validate(GameMode::Mud).unwrap();
    }

    #[test]
    fn command_tick_is_if_only() {
        let mut config = StoryConfig {
            startlocation_player: "town.square".into(),
            supported_modes: vec![GameMode::If, GameMode::Mud],
            mud_host: Some("localhost".into()),
            mud_port: Some(8180),
            ..StoryConfig::default()
        };
        assert!(config.validate(GameMode::Mud).is_err());
    }
}
