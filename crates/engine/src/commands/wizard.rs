//! The wizard (privileged) command set. All verbs are dispatched with
//! a "!" prefix and require the "wizard" privilege.

use chrono::NaiveTime;

use storyloom_domain::entities::Containment;
use storyloom_domain::soul::{ParseResult, TargetRef};
use storyloom_domain::{lang, LivingId, WorldError};

use crate::context::{Context, PendingAction};
use crate::pubsub::Listener;
use crate::scheduler::DeferredOwner;
use crate::story::GameMode;

use super::{AccountOp, CommandDef, CommandError, CommandOutcome};

pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        verb: "teleport",
        aliases: &["tp"],
        privilege: Some("wizard"),
        func: cmd_teleport,
        help: "Teleport to a location or to a player.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: true,
    },
    CommandDef {
        verb: "clone",
        aliases: &[],
        privilege: Some("wizard"),
        func: cmd_clone,
        help: "Clone an item into the current location.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "destroy",
        aliases: &["zap"],
        privilege: Some("wizard"),
        func: cmd_destroy,
        help: "Destroy an item or an NPC.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "wiretap",
        aliases: &[],
        privilege: Some("wizard"),
        func: cmd_wiretap,
        help: "Tap the messages of a living or location (or 'off').",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: true,
    },
    CommandDef {
        verb: "accounts",
        aliases: &[],
        privilege: Some("wizard"),
        func: cmd_accounts,
        help: "List the registered accounts.",
        enable_notify_action: false,
        disabled_in_mode: Some(GameMode::If),
        overrides_soul: false,
        no_soul_parse: true,
    },
    CommandDef {
        verb: "ban",
        aliases: &[],
        privilege: Some("wizard"),
        func: cmd_ban,
        help: "Ban a player account.",
        enable_notify_action: false,
        disabled_in_mode: Some(GameMode::If),
        overrides_soul: false,
        no_soul_parse: true,
    },
    CommandDef {
        verb: "unban",
        aliases: &[],
        privilege: Some("wizard"),
        func: cmd_unban,
        help: "Lift a player account ban.",
        enable_notify_action: false,
        disabled_in_mode: Some(GameMode::If),
        overrides_soul: false,
        no_soul_parse: true,
    },
    CommandDef {
        verb: "privs",
        aliases: &[],
        privilege: Some("wizard"),
        func: cmd_privs,
        help: "Set the privileges of an account: !privs name [wizard].",
        enable_notify_action: false,
        disabled_in_mode: Some(GameMode::If),
        overrides_soul: false,
        no_soul_parse: true,
    },
    CommandDef {
        verb: "clock",
        aliases: &[],
        privilege: Some("wizard"),
        func: cmd_clock,
        help: "Set the game clock: !clock 14:30:00.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: true,
    },
    CommandDef {
        verb: "server",
        aliases: &[],
        privilege: Some("wizard"),
        func: cmd_server,
        help: "Show server status.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "kick",
        aliases: &[],
        privilege: Some("wizard"),
        func: cmd_kick,
        help: "Forcibly disconnect a player.",
        enable_notify_action: false,
        disabled_in_mode: Some(GameMode::If),
        overrides_soul: false,
        no_soul_parse: true,
    },
];

fn single_arg(parsed: &ParseResult, usage: &str) -> Result<String, CommandError> {
    let arg = parsed.unparsed.trim();
    if arg.is_empty() {
        return Err(WorldError::parse(usage.to_string()).into());
    }
    Ok(arg.to_string())
}

fn cmd_teleport(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let target = single_arg(parsed, "Teleport where?")?;
    let destination = ctx.world.find_location(&target).or_else(|| {
        ctx.world
            .find_living(&target)
            .and_then(|id| ctx.world.living(id))
            .map(|l| l.location())
    });
    let Some(destination) = destination else {
        return Err(WorldError::refused("No such location or living.").into());
    };
    ctx.tell_others(actor, "{Actor} suddenly vanishes.");
    ctx.move_living(actor, destination, true)?;
    ctx.tell_others(actor, "{Actor} suddenly appears out of thin air.");
    ctx.look(actor, Some(true));
    Ok(CommandOutcome::Ok)
}

fn cmd_clone(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let Some(item_id) = parsed.first_item() else {
        return Err(WorldError::parse("Clone what?").into());
    };
    let Some(original) = ctx.world.item(item_id).cloned() else {
        return Err(WorldError::refused("It's no longer there.").into());
    };
    let location = ctx
        .world
        .living(actor)
        .map(|l| l.location())
        .ok_or_else(|| WorldError::refused("You are nowhere."))?;
    let title = original.title().to_string();
    ctx.world
        .add_item(original, Containment::Location(location))?;
    ctx.tell_player_end(actor, &format!("You cloned {}.", lang::a(&title)));
    ctx.tell_others(actor, &format!("{{Actor}} conjures up {}.", lang::a(&title)));
    Ok(CommandOutcome::Ok)
}

fn cmd_destroy(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    match parsed.who_order.first() {
        Some(TargetRef::Item(item)) => {
            let title = ctx
                .world
                .item(*item)
                .map(|i| i.title().to_string())
                .unwrap_or_default();
            ctx.world.destroy_item(*item);
            ctx.scheduler
                .remove_for_owner(&DeferredOwner::Item(*item));
            ctx.tell_player_end(actor, &format!("You destroyed {}.", title));
            Ok(CommandOutcome::Ok)
        }
        Some(TargetRef::Living(living)) => {
            let Some(target) = ctx.world.living(*living) else {
                return Err(WorldError::refused("They are no longer here.").into());
            };
            if target.is_player() {
                return Err(WorldError::refused("You can't destroy players.").into());
            }
            let title = target.title().to_string();
            ctx.world.destroy_living(*living);
            ctx.scheduler
                .remove_for_owner(&DeferredOwner::Living(*living));
            ctx.tell_player_end(
                actor,
                &format!("You destroyed {}. It ceased to exist.", title),
            );
            Ok(CommandOutcome::Ok)
        }
        _ => Err(WorldError::parse("Destroy what?").into()),
    }
}

fn cmd_wiretap(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let target = single_arg(parsed, "Wiretap whom or where? (or 'off')")?;
    let sink: std::sync::Arc<dyn Listener> = match ctx.sessions.by_living(actor) {
        Some(conn) => conn.wiretap_sink.clone(),
        None => return Err(WorldError::refused("You have no connection.").into()),
    };
    if target == "off" {
        ctx.pubsub.unsubscribe_all(&sink);
        ctx.tell_player_end(actor, "All wiretaps removed.");
        return Ok(CommandOutcome::Ok);
    }
    let location = ctx
        .world
        .living(actor)
        .map(|l| l.location())
        .ok_or_else(|| WorldError::refused("You are nowhere."))?;
    if let Some(living) = ctx.world.search_living(location, &target) {
        let name = ctx
            .world
            .living(living)
            .map(|l| l.name().to_string())
            .unwrap_or(target.clone());
        let topic = ctx.pubsub.topic(ctx.wiretap_living(&name));
        topic.subscribe(&sink);
        ctx.tell_player_end(actor, &format!("You installed a wiretap on {}.", name));
        return Ok(CommandOutcome::Ok);
    }
    if ctx.world.find_location(&target).is_some() {
        let topic = ctx.pubsub.topic(ctx.wiretap_location(&target));
        topic.subscribe(&sink);
        ctx.tell_player_end(actor, &format!("You installed a wiretap on {}.", target));
        return Ok(CommandOutcome::Ok);
    }
    Err(WorldError::refused("No such living or location.").into())
}

fn cmd_accounts(
    _ctx: &mut Context<'_>,
    _actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let filter = parsed.unparsed.trim();
    Ok(CommandOutcome::Account(AccountOp::List {
        having_privilege: if filter.is_empty() {
            None
        } else {
            Some(filter.to_string())
        },
    }))
}

fn cmd_ban(
    _ctx: &mut Context<'_>,
    _actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let name = single_arg(parsed, "Ban whom?")?;
    Ok(CommandOutcome::Account(AccountOp::Ban { name }))
}

fn cmd_unban(
    _ctx: &mut Context<'_>,
    _actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let name = single_arg(parsed, "Unban whom?")?;
    Ok(CommandOutcome::Account(AccountOp::Unban { name }))
}

fn cmd_privs(
    _ctx: &mut Context<'_>,
    _actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let args = single_arg(parsed, "Set whose privileges?")?;
    let mut words = args.split_whitespace();
    let Some(name) = words.next() else {
        return Err(WorldError::parse("Set whose privileges?").into());
    };
    let privileges: Vec<String> = words.map(str::to_string).collect();
    Ok(CommandOutcome::Account(AccountOp::SetPrivileges {
        name: name.to_string(),
        privileges,
    }))
}

fn cmd_clock(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let arg = single_arg(parsed, "Set the clock to what time?")?;
    let time = NaiveTime::parse_from_str(&arg, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(&arg, "%H:%M"))
        .map_err(|_| WorldError::parse("It's not clear what time you mean."))?;
    let new_clock = ctx
        .clock
        .clock()
        .date_naive()
        .and_time(time)
        .and_utc();
    let factor = ctx.clock.times_realtime();
    *ctx.clock = storyloom_domain::GameClock::new(new_clock, factor);
    let display = ctx.clock.to_string();
    ctx.tell_player_end(actor, &format!("Game time set to {}.", display));
    Ok(CommandOutcome::Ok)
}

fn cmd_server(
    ctx: &mut Context<'_>,
    actor: LivingId,
    _parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let uptime = ctx.uptime_secs as u64;
    let (hours, rest) = (uptime / 3600, uptime % 3600);
    let (minutes, seconds) = (rest / 60, rest % 60);
    let clock = ctx.clock.to_string();
    let players = ctx.sessions.len();
    let deferreds = ctx.scheduler.len();
    ctx.tell_player_end(actor, "Server status:");
    ctx.tell_player_end(
        actor,
        &format!("  uptime: {:02}:{:02}:{:02}", hours, minutes, seconds),
    );
    ctx.tell_player_end(actor, &format!("  game time: {}", clock));
    ctx.tell_player_end(
        actor,
        &format!(
            "  mode: {}, tick: {:.1}s, time factor: {}x",
            ctx.game_mode,
            ctx.config.server_tick_time,
            ctx.clock.times_realtime()
        ),
    );
    ctx.tell_player_end(actor, &format!("  players connected: {}", players));
    ctx.tell_player_end(actor, &format!("  deferreds pending: {}", deferreds));
    Ok(CommandOutcome::Ok)
}

fn cmd_kick(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let name = single_arg(parsed, "Kick whom?")?.to_lowercase();
    if ctx.sessions.get(&name).is_none() {
        return Err(WorldError::refused("No such player is logged in.").into());
    }
    let living = ctx.sessions.get(&name).map(|c| c.living());
    if let Some(living) = living {
        ctx.tell_player_end(living, "<it><rev>You have been kicked from the game by a wizard.</>");
    }
    ctx.pending_tell(PendingAction::Disconnect { conn: name.clone() });
    ctx.tell_player_end(actor, &format!("You kicked {} from the game.", name));
    Ok(CommandOutcome::Ok)
}
