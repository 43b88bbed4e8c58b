//! The normal (unprivileged) command set.

use chrono::Duration;
use rand::Rng;

use storyloom_domain::entities::Containment;
use storyloom_domain::soul::{ParseResult, TargetRef};
use storyloom_domain::{lang, LivingId, LocationId, WorldError};

use crate::context::{Context, PendingAction};
use crate::dialog::DialogState;
use crate::story::GameMode;

use super::{CommandDef, CommandError, CommandOutcome};

pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        verb: "look",
        aliases: &[],
        privilege: None,
        func: cmd_look,
        help: "Look around in your surroundings.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "examine",
        aliases: &["ex"],
        privilege: None,
        func: cmd_examine,
        help: "Examine something or someone more closely.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "inventory",
        aliases: &[],
        privilege: None,
        func: cmd_inventory,
        help: "Show what you are carrying.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "take",
        aliases: &["get"],
        privilege: None,
        func: cmd_take,
        help: "Take an item from your surroundings.",
        enable_notify_action: true,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "drop",
        aliases: &[],
        privilege: None,
        func: cmd_drop,
        help: "Drop an item you are carrying.",
        enable_notify_action: true,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "put",
        aliases: &[],
        privilege: None,
        func: cmd_put,
        help: "Put an item in a container.",
        enable_notify_action: true,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "give",
        aliases: &[],
        privilege: None,
        func: cmd_give,
        help: "Give an item to someone.",
        enable_notify_action: true,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "open",
        aliases: &[],
        privilege: None,
        func: cmd_open,
        help: "Open a door.",
        enable_notify_action: true,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "close",
        aliases: &[],
        privilege: None,
        func: cmd_close,
        help: "Close a door.",
        enable_notify_action: true,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "lock",
        aliases: &[],
        privilege: None,
        func: cmd_lock,
        help: "Lock a door.",
        enable_notify_action: true,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "unlock",
        aliases: &[],
        privilege: None,
        func: cmd_unlock,
        help: "Unlock a door.",
        enable_notify_action: true,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "say",
        aliases: &[],
        privilege: None,
        func: cmd_say,
        help: "Say something out loud.",
        enable_notify_action: true,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: true,
    },
    CommandDef {
        verb: "emote",
        aliases: &[],
        privilege: None,
        func: cmd_emote,
        help: "Emote a custom action.",
        enable_notify_action: true,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: true,
    },
    CommandDef {
        verb: "tell",
        aliases: &[],
        privilege: None,
        func: cmd_tell,
        help: "Tell something to someone privately.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: true,
    },
    CommandDef {
        verb: "search",
        aliases: &["locate", "find"],
        privilege: None,
        func: cmd_search,
        help: "Search for an item around you.",
        enable_notify_action: true,
        disabled_in_mode: None,
        overrides_soul: true,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "dice",
        aliases: &["roll"],
        privilege: None,
        func: cmd_dice,
        help: "Roll a six-sided die. The familiar '3d6' style works too.",
        enable_notify_action: true,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "wait",
        aliases: &[],
        privilege: None,
        func: cmd_wait,
        help: "Let some time pass.",
        enable_notify_action: false,
        disabled_in_mode: Some(GameMode::Mud),
        overrides_soul: true,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "save",
        aliases: &[],
        privilege: None,
        func: cmd_save,
        help: "Save your progress.",
        enable_notify_action: false,
        disabled_in_mode: Some(GameMode::Mud),
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "quit",
        aliases: &[],
        privilege: None,
        func: cmd_quit,
        help: "Leave the game.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "who",
        aliases: &[],
        privilege: None,
        func: cmd_who,
        help: "Show who is playing.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "brief",
        aliases: &[],
        privilege: None,
        func: cmd_brief,
        help: "Toggle brief location descriptions.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "hint",
        aliases: &[],
        privilege: None,
        func: cmd_hint,
        help: "Ask for a hint.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "recap",
        aliases: &[],
        privilege: None,
        func: cmd_recap,
        help: "Recap what has happened so far.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "money",
        aliases: &[],
        privilege: None,
        func: cmd_money,
        help: "Count your money.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "time",
        aliases: &["date"],
        privilege: None,
        func: cmd_time,
        help: "Show the game time.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "motd",
        aliases: &[],
        privilege: None,
        func: cmd_motd,
        help: "Show the message of the day.",
        enable_notify_action: false,
        disabled_in_mode: Some(GameMode::If),
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "help",
        aliases: &[],
        privilege: None,
        func: cmd_help,
        help: "Show available commands.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
    CommandDef {
        verb: "style",
        aliases: &[],
        privilege: None,
        func: cmd_style,
        help: "Toggle text styles on your screen.",
        enable_notify_action: false,
        disabled_in_mode: None,
        overrides_soul: false,
        no_soul_parse: false,
    },
];

fn location_of(ctx: &Context<'_>, actor: LivingId) -> Result<LocationId, CommandError> {
    ctx.world
        .living(actor)
        .map(|l| l.location())
        .ok_or_else(|| WorldError::refused("You are nowhere.").into())
}

fn first_arg<'p>(parsed: &'p ParseResult, what: &str) -> Result<&'p str, CommandError> {
    parsed
        .args
        .first()
        .map(String::as_str)
        .ok_or_else(|| WorldError::parse(format!("{} what?", what)).into())
}

fn cmd_look(
    ctx: &mut Context<'_>,
    actor: LivingId,
    _parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    ctx.look(actor, None);
    Ok(CommandOutcome::Ok)
}

fn cmd_examine(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    if let Some(target) = parsed.who_order.first() {
        match target {
            TargetRef::Living(id) => {
                let Some(living) = ctx.world.living(*id) else {
                    return Err(WorldError::refused("They are no longer here.").into());
                };
                let title = living.title().to_string();
                let description = living.description().to_string();
                ctx.tell_player_end(actor, &format!("This is {}.", title));
                if !description.is_empty() {
                    ctx.tell_player_end(actor, &description);
                }
            }
            TargetRef::Item(id) => {
                let Some(item) = ctx.world.item(*id) else {
                    return Err(WorldError::refused("It's no longer there.").into());
                };
                let text = if item.description().is_empty() {
                    format!("You see {}.", lang::a(item.title()))
                } else {
                    item.description().to_string()
                };
                ctx.tell_player_end(actor, &text);
            }
            TargetRef::Exit(id) => {
                let Some(exit) = ctx.world.exit(*id) else {
                    return Err(WorldError::refused("It's no longer there.").into());
                };
                let text = exit.long_description();
                ctx.tell_player_end(actor, &text);
            }
        }
        return Ok(CommandOutcome::Ok);
    }
    let keyword = first_arg(parsed, "Examine")?;
    match ctx.world.search_extradesc(actor, keyword) {
        Some(description) => {
            ctx.tell_player_end(actor, &description);
            Ok(CommandOutcome::Ok)
        }
        None => Err(WorldError::parse(format!("You see no {}.", keyword)).into()),
    }
}

fn cmd_inventory(
    ctx: &mut Context<'_>,
    actor: LivingId,
    _parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let Some(living) = ctx.world.living(actor) else {
        return Err(WorldError::refused("You are nowhere.").into());
    };
    let titles: Vec<String> = living
        .inventory()
        .iter()
        .filter_map(|id| ctx.world.item(*id).map(|i| lang::a(i.title())))
        .collect();
    let money = living.money();
    if titles.is_empty() {
        ctx.tell_player_end(actor, "You are carrying nothing.");
    } else {
        ctx.tell_player_end(actor, "You are carrying:");
        for title in titles {
            ctx.tell_player_end(actor, &format!("  {}", title));
        }
    }
    if let Some(fmt) = ctx.money_formatter() {
        ctx.tell_player_end(actor, &format!("You have {}.", fmt.display(money)));
    }
    Ok(CommandOutcome::Ok)
}

fn cmd_take(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let item_id = match parsed.first_item() {
        Some(id) => id,
        None => {
            let name = first_arg(parsed, "Take")?;
            return Err(WorldError::parse(format!("You don't see {} here.", name)).into());
        }
    };
    let location = location_of(ctx, actor)?;
    let in_room = ctx
        .world
        .item(item_id)
        .map(|i| i.containment() == Containment::Location(location))
        .unwrap_or(false);
    if !in_room {
        return Err(WorldError::refused("You already have it.").into());
    }
    let title = ctx
        .world
        .item(item_id)
        .map(|i| i.title().to_string())
        .unwrap_or_default();
    ctx.world
        .move_item(item_id, Containment::Living(actor), actor, false)?;
    ctx.tell_player_end(actor, &format!("You take {}.", title));
    ctx.tell_others(actor, &format!("{{Actor}} takes {}.", title));
    Ok(CommandOutcome::Ok)
}

fn cmd_drop(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let item_id = match parsed.first_item() {
        Some(id) => id,
        None => {
            let name = first_arg(parsed, "Drop")?;
            return Err(WorldError::parse(format!("You don't have {}.", name)).into());
        }
    };
    let carried = ctx
        .world
        .item(item_id)
        .map(|i| i.containment() == Containment::Living(actor))
        .unwrap_or(false);
    if !carried {
        return Err(WorldError::refused("You don't have it.").into());
    }
    let location = location_of(ctx, actor)?;
    let title = ctx
        .world
        .item(item_id)
        .map(|i| i.title().to_string())
        .unwrap_or_default();
    ctx.world
        .move_item(item_id, Containment::Location(location), actor, false)?;
    ctx.tell_player_end(actor, &format!("You drop {}.", title));
    ctx.tell_others(actor, &format!("{{Actor}} drops {}.", title));
    Ok(CommandOutcome::Ok)
}

fn cmd_put(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let items: Vec<_> = parsed
        .who_order
        .iter()
        .filter_map(|t| match t {
            TargetRef::Item(id) => Some(*id),
            _ => None,
        })
        .collect();
    if items.len() < 2 {
        return Err(WorldError::parse("Put what where?").into());
    }
    let (item_id, container_id) = (items[0], items[1]);
    let item_title = ctx
        .world
        .item(item_id)
        .map(|i| i.title().to_string())
        .unwrap_or_default();
    let container_title = ctx
        .world
        .item(container_id)
        .map(|i| i.title().to_string())
        .unwrap_or_default();
    ctx.world
        .move_item(item_id, Containment::Item(container_id), actor, false)?;
    ctx.tell_player_end(
        actor,
        &format!("You put {} in {}.", item_title, container_title),
    );
    ctx.tell_others(
        actor,
        &format!("{{Actor}} puts {} in {}.", item_title, container_title),
    );
    Ok(CommandOutcome::Ok)
}

fn cmd_give(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let item_id = parsed
        .first_item()
        .ok_or_else(|| WorldError::parse("Give what to whom?"))?;
    let target = parsed
        .who_order
        .iter()
        .find_map(|t| match t {
            TargetRef::Living(id) if *id != actor => Some(*id),
            _ => None,
        })
        .ok_or_else(|| WorldError::parse("Give it to whom?"))?;
    let item_title = ctx
        .world
        .item(item_id)
        .map(|i| i.title().to_string())
        .unwrap_or_default();
    let target_title = ctx
        .world
        .living(target)
        .map(|l| l.title().to_string())
        .unwrap_or_default();
    ctx.world
        .move_item(item_id, Containment::Living(target), actor, false)?;
    ctx.tell_player_end(
        actor,
        &format!("You give {} to {}.", item_title, target_title),
    );
    ctx.tell_location(
        location_of(ctx, actor)?,
        &format!(
            "{} gives {} to {}.",
            titled(ctx, actor),
            item_title,
            target_title
        ),
        Some(actor),
        &[target],
        &format!("{} gives you {}.", titled(ctx, actor), item_title),
    );
    Ok(CommandOutcome::Ok)
}

fn titled(ctx: &Context<'_>, living: LivingId) -> String {
    ctx.world
        .living(living)
        .map(|l| lang::capital(l.title()))
        .unwrap_or_else(|| "Someone".to_string())
}

fn door_command(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
    verb: &str,
    apply: fn(&mut storyloom_domain::Exit) -> Result<(), WorldError>,
    done: &str,
) -> Result<CommandOutcome, CommandError> {
    let Some(exit_id) = parsed.first_exit() else {
        return Err(WorldError::parse(format!("{} what?", lang::capital(verb))).into());
    };
    let direction = {
        let exit = ctx
            .world
            .exit_mut(exit_id)
            .ok_or_else(|| WorldError::refused("It's no longer there."))?;
        apply(exit)?;
        exit.direction().to_string()
    };
    ctx.tell_player_end(actor, done);
    ctx.tell_others(actor, &format!("{{Actor}} {}s the exit {}.", verb, direction));
    Ok(CommandOutcome::Ok)
}

fn cmd_open(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    door_command(ctx, actor, parsed, "open", |e| e.open(), "You opened it.")
}

fn cmd_close(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    door_command(ctx, actor, parsed, "close", |e| e.close(), "You closed it.")
}

fn cmd_lock(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    door_command(ctx, actor, parsed, "lock", |e| e.lock(), "You locked it.")
}

fn cmd_unlock(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    door_command(ctx, actor, parsed, "unlock", |e| e.unlock(), "You unlocked it.")
}

fn cmd_say(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let text = parsed.unparsed.trim();
    if text.is_empty() {
        return Err(WorldError::parse("Say what?").into());
    }
    let location = location_of(ctx, actor)?;
    ctx.tell_player_end(actor, &format!("You say: {}", text));
    ctx.tell_location(
        location,
        &format!("{} says: {}", titled(ctx, actor), text),
        Some(actor),
        &[],
        "",
    );
    Ok(CommandOutcome::Ok)
}

fn cmd_emote(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let text = parsed.unparsed.trim();
    if text.is_empty() {
        return Err(WorldError::parse("Emote what?").into());
    }
    let location = location_of(ctx, actor)?;
    let message = lang::fullstop(&format!("{} {}", titled(ctx, actor), text));
    ctx.tell_player_end(actor, &message);
    ctx.tell_location(location, &message, Some(actor), &[], "");
    Ok(CommandOutcome::Ok)
}

fn cmd_tell(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let text = parsed.unparsed.trim();
    let Some((name, message)) = text.split_once(char::is_whitespace) else {
        return Err(WorldError::parse("Tell whom what?").into());
    };
    let message = message.trim();
    if message.is_empty() {
        return Err(WorldError::parse("Tell whom what?").into());
    }
    let location = location_of(ctx, actor)?;
    // someone nearby, or a player logged in elsewhere
    let target = ctx
        .world
        .search_living(location, name)
        .or_else(|| {
            ctx.sessions
                .get(&name.to_lowercase())
                .map(|conn| conn.living())
        });
    let Some(target) = target else {
        return Err(WorldError::parse(format!("{} is not here.", lang::capital(name))).into());
    };
    if target == actor {
        return Err(WorldError::refused("You talk to yourself for a bit.").into());
    }
    ctx.tell_player_end(actor, &format!("You tell {}: {}", name, message));
    // delivered at the end of the loop, not in the middle of the
    // target's own output
    let delivery = format!("{} tells you: {}", titled(ctx, actor), message);
    ctx.pending_tell(PendingAction::Tell {
        living: target,
        message: delivery,
    });
    Ok(CommandOutcome::Ok)
}

fn cmd_search(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let name = match parsed.args.first() {
        Some(name) => name.clone(),
        None => return Err(WorldError::parse("Search for what?").into()),
    };
    match ctx.world.locate_item(actor, &name, true, true, true) {
        Some((item, Containment::Living(holder))) if holder == actor => {
            let title = item_title(ctx, item);
            ctx.tell_player_end(actor, &format!("({} was found in your inventory).", title));
        }
        Some((item, Containment::Location(_))) => {
            let title = item_title(ctx, item);
            ctx.tell_player_end(
                actor,
                &format!("({} was found in your current location).", title),
            );
        }
        Some((item, Containment::Item(container))) => {
            let title = item_title(ctx, item);
            let container_title = item_title(ctx, container);
            ctx.tell_player_end(
                actor,
                &format!(
                    "({} was found in {}, in your inventory).",
                    title, container_title
                ),
            );
        }
        Some((item, _)) => {
            let title = item_title(ctx, item);
            ctx.tell_player_end(actor, &format!("(It's not clear where {} is).", title));
        }
        None => {
            ctx.tell_player_end(actor, &format!("(It's not clear where {} is).", name));
        }
    }
    Ok(CommandOutcome::Ok)
}

fn item_title(ctx: &Context<'_>, item: storyloom_domain::ItemId) -> String {
    ctx.world
        .item(item)
        .map(|i| i.name().to_string())
        .unwrap_or_else(|| "it".to_string())
}

/// Parse a dice specification like "3d6".
fn parse_dice(arg: &str) -> Result<(u64, u64), WorldError> {
    let error = || WorldError::parse("That is not a valid dice specification.");
    let (number, sides) = arg.split_once('d').ok_or_else(error)?;
    let number: u64 = number.parse().map_err(|_| error())?;
    let sides: u64 = sides.parse().map_err(|_| error())?;
    if !(1..=300).contains(&number) || sides < 2 {
        return Err(error());
    }
    Ok((number, sides))
}

fn cmd_dice(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    if parsed.args.is_empty() && parsed.verb == "roll" {
        // bare "roll" is the eye-rolling emote
        return Err(CommandError::RetrySoul);
    }
    let (number, sides) = match parsed.args.first() {
        None => (1, 6),
        Some(arg) => parse_dice(arg)?,
    };
    let mut rng = rand::thread_rng();
    let values: Vec<u64> = (0..number).map(|_| rng.gen_range(1..=sides)).collect();
    let total: u64 = values.iter().sum();
    let throws = lang::join_and(values.iter().map(u64::to_string).collect::<Vec<_>>());
    if number == 1 {
        ctx.tell_player_end(actor, &format!("You roll a die. It shows {}.", throws));
    } else {
        ctx.tell_player_end(
            actor,
            &format!("You roll {}d{}: {} (total {}).", number, sides, throws, total),
        );
    }
    ctx.tell_others(actor, &format!("{{Actor}} rolls {}d{}.", number, sides));
    Ok(CommandOutcome::Ok)
}

/// Parse a duration from words: "1h 30m 15s", "2 hours", "90 minutes".
fn parse_duration(args: &[String]) -> Result<Duration, WorldError> {
    let mut hours = 0f64;
    let mut minutes = 0f64;
    let mut seconds = 0f64;
    let mut number: Option<f64> = None;
    for arg in args {
        let arg = arg.as_str();
        if arg.len() >= 2 && (arg.ends_with('h') || arg.ends_with('m') || arg.ends_with('s')) {
            if let Ok(value) = arg[..arg.len() - 1].parse::<f64>() {
                match arg.as_bytes()[arg.len() - 1] {
                    b'h' => hours = value,
                    b'm' => minutes = value,
                    _ => seconds = value,
                }
                continue;
            }
        }
        match arg {
            "hours" | "hour" | "h" => {
                hours = number.take().unwrap_or(0.0);
            }
            "minutes" | "minute" | "min" | "m" => {
                minutes = number.take().unwrap_or(0.0);
            }
            "seconds" | "second" | "sec" | "s" => {
                seconds = number.take().unwrap_or(0.0);
            }
            _ => match arg.parse::<f64>() {
                Ok(value) => number = Some(value),
                Err(_) => {
                    return Err(WorldError::parse("It's not clear what duration you mean."))
                }
            },
        }
    }
    let total = hours * 3600.0 + minutes * 60.0 + seconds;
    if total <= 0.0 {
        return Err(WorldError::parse("It's not clear what duration you mean."));
    }
    Ok(Duration::milliseconds((total * 1000.0) as i64))
}

fn cmd_wait(
    ctx: &mut Context<'_>,
    _actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let duration = if parsed.args.is_empty() {
        // a little while
        Duration::minutes(10)
    } else {
        parse_duration(&parsed.args)?
    };
    let max = Duration::hours(ctx.config.max_wait_hours as i64);
    if ctx.config.max_wait_hours > 0 && duration > max {
        return Err(WorldError::refused("You can't wait that long.").into());
    }
    Ok(CommandOutcome::Wait(duration))
}

fn cmd_save(
    ctx: &mut Context<'_>,
    actor: LivingId,
    _parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    if !ctx.config.savegames_enabled {
        ctx.tell_player_end(actor, "It is not possible to save your progress.");
        return Ok(CommandOutcome::Ok);
    }
    Ok(CommandOutcome::Save)
}

fn cmd_quit(
    _ctx: &mut Context<'_>,
    _actor: LivingId,
    _parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    Ok(CommandOutcome::Dialog(DialogState::QuitConfirm))
}

fn cmd_who(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    if parsed.args == ["am", "i"] {
        return Err(CommandError::Retry("examine myself".to_string()));
    }
    if ctx.game_mode == GameMode::If {
        ctx.tell_player_end(actor, "You are all alone in this world.");
        return Ok(CommandOutcome::Ok);
    }
    let mut names = ctx.sessions.names();
    names.sort();
    let count = names.len();
    ctx.tell_player_end(
        actor,
        &format!(
            "There {} {} {} logged in:",
            if count == 1 { "is" } else { "are" },
            count,
            lang::pluralize("player", count as u64)
        ),
    );
    ctx.tell_player_end(actor, &lang::join_and(names));
    Ok(CommandOutcome::Ok)
}

fn cmd_brief(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let mode = parsed.args.first().map(String::as_str).unwrap_or("");
    let (brief, message) = match mode {
        "" | "on" => (
            1,
            "Brief mode enabled: known locations get short descriptions.",
        ),
        "all" | "full" => (2, "Brief mode enabled for all locations."),
        "off" => (0, "Brief mode disabled."),
        _ => {
            return Err(
                WorldError::parse("That's not recognized; use brief, brief all, or brief off.")
                    .into(),
            )
        }
    };
    if let Some(conn) = ctx.sessions.by_living(actor) {
        conn.player.brief = brief;
    }
    ctx.tell_player_end(actor, message);
    Ok(CommandOutcome::Ok)
}

fn cmd_hint(
    ctx: &mut Context<'_>,
    actor: LivingId,
    _parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let location = location_of(ctx, actor)?;
    let hint = ctx
        .sessions
        .by_living(actor)
        .and_then(|conn| conn.player.hints.hint(location).map(str::to_string));
    match hint {
        Some(text) => ctx.tell_player_end(actor, &text),
        None => ctx.tell_player_end(
            actor,
            "You have to think for yourself; there are no hints available.",
        ),
    }
    Ok(CommandOutcome::Ok)
}

fn cmd_recap(
    ctx: &mut Context<'_>,
    actor: LivingId,
    _parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let recap: Vec<String> = ctx
        .sessions
        .by_living(actor)
        .map(|conn| conn.player.hints.recap().to_vec())
        .unwrap_or_default();
    if recap.is_empty() {
        ctx.tell_player_end(actor, "There's nothing to recap yet.");
    } else {
        for line in recap {
            ctx.tell_player_end(actor, &line);
        }
    }
    Ok(CommandOutcome::Ok)
}

fn cmd_money(
    ctx: &mut Context<'_>,
    actor: LivingId,
    _parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let Some(fmt) = ctx.money_formatter() else {
        return Err(WorldError::refused("There is no money in this world.").into());
    };
    let money = ctx.world.living(actor).map(|l| l.money()).unwrap_or(0.0);
    ctx.tell_player_end(actor, &format!("You have {}.", fmt.display(money)));
    Ok(CommandOutcome::Ok)
}

fn cmd_time(
    ctx: &mut Context<'_>,
    actor: LivingId,
    _parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let is_wizard = ctx
        .world
        .living(actor)
        .map(|l| l.is_wizard())
        .unwrap_or(false);
    if !ctx.config.display_gametime && !is_wizard {
        return Err(WorldError::refused("You have no idea what time it is.").into());
    }
    let clock = ctx.clock.to_string();
    ctx.tell_player_end(actor, &format!("Game time: {}", clock));
    Ok(CommandOutcome::Ok)
}

fn cmd_motd(
    ctx: &mut Context<'_>,
    actor: LivingId,
    _parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    ctx.tell_player_end(actor, "There's currently no message-of-the-day.");
    Ok(CommandOutcome::Ok)
}

fn cmd_help(
    ctx: &mut Context<'_>,
    actor: LivingId,
    parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let _ = parsed;
    ctx.tell_player_end(actor, "You can use the following commands:");
    // the registry itself is not in the context; list the static table
    let mut verbs: Vec<&str> = COMMANDS.iter().map(|def| def.verb).collect();
    verbs.sort_unstable();
    ctx.tell_player_end(actor, &verbs.join(", "));
    ctx.tell_player_end(
        actor,
        "Besides those there are many social actions: smile, grin, wave, and so on.",
    );
    Ok(CommandOutcome::Ok)
}

fn cmd_style(
    ctx: &mut Context<'_>,
    actor: LivingId,
    _parsed: &ParseResult,
) -> Result<CommandOutcome, CommandError> {
    let enabled = match ctx.sessions.by_living(actor) {
        Some(conn) => {
            conn.player.screen_styles_enabled = !conn.player.screen_styles_enabled;
            conn.player.screen_styles_enabled
        }
        None => return Ok(CommandOutcome::Ok),
    };
    ctx.tell_player_end(
        actor,
        if enabled {
            "Text styles are now enabled."
        } else {
            "Text styles are now disabled."
        },
    );
    Ok(CommandOutcome::Ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_parse_in_both_notations() {
        let args = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(
            parse_duration(&args(&["1h", "30m", "15s"])).unwrap(),
            Duration::seconds(3600 + 1800 + 15)
        );
        assert_eq!(
            parse_duration(&args(&["2", "hours"])).unwrap(),
            Duration::hours(2)
        );
        assert_eq!(
            parse_duration(&args(&["90", "minutes"])).unwrap(),
            Duration::minutes(90)
        );
        assert!(parse_duration(&args(&["sideways"])).is_err());
        assert!(parse_duration(&args(&[])).is_err());
    }
}
