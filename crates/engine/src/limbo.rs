//! The Limbo reaper: an NPC resident of the Limbo sentinel location
//! that warns and eventually evicts livings stuck there.

use std::collections::HashMap;

use storyloom_domain::entities::Living;
use storyloom_domain::value_objects::Gender;
use storyloom_domain::{lang, LivingId, LocationId};

use crate::context::PendingAction;
use crate::driver::Driver;
use crate::scheduler::{Deferred, DeferredOwner};

/// Real-time cadence of the reaper's sweep.
const REAP_INTERVAL_SECS: f64 = 3.0;

/// Residency thresholds (seconds) for the warning ladder and the
/// final eviction.
const WARN_1: f64 = 30.0;
const WARN_2: f64 = 50.0;
const WARN_3: f64 = 60.0;
const WARN_4: f64 = 63.0;
const EVICT: f64 = 64.0;

/// Tracking state: who is in Limbo since when, and how many warnings
/// they've seen.
#[derive(Debug, Default)]
pub struct LimboState {
    pub reaper: Option<LivingId>,
    candidates: HashMap<LivingId, (f64, u32)>,
}

impl LimboState {
    pub fn forget(&mut self, living: LivingId) {
        self.candidates.remove(&living);
    }
}

/// Create the reaper NPC in Limbo and schedule its periodic sweep.
pub fn install(driver: &mut Driver) -> anyhow::Result<()> {
    let reaper = Living::new("reaper", Gender::Male, "elemental")
        .map_err(|err| anyhow::anyhow!(err.to_string()))?
        .with_title("Grim Reaper")
        .with_alias("figure")
        .with_alias("death")
        .with_description(
            "He wears black robes with a hood. Where a face should be, there is only \
             nothingness. He is carrying a large ominous scythe that looks very, very sharp.",
        )
        .with_short_description("A figure clad in black, carrying a scythe, is also present.");
    let limbo = driver.world.limbo();
    let reaper_id = driver
        .world
        .add_living(reaper, limbo)
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    driver.limbo_state.reaper = Some(reaper_id);
    driver.register_action("limbo.reap", reap_action);
    driver
        .defer_periodical(
            REAP_INTERVAL_SECS,
            DeferredOwner::Living(reaper_id),
            "limbo.reap",
            Vec::new(),
        )
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    Ok(())
}

fn reap_action(driver: &mut Driver, _deferred: &Deferred) -> anyhow::Result<()> {
    let now = driver.uptime_secs();
    reap(driver, now);
    Ok(())
}

/// One sweep of the reaper, at the given monotonic time (seconds).
/// Separated from the deferred so tests can drive the clock.
pub fn reap(driver: &mut Driver, now: f64) {
    let Some(reaper) = driver.limbo_state.reaper else {
        return;
    };
    let limbo = driver.world.limbo();
    let reaper_title = driver
        .world
        .living(reaper)
        .map(|l| l.title().to_string())
        .unwrap_or_else(|| "Grim Reaper".to_string());

    // if the reaper got misplaced somehow, it teleports back
    let reaper_location = driver.world.living(reaper).map(|l| l.location());
    if reaper_location != Some(limbo) {
        driver.context().tell_others(
            reaper,
            "{Actor} looks around in wonder and says, \"I'm not supposed to be here.\"",
        );
        let _ = driver.world.move_living(reaper, limbo);
        return;
    }

    let in_limbo: Vec<LivingId> = driver
        .world
        .location(limbo)
        .map(|loc| {
            loc.livings()
                .iter()
                .filter(|id| **id != reaper)
                .copied()
                .collect()
        })
        .unwrap_or_default();

    for candidate in &in_limbo {
        driver
            .limbo_state
            .candidates
            .entry(*candidate)
            .or_insert((now, 0));
    }
    let stale: Vec<LivingId> = driver
        .limbo_state
        .candidates
        .keys()
        .filter(|id| !in_limbo.contains(id))
        .copied()
        .collect();
    for left in stale {
        driver.limbo_state.forget(left);
    }

    for candidate in in_limbo {
        let Some((first_seen, mut shown)) = driver.limbo_state.candidates.get(&candidate).copied()
        else {
            continue;
        };
        let duration = now - first_seen;
        let is_wizard = driver
            .world
            .living(candidate)
            .map(|l| l.is_wizard())
            .unwrap_or(false);
        // wizards get one polite notice and are never evicted
        if is_wizard {
            if duration >= 2.0 && shown < 1 {
                driver.context().tell_player_end(
                    candidate,
                    &format!(
                        "{} whispers: \"Hello there wizard. Please don't stay for too long.\"",
                        reaper_title
                    ),
                );
                shown = 99999;
            }
        } else if duration >= EVICT && shown >= 4 {
            let conn_name = driver
                .sessions
                .by_living(candidate)
                .map(|conn| conn.name.clone());
            if let Some(conn) = conn_name {
                driver
                    .pending_tells
                    .push_back(PendingAction::Disconnect { conn });
            }
            driver.limbo_state.forget(candidate);
            continue;
        } else if duration >= WARN_4 && shown < 4 {
            driver.context().tell_player_end(
                candidate,
                &format!(
                    "{} swings down his scythe and slices your soul cleanly in half. \
                     You are destroyed.",
                    reaper_title
                ),
            );
            shown = 4;
        } else if duration >= WARN_3 && shown < 3 {
            driver.context().tell_player_end(
                candidate,
                &format!("{} menacingly raises his scythe!", reaper_title),
            );
            shown = 3;
        } else if duration >= WARN_2 && shown < 2 {
            driver.context().tell_player_end(
                candidate,
                &format!(
                    "{} looms over you and warns: \"You really cannot stay here much longer!\"",
                    reaper_title
                ),
            );
            shown = 2;
        } else if duration >= WARN_1 && shown < 1 {
            driver.context().tell_player_end(
                candidate,
                &format!(
                    "{} whispers: \"Greetings. Be aware that you must not linger here... \
                     Decide swiftly...\"",
                    reaper_title
                ),
            );
            shown = 1;
        }
        driver
            .limbo_state
            .candidates
            .insert(candidate, (first_seen, shown));
    }
}

/// Location reaction to a player action: the reaper just stares.
pub fn notify_action(driver: &mut Driver, location: LocationId, actor: LivingId, verb: &str) {
    let Some(reaper) = driver.limbo_state.reaper else {
        return;
    };
    if driver.world.living(reaper).map(|l| l.location()) != Some(location) || actor == reaper {
        return;
    }
    let title = driver
        .world
        .living(reaper)
        .map(|l| lang::capital(l.title()))
        .unwrap_or_else(|| "The Grim Reaper".to_string());
    let message = if verb == "say" {
        format!("{} just stares blankly at you, not saying a word.", title)
    } else {
        format!("{} stares blankly at you.", title)
    };
    driver.context().tell_player_end(actor, &message);
}
