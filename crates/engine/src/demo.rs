//! The built-in demo story, and the registry that maps story names to
//! factories (stories are compiled in; the `--game` argument selects
//! one by directory name).

use std::collections::HashMap;
use std::path::Path;

use storyloom_domain::entities::{Containment, Exit, ExitTarget, Item, Living, Location};
use storyloom_domain::value_objects::Gender;
use storyloom_domain::{LivingId, World};

use crate::context::Context;
use crate::story::{GameMode, MoneyType, Story, StoryConfig, TickMethod};

pub struct DemoStory;

impl Story for DemoStory {
    fn config(&self) -> StoryConfig {
        StoryConfig {
            name: "Storyloom Demo".to_string(),
            author: "Otto".to_string(),
            author_address: "otto@example.invalid".to_string(),
            version: "1.0".to_string(),
            requires_engine: "0.1".to_string(),
            supported_modes: vec![GameMode::If, GameMode::Mud],
            player_name: None,
            player_gender: None,
            player_race: None,
            player_money: 15.5,
            money_type: MoneyType::Fantasy,
            server_tick_method: TickMethod::Timer,
            server_tick_time: 1.0,
            gametime_to_realtime: 5,
            max_wait_hours: 2,
            display_gametime: true,
            epoch: Some(crate::story::demo_epoch()),
            startlocation_player: "town square".to_string(),
            startlocation_wizard: "wizard tower".to_string(),
            savegames_enabled: true,
            show_exits_in_look: true,
            license_file: None,
            mud_host: Some("localhost".to_string()),
            mud_port: Some(8180),
        }
    }

    fn init(&mut self, world: &mut World) -> Result<(), String> {
        let square = world.add_location(
            Location::new(
                "town square",
                "The old town square of the village. It is not much really, and narrow \
                 streets quickly lead away from the small fountain in the center.",
            )
            .with_extra_desc(
                "fountain",
                "The fountain is old and the water has long since stopped flowing.",
            ),
        );
        let alley = world.add_location(Location::new(
            "alley of doors",
            "A long alley with numbered doors on both sides. It is dark here.",
        ));
        let pub_ = world.add_location(Location::new(
            "pub",
            "A cozy pub. It smells of beer and old wood in here.",
        ));
        let tower = world.add_location(Location::new(
            "wizard tower",
            "The dusty study at the top of the wizard tower. Books are stacked everywhere.",
        ));
        world
            .add_exit(
                square,
                Exit::new("north", "A street to the north leads to the pub.", ExitTarget::Bound(pub_)),
            )
            .map_err(|e| e.to_string())?;
        world
            .add_exit(
                square,
                Exit::new(
                    "east",
                    "To the east a long alley with doors stretches away.",
                    ExitTarget::Bound(alley),
                ),
            )
            .map_err(|e| e.to_string())?;
        world
            .add_exit(
                pub_,
                Exit::new("south", "The town square lies to the south.", ExitTarget::Unbound("town square".into())),
            )
            .map_err(|e| e.to_string())?;
        world
            .add_exit(
                alley,
                Exit::new("west", "The town square lies back west.", ExitTarget::Unbound("town square".into())),
            )
            .map_err(|e| e.to_string())?;
        world
            .add_exit(
                alley,
                Exit::new(
                    "door one",
                    "Door number one is the first door in the alley.",
                    ExitTarget::Bound(square),
                )
                .as_door(false, false),
            )
            .map_err(|e| e.to_string())?;
        world
            .add_exit(
                alley,
                Exit::new(
                    "door two",
                    "Door number two is right next to door one.",
                    ExitTarget::Bound(pub_),
                )
                .as_door(false, true),
            )
            .map_err(|e| e.to_string())?;
        world
            .add_exit(
                tower,
                Exit::new(
                    "down",
                    "A spiral staircase leads down to the town square.",
                    ExitTarget::Bound(square),
                ),
            )
            .map_err(|e| e.to_string())?;
        world
            .add_item(
                Item::new("newspaper")
                    .with_title("local newspaper")
                    .with_description(
                        "The newspaper reports the recent launch of a game engine. \
                         Historic times, it says.",
                    ),
                Containment::Location(square),
            )
            .map_err(|e| e.to_string())?;
        world
            .add_item(
                Item::new("mug")
                    .with_title("beer mug")
                    .with_alias("beer")
                    .with_description("A heavy glass mug, empty at the moment."),
                Containment::Location(pub_),
            )
            .map_err(|e| e.to_string())?;
        world
            .add_item(
                Item::new("satchel")
                    .with_title("worn satchel")
                    .as_container()
                    .with_description("A worn leather satchel with room for a few things."),
                Containment::Location(square),
            )
            .map_err(|e| e.to_string())?;
        world
            .add_living(
                Living::new("cat", Gender::Neuter, "cat")
                    .map_err(|e| e.to_string())?
                    .with_title("the hairy cat")
                    .with_description("A beautiful cat with a luxurious hairy tail."),
                square,
            )
            .map_err(|e| e.to_string())?;
        world
            .add_living(
                Living::new("barkeep", Gender::Male, "human")
                    .map_err(|e| e.to_string())?
                    .with_title("the barkeep")
                    .with_description("He polishes the same glass over and over."),
                pub_,
            )
            .map_err(|e| e.to_string())?;
        world
            .add_living(
                Living::new("dog", Gender::Male, "wolf")
                    .map_err(|e| e.to_string())?
                    .with_title("the mangy dog")
                    .with_description("A mangy dog guards the alley. It doesn't look friendly.")
                    .aggressive_living(),
                alley,
            )
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    fn init_player(&mut self, ctx: &mut Context<'_>, player: LivingId) {
        let money = ctx.config.player_money;
        if let Some(living) = ctx.world.living_mut(player) {
            if living.money() == 0.0 {
                living.set_money(money);
            }
        }
    }

    fn welcome(&mut self, ctx: &mut Context<'_>, player: LivingId) -> Option<String> {
        ctx.tell_player(player, "<bright>Welcome to 'Storyloom Demo'.</>");
        ctx.tell_player(player, "\n");
        Some("Press enter to start.".to_string())
    }

    fn custom_verbs(&self) -> HashMap<String, String> {
        let mut verbs = HashMap::new();
        verbs.insert("ponder-fountain".to_string(), "Ponder the fountain.".to_string());
        verbs
    }

    fn handle_custom_verb(
        &mut self,
        ctx: &mut Context<'_>,
        player: LivingId,
        verb: &str,
        _unparsed: &str,
    ) -> bool {
        if verb != "ponder-fountain" {
            return false;
        }
        let at_square = ctx
            .world
            .living(player)
            .and_then(|l| ctx.world.location(l.location()))
            .map(|loc| loc.name() == "town square")
            .unwrap_or(false);
        if !at_square {
            return false;
        }
        ctx.tell_player_end(
            player,
            "You ponder the dried up fountain. Whatever happened to its water?",
        );
        true
    }
}

/// Story registry: explicit name -> factory mapping, resolved against
/// the final component of the `--game` path.
pub fn load_story(game_path: &Path) -> Option<Box<dyn Story>> {
    let name = game_path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())?;
    match name.as_str() {
        "demo" | "storyloom-demo" | "." => Some(Box::new(DemoStory)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_world_builds_and_binds() {
        let mut story = DemoStory;
        let mut world = World::new();
        story.init(&mut world).unwrap();
        world.bind_exits().unwrap();
        world.validate_invariants().unwrap();
        let square = world.find_location("town square").unwrap();
        let exits = world.location(square).unwrap().exits().clone();
        assert!(exits.contains_key("north"));
        // the unbound pub exit now points back at the square
        let pub_ = world.find_location("pub").unwrap();
        let south = world.location(pub_).unwrap().exit("south").unwrap();
        assert_eq!(
            world.exit(south).unwrap().target_location(),
            Some(square)
        );
    }

    #[test]
    fn registry_knows_the_demo() {
        assert!(load_story(Path::new("stories/demo")).is_some());
        assert!(load_story(Path::new("stories/elsewhere")).is_none());
    }
}
