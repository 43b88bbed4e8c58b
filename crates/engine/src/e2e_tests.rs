//! End-to-end tests driving the full engine: login dialogs, command
//! dispatch, ticks, the reaper, and savegames, all against the
//! built-in demo story.

use std::sync::Mutex;

use chrono::Duration;

use storyloom_shared::OutputRegion;

use crate::demo::DemoStory;
use crate::dialog::DialogState;
use crate::driver::Driver;
use crate::limbo;
use crate::ports;
use crate::scheduler::DeferredOwner;
use crate::story::GameMode;

struct TestGame {
    driver: Driver,
    story: DemoStory,
    conn: String,
}

impl TestGame {
    /// A fresh single player game with the console player "julie"
    /// fully logged in.
    async fn started() -> Self {
        let mut game = Self::connected(GameMode::If).await;
        let conn = game.conn.clone();
        let TestGame { driver, story, .. } = &mut game;
        crate::driver::begin_if_login(driver, story, &conn).await;
        game.answer("n").await; // don't load a saved game
        game.answer("Julie").await;
        game.answer("f").await;
        game.answer("human").await;
        game.answer("n").await; // not a wizard
        game.answer("").await; // press enter to start
        game.conn = "julie".to_string();
        game.drain_output();
        game
    }

    async fn connected(mode: GameMode) -> Self {
        let mut story = DemoStory;
        let mut driver = Driver::create(&mut story, mode).expect("driver");
        let (io, adapter) = ports::channel_io(driver.input_signal.clone());
        drop(adapter); // output is read straight off the buffers here
        let conn = driver.connect_player(Box::new(io)).expect("connect");
        Self {
            driver,
            story,
            conn,
        }
    }

    async fn answer(&mut self, line: &str) {
        let outcome = self
            .driver
            .resume_dialog(&mut self.story, &self.conn.clone(), line)
            .await;
        // a rename may have happened during login
        if self.driver.sessions.get(&self.conn).is_none() {
            if let Some(name) = self.driver.sessions.names().into_iter().next() {
                self.conn = name;
            }
        }
        let _ = outcome;
    }

    async fn command(&mut self, line: &str) -> OutputRegion {
        match self
            .driver
            .process_player_command(&mut self.story, &self.conn.clone(), line)
            .await
        {
            Ok(()) => {}
            Err(err) => {
                self.driver.report_command_error(&self.conn.clone(), err);
            }
        }
        self.driver.drain_after_actions();
        self.driver.drain_pending_tells();
        self.drain_output()
    }

    fn drain_output(&mut self) -> OutputRegion {
        self.driver
            .sessions
            .get_mut(&self.conn)
            .map(|conn| conn.player.take_output())
            .unwrap_or_default()
    }

    fn output_of(&mut self, conn: &str) -> OutputRegion {
        self.driver
            .sessions
            .get_mut(conn)
            .map(|conn| conn.player.take_output())
            .unwrap_or_default()
    }
}

#[tokio::test]
async fn if_login_builder_creates_the_player_in_the_start_location() {
    let mut game = TestGame::started().await;
    assert_eq!(game.conn, "julie");
    let living = game.driver.sessions.get(&game.conn).unwrap().living();
    let julie = game.driver.world.living(living).unwrap();
    assert_eq!(julie.name(), "julie");
    assert_eq!(julie.title(), "Julie");
    let location = game.driver.world.location(julie.location()).unwrap();
    assert_eq!(location.name(), "town square");
    game.driver.world.validate_invariants().unwrap();
}

#[tokio::test]
async fn look_take_and_inventory_flow() {
    let mut game = TestGame::started().await;
    let out = game.command("look").await.plain_text();
    assert!(out.contains("[town square]"), "got: {}", out);
    assert!(out.contains("hairy cat is here."), "got: {}", out);
    let out = game.command("take newspaper").await.plain_text();
    assert!(out.contains("You take local newspaper."), "got: {}", out);
    let out = game.command("i").await.plain_text();
    assert!(out.contains("a local newspaper"), "got: {}", out);
    let out = game.command("drop newspaper").await.plain_text();
    assert!(out.contains("You drop local newspaper."), "got: {}", out);
}

#[tokio::test]
async fn soul_emotes_flow_through_dispatch() {
    let mut game = TestGame::started().await;
    let out = game.command("smile confusedly at cat").await.plain_text();
    assert!(
        out.contains("You smile confusedly at the hairy cat."),
        "got: {}",
        out
    );
    // qualifiers are rejected on non-soul commands
    let out = game.command("fail look").await.plain_text();
    assert!(
        out.contains("That action doesn't support qualifiers."),
        "got: {}",
        out
    );
    // unknown verbs get the standard message, directions get a hint
    let out = game.command("frobnicate the cat").await.plain_text();
    assert!(
        out.contains("The verb 'frobnicate' is unrecognized."),
        "got: {}",
        out
    );
    // "up" is a direction but not an exit here
    let out = game.command("up").await.plain_text();
    assert!(out.contains("You can't go in that direction."), "got: {}", out);
    // bare "roll" retries as the eye-rolling emote
    let out = game.command("roll").await.plain_text();
    assert!(
        out.contains("You roll your eyes to the ceiling."),
        "got: {}",
        out
    );
    // "who am i" re-dispatches as a different command
    let out = game.command("who am i").await.plain_text();
    assert!(out.contains("This is Julie."), "got: {}", out);
}

#[tokio::test]
async fn aggressive_emotes_provoke_aggressive_creatures() {
    let mut game = TestGame::started().await;
    game.command("east").await;
    let out = game.command("kick dog").await.plain_text();
    assert!(out.contains("You kick the mangy dog hard."), "got: {}", out);
    assert!(
        out.contains("The mangy dog glowers at you with seething anger."),
        "got: {}",
        out
    );
    // a negated action provokes nobody
    let out = game.command("pretend kick dog").await.plain_text();
    assert!(!out.contains("glowers"), "got: {}", out);
}

#[tokio::test]
async fn abbreviations_and_exits_move_the_player() {
    let mut game = TestGame::started().await;
    let out = game.command("n").await.plain_text();
    assert!(out.contains("[pub]"), "got: {}", out);
    let out = game.command("south").await.plain_text();
    assert!(out.contains("[town square]"), "got: {}", out);
    // closed doors refuse passage
    let out = game.command("east").await.plain_text();
    assert!(out.contains("[alley of doors]"), "got: {}", out);
    let out = game.command("door one").await.plain_text();
    assert!(out.contains("You can't go there; it's closed."), "got: {}", out);
    let out = game.command("open door one").await.plain_text();
    assert!(out.contains("You opened it."), "got: {}", out);
    let out = game.command("door one").await.plain_text();
    assert!(out.contains("[town square]"), "got: {}", out);
}

#[tokio::test]
async fn say_reaches_the_room_and_tell_is_private() {
    let mut game = TestGame::started().await;
    let out = game.command("say hello there").await.plain_text();
    assert!(out.contains("You say: hello there"), "got: {}", out);
    let out = game.command("tell cat psst").await.plain_text();
    assert!(out.contains("You tell cat: psst"), "got: {}", out);
    let out = game.command("tell nobody psst").await.plain_text();
    assert!(out.contains("Nobody is not here."), "got: {}", out);
}

static FIRED: Mutex<Vec<String>> = Mutex::new(Vec::new());

fn record_action(
    _driver: &mut Driver,
    deferred: &crate::scheduler::Deferred,
) -> anyhow::Result<()> {
    FIRED
        .lock()
        .unwrap()
        .push(deferred.args.first().cloned().unwrap_or_default());
    Ok(())
}

#[tokio::test]
async fn deferreds_fire_in_due_then_insertion_order_across_ticks() {
    let mut game = TestGame::started().await;
    FIRED.lock().unwrap().clear();
    game.driver.register_action("test.record", record_action);
    let t = game.driver.clock.clock();
    let owner = DeferredOwner::Module("test".to_string());
    game.driver
        .defer_at(t + Duration::seconds(10), owner.clone(), "test.record", vec!["a".into()])
        .unwrap();
    game.driver
        .defer_at(t + Duration::seconds(5), owner.clone(), "test.record", vec!["b".into()])
        .unwrap();
    game.driver
        .defer_at(t + Duration::seconds(5), owner.clone(), "test.record", vec!["c".into()])
        .unwrap();
    // scheduling an unknown action fails at scheduling time
    assert!(game
        .driver
        .defer_at(t, owner, "test.unknown", vec![])
        .is_err());
    // one demo tick advances the clock by exactly 5 game seconds:
    // b and c fire in insertion order, a stays pending
    game.driver.server_tick();
    assert_eq!(*FIRED.lock().unwrap(), vec!["b", "c"]);
    // the next tick reaches T+10 and a fires
    game.driver.server_tick();
    assert_eq!(*FIRED.lock().unwrap(), vec!["b", "c", "a"]);
}

static HEARTBEATS: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

fn heartbeat_action(
    _driver: &mut Driver,
    _deferred: &crate::scheduler::Deferred,
) -> anyhow::Result<()> {
    HEARTBEATS.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    Ok(())
}

#[tokio::test]
async fn every_tick_delivers_exactly_one_heartbeat_per_subscriber() {
    let mut game = TestGame::started().await;
    HEARTBEATS.store(0, std::sync::atomic::Ordering::SeqCst);
    game.driver.register_action("test.heartbeat", heartbeat_action);
    let owner = DeferredOwner::Module("ticker".to_string());
    game.driver
        .register_heartbeat(owner.clone(), "test.heartbeat")
        .unwrap();
    assert!(game
        .driver
        .register_heartbeat(owner.clone(), "test.nonexistent")
        .is_err());
    game.driver.server_tick();
    assert_eq!(HEARTBEATS.load(std::sync::atomic::Ordering::SeqCst), 1);
    game.driver.server_tick();
    game.driver.server_tick();
    assert_eq!(HEARTBEATS.load(std::sync::atomic::Ordering::SeqCst), 3);
    game.driver.unregister_heartbeat(&owner);
    game.driver.server_tick();
    assert_eq!(HEARTBEATS.load(std::sync::atomic::Ordering::SeqCst), 3);
}

#[tokio::test]
async fn limbo_reaper_warns_then_evicts_but_spares_wizards() {
    let mut game = TestGame::connected(GameMode::If).await;
    let conn = game.conn.clone();
    // the connecting player sits in limbo
    limbo::reap(&mut game.driver, 0.0);
    assert!(game.output_of(&conn).plain_text().is_empty());
    limbo::reap(&mut game.driver, 31.0);
    let out = game.output_of(&conn).plain_text();
    assert!(out.contains("you must not linger here"), "got: {}", out);
    limbo::reap(&mut game.driver, 51.0);
    let out = game.output_of(&conn).plain_text();
    assert!(out.contains("cannot stay here much longer"), "got: {}", out);
    limbo::reap(&mut game.driver, 61.0);
    let out = game.output_of(&conn).plain_text();
    assert!(out.contains("menacingly raises his scythe"), "got: {}", out);
    limbo::reap(&mut game.driver, 63.5);
    let out = game.output_of(&conn).plain_text();
    assert!(out.contains("slices your soul cleanly in half"), "got: {}", out);
    limbo::reap(&mut game.driver, 67.0);
    game.driver.drain_pending_tells();
    assert!(game.driver.sessions.get(&conn).is_none(), "player evicted");
}

#[tokio::test]
async fn limbo_reaper_only_whispers_at_wizards() {
    let mut game = TestGame::connected(GameMode::If).await;
    let conn = game.conn.clone();
    let living = game.driver.sessions.get(&conn).unwrap().living();
    game.driver
        .world
        .living_mut(living)
        .unwrap()
        .grant_privilege("wizard");
    limbo::reap(&mut game.driver, 0.0);
    limbo::reap(&mut game.driver, 5.0);
    let out = game.output_of(&conn).plain_text();
    assert!(out.contains("Hello there wizard"), "got: {}", out);
    limbo::reap(&mut game.driver, 120.0);
    game.driver.drain_pending_tells();
    assert!(game.driver.sessions.get(&conn).is_some(), "wizard spared");
    // and only the one notice
    let out = game.output_of(&conn).plain_text();
    assert!(!out.contains("Hello there wizard"), "got: {}", out);
}

#[tokio::test]
async fn quit_is_confirmed_before_session_exit() {
    let mut game = TestGame::started().await;
    game.command("quit").await;
    assert!(game.driver.has_dialog("julie"));
    let outcome = game
        .driver
        .resume_dialog(&mut game.story, "julie", "y")
        .await;
    assert_eq!(outcome, crate::driver::DialogOutcome::SessionExit);
}

#[tokio::test]
async fn savegame_round_trip_restores_clock_player_and_deferreds() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("demo.savegame");

    let mut game = TestGame::started().await;
    game.driver.savegame_path = path.clone();
    game.command("take newspaper").await;
    game.command("n").await; // walk to the pub
    let out = game.command("save").await.plain_text();
    assert!(out.contains("Game saved."), "got: {}", out);
    let saved_clock = game.driver.clock.clone();
    let saved_turns = game
        .driver
        .sessions
        .get("julie")
        .unwrap()
        .player
        .turns;

    // a brand new driver loads the snapshot
    let mut game2 = TestGame::connected(GameMode::If).await;
    game2.driver.savegame_path = path;
    let saved = crate::savegame::load(&game2.driver).expect("load");
    let conn = game2.conn.clone();
    crate::savegame::apply(&mut game2.driver, &conn, saved).expect("apply");
    assert_eq!(game2.driver.clock, saved_clock);
    let conn = game2.driver.sessions.get_mut("julie").expect("renamed");
    assert_eq!(conn.player.turns, saved_turns);
    let living = game2.driver.world.living(conn.living()).unwrap();
    assert_eq!(living.name(), "julie");
    let location = game2.driver.world.location(living.location()).unwrap();
    assert_eq!(location.name(), "pub");
    let carried: Vec<String> = living
        .inventory()
        .iter()
        .filter_map(|id| game2.driver.world.item(*id).map(|i| i.name().to_string()))
        .collect();
    assert_eq!(carried, vec!["newspaper"]);
    game2.driver.world.validate_invariants().unwrap();
}

#[tokio::test]
async fn savegame_version_mismatch_is_a_hard_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("demo.savegame");
    let mut game = TestGame::started().await;
    game.driver.savegame_path = path.clone();
    game.command("save").await;

    let mut game2 = TestGame::connected(GameMode::If).await;
    game2.driver.savegame_path = path;
    game2.driver.config.version = "2.0".to_string();
    match crate::savegame::load(&game2.driver) {
        Err(crate::savegame::SaveError::VersionMismatch { current, saved }) => {
            assert_eq!(current, "2.0");
            assert_eq!(saved, "1.0");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn mud_login_against_a_real_accounts_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("accounts.sqlite");
    let store = crate::accounts::SqliteAccounts::connect(&db.to_string_lossy())
        .await
        .expect("store");
    use crate::accounts::AccountsPort;
    let mut wizard = std::collections::BTreeSet::new();
    wizard.insert("wizard".to_string());
    store
        .create(
            "merlin",
            "secret1",
            "m@example.com",
            storyloom_domain::Stats::from_race("human", storyloom_domain::Gender::Male).unwrap(),
            wizard,
        )
        .await
        .expect("admin");
    store
        .create(
            "julie",
            "secret1",
            "j@example.com",
            storyloom_domain::Stats::from_race("elf", storyloom_domain::Gender::Female).unwrap(),
            Default::default(),
        )
        .await
        .expect("player");

    let mut game = TestGame::connected(GameMode::Mud).await;
    game.driver.accounts = Some(std::sync::Arc::new(store));
    let conn = game.conn.clone();
    crate::driver::begin_mud_login(&mut game.driver, &conn).await;
    assert!(game.driver.has_dialog(&conn));
    game.answer("julie").await; // name
    game.answer("secret1").await; // password
    game.answer("").await; // welcome pause
    assert_eq!(game.conn, "julie");
    let living = game.driver.sessions.get("julie").unwrap().living();
    let julie = game.driver.world.living(living).unwrap();
    assert_eq!(julie.race(), "elf");
    assert!(!julie.is_wizard());
    let location = game.driver.world.location(julie.location()).unwrap();
    assert_eq!(location.name(), "town square");
    // a bad password bounces back to the name prompt
    let mut game2 = TestGame::connected(GameMode::Mud).await;
    let store2 = crate::accounts::SqliteAccounts::connect(&db.to_string_lossy())
        .await
        .expect("store");
    game2.driver.accounts = Some(std::sync::Arc::new(store2));
    let conn2 = game2.conn.clone();
    crate::driver::begin_mud_login(&mut game2.driver, &conn2).await;
    game2.answer("julie").await;
    game2.answer("wrong9x").await;
    let out = game2.output_of(&conn2).plain_text();
    assert!(out.contains("Invalid name or password."), "got: {}", out);
    let back_at_name = game2
        .driver
        .dialogs
        .get(&conn2)
        .map(|d| matches!(d.state, DialogState::MudLoginName));
    assert_eq!(back_at_name, Some(true));
}
