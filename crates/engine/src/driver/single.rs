//! The single player driver loop: used for interactive fiction.
//! Command-paced (blocks on player input; ticks ride on commands) or
//! timer-paced, per the story configuration.

use std::time::Instant;

use tokio::time::{timeout, Duration as TokioDuration};

use crate::commands::CommandError;
use crate::dialog::DialogState;
use crate::driver::{login, DialogOutcome, Driver};
use crate::ports::ConnectionIo;
use crate::story::{Story, TickMethod};

/// Run the single player session until the game is exited. Returns
/// the process exit code.
pub async fn run(
    driver: &mut Driver,
    story: &mut dyn Story,
    io: Box<dyn ConnectionIo>,
) -> anyhow::Result<i32> {
    driver.connect_player(io)?;
    let conn_name = current_connection(driver).unwrap_or_default();
    login::begin_if_login(driver, story, &conn_name).await;
    driver.flush_all_output();

    let tick_time = driver.config.server_tick_time;
    let mut previous_tick = Instant::now();
    let mut loop_duration = 0.0f64;

    while !driver.stop {
        let Some(conn_name) = current_connection(driver) else {
            break;
        };
        if !driver.has_dialog(&conn_name) {
            if let Some(conn) = driver.sessions.get_mut(&conn_name) {
                conn.write_output();
                conn.write_input_prompt();
            }
        }

        // wait for player input; with a timer tick, wait at most the
        // remainder of the tick interval
        let signal = driver.input_signal.clone();
        match driver.config.server_tick_method {
            TickMethod::Command => {
                signal.notified().await;
            }
            TickMethod::Timer => {
                let wait = (tick_time - loop_duration).max(0.01);
                let _ = timeout(TokioDuration::from_secs_f64(wait), signal.notified()).await;
            }
        }

        let loop_start = Instant::now();
        let lines = driver
            .sessions
            .get_mut(&conn_name)
            .map(|conn| conn.pending_input())
            .unwrap_or_default();
        let disconnected = driver
            .sessions
            .get(&conn_name)
            .map(|conn| conn.disconnected)
            .unwrap_or(true);
        if disconnected {
            break;
        }
        // process one command per iteration to avoid flooding
        if let Some(line) = lines.into_iter().find(|l| !l.is_empty()) {
            if let Some(conn) = driver.sessions.get_mut(&conn_name) {
                conn.need_new_input_prompt = true;
                conn.player.tell("\n");
            }
            if driver.has_dialog(&conn_name) {
                match driver.resume_dialog(story, &conn_name, &line).await {
                    DialogOutcome::Continue => {}
                    DialogOutcome::SessionExit => {
                        let living = driver.sessions.get(&conn_name).map(|c| c.living());
                        if let Some(living) = living {
                            let mut ctx = driver.context();
                            story.goodbye(&mut ctx, living);
                        }
                        stop_driver(driver);
                        break;
                    }
                    DialogOutcome::Fatal(code) => {
                        driver.exit_code = code;
                        stop_driver(driver);
                        break;
                    }
                }
            } else {
                match driver.process_player_command(story, &conn_name, &line).await {
                    Ok(()) => {}
                    Err(err) => match driver.report_command_error(&conn_name, err) {
                        Some(CommandError::SessionExit) => {
                            let living = driver.sessions.get(&conn_name).map(|c| c.living());
                            if let Some(living) = living {
                                let mut ctx = driver.context();
                                story.goodbye(&mut ctx, living);
                            }
                            stop_driver(driver);
                            break;
                        }
                        Some(CommandError::StoryCompleted) => {
                            story_completed(driver, story, &conn_name);
                        }
                        _ => {}
                    },
                }
            }
        }

        driver.drain_pending_tells();
        if previous_tick.elapsed().as_secs_f64() >= tick_time {
            driver.server_tick();
            previous_tick = Instant::now();
        }
        driver.drain_after_actions();
        // with command-paced ticks, events still go out on every command
        driver.flush_all_output();
        loop_duration = loop_start.elapsed().as_secs_f64();
        if driver.loop_durations.len() >= 10 {
            driver.loop_durations.pop_front();
        }
        driver.loop_durations.push_back(loop_duration);
    }
    stop_driver(driver);
    Ok(driver.exit_code)
}

fn current_connection(driver: &Driver) -> Option<String> {
    driver.sessions.names().into_iter().next()
}

/// The player finished the story: run the completion hook and wait
/// for one final acknowledgement before shutting down.
fn story_completed(driver: &mut Driver, story: &mut dyn Story, conn_name: &str) {
    let living = driver.sessions.get(conn_name).map(|c| c.living());
    if let Some(living) = living {
        {
            let mut ctx = driver.context();
            ctx.tell_player(living, "\n");
            story.completion(&mut ctx, living);
            ctx.tell_player(living, "\n");
        }
        if let Some(conn) = driver.sessions.get_mut(conn_name) {
            conn.player.story_complete = true;
        }
        driver.start_dialog_with_prompt(
            conn_name,
            DialogState::CompletionPause,
            "Press enter to exit.".to_string(),
        );
    }
}

fn stop_driver(driver: &mut Driver) {
    driver.stop = true;
    let names = driver.sessions.names();
    for name in names {
        if let Some(conn) = driver.sessions.get_mut(&name) {
            conn.write_output();
            conn.destroy();
        }
        driver.sessions.remove(&name);
    }
}
