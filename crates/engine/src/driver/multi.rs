//! The multiuser driver loop: timer-paced, many connections, login
//! dialogs, idle eviction.

use std::time::Instant;

use tokio::sync::mpsc;
use tokio::time::{sleep, Duration as TokioDuration};

use crate::commands::CommandError;
use crate::context::PendingAction;
use crate::driver::{login, DialogOutcome, Driver};
use crate::ports::ConnectionIo;
use crate::story::Story;

/// Run the multiuser server loop. New player connections arrive over
/// the channel (from whatever network adapter the launcher wired up).
pub async fn run(
    driver: &mut Driver,
    story: &mut dyn Story,
    mut new_connections: mpsc::UnboundedReceiver<Box<dyn ConnectionIo>>,
) -> anyhow::Result<i32> {
    let tick_time = driver.config.server_tick_time;
    let mut previous_tick = Instant::now();
    let mut loop_duration = 0.0f64;

    while !driver.stop {
        // let new players in
        while let Ok(io) = new_connections.try_recv() {
            match driver.connect_player(io) {
                Ok(conn_name) => {
                    login::begin_mud_login(driver, &conn_name).await;
                }
                Err(err) => {
                    tracing::error!(error = %err, "could not accept connection");
                }
            }
        }

        // prompts and buffered output
        let names = driver.sessions.names();
        for name in &names {
            let has_dialog = driver.has_dialog(name);
            if let Some(conn) = driver.sessions.get_mut(name) {
                conn.write_output();
                if !has_dialog {
                    conn.write_input_prompt();
                }
            }
        }

        // wait for input from anyone, a new connection, or the tick
        let wait = (tick_time - loop_duration).max(0.01);
        let signal = driver.input_signal.clone();
        tokio::select! {
            _ = signal.notified() => {}
            _ = sleep(TokioDuration::from_secs_f64(wait)) => {}
        }

        let loop_start = Instant::now();
        for name in driver.sessions.names() {
            let lines = driver
                .sessions
                .get_mut(&name)
                .map(|conn| conn.pending_input())
                .unwrap_or_default();
            let disconnected = driver
                .sessions
                .get(&name)
                .map(|conn| conn.disconnected)
                .unwrap_or(false);
            if disconnected {
                driver.disconnect_player(&name);
                continue;
            }
            if let Some(line) = lines.into_iter().find(|l| !l.is_empty()) {
                if let Some(conn) = driver.sessions.get_mut(&name) {
                    conn.need_new_input_prompt = true;
                    conn.player.tell("\n");
                }
                if driver.has_dialog(&name) {
                    match driver.resume_dialog(story, &name, &line).await {
                        DialogOutcome::Continue => {}
                        DialogOutcome::SessionExit => {
                            goodbye_and_disconnect(driver, story, &name);
                        }
                        DialogOutcome::Fatal(code) => {
                            tracing::error!(code, "fatal dialog outcome in mud mode");
                        }
                    }
                } else {
                    match driver.process_player_command(story, &name, &line).await {
                        Ok(()) => {}
                        Err(err) => match driver.report_command_error(&name, err) {
                            Some(CommandError::SessionExit) => {
                                goodbye_and_disconnect(driver, story, &name);
                            }
                            // a story can't complete in multiuser mode
                            _ => {}
                        },
                    }
                }
            }
        }

        driver.drain_pending_tells();
        if previous_tick.elapsed().as_secs_f64() >= tick_time {
            driver.server_tick();
            driver.disconnect_idling();
            previous_tick = Instant::now();
        }
        driver.flush_all_output();
        loop_duration = loop_start.elapsed().as_secs_f64();
        if driver.loop_durations.len() >= 10 {
            driver.loop_durations.pop_front();
        }
        driver.loop_durations.push_back(loop_duration);
    }

    for name in driver.sessions.names() {
        driver.disconnect_player(&name);
    }
    Ok(driver.exit_code)
}

fn goodbye_and_disconnect(driver: &mut Driver, story: &mut dyn Story, conn_name: &str) {
    let living = driver.sessions.get(conn_name).map(|c| c.living());
    if let Some(living) = living {
        let mut ctx = driver.context();
        story.goodbye(&mut ctx, living);
    }
    // let the goodbye reach the screen before the connection dies
    driver.pending_tells.push_back(PendingAction::Disconnect {
        conn: conn_name.to_string(),
    });
}
