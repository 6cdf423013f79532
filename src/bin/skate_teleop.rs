// Keyboard teleop: SPACE push, C calibrate, Q quit
// Stands in for the VR hand controller when testing the runtime without a headset.
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::time::{Duration, Instant};
use tracing::info;

use vr_skate_runtime::config::TOPIC_INPUT;
use vr_skate_runtime::locomotion::{InputEvent, Key};
use vr_skate_runtime::messages::SessionEvent;

// Terminals rarely report key releases, so a held key is seen as a stream of
// repeats; treat a gap longer than this as a release.
const RELEASE_TIMEOUT_MS: u64 = 150;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let publisher = session.declare_publisher(TOPIC_INPUT).await?;

    info!("Controls: SPACE=push, C=calibrate, Q=quit");

    enable_raw_mode()?;
    let result = run_teleop(&publisher).await;
    disable_raw_mode()?;

    result
}

async fn send(
    publisher: &zenoh::pubsub::Publisher<'_>,
    event: InputEvent,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let json = serde_json::to_string(&SessionEvent::from(event))?;
    publisher.put(json).await?;
    Ok(())
}

async fn run_teleop(
    publisher: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut pushing = false;
    let mut last_push_input = Instant::now();

    loop {
        // Poll for key with 16ms timeout (~60Hz effective rate)
        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;

                match code {
                    KeyCode::Char(' ') if pressed => {
                        if !pushing {
                            send(publisher, InputEvent::KeyDown { key: Key::Space }).await?;
                            info!("Pushing");
                            pushing = true;
                        }
                        last_push_input = Instant::now();
                    }
                    KeyCode::Char(' ') if kind == KeyEventKind::Release && pushing => {
                        send(publisher, InputEvent::KeyUp { key: Key::Space }).await?;
                        info!("Coasting");
                        pushing = false;
                    }

                    // Calibration is edge-triggered: send a full press/release pair
                    KeyCode::Char('c') if kind == KeyEventKind::Press => {
                        send(publisher, InputEvent::SecondaryButton { pressed: true }).await?;
                        send(publisher, InputEvent::SecondaryButton { pressed: false }).await?;
                        info!("Calibrate requested");
                    }

                    // Quit
                    KeyCode::Char('q') | KeyCode::Esc if pressed => break,

                    _ => {}
                }
            }
        }

        if pushing && last_push_input.elapsed() >= Duration::from_millis(RELEASE_TIMEOUT_MS) {
            send(publisher, InputEvent::KeyUp { key: Key::Space }).await?;
            info!("Coasting");
            pushing = false;
        }
    }

    // Never leave the runtime pushing after we exit
    if pushing {
        send(publisher, InputEvent::KeyUp { key: Key::Space }).await?;
    }
    Ok(())
}
