// Fixed-rate frame loop driving one skating session
// Each tick: pick up loaded content, drain tracking/input events, advance
// locomotion, publish node transforms and status.

use std::time::Duration;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::time::interval;
use tracing::{info, warn};

// local imports
use crate::config::{MAX_LOOP_HZ, SkateConfig, TOPIC_BOARD, TOPIC_GROUND, TOPIC_INPUT, TOPIC_STATUS};
use crate::locomotion::Session;
use crate::messages::{NodeTransform, SessionEvent};
use crate::scene::{ContentConfig, SceneContent, SceneGraph};

/// Build the scene off the frame loop; the loop polls for the result
fn spawn_content_load(config: ContentConfig) -> oneshot::Receiver<(SceneGraph, SceneContent)> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        info!("Loading scene content...");
        let mut graph = SceneGraph::new();
        let content = SceneContent::build(&mut graph, &config);
        if tx.send((graph, content)).is_err() {
            warn!("Frame loop gone before scene content was delivered");
        }
    });
    rx
}

/// Tick period for a loop rate, kept within [1, MAX_LOOP_HZ] so it is never zero
pub fn frame_period(loop_hz: u64) -> Duration {
    Duration::from_secs_f64(1.0 / loop_hz.clamp(1, MAX_LOOP_HZ) as f64)
}

pub async fn run(
    config: SkateConfig,
    loop_hz: u64,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Opening Zenoh session...");
    let zenoh = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers and subscribers...");
    let subscriber = zenoh.declare_subscriber(TOPIC_INPUT).await?;
    let pub_ground = zenoh.declare_publisher(TOPIC_GROUND).await?;
    let pub_board = zenoh.declare_publisher(TOPIC_BOARD).await?;
    let pub_status = zenoh.declare_publisher(TOPIC_STATUS).await?;

    let frame_ms = config.frame_ms.0;
    let mut session = Session::new(config.clone());
    let mut scene = SceneGraph::new();

    session.begin_loading()?;
    let mut content_rx = Some(spawn_content_load(config.content));
    let mut controllers_rx = Some(session.registry_mut().await_both());

    let loop_hz = loop_hz.clamp(1, MAX_LOOP_HZ);
    let mut tick = interval(frame_period(loop_hz));

    info!(
        "Runtime started: {}Hz loop, {}ms per integration step",
        loop_hz, frame_ms
    );
    info!("Subscribed to: {}", TOPIC_INPUT);
    info!(
        "Publishing to: {}, {}, {}",
        TOPIC_GROUND, TOPIC_BOARD, TOPIC_STATUS
    );

    loop {
        tick.tick().await;

        // 1. Pick up scene content once loading finishes (never blocks the frame)
        if let Some(rx) = content_rx.as_mut() {
            match rx.try_recv() {
                Ok((graph, content)) => {
                    scene = graph;
                    session.content_loaded(content)?;
                    content_rx = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Closed) => {
                    return Err("scene content loading ended without content".into());
                }
            }
        }
        if let Some(rx) = controllers_rx.as_mut() {
            if let Ok(bound) = rx.try_recv() {
                info!(
                    "Controllers bound: hand={}, board={}",
                    bound.hand, bound.board
                );
                controllers_rx = None;
            }
        }

        // 2. Drain all pending events (non-blocking), in arrival order
        while let Ok(Some(sample)) = subscriber.try_recv() {
            let payload = sample.payload().to_bytes();
            match serde_json::from_slice::<SessionEvent>(&payload) {
                Ok(event) => session.handle(event, &mut scene),
                Err(e) => warn!("Failed to parse event: {}", e),
            }
        }

        // 3. Advance locomotion
        let report = session.tick(&mut scene, frame_ms);

        // 4. Publish scene transforms
        if let Some(content) = session.content() {
            if let Some(ground) = scene.world_pose(content.ground) {
                pub_ground
                    .put(serde_json::to_string(&NodeTransform::from(ground))?)
                    .await?;
            }
            if let Some(board) = scene.world_pose(content.board_surface) {
                pub_board
                    .put(serde_json::to_string(&NodeTransform::from(board))?)
                    .await?;
            }
        }

        // 5. Publish status
        let status = session.status(&report);
        pub_status.put(serde_json::to_string(&status)?).await?;
    }
}
