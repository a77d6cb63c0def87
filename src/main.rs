//! handsignal: gesture and voice control daemon
//!
//! Startup order:
//! - open the serial link to the bulb controller (fatal on failure)
//! - start the hand tracker process (fatal on failure)
//! - start the speech worker, the frame loop and the key listener
//!
//! Then run the command arbiter until the user quits, a signal arrives or
//! the tracker stops producing frames.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use handsignal::config::Config;
use handsignal::controls::{ControlEvent, CrlfWriter, KeyListener};
use handsignal::events::ArbiterEvent;
use handsignal::feedback::FeedbackChannel;
use handsignal::gesture::{FrameLoop, TrackerProcess};
use handsignal::lifecycle::ShutdownSignal;
use handsignal::link::SerialLink;
use handsignal::state::{ArbiterInput, CommandArbiter};
use handsignal::voice::{CommandRecognizer, VoiceWorker};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; the key listener puts the terminal in raw mode
    tracing_subscriber::fmt()
        .with_writer(CrlfWriter::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "handsignal starting"
    );

    // Load configuration
    let config = Config::load()?;
    info!(
        serial_port = %config.serial.path,
        cooldown_ms = config.cooldown.as_millis() as u64,
        "configuration loaded"
    );

    // Create shutdown signal handler
    let shutdown = ShutdownSignal::new();

    // Opening the port waits for the controller to reboot, keep that off the runtime
    let serial = config.serial.clone();
    let link = tokio::task::spawn_blocking(move || SerialLink::open(&serial))
        .await
        .context("serial open task failed")?
        .context("failed to open actuator link")?;

    let tracker = TrackerProcess::spawn(&config.tracker_command)
        .context("failed to start hand tracker")?;
    let tracker_handle = tracker.handle();

    let (feedback, feedback_task) = match &config.tts_command {
        Some(command) => {
            let (feedback, task) = FeedbackChannel::spawn(command.clone());
            (feedback, Some(task))
        }
        None => (FeedbackChannel::muted(), None),
    };

    // Create channels for inter-component communication
    // Frame loop + voice worker -> arbiter
    let (input_tx, input_rx) = mpsc::channel::<ArbiterInput>(64);
    // Arbiter -> status log
    let (event_tx, _event_rx) = broadcast::channel::<ArbiterEvent>(64);
    // Key listener -> main loop
    let (control_tx, mut control_rx) = mpsc::channel::<ControlEvent>(8);

    let mut arbiter = CommandArbiter::new(link, feedback.clone(), config.cooldown, event_tx.clone());

    let recognizer = Arc::new(CommandRecognizer::new(
        config.recognizer_command.clone(),
        config.listen_timeout,
    ));
    let voice = VoiceWorker::new(recognizer, feedback.clone(), input_tx.clone());

    let frame_loop = FrameLoop::new(input_tx);
    let frame_exit = frame_loop
        .start(tracker)
        .context("failed to start frame loop")?;

    let key_listener = KeyListener::new(control_tx);
    match key_listener.start() {
        Ok(()) => {
            info!("key listener started: 'v' to speak a command, Esc to quit");
        }
        Err(e) => {
            error!(?e, "failed to start key listener");
            warn!("continuing without keyboard controls - stop with Ctrl-C");
        }
    }

    // Status log of arbiter decisions
    let mut status_rx = event_tx.subscribe();
    let status_task = tokio::spawn(async move {
        loop {
            match status_rx.recv().await {
                Ok(event) => info!(%event, "status"),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "status receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    info!("entering main loop");

    // Main event loop
    tokio::select! {
        // Run the arbiter (processes gesture and voice inputs)
        _ = arbiter.run(input_rx) => {
            info!("command arbiter exited");
        }

        // The tracker ran out of frames
        exit = frame_exit => {
            match exit {
                Ok(exit) => info!(?exit, "frame loop finished"),
                Err(_) => warn!("frame loop ended without reporting"),
            }
        }

        // Handle push-to-talk and quit keys
        _ = async {
            while let Some(control) = control_rx.recv().await {
                match control {
                    ControlEvent::PushToTalk => {
                        voice.push_to_talk();
                    }
                    ControlEvent::Quit => {
                        info!("quit requested");
                        break;
                    }
                }
            }
        } => {}

        // Wait for shutdown signal
        _ = shutdown.wait() => {
            info!("shutdown signal received");
        }
    }

    // Cleanup
    info!("shutting down...");

    key_listener.stop();
    frame_loop.stop();
    // Releases the camera and unblocks the frame loop thread
    tracker_handle.kill();
    voice.shutdown();
    if let Some(task) = feedback_task {
        task.abort();
    }
    status_task.abort();
    // Closes the serial port
    drop(arbiter);

    info!("handsignal stopped");

    Ok(())
}
