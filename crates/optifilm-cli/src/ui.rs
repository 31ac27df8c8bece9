use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use optifilm::engine::progress::{Progress, ProgressCallback};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::warn;

/// Checkpoint percentages are tracked in thousandths so the bar moves smoothly.
const PERCENT_SCALE: u64 = 1000;

const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
const PERCENT_TEMPLATE: &str = "{msg:<16} [{bar:40.cyan/blue}] {percent:>3}% ({eta})";

pub type UiEvent = Progress;

/// Renders workflow progress on stderr: a spinner while a phase starts, switching to a
/// percentage bar on its first checkpoint.
pub struct UiManager {
    mp: MultiProgress,
    phase_bar: Option<ProgressBar>,
    phase_name: &'static str,
    event_receiver: mpsc::Receiver<UiEvent>,
    shutdown_receiver: watch::Receiver<bool>,
}

impl UiManager {
    pub fn new() -> (Self, mpsc::Sender<UiEvent>, watch::Sender<bool>) {
        let (event_sender, event_receiver) = mpsc::channel(1024);
        let (shutdown_sender, shutdown_receiver) = watch::channel(false);
        let manager = Self {
            mp: MultiProgress::with_draw_target(ProgressDrawTarget::stderr_with_hz(12)),
            phase_bar: None,
            phase_name: "",
            event_receiver,
            shutdown_receiver,
        };
        (manager, event_sender, shutdown_sender)
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(event) = self.event_receiver.recv() => self.handle(event),
                changed = self.shutdown_receiver.changed() => {
                    if changed.is_err() || *self.shutdown_receiver.borrow() {
                        break;
                    }
                }
            }
        }
        while let Ok(event) = self.event_receiver.try_recv() {
            self.handle(event);
        }
        self.clear_bar();
    }

    fn handle(&mut self, event: UiEvent) {
        match event {
            Progress::PhaseStart { name } => {
                self.clear_bar();
                let bar = self.mp.add(ProgressBar::new_spinner());
                bar.set_style(style(SPINNER_TEMPLATE));
                bar.enable_steady_tick(Duration::from_millis(80));
                bar.set_message(name);
                self.phase_bar = Some(bar);
                self.phase_name = name;
            }
            Progress::Checkpoint { percent, .. } => {
                let Some(bar) = self.phase_bar.as_ref() else {
                    return;
                };
                if bar.length().is_none() {
                    bar.disable_steady_tick();
                    bar.set_style(style(PERCENT_TEMPLATE));
                    bar.set_length(100 * PERCENT_SCALE);
                }
                let position = (percent.clamp(0.0, 100.0) * PERCENT_SCALE as f64).round();
                bar.set_position(position as u64);
            }
            Progress::PhaseFinish => {
                self.clear_bar();
                if !self.phase_name.is_empty() {
                    self.mp.println(format!("✓ {}", self.phase_name)).ok();
                }
                self.phase_name = "";
            }
        }
    }

    fn clear_bar(&mut self) {
        if let Some(bar) = self.phase_bar.take() {
            bar.finish_and_clear();
        }
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸ ")
}

/// Forwards workflow progress into the UI channel without blocking the worker thread.
#[derive(Clone)]
pub struct CliProgressHandler {
    sender: mpsc::Sender<UiEvent>,
}

impl CliProgressHandler {
    pub fn new(sender: mpsc::Sender<UiEvent>) -> Self {
        Self { sender }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let sender = self.sender.clone();
        Box::new(move |progress: Progress| {
            if let Err(e) = sender.try_send(progress) {
                warn!("Dropped progress update: {}", e);
            }
        })
    }
}
