//! Chapter progress display
//!
//! TTY mode: an indicatif bar on stderr.
//! Non-TTY mode: a hidden bar plus log lines whenever the count moves.

use std::io::IsTerminal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "[{bar:50.green/dim}] {pos}/{len} chapters ({percent}%) {elapsed}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ")
}

/// Builds the bar for `total` chapters; hidden when disabled or not on a terminal
pub fn chapter_bar(total: usize, enabled: bool) -> ProgressBar {
    if !enabled || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total as u64);
    bar.set_style(bar_style());
    bar
}

/// Observer task polling the completed-roots counter
pub struct ProgressReporter {
    token: CancellationToken,
    handle: JoinHandle<u64>,
}

impl ProgressReporter {
    /// Starts rendering `completed` against `total` every `refresh`
    ///
    /// The counter is only read, never waited on, so workers are never blocked.
    pub fn spawn(
        bar: ProgressBar,
        total: usize,
        completed: Arc<AtomicUsize>,
        refresh: Duration,
    ) -> Self {
        let token = CancellationToken::new();
        let done = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(refresh);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut last_logged = None;

            loop {
                tokio::select! {
                    _ = done.cancelled() => break,
                    _ = ticker.tick() => {
                        render(&bar, total, &completed, &mut last_logged);
                    }
                }
            }

            // Final render after the pool has drained
            render(&bar, total, &completed, &mut last_logged);
            let position = bar.position();
            bar.finish();
            position
        });

        Self { token, handle }
    }

    /// Stops the observer and waits for its final render
    ///
    /// Returns the last rendered position.
    pub async fn finish(self) -> u64 {
        self.token.cancel();
        match self.handle.await {
            Ok(position) => position,
            Err(e) => {
                tracing::warn!("Progress reporter failed: {}", e);
                0
            }
        }
    }
}

fn render(
    bar: &ProgressBar,
    total: usize,
    completed: &AtomicUsize,
    last_logged: &mut Option<usize>,
) {
    let done = completed.load(Ordering::Relaxed).min(total);
    bar.set_position(done as u64);

    if bar.is_hidden() && *last_logged != Some(done) {
        let percent = if total > 0 {
            done as f64 / total as f64 * 100.0
        } else {
            100.0
        };
        tracing::info!("Progress: {}/{} chapters ({:.0}%)", done, total, percent);
        *last_logged = Some(done);
    }
}
