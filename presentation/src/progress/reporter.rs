//! Progress reporting for provider fan-out

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use panel_application::ProgressNotifier;
use std::sync::Mutex;

/// Reports fan-out progress with a progress bar on stderr
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-")
    }

    fn status_line(provider: &str, success: bool) -> String {
        if success {
            format!("{} {}", "v".green(), provider)
        } else {
            format!("{} {}", "x".red(), provider)
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_fan_out_start(&self, total_providers: usize) {
        let pb = ProgressBar::with_draw_target(
            Some(total_providers as u64),
            ProgressDrawTarget::stderr(),
        );
        pb.set_style(Self::style());
        pb.set_prefix("Querying providers");
        pb.set_message("Starting...");

        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_provider_complete(&self, provider: &str, success: bool) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(pb) = slot.as_ref() {
                pb.set_message(Self::status_line(provider, success));
                pb.inc(1);
            }
        }
    }

    fn on_fan_out_complete(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(pb) = slot.take() {
                pb.finish_and_clear();
            }
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_fan_out_start(&self, total_providers: usize) {
        eprintln!(
            "{} {} ({} providers)",
            "->".cyan(),
            "Querying".bold(),
            total_providers
        );
    }

    fn on_provider_complete(&self, provider: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), provider);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), provider);
        }
    }

    fn on_fan_out_complete(&self) {
        eprintln!();
    }
}
