//! Progress notification port
//!
//! Defines the interface for reporting progress during a fan-out.

/// Callback for progress updates while providers are queried
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once before any provider is queried
    fn on_fan_out_start(&self, total_providers: usize);

    /// Called as each provider settles, in completion order
    fn on_provider_complete(&self, provider: &str, success: bool);

    /// Called after every provider has settled
    fn on_fan_out_complete(&self);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_fan_out_start(&self, _total_providers: usize) {}
    fn on_provider_complete(&self, _provider: &str, _success: bool) {}
    fn on_fan_out_complete(&self) {}
}
