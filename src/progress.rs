/// Advisory build-progress callback. The original console reporter in the
/// reference implementation gated a raw percentage print behind a global
/// flag; here it's a pure sink the builder calls into, so the builder
/// itself stays free of any global state.
pub trait ProgressSink {
    fn on_progress(&self, phase: &str, done: usize, total: usize);
}

/// Default sink: discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    #[inline]
    fn on_progress(&self, _phase: &str, _done: usize, _total: usize) {}
}

/// Funnels progress through the `log` facade at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingProgress;

impl ProgressSink for LoggingProgress {
    fn on_progress(&self, phase: &str, done: usize, total: usize) {
        log::trace!("{}: {}/{}", phase, done, total);
    }
}
