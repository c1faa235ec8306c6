// Timestamp-gated value: `{value, last_refreshed}` plus a pure staleness check.
// Used by the capacity cache; the history sampler keeps its own gate on the same predicate.

/// True when nothing was refreshed yet or the last refresh is at least `window_ms` old.
pub fn is_stale(last_refreshed_ms: Option<i64>, now_ms: i64, window_ms: i64) -> bool {
    match last_refreshed_ms {
        None => true,
        Some(last) => now_ms.saturating_sub(last) >= window_ms,
    }
}

#[derive(Debug, Clone)]
pub struct TimedCache<T> {
    value: Option<T>,
    last_refreshed_ms: Option<i64>,
    window_ms: i64,
}

impl<T> TimedCache<T> {
    pub fn new(window_ms: i64) -> Self {
        Self {
            value: None,
            last_refreshed_ms: None,
            window_ms,
        }
    }

    pub fn is_stale(&self, now_ms: i64) -> bool {
        is_stale(self.last_refreshed_ms, now_ms, self.window_ms)
    }

    /// Stores a fresh value and restarts the window.
    pub fn refresh(&mut self, value: T, now_ms: i64) {
        self.value = Some(value);
        self.last_refreshed_ms = Some(now_ms);
    }

    /// Last good value, stale or not.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn last_refreshed_ms(&self) -> Option<i64> {
        self.last_refreshed_ms
    }
}
