//! Process-wide log subscriber setup.
//!
//! The library itself only emits `tracing` events. Binaries and tests that
//! want to see them call `init()` once at startup; the level comes from
//! `DELHIVERY_LOG` (EnvFilter syntax) and defaults to `info`.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "DELHIVERY_LOG";

/// Longest response body excerpt written to error logs, in characters.
pub const MAX_LOGGED_BODY: usize = 512;

static INIT: Once = Once::new();

/// Install a compact fmt subscriber. Later calls are no-ops, as is the first
/// call when another global subscriber is already set.
pub fn init() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init();
    });
}

/// Cut a response body down to `MAX_LOGGED_BODY` characters.
pub(crate) fn truncate_body(body: &str) -> &str {
    match body.char_indices().nth(MAX_LOGGED_BODY) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_untouched() {
        assert_eq!(truncate_body("{\"ok\":true}"), "{\"ok\":true}");
    }

    #[test]
    fn long_bodies_are_cut_on_a_char_boundary() {
        let body = "₹".repeat(MAX_LOGGED_BODY + 10);
        let cut = truncate_body(&body);
        assert_eq!(cut.chars().count(), MAX_LOGGED_BODY);
    }

    #[test]
    fn init_is_idempotent() {
        init();
        init();
    }
}
