//! Token economy over the preference store.
//!
//! Users claim tokens on an hourly cooldown and spend them to shorten
//! or extend cooldowns (1 token = 1 second). Balances are plain
//! entries; cooldowns are time-based so they count down on their own.

use banter_core::PrefStore;

/// Tokens awarded per claim (an hour's worth).
pub const CLAIM_AWARD: i64 = 3600;

/// Seconds of cooldown modification per token spent.
pub const SECONDS_PER_TOKEN: i64 = 1;

fn balance_key(user: &str) -> String {
    format!("token_balance_{user}")
}

fn claim_key(user: &str) -> String {
    format!("token_claim_cd_{user}")
}

/// Current token balance for a user.
pub fn balance(prefs: &PrefStore, user: &str) -> i64 {
    prefs.get(&balance_key(user), 0.0) as i64
}

/// Set a user's balance, clamped at zero.
pub fn set_balance(prefs: &mut PrefStore, user: &str, new_balance: i64) {
    prefs.set(balance_key(user), new_balance.max(0) as f64);
}

/// Seconds remaining before the user may claim again.
pub fn claim_remaining(prefs: &PrefStore, user: &str) -> i64 {
    prefs.get(&claim_key(user), 0.0) as i64
}

/// Start the claim cooldown for a user.
pub fn start_claim_cooldown(prefs: &mut PrefStore, user: &str, seconds: u64) {
    prefs.set_time_based(claim_key(user), seconds as f64);
}

/// Adjust a named cooldown by +/- delta seconds, re-saving it as
/// time-based so it keeps counting down. Returns false for an unknown
/// cooldown kind.
pub fn adjust_cooldown(
    prefs: &mut PrefStore,
    kind: &str,
    target: &str,
    delta_seconds: i64,
) -> bool {
    let key = match kind {
        "claim" => claim_key(target),
        "refresh" => crate::commands::REFRESH_COOLDOWN_KEY.to_string(),
        _ => return false,
    };

    let current = prefs.get(&key, 0.0);
    let adjusted = (current + delta_seconds as f64).max(0.0);
    prefs.set_time_based(key, adjusted);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_defaults_to_zero_and_clamps() {
        let mut prefs = PrefStore::new();
        assert_eq!(balance(&prefs, "mocha"), 0);

        set_balance(&mut prefs, "mocha", -5);
        assert_eq!(balance(&prefs, "mocha"), 0);

        set_balance(&mut prefs, "mocha", 12);
        assert_eq!(balance(&prefs, "mocha"), 12);
    }

    #[test]
    fn test_claim_cooldown_counts_down() {
        let mut prefs = PrefStore::new();
        assert_eq!(claim_remaining(&prefs, "mocha"), 0);

        start_claim_cooldown(&mut prefs, "mocha", 3600);
        let remaining = claim_remaining(&prefs, "mocha");
        assert!(remaining > 3590 && remaining <= 3600);
    }

    #[test]
    fn test_adjust_cooldown_clamps_and_rejects_unknown() {
        let mut prefs = PrefStore::new();
        start_claim_cooldown(&mut prefs, "mocha", 100);

        assert!(adjust_cooldown(&mut prefs, "claim", "mocha", -150));
        assert_eq!(claim_remaining(&prefs, "mocha"), 0);

        assert!(adjust_cooldown(&mut prefs, "claim", "mocha", 40));
        assert!(claim_remaining(&prefs, "mocha") > 35);

        assert!(!adjust_cooldown(&mut prefs, "daily", "mocha", 10));
    }
}
