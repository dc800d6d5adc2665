//! Deterministic response selector.
//!
//! Picks one response from a candidate list, pseudo-randomly but
//! reproducibly: the draw is seeded from a SHA-256 digest of the
//! lowercased question plus a 3-minute UTC time bucket, so the same
//! question asked twice inside one bucket gets the same answer.
//!
//! The generator is a locally scoped `StdRng` seeded per call; no global
//! random state is read or written.

use chrono::{DateTime, Timelike, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use sha2::{Digest, Sha256};

/// Width of the reproducibility window, in minutes.
pub const BUCKET_MINUTES: u32 = 3;

/// Quantize a timestamp to its 3-minute UTC bucket.
///
/// The minute-of-hour is truncated down to the nearest multiple of
/// [`BUCKET_MINUTES`] and formatted as `"YYYY-MM-DD HH:MM"`.
pub fn time_bucket(now: DateTime<Utc>) -> String {
    let minute = now.minute() - now.minute() % BUCKET_MINUTES;
    format!("{} {:02}:{:02}", now.format("%Y-%m-%d"), now.hour(), minute)
}

/// Deterministically select a response for a question.
///
/// Returns `None` only when `responses` is empty. Identical question
/// text (case-insensitive) in the same time bucket always yields the
/// same response; crossing a bucket boundary may change it.
pub fn select<'a>(
    question: &str,
    responses: &'a [String],
    now: DateTime<Utc>,
) -> Option<&'a str> {
    let seed_input = format!("{}_{}", question.to_lowercase(), time_bucket(now));
    let digest = Sha256::digest(seed_input.as_bytes());

    let mut rng = StdRng::from_seed(digest.into());
    responses.choose(&mut rng).map(String::as_str)
}
