//! Background color derivation.
//!
//! Every avatar gets a solid background picked from its initials alone:
//! sum the code points, then spread the sum over three channels with
//! different multipliers. No randomness and no state, so the same initials get
//! the same color on every machine, forever.
//!
//! Channels are confined to `20..=179` so the white foreground always has
//! contrast against the background.

use image::Rgba;

/// Lowest value any channel can take.
const CHANNEL_FLOOR: u64 = 20;

/// Width of the channel band above [`CHANNEL_FLOOR`].
const CHANNEL_SPAN: u64 = 160;

/// Per-channel multipliers (red, green, blue).
const MULTIPLIERS: [u64; 3] = [123, 456, 789];

/// Derive the opaque background color for `initials`.
///
/// ```text
/// sum = Σ code points
/// r   = 20 + (sum × 123) mod 160
/// g   = 20 + (sum × 456) mod 160
/// b   = 20 + (sum × 789) mod 160
/// ```
///
/// Total over every string; the empty string yields `(20, 20, 20, 255)`.
pub fn derive_color(initials: &str) -> Rgba<u8> {
    let sum = initials
        .chars()
        .fold(0u64, |acc, c| acc.wrapping_add(u64::from(c)));
    let [r, g, b] = MULTIPLIERS.map(|m| channel(sum, m));
    Rgba([r, g, b, u8::MAX])
}

fn channel(sum: u64, multiplier: u64) -> u8 {
    // Always < 180, so the narrowing is lossless.
    (CHANNEL_FLOOR + sum.wrapping_mul(multiplier) % CHANNEL_SPAN) as u8
}
