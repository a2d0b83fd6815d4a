//! Random token, username and password generation.
//!
//! Every generator takes the RNG as a parameter so callers decide how it is
//! seeded. None of this is suitable for real secrets: the store feeds these
//! from a `StdRng` seeded once from the clock.

use rand::Rng;

/// Length of an issued bearer token
pub const TOKEN_LEN: usize = 32;

/// Length of a generated seed-user password
pub const PASSWORD_LEN: usize = 8;

const TOKEN_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const PASSWORD_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

const ADJECTIVES: &[&str] = &[
    "blue", "fast", "bright", "silent", "swift", "lucky", "sunny", "calm",
];
const NOUNS: &[&str] = &[
    "whale", "fox", "eagle", "panda", "koala", "tiger", "otter", "lynx",
];
const NAME_SUFFIXES: usize = 100;

/// Number of distinct names `random_username` can produce.
pub const USERNAME_SPACE: usize = ADJECTIVES.len() * NOUNS.len() * NAME_SUFFIXES;

fn random_string<R: Rng>(rng: &mut R, charset: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

/// Generate a 32 character alphanumeric bearer token.
pub fn generate_token<R: Rng>(rng: &mut R) -> String {
    random_string(rng, TOKEN_CHARSET, TOKEN_LEN)
}

/// Generate a name shaped like `swift-otter-07`.
pub fn random_username<R: Rng>(rng: &mut R) -> String {
    let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.gen_range(0..NOUNS.len())];
    format!("{}-{}-{:02}", adjective, noun, rng.gen_range(0..NAME_SUFFIXES))
}

/// Generate an 8 character lowercase alphanumeric password.
pub fn random_password<R: Rng>(rng: &mut R) -> String {
    random_string(rng, PASSWORD_CHARSET, PASSWORD_LEN)
}
