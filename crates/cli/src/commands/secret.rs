//! Secret generation.

use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;

/// Number of random bytes in a generated secret.
const SECRET_BYTES: usize = 48;

/// Random base64 secret with enough entropy to pass config validation.
#[must_use]
pub fn random_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}

/// Print a new secret to stdout.
#[allow(clippy::print_stdout)]
pub fn generate() {
    println!("{}", random_secret());
}
