//! Password generation
//!
//! Every password has a lowercase letter at index 0, an uppercase letter at
//! index 1, a digit at index 2 and a special character at the last index.
//! Remaining positions come from the 62-character alphanumeric alphabet, so
//! special characters only ever appear at the end.
//!
//! All draws go through `Rng::gen_range` on a `CryptoRng`, which samples
//! without modulo bias.

use rand::rngs::OsRng;
use rand::{CryptoRng, Rng};

/// Shortest password the generator produces; shorter requests are clamped
pub const MIN_LENGTH: usize = 4;

pub const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
pub const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &[u8] = b"0123456789";
pub const SPECIAL: &[u8] = b"!@#$%^&*=+";

/// Interior alphabet: lower + upper + digits
pub const ALPHANUMERIC: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// One of the four disjoint character classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    Lower,
    Upper,
    Digit,
    Special,
}

impl CharClass {
    pub fn alphabet(&self) -> &'static [u8] {
        match self {
            Self::Lower => LOWER,
            Self::Upper => UPPER,
            Self::Digit => DIGITS,
            Self::Special => SPECIAL,
        }
    }

    pub fn contains(&self, c: u8) -> bool {
        self.alphabet().contains(&c)
    }

    /// Class of a character, `None` if it belongs to no class
    pub fn of(c: u8) -> Option<Self> {
        [Self::Lower, Self::Upper, Self::Digit, Self::Special]
            .into_iter()
            .find(|class| class.contains(c))
    }
}

/// Generate a password of `length` characters using the OS random source
///
/// Lengths below [`MIN_LENGTH`] (zero and negatives included) are silently
/// raised to it. There is no upper bound here; callers taking lengths from
/// users cap them first, as an unallocatable length aborts the process.
pub fn generate(length: i64) -> String {
    generate_with(&mut OsRng, length)
}

/// Generate a password drawing from a caller-supplied secure RNG
pub fn generate_with<R: Rng + CryptoRng>(rng: &mut R, length: i64) -> String {
    let length = usize::try_from(length.max(MIN_LENGTH as i64)).unwrap_or(usize::MAX);

    let mut password: Vec<u8> = (0..length - 1)
        .map(|_| pick(rng, ALPHANUMERIC))
        .collect();
    password.push(0);

    let password = place_character_with(rng, password, CharClass::Lower, 0);
    let password = place_character_with(rng, password, CharClass::Upper, 1);
    let mut password = place_character_with(rng, password, CharClass::Digit, 2);

    // Last position is always special, whatever was placed there before
    password[length - 1] = pick(rng, SPECIAL);

    // Every byte comes from an ASCII alphabet
    password.into_iter().map(char::from).collect()
}

/// Put a random character of `class` at `position`
///
/// Returns the buffer untouched when it is empty or `position` is out of
/// range; this never fails.
pub fn place_character(password: Vec<u8>, class: CharClass, position: usize) -> Vec<u8> {
    place_character_with(&mut OsRng, password, class, position)
}

/// [`place_character`] with a caller-supplied secure RNG
pub fn place_character_with<R: Rng + CryptoRng>(
    rng: &mut R,
    mut password: Vec<u8>,
    class: CharClass,
    position: usize,
) -> Vec<u8> {
    if position >= password.len() {
        return password;
    }
    password[position] = pick(rng, class.alphabet());
    password
}

fn pick<R: Rng + CryptoRng>(rng: &mut R, alphabet: &[u8]) -> u8 {
    alphabet[rng.gen_range(0..alphabet.len())]
}
