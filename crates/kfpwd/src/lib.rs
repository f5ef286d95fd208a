//! kfpwd - local password generator and credential store
//!
//! Generates passwords with a fixed composition (lowercase first, uppercase
//! second, digit third, special character last) and keeps named credentials
//! in a SQLite file next to the executable. Nothing leaves the machine.

pub mod generator;
pub mod store;

pub use generator::{generate, place_character, CharClass};
pub use store::{Credential, CredentialStore, StoreError};
