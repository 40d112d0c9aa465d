//! Password hashing and the read-only display of stored hashes.
//!
//! Hashes are Argon2id PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`).

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};

use crate::{AccountsError, ResultAccounts};

/// Number of leading characters of salt/hash left visible in summaries.
const UNMASKED_CHARS: usize = 6;

/// Hashing capability used when saving passwords and authenticating.
pub trait PasswordHashing: Send + Sync + 'static {
    /// Hash a raw password into a storable string.
    fn hash(&self, raw: &str) -> ResultAccounts<String>;

    /// Check a raw password against a stored hash.
    fn verify(&self, raw: &str, hash: &str) -> ResultAccounts<bool>;
}

/// Argon2 cost parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashSettings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashSettings {
    fn default() -> Self {
        Self {
            memory_kib: 15000,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Argon2id hasher.
#[derive(Clone, Debug)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new(settings: HashSettings) -> ResultAccounts<Self> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|err| AccountsError::Hashing(err.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHashing for Argon2Hasher {
    fn hash(&self, raw: &str) -> ResultAccounts<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(raw.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| AccountsError::Hashing(err.to_string()))
    }

    fn verify(&self, raw: &str, hash: &str) -> ResultAccounts<bool> {
        let parsed =
            PasswordHash::new(hash).map_err(|err| AccountsError::Hashing(err.to_string()))?;
        // Cost parameters come from the stored hash, not from `self.params`.
        match self.argon2().verify_password(raw.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(AccountsError::Hashing(err.to_string())),
        }
    }
}

/// One labelled entry of a hash summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashItem {
    pub label: String,
    pub value: String,
}

/// Display-only view of a stored password hash.
///
/// It never carries anything a client could submit back as a password:
/// the salt and the hash are masked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReadOnlyPasswordHash {
    Unset,
    Invalid,
    Summary { items: Vec<HashItem> },
}

impl ReadOnlyPasswordHash {
    pub fn from_hash(hash: &str) -> Self {
        if hash.is_empty() {
            return Self::Unset;
        }
        let Ok(parsed) = PasswordHash::new(hash) else {
            return Self::Invalid;
        };
        let ident = parsed.algorithm.as_str();
        if !ident.starts_with("argon2") {
            return Self::Invalid;
        }

        let mut items = vec![
            item("algorithm", "argon2"),
            item("variety", ident),
        ];
        if let Some(version) = parsed.version {
            items.push(item("version", &version.to_string()));
        }
        for (label, key) in [("memory cost", "m"), ("time cost", "t"), ("parallelism", "p")] {
            if let Some(value) = parsed.params.get_decimal(key) {
                items.push(item(label, &value.to_string()));
            }
        }
        if let Some(salt) = parsed.salt {
            items.push(item("salt", &mask_hash(salt.as_str())));
        }
        if let Some(output) = parsed.hash {
            items.push(item("hash", &mask_hash(&output.to_string())));
        }
        Self::Summary { items }
    }
}

impl std::fmt::Display for ReadOnlyPasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => f.write_str("No password set."),
            Self::Invalid => f.write_str("Invalid password format or unknown hashing algorithm."),
            Self::Summary { items } => {
                let rendered: Vec<String> = items
                    .iter()
                    .map(|item| format!("{}: {}", item.label, item.value))
                    .collect();
                f.write_str(&rendered.join(" "))
            }
        }
    }
}

fn item(label: &str, value: &str) -> HashItem {
    HashItem {
        label: label.to_string(),
        value: value.to_string(),
    }
}

/// Keep the first few characters and replace the rest with `*`.
fn mask_hash(value: &str) -> String {
    value
        .chars()
        .enumerate()
        .map(|(idx, ch)| if idx < UNMASKED_CHARS { ch } else { '*' })
        .collect()
}
