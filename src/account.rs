//! User accounts and their credential file.
//!
//! Passwords are stored only as a SHA-256 digest in lowercase hex. Nothing
//! in this module compares or persists plaintext.

use crate::codec::{check_storable, line_writer, read_lines, ACCOUNT_DELIMITER};
use crate::config::StoreConfig;
use crate::error::{LineError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, ErrorKind};

/// Compute the SHA-256 digest of `password` as lowercase hex.
///
/// ```
/// use sales_ledger::account::hash_password;
///
/// let hash = hash_password("secret1");
/// assert_eq!(hash.len(), 64);
/// ```
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// A registered user as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,

    /// Hex SHA-256 of the password.
    pub password_hash: String,

    pub full_name: String,

    pub business_name: Option<String>,
}

impl Account {
    /// Creates an account, hashing `password`.
    pub fn new(
        username: impl Into<String>,
        password: &str,
        full_name: impl Into<String>,
        business_name: Option<String>,
    ) -> Self {
        Account {
            username: username.into(),
            password_hash: hash_password(password),
            full_name: full_name.into(),
            business_name: business_name.filter(|b| !b.is_empty()),
        }
    }

    /// Returns `true` if `password` hashes to the stored digest.
    pub fn verify_password(&self, password: &str) -> bool {
        hash_password(password) == self.password_hash
    }

    /// The publicly visible part of the account.
    pub fn view(&self) -> AccountView {
        AccountView {
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            business_name: self.business_name.clone(),
        }
    }

    fn to_fields(&self) -> [&str; AccountRecord::FIELDS] {
        [
            self.username.as_str(),
            self.password_hash.as_str(),
            self.full_name.as_str(),
            self.business_name.as_deref().unwrap_or(""),
        ]
    }
}

/// Account data safe to hand back to a caller. Never carries the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub username: String,
    pub full_name: String,
    pub business_name: Option<String>,
}

/// Raw `username|passwordHash|fullName|businessName` line.
#[derive(Debug, Deserialize)]
struct AccountRecord {
    username: String,
    password_hash: String,
    full_name: String,
    business_name: String,
}

impl AccountRecord {
    const FIELDS: usize = 4;

    fn parse(self) -> std::result::Result<Account, LineError> {
        if self.username.is_empty() {
            return Err(LineError::invalid("username", &self.username));
        }
        if self.password_hash.is_empty() {
            return Err(LineError::invalid("password hash", &self.password_hash));
        }
        Ok(Account {
            username: self.username,
            password_hash: self.password_hash,
            full_name: self.full_name,
            business_name: Some(self.business_name).filter(|b| !b.is_empty()),
        })
    }
}

/// File-backed store of all accounts.
///
/// Uniqueness of usernames is the caller's job: check [`exists`](Self::exists)
/// before [`save`](Self::save). Two registrations racing each other can both
/// pass the check.
#[derive(Debug, Clone)]
pub struct AccountStore {
    config: StoreConfig,
}

impl AccountStore {
    pub fn new(config: StoreConfig) -> Self {
        AccountStore { config }
    }

    /// Returns `true` if an account named `username` is on file.
    pub fn exists(&self, username: &str) -> Result<bool> {
        Ok(self.find(username)?.is_some())
    }

    /// Appends `account` to the credential file.
    ///
    /// Refuses, without touching the file, any field holding `|` or a line break.
    pub fn save(&self, account: &Account) -> Result<()> {
        let fields = account.to_fields();
        check_storable(&fields, ACCOUNT_DELIMITER)?;
        fs::create_dir_all(self.config.root())?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.config.users_path())?;

        let mut writer = line_writer(file, ACCOUNT_DELIMITER);
        writer.write_record(fields)?;
        writer.flush()?;

        debug!("Saved account {}", account.username);
        Ok(())
    }

    /// First account named `username`, if any.
    pub fn find(&self, username: &str) -> Result<Option<Account>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|account| account.username == username))
    }

    fn load(&self) -> Result<Vec<Account>> {
        let path = self.config.users_path();
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        read_lines(
            BufReader::new(file),
            ACCOUNT_DELIMITER,
            AccountRecord::FIELDS,
            &path,
            AccountRecord::parse,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, AccountStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::new(StoreConfig::new(dir.path()));
        (dir, store)
    }

    #[test]
    fn test_hash_is_fixed_size_hex() {
        let hash = hash_password("secret1");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash_password("secret1"));
        assert_ne!(hash, hash_password("secret2"));
    }

    #[test]
    fn test_hash_known_vector() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_verify_password() {
        let account = Account::new("alice", "secret1", "Alice", None);
        assert_ne!(account.password_hash, "secret1");
        assert!(account.verify_password("secret1"));
        assert!(!account.verify_password("Secret1"));
        assert!(!account.verify_password(""));
    }

    #[test]
    fn test_missing_file_has_no_accounts() {
        let (_dir, store) = store();
        assert!(!store.exists("alice").unwrap());
        assert_eq!(store.find("alice").unwrap(), None);
    }

    #[test]
    fn test_save_then_find() {
        let (dir, store) = store();
        let alice = Account::new("alice", "secret1", "Alice A", Some("Alice's Shop".into()));
        let bob = Account::new("bob", "hunter22", "Bob B", None);
        store.save(&alice).unwrap();
        store.save(&bob).unwrap();

        assert!(store.exists("alice").unwrap());
        assert!(store.exists("bob").unwrap());
        assert!(!store.exists("carol").unwrap());
        assert_eq!(store.find("alice").unwrap(), Some(alice.clone()));
        assert_eq!(store.find("bob").unwrap().unwrap().business_name, None);

        let contents = fs::read_to_string(dir.path().join("users.txt")).unwrap();
        assert_eq!(
            contents.lines().next().unwrap(),
            format!("alice|{}|Alice A|Alice's Shop", alice.password_hash)
        );
        assert!(contents.lines().nth(1).unwrap().ends_with("|Bob B|"));
    }

    #[test]
    fn test_find_returns_first_match() {
        let (_dir, store) = store();
        let first = Account::new("alice", "secret1", "Alice", None);
        let second = Account::new("alice", "other99", "Impostor", None);
        store.save(&first).unwrap();
        store.save(&second).unwrap();

        assert_eq!(store.find("alice").unwrap(), Some(first));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let (dir, store) = store();
        fs::write(
            dir.path().join("users.txt"),
            "garbage\n|nohash|X|\nbob|abcd|Bob|Shop\n",
        )
        .unwrap();

        assert!(store.exists("bob").unwrap());
        assert!(!store.exists("garbage").unwrap());
    }

    #[test]
    fn test_save_refuses_line_breaking_fields() {
        let (dir, store) = store();
        store.save(&Account::new("bob", "hunter22", "Bob", None)).unwrap();
        let path = dir.path().join("users.txt");
        let before = fs::read_to_string(&path).unwrap();

        let injected = Account::new("eve", "secret1", "Eve\nmallory|x|M|", None);
        let piped = Account::new("pipe", "secret1", "A|B", None);
        assert!(matches!(
            store.save(&injected),
            Err(crate::LedgerError::UnstorableField(_))
        ));
        assert!(store.save(&piped).is_err());

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert!(!store.exists("mallory").unwrap());
        assert!(!store.exists("pipe").unwrap());
    }

    #[test]
    fn test_view_omits_hash() {
        let account = Account::new("alice", "secret1", "Alice", Some(String::new()));
        let json = serde_json::to_value(account.view()).unwrap();

        assert_eq!(json["username"], "alice");
        assert_eq!(json["fullName"], "Alice");
        assert!(json["businessName"].is_null());
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains(&account.password_hash));
    }
}
