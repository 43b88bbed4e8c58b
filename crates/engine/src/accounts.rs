//! The player accounts store for multi-user mode.
//!
//! SQLite-backed: accounts, their privileges and their character
//! stats. Password hashing is a salted SHA-256 hex digest. Any failed
//! login yields the single, deliberately uninformative error
//! "Invalid name or password."

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use thiserror::Error;

use storyloom_domain::value_objects::races;
use storyloom_domain::{Gender, Stats};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Invalid name or password.")]
    InvalidLogin,

    /// A validation failure; the message is shown to the user.
    #[error("{0}")]
    Invalid(String),

    #[error("Unknown name.")]
    Unknown,

    #[error("account database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct Account {
    pub name: String,
    pub email: String,
    pub pw_hash: String,
    pub pw_salt: String,
    pub privileges: BTreeSet<String>,
    pub created: DateTime<Utc>,
    pub logged_in: Option<DateTime<Utc>>,
    pub banned: bool,
    pub stats: Stats,
}

impl Account {
    pub fn is_wizard(&self) -> bool {
        self.privileges.contains("wizard")
    }
}

/// The accounts store operations, as a port so the driver does not
/// care where the accounts live.
#[async_trait]
pub trait AccountsPort: Send + Sync {
    async fn get(&self, name: &str) -> Result<Account, AccountError>;
    async fn all_accounts(&self, having_privilege: Option<&str>)
        -> Result<Vec<Account>, AccountError>;
    async fn valid_password(&self, name: &str, password: &str) -> Result<(), AccountError>;
    async fn create(
        &self,
        name: &str,
        password: &str,
        email: &str,
        stats: Stats,
        privileges: BTreeSet<String>,
    ) -> Result<Account, AccountError>;
    async fn change_password_email(
        &self,
        name: &str,
        old_password: &str,
        new_password: Option<&str>,
        new_email: Option<&str>,
    ) -> Result<(), AccountError>;
    async fn update_privileges(
        &self,
        name: &str,
        privileges: BTreeSet<String>,
    ) -> Result<(), AccountError>;
    async fn ban(&self, name: &str) -> Result<(), AccountError>;
    async fn unban(&self, name: &str) -> Result<(), AccountError>;
    async fn logged_in(&self, name: &str) -> Result<(), AccountError>;
}

/// SQLite implementation of the accounts store.
pub struct SqliteAccounts {
    pool: SqlitePool,
}

impl SqliteAccounts {
    /// Open (or create) the accounts database. A failure here is
    /// fatal for mud mode.
    pub async fn connect(db_path: &str) -> Result<Self, AccountError> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS Account(
                id INTEGER PRIMARY KEY,
                name VARCHAR NOT NULL,
                email VARCHAR NOT NULL,
                pw_hash VARCHAR NOT NULL,
                pw_salt VARCHAR NOT NULL,
                created TIMESTAMP NOT NULL,
                logged_in TIMESTAMP NULL,
                banned INTEGER NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_account_name ON Account(name)")
            .execute(&pool)
            .await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS Privilege(
                id INTEGER PRIMARY KEY,
                account INTEGER NOT NULL,
                privilege VARCHAR NOT NULL,
                FOREIGN KEY(account) REFERENCES Account(id)
            )
            "#,
        )
        .execute(&pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_privilege_account ON Privilege(account)")
            .execute(&pool)
            .await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS CharStat(
                id INTEGER PRIMARY KEY,
                account INTEGER NOT NULL,
                gender CHAR(1) NOT NULL,
                race VARCHAR NULL,
                level INTEGER NOT NULL,
                xp INTEGER NOT NULL,
                hp INTEGER NOT NULL,
                ac INTEGER NOT NULL,
                maxhp_dice VARCHAR NULL,
                attack_dice VARCHAR NULL,
                agi INTEGER NOT NULL,
                cha INTEGER NOT NULL,
                int INTEGER NOT NULL,
                lck INTEGER NOT NULL,
                spd INTEGER NOT NULL,
                sta INTEGER NOT NULL,
                str INTEGER NOT NULL,
                wis INTEGER NOT NULL,
                alignment INTEGER NOT NULL,
                FOREIGN KEY(account) REFERENCES Account(id)
            )
            "#,
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }

    async fn account_id(&self, name: &str) -> Result<i64, AccountError> {
        let row = sqlx::query("SELECT id FROM Account WHERE name=?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| r.get::<i64, _>("id")).ok_or(AccountError::Unknown)
    }

    async fn fetch_account(&self, account_id: i64) -> Result<Account, AccountError> {
        let account_row = sqlx::query("SELECT * FROM Account WHERE id=?")
            .bind(account_id)
            .fetch_one(&self.pool)
            .await?;
        let privilege_rows = sqlx::query("SELECT privilege FROM Privilege WHERE account=?")
            .bind(account_id)
            .fetch_all(&self.pool)
            .await?;
        let privileges: BTreeSet<String> = privilege_rows
            .iter()
            .map(|r| r.get::<String, _>("privilege"))
            .collect();
        let stats_row = sqlx::query("SELECT * FROM CharStat WHERE account=?")
            .bind(account_id)
            .fetch_one(&self.pool)
            .await?;
        let gender = Gender::parse(&stats_row.get::<String, _>("gender"))
            .map_err(|e| AccountError::Invalid(e.to_string()))?;
        let stats = Stats {
            gender,
            race: stats_row
                .get::<Option<String>, _>("race")
                .unwrap_or_else(|| "human".to_string()),
            level: stats_row.get("level"),
            xp: stats_row.get("xp"),
            hp: stats_row.get("hp"),
            ac: stats_row.get("ac"),
            maxhp_dice: stats_row.get("maxhp_dice"),
            attack_dice: stats_row.get("attack_dice"),
            agi: stats_row.get("agi"),
            cha: stats_row.get("cha"),
            int: stats_row.get("int"),
            lck: stats_row.get("lck"),
            spd: stats_row.get("spd"),
            sta: stats_row.get("sta"),
            str: stats_row.get("str"),
            wis: stats_row.get("wis"),
            alignment: stats_row.get("alignment"),
        };
        Ok(Account {
            name: account_row.get("name"),
            email: account_row.get("email"),
            pw_hash: account_row.get("pw_hash"),
            pw_salt: account_row.get("pw_salt"),
            privileges,
            created: account_row.get("created"),
            logged_in: account_row.get("logged_in"),
            banned: account_row.get::<i64, _>("banned") != 0,
            stats,
        })
    }
}

/// Hash a password with the given salt, or a fresh random one.
/// Returns (hash, salt), both hex.
pub fn password_hash(password: &str, salt: Option<&str>) -> (String, String) {
    let salt = match salt {
        Some(salt) => salt.to_string(),
        None => {
            let mut bytes = [0u8; 16];
            rand::thread_rng().fill_bytes(&mut bytes);
            hex::encode(bytes)
        }
    };
    let digest = Sha256::digest(format!("{}{}", salt, password).as_bytes());
    (hex::encode(digest), salt)
}

/// Validate a password: length >= 6, at least one letter and one digit.
pub fn accept_password(password: &str) -> Result<(), AccountError> {
    if password.len() >= 6
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
    {
        return Ok(());
    }
    Err(AccountError::Invalid(
        "Password should be minimum length 6, contain letters, at least one number, \
         and optionally other characters."
            .to_string(),
    ))
}

/// Validate an account name: 3-16 lowercase letters, not blocked.
pub fn accept_name(name: &str) -> Result<(), AccountError> {
    if name.len() >= 3 && name.len() <= 16 && name.chars().all(|c| c.is_ascii_lowercase()) {
        if BLOCKED_NAMES.contains(&name) {
            return Err(AccountError::Invalid("That name is not available.".to_string()));
        }
        return Ok(());
    }
    Err(AccountError::Invalid(
        "Name should be all lowercase letters [a-z] and length 3 to 16.".to_string(),
    ))
}

/// Validate an email address: local part @ domain, no stray whitespace.
pub fn accept_email(email: &str) -> Result<(), AccountError> {
    if let Some((user, domain)) = email.split_once('@') {
        if !user.is_empty() && !domain.is_empty() && user.trim() == user && domain.trim() == domain
        {
            return Ok(());
        }
    }
    Err(AccountError::Invalid("Invalid email address.".to_string()))
}

pub fn accept_privilege(privilege: &str) -> Result<(), AccountError> {
    if privilege == "wizard" {
        Ok(())
    } else {
        Err(AccountError::Invalid(format!(
            "Invalid privilege: {}",
            privilege
        )))
    }
}

#[async_trait]
impl AccountsPort for SqliteAccounts {
    async fn get(&self, name: &str) -> Result<Account, AccountError> {
        let id = self.account_id(name).await?;
        self.fetch_account(id).await
    }

    async fn all_accounts(
        &self,
        having_privilege: Option<&str>,
    ) -> Result<Vec<Account>, AccountError> {
        let rows = match having_privilege {
            Some(privilege) => {
                sqlx::query(
                    "SELECT a.id FROM Account a INNER JOIN Privilege p \
                     ON p.account=a.id AND p.privilege=? ORDER BY a.name",
                )
                .bind(privilege)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query("SELECT id FROM Account ORDER BY name")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        let mut accounts = Vec::with_capacity(rows.len());
        for row in rows {
            accounts.push(self.fetch_account(row.get("id")).await?);
        }
        Ok(accounts)
    }

    async fn valid_password(&self, name: &str, password: &str) -> Result<(), AccountError> {
        let row = sqlx::query("SELECT pw_hash, pw_salt FROM Account WHERE name=?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        if let Some(row) = row {
            let stored_hash: String = row.get("pw_hash");
            let stored_salt: String = row.get("pw_salt");
            let (hash, _) = password_hash(password, Some(&stored_salt));
            if hash == stored_hash {
                return Ok(());
            }
        }
        Err(AccountError::InvalidLogin)
    }

    async fn create(
        &self,
        name: &str,
        password: &str,
        email: &str,
        stats: Stats,
        privileges: BTreeSet<String>,
    ) -> Result<Account, AccountError> {
        let name = name.trim();
        let email = email.trim();
        accept_name(name)?;
        accept_password(password)?;
        accept_email(email)?;
        for privilege in &privileges {
            accept_privilege(privilege)?;
        }
        if races::race(&stats.race).is_none() {
            return Err(AccountError::Invalid(format!(
                "Unknown race: {}",
                stats.race
            )));
        }
        let existing = sqlx::query("SELECT COUNT(*) AS n FROM Account WHERE name=?")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        if existing.get::<i64, _>("n") > 0 {
            return Err(AccountError::Invalid("That name is not available.".to_string()));
        }
        let created = Utc::now();
        let (pw_hash, pw_salt) = password_hash(password, None);
        let result = sqlx::query(
            "INSERT INTO Account(name, email, pw_hash, pw_salt, created, banned) \
             VALUES (?,?,?,?,?,0)",
        )
        .bind(name)
        .bind(email)
        .bind(&pw_hash)
        .bind(&pw_salt)
        .bind(created)
        .execute(&self.pool)
        .await?;
        let account_id = result.last_insert_rowid();
        for privilege in &privileges {
            sqlx::query("INSERT INTO Privilege(account, privilege) VALUES (?,?)")
                .bind(account_id)
                .bind(privilege)
                .execute(&self.pool)
                .await?;
        }
        sqlx::query(
            "INSERT INTO CharStat(account, gender, race, level, xp, hp, ac, maxhp_dice, \
             attack_dice, agi, cha, int, lck, spd, sta, str, wis, alignment) \
             VALUES (?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?)",
        )
        .bind(account_id)
        .bind(stats.gender.letter())
        .bind(&stats.race)
        .bind(stats.level)
        .bind(stats.xp)
        .bind(stats.hp)
        .bind(stats.ac)
        .bind(&stats.maxhp_dice)
        .bind(&stats.attack_dice)
        .bind(stats.agi)
        .bind(stats.cha)
        .bind(stats.int)
        .bind(stats.lck)
        .bind(stats.spd)
        .bind(stats.sta)
        .bind(stats.str)
        .bind(stats.wis)
        .bind(stats.alignment)
        .execute(&self.pool)
        .await?;
        Ok(Account {
            name: name.to_string(),
            email: email.to_string(),
            pw_hash,
            pw_salt,
            privileges,
            created,
            logged_in: None,
            banned: false,
            stats,
        })
    }

    async fn change_password_email(
        &self,
        name: &str,
        old_password: &str,
        new_password: Option<&str>,
        new_email: Option<&str>,
    ) -> Result<(), AccountError> {
        self.valid_password(name, old_password).await?;
        if let Some(password) = new_password {
            accept_password(password)?;
        }
        let new_email = new_email.map(str::trim).filter(|e| !e.is_empty());
        if let Some(email) = new_email {
            accept_email(email)?;
        }
        let account_id = self.account_id(name).await?;
        if let Some(password) = new_password {
            let (pw_hash, pw_salt) = password_hash(password, None);
            sqlx::query("UPDATE Account SET pw_hash=?, pw_salt=? WHERE id=?")
                .bind(pw_hash)
                .bind(pw_salt)
                .bind(account_id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(email) = new_email {
            sqlx::query("UPDATE Account SET email=? WHERE id=?")
                .bind(email)
                .bind(account_id)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    async fn update_privileges(
        &self,
        name: &str,
        privileges: BTreeSet<String>,
    ) -> Result<(), AccountError> {
        for privilege in &privileges {
            accept_privilege(privilege)?;
        }
        let account_id = self.account_id(name).await?;
        sqlx::query("DELETE FROM Privilege WHERE account=?")
            .bind(account_id)
            .execute(&self.pool)
            .await?;
        for privilege in &privileges {
            sqlx::query("INSERT INTO Privilege(account, privilege) VALUES (?,?)")
                .bind(account_id)
                .bind(privilege)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    async fn ban(&self, name: &str) -> Result<(), AccountError> {
        let updated = sqlx::query("UPDATE Account SET banned=1 WHERE name=?")
            .bind(name)
            .execute(&self.pool)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(AccountError::Unknown);
        }
        Ok(())
    }

    async fn unban(&self, name: &str) -> Result<(), AccountError> {
        let updated = sqlx::query("UPDATE Account SET banned=0 WHERE name=?")
            .bind(name)
            .execute(&self.pool)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(AccountError::Unknown);
        }
        Ok(())
    }

    async fn logged_in(&self, name: &str) -> Result<(), AccountError> {
        sqlx::query("UPDATE Account SET logged_in=? WHERE name=?")
            .bind(Utc::now())
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

const BLOCKED_NAMES: &[&str] = &[
    "me", "you", "us", "them", "they", "their", "theirs", "he", "him", "his", "she", "her",
    "hers", "it", "its", "yes", "no", "all", "everyone", "everybody", "everything", "wizard",
    "admin", "root", "god",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> Stats {
        Stats::from_race("human", Gender::Female).expect("race exists")
    }

    fn temp_store() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("accounts.sqlite");
        (dir, path.to_string_lossy().to_string())
    }

    #[test]
    fn password_validation_rules() {
        assert!(accept_password("short1").is_ok());
        assert!(accept_password("abc12").is_err()); // too short
        assert!(accept_password("onlyletters").is_err());
        assert!(accept_password("123456789").is_err());
    }

    #[test]
    fn name_validation_rules() {
        assert!(accept_name("julie").is_ok());
        assert!(accept_name("ab").is_err());
        assert!(accept_name("Julie").is_err());
        assert!(accept_name("julie2").is_err());
        assert!(accept_name("wizard").is_err()); // blocked
    }

    #[test]
    fn email_validation_rules() {
        assert!(accept_email("julie@example.com").is_ok());
        assert!(accept_email("julie").is_err());
        assert!(accept_email("@example.com").is_err());
        assert!(accept_email("julie @example.com").is_err());
    }

    #[test]
    fn hashing_is_salted_and_reproducible() {
        let (hash1, salt) = password_hash("secret1", None);
        let (hash2, _) = password_hash("secret1", Some(&salt));
        assert_eq!(hash1, hash2);
        let (hash3, other_salt) = password_hash("secret1", None);
        assert_ne!(salt, other_salt);
        assert_ne!(hash1, hash3);
    }

    #[tokio::test]
    async fn create_get_and_login_round_trip() {
        let (_dir, path) = temp_store();
        let store = SqliteAccounts::connect(&path).await.expect("connect");
        let account = store
            .create(
                "julie",
                "secret1",
                "julie@example.com",
                stats(),
                BTreeSet::new(),
            )
            .await
            .expect("create");
        assert!(!account.is_wizard());
        store.valid_password("julie", "secret1").await.expect("valid");
        let err = store.valid_password("julie", "wrong1").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid name or password.");
        let err = store.valid_password("nobody", "secret1").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid name or password.");
        let fetched = store.get("julie").await.expect("get");
        assert_eq!(fetched.email, "julie@example.com");
        assert_eq!(fetched.stats.gender, Gender::Female);
        assert!(fetched.logged_in.is_none());
        store.logged_in("julie").await.expect("stamp");
        assert!(store.get("julie").await.expect("get").logged_in.is_some());
    }

    #[tokio::test]
    async fn duplicate_names_are_refused() {
        let (_dir, path) = temp_store();
        let store = SqliteAccounts::connect(&path).await.expect("connect");
        store
            .create("julie", "secret1", "j@example.com", stats(), BTreeSet::new())
            .await
            .expect("create");
        let err = store
            .create("julie", "other2pw", "x@example.com", stats(), BTreeSet::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "That name is not available.");
    }

    #[tokio::test]
    async fn privileges_ban_and_filtering() {
        let (_dir, path) = temp_store();
        let store = SqliteAccounts::connect(&path).await.expect("connect");
        let mut wizard_privs = BTreeSet::new();
        wizard_privs.insert("wizard".to_string());
        store
            .create("merlin", "secret1", "m@example.com", stats(), wizard_privs)
            .await
            .expect("create wizard");
        store
            .create("julie", "secret1", "j@example.com", stats(), BTreeSet::new())
            .await
            .expect("create player");
        let wizards = store.all_accounts(Some("wizard")).await.expect("wizards");
        assert_eq!(wizards.len(), 1);
        assert_eq!(wizards[0].name, "merlin");
        assert_eq!(store.all_accounts(None).await.expect("all").len(), 2);
        store.ban("julie").await.expect("ban");
        assert!(store.get("julie").await.expect("get").banned);
        store.unban("julie").await.expect("unban");
        assert!(!store.get("julie").await.expect("get").banned);
        assert!(matches!(store.ban("nobody").await, Err(AccountError::Unknown)));
        store
            .update_privileges("julie", ["wizard".to_string()].into())
            .await
            .expect("promote");
        assert!(store.get("julie").await.expect("get").is_wizard());
    }

    #[tokio::test]
    async fn change_password_and_email() {
        let (_dir, path) = temp_store();
        let store = SqliteAccounts::connect(&path).await.expect("connect");
        store
            .create("julie", "secret1", "j@example.com", stats(), BTreeSet::new())
            .await
            .expect("create");
        store
            .change_password_email("julie", "secret1", Some("newpass2"), Some("new@example.com"))
            .await
            .expect("change");
        store.valid_password("julie", "newpass2").await.expect("new pw");
        assert!(store.valid_password("julie", "secret1").await.is_err());
        assert_eq!(store.get("julie").await.expect("get").email, "new@example.com");
        // changing anything requires the current password
        assert!(store
            .change_password_email("julie", "wrongpw1", None, Some("x@example.com"))
            .await
            .is_err());
    }
}
