use std::sync::Arc;

use sea_orm::{DatabaseConnection, DatabaseTransaction, QueryFilter, prelude::*};

use crate::{
    AccountsError, Argon2Hasher, FormErrors, HashSettings, PasswordHashing, PasswordPolicy,
    ResultAccounts, users,
};

mod auth;
mod changes;
mod creation;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Account service: saves the forms into the users table.
#[derive(Clone)]
pub struct Accounts {
    database: DatabaseConnection,
    hasher: Arc<dyn PasswordHashing>,
    policy: PasswordPolicy,
}

impl std::fmt::Debug for Accounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accounts")
            .field("database", &self.database)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Accounts {
    /// Return a builder for `Accounts`. Help to build the struct.
    pub fn builder() -> AccountsBuilder {
        AccountsBuilder::default()
    }

    pub fn password_policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    /// Hash a raw password on the blocking pool.
    async fn hash_password(&self, raw: String) -> ResultAccounts<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&raw))
            .await
            .map_err(|err| AccountsError::Hashing(err.to_string()))?
    }

    async fn verify_password(&self, raw: String, hash: String) -> ResultAccounts<bool> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&raw, &hash))
            .await
            .map_err(|err| AccountsError::Hashing(err.to_string()))?
    }

    async fn find_user_model<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
    ) -> ResultAccounts<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| AccountsError::KeyNotFound("user not exists".to_string()))
    }

    /// Fail with a field error on `email` if another user already has it.
    async fn require_email_available(
        &self,
        db: &DatabaseTransaction,
        email: &str,
        except: Option<Uuid>,
    ) -> ResultAccounts<()> {
        let mut query = users::Entity::find().filter(users::Column::Email.eq(email));
        if let Some(id) = except {
            query = query.filter(users::Column::Id.ne(id.to_string()));
        }
        if query.one(db).await?.is_some() {
            return Err(FormErrors::single("email", "User with this email already exists.").into());
        }
        Ok(())
    }
}

/// The builder for `Accounts`
#[derive(Default)]
pub struct AccountsBuilder {
    database: DatabaseConnection,
    hasher: Option<Arc<dyn PasswordHashing>>,
    policy: PasswordPolicy,
}

impl AccountsBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> AccountsBuilder {
        self.database = db;
        self
    }

    /// Pass the hashing capability. Defaults to Argon2id with default costs.
    pub fn hasher(mut self, hasher: impl PasswordHashing) -> AccountsBuilder {
        self.hasher = Some(Arc::new(hasher));
        self
    }

    pub fn password_policy(mut self, policy: PasswordPolicy) -> AccountsBuilder {
        self.policy = policy;
        self
    }

    /// Construct `Accounts`
    pub fn build(self) -> ResultAccounts<Accounts> {
        let hasher = match self.hasher {
            Some(hasher) => hasher,
            None => Arc::new(Argon2Hasher::new(HashSettings::default())?),
        };
        Ok(Accounts {
            database: self.database,
            hasher,
            policy: self.policy,
        })
    }
}
