//! Users table and the `User` account it stores.
//!
//! The email is the login identifier. `password` only ever holds an Argon2
//! PHC string produced by a [`PasswordHashing`] implementation.
//!
//! [`PasswordHashing`]: crate::PasswordHashing

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{AccountsError, ReadOnlyPasswordHash};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    pub is_active: bool,
    pub admin: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A stored account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Stored password hash, never the raw password.
    pub password: String,
    pub is_active: bool,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Display-only summary of the stored hash.
    pub fn password_hash(&self) -> ReadOnlyPasswordHash {
        ReadOnlyPasswordHash::from_hash(&self.password)
    }
}

impl TryFrom<Model> for User {
    type Error = AccountsError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| AccountsError::KeyNotFound("user not exists".to_string()))?,
            email: model.email,
            password: model.password,
            is_active: model.is_active,
            admin: model.admin,
            created_at: model.created_at,
        })
    }
}

/// A user built from a creation form whose password is already hashed but
/// which is not persisted yet.
///
/// Flags can still be adjusted before handing it to
/// [`Accounts::commit_user`](crate::Accounts::commit_user).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingUser {
    pub email: String,
    pub is_active: bool,
    pub admin: bool,
    password: String,
}

impl PendingUser {
    pub(crate) fn new(email: String, password_hash: String) -> Self {
        Self {
            email,
            is_active: true,
            admin: false,
            password: password_hash,
        }
    }

    /// The hash that will be stored.
    pub fn password(&self) -> &str {
        &self.password
    }

    pub(crate) fn into_active_model(self, id: Uuid, created_at: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(id.to_string()),
            email: ActiveValue::Set(self.email),
            password: ActiveValue::Set(self.password),
            is_active: ActiveValue::Set(self.is_active),
            admin: ActiveValue::Set(self.admin),
            created_at: ActiveValue::Set(created_at),
        }
    }
}
