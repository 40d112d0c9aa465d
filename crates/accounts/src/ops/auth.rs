use crate::{AccountsError, ResultAccounts, User};

use super::Accounts;

impl Accounts {
    /// Check an email/password pair.
    ///
    /// Returns `None` for unknown emails, wrong passwords and inactive
    /// accounts alike.
    pub async fn authenticate(&self, email: &str, password: &str) -> ResultAccounts<Option<User>> {
        let Some(user) = self.user_by_email(email).await? else {
            // Hash anyway so unknown emails cost as much as wrong passwords.
            self.hash_password(password.to_string()).await?;
            tracing::warn!("authentication failed: unknown email");
            return Ok(None);
        };

        let verified = match self
            .verify_password(password.to_string(), user.password.clone())
            .await
        {
            Ok(verified) => verified,
            Err(AccountsError::Hashing(err)) => {
                tracing::error!(user_id = %user.id, "stored password hash is unusable: {err}");
                false
            }
            Err(err) => return Err(err),
        };

        if !verified {
            tracing::warn!(user_id = %user.id, "authentication failed: wrong password");
            return Ok(None);
        }
        if !user.is_active {
            tracing::warn!(user_id = %user.id, "authentication failed: inactive user");
            return Ok(None);
        }
        Ok(Some(user))
    }
}
