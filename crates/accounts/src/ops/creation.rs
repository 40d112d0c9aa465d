use chrono::Utc;
use sea_orm::{TransactionTrait, prelude::*};

use crate::{AdminCreationForm, Form, PendingUser, PublicSignUpForm, ResultAccounts, User};

use super::{Accounts, with_tx};

impl Accounts {
    /// Clean an admin creation form and hash its password without saving.
    ///
    /// Nothing is hashed when the form does not clean.
    pub async fn prepare_user(&self, form: &AdminCreationForm) -> ResultAccounts<PendingUser> {
        let (email, raw) = form.clean()?.into_parts();
        let hash = self.hash_password(raw).await?;
        Ok(PendingUser::new(email, hash))
    }

    /// Persist a user built by [`Accounts::prepare_user`].
    pub async fn commit_user(&self, pending: PendingUser) -> ResultAccounts<User> {
        let user = with_tx!(self, |db_tx| {
            self.require_email_available(&db_tx, &pending.email, None)
                .await?;
            let model = pending
                .into_active_model(Uuid::new_v4(), Utc::now())
                .insert(&db_tx)
                .await?;
            User::try_from(model)
        })?;

        tracing::info!(user_id = %user.id, admin = user.admin, "created user");
        Ok(user)
    }

    /// Admin creation: clean, hash and save.
    pub async fn create_user(&self, form: &AdminCreationForm) -> ResultAccounts<User> {
        let pending = self.prepare_user(form).await?;
        self.commit_user(pending).await
    }

    /// Public sign-up. The account starts active and without admin rights.
    pub async fn sign_up(&self, form: &PublicSignUpForm) -> ResultAccounts<User> {
        let (email, raw) = form.clean_with(&self.policy)?.into_parts();
        let hash = self.hash_password(raw).await?;
        self.commit_user(PendingUser::new(email, hash)).await
    }
}
