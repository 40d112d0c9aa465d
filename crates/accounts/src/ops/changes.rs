use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    AccountsError, AdminChangeForm, AdminPasswordChangeForm, Form, ResultAccounts, SettingsUpdateForm, User,
    UserChanges, forms::normalize_email, users,
};

use super::{Accounts, with_tx};

impl Accounts {
    pub async fn user(&self, user_id: Uuid) -> ResultAccounts<User> {
        let model = self.find_user_model(&self.database, user_id).await?;
        User::try_from(model)
    }

    pub async fn user_by_email(&self, email: &str) -> ResultAccounts<Option<User>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(normalize_email(email)))
            .one(&self.database)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// All users ordered by email.
    pub async fn list_users(&self) -> ResultAccounts<Vec<User>> {
        users::Entity::find()
            .order_by_asc(users::Column::Email)
            .all(&self.database)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    /// Admin change form bound to the stored user.
    pub async fn change_form(&self, user_id: Uuid) -> ResultAccounts<AdminChangeForm> {
        let user = self.user(user_id).await?;
        Ok(AdminChangeForm::for_user(&user))
    }

    /// Save an admin change form. The stored password hash is left as is.
    pub async fn update_user(&self, form: &AdminChangeForm) -> ResultAccounts<User> {
        let changes = form.clean()?;
        let user = self.apply_changes(changes).await?;
        tracing::info!(user_id = %user.id, active = user.is_active, admin = user.admin, "updated user");
        Ok(user)
    }

    /// Settings form bound to the stored user.
    pub async fn settings_form(&self, user_id: Uuid) -> ResultAccounts<SettingsUpdateForm> {
        let user = self.user(user_id).await?;
        Ok(SettingsUpdateForm::for_user(&user))
    }

    /// Save a settings form. Only the email can change.
    pub async fn update_settings(&self, form: &SettingsUpdateForm) -> ResultAccounts<User> {
        let changes = form.clean()?;
        let user = self.apply_changes(changes).await?;
        tracing::info!(user_id = %user.id, "updated settings");
        Ok(user)
    }

    /// The dedicated password flow: validate, hash and store a new password.
    pub async fn set_password(
        &self,
        user_id: Uuid,
        form: &AdminPasswordChangeForm,
    ) -> ResultAccounts<()> {
        let user = self.user(user_id).await?;
        let raw = form
            .clean_with(&self.policy, Some(&user.email))?
            .into_inner();
        let hash = self.hash_password(raw).await?;

        with_tx!(self, |db_tx| {
            let model = self.find_user_model(&db_tx, user_id).await?;
            let mut active: users::ActiveModel = model.into();
            active.password = ActiveValue::Set(hash);
            active.update(&db_tx).await?;
            Ok::<(), AccountsError>(())
        })?;

        tracing::info!(user_id = %user_id, "password changed");
        Ok(())
    }

    async fn apply_changes(&self, changes: UserChanges) -> ResultAccounts<User> {
        with_tx!(self, |db_tx| {
            let model = self.find_user_model(&db_tx, changes.user_id).await?;
            if model.email != changes.email {
                self.require_email_available(&db_tx, &changes.email, Some(changes.user_id))
                    .await?;
            }

            // `changes.password` is only the initial hash echoed back, so the
            // column is never written from here.
            let mut active: users::ActiveModel = model.into();
            active.email = ActiveValue::Set(changes.email);
            if let Some(is_active) = changes.is_active {
                active.is_active = ActiveValue::Set(is_active);
            }
            if let Some(admin) = changes.admin {
                active.admin = ActiveValue::Set(admin);
            }
            let model = active.update(&db_tx).await?;
            User::try_from(model)
        })
    }
}
