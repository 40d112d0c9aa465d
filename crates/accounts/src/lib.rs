pub use error::AccountsError;
pub use forms::{
    AdminChangeForm, AdminCreationForm, AdminPasswordChangeForm, Form, FormErrors, NewPassword,
    NewUser, PublicSignUpForm, SettingsUpdateForm, UserChanges,
};
pub use ops::{Accounts, AccountsBuilder};
pub use password::{Argon2Hasher, HashItem, HashSettings, PasswordHashing, ReadOnlyPasswordHash};
pub use password_validation::PasswordPolicy;
pub use users::{PendingUser, User};

mod error;
pub mod forms;
mod ops;
mod password;
mod password_validation;
mod users;

pub type ResultAccounts<T> = Result<T, AccountsError>;
