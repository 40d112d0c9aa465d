use accounts::{
    AccountsError, AdminCreationForm, AdminPasswordChangeForm, Argon2Hasher, Accounts,
    HashSettings, PublicSignUpForm,
};
use migration::MigratorTrait;
use quickcheck::TestResult;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

async fn accounts_with_db() -> (Accounts, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let hasher = Argon2Hasher::new(HashSettings {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap();
    let accounts = Accounts::builder()
        .database(db.clone())
        .hasher(hasher)
        .build()
        .unwrap();
    (accounts, db)
}

fn creation_form(email: &str, p1: &str, p2: &str) -> AdminCreationForm {
    AdminCreationForm {
        email: Some(email.to_string()),
        password1: Some(p1.to_string()),
        password2: Some(p2.to_string()),
    }
}

fn signup_form(email: Option<&str>, password: &str) -> PublicSignUpForm {
    PublicSignUpForm {
        email: email.map(ToString::to_string),
        password1: Some(password.to_string()),
        password2: Some(password.to_string()),
    }
}

async fn count_users(db: &DatabaseConnection) -> i64 {
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            "SELECT COUNT(*) AS n FROM users",
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

async fn stored_password(db: &DatabaseConnection, user_id: Uuid) -> String {
    let row = db
        .query_one(Statement::from_sql_and_values(
            db.get_database_backend(),
            "SELECT password FROM users WHERE id = ?",
            vec![user_id.to_string().into()],
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "password").unwrap()
}

#[tokio::test]
async fn mismatched_passwords_create_nothing() {
    let (accounts, db) = accounts_with_db().await;

    for (p1, p2) in [("secret", "Secret"), ("a", "b"), ("pass word", "password")] {
        let err = accounts
            .create_user(&creation_form("root@example.com", p1, p2))
            .await
            .unwrap_err();
        let AccountsError::Validation(errors) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(errors.field("password2"), ["Passwords don't match"]);
    }

    assert_eq!(count_users(&db).await, 0);
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

#[quickcheck_macros::quickcheck]
fn any_mismatched_pair_creates_nothing(password1: String, password2: String) -> TestResult {
    if password1.trim() == password2.trim() {
        return TestResult::discard();
    }

    block_on(async {
        let (accounts, db) = accounts_with_db().await;
        let result = accounts
            .create_user(&creation_form("root@example.com", &password1, &password2))
            .await;

        TestResult::from_bool(
            matches!(result, Err(AccountsError::Validation(_))) && count_users(&db).await == 0,
        )
    })
}

#[quickcheck_macros::quickcheck]
fn stored_password_is_never_cleartext(password: String) -> TestResult {
    let cleaned = password.trim().to_string();
    if cleaned.is_empty() {
        return TestResult::discard();
    }

    block_on(async {
        let (accounts, db) = accounts_with_db().await;
        let user = accounts
            .create_user(&creation_form("root@example.com", &password, &password))
            .await
            .unwrap();
        let stored = stored_password(&db, user.id).await;
        let authenticated = accounts
            .authenticate("root@example.com", &cleaned)
            .await
            .unwrap();

        TestResult::from_bool(
            stored != password && stored != cleaned && authenticated.is_some(),
        )
    })
}

#[tokio::test]
async fn created_user_stores_only_a_hash() {
    let (accounts, db) = accounts_with_db().await;

    for (idx, password) in ["x", "correct horse battery staple", "ünïcødé"]
        .into_iter()
        .enumerate()
    {
        let email = format!("user{idx}@example.com");
        let user = accounts
            .create_user(&creation_form(&email, password, password))
            .await
            .unwrap();

        let stored = stored_password(&db, user.id).await;
        assert_ne!(stored, password);
        assert!(stored.starts_with("$argon2id$"));
        assert!(user.is_active);
        assert!(!user.admin);
    }
}

#[tokio::test]
async fn deferred_commit_allows_adjusting_flags() {
    let (accounts, db) = accounts_with_db().await;

    let mut pending = accounts
        .prepare_user(&creation_form("boss@example.com", "pw", "pw"))
        .await
        .unwrap();
    assert_eq!(count_users(&db).await, 0);
    assert_ne!(pending.password(), "pw");

    pending.admin = true;
    let user = accounts.commit_user(pending).await.unwrap();
    assert!(user.admin);
    assert_eq!(count_users(&db).await, 1);
}

#[tokio::test]
async fn duplicate_email_is_a_field_error() {
    let (accounts, _db) = accounts_with_db().await;
    accounts
        .create_user(&creation_form("dup@example.com", "pw", "pw"))
        .await
        .unwrap();

    let err = accounts
        .create_user(&creation_form("dup@EXAMPLE.com", "pw", "pw"))
        .await
        .unwrap_err();
    let AccountsError::Validation(errors) = err else {
        panic!("expected a validation error");
    };
    assert_eq!(errors.field("email"), ["User with this email already exists."]);
}

#[tokio::test]
async fn sign_up_rejects_missing_email() {
    let (accounts, db) = accounts_with_db().await;

    let err = accounts
        .sign_up(&signup_form(None, "tangerine-Velvet-42"))
        .await
        .unwrap_err();
    let AccountsError::Validation(errors) = err else {
        panic!("expected a validation error");
    };
    assert_eq!(errors.field("email"), ["This field is required."]);
    assert_eq!(count_users(&db).await, 0);
}

#[tokio::test]
async fn sign_up_creates_active_user_and_authenticates() {
    let (accounts, _db) = accounts_with_db().await;

    let user = accounts
        .sign_up(&signup_form(Some("new@example.com"), "tangerine-Velvet-42"))
        .await
        .unwrap();
    assert!(user.is_active);
    assert!(!user.admin);

    let found = accounts
        .authenticate("new@example.com", "tangerine-Velvet-42")
        .await
        .unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));
    assert!(
        accounts
            .authenticate("new@example.com", "wrong")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        accounts
            .authenticate("nobody@example.com", "tangerine-Velvet-42")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn change_form_never_changes_the_hash() {
    let (accounts, db) = accounts_with_db().await;
    let user = accounts
        .create_user(&creation_form("alice@example.com", "pw", "pw"))
        .await
        .unwrap();
    let before = stored_password(&db, user.id).await;

    for submitted in ["new-cleartext", "", "$argon2id$v=19$m=8,t=1,p=1$AAAAAAAA$AAAAAAAAAAAAAAAA"] {
        let mut form = accounts.change_form(user.id).await.unwrap();
        form.password = Some(submitted.to_string());
        form.admin = true;
        form.is_active = true;
        accounts.update_user(&form).await.unwrap();
        assert_eq!(stored_password(&db, user.id).await, before);
    }

    let updated = accounts.user(user.id).await.unwrap();
    assert!(updated.admin);
}

#[tokio::test]
async fn deactivated_user_cannot_authenticate() {
    let (accounts, _db) = accounts_with_db().await;
    let user = accounts
        .create_user(&creation_form("gone@example.com", "pw", "pw"))
        .await
        .unwrap();

    let mut form = accounts.change_form(user.id).await.unwrap();
    form.is_active = false;
    accounts.update_user(&form).await.unwrap();

    assert!(
        accounts
            .authenticate("gone@example.com", "pw")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn settings_update_changes_email_only() {
    let (accounts, db) = accounts_with_db().await;
    let user = accounts
        .create_user(&creation_form("old@example.com", "pw", "pw"))
        .await
        .unwrap();
    let before = stored_password(&db, user.id).await;

    let mut form = accounts.settings_form(user.id).await.unwrap();
    form.email = Some("fresh@example.com".to_string());
    form.password = None;
    let updated = accounts.update_settings(&form).await.unwrap();

    assert_eq!(updated.email, "fresh@example.com");
    assert_eq!(updated.is_active, user.is_active);
    assert_eq!(updated.admin, user.admin);
    assert_eq!(stored_password(&db, user.id).await, before);
    assert!(accounts.user_by_email("old@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn settings_update_rejects_taken_email() {
    let (accounts, _db) = accounts_with_db().await;
    accounts
        .create_user(&creation_form("taken@example.com", "pw", "pw"))
        .await
        .unwrap();
    let user = accounts
        .create_user(&creation_form("me@example.com", "pw", "pw"))
        .await
        .unwrap();

    let mut form = accounts.settings_form(user.id).await.unwrap();
    form.email = Some("taken@example.com".to_string());
    let err = accounts.update_settings(&form).await.unwrap_err();
    let AccountsError::Validation(errors) = err else {
        panic!("expected a validation error");
    };
    assert!(errors.has("email"));
}

#[tokio::test]
async fn set_password_is_the_only_way_to_change_it() {
    let (accounts, db) = accounts_with_db().await;
    let user = accounts
        .create_user(&creation_form("carol@example.com", "old-pw", "old-pw"))
        .await
        .unwrap();
    let before = stored_password(&db, user.id).await;

    let form = AdminPasswordChangeForm {
        password1: Some("tangerine-Velvet-42".to_string()),
        password2: Some("tangerine-Velvet-42".to_string()),
    };
    accounts.set_password(user.id, &form).await.unwrap();

    assert_ne!(stored_password(&db, user.id).await, before);
    assert!(
        accounts
            .authenticate("carol@example.com", "tangerine-Velvet-42")
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        accounts
            .authenticate("carol@example.com", "old-pw")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let (accounts, _db) = accounts_with_db().await;
    assert_eq!(
        accounts.change_form(Uuid::new_v4()).await.unwrap_err(),
        AccountsError::KeyNotFound("user not exists".to_string())
    );
}

#[tokio::test]
async fn list_users_is_ordered_by_email() {
    let (accounts, _db) = accounts_with_db().await;
    for email in ["zed@example.com", "amy@example.com", "max@example.com"] {
        accounts
            .create_user(&creation_form(email, "pw", "pw"))
            .await
            .unwrap();
    }

    let emails: Vec<String> = accounts
        .list_users()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.email)
        .collect();
    assert_eq!(emails, ["amy@example.com", "max@example.com", "zed@example.com"]);
}
