//! Integration tests for the account service against a real SQLite file.

use courier_config::{AuthConfig, DatabaseConfig};
use courier_users::{AccountService, Credentials, NewAccount, UserError};
use tempfile::TempDir;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

struct TestContext {
    service: AccountService,
    _temp_dir: TempDir,
}

impl TestContext {
    async fn new() -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("accounts.db");

        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 2,
        };
        let pool = courier_database::initialize_database(&config).await?;

        let auth = AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            token_ttl_seconds: 3_600,
        };

        Ok(Self {
            service: AccountService::new(pool, &auth),
            _temp_dir: temp_dir,
        })
    }
}

fn alice() -> NewAccount {
    NewAccount {
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        password: "s3cret-passw0rd".to_string(),
    }
}

#[tokio::test]
async fn register_issues_usable_token() -> TestResult {
    let ctx = TestContext::new().await?;

    let (user, issued) = ctx.service.register(alice()).await?;
    assert!(!user.public_id.is_empty());
    assert!(user.password_hash.starts_with("$argon2"));

    let resolved = ctx.service.authenticate(&issued.token).await?;
    assert_eq!(resolved.public_id, user.public_id);
    assert_eq!(resolved.email, "alice@example.com");

    Ok(())
}

#[tokio::test]
async fn register_rejects_duplicate_email() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.service.register(alice()).await?;

    let err = ctx
        .service
        .register(NewAccount {
            name: "Alice Again".to_string(),
            ..alice()
        })
        .await
        .expect_err("duplicate email must fail");

    assert!(matches!(err, UserError::EmailTaken));
    Ok(())
}

#[tokio::test]
async fn register_rejects_invalid_payloads() -> TestResult {
    let ctx = TestContext::new().await?;

    let bad_email = NewAccount {
        email: "not-an-email".to_string(),
        ..alice()
    };
    assert!(matches!(
        ctx.service.register(bad_email).await.unwrap_err(),
        UserError::Validation(_)
    ));

    let short_password = NewAccount {
        password: "short".to_string(),
        ..alice()
    };
    assert!(matches!(
        ctx.service.register(short_password).await.unwrap_err(),
        UserError::Validation(_)
    ));

    let blank_name = NewAccount {
        name: "   ".to_string(),
        ..alice()
    };
    assert!(matches!(
        ctx.service.register(blank_name).await.unwrap_err(),
        UserError::Validation(_)
    ));

    Ok(())
}

#[tokio::test]
async fn login_verifies_credentials() -> TestResult {
    let ctx = TestContext::new().await?;
    let (registered, _) = ctx.service.register(alice()).await?;

    let (user, issued) = ctx
        .service
        .login(Credentials {
            email: "alice@example.com".to_string(),
            password: "s3cret-passw0rd".to_string(),
        })
        .await?;
    assert_eq!(user.public_id, registered.public_id);
    assert!(issued.expires_at > chrono::Utc::now());

    let err = ctx
        .service
        .login(Credentials {
            email: "alice@example.com".to_string(),
            password: "wrong-password".to_string(),
        })
        .await
        .expect_err("wrong password must fail");
    assert!(matches!(err, UserError::InvalidCredentials));

    // Unknown email reports the same error as a wrong password.
    let err = ctx
        .service
        .login(Credentials {
            email: "nobody@example.com".to_string(),
            password: "s3cret-passw0rd".to_string(),
        })
        .await
        .expect_err("unknown email must fail");
    assert!(matches!(err, UserError::InvalidCredentials));

    Ok(())
}

#[tokio::test]
async fn authenticate_rejects_garbage_tokens() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.service.register(alice()).await?;

    assert!(matches!(
        ctx.service.authenticate("not.a.token").await.unwrap_err(),
        UserError::InvalidToken(_)
    ));

    Ok(())
}

#[tokio::test]
async fn list_peers_excludes_the_caller() -> TestResult {
    let ctx = TestContext::new().await?;
    let (alice_user, _) = ctx.service.register(alice()).await?;
    ctx.service
        .register(NewAccount {
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "another-s3cret".to_string(),
        })
        .await?;

    let peers = ctx.service.list_peers(&alice_user.public_id).await?;
    assert_eq!(peers.len(), 1);
    assert_eq!(peers[0].email, "bob@example.com");

    Ok(())
}
