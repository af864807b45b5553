use chrono::{Duration, Utc};

use cinelog_auth_types::password::verify_blocking;
use cinelog_catalog::domain::types::{MAX_OTP_ATTEMPTS, OneTimeCode};
use cinelog_catalog::error::CatalogError;
use cinelog_catalog::usecase::auth::{
    LoginInput, LoginUseCase, RegisterInput, RegisterUseCase, VerifyLoginInput,
    VerifyLoginUseCase,
};
use cinelog_domain::user::UserRole;
use cinelog_testing::auth::test_codec;

use crate::helpers::{
    MockMailer, MockOtpRepo, MockUserRepo, TEST_PASSWORD, registered_user, test_user,
};

fn register_input(email: &str) -> RegisterInput {
    RegisterInput {
        email: email.to_owned(),
        password: "s3cret-pass".to_owned(),
        name: "Grace".to_owned(),
        phone: Some("  ".to_owned()),
        address: None,
    }
}

fn code_for(user_id: uuid::Uuid, code: &str, ttl: Duration) -> OneTimeCode {
    let now = Utc::now();
    OneTimeCode {
        user_id,
        code: code.to_owned(),
        attempts: 0,
        created_at: now,
        expires_at: now + ttl,
    }
}

// ── Register ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_client_with_hashed_password() {
    let repo = MockUserRepo::empty();
    let users = repo.users_handle();
    let uc = RegisterUseCase { users: repo };

    let user = uc
        .execute(register_input("  Grace@Example.com "))
        .await
        .unwrap();

    assert_eq!(user.email, "grace@example.com");
    assert_eq!(user.role, UserRole::Client);
    assert!(user.phone.is_none(), "blank phone should be dropped");
    assert_ne!(user.password_hash, "s3cret-pass");
    assert!(verify_blocking("s3cret-pass", &user.password_hash));
    assert_eq!(users.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_duplicate_email_on_register() {
    let existing = test_user();
    let uc = RegisterUseCase {
        users: MockUserRepo::new(vec![existing.clone()]),
    };

    let result = uc.execute(register_input("ADA@example.com")).await;

    assert!(
        matches!(result, Err(CatalogError::EmailTaken)),
        "expected EmailTaken, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_every_invalid_register_field() {
    let uc = RegisterUseCase {
        users: MockUserRepo::empty(),
    };

    let result = uc
        .execute(RegisterInput {
            email: "not-an-email".to_owned(),
            password: "short".to_owned(),
            name: " ".to_owned(),
            phone: None,
            address: None,
        })
        .await;

    let Err(CatalogError::Validation(details)) = result else {
        panic!("expected Validation, got {result:?}");
    };
    let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
    assert_eq!(fields, ["email", "name", "password"]);
}

// ── Login ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_code_and_dispatch_mail_on_login() {
    let user = registered_user();
    let otps = MockOtpRepo::empty();
    let codes = otps.codes_handle();
    let mailer = MockMailer::new();
    let sent = mailer.sent_handle();

    let uc = LoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        otps,
        mailer,
        otp_ttl: Duration::minutes(5),
    };
    let outcome = uc
        .execute(LoginInput {
            email: user.email.clone(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await
        .unwrap();

    let codes = codes.lock().unwrap();
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].user_id, user.id);
    assert_eq!(codes[0].code.len(), 6);
    assert_eq!(codes[0].expires_at, outcome.expires_at);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, "login_code_created");
    assert_eq!(sent[0].payload["code"], codes[0].code.as_str());
    assert_eq!(sent[0].payload["email"], user.email.as_str());
}

#[tokio::test]
async fn should_replace_previous_code_on_second_login() {
    let user = registered_user();
    let otps = MockOtpRepo::new(vec![code_for(user.id, "000000", Duration::minutes(5))]);
    let codes = otps.codes_handle();

    let uc = LoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        otps,
        mailer: MockMailer::new(),
        otp_ttl: Duration::minutes(5),
    };
    uc.execute(LoginInput {
        email: user.email.clone(),
        password: TEST_PASSWORD.to_owned(),
    })
    .await
    .unwrap();

    let codes = codes.lock().unwrap();
    assert_eq!(codes.len(), 1, "login must upsert, not append");
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let user = registered_user();
    let otps = MockOtpRepo::empty();
    let codes = otps.codes_handle();
    let uc = LoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        otps,
        mailer: MockMailer::new(),
        otp_ttl: Duration::minutes(5),
    };

    let result = uc
        .execute(LoginInput {
            email: user.email.clone(),
            password: "wrong-password".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(CatalogError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
    assert!(codes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_return_not_found_for_unknown_email_on_login() {
    let uc = LoginUseCase {
        users: MockUserRepo::empty(),
        otps: MockOtpRepo::empty(),
        mailer: MockMailer::new(),
        otp_ttl: Duration::minutes(5),
    };

    let result = uc
        .execute(LoginInput {
            email: "nobody@example.com".to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(CatalogError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_succeed_login_even_when_mail_dispatch_fails() {
    let user = registered_user();
    let otps = MockOtpRepo::empty();
    let codes = otps.codes_handle();
    let uc = LoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        otps,
        mailer: MockMailer::failing(),
        otp_ttl: Duration::minutes(5),
    };

    let result = uc
        .execute(LoginInput {
            email: user.email.clone(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await;

    assert!(result.is_ok(), "expected Ok, got {:?}", result.err());
    assert_eq!(codes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_issue_token_for_matching_code_and_consume_it() {
    let user = test_user();
    let otps = MockOtpRepo::new(vec![code_for(user.id, "123456", Duration::minutes(5))]);
    let codes = otps.codes_handle();
    let codec = test_codec();

    let uc = VerifyLoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        otps,
        tokens: codec.clone(),
    };
    let session = uc
        .execute(VerifyLoginInput {
            email: user.email.clone(),
            code: " 123456 ".to_owned(),
        })
        .await
        .unwrap();

    let info = codec.verify(&session.token.token).unwrap();
    assert_eq!(info.user_id, user.id);
    assert_eq!(info.role, UserRole::Client);
    assert_eq!(session.user.id, user.id);
    assert!(codes.lock().unwrap().is_empty(), "code should be consumed");
}

#[tokio::test]
async fn should_reject_mismatched_code_and_keep_it() {
    let user = test_user();
    let otps = MockOtpRepo::new(vec![code_for(user.id, "123456", Duration::minutes(5))]);
    let codes = otps.codes_handle();

    let uc = VerifyLoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        otps,
        tokens: test_codec(),
    };
    let result = uc
        .execute(VerifyLoginInput {
            email: user.email.clone(),
            code: "654321".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(CatalogError::InvalidOtp)),
        "expected InvalidOtp, got {result:?}"
    );
    let codes = codes.lock().unwrap();
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].attempts, 1);
}

#[tokio::test]
async fn should_burn_code_after_too_many_wrong_guesses() {
    let user = test_user();
    let otps = MockOtpRepo::new(vec![code_for(user.id, "123456", Duration::minutes(5))]);
    let codes = otps.codes_handle();
    let uc = VerifyLoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        otps,
        tokens: test_codec(),
    };

    for _ in 0..MAX_OTP_ATTEMPTS {
        let result = uc
            .execute(VerifyLoginInput {
                email: user.email.clone(),
                code: "000000".to_owned(),
            })
            .await;
        assert!(
            matches!(result, Err(CatalogError::InvalidOtp)),
            "expected InvalidOtp, got {result:?}"
        );
    }
    assert!(codes.lock().unwrap().is_empty());

    let result = uc
        .execute(VerifyLoginInput {
            email: user.email.clone(),
            code: "123456".to_owned(),
        })
        .await;
    assert!(
        matches!(result, Err(CatalogError::OtpNotFound)),
        "expected OtpNotFound, got {result:?}"
    );
}

// ── VerifyLogin ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_and_delete_expired_code() {
    let user = test_user();
    let otps = MockOtpRepo::new(vec![code_for(user.id, "123456", Duration::seconds(-1))]);
    let codes = otps.codes_handle();

    let uc = VerifyLoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        otps,
        tokens: test_codec(),
    };
    let result = uc
        .execute(VerifyLoginInput {
            email: user.email.clone(),
            code: "123456".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(CatalogError::OtpExpired)),
        "expected OtpExpired, got {result:?}"
    );
    assert!(codes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_require_a_pending_code() {
    let user = test_user();
    let uc = VerifyLoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        otps: MockOtpRepo::empty(),
        tokens: test_codec(),
    };

    let result = uc
        .execute(VerifyLoginInput {
            email: user.email.clone(),
            code: "123456".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(CatalogError::OtpNotFound)),
        "expected OtpNotFound, got {result:?}"
    );
}
