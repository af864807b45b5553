use cinelog_auth_types::password::verify_blocking;
use cinelog_catalog::domain::types::User;
use cinelog_catalog::error::CatalogError;
use cinelog_catalog::usecase::user::{
    DeleteUserUseCase, GetUserUseCase, UpdateUserInput, UpdateUserUseCase,
};
use cinelog_domain::user::UserRole;

use crate::helpers::{MockUserRepo, admin, client, identity_of, test_user, user_with};

#[tokio::test]
async fn should_let_user_read_own_profile() {
    let user = test_user();
    let uc = GetUserUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
    };
    let found = uc.execute(&identity_of(&user), user.id).await.unwrap();
    assert_eq!(found, user);
}

#[tokio::test]
async fn should_forbid_reading_someone_else() {
    let user = test_user();
    let uc = GetUserUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
    };
    let result = uc.execute(&client(), user.id).await;
    assert!(
        matches!(result, Err(CatalogError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_let_admin_read_anyone() {
    let user = test_user();
    let uc = GetUserUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
    };
    assert!(uc.execute(&admin(), user.id).await.is_ok());
}

#[tokio::test]
async fn should_forbid_role_change_by_client() {
    let user = test_user();
    let uc = UpdateUserUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
    };
    let result = uc
        .execute(
            &identity_of(&user),
            user.id,
            UpdateUserInput {
                role: Some(UserRole::Admin),
                ..Default::default()
            },
        )
        .await;
    assert!(
        matches!(result, Err(CatalogError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_let_admin_promote_user() {
    let user = test_user();
    let repo = MockUserRepo::new(vec![user.clone()]);
    let users = repo.users_handle();
    let updated = UpdateUserUseCase { repo }
        .execute(
            &admin(),
            user.id,
            UpdateUserInput {
                role: Some(UserRole::Admin),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.role, UserRole::Admin);
    assert_eq!(users.lock().unwrap()[0].role, UserRole::Admin);
}

#[tokio::test]
async fn should_reject_email_change_to_taken_address() {
    let user = test_user();
    let other = user_with("grace@example.com", "Grace");
    let uc = UpdateUserUseCase {
        repo: MockUserRepo::new(vec![user.clone(), other]),
    };
    let result = uc
        .execute(
            &identity_of(&user),
            user.id,
            UpdateUserInput {
                email: Some("Grace@Example.com".to_owned()),
                ..Default::default()
            },
        )
        .await;
    assert!(
        matches!(result, Err(CatalogError::EmailTaken)),
        "expected EmailTaken, got {result:?}"
    );
}

#[tokio::test]
async fn should_rehash_password_and_clear_blank_phone() {
    let user = User {
        phone: Some("555-0100".to_owned()),
        ..test_user()
    };
    let uc = UpdateUserUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
    };
    let updated = uc
        .execute(
            &identity_of(&user),
            user.id,
            UpdateUserInput {
                password: Some("new-password".to_owned()),
                phone: Some("".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(verify_blocking("new-password", &updated.password_hash));
    assert!(updated.phone.is_none());
}

#[tokio::test]
async fn should_reject_empty_profile_update() {
    let user = test_user();
    let uc = UpdateUserUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
    };
    let result = uc
        .execute(&identity_of(&user), user.id, UpdateUserInput::default())
        .await;
    assert!(
        matches!(result, Err(CatalogError::Validation(_))),
        "expected Validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_delete_self_and_report_missing_afterwards() {
    let user = test_user();
    let uc = DeleteUserUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
    };
    uc.execute(&identity_of(&user), user.id).await.unwrap();
    let again = uc.execute(&identity_of(&user), user.id).await;
    assert!(
        matches!(again, Err(CatalogError::UserNotFound)),
        "expected UserNotFound, got {again:?}"
    );
}
