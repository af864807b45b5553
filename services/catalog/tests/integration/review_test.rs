use uuid::Uuid;

use cinelog_catalog::error::CatalogError;
use cinelog_catalog::usecase::review::{
    CreateReviewInput, CreateReviewUseCase, DeleteReviewUseCase, GetReviewUseCase,
    UpdateReviewInput, UpdateReviewUseCase,
};

use crate::helpers::{MockFilmRepo, MockReviewRepo, admin, client, test_film, test_review};

#[tokio::test]
async fn should_create_review_for_existing_film() {
    let film = test_film("Arrival");
    let author = client();
    let reviews = MockReviewRepo::empty();
    let stored = reviews.reviews_handle();

    let uc = CreateReviewUseCase {
        films: MockFilmRepo::new(vec![film.clone()]),
        reviews,
    };
    let review = uc
        .execute(
            &author,
            CreateReviewInput {
                film_id: film.id,
                rating: 9.0,
                body: "Language as time travel.".to_owned(),
            },
        )
        .await
        .unwrap();

    assert_eq!(review.user_id, author.user_id);
    assert_eq!(review.film_id, film.id);
    assert_eq!(stored.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_second_review_of_same_film() {
    let film = test_film("Arrival");
    let author = client();
    let uc = CreateReviewUseCase {
        films: MockFilmRepo::new(vec![film.clone()]),
        reviews: MockReviewRepo::new(vec![test_review(author.user_id, film.id)]),
    };

    let result = uc
        .execute(
            &author,
            CreateReviewInput {
                film_id: film.id,
                rating: 6.0,
                body: "Changed my mind.".to_owned(),
            },
        )
        .await;

    assert!(
        matches!(result, Err(CatalogError::ReviewExists)),
        "expected ReviewExists, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_review_of_missing_film() {
    let uc = CreateReviewUseCase {
        films: MockFilmRepo::empty(),
        reviews: MockReviewRepo::empty(),
    };

    let result = uc
        .execute(
            &client(),
            CreateReviewInput {
                film_id: Uuid::new_v4(),
                rating: 6.0,
                body: "Where is it?".to_owned(),
            },
        )
        .await;

    assert!(
        matches!(result, Err(CatalogError::FilmNotFound)),
        "expected FilmNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_validate_review_before_touching_storage() {
    let uc = CreateReviewUseCase {
        films: MockFilmRepo::empty(),
        reviews: MockReviewRepo::empty(),
    };

    let result = uc
        .execute(
            &client(),
            CreateReviewInput {
                film_id: Uuid::new_v4(),
                rating: 10.5,
                body: "x".repeat(501),
            },
        )
        .await;

    let Err(CatalogError::Validation(details)) = result else {
        panic!("expected Validation, got {result:?}");
    };
    let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
    assert_eq!(fields, ["rating", "review"]);
}

#[tokio::test]
async fn should_return_review_with_author_name() {
    let review = test_review(Uuid::new_v4(), Uuid::new_v4());
    let entry = GetReviewUseCase {
        repo: MockReviewRepo::new(vec![review.clone()]),
    }
    .execute(review.id)
    .await
    .unwrap();
    assert_eq!(entry.review, review);
    assert_eq!(entry.author_name, "Ada");
}

#[tokio::test]
async fn should_let_author_update_review() {
    let author = client();
    let review = test_review(author.user_id, Uuid::new_v4());
    let repo = MockReviewRepo::new(vec![review.clone()]);
    let stored = repo.reviews_handle();

    let updated = UpdateReviewUseCase { repo }
        .execute(
            &author,
            review.id,
            UpdateReviewInput {
                rating: Some(3.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.rating, 3.0);
    assert_eq!(updated.body, review.body);
    assert!(updated.updated_at >= review.updated_at);
    assert_eq!(stored.lock().unwrap()[0].rating, 3.0);
}

#[tokio::test]
async fn should_hide_review_from_non_author_on_update() {
    let review = test_review(Uuid::new_v4(), Uuid::new_v4());
    let repo = MockReviewRepo::new(vec![review.clone()]);

    for intruder in [client(), admin()] {
        let result = UpdateReviewUseCase {
            repo: MockReviewRepo::new(repo.reviews.lock().unwrap().clone()),
        }
        .execute(
            &intruder,
            review.id,
            UpdateReviewInput {
                rating: Some(1.0),
                ..Default::default()
            },
        )
        .await;
        assert!(
            matches!(result, Err(CatalogError::ReviewNotFound)),
            "expected ReviewNotFound, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_delete_only_own_review() {
    let author = client();
    let review = test_review(author.user_id, Uuid::new_v4());
    let repo = MockReviewRepo::new(vec![review.clone()]);
    let stored = repo.reviews_handle();
    let uc = DeleteReviewUseCase { repo };

    let result = uc.execute(&admin(), review.id).await;
    assert!(
        matches!(result, Err(CatalogError::ReviewNotFound)),
        "expected ReviewNotFound, got {result:?}"
    );
    assert_eq!(stored.lock().unwrap().len(), 1);

    uc.execute(&author, review.id).await.unwrap();
    assert!(stored.lock().unwrap().is_empty());
}
