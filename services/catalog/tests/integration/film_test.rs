use chrono::NaiveDate;
use uuid::Uuid;

use cinelog_catalog::error::CatalogError;
use cinelog_catalog::usecase::film::{
    CreateFilmInput, CreateFilmUseCase, DeleteFilmUseCase, GetFilmUseCase, UpdateFilmInput,
    UpdateFilmUseCase,
};

use crate::helpers::{MockFilmRepo, test_film};

fn arrival() -> CreateFilmInput {
    CreateFilmInput {
        title: "Arrival".to_owned(),
        genre: "Sci-Fi ".to_owned(),
        release_date: "2016-11-11".to_owned(),
        rating: Some(8.0),
    }
}

#[tokio::test]
async fn should_create_film_and_read_back_identical_fields() {
    let repo = MockFilmRepo::empty();
    let films = repo.films_handle();
    let created = CreateFilmUseCase { repo }.execute(arrival()).await.unwrap();

    assert_eq!(created.title, "Arrival");
    assert_eq!(created.genre, "Sci-Fi ", "genre is stored verbatim");
    assert_eq!(created.release_date, NaiveDate::from_ymd_opt(2016, 11, 11).unwrap());
    assert_eq!(created.rating, Some(8.0));

    let fetched = GetFilmUseCase {
        repo: MockFilmRepo::new(films.lock().unwrap().clone()),
    }
    .execute(created.id)
    .await
    .unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn should_reject_invalid_film_fields_without_persisting() {
    let repo = MockFilmRepo::empty();
    let films = repo.films_handle();

    let result = CreateFilmUseCase { repo }
        .execute(CreateFilmInput {
            title: "".to_owned(),
            genre: "Drama".to_owned(),
            release_date: "11/11/2016".to_owned(),
            rating: Some(0.0),
        })
        .await;

    let Err(CatalogError::Validation(details)) = result else {
        panic!("expected Validation, got {result:?}");
    };
    let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
    assert_eq!(fields, ["title", "genre", "release_date", "rating"]);
    assert!(films.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_allow_film_without_rating() {
    let film = CreateFilmUseCase {
        repo: MockFilmRepo::empty(),
    }
    .execute(CreateFilmInput {
        rating: None,
        ..arrival()
    })
    .await
    .unwrap();
    assert!(film.rating.is_none());
}

#[tokio::test]
async fn should_return_not_found_for_unknown_film() {
    let result = GetFilmUseCase {
        repo: MockFilmRepo::empty(),
    }
    .execute(Uuid::new_v4())
    .await;
    assert!(
        matches!(result, Err(CatalogError::FilmNotFound)),
        "expected FilmNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_update_only_given_film_fields() {
    let film = test_film("Arrival");
    let repo = MockFilmRepo::new(vec![film.clone()]);
    let films = repo.films_handle();

    let updated = UpdateFilmUseCase { repo }
        .execute(
            film.id,
            UpdateFilmInput {
                title: Some("  Arrival (2016) ".to_owned()),
                rating: Some(Some(9.1)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Arrival (2016)");
    assert_eq!(updated.rating, Some(9.1));
    assert_eq!(updated.genre, film.genre);
    assert_eq!(updated.release_date, film.release_date);
    assert_eq!(films.lock().unwrap()[0], updated);
}

#[tokio::test]
async fn should_clear_rating_on_explicit_null() {
    let film = test_film("Arrival");
    let repo = MockFilmRepo::new(vec![film.clone()]);
    let films = repo.films_handle();

    let updated = UpdateFilmUseCase { repo }
        .execute(
            film.id,
            UpdateFilmInput {
                rating: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.rating.is_none());
    assert!(films.lock().unwrap()[0].rating.is_none());
}

#[tokio::test]
async fn should_reject_empty_film_update() {
    let film = test_film("Arrival");
    let result = UpdateFilmUseCase {
        repo: MockFilmRepo::new(vec![film.clone()]),
    }
    .execute(film.id, UpdateFilmInput::default())
    .await;
    assert!(
        matches!(result, Err(CatalogError::Validation(_))),
        "expected Validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_delete_film_once() {
    let film = test_film("Arrival");
    let uc = DeleteFilmUseCase {
        repo: MockFilmRepo::new(vec![film.clone()]),
    };

    uc.execute(film.id).await.unwrap();
    let again = uc.execute(film.id).await;
    assert!(
        matches!(again, Err(CatalogError::FilmNotFound)),
        "expected FilmNotFound, got {again:?}"
    );
}
