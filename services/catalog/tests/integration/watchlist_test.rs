use uuid::Uuid;

use cinelog_catalog::error::CatalogError;
use cinelog_catalog::usecase::watchlist::{
    AddFilmUseCase, CreateWatchlistInput, CreateWatchlistUseCase, DeleteWatchlistUseCase,
    GetWatchlistUseCase, RemoveFilmUseCase, UpdateWatchlistInput, UpdateWatchlistUseCase,
};

use crate::helpers::{
    MockFilmRepo, MockWatchlistRepo, admin, client, test_film, test_watchlist,
};

#[tokio::test]
async fn should_create_watchlist_with_deduplicated_films_in_order() {
    let (a, b) = (test_film("Arrival"), test_film("Blade Runner"));
    let owner = client();
    let uc = CreateWatchlistUseCase {
        watchlists: MockWatchlistRepo::new(vec![], vec![a.clone(), b.clone()]),
        films: MockFilmRepo::new(vec![a.clone(), b.clone()]),
    };

    let detail = uc
        .execute(
            &owner,
            CreateWatchlistInput {
                name: "  Weekend  ".to_owned(),
                is_public: None,
                film_ids: vec![b.id, a.id, b.id],
            },
        )
        .await
        .unwrap();

    assert_eq!(detail.watchlist.name, "Weekend");
    assert!(detail.watchlist.is_public, "watchlists default to public");
    assert_eq!(detail.watchlist.user_id, owner.user_id);
    let ids: Vec<_> = detail.films.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);
}

#[tokio::test]
async fn should_reject_duplicate_watchlist_name_for_same_owner() {
    let owner = client();
    let uc = CreateWatchlistUseCase {
        watchlists: MockWatchlistRepo::new(
            vec![test_watchlist(owner.user_id, "Weekend", true)],
            vec![],
        ),
        films: MockFilmRepo::empty(),
    };

    let result = uc
        .execute(
            &owner,
            CreateWatchlistInput {
                name: "Weekend".to_owned(),
                is_public: Some(false),
                film_ids: vec![],
            },
        )
        .await;

    assert!(
        matches!(result, Err(CatalogError::WatchlistNameTaken)),
        "expected WatchlistNameTaken, got {result:?}"
    );
}

#[tokio::test]
async fn should_allow_same_name_for_different_owners() {
    let uc = CreateWatchlistUseCase {
        watchlists: MockWatchlistRepo::new(
            vec![test_watchlist(Uuid::new_v4(), "Weekend", true)],
            vec![],
        ),
        films: MockFilmRepo::empty(),
    };

    let result = uc
        .execute(
            &client(),
            CreateWatchlistInput {
                name: "Weekend".to_owned(),
                is_public: None,
                film_ids: vec![],
            },
        )
        .await;
    assert!(result.is_ok(), "expected Ok, got {result:?}");
}

#[tokio::test]
async fn should_reject_unknown_initial_films() {
    let uc = CreateWatchlistUseCase {
        watchlists: MockWatchlistRepo::new(vec![], vec![]),
        films: MockFilmRepo::empty(),
    };

    let result = uc
        .execute(
            &client(),
            CreateWatchlistInput {
                name: "Ghosts".to_owned(),
                is_public: None,
                film_ids: vec![Uuid::new_v4()],
            },
        )
        .await;
    assert!(
        matches!(result, Err(CatalogError::FilmNotFound)),
        "expected FilmNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_show_private_watchlist_only_to_owner() {
    let owner = client();
    let private = test_watchlist(owner.user_id, "Secret", false);
    let uc = GetWatchlistUseCase {
        repo: MockWatchlistRepo::new(vec![private.clone()], vec![]),
    };

    assert!(uc.execute(Some(&owner), private.id).await.is_ok());

    let anonymous = uc.execute(None, private.id).await;
    assert!(
        matches!(anonymous, Err(CatalogError::Unauthenticated)),
        "expected Unauthenticated, got {anonymous:?}"
    );

    let stranger = uc.execute(Some(&admin()), private.id).await;
    assert!(
        matches!(stranger, Err(CatalogError::WatchlistNotFound)),
        "expected WatchlistNotFound, got {stranger:?}"
    );
}

#[tokio::test]
async fn should_show_public_watchlist_to_anyone() {
    let public = test_watchlist(Uuid::new_v4(), "Classics", true);
    let uc = GetWatchlistUseCase {
        repo: MockWatchlistRepo::new(vec![public.clone()], vec![]),
    };
    let detail = uc.execute(None, public.id).await.unwrap();
    assert_eq!(detail.watchlist, public);
}

#[tokio::test]
async fn should_rename_and_recheck_name_excluding_self() {
    let owner = client();
    let list = test_watchlist(owner.user_id, "Weekend", true);
    let other = test_watchlist(owner.user_id, "Holidays", true);
    let repo = MockWatchlistRepo::new(vec![list.clone(), other], vec![]);
    let uc = UpdateWatchlistUseCase { repo };

    let same = uc
        .execute(
            &owner,
            list.id,
            UpdateWatchlistInput {
                name: Some("Weekend".to_owned()),
                is_public: Some(false),
            },
        )
        .await
        .unwrap();
    assert!(!same.watchlist.is_public);

    let clash = uc
        .execute(
            &owner,
            list.id,
            UpdateWatchlistInput {
                name: Some("Holidays".to_owned()),
                ..Default::default()
            },
        )
        .await;
    assert!(
        matches!(clash, Err(CatalogError::WatchlistNameTaken)),
        "expected WatchlistNameTaken, got {clash:?}"
    );
}

#[tokio::test]
async fn should_hide_watchlist_from_non_owner_on_mutation() {
    let list = test_watchlist(Uuid::new_v4(), "Weekend", true);
    let repo = MockWatchlistRepo::new(vec![list.clone()], vec![]);
    let lists = repo.watchlists_handle();

    let update = UpdateWatchlistUseCase {
        repo: MockWatchlistRepo::new(vec![list.clone()], vec![]),
    }
    .execute(
        &admin(),
        list.id,
        UpdateWatchlistInput {
            is_public: Some(false),
            ..Default::default()
        },
    )
    .await;
    assert!(
        matches!(update, Err(CatalogError::WatchlistNotFound)),
        "expected WatchlistNotFound, got {update:?}"
    );

    let delete = DeleteWatchlistUseCase { repo }.execute(&client(), list.id).await;
    assert!(
        matches!(delete, Err(CatalogError::WatchlistNotFound)),
        "expected WatchlistNotFound, got {delete:?}"
    );
    assert_eq!(lists.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_add_film_once_and_conflict_on_repeat() {
    let owner = client();
    let film = test_film("Arrival");
    let list = test_watchlist(owner.user_id, "Weekend", true);
    let uc = AddFilmUseCase {
        watchlists: MockWatchlistRepo::new(vec![list.clone()], vec![film.clone()]),
        films: MockFilmRepo::new(vec![film.clone()]),
    };

    let detail = uc.execute(&owner, list.id, film.id).await.unwrap();
    assert_eq!(detail.films.len(), 1);
    assert_eq!(detail.films[0].id, film.id);

    let again = uc.execute(&owner, list.id, film.id).await;
    assert!(
        matches!(again, Err(CatalogError::FilmAlreadyInWatchlist)),
        "expected FilmAlreadyInWatchlist, got {again:?}"
    );
}

#[tokio::test]
async fn should_reject_adding_missing_film() {
    let owner = client();
    let list = test_watchlist(owner.user_id, "Weekend", true);
    let uc = AddFilmUseCase {
        watchlists: MockWatchlistRepo::new(vec![list.clone()], vec![]),
        films: MockFilmRepo::empty(),
    };

    let result = uc.execute(&owner, list.id, Uuid::new_v4()).await;
    assert!(
        matches!(result, Err(CatalogError::FilmNotFound)),
        "expected FilmNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_treat_removing_absent_film_as_noop() {
    let owner = client();
    let film = test_film("Arrival");
    let list = test_watchlist(owner.user_id, "Weekend", true);
    let repo = MockWatchlistRepo::new(vec![list.clone()], vec![film.clone()])
        .with_members(vec![(list.id, film.id)]);
    let members = repo.members_handle();
    let uc = RemoveFilmUseCase { repo };

    let unchanged = uc.execute(&owner, list.id, Uuid::new_v4()).await.unwrap();
    assert_eq!(unchanged.films.len(), 1);

    let emptied = uc.execute(&owner, list.id, film.id).await.unwrap();
    assert!(emptied.films.is_empty());
    assert!(members.lock().unwrap().is_empty());
}
