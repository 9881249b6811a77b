//! Writes to the movie store.
//!
//! Every mutation validates locally, writes to the store, then re-reads the
//! whole list through [`ListController::refresh`]. The canonical list is
//! never patched in place, so the user only ever sees what the store holds.

use crate::catalog::MovieDetail;
use crate::error::{Result, WatchlistError};
use crate::list::ListController;
use crate::store::{MovieChanges, MovieStore, NewMovieRow, UserScope};
use crate::types::{Movie, MovieDraft, MovieId};

/// Runs mutations for one signed-in user against a store.
#[derive(Debug)]
pub struct MutationCoordinator<S> {
    store: S,
    scope: UserScope,
}

impl<S: MovieStore> MutationCoordinator<S> {
    pub fn new(store: S, scope: UserScope) -> Self {
        Self { store, scope }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scope(&self) -> &UserScope {
        &self.scope
    }

    /// Load the canonical list.
    pub async fn load(&self, list: &mut ListController) -> Result<()> {
        list.refresh(&self.store, &self.scope).await?;
        Ok(())
    }

    /// Add a movie. The store assigns its id and starts it unwatched.
    pub async fn create(&self, list: &mut ListController, draft: MovieDraft) -> Result<Movie> {
        let payload = draft.validate()?;
        let row = NewMovieRow::from_payload(&self.scope, payload);

        let created = self.store.insert(&self.scope, row).await?.into_movie();
        tracing::info!(id = %created.id, title = %created.title, "movie added");

        self.refresh_after_write(list).await;
        Ok(created)
    }

    /// Replace every editable field of `id`. The watched flag is untouched.
    pub async fn update(
        &self,
        list: &mut ListController,
        id: &MovieId,
        draft: MovieDraft,
    ) -> Result<Movie> {
        let changes = MovieChanges::from(draft.validate()?);
        let updated = self.write_existing(list, id, changes).await?;
        tracing::info!(id = %id, "movie updated");
        Ok(updated)
    }

    pub async fn toggle_watched(
        &self,
        list: &mut ListController,
        id: &MovieId,
        watched: bool,
    ) -> Result<Movie> {
        let updated = self
            .write_existing(list, id, MovieChanges::watched(watched))
            .await?;
        tracing::info!(id = %id, watched, "watched flag changed");
        Ok(updated)
    }

    pub async fn delete(&self, list: &mut ListController, id: &MovieId) -> Result<()> {
        list.mark_pending(id);
        if let Err(e) = self.store.delete(id).await {
            list.clear_pending(id);
            return Err(e);
        }
        list.settle_pending(id);

        tracing::info!(id = %id, "movie removed");
        self.refresh_after_write(list).await;
        Ok(())
    }

    /// Add a catalog movie, unless one with the same title is already listed.
    pub async fn add_from_catalog(
        &self,
        list: &mut ListController,
        detail: &MovieDetail,
    ) -> Result<Movie> {
        if let Some(existing) = list.find_by_title(&detail.title) {
            return Err(WatchlistError::Validation(format!(
                "'{}' is already in your watchlist ({})",
                existing.title, existing.id
            )));
        }
        self.create(list, detail.to_draft()).await
    }

    async fn write_existing(
        &self,
        list: &mut ListController,
        id: &MovieId,
        changes: MovieChanges,
    ) -> Result<Movie> {
        list.mark_pending(id);
        let updated = match self.store.update(id, changes).await {
            Ok(row) => row.into_movie(),
            Err(e) => {
                list.clear_pending(id);
                return Err(e);
            }
        };

        list.settle_pending(id);
        self.refresh_after_write(list).await;
        Ok(updated)
    }

    /// The write already succeeded, so a failed re-read is only recorded in
    /// the list's load state.
    async fn refresh_after_write(&self, list: &mut ListController) {
        if let Err(e) = list.refresh(&self.store, &self.scope).await {
            tracing::warn!(error = %e, "list refresh after write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::list::LoadState;
    use crate::store::InMemoryStore;
    use crate::store::memory::InjectedFailure;

    async fn setup(titles: &[(&str, &[&str])]) -> (MutationCoordinator<InMemoryStore>, ListController) {
        let scope = UserScope::new("user-1");
        let store = InMemoryStore::new();
        // Seed oldest first so the listing comes back in the given order.
        for (title, categories) in titles.iter().rev() {
            let payload = MovieDraft::new(*title)
                .with_categories(categories.iter().copied())
                .validate()
                .unwrap();
            store.seed(&scope, NewMovieRow::from_payload(&scope, payload));
        }
        let coordinator = MutationCoordinator::new(store, scope);
        let mut list = ListController::default();
        coordinator.load(&mut list).await.unwrap();
        (coordinator, list)
    }

    #[tokio::test]
    async fn test_blank_title_never_reaches_store() {
        let (coordinator, mut list) = setup(&[]).await;
        let before = coordinator.store().calls();

        let err = coordinator
            .create(&mut list, MovieDraft::new("   "))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Validation);
        assert_eq!(coordinator.store().calls(), before);
    }

    #[tokio::test]
    async fn test_create_refreshes_list() {
        let (coordinator, mut list) = setup(&[("Parasite", &["Drama"])]).await;

        let created = coordinator
            .create(
                &mut list,
                MovieDraft::new(" Interstellar ").with_categories(["Science Fiction"]),
            )
            .await
            .unwrap();

        assert_eq!(created.title, "Interstellar");
        assert!(!created.watched);
        assert_eq!(list.movies().len(), 2);
        assert_eq!(list.movies()[0].id, created.id);
        assert_eq!(coordinator.store().calls().list, 2);
    }

    #[tokio::test]
    async fn test_failed_create_leaves_list_unchanged() {
        let (coordinator, mut list) = setup(&[("Parasite", &["Drama"])]).await;
        let before = list.movies().to_vec();
        coordinator.store().fail_next(InjectedFailure::Network);

        let err = coordinator
            .create(&mut list, MovieDraft::new("Oppenheimer"))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(list.movies(), before.as_slice());
        assert_eq!(coordinator.store().calls().list, 1);
    }

    #[tokio::test]
    async fn test_toggle_watched_then_filter_hides_and_preserves() {
        let (coordinator, mut list) = setup(&[
            ("Interstellar", &["Science Fiction"]),
            ("Parasite", &["Drama", "Thriller"]),
            ("Dune: Part Two", &["Science Fiction", "Adventure"]),
        ])
        .await;
        let third = list.movies()[2].id.clone();

        coordinator
            .toggle_watched(&mut list, &third, true)
            .await
            .unwrap();
        list.set_categories(["Drama"]);

        assert!(!list.view().movies().any(|m| m.id == third));
        assert!(list.get(&third).unwrap().watched);

        coordinator.load(&mut list).await.unwrap();
        assert!(list.get(&third).unwrap().watched);
    }

    #[tokio::test]
    async fn test_update_replaces_fields_but_not_watched() {
        let (coordinator, mut list) = setup(&[("Dune", &["Drama"])]).await;
        let id = list.movies()[0].id.clone();
        coordinator.toggle_watched(&mut list, &id, true).await.unwrap();

        let draft = list.get(&id).unwrap().to_draft();
        let draft = MovieDraft {
            title: "Dune: Part Two".into(),
            year: Some(2024),
            ..draft
        };
        coordinator.update(&mut list, &id, draft).await.unwrap();

        let movie = list.get(&id).unwrap();
        assert_eq!(movie.title, "Dune: Part Two");
        assert_eq!(movie.year, Some(2024));
        assert!(movie.watched);
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found() {
        let (coordinator, mut list) = setup(&[("Dune", &[])]).await;
        let err = coordinator
            .update(&mut list, &MovieId::from("missing"), MovieDraft::new("X"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(!list.is_pending(&MovieId::from("missing")));
    }

    #[tokio::test]
    async fn test_delete_already_deleted_is_not_found() {
        let (coordinator, mut list) = setup(&[("Dune", &[]), ("Parasite", &[])]).await;
        let id = list.movies()[0].id.clone();
        assert!(coordinator.store().remove_externally(&id));
        let before = list.movies().to_vec();

        let err = coordinator.delete(&mut list, &id).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(list.movies(), before.as_slice());
        assert!(!list.is_pending(&id));
    }

    #[tokio::test]
    async fn test_delete_refreshes_list() {
        let (coordinator, mut list) = setup(&[("Dune", &[]), ("Parasite", &[])]).await;
        let id = list.movies()[0].id.clone();

        coordinator.delete(&mut list, &id).await.unwrap();

        assert_eq!(list.movies().len(), 1);
        assert!(list.get(&id).is_none());
        assert!(!list.is_pending(&id));
    }

    #[tokio::test]
    async fn test_refresh_failure_after_write_still_succeeds() {
        let (coordinator, mut list) = setup(&[("Dune", &[])]).await;
        let id = list.movies()[0].id.clone();
        coordinator.store().fail_next_listing(InjectedFailure::Network);

        let updated = coordinator
            .toggle_watched(&mut list, &id, true)
            .await
            .unwrap();

        assert!(updated.watched);
        assert!(coordinator.store().rows()[0].watched);
        // The list still shows the last successful read, flagged as stale.
        assert!(!list.get(&id).unwrap().watched);
        let view = list.view();
        assert!(!view.items[0].movie.watched);
        assert!(view.items[0].pending);
        assert!(matches!(
            list.load_state(),
            LoadState::Failed {
                kind: FailureKind::Network,
                ..
            }
        ));

        coordinator.load(&mut list).await.unwrap();
        assert!(list.get(&id).unwrap().watched);
        assert!(!list.is_pending(&id));
        assert_eq!(list.load_state(), &LoadState::Ready);
    }

    #[tokio::test]
    async fn test_pending_flag_cleared_after_failure() {
        let (coordinator, mut list) = setup(&[("Dune", &[])]).await;
        let id = list.movies()[0].id.clone();
        coordinator.store().fail_next(InjectedFailure::Rejected {
            status: 403,
            message: "denied".into(),
        });

        let err = coordinator
            .toggle_watched(&mut list, &id, true)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Rejected);
        assert!(!list.is_pending(&id));
        assert!(!list.get(&id).unwrap().watched);
    }

    #[tokio::test]
    async fn test_add_from_catalog() {
        let (coordinator, mut list) = setup(&[("Parasite", &["Drama"])]).await;
        let detail: MovieDetail = serde_json::from_value(serde_json::json!({
            "id": 157336,
            "title": "Interstellar",
            "overview": "Explorers travel through a wormhole.",
            "poster_path": "/gEU2QniE6E77NI6lCU6MxlNBvIx.jpg",
            "release_date": "2014-11-05",
            "genres": [{"id": 12, "name": "Adventure"}, {"id": 878, "name": "Science Fiction"}]
        }))
        .unwrap();

        let movie = coordinator.add_from_catalog(&mut list, &detail).await.unwrap();
        assert_eq!(movie.categories, vec!["Adventure", "Science Fiction"]);
        assert_eq!(movie.year, Some(2014));

        let writes = coordinator.store().calls().writes();
        let err = coordinator
            .add_from_catalog(&mut list, &detail)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Validation);
        assert_eq!(coordinator.store().calls().writes(), writes);
    }
}
