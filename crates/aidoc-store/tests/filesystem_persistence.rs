//! The store survives a restart when backed by the filesystem handler.

use std::sync::Arc;

use aidoc_effects::FilesystemStorageHandler;
use aidoc_store::DataAccessService;
use aidoc_testkit::{review, UserBuilder};

#[tokio::test]
async fn sessions_and_reviews_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let user = UserBuilder::new("42").build();

    {
        let storage = Arc::new(FilesystemStorageHandler::new(dir.path()));
        let service = DataAccessService::open(storage).await.unwrap();
        service.register_user(user.clone()).await.unwrap();
        service.add_review("p1", review("r10", 3)).await.unwrap();
    }

    let storage = Arc::new(FilesystemStorageHandler::new(dir.path()));
    let service = DataAccessService::open(storage).await.unwrap();

    assert_eq!(service.current_user().await.unwrap(), Some(user));
    let pharmacy = service.get_provider("p1").await.unwrap().unwrap();
    assert_eq!(pharmacy.reviews.len(), 2);
    assert_eq!(pharmacy.rating, 4.0);
}
