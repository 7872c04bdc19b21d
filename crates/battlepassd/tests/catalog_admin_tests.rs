//! Administrative catalog CRUD and its invariants.

use std::sync::Arc;

use battlepass_common::error::BattlePassError;
use battlepass_common::reward::Reward;
use battlepassd::seed::seed_default_catalog;
use battlepassd::service::catalog::CatalogService;
use battlepassd::service::players::PlayerService;
use battlepassd::store::Store;

async fn empty_catalog() -> CatalogService {
    let store = Arc::new(Store::open_in_memory().await.unwrap());
    CatalogService::new(store)
}

#[tokio::test]
async fn create_and_list_ordered_by_level() {
    let catalog = empty_catalog().await;
    catalog
        .create(2, Reward::ProfilePicture { id: 1 })
        .await
        .unwrap();
    catalog.create(1, Reward::Gold { amount: 50 }).await.unwrap();

    let definitions = catalog.list().await.unwrap();
    let levels: Vec<u32> = definitions.iter().map(|d| d.level).collect();
    assert_eq!(levels, vec![1, 2]);
}

#[tokio::test]
async fn duplicate_level_is_rejected() {
    let catalog = empty_catalog().await;
    catalog.create(1, Reward::Gold { amount: 50 }).await.unwrap();

    let err = catalog
        .create(1, Reward::Gold { amount: 99 })
        .await
        .unwrap_err();
    assert!(matches!(err, BattlePassError::InvalidArgument(_)));
    assert_eq!(catalog.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let catalog = empty_catalog().await;

    let err = catalog.create(1, Reward::Gold { amount: 0 }).await.unwrap_err();
    assert!(matches!(err, BattlePassError::InvalidArgument(_)));

    let err = catalog
        .create(
            1,
            Reward::Powerup {
                powerup: "".into(),
                quantity: 1,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BattlePassError::InvalidArgument(_)));

    let err = catalog.create(0, Reward::Gold { amount: 5 }).await.unwrap_err();
    assert!(matches!(err, BattlePassError::InvalidArgument(_)));
}

#[tokio::test]
async fn update_replaces_the_payload() {
    let catalog = empty_catalog().await;
    let created = catalog.create(4, Reward::Gold { amount: 10 }).await.unwrap();

    let updated = catalog
        .update(created.id, Reward::Gold { amount: 75 })
        .await
        .unwrap();
    assert_eq!(updated.level, 4);
    assert_eq!(updated.reward, Reward::Gold { amount: 75 });

    let err = catalog
        .update(9999, Reward::Gold { amount: 1 })
        .await
        .unwrap_err();
    assert!(matches!(err, BattlePassError::RewardNotFound(_)));
}

#[tokio::test]
async fn delete_removes_unreferenced_definitions() {
    let catalog = empty_catalog().await;
    let created = catalog.create(6, Reward::ProfileAvatar { id: 2 }).await.unwrap();

    catalog.remove(created.id).await.unwrap();
    assert!(catalog.list().await.unwrap().is_empty());

    let err = catalog.remove(created.id).await.unwrap_err();
    assert!(matches!(err, BattlePassError::RewardNotFound(_)));
}

#[tokio::test]
async fn delete_is_refused_while_grants_reference_the_definition() {
    let store = Arc::new(Store::open_in_memory().await.unwrap());
    seed_default_catalog(&store).await.unwrap();
    let catalog = CatalogService::new(Arc::clone(&store));
    let players = PlayerService::new(store);

    // Registration grants the level-1 reward
    players.register("holder-1", "Holder").await.unwrap();

    let definitions = catalog.list().await.unwrap();
    let level_one = definitions.iter().find(|d| d.level == 1).unwrap();
    let level_nine = definitions.iter().find(|d| d.level == 9).unwrap();

    let err = catalog.remove(level_one.id).await.unwrap_err();
    assert!(matches!(err, BattlePassError::InvalidArgument(_)));
    assert_eq!(catalog.list().await.unwrap().len(), 10);

    // An untouched definition can still go
    catalog.remove(level_nine.id).await.unwrap();
    assert_eq!(catalog.list().await.unwrap().len(), 9);
}
