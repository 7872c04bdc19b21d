//! End-to-end battle pass progression scenarios.
//!
//! Drives the services over an in-memory store seeded with the stock
//! catalog: level crossings, reward grants, claims, and the failure paths
//! for invalid deltas and duplicate grants.

use std::sync::Arc;

use battlepass_common::error::BattlePassError;
use battlepass_common::reward::Reward;
use battlepassd::seed::seed_default_catalog;
use battlepassd::service::battle_pass::BattlePassService;
use battlepassd::service::players::PlayerService;
use battlepassd::service::rewards::RewardService;
use battlepassd::store::Store;

struct TestContext {
    store: Arc<Store>,
    players: PlayerService,
    battle_pass: BattlePassService,
    rewards: RewardService,
}

async fn seeded() -> TestContext {
    let store = Arc::new(Store::open_in_memory().await.unwrap());
    seed_default_catalog(&store).await.unwrap();
    TestContext {
        players: PlayerService::new(Arc::clone(&store)),
        battle_pass: BattlePassService::new(Arc::clone(&store), 100),
        rewards: RewardService::new(Arc::clone(&store)),
        store,
    }
}

#[tokio::test]
async fn single_level_crossing_grants_the_reward() {
    let ctx = seeded().await;
    ctx.players.register("player-one", "Crash").await.unwrap();

    let summary = ctx.battle_pass.add_experience("player-one", 90).await.unwrap();
    assert_eq!(summary.level, 1);
    assert_eq!(summary.experience, 90);
    assert!(!summary.level_up);
    assert!(summary.granted_rewards.is_empty());

    let summary = ctx.battle_pass.add_experience("player-one", 25).await.unwrap();
    assert_eq!(summary.level, 2);
    assert_eq!(summary.experience, 15);
    assert!(summary.level_up);
    assert_eq!(summary.granted_rewards.len(), 1);
    assert_eq!(summary.granted_rewards[0].level, 2);
    assert_eq!(
        summary.granted_rewards[0].reward,
        Reward::ProfilePicture { id: 1 }
    );
}

#[tokio::test]
async fn multi_level_crossing_grants_every_defined_level() {
    let ctx = seeded().await;
    ctx.players.register("player-two", "Dash").await.unwrap();

    let summary = ctx.battle_pass.add_experience("player-two", 250).await.unwrap();
    assert_eq!(summary.level, 3);
    assert_eq!(summary.experience, 50);
    assert!(summary.level_up);

    let levels: Vec<u32> = summary.granted_rewards.iter().map(|g| g.level).collect();
    assert_eq!(levels, vec![2, 3]);
}

#[tokio::test]
async fn invalid_deltas_leave_state_untouched() {
    let ctx = seeded().await;
    ctx.players.register("player-three", "Flash").await.unwrap();
    ctx.battle_pass.add_experience("player-three", 40).await.unwrap();

    let err = ctx.battle_pass.add_experience("player-three", -5).await.unwrap_err();
    assert!(matches!(err, BattlePassError::InvalidArgument(_)));

    let err = ctx
        .battle_pass
        .add_experience("player-three", 10_001)
        .await
        .unwrap_err();
    assert!(matches!(err, BattlePassError::InvalidArgument(_)));

    let view = ctx.battle_pass.get_battle_pass("player-three").await.unwrap();
    assert_eq!(view.level, 1);
    assert_eq!(view.experience, 40);

    // The documented maximum itself is accepted
    assert!(ctx
        .battle_pass
        .add_experience("player-three", 10_000)
        .await
        .is_ok());
}

#[tokio::test]
async fn grant_is_idempotent_per_player_and_level() {
    let ctx = seeded().await;
    ctx.players.register("player-four", "Smash").await.unwrap();

    let granted = ctx.battle_pass.grant_reward("player-four", 5).await.unwrap();
    assert_eq!(granted.level, 5);
    assert!(!granted.grant.claimed);

    let err = ctx.battle_pass.grant_reward("player-four", 5).await.unwrap_err();
    assert!(matches!(err, BattlePassError::RewardAlreadyGranted));

    let rewards = ctx.rewards.get_player_rewards("player-four").await.unwrap();
    assert_eq!(
        rewards.iter().filter(|g| g.level == 5).count(),
        1,
        "exactly one ledger row for the level"
    );
}

#[tokio::test]
async fn concurrent_duplicate_grants_resolve_to_one_row() {
    let ctx = seeded().await;
    ctx.players.register("player-five", "Clash").await.unwrap();

    let (a, b) = tokio::join!(
        ctx.battle_pass.grant_reward("player-five", 3),
        ctx.battle_pass.grant_reward("player-five", 3),
    );

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    let loser = outcomes.iter().find(|r| r.is_err()).unwrap();
    assert!(matches!(
        loser.as_ref().unwrap_err(),
        BattlePassError::RewardAlreadyGranted
    ));

    let count: i64 = ctx
        .store
        .read(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM player_rewards pr
                 JOIN battle_pass_rewards bpr ON bpr.id = pr.reward_id
                 WHERE pr.player_id = 'player-five' AND bpr.level = 3",
                [],
                |row| row.get(0),
            )
            .map_err(|e| BattlePassError::Storage(e.to_string()))
        })
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn granting_an_undefined_level_fails_without_a_ledger_row() {
    let ctx = seeded().await;
    ctx.players.register("player-six", "Bash").await.unwrap();

    let err = ctx.battle_pass.grant_reward("player-six", 42).await.unwrap_err();
    assert!(matches!(err, BattlePassError::RewardNotFound(_)));

    let rewards = ctx.rewards.get_player_rewards("player-six").await.unwrap();
    assert!(rewards.iter().all(|g| g.level != 42));
}

#[tokio::test]
async fn claim_is_a_one_way_transition() {
    let ctx = seeded().await;
    ctx.players.register("player-seven", "Gnash").await.unwrap();
    ctx.battle_pass.grant_reward("player-seven", 2).await.unwrap();

    ctx.rewards.claim_reward("player-seven", 2).await.unwrap();

    let err = ctx.rewards.claim_reward("player-seven", 2).await.unwrap_err();
    assert!(matches!(err, BattlePassError::RewardAlreadyClaimed));
}

#[tokio::test]
async fn claiming_without_a_grant_is_not_found() {
    let ctx = seeded().await;
    ctx.players.register("player-eight", "Stash").await.unwrap();

    // Defined level, never granted
    let err = ctx.rewards.claim_reward("player-eight", 5).await.unwrap_err();
    assert!(matches!(err, BattlePassError::RewardNotFound(_)));

    // Level with no definition at all
    let err = ctx.rewards.claim_reward("player-eight", 77).await.unwrap_err();
    assert!(matches!(err, BattlePassError::RewardNotFound(_)));
}

#[tokio::test]
async fn unclaimed_projection_filters_claimed_rewards() {
    let ctx = seeded().await;
    ctx.players.register("player-nine", "Cache").await.unwrap();
    ctx.battle_pass.grant_reward("player-nine", 2).await.unwrap();
    ctx.battle_pass.grant_reward("player-nine", 3).await.unwrap();

    ctx.rewards.claim_reward("player-nine", 2).await.unwrap();

    // Registration granted level 1, so three rows total
    let all = ctx.rewards.get_player_rewards("player-nine").await.unwrap();
    assert_eq!(all.len(), 3);

    let unclaimed = ctx.rewards.get_unclaimed_rewards("player-nine").await.unwrap();
    let levels: Vec<u32> = unclaimed.iter().map(|g| g.level).collect();
    assert_eq!(levels, vec![1, 3]);
    assert!(unclaimed.iter().all(|g| !g.grant.claimed));
}

#[tokio::test]
async fn level_cap_discards_levels_beyond_the_ceiling() {
    let store = Arc::new(Store::open_in_memory().await.unwrap());
    seed_default_catalog(&store).await.unwrap();
    let players = PlayerService::new(Arc::clone(&store));
    let battle_pass = BattlePassService::new(Arc::clone(&store), 3);

    players.register("capped-one", "Capped").await.unwrap();
    let summary = battle_pass.add_experience("capped-one", 10_000).await.unwrap();

    assert_eq!(summary.level, 3);
    assert_eq!(summary.experience, 0);
    let levels: Vec<u32> = summary.granted_rewards.iter().map(|g| g.level).collect();
    assert_eq!(levels, vec![2, 3], "no grants beyond the cap");

    // Further experience keeps the level pinned at the cap
    let summary = battle_pass.add_experience("capped-one", 250).await.unwrap();
    assert_eq!(summary.level, 3);
    assert_eq!(summary.experience, 50);
    assert!(summary.granted_rewards.is_empty());
}
