//! End-to-end persistence: play through the gateway, reopen from disk.

use std::sync::Arc;

use foundry_core::actions::PlayerAction;
use foundry_core::battle::{play_out, start_battle, BattleMode, DEFAULT_TURN_LIMIT};
use foundry_core::config::GameRules;
use foundry_core::ids::PlayerId;
use foundry_core::rng::SeededRandom;
use foundry_sync::{FileStore, PlayerGateway, PlayerStore, SyncConfig, SyncWorker};
use foundry_test_utils::fixtures::builtin_catalog;

#[tokio::test]
async fn battle_progress_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = SyncConfig {
        save_dir: dir.path().join("saves"),
        ..SyncConfig::default()
    };
    let catalog = Arc::new(builtin_catalog());
    let id = PlayerId::new("pilot");

    let expected = {
        let store = Arc::new(FileStore::new(&config.save_dir).unwrap());
        let (handle, task) = SyncWorker::spawn(Arc::clone(&store), &config);
        let mut gateway = PlayerGateway::open(
            &id,
            "Pilot",
            store.as_ref(),
            Arc::clone(&catalog),
            GameRules::default(),
            SeededRandom::new(11),
            handle.clone(),
        )
        .unwrap();

        let player = gateway.player().clone();
        let session = start_battle(&player, BattleMode::Story(1), &catalog, gateway.rng()).unwrap();
        let (done, _) = play_out(session, &catalog, gateway.rng(), DEFAULT_TURN_LIMIT).unwrap();
        let report = done.finish().unwrap();
        gateway
            .apply(&PlayerAction::settle(BattleMode::Story(1), &report, 1_000))
            .unwrap();

        let unit = gateway.player().roster[0].id.clone();
        gateway.apply(&PlayerAction::TrainUnit(unit)).unwrap();

        handle.shutdown().await.unwrap();
        task.await.unwrap();
        gateway.player().clone()
    };

    let store = FileStore::new(&config.save_dir).unwrap();
    let reloaded = store.load(&id).unwrap().unwrap();
    assert_eq!(reloaded, expected);
    assert_eq!(reloaded.match_history.len(), 1);
    assert_eq!(reloaded.roster[0].xp, 50);
}
