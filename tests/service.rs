//! Integration tests for the orchestration service over the in-memory store:
//! write-through, resumption from persisted state, and change notification.

use badminton_tournament_web::store::{ChangeEvent, MemoryStore, TournamentStore};
use badminton_tournament_web::{
    Phase, ServiceError, SetSlot, Side, TournamentError, TournamentService,
};

async fn service_with_teams(n: usize) -> TournamentService<MemoryStore> {
    let service = TournamentService::new(MemoryStore::new());
    for i in 1..=n {
        service.add_team(&format!("Team {i}")).await.unwrap();
    }
    service
}

/// Drive the service to the group stage with all matches decided 2-0.
async fn decided_group_stage(service: &TournamentService<MemoryStore>) {
    service.generate_zones().await.unwrap();
    service.start_group_stage().await.unwrap();
    let snapshot = service.snapshot().unwrap();
    let ids: Vec<String> = snapshot
        .matches
        .iter()
        .flat_map(|g| g.match_list.iter().map(|m| m.id.clone()))
        .collect();
    for id in ids {
        for (set, a, b) in [(1, 21, 10), (2, 21, 12)] {
            let slot = SetSlot::from_number(set).unwrap();
            service.update_score(&id, slot, Side::A, a).await.unwrap();
            service.update_score(&id, slot, Side::B, b).await.unwrap();
        }
    }
}

#[tokio::test]
async fn add_team_swaps_in_the_store_assigned_row() {
    let service = service_with_teams(2).await;
    let snapshot = service.snapshot().unwrap();
    // Serial store ids, not the provisional timestamp ids.
    let ids: Vec<i64> = snapshot.teams.iter().map(|t| t.id).collect();
    assert_eq!(ids, [1, 2]);
    assert_eq!(snapshot.teams[0].name, "Team 1");
}

#[tokio::test]
async fn add_team_rejects_blank_names() {
    let service = TournamentService::new(MemoryStore::new());
    assert_eq!(
        service.add_team("   ").await.unwrap_err(),
        ServiceError::Tournament(TournamentError::EmptyTeamName)
    );
    assert!(service.snapshot().unwrap().teams.is_empty());
}

#[tokio::test]
async fn rename_and_remove_write_through() {
    let store = MemoryStore::new();
    let service = TournamentService::new(store.clone());
    service.add_team("Alpha").await.unwrap();
    service.add_team("Beta").await.unwrap();

    service.rename_team(1, "Alpha Prime").await.unwrap();
    service.remove_team(2).await.unwrap();

    let teams = store.list_teams().await.unwrap();
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0].name, "Alpha Prime");
}

#[tokio::test]
async fn phase_transitions_persist_fixtures_phase_and_zones() {
    let store = MemoryStore::new();
    let service = TournamentService::new(store.clone());
    for i in 1..=12 {
        service.add_team(&format!("Team {i}")).await.unwrap();
    }
    service.generate_zones().await.unwrap();

    let settings = store.get_settings().await.unwrap();
    assert_eq!(settings.phase, Some(Phase::ZonesDrafted));
    assert_eq!(settings.mini_groups.unwrap()["A"][0].len(), 6);

    service.start_group_stage().await.unwrap();
    let records = store.list_matches().await.unwrap();
    assert_eq!(records.len(), 6);
    assert!(records.iter().all(|r| r.phase == 2));
    assert_eq!(
        store.get_settings().await.unwrap().phase,
        Some(Phase::GroupStage)
    );
}

#[tokio::test]
async fn a_fresh_service_resumes_from_the_store() {
    let store = MemoryStore::new();
    let service = TournamentService::new(store.clone());
    for i in 1..=12 {
        service.add_team(&format!("Team {i}")).await.unwrap();
    }
    decided_group_stage(&service).await;

    // A second process over the same store converges to the same snapshot.
    let resumed = TournamentService::new(store);
    let snapshot = resumed.refresh().await.unwrap();
    assert_eq!(snapshot.phase, Phase::GroupStage);
    assert_eq!(snapshot.teams.len(), 12);
    assert_eq!(snapshot.mini_groups["A"][0].len(), 6);
    // Standings are re-derived, not read: the decided sweeps are visible.
    assert_eq!(snapshot.standings["Group A"][0].points, 3);
}

#[tokio::test]
async fn score_edits_write_the_full_match_score_through() {
    let store = MemoryStore::new();
    let service = TournamentService::new(store.clone());
    for i in 1..=12 {
        service.add_team(&format!("Team {i}")).await.unwrap();
    }
    service.generate_zones().await.unwrap();
    service.start_group_stage().await.unwrap();

    let slot1 = SetSlot::from_number(1).unwrap();
    service.update_score("ko-1-2", slot1, Side::A, 21).await.unwrap();
    service.update_score("ko-1-2", slot1, Side::B, 18).await.unwrap();

    let records = store.list_matches().await.unwrap();
    let record = records.iter().find(|r| r.id == "ko-1-2").unwrap();
    assert_eq!(record.score.set1.a, 21);
    assert_eq!(record.score.set1.b, 18);
}

#[tokio::test]
async fn stale_score_edit_reports_not_found_and_resyncs() {
    let store = MemoryStore::new();
    let service = TournamentService::new(store.clone());
    for i in 1..=12 {
        service.add_team(&format!("Team {i}")).await.unwrap();
    }
    service.generate_zones().await.unwrap();
    service.start_group_stage().await.unwrap();

    // Another writer resets the tournament behind this service's back.
    let other = TournamentService::new(store);
    other.refresh().await.unwrap();
    other.reset().await.unwrap();

    let err = service
        .update_score("nope", SetSlot::First, Side::A, 21)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::Tournament(TournamentError::MatchNotFound("nope".into()))
    );
    // The failed edit forced a resync, so the reset is now visible locally.
    assert_eq!(service.snapshot().unwrap().phase, Phase::Registration);
    assert!(service.snapshot().unwrap().matches.is_empty());
}

#[tokio::test]
async fn reset_clears_the_store_but_keeps_team_rows() {
    let store = MemoryStore::new();
    let service = TournamentService::new(store.clone());
    for i in 1..=12 {
        service.add_team(&format!("Team {i}")).await.unwrap();
    }
    decided_group_stage(&service).await;
    service.reset().await.unwrap();

    assert!(store.list_matches().await.unwrap().is_empty());
    assert_eq!(store.list_teams().await.unwrap().len(), 12);
    let settings = store.get_settings().await.unwrap();
    assert_eq!(settings.phase, Some(Phase::Registration));
    assert_eq!(settings.mini_groups, Some(Default::default()));
}

#[tokio::test]
async fn store_changes_are_broadcast_to_subscribers() {
    let store = MemoryStore::new();
    let mut events = store.subscribe();
    store.create_team("Alpha").await.unwrap();
    assert_eq!(events.recv().await.unwrap(), ChangeEvent::Teams);

    store.replace_all_matches(&[]).await.unwrap();
    assert_eq!(events.recv().await.unwrap(), ChangeEvent::Matches);
}

#[tokio::test]
async fn bulk_replace_rejects_duplicate_match_ids() {
    use badminton_tournament_web::store::{MatchRecord, StoreError};
    use badminton_tournament_web::Team;

    let store = MemoryStore::new();
    let record = MatchRecord {
        id: "1-2".into(),
        group: "Group A".into(),
        team_a: Team::new(1, "Team 1"),
        team_b: Team::new(2, "Team 2"),
        score: Default::default(),
        phase: 2,
    };
    let err = store
        .replace_all_matches(&[record.clone(), record])
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::DuplicateMatchId("1-2".into()));
    assert!(store.list_matches().await.unwrap().is_empty());
}
