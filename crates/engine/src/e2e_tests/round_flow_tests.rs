//! A player's round from start to check-in.

use cantstop_shared::{CommandIntent, ErrorKind, ProgressView, QueryKind};

use super::{mentions, TestGame};

#[tokio::test]
async fn banked_progress_survives_into_the_next_round() {
    let game = TestGame::new();
    game.join("mira", "adopter").await;
    game.ok("mira", CommandIntent::StartRound).await;

    // 3+3+3 and 3+3+4: only (9, 10)
    let rolled = game.roll("mira", [3, 3, 3, 3, 3, 4]).await;
    assert!(mentions(&rolled, "Paid 10 for the roll"));
    assert!(mentions(&rolled, "(9, 10)"));

    let moved = game.record("mira", &[9, 10]).await;
    assert!(mentions(&moved, "Column 9: marker now at 1"));
    assert!(mentions(&moved, "Column 10: marker now at 1"));

    // column 9 opens with the Court
    assert!(mentions(&moved, "Encounter: The Court"));
    game.ok(
        "mira",
        CommandIntent::ResolveChoice {
            answer: "present the shiny thing".to_string(),
        },
    )
    .await;

    let ended = game.ok("mira", CommandIntent::EndRoundActive).await;
    assert!(mentions(&ended, "Round banked"));

    let progress: ProgressView = game.query("mira", QueryKind::Progress).await;
    assert_eq!(progress.state, "locked");
    assert!(progress.needs_check_in);
    assert_eq!(progress.current_score, 85);
    let nine = progress.columns.iter().find(|c| c.column == 9).expect("column 9");
    assert_eq!((nine.permanent, nine.temporary), (1, None));

    let refused = game.send("mira", CommandIntent::StartRound).await;
    assert_eq!(refused.error_kind(), Some(ErrorKind::State));

    game.ok("mira", CommandIntent::CheckIn).await;
    game.ok("mira", CommandIntent::StartRound).await;
    let progress: ProgressView = game.query("mira", QueryKind::Progress).await;
    assert_eq!(progress.state, "active");
}

#[tokio::test]
async fn giving_up_loses_the_rounds_progress() {
    let game = TestGame::new();
    game.join("mira", "adopter").await;
    game.ok("mira", CommandIntent::StartRound).await;
    game.roll("mira", [3, 3, 3, 3, 3, 4]).await;
    game.record("mira", &[9, 10]).await;
    game.ok(
        "mira",
        CommandIntent::ResolveChoice {
            answer: "present the shiny thing".to_string(),
        },
    )
    .await;

    let ended = game.ok("mira", CommandIntent::EndRoundPassive).await;
    assert!(mentions(&ended, "This round's progress is lost"));

    let progress: ProgressView = game.query("mira", QueryKind::Progress).await;
    assert!(progress
        .columns
        .iter()
        .all(|c| c.permanent == 0 && c.temporary.is_none()));
}

#[tokio::test]
async fn a_move_outside_the_roll_is_rejected_and_nothing_changes() {
    let game = TestGame::new();
    game.join("mira", "adopter").await;
    game.ok("mira", CommandIntent::StartRound).await;
    game.roll("mira", [3, 3, 3, 3, 3, 4]).await;

    let reply = game
        .send("mira", CommandIntent::RecordMove { values: vec![7, 11] })
        .await;
    assert_eq!(reply.error_kind(), Some(ErrorKind::Validation));

    let progress: ProgressView = game.query("mira", QueryKind::Progress).await;
    assert!(progress.last_roll.is_some());
    assert!(progress.round_columns.is_empty());
}

#[tokio::test]
async fn topping_a_column_pays_and_records_the_first_clear() {
    let game = TestGame::new();
    game.join("mira", "adopter").await;
    game.ok("mira", CommandIntent::StartRound).await;

    // (18, 18) twice carries the marker past the encounter to the pickup
    game.roll("mira", [6, 6, 6, 6, 6, 6]).await;
    let moved = game.record("mira", &[18, 18]).await;
    assert!(mentions(&moved, "Column 18: marker now at 2"));
    assert!(mentions(&moved, "Bonfire"));

    game.roll("mira", [6, 6, 6, 6, 6, 6]).await;
    let moved = game.record("mira", &[18]).await;
    assert!(mentions(&moved, "Column 18: marker now at 3"));

    let ended = game.ok("mira", CommandIntent::EndRoundActive).await;
    assert!(mentions(&ended, "Column 18 topped! +10"));
    assert!(mentions(&ended, "First to top column 18! +20"));

    let progress: ProgressView = game.query("mira", QueryKind::Progress).await;
    let top = progress.columns.iter().find(|c| c.column == 18).expect("column 18");
    assert!(top.topped);
}

#[tokio::test]
async fn unregistered_players_are_told_to_register() {
    let game = TestGame::new();
    let reply = game.send("ghost", CommandIntent::StartRound).await;
    assert_eq!(reply.error_kind(), Some(ErrorKind::Validation));

    let reply = game.send("ghost", CommandIntent::Unknown).await;
    assert_eq!(reply.error_kind(), Some(ErrorKind::Validation));
}

#[tokio::test]
async fn rolling_without_score_is_a_resource_error() {
    let game = TestGame::new();
    game.ok(
        "mira",
        CommandIntent::Register {
            nickname: "Mira".to_string(),
        },
    )
    .await;
    game.ok(
        "mira",
        CommandIntent::ChooseFaction {
            faction: "aeonreth".to_string(),
        },
    )
    .await;
    game.ok("mira", CommandIntent::StartRound).await;

    game.random.push([1, 1, 1, 1, 1, 1]);
    let reply = game.send("mira", CommandIntent::Roll { count: None }).await;
    assert_eq!(reply.error_kind(), Some(ErrorKind::Resource));
}
