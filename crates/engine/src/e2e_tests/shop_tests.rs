//! Buying from the shop.

use cantstop_shared::{
    CommandIntent, ErrorKind, InventoryView, ProgressView, QueryKind, RewardKind, ShopView,
};

use super::{mentions, TestGame};

#[tokio::test]
async fn only_unlocked_stock_is_on_sale() {
    let game = TestGame::new();
    game.join("mira", "adopter").await;

    let shop: ShopView = game.query("mira", QueryKind::Shop).await;
    let names: Vec<&str> = shop.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Ugly Cat Plush"]);

    let reply = game
        .send(
            "mira",
            CommandIntent::BuyItem {
                name: "Loser's Dust".to_string(),
            },
        )
        .await;
    assert!(!reply.is_ok());
}

#[tokio::test]
async fn buying_spends_score_and_fills_the_inventory() {
    let game = TestGame::new();
    game.join("mira", "adopter").await;
    game.ok(
        "mira",
        CommandIntent::ClaimReward {
            kind: RewardKind::SmallDrawing,
            count: 1,
            multiplier: 1,
        },
    )
    .await;

    let bought = game
        .ok(
            "mira",
            CommandIntent::BuyItem {
                name: "ugly cat plush".to_string(),
            },
        )
        .await;
    assert!(mentions(&bought, "Bought Ugly Cat Plush for 150"));

    let progress: ProgressView = game.query("mira", QueryKind::Progress).await;
    assert_eq!(progress.current_score, 100 + 80 - 150);
    assert_eq!(progress.total_score, 180);

    let inventory: InventoryView = game.query("mira", QueryKind::Inventory).await;
    assert_eq!(inventory.items.len(), 1);
    assert_eq!(inventory.items[0].quantity, 1);

    let again = game
        .send(
            "mira",
            CommandIntent::BuyItem {
                name: "Ugly Cat Plush".to_string(),
            },
        )
        .await;
    assert_eq!(again.error_kind(), Some(ErrorKind::Resource));
}

#[tokio::test]
async fn a_short_balance_changes_nothing() {
    let game = TestGame::new();
    game.join("mira", "adopter").await;

    let reply = game
        .send(
            "mira",
            CommandIntent::BuyItem {
                name: "Ugly Cat Plush".to_string(),
            },
        )
        .await;
    assert_eq!(reply.error_kind(), Some(ErrorKind::Resource));

    let progress: ProgressView = game.query("mira", QueryKind::Progress).await;
    assert_eq!(progress.current_score, 100);
    let inventory: InventoryView = game.query("mira", QueryKind::Inventory).await;
    assert!(inventory.items.is_empty());
}
