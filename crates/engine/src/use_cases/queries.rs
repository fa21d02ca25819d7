//! Read-only queries.
//!
//! Each query loads what it needs and maps domain state onto the plain view
//! types from `cantstop_shared`. Nothing here writes.

use std::collections::BTreeMap;
use std::sync::Arc;

use cantstop_domain::{Board, Inventory, PendingChoice, PlayerGameState, PlayerId, RoundPhase};
use cantstop_shared::{
    AchievementView, BoardColumnView, BoardView, ChoiceView, ColumnView, InventoryView, ItemView,
    MarkerView, ProgressView, RollView, ShopItemView, ShopView,
};

use crate::entities::{Players, Session};
use crate::infrastructure::ports::{AchievementRepo, BoardRepo, ContentCatalog, ShopRepo};
use crate::use_cases::error::GameError;

pub struct Queries {
    board: Arc<Board>,
    players: Arc<Players>,
    achievements: Arc<dyn AchievementRepo>,
    records: Arc<dyn BoardRepo>,
    shop: Arc<dyn ShopRepo>,
    catalog: Arc<dyn ContentCatalog>,
}

impl Queries {
    pub fn new(
        board: Arc<Board>,
        players: Arc<Players>,
        achievements: Arc<dyn AchievementRepo>,
        records: Arc<dyn BoardRepo>,
        shop: Arc<dyn ShopRepo>,
        catalog: Arc<dyn ContentCatalog>,
    ) -> Self {
        Self {
            board,
            players,
            achievements,
            records,
            shop,
            catalog,
        }
    }

    /// Score, markers, round state and anything waiting on the player.
    pub async fn progress(&self, player_id: &PlayerId) -> Result<ProgressView, GameError> {
        let session = self.players.load(player_id).await?;
        Ok(self.progress_view(&session))
    }

    pub async fn inventory(&self, player_id: &PlayerId) -> Result<InventoryView, GameError> {
        let session = self.players.load(player_id).await?;
        Ok(self.inventory_view(&session.inventory))
    }

    pub async fn achievements(&self, player_id: &PlayerId) -> Result<Vec<AchievementView>, GameError> {
        // Unknown players are rejected like every other per-player query
        self.players.load(player_id).await?;
        let book = self.achievements.list(player_id).await?;
        Ok(book
            .entries()
            .into_iter()
            .map(|earned| AchievementView {
                id: earned.id.as_str().to_string(),
                title: earned.title,
                earned_at: earned.earned_at.to_rfc3339(),
            })
            .collect())
    }

    /// Unlocked listings with the player's price and holdings.
    pub async fn shop(&self, player_id: &PlayerId) -> Result<ShopView, GameError> {
        let session = self.players.load(player_id).await?;
        let half_price = session.state.round.half_price();
        let items = self
            .shop
            .list()
            .await?
            .into_iter()
            .filter(|listing| listing.unlocked && !listing.item.is_hidden())
            .map(|listing| ShopItemView {
                id: listing.item.get(),
                price: listing.price_for(half_price),
                faction: listing.faction.map(|faction| faction.as_str().to_string()),
                remaining: listing.remaining(),
                owned: session.inventory.quantity(listing.item),
                name: listing.name,
            })
            .collect();
        Ok(ShopView { half_price, items })
    }

    /// Every column with every player's markers, plus first clears and the
    /// winners so far.
    pub async fn board(&self) -> Result<BoardView, GameError> {
        let mut markers: BTreeMap<u8, Vec<MarkerView>> = BTreeMap::new();
        for player in self.players.list().await? {
            let state = self.players.load_state(player.id()).await?;
            for (column, progress) in state.markers.columns() {
                let entry = markers.entry(column.get()).or_default();
                if progress.permanent > 0 {
                    entry.push(MarkerView {
                        player_id: player.id().to_string(),
                        position: progress.permanent,
                        temporary: false,
                    });
                }
                if let Some(position) = progress.temporary {
                    entry.push(MarkerView {
                        player_id: player.id().to_string(),
                        position,
                        temporary: true,
                    });
                }
            }
        }

        let first_clears: BTreeMap<u8, String> = self
            .records
            .first_clears()
            .await?
            .into_iter()
            .map(|(column, player)| (column.get(), player.to_string()))
            .collect();

        let columns = self
            .board
            .columns()
            .map(|column| {
                let id = column.id().get();
                BoardColumnView {
                    column: id,
                    height: column.height(),
                    first_clear: first_clears.get(&id).cloned(),
                    markers: markers.remove(&id).unwrap_or_default(),
                }
            })
            .collect();

        let ranking = self
            .records
            .ranking()
            .await?
            .iter()
            .map(ToString::to_string)
            .collect();

        Ok(BoardView { columns, ranking })
    }

    fn progress_view(&self, session: &Session) -> ProgressView {
        let state = &session.state;
        let round = &state.round;
        ProgressView {
            player_id: session.id().to_string(),
            nickname: session.player.nickname().to_string(),
            faction: session.player.faction().map(|f| f.as_str().to_string()),
            current_score: session.player.current_score(),
            total_score: session.player.total_score(),
            state: phase_label(state).to_string(),
            columns: self.column_views(state),
            round_columns: state.markers.round_columns().iter().map(|c| c.get()).collect(),
            pending: round.pending().iter().map(choice_view).collect(),
            last_roll: round.last_roll().map(|roll| RollView {
                faces: roll.faces().to_vec(),
                pairs: roll.candidates().iter().map(|pair| pair.values()).collect(),
            }),
            free_rolls: round.free_rolls(),
            skip_rounds: round.skip_rounds(),
            forced_rounds: round.forced_rounds(),
            lockout_until: round.lockout_until().map(|until| until.to_rfc3339()),
            needs_check_in: round.needs_check_in(),
            frozen_columns: round.frozen_columns().iter().map(|c| c.get()).collect(),
            failures: round.failure_count(),
            has_won: round.has_won(),
            rank: round.rank(),
        }
    }

    fn column_views(&self, state: &PlayerGameState) -> Vec<ColumnView> {
        self.board
            .columns()
            .map(|column| {
                let progress = state.markers.progress(column.id());
                ColumnView {
                    column: column.id().get(),
                    height: column.height(),
                    permanent: progress.permanent,
                    temporary: progress.temporary,
                    topped: state.markers.is_topped(column.id()),
                }
            })
            .collect()
    }

    fn inventory_view(&self, inventory: &Inventory) -> InventoryView {
        InventoryView {
            items: inventory
                .entries()
                .map(|entry| ItemView {
                    id: entry.item.get(),
                    name: self.catalog.item_name(entry.item),
                    quantity: entry.quantity,
                    hidden: entry.item.is_hidden(),
                })
                .collect(),
        }
    }
}

fn phase_label(state: &PlayerGameState) -> &'static str {
    match state.round.phase() {
        RoundPhase::Idle => "idle",
        RoundPhase::Active if !state.round.pending().is_empty() => "awaiting_choice",
        RoundPhase::Active => "active",
        RoundPhase::Locked => "locked",
    }
}

fn choice_view(choice: &PendingChoice) -> ChoiceView {
    ChoiceView {
        source: choice.source().to_string(),
        prompt: choice.prompt().to_string(),
        options: choice.options().to_vec(),
        freeform: choice.options().is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        MockAchievementRepo, MockBoardRepo, MockContentCatalog, MockInventoryRepo,
        MockPlayerRepo, MockShopRepo,
    };
    use crate::test_fixtures::{active_session, column, now, player, player_id, session};
    use cantstop_domain::{AchievementBook, AchievementId, ItemId, ShopListing};

    struct QueryMocks {
        players: MockPlayerRepo,
        inventory: MockInventoryRepo,
        achievements: MockAchievementRepo,
        records: MockBoardRepo,
        shop: MockShopRepo,
        catalog: MockContentCatalog,
    }

    impl QueryMocks {
        fn new() -> Self {
            Self {
                players: MockPlayerRepo::new(),
                inventory: MockInventoryRepo::new(),
                achievements: MockAchievementRepo::new(),
                records: MockBoardRepo::new(),
                shop: MockShopRepo::new(),
                catalog: MockContentCatalog::new(),
            }
        }

        fn serve(&mut self, session: &Session) {
            let stored = session.player.clone();
            self.players
                .expect_get()
                .returning(move |_| Ok(Some(stored.clone())));
            let state = session.state.clone();
            self.players
                .expect_load_state()
                .returning(move |_| Ok(state.clone()));
            let inventory = session.inventory.clone();
            self.inventory
                .expect_get()
                .returning(move |_| Ok(inventory.clone()));
        }

        fn build(self) -> Queries {
            let players = Arc::new(Players::new(
                Arc::new(self.players),
                Arc::new(self.inventory),
            ));
            Queries::new(
                Arc::new(Board::standard()),
                players,
                Arc::new(self.achievements),
                Arc::new(self.records),
                Arc::new(self.shop),
                Arc::new(self.catalog),
            )
        }
    }

    #[tokio::test]
    async fn progress_reports_markers_and_phase() {
        let mut me = active_session("a");
        me.state
            .markers
            .advance(&Board::standard(), column(7))
            .expect("advances");
        let mut mocks = QueryMocks::new();
        mocks.serve(&me);

        let view = mocks.build().progress(me.id()).await.expect("progress");

        assert_eq!(view.state, "active");
        assert_eq!(view.current_score, 100);
        assert_eq!(view.faction.as_deref(), Some("adopter"));
        assert_eq!(view.columns.len(), 16);
        let seven = view
            .columns
            .iter()
            .find(|c| c.column == 7)
            .expect("column 7");
        assert_eq!(seven.temporary, Some(1));
        assert_eq!(seven.permanent, 0);
        assert_eq!(view.round_columns, vec![7]);
    }

    #[tokio::test]
    async fn when_player_unknown_progress_fails() {
        let mut mocks = QueryMocks::new();
        mocks.players.expect_get().returning(|_| Ok(None));

        let result = mocks.build().progress(&player_id("ghost")).await;
        assert!(matches!(result, Err(GameError::Repo(_))));
    }

    #[tokio::test]
    async fn shop_hides_locked_listings_and_shows_holdings() {
        let mut me = session("a");
        me.inventory.add(ItemId::new(1), 2);
        let mut mocks = QueryMocks::new();
        mocks.serve(&me);
        mocks.shop.expect_list().returning(|| {
            Ok(vec![
                ShopListing::new(ItemId::new(1), "Loser's Dust", 30).unlocked(),
                ShopListing::new(ItemId::new(2), "Secret Thing", 50),
            ])
        });

        let view = mocks.build().shop(me.id()).await.expect("shop");

        assert!(!view.half_price);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].name, "Loser's Dust");
        assert_eq!(view.items[0].owned, 2);
        assert_eq!(view.items[0].price, 30);
    }

    #[tokio::test]
    async fn inventory_names_items_through_the_catalog() {
        let mut me = session("a");
        me.inventory.add(ItemId::new(1), 1);
        let mut mocks = QueryMocks::new();
        mocks.serve(&me);
        mocks
            .catalog
            .expect_item_name()
            .returning(|item| format!("Item {}", item.get()));

        let view = mocks.build().inventory(me.id()).await.expect("inventory");
        assert_eq!(
            view.items,
            vec![ItemView {
                id: 1,
                name: "Item 1".to_string(),
                quantity: 1,
                hidden: false,
            }]
        );
    }

    #[tokio::test]
    async fn achievements_carry_titles_and_timestamps() {
        let me = session("a");
        let mut mocks = QueryMocks::new();
        mocks.serve(&me);
        mocks.achievements.expect_list().returning(|_| {
            let mut book = AchievementBook::new();
            book.grant(AchievementId::all_ones(), now());
            Ok(book)
        });

        let views = mocks.build().achievements(me.id()).await.expect("achievements");
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].title, "Silent Thunder");
        assert_eq!(views[0].earned_at, now().to_rfc3339());
    }

    #[tokio::test]
    async fn board_lists_every_players_markers() {
        let mut me = active_session("a");
        me.state
            .markers
            .advance(&Board::standard(), column(7))
            .expect("advances");
        let mut mocks = QueryMocks::new();
        let listed = vec![player("a")];
        mocks
            .players
            .expect_list()
            .returning(move || Ok(listed.clone()));
        let state = me.state.clone();
        mocks
            .players
            .expect_load_state()
            .returning(move |_| Ok(state.clone()));
        mocks
            .records
            .expect_first_clears()
            .returning(|| Ok(vec![(column(3), player_id("b"))]));
        mocks
            .records
            .expect_ranking()
            .returning(|| Ok(vec![player_id("b")]));

        let view = mocks.build().board().await.expect("board");

        assert_eq!(view.ranking, vec!["b".to_string()]);
        let three = view.columns.iter().find(|c| c.column == 3).expect("column 3");
        assert_eq!(three.first_clear.as_deref(), Some("b"));
        let seven = view.columns.iter().find(|c| c.column == 7).expect("column 7");
        assert_eq!(
            seven.markers,
            vec![MarkerView {
                player_id: "a".to_string(),
                position: 1,
                temporary: true,
            }]
        );
    }
}
