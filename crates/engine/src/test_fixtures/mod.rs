//! Shared helpers for unit tests.
//!
//! Players and sessions in known states, plus `PortMocks`, which wires one
//! mock per repository port into the `Players` entity and an `EffectRouter`
//! the way `App` wires the real adapters.

use std::sync::Arc;

use cantstop_domain::{
    Board, ColumnId, Faction, Inventory, Player, PlayerGameState, PlayerId, RoundStateMachine,
};
use chrono::{DateTime, TimeZone, Utc};

use crate::entities::{Players, Session};
use crate::infrastructure::clock::{FixedClock, FixedRandom};
use crate::infrastructure::ports::{
    InventoryRepo, MockAchievementRepo, MockBoardRepo, MockInventoryRepo, MockPlayerRepo,
    MockShopRepo, RandomPort,
};
use crate::infrastructure::settings::GameSettings;
use crate::use_cases::EffectRouter;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(now()))
}

pub fn player_id(raw: &str) -> PlayerId {
    PlayerId::new(raw).expect("valid id")
}

pub fn column(raw: u8) -> ColumnId {
    ColumnId::new(raw).expect("valid column")
}

/// An Adopter with 100 points.
pub fn player(raw: &str) -> Player {
    Player::new(player_id(raw), raw, now())
        .expect("valid player")
        .with_faction(Faction::Adopter)
        .with_score(100)
}

pub fn session(raw: &str) -> Session {
    Session {
        player: player(raw),
        state: PlayerGameState::new(player_id(raw)),
        inventory: Inventory::new(),
    }
}

/// A session with a round already started.
pub fn active_session(raw: &str) -> Session {
    let mut session = session(raw);
    let board = Board::standard();
    RoundStateMachine::new(&board, 10)
        .start_round(&session.player, &mut session.state, now())
        .expect("round starts");
    session
}

/// One mock per repository port. Set expectations, then `build`.
pub struct PortMocks {
    pub players: MockPlayerRepo,
    pub inventory: MockInventoryRepo,
    pub achievements: MockAchievementRepo,
    pub records: MockBoardRepo,
    pub shop: MockShopRepo,
    pub random: Arc<dyn RandomPort>,
    pub settings: GameSettings,
}

impl PortMocks {
    pub fn new() -> Self {
        Self {
            players: MockPlayerRepo::new(),
            inventory: MockInventoryRepo::new(),
            achievements: MockAchievementRepo::new(),
            records: MockBoardRepo::new(),
            shop: MockShopRepo::new(),
            random: Arc::new(FixedRandom(0)),
            settings: GameSettings::default(),
        }
    }

    /// Serve `session` from the player mocks: get, load_state and inventory.
    pub fn serve(&mut self, session: &Session) {
        let player = session.player.clone();
        let id = player.id().clone();
        self.players
            .expect_get()
            .withf(move |wanted| *wanted == id)
            .returning(move |_| Ok(Some(player.clone())));
        let state = session.state.clone();
        let id = state.player_id.clone();
        self.players
            .expect_load_state()
            .withf(move |wanted| *wanted == id)
            .returning(move |_| Ok(state.clone()));
        let inventory = session.inventory.clone();
        let id = session.id().clone();
        self.inventory
            .expect_get()
            .withf(move |wanted| *wanted == id)
            .returning(move |_| Ok(inventory.clone()));
    }

    /// Accept every save, bumping the version.
    pub fn accept_saves(&mut self) {
        self.players
            .expect_save()
            .returning(|_, state| Ok(state.version + 1));
    }

    pub fn build(self) -> (Arc<Players>, Arc<EffectRouter>) {
        let (players, router, _) = self.build_with_shop();
        (players, router)
    }

    /// Also hands back the shop mock, for use cases that talk to the shop
    /// directly through the same instance the router uses.
    pub fn build_with_shop(self) -> (Arc<Players>, Arc<EffectRouter>, Arc<MockShopRepo>) {
        let inventory: Arc<dyn InventoryRepo> = Arc::new(self.inventory);
        let players = Arc::new(Players::new(Arc::new(self.players), inventory.clone()));
        let shop = Arc::new(self.shop);
        let router = Arc::new(EffectRouter::new(
            Arc::new(Board::standard()),
            players.clone(),
            inventory,
            Arc::new(self.achievements),
            Arc::new(self.records),
            shop.clone(),
            self.random,
            Arc::new(self.settings),
        ));
        (players, router, shop)
    }
}
