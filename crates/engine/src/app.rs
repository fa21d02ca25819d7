//! Application state and composition.

use std::sync::Arc;

use cantstop_domain::Board;

use crate::entities::Players;
use crate::infrastructure::{
    catalog::{standard_listings, StandardCatalog},
    memory::InMemoryRepositories,
    ports::{
        AchievementRepo, BoardRepo, ClockPort, ContentCatalog, InventoryRepo, PlayerRepo,
        RandomPort, ShopRepo,
    },
    settings::GameSettings,
};
use crate::use_cases;

/// Main application state.
///
/// Holds all repository ports and use cases. The command runner hands each
/// decoded envelope to `use_cases.commands`.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub settings: Arc<GameSettings>,
}

/// Container for all repository ports.
#[derive(Clone)]
pub struct Repositories {
    pub players: Arc<dyn PlayerRepo>,
    pub inventory: Arc<dyn InventoryRepo>,
    pub achievements: Arc<dyn AchievementRepo>,
    pub board: Arc<dyn BoardRepo>,
    pub shop: Arc<dyn ShopRepo>,
}

impl From<InMemoryRepositories> for Repositories {
    fn from(repos: InMemoryRepositories) -> Self {
        Self {
            players: repos.players,
            inventory: repos.inventory,
            achievements: repos.achievements,
            board: repos.board,
            shop: repos.shop,
        }
    }
}

/// Container for all use cases.
pub struct UseCases {
    pub player: use_cases::PlayerUseCases,
    pub round: use_cases::RoundUseCases,
    pub items: use_cases::ItemUseCases,
    pub queries: Arc<use_cases::Queries>,
    pub commands: use_cases::CommandDispatcher,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        repos: Repositories,
        catalog: Arc<dyn ContentCatalog>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        settings: GameSettings,
    ) -> Self {
        let settings = Arc::new(settings);
        let board = Arc::new(Board::standard());

        let players = Arc::new(Players::new(repos.players.clone(), repos.inventory.clone()));
        let router = Arc::new(use_cases::EffectRouter::new(
            board.clone(),
            players.clone(),
            repos.inventory.clone(),
            repos.achievements.clone(),
            repos.board.clone(),
            repos.shop.clone(),
            random.clone(),
            settings.clone(),
        ));

        let player = use_cases::PlayerUseCases::new(
            Arc::new(use_cases::player::Register::new(
                players.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::player::ChooseFaction::new(players.clone())),
            Arc::new(use_cases::player::LinkPartner::new(players.clone())),
            Arc::new(use_cases::player::ClaimReward::new(players.clone())),
        );

        let round = use_cases::RoundUseCases::new(
            Arc::new(use_cases::round::StartRound::new(
                players.clone(),
                router.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::round::RollDice::new(
                players.clone(),
                router.clone(),
                random.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::round::RecordMove::new(
                players.clone(),
                router.clone(),
                catalog.clone(),
                repos.board.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::round::EndRound::new(
                players.clone(),
                router.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::round::CheckIn::new(
                players.clone(),
                router.clone(),
            )),
            Arc::new(use_cases::round::ResolveChoice::new(
                players.clone(),
                router.clone(),
                catalog.clone(),
                clock.clone(),
            )),
        );

        let items = use_cases::ItemUseCases::new(
            Arc::new(use_cases::items::BuyItem::new(
                players.clone(),
                repos.shop.clone(),
                router.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::items::UseItem::new(
                players.clone(),
                router.clone(),
                catalog.clone(),
                clock.clone(),
            )),
        );

        let queries = Arc::new(use_cases::Queries::new(
            board,
            players.clone(),
            repos.achievements.clone(),
            repos.board.clone(),
            repos.shop.clone(),
            catalog,
        ));

        let commands = use_cases::CommandDispatcher::new(
            players,
            player.clone(),
            round.clone(),
            items.clone(),
            queries.clone(),
            settings.command_retries,
        );

        Self {
            repositories: repos,
            use_cases: UseCases {
                player,
                round,
                items,
                queries,
                commands,
            },
            settings,
        }
    }

    /// An app over fresh in-memory stores, the standard shop stock and the
    /// standard content catalog.
    pub fn in_memory(
        settings: GameSettings,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let catalog = Arc::new(
            StandardCatalog::new(random.clone())
                .with_repeat_rewards(settings.repeat_item_reward, settings.repeat_trap_penalty),
        );
        let repos = InMemoryRepositories::new(standard_listings());
        Self::new(repos.into(), catalog, clock, random, settings)
    }
}
