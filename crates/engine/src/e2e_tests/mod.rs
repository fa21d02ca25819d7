//! End-to-end flows.
//!
//! Each test builds a full `App` over the in-memory adapters with a fixed
//! clock and scripted randomness, then drives it only through command
//! envelopes, the way the runner does.

mod retry_tests;
mod round_flow_tests;
mod shop_tests;

use std::sync::Arc;

use cantstop_shared::{CommandEnvelope, CommandIntent, CommandReply, QueryKind, RewardKind};
use serde::de::DeserializeOwned;

use crate::app::{App, Repositories};
use crate::infrastructure::catalog::{standard_listings, StandardCatalog};
use crate::infrastructure::clock::ScriptedRandom;
use crate::infrastructure::memory::InMemoryRepositories;
use crate::infrastructure::settings::GameSettings;
use crate::test_fixtures::clock;

/// An in-memory game with dice the test controls.
pub struct TestGame {
    pub app: App,
    pub random: Arc<ScriptedRandom>,
}

impl TestGame {
    pub fn new() -> Self {
        Self::with_settings(GameSettings::default())
    }

    pub fn with_settings(settings: GameSettings) -> Self {
        let random = Arc::new(ScriptedRandom::new([]));
        let app = App::in_memory(settings, clock(), random.clone());
        Self { app, random }
    }

    /// A game whose stores pass through `wire` before the app is built.
    pub fn wired(wire: impl FnOnce(InMemoryRepositories) -> Repositories) -> Self {
        let settings = GameSettings::default();
        let random = Arc::new(ScriptedRandom::new([]));
        let catalog = Arc::new(
            StandardCatalog::new(random.clone())
                .with_repeat_rewards(settings.repeat_item_reward, settings.repeat_trap_penalty),
        );
        let repos = wire(InMemoryRepositories::new(standard_listings()));
        let app = App::new(repos, catalog, clock(), random.clone(), settings);
        Self { app, random }
    }

    pub async fn send(&self, player: &str, command: CommandIntent) -> CommandReply {
        let envelope = CommandEnvelope {
            player_id: player.to_string(),
            nickname: None,
            command,
        };
        self.app.use_cases.commands.dispatch(&envelope).await
    }

    /// Send a command that must succeed; returns its narration.
    pub async fn ok(&self, player: &str, command: CommandIntent) -> Vec<String> {
        let reply = self.send(player, command.clone()).await;
        assert!(reply.is_ok(), "{command:?} rejected: {reply:?}");
        reply.messages().to_vec()
    }

    /// Register, join a faction and hand in enough artwork for a few rolls.
    pub async fn join(&self, player: &str, faction: &str) {
        self.ok(
            player,
            CommandIntent::Register {
                nickname: player.to_string(),
            },
        )
        .await;
        self.ok(
            player,
            CommandIntent::ChooseFaction {
                faction: faction.to_string(),
            },
        )
        .await;
        self.ok(
            player,
            CommandIntent::ClaimReward {
                kind: RewardKind::Sketch,
                count: 5,
                multiplier: 1,
            },
        )
        .await;
    }

    /// Roll with the given faces.
    pub async fn roll(&self, player: &str, faces: [i32; 6]) -> Vec<String> {
        self.random.push(faces);
        self.ok(player, CommandIntent::Roll { count: None }).await
    }

    pub async fn record(&self, player: &str, values: &[u8]) -> Vec<String> {
        self.ok(
            player,
            CommandIntent::RecordMove {
                values: values.to_vec(),
            },
        )
        .await
    }

    pub async fn query<T: DeserializeOwned>(&self, player: &str, query: QueryKind) -> T {
        match self.send(player, CommandIntent::Query { query }).await {
            CommandReply::Ok {
                data: Some(data), ..
            } => serde_json::from_value(data).expect("view decodes"),
            other => panic!("query {query:?} failed: {other:?}"),
        }
    }
}

pub fn mentions(messages: &[String], needle: &str) -> bool {
    messages.iter().any(|message| message.contains(needle))
}
