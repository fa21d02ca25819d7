//! Standard content catalog.
//!
//! Decides what every trap, item and encounter does. Outcomes are plain
//! effect lists; the use cases apply them. Dice drawn here (duels, d20
//! checks, random targets) come from the injected `RandomPort` so tests can
//! script them.

mod encounters;
mod items;
mod traps;

use std::sync::Arc;

use cantstop_domain::{
    normalize_answer, Board, ChoiceSpec, ColumnId, ContentRef, ItemId, ShopListing,
};

use crate::infrastructure::ports::{
    CatalogError, ChoiceContext, ContentCatalog, ContentOutcome, ItemUseContext, RandomPort,
    TriggerContext,
};

pub use items::standard_listings;

pub struct StandardCatalog {
    board: Board,
    random: Arc<dyn RandomPort>,
    listings: Vec<ShopListing>,
    repeat_item_reward: u32,
    repeat_trap_penalty: u32,
}

impl StandardCatalog {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self {
            board: Board::standard(),
            random,
            listings: standard_listings(),
            repeat_item_reward: 10,
            repeat_trap_penalty: 10,
        }
    }

    /// Points for walking over an item someone already took, and the
    /// penalty for an already sprung trap.
    pub fn with_repeat_rewards(mut self, item_reward: u32, trap_penalty: u32) -> Self {
        self.repeat_item_reward = item_reward;
        self.repeat_trap_penalty = trap_penalty;
        self
    }

    /// One die with `sides` faces.
    fn roll(&self, sides: u8) -> u8 {
        let value = self.random.gen_range(1, i32::from(sides));
        u8::try_from(value.clamp(1, i32::from(sides))).unwrap_or(1)
    }

    fn roll_sum(&self, count: usize, sides: u8) -> u32 {
        (0..count).map(|_| u32::from(self.roll(sides))).sum()
    }

    /// Uniform pick from a non-empty slice.
    fn pick<'a, T>(&self, values: &'a [T]) -> Option<&'a T> {
        let last = i32::try_from(values.len()).ok()?.checked_sub(1)?;
        let index = usize::try_from(self.random.gen_range(0, last)).ok()?;
        values.get(index.min(values.len() - 1))
    }

    fn listing(&self, item: ItemId) -> Option<&ShopListing> {
        self.listings.iter().find(|listing| listing.item == item)
    }

    fn height(&self, column: ColumnId) -> Result<u8, CatalogError> {
        Ok(self.board.height(column)?)
    }
}

impl ContentCatalog for StandardCatalog {
    fn trigger(&self, ctx: &TriggerContext) -> Result<ContentOutcome, CatalogError> {
        match ctx.content {
            ContentRef::Item(item) => items::on_cell(self, ctx, item),
            ContentRef::Trap(trap) => traps::trigger(self, ctx, trap),
            ContentRef::Encounter(encounter) => encounters::trigger(self, ctx, encounter),
        }
    }

    fn use_item(&self, ctx: &ItemUseContext) -> Result<ContentOutcome, CatalogError> {
        items::use_item(self, ctx)
    }

    fn resolve_choice(&self, ctx: &ChoiceContext) -> Result<ContentOutcome, CatalogError> {
        match ctx.choice.source() {
            ContentRef::Item(item) => items::resolve(self, ctx, item),
            ContentRef::Trap(trap) => traps::resolve(self, ctx, trap),
            ContentRef::Encounter(encounter) => encounters::resolve(self, ctx, encounter),
        }
    }

    fn find_item(&self, name: &str) -> Option<ItemId> {
        let wanted = normalize_answer(name);
        if wanted.is_empty() {
            return None;
        }
        items::ALL_NAMES
            .iter()
            .find(|(_, item_name)| normalize_answer(item_name) == wanted)
            .map(|(id, _)| ItemId::new(*id))
    }

    fn item_name(&self, item: ItemId) -> String {
        items::name(item)
    }

    fn content_name(&self, content: ContentRef) -> String {
        match content {
            ContentRef::Item(item) => items::name(item),
            ContentRef::Trap(trap) => traps::name(trap),
            ContentRef::Encounter(encounter) => encounters::name(encounter),
        }
    }
}

fn options(labels: &[&str]) -> ChoiceSpec {
    ChoiceSpec::Options(labels.iter().map(|label| (*label).to_string()).collect())
}
