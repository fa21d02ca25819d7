//! Item use cases: buying from the shop and using what you hold.

mod buy_item;
mod use_item;

use std::sync::Arc;

pub use buy_item::BuyItem;
pub use use_item::UseItem;

/// Container for item use cases.
#[derive(Clone)]
pub struct ItemUseCases {
    pub buy: Arc<BuyItem>,
    pub use_item: Arc<UseItem>,
}

impl ItemUseCases {
    pub fn new(buy: Arc<BuyItem>, use_item: Arc<UseItem>) -> Self {
        Self { buy, use_item }
    }
}
