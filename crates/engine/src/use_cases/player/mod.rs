//! Player use cases: registration, faction, partner contracts and
//! check-in rewards.

mod choose_faction;
mod claim_reward;
mod link_partner;
mod register;

use std::sync::Arc;

pub use choose_faction::ChooseFaction;
pub use claim_reward::ClaimReward;
pub use link_partner::LinkPartner;
pub use register::Register;

/// Container for player use cases.
#[derive(Clone)]
pub struct PlayerUseCases {
    pub register: Arc<Register>,
    pub choose_faction: Arc<ChooseFaction>,
    pub link_partner: Arc<LinkPartner>,
    pub claim_reward: Arc<ClaimReward>,
}

impl PlayerUseCases {
    pub fn new(
        register: Arc<Register>,
        choose_faction: Arc<ChooseFaction>,
        link_partner: Arc<LinkPartner>,
        claim_reward: Arc<ClaimReward>,
    ) -> Self {
        Self {
            register,
            choose_faction,
            link_partner,
            claim_reward,
        }
    }
}
