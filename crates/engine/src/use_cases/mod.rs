//! Use cases - player story orchestration.
//!
//! Each module holds the use cases for one area of the game. Use cases load
//! sessions through the `Players` entity, run the pure domain rules and
//! settle the results through the `EffectRouter`.

pub mod commands;
pub mod effects;
pub mod error;
pub mod items;
pub mod player;
pub mod queries;
pub mod round;

pub use commands::CommandDispatcher;
pub use effects::EffectRouter;
pub use error::GameError;
pub use items::ItemUseCases;
pub use player::PlayerUseCases;
pub use queries::Queries;
pub use round::RoundUseCases;
