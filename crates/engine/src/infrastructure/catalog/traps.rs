//! Traps: a penalty the first time a cell is sprung, a flat fine after that.

use cantstop_domain::{
    AchievementId, ColumnId, ContentRef, CounterKind, Effect, EffectTarget, Faction, GroupSplit,
    ItemId, PendingChoice, TrapId,
};

use super::items::FRESH_SALMON;
use super::{options, StandardCatalog};
use crate::infrastructure::ports::{CatalogError, ChoiceContext, ContentOutcome, TriggerContext};

const NAMES: [&str; 20] = [
    "Little Fireball",
    "Don't Look Back",
    "Wedding Ring",
    "White Hook",
    "The Closed Door",
    "Odd Changes Even Stays",
    "Thunder King",
    "Standoff",
    "Portal",
    "Thorns",
    "Hesitation Is Defeat",
    "Rainbow Octopus",
    "Hollow Cell",
    "OAS Akaria",
    "The Witch's Hut",
    "You Disturbed the Witch",
    "Tick Tock",
    "No Entry",
    "No Air Force",
    "Lucky Day",
];

const HUT_PROMPT: &str = "A voice from the hut: could you give me a hand?";
const HELP_OUT: &str = "Help out";

pub(super) fn name(trap: TrapId) -> String {
    usize::from(trap.get())
        .checked_sub(1)
        .and_then(|index| NAMES.get(index))
        .map_or_else(|| trap.to_string(), |name| (*name).to_string())
}

pub(super) fn trigger(
    catalog: &StandardCatalog,
    ctx: &TriggerContext,
    trap: TrapId,
) -> Result<ContentOutcome, CatalogError> {
    let title = name(trap);

    if ctx.player.trap_immunity.is_some() {
        return Ok(ContentOutcome::message(format!(
            "Trap: {title}. Your protection takes the hit instead"
        ))
        .with_effect(Effect::UseTrapImmunity));
    }

    if !ctx.is_first {
        let penalty = catalog.repeat_trap_penalty;
        return Ok(ContentOutcome::message(format!(
            "Trap: {title}. It was already sprung. -{penalty} points"
        ))
        .with_effect(Effect::ScoreDelta {
            amount: -i64::from(penalty),
        }));
    }

    let sprung = spring(catalog, ctx, trap)?;
    let mut outcome = ContentOutcome {
        message: format!("Trap: {title}\n{}", sprung.message),
        ..sprung
    };
    outcome.effects.extend([
        Effect::CountEvent {
            counter: CounterKind::TrapsTriggered,
        },
        Effect::Achievement {
            id: AchievementId::trap(trap),
        },
    ]);
    Ok(outcome)
}

fn spring(
    catalog: &StandardCatalog,
    ctx: &TriggerContext,
    trap: TrapId,
) -> Result<ContentOutcome, CatalogError> {
    let player = &ctx.player;
    let column = ctx.at.column;

    let outcome = match trap.get() {
        1 => ContentOutcome::message(
            "A fireball! You sit out one turn and your next roll will be 4 5 5 5 6 6",
        )
        .with_effects([
            Effect::SkipRounds { count: 1 },
            Effect::FixNextRoll {
                faces: vec![4, 5, 5, 5, 6, 6],
            },
        ]),
        2 => {
            let height = catalog.height(column)?;
            ContentOutcome::message(
                "You saw its face. Your marker falls back to your last checkpoint",
            )
            .with_effect(Effect::PositionDelta {
                column,
                delta: -i32::from(height),
            })
        }
        3 => match &player.partner {
            None => ContentOutcome::message(
                "A ring with no one to share it. The round ends until you check in a drawing",
            )
            .with_effect(Effect::ForceEndRound {
                until_check_in: true,
            }),
            Some(_) => ContentOutcome::message(
                "Your contract protects you. You and your partner each get a free roll",
            )
            .with_effects([
                Effect::FreeRolls { count: 1 },
                Effect::ForPlayer {
                    target: EffectTarget::Partner,
                    effects: vec![Effect::FreeRolls { count: 1 }],
                },
            ]),
        },
        4 => ContentOutcome::message("A huge hook drags you back two cells")
            .with_effect(Effect::PositionDelta { column, delta: -2 }),
        5 => {
            let neighbours: Vec<ColumnId> = [column.get().checked_sub(1), column.get().checked_add(1)]
                .into_iter()
                .flatten()
                .filter_map(|raw| ColumnId::new(raw).ok())
                .collect();
            match catalog.pick(&neighbours) {
                Some(to) => ContentOutcome::message(format!(
                    "The door does not open from this side. You move to column {to}"
                ))
                .with_effect(Effect::TeleportTo { from: column, to: *to }),
                None => ContentOutcome::message("The door does not open from this side"),
            }
        }
        6 => ContentOutcome::message("Odd changes, even stays. Your next roll is put to the test")
            .with_effect(Effect::OddEvenCheck),
        7 => ContentOutcome::message("Lightning runs through you. Your next roll needs a math check")
            .with_effect(Effect::MathCheck),
        8 => {
            let mine = catalog.roll(6);
            let theirs = catalog.roll(6);
            if mine < theirs {
                ContentOutcome::message(format!(
                    "Standoff: you rolled {mine} against {theirs} and lost. Back one cell"
                ))
                .with_effect(Effect::PositionDelta { column, delta: -1 })
            } else if mine == theirs {
                ContentOutcome::message(format!("Standoff: {mine} against {theirs}, a draw"))
            } else {
                ContentOutcome::message(format!(
                    "Standoff: you rolled {mine} against {theirs} and held your ground"
                ))
            }
        }
        9 => {
            let others: Vec<ColumnId> = ColumnId::all().filter(|c| *c != column).collect();
            match catalog.pick(&others) {
                Some(to) => ContentOutcome::message(format!(
                    "A portal swallows you. You land in column {to}"
                ))
                .with_effect(Effect::TeleportTo { from: column, to: *to }),
                None => ContentOutcome::message("The portal flickers out"),
            }
        }
        10 => {
            let dodge = catalog.roll(20);
            if dodge > 18 {
                ContentOutcome::message(format!(
                    "d20 = {dodge}: you slip past the thorns and catch a fresh salmon"
                ))
                .with_effect(Effect::InventoryDelta {
                    item: ItemId::new(FRESH_SALMON),
                    quantity: 1,
                })
            } else {
                ContentOutcome::message(format!("d20 = {dodge}: the thorns get you. -20 points"))
                    .with_effect(Effect::ScoreDelta { amount: -20 })
            }
        }
        11 => ContentOutcome::message(
            "Your dice throw themselves. You must roll two more times before ending the round",
        )
        .with_effect(Effect::ForceRounds { count: 2 }),
        12 => ContentOutcome::message("The octopus tosses you. Every marker in play falls back one cell")
            .with_effects(
                player
                    .temporary
                    .iter()
                    .map(|(column, _)| Effect::PositionDelta {
                        column: *column,
                        delta: -1,
                    }),
            ),
        13 => ContentOutcome::message("You step into nothing and fall. Skip two turns")
            .with_effect(Effect::SkipRounds { count: 2 }),
        14 => {
            let loss = (player.current_score / 4).max(1);
            ContentOutcome::message(format!("Your resolve shatters. -{loss} points"))
                .with_effect(Effect::ScoreDelta { amount: -loss })
        }
        15 => ContentOutcome::message("Someone in the hut needs help").with_choice(
            PendingChoice::new(
                ContentRef::Trap(trap),
                HUT_PROMPT,
                options(&[HELP_OUT, "Leave"]),
            )
            .with_cell(ctx.at),
        ),
        16 => {
            if player.faction == Some(Faction::Aeonreth) {
                ContentOutcome::message(
                    "You strike back at once and drive the witch off, but you need a rest",
                )
                .with_effect(Effect::ForceEndRound {
                    until_check_in: false,
                })
            } else {
                let check = catalog.roll(20);
                if check >= 10 {
                    ContentOutcome::message(format!(
                        "d20 = {check}: you drive the witch off, but you need a rest"
                    ))
                    .with_effect(Effect::ForceEndRound {
                        until_check_in: false,
                    })
                } else {
                    ContentOutcome::message(format!(
                        "d20 = {check}: you wake up with your candy gone. -20 points"
                    ))
                    .with_effect(Effect::ScoreDelta { amount: -20 })
                }
            }
        }
        17 => {
            let owned: Vec<ItemId> = player
                .inventory
                .iter()
                .filter(|entry| !entry.item.is_hidden() && entry.quantity > 0)
                .map(|entry| entry.item)
                .collect();
            match catalog.pick(&owned) {
                Some(item) => ContentOutcome::message(format!(
                    "I will take your time. You lose {}",
                    super::items::name(*item)
                ))
                .with_effect(Effect::InventoryDelta {
                    item: *item,
                    quantity: -1,
                }),
                None => ContentOutcome::message("I will take your time. No items, so -100 points")
                    .with_effect(Effect::ScoreDelta { amount: -100 }),
            }
        }
        18 => {
            let hours = catalog.random.gen_range(5, 24) + 4;
            let minutes = u32::try_from(hours.max(0)).unwrap_or(0) * 60;
            ContentOutcome::message(format!(
                "The hut comes alive and traps you for {hours} hours"
            ))
            .with_effects([
                Effect::LockoutFor { minutes },
                Effect::ForceEndRound {
                    until_check_in: false,
                },
            ])
        }
        19 => {
            let mut outcome =
                ContentOutcome::message("A black shadow. You lose control for two turns. -20 points")
                    .with_effects([
                        Effect::ScoreDelta { amount: -20 },
                        Effect::SkipRounds { count: 2 },
                    ]);
            if let Some((column, _)) = catalog.pick(&player.temporary) {
                outcome = outcome.with_effect(Effect::PositionDelta {
                    column: *column,
                    delta: -1,
                });
            }
            outcome
        }
        20 => ContentOutcome::message("Time to gamble. Your next roll uses four dice in two pairs")
            .with_effect(Effect::NextDiceCount {
                split: GroupSplit::new(2, 2)?,
            }),
        _ => return Err(CatalogError::UnknownContent(ContentRef::Trap(trap))),
    };
    Ok(outcome)
}

pub(super) fn resolve(
    _catalog: &StandardCatalog,
    ctx: &ChoiceContext,
    trap: TrapId,
) -> Result<ContentOutcome, CatalogError> {
    match trap.get() {
        15 if ctx.answer.label == HELP_OUT => Ok(ContentOutcome::message(
            "The witch thanks you with a bag of candy. +20 points, and the round is over",
        )
        .with_effects([
            Effect::ScoreDelta { amount: 20 },
            Effect::ForceEndRound {
                until_check_in: false,
            },
        ])),
        15 => Ok(ContentOutcome::message("You walk on")),
        _ => Err(CatalogError::UnknownContent(ContentRef::Trap(trap))),
    }
}
