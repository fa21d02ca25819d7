//! Board items: pickup on a cell, shop stock and what each item does.

use cantstop_domain::{
    ChoiceSpec, ColumnId, ContentRef, CounterKind, Effect, EffectTarget, Faction, ItemId,
    PendingChoice, ResolvedAnswer, ShopListing, TrapImmunity,
};

use super::{options, StandardCatalog};
use crate::infrastructure::ports::{
    CatalogError, ChoiceContext, ContentOutcome, ItemUseContext, PlayerSnapshot, TriggerContext,
};

const LOSERS_DUST: u16 = 1;
const FLY_AWAY: u16 = 2;
const SWEET_TALK: u16 = 3;
const HAMMER_PARTY: u16 = 4;
const HEAVY_GREATSWORD: u16 = 5;
const WITCH_TRICK: u16 = 6;
const GROWTH_MUSHROOM: u16 = 7;
const SHRINK_POTION: u16 = 8;
const SUPER_CANNON: u16 = 9;
const GOLDEN_STAR: u16 = 10;
const AE_MIRROR: u16 = 11;
const GIRL_DOLL: u16 = 12;
const BONFIRE: u16 = 13;
const LIMINAL_SPACE: u16 = 14;
const PEAR: u16 = 15;
const THE_ROOM: u16 = 16;
const MY_MAP: u16 = 17;
const RAINBOW_GEMS: u16 = 18;
const SHOPPING_CARD: u16 = 19;
const BIANGO_MEOW: u16 = 20;
const BLACK_MEOW: u16 = 21;
const FIRE_STATUE: u16 = 22;
const ICE_STATUE: u16 = 23;
const SOUL_LEAF: u16 = 24;
const UGLY_CAT_PLUSH: u16 = 999;

pub(super) const REGRET_TICKET: u16 = 9001;
pub(super) const GOLDEN_DIE: u16 = 9101;
pub(super) const SILVER_DIE: u16 = 9102;
pub(super) const FREE_ROLL_TICKET: u16 = 9103;
pub(super) const WINDFALL: u16 = 9104;
pub(super) const NITRO_BOOSTER: u16 = 9105;
pub(super) const SMALL_TROPHY: u16 = 9106;
pub(super) const FLASHLIGHT: u16 = 9107;
pub(super) const PINK_BUTTERFLY: u16 = 9108;
pub(super) const DEADLY_BOOK: u16 = 9109;
pub(super) const THOUSAND_TALES: u16 = 9110;
pub(super) const RED_ROSE: u16 = 9111;
pub(super) const BLUE_ROSE: u16 = 9112;
pub(super) const YELLOW_ROSE: u16 = 9113;
pub(super) const CODING_PRIMER: u16 = 9114;
pub(super) const BUG_DIARY: u16 = 9115;
pub(super) const UNDERWORLD_LYRE: u16 = 9116;
pub(super) const GREEN_GOURD: u16 = 9117;
pub(super) const FRESH_SALMON: u16 = 9999;

/// Every named item, shop stock and keepsakes alike.
pub(super) const ALL_NAMES: &[(u16, &str)] = &[
    (LOSERS_DUST, "Loser's Dust"),
    (FLY_AWAY, "Fly Away"),
    (SWEET_TALK, "Sweet Talk"),
    (HAMMER_PARTY, "Hammer Party"),
    (HEAVY_GREATSWORD, "Heavy Greatsword"),
    (WITCH_TRICK, "Witch's Trick"),
    (GROWTH_MUSHROOM, "Growth Mushroom"),
    (SHRINK_POTION, "Shrink Potion"),
    (SUPER_CANNON, "Super Cannon"),
    (GOLDEN_STAR, "Golden Star"),
    (AE_MIRROR, "Ae Mirror"),
    (GIRL_DOLL, "Little Girl Doll"),
    (BONFIRE, "Bonfire"),
    (LIMINAL_SPACE, "Liminal Space"),
    (PEAR, "Pear"),
    (THE_ROOM, "The Room"),
    (MY_MAP, "My Map"),
    (RAINBOW_GEMS, "Rainbow Gems"),
    (SHOPPING_CARD, "Shopping Card"),
    (BIANGO_MEOW, "Biango Meow"),
    (BLACK_MEOW, "Black Meow"),
    (FIRE_STATUE, "Fire Statue"),
    (ICE_STATUE, "Ice Statue"),
    (SOUL_LEAF, "Soul Leaf"),
    (UGLY_CAT_PLUSH, "Ugly Cat Plush"),
    (REGRET_TICKET, "Regret Ticket"),
    (GOLDEN_DIE, "Golden Die"),
    (SILVER_DIE, "Silver Die"),
    (FREE_ROLL_TICKET, "Free Roll Ticket"),
    (WINDFALL, "Windfall"),
    (NITRO_BOOSTER, "Nitro Booster"),
    (SMALL_TROPHY, "Small Trophy"),
    (FLASHLIGHT, "Flashlight"),
    (PINK_BUTTERFLY, "Pink Butterfly"),
    (DEADLY_BOOK, "Read It and Die"),
    (THOUSAND_TALES, "A Thousand and One Tales"),
    (RED_ROSE, "Red Rose"),
    (BLUE_ROSE, "Blue Rose"),
    (YELLOW_ROSE, "Yellow Rose"),
    (CODING_PRIMER, "Coding from Zero to Grave"),
    (BUG_DIARY, "Five Years of Code, Three of Bugs"),
    (UNDERWORLD_LYRE, "Underworld Lyre"),
    (GREEN_GOURD, "Black-Gold Green Gourd"),
    (FRESH_SALMON, "Fresh Salmon"),
];

pub(super) fn name(item: ItemId) -> String {
    ALL_NAMES
        .iter()
        .find(|(id, _)| *id == item.get())
        .map_or_else(|| item.to_string(), |(_, name)| (*name).to_string())
}

/// Shop stock at the start of a game. Board items unlock when first found;
/// the plush is on sale from the start.
pub fn standard_listings() -> Vec<ShopListing> {
    let stock: [(u16, u32, Option<Faction>, Option<u32>); 25] = [
        (LOSERS_DUST, 100, None, None),
        (FLY_AWAY, 200, None, None),
        (SWEET_TALK, 150, None, None),
        (HAMMER_PARTY, 0, None, None),
        (HEAVY_GREATSWORD, 50, Some(Faction::Aeonreth), None),
        (WITCH_TRICK, 50, Some(Faction::Adopter), None),
        (GROWTH_MUSHROOM, 50, Some(Faction::Aeonreth), None),
        (SHRINK_POTION, 50, Some(Faction::Adopter), None),
        (SUPER_CANNON, 200, None, None),
        (GOLDEN_STAR, 100, None, None),
        (AE_MIRROR, 50, Some(Faction::Adopter), None),
        (GIRL_DOLL, 100, Some(Faction::Aeonreth), None),
        (BONFIRE, 0, None, None),
        (LIMINAL_SPACE, 100, None, None),
        (PEAR, 50, None, None),
        (THE_ROOM, 0, None, None),
        (MY_MAP, 500, None, None),
        (RAINBOW_GEMS, 200, None, None),
        (SHOPPING_CARD, 0, None, None),
        (BIANGO_MEOW, 100, None, Some(5)),
        (BLACK_MEOW, 100, None, Some(2)),
        (FIRE_STATUE, 0, Some(Faction::Aeonreth), None),
        (ICE_STATUE, 0, Some(Faction::Adopter), None),
        (SOUL_LEAF, 100, None, None),
        (UGLY_CAT_PLUSH, 150, None, None),
    ];

    stock
        .into_iter()
        .map(|(id, price, faction, global_limit)| {
            let item = ItemId::new(id);
            let mut listing = ShopListing::new(item, name(item), price);
            if let Some(faction) = faction {
                listing = listing.with_faction(faction);
            }
            if let Some(limit) = global_limit {
                listing = listing.with_global_limit(limit);
            }
            if id == UGLY_CAT_PLUSH {
                listing = listing.unlocked();
            }
            listing
        })
        .collect()
}

// =============================================================================
// Pickup
// =============================================================================

pub(super) fn on_cell(
    catalog: &StandardCatalog,
    ctx: &TriggerContext,
    item: ItemId,
) -> Result<ContentOutcome, CatalogError> {
    let name = name(item);
    if !ctx.is_first {
        let reward = catalog.repeat_item_reward;
        return Ok(ContentOutcome::message(format!(
            "Someone already picked up {name}. +{reward} points"
        ))
        .with_effect(Effect::ScoreDelta {
            amount: i64::from(reward),
        }));
    }

    if let Some(listing) = catalog.listing(item) {
        if !listing.allows(ctx.player.faction) {
            let required = listing.faction.map_or("another faction", |f| f.as_str());
            return Ok(ContentOutcome::message(format!(
                "You found {name}, but only {required} can carry it"
            )));
        }
    }

    Ok(
        ContentOutcome::message(format!("You found {name}! It is now on sale in the shop"))
            .with_effects([
                Effect::InventoryDelta { item, quantity: 1 },
                Effect::UnlockShopItem { item },
                Effect::CountEvent {
                    counter: CounterKind::ItemsCollected,
                },
            ]),
    )
}

// =============================================================================
// Use
// =============================================================================

const MUSHROOM_PROMPT: &str = "A mushroom from a man in a red cap. Eat it?";
const POTION_PROMPT: &str = "A glass bottle labelled Drink Me. Drink it?";
const STAR_PROMPT: &str = "A golden star is shining. Interact with it?";
const DOLL_PROMPT: &str = "A doll shaped like a little girl. Where do you poke it?";
const ROOM_PROMPT: &str = "A sealed virtual room with one chance to search. Where do you look?";
const BADGE_PROMPT: &str = "A hidden drawer holds an association badge. Use it?";
const TOP_PROMPT: &str = "Which column do you climb to the top of?";

const ROOM_SPOTS: [&str; 12] = [
    "Desk - drawer",
    "Desk - ornament",
    "Desk - joint",
    "Projector - handle",
    "Projector - film",
    "Projector - rack",
    "Cabinet - divider",
    "Cabinet - door",
    "Cabinet - top",
    "Floor - tile",
    "Floor - corner",
    "Floor - rug",
];
const ROOM_PRIZE: &str = "Desk - joint";

pub(super) fn use_item(
    catalog: &StandardCatalog,
    ctx: &ItemUseContext,
) -> Result<ContentOutcome, CatalogError> {
    let item = ctx.item;
    let name = name(item);
    if item.is_hidden() {
        return Err(CatalogError::not_usable(name, "keepsakes cannot be used"));
    }
    let player = &ctx.player;
    let args = &ctx.args;

    match item.get() {
        LOSERS_DUST => {
            if player.last_roll.is_none() {
                return Err(CatalogError::not_usable(name, "there is no roll to throw away"));
            }
            Ok(ContentOutcome::message("The roll turns to dust. Roll again for free")
                .with_effects([Effect::ClearLastRoll, Effect::FreeRolls { count: 1 }]))
        }
        FLY_AWAY => {
            let mut farthest: Option<(ColumnId, u8)> = None;
            for (column, position) in &player.temporary {
                let distance = catalog.height(*column)?.saturating_sub(*position);
                if farthest.map_or(true, |(_, best)| distance > best) {
                    farthest = Some((*column, distance));
                }
            }
            let (column, _) = farthest
                .ok_or_else(|| CatalogError::not_usable(&name, "you have no marker in play"))?;
            Ok(ContentOutcome::message(format!(
                "Fly, little one! Your marker in column {column} jumps two cells"
            ))
            .with_effect(Effect::PositionDelta { column, delta: 2 }))
        }
        SWEET_TALK => {
            let target = args
                .target
                .clone()
                .ok_or_else(|| CatalogError::missing(&name, "a target player"))?;
            if target == player.id {
                return Err(CatalogError::InvalidArgument(
                    "you cannot sweet talk yourself".to_string(),
                ));
            }
            Ok(ContentOutcome::message(format!(
                "Sweet words reach {target}. They cannot use this round's columns next round"
            ))
            .with_effect(Effect::ForPlayer {
                target: EffectTarget::Player { id: target },
                effects: vec![Effect::SweetTalkBlock {
                    source: player.id.clone(),
                }],
            }))
        }
        HAMMER_PARTY => {
            let column = args
                .column
                .ok_or_else(|| CatalogError::missing(&name, "a column"))?;
            let position = args
                .position
                .ok_or_else(|| CatalogError::missing(&name, "a position"))?;
            if position == 0 || position > catalog.height(column)? {
                return Err(CatalogError::InvalidArgument(format!(
                    "column {column} has no cell {position}"
                )));
            }
            Ok(ContentOutcome::message(format!(
                "A giant pendulum swings down on {column}-{position}"
            ))
            .with_effect(Effect::ForPlayer {
                target: EffectTarget::MarkersAt { column, position },
                effects: vec![Effect::PositionDelta { column, delta: -1 }],
            }))
        }
        HEAVY_GREATSWORD => Ok(ContentOutcome::message(
            "The greatsword hums. Ones on your next roll are rolled again",
        )
        .with_effect(Effect::AllowReroll { face: 1 })),
        WITCH_TRICK => Ok(ContentOutcome::message(
            "A little spell. Sixes on your next roll are rolled again",
        )
        .with_effect(Effect::AllowReroll { face: 6 })),
        GROWTH_MUSHROOM => ask(
            ctx,
            PendingChoice::new(
                ContentRef::Item(item),
                MUSHROOM_PROMPT,
                options(&["Eat it", "Leave it"]),
            ),
        ),
        SHRINK_POTION => ask(
            ctx,
            PendingChoice::new(
                ContentRef::Item(item),
                POTION_PROMPT,
                options(&["Drink it", "Leave it"]),
            ),
        ),
        SUPER_CANNON => {
            if args.faces.is_empty() {
                return Err(CatalogError::missing(&name, "the faces to fire"));
            }
            Ok(ContentOutcome::message(format!(
                "Super Cannon loaded: your next roll is {}",
                join_faces(&args.faces)
            ))
            .with_effect(Effect::FixNextRoll {
                faces: args.faces.clone(),
            }))
        }
        GOLDEN_STAR => ask(
            ctx,
            PendingChoice::new(
                ContentRef::Item(item),
                STAR_PROMPT,
                options(&["Interact", "Walk away"]),
            ),
        ),
        AE_MIRROR => {
            if args.faces.is_empty() {
                return Err(CatalogError::missing(&name, "the faces to fix"));
            }
            if args.faces.len() > 6 {
                return Err(CatalogError::InvalidArgument(
                    "the mirror fixes at most six faces".to_string(),
                ));
            }
            let cost = 10 * i64::try_from(args.faces.len()).unwrap_or(i64::MAX);
            if player.current_score < cost {
                return Err(CatalogError::not_usable(
                    name,
                    format!("it costs {cost} points"),
                ));
            }
            Ok(ContentOutcome::message(format!(
                "The mirror shows {} for {cost} points",
                join_faces(&args.faces)
            ))
            .with_effects([
                Effect::ScoreDelta { amount: -cost },
                Effect::PartialFixRoll {
                    faces: args.faces.clone(),
                },
            ]))
        }
        GIRL_DOLL => ask(
            ctx,
            PendingChoice::new(
                ContentRef::Item(item),
                DOLL_PROMPT,
                options(&["Poke her cheek", "Poke her hand", "Tug her leg"]),
            ),
        ),
        BONFIRE => {
            let last = player
                .last_used_item
                .ok_or_else(|| CatalogError::not_usable(&name, "no item has been used yet"))?;
            if last.get() == BONFIRE {
                return Err(CatalogError::not_usable(name, "a bonfire cannot rekindle itself"));
            }
            Ok(ContentOutcome::message(format!(
                "By the warm fire, {} comes back to you",
                self::name(last)
            ))
            .with_effect(Effect::InventoryDelta {
                item: last,
                quantity: 1,
            }))
        }
        LIMINAL_SPACE => Ok(ContentOutcome::message(
            "An empty, quiet space. If this round fails you may play it again",
        )
        .with_effect(Effect::RetryOnFail)),
        PEAR => pear(catalog, player, &name, &args.faces),
        THE_ROOM => ask(
            ctx,
            PendingChoice::new(ContentRef::Item(item), ROOM_PROMPT, options(&ROOM_SPOTS)),
        ),
        MY_MAP => Ok(ContentOutcome::message(
            "The map shows the next trap in time. It will not catch you",
        )
        .with_effect(Effect::GrantTrapImmunity {
            immunity: TrapImmunity::Free,
        })),
        RAINBOW_GEMS => {
            let total = catalog.roll_sum(6, 6);
            if total > 9 {
                Ok(ContentOutcome::message(format!(
                    "The gems flare ({total} > 9). Half the other players lose 10 points"
                ))
                .with_effect(Effect::ForPlayer {
                    target: EffectTarget::RandomHalf,
                    effects: vec![Effect::ScoreDelta { amount: -10 }],
                }))
            } else {
                Ok(ContentOutcome::message(format!(
                    "The gems fizzle ({total} <= 9). You lose 50 points"
                ))
                .with_effect(Effect::ScoreDelta { amount: -50 }))
            }
        }
        SHOPPING_CARD => Ok(ContentOutcome::message("Your next purchase is half price")
            .with_effect(Effect::HalfPriceNextPurchase)),
        BIANGO_MEOW => {
            let rewards = [
                Effect::ScoreDelta { amount: 30 },
                Effect::InventoryDelta {
                    item: ItemId::new(THE_ROOM),
                    quantity: 1,
                },
                Effect::InventoryDelta {
                    item: ItemId::new(LIMINAL_SPACE),
                    quantity: 1,
                },
                Effect::InventoryDelta {
                    item: ItemId::new(GOLDEN_STAR),
                    quantity: 1,
                },
            ];
            let reward = catalog
                .pick(&rewards)
                .cloned()
                .unwrap_or(Effect::ScoreDelta { amount: 30 });
            let prize = match &reward {
                Effect::InventoryDelta { item, .. } => self::name(*item),
                _ => "30 points".to_string(),
            };
            Ok(ContentOutcome::message(format!("Biango Meow! You get {prize}")).with_effect(reward))
        }
        BLACK_MEOW => Ok(ContentOutcome::message(
            "A black cat settles in. Every roll costs 2 points less from now on",
        )
        .with_effect(Effect::CostReduction { amount: 2 })),
        FIRE_STATUE => {
            if catalog.roll(2) == 1 {
                Ok(ContentOutcome::message("The statue leaves a red gem behind. +100 points")
                    .with_effect(Effect::ScoreDelta { amount: 100 }))
            } else {
                Ok(ContentOutcome::message("You step into a blue pool. -10 points")
                    .with_effect(Effect::ScoreDelta { amount: -10 }))
            }
        }
        ICE_STATUE => {
            let column = args
                .column
                .ok_or_else(|| CatalogError::missing(&name, "a column"))?;
            Ok(ContentOutcome::message(format!(
                "Column {column} freezes over for everyone else"
            ))
            .with_effect(Effect::ForPlayer {
                target: EffectTarget::Opponents,
                effects: vec![Effect::ColumnFreeze { column }],
            }))
        }
        SOUL_LEAF => {
            let column = args
                .column
                .ok_or_else(|| CatalogError::missing(&name, "a column"))?;
            if player.topped.contains(&column) {
                return Err(CatalogError::InvalidArgument(format!(
                    "column {column} is already topped"
                )));
            }
            Ok(ContentOutcome::message(format!(
                "A last gift: your checkpoint in column {column} moves up one cell"
            ))
            .with_effect(Effect::PermanentDelta { column, delta: 1 }))
        }
        UGLY_CAT_PLUSH => {
            let outcome = if catalog.roll(10) <= 7 {
                ContentOutcome::message("Squeak!")
            } else {
                let points = catalog.roll_sum(3, 6);
                ContentOutcome::message(format!("Something falls out of the plush. +{points} points"))
                    .with_effect(Effect::ScoreDelta {
                        amount: i64::from(points),
                    })
            };
            Ok(outcome.keeping_item())
        }
        _ => Err(CatalogError::UnknownItem(name)),
    }
}

/// Follow-up for a choice raised by an item.
pub(super) fn resolve(
    _catalog: &StandardCatalog,
    ctx: &ChoiceContext,
    item: ItemId,
) -> Result<ContentOutcome, CatalogError> {
    answer(&ctx.player, item, &ctx.choice, &ctx.answer)
}

/// Raise `choice`, or settle it right away when the command already
/// carried an answer.
fn ask(
    ctx: &ItemUseContext,
    choice: PendingChoice,
) -> Result<ContentOutcome, CatalogError> {
    match &ctx.args.choice {
        Some(raw) => {
            let resolved = choice.accept(raw)?;
            answer(&ctx.player, ctx.item, &choice, &resolved)
        }
        None => Ok(ContentOutcome::message(format!("{}:", name(ctx.item))).with_choice(choice)),
    }
}

fn answer(
    player: &PlayerSnapshot,
    item: ItemId,
    choice: &PendingChoice,
    resolved: &ResolvedAnswer,
) -> Result<ContentOutcome, CatalogError> {
    let label = resolved.label.as_str();
    let outcome = match (item.get(), label) {
        (GROWTH_MUSHROOM, "Eat it") => {
            ContentOutcome::message("You grow and grow! Every die of your next roll gets +1")
                .with_effect(Effect::AllDiceModifier { delta: 1 })
        }
        (SHRINK_POTION, "Drink it") => {
            ContentOutcome::message("You shrink and shrink! Every die of your next roll gets -1")
                .with_effect(Effect::AllDiceModifier { delta: -1 })
        }
        (GROWTH_MUSHROOM, _) => ContentOutcome::message("It looks poisonous. Better not"),
        (SHRINK_POTION, _) => ContentOutcome::message("Never drink what strangers hand you"),
        (GOLDEN_STAR, "Interact") => ContentOutcome::message(
            "It fills you with determination. Your markers become checkpoints and the round goes on",
        )
        .with_effect(Effect::CommitTemporary),
        (GOLDEN_STAR, _) => ContentOutcome::message("You walk away"),
        (GIRL_DOLL, "Poke her cheek") => ContentOutcome::message(
            "She smiles at you. The next trap can be shrugged off for 5 points",
        )
        .with_effect(Effect::GrantTrapImmunity {
            immunity: TrapImmunity::Cost(5),
        }),
        (GIRL_DOLL, "Poke her hand") => ContentOutcome::message(
            "She holds your hand. The next trap can be escaped with a drawing",
        )
        .with_effect(Effect::GrantTrapImmunity {
            immunity: TrapImmunity::Drawing,
        }),
        (GIRL_DOLL, _) => ContentOutcome::message("She kicks you. That hurt a little"),
        (THE_ROOM, _) => return the_room(player, choice, label),
        _ => return Err(CatalogError::UnknownItem(name(item))),
    };
    Ok(outcome)
}

fn the_room(
    player: &PlayerSnapshot,
    choice: &PendingChoice,
    label: &str,
) -> Result<ContentOutcome, CatalogError> {
    let room = ContentRef::Item(ItemId::new(THE_ROOM));
    match choice.prompt() {
        ROOM_PROMPT if label == ROOM_PRIZE => Ok(ContentOutcome::message(
            "You find a hidden little drawer with an association badge inside",
        )
        .with_choice(PendingChoice::new(
            room,
            BADGE_PROMPT,
            options(&["Climb to the top", "Give up"]),
        ))),
        ROOM_PROMPT => Ok(ContentOutcome::message("Nothing there...")),
        BADGE_PROMPT if label == "Climb to the top" => Ok(ContentOutcome::message(
            "The badge glows. Name a column",
        )
        .with_choice(PendingChoice::new(room, TOP_PROMPT, ChoiceSpec::Freeform))),
        BADGE_PROMPT => Ok(ContentOutcome::message("You put the badge back")),
        TOP_PROMPT => {
            let column = label
                .trim()
                .parse::<u8>()
                .map_err(|_| CatalogError::InvalidArgument(format!("'{label}' is not a column")))
                .and_then(|raw| ColumnId::new(raw).map_err(CatalogError::from))?;
            if player.topped.contains(&column) {
                return Err(CatalogError::InvalidArgument(format!(
                    "column {column} is already topped"
                )));
            }
            Ok(ContentOutcome::message(format!("You stand at the top of column {column}"))
                .with_effect(Effect::DirectTop { column }))
        }
        _ => Err(CatalogError::UnknownItem(name(ItemId::new(THE_ROOM)))),
    }
}

/// Reroll three chosen faces of a six-dice roll.
fn pear(
    catalog: &StandardCatalog,
    player: &PlayerSnapshot,
    name: &str,
    chosen: &[u8],
) -> Result<ContentOutcome, CatalogError> {
    if chosen.len() != 3 {
        return Err(CatalogError::missing(name, "exactly three faces to reroll"));
    }
    let roll = player
        .last_roll
        .as_ref()
        .ok_or_else(|| CatalogError::not_usable(name, "roll first"))?;
    if roll.faces().len() != 6 {
        return Err(CatalogError::not_usable(name, "it only works on six dice"));
    }

    let mut kept = roll.faces().to_vec();
    for face in chosen {
        let index = kept.iter().position(|f| f == face).ok_or_else(|| {
            CatalogError::InvalidArgument(format!("the roll has no {face} to reroll"))
        })?;
        kept.remove(index);
    }
    let fresh: Vec<u8> = (0..3).map(|_| catalog.roll(6)).collect();
    let mut faces = kept.clone();
    faces.extend(&fresh);

    Ok(ContentOutcome::message(format!(
        "Bribe accepted! Kept {}, rerolled {}, new roll {}",
        join_faces(&kept),
        join_faces(&fresh),
        join_faces(&faces)
    ))
    .with_effect(Effect::ReplaceLastRoll { faces }))
}

fn join_faces(faces: &[u8]) -> String {
    faces
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
