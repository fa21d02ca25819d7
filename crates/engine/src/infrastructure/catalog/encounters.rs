//! Encounters: story cells that fire on every visit and usually ask the
//! player to pick a reaction.

use cantstop_domain::{
    AchievementId, ColumnId, ContentRef, Effect, EffectTarget, EncounterId, Faction, GroupSplit,
    ItemId, PendingChoice, TrapImmunity,
};

use super::items::{
    BLUE_ROSE, BUG_DIARY, CODING_PRIMER, DEADLY_BOOK, FLASHLIGHT, FREE_ROLL_TICKET, GOLDEN_DIE,
    GREEN_GOURD, NITRO_BOOSTER, PINK_BUTTERFLY, RED_ROSE, REGRET_TICKET, SILVER_DIE, SMALL_TROPHY,
    THOUSAND_TALES, UNDERWORLD_LYRE, WINDFALL, YELLOW_ROSE,
};
use super::{options, StandardCatalog};
use crate::infrastructure::ports::{
    CatalogError, ChoiceContext, ContentOutcome, PlayerSnapshot, TriggerContext,
};

const NAMES: [&str; 60] = [
    "Meow",
    "Dream",
    "The Land God",
    "Fortune God's Gift",
    "Little Flowers",
    "A Gentleman",
    "The More the Merrier",
    "Some Hands",
    "Temptation of the Roach",
    "Spot Check",
    "Money Rain",
    "Leap of Faith",
    "Cappuccino",
    "What Is the Price",
    "Tofu Pudding",
    "Magic Pills",
    "Build a Bridge",
    "Blocks",
    "Self-Service Q&A",
    "Congratulations",
    "Grape Rose Aster",
    "Talent Market",
    "Bika",
    "Protect Your Brain",
    "Real Estate Agent",
    "The Mouth",
    "A Strange Dish",
    "Fishing Contest",
    "Cold Joke",
    "Dance",
    "It Takes Two Columns",
    "Square Dance",
    "Song of Dice",
    "Alarm",
    "The Mask",
    "Cleanup Master",
    "Cold and Hungry",
    "The Court",
    "Who Goes",
    "Golden Chips",
    "Me?",
    "New Clothes",
    "Rhythm Master",
    "Contract Kitchen",
    "AeAe Girl",
    "Wait, For Real?",
    "The Witch's Library",
    "Storybook",
    "One Thousand and One",
    "A Figure",
    "This Is Wild",
    "Round and Round",
    "Corridor",
    "No Programmers Here",
    "Art Exhibition",
    "A True Story",
    "First Meeting",
    "Road to the Underworld",
    "The Name",
    "In the Fog",
];

// Option labels shared between the prompt and the follow-up.
const SCARED: &str = "You scared me!";
const GO_AROUND: &str = "Go around (costs 5)";
const BOTH_MINE: &str = "Both are mine";
const NOT_MINE: &str = "I dropped nothing";
const THANKS_FORTUNE: &str = "Thank you, Fortune God";
const GET_CLOSER: &str = "Get closer";
const WATER: &str = "Water them (costs 5)";
const BET: &str = "Bet!";
const NO_BET: &str = "No bet!";
const MERCY: &str = "Have mercy, boss";
const THANKS: &str = "Thanks";
const MORE_DICE: &str = "I want even more dice!";
const INSPECT_DIE: &str = "Look closely at the die";
const YES_PLEASE: &str = "Yes please";
const SCREAM: &str = "Aaaaah";
const SPRAY: &str = "Bug spray (costs 5)";
const BEFRIEND: &str = "Befriend it (adopters only)";
const RIDE: &str = "Ride it (aeonreth only)";
const OAS: &str = "OAS";
const JUMP: &str = "3, 2, 1, jump!";
const DRINK: &str = "Drink";
const DRINK_IT: &str = "Drink it!";
const THE_PRICE: &str = "So, what is the price?";
const SHORT_ONE: &str = "Pick the short one";
const WHO: &str = "Who?";
const FIND_VOICE: &str = "Find the voice";
const SAY_HELLO: &str = "Say hello";
const TASTE: &str = "Weird, have a taste";
const GULP: &str = "Weird! Down it in one!";
const KEEP_FISHING: &str = "Fish until the very end";
const CASH_IN: &str = "Hand in the catch and leave";
const PAST: &str = "The past";
const FUTURE: &str = "The future";
const RED_PILL: &str = "Red pill";
const BLUE_PILL: &str = "Blue pill";
const BUILD: &str = "Build the bridge!";
const RUN_OFF: &str = "Take the money and run!";
const BLACK_BLOCK: &str = "The black block";
const WHITE_BLOCK: &str = "The white block";
const ASK_NICELY: &str = "Ask something easy";
const GRAPE: &str = "Plant the grape";
const ROSE: &str = "Plant the rose";
const ASTER: &str = "Plant the aster";
const PLANT_NOTHING: &str = "Plant nothing";
const PEEK: &str = "Let me see!";
const LOOK_AWAY: &str = "Don't look";
const BAG: &str = "Take the little bag";
const SANITIZER: &str = "Take the hand sanitizer";
const WHOSE_WIFE: &str = "What wife?";
const JOKE_FAILED: &str = "I can't do it";
const TOGETHER: &str = "Play with my partner";
const ALONE: &str = "I have no partner";
const GO_LOOK: &str = "Go and look";
const WAIT: &str = "Wait";
const POTATO_CHIP: &str = "Grab the potato chip";
const INK_CHIP: &str = "Grab the inky chip";
const HOST_HELP: &str = "Host, help!";
const WEAR_MASK: &str = "Put on the mask";
const RESIST: &str = "Resist";
const CLEAN_UP: &str = "Clean up properly";
const MAKEOVER: &str = "\"Redecorate\"";
const HUNGER: &str = "Hunger";
const COLD: &str = "Cold";
const FEAR: &str = "Fear";
const FINE: &str = "I'm fine";
const SHINY: &str = "Present the shiny thing!";
const WITNESS: &str = "Question the witness!";
const ANY_EVIDENCE: &str = "Show anything as evidence!";
const SHAKE: &str = "What harm can a handshake do?";
const SORRY: &str = "Say sorry anyway";
const ARGUE: &str = "Argue back!";
const GIBBERISH: &str = "Talk gibberish";
const PLAY_SONG: &str = "Play the song!";
const SKIP_SONG: &str = "No idea, ignore it";
const COOK_TOGETHER: &str = "Let's cook";
const REFUSE: &str = "Not cooking";
const TRUST_ME: &str = "\"Trust me, vote out my accuser\"";
const GIVE_UP: &str = "Can't play, give up";
const REASON: &str = "Go over the logic again";
const RETURN_BOOK: &str = "Put the book back";
const KEEP_BOOK: &str = "Keep it for myself";
const READ_BOOK: &str = "Let me read it!";
const SIT: &str = "Sit down";
const IDEA: &str = "I have an idea!";
const SHOOT: &str = "Shooting contest";
const DRINKING: &str = "Drinking contest (not for adopters)";
const RIDING: &str = "Riding contest";
const PUNCH: &str = "Punch him!";
const SNEAK: &str = "Sneak along the wall (costs 5)";
const RUSH: &str = "Hurry through";
const SPIN_LIGHT: &str = "Spin the flashlight";
const NO_TRAP_CARD: &str = "Report: no trap card";
const RED_ROSE_OPTION: &str = "Red rose (adopters only)";
const BLUE_ROSE_OPTION: &str = "Blue rose (aeonreth only)";
const YELLOW_ROSE_OPTION: &str = "Yellow rose";
const ENGINEER: &str = "Ask the engineer";
const SERVER: &str = "Check the server";
const GIFT_SISYPHUS: &str = "Give it to Sisyphus";
const GIFT_BOULDER: &str = "Give it to the boulder?";
const DRINK_MYSELF: &str = "Drink it myself!";
const LISTEN: &str = "I'll listen, bye";
const NO_DARE: &str = "I wouldn't dare";
const DARE_BACK: &str = "Would you answer if I called you?";
const ANSWER: &str = "Aye...";
const VOL_DOWN: &str = "As you say, VOL--";
const LOST: &str = "I don't get it";
const VOL_UP: &str = "I do the opposite, VOL++";

const ROACH_FACES: [u8; 6] = [3, 3, 3, 4, 4, 4];
const MOUTH_FOLLOW_UP: &str = "A mouth grows out of the cell at your feet.";
const FACE_PROMPT: &str = "Which face should your next roll start with?";
const FACES: [&str; 6] = ["1", "2", "3", "4", "5", "6"];
const SQUARE_DANCE_FACES: [u8; 6] = [2, 3, 3, 3, 3, 3];

pub(super) fn name(encounter: EncounterId) -> String {
    usize::from(encounter.get())
        .checked_sub(1)
        .and_then(|index| NAMES.get(index))
        .map_or_else(|| encounter.to_string(), |name| (*name).to_string())
}

/// Opening scene: a prompt with options, or a plain outcome.
pub(super) fn trigger(
    catalog: &StandardCatalog,
    ctx: &TriggerContext,
    encounter: EncounterId,
) -> Result<ContentOutcome, CatalogError> {
    let title = name(encounter);
    let ask = |prompt: &str, labels: &[&str]| {
        ContentOutcome::message(format!("Encounter: {title}")).with_choice(
            PendingChoice::new(ContentRef::Encounter(encounter), prompt, options(labels))
                .with_cell(ctx.at),
        )
    };

    let outcome = match encounter.get() {
        1 => ask(
            "A cat bursts out of the bushes and eats one of your dice.",
            &[SCARED, "Pet the cat", "Watch it walk away"],
        ),
        2 => ask(
            "Colourful mist drifts ahead, pink butterflies dancing through it.",
            &[GO_AROUND, "Walk straight in"],
        ),
        3 => ask(
            "An old man pops out of the ground. \"Did you drop this golden die or this silver one?\"",
            &[BOTH_MINE, "The golden one", "The silver one", "A plain d6", NOT_MINE],
        ),
        4 => {
            return Ok(ContentOutcome::message(format!(
                "Encounter: {title}\nYou made it this far, here is a Regret Ticket for your trouble"
            ))
            .with_effect(Effect::InventoryDelta {
                item: ItemId::new(REGRET_TICKET),
                quantity: 1,
            })
            .with_choice(
                PendingChoice::new(
                    ContentRef::Encounter(encounter),
                    "\"Now, let us say: thank you, Fortune God.\"",
                    options(&[THANKS_FORTUNE, "Walk on"]),
                )
                .with_cell(ctx.at),
            ))
        }
        5 => ask(
            "Little flowers sway in front of you. Sway, sway, sway...",
            &[GET_CLOSER, WATER, "Too dizzy, leave"],
        ),
        6 => ask(
            "A man in a black top hat appears. \"Care for a wager?\"",
            &[BET, NO_BET, MERCY],
        ),
        7 => ask(
            "The treasurer presses an extra die into your hand. \"Only six? Take more!\"",
            &[THANKS, MORE_DICE, INSPECT_DIE],
        ),
        8 => ask(
            "A hand with an eye grows from the ground. \"Want me to peek at your next roll?\"",
            &[YES_PLEASE, "Better not"],
        ),
        9 => {
            let mut labels = vec![SCREAM, SPRAY];
            match ctx.player.faction {
                Some(Faction::Adopter) => labels.push(BEFRIEND),
                Some(Faction::Aeonreth) => labels.push(RIDE),
                None => {}
            }
            ask(
                "Two long feelers poke over your head. Those are not pigtails...",
                &labels,
            )
        }
        10 => ask("Spot check! What is the word in the red box?", &[OAS, "Something else"]),
        11 => ask(
            "Coins rain from the sky while the treasurer waves in the distance.",
            &["Grab the money!", "Forget the money, go to her!"],
        ),
        12 => ask(
            "The road ends at a bottomless canyon.",
            &[JUMP, "Turn back..."],
        ),
        13 => ask(
            "\"R-r-robbery! You must be thirsty. One cappuccino for the player!\"",
            &[DRINK, "Don't drink"],
        ),
        14 => ask(
            "A hooded elder offers you a cup of green liquid. \"Drink... it is your fate...\"",
            &[DRINK_IT, THE_PRICE],
        ),
        15 => ask(
            "A mirror shows you holding two oddly shaped tofu puddings. \"The past or the future?\"",
            &[PAST, FUTURE],
        ),
        16 => ask(
            "Under a green lamp someone holds out two pills. \"Red pill or blue pill?\"",
            &[RED_PILL, BLUE_PILL],
        ),
        17 => ask(
            "A driver at the river hands you a fortune in building money. He wants a bridge with a loop in it.",
            &[BUILD, RUN_OFF],
        ),
        18 => ask(
            "A dark figure stands on a lake holding up a black block and a white block.",
            &["I'm too old for blocks", BLACK_BLOCK, WHITE_BLOCK],
        ),
        19 => ask(
            "An android with a glowing chip greets you. \"How can I help? Ask me anything.\"",
            &[ASK_NICELY, "Tease it with a paradox"],
        ),
        20 => {
            return Ok(ContentOutcome::message(format!(
                "Encounter: {title}\nNothing much, just congratulations. Off you go"
            )))
        }
        21 => ask("Three seeds lie in front of you.", &[GRAPE, ROSE, ASTER, PLANT_NOTHING]),
        22 => ask(
            "You wake up in an asylum. Pick one of two people as your roommate.",
            &["Pick the tall one", SHORT_ONE],
        ),
        23 => {
            let labels: &[&str] = match ctx.player.faction {
                Some(Faction::Adopter) => &[PEEK, LOOK_AWAY],
                Some(Faction::Aeonreth) => &["Who cares what ae watch"],
                None => &["Keep going"],
            };
            ask("\"Bikabika!\" A blurry pink thing runs up squeaking.", labels)
        }
        24 => ask(
            "Zombies groan outside the old house. You can only grab one thing to protect yourself.",
            &[BAG, SANITIZER],
        ),
        25 => ask("\"Oh? Showing the missus round the flats again?\"", &[WHOSE_WIFE, "Ignore it"]),
        26 => ask("\"Hello.\" A voice comes from nowhere.", &[WHO, FIND_VOICE]),
        27 => ask(
            "A pot of strange ingredients bubbles away with a curious smell.",
            &[TASTE, "Weird, I'll pass", GULP],
        ),
        28 => ask(
            "A fishing contest blocks the way. Night falls and you are only a few fish short.",
            &[KEEP_FISHING, CASH_IN],
        ),
        29 => ask(
            "Stop. Yes, you. Tell a cold joke within three minutes.",
            &["Done telling it", JOKE_FAILED],
        ),
        31 => {
            let partner = if ctx.player.partner.is_some() { TOGETHER } else { ALONE };
            ask(
                "A stand rises with two controllers and a hologram of a two-player game.",
                &[partner],
            )
        }
        32 => ask("A crowd is square dancing in the distance.", &[GO_LOOK, "Not interested"]),
        33 => ask(
            "A new dice game just launched, but its servers are still down for maintenance.",
            &[WAIT, "Don't wait"],
        ),
        34 => ask(
            "Alarms blare. Your score and progress are about to crash!",
            &[POTATO_CHIP, INK_CHIP, HOST_HELP, "Find the cat instead"],
        ),
        35 => ask("An ancient, delicate mask lies before you, tempting you to try it on.", &[WEAR_MASK, RESIST]),
        36 => ask(
            "The cleaners hand you a job in a messy villa. The job is cleaning up... a crime scene?",
            &[CLEAN_UP, MAKEOVER, "Not my business!"],
        ),
        37 => ask(
            "You have played until nightfall. What creeps up on you is...",
            &[HUNGER, COLD, FEAR, FINE],
        ),
        38 => ask(
            "You find yourself in a courtroom. \"Counsel, what do you object to?\"",
            &[SHINY, WITNESS, ANY_EVIDENCE],
        ),
        39 => {
            let check = catalog.roll(20);
            let (text, effect) = match check {
                17..=u8::MAX => (
                    "your neighbour plays exactly the card you need. You win! +10 points",
                    Effect::ScoreDelta { amount: 10 },
                ),
                12..=16 => (
                    "a reverse card leaves you stuck at the table. -5 points",
                    Effect::ScoreDelta { amount: -5 },
                ),
                6..=11 => (
                    "a wild card in a colour you lack. You draw and stay. -5 points",
                    Effect::ScoreDelta { amount: -5 },
                ),
                _ => (
                    "a +4 lands in front of you and someone else goes out first. Skip one turn",
                    Effect::SkipRounds { count: 1 },
                ),
            };
            return Ok(ContentOutcome::message(format!(
                "Encounter: {title}\nYou are stuck in a card game holding your last card. d20 = {check}: {text}"
            ))
            .with_effect(effect));
        }
        40 => ask(
            "A round thing in a hat appears. \"Come, shake my hand and open the door!\"",
            &[SHAKE, "No, where did this chip come from"],
        ),
        41 => ask(
            "You have no idea why you are here, but someone is pointing at you and shouting.",
            &[SORRY, ARGUE, GIBBERISH],
        ),
        43 => ask(
            "Rhythmic music starts and moving buttons appear under your feet and hands.",
            &[PLAY_SONG, SKIP_SONG],
        ),
        44 => {
            let partner = if ctx.player.partner.is_some() { COOK_TOGETHER } else { ALONE };
            ask(
                "\"Me, cook?\" You have a few dishes to prepare with your partner.",
                &[partner, REFUSE],
            )
        }
        45 => ask(
            "A social deduction game at half time. You are one of the good guys, but someone framed you.",
            &[TRUST_ME, GIVE_UP, REASON],
        ),
        46 => {
            let check = catalog.roll(20);
            let intro = format!(
                "Encounter: {title}\nA sign says the admins are off playing a new game. A raffle box reads \"one per person\". d20 = {check}: "
            );
            return Ok(if check >= 18 {
                ContentOutcome::message(format!("{intro}you win a game pass! +20 points"))
                    .with_effect(Effect::ScoreDelta { amount: 20 })
            } else {
                ContentOutcome::message(format!("{intro}no luck, but you leave in one piece"))
            });
        }
        47 => ask(
            "Someone invisible hands you a book titled Read It and Die. There is a gap on the shelf.",
            &[RETURN_BOOK, KEEP_BOOK, READ_BOOK],
        ),
        49 => ask(
            "She invites you to stop and hear one last story.",
            &[SIT, "Sorry, no time...", IDEA],
        ),
        51 => {
            let mut labels = vec![SHOOT, RIDING, PUNCH];
            if ctx.player.faction != Some(Faction::Adopter) {
                labels.insert(1, DRINKING);
            }
            ask("A western saloon. \"Come on, kid, let's have a contest.\"", &labels)
        }
        53 => {
            let mut labels = vec![SNEAK, RUSH];
            if holds(&ctx.player, FLASHLIGHT) {
                labels.push(SPIN_LIGHT);
            }
            ask(
                "Damp floorboards. Dark figures stand with their backs to you, perfectly still...",
                &labels,
            )
        }
        54 => ask(
            "\"Th-th-this is a robbery!\" A burnt-out programmer blocks your path.",
            &["Slip away", "Call the host", NO_TRAP_CARD],
        ),
        55 => {
            let mut labels = vec![YELLOW_ROSE_OPTION];
            match ctx.player.faction {
                Some(Faction::Adopter) => labels.insert(0, RED_ROSE_OPTION),
                Some(Faction::Aeonreth) => labels.insert(0, BLUE_ROSE_OPTION),
                None => {}
            }
            ask("Paintings of the aeonreth under water. A vase holds a single rose.", &labels)
        }
        56 => ask("You are back before the event started. The system has crashed!", &[ENGINEER, SERVER]),
        57 => ask(
            "Sisyphus and his boulder. A bottle of golden wine has appeared in your pocket.",
            &[GIFT_SISYPHUS, GIFT_BOULDER, DRINK_MYSELF],
        ),
        58 => ask(
            "A towering stone palace. A voice tells you not to look back and keep walking.",
            &[LISTEN, "I want to see what it is!"],
        ),
        59 => ask(
            &format!(
                "\"{}, if I call your name, dare you answer?\"",
                ctx.player.nickname
            ),
            &[NO_DARE, DARE_BACK, ANSWER],
        ),
        60 => ask(
            "Thick fog. You bump into someone who signals you to keep your voice down.",
            &[VOL_DOWN, LOST, VOL_UP],
        ),
        30 | 42 | 48 | 50 | 52 => {
            return Ok(ContentOutcome::message(format!(
                "Encounter: {title}\n{}\nCheck in a drawing of this scene for a bonus",
                scene(encounter.get())
            )))
        }
        _ => return Err(CatalogError::UnknownContent(ContentRef::Encounter(encounter))),
    };
    Ok(outcome)
}

pub(super) fn resolve(
    catalog: &StandardCatalog,
    ctx: &ChoiceContext,
    encounter: EncounterId,
) -> Result<ContentOutcome, CatalogError> {
    let label = ctx.answer.label.as_str();
    let player = &ctx.player;
    let column = ctx.choice.cell().map(|cell| cell.column);

    let outcome = match (encounter.get(), label) {
        (1, SCARED) => ContentOutcome::message(
            "\"You can't eat that!\" Your next roll uses five dice split 3 and 2",
        )
        .with_effect(Effect::NextDiceCount {
            split: GroupSplit::new(3, 2)?,
        }),
        (1, "Pet the cat") => {
            ContentOutcome::message("The cat purrs and rubs against your leg")
        }
        (2, GO_AROUND) => {
            pay(player, 5, label)?;
            ContentOutcome::message("You take the long way round. The butterflies fly off")
                .with_effect(Effect::ScoreDelta { amount: -5 })
        }
        (2, _) => ContentOutcome::message(
            "The mist pulls you into an old dream. A familiar shadow stands with its back to you",
        ),
        (3, BOTH_MINE) => ContentOutcome::message(
            "\"Ambition, I like it!\" You get a Golden Die, a Silver Die and a free roll",
        )
        .with_effects([
            Effect::InventoryDelta {
                item: ItemId::new(GOLDEN_DIE),
                quantity: 1,
            },
            Effect::InventoryDelta {
                item: ItemId::new(SILVER_DIE),
                quantity: 1,
            },
            Effect::FreeRolls { count: 1 },
        ]),
        (3, NOT_MINE) => ContentOutcome::message("\"What an honest child.\" The old man vanishes"),
        (3, _) => ContentOutcome::message(
            "\"Greedy! Here is your punishment!\" He takes every die. Skip one turn",
        )
        .with_effect(Effect::SkipRounds { count: 1 }),
        (4, THANKS_FORTUNE) => ContentOutcome::message(
            "\"Such good manners!\" You also get a Free Roll Ticket",
        )
        .with_effect(Effect::InventoryDelta {
            item: ItemId::new(FREE_ROLL_TICKET),
            quantity: 1,
        }),
        (5, GET_CLOSER) => ContentOutcome::message(
            "Those are not flowers! Fanged petals close around you. Skip one turn",
        )
        .with_effect(Effect::SkipRounds { count: 1 }),
        (5, WATER) => {
            pay(player, 5, label)?;
            ContentOutcome::message("The little flowers grow into big flowers. Still swaying")
                .with_effect(Effect::ScoreDelta { amount: -5 })
        }
        (6, BET) => {
            let lost = player.current_score.max(0);
            ContentOutcome::message("You lose everything. Gambling is bad for you")
                .with_effects((lost > 0).then_some(Effect::ScoreDelta { amount: -lost }))
        }
        (6, NO_BET) => ContentOutcome::message(
            "You walk away, but something is missing from your pockets. -5 points and your next roll uses five dice",
        )
        .with_effects([
            Effect::ScoreDelta { amount: -5 },
            Effect::NextDiceCount {
                split: GroupSplit::new(3, 2)?,
            },
        ]),
        (6, MERCY) => ContentOutcome::message(
            "You try a bribe, and your pockets still come back lighter. -10 points",
        )
        .with_effect(Effect::ScoreDelta { amount: -10 }),
        (7, THANKS) => ContentOutcome::message("Your next roll uses seven dice split 3 and 4")
            .with_effect(Effect::NextDiceCount {
                split: GroupSplit::new(3, 4)?,
            }),
        (7, MORE_DICE) => ContentOutcome::message("Dice fall from the sky. Your next roll uses ten dice split 5 and 5")
            .with_effect(Effect::NextDiceCount {
                split: GroupSplit::new(5, 5)?,
            }),
        (7, INSPECT_DIE) => ContentOutcome::message("It is solid gold. You found a Windfall")
            .with_effect(Effect::InventoryDelta {
                item: ItemId::new(WINDFALL),
                quantity: 1,
            }),
        (8, YES_PLEASE) => ContentOutcome::message(
            "Another hand pops up waving a yellow card. No cheating! -5 points",
        )
        .with_effect(Effect::ScoreDelta { amount: -5 }),
        (9, SCREAM) => ContentOutcome::message(
            "You drop your dice and run. Your next roll will be 3 3 3 4 4 4",
        )
        .with_effect(Effect::FixNextRoll {
            faces: ROACH_FACES.to_vec(),
        }),
        (9, SPRAY) => {
            pay(player, 5, label)?;
            ContentOutcome::message("The dose is not enough to stop it, but it flies away")
                .with_effect(Effect::ScoreDelta { amount: -5 })
        }
        (9, BEFRIEND) => {
            let check = catalog.roll(6);
            if check <= 3 {
                roach_wins(check)
            } else {
                roach_ride(check, column)
            }
        }
        (9, RIDE) => {
            let check = catalog.roll(6);
            if check <= 3 {
                roach_ride(check, column)
            } else {
                roach_wins(check)
            }
        }
        (10, OAS) => ContentOutcome::message("Perfect! I would hire you on the spot. +5 points")
            .with_effect(Effect::ScoreDelta { amount: 5 }),
        (10, _) => ContentOutcome::message(
            "You can't even remember the association's name? -5 points",
        )
        .with_effect(Effect::ScoreDelta { amount: -5 }),
        (11, _) => ContentOutcome::message("Your pockets fill with coins. +10 points")
            .with_effect(Effect::ScoreDelta { amount: 10 }),
        (12, JUMP) => ContentOutcome::message(
            "You land in a haystack and carry on. Achievement: Master Assassin",
        )
        .with_effect(Effect::Achievement {
            id: AchievementId::encounter("master_assassin"),
        }),
        (12, _) => match column {
            Some(column) => ContentOutcome::message(
                "\"This is Sparta!\" A kick sends you back into the pit. Back one cell",
            )
            .with_effect(Effect::PositionDelta { column, delta: -1 }),
            None => ContentOutcome::message("You turn back"),
        },
        (13, DRINK) => ContentOutcome::message(
            "You feel unstoppable, until you roll. Your next roll will be all twos",
        )
        .with_effect(Effect::FixNextRoll {
            faces: vec![2; 6],
        }),
        (13, _) => ContentOutcome::message("Exhausted, you end the round")
            .with_effect(Effect::ForceEndRound {
                until_check_in: false,
            }),
        (14, DRINK_IT) => ContentOutcome::message(
            "Raw power surges through you. Your next roll comes with an extra d6; a six smashes the roll",
        )
        .with_effect(Effect::ExtraDieCheck),
        (14, THE_PRICE) => ContentOutcome::message(
            "The elder laughs and vanishes in green fire. Achievement: Never Be Slaves",
        )
        .with_effect(Effect::Achievement {
            id: AchievementId::encounter("never_be_slaves"),
        }),
        (22, SHORT_ONE) => ContentOutcome::message(
            "Your roommate later became mayor and left you some money. +5 points",
        )
        .with_effect(Effect::ScoreDelta { amount: 5 }),
        (22, _) => ContentOutcome::message("Your roommate never stops talking. You cope"),
        (26, WHO) | (26, SAY_HELLO) => ContentOutcome::message(
            "\"Hee hee hee...\" Something knocks you out. Skip one turn",
        )
        .with_effect(Effect::SkipRounds { count: 1 }),
        (26, FIND_VOICE) => follow_up(
            ctx,
            encounter,
            "You follow the voice without answering",
            MOUTH_FOLLOW_UP,
            &[SAY_HELLO, "Stay quiet"],
        ),
        (27, TASTE) => ContentOutcome::message("Tastes like boiled tyres, but you feel stronger. +5 points")
            .with_effect(Effect::ScoreDelta { amount: 5 }),
        (27, GULP) => ContentOutcome::message("You down it and feel full of power! +10 points")
            .with_effect(Effect::ScoreDelta { amount: 10 }),
        (28, KEEP_FISHING) => ContentOutcome::message(
            "You pass out by the pond at two in the morning. The rescue team sends a bill. -10 points",
        )
        .with_effect(Effect::ScoreDelta { amount: -10 }),
        (28, CASH_IN) => ContentOutcome::message("You hand in your catch and take a prize. +5 points")
            .with_effect(Effect::ScoreDelta { amount: 5 }),
        (15, PAST) => match &player.last_roll {
            Some(roll) => {
                let faces: Vec<u8> = roll.faces().iter().copied().take(3).collect();
                ContentOutcome::message(format!(
                    "Your mirror self swaps your brains. Your next roll starts with {}",
                    spaced(&faces)
                ))
                .with_effect(Effect::PartialFixRoll { faces })
            }
            None => ContentOutcome::message("The mirror has no roll of yours to give back"),
        },
        (15, FUTURE) => {
            if player.last_roll.is_some() {
                ContentOutcome::message("Your mirror self swaps your brains. The roll dissolves; roll again for free")
                    .with_effects([Effect::ClearLastRoll, Effect::FreeRolls { count: 1 }])
            } else {
                ContentOutcome::message("The mirror finds no roll of yours to redo")
            }
        }
        (16, RED_PILL) => follow_up(
            ctx,
            encounter,
            "Your head has never been clearer. Pick a face for one die of your next roll",
            FACE_PROMPT,
            &FACES,
        ),
        (16, BLUE_PILL) => ContentOutcome::message(
            "A warm calm washes over you, like drifting in a stream. Skip one turn",
        )
        .with_effect(Effect::SkipRounds { count: 1 }),
        (17, BUILD) => ContentOutcome::message(
            "The car loops over your bridge and lands perfectly. You get a Nitro Booster",
        )
        .with_effect(Effect::InventoryDelta {
            item: ItemId::new(NITRO_BOOSTER),
            quantity: 1,
        }),
        (17, RUN_OFF) => ContentOutcome::message(
            "You run off with the building money. +10 points. Achievement: Embezzler Reborn",
        )
        .with_effects([
            Effect::ScoreDelta { amount: 10 },
            Effect::Achievement {
                id: AchievementId::encounter("embezzler_reborn"),
            },
        ]),
        (18, BLACK_BLOCK) => ContentOutcome::message(
            "A flood of bad memories. This round's progress is lost",
        )
        .with_effect(Effect::ForceEndRound {
            until_check_in: false,
        }),
        (18, WHITE_BLOCK) => step(
            ContentOutcome::message("Warm memories brush your forehead. One cell forward"),
            column,
            1,
        ),
        (19, ASK_NICELY) => follow_up(
            ctx,
            encounter,
            "It answers patiently and walks with you a while. Pick a face for one die of your next roll",
            FACE_PROMPT,
            &FACES,
        ),
        (16 | 19 | 35, face) if FACES.contains(&face) => {
            let value: u8 = face
                .parse()
                .map_err(|_| CatalogError::not_usable(face, "not a die face"))?;
            ContentOutcome::message(format!("One die of your next roll will show {value}"))
                .with_effect(Effect::PartialFixRoll { faces: vec![value] })
        }
        (21, GRAPE) => match (player.faction, &player.partner) {
            (Some(Faction::Aeonreth), _) => {
                ContentOutcome::message("Your power is rising. +5 points")
                    .with_effect(Effect::ScoreDelta { amount: 5 })
            }
            (Some(Faction::Adopter), Some(_)) => ContentOutcome::message(
                "Grape leaves grow over your eyes. Is this your partner's power? +5 points",
            )
            .with_effect(Effect::ScoreDelta { amount: 5 }),
            _ => ContentOutcome::message("The vine grows. Nothing happens"),
        },
        (21, ROSE) => ContentOutcome::message(
            "White roses cover the path, slowly turning red. Your next roll costs double: 10 more points",
        )
        .with_effect(Effect::ScoreDelta { amount: -10 }),
        (21, ASTER) => ContentOutcome::message(
            "\"Is the drawing done yet?\" Your next drawing bonus takes two drawings",
        ),
        (21, PLANT_NOTHING) => ContentOutcome::message(
            "Where does fate turn now? The round stops until you check in a drawing",
        )
        .with_effect(Effect::ForceEndRound {
            until_check_in: true,
        }),
        (23, PEEK) => ContentOutcome::message(
            "\"Children can't watch this.\" The patrol witch takes it away. -5 points",
        )
        .with_effect(Effect::ScoreDelta { amount: -5 }),
        (23, LOOK_AWAY) => ContentOutcome::message(
            "The patrol witch nods at you and takes the thing away. +5 points",
        )
        .with_effect(Effect::ScoreDelta { amount: 5 }),
        (24, BAG) => ContentOutcome::message(
            "Seeds! Sunflowers and peashooters hold off the horde. +5 points and a Small Trophy",
        )
        .with_effects([
            Effect::ScoreDelta { amount: 5 },
            Effect::InventoryDelta {
                item: ItemId::new(SMALL_TROPHY),
                quantity: 1,
            },
        ]),
        (24, SANITIZER) => ContentOutcome::message(
            "You pour sanitizer on your wounds and they close. Achievement: Sanitizer Warrior",
        )
        .with_effect(Effect::Achievement {
            id: AchievementId::encounter("sanitizer_warrior"),
        }),
        (25, WHOSE_WIFE) => {
            let check = catalog.roll(20);
            let chase = format!("A puppet behind you gives chase. d20 = {check}: ");
            match check {
                18..=u8::MAX => step(
                    ContentOutcome::message(format!("{chase}you lose it easily. One cell forward")),
                    column,
                    1,
                ),
                5..=17 => ContentOutcome::message(format!("{chase}you shake it off at last")),
                _ => step(
                    ContentOutcome::message(format!("{chase}it catches you. One cell back")),
                    column,
                    -1,
                ),
            }
        }
        (29, JOKE_FAILED) => ContentOutcome::message("Joke failed. -5 points")
            .with_effect(Effect::ScoreDelta { amount: -5 }),
        (29, _) => ContentOutcome::message("Task complete!"),
        (31, TOGETHER) => {
            let (yours, theirs) = (catalog.roll(6), catalog.roll(6));
            if yours == theirs {
                ContentOutcome::message(format!(
                    "You roll {yours}, your partner rolls {theirs}. Perfect teamwork: a free roll each"
                ))
                .with_effects([
                    Effect::FreeRolls { count: 1 },
                    Effect::ForPlayer {
                        target: EffectTarget::Partner,
                        effects: vec![Effect::FreeRolls { count: 1 }],
                    },
                ])
            } else {
                ContentOutcome::message(format!(
                    "You roll {yours}, your partner rolls {theirs}. Game over"
                ))
            }
        }
        (31, ALONE) => {
            let rolls = [catalog.roll(6), catalog.roll(6), catalog.roll(6)];
            if rolls.iter().all(|face| *face == rolls[0]) {
                step(
                    ContentOutcome::message(format!(
                        "Two controllers, one player: {}. One cell forward. Achievement: Solo Hard Mode",
                        spaced(&rolls)
                    ))
                    .with_effect(Effect::Achievement {
                        id: AchievementId::encounter("solo_hard_mode"),
                    }),
                    column,
                    1,
                )
            } else {
                ContentOutcome::message(format!(
                    "Two controllers, one player: {}. Not quite",
                    spaced(&rolls)
                ))
            }
        }
        (32, GO_LOOK) => ContentOutcome::message(
            "Your limbs dance before you can think. Your next roll will be 2 3 3 3 3 3",
        )
        .with_effect(Effect::FixNextRoll {
            faces: SQUARE_DANCE_FACES.to_vec(),
        }),
        (33, WAIT) => ContentOutcome::message("You wait and wait. No news. Skip one turn")
            .with_effect(Effect::SkipRounds { count: 1 }),
        (34, POTATO_CHIP) => ContentOutcome::message(
            "More alarms, then the server crashes. -10 points and the round ends",
        )
        .with_effects([
            Effect::ScoreDelta { amount: -10 },
            Effect::ForceEndRound {
                until_check_in: false,
            },
        ]),
        (34, INK_CHIP) => ContentOutcome::message(
            "It connects after a few tries, then spins forever. Skip one turn",
        )
        .with_effect(Effect::SkipRounds { count: 1 }),
        (34, HOST_HELP) => ContentOutcome::message(
            "The host has no idea either. You stare at each other until it crashes. -5 points",
        )
        .with_effect(Effect::ScoreDelta { amount: -5 }),
        (34, _) => ContentOutcome::message("The cat fetches an admin. Your server is saved"),
        (35, WEAR_MASK) => {
            let text = match player.faction {
                Some(Faction::Aeonreth) => "Your lost power flows back and the rules loosen. Pick a face for one die of your next roll",
                _ => "Your blood calls out: \"I'm done being human!\" Pick a face for one die of your next roll",
            };
            follow_up(ctx, encounter, text, FACE_PROMPT, &FACES)
        }
        (35, RESIST) => {
            let check = catalog.roll(6);
            if check > 3 {
                ContentOutcome::message(format!("d6 = {check}: you resist and walk on"))
            } else {
                ContentOutcome::message(format!("d6 = {check}: the mask takes hold of your mind. -5 points"))
                    .with_effect(Effect::ScoreDelta { amount: -5 })
            }
        }
        (36, CLEAN_UP) => {
            let check = catalog.roll(20);
            let (text, amount) = match check {
                17..=u8::MAX => ("spotless work and full pockets", 10),
                6..=16 => ("you missed a few details, but kept the shiny things", 5),
                _ => ("you made it worse and lost what you pocketed", -5),
            };
            ContentOutcome::message(format!("d20 = {check}: {text}. {amount:+} points"))
                .with_effect(Effect::ScoreDelta { amount })
        }
        (36, MAKEOVER) => ContentOutcome::message(
            "Ketchup on every wall. The client loves the new look. +20 points. Achievement: People's Painter",
        )
        .with_effects([
            Effect::ScoreDelta { amount: 20 },
            Effect::Achievement {
                id: AchievementId::encounter("peoples_painter"),
            },
        ]),
        (37, HUNGER | COLD | FEAR) => {
            let check = catalog.roll(6);
            if check > 3 {
                ContentOutcome::message(format!(
                    "d6 = {check}: you find what you need and get through the night. +5 points"
                ))
                .with_effect(Effect::ScoreDelta { amount: 5 })
            } else {
                ContentOutcome::message(format!(
                    "d6 = {check}: you collapse in the wild. -5 points"
                ))
                .with_effect(Effect::ScoreDelta { amount: -5 })
            }
        }
        (37, FINE) => ContentOutcome::message("You try to tough it out and pass out. -5 points")
            .with_effect(Effect::ScoreDelta { amount: -5 }),
        (38, SHINY) => ContentOutcome::message(
            "You hold up your own attorney's badge. \"Guilty!\" -5 points",
        )
        .with_effect(Effect::ScoreDelta { amount: -5 }),
        (38, WITNESS) => {
            let check = catalog.roll(20);
            if check >= 10 {
                ContentOutcome::message(format!(
                    "d20 = {check}: you catch a contradiction and the testimony falls apart. +5 points"
                ))
                .with_effect(Effect::ScoreDelta { amount: 5 })
            } else {
                ContentOutcome::message(format!(
                    "d20 = {check}: the prosecutor says you are wasting time. -5 points"
                ))
                .with_effect(Effect::ScoreDelta { amount: -5 })
            }
        }
        (38, ANY_EVIDENCE) => ContentOutcome::message(
            "You wave a guard's flashlight around and get thrown out. -5 points, but you keep the Flashlight",
        )
        .with_effects([
            Effect::ScoreDelta { amount: -5 },
            Effect::InventoryDelta {
                item: ItemId::new(FLASHLIGHT),
                quantity: 1,
            },
        ]),
        (40, SHAKE) => ContentOutcome::message(
            "Blue fire, a spinning world, and a note on your forehead listing what \"you\" did. Skip one turn",
        )
        .with_effect(Effect::SkipRounds { count: 1 }),
        (41, SORRY) => ContentOutcome::message(
            "You apologise for who knows what. They toss you a pouch. +5 points. Achievement: Super Pushover",
        )
        .with_effects([
            Effect::ScoreDelta { amount: 5 },
            Effect::Achievement {
                id: AchievementId::encounter("super_pushover"),
            },
        ]),
        (41, ARGUE) => match column {
            Some(column) => ContentOutcome::message(format!(
                "The shouting match drags on. Your marker in column {column} is stuck for this round"
            ))
            .with_effect(Effect::ColumnFreeze { column }),
            None => ContentOutcome::message("The shouting match drags on"),
        },
        (41, GIBBERISH) => ContentOutcome::message(
            "They give up and toss you a pouch. \"Maybe just top up your account.\" +10 points",
        )
        .with_effect(Effect::ScoreDelta { amount: 10 }),
        (43, PLAY_SONG) => {
            let check = catalog.roll(6);
            let (text, amount) = match check {
                5..=u8::MAX => ("full combo, perfect play", 10),
                3 | 4 => ("a few slips, but still a full combo", 5),
                _ => ("plenty of misses, but you finish", 0),
            };
            let outcome = ContentOutcome::message(format!("d6 = {check}: {text}. {amount:+} points"));
            if amount == 0 {
                outcome
            } else {
                outcome.with_effect(Effect::ScoreDelta { amount })
            }
        }
        (43, SKIP_SONG) => ContentOutcome::message(
            "You cannot move until the song ends. All misses. -5 points",
        )
        .with_effect(Effect::ScoreDelta { amount: -5 }),
        (44, COOK_TOGETHER) => {
            let check = catalog.roll(6);
            if check >= 4 {
                ContentOutcome::message(format!(
                    "d6 = {check}: the perfect team. +5 points for you and your partner"
                ))
                .with_effects([
                    Effect::ScoreDelta { amount: 5 },
                    Effect::ForPlayer {
                        target: EffectTarget::Partner,
                        effects: vec![Effect::ScoreDelta { amount: 5 }],
                    },
                ])
            } else {
                ContentOutcome::message(format!(
                    "d6 = {check}: chaos in the kitchen. Nothing happens"
                ))
            }
        }
        (44, REFUSE) => ContentOutcome::message("Angry customers hold up your game. Skip one turn")
            .with_effect(Effect::SkipRounds { count: 1 }),
        (44, ALONE) => {
            let check = catalog.roll(6);
            match check {
                6..=u8::MAX => ContentOutcome::message(format!(
                    "d6 = {check}: you do two people's work. +10 points"
                ))
                .with_effect(Effect::ScoreDelta { amount: 10 }),
                3..=5 => ContentOutcome::message(format!(
                    "d6 = {check}: too much for one cook. Nothing happens"
                )),
                _ => ContentOutcome::message(format!(
                    "d6 = {check}: the customers are furious. -5 points"
                ))
                .with_effect(Effect::ScoreDelta { amount: -5 }),
            }
        }
        (45, TRUST_ME) => {
            let check = catalog.roll(6);
            if check >= 4 {
                ContentOutcome::message(format!("d6 = {check}: the team votes with you and wins. +5 points"))
                    .with_effect(Effect::ScoreDelta { amount: 5 })
            } else {
                ContentOutcome::message(format!("d6 = {check}: they think you cracked. The bad guys win. -5 points"))
                    .with_effect(Effect::ScoreDelta { amount: -5 })
            }
        }
        (45, GIVE_UP) => ContentOutcome::message("The bad guys win and your team is not happy. -10 points")
            .with_effect(Effect::ScoreDelta { amount: -10 }),
        (45, REASON) => {
            let check = catalog.roll(6);
            if check >= 2 {
                ContentOutcome::message(format!("d6 = {check}: you find the real culprit. +10 points"))
                    .with_effect(Effect::ScoreDelta { amount: 10 })
            } else {
                ContentOutcome::message(format!("d6 = {check}: you tie yourself in knots. -5 points"))
                    .with_effect(Effect::ScoreDelta { amount: -5 })
            }
        }
        (47, RETURN_BOOK) => ContentOutcome::message(
            "A glowing pink butterfly flies out from between the books and lands on your hand",
        )
        .with_effect(Effect::InventoryDelta {
            item: ItemId::new(PINK_BUTTERFLY),
            quantity: 1,
        }),
        (47, KEEP_BOOK) => ContentOutcome::message("You slip Read It and Die into your bag")
            .with_effect(Effect::InventoryDelta {
                item: ItemId::new(DEADLY_BOOK),
                quantity: 1,
            }),
        (47, READ_BOOK) => ContentOutcome::message(
            "The words blur and something red drips onto the page. Your eyes ache",
        ),
        (49, SIT) => ContentOutcome::message(
            "Her voice lulls you to sleep. You wake beside a thick book of tales",
        )
        .with_effect(Effect::InventoryDelta {
            item: ItemId::new(THOUSAND_TALES),
            quantity: 1,
        }),
        (49, IDEA) => ContentOutcome::message(
            "You tell a story of your own. The head in her arms opens its eyes. Achievement: The King's Favour",
        )
        .with_effect(Effect::Achievement {
            id: AchievementId::encounter("kings_favour"),
        }),
        (51, RIDING) => ContentOutcome::message(
            "You race your horse round the whole town. Achievement: Speed Cowboy",
        )
        .with_effect(Effect::Achievement {
            id: AchievementId::encounter("speed_cowboy"),
        }),
        (51, SHOOT | DRINKING | PUNCH) => ContentOutcome::message(
            "Check in a drawing of the contest within three days to win it",
        ),
        (53, SNEAK) => {
            pay(player, 5, label)?;
            ContentOutcome::message("You creep along the wall and round the corner unseen")
                .with_effect(Effect::ScoreDelta { amount: -5 })
        }
        (53, RUSH) => ContentOutcome::message(
            "The nearest figure turns. A blank face, cold fingers, then darkness. -5 points",
        )
        .with_effect(Effect::ScoreDelta { amount: -5 }),
        (53, SPIN_LIGHT) => {
            if !holds(player, FLASHLIGHT) {
                return Err(CatalogError::not_usable(label, "you have no flashlight"));
            }
            let bonus = catalog.roll_sum(3, 6);
            ContentOutcome::message(format!(
                "Your spinning flashlight drives the figures back. 3d6 = {bonus}: +{bonus} points"
            ))
            .with_effect(Effect::ScoreDelta {
                amount: i64::from(bonus),
            })
        }
        (54, NO_TRAP_CARD) => ContentOutcome::message(
            "\"Then give me yours!\" \"Step on it, then.\" The programmer takes your next trap",
        )
        .with_effect(Effect::GrantTrapImmunity {
            immunity: TrapImmunity::Free,
        }),
        (55, RED_ROSE_OPTION) => keepsake("A red rose whose petals look ready to bleed", RED_ROSE),
        (55, BLUE_ROSE_OPTION) => keepsake("A stubborn blue rose with faintly glowing petals", BLUE_ROSE),
        (55, YELLOW_ROSE_OPTION) => keepsake("A plastic yellow rose that never wilts", YELLOW_ROSE),
        (56, ENGINEER) => ContentOutcome::message(
            "The engineer hands you two well-worn books",
        )
        .with_effects([
            Effect::InventoryDelta {
                item: ItemId::new(CODING_PRIMER),
                quantity: 1,
            },
            Effect::InventoryDelta {
                item: ItemId::new(BUG_DIARY),
                quantity: 1,
            },
        ]),
        (56, SERVER) => ContentOutcome::message(
            "A penguin in a red scarf is chewing the server. You chase it off. +10 points. Achievement: Time Rescuer",
        )
        .with_effects([
            Effect::ScoreDelta { amount: 10 },
            Effect::Achievement {
                id: AchievementId::encounter("time_rescuer"),
            },
        ]),
        (57, GIFT_SISYPHUS) => ContentOutcome::message(
            "The big man scratches his head and gives you something shiny. +20 points",
        )
        .with_effect(Effect::ScoreDelta { amount: 20 }),
        (57, GIFT_BOULDER) => ContentOutcome::message(
            "You feel lighter after honouring the boulder. +20 points. Achievement: Blessing of the Boulder",
        )
        .with_effects([
            Effect::ScoreDelta { amount: 20 },
            Effect::Achievement {
                id: AchievementId::encounter("boulder_blessing"),
            },
        ]),
        (57, DRINK_MYSELF) => ContentOutcome::message(
            "Liquid gold, then nothing. Who knows how long you slept. -20 points",
        )
        .with_effect(Effect::ScoreDelta { amount: -20 }),
        (58, LISTEN) => ContentOutcome::message(
            "Someone thanks you as you step into the light. An old lyre appears in your hands",
        )
        .with_effect(Effect::InventoryDelta {
            item: ItemId::new(UNDERWORLD_LYRE),
            quantity: 1,
        }),
        (58, _) => ContentOutcome::message(
            "You look back. The figure following you crumbles into salt",
        ),
        (59, NO_DARE) => ContentOutcome::message("You pay a toll to be left alone. -5 points")
            .with_effect(Effect::ScoreDelta { amount: -5 }),
        (59, DARE_BACK) => {
            let check = catalog.roll(6);
            if check >= 4 {
                ContentOutcome::message(format!("d6 = {check}: the bluff works and you slip away"))
            } else {
                ContentOutcome::message(format!(
                    "d6 = {check}: seen through, you end up inside the gourd. The round ends and you skip one turn"
                ))
                .with_effects([
                    Effect::ForceEndRound {
                        until_check_in: false,
                    },
                    Effect::SkipRounds { count: 1 },
                ])
            }
        }
        (59, ANSWER) => ContentOutcome::message(
            "Nothing happens. That was never your real name. You walk off with the gourd and some cash. +10 points",
        )
        .with_effects([
            Effect::ScoreDelta { amount: 10 },
            Effect::InventoryDelta {
                item: ItemId::new(GREEN_GOURD),
                quantity: 1,
            },
        ]),
        (60, VOL_DOWN) => ContentOutcome::message(
            "He leads you quietly to the next door, then vanishes into the fog. +5 points",
        )
        .with_effect(Effect::ScoreDelta { amount: 5 }),
        (60, LOST) => ContentOutcome::message(
            "Countless eyes turn toward your voice. Your guide slips away. -5 points",
        )
        .with_effect(Effect::ScoreDelta { amount: -5 }),
        (60, VOL_UP) => ContentOutcome::message(
            "You shout in his ear and he falls into the fog. Then the first bark sounds. -20 points",
        )
        .with_effect(Effect::ScoreDelta { amount: -20 }),
        (1..=60, _) => ContentOutcome::message("Nothing happens"),
        _ => return Err(CatalogError::UnknownContent(ContentRef::Encounter(encounter))),
    };
    Ok(outcome)
}

/// Options that cost points cannot be picked without them.
fn pay(player: &PlayerSnapshot, cost: i64, label: &str) -> Result<(), CatalogError> {
    if player.current_score < cost {
        return Err(CatalogError::not_usable(
            label,
            format!("you need {cost} points"),
        ));
    }
    Ok(())
}

fn roach_wins(check: u8) -> ContentOutcome {
    ContentOutcome::message(format!(
        "d6 = {check}: the roach will not listen. You run, and your next roll will be 3 3 3 4 4 4"
    ))
    .with_effect(Effect::FixNextRoll {
        faces: ROACH_FACES.to_vec(),
    })
}

fn roach_ride(check: u8, column: Option<ColumnId>) -> ContentOutcome {
    step(
        ContentOutcome::message(format!(
            "d6 = {check}: the roach carries you forward one cell"
        )),
        column,
        1,
    )
}

/// Move the marker in the encounter's column, when the choice remembers one.
fn step(outcome: ContentOutcome, column: Option<ColumnId>, delta: i32) -> ContentOutcome {
    match column {
        Some(column) => outcome.with_effect(Effect::PositionDelta { column, delta }),
        None => outcome,
    }
}

/// A second question on the same cell.
fn follow_up(
    ctx: &ChoiceContext,
    encounter: EncounterId,
    message: &str,
    prompt: &str,
    labels: &[&str],
) -> ContentOutcome {
    let mut choice = PendingChoice::new(ContentRef::Encounter(encounter), prompt, options(labels));
    if let Some(cell) = ctx.choice.cell() {
        choice = choice.with_cell(cell);
    }
    ContentOutcome::message(message).with_choice(choice)
}

fn keepsake(message: &str, item: u16) -> ContentOutcome {
    ContentOutcome::message(format!("{message}. You keep it"))
        .with_effect(Effect::InventoryDelta {
            item: ItemId::new(item),
            quantity: 1,
        })
}

fn holds(player: &PlayerSnapshot, item: u16) -> bool {
    player
        .inventory
        .iter()
        .any(|entry| entry.item == ItemId::new(item) && entry.quantity > 0)
}

fn spaced(faces: &[u8]) -> String {
    faces
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scenes with no choice, only a drawing prompt.
fn scene(encounter: u16) -> &'static str {
    match encounter {
        30 => "A gilded chandelier turns and an old gramophone plays. \"May I have this dance?\" Who is reaching for your hand?",
        42 => "A whole wardrobe of new clothes! Time for a change. What is your new outfit?",
        48 => "A pop-up storybook opens, and the hero in the misty forest is you. Once upon a time...",
        50 => "Stairs fold into walls as you walk. In the tower's carvings you glimpse countless copies of yourself.",
        _ => "An exit sign! You open the door, and find the same door ahead, with someone familiar behind you.",
    }
}
