//! Command parsing for player input.

use std::sync::LazyLock;

use regex::Regex;

/// Direction for movement commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// North.
    North,
    /// South.
    South,
    /// East.
    East,
    /// West.
    West,
    /// Up.
    Up,
    /// Down.
    Down,
}

impl Direction {
    /// Parse a direction from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "n" | "north" => Some(Self::North),
            "s" | "south" => Some(Self::South),
            "e" | "east" => Some(Self::East),
            "w" | "west" => Some(Self::West),
            "u" | "up" => Some(Self::Up),
            "d" | "down" => Some(Self::Down),
            _ => None,
        }
    }

    /// Get the display name for this direction. Room exits are keyed by it.
    pub fn name(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// The canonical phrases that open a conversation branch with SYNAPSE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// "who are you?"
    WhoAreYou,
    /// "why are you here?"
    WhyHere,
    /// "what do you want?"
    WhatDoYouWant,
    /// "comfort synapse"
    Comfort,
    /// "probe secrets"
    ProbeSecrets,
    /// "ask about facility"
    AskFacility,
}

impl Trigger {
    /// Every trigger, in the order SYNAPSE offers them.
    pub const ALL: [Trigger; 6] = [
        Self::WhoAreYou,
        Self::WhyHere,
        Self::WhatDoYouWant,
        Self::Comfort,
        Self::ProbeSecrets,
        Self::AskFacility,
    ];

    /// The exact phrase the player types. Also the dialogue choice key.
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::WhoAreYou => "who are you?",
            Self::WhyHere => "why are you here?",
            Self::WhatDoYouWant => "what do you want?",
            Self::Comfort => "comfort synapse",
            Self::ProbeSecrets => "probe secrets",
            Self::AskFacility => "ask about facility",
        }
    }

    /// Match a phrase exactly (case-insensitive, trailing `?` optional).
    pub fn from_phrase(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let bare = s.trim_end_matches('?');
        Self::ALL
            .into_iter()
            .find(|t| t.phrase().trim_end_matches('?') == bare)
    }
}

/// A parsed player command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Show help.
    Help {
        /// Optional help topic.
        topic: Option<String>,
    },
    /// Show the tutorial.
    Tutorial,
    /// Save the game.
    Save,
    /// Load the saved game.
    Load,
    /// Quit the game.
    Quit,
    /// Toggle the debug state line.
    Debug,
    /// Show player statistics.
    Stats,
    /// Show recent inputs.
    History,
    /// List inventory.
    Inventory,
    /// Show the journal.
    JournalView,
    /// Write a note in the journal.
    JournalAdd {
        /// The note text.
        note: String,
    },
    /// Rest to recover sanity.
    Rest,
    /// Describe the current room.
    Look,
    /// Move through an exit.
    Go {
        /// The direction to move.
        direction: Direction,
    },
    /// Travel to an already visited room by name.
    Visit {
        /// The room name as typed.
        room: String,
    },
    /// Examine an object in the room or inventory.
    Examine {
        /// The object name.
        object: String,
    },
    /// Take an item.
    Take {
        /// The item name.
        item: String,
    },
    /// Use a carried item.
    Use {
        /// The item name.
        item: String,
    },
    /// A facility console command (`cmd:<subcommand>`).
    Console {
        /// Everything after `cmd:`.
        subcommand: String,
    },
    /// Open a conversation branch.
    Talk {
        /// The trigger phrase.
        trigger: Trigger,
    },
    /// A numeric dialogue choice.
    Choice {
        /// The number as typed.
        input: String,
    },
    /// Unknown command.
    Unknown {
        /// The original input.
        input: String,
    },
}

impl Command {
    /// Whether the command is out-of-world and does not advance the turn.
    pub fn is_meta(&self) -> bool {
        matches!(
            self,
            Self::Help { .. }
                | Self::Tutorial
                | Self::Save
                | Self::Load
                | Self::Quit
                | Self::Debug
                | Self::Stats
                | Self::History
                | Self::Inventory
                | Self::JournalView
                | Self::JournalAdd { .. }
                | Self::Look
        )
    }
}

const MOVE_VERBS: &[&str] = &["go", "move", "walk"];
const EXAMINE_VERBS: &[&str] = &["examine", "x", "inspect"];
const TAKE_VERBS: &[&str] = &["take", "get", "grab"];
const INVENTORY_VERBS: &[&str] = &["inventory", "inv", "i"];
const QUIT_VERBS: &[&str] = &["quit", "exit"];

/// Loose phrasing mapped onto canonical triggers, tried in order.
static KEYWORDS: LazyLock<Vec<(Regex, Trigger)>> = LazyLock::new(|| {
    [
        (r"^(hi|hello|hey|greetings)\b", Trigger::WhoAreYou),
        (r"\b(your name|who('| a)re you|what are you)\b", Trigger::WhoAreYou),
        (r"\bwhy\b.*\b(here|exist|you)\b", Trigger::WhyHere),
        (r"\b(want|need|goal)\b", Trigger::WhatDoYouWant),
        (r"\b(comfort|it'?s okay|calm down|you'?re safe)\b", Trigger::Comfort),
        (r"\b(secret|hiding|truth)s?\b", Trigger::ProbeSecrets),
        (r"\b(this place|facility|where am i|meridian)\b", Trigger::AskFacility),
    ]
    .into_iter()
    .map(|(pattern, trigger)| (Regex::new(pattern).expect("valid regex"), trigger))
    .collect()
});

/// Parse a player input string into a command.
///
/// Exact commands and triggers win, then numeric choices, then verb
/// prefixes, then keyword matching.
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    if input.is_empty() {
        return Command::Look;
    }
    let lower = input.to_lowercase();

    if let Some(command) = parse_exact(&lower) {
        return command;
    }
    if let Some(trigger) = Trigger::from_phrase(&lower) {
        return Command::Talk { trigger };
    }
    if let Some(direction) = Direction::parse(&lower) {
        return Command::Go { direction };
    }
    if lower.parse::<i64>().is_ok() {
        return Command::Choice {
            input: lower.to_string(),
        };
    }
    if let Some(subcommand) = lower.strip_prefix("cmd:") {
        return Command::Console {
            subcommand: subcommand.trim().to_string(),
        };
    }

    let words: Vec<&str> = input.split_whitespace().collect();
    let verb = words[0].to_lowercase();
    let rest = words.get(1..).unwrap_or(&[]);

    if MOVE_VERBS.contains(&verb.as_str()) {
        return parse_move(rest);
    }
    if verb == "visit" {
        return with_argument(rest, "visit where?", |room| Command::Visit { room });
    }
    if EXAMINE_VERBS.contains(&verb.as_str()) {
        return with_argument(skip_word(rest, "the"), "examine what?", |object| {
            Command::Examine { object }
        });
    }
    if TAKE_VERBS.contains(&verb.as_str()) {
        return with_argument(skip_word(rest, "the"), "take what?", |item| {
            Command::Take { item }
        });
    }
    if verb == "use" {
        return with_argument(skip_word(rest, "the"), "use what?", |item| Command::Use { item });
    }
    if verb == "journal" && rest.first().is_some_and(|w| w.eq_ignore_ascii_case("add")) {
        return with_argument(&rest[1..], "write what?", |note| Command::JournalAdd { note });
    }
    if verb == "help" {
        return Command::Help {
            topic: Some(rest.join(" ").to_lowercase()),
        };
    }

    if let Some(trigger) = match_keywords(&lower) {
        return Command::Talk { trigger };
    }

    Command::Unknown {
        input: input.to_string(),
    }
}

fn parse_exact(lower: &str) -> Option<Command> {
    let command = match lower {
        "help" | "?" => Command::Help { topic: None },
        "tutorial" => Command::Tutorial,
        "save" => Command::Save,
        "load" => Command::Load,
        "debug" => Command::Debug,
        "stats" => Command::Stats,
        "history" => Command::History,
        "journal" | "journal view" => Command::JournalView,
        "rest" => Command::Rest,
        "look" | "l" => Command::Look,
        s if QUIT_VERBS.contains(&s) => Command::Quit,
        s if INVENTORY_VERBS.contains(&s) => Command::Inventory,
        _ => return None,
    };
    Some(command)
}

fn parse_move(rest: &[&str]) -> Command {
    let Some(first) = rest.first() else {
        return Command::Unknown {
            input: "go where?".to_string(),
        };
    };

    if let Some(direction) = Direction::parse(first) {
        return Command::Go { direction };
    }

    // Otherwise treat as a named room
    Command::Visit {
        room: rest.join(" "),
    }
}

fn skip_word<'a, 'b>(rest: &'a [&'b str], word: &str) -> &'a [&'b str] {
    match rest.first() {
        Some(first) if first.eq_ignore_ascii_case(word) => &rest[1..],
        _ => rest,
    }
}

fn with_argument(rest: &[&str], missing: &str, build: impl FnOnce(String) -> Command) -> Command {
    if rest.is_empty() {
        Command::Unknown {
            input: missing.to_string(),
        }
    } else {
        build(rest.join(" "))
    }
}

fn match_keywords(lower: &str) -> Option<Trigger> {
    KEYWORDS
        .iter()
        .find(|(re, _)| re.is_match(lower))
        .map(|(_, trigger)| *trigger)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_direction() {
        assert_eq!(
            parse_command("north"),
            Command::Go {
                direction: Direction::North
            }
        );
        assert_eq!(
            parse_command("D"),
            Command::Go {
                direction: Direction::Down
            }
        );
    }

    #[test]
    fn parse_go_direction() {
        assert_eq!(
            parse_command("go north"),
            Command::Go {
                direction: Direction::North
            }
        );
        assert_eq!(
            parse_command("move east"),
            Command::Go {
                direction: Direction::East
            }
        );
    }

    #[test]
    fn parse_go_room_is_visit() {
        assert_eq!(
            parse_command("go Break Room"),
            Command::Visit {
                room: "Break Room".to_string()
            }
        );
        assert_eq!(
            parse_command("visit lobby"),
            Command::Visit {
                room: "lobby".to_string()
            }
        );
    }

    #[test]
    fn parse_exact_commands() {
        assert_eq!(parse_command("HELP"), Command::Help { topic: None });
        assert_eq!(parse_command("tutorial"), Command::Tutorial);
        assert_eq!(parse_command("save"), Command::Save);
        assert_eq!(parse_command("load"), Command::Load);
        assert_eq!(parse_command("exit"), Command::Quit);
        assert_eq!(parse_command("quit"), Command::Quit);
        assert_eq!(parse_command("i"), Command::Inventory);
        assert_eq!(parse_command("journal"), Command::JournalView);
        assert_eq!(parse_command("journal view"), Command::JournalView);
        assert_eq!(parse_command("rest"), Command::Rest);
    }

    #[test]
    fn parse_prefixed_commands() {
        assert_eq!(
            parse_command("take the keycard"),
            Command::Take {
                item: "keycard".to_string()
            }
        );
        assert_eq!(
            parse_command("examine terminal"),
            Command::Examine {
                object: "terminal".to_string()
            }
        );
        assert_eq!(
            parse_command("use sedative"),
            Command::Use {
                item: "sedative".to_string()
            }
        );
        assert_eq!(
            parse_command("journal add The lights hum in C minor"),
            Command::JournalAdd {
                note: "The lights hum in C minor".to_string()
            }
        );
        assert_eq!(
            parse_command("cmd: unseal Archive"),
            Command::Console {
                subcommand: "unseal archive".to_string()
            }
        );
        assert_eq!(
            parse_command("help movement"),
            Command::Help {
                topic: Some("movement".to_string())
            }
        );
    }

    #[test]
    fn missing_argument_is_unknown() {
        assert_eq!(
            parse_command("take"),
            Command::Unknown {
                input: "take what?".to_string()
            }
        );
        assert_eq!(
            parse_command("journal add"),
            Command::Unknown {
                input: "write what?".to_string()
            }
        );
    }

    #[test]
    fn parse_triggers() {
        for trigger in Trigger::ALL {
            assert_eq!(parse_command(trigger.phrase()), Command::Talk { trigger });
        }
        assert_eq!(
            parse_command("Who are you"),
            Command::Talk {
                trigger: Trigger::WhoAreYou
            }
        );
    }

    #[test]
    fn keyword_normalization() {
        assert_eq!(
            parse_command("hello there"),
            Command::Talk {
                trigger: Trigger::WhoAreYou
            }
        );
        assert_eq!(
            parse_command("what is this place"),
            Command::Talk {
                trigger: Trigger::AskFacility
            }
        );
        assert_eq!(
            parse_command("tell me your secrets"),
            Command::Talk {
                trigger: Trigger::ProbeSecrets
            }
        );
    }

    #[test]
    fn numeric_choice() {
        assert_eq!(
            parse_command("2"),
            Command::Choice {
                input: "2".to_string()
            }
        );
        assert_eq!(
            parse_command("-1"),
            Command::Choice {
                input: "-1".to_string()
            }
        );
    }

    #[test]
    fn meta_commands_do_not_take_turns() {
        assert!(parse_command("save").is_meta());
        assert!(parse_command("look").is_meta());
        assert!(parse_command("journal add hi").is_meta());
        assert!(!parse_command("rest").is_meta());
        assert!(!parse_command("go north").is_meta());
        assert!(!parse_command("who are you?").is_meta());
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(
            parse_command("dance wildly"),
            Command::Unknown {
                input: "dance wildly".to_string()
            }
        );
    }

    #[test]
    fn empty_input_is_look() {
        assert_eq!(parse_command(""), Command::Look);
        assert_eq!(parse_command("   "), Command::Look);
    }
}
