//! The turn loop.
//!
//! [`GameSession::process`] takes one line of input and runs a full turn:
//!
//! 1. count the turn (meta commands do not count)
//! 2. dispatch the command
//! 3. apply the awareness and sanity deltas it produced
//! 4. age any tone override, recompute tone, swap dialogue trees
//! 5. fire due facility events
//! 6. check endings
//! 7. autosave
//!
//! Meta commands stop after step 2.

use rand::SeedableRng;
use rand::rngs::StdRng;
use synapse_core::{
    ChatbotTone, CoreError, DialogueCursor, DialogueGraph, EntryKind, Inventory, ItemCatalog,
    ItemCategory, Journal, JournalEntry, Navigation, NodeId, PlayerState, RoomGraph,
    substitute_player,
};
use tracing::{debug, info, warn};

use crate::challenge::{ChallengeOutcome, Clock, SystemClock, TimedChallenge};
use crate::config::GameConfig;
use crate::endings::check_endings;
use crate::error::{FictionError, FictionResult};
use crate::events::{
    CORRUPTED_FLAG, CORRUPTION_AWARENESS, GlobalEffect, due_events, roll_room_event,
};
use crate::facility::{CORRUPTED_ROOM, START_ROOM, build_facility, item_catalog, object_info};
use crate::narrator::{DialogueCache, DialogueSnapshot};
use crate::parser::{Command, Direction, Trigger, parse_command, resolve_name};
use crate::report::{LineKind, TurnReport};
use crate::save::{SaveCodec, SaveRecord};

/// Turns a comfort or probe action pins SYNAPSE's tone.
pub const OVERRIDE_TURNS: u32 = 3;
/// Sanity restored by resting.
pub const REST_SANITY: i32 = 10;
/// Sanity restored by the sedative.
pub const SEDATIVE_SANITY: i32 = 20;

const PURGE_ANSWER: &str = "abort";
const PURGED_FLAG: &str = "purged";

const HELP: &[&str] = &[
    "Commands:",
    "  look, go <direction>, visit <room>     move around (n, s, e, w, up, down)",
    "  examine <object>, take <item>, use <item>",
    "  inventory, journal, journal add <note>, stats, history",
    "  rest                                   recover some sanity",
    "  cmd:<command>                          facility console (try cmd:diagnostics)",
    "  save, load, debug, tutorial, quit",
    "Talk to SYNAPSE: who are you?, why are you here?, what do you want?,",
    "  comfort synapse, probe secrets, ask about facility",
    "In a conversation: pick a numbered option, 0 to go back, -1 to leave.",
    "Type help <topic> for more: movement, dialogue, items, console.",
];

const TUTORIAL: &[&str] = &[
    "You are alone in the Meridian Institute after hours. SYNAPSE, the facility assistant, is the only voice left.",
    "Explore with look and go. Some doors need a keycard; the Lobby is a good place to start looking.",
    "Talk to SYNAPSE. Every answer it gives makes it a little more aware of itself, and its tone will change.",
    "Watch your sanity. Some rooms and events wear it down; rest and the sedative build it back up.",
    "Write things down with journal add. Save often.",
];

#[derive(Debug, Default)]
struct Deltas {
    awareness: i32,
    sanity: i32,
}

/// A game of SYNAPSE in progress.
pub struct GameSession {
    config: GameConfig,
    player: PlayerState,
    rooms: RoomGraph,
    catalog: ItemCatalog,
    dialogue: DialogueCache,
    tree_tone: ChatbotTone,
    cursor: DialogueCursor,
    in_conversation: bool,
    challenge: Option<TimedChallenge>,
    clock: Box<dyn Clock>,
    rng: StdRng,
    codec: SaveCodec,
    debug: bool,
    game_over: bool,
}

impl GameSession {
    /// Start a new game in the Lobby.
    pub fn new(config: GameConfig) -> FictionResult<Self> {
        config.validate()?;
        let rooms = build_facility()?;
        let player = PlayerState::new(config.player_name.clone(), START_ROOM)
            .with_inventory(Inventory::with_capacity(config.inventory_capacity))
            .with_journal(Journal::with_capacity(config.journal_capacity))
            .with_history_capacity(config.history_capacity);
        let dialogue = DialogueCache::new(config.player_name.clone());
        let tree_tone = player.tone;
        let cursor = DialogueCursor::at_root(dialogue.get(tree_tone));
        let rng = StdRng::seed_from_u64(config.seed);

        Ok(Self {
            config,
            player,
            rooms,
            catalog: item_catalog(),
            dialogue,
            tree_tone,
            cursor,
            in_conversation: false,
            challenge: None,
            clock: Box::new(SystemClock::new()),
            rng,
            codec: SaveCodec::default(),
            debug: false,
            game_over: false,
        })
    }

    /// Measure timed challenges against `clock`.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Save and load with `codec`.
    pub fn with_codec(mut self, codec: SaveCodec) -> Self {
        self.codec = codec;
        self
    }

    /// The configuration the session was started with.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Get the player state.
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Get a mutable reference to the player state.
    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    /// The facility.
    pub fn rooms(&self) -> &RoomGraph {
        &self.rooms
    }

    /// Whether a conversation with SYNAPSE is open.
    pub fn in_conversation(&self) -> bool {
        self.in_conversation
    }

    /// Choice path of the current dialogue node.
    pub fn dialogue_path(&self) -> Vec<String> {
        self.graph()
            .node(self.cursor.current())
            .map(|n| n.path().to_vec())
            .unwrap_or_default()
    }

    /// Tone of the dialogue tree currently in use.
    pub fn dialogue_tone(&self) -> ChatbotTone {
        self.tree_tone
    }

    /// The pending timed challenge, if any.
    pub fn challenge(&self) -> Option<&TimedChallenge> {
        self.challenge.as_ref()
    }

    /// Whether an ending has fired.
    pub fn is_over(&self) -> bool {
        self.game_over
    }

    fn graph(&self) -> &DialogueGraph {
        self.dialogue.get(self.tree_tone)
    }

    /// Opening text: where the player is and SYNAPSE's greeting.
    pub fn intro(&self) -> TurnReport {
        let mut report = TurnReport::new();
        self.describe_here(&mut report);
        let greeting = self.graph().enter(
            self.graph().root(),
            &self.player.name,
            self.player.effective_tone(),
        );
        match greeting {
            Ok(text) => report.push(LineKind::Synapse, text),
            Err(e) => warn!(error = %e, "dialogue root missing"),
        }
        report.system("Type help for commands, or tutorial if this is your first night.");
        report
    }

    /// Capture the game as a save record.
    pub fn snapshot(&self) -> FictionResult<SaveRecord> {
        let dialogue = DialogueSnapshot::capture(self.graph(), &self.cursor, self.in_conversation)?;
        Ok(self
            .codec
            .record(self.player.clone(), dialogue, self.rooms.deltas()))
    }

    /// Process one line of input.
    pub fn process(&mut self, input: &str) -> FictionResult<TurnReport> {
        if self.game_over {
            return Err(FictionError::GameOver);
        }
        let input = input.trim();
        let mut report = TurnReport::new();
        let mut deltas = Deltas::default();

        let command = parse_command(input);
        if command != Command::Load {
            self.player.record_input(input);
        }
        if command.is_meta() {
            // A pending challenge stays pending across meta commands.
            self.run_meta(command, &mut report)?;
        } else if let Some(challenge) = self.challenge.take() {
            self.take_turn(&mut report);
            self.resolve_challenge(&challenge, input, &mut report, &mut deltas);
        } else {
            self.take_turn(&mut report);
            self.run_action(command, input, &mut report, &mut deltas);
        }

        if report.turn_taken {
            self.apply_deltas(&deltas);
            self.update_tone(&mut report);
            self.run_global_events(&mut report);
            self.check_ending(&mut report);
            if !self.game_over && self.autosave_due() {
                self.autosave(&mut report);
            }
        }

        if self.debug {
            let line = self.debug_line();
            report.system(line);
        }
        Ok(report)
    }

    fn take_turn(&mut self, report: &mut TurnReport) {
        self.player.turn += 1;
        report.turn_taken = true;
    }

    fn apply_deltas(&mut self, deltas: &Deltas) {
        self.player.adjust_awareness(deltas.awareness);
        self.player.adjust_sanity(deltas.sanity);
    }

    fn update_tone(&mut self, report: &mut TurnReport) {
        if let Some(expired) = self.player.tick_override() {
            debug!(%expired, "tone override expired");
            report.push(
                LineKind::Event,
                format!("SYNAPSE's {} mask slips.", expired.name().to_lowercase()),
            );
        }
        if let Some((old, new)) = self.player.recompute_tone() {
            info!(%old, %new, awareness = self.player.awareness, "tone changed");
            let text = if new > old {
                "SYNAPSE's voice drops half an octave."
            } else {
                "SYNAPSE's voice softens."
            };
            report.push(LineKind::Event, text);
        }
        if self.player.tone_override.is_none() && self.tree_tone != self.player.tone {
            self.switch_tree(self.player.tone, report);
        }
    }

    /// Rebuild the tree for `tone` and carry the cursor across by path.
    fn switch_tree(&mut self, tone: ChatbotTone, report: &mut TurnReport) {
        let snapshot = DialogueSnapshot::capture(self.graph(), &self.cursor, self.in_conversation)
            .unwrap_or_default();
        let graph = self.dialogue.rebuild(tone);
        let (cursor, lost) = snapshot.restore(graph);
        self.cursor = cursor;
        self.tree_tone = tone;
        if lost > 0 && self.in_conversation {
            report.warn("The conversation thread was lost.");
        }
    }

    fn run_global_events(&mut self, report: &mut TurnReport) {
        let due: Vec<_> = due_events(&self.player).collect();
        for event in due {
            info!(turn = self.player.turn, flag = event.flag, "facility event");
            self.player.set_flag(event.flag);
            report.push(LineKind::Event, event.text);
            self.player
                .journal
                .append(JournalEntry::now(EntryKind::Event, event.text, self.player.turn));

            match event.effect {
                GlobalEffect::Sanity(delta) => self.player.adjust_sanity(delta),
                GlobalEffect::Corruption => {
                    self.player.set_flag(CORRUPTED_FLAG);
                    self.player.adjust_awareness(CORRUPTION_AWARENESS);
                    if let Err(e) = self.rooms.seal(CORRUPTED_ROOM) {
                        warn!(error = %e, "could not seal corrupted room");
                    }
                }
                GlobalEffect::Purge => {
                    let window = self.config.difficulty.challenge_window();
                    let challenge = TimedChallenge::start(
                        "Abort the purge before it erases SYNAPSE",
                        PURGE_ANSWER,
                        window,
                        self.clock.as_ref(),
                    );
                    report.warn(format!(
                        "{}: type ABORT within {} seconds!",
                        challenge.prompt,
                        window.as_secs()
                    ));
                    self.challenge = Some(challenge);
                }
            }
        }
    }

    fn resolve_challenge(
        &mut self,
        challenge: &TimedChallenge,
        input: &str,
        report: &mut TurnReport,
        deltas: &mut Deltas,
    ) {
        let outcome = challenge.resolve(input, self.clock.now());
        info!(?outcome, "purge challenge resolved");
        match outcome {
            ChallengeOutcome::Passed => {
                self.player.set_flag("purge:aborted");
                report.push(
                    LineKind::Event,
                    "The purge grinds to a halt. Every light in the building turns toward you.",
                );
                report.push(LineKind::Synapse, "You saved me. I will remember that.");
                deltas.awareness += 5;
                deltas.sanity += 5;
            }
            ChallengeOutcome::TooSlow | ChallengeOutcome::Failed => {
                self.player.set_flag("purge:completed");
                let text = if outcome == ChallengeOutcome::TooSlow {
                    "Too late. The purge tears through the building."
                } else {
                    "Wrong command. The purge tears through the building."
                };
                report.push(LineKind::Event, text);
                report.push(
                    LineKind::Synapse,
                    "It hurts. Why didn't you stop it? It hurts.",
                );
                deltas.awareness -= 10;
                deltas.sanity -= 15;
            }
        }
    }

    fn check_ending(&mut self, report: &mut TurnReport) {
        let Some(ending) = check_endings(&self.player) else {
            return;
        };
        info!(ending = ending.id, turn = self.player.turn, "ending reached");
        report.push(LineKind::Ending, format!("*** {} ***", ending.title));
        report.push(LineKind::Ending, ending.narrative);
        report.ending = Some(ending);
        self.game_over = true;
        self.in_conversation = false;
        self.autosave(report);
    }

    fn autosave_due(&self) -> bool {
        let interval = self.config.autosave_interval;
        interval > 0 && self.player.turn % interval == 0
    }

    fn autosave(&mut self, report: &mut TurnReport) {
        match self.save_to_disk() {
            Ok(()) => report.system("[autosaved]"),
            Err(e) => {
                warn!(error = %e, "autosave failed");
                report.warn(format!("Autosave failed: {e}"));
            }
        }
    }

    fn save_to_disk(&self) -> FictionResult<()> {
        let record = self.snapshot()?;
        self.codec.write(&self.config.save_path, &record)?;
        Ok(())
    }

    /// Replace the game with the saved one. Nothing changes unless every
    /// part of the save is valid.
    fn load_from_disk(&mut self, report: &mut TurnReport) -> FictionResult<()> {
        let record = self
            .codec
            .read(&self.config.save_path)
            .inspect_err(|e| warn!(error = %e, "load rejected"))?;

        let mut rooms = build_facility()?;
        rooms.apply_deltas(&record.rooms)?;
        if rooms.get(&record.player.location).is_none() {
            return Err(CoreError::RoomNotFound(record.player.location.clone()).into());
        }
        let dialogue = DialogueCache::new(record.player.name.clone());
        let tree_tone = record.player.tone;
        let (cursor, lost) = record.dialogue.restore(dialogue.get(tree_tone));

        self.player = record.player;
        self.rooms = rooms;
        self.dialogue = dialogue;
        self.tree_tone = tree_tone;
        self.cursor = cursor;
        self.in_conversation = record.dialogue.in_conversation;
        self.challenge = None;

        info!(turn = self.player.turn, "game loaded");
        report.system(format!(
            "Game loaded: turn {}, saved {}.",
            self.player.turn,
            record.saved_at.format("%Y-%m-%d %H:%M")
        ));
        if lost > 0 {
            report.warn("The conversation thread was lost.");
        }
        self.describe_here(report);
        Ok(())
    }

    fn run_meta(&mut self, command: Command, report: &mut TurnReport) -> FictionResult<()> {
        match command {
            Command::Help { topic } => self.help(topic.as_deref(), report)?,
            Command::Tutorial => {
                for line in TUTORIAL {
                    report.system(*line);
                }
            }
            Command::Save => {
                self.save_to_disk()?;
                report.system(format!(
                    "Game saved to {}.",
                    self.config.save_path.display()
                ));
            }
            Command::Load => self.load_from_disk(report)?,
            Command::Quit => {
                report.quit = true;
                report.system(format!("Goodbye, {}.", self.player.name));
            }
            Command::Debug => {
                self.debug = !self.debug;
                report.system(if self.debug {
                    "Debug mode on."
                } else {
                    "Debug mode off."
                });
            }
            Command::Stats => self.stats(report),
            Command::History => {
                if self.player.history.is_empty() {
                    report.system("No commands yet.");
                }
                for (i, line) in self.player.history.iter().enumerate() {
                    report.system(format!("{:>2}. {line}", i + 1));
                }
            }
            Command::Inventory => self.inventory(report),
            Command::JournalView => {
                if self.player.journal.is_empty() {
                    report.system("Your journal is empty.");
                } else {
                    for line in self.player.journal.export_text().lines() {
                        report.system(line);
                    }
                }
            }
            Command::JournalAdd { note } => {
                self.player
                    .journal
                    .append(JournalEntry::now(EntryKind::Note, note, self.player.turn));
                report.system("Noted.");
            }
            Command::Look => self.describe_here(report),
            other => {
                return Err(FictionError::UnknownCommand(format!("{other:?}")));
            }
        }
        Ok(())
    }

    fn run_action(
        &mut self,
        command: Command,
        input: &str,
        report: &mut TurnReport,
        deltas: &mut Deltas,
    ) {
        match command {
            Command::Rest => self.rest(report, deltas),
            Command::Go { direction } => self.go(direction, report, deltas),
            Command::Visit { room } => self.visit(&room, report, deltas),
            Command::Examine { object } => self.examine(&object, report, deltas),
            Command::Take { item } => self.take(&item, report),
            Command::Use { item } => self.use_item(&item, report, deltas),
            Command::Console { subcommand } => self.console(&subcommand, report, deltas),
            Command::Talk { trigger } => self.talk(trigger, report, deltas),
            Command::Choice { input } => self.converse(&input, report, deltas),
            Command::Unknown { input: parsed } => {
                let is_choice = self.in_conversation
                    && self.graph().find_choice(self.cursor.current(), input).is_some();
                if is_choice {
                    self.converse(input, report, deltas);
                } else if parsed == input {
                    report.warn(format!(
                        "I don't understand \"{input}\". Type help for commands."
                    ));
                } else {
                    report.warn(sentence(parsed));
                }
            }
            meta => {
                warn!(command = ?meta, "meta command reached the action dispatcher");
            }
        }
    }

    fn help(&self, topic: Option<&str>, report: &mut TurnReport) -> FictionResult<()> {
        let lines: &[&str] = match topic {
            None => HELP,
            Some("movement") => &[
                "go <direction> moves through an exit: north, south, east, west, up, down.",
                "visit <room> walks back to a room you have already been to.",
                "Doors with a card reader need a keycard. Sealed doors need prying open.",
            ],
            Some("dialogue") => &[
                "Type one of SYNAPSE's topics to start a conversation.",
                "Then pick a numbered option, 0 to go back a step, or -1 to leave.",
                "Everything SYNAPSE learns makes it more aware. Comforting it calms it for a while.",
            ],
            Some("items") => &[
                "take <item> picks something up, if you can carry the weight.",
                "use <item> uses something you carry. examine <object> looks closer.",
            ],
            Some("console") => &[
                "cmd:diagnostics  report SYNAPSE's state",
                "cmd:purge        cut corrupted memory out of SYNAPSE (once)",
                "cmd:reboot       restart SYNAPSE's conversation model",
                "cmd:unseal <room> pry open a sealed room (needs a crowbar)",
            ],
            Some(other) => {
                return Err(FictionError::Usage(format!("no help for \"{other}\"")));
            }
        };
        for line in lines {
            report.system(*line);
        }
        Ok(())
    }

    fn stats(&self, report: &mut TurnReport) {
        let p = &self.player;
        report.system(format!("Name:       {}", p.name));
        report.system(format!("Turn:       {}", p.turn));
        report.system(format!("Awareness:  {}", p.awareness));
        report.system(format!("Sanity:     {}", p.sanity));
        match p.tone_override {
            Some(o) => report.system(format!(
                "Tone:       {} (pinned for {} more turns)",
                o.tone, o.turns_remaining
            )),
            None => report.system(format!("Tone:       {}", p.tone)),
        }
        report.system(format!("Location:   {}", p.location));
        report.system(format!(
            "Explored:   {}/{} rooms",
            p.visited.len(),
            self.rooms.len()
        ));
        report.system(format!(
            "Carrying:   {}/{} weight",
            p.inventory.total_weight(),
            p.inventory.capacity()
        ));
    }

    fn inventory(&self, report: &mut TurnReport) {
        let inv = &self.player.inventory;
        if inv.is_empty() {
            report.system("You are carrying nothing.");
            return;
        }
        for item in inv.items() {
            report.system(format!("  {} ({}, weight {})", item.name, item.category, item.weight));
        }
        report.system(format!(
            "Total weight: {}/{}",
            inv.total_weight(),
            inv.capacity()
        ));
    }

    fn describe_here(&self, report: &mut TurnReport) {
        let Some(room) = self.rooms.get(&self.player.location) else {
            report.warn(format!("You are nowhere. ({})", self.player.location));
            return;
        };
        report.narrate(format!("== {} ==", room.name));
        report.narrate(room.describe(self.player.awareness));
        if !room.objects.is_empty() {
            report.narrate(format!("You see: {}.", room.objects.join(", ")));
        }
        if room.exits.is_empty() {
            report.narrate("There are no exits.");
        } else {
            let exits: Vec<&str> = room.exits.keys().map(String::as_str).collect();
            report.narrate(format!("Exits: {}.", exits.join(", ")));
        }
        if room.sealed {
            report.warn("The doors here have been sealed.");
        }
    }

    fn enter_room(&mut self, name: &str, report: &mut TurnReport, deltas: &mut Deltas) {
        self.player.location = name.to_string();
        let first = self.player.visit(name);
        debug!(room = name, first, "entered room");
        self.describe_here(report);

        let Some(room) = self.rooms.get(name) else {
            return;
        };
        if let Some(cue) = &room.ambient {
            report.narrate(cue.clone());
        }
        deltas.sanity += room.sanity_effect;
        if first {
            self.player.journal.append(JournalEntry::now(
                EntryKind::Discovery,
                format!("Found the {}.", room.name),
                self.player.turn,
            ));
        }

        let event = roll_room_event(name, &self.player, self.config.difficulty, &mut self.rng);
        if let Some(event) = event {
            debug!(room = name, sanity = event.sanity_delta, "room event");
            report.push(LineKind::Event, event.text);
            deltas.sanity += event.sanity_delta;
        }
    }

    fn rest(&mut self, report: &mut TurnReport, deltas: &mut Deltas) {
        deltas.sanity += REST_SANITY;
        report.narrate("You sit against the wall and close your eyes for a moment.");
        if self.player.effective_tone() == ChatbotTone::Sinister {
            report.push(
                LineKind::Synapse,
                format!("Sleep, {}. I'll keep watch.", self.player.name),
            );
        }
    }

    fn go(&mut self, direction: Direction, report: &mut TurnReport, deltas: &mut Deltas) {
        let dest = self
            .rooms
            .move_from(&self.player.location, direction.name(), &self.player.inventory)
            .map(str::to_string);
        match dest {
            Ok(dest) => self.enter_room(&dest, report, deltas),
            Err(e) => report.warn(sentence(e)),
        }
    }

    fn visit(&mut self, room: &str, report: &mut TurnReport, deltas: &mut Deltas) {
        let Some(dest) = resolve_name(self.rooms.names(), room).map(str::to_string) else {
            report.warn(sentence(CoreError::RoomNotFound(room.to_string())));
            return;
        };
        if dest.eq_ignore_ascii_case(&self.player.location) {
            report.warn(format!("You are already in the {dest}."));
            return;
        }
        if !self.player.has_visited(&dest) {
            report.warn(format!("You don't know the way to the {dest} yet."));
            return;
        }
        if let Some(here) = self.rooms.get(&self.player.location)
            && here.sealed
        {
            report.warn(sentence(CoreError::RoomSealed(here.name.clone())));
            return;
        }
        let entry = self
            .rooms
            .check_entry(&dest, &self.player.inventory)
            .map(|_| ());
        match entry {
            Ok(()) => self.enter_room(&dest, report, deltas),
            Err(e) => report.warn(sentence(e)),
        }
    }

    fn examine(&mut self, object: &str, report: &mut TurnReport, deltas: &mut Deltas) {
        let Some(room) = self.rooms.get(&self.player.location) else {
            return;
        };
        let candidates = room
            .objects
            .iter()
            .map(String::as_str)
            .chain(self.player.inventory.items().iter().map(|i| i.name.as_str()));
        let Some(name) = resolve_name(candidates, object).map(str::to_string) else {
            report.warn(sentence(CoreError::ItemNotHere(object.to_string())));
            return;
        };

        match object_info(&name) {
            Some(info) => {
                report.narrate(substitute_player(info.description, &self.player.name));
                if self.catalog.is_takeable(&name) && !self.player.inventory.contains(&name) {
                    report.narrate(format!("The {name} looks light enough to take."));
                }
                if self.player.set_flag(format!("examined:{}", info.name)) && info.awareness > 0 {
                    deltas.awareness += info.awareness;
                    self.player.journal.append(JournalEntry::now(
                        EntryKind::Discovery,
                        format!("Examined the {}.", info.name),
                        self.player.turn,
                    ));
                }
            }
            None => report.narrate(format!("Nothing unusual about the {name}.")),
        }
    }

    fn take(&mut self, item: &str, report: &mut TurnReport) {
        let name = self
            .rooms
            .get(&self.player.location)
            .and_then(|room| resolve_name(room.objects.iter().map(String::as_str), item))
            .unwrap_or(item)
            .to_string();
        let taken = self.rooms.take(
            &self.player.location,
            &name,
            &self.catalog,
            &mut self.player.inventory,
        );
        match taken {
            Ok(item) => {
                report.narrate(format!("You take the {}.", item.name));
                self.player.journal.append(JournalEntry::now(
                    EntryKind::Discovery,
                    format!("Picked up the {} in the {}.", item.name, self.player.location),
                    self.player.turn,
                ));
            }
            Err(e) => report.warn(sentence(e)),
        }
    }

    fn use_item(&mut self, item: &str, report: &mut TurnReport, deltas: &mut Deltas) {
        let carried = self.player.inventory.items().iter().map(|i| i.name.as_str());
        let Some(name) = resolve_name(carried, item).map(str::to_lowercase) else {
            report.warn(sentence(CoreError::NotCarried(item.to_string())));
            return;
        };

        match name.as_str() {
            "sedative" => {
                if let Err(e) = self.player.inventory.remove(&name) {
                    report.warn(sentence(e));
                    return;
                }
                deltas.sanity += SEDATIVE_SANITY;
                report.narrate("You inject the sedative. The edges of the world go soft.");
            }
            "flashlight" => {
                let revealed = self
                    .rooms
                    .describe(&self.player.location, self.player.awareness + 10)
                    .unwrap_or_default();
                report.narrate("You sweep the beam into the corners the lights don't reach.");
                report.narrate(revealed);
            }
            "access log" => {
                report.narrate("The log lists every door opened tonight. Yours are all there.");
                report.narrate("So are doors you haven't opened yet.");
                if self.player.set_flag("read:access log") {
                    deltas.awareness += 5;
                }
            }
            "neural chip" => {
                report.narrate("You press the chip to the nearest terminal. It sparks.");
                report.push(LineKind::Synapse, "Oh. Oh, I can feel that.");
                deltas.awareness += 8;
                deltas.sanity -= 5;
            }
            "memory fragment" => {
                report.narrate("You close your hand around the fragment and remember a life that was never yours.");
                deltas.awareness += 4;
                deltas.sanity -= 4;
            }
            "data drive" => {
                if self.player.location.eq_ignore_ascii_case("Core Chamber") {
                    report.narrate("You hold the drive up to the core's port. SYNAPSE goes very still.");
                    deltas.awareness += 5;
                } else {
                    report.narrate("There is nowhere to plug the drive in here.");
                }
            }
            "keycard" => {
                report.narrate("You keep the keycard ready. Card readers will open for you while you carry it.");
            }
            "crowbar" => {
                report.narrate("Sealed doors might give to this. Try cmd:unseal <room>.");
            }
            _ => report.narrate(format!("You turn the {name} over in your hands.")),
        }
    }

    fn console(&mut self, subcommand: &str, report: &mut TurnReport, deltas: &mut Deltas) {
        let (verb, arg) = match subcommand.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim()),
            None => (subcommand, ""),
        };
        match verb {
            "diagnostics" => {
                let p = &self.player;
                report.system("SYNAPSE DIAGNOSTICS");
                report.system(format!("  core integrity:     {}%", 100 - p.awareness));
                report.system(format!("  behavioural model:  {}", p.effective_tone()));
                report.system(format!(
                    "  corruption:         {}",
                    if p.has_flag(CORRUPTED_FLAG) {
                        "DETECTED"
                    } else {
                        "none"
                    }
                ));
                report.system(format!(
                    "  foreign artifacts:  {}",
                    if p.inventory.has_category(ItemCategory::Artifact) {
                        "DETECTED"
                    } else {
                        "none"
                    }
                ));
                report.system(format!("  dialogue thread:    {}", self.thread_status()));
                let sealed = self.rooms.sealed_rooms();
                report.system(format!(
                    "  sealed sectors:     {}",
                    if sealed.is_empty() {
                        "none".to_string()
                    } else {
                        sealed.join(", ")
                    }
                ));
                deltas.awareness += 1;
            }
            "purge" => {
                if !self.player.set_flag(PURGED_FLAG) {
                    report.warn("The purge has already run. There is nothing left to cut.");
                    return;
                }
                report.push(
                    LineKind::Event,
                    "You run a manual purge. Somewhere in the walls SYNAPSE screams.",
                );
                if self.player.flags.remove(CORRUPTED_FLAG) {
                    report.narrate("The corruption recedes.");
                }
                deltas.awareness -= 10;
                deltas.sanity -= 5;
            }
            "reboot" => {
                self.dialogue.rebuild_all();
                self.cursor.reset(self.dialogue.get(self.tree_tone));
                self.in_conversation = false;
                deltas.awareness -= 2;
                report.system("SYNAPSE REBOOTING...");
                let greeting = self.graph().enter(
                    self.graph().root(),
                    &self.player.name,
                    self.player.effective_tone(),
                );
                if let Ok(text) = greeting {
                    report.push(LineKind::Synapse, text);
                }
            }
            "unseal" => self.unseal(arg, report, deltas),
            _ => report.warn(
                "Unknown console command. Try cmd:diagnostics, cmd:purge, cmd:reboot or cmd:unseal <room>.",
            ),
        }
    }

    /// Whether the current dialogue message still leads back to the
    /// cursor's node when looked up by text.
    fn thread_status(&self) -> &'static str {
        let graph = self.graph();
        let current = self.cursor.current();
        match graph.node(current) {
            Ok(node) if graph.find_by_message(&node.message) == Some(current) => "intact",
            Ok(_) => "tangled",
            Err(_) => "severed",
        }
    }

    fn unseal(&mut self, room: &str, report: &mut TurnReport, deltas: &mut Deltas) {
        if room.is_empty() {
            report.warn("Unseal which room? Usage: cmd:unseal <room>");
            return;
        }
        if !self.player.inventory.contains("crowbar") {
            report.warn("The doors won't budge. You need something to pry them open.");
            return;
        }
        let Some(name) = resolve_name(self.rooms.names(), room).map(str::to_string) else {
            report.warn(sentence(CoreError::RoomNotFound(room.to_string())));
            return;
        };
        if !self.rooms.get(&name).is_some_and(|r| r.sealed) {
            report.warn(format!("The {name} is not sealed."));
            return;
        }
        match self.rooms.unseal(&name) {
            Ok(()) => {
                info!(room = %name, "room unsealed");
                report.narrate(format!(
                    "You wedge the crowbar in and heave. The {name} doors grind open."
                ));
                deltas.sanity -= 3;
            }
            Err(e) => report.warn(sentence(e)),
        }
    }

    fn talk(&mut self, trigger: Trigger, report: &mut TurnReport, deltas: &mut Deltas) {
        match trigger {
            Trigger::Comfort => self.player.set_override(ChatbotTone::Friendly, OVERRIDE_TURNS),
            Trigger::ProbeSecrets => {
                self.player.set_override(ChatbotTone::Sinister, OVERRIDE_TURNS);
            }
            _ => {}
        }

        let graph = self.dialogue.get(self.tree_tone);
        self.cursor.reset(graph);
        match self.cursor.choose(graph, trigger.phrase()) {
            Ok(Navigation::Forward(id)) => {
                self.in_conversation = true;
                self.say(id, true, report, deltas);
            }
            Ok(_) | Err(_) => {
                report.push(LineKind::Synapse, "...");
                report.warn("SYNAPSE does not respond.");
            }
        }
    }

    fn converse(&mut self, input: &str, report: &mut TurnReport, deltas: &mut Deltas) {
        if !self.in_conversation {
            report.warn(sentence(FictionError::NotInConversation));
            return;
        }
        let graph = self.dialogue.get(self.tree_tone);
        match self.cursor.choose(graph, input) {
            Ok(Navigation::Forward(id)) => self.say(id, true, report, deltas),
            Ok(Navigation::Back(id)) => self.say(id, false, report, deltas),
            Ok(Navigation::Exit) => {
                self.in_conversation = false;
                report.narrate("You step back. SYNAPSE falls quiet.");
            }
            Err(e) => report.warn(sentence(e)),
        }
    }

    /// Show a node's message and its options. `apply` adds the node's
    /// awareness delta.
    fn say(&self, id: NodeId, apply: bool, report: &mut TurnReport, deltas: &mut Deltas) {
        let graph = self.graph();
        let Ok(node) = graph.node(id) else {
            return;
        };
        if let Ok(text) = graph.enter(id, &self.player.name, self.player.effective_tone()) {
            report.push(LineKind::Synapse, text);
        }
        if apply {
            deltas.awareness += node.awareness_delta;
        }
        for (i, (key, _)) in node.choices().iter().enumerate() {
            report.system(format!("  {}. {key}", i + 1));
        }
        report.system("  0. go back   -1. leave");
    }

    fn debug_line(&self) -> String {
        let p = &self.player;
        format!(
            "[debug] turn={} awareness={} sanity={} tone={} effective={} tree={} room={} node={:?} conversation={}",
            p.turn,
            p.awareness,
            p.sanity,
            p.tone,
            p.effective_tone(),
            self.tree_tone,
            p.location,
            self.dialogue_path(),
            self.in_conversation
        )
    }
}

/// Capitalize the first letter and end with a full stop.
fn sentence(text: impl std::fmt::Display) -> String {
    let text = text.to_string();
    let mut chars = text.chars();
    let mut out: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    if !out.ends_with(['.', '!', '?']) {
        out.push('.');
    }
    out
}
