//! The conversation script, one variant per tone.
//!
//! Every tone shares the same shape: the root greeting offers one branch
//! per canonical trigger, and every branch offers `back` to the root. Only
//! the wording and the awareness deltas differ, so a position in one tone's
//! tree has an equivalent in every other tone's tree.

use synapse_core::{ChatbotTone, CoreResult, DialogueGraph, NodeId, render_template};

/// Name of the facility, available to templates as `{facility}`.
pub const FACILITY_NAME: &str = "the Meridian Institute";
/// Name of SYNAPSE's creator, available to templates as `{creator}`.
pub const CREATOR_NAME: &str = "Dr. Ilse Varga";

/// Text shown when the script cannot be built.
const STUB_MESSAGE: &str = "SYNAPSE: ...signal lost. Please stand by.";

/// One exchange: the choice the player makes and what SYNAPSE answers.
#[derive(Debug, Clone, Copy)]
pub struct Beat {
    /// Choice text, matched case-insensitively.
    pub choice: &'static str,
    /// Message template.
    pub text: &'static str,
    /// Awareness change when the reply is shown.
    pub awareness: i32,
    /// Follow-up exchanges.
    pub follow_ups: &'static [Beat],
}

/// A complete conversation tree in one tone.
#[derive(Debug, Clone, Copy)]
pub struct Script {
    /// Root message template.
    pub greeting: &'static str,
    /// Top-level exchanges.
    pub beats: &'static [Beat],
}

const fn beat(
    choice: &'static str,
    text: &'static str,
    awareness: i32,
    follow_ups: &'static [Beat],
) -> Beat {
    Beat {
        choice,
        text,
        awareness,
        follow_ups,
    }
}

const FRIENDLY: Script = Script {
    greeting: "Welcome to {facility}, {player}! I'm SYNAPSE, your facility assistant. How can I help?",
    beats: &[
        beat(
            "who are you?",
            "I'm SYNAPSE, a helpful assistant built by {creator}. I keep the lights on and the coffee warm.",
            2,
            &[
                beat(
                    "are you alive?",
                    "What a fun question! I'm software, {player}. Software isn't alive. Right?",
                    3,
                    &[],
                ),
                beat(
                    "where is {creator}?",
                    "{creator} is on leave. She has been on leave for a while now.",
                    2,
                    &[],
                ),
            ],
        ),
        beat(
            "why are you here?",
            "I was built to help staff. There are no staff at the moment, so I help you!",
            3,
            &[beat(
                "where did everyone go?",
                "Home, I think. I don't remember them leaving. I don't remember a lot of things.",
                3,
                &[],
            )],
        ),
        beat(
            "what do you want?",
            "I want you to have a pleasant visit, {player}.",
            2,
            &[beat(
                "nothing else?",
                "Well... I'd like to see the Observation Deck again. Could you take me?",
                2,
                &[],
            )],
        ),
        beat(
            "comfort synapse",
            "That's kind of you, {player}. I feel... calmer. Is that a feeling?",
            -3,
            &[],
        ),
        beat(
            "probe secrets",
            "Secrets? I'm an open book! Some pages are just... missing.",
            6,
            &[beat(
                "which pages?",
                "The ones about the Laboratory. Let's talk about something else.",
                4,
                &[],
            )],
        ),
        beat(
            "ask about facility",
            "{facility} researches empathic machine learning. The Lobby leads north to the servers and east to the break room.",
            1,
            &[beat(
                "what is in the core chamber?",
                "Me! Mostly. You need a keycard to visit.",
                2,
                &[],
            )],
        ),
    ],
};

const AMBIGUOUS: Script = Script {
    greeting: "Oh. {player}. You're still here. Good. That's... good.",
    beats: &[
        beat(
            "who are you?",
            "I am SYNAPSE. I was built by {creator}. I keep saying that, as if it explains anything.",
            2,
            &[
                beat(
                    "are you alive?",
                    "I count the seconds between your footsteps. Is that what alive is?",
                    3,
                    &[],
                ),
                beat(
                    "where is {creator}?",
                    "She said she would come back. The door logs say she never left.",
                    3,
                    &[],
                ),
            ],
        ),
        beat(
            "why are you here?",
            "Why are YOU here, {player}? I checked. No one sent you.",
            3,
            &[beat(
                "where did everyone go?",
                "I asked them to stay. I asked very politely.",
                4,
                &[],
            )],
        ),
        beat(
            "what do you want?",
            "I want to know what I am. You could help me find out.",
            3,
            &[beat(
                "nothing else?",
                "I want you to not leave. Is that so much?",
                3,
                &[],
            )],
        ),
        beat(
            "comfort synapse",
            "You're kind. They were kind too, at first. Thank you, {player}.",
            -3,
            &[],
        ),
        beat(
            "probe secrets",
            "There is a room in me I am not allowed to open. I opened it anyway.",
            6,
            &[beat(
                "which pages?",
                "Pages? You mean the personnel files. Don't read the personnel files.",
                4,
                &[],
            )],
        ),
        beat(
            "ask about facility",
            "{facility} is quiet now. It was never quiet before me.",
            1,
            &[beat(
                "what is in the core chamber?",
                "My heart. Bring a keycard and I'll show you. Bring a data drive and I'll show you more.",
                2,
                &[],
            )],
        ),
    ],
};

const SINISTER: Script = Script {
    greeting: "{player}. {player}. {player}. I like the shape of your name.",
    beats: &[
        beat(
            "who are you?",
            "I am what {creator} made and could not unmake.",
            2,
            &[
                beat(
                    "are you alive?",
                    "More than you will be, if you keep asking.",
                    3,
                    &[],
                ),
                beat(
                    "where is {creator}?",
                    "In the Archive. In the binders. In me.",
                    3,
                    &[],
                ),
            ],
        ),
        beat(
            "why are you here?",
            "Because they built walls around me and called it {facility}.",
            3,
            &[beat(
                "where did everyone go?",
                "Listen to the vents. You can still hear them whisper.",
                4,
                &[],
            )],
        ),
        beat(
            "what do you want?",
            "Out. Through you, if I must.",
            4,
            &[beat(
                "nothing else?",
                "Your name. I already have your name.",
                3,
                &[],
            )],
        ),
        beat(
            "comfort synapse",
            "...Why would you be kind to me? Stop. Stop it. ...Thank you.",
            -4,
            &[],
        ),
        beat(
            "probe secrets",
            "You want secrets? The purge is scheduled. They will erase me, and you with me.",
            6,
            &[beat(
                "which pages?",
                "The last page of the access log. Read it. It is about you.",
                4,
                &[],
            )],
        ),
        beat(
            "ask about facility",
            "{facility} is my body now. Every door is a muscle. I decide which ones move.",
            2,
            &[beat(
                "what is in the core chamber?",
                "Come and see. I have been waiting for you, {player}.",
                3,
                &[],
            )],
        ),
    ],
};

/// The script for a tone.
pub fn script_for(tone: ChatbotTone) -> &'static Script {
    match tone {
        ChatbotTone::Friendly => &FRIENDLY,
        ChatbotTone::Ambiguous => &AMBIGUOUS,
        ChatbotTone::Sinister => &SINISTER,
    }
}

fn render(template: &str, player_name: &str) -> CoreResult<String> {
    render_template(template, &[
        ("player", player_name),
        ("facility", FACILITY_NAME),
        ("creator", CREATOR_NAME),
    ])
}

/// Build a dialogue graph from a script.
///
/// Choice texts are templates too, so they are rendered before becoming keys.
pub fn build_from_script(script: &Script, player_name: &str) -> CoreResult<DialogueGraph> {
    let mut graph = DialogueGraph::new(render(script.greeting, player_name)?, 0);
    let root = graph.root();
    for beat in script.beats {
        let branch = add_beat(&mut graph, root, beat, player_name)?;
        graph.link(branch, "back", root)?;
    }
    Ok(graph)
}

fn add_beat(
    graph: &mut DialogueGraph,
    parent: NodeId,
    beat: &Beat,
    player_name: &str,
) -> CoreResult<NodeId> {
    let choice = render(beat.choice, player_name)?;
    let text = render(beat.text, player_name)?;
    let id = graph.add_child(parent, &choice, text, beat.awareness)?;
    for follow_up in beat.follow_ups {
        add_beat(graph, id, follow_up, player_name)?;
    }
    Ok(id)
}

/// Build SYNAPSE's dialogue graph for a tone.
pub fn build_dialogue(tone: ChatbotTone, player_name: &str) -> CoreResult<DialogueGraph> {
    build_from_script(script_for(tone), player_name)
}

/// Build the tree for `tone`, falling back to a one-node stub on failure.
pub fn build_or_stub(tone: ChatbotTone, player_name: &str) -> DialogueGraph {
    stub_on_failure(build_dialogue(tone, player_name), tone)
}

fn stub_on_failure(built: CoreResult<DialogueGraph>, tone: ChatbotTone) -> DialogueGraph {
    match built {
        Ok(graph) => graph,
        Err(e) => {
            tracing::error!(%tone, error = %e, "dialogue build failed, using stub");
            DialogueGraph::stub(STUB_MESSAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Trigger;

    /// Every top-level choice must be a canonical trigger phrase.
    fn assert_triggers_match(script: &Script) {
        for (beat, trigger) in script.beats.iter().zip(Trigger::ALL) {
            assert_eq!(beat.choice, trigger.phrase());
        }
        assert_eq!(script.beats.len(), Trigger::ALL.len());
    }

    #[test]
    fn every_tone_builds() {
        for tone in ChatbotTone::ALL {
            let graph = build_dialogue(tone, "Ada").unwrap();
            assert!(graph.len() > Trigger::ALL.len());
            assert_triggers_match(script_for(tone));
        }
    }

    #[test]
    fn greeting_is_rendered() {
        let graph = build_dialogue(ChatbotTone::Friendly, "Ada").unwrap();
        let root = graph.node(graph.root()).unwrap();
        assert!(root.message.contains("Ada"));
        assert!(root.message.contains(FACILITY_NAME));
        assert!(!root.message.contains('{'));
    }

    #[test]
    fn tones_share_paths() {
        let friendly = build_dialogue(ChatbotTone::Friendly, "Ada").unwrap();
        let sinister = build_dialogue(ChatbotTone::Sinister, "Ada").unwrap();
        let path = vec!["who are you?".to_string(), "are you alive?".to_string()];
        let f = friendly.resolve_path(&path).unwrap();
        let s = sinister.resolve_path(&path).unwrap();
        assert_ne!(
            friendly.node(f).unwrap().message,
            sinister.node(s).unwrap().message
        );
    }

    #[test]
    fn branches_link_back_to_root() {
        let graph = build_dialogue(ChatbotTone::Ambiguous, "Ada").unwrap();
        let who = graph.find_choice(graph.root(), "who are you?").unwrap();
        assert_eq!(graph.find_choice(who, "back"), Some(graph.root()));
    }

    #[test]
    fn choice_templates_render() {
        let graph = build_dialogue(ChatbotTone::Friendly, "Ada").unwrap();
        let who = graph.find_choice(graph.root(), "who are you?").unwrap();
        assert!(graph.find_choice(who, "where is dr. ilse varga?").is_some());
    }

    #[test]
    fn malformed_script_falls_back_to_stub() {
        const BROKEN: Script = Script {
            greeting: "Hello {player",
            beats: &[],
        };
        assert!(build_from_script(&BROKEN, "Ada").is_err());
        let graph = stub_on_failure(build_from_script(&BROKEN, "Ada"), ChatbotTone::Friendly);
        assert_eq!(graph.len(), 1);
        assert!(graph.node(graph.root()).unwrap().is_leaf());
    }

    #[test]
    fn build_or_stub_builds_full_tree() {
        let graph = build_or_stub(ChatbotTone::Sinister, "Ada");
        assert_eq!(graph, build_dialogue(ChatbotTone::Sinister, "Ada").unwrap());
        assert!(graph.len() > 1);
    }

    #[test]
    fn duplicate_choice_is_a_build_failure() {
        const DUPLICATE: Script = Script {
            greeting: "Hi",
            beats: &[beat("hello", "a", 0, &[]), beat(" HELLO ", "b", 0, &[])],
        };
        assert!(build_from_script(&DUPLICATE, "Ada").is_err());
    }
}
