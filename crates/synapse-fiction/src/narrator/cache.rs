//! One dialogue tree per tone, and positions that survive rebuilds.

use serde::{Deserialize, Serialize};
use synapse_core::{ChatbotTone, CoreResult, DialogueCursor, DialogueGraph};

use super::script::build_or_stub;

fn slot(tone: ChatbotTone) -> usize {
    match tone {
        ChatbotTone::Friendly => 0,
        ChatbotTone::Ambiguous => 1,
        ChatbotTone::Sinister => 2,
    }
}

/// Owns SYNAPSE's dialogue tree for every tone.
#[derive(Debug, Clone)]
pub struct DialogueCache {
    player_name: String,
    trees: [DialogueGraph; 3],
}

impl DialogueCache {
    /// Build every tone's tree for `player_name`.
    pub fn new(player_name: impl Into<String>) -> Self {
        let player_name = player_name.into();
        let trees = ChatbotTone::ALL.map(|tone| build_or_stub(tone, &player_name));
        Self { player_name, trees }
    }

    /// The tree for a tone.
    pub fn get(&self, tone: ChatbotTone) -> &DialogueGraph {
        &self.trees[slot(tone)]
    }

    /// Throw away a tone's tree and build it again.
    pub fn rebuild(&mut self, tone: ChatbotTone) -> &DialogueGraph {
        tracing::debug!(%tone, "rebuilding dialogue tree");
        let fresh = build_or_stub(tone, &self.player_name);
        let slot = slot(tone);
        self.trees[slot] = fresh;
        &self.trees[slot]
    }

    /// Rebuild every tree.
    pub fn rebuild_all(&mut self) {
        for tone in ChatbotTone::ALL {
            self.rebuild(tone);
        }
    }
}

/// A dialogue position expressed as choice paths, independent of node
/// handles and of the displayed text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueSnapshot {
    /// Path of the current node.
    pub current: Vec<String>,
    /// Paths of the back stack, oldest first.
    pub back: Vec<Vec<String>>,
    /// Whether a conversation was open.
    pub in_conversation: bool,
}

impl DialogueSnapshot {
    /// Capture the cursor's position in `graph`.
    pub fn capture(
        graph: &DialogueGraph,
        cursor: &DialogueCursor,
        in_conversation: bool,
    ) -> CoreResult<Self> {
        let current = graph.node(cursor.current())?.path().to_vec();
        let back = cursor
            .back_stack()
            .iter()
            .map(|&id| graph.node(id).map(|n| n.path().to_vec()))
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self {
            current,
            back,
            in_conversation,
        })
    }

    /// Place a cursor in `graph` at the captured position.
    ///
    /// Back-stack entries that no longer resolve are dropped. If the
    /// current node no longer resolves the cursor starts over at the root.
    /// Returns the cursor and the number of entries that were lost.
    pub fn restore(&self, graph: &DialogueGraph) -> (DialogueCursor, usize) {
        let back: Vec<_> = self
            .back
            .iter()
            .filter_map(|path| graph.resolve_path(path))
            .collect();
        let mut lost = self.back.len() - back.len();

        let cursor = match graph.resolve_path(&self.current) {
            Some(current) => DialogueCursor::restore(current, back),
            None => {
                lost += 1 + back.len();
                DialogueCursor::at_root(graph)
            }
        };
        (cursor, lost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synapse_core::Navigation;

    #[test]
    fn cache_holds_every_tone() {
        let cache = DialogueCache::new("Ada");
        for tone in ChatbotTone::ALL {
            assert!(cache.get(tone).len() > 1);
        }
        assert_ne!(
            cache.get(ChatbotTone::Friendly),
            cache.get(ChatbotTone::Sinister)
        );
    }

    #[test]
    fn rebuild_produces_an_equal_tree() {
        let mut cache = DialogueCache::new("Ada");
        let before = cache.get(ChatbotTone::Ambiguous).clone();
        assert_eq!(cache.rebuild(ChatbotTone::Ambiguous), &before);
    }

    #[test]
    fn snapshot_moves_between_tones() {
        let cache = DialogueCache::new("Ada");
        let friendly = cache.get(ChatbotTone::Friendly);
        let mut cursor = DialogueCursor::at_root(friendly);
        cursor.choose(friendly, "who are you?").unwrap();
        assert!(matches!(
            cursor.choose(friendly, "are you alive?").unwrap(),
            Navigation::Forward(_)
        ));

        let snap = DialogueSnapshot::capture(friendly, &cursor, true).unwrap();
        assert_eq!(snap.current, vec!["who are you?", "are you alive?"]);
        assert_eq!(snap.back.len(), 2);

        let sinister = cache.get(ChatbotTone::Sinister);
        let (restored, lost) = snap.restore(sinister);
        assert_eq!(lost, 0);
        assert_eq!(
            sinister.node(restored.current()).unwrap().path(),
            snap.current.as_slice()
        );
        assert_eq!(restored.back_stack().len(), 2);
    }

    #[test]
    fn unresolved_entries_are_dropped() {
        let cache = DialogueCache::new("Ada");
        let graph = cache.get(ChatbotTone::Friendly);
        let snap = DialogueSnapshot {
            current: vec!["who are you?".into(), "no such question".into()],
            back: vec![vec![], vec!["who are you?".into()], vec!["gone".into()]],
            in_conversation: true,
        };
        let (cursor, lost) = snap.restore(graph);
        assert!(cursor.is_at_root(graph));
        assert_eq!(lost, 4);

        let snap = DialogueSnapshot {
            current: vec!["who are you?".into()],
            back: vec![vec![], vec!["gone".into()]],
            in_conversation: true,
        };
        let (cursor, lost) = snap.restore(graph);
        assert_eq!(lost, 1);
        assert_eq!(cursor.back_stack(), &[graph.root()]);
    }
}
