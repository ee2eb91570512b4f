//! Dialogue graph and navigation.
//!
//! Nodes live in an arena and are addressed by [`NodeId`], so a choice may
//! point back at an ancestor (or at its own node) without ownership cycles.
//! Every node created with [`DialogueGraph::add_child`] records the path of
//! choice keys that leads to it from the root. The path is independent of
//! the displayed text, which lets a saved position survive a rebuild of
//! the tree in a different tone.

use crate::error::{CoreError, CoreResult};
use crate::template::substitute_player;
use crate::tone::ChatbotTone;

/// Handle to a node inside one [`DialogueGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in its arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Normalize player-visible choice text into a lookup key.
pub fn normalize_key(text: &str) -> String {
    text.trim().to_lowercase()
}

/// One line of conversation and the choices that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueNode {
    /// Text shown when the node is entered. May contain `{player}`.
    pub message: String,
    /// Awareness change the turn loop applies when the node is entered.
    pub awareness_delta: i32,
    choices: Vec<(String, NodeId)>,
    path: Vec<String>,
}

impl DialogueNode {
    /// Choices in declaration order as `(normalized key, target)`.
    pub fn choices(&self) -> &[(String, NodeId)] {
        &self.choices
    }

    /// Choice keys leading from the root to this node.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Whether the node offers no choices.
    pub fn is_leaf(&self) -> bool {
        self.choices.is_empty()
    }
}

/// A tree of dialogue nodes (with optional back-edges) rooted at node 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueGraph {
    nodes: Vec<DialogueNode>,
}

impl DialogueGraph {
    /// Create a graph containing only a root node.
    pub fn new(root_message: impl Into<String>, awareness_delta: i32) -> Self {
        Self {
            nodes: vec![DialogueNode {
                message: root_message.into(),
                awareness_delta,
                choices: Vec::new(),
                path: Vec::new(),
            }],
        }
    }

    /// The one-node fallback tree used when a build fails.
    pub fn stub(message: impl Into<String>) -> Self {
        Self::new(message, 0)
    }

    /// The root node handle.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a graph has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node.
    pub fn node(&self, id: NodeId) -> CoreResult<&DialogueNode> {
        self.nodes.get(id.0).ok_or(CoreError::NodeNotFound(id.0))
    }

    fn node_mut(&mut self, id: NodeId) -> CoreResult<&mut DialogueNode> {
        self.nodes.get_mut(id.0).ok_or(CoreError::NodeNotFound(id.0))
    }

    fn push_choice(&mut self, parent: NodeId, key: String, target: NodeId) -> CoreResult<()> {
        let node = self.node_mut(parent)?;
        if node.choices.iter().any(|(k, _)| *k == key) {
            return Err(CoreError::DuplicateChoice(key));
        }
        node.choices.push((key, target));
        Ok(())
    }

    /// Create a new node reachable from `parent` through `choice`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        choice: &str,
        message: impl Into<String>,
        awareness_delta: i32,
    ) -> CoreResult<NodeId> {
        let key = normalize_key(choice);
        let parent_node = self.node(parent)?;
        if parent_node.choices.iter().any(|(k, _)| *k == key) {
            return Err(CoreError::DuplicateChoice(key));
        }
        let mut path = parent_node.path.clone();
        path.push(key.clone());

        let id = NodeId(self.nodes.len());
        self.nodes.push(DialogueNode {
            message: message.into(),
            awareness_delta,
            choices: Vec::new(),
            path,
        });
        self.push_choice(parent, key, id)?;
        Ok(id)
    }

    /// Add a choice on `parent` pointing at an existing node (for example
    /// "back" to the root). Does not change the target's path.
    pub fn link(&mut self, parent: NodeId, choice: &str, target: NodeId) -> CoreResult<()> {
        self.node(target)?;
        self.push_choice(parent, normalize_key(choice), target)
    }

    /// Look up a choice by its exact (normalized) text.
    pub fn find_choice(&self, id: NodeId, input: &str) -> Option<NodeId> {
        let key = normalize_key(input);
        self.node(id)
            .ok()?
            .choices
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, target)| *target)
    }

    /// Display text for a node: player name substituted, tone marker appended.
    pub fn enter(&self, id: NodeId, player_name: &str, tone: ChatbotTone) -> CoreResult<String> {
        let node = self.node(id)?;
        Ok(format!(
            "{}{}",
            substitute_player(&node.message, player_name),
            tone.suffix()
        ))
    }

    /// Walk `path` from the root.
    pub fn resolve_path(&self, path: &[String]) -> Option<NodeId> {
        let mut current = self.root();
        for key in path {
            current = self.find_choice(current, key)?;
        }
        Some(current)
    }

    /// Depth-first search for the first node whose message equals `text`.
    pub fn find_by_message(&self, text: &str) -> Option<NodeId> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut seen[id.0], true) {
                continue;
            }
            let node = &self.nodes[id.0];
            if node.message == text {
                return Some(id);
            }
            // Reverse so the first choice is explored first.
            stack.extend(node.choices.iter().rev().map(|(_, t)| *t));
        }
        None
    }
}

/// Outcome of a successful [`DialogueCursor::choose`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Moved to a child; the previous node was pushed on the back stack.
    Forward(NodeId),
    /// Popped the back stack.
    Back(NodeId),
    /// Left the conversation: back stack cleared, cursor at the root.
    Exit,
}

/// Current position in a dialogue graph plus the back-navigation stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueCursor {
    current: NodeId,
    back: Vec<NodeId>,
}

impl DialogueCursor {
    /// A cursor at the graph's root with an empty history.
    pub fn at_root(graph: &DialogueGraph) -> Self {
        Self {
            current: graph.root(),
            back: Vec::new(),
        }
    }

    /// A cursor at an arbitrary position.
    pub fn restore(current: NodeId, back: Vec<NodeId>) -> Self {
        Self { current, back }
    }

    /// The node the cursor points at.
    pub fn current(&self) -> NodeId {
        self.current
    }

    /// Previously visited nodes, oldest first.
    pub fn back_stack(&self) -> &[NodeId] {
        &self.back
    }

    /// Whether the cursor sits on the root with no history.
    pub fn is_at_root(&self, graph: &DialogueGraph) -> bool {
        self.current == graph.root() && self.back.is_empty()
    }

    /// Move back to the root and forget the history.
    pub fn reset(&mut self, graph: &DialogueGraph) {
        self.current = graph.root();
        self.back.clear();
    }

    /// Apply player input to the cursor.
    ///
    /// Tried in order: the exact choice text, a 1-based choice number,
    /// `-1` to leave the conversation, `0` to go back one step.
    pub fn choose(&mut self, graph: &DialogueGraph, input: &str) -> CoreResult<Navigation> {
        if let Some(target) = graph.find_choice(self.current, input) {
            self.back.push(self.current);
            self.current = target;
            return Ok(Navigation::Forward(target));
        }

        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(-1) => {
                self.reset(graph);
                Ok(Navigation::Exit)
            }
            Ok(0) => match self.back.pop() {
                Some(previous) => {
                    self.current = previous;
                    Ok(Navigation::Back(previous))
                }
                None => Err(CoreError::InvalidChoice(trimmed.to_string())),
            },
            Ok(n) if n > 0 => {
                let choices = graph.node(self.current)?.choices();
                let (_, target) = usize::try_from(n - 1)
                    .ok()
                    .and_then(|i| choices.get(i))
                    .ok_or_else(|| CoreError::InvalidChoice(trimmed.to_string()))?;
                let target = *target;
                self.back.push(self.current);
                self.current = target;
                Ok(Navigation::Forward(target))
            }
            _ => Err(CoreError::InvalidChoice(trimmed.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root -> "who are you?" -> "are you alive?"; "who are you?" -> "back" -> root
    fn sample() -> (DialogueGraph, NodeId, NodeId) {
        let mut g = DialogueGraph::new("Hello, {player}.", 0);
        let who = g
            .add_child(g.root(), "Who are you?", "I am SYNAPSE.", 1)
            .unwrap();
        let alive = g.add_child(who, "are you alive?", "Define alive.", 3).unwrap();
        g.link(who, "back", g.root()).unwrap();
        g.add_child(g.root(), "ask about facility", "This is Meridian.", 0)
            .unwrap();
        (g, who, alive)
    }

    #[test]
    fn keys_are_normalized_and_unique() {
        let (mut g, who, _) = sample();
        assert_eq!(g.find_choice(g.root(), "  WHO ARE YOU?  "), Some(who));
        assert_eq!(
            g.add_child(g.root(), " who are you? ", "dup", 0),
            Err(CoreError::DuplicateChoice("who are you?".to_string()))
        );
    }

    #[test]
    fn enter_substitutes_and_appends_suffix() {
        let (g, _, _) = sample();
        let text = g.enter(g.root(), "Ada", ChatbotTone::Ambiguous).unwrap();
        assert_eq!(text, "Hello, Ada. ...");
    }

    #[test]
    fn choose_by_text_then_number() {
        let (g, who, alive) = sample();
        let mut c = DialogueCursor::at_root(&g);
        assert_eq!(c.choose(&g, "who are you?").unwrap(), Navigation::Forward(who));
        assert_eq!(c.choose(&g, "1").unwrap(), Navigation::Forward(alive));
        assert_eq!(c.back_stack(), [g.root(), who]);
    }

    #[test]
    fn zero_pops_and_minus_one_exits() {
        let (g, who, _) = sample();
        let mut c = DialogueCursor::at_root(&g);
        assert!(c.choose(&g, "0").is_err());
        c.choose(&g, "1").unwrap();
        c.choose(&g, "1").unwrap();
        assert_eq!(c.choose(&g, "0").unwrap(), Navigation::Back(who));
        assert_eq!(c.choose(&g, "-1").unwrap(), Navigation::Exit);
        assert!(c.is_at_root(&g));
    }

    #[test]
    fn out_of_range_and_garbage_rejected() {
        let (g, _, _) = sample();
        let mut c = DialogueCursor::at_root(&g);
        assert_eq!(
            c.choose(&g, "7"),
            Err(CoreError::InvalidChoice("7".to_string()))
        );
        assert!(c.choose(&g, "dance").is_err());
        assert!(c.is_at_root(&g));
    }

    #[test]
    fn back_link_forms_a_cycle() {
        let (g, who, _) = sample();
        let mut c = DialogueCursor::at_root(&g);
        c.choose(&g, "who are you?").unwrap();
        assert_eq!(c.choose(&g, "back").unwrap(), Navigation::Forward(g.root()));
        assert_eq!(c.back_stack(), [g.root(), who]);
        // The root keeps its own (empty) path despite the back-edge.
        assert!(g.node(g.root()).unwrap().path().is_empty());
    }

    #[test]
    fn paths_resolve_deterministically() {
        let (g, _, alive) = sample();
        let path = g.node(alive).unwrap().path().to_vec();
        assert_eq!(path, ["who are you?", "are you alive?"]);
        assert_eq!(g.resolve_path(&path), Some(alive));
        assert_eq!(g.resolve_path(&["nope".to_string()]), None);
    }

    #[test]
    fn find_by_message_handles_cycles() {
        let (g, _, alive) = sample();
        assert_eq!(g.find_by_message("Define alive."), Some(alive));
        assert_eq!(g.find_by_message("missing"), None);
    }

    #[test]
    fn stub_is_navigable() {
        let g = DialogueGraph::stub("SYNAPSE is rebooting.");
        let mut c = DialogueCursor::at_root(&g);
        assert_eq!(g.len(), 1);
        assert!(g.node(g.root()).unwrap().is_leaf());
        assert!(c.choose(&g, "1").is_err());
        assert_eq!(c.choose(&g, "-1").unwrap(), Navigation::Exit);
    }
}
