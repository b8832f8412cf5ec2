use std::sync::Arc;

use crate::{
    animation::variants::{Variant, VariantSet},
    foundation::ids::{NodeId, TimerId},
    reveal::visibility::{Observation, VisibilityRegion},
};

/// Lifecycle of a reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealState {
    /// Initial state of every freshly mounted node.
    Hidden,
    /// `show` transition running.
    Showing,
    /// `show` transition complete.
    Shown,
    /// `exit` transition running ahead of unmount.
    Exiting,
}

impl RevealState {
    /// Declaration the host should be rendering for this state.
    pub fn variant(self) -> Variant {
        match self {
            Self::Hidden => Variant::Hidden,
            Self::Showing | Self::Shown => Variant::Show,
            Self::Exiting => Variant::Exit,
        }
    }

    /// `Showing` or `Shown`.
    pub fn is_revealed(self) -> bool {
        matches!(self, Self::Showing | Self::Shown)
    }
}

/// How a child reacts when its parent starts showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Propagation {
    /// Reveal with the parent, offset by the parent's stagger.
    #[default]
    Inherit,
    /// Only become eligible; reveal once the child itself is in view.
    Independent,
}

/// Per-node settings fixed at attach time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeOptions {
    /// Human-readable name carried into events and logs.
    pub label: String,
    /// Parent-to-child behaviour.
    pub propagation: Propagation,
}

impl NodeOptions {
    /// Inheriting node with a label.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            propagation: Propagation::Inherit,
        }
    }

    /// Same options, revealing on the node's own visibility.
    pub fn independent(mut self) -> Self {
        self.propagation = Propagation::Independent;
        self
    }
}

/// One mounted reveal unit. Mutated only by its [`RevealTree`](crate::RevealTree).
#[derive(Debug)]
pub struct RevealNode {
    pub(crate) id: NodeId,
    pub(crate) label: String,
    pub(crate) variants: Arc<VariantSet>,
    pub(crate) propagation: Propagation,
    pub(crate) state: RevealState,
    pub(crate) visible: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) sibling_index: usize,
    pub(crate) next_child_index: usize,
    pub(crate) observation: Option<Observation>,
    /// Roots always; children once their parent is showing.
    pub(crate) eligible: bool,
    pub(crate) pending: Option<TimerId>,
    pub(crate) epoch: u32,
    pub(crate) started_at_ms: Option<u64>,
}

impl RevealNode {
    pub(crate) fn new(
        id: NodeId,
        variants: Arc<VariantSet>,
        options: NodeOptions,
        parent: Option<NodeId>,
        sibling_index: usize,
    ) -> Self {
        Self {
            id,
            label: options.label,
            variants,
            propagation: options.propagation,
            state: RevealState::Hidden,
            visible: false,
            parent,
            children: Vec::new(),
            sibling_index,
            next_child_index: 0,
            observation: None,
            eligible: parent.is_none(),
            pending: None,
            epoch: 0,
            started_at_ms: None,
        }
    }

    /// Handle of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Label given at attach time.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Shared variant bundle.
    pub fn variants(&self) -> &Arc<VariantSet> {
        &self.variants
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Last visibility reported for this node.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Parent-to-child behaviour.
    pub fn propagation(&self) -> Propagation {
        self.propagation
    }

    /// Position among the parent's children; drives the stagger offset.
    pub fn sibling_index(&self) -> usize {
        self.sibling_index
    }

    /// Region the node is observed with, once armed.
    pub fn region(&self) -> Option<VisibilityRegion> {
        self.observation.as_ref().map(Observation::region)
    }

    /// Whether a delayed transition is waiting on the timer host.
    pub fn has_pending_timer(&self) -> bool {
        self.pending.is_some()
    }

    // Roots and independent children react to their own visibility; inheriting children
    // follow their parent only.
    pub(crate) fn is_self_triggered(&self) -> bool {
        self.parent.is_none() || self.propagation == Propagation::Independent
    }

    pub(crate) fn can_start(&self) -> bool {
        self.state == RevealState::Hidden && self.pending.is_none() && self.eligible
    }
}
