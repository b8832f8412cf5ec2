use std::sync::Arc;

use crate::{
    animation::{policy::TransitionPolicy, variants::VariantSet},
    foundation::{
        error::{UndanganError, UndanganResult},
        ids::NodeId,
    },
    reveal::{
        node::{NodeOptions, Propagation, RevealNode, RevealState},
        timer::{ManualTimers, TimerHost, TimerKind, TimerTask},
        visibility::{Geometry, Observation, VisibilityRegion},
    },
};

/// State change the host renders by applying the new state's declaration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RevealEvent {
    /// Host clock time of the change.
    pub at_ms: u64,
    /// Node that changed.
    pub node: NodeId,
    /// Node label.
    pub label: String,
    /// Previous state.
    pub from: RevealState,
    /// New state.
    pub to: RevealState,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<RevealNode>,
}

/// Arena of reveal nodes driven by visibility reports and timer callbacks.
///
/// All transitions happen synchronously inside the calls that deliver those reports; the tree
/// never blocks and never spawns. Delayed work goes through the [`TimerHost`].
#[derive(Debug)]
pub struct RevealTree<T: TimerHost = ManualTimers> {
    slots: Vec<Slot>,
    free: Vec<u32>,
    timers: T,
    policy: TransitionPolicy,
    events: Vec<RevealEvent>,
}

impl Default for RevealTree<ManualTimers> {
    fn default() -> Self {
        Self::new(ManualTimers::new())
    }
}

impl<T: TimerHost> RevealTree<T> {
    /// Empty tree using the default [`TransitionPolicy`].
    pub fn new(timers: T) -> Self {
        Self::with_policy(timers, TransitionPolicy::default())
    }

    /// Empty tree with explicit fallback timing.
    pub fn with_policy(timers: T, policy: TransitionPolicy) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            timers,
            policy,
            events: Vec::new(),
        }
    }

    /// Fallback timing.
    pub fn policy(&self) -> &TransitionPolicy {
        &self.policy
    }

    /// Timer host.
    pub fn timers(&self) -> &T {
        &self.timers
    }

    /// Timer host, mutably.
    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    /// Number of mounted nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    /// True when no node is mounted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `id` refers to a mounted node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Read-only access to a node.
    pub fn node(&self, id: NodeId) -> Option<&RevealNode> {
        self.get(id)
    }

    /// Current state of a node.
    pub fn state(&self, id: NodeId) -> Option<RevealState> {
        self.get(id).map(|n| n.state)
    }

    /// Children in attach order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Parent, if it is still mounted.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)
            .and_then(|n| n.parent)
            .filter(|p| self.contains(*p))
    }

    /// Eased progress of the running transition in `[0, 1]`: 0 while hidden, 1 once shown.
    pub fn progress(&self, id: NodeId) -> Option<f64> {
        let node = self.get(id)?;
        let (duration, ease) = match node.state {
            RevealState::Hidden => return Some(0.0),
            RevealState::Shown => return Some(1.0),
            RevealState::Showing => {
                let t = node.variants.transition();
                (t.duration_ms, t.ease)
            }
            RevealState::Exiting => {
                let exit = node.variants.exit_transition();
                let ease = exit.map(|t| t.ease).unwrap_or(self.policy.transition.ease);
                (self.policy.exit_duration_ms(exit), ease)
            }
        };
        let started = node.started_at_ms.unwrap_or_else(|| self.timers.now_ms());
        let elapsed = self.timers.now_ms().saturating_sub(started);
        Some(ease.apply(elapsed as f64 / duration.max(1) as f64))
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[RevealEvent] {
        &self.events
    }

    /// Take all recorded events.
    pub fn drain_events(&mut self) -> Vec<RevealEvent> {
        std::mem::take(&mut self.events)
    }

    /// Register a new node, optionally nested under `parent`.
    pub fn attach(
        &mut self,
        variants: impl Into<Arc<VariantSet>>,
        parent: Option<NodeId>,
    ) -> UndanganResult<NodeId> {
        self.attach_with(variants, parent, NodeOptions::default())
    }

    /// Register a new node with explicit options.
    ///
    /// A child attached under a parent that is already showing is picked up immediately, as
    /// if it had been present when the parent started.
    pub fn attach_with(
        &mut self,
        variants: impl Into<Arc<VariantSet>>,
        parent: Option<NodeId>,
        options: NodeOptions,
    ) -> UndanganResult<NodeId> {
        let (sibling_index, parent_revealed) = match parent {
            Some(p) => {
                let parent_node = self.get_mut(p).ok_or(UndanganError::UnknownNode(p))?;
                let index = parent_node.next_child_index;
                parent_node.next_child_index += 1;
                (index, parent_node.state.is_revealed())
            }
            None => (0, false),
        };

        let id = self.alloc();
        let mut node = RevealNode::new(id, variants.into(), options, parent, sibling_index);
        if parent_revealed {
            node.eligible = true;
        }
        let inherits = node.propagation == Propagation::Inherit;
        tracing::trace!(node = %id, label = %node.label, ?parent, sibling_index, "attach");
        self.slots[id.index() as usize].node = Some(node);

        if let Some(p) = parent
            && let Some(parent_node) = self.get_mut(p)
        {
            parent_node.children.push(id);
        }
        if parent_revealed && inherits {
            self.trigger(id);
        }
        Ok(id)
    }

    /// Begin (or restart) visibility observation for a node.
    pub fn arm(&mut self, id: NodeId, region: VisibilityRegion) {
        match self.get_mut(id) {
            Some(node) => node.observation = Some(Observation::new(region)),
            None => tracing::trace!(node = %id, "arm ignored: node is gone"),
        }
    }

    /// Report that the node's element is (or is not) in view.
    pub fn report_visibility(&mut self, id: NodeId, visible: bool) {
        self.report_fraction(id, Some(if visible { 1.0 } else { 0.0 }));
    }

    /// Report a visible-fraction sample; `None` means geometry is unavailable.
    pub fn report_fraction(&mut self, id: NodeId, fraction: Option<f64>) {
        let Some(node) = self.get_mut(id) else {
            tracing::trace!(node = %id, "visibility ignored: node is gone");
            return;
        };
        let Some(observation) = node.observation.as_mut() else {
            tracing::trace!(node = %id, "visibility ignored: node is not armed");
            return;
        };
        if let Some(visible) = observation.track(fraction) {
            self.on_visibility(id, visible);
        }
    }

    /// Sample every observed node against the host geometry, in attach order.
    pub fn sample<G: Geometry + ?Sized>(&mut self, geometry: &G) {
        let observed: Vec<NodeId> = self
            .slots
            .iter()
            .filter_map(|s| s.node.as_ref())
            .filter(|n| n.observation.as_ref().is_some_and(|o| !o.is_done()))
            .map(|n| n.id)
            .collect();
        for id in observed {
            let fraction = geometry.visible_fraction(id);
            self.report_fraction(id, fraction);
        }
    }

    /// Deliver a timer callback. Stale callbacks (disposed node, reset epoch) are dropped.
    pub fn on_timer(&mut self, task: TimerTask) {
        let Some(node) = self.get_mut(task.node) else {
            tracing::trace!(node = %task.node, kind = ?task.kind, "timer ignored: node is gone");
            return;
        };
        if node.epoch != task.epoch {
            tracing::trace!(node = %task.node, kind = ?task.kind, "timer ignored: stale epoch");
            return;
        }
        node.pending = None;
        let state = node.state;
        match (task.kind, state) {
            (TimerKind::BeginShow, RevealState::Hidden) => self.begin_show(task.node),
            (TimerKind::FinishShow, RevealState::Showing) => {
                self.set_state(task.node, RevealState::Shown)
            }
            (TimerKind::FinishExit, RevealState::Exiting) => self.dispose(task.node),
            (kind, state) => {
                tracing::trace!(node = %task.node, ?kind, ?state, "timer ignored: state moved on")
            }
        }
    }

    /// Start the exit transition for a node and its subtree; the subtree is disposed when it
    /// completes. Observation stops immediately.
    pub fn exit(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        for member in self.subtree(id) {
            self.cancel_pending(member);
            if let Some(node) = self.get_mut(member) {
                node.observation = None;
            }
            if self.state(member) != Some(RevealState::Exiting) {
                self.set_state(member, RevealState::Exiting);
            }
        }

        let Some(node) = self.get(id) else {
            return;
        };
        let duration = self
            .policy
            .exit_duration_ms(node.variants.exit_transition());
        let task = TimerTask {
            node: id,
            epoch: node.epoch,
            kind: TimerKind::FinishExit,
        };
        let timer = self.timers.schedule(duration, task);
        if let Some(node) = self.get_mut(id) {
            node.pending = Some(timer);
        }
    }

    /// Tear down a node and its subtree, cancelling every pending timer. No events follow.
    pub fn dispose(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        if let Some(parent) = self.get(id).and_then(|n| n.parent)
            && let Some(parent_node) = self.get_mut(parent)
        {
            parent_node.children.retain(|c| *c != id);
        }

        for member in self.subtree(id) {
            self.cancel_pending(member);
            let slot = &mut self.slots[member.index() as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(member.index());
            tracing::trace!(node = %member, "disposed");
        }
    }

    fn on_visibility(&mut self, id: NodeId, visible: bool) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        node.visible = visible;
        if !node.is_self_triggered() {
            return;
        }

        if visible {
            if node.can_start() {
                self.trigger(id);
            }
            return;
        }

        let fire_once = node.region().map(|r| r.fire_once).unwrap_or(true);
        if !fire_once && node.state != RevealState::Exiting {
            self.reset(id);
        }
    }

    /// Schedule the reveal of a node after its stagger offset plus author delay.
    ///
    /// A fire-once observation completes here, not on its first visible sample: a node that
    /// is seen before it becomes eligible keeps tracking both edges until it actually starts.
    fn trigger(&mut self, id: NodeId) {
        if let Some(observation) = self.get_mut(id).and_then(|n| n.observation.as_mut()) {
            observation.complete();
        }
        let delay = self.start_delay(id);
        if delay == 0 {
            self.begin_show(id);
            return;
        }
        let Some(node) = self.get(id) else {
            return;
        };
        let task = TimerTask {
            node: id,
            epoch: node.epoch,
            kind: TimerKind::BeginShow,
        };
        let timer = self.timers.schedule(delay, task);
        if let Some(node) = self.get_mut(id) {
            node.pending = Some(timer);
        }
    }

    fn start_delay(&self, id: NodeId) -> u64 {
        let Some(node) = self.get(id) else {
            return 0;
        };
        let offset = node
            .parent
            .and_then(|p| self.get(p))
            .map(|p| {
                self.policy
                    .stagger_of(p.variants.transition())
                    .delay_for(node.sibling_index)
            })
            .unwrap_or(0);
        offset.saturating_add(node.variants.transition().delay_ms)
    }

    fn begin_show(&mut self, id: NodeId) {
        if self.state(id) != Some(RevealState::Hidden) {
            return;
        }
        self.set_state(id, RevealState::Showing);

        let now = self.timers.now_ms();
        let Some(node) = self.get_mut(id) else {
            return;
        };
        node.started_at_ms = Some(now);
        let task = TimerTask {
            node: id,
            epoch: node.epoch,
            kind: TimerKind::FinishShow,
        };
        let duration = node.variants.transition().duration_ms;
        let children = node.children.clone();
        let timer = self.timers.schedule(duration, task);
        if let Some(node) = self.get_mut(id) {
            node.pending = Some(timer);
        }

        for child in children {
            let Some(child_node) = self.get_mut(child) else {
                continue;
            };
            child_node.eligible = true;
            let start = match child_node.propagation {
                Propagation::Inherit => child_node.can_start(),
                Propagation::Independent => child_node.visible && child_node.can_start(),
            };
            if start {
                self.trigger(child);
            }
        }
    }

    /// Return a node and its subtree to `Hidden`, cancelling pending work. Descendants lose
    /// eligibility until the node shows again.
    fn reset(&mut self, id: NodeId) {
        for member in self.subtree(id) {
            if self.state(member) == Some(RevealState::Exiting) {
                continue;
            }
            self.cancel_pending(member);
            if let Some(node) = self.get_mut(member) {
                node.started_at_ms = None;
                if member != id {
                    node.eligible = false;
                }
            }
            if self.state(member) != Some(RevealState::Hidden) {
                self.set_state(member, RevealState::Hidden);
            }
        }
    }

    fn cancel_pending(&mut self, id: NodeId) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        node.epoch = node.epoch.wrapping_add(1);
        if let Some(timer) = node.pending.take() {
            self.timers.cancel(timer);
        }
    }

    fn set_state(&mut self, id: NodeId, to: RevealState) {
        let at_ms = self.timers.now_ms();
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let from = node.state;
        node.state = to;
        if to == RevealState::Exiting {
            node.started_at_ms = Some(at_ms);
        }
        tracing::debug!(node = %id, label = %node.label, ?from, ?to, at_ms, "reveal transition");
        let event = RevealEvent {
            at_ms,
            node: id,
            label: node.label.clone(),
            from,
            to,
        };
        self.events.push(event);
    }

    // Pre-order: the node first, then descendants in attach order.
    fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    fn alloc(&mut self) -> NodeId {
        if let Some(index) = self.free.pop() {
            let generation = self.slots[index as usize].generation;
            return NodeId::new(index, generation);
        }
        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot::default());
        NodeId::new(index, 0)
    }

    fn get(&self, id: NodeId) -> Option<&RevealNode> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut RevealNode> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_mut()
    }
}

impl RevealTree<ManualTimers> {
    /// Current virtual time.
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// Run every callback due up to `until_ms`, then park the clock there.
    pub fn advance_to(&mut self, until_ms: u64) {
        while let Some(task) = self.timers.pop_due(until_ms) {
            self.on_timer(task);
        }
        self.timers.set_now(until_ms);
    }

    /// Advance the virtual clock by `ms`.
    pub fn advance_by(&mut self, ms: u64) {
        let until = self.timers.now_ms().saturating_add(ms);
        self.advance_to(until);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/tree.rs"]
mod tests;
