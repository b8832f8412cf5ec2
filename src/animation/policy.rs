use crate::animation::{ease::Ease, variants::TransitionSpec};

/// Default reveal length.
pub const DEFAULT_DURATION_MS: u64 = 1000;
/// Default offset between consecutive siblings.
pub const DEFAULT_PER_ITEM_DELAY_MS: u64 = 100;

/// Delay of the child at `index` relative to the instant its parent starts showing.
pub fn compute_stagger(index: usize, base_delay_ms: u64, per_item_delay_ms: u64) -> u64 {
    let index = u64::try_from(index).unwrap_or(u64::MAX);
    base_delay_ms.saturating_add(index.saturating_mul(per_item_delay_ms))
}

/// Scene-wide default transition.
pub fn default_transition() -> TransitionSpec {
    TransitionSpec::new(DEFAULT_DURATION_MS, Ease::REVEAL)
}

/// Index-proportional child offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Stagger {
    /// Offset of the first child.
    #[serde(default)]
    pub base_delay_ms: u64,
    /// Extra offset per sibling position.
    #[serde(default = "default_per_item")]
    pub per_item_delay_ms: u64,
}

fn default_per_item() -> u64 {
    DEFAULT_PER_ITEM_DELAY_MS
}

impl Default for Stagger {
    fn default() -> Self {
        Self {
            base_delay_ms: 0,
            per_item_delay_ms: DEFAULT_PER_ITEM_DELAY_MS,
        }
    }
}

impl Stagger {
    /// Build a stagger.
    pub fn new(base_delay_ms: u64, per_item_delay_ms: u64) -> Self {
        Self {
            base_delay_ms,
            per_item_delay_ms,
        }
    }

    /// Offset of the child at `index`.
    pub fn delay_for(&self, index: usize) -> u64 {
        compute_stagger(index, self.base_delay_ms, self.per_item_delay_ms)
    }
}

/// Fallback timing for nodes whose variants leave it unspecified.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitionPolicy {
    /// Used for exits without an explicit transition.
    #[serde(default = "default_transition")]
    pub transition: TransitionSpec,
    /// Used by parents whose `show` transition declares no stagger.
    #[serde(default)]
    pub stagger: Stagger,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self {
            transition: default_transition(),
            stagger: Stagger::default(),
        }
    }
}

impl TransitionPolicy {
    /// Stagger a parent applies to its children.
    pub fn stagger_of(&self, parent_transition: &TransitionSpec) -> Stagger {
        parent_transition.stagger.unwrap_or(self.stagger)
    }

    /// Duration of an exit animation.
    pub fn exit_duration_ms(&self, exit_transition: Option<&TransitionSpec>) -> u64 {
        exit_transition
            .map(|t| t.duration_ms)
            .unwrap_or(self.transition.duration_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/policy.rs"]
mod tests;
