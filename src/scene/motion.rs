use std::collections::BTreeMap;

use crate::{
    animation::{
        policy::{DEFAULT_PER_ITEM_DELAY_MS, Stagger, TransitionPolicy},
        variants::VariantSetDef,
    },
    foundation::error::{UndanganError, UndanganResult},
    reveal::visibility::VisibilityRegion,
};

/// Element roles whose variants may be overridden.
pub const ROLES: [&str; 4] = ["image", "photo", "text", "divider"];

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Animation timing for every scene.
///
/// ```json
/// {
///   "policy": { "transition": { "duration_ms": 1000 }, "stagger": { "per_item_delay_ms": 100 } },
///   "wordStagger": { "base_delay_ms": 0, "per_item_delay_ms": 80 },
///   "region": { "threshold_fraction": 0.0, "fire_once": true },
///   "overrides": { "text": { "hidden": {}, "show": {}, "transition": { "duration_ms": 600 } } }
/// }
/// ```
pub struct MotionConfig {
    /// Default transition and section-level stagger.
    #[serde(default)]
    pub policy: TransitionPolicy,
    /// Offset between words of one line.
    #[serde(default = "default_word_stagger")]
    pub word_stagger: Stagger,
    /// Visibility rule for every observed node.
    #[serde(default)]
    pub region: VisibilityRegion,
    /// Per-role variant replacements, keyed by one of [`ROLES`]. Validated when a scene is
    /// composed, so a bad override only drops the elements using it.
    #[serde(default)]
    pub overrides: BTreeMap<String, VariantSetDef>,
}

fn default_word_stagger() -> Stagger {
    Stagger::new(0, DEFAULT_PER_ITEM_DELAY_MS)
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            policy: TransitionPolicy::default(),
            word_stagger: default_word_stagger(),
            region: VisibilityRegion::default(),
            overrides: BTreeMap::new(),
        }
    }
}

impl MotionConfig {
    /// Check timing values and override role names. Override contents are checked later.
    pub fn validate(&self) -> UndanganResult<()> {
        if self.policy.transition.duration_ms == 0 {
            return Err(UndanganError::validation(
                "motion.policy.transition.duration_ms must be > 0",
            ));
        }
        self.region.validate()?;
        if let Some(role) = self.overrides.keys().find(|k| !ROLES.contains(&k.as_str())) {
            return Err(UndanganError::validation(format!(
                "motion.overrides has unknown role '{role}' (expected one of {ROLES:?})"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/motion.rs"]
mod tests;
