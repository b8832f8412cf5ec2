use std::collections::{BTreeMap, BTreeSet};

use crate::{
    animation::{ease::Ease, policy::Stagger},
    foundation::error::{UndanganError, UndanganResult},
};

/// Opaque target value for one visual property. The host renderer interprets it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Plain number (`opacity: 0`, `scale: 2`, `skewY: 10`).
    Number(f64),
    /// Unit-carrying or symbolic value (`y: "80%"`).
    Text(String),
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

/// Property name to target value.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// Build a [`PropertyMap`] from `(name, value)` pairs.
pub fn props<const N: usize>(entries: [(&str, PropertyValue); N]) -> PropertyMap {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect()
}

/// Timing for one transition.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitionSpec {
    /// Transition length in milliseconds (must be > 0).
    pub duration_ms: u64,
    /// Progress curve.
    #[serde(default = "default_ease")]
    pub ease: Ease,
    /// Author delay added on top of the computed stagger offset.
    #[serde(default)]
    pub delay_ms: u64,
    /// How this node offsets the reveal of its children, if it orchestrates any.
    #[serde(default)]
    pub stagger: Option<Stagger>,
}

fn default_ease() -> Ease {
    Ease::REVEAL
}

impl TransitionSpec {
    /// Build a transition with no author delay and no child stagger.
    pub fn new(duration_ms: u64, ease: Ease) -> Self {
        Self {
            duration_ms,
            ease,
            delay_ms: 0,
            stagger: None,
        }
    }

    /// Same timing, orchestrating children with `stagger`.
    pub fn with_stagger(mut self, stagger: Stagger) -> Self {
        self.stagger = Some(stagger);
        self
    }

    /// Same timing, starting `delay_ms` later.
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub(crate) fn validate(&self, what: &str) -> UndanganResult<()> {
        if self.duration_ms == 0 {
            return Err(UndanganError::invalid_variant_set(format!(
                "{what} transition duration must be > 0"
            )));
        }
        if !self.ease.is_finite() {
            return Err(UndanganError::invalid_variant_set(format!(
                "{what} transition ease must have finite control points"
            )));
        }
        Ok(())
    }
}

/// Name of one of the three declarations in a [`VariantSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Initial, invisible/offset declaration.
    Hidden,
    /// Final, fully visible declaration.
    Show,
    /// Teardown declaration.
    Exit,
}

/// Serialized form of a [`VariantSet`]; validated on conversion.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VariantSetDef {
    /// Properties applied while hidden.
    #[serde(default)]
    pub hidden: PropertyMap,
    /// Properties applied once shown.
    #[serde(default)]
    pub show: PropertyMap,
    /// Timing of the `show` declaration.
    pub transition: TransitionSpec,
    /// Properties applied while exiting.
    #[serde(default)]
    pub exit: PropertyMap,
    /// Timing of the `exit` declaration; the policy default when absent.
    #[serde(default)]
    pub exit_transition: Option<TransitionSpec>,
}

/// Validated `hidden` / `show` / `exit` bundle.
///
/// Every property animated by `hidden` is also targeted by `show` (and vice versa), so the
/// reveal and its reversal both have defined end points.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "VariantSetDef", into = "VariantSetDef")]
pub struct VariantSet {
    hidden: PropertyMap,
    show: PropertyMap,
    transition: TransitionSpec,
    exit: PropertyMap,
    exit_transition: Option<TransitionSpec>,
}

impl VariantSet {
    /// Validate and build a variant set.
    pub fn new(
        hidden: PropertyMap,
        show: PropertyMap,
        transition: TransitionSpec,
        exit: PropertyMap,
    ) -> UndanganResult<Self> {
        Self::try_from(VariantSetDef {
            hidden,
            show,
            transition,
            exit,
            exit_transition: None,
        })
    }

    /// Same declarations with an explicit exit timing.
    pub fn with_exit_transition(mut self, transition: TransitionSpec) -> UndanganResult<Self> {
        transition.validate("exit")?;
        self.exit_transition = Some(transition);
        Ok(self)
    }

    /// Properties for one declaration.
    pub fn properties(&self, variant: Variant) -> &PropertyMap {
        match variant {
            Variant::Hidden => &self.hidden,
            Variant::Show => &self.show,
            Variant::Exit => &self.exit,
        }
    }

    /// Timing of the `show` declaration.
    pub fn transition(&self) -> &TransitionSpec {
        &self.transition
    }

    /// Explicit exit timing, if any.
    pub fn exit_transition(&self) -> Option<&TransitionSpec> {
        self.exit_transition.as_ref()
    }
}

impl TryFrom<VariantSetDef> for VariantSet {
    type Error = UndanganError;

    fn try_from(def: VariantSetDef) -> UndanganResult<Self> {
        def.transition.validate("show")?;
        if let Some(exit) = &def.exit_transition {
            exit.validate("exit")?;
        }

        let hidden_keys: BTreeSet<&str> = def.hidden.keys().map(String::as_str).collect();
        let show_keys: BTreeSet<&str> = def.show.keys().map(String::as_str).collect();
        if hidden_keys != show_keys {
            let only_hidden: Vec<&str> = hidden_keys.difference(&show_keys).copied().collect();
            let only_show: Vec<&str> = show_keys.difference(&hidden_keys).copied().collect();
            return Err(UndanganError::invalid_variant_set(format!(
                "hidden and show must animate the same properties \
                 (only in hidden: {only_hidden:?}, only in show: {only_show:?})"
            )));
        }

        Ok(Self {
            hidden: def.hidden,
            show: def.show,
            transition: def.transition,
            exit: def.exit,
            exit_transition: def.exit_transition,
        })
    }
}

impl From<VariantSet> for VariantSetDef {
    fn from(v: VariantSet) -> Self {
        Self {
            hidden: v.hidden,
            show: v.show,
            transition: v.transition,
            exit: v.exit,
            exit_transition: v.exit_transition,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/variants.rs"]
mod tests;
