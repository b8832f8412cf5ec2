//! Undangan drives the reveal animations of a digital wedding invitation.
//!
//! Page elements are mounted as nodes of a [`RevealTree`]. Each node carries an immutable
//! [`VariantSet`] (`hidden` / `show` / `exit` declarations) and moves through
//! [`RevealState`]s as the host reports visibility and delivers timer callbacks:
//!
//! - Compose a section with [`SceneComposer`] (or attach nodes by hand)
//! - Feed visibility through [`RevealTree::report_visibility`] or a [`Geometry`]
//! - Drive time with a [`TimerHost`] ([`ManualTimers`] for a virtual clock)
//! - Render the [`RevealEvent`]s the tree records
//!
//! The tree never interpolates pixels; property maps are handed to the host as-is.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod content;
pub(crate) mod reveal;
pub(crate) mod scene;
pub(crate) mod text;

pub use crate::foundation::error::{UndanganError, UndanganResult};
pub use crate::foundation::ids::{NodeId, TimerId};
pub use kurbo::Rect;

pub use crate::animation::ease::Ease;
pub use crate::animation::policy::{
    DEFAULT_DURATION_MS, DEFAULT_PER_ITEM_DELAY_MS, Stagger, TransitionPolicy, compute_stagger,
    default_transition,
};
pub use crate::animation::presets;
pub use crate::animation::variants::{
    PropertyMap, PropertyValue, TransitionSpec, Variant, VariantSet, VariantSetDef, props,
};

pub use crate::reveal::node::{NodeOptions, Propagation, RevealNode, RevealState};
pub use crate::reveal::timer::{ManualTimers, TimerHost, TimerKind, TimerTask};
pub use crate::reveal::tree::{RevealEvent, RevealTree};
pub use crate::reveal::visibility::{
    Geometry, Observation, PageViewport, VisibilityEvents, VisibilityRegion, observe,
};

pub use crate::text::split::{TextUnit, split};

pub use crate::content::gift::{COPY_CONFIRMATION, GiftCard, ReceptionCard, whatsapp_link};
pub use crate::content::guest::{DEFAULT_GUEST, GUEST_PARAM, GuestName};
pub use crate::content::model::{
    Couple, DigitalEnvelope, HeroContent, Parents, Person, Reception, SiteData,
    WhatsAppConfirmation, Wedding,
};

pub use crate::scene::composer::{
    Diagnostic, EVENT_HEADER, EventScene, HERO_SUBTITLE, HERO_TITLE, MaskedWord, Role, Scene,
    SceneComposer, SceneElement, StaticText,
};
pub use crate::scene::motion::{MotionConfig, ROLES};
