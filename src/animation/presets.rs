//! Variant bundles used by the invitation scenes.
//!
//! Every preset shares the caller's `show` timing and fades out on exit.

use crate::{
    animation::variants::{PropertyMap, TransitionSpec, VariantSet, props},
    foundation::error::UndanganResult,
};

fn fade_out() -> PropertyMap {
    props([("opacity", 0.0.into())])
}

/// Container that only orchestrates its children; it animates nothing itself.
pub fn orchestration(transition: TransitionSpec) -> UndanganResult<VariantSet> {
    VariantSet::new(
        PropertyMap::new(),
        PropertyMap::new(),
        transition,
        PropertyMap::new(),
    )
}

/// Full-bleed banner zooming in from double size.
pub fn banner_zoom(transition: TransitionSpec) -> UndanganResult<VariantSet> {
    VariantSet::new(
        props([("scale", 2.0.into()), ("opacity", 0.0.into())]),
        props([("scale", 1.0.into()), ("opacity", 1.0.into())]),
        transition,
        fade_out(),
    )
}

/// Portrait settling from a slight zoom.
pub fn photo_settle(transition: TransitionSpec) -> UndanganResult<VariantSet> {
    VariantSet::new(
        props([("scale", 1.3.into())]),
        props([("scale", 1.0.into())]),
        transition,
        fade_out(),
    )
}

/// Word rising out of its mask while un-skewing.
pub fn word_rise(transition: TransitionSpec) -> UndanganResult<VariantSet> {
    VariantSet::new(
        props([
            ("opacity", 0.0.into()),
            ("y", "80%".into()),
            ("skewY", 10.0.into()),
        ]),
        props([
            ("opacity", 1.0.into()),
            ("y", 0.0.into()),
            ("skewY", 0.0.into()),
        ]),
        transition,
        fade_out(),
    )
}

/// Rule drawn from its left edge.
pub fn divider_draw(transition: TransitionSpec) -> UndanganResult<VariantSet> {
    VariantSet::new(
        props([("scaleX", 0.0.into()), ("originX", 0.0.into())]),
        props([("scaleX", 1.0.into()), ("originX", 0.0.into())]),
        transition,
        fade_out(),
    )
}
