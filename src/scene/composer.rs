use std::sync::Arc;

use crate::{
    animation::{
        policy::Stagger,
        presets,
        variants::{TransitionSpec, VariantSet},
    },
    content::{
        gift::{GiftCard, ReceptionCard},
        guest::GuestName,
        model::{Couple, Person, SiteData},
    },
    foundation::{
        error::{UndanganError, UndanganResult},
        ids::NodeId,
    },
    reveal::{
        node::{NodeOptions, Propagation},
        timer::TimerHost,
        tree::RevealTree,
    },
    scene::motion::MotionConfig,
    text::split::{TextUnit, split},
};

/// Fixed copy of the hero section.
pub const HERO_SUBTITLE: &str = "Kami Mengundang Anda Untuk Hadir Di Acara Pernikahan Kami.";
/// Hero title.
pub const HERO_TITLE: &str = "Ngunduh Mantu";
/// Event section header.
pub const EVENT_HEADER: &str = "Rangkaian Acara Akan Diselenggarakan";

/// Visual role of a composed element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Orchestrating container with no visuals of its own.
    Section,
    /// Full-bleed image.
    Image,
    /// Portrait.
    Photo,
    /// Line of per-word text.
    Text,
    /// Horizontal rule.
    Divider,
}

impl Role {
    /// Key used in `motion.overrides`.
    pub fn key(self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Image => "image",
            Self::Photo => "photo",
            Self::Text => "text",
            Self::Divider => "divider",
        }
    }
}

/// A word paired with the node that animates it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct MaskedWord {
    /// Word and its position in the line.
    pub unit: TextUnit,
    /// Reveal node of the word.
    pub node: NodeId,
}

/// One composed visual element.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SceneElement {
    /// Stable label, also used for the node.
    pub label: String,
    /// Visual role.
    pub role: Role,
    /// Reveal node.
    pub node: NodeId,
    /// Text of a line or URL of an image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Word nodes of a text line, in reading order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<MaskedWord>,
}

/// Element that could not be composed.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Diagnostic {
    /// Label of the skipped element.
    pub element: String,
    /// Error text.
    pub message: String,
}

/// Resolved text shown without any reveal animation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct StaticText {
    /// Stable label.
    pub label: String,
    /// Text as displayed.
    pub content: String,
}

/// A composed page section.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Scene {
    /// Section name.
    pub name: String,
    /// Root container; armed.
    pub root: NodeId,
    /// Elements in attach order.
    pub elements: Vec<SceneElement>,
    /// Every node the host has to report visibility for, in attach order.
    pub observed: Vec<NodeId>,
    /// Text rendered as-is, outside the reveal tree.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub copy: Vec<StaticText>,
    /// Elements skipped during composition.
    pub diagnostics: Vec<Diagnostic>,
}

impl Scene {
    /// Element by label.
    pub fn element(&self, label: &str) -> Option<&SceneElement> {
        self.elements.iter().find(|e| e.label == label)
    }

    /// Static text by label.
    pub fn copy_text(&self, label: &str) -> Option<&str> {
        self.copy
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.content.as_str())
    }
}

/// Event-details section plus the static cards rendered inside it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct EventScene {
    /// Animated header.
    pub scene: Scene,
    /// Reception details.
    pub reception: ReceptionCard,
    /// Digital envelope.
    pub gift: GiftCard,
}

/// Builds page sections as reveal subtrees.
///
/// A failing element is logged, recorded as a [`Diagnostic`] and left out; its siblings are
/// still attached. Only a failing section root aborts the scene.
#[derive(Debug)]
pub struct SceneComposer<'a> {
    motion: &'a MotionConfig,
    elements: Vec<SceneElement>,
    observed: Vec<NodeId>,
    copy: Vec<StaticText>,
    diagnostics: Vec<Diagnostic>,
}

type Preset = fn(TransitionSpec) -> UndanganResult<VariantSet>;

impl<'a> SceneComposer<'a> {
    /// Composer using `motion` for every timing decision.
    pub fn new(motion: &'a MotionConfig) -> Self {
        Self {
            motion,
            elements: Vec::new(),
            observed: Vec::new(),
            copy: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Diagnostics recorded since the last finished scene.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Hero section: banner, title, couple line, divider and date revealed together with the
    /// section-level stagger. The guest greeting and the subtitle are static copy.
    #[tracing::instrument(skip_all, fields(scene = "hero"))]
    pub fn hero<T: TimerHost>(
        &mut self,
        tree: &mut RevealTree<T>,
        site: &SiteData,
        guest: &GuestName,
    ) -> UndanganResult<Scene> {
        let root = self.root(tree, "hero")?;
        self.image(tree, root, "hero.banner", Role::Image, &site.hero.banner);
        self.static_text("hero.greeting", &guest.greeting());
        self.text_line(tree, Some(root), "hero.title", HERO_TITLE);
        self.static_text("hero.subtitle", HERO_SUBTITLE);
        self.text_line(
            tree,
            Some(root),
            "hero.couple",
            &site.wedding.couple.headline(),
        );
        self.divider(tree, Some(root), "hero.divider");
        self.text_line(tree, Some(root), "hero.date", &site.wedding.reception.date);
        Ok(self.finish("hero", root))
    }

    /// Couple section: one profile per partner, each profile revealing its text column and
    /// photo only once they are scrolled into view. A profile that cannot be built is
    /// reported and left out; the other one is still composed.
    #[tracing::instrument(skip_all, fields(scene = "couple"))]
    pub fn couple<T: TimerHost>(
        &mut self,
        tree: &mut RevealTree<T>,
        couple: &Couple,
    ) -> UndanganResult<Scene> {
        let root = self.root(tree, "couple")?;
        for (who, person) in [("groom", &couple.groom), ("bride", &couple.bride)] {
            self.profile(tree, root, &format!("couple.{who}"), person);
        }
        Ok(self.finish("couple", root))
    }

    /// Event section: animated header lines plus the resolved reception and gift cards.
    #[tracing::instrument(skip_all, fields(scene = "event"))]
    pub fn event<T: TimerHost>(
        &mut self,
        tree: &mut RevealTree<T>,
        site: &SiteData,
    ) -> UndanganResult<EventScene> {
        let root = self.root(tree, "event")?;
        self.text_line(tree, Some(root), "event.header", EVENT_HEADER);
        self.text_line(tree, Some(root), "event.date", &site.wedding.reception.date);
        Ok(EventScene {
            scene: self.finish("event", root),
            reception: ReceptionCard::new(&site.wedding.reception),
            gift: GiftCard::new(&site.wedding.digital_envelope),
        })
    }

    /// Orchestrating container staggering its children by `stagger` (the policy default when
    /// `None`).
    pub fn group<T: TimerHost>(
        &mut self,
        tree: &mut RevealTree<T>,
        parent: Option<NodeId>,
        label: &str,
        stagger: Option<Stagger>,
        propagation: Propagation,
    ) -> UndanganResult<NodeId> {
        let mut transition = self.motion.policy.transition;
        transition.stagger = stagger;
        let variants = presets::orchestration(transition)?;
        let node = tree.attach_with(variants, parent, options(label, propagation))?;
        self.elements.push(SceneElement {
            label: label.to_owned(),
            role: Role::Section,
            node,
            content: None,
            words: Vec::new(),
        });
        if parent.is_none() || propagation == Propagation::Independent {
            self.observe(tree, node);
        }
        Ok(node)
    }

    /// Text shown without animation.
    pub fn static_text(&mut self, label: &str, content: &str) {
        self.copy.push(StaticText {
            label: label.to_owned(),
            content: content.to_owned(),
        });
    }

    /// Image revealed with the preset of its role.
    pub fn image<T: TimerHost>(
        &mut self,
        tree: &mut RevealTree<T>,
        parent: NodeId,
        label: &str,
        role: Role,
        src: &str,
    ) -> Option<NodeId> {
        self.image_with(tree, parent, label, role, src, Propagation::Inherit)
    }

    /// Horizontal rule drawn from its left edge.
    pub fn divider<T: TimerHost>(
        &mut self,
        tree: &mut RevealTree<T>,
        parent: Option<NodeId>,
        label: &str,
    ) -> Option<NodeId> {
        let node = self.leaf(
            tree,
            parent,
            label,
            Role::Divider,
            presets::divider_draw,
            Propagation::Inherit,
        )?;
        self.push(label, Role::Divider, node, None, Vec::new());
        Some(node)
    }

    /// Line of text whose words rise one after another. A root line is armed.
    pub fn text_line<T: TimerHost>(
        &mut self,
        tree: &mut RevealTree<T>,
        parent: Option<NodeId>,
        label: &str,
        text: &str,
    ) -> Option<NodeId> {
        let word_variants = match self.variants(Role::Text, presets::word_rise) {
            Ok(v) => Arc::new(v),
            Err(err) => {
                self.skip(label, &err);
                return None;
            }
        };
        let mut transition = self.motion.policy.transition;
        transition.stagger = Some(self.motion.word_stagger);
        let line = presets::orchestration(transition).and_then(|variants| {
            tree.attach_with(variants, parent, options(label, Propagation::Inherit))
        });
        let line = match line {
            Ok(node) => node,
            Err(err) => {
                self.skip(label, &err);
                return None;
            }
        };

        let mut words = Vec::new();
        for unit in split(text) {
            let word_label = format!("{label}[{}]", unit.index);
            match tree.attach_with(
                Arc::clone(&word_variants),
                Some(line),
                NodeOptions::labeled(word_label.as_str()),
            ) {
                Ok(node) => words.push(MaskedWord { unit, node }),
                Err(err) => self.skip(&word_label, &err),
            }
        }
        tracing::debug!(line = label, words = words.len(), "text line composed");
        self.push(label, Role::Text, line, Some(text.to_owned()), words);
        if parent.is_none() {
            self.observe(tree, line);
        }
        Some(line)
    }

    fn profile<T: TimerHost>(
        &mut self,
        tree: &mut RevealTree<T>,
        root: NodeId,
        label: &str,
        person: &Person,
    ) {
        let section = self.group(tree, Some(root), label, None, Propagation::Independent);
        let section = match section {
            Ok(node) => node,
            Err(err) => return self.skip(label, &err),
        };
        let column = match self.group(
            tree,
            Some(section),
            &format!("{label}.text"),
            None,
            Propagation::Independent,
        ) {
            Ok(node) => node,
            Err(err) => {
                self.discard(tree, section);
                return self.skip(label, &err);
            }
        };
        self.text_line(
            tree,
            Some(column),
            &format!("{label}.name"),
            &person.full_name(),
        );
        self.text_line(
            tree,
            Some(column),
            &format!("{label}.caption"),
            &person.parents.caption,
        );
        self.text_line(
            tree,
            Some(column),
            &format!("{label}.parents"),
            &person.parents.formal_line(),
        );
        self.image_with(
            tree,
            section,
            &format!("{label}.photo"),
            Role::Photo,
            &person.photo,
            Propagation::Independent,
        );
    }

    // Drop a partially built subtree along with its bookkeeping.
    fn discard<T: TimerHost>(&mut self, tree: &mut RevealTree<T>, node: NodeId) {
        tree.dispose(node);
        self.elements.retain(|e| tree.contains(e.node));
        self.observed.retain(|n| tree.contains(*n));
    }

    fn root<T: TimerHost>(
        &mut self,
        tree: &mut RevealTree<T>,
        name: &str,
    ) -> UndanganResult<NodeId> {
        self.elements.clear();
        self.observed.clear();
        self.copy.clear();
        self.diagnostics.clear();
        let stagger = self.motion.policy.stagger;
        self.group(tree, None, name, Some(stagger), Propagation::Inherit)
    }

    fn image_with<T: TimerHost>(
        &mut self,
        tree: &mut RevealTree<T>,
        parent: NodeId,
        label: &str,
        role: Role,
        src: &str,
        propagation: Propagation,
    ) -> Option<NodeId> {
        let preset: Preset = match role {
            Role::Photo => presets::photo_settle,
            _ => presets::banner_zoom,
        };
        let node = self.leaf(tree, Some(parent), label, role, preset, propagation)?;
        self.push(label, role, node, Some(src.to_owned()), Vec::new());
        if propagation == Propagation::Independent {
            self.observe(tree, node);
        }
        Some(node)
    }

    fn leaf<T: TimerHost>(
        &mut self,
        tree: &mut RevealTree<T>,
        parent: Option<NodeId>,
        label: &str,
        role: Role,
        preset: Preset,
        propagation: Propagation,
    ) -> Option<NodeId> {
        let attached = self
            .variants(role, preset)
            .and_then(|variants| tree.attach_with(variants, parent, options(label, propagation)));
        match attached {
            Ok(node) => Some(node),
            Err(err) => {
                self.skip(label, &err);
                None
            }
        }
    }

    fn variants(&self, role: Role, preset: Preset) -> UndanganResult<VariantSet> {
        match self.motion.overrides.get(role.key()) {
            Some(def) => VariantSet::try_from(def.clone()),
            None => preset(self.motion.policy.transition),
        }
    }

    fn observe<T: TimerHost>(&mut self, tree: &mut RevealTree<T>, node: NodeId) {
        tree.arm(node, self.motion.region);
        self.observed.push(node);
    }

    fn push(
        &mut self,
        label: &str,
        role: Role,
        node: NodeId,
        content: Option<String>,
        words: Vec<MaskedWord>,
    ) {
        self.elements.push(SceneElement {
            label: label.to_owned(),
            role,
            node,
            content,
            words,
        });
    }

    fn skip(&mut self, label: &str, err: &UndanganError) {
        tracing::warn!(element = label, error = %err, "element skipped");
        self.diagnostics.push(Diagnostic {
            element: label.to_owned(),
            message: err.to_string(),
        });
    }

    fn finish(&mut self, name: &str, root: NodeId) -> Scene {
        Scene {
            name: name.to_owned(),
            root,
            elements: std::mem::take(&mut self.elements),
            observed: std::mem::take(&mut self.observed),
            copy: std::mem::take(&mut self.copy),
            diagnostics: std::mem::take(&mut self.diagnostics),
        }
    }
}

fn options(label: &str, propagation: Propagation) -> NodeOptions {
    NodeOptions {
        label: label.to_owned(),
        propagation,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/composer.rs"]
mod tests;
