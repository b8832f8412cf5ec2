use super::*;
use crate::animation::{ease::Ease, policy::Stagger, presets, variants::TransitionSpec};
use crate::reveal::visibility::PageViewport;

fn linear(duration_ms: u64) -> TransitionSpec {
    TransitionSpec::new(duration_ms, Ease::Linear)
}

fn leaf(duration_ms: u64) -> VariantSet {
    presets::word_rise(linear(duration_ms)).unwrap()
}

fn group(duration_ms: u64, base: u64, per_item: u64) -> VariantSet {
    presets::orchestration(linear(duration_ms).with_stagger(Stagger::new(base, per_item))).unwrap()
}

fn once() -> VisibilityRegion {
    VisibilityRegion::default()
}

fn rearming() -> VisibilityRegion {
    VisibilityRegion::new(0.0, false).unwrap()
}

fn history(tree: &RevealTree, id: NodeId) -> Vec<(u64, RevealState)> {
    tree.events()
        .iter()
        .filter(|e| e.node == id)
        .map(|e| (e.at_ms, e.to))
        .collect()
}

fn first_time(tree: &RevealTree, id: NodeId, state: RevealState) -> Option<u64> {
    history(tree, id)
        .into_iter()
        .find(|(_, s)| *s == state)
        .map(|(t, _)| t)
}

fn count(tree: &RevealTree, id: NodeId, state: RevealState) -> usize {
    history(tree, id).iter().filter(|(_, s)| *s == state).count()
}

#[test]
fn fresh_nodes_start_hidden() {
    let mut tree = RevealTree::default();
    let root = tree.attach(leaf(500), None).unwrap();
    assert_eq!(tree.state(root), Some(RevealState::Hidden));
    assert_eq!(tree.progress(root), Some(0.0));
    assert!(tree.events().is_empty());
}

#[test]
fn fire_once_reveals_exactly_once() {
    let mut tree = RevealTree::default();
    let root = tree.attach(leaf(500), None).unwrap();
    tree.arm(root, once());

    tree.report_visibility(root, true);
    assert_eq!(tree.state(root), Some(RevealState::Showing));
    tree.advance_by(100);
    tree.report_visibility(root, false);
    tree.report_visibility(root, true);
    tree.advance_by(1_000);

    assert_eq!(
        history(&tree, root),
        [(0, RevealState::Showing), (500, RevealState::Shown)]
    );
    assert_eq!(count(&tree, root, RevealState::Showing), 1);
}

#[test]
fn rearming_resets_and_retriggers() {
    let mut tree = RevealTree::default();
    let root = tree.attach(leaf(500), None).unwrap();
    tree.arm(root, rearming());

    tree.report_visibility(root, true);
    tree.advance_by(100);
    tree.report_visibility(root, false);
    assert_eq!(tree.state(root), Some(RevealState::Hidden));
    tree.report_visibility(root, true);
    tree.advance_by(1_000);

    assert_eq!(
        history(&tree, root),
        [
            (0, RevealState::Showing),
            (100, RevealState::Hidden),
            (100, RevealState::Showing),
            (600, RevealState::Shown),
        ]
    );
    assert_eq!(count(&tree, root, RevealState::Showing), 2);
}

#[test]
fn rearming_from_shown_goes_back_to_hidden() {
    let mut tree = RevealTree::default();
    let root = tree.attach(leaf(500), None).unwrap();
    tree.arm(root, rearming());

    tree.report_visibility(root, true);
    tree.advance_to(600);
    assert_eq!(tree.state(root), Some(RevealState::Shown));
    tree.report_visibility(root, false);
    assert_eq!(tree.state(root), Some(RevealState::Hidden));
    tree.report_visibility(root, true);
    assert_eq!(first_time(&tree, root, RevealState::Hidden), Some(600));
    assert_eq!(count(&tree, root, RevealState::Showing), 2);
}

#[test]
fn duplicate_reports_are_deduplicated() {
    let mut tree = RevealTree::default();
    let root = tree.attach(leaf(500), None).unwrap();
    tree.arm(root, rearming());
    tree.report_visibility(root, true);
    tree.report_visibility(root, true);
    tree.report_visibility(root, true);
    assert_eq!(history(&tree, root), [(0, RevealState::Showing)]);
}

#[test]
fn unarmed_nodes_ignore_visibility() {
    let mut tree = RevealTree::default();
    let root = tree.attach(leaf(500), None).unwrap();
    tree.report_visibility(root, true);
    assert_eq!(tree.state(root), Some(RevealState::Hidden));
}

#[test]
fn unmeasurable_geometry_reveals_immediately() {
    let mut tree = RevealTree::default();
    let root = tree.attach(leaf(500), None).unwrap();
    tree.arm(root, VisibilityRegion::new(1.0, true).unwrap());
    tree.report_fraction(root, None);
    assert_eq!(tree.state(root), Some(RevealState::Showing));
}

#[test]
fn children_are_staggered_in_attach_order() {
    let mut tree = RevealTree::default();
    let root = tree.attach(group(400, 30, 50), None).unwrap();
    let kids: Vec<NodeId> = (0..3)
        .map(|_| tree.attach(leaf(200), Some(root)).unwrap())
        .collect();
    tree.arm(root, once());

    tree.report_visibility(root, true);
    // Parent finish + three delayed starts.
    assert_eq!(tree.timers().pending(), 4);
    assert!(
        kids.iter()
            .all(|k| tree.state(*k) == Some(RevealState::Hidden))
    );

    tree.advance_to(1_000);
    let starts: Vec<Option<u64>> = kids
        .iter()
        .map(|k| first_time(&tree, *k, RevealState::Showing))
        .collect();
    assert_eq!(starts, [Some(30), Some(80), Some(130)]);
    let ends: Vec<Option<u64>> = kids
        .iter()
        .map(|k| first_time(&tree, *k, RevealState::Shown))
        .collect();
    assert_eq!(ends, [Some(230), Some(280), Some(330)]);
    assert_eq!(first_time(&tree, root, RevealState::Shown), Some(400));
}

#[test]
fn zero_offset_child_starts_with_its_parent() {
    let mut tree = RevealTree::default();
    let root = tree.attach(group(400, 0, 100), None).unwrap();
    let first = tree.attach(leaf(200), Some(root)).unwrap();
    let second = tree.attach(leaf(200), Some(root)).unwrap();
    tree.arm(root, once());
    tree.report_visibility(root, true);

    assert_eq!(tree.state(first), Some(RevealState::Showing));
    assert_eq!(tree.state(second), Some(RevealState::Hidden));
    assert!(tree.node(second).unwrap().has_pending_timer());
}

#[test]
fn parent_without_stagger_uses_policy_default() {
    let mut tree = RevealTree::default();
    let root = tree
        .attach(presets::orchestration(linear(400)).unwrap(), None)
        .unwrap();
    let a = tree.attach(leaf(100), Some(root)).unwrap();
    let b = tree.attach(leaf(100), Some(root)).unwrap();
    tree.arm(root, once());
    tree.report_visibility(root, true);
    tree.advance_to(1_000);

    let per_item = tree.policy().stagger.per_item_delay_ms;
    assert_eq!(first_time(&tree, a, RevealState::Showing), Some(0));
    assert_eq!(first_time(&tree, b, RevealState::Showing), Some(per_item));
}

#[test]
fn author_delay_adds_to_stagger() {
    let mut tree = RevealTree::default();
    let root = tree.attach(group(400, 0, 100), None).unwrap();
    let _a = tree.attach(leaf(100), Some(root)).unwrap();
    let late = presets::word_rise(linear(100).with_delay(25)).unwrap();
    let b = tree.attach(late, Some(root)).unwrap();
    tree.arm(root, once());
    tree.report_visibility(root, true);
    tree.advance_to(1_000);
    assert_eq!(first_time(&tree, b, RevealState::Showing), Some(125));
}

#[test]
fn words_cascade_inside_a_line() {
    let mut tree = RevealTree::default();
    let root = tree.attach(group(400, 0, 100), None).unwrap();
    let line = tree.attach(group(400, 0, 80), Some(root)).unwrap();
    let w0 = tree.attach(leaf(300), Some(line)).unwrap();
    let w1 = tree.attach(leaf(300), Some(line)).unwrap();
    tree.arm(root, once());

    tree.report_visibility(root, true);
    tree.advance_to(2_000);
    assert_eq!(first_time(&tree, line, RevealState::Showing), Some(0));
    assert_eq!(first_time(&tree, w0, RevealState::Showing), Some(0));
    assert_eq!(first_time(&tree, w1, RevealState::Showing), Some(80));
    assert_eq!(first_time(&tree, w1, RevealState::Shown), Some(380));
}

#[test]
fn disposing_cancels_pending_reveal() {
    let mut tree = RevealTree::default();
    let root = tree.attach(group(400, 0, 100), None).unwrap();
    let a = tree.attach(leaf(200), Some(root)).unwrap();
    let b = tree.attach(leaf(200), Some(root)).unwrap();
    tree.arm(root, once());
    tree.report_visibility(root, true);
    assert!(tree.node(b).unwrap().has_pending_timer());

    tree.dispose(b);
    // Parent finish + first child finish.
    assert_eq!(tree.timers().pending(), 2);
    tree.advance_to(1_000);

    assert!(!tree.contains(b));
    assert!(history(&tree, b).is_empty());
    assert_eq!(tree.children(root), [a]);
}

#[test]
fn stale_callbacks_are_ignored() {
    let mut tree = RevealTree::default();
    let root = tree.attach(group(400, 0, 100), None).unwrap();
    let _a = tree.attach(leaf(200), Some(root)).unwrap();
    let b = tree.attach(leaf(200), Some(root)).unwrap();
    tree.arm(root, once());
    tree.report_visibility(root, true);
    let stale = TimerTask {
        node: b,
        epoch: tree.node(b).unwrap().epoch,
        kind: TimerKind::BeginShow,
    };

    tree.dispose(b);
    let reused = tree.attach(leaf(200), None).unwrap();
    assert_eq!(reused.index(), b.index());
    assert_ne!(reused, b);

    tree.on_timer(stale);
    tree.on_timer(TimerTask {
        node: reused,
        epoch: 7,
        kind: TimerKind::BeginShow,
    });
    assert!(history(&tree, b).is_empty());
    assert!(history(&tree, reused).is_empty());
}

#[test]
fn disposing_a_parent_removes_its_subtree() {
    let mut tree = RevealTree::default();
    let root = tree.attach(group(400, 0, 100), None).unwrap();
    let line = tree.attach(group(400, 0, 80), Some(root)).unwrap();
    let word = tree.attach(leaf(300), Some(line)).unwrap();
    tree.arm(root, once());
    tree.report_visibility(root, true);

    tree.dispose(root);
    assert!(tree.is_empty());
    assert_eq!(tree.timers().pending(), 0);
    assert_eq!(tree.state(word), None);
    assert!(tree.children(root).is_empty());
}

#[test]
fn independent_child_waits_for_parent_and_own_visibility() {
    let mut tree = RevealTree::default();
    let root = tree.attach(group(400, 0, 100), None).unwrap();
    let column = tree
        .attach_with(
            leaf(300),
            Some(root),
            NodeOptions::labeled("column").independent(),
        )
        .unwrap();
    let photo = tree
        .attach_with(
            leaf(300),
            Some(root),
            NodeOptions::labeled("photo").independent(),
        )
        .unwrap();
    tree.arm(root, once());
    tree.arm(column, once());
    tree.arm(photo, once());

    // Parent still hidden: the child may not reveal.
    tree.report_visibility(column, true);
    assert_eq!(tree.state(column), Some(RevealState::Hidden));

    tree.report_visibility(root, true);
    assert_eq!(tree.state(column), Some(RevealState::Showing));
    tree.advance_to(2_000);
    assert_eq!(tree.state(photo), Some(RevealState::Hidden));

    tree.report_visibility(photo, true);
    tree.advance_to(5_000);
    assert_eq!(first_time(&tree, photo, RevealState::Showing), Some(2_100));
    assert_eq!(tree.node(photo).unwrap().label(), "photo");
}

#[test]
fn independent_child_seen_early_then_lost_stays_hidden() {
    let mut tree = RevealTree::default();
    let root = tree.attach(group(400, 0, 100), None).unwrap();
    let photo = tree
        .attach_with(
            leaf(300),
            Some(root),
            NodeOptions::labeled("photo").independent(),
        )
        .unwrap();
    tree.arm(root, once());
    tree.arm(photo, once());

    // Scrolled past before the parent showed.
    tree.report_visibility(photo, true);
    tree.report_visibility(photo, false);
    assert!(!tree.node(photo).unwrap().is_visible());

    tree.report_visibility(root, true);
    tree.advance_to(1_000);
    assert_eq!(tree.state(photo), Some(RevealState::Hidden));

    // Coming back into view reveals it, once.
    tree.report_visibility(photo, true);
    tree.advance_to(2_000);
    assert_eq!(count(&tree, photo, RevealState::Showing), 1);
    assert_eq!(first_time(&tree, photo, RevealState::Showing), Some(1_000));

    tree.report_visibility(photo, false);
    tree.report_visibility(photo, true);
    tree.advance_to(3_000);
    assert_eq!(count(&tree, photo, RevealState::Showing), 1);
}

#[test]
fn inheriting_child_ignores_its_own_visibility() {
    let mut tree = RevealTree::default();
    let root = tree.attach(group(400, 0, 100), None).unwrap();
    let child = tree.attach(leaf(200), Some(root)).unwrap();
    tree.arm(child, once());
    tree.report_visibility(child, true);
    assert_eq!(tree.state(child), Some(RevealState::Hidden));
    assert!(tree.node(child).unwrap().is_visible());
}

#[test]
fn parent_reset_cascades_and_cancels() {
    let mut tree = RevealTree::default();
    let root = tree.attach(group(400, 0, 100), None).unwrap();
    let a = tree.attach(leaf(200), Some(root)).unwrap();
    let b = tree.attach(leaf(200), Some(root)).unwrap();
    tree.arm(root, rearming());

    tree.report_visibility(root, true);
    tree.advance_to(50);
    tree.report_visibility(root, false);

    assert_eq!(tree.timers().pending(), 0);
    for id in [root, a, b] {
        assert_eq!(tree.state(id), Some(RevealState::Hidden));
    }
    tree.advance_to(1_000);
    assert!(history(&tree, b).is_empty());
    assert_eq!(
        history(&tree, a),
        [(0, RevealState::Showing), (50, RevealState::Hidden)]
    );
}

#[test]
fn child_never_outpaces_hidden_parent() {
    let mut tree = RevealTree::default();
    let root = tree.attach(group(400, 0, 100), None).unwrap();
    let kids: Vec<NodeId> = (0..4)
        .map(|_| tree.attach(leaf(150), Some(root)).unwrap())
        .collect();
    tree.arm(root, rearming());

    for step in 0..20u64 {
        tree.report_visibility(root, step % 3 != 2);
        tree.advance_by(45);
        if tree.state(root) == Some(RevealState::Hidden) {
            for k in &kids {
                assert_eq!(tree.state(*k), Some(RevealState::Hidden));
            }
        }
    }
}

#[test]
fn late_child_joins_a_showing_parent() {
    let mut tree = RevealTree::default();
    let root = tree.attach(group(400, 0, 100), None).unwrap();
    tree.arm(root, once());
    tree.report_visibility(root, true);
    tree.advance_to(500);

    let late = tree.attach(leaf(200), Some(root)).unwrap();
    assert_eq!(tree.state(late), Some(RevealState::Showing));
    assert_eq!(tree.parent(late), Some(root));
}

#[test]
fn unknown_parent_is_rejected() {
    let mut tree = RevealTree::default();
    let root = tree.attach(leaf(100), None).unwrap();
    tree.dispose(root);
    let err = tree.attach(leaf(100), Some(root)).unwrap_err();
    assert!(matches!(err, UndanganError::UnknownNode(id) if id == root));
}

#[test]
fn exit_runs_then_disposes_subtree() {
    let mut tree = RevealTree::default();
    let root = tree.attach(group(400, 0, 100), None).unwrap();
    let child = tree.attach(leaf(200), Some(root)).unwrap();
    tree.arm(root, once());
    tree.report_visibility(root, true);
    tree.advance_to(600);

    tree.exit(root);
    assert_eq!(tree.state(root), Some(RevealState::Exiting));
    assert_eq!(tree.state(child), Some(RevealState::Exiting));
    let exit_ms = tree.policy().exit_duration_ms(None);
    tree.advance_by(exit_ms / 2);
    let p = tree.progress(root).unwrap();
    assert!(p > 0.0 && p < 1.0);

    tree.advance_by(exit_ms);
    assert!(tree.is_empty());
    assert_eq!(tree.timers().pending(), 0);
}

#[test]
fn exit_cancels_pending_reveal() {
    let mut tree = RevealTree::default();
    let root = tree.attach(group(400, 0, 100), None).unwrap();
    let _a = tree.attach(leaf(200), Some(root)).unwrap();
    let b = tree.attach(leaf(200), Some(root)).unwrap();
    tree.arm(root, once());
    tree.report_visibility(root, true);

    tree.exit(root);
    tree.advance_to(50_000);
    assert_eq!(first_time(&tree, b, RevealState::Showing), None);
}

#[test]
fn progress_tracks_the_clock() {
    let mut tree = RevealTree::default();
    let root = tree.attach(leaf(1_000), None).unwrap();
    tree.arm(root, once());
    tree.report_visibility(root, true);
    tree.advance_by(250);
    assert_eq!(tree.progress(root), Some(0.25));
    tree.advance_by(2_000);
    assert_eq!(tree.progress(root), Some(1.0));
}

#[test]
fn geometry_sampling_reveals_sections_as_they_scroll_in() {
    let mut tree = RevealTree::default();
    let hero = tree.attach(leaf(300), None).unwrap();
    let footer = tree.attach(leaf(300), None).unwrap();
    tree.arm(hero, once());
    tree.arm(footer, once());

    let mut page = PageViewport::new(400.0, 800.0);
    page.place(hero, kurbo::Rect::new(0.0, 0.0, 400.0, 800.0));
    page.place(footer, kurbo::Rect::new(0.0, 1_600.0, 400.0, 2_400.0));

    tree.sample(&page);
    assert_eq!(tree.state(hero), Some(RevealState::Showing));
    assert_eq!(tree.state(footer), Some(RevealState::Hidden));

    tree.advance_to(1_000);
    page.scroll_to(1_200.0);
    tree.sample(&page);
    assert_eq!(first_time(&tree, footer, RevealState::Showing), Some(1_000));
    assert_eq!(count(&tree, hero, RevealState::Showing), 1);
}

#[test]
fn drained_events_are_removed() {
    let mut tree = RevealTree::default();
    let root = tree.attach_with(leaf(100), None, NodeOptions::labeled("hero")).unwrap();
    tree.arm(root, once());
    tree.report_visibility(root, true);
    let events = tree.drain_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].label, "hero");
    assert_eq!(events[0].from, RevealState::Hidden);
    assert!(tree.events().is_empty());
}
