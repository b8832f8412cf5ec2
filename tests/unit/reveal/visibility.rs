use super::*;

fn once() -> VisibilityRegion {
    VisibilityRegion::default()
}

fn repeat(threshold: f64) -> VisibilityRegion {
    VisibilityRegion::new(threshold, false).unwrap()
}

#[test]
fn threshold_must_be_a_fraction() {
    assert!(VisibilityRegion::new(-0.1, true).is_err());
    assert!(VisibilityRegion::new(1.5, true).is_err());
    assert!(VisibilityRegion::new(f64::NAN, true).is_err());
    assert!(VisibilityRegion::new(1.0, false).is_ok());
}

#[test]
fn zero_threshold_means_any_pixel() {
    let r = once();
    assert!(!r.is_met(Some(0.0)));
    assert!(r.is_met(Some(0.0001)));
    let half = repeat(0.5);
    assert!(!half.is_met(Some(0.49)));
    assert!(half.is_met(Some(0.5)));
}

#[test]
fn unmeasurable_geometry_counts_as_visible() {
    assert!(repeat(1.0).is_met(None));
    let events: Vec<bool> = observe(once(), [None]).collect();
    assert_eq!(events, [true]);
}

#[test]
fn fire_once_stops_after_first_entry() {
    let samples = [Some(0.0), Some(0.3), Some(0.0), Some(0.8)];
    let events: Vec<bool> = observe(once(), samples).collect();
    assert_eq!(events, [true]);
}

#[test]
fn fire_once_stream_ends_even_if_samples_are_infinite() {
    let samples = std::iter::repeat(Some(1.0));
    let events: Vec<bool> = observe(once(), samples).collect();
    assert_eq!(events, [true]);
}

#[test]
fn rearming_emits_both_edges_without_duplicates() {
    let samples = [0.0, 0.2, 0.6, 0.7, 0.4, 0.1, 0.9, 0.9]
        .into_iter()
        .map(Some);
    let events: Vec<bool> = observe(repeat(0.5), samples).collect();
    assert_eq!(events, [true, false, true]);
}

#[test]
fn leading_invisible_state_is_not_an_event() {
    let mut obs = Observation::new(repeat(0.0));
    assert_eq!(obs.push(Some(0.0)), None);
    assert_eq!(obs.push(Some(0.0)), None);
    assert_eq!(obs.push(Some(0.5)), Some(true));
    assert_eq!(obs.push(Some(0.0)), Some(false));
    assert!(!obs.is_done());
}

#[test]
fn tracking_defers_fire_once_completion() {
    let mut obs = Observation::new(once());
    assert_eq!(obs.track(Some(1.0)), Some(true));
    assert!(!obs.is_done());
    assert_eq!(obs.track(Some(0.0)), Some(false));
    assert_eq!(obs.track(Some(1.0)), Some(true));

    obs.complete();
    assert!(obs.is_done());
    assert_eq!(obs.track(Some(0.0)), None);
}

#[test]
fn completing_a_rearming_observation_is_a_no_op() {
    let mut obs = Observation::new(repeat(0.0));
    assert_eq!(obs.track(Some(1.0)), Some(true));
    obs.complete();
    assert!(!obs.is_done());
    assert_eq!(obs.track(Some(0.0)), Some(false));
}

#[test]
fn page_viewport_measures_overlap() {
    let a = NodeId::new(0, 0);
    let b = NodeId::new(1, 0);
    let unplaced = NodeId::new(2, 0);

    let mut vp = PageViewport::new(400.0, 800.0);
    vp.place(a, Rect::new(0.0, 600.0, 400.0, 1000.0));
    vp.place(b, Rect::new(0.0, 1600.0, 400.0, 2000.0));

    assert_eq!(vp.visible_fraction(a), Some(0.5));
    assert_eq!(vp.visible_fraction(b), Some(0.0));
    assert_eq!(vp.visible_fraction(unplaced), None);

    vp.scroll_to(1400.0);
    assert_eq!(vp.visible_fraction(a), Some(0.0));
    assert_eq!(vp.visible_fraction(b), Some(1.0));
}

#[test]
fn zero_area_elements_use_containment() {
    let rule = NodeId::new(0, 0);
    let mut vp = PageViewport::new(400.0, 800.0);
    vp.place(rule, Rect::new(0.0, 300.0, 400.0, 300.0));
    assert_eq!(vp.visible_fraction(rule), Some(1.0));
    vp.scroll_to(500.0);
    assert_eq!(vp.visible_fraction(rule), Some(0.0));
}
