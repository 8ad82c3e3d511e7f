//! End-to-end remediation walks over an in-memory store

use pretty_assertions::assert_eq;
use waypoint_catalog::{ScaffoldSettings, SectionSnapshot};
use waypoint_core::prelude::*;
use waypoint_test_utils::{seed_items, Fixture};

const CONFUSED: &str = "lo-confused";

fn seeded(max_levels: Option<u32>, max_waypoint_items: Option<u32>, quota: Option<u32>) -> Fixture {
    let fx = Fixture::new(max_levels, max_waypoint_items, quota);
    seed_items(&fx.store, Fixture::ROOT_OBJECTIVE, 2);
    seed_items(&fx.store, CONFUSED, 4);
    fx
}

/// Answer the root incorrectly and return it re-resolved
async fn wrong_root(fx: &Fixture, section: &mut SectionSnapshot) -> ScaffoldPart {
    let root = fx.root(section).await;
    fx.answer_incorrect(section, &root, &[CONFUSED]).await;
    fx.root(section).await
}

#[tokio::test]
async fn correct_root_does_not_branch() {
    let fx = seeded(Some(2), Some(1), None);
    let mut section = SectionSnapshot::new();

    let root = fx.root(&section).await;
    fx.answer_correct(&mut section, &root).await;
    let root = fx.root(&section).await;

    assert!(!root.has_children(&section));
    assert!(fx.children(&root, &section).await.is_empty());
}

#[tokio::test]
async fn unanswered_root_does_not_branch() {
    let fx = seeded(Some(2), Some(1), None);
    let section = SectionSnapshot::new();

    let root = fx.root(&section).await;
    assert!(root.has_item());
    assert!(!root.has_children(&section));
    assert!(fx.children(&root, &section).await.is_empty());
}

#[tokio::test]
async fn incorrect_without_confusion_does_not_branch() {
    let fx = seeded(Some(2), Some(1), None);
    let mut section = SectionSnapshot::new();

    let root = fx.root(&section).await;
    fx.answer_incorrect(&mut section, &root, &[]).await;
    let root = fx.root(&section).await;

    assert!(!root.has_children(&section));
    assert!(fx.children(&root, &section).await.is_empty());
}

#[tokio::test]
async fn waypoint_then_correct_stops_at_depth_one() {
    let fx = seeded(Some(2), Some(1), None);
    let mut section = SectionSnapshot::new();

    let root = wrong_root(&fx, &mut section).await;
    assert!(root.has_children(&section));

    let children = fx.children(&root, &section).await;
    assert_eq!(children.len(), 1);
    let child = &children[0];
    assert_eq!(child.depth(), 1);
    assert_eq!(child.sibling_index(), 0);
    assert_eq!(child.objective_refs(), [CONFUSED.to_string()]);
    assert_eq!(child.parent_ref(), Some(root.id().to_string().as_str()));
    assert_eq!(child.origin(), root.origin());
    assert!(child.has_item());

    fx.answer_correct(&mut section, child).await;
    let child = fx.session.resolve_part(child.id(), &section).await.unwrap();

    assert!(!child.has_children(&section));
    assert!(fx.children(&child, &section).await.is_empty());
}

#[tokio::test]
async fn depth_limit_blocks_grandchildren() {
    let fx = seeded(Some(1), Some(1), None);
    let mut section = SectionSnapshot::new();

    let root = wrong_root(&fx, &mut section).await;
    let children = fx.children(&root, &section).await;
    assert_eq!(children.len(), 1);

    fx.answer_incorrect(&mut section, &children[0], &[CONFUSED]).await;
    let child = fx.session.resolve_part(children[0].id(), &section).await.unwrap();

    assert_eq!(child.state(&section), waypoint_branch::PartState::AnsweredIncorrectWithConfusion);
    assert!(!child.has_children(&section));
    assert!(fx.children(&child, &section).await.is_empty());
}

#[tokio::test]
async fn siblings_appear_one_at_a_time() {
    let fx = seeded(Some(2), Some(3), None);
    let mut section = SectionSnapshot::new();

    let root = wrong_root(&fx, &mut section).await;

    // index 0 not yet known to the section: indices 1 and 2 are not created
    let children = fx.children(&root, &section).await;
    assert_eq!(children.len(), 1);

    // index 0 shown but unanswered
    waypoint_test_utils::show(&mut section, &children[0]);
    let children = fx.children(&root, &section).await;
    assert_eq!(children.len(), 1);

    // index 0 wrong: index 1 unlocked
    fx.answer_incorrect(&mut section, &children[0], &[]).await;
    let children = fx.children(&root, &section).await;
    assert_eq!(children.len(), 2);
    assert_eq!(children[1].sibling_index(), 1);

    // index 1 wrong: index 2 unlocked, then the cap
    fx.answer_incorrect(&mut section, &children[1], &[]).await;
    let children = fx.children(&root, &section).await;
    assert_eq!(children.len(), 3);

    fx.answer_incorrect(&mut section, &children[2], &[]).await;
    let children = fx.children(&root, &section).await;
    assert_eq!(children.len(), 3);
}

#[tokio::test]
async fn quota_ends_the_branch() {
    let fx = seeded(Some(2), Some(3), Some(2));
    let mut section = SectionSnapshot::new();

    let root = wrong_root(&fx, &mut section).await;
    let children = fx.children(&root, &section).await;
    assert_eq!(children[0].waypoint_quota(), Some(2));

    fx.answer_correct(&mut section, &children[0]).await;
    let children = fx.children(&root, &section).await;
    assert_eq!(children.len(), 2);

    fx.answer_correct(&mut section, &children[1]).await;
    let children = fx.children(&root, &section).await;
    assert_eq!(children.len(), 2);
}

#[tokio::test]
async fn unset_sibling_cap_uses_sentinel() {
    let fx = seeded(Some(2), None, Some(1));
    let mut section = SectionSnapshot::new();

    let root = wrong_root(&fx, &mut section).await;
    assert_eq!(root.limits().sibling_limit(), 99);

    for expected in 1..=3 {
        let children = fx.children(&root, &section).await;
        assert_eq!(children.len(), expected);
        let last = children.last().unwrap();
        fx.answer_incorrect(&mut section, last, &[]).await;
    }
}

#[tokio::test]
async fn exhausted_pool_leaves_part_without_item() {
    let settings = ScaffoldSettings::builder()
        .objective_ids(vec![Fixture::ROOT_OBJECTIVE.to_string()])
        .unwrap()
        .max_levels(Some(3))
        .allow_repeat_items(false)
        .build();
    let fx = Fixture::with_settings(settings);
    seed_items(&fx.store, Fixture::ROOT_OBJECTIVE, 1);
    let remediation = seed_items(&fx.store, CONFUSED, 2);

    let mut section = SectionSnapshot::new();
    for (n, item) in remediation.iter().enumerate() {
        section.push_question(ResourceId::canonical_part(format!("elsewhere-{n}")), item.clone());
    }

    let root = wrong_root(&fx, &mut section).await;
    let children = fx.children(&root, &section).await;
    assert_eq!(children.len(), 1);

    let child = &children[0];
    assert!(!child.has_item());
    assert!(child.item_ids().is_err());
    assert!(!child.has_children(&section));
    assert!(fx.children(child, &section).await.is_empty());
}

#[tokio::test]
async fn repeats_allowed_reuse_a_seen_item() {
    let settings = ScaffoldSettings::builder()
        .objective_ids(vec![Fixture::ROOT_OBJECTIVE.to_string()])
        .unwrap()
        .max_levels(Some(3))
        .build();
    let fx = Fixture::with_settings(settings);
    seed_items(&fx.store, Fixture::ROOT_OBJECTIVE, 1);
    let remediation = seed_items(&fx.store, CONFUSED, 1);

    let mut section = SectionSnapshot::new();
    section.push_question(ResourceId::canonical_part("elsewhere"), remediation[0].clone());

    let root = wrong_root(&fx, &mut section).await;
    let children = fx.children(&root, &section).await;
    assert_eq!(children[0].item(), Some(&remediation[0]));
}

#[tokio::test]
async fn child_ids_are_stable_across_lookups() {
    let fx = seeded(Some(2), Some(1), None);
    let mut section = SectionSnapshot::new();

    let root = wrong_root(&fx, &mut section).await;
    let first = root.child_ids(&section).unwrap();
    let again = fx.root(&section).await.child_ids(&section).unwrap();
    assert_eq!(first, again);

    let a = fx.session.resolve_part(&first[0], &section).await.unwrap();
    let b = fx.session.resolve_part(&first[0], &section).await.unwrap();
    assert_eq!(a.token(), b.token());
}
