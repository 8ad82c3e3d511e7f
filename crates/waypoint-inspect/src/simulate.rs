//! Seeded remediation walk
//!
//! Builds one scaffold part over an in-memory store and answers questions
//! at random until the tree has nothing left to ask.

use anyhow::Context;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use waypoint_catalog::{
    Choice, InMemoryStore, ItemCatalog, ItemRecord, PartStore, Question, Response,
    ScaffoldSettings, SectionSnapshot, SectionState,
};
use waypoint_core::{EngineConfig, LookupSession, ScaffoldPart};
use waypoint_ident::ResourceId;

const ROOT_OBJECTIVE: &str = "lo-root";
const CONFUSIONS: [&str; 3] = ["lo-place-value", "lo-regrouping", "lo-estimation"];

type Session = LookupSession<InMemoryStore, InMemoryStore>;

/// Walk parameters
#[derive(Debug, Clone)]
pub(crate) struct Options {
    pub(crate) seed: u64,
    pub(crate) max_levels: u32,
    pub(crate) max_waypoint_items: Option<u32>,
    pub(crate) waypoint_quota: Option<u32>,
    pub(crate) pool: usize,
    pub(crate) accuracy: f64,
    pub(crate) max_questions: usize,
    pub(crate) allow_repeats: bool,
}

/// Outcome of a walk
#[derive(Debug, Default)]
pub(crate) struct Summary {
    asked: usize,
    correct: usize,
    deepest: u32,
    unfilled: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Questions asked: {}", self.asked)?;
        writeln!(f, "Correct: {}", self.correct)?;
        writeln!(f, "Deepest waypoint: {}", self.deepest)?;
        write!(f, "Parts without an item: {}", self.unfilled)
    }
}

fn item(key: String, objective: &str) -> ItemRecord {
    let choices = (0..4)
        .map(|n| Choice::new(format!("{key}-c{n}"), format!("option {n}")))
        .collect();
    ItemRecord::new(
        ResourceId::canonical_item(key.as_str()),
        Question::new(format!("{objective} question {key}"), choices),
    )
    .with_objectives(vec![objective.to_string()])
    .with_answer(format!("{key}-c0"))
}

fn seed_store(options: &Options) -> anyhow::Result<(Arc<InMemoryStore>, ResourceId)> {
    let store = Arc::new(InMemoryStore::new());
    for objective in std::iter::once(ROOT_OBJECTIVE).chain(CONFUSIONS) {
        for n in 0..options.pool {
            store.insert_item(item(format!("{objective}-{n}"), objective));
        }
    }

    let settings = ScaffoldSettings::builder()
        .objective_ids(vec![ROOT_OBJECTIVE.to_string()])?
        .max_levels(Some(options.max_levels))
        .max_waypoint_items(options.max_waypoint_items)
        .waypoint_quota(options.waypoint_quota)
        .allow_repeat_items(options.allow_repeats)
        .build();
    let part_id = store.insert_part(settings);
    Ok((store, part_id))
}

/// First part in delivery order that the section has not seen
///
/// Depth-first in sibling order; parts in `skip` are passed over.
async fn next_question(
    session: &Session,
    section: &SectionSnapshot,
    root: &ResourceId,
    skip: &HashSet<ResourceId>,
) -> anyhow::Result<Option<ScaffoldPart>> {
    let mut stack = vec![root.clone()];
    while let Some(id) = stack.pop() {
        let part = session.resolve_part(&id, section).await?;
        if !section.is_known(&id) {
            if skip.contains(&id) {
                continue;
            }
            return Ok(Some(part));
        }
        let children = session.children(&part, section).await?;
        stack.extend(children.iter().rev().map(|child| child.id().clone()));
    }
    Ok(None)
}

pub(crate) async fn run(config: EngineConfig, options: &Options) -> anyhow::Result<Summary> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&options.accuracy),
        "accuracy must be between 0 and 1, got {}",
        options.accuracy
    );
    let (store, part_id) = seed_store(options)?;
    let session = LookupSession::new(Arc::clone(&store), Arc::clone(&store), config);
    let record = store.get_part(&part_id).await?;
    let root = session.root_id(&record)?;

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut section = SectionSnapshot::new();
    let mut skip = HashSet::new();
    let mut summary = Summary::default();

    tracing::info!(seed = options.seed, root = %root, "starting walk");

    while summary.asked < options.max_questions {
        let Some(part) = next_question(&session, &section, &root, &skip).await? else {
            break;
        };
        let indent = "  ".repeat(part.depth() as usize);

        let Some(item_id) = part.item().cloned() else {
            println!("{indent}- depth {} #{}: no item available", part.depth(), part.sibling_index());
            summary.unfilled += 1;
            skip.insert(part.id().clone());
            continue;
        };

        section.push_question(part.id().clone(), item_id.clone());
        let shown = session.present_item(&item_id, &mut rng).await?;

        let answer = shown.record().answer_id.clone().unwrap_or_default();
        let choice = if rng.gen_bool(options.accuracy) {
            answer
        } else {
            shown
                .choices()
                .iter()
                .filter(|c| c.id != answer)
                .collect::<Vec<_>>()
                .choose(&mut rng)
                .map(|c| c.id.clone())
                .context("item has no wrong choice")?
        };

        let correct = store.is_response_correct(&item_id, &choice).await?;
        let response = if correct {
            Response::correct()
        } else {
            let confused = CONFUSIONS.choose(&mut rng).copied().unwrap_or_default();
            Response::incorrect(vec![confused.to_string()])
        };

        println!(
            "{indent}- depth {} #{} [{}]: {} ({})",
            part.depth(),
            part.sibling_index(),
            part.objective_refs().join(", "),
            item_id.identifier(),
            if correct {
                "correct".to_string()
            } else {
                format!("incorrect, confused {}", response.confused_objectives.join(", "))
            }
        );
        section.record_response(item_id, response.with_choice(choice));

        summary.asked += 1;
        summary.correct += usize::from(correct);
        summary.deepest = summary.deepest.max(part.depth());
    }

    Ok(summary)
}
