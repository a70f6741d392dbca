// edits.rs — extract and apply.
//
// `apply` accepts either a raw model response (edits are extracted first)
// or, with `--json`, a candidate list as printed by `extract`, so the two
// steps can be run separately with a review in between.

use std::path::Path;

use anyhow::Context;

use fence_edits::{apply_edits, ApplyResult, CandidateEdit, EditExtractor};
use fence_history::ActionKind;

use super::{print_json, read_input};
use crate::session::Session;

pub fn extract(session: &Session, input: Option<&Path>) -> anyhow::Result<()> {
    let text = read_input(input)?;
    print_json(&extractor(session).extract(&text))
}

pub fn apply(session: &Session, input: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let text = read_input(input)?;
    let results = apply_text(session, &text, json)?;
    print_json(&results)
}

fn extractor(session: &Session) -> EditExtractor {
    EditExtractor::default().with_duplicate_policy(session.config.extract.duplicates)
}

fn apply_text(session: &Session, text: &str, json: bool) -> anyhow::Result<Vec<ApplyResult>> {
    let edits: Vec<CandidateEdit> = if json {
        serde_json::from_str(text).context("expected a JSON array of { path, content }")?
    } else {
        extractor(session).extract(text)
    };
    if edits.is_empty() {
        tracing::warn!("no edits found in input");
    }

    let results = apply_edits(&session.workspace, &edits, &session.cancel_token());
    let applied = results.iter().filter(|r| r.success).count();
    session.record(
        ActionKind::Apply,
        text,
        &format!("{} of {} edits applied", applied, results.len()),
    );
    Ok(results)
}
