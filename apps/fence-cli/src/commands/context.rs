// context.rs — Print the bounded context digest for a prompt.

use clap::ValueEnum;

use fence_context::{build_context, ContextDigest};

use crate::session::Session;

/// Which limit preset to build the digest with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    /// Small digest attached to every chat request.
    Chat,
    /// Larger digest for whole-codebase requests.
    Codebase,
}

pub fn execute(session: &Session, profile: Profile) -> anyhow::Result<()> {
    let digest = build(session, profile)?;
    print!("{}", digest.render());
    Ok(())
}

fn build(session: &Session, profile: Profile) -> anyhow::Result<ContextDigest> {
    let limits = match profile {
        Profile::Chat => session.config.chat_limits(),
        Profile::Codebase => session.config.codebase_limits(),
    };
    let digest = build_context(&session.workspace, &limits, &session.cancel_token())?;

    for skipped in &digest.skipped {
        tracing::warn!(path = %skipped.path, "left out of context: {}", skipped.reason);
    }
    tracing::info!(
        included = digest.files.len(),
        eligible = digest.total_files,
        "context built"
    );
    Ok(digest)
}
