// history.rs — Show or verify the workspace action history.

use fence_history::{render_markdown, ActionLog, HistoryError};

use crate::session::Session;

pub fn execute(session: &Session, verify: bool) -> anyhow::Result<()> {
    let path = ActionLog::path_for(session.workspace.root());

    if !verify {
        let entries = ActionLog::read_all(&path)?;
        print!("{}", render_markdown(&entries));
        return Ok(());
    }

    match ActionLog::verify_chain(&path) {
        Ok(count) => {
            println!("History verified: {} entry(ies), hash chain intact.", count);
            Ok(())
        }
        Err(HistoryError::IntegrityViolation {
            line,
            expected,
            actual,
        }) => {
            println!("INTEGRITY VIOLATION at line {}:", line);
            println!("  Expected previous_hash: {}", expected);
            println!("  Actual previous_hash:   {}", actual);
            anyhow::bail!("history integrity check failed")
        }
        Err(e) => Err(e.into()),
    }
}
