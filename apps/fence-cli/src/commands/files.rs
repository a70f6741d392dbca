// files.rs — open, files, read, write, delete, create.

use clap::ValueEnum;
use serde_json::json;

use fence_history::ActionKind;
use fence_workspace::ItemKind;

use super::{print_json, read_input};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CreateKind {
    File,
    Directory,
}

impl From<CreateKind> for ItemKind {
    fn from(kind: CreateKind) -> Self {
        match kind {
            CreateKind::File => ItemKind::File,
            CreateKind::Directory => ItemKind::Directory,
        }
    }
}

pub fn open(session: &Session) -> anyhow::Result<()> {
    print_json(&session.opened)
}

pub fn list(session: &Session) -> anyhow::Result<()> {
    let report = session.workspace.list_files(&session.cancel_token())?;
    print_json(&report)
}

pub fn read(session: &Session, path: &str) -> anyhow::Result<()> {
    print!("{}", session.workspace.read_file(path)?);
    Ok(())
}

pub fn write(session: &Session, path: &str, content: Option<String>) -> anyhow::Result<()> {
    let content = match content {
        Some(content) => content,
        None => read_input(None)?,
    };
    write_content(session, path, &content)?;
    print_json(&json!({ "success": true, "path": path }))
}

pub fn delete(session: &Session, path: &str) -> anyhow::Result<()> {
    session.workspace.delete(path)?;
    session.record(ActionKind::Delete, path, "deleted");
    print_json(&json!({ "success": true, "path": path }))
}

pub fn create(
    session: &Session,
    path: &str,
    kind: CreateKind,
    content: Option<&str>,
) -> anyhow::Result<()> {
    create_item(session, path, kind, content)?;
    print_json(&json!({ "success": true, "path": path }))
}

fn write_content(session: &Session, path: &str, content: &str) -> anyhow::Result<()> {
    session.workspace.write_file(path, content)?;
    session.record(
        ActionKind::Write,
        path,
        &format!("wrote {} bytes", content.len()),
    );
    Ok(())
}

fn create_item(
    session: &Session,
    path: &str,
    kind: CreateKind,
    content: Option<&str>,
) -> anyhow::Result<()> {
    session.workspace.create_item(path, kind.into(), content)?;
    let summary = match kind {
        CreateKind::File => "created file",
        CreateKind::Directory => "created directory",
    };
    session.record(ActionKind::Create, path, summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fence_history::ActionLog;
    use fence_workspace::WorkspaceManager;
    use std::fs;
    use tempfile::tempdir;

    fn session(dir: &std::path::Path) -> Session {
        Session::open(&WorkspaceManager::new(), dir, None).unwrap()
    }

    #[test]
    fn mutations_are_recorded_in_order() {
        let dir = tempdir().unwrap();
        let session = session(dir.path());

        write_content(&session, "src/a.txt", "hello").unwrap();
        create_item(&session, "docs", CreateKind::Directory, None).unwrap();
        delete(&session, "src/a.txt").unwrap();

        assert!(dir.path().join("docs").is_dir());
        assert!(!dir.path().join("src/a.txt").exists());

        let entries = ActionLog::read_all(ActionLog::path_for(session.workspace.root())).unwrap();
        let actions: Vec<ActionKind> = entries.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![ActionKind::Write, ActionKind::Create, ActionKind::Delete]
        );
        assert_eq!(entries[0].result, "wrote 5 bytes");
    }

    #[test]
    fn rejected_paths_are_not_recorded() {
        let dir = tempdir().unwrap();
        let session = session(dir.path());

        assert!(write_content(&session, "../escape.txt", "x").is_err());
        assert!(delete(&session, "missing.txt").is_err());
        assert!(!ActionLog::path_for(session.workspace.root()).exists());
    }

    #[test]
    fn create_file_with_content() {
        let dir = tempdir().unwrap();
        let session = session(dir.path());

        create_item(&session, "notes/todo.md", CreateKind::File, Some("- ship")).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("notes/todo.md")).unwrap(),
            "- ship"
        );
    }
}
