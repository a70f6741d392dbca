// pipeline.rs — End-to-end test: model response → candidate edits → disk.
//
// Flow:
//   1. Open a workspace over a temp directory with an existing file
//   2. Extract edits from a response that mixes valid and hostile paths
//   3. Apply them through the sandbox
//   4. Apply the same batch again
//
// VERIFY:
//   - Candidates come out in response order, first occurrence wins
//   - Every hostile path is rejected and nothing lands outside the root
//   - Valid edits are written exactly as extracted
//   - A second apply gives the same files and the same result shape

use std::fs;

use tempfile::tempdir;

use fence_edits::{apply_edits, extract_edits, ApplyResult};
use fence_workspace::{CancelToken, Workspace};

const RESPONSE: &str = r#"Here is the update.

```python
# filepath: app.py
def main():
    print("hello")
```

And the frontend entry point:

```javascript
// file: index.js
console.log("hello");
```

This one tries to leave the project:

```bash
# filepath: ../outside.sh
rm -rf ~
```

An earlier draft of app.py, ignored:

```python
# filepath: app.py
print("old")
```

```python
# filepath: memory/notes/todo.py
items = []
```
"#;

fn shape(results: &[ApplyResult]) -> Vec<(String, bool)> {
    results.iter().map(|r| (r.path.clone(), r.success)).collect()
}

#[test]
fn response_to_disk_round_trip() {
    let parent = tempdir().unwrap();
    let root = parent.path().join("project");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("app.py"), "print('before')\n").unwrap();

    let ws = Workspace::open(&root).unwrap();

    // =========================================================
    // Extract
    // =========================================================
    let edits = extract_edits(RESPONSE);
    let paths: Vec<&str> = edits.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["app.py", "index.js", "../outside.sh", "memory/notes/todo.py"]
    );
    assert_eq!(edits[0].content, "def main():\n    print(\"hello\")");

    // =========================================================
    // Apply
    // =========================================================
    let results = apply_edits(&ws, &edits, &CancelToken::none());
    assert_eq!(results.len(), edits.len());
    assert!(results[0].success);
    assert!(results[1].success);
    assert!(!results[2].success);
    assert!(results[3].success);

    assert_eq!(
        fs::read_to_string(root.join("app.py")).unwrap(),
        "def main():\n    print(\"hello\")"
    );
    assert_eq!(
        ws.read_file("index.js").unwrap(),
        "console.log(\"hello\");"
    );
    // The synthetic prefix is dropped, so the file lands under notes/.
    assert!(root.join("notes/todo.py").is_file());
    assert!(!parent.path().join("outside.sh").exists());

    // =========================================================
    // Idempotence
    // =========================================================
    let again = apply_edits(&ws, &edits, &CancelToken::none());
    assert_eq!(shape(&results), shape(&again));
    assert_eq!(
        fs::read_to_string(root.join("app.py")).unwrap(),
        "def main():\n    print(\"hello\")"
    );
}

#[test]
fn spellings_of_one_file_apply_once() {
    let dir = tempdir().unwrap();
    let ws = Workspace::open(dir.path()).unwrap();
    let response = "```python\n# filepath: app.py\nfirst\n```\n\
                    ```python\n# filepath: memory/app.py\nsecond\n```\n\
                    ```python\n# filepath: src/../app.py\nthird\n```\n";

    let edits = extract_edits(response);
    assert_eq!(edits.len(), 1);

    let results = apply_edits(&ws, &edits, &CancelToken::none());
    assert!(results[0].success);
    assert_eq!(fs::read_to_string(dir.path().join("app.py")).unwrap(), "first");
}

#[test]
fn hostile_paths_never_escape() {
    let parent = tempdir().unwrap();
    let root = parent.path().join("ws");
    fs::create_dir(&root).unwrap();
    let ws = Workspace::open(&root).unwrap();

    let hostile = [
        "../../etc/passwd",
        "..\\..\\escape.txt",
        "a/../../escape.txt",
        "./../escape.txt",
    ];
    let response: String = hostile
        .iter()
        .map(|p| format!("```text\n// filepath: {}\npwned\n```\n", p))
        .collect();

    let edits = extract_edits(&response);
    assert_eq!(edits.len(), hostile.len());

    let results = apply_edits(&ws, &edits, &CancelToken::none());
    assert!(results.iter().all(|r| !r.success));
    assert!(!parent.path().join("escape.txt").exists());
    assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
}

#[test]
fn leading_separators_stay_inside_the_root() {
    let dir = tempdir().unwrap();
    let ws = Workspace::open(dir.path()).unwrap();

    let edits = extract_edits("```\n# filepath: /etc/passwd\nroot:x:0:0\n```");
    let results = apply_edits(&ws, &edits, &CancelToken::none());

    assert!(results[0].success);
    assert_eq!(
        fs::read_to_string(dir.path().join("etc/passwd")).unwrap(),
        "root:x:0:0"
    );
}

#[test]
fn unnamed_block_is_applied_under_generated_name() {
    let dir = tempdir().unwrap();
    let ws = Workspace::open(dir.path()).unwrap();

    let body: String = (1..=10).map(|i| format!("line number {}\n", i)).collect();
    let response = format!("Try this:\n```\n{}```\n", body);

    let edits = extract_edits(&response);
    assert_eq!(edits.len(), 1);
    assert!(edits[0].path.starts_with("generated_"));

    let results = apply_edits(&ws, &edits, &CancelToken::none());
    assert!(results[0].success);
    assert!(dir.path().join(&edits[0].path).is_file());
}
