//! Unified diff between two pastes.

use crate::models::paste::Paste;
use similar::TextDiff;

/// Produce a unified diff from `parent` to `child`.
///
/// File labels are the pastes' filenames, falling back to `Paste #N`.
pub fn unified(parent: &Paste, child: &Paste) -> String {
    TextDiff::from_lines(parent.content.as_str(), child.content.as_str())
        .unified_diff()
        .context_radius(3)
        .header(&parent.label(), &child.label())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::paste::NewPaste;

    fn paste(id: u64, content: &str, filename: Option<&str>) -> Paste {
        let mut paste = Paste::build(NewPaste {
            content: content.to_string(),
            filename: filename.map(str::to_string),
            ..NewPaste::default()
        })
        .expect("build");
        paste.id = id;
        paste
    }

    #[test]
    fn diff_carries_labels_and_changed_lines() {
        let parent = paste(1, "line1\n", Some("a.txt"));
        let child = paste(2, "line2\n", None);

        let diff = unified(&parent, &child);
        assert!(diff.contains("--- a.txt"));
        assert!(diff.contains("+++ Paste #2"));
        assert!(diff.contains("-line1"));
        assert!(diff.contains("+line2"));
    }

    #[test]
    fn identical_content_produces_no_hunks() {
        let parent = paste(1, "same\n", None);
        let child = paste(2, "same\n", None);
        let diff = unified(&parent, &child);
        assert!(!diff.contains("@@"));
    }
}
