//! Import diff. Imports have no update command, so any change to the list
//! replaces all of them.

use stylediff_types::{deep_equal, Command, ImportView};

/// Append the commands turning the `before` import list into `after`.
///
/// Every before import is removed and every after import re-added, unless
/// both lists are identical.
pub fn diff_imports(
    before: &[ImportView<'_>],
    after: &[ImportView<'_>],
    commands: &mut Vec<Command>,
) {
    let unchanged = before.len() == after.len()
        && before
            .iter()
            .zip(after)
            .all(|(old, new)| deep_equal(old.raw(), new.raw()));
    if unchanged {
        return;
    }

    commands.extend(before.iter().map(|import| Command::RemoveImport {
        id: import.id().to_string(),
    }));
    commands.extend(after.iter().map(|import| Command::AddImport {
        import: import.raw().clone(),
    }));
}
