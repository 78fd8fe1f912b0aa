//! External files: `import-file` quoting and point inclusion for `inject-code` / `conversion-rule`.

use std::fs;
use std::path::PathBuf;

use typesys_core::lang::attributes as schema;
use typesys_core::lang::tags;

use super::Handler;
use super::attributes;
use crate::diagnostics::TypesystemError;

const BANNER_RULE: &str = "// ========================================================================";

impl Handler<'_> {
    /// `import-file`: feed a window of an external file as text of the enclosing frame.
    ///
    /// ## Errors
    /// - [`TypesystemError::Attribute`] without a `name`.
    /// - [`TypesystemError::Resource`] when the file cannot be found or a marker line is missing.
    pub(super) fn import_file(&mut self, raw: &[(String, String)]) -> Result<(), TypesystemError> {
        let attrs = attributes::resolve(
            tags::IMPORT_FILE,
            schema::IMPORT_FILE.iter(),
            raw,
            self.default_context(),
            &*self.db,
        )?;
        let name = attrs.get("name");
        let path = self
            .locate_file(name)
            .ok_or_else(|| TypesystemError::resource(format!("Could not open file: '{name}'")))?;
        let content = fs::read_to_string(&path).map_err(|source| TypesystemError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let lines = quote_window(
            &content,
            attrs.get("quote-after-line"),
            attrs.get("quote-before-line"),
            name,
        )?;
        tracing::debug!(file = %path.display(), lines = lines.len(), "importing file");
        for line in lines {
            self.route_text(&format!("{line}\n"));
        }
        Ok(())
    }

    /// Contents of `name` wrapped in the custom-code banner, or `None` if it cannot be read.
    pub(super) fn read_code_file(&self, name: &str) -> Option<String> {
        let path = self.locate_file(name)?;
        let content = fs::read_to_string(&path).ok()?;
        Some(format!(
            "{BANNER_RULE}\n// START of custom code block [file: {name}]\n{content}\n// END of custom code block [file: {name}]\n{BANNER_RULE}\n"
        ))
    }

    /// `name` as given, then relative to the configured fallback directory.
    fn locate_file(&self, name: &str) -> Option<PathBuf> {
        let direct = PathBuf::from(name);
        if direct.is_file() {
            return Some(direct);
        }
        self.db
            .config()
            .import_fallback_dir
            .as_ref()
            .map(|dir| dir.join(name))
            .filter(|candidate| candidate.is_file())
    }
}

/// Lines strictly after the first line containing `after` and strictly before the next line
/// containing `before`. An empty marker means "from the start" / "to the end".
///
/// ## Errors
/// - [`TypesystemError::Resource`] naming every marker that was not found.
pub(crate) fn quote_window<'c>(
    content: &'c str,
    after: &str,
    before: &str,
    file: &str,
) -> Result<Vec<&'c str>, TypesystemError> {
    let mut found_after = after.is_empty();
    let mut found_before = before.is_empty();
    let mut quoting = after.is_empty();
    let mut lines = Vec::new();

    for line in content.lines() {
        if quoting {
            if !before.is_empty() && line.contains(before) {
                found_before = true;
                break;
            }
            lines.push(line);
        } else if line.contains(after) {
            quoting = true;
            found_after = true;
        }
    }

    let mut missing = Vec::new();
    if !found_after {
        missing.push(format!("Could not find quote-after-line='{after}' in file '{file}'."));
    }
    if !found_before {
        missing.push(format!("Could not find quote-before-line='{before}' in file '{file}'."));
    }
    if !missing.is_empty() {
        return Err(TypesystemError::resource(missing.join(" ")));
    }
    Ok(lines)
}
