// --- FILE: dirtree-lib/src/markdown.rs ---

use log::debug;

use crate::errors::{TreeError, TreeResult};

/// Heading of every generated document.
pub const DOCUMENT_HEADING: &str = "# Project File and Folder Structure";

const DOCUMENT_INTRO: &str = "Below is the structure of the project:";
const FENCE: &str = "```";

/// Wraps a rendered structure in the markdown document template:
///
/// ````text
/// # Project File and Folder Structure
///
/// Below is the structure of the project:
///
/// ```
/// <full_text>
/// ```
/// ````
///
/// # Errors
///
/// Returns [`TreeError::Precondition`] when `root_folder_name` or
/// `full_text` is empty, i.e. no structure has been generated yet.
pub fn render_as_markdown(root_folder_name: &str, full_text: &str) -> TreeResult<String> {
    if root_folder_name.is_empty() {
        return Err(TreeError::Precondition(
            "root folder name is missing".to_string(),
        ));
    }
    if full_text.is_empty() {
        return Err(TreeError::Precondition(
            "folder structure is empty".to_string(),
        ));
    }
    debug!(
        "Rendering markdown document for '{}' ({} bytes of structure)",
        root_folder_name,
        full_text.len()
    );
    Ok(wrap_in_document(full_text))
}

/// Template wrapping without input checks, for structures that are known to
/// have been produced by a run.
pub(crate) fn wrap_in_document(full_text: &str) -> String {
    let mut doc = String::with_capacity(full_text.len() + 96);
    doc.push_str(DOCUMENT_HEADING);
    doc.push_str("\n\n");
    doc.push_str(DOCUMENT_INTRO);
    doc.push_str("\n\n");
    doc.push_str(FENCE);
    doc.push('\n');
    doc.push_str(full_text);
    doc.push('\n');
    doc.push_str(FENCE);
    doc.push('\n');
    doc
}

/// File name a host should give the document: `<root_folder_name>.md`.
pub fn output_file_name(root_folder_name: &str) -> String {
    format!("{}.md", root_folder_name)
}
