//! Context assembly from retrieved documents

use std::fmt::Write;

use super::RetrievedDocument;
use super::Section;

/// Render ranked documents as one line each, labelled by section.
///
/// Returns exactly `""` for an empty slice. The whole result is trimmed, so
/// the final line carries no trailing newline.
pub fn format_documents_as_context(documents: &[RetrievedDocument]) -> String {
    if documents.is_empty() {
        return String::new();
    }

    let mut context = String::new();
    for doc in documents {
        push_line(&mut context, doc);
    }

    context.trim().to_string()
}

fn push_line(context: &mut String, doc: &RetrievedDocument) {
    let meta = &doc.metadata;
    let content = &doc.content;

    // Writing into a String cannot fail
    let _ = match meta.section {
        Section::Skills => match &meta.subsection {
            Some(subsection) => writeln!(context, "{subsection}: {content}"),
            None => writeln!(context, "Skills: {content}"),
        },
        Section::Experience => {
            context.push_str("Work Experience: ");
            context.push_str(content);
            if let Some(company) = &meta.company {
                let _ = write!(context, " (at {company})");
            }
            writeln!(context)
        }
        Section::Projects => {
            context.push_str("Project: ");
            context.push_str(content);
            if let Some(project_name) = &meta.project_name {
                let _ = write!(context, " ({project_name})");
            }
            writeln!(context)
        }
        Section::Education => writeln!(context, "Education: {content}"),
        Section::Contact => writeln!(context, "Contact: {content}"),
        Section::Other => writeln!(context, "{content}"),
    };
}
