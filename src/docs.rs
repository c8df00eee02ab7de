use crate::field::FieldDescriptor;
use std::{fs, path::Path};

/// Render a markdown summary table of the environment variables a record reads
pub fn render_markdown(fields: &[FieldDescriptor]) -> String {
    let mut md = String::new();

    md.push_str("## Environment Variables Summary\n\n");
    md.push_str("| Variable | Field | Type | Required | Default |\n");
    md.push_str("|----------|-------|------|----------|---------|\n");
    for field in fields.iter().filter(|field| !field.is_skipped()) {
        let required_str = if field.required { "Yes" } else { "No" };
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            or_dash(field.env),
            field.name,
            field.kind,
            required_str,
            or_dash(field.default)
        ));
    }

    md
}

/// Write the markdown summary to `path`
pub fn write_docs(fields: &[FieldDescriptor], path: impl AsRef<Path>) -> std::io::Result<()> {
    fs::write(path, render_markdown(fields))
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
