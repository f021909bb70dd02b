//! Text rendering of the user list.

use std::fmt::Write;

use crate::domain::{EditableField, Record};
use crate::services::ReadModel;

const TITLE: &str = "User Management";

/// Renders the whole user list screen.
pub fn render(view: &ReadModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", TITLE);
    let _ = writeln!(out, "Search: {}", search_line(&view.search_term));
    out.push('\n');

    if view.loading {
        out.push_str("  Loading...\n");
    } else if view.visible_items.is_empty() {
        out.push_str(&render_empty_state(view));
    } else {
        out.push_str(&render_rows(view));
    }

    out.push('\n');
    out.push_str(&render_pager(view));
    out
}

fn search_line(term: &str) -> String {
    if term.is_empty() {
        "(none)".to_string()
    } else {
        format!("\"{}\"", term)
    }
}

fn render_empty_state(view: &ReadModel) -> String {
    if view.search_term.is_empty() {
        "  No users on this page\n".to_string()
    } else {
        "  No users match the search on this page\n".to_string()
    }
}

fn render_rows(view: &ReadModel) -> String {
    let id_width = view
        .visible_items
        .iter()
        .map(|r| r.id.to_string().len())
        .max()
        .unwrap_or(2)
        .max(2);
    let name_width = view
        .visible_items
        .iter()
        .map(|r| r.display_name().chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:>id_width$}  {:<name_width$}  Email",
        "ID",
        "Name",
        id_width = id_width,
        name_width = name_width
    );

    for record in &view.visible_items {
        match view.edit_buffer.as_ref().filter(|draft| draft.id == record.id) {
            Some(draft) => {
                let _ = writeln!(
                    out,
                    "> {:>id_width$}  {}",
                    record.id,
                    render_draft(draft),
                    id_width = id_width
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "  {:>id_width$}  {:<name_width$}  {}",
                    record.id,
                    record.display_name(),
                    record.email,
                    id_width = id_width,
                    name_width = name_width
                );
            }
        }
    }
    out
}

fn render_draft(draft: &Record) -> String {
    let fields = EditableField::ALL
        .iter()
        .map(|field| format!("[{}: {}]", field.label(), draft.field(*field)))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{}  (save | cancel)", fields)
}

fn render_pager(view: &ReadModel) -> String {
    let previous = if view.can_go_previous {
        "< prev"
    } else {
        "  ----"
    };
    let next = if view.can_go_next { "next >" } else { "----  " };
    format!(
        "{}    Page {} of {}    {}\n",
        previous, view.page_number, view.total_pages, next
    )
}
