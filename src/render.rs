//! HTML rendering for the checkbox page and broadcast fragments
//!
//! Plain `format!`-based markup. The checkbox fragment is the payload of
//! every `checkbox-{id}-updated` broadcast, so it must stay identical to
//! the markup the index page renders for the same state.

use crate::store::CheckboxId;

/// A single checkbox input plus its label.
///
/// Sent both as the toggle response and as the SSE broadcast payload;
/// clients swap it into the matching `checkbox-{id}` container.
pub fn checkbox_fragment(id: CheckboxId, checked: bool) -> String {
    let checked_attr = if checked { "checked" } else { "" };
    format!(
        r#"<input type="checkbox" id="cb-{id}" {checked_attr} hx-post="/toggle/{id}" hx-swap="none"><label for="cb-{id}">{id}</label>"#
    )
}

/// The online-connections counter fragment, broadcast on every
/// register/unregister. Swapped into the page's
/// `online-count-container` element.
pub fn online_counter(count: usize) -> String {
    format!(r#"<span id="online-count">{count}</span>"#)
}

/// One checkbox wrapped in its SSE-swap container, as rendered on the
/// index page.
fn checkbox_item(id: CheckboxId, checked: bool) -> String {
    format!(
        r#"<div class="checkbox-item" id="checkbox-{id}" sse-swap="checkbox-{id}-updated" hx-swap="innerHTML">{}</div>"#,
        checkbox_fragment(id, checked)
    )
}

/// The full index page for a newly loading observer.
///
/// Renders the complete current state, wires up the SSE connection with the
/// page's originator id, and injects that id into every HTMX request header
/// so the server can exclude this page from its own updates.
pub fn index_page(
    checkboxes: &[(CheckboxId, bool)],
    checked_count: usize,
    online_count: usize,
    originator_id: &str,
) -> String {
    let domain_size = checkboxes.len();
    let items: String = checkboxes
        .iter()
        .map(|&(id, checked)| checkbox_item(id, checked))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{domain_size} Checkboxes - Hypermedia Sync</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <script src="https://unpkg.com/htmx.org@1.9.12"></script>
    <script src="https://unpkg.com/htmx.org@1.9.12/dist/ext/sse.js"></script>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }}
        .container {{ max-width: 1200px; margin: 0 auto; background-color: white; padding: 20px; border-radius: 8px; }}
        .stats {{ text-align: center; margin-bottom: 20px; padding: 15px; background-color: #e9ecef; border-radius: 8px; }}
        .checkbox-grid {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 5px; max-height: 600px; overflow-y: auto; padding: 20px; }}
        .checkbox-item {{ display: flex; align-items: center; padding: 8px; background-color: white; border-radius: 4px; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="stats">
            <strong>Checked: <span id="checked-count">{checked_count}</span> / {domain_size}</strong>
        </div>
        <div hx-ext="sse" sse-connect="/events?originator={originator_id}" id="sse-wrapper">
            <div class="stats">
                <strong>Online: <span id="online-count-container" sse-swap="online-count-updated" hx-swap="innerHTML">{online}</span></strong>
            </div>
            <div class="checkbox-grid" id="checkbox-grid">
{items}
            </div>
        </div>
    </div>
    <script>
        window.originatorId = '{originator_id}';
        document.addEventListener('htmx:configRequest', function(evt) {{
            evt.detail.headers['X-Originator-ID'] = window.originatorId;
        }});
        document.addEventListener('htmx:afterSwap', function(evt) {{
            var checked = document.querySelectorAll('input[type="checkbox"]:checked').length;
            var el = document.getElementById('checked-count');
            if (el) {{ el.textContent = checked; }}
        }});
    </script>
</body>
</html>"#,
        online = online_counter(online_count),
    )
}
