use foundation::text::escape_html;

/// Base styles shared by every page. Map library styles are loaded at
/// runtime alongside the script.
pub const STYLESHEET: &str = r#"
:root { --ink: #1f1b16; --muted: #6b6257; --paper: #faf7f2; --rule: #e4ddd1; }
body { margin: 0; background: var(--paper); color: var(--ink); font: 16px/1.5 Georgia, serif; }
.dwl-index, .dwl-page { max-width: 960px; margin: 0 auto; padding: 2rem 1.25rem 4rem; }
.dwl-kicker { text-transform: uppercase; letter-spacing: .08em; color: var(--muted); font-size: .8rem; }
.dwl-stats { display: flex; gap: 2rem; border-block: 1px solid var(--rule); padding: 1rem 0; }
.dwl-stat__value { display: block; font-size: 1.6rem; }
.dwl-stat__label { color: var(--muted); font-size: .85rem; }
.dwl-filter { border: 1px solid var(--rule); background: #fff; border-radius: 999px; padding: .3rem .8rem; cursor: pointer; }
.dwl-filter::before { content: ""; display: inline-block; width: .6rem; height: .6rem; border-radius: 50%; background: var(--swatch, transparent); margin-right: .35rem; }
.dwl-filter.is-active { background: var(--ink); color: var(--paper); }
.dwl-diagram { width: 100%; height: auto; }
.dwl-diagram .dwl-mark, .dwl-diagram .dwl-bar { cursor: pointer; transition: opacity .3s ease; }
.dwl-label { font-size: 11px; fill: var(--ink); }
.dwl-tick, .dwl-axis { font-size: 10px; fill: var(--muted); }
.dwl-legend { display: flex; flex-wrap: wrap; gap: 1rem; list-style: none; padding: 0; font-size: .85rem; }
.dwl-swatch { display: inline-block; width: .75rem; height: .75rem; border-radius: 2px; margin-right: .35rem; }
.dwl-record-list { list-style: none; padding: 0; }
.dwl-record { border-left: 4px solid var(--swatch); margin: .25rem 0; }
.dwl-record button { all: unset; cursor: pointer; display: block; padding: .4rem .75rem; width: 100%; }
.dwl-record.is-hovered, .dwl-record.is-expanded { background: #fff; }
.dwl-record.is-today { outline: 2px dashed var(--swatch); }
.dwl-detail { background: #fff; border: 1px solid var(--rule); padding: 1rem 1.25rem; }
.dwl-map { height: 420px; border: 1px solid var(--rule); }
.map-placeholder { padding: 1rem; color: var(--muted); text-align: center; }
.dwl-card { display: block; padding: 1rem 0; border-bottom: 1px solid var(--rule); color: inherit; text-decoration: none; }
@media (prefers-reduced-motion: reduce) { [data-reveal] { transition: none !important; } }
"#;

/// A complete HTML document around `body`.
pub fn render_document(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<style>{STYLESHEET}</style>
</head>
<body>
<main id="app">{body}</main>
</body>
</html>
"#,
        escape_html(title)
    )
}

#[cfg(test)]
mod tests {
    use super::render_document;

    #[test]
    fn wraps_body_and_escapes_title() {
        let html = render_document("Salt & gold", "<p>x</p>");
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<title>Salt &amp; gold</title>"));
        assert!(html.contains(r#"<main id="app"><p>x</p></main>"#));
    }
}
