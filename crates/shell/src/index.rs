use catalog::Catalog;
use foundation::text::{escape_html, summary};

const LEDE_CHARS: usize = 160;

/// Landing page: one card per data module, linking to its route.
pub fn render_index(catalog: &Catalog) -> String {
    let mut out = String::from(
        r#"<section class="dwl-index"><p class="dwl-kicker">Data modules</p><h1>Maghreb in data</h1><ul class="dwl-card-list">"#,
    );
    for page in catalog.pages() {
        out.push_str(&format!(
            r#"<li><a class="dwl-card" href="{}" data-slug="{}"><span class="dwl-kicker">{}</span><h2>{}</h2><p>{}</p><span class="dwl-card__count">{} entries</span></a></li>"#,
            escape_html(&page.path()),
            escape_html(&page.slug),
            escape_html(&page.kicker),
            escape_html(&page.title),
            escape_html(&summary(&page.lede, LEDE_CHARS)),
            page.dataset().len()
        ));
    }
    out.push_str("</ul></section>");
    out
}

/// Shown for any path the catalog does not resolve.
pub fn render_not_found(path: &str) -> String {
    format!(
        r#"<section class="dwl-index dwl-not-found"><h1>Page not found</h1><p>Nothing lives at <code>{}</code>.</p><p><a href="/">Back to all data modules</a></p></section>"#,
        escape_html(path)
    )
}

#[cfg(test)]
mod tests {
    use super::{render_index, render_not_found};
    use catalog::Catalog;

    #[test]
    fn index_links_every_page() {
        let catalog = Catalog::builtin().expect("catalog");
        let html = render_index(&catalog);
        for page in catalog.pages() {
            assert!(html.contains(&format!(r#"href="/data/{}""#, page.slug)));
        }
        assert_eq!(html.matches(r#"class="dwl-card""#).count(), catalog.len());
    }

    #[test]
    fn not_found_escapes_the_path() {
        let html = render_not_found("/data/<x>");
        assert!(html.contains("/data/&lt;x&gt;"));
    }
}
