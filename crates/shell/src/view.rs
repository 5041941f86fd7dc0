use catalog::{Entry, Page, TagKey};
use foundation::RecordId;
use foundation::math::LngLat;
use foundation::text::escape_html;
use foundation::time::CivilDate;
use layers::Placeholder;
use layers::symbology::MarkerStyle;
use scene::highlight::todays_record;
use scene::visibility::{RevealSet, RevealStyle};
use scene::{Filter, PageState, Record, derive};

use crate::diagram::render_diagram;
use crate::region::{Block, Region};

/// Everything a page render reads. Rendering is a pure function of this.
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    pub page: &'a Page,
    pub state: &'a PageState<TagKey>,
    pub reveal: &'a RevealSet,
    /// Injected "today"; `None` disables the highlight.
    pub today: Option<CivilDate>,
    /// What the map region shows instead of a live map.
    pub map_status: Option<Placeholder>,
}

impl<'a> PageView<'a> {
    pub fn todays_record(&self) -> Option<&'a Entry> {
        todays_record(self.page.dataset(), self.today?)
    }

    pub fn is_today(&self, id: RecordId) -> bool {
        self.todays_record().is_some_and(|e| e.id == id)
    }

    /// Opacity of a diagram mark; follows the map's dim-or-hide policy.
    pub fn mark_opacity(&self, tag: &TagKey) -> f32 {
        let style = MarkerStyle {
            filtered_out: self.page.filtered_out(),
            ..MarkerStyle::default()
        };
        style.opacity(self.state.filter().matches(tag))
    }

    pub fn tag_label<'t>(&self, tag: &'t TagKey) -> &'t str
    where
        'a: 't,
    {
        self.page.legend().label_for(tag).unwrap_or(tag.as_ref())
    }

    /// The whole page as one `<article>`.
    pub fn render(&self) -> String {
        let page = self.page;
        let mut out = format!(
            r#"<article class="dwl-page" data-slug="{}" data-content-hash="{}">"#,
            escape_html(&page.slug),
            page.content_hash()
        );
        out.push_str(&format!(
            r#"<header class="dwl-hero" data-region="hero" {}>{}</header>"#,
            self.reveal_attrs(Block::Hero),
            self.render_region(Region::Hero)
        ));
        out.push_str(&format!(
            r#"<section class="dwl-stats" data-region="stats" {}>{}</section>"#,
            self.reveal_attrs(Block::Stats),
            self.render_region(Region::Stats)
        ));

        out.push_str(&format!(
            r#"<section class="dwl-section" {}><h2>{}</h2>"#,
            self.reveal_attrs(Block::Section),
            escape_html(&page.section)
        ));
        for region in [Region::Filters, Region::Diagram, Region::Records] {
            out.push_str(&format!(
                r#"<div class="dwl-{key}" data-region="{key}">{}</div>"#,
                self.render_region(region),
                key = region.key()
            ));
        }
        out.push_str(&format!(
            r#"<aside class="dwl-detail" data-region="detail" aria-live="polite">{}</aside></section>"#,
            self.render_region(Region::Detail)
        ));

        if page.has_map() {
            out.push_str(&format!(
                r#"<section class="dwl-map-section" data-region="map" {}>{}</section>"#,
                self.reveal_attrs(Block::Map),
                self.render_region(Region::Map)
            ));
        }
        if !page.sources.is_empty() {
            out.push_str(&format!(
                r#"<footer class="dwl-sources" data-region="sources" {}>{}</footer>"#,
                self.reveal_attrs(Block::Sources),
                self.render_region(Region::Sources)
            ));
        }
        out.push_str(r#"<nav class="dwl-back"><a href="/">All data modules</a></nav></article>"#);
        out
    }

    /// Inner markup of one region.
    pub fn render_region(&self, region: Region) -> String {
        match region {
            Region::Hero => self.hero(),
            Region::Stats => self.stats(),
            Region::Filters => self.filters(),
            Region::Diagram => render_diagram(self),
            Region::Records => self.records(),
            Region::Detail => self.detail(),
            Region::Map => self.map(),
            Region::Sources => self.sources(),
        }
    }

    fn reveal_attrs(&self, block: Block) -> String {
        let revealed = self.reveal.is_revealed(block.id());
        format!(
            r#"data-reveal="{}" style="{}""#,
            block.id().0,
            RevealStyle::for_state(revealed, block.stagger_index()).to_css()
        )
    }

    fn hero(&self) -> String {
        let page = self.page;
        let mut out = format!(
            r#"<p class="dwl-kicker">{}</p><h1>{}</h1><p class="dwl-lede">{}</p>"#,
            escape_html(&page.kicker),
            escape_html(&page.title),
            escape_html(&page.lede)
        );
        if let (Some(today), Some(e)) = (self.today, self.todays_record()) {
            out.push_str(&format!(
                r#"<p class="dwl-today">Today is {}: <button type="button" data-action="toggle" data-arg="{}">{}</button></p>"#,
                today.weekday().name(),
                e.id,
                escape_html(&e.label)
            ));
        }
        out
    }

    fn stats(&self) -> String {
        self.page
            .stats()
            .iter()
            .map(|s| {
                format!(
                    r#"<div class="dwl-stat"><span class="dwl-stat__value">{}</span><span class="dwl-stat__label">{}</span></div>"#,
                    escape_html(&s.value),
                    escape_html(&s.label)
                )
            })
            .collect()
    }

    fn filters(&self) -> String {
        let counts = self.page.dataset().count_by_tag();
        let mut out = String::from(r#"<div class="dwl-filter-group" role="group" aria-label="Filter entries">"#);
        for filter in self.page.legend().filters() {
            let active = self.state.filter() == &filter;
            let (label, count, swatch) = match &filter {
                Filter::All => ("All", self.page.dataset().len(), String::new()),
                Filter::Only(tag) => (
                    self.tag_label(tag),
                    counts.get(tag).copied().unwrap_or(0),
                    format!(
                        r#" style="--swatch:{}""#,
                        self.page.legend().color_for(tag).to_css()
                    ),
                ),
            };
            out.push_str(&format!(
                r#"<button type="button" class="dwl-filter{}" data-action="filter" data-arg="{}" aria-pressed="{active}"{swatch}>{} <span class="dwl-filter__count">{count}</span></button>"#,
                if active { " is-active" } else { "" },
                escape_html(filter.key()),
                escape_html(label),
            ));
        }
        out.push_str("</div>");
        out
    }

    fn records(&self) -> String {
        let rows = derive(self.page.dataset(), self.state.filter());
        if rows.is_empty() {
            return r#"<p class="dwl-empty">No entries match this filter.</p>"#.to_string();
        }
        let mut out = String::from(r#"<ol class="dwl-record-list">"#);
        for e in rows {
            let expanded = self.state.is_expanded(e.id);
            let mut class = String::from("dwl-record");
            if expanded {
                class.push_str(" is-expanded");
            }
            if self.state.hovered() == Some(e.id) {
                class.push_str(" is-hovered");
            }
            let today = self.is_today(e.id);
            if today {
                class.push_str(" is-today");
            }
            out.push_str(&format!(
                r#"<li class="{class}" data-record="{id}" data-hover="{id}" data-tag="{tag}" style="--swatch:{color}"><button type="button" data-action="toggle" data-arg="{id}" aria-expanded="{expanded}"><span class="dwl-record__subtitle">{subtitle}</span> <span class="dwl-record__label">{label}</span> <span class="dwl-record__tag">{tag_label}</span>{badge}</button></li>"#,
                id = e.id,
                tag = escape_html(e.tag.as_ref()),
                color = self.page.legend().color_for(&e.tag).to_css(),
                subtitle = escape_html(&e.subtitle),
                label = escape_html(&e.label),
                tag_label = escape_html(self.tag_label(&e.tag)),
                badge = if today { r#" <span class="dwl-badge">Today</span>"# } else { "" },
            ));
        }
        out.push_str("</ol>");
        out
    }

    fn detail(&self) -> String {
        let Some(e) = self.state.expanded().and_then(|id| self.page.dataset().get(id)) else {
            return r#"<p class="dwl-detail__empty">Select an entry to read more.</p>"#.to_string();
        };
        let mut meta = vec![escape_html(self.tag_label(&e.tag))];
        if !e.subtitle.is_empty() {
            meta.insert(0, escape_html(&e.subtitle));
        }
        if let Some(c) = e.coordinate() {
            meta.push(format_coordinate(c));
        }
        if let Some(day) = e.weekday() {
            meta.push(day.name().to_string());
        }
        format!(
            r#"<h3>{}</h3><p class="dwl-detail__meta">{}</p><p class="dwl-detail__body">{}</p><button type="button" class="dwl-detail__close" data-action="toggle" data-arg="{}">Close</button>"#,
            escape_html(&e.label),
            meta.join(" · "),
            escape_html(&e.detail),
            e.id
        )
    }

    fn map(&self) -> String {
        let status = self.map_status.map(Placeholder::to_html).unwrap_or_default();
        format!(
            r#"<div class="dwl-map" id="{}" role="region" aria-label="Map of {}"></div><div class="dwl-map__status" data-map-status>{status}</div>"#,
            escape_html(&self.page.map_container_id()),
            escape_html(&self.page.title)
        )
    }

    fn sources(&self) -> String {
        let mut out = String::from(r#"<h2>Sources</h2><ol class="dwl-source-list">"#);
        for s in &self.page.sources {
            out.push_str("<li>");
            if let Some(author) = &s.author {
                out.push_str(&format!("{}, ", escape_html(author)));
            }
            match &s.url {
                Some(url) => out.push_str(&format!(
                    r#"<a href="{}" rel="noopener"><cite>{}</cite></a>"#,
                    escape_html(url),
                    escape_html(&s.title)
                )),
                None => out.push_str(&format!("<cite>{}</cite>", escape_html(&s.title))),
            }
            if let Some(year) = s.year {
                out.push_str(&format!(" ({year})"));
            }
            out.push_str("</li>");
        }
        out.push_str("</ol>");
        out
    }
}

/// `31.63° N, 7.98° W`.
pub fn format_coordinate(c: LngLat) -> String {
    let ns = if c.lat < 0.0 { 'S' } else { 'N' };
    let ew = if c.lng < 0.0 { 'W' } else { 'E' };
    format!("{:.2}° {ns}, {:.2}° {ew}", c.lat.abs(), c.lng.abs())
}
