//! SVG figures for the interactive section.
//!
//! Every diagram kind draws all records of the page; the current filter only
//! changes mark opacity, using the same dim-or-hide policy as the map.

use catalog::{Diagram, Entry};
use foundation::format_year;
use foundation::layout::{linear_scale, place_on_arc, place_on_circle, place_on_line, scale_to_px};
use foundation::math::Vec2;
use foundation::text::escape_html;
use scene::Record;

use crate::view::PageView;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 320.0;
const MARGIN: f64 = 48.0;
const MARK_RADIUS: f64 = 8.0;
const TIMELINE_TICKS: usize = 5;

const BAR_ROW_PX: f64 = 32.0;
const BAR_LABEL_PX: f64 = 140.0;
const BAR_MAX_PX: f64 = 380.0;

pub fn render_diagram(view: &PageView<'_>) -> String {
    let figure = match &view.page.diagram {
        Diagram::Timeline { axis_label } => timeline(view, axis_label.as_deref()),
        Diagram::Arc { start_deg, end_deg } => arc(view, *start_deg, *end_deg),
        Diagram::Circle => circle(view),
        Diagram::Bars { unit } => bars(view, unit),
        Diagram::Map => String::new(),
    };
    format!("{figure}{}", legend(view))
}

fn svg(width: f64, height: f64, title: &str, body: &str) -> String {
    format!(
        r#"<svg class="dwl-diagram" viewBox="0 0 {width} {height}" role="img" aria-label="{}">{body}</svg>"#,
        escape_html(title)
    )
}

/// One clickable record mark. The today ring is drawn outside the dot.
fn mark(view: &PageView<'_>, e: &Entry, at: Vec2, radius: f64) -> String {
    let color = view.page.legend().color_for(&e.tag).to_css();
    let expanded = view.state.is_expanded(e.id);
    let hovered = view.state.hovered() == Some(e.id);
    let today = view.is_today(e.id);

    let mut class = String::from("dwl-mark");
    let mut stroke = "";
    if expanded {
        class.push_str(" is-expanded");
        stroke = r##" stroke="#1f1b16" stroke-width="3""##;
    } else if hovered {
        class.push_str(" is-hovered");
        stroke = r##" stroke="#1f1b16" stroke-width="1.5""##;
    }
    let mut ring = String::new();
    if today {
        class.push_str(" is-today");
        ring = format!(
            r##"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="none" stroke="{color}" stroke-width="2" stroke-dasharray="3 2"/>"##,
            at.x,
            at.y,
            radius + 5.0
        );
    }
    format!(
        r#"<g class="{class}" data-action="toggle" data-arg="{id}" data-hover="{id}" opacity="{opacity}"><title>{label}</title>{ring}<circle cx="{x:.1}" cy="{y:.1}" r="{radius:.1}" fill="{color}"{stroke}/></g>"#,
        id = e.id,
        opacity = view.mark_opacity(&e.tag),
        label = escape_html(&e.label),
        x = at.x,
        y = at.y,
    )
}

fn text(at: Vec2, anchor: &str, class: &str, body: &str) -> String {
    format!(
        r#"<text x="{:.1}" y="{:.1}" text-anchor="{anchor}" class="{class}">{}</text>"#,
        at.x,
        at.y,
        escape_html(body)
    )
}

/// Records on a horizontal axis by `order`; labels alternate above and below.
fn timeline(view: &PageView<'_>, axis_label: Option<&str>) -> String {
    let dataset = view.page.dataset();
    let axis_y = HEIGHT / 2.0;
    let mut body = format!(
        r##"<line x1="{MARGIN}" y1="{axis_y}" x2="{}" y2="{axis_y}" stroke="#c9c1b4" stroke-width="2"/>"##,
        WIDTH - MARGIN
    );
    let Some((first, last)) = dataset.order_span() else {
        return svg(WIDTH, HEIGHT, &view.page.section, &body);
    };
    let domain = (first as f64, last as f64);
    let range = (MARGIN, WIDTH - MARGIN);

    for (i, e) in dataset.iter().enumerate() {
        let x = linear_scale(e.order_key() as f64, domain, range);
        let above = i % 2 == 0;
        let label_y = if above { axis_y - 26.0 } else { axis_y + 36.0 };
        let year_y = if above { axis_y - 44.0 } else { axis_y + 52.0 };
        body.push_str(&mark(view, e, Vec2::new(x, axis_y), MARK_RADIUS));
        body.push_str(&text(Vec2::new(x, label_y), "middle", "dwl-label", &e.label));
        body.push_str(&text(
            Vec2::new(x, year_y),
            "middle",
            "dwl-tick",
            &format_year(e.order_key()),
        ));
    }

    // Evenly spaced scale ticks under the records.
    let base_y = HEIGHT - 44.0;
    for t in 0..TIMELINE_TICKS {
        let at = place_on_line(
            t,
            TIMELINE_TICKS,
            Vec2::new(MARGIN, base_y),
            Vec2::new(WIDTH - MARGIN, base_y),
        );
        let year = linear_scale(at.x, range, domain).round() as i64;
        body.push_str(&format!(
            r##"<line x1="{x:.1}" y1="{y0:.1}" x2="{x:.1}" y2="{y1:.1}" stroke="#c9c1b4"/>"##,
            x = at.x,
            y0 = base_y - 4.0,
            y1 = base_y + 4.0,
        ));
        body.push_str(&text(at + Vec2::new(0.0, 18.0), "middle", "dwl-tick", &format_year(year)));
    }
    if let Some(label) = axis_label {
        body.push_str(&text(Vec2::new(WIDTH / 2.0, HEIGHT - 12.0), "middle", "dwl-axis", label));
    }
    svg(WIDTH, HEIGHT, &view.page.section, &body)
}

/// Evenly spaced on an arc, numbered outside.
fn arc(view: &PageView<'_>, start_deg: f64, end_deg: f64) -> String {
    let dataset = view.page.dataset();
    let total = dataset.len();
    let center = Vec2::new(WIDTH / 2.0, HEIGHT - 24.0);
    let radius = (WIDTH / 2.0 - MARGIN).min(HEIGHT - 64.0);
    let mut body = String::new();
    for (i, e) in dataset.iter().enumerate() {
        let at = place_on_arc(i, total, start_deg, end_deg, radius, center);
        let label_at = place_on_arc(i, total, start_deg, end_deg, radius + 20.0, center);
        body.push_str(&mark(view, e, at, MARK_RADIUS * 0.75));
        body.push_str(&text(
            label_at + Vec2::new(0.0, 4.0),
            "middle",
            "dwl-tick",
            &e.order_key().to_string(),
        ));
    }
    svg(WIDTH, HEIGHT, &view.page.section, &body)
}

/// One slot per record around a full turn, labels outside.
fn circle(view: &PageView<'_>) -> String {
    const CIRCLE_WIDTH: f64 = 760.0;
    const CIRCLE_HEIGHT: f64 = 360.0;
    let dataset = view.page.dataset();
    let total = dataset.len();
    let center = Vec2::new(CIRCLE_WIDTH / 2.0, CIRCLE_HEIGHT / 2.0);
    let radius = 120.0;
    let mut body = format!(
        r##"<circle cx="{}" cy="{}" r="{radius}" fill="none" stroke="#c9c1b4" stroke-width="1.5"/>"##,
        center.x, center.y
    );
    for (i, e) in dataset.iter().enumerate() {
        let at = place_on_circle(i, total, radius, center);
        let label_at = place_on_circle(i, total, radius + 22.0, center);
        let anchor = if label_at.x < center.x - 10.0 {
            "end"
        } else if label_at.x > center.x + 10.0 {
            "start"
        } else {
            "middle"
        };
        body.push_str(&mark(view, e, at, MARK_RADIUS * 1.25));
        body.push_str(&text(label_at + Vec2::new(0.0, 4.0), anchor, "dwl-label", &e.label));
    }
    svg(CIRCLE_WIDTH, CIRCLE_HEIGHT, &view.page.section, &body)
}

/// Horizontal bars scaled to the page's largest value. Entries without a
/// value are left out.
fn bars(view: &PageView<'_>, unit: &str) -> String {
    let max = view.page.max_value();
    let rows: Vec<&Entry> = view.page.dataset().iter().filter(|e| e.value.is_some()).collect();
    let height = BAR_ROW_PX * rows.len() as f64 + 40.0;
    let width = BAR_LABEL_PX + BAR_MAX_PX + 80.0;
    let mut body = String::new();
    for (i, e) in rows.iter().enumerate() {
        let value = e.value.unwrap_or_default();
        let y = 8.0 + BAR_ROW_PX * i as f64;
        let len = scale_to_px(value, max, BAR_MAX_PX);
        let color = view.page.legend().color_for(&e.tag).to_css();
        let expanded = view.state.is_expanded(e.id);
        body.push_str(&format!(
            r#"<g class="dwl-bar{}" data-action="toggle" data-arg="{id}" data-hover="{id}" opacity="{}"><title>{}</title><rect x="{BAR_LABEL_PX}" y="{y:.1}" width="{len:.1}" height="{:.1}" rx="3" fill="{color}"/></g>"#,
            if expanded { " is-expanded" } else { "" },
            view.mark_opacity(&e.tag),
            escape_html(&e.label),
            BAR_ROW_PX - 10.0,
            id = e.id,
        ));
        let mid = y + (BAR_ROW_PX - 10.0) / 2.0 + 4.0;
        body.push_str(&text(Vec2::new(BAR_LABEL_PX - 8.0, mid), "end", "dwl-label", &e.label));
        body.push_str(&text(
            Vec2::new(BAR_LABEL_PX + len + 6.0, mid),
            "start",
            "dwl-tick",
            &format_value(value),
        ));
    }
    body.push_str(&text(Vec2::new(BAR_LABEL_PX, height - 8.0), "start", "dwl-axis", unit));
    svg(width, height, &view.page.section, &body)
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn legend(view: &PageView<'_>) -> String {
    let mut out = String::from(r#"<ul class="dwl-legend">"#);
    for entry in view.page.legend().entries() {
        out.push_str(&format!(
            r#"<li><span class="dwl-swatch" style="background:{}"></span>{}</li>"#,
            entry.color.to_css(),
            escape_html(&entry.label)
        ));
    }
    out.push_str("</ul>");
    out
}

#[cfg(test)]
mod tests {
    use super::{format_value, render_diagram};
    use crate::view::PageView;
    use catalog::{Catalog, TagKey};
    use foundation::RecordId;
    use scene::visibility::{ObserverSupport, RevealSet};
    use scene::{Filter, PageState};

    fn render(slug: &str, state: &PageState<TagKey>) -> String {
        let catalog = Catalog::builtin().expect("catalog");
        let page = catalog.get(slug).expect("page");
        let reveal = RevealSet::new(ObserverSupport::Unavailable);
        render_diagram(&PageView {
            page,
            state,
            reveal: &reveal,
            today: None,
            map_status: None,
        })
    }

    #[test]
    fn every_kind_draws_every_record() {
        let state = PageState::new();
        for (slug, marks) in [
            ("dynasties", 9),
            ("seven-saints", 7),
            ("lunar-month", 30),
            ("imperial-cities", 4),
        ] {
            let svg = render(slug, &state);
            assert_eq!(svg.matches(r#"data-action="toggle""#).count(), marks, "{slug}");
            assert!(svg.contains(r#"class="dwl-legend""#), "{slug}");
        }
        assert!(!render("caravan-routes", &state).contains("<svg"));
    }

    #[test]
    fn filtered_out_marks_are_dimmed() {
        let catalog = Catalog::builtin().expect("catalog");
        let page = catalog.get("dynasties").expect("page");
        let mut state = PageState::new();
        state.select_filter(page.dataset(), Filter::Only(TagKey::from("modern")));
        let svg = render("dynasties", &state);
        assert_eq!(svg.matches(r#"opacity="1""#).count(), 2);
        assert_eq!(svg.matches(r#"opacity="0.2""#).count(), 7);
    }

    #[test]
    fn hidden_policy_drops_opacity_to_zero() {
        let catalog = Catalog::builtin().expect("catalog");
        let page = catalog.get("imperial-cities").expect("page");
        let mut state = PageState::new();
        state.select_filter(page.dataset(), Filter::Only(TagKey::from("almohad")));
        let svg = render("imperial-cities", &state);
        assert_eq!(svg.matches(r#"opacity="0""#).count(), 3);
    }

    #[test]
    fn expanded_mark_is_outlined() {
        let mut state = PageState::new();
        state.toggle_expand(RecordId(3));
        let svg = render("seven-saints", &state);
        assert_eq!(svg.matches("is-expanded").count(), 1);
        assert!(svg.contains(r#"data-arg="3" data-hover="3""#));
    }

    #[test]
    fn timeline_ticks_span_the_years() {
        let svg = render("dynasties", &PageState::new());
        assert!(svg.contains(">788</text>"));
        assert!(svg.contains(">1956</text>"));
        assert!(svg.contains("Year (CE)"));
    }

    #[test]
    fn values_drop_trailing_zeros() {
        assert_eq!(format_value(1112.0), "1112");
        assert_eq!(format_value(2.5), "2.5");
    }
}
