use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use catalog::{Catalog, Page, PageIssue, Route};
use foundation::RecordId;
use foundation::time::CivilDate;
use layers::MapConfig;
use layers::recording::{CallLog, RecordingProvider};
use scene::visibility::ObserverSupport;
use serde::Serialize;
use shell::{PageSession, UiEvent, render_document, render_index, render_not_found};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    let catalog = Catalog::builtin().map_err(|e| format!("catalog: {e}"))?;
    match cmd.as_str() {
        "list" => cmd_list(&catalog, args),
        "check" => cmd_check(&catalog, args),
        "render" => cmd_render(&catalog, args),
        _ => Err(usage()),
    }
}

#[derive(Serialize)]
struct ListRow<'a> {
    slug: &'a str,
    path: String,
    title: &'a str,
    records: usize,
    map: bool,
    content_hash: &'a str,
}

fn cmd_list(catalog: &Catalog, args: Vec<String>) -> Result<(), String> {
    // dwl list [--json]
    let mut json = false;
    for arg in &args {
        match arg.as_str() {
            "--json" => json = true,
            s => return Err(format!("unknown arg: {s}\n\n{}", usage())),
        }
    }

    let rows: Vec<ListRow<'_>> = catalog
        .pages()
        .iter()
        .map(|p| ListRow {
            slug: &p.slug,
            path: p.path(),
            title: &p.title,
            records: p.dataset().len(),
            map: p.has_map(),
            content_hash: p.content_hash(),
        })
        .collect();

    let mut out = std::io::stdout().lock();
    if json {
        let payload = serde_json::to_string_pretty(&rows).map_err(|e| format!("json: {e}"))?;
        writeln!(out, "{payload}").map_err(|e| format!("stdout: {e}"))?;
        return Ok(());
    }
    for row in rows {
        writeln!(
            out,
            "{:<18} {:>3} records  {}  {}{}",
            row.slug,
            row.records,
            &row.content_hash[..12.min(row.content_hash.len())],
            row.title,
            if row.map { "  [map]" } else { "" }
        )
        .map_err(|e| format!("stdout: {e}"))?;
    }
    Ok(())
}

fn cmd_check(catalog: &Catalog, args: Vec<String>) -> Result<(), String> {
    // dwl check [slug ...]
    let pages = select_pages(catalog, &args)?;
    let summary = check_pages(&pages);
    eprintln!("{summary}");
    if summary.errors > 0 {
        return Err(format!("{} authoring errors", summary.errors));
    }
    Ok(())
}

fn select_pages<'c>(catalog: &'c Catalog, slugs: &[String]) -> Result<Vec<&'c Arc<Page>>, String> {
    if slugs.is_empty() {
        return Ok(catalog.pages().iter().collect());
    }
    slugs
        .iter()
        .map(|slug| catalog.get(slug).ok_or_else(|| format!("unknown page: {slug}")))
        .collect()
}

#[derive(Debug, Default, PartialEq, Eq)]
struct CheckSummary {
    pages: usize,
    errors: usize,
    warnings: usize,
}

impl std::fmt::Display for CheckSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "checked {} pages: {} errors, {} warnings",
            self.pages, self.errors, self.warnings
        )
    }
}

/// Prints every issue and tallies only the pages that were checked.
fn check_pages(pages: &[&Arc<Page>]) -> CheckSummary {
    let mut summary = CheckSummary {
        pages: pages.len(),
        ..CheckSummary::default()
    };
    for page in pages {
        let issues: Vec<PageIssue> = page.check();
        for issue in &issues {
            let level = if issue.is_error() { "error" } else { "warning" };
            eprintln!("{}: {level}: {issue}", page.slug);
        }
        summary.errors += issues.iter().filter(|i| i.is_error()).count();
        summary.warnings += issues.iter().filter(|i| !i.is_error()).count();
    }
    summary
}

fn cmd_render(catalog: &Catalog, args: Vec<String>) -> Result<(), String> {
    // dwl render <slug|path> [--out FILE] [--date YYYY-MM-DD] [--filter KEY] [--expand ID]
    let Some(target) = args.first() else {
        return Err(usage());
    };

    let mut out: Option<PathBuf> = None;
    let mut date: Option<CivilDate> = None;
    let mut filter: Option<String> = None;
    let mut expand: Option<RecordId> = None;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = || {
            args.get(i + 1)
                .cloned()
                .ok_or_else(|| format!("{flag} requires a value"))
        };
        match flag {
            "--out" => out = Some(PathBuf::from(value()?)),
            "--date" => {
                let raw = value()?;
                date = Some(CivilDate::parse(&raw).map_err(|e| format!("--date {raw}: {e}"))?);
            }
            "--filter" => filter = Some(value()?),
            "--expand" => {
                let raw = value()?;
                expand = Some(raw.parse().map_err(|e| format!("--expand {raw}: {e}"))?);
            }
            s => return Err(format!("unknown arg: {s}\n\n{}", usage())),
        }
        i += 2;
    }

    let path = if target.starts_with('/') {
        target.clone()
    } else {
        format!("/data/{target}")
    };
    let (title, body) = match catalog.resolve(&path) {
        Route::Index => ("Maghreb in data".to_string(), render_index(catalog)),
        Route::NotFound(p) => {
            warn!(path = %p, "no page at this path");
            ("Page not found".to_string(), render_not_found(&p))
        }
        Route::Page(page) => {
            let today = date.unwrap_or_else(system_today);
            let title = page.title.clone();
            let config = MapConfig::from_env();
            (title, render_page(page, &config, today, filter, expand))
        }
    };

    let html = render_document(&title, &body);
    match out {
        Some(file) => {
            fs::write(&file, &html).map_err(|e| format!("write {file:?}: {e}"))?;
            eprintln!("wrote {} ({} bytes)", file.display(), html.len());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(html.as_bytes())
                .map_err(|e| format!("stdout: {e}"))?;
        }
    }
    Ok(())
}

/// Renders one page after replaying the requested interactions. With a
/// configured credential the map is dry-run against the recording provider.
/// Static page body. The document carries no map script, so the map region
/// always renders the unavailable placeholder; with a credential configured
/// the map is exercised separately by `dry_run_map`.
fn render_page(
    page: Arc<Page>,
    config: &MapConfig,
    today: CivilDate,
    filter: Option<String>,
    expand: Option<RecordId>,
) -> String {
    if page.has_map() && config.credential.is_ok() {
        dry_run_map(page.clone(), config, today, filter.clone(), expand);
    }
    let session = session_for(page, &MapConfig::with_token(None), today, filter, expand);
    session.render()
}

fn session_for(
    page: Arc<Page>,
    config: &MapConfig,
    today: CivilDate,
    filter: Option<String>,
    expand: Option<RecordId>,
) -> PageSession<RecordingProvider> {
    let mut session = PageSession::new(page, config, ObserverSupport::Unavailable, Some(today));
    if let Some(key) = filter {
        session.dispatch(UiEvent::SelectFilter(key));
    }
    if let Some(id) = expand {
        session.dispatch(UiEvent::ToggleExpand(id));
    }
    session
}

/// Drives a throwaway session's map to ready against the recording provider
/// and logs what a browser would have drawn.
fn dry_run_map(
    page: Arc<Page>,
    config: &MapConfig,
    today: CivilDate,
    filter: Option<String>,
    expand: Option<RecordId>,
) -> CallLog {
    let log = CallLog::default();
    let mut session: PageSession<RecordingProvider> =
        PageSession::new(page, config, ObserverSupport::Unavailable, Some(today));
    if let Some(map) = session.map_mut()
        && map.begin_load().is_some()
    {
        let generation = map.generation();
        if map.library_loaded(generation, RecordingProvider::with_log(log.clone())) {
            map.map_loaded(generation);
        }
    }
    if let Some(key) = filter {
        session.dispatch(UiEvent::SelectFilter(key));
    }
    if let Some(id) = expand {
        session.dispatch(UiEvent::ToggleExpand(id));
    }
    info!(
        status = ?session.map_status(),
        markers = log.markers_created(),
        calls = log.calls().len(),
        bounds = ?session.map().and_then(|m| m.content().bounds()),
        "map dry run"
    );
    log
}

fn system_today() -> CivilDate {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    CivilDate::from_days_since_epoch((secs / 86_400) as i64)
}

fn usage() -> String {
    let exe = env::args().next().unwrap_or_else(|| "dwl".to_string());
    format!(
        "Usage:\n  {exe} list [--json]\n  {exe} check [slug ...]\n  {exe} render <slug|path> [--out FILE] [--date YYYY-MM-DD] [--filter KEY] [--expand ID]\n\nNotes:\n- `check` exits non-zero when any page has authoring errors.\n- `render` writes a static HTML document; the date defaults to today (UTC).\n- Set MAPBOX_ACCESS_TOKEN to dry-run the map section; RUST_LOG=info shows the result.\n"
    )
}
