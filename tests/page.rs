use camino::{Utf8Path, Utf8PathBuf};
use dashblock::chart::TableChartBuilder;
use dashblock::page::{compose_block, compose_page};
use dashblock::source::{FsSource, MemSource, ZipSource};
use dashblock::{Category, Dashboard, RegistryError, Renderer, Selection, Selector, sample};
use std::io::{Cursor, Write};
use tempfile::tempdir;

const MANIFEST: &str = r#"
title = "Survey <Baseline>"
intro = "Demographic & economic overview."
default_buffer = 20
fragment_root = "fragments"
categories = ["geographic", "economic", "environmental"]

[tables.certification]
columns = ["status"]
rows = [["Certified"], ["Certified"], ["Not certified"]]

[[blocks]]
id = "map"
category = "geographic"
display_label = "Regional Overview Map"
declared_min_height = 598
content = { kind = "external_fragment", path = "map.html" }

[[blocks]]
id = "boundaries"
category = "geographic"
display_label = "Block Boundaries"
declared_min_height = 114
content = { kind = "external_fragment", path = "boundaries.html" }

[[blocks]]
id = "cert"
category = "economic"
display_label = "Certification Status"
declared_min_height = 300
content = { kind = "chart", table = "certification", chart = { kind = "pie", x = "status" } }
"#;

fn write_manifest() -> (tempfile::TempDir, Utf8PathBuf) {
    let tmp = tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
    std::fs::create_dir(root.join("fragments")).unwrap();
    std::fs::write(
        root.join("fragments/map.html"),
        r#"<div style="min-height:598px">map</div>"#,
    )
    .unwrap();
    let manifest = root.join("dashboard.toml");
    std::fs::write(&manifest, MANIFEST).unwrap();
    (tmp, manifest)
}

#[test]
fn page_renders_every_section_and_isolates_missing_fragment() {
    let (_tmp, manifest) = write_manifest();
    let dashboard = Dashboard::load(&manifest).unwrap();
    assert_eq!(dashboard.fragment_root, manifest.parent().unwrap().join("fragments"));

    let mut renderer = Renderer::new(
        &dashboard.registry,
        &dashboard.datasets,
        dashboard.heights,
        FsSource::new(&dashboard.fragment_root),
        TableChartBuilder,
    );
    let page = compose_page(&dashboard, &mut renderer).unwrap();

    assert_eq!(page.results.len(), 3);
    let degraded: Vec<_> = page.degraded().map(|d| d.id.as_str()).collect();
    assert_eq!(degraded, vec!["boundaries"]);

    let html = &page.html;
    assert!(html.contains("<h1>Survey &lt;Baseline&gt;</h1>"));
    assert!(html.contains("Demographic &amp; economic overview."));
    assert!(html.contains(r#"height="618""#), "map embedded at 598 + 20");
    assert!(html.contains("Could not display \"Block Boundaries\""));
    let boundaries = page.degraded().next().unwrap();
    assert!(boundaries.message.contains("fragment boundaries.html not found"));
    assert!(!boundaries.message.contains(dashboard.fragment_root.as_str()));
    assert!(html.contains("<svg"), "certification chart rendered after the failure");
    assert!(html.contains("Environmental charts are coming soon."));
    assert!(!html.contains("tab-demographic"), "undeclared categories have no tab");

    let geo = html.find("id=\"tab-geographic\"").unwrap();
    let eco = html.find("id=\"tab-economic\"").unwrap();
    let env = html.find("id=\"tab-environmental\"").unwrap();
    assert!(geo < eco && eco < env);
}

#[test]
fn single_block_view_marks_current_choice() {
    let (_tmp, manifest) = write_manifest();
    let dashboard = Dashboard::load(&manifest).unwrap();
    let mut renderer = Renderer::new(
        &dashboard.registry,
        &dashboard.datasets,
        dashboard.heights,
        FsSource::new(&dashboard.fragment_root),
        TableChartBuilder,
    );
    let selection = Selector::new(&dashboard.registry).select("map").unwrap();
    let page = compose_block(&dashboard, &mut renderer, &selection).unwrap();

    assert!(page.html.contains(r#"<option value="map" selected>Regional Overview Map</option>"#));
    assert!(page.html.contains(r#"<option value="boundaries">Block Boundaries</option>"#));
    assert_eq!(page.degraded().count(), 0);
}

#[test]
fn single_block_view_rejects_mismatched_category() {
    let (_tmp, manifest) = write_manifest();
    let dashboard = Dashboard::load(&manifest).unwrap();
    let mut renderer = Renderer::new(
        &dashboard.registry,
        &dashboard.datasets,
        dashboard.heights,
        FsSource::new(&dashboard.fragment_root),
        TableChartBuilder,
    );
    let selection = Selection {
        category: Category::Economic,
        id: "map".into(),
    };
    assert_eq!(
        compose_block(&dashboard, &mut renderer, &selection).unwrap_err(),
        RegistryError::NotFound("map".into())
    );
}

#[test]
fn fragments_can_come_from_a_zip_bundle() {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buf);
        let options = zip::write::FileOptions::default();
        zip.start_file("boundaries.html", options).unwrap();
        zip.write_all(b"<div>boundaries</div>").unwrap();
        zip.finish().unwrap();
    }
    buf.set_position(0);

    let (_tmp, manifest) = write_manifest();
    let dashboard = Dashboard::load(&manifest).unwrap();
    let source = ZipSource::new(buf).unwrap();
    assert_eq!(source.file_names().collect::<Vec<_>>(), vec!["boundaries.html"]);

    let mut renderer = Renderer::new(
        &dashboard.registry,
        &dashboard.datasets,
        dashboard.heights,
        source,
        TableChartBuilder,
    );
    let page = compose_page(&dashboard, &mut renderer).unwrap();
    let degraded: Vec<_> = page.degraded().map(|d| d.id.as_str()).collect();
    assert_eq!(degraded, vec!["map"]);
    assert!(page.html.contains("srcdoc=\"&lt;div"));
}

#[test]
fn builtin_dashboard_renders_with_missing_fragment_dir() {
    let dashboard = sample::saksham_baseline(Utf8Path::new("/nonexistent/fragments")).unwrap();
    let mut renderer = Renderer::new(
        &dashboard.registry,
        &dashboard.datasets,
        dashboard.heights,
        MemSource::new(),
        TableChartBuilder,
    );
    let page = compose_page(&dashboard, &mut renderer).unwrap();
    assert_eq!(page.results.len(), dashboard.registry.len());
    let degraded: Vec<_> = page.degraded().map(|d| d.id.as_str()).collect();
    assert_eq!(degraded, vec!["geo2"]);
    assert!(page.html.contains("datawrapper-vis-Oq2xV"));
    assert!(page.html.contains(r#"height="628""#));
}
