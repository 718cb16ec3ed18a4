use dashblock::chart::{ChartObject, TableChartBuilder};
use dashblock::model::{BlockContent, BlockDescriptor, Category, Datasets};
use dashblock::selector::{Choice, CycleState, Session};
use dashblock::source::MemSource;
use dashblock::{
    Degraded, HeightResolver, Registry, RegistryError, RenderResult, Renderer, Selector, Surface,
};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct Recorder {
    embeds: Vec<(String, u32)>,
    placeholders: Vec<String>,
}

impl Surface for Recorder {
    fn embed(&mut self, markup: &str, height: u32) {
        self.embeds.push((markup.to_string(), height));
    }
    fn place_chart(&mut self, _chart: &ChartObject, _height: u32) {}
    fn placeholder(&mut self, degraded: &Degraded) {
        self.placeholders.push(degraded.id.clone());
    }
}

fn geographic_registry() -> Registry {
    let mut reg = Registry::new();
    reg.register(BlockDescriptor::new(
        "geo1",
        Category::Geographic,
        "Regional Overview Map",
        BlockContent::Fragment {
            markup: "<div>regional</div>".into(),
        },
        598,
    ))
    .unwrap();
    reg.register(BlockDescriptor::new(
        "geo2",
        Category::Geographic,
        "Block Boundaries",
        BlockContent::Fragment {
            markup: "<div>blocks</div>".into(),
        },
        114,
    ))
    .unwrap();
    reg
}

#[test]
fn selecting_and_rendering_resolves_height_with_default_buffer() {
    let reg = geographic_registry();
    let selector = Selector::new(&reg);

    let available = selector.available_in(Category::Geographic);
    assert_eq!(
        available.choices(),
        &[
            Choice { id: "geo1", label: "Regional Overview Map" },
            Choice { id: "geo2", label: "Block Boundaries" },
        ]
    );

    let selection = selector.select("geo2").unwrap();
    let datasets = Datasets::new();
    let mut renderer = Renderer::new(
        &reg,
        &datasets,
        HeightResolver::default(),
        MemSource::new(),
        TableChartBuilder,
    );
    let mut surface = Recorder::default();
    let result = renderer.render(&selection, &mut surface).unwrap();

    assert_eq!(
        result,
        RenderResult::Rendered {
            id: "geo2".into(),
            height: 144
        }
    );
    assert_eq!(surface.embeds, vec![("<div>blocks</div>".to_string(), 144)]);
}

#[test]
fn unknown_selection_is_not_found() {
    let reg = geographic_registry();
    assert_eq!(
        Selector::new(&reg).select("unknown_id").unwrap_err(),
        RegistryError::NotFound("unknown_id".into())
    );
}

#[test]
fn missing_fragment_degrades_without_stopping_later_blocks() {
    let mut reg = geographic_registry();
    reg.register(BlockDescriptor::new(
        "district",
        Category::Geographic,
        "District Heat Map",
        BlockContent::ExternalFragment {
            path: "maps/district.html".into(),
        },
        400,
    ))
    .unwrap();
    reg.register(BlockDescriptor::new(
        "villages",
        Category::Geographic,
        "Village Locations",
        BlockContent::ExternalFragment {
            path: "maps/villages.html".into(),
        },
        300,
    ))
    .unwrap();

    let source = MemSource::new().with("maps/villages.html", "<div>villages</div>");
    let datasets = Datasets::new();
    let mut renderer = Renderer::new(
        &reg,
        &datasets,
        HeightResolver::default(),
        source,
        TableChartBuilder,
    );
    let selections = Selector::new(&reg).all_in(Category::Geographic);
    let mut surface = Recorder::default();
    let results = renderer.render_all(&selections, &mut surface).unwrap();

    assert_eq!(results.len(), 4);
    let RenderResult::Degraded(d) = &results[2] else {
        panic!("district should be degraded, got {:?}", results[2]);
    };
    assert_eq!(d.id, "district");
    assert!(!d.message.is_empty());
    assert!(d.message.contains("District Heat Map"));
    assert!(!d.placeholder.is_empty());
    assert_eq!(
        results[3],
        RenderResult::Rendered {
            id: "villages".into(),
            height: 330
        }
    );
    assert_eq!(surface.placeholders, vec!["district"]);
    assert_eq!(surface.embeds.len(), 3);
}

#[test]
fn explicit_buffer_overrides_default() {
    let reg = geographic_registry();
    let datasets = Datasets::new();
    let mut renderer = Renderer::new(
        &reg,
        &datasets,
        HeightResolver::new(50),
        MemSource::new(),
        TableChartBuilder,
    );
    let selection = Selector::new(&reg).select("geo1").unwrap();
    let mut surface = Recorder::default();
    let result = renderer
        .render_with_buffer(&selection, Some(2), &mut surface)
        .unwrap();
    assert_eq!(
        result,
        RenderResult::Rendered {
            id: "geo1".into(),
            height: 600
        }
    );
}

#[test]
fn session_walks_through_the_cycle() {
    let mut reg = geographic_registry();
    reg.register(BlockDescriptor::new(
        "missing",
        Category::Geographic,
        "Missing Map",
        BlockContent::ExternalFragment {
            path: "gone.html".into(),
        },
        10,
    ))
    .unwrap();
    let selector = Selector::new(&reg);
    let datasets = Datasets::new();
    let mut renderer = Renderer::new(
        &reg,
        &datasets,
        HeightResolver::default(),
        MemSource::new(),
        TableChartBuilder,
    );
    let mut surface = Recorder::default();
    let mut session = Session::new();
    assert_eq!(session.state(), &CycleState::Unselected);

    let selection = session.choose(&selector, "geo1").unwrap();
    assert!(matches!(session.state(), CycleState::Selected(s) if s.id == "geo1"));
    let result = renderer.render(&selection, &mut surface).unwrap();
    session.finish(&result);
    assert_eq!(session.state(), &CycleState::Rendered(selection));

    let selection = session.choose(&selector, "missing").unwrap();
    let result = renderer.render(&selection, &mut surface).unwrap();
    session.finish(&result);
    match session.state() {
        CycleState::Degraded { selection, message } => {
            assert_eq!(selection.id, "missing");
            assert!(message.contains("Missing Map"));
        }
        other => panic!("expected degraded state, got {other:?}"),
    }
    assert!(session.state().is_terminal());
}
