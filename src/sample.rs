//! The built-in SAKSHAM baseline survey dashboard, used when no manifest is given.

use camino::Utf8PathBuf;

use crate::config::Dashboard;
use crate::height::HeightResolver;
use crate::model::{
    BlockContent, BlockDescriptor, Category, Cell, ChartDirective, ChartKind, DataTable, Datasets,
};
use crate::registry::{Registry, RegistryError};

const REGIONAL_MAP_EMBED: &str = r##"<div style="min-height:598px" id="datawrapper-vis-Oq2xV"><script type="text/javascript" defer src="https://datawrapper.dwcdn.net/Oq2xV/embed.js" charset="utf-8" data-target="#datawrapper-vis-Oq2xV"></script><noscript><img src="https://datawrapper.dwcdn.net/Oq2xV/full.png" alt="" /></noscript></div>"##;

fn datasets() -> Datasets {
    let mut d = Datasets::new();
    d.insert(
        "respondents".into(),
        DataTable::new(["block", "gender", "adults", "children"])
            .with_row([Cell::from("Bagodar"), "Female".into(), 3.0.into(), 2.0.into()])
            .with_row([Cell::from("Bagodar"), "Male".into(), 2.0.into(), 3.0.into()])
            .with_row([Cell::from("Birni"), "Female".into(), 4.0.into(), 1.0.into()])
            .with_row([Cell::from("Birni"), "Female".into(), 2.0.into(), 2.0.into()])
            .with_row([Cell::from("Dumri"), "Male".into(), 3.0.into(), 4.0.into()])
            .with_row([Cell::from("Dumri"), "Female".into(), 2.0.into(), 0.0.into()]),
    );
    d.insert(
        "age_groups".into(),
        DataTable::new(["group", "members"])
            .with_row([Cell::from("Adults"), 16.0.into()])
            .with_row([Cell::from("Children"), 12.0.into()]),
    );
    d.insert(
        "yield".into(),
        DataTable::new(["season", "quintals_per_acre"])
            .with_row([Cell::from("Kharif 2022"), 9.5.into()])
            .with_row([Cell::from("Rabi 2022"), 7.0.into()])
            .with_row([Cell::from("Kharif 2023"), 11.0.into()]),
    );
    d.insert(
        "certification".into(),
        DataTable::new(["status"])
            .with_row(["Certified"])
            .with_row(["In conversion"])
            .with_row(["Certified"])
            .with_row(["Not certified"])
            .with_row(["Certified"]),
    );
    d.insert(
        "shg".into(),
        DataTable::new(["member", "households"])
            .with_row([Cell::from("SHG member"), 31.0.into()])
            .with_row([Cell::from("Not a member"), 19.0.into()]),
    );
    d
}

fn chart(table: &str, directive: ChartDirective) -> BlockContent {
    BlockContent::Chart {
        table: table.to_string(),
        chart: directive,
    }
}

fn blocks() -> Vec<BlockDescriptor> {
    vec![
        BlockDescriptor::new(
            "geo1",
            Category::Geographic,
            "Regional Overview Map",
            BlockContent::Fragment {
                markup: REGIONAL_MAP_EMBED.to_string(),
            },
            598,
        ),
        BlockDescriptor::new(
            "geo2",
            Category::Geographic,
            "Block Boundaries",
            BlockContent::ExternalFragment {
                path: Utf8PathBuf::from("block_boundaries.html"),
            },
            114,
        ),
        BlockDescriptor::new(
            "gender",
            Category::Demographic,
            "Gender of Respondents",
            chart(
                "respondents",
                ChartDirective::new(ChartKind::Pie, "gender").titled("Respondents by gender"),
            ),
            320,
        ),
        BlockDescriptor::new(
            "adults_children",
            Category::Demographic,
            "Adults and Children",
            chart(
                "age_groups",
                ChartDirective::new(ChartKind::Bar, "group")
                    .sum_of("members")
                    .colored("teal"),
            ),
            280,
        ),
        BlockDescriptor::new(
            "blockwise",
            Category::Demographic,
            "Block-wise Distribution",
            chart(
                "respondents",
                ChartDirective::new(ChartKind::Bar, "block").titled("Households per block"),
            ),
            280,
        ),
        BlockDescriptor::new(
            "yield",
            Category::Economic,
            "Yield",
            chart(
                "yield",
                ChartDirective::new(ChartKind::Line, "season")
                    .sum_of("quintals_per_acre")
                    .titled("Paddy yield (quintals per acre)")
                    .colored("darkgreen"),
            ),
            300,
        ),
        BlockDescriptor::new(
            "certification",
            Category::Economic,
            "Certification Status",
            chart("certification", ChartDirective::new(ChartKind::Pie, "status")),
            320,
        ),
        BlockDescriptor::new(
            "shg",
            Category::Social,
            "Self-Help Group Membership",
            chart(
                "shg",
                ChartDirective::new(ChartKind::Bar, "member")
                    .sum_of("households")
                    .colored("purple"),
            ),
            260,
        ),
    ]
}

/// Registry holding the built-in blocks.
pub fn registry() -> Result<Registry, RegistryError> {
    let mut reg = Registry::new();
    for block in blocks() {
        reg.register(block)?;
    }
    Ok(reg)
}

/// The built-in dashboard. External fragments resolve against `fragment_root`.
pub fn saksham_baseline(fragment_root: impl Into<Utf8PathBuf>) -> Result<Dashboard, RegistryError> {
    Ok(Dashboard {
        title: "SAKSHAM Baseline Dashboard".to_string(),
        intro: Some(
            "Baseline survey statistics for the SAKSHAM agricultural development project."
                .to_string(),
        ),
        registry: registry()?,
        datasets: datasets(),
        heights: HeightResolver::default(),
        fragment_root: fragment_root.into(),
    })
}
