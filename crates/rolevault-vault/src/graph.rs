//! Obsidian graph view settings with one colour per service.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

use crate::error::VaultError;
use crate::layout::{CATEGORIES_DIR, ROLES_DIR, ROOT_NOTE, VaultLayout};
use crate::notes::write_note;
use crate::scan::scan_notes;

/// Service colours as RGB hex without the leading `#`.
///
/// White is reserved for the root note.
pub const PALETTE: &[&str] = &[
    "FF0000", "00FF00", "0000FF", "FFFF00", "FF00FF", "00FFFF", "800000", "808000",
    "008000", "800080", "008080", "000080", "FFA500", "FFC0CB", "A52A2A", "D2691E",
    "FF7F50", "9ACD32", "7FFF00", "6495ED", "40E0D0", "FF1493", "00CED1", "FF69B4",
    "CD5C5C", "4B0082", "20B2AA", "87CEFA", "778899", "B0C4DE", "32CD32", "66CDAA",
    "BA55D3", "9370DB", "3CB371", "7B68EE", "00FA9A", "C71585", "191970", "808080",
    "FFD700", "DC143C", "B8860B", "006400", "B22222", "2E8B57", "8B0000", "FF4500",
    "DA70D6", "ADFF2F", "F5DEB3", "5F9EA0", "D2B48C", "FA8072", "E9967A", "FF6347",
    "FFDEAD", "FAFAD2", "7FFFD4", "FFE4C4", "8A2BE2", "DEB887", "FFF8DC", "008B8B",
    "A9A9A9", "BDB76B", "8B008B", "556B2F", "FF8C00", "9932CC", "8B4513", "2F4F4F",
    "9400D3", "00BFFF", "696969", "1E90FF", "FFFAF0", "228B22",
];

const ROOT_COLOR: &str = "FFFFFF";

#[derive(Debug, Serialize)]
struct Color {
    a: u8,
    rgb: String,
}

#[derive(Debug, Serialize)]
struct ColorGroup {
    query: String,
    color: Color,
}

impl ColorGroup {
    fn new(query: String, rgb: &str) -> Self {
        Self {
            query,
            color: Color {
                a: 1,
                rgb: rgb.to_owned(),
            },
        }
    }
}

/// Contents of `.obsidian/graph.json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphSettings {
    #[serde(rename = "collapse-filter")]
    collapse_filter: bool,
    search: String,
    show_tags: bool,
    show_attachments: bool,
    hide_unresolved: bool,
    show_orphans: bool,
    #[serde(rename = "collapse-color-groups")]
    collapse_color_groups: bool,
    color_groups: Vec<ColorGroup>,
    #[serde(rename = "collapse-display")]
    collapse_display: bool,
    show_arrow: bool,
    text_fade_multiplier: u32,
    node_size_multiplier: u32,
    line_size_multiplier: u32,
    #[serde(rename = "collapse-forces")]
    collapse_forces: bool,
    center_strength: f64,
    repel_strength: u32,
    link_strength: u32,
    link_distance: u32,
    scale: u32,
    close: bool,
}

impl GraphSettings {
    fn with_groups(color_groups: Vec<ColorGroup>) -> Self {
        Self {
            collapse_filter: true,
            search: String::new(),
            show_tags: false,
            show_attachments: false,
            hide_unresolved: false,
            show_orphans: true,
            collapse_color_groups: true,
            color_groups,
            collapse_display: true,
            show_arrow: false,
            text_fade_multiplier: 0,
            node_size_multiplier: 1,
            line_size_multiplier: 1,
            collapse_forces: true,
            center_strength: 0.518_713_248_970_312,
            repel_strength: 10,
            link_strength: 1,
            link_distance: 250,
            scale: 1,
            close: false,
        }
    }
}

/// Colour groups for `services`, starting at `palette_offset` in [`PALETTE`].
fn color_groups(services: &BTreeSet<String>, palette_offset: usize) -> Vec<ColorGroup> {
    let mut groups = Vec::with_capacity(services.len() * 2 + 1);
    for (index, service) in services.iter().enumerate() {
        let rgb = PALETTE[(palette_offset + index) % PALETTE.len()];
        groups.push(ColorGroup::new(format!("path:{CATEGORIES_DIR}/{service}"), rgb));
        groups.push(ColorGroup::new(format!("path:{ROLES_DIR}/{service}"), rgb));
    }
    groups.push(ColorGroup::new(format!("file:{ROOT_NOTE}"), ROOT_COLOR));
    groups
}

/// Write `.obsidian/graph.json` colouring every service's notes.
///
/// Services are the first dotted segment of every category note name.
/// Returns the number of services.
pub fn write_graph_config(layout: &VaultLayout, palette_offset: usize) -> Result<usize, VaultError> {
    let services: BTreeSet<String> = scan_notes(&layout.categories_dir())?
        .into_iter()
        .filter(|note| note.stem != ROOT_NOTE)
        .filter_map(|note| note.stem.split('.').next().map(str::to_owned))
        .collect();

    let settings = GraphSettings::with_groups(color_groups(&services, palette_offset));
    let json = serde_json::to_string_pretty(&settings)?;
    write_note(&layout.graph_config(), &json)?;

    info!(services = services.len(), "Wrote graph settings");
    Ok(services.len())
}
