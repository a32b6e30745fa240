//! SVG visualization of a collage plan.
//!
//! Two annotated panels, top to bottom: the rows as assigned (every image at
//! its normalized size, with a guide at the target width), then the final
//! canvas with each placement labeled by input index (hover for its size).
//! Clipped placements are drawn dashed.
//!
//! # Example
//!
//! ```
//! use zencollage::{Size, plan_collage, svg::render_collage_svg};
//!
//! let plan = plan_collage(&[
//!     Size::new(640, 480),
//!     Size::new(480, 640),
//!     Size::new(500, 500),
//!     Size::new(1000, 500),
//! ])
//! .unwrap();
//!
//! let svg = render_collage_svg(&plan);
//! assert!(svg.starts_with("<svg"));
//! ```

#[cfg(not(feature = "std"))]
use alloc::format;
#[cfg(not(feature = "std"))]
use alloc::string::{String, ToString};
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::constraint::Size;
use crate::plan::CollagePlan;

const MAX_PANEL_W: f64 = 480.0;
const MAX_PANEL_H: f64 = 320.0;
const PANEL_GAP: f64 = 50.0;
const MARGIN_X: f64 = 40.0;
const MARGIN_TOP: f64 = 30.0;
const LABEL_H: f64 = 22.0;

struct Panel {
    label: String,
    outer: Size,
    tiles: Vec<Tile>,
    /// Vertical guide line at this x (source pixels).
    guide: Option<u32>,
    annotation: String,
}

struct Tile {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    text: String,
    /// Full image size, shown as a tooltip.
    size: Size,
    clipped: bool,
}

/// Render a complete SVG document for `plan`.
pub fn render_collage_svg(plan: &CollagePlan) -> String {
    let panels = build_panels(plan);
    render_panels(&panels)
}

fn build_panels(plan: &CollagePlan) -> Vec<Panel> {
    let mut panels = Vec::with_capacity(2);

    // Rows as assigned, before scaling.
    let mut tiles = Vec::with_capacity(plan.sources.len());
    let mut y = 0u32;
    let mut widest = 0u32;
    for range in &plan.rows.rows {
        let mut x = 0u32;
        let mut height = 0u32;
        for i in range.clone() {
            let s = plan.sources[i];
            tiles.push(Tile {
                x,
                y,
                w: s.width,
                h: s.height,
                text: i.to_string(),
                size: s,
                clipped: false,
            });
            x = x.saturating_add(s.width);
            height = height.max(s.height);
        }
        widest = widest.max(x);
        y = y.saturating_add(height);
    }
    let target = u32::try_from(plan.scaled.target_width).unwrap_or(u32::MAX);
    panels.push(Panel {
        label: format!(
            "Rows  {} images in {}",
            plan.sources.len(),
            plan.rows.row_count()
        ),
        outer: Size::new(widest, y),
        tiles,
        guide: (target < widest).then_some(target),
        annotation: format!("{:?}, target width {}", plan.rows.strategy, target),
    });

    // Final canvas.
    let layout = &plan.layout;
    let tiles = layout
        .placements
        .iter()
        .map(|p| {
            let v = p.visible();
            Tile {
                x: v.x,
                y: v.y,
                w: v.width,
                h: v.height,
                text: p.index.to_string(),
                size: p.size,
                clipped: p.source_crop.is_some(),
            }
        })
        .collect();
    let annotation = if layout.content_height < layout.canvas.height {
        format!("content height {}, padded to even", layout.content_height)
    } else {
        String::new()
    };
    panels.push(Panel {
        label: format!("Canvas  {}×{}", layout.canvas.width, layout.canvas.height),
        outer: layout.canvas,
        tiles,
        guide: None,
        annotation,
    });

    panels
}

/// Scale a size to fit within the panel box, preserving aspect ratio.
fn scale_to_fit(size: Size) -> (f64, f64, f64) {
    let w = size.width as f64;
    let h = size.height as f64;
    if w == 0.0 || h == 0.0 {
        return (1.0, 1.0, 1.0);
    }
    let scale = (MAX_PANEL_W / w).min(MAX_PANEL_H / h);
    (w * scale, h * scale, scale)
}

fn render_panels(panels: &[Panel]) -> String {
    let count = panels.len() as f64;
    let total_h = 2.0 * MARGIN_TOP + count * (LABEL_H + MAX_PANEL_H) + (count - 1.0) * PANEL_GAP;
    let total_w = MAX_PANEL_W + 2.0 * MARGIN_X;

    let mut svg = String::with_capacity(4096);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        total_w as u32, total_h as u32, total_w, total_h
    ));
    svg.push('\n');

    svg.push_str(r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 13px; font-weight: bold; fill: #333; }
  .annotation { font-size: 11px; fill: #666; }
  .index { font-size: 11px; fill: #fff; }
  .outer { fill: #e8e8e8; stroke: #999; stroke-width: 1; }
  .tile { fill: #6ba3d6; stroke: #2c6faa; stroke-width: 1; }
  .clipped { fill: #b8d4ee; stroke: #7baed0; stroke-width: 1; stroke-dasharray: 4,2; }
  .guide { stroke: #c0392b; stroke-width: 1.5; stroke-dasharray: 6,3; }
  .arrow { stroke: #666; stroke-width: 1.5; fill: none; marker-end: url(#arrowhead); }
  .arrowhead { fill: #666; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .annotation { fill: #aaa; }
    .outer { fill: #2d2d2d; stroke: #555; }
    .tile { fill: #3a72a4; stroke: #5a9fd4; }
    .clipped { fill: #2a4a65; stroke: #4a7a9e; }
    .guide { stroke: #e57368; }
    .arrow { stroke: #888; }
    .arrowhead { fill: #888; }
  }
</style>
<defs>
  <marker id="arrowhead" markerWidth="8" markerHeight="6" refX="8" refY="3" orient="auto">
    <polygon points="0 0, 8 3, 0 6" class="arrowhead"/>
  </marker>
</defs>
"##);

    let center_x = total_w / 2.0;
    let mut y = MARGIN_TOP;

    for (i, panel) in panels.iter().enumerate() {
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" class="label" text-anchor="middle">{}</text>"#,
            center_x,
            y + 14.0,
            escape_xml(&panel.label)
        ));
        svg.push('\n');
        y += LABEL_H;

        let (sw, sh, scale) = scale_to_fit(panel.outer);
        let px = center_x - sw / 2.0;
        let py = y;
        svg.push_str(&format!(
            r#"<rect x="{px:.1}" y="{py:.1}" width="{sw:.1}" height="{sh:.1}" class="outer" rx="2"/>"#
        ));
        svg.push('\n');

        for tile in &panel.tiles {
            let tx = px + tile.x as f64 * scale;
            let ty = py + tile.y as f64 * scale;
            let tw = tile.w as f64 * scale;
            let th = tile.h as f64 * scale;
            let class = if tile.clipped { "clipped" } else { "tile" };
            svg.push_str(&format!(
                r#"<rect x="{tx:.1}" y="{ty:.1}" width="{tw:.1}" height="{th:.1}" class="{class}"><title>{}: {}×{}</title></rect>"#,
                escape_xml(&tile.text),
                tile.size.width,
                tile.size.height
            ));
            svg.push('\n');
            if tw >= 12.0 && th >= 12.0 {
                svg.push_str(&format!(
                    r#"<text x="{:.1}" y="{:.1}" class="index" text-anchor="middle">{}</text>"#,
                    tx + tw / 2.0,
                    ty + th / 2.0 + 4.0,
                    escape_xml(&tile.text)
                ));
                svg.push('\n');
            }
        }

        if let Some(gx) = panel.guide {
            let x = px + gx as f64 * scale;
            svg.push_str(&format!(
                r#"<line x1="{x:.1}" y1="{:.1}" x2="{x:.1}" y2="{:.1}" class="guide"/>"#,
                py - 4.0,
                py + sh + 4.0
            ));
            svg.push('\n');
        }

        if !panel.annotation.is_empty() {
            svg.push_str(&format!(
                r#"<text x="{}" y="{:.1}" class="annotation" text-anchor="middle">{}</text>"#,
                center_x,
                py + sh + 16.0,
                escape_xml(&panel.annotation)
            ));
            svg.push('\n');
        }

        y += MAX_PANEL_H;

        if i + 1 < panels.len() {
            svg.push_str(&format!(
                r#"<line x1="{center_x}" y1="{:.1}" x2="{center_x}" y2="{:.1}" class="arrow"/>"#,
                y + 8.0,
                y + PANEL_GAP - 8.0
            ));
            svg.push('\n');
            y += PANEL_GAP;
        }
    }

    svg.push_str("</svg>\n");
    svg
}

/// Escape special characters for XML text content.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
