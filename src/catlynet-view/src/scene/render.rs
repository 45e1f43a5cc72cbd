// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::geometry::arrowhead::{ArrowheadFill, arrowhead_for, render_arrowhead};
use crate::geometry::common::{escape_xml_attr, escape_xml_text, format_number};
use crate::graph::EdgeKind;
use crate::scene::style::{Color, SceneStyle, ShapeKind};
use crate::scene::visual::{EdgeVisual, Effect, NodeVisual, Scene};

const BASE_STYLES: &str = r#"
.catlynet-canvas text {
  dominant-baseline: hanging;
  white-space: pre;
}

.catlynet-edge path {
  fill: none;
}

.catlynet-handle {
  fill: transparent;
  stroke: transparent;
}
"#;

/// Number of z-layers: edges, nodes, labels.
const Z_MAX: usize = 3;

fn selected_class(effect: Effect) -> &'static str {
    match effect {
        Effect::Selected => " catlynet-selected",
        Effect::None => "",
    }
}

/// Style rules that depend on the scene's current style.
fn dynamic_styles(style: &SceneStyle) -> String {
    let (dash, gap) = style.edge.dash;
    format!(
        ".catlynet-canvas text {{\n  font-family: \"{}\";\n  font-size: {}px;\n}}\n\
         .catlynet-edge path {{\n  stroke: {};\n  stroke-width: {}px;\n}}\n\
         .catlynet-edge path.catlynet-dashed {{\n  stroke-dasharray: {} {};\n}}\n\
         .catlynet-inhibitor path, polyline.catlynet-inhibitor {{\n  stroke: {};\n}}\n\
         .catlynet-arrow {{\n  stroke: {};\n  stroke-width: 1px;\n}}\n\
         .catlynet-selected {{\n  stroke: {} !important;\n}}\n\
         text.catlynet-selected {{\n  fill: {};\n  stroke: none !important;\n}}\n",
        escape_xml_text(&style.font.family),
        format_number(style.font.size),
        style.edge.stroke,
        format_number(style.edge.stroke_width),
        format_number(dash),
        format_number(gap),
        style.inhibitor_color,
        Color::BLACK,
        style.selection_color,
        style.selection_color,
    )
}

fn render_edge(edge: &EdgeVisual, style: &SceneStyle) -> String {
    let inhibitor = edge.kind == EdgeKind::Inhibitor;
    let group_class = if inhibitor {
        "catlynet-edge catlynet-inhibitor"
    } else {
        "catlynet-edge"
    };
    let path_class = format!(
        "{}{}",
        if edge.is_dashed() { "catlynet-dashed" } else { "" },
        selected_class(edge.path_effect)
    );

    let (shape, fill) = arrowhead_for(edge.kind);
    let fill = match fill {
        ArrowheadFill::None => "catlynet-arrow-open",
        ArrowheadFill::White => "catlynet-arrow-white",
        ArrowheadFill::LightGrey => "catlynet-arrow-grey",
    };
    let mut arrow_class = format!("catlynet-arrow {fill}{}", selected_class(edge.arrow_effect));
    if inhibitor {
        arrow_class.push_str(" catlynet-inhibitor");
    }

    let handle = edge.handle_position();
    let mut svg = String::new();
    svg.push_str(&format!(
        "<g class=\"{}\" data-edge=\"{}\">",
        group_class, edge.edge
    ));
    svg.push_str(&format!(
        "<path d=\"{}\" class=\"{}\"></path>",
        escape_xml_attr(&edge.path.to_svg_data()),
        path_class.trim()
    ));
    svg.push_str(&render_arrowhead(shape, &edge.path.arrow, &arrow_class));
    svg.push_str(&format!(
        "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" class=\"catlynet-handle{}\"></circle>",
        format_number(handle.x),
        format_number(handle.y),
        format_number(style.edge.handle_radius),
        selected_class(edge.handle_effect)
    ));
    svg.push_str("</g>");
    svg
}

fn render_node_shape(node: &NodeVisual, style: &SceneStyle) -> String {
    let node_style = style.node_style(node.role);
    let paint = format!(
        "stroke=\"{}\" fill=\"{}\" stroke-width=\"{}\"",
        node_style.stroke,
        node_style.fill,
        format_number(node.stroke_width(style))
    );
    let class = format!("catlynet-node{}", selected_class(node.shape_effect));
    let p = node.position;

    match node_style.shape {
        ShapeKind::Circle { radius } => format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" {} class=\"{}\" data-node=\"{}\"></circle>",
            format_number(p.x),
            format_number(p.y),
            format_number(radius),
            paint,
            class,
            node.node
        ),
        ShapeKind::Square { size } => format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" {} class=\"{}\" data-node=\"{}\"></rect>",
            format_number(p.x - size / 2.0),
            format_number(p.y - size / 2.0),
            format_number(size),
            format_number(size),
            paint,
            class,
            node.node
        ),
    }
}

fn render_label(node: &NodeVisual, style: &SceneStyle) -> String {
    let node_style = style.node_style(node.role);
    let bounds = node.label_bounds(style);
    let mut svg = String::new();

    if let Some(background) = node_style.label_background {
        svg.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"></rect>",
            format_number(bounds.left),
            format_number(bounds.top),
            format_number(bounds.width()),
            format_number(bounds.height()),
            background
        ));
    }

    let font_attrs = match &node_style.label_font {
        Some(font) => format!(
            " font-family=\"{}\" font-size=\"{}\"",
            escape_xml_attr(&font.family),
            format_number(font.size)
        ),
        None => String::new(),
    };
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"{}\"{} class=\"catlynet-label{}\">{}</text>",
        format_number(bounds.left),
        format_number(bounds.top),
        font_attrs,
        selected_class(node.label_effect),
        escape_xml_text(&node.text)
    ));
    svg
}

/// Serialize `scene` as a standalone SVG document.
pub fn render_svg(scene: &Scene) -> String {
    let style = scene.style();
    let mut z_layers: Vec<Vec<String>> = vec![Vec::new(); Z_MAX];

    for edge in scene.edges() {
        z_layers[0].push(render_edge(edge, style));
    }
    for node in scene.nodes() {
        z_layers[1].push(render_node_shape(node, style));
        z_layers[2].push(render_label(node, style));
    }

    let (view_box, width, height) = match scene.bounding_box() {
        Some(bbox) => {
            let bbox = bbox.padded(style.margin);
            let left = bbox.left.floor();
            let top = bbox.top.floor();
            let width = (bbox.right - left).ceil();
            let height = (bbox.bottom - top).ceil();
            (
                format!(
                    "{} {} {} {}",
                    format_number(left),
                    format_number(top),
                    format_number(width),
                    format_number(height)
                ),
                width,
                height,
            )
        }
        None => ("0 0 100 100".to_string(), 100.0, 100.0),
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{}\" class=\"catlynet-canvas\">",
        format_number(width),
        format_number(height),
        view_box
    ));
    svg.push_str("<style>\n");
    svg.push_str(BASE_STYLES);
    svg.push_str(&dynamic_styles(style));
    svg.push_str(
        ".catlynet-arrow-open { fill: none; }\n\
         .catlynet-arrow-white { fill: #ffffff; }\n\
         .catlynet-arrow-grey { fill: #d3d3d3; }\n",
    );
    svg.push_str("</style>\n");
    svg.push_str("<g>");
    for layer in &z_layers {
        for fragment in layer {
            svg.push_str(fragment);
        }
    }
    svg.push_str("</g>");
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CoordinateMap, NodeId, Position, ReactionGraph};
    use crate::model::{Reaction, ReactionSystem};
    use crate::selection::SelectionChange;

    fn scene() -> Scene {
        let system = ReactionSystem {
            name: "svg".to_string(),
            reactions: vec![
                Reaction::new("R<1>")
                    .with_reactants(&["F"])
                    .with_products(&["P"])
                    .with_inhibitions(&["I"]),
            ],
            foods: ["F".into()].into_iter().collect(),
        };
        let (graph, foods) = ReactionGraph::build(&system);
        let coords: CoordinateMap = [
            (NodeId(0), Position::new(0.0, 0.0)),
            (NodeId(1), Position::new(-100.0, 0.0)),
            (NodeId(2), Position::new(100.0, 0.0)),
            (NodeId(3), Position::new(0.0, 100.0)),
        ]
        .into_iter()
        .collect();
        Scene::build(&graph, &foods, &coords, SceneStyle::default())
    }

    #[test]
    fn test_render_document_structure() {
        let svg = render_svg(&scene());
        assert!(svg.starts_with("<svg "));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("class=\"catlynet-canvas\""));
        assert_eq!(svg.matches("<g class=\"catlynet-edge").count(), 3);
        assert_eq!(svg.matches("class=\"catlynet-node").count(), 4);
        assert!(svg.contains("R&lt;1&gt;"));
    }

    #[test]
    fn test_edges_drawn_below_nodes() {
        let svg = render_svg(&scene());
        let first_edge = svg.find("catlynet-edge\"").unwrap();
        let first_node = svg.find("catlynet-node").unwrap();
        let first_label = svg.find("catlynet-label").unwrap();
        assert!(first_edge < first_node);
        assert!(first_node < first_label);
    }

    #[test]
    fn test_inhibitor_and_dash_styles() {
        let svg = render_svg(&scene());
        assert!(svg.contains("catlynet-edge catlynet-inhibitor"));
        assert!(svg.contains("stroke-dasharray: 2 4;"));
        assert!(svg.contains("stroke: #d3d3d3;"));
        // food molecule gets the thick stroke
        assert!(svg.contains("stroke-width=\"4\""));
    }

    #[test]
    fn test_selection_class() {
        let mut scene = scene();
        scene.apply_node_selection(&SelectionChange {
            added: vec![NodeId(2)],
            removed: vec![],
        });
        let svg = render_svg(&scene);
        assert_eq!(svg.matches("catlynet-node catlynet-selected").count(), 1);
        assert_eq!(svg.matches("catlynet-label catlynet-selected").count(), 1);
    }

    #[test]
    fn test_empty_scene() {
        let svg = render_svg(&Scene::empty(SceneStyle::default()));
        assert!(svg.contains("viewBox=\"0 0 100 100\""));
        assert!(!svg.contains("catlynet-node"));
    }
}
