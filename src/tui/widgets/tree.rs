//! Hierarchical tree widget for topology navigation.

use crate::model::Instance;
use crate::projection::ViewNode;
use crate::tui::theme::{colors, ColorScheme};
use crate::tui::viewmodel::ExpansionPolicy;
use ratatui::{
    prelude::*,
    widgets::{Block, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget},
};

/// Cursor and scroll state for the tree widget.
///
/// Expansion is deliberately not part of this state; it lives in the view's
/// [`ExpansionPolicy`] so that filter changes can replace it wholesale.
#[derive(Debug, Clone, Default)]
pub struct TreeState {
    /// Currently selected row index in the flattened view
    pub selected: usize,
    /// Scroll offset
    pub offset: usize,
    /// Total visible rows after the last render
    pub visible_count: usize,
}

impl TreeState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_next(&mut self) {
        if self.visible_count > 0 && self.selected < self.visible_count - 1 {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        if self.visible_count > 0 {
            self.selected = self.visible_count - 1;
        }
    }

    /// Clamp the cursor after the row count changed under it.
    pub fn clamp(&mut self, visible_count: usize) {
        self.visible_count = visible_count;
        if visible_count == 0 {
            self.selected = 0;
            self.offset = 0;
        } else if self.selected >= visible_count {
            self.selected = visible_count - 1;
        }
    }
}

/// One row of the flattened tree, borrowing its projection node.
#[derive(Debug, Clone)]
pub struct VisibleNode<'a> {
    pub node: &'a ViewNode,
    pub depth: usize,
    pub is_open: bool,
    pub is_last_sibling: bool,
    pub ancestors_last: Vec<bool>,
}

/// Flatten tree roots into the rows currently visible under a policy.
///
/// The row order here is the row order on screen, so the view maps its
/// cursor index straight into this list.
#[must_use]
pub fn visible_nodes<'a>(roots: &'a [ViewNode], policy: &ExpansionPolicy) -> Vec<VisibleNode<'a>> {
    let mut items = Vec::new();
    flatten_nodes(roots, 0, policy, &mut items, &[]);
    items
}

fn flatten_nodes<'a>(
    nodes: &'a [ViewNode],
    depth: usize,
    policy: &ExpansionPolicy,
    items: &mut Vec<VisibleNode<'a>>,
    ancestors_last: &[bool],
) {
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i == nodes.len() - 1;
        let is_open = node.is_container() && policy.is_open(&node.node_id());

        let mut current_ancestors = ancestors_last.to_vec();
        current_ancestors.push(is_last);

        items.push(VisibleNode {
            node,
            depth,
            is_open,
            is_last_sibling: is_last,
            ancestors_last: current_ancestors.clone(),
        });

        if is_open && !node.children().is_empty() {
            flatten_nodes(node.children(), depth + 1, policy, items, &current_ancestors);
        }
    }
}

fn node_label(node: &ViewNode) -> String {
    match node {
        ViewNode::Region { name, .. } => name.clone(),
        ViewNode::Vpc { name, id, cidr, .. } => {
            if cidr.is_empty() {
                format!("{name} ({id})")
            } else {
                format!("{name} ({id}) {cidr}")
            }
        }
        ViewNode::Subnet {
            name, id, cidr, az, ..
        } => {
            let mut label = format!("{name} ({id})");
            if !cidr.is_empty() {
                label.push_str(&format!(" {cidr}"));
            }
            if !az.is_empty() {
                label.push_str(&format!(" [{az}]"));
            }
            label
        }
        ViewNode::Instance { instance, .. } => instance_label(instance),
        ViewNode::SecurityGroup { group, .. } => {
            if group.name.is_empty() {
                group.id.clone()
            } else {
                format!("{} ({})", group.name, group.id)
            }
        }
    }
}

fn instance_label(instance: &Instance) -> String {
    if instance.name.is_empty() {
        instance.id.clone()
    } else {
        format!("{} ({})", instance.name, instance.id)
    }
}

fn node_style(node: &ViewNode, scheme: &ColorScheme) -> Style {
    match node {
        ViewNode::Region { .. } => Style::default().fg(scheme.region).bold(),
        ViewNode::Vpc { .. } => Style::default().fg(scheme.vpc),
        ViewNode::Subnet { .. } => Style::default().fg(scheme.subnet),
        ViewNode::Instance { .. } => Style::default().fg(scheme.instance),
        ViewNode::SecurityGroup { .. } => Style::default().fg(scheme.security_group),
    }
}

/// The topology tree widget.
pub struct TopologyTree<'a> {
    roots: &'a [ViewNode],
    policy: &'a ExpansionPolicy,
    block: Option<Block<'a>>,
    highlight_style: Style,
    highlight_symbol: &'a str,
}

impl<'a> TopologyTree<'a> {
    #[must_use]
    pub fn new(roots: &'a [ViewNode], policy: &'a ExpansionPolicy) -> Self {
        let scheme = colors();
        Self {
            roots,
            policy,
            block: None,
            highlight_style: Style::default()
                .bg(scheme.selection)
                .add_modifier(Modifier::BOLD),
            highlight_symbol: "▶ ",
        }
    }

    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl StatefulWidget for TopologyTree<'_> {
    type State = TreeState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner_area = self.block.as_ref().map_or(area, |b| {
            let inner = b.inner(area);
            b.clone().render(area, buf);
            inner
        });

        if inner_area.width < 4 || inner_area.height < 1 {
            return;
        }

        let scheme = colors();
        let items = visible_nodes(self.roots, self.policy);
        let area = inner_area;
        state.clamp(items.len());

        // Keep the selected row inside the viewport.
        let visible_height = area.height as usize;
        if state.selected >= state.offset + visible_height {
            state.offset = state.selected - visible_height + 1;
        } else if state.selected < state.offset {
            state.offset = state.selected;
        }

        for (i, item) in items
            .iter()
            .skip(state.offset)
            .take(visible_height)
            .enumerate()
        {
            let y = area.y + i as u16;
            let is_selected = state.offset + i == state.selected;

            // Box-drawing prefix from the ancestor chain.
            let mut prefix = String::new();
            for is_last in item.ancestors_last.iter().take(item.depth) {
                if *is_last {
                    prefix.push_str("   ");
                } else {
                    prefix.push_str("│  ");
                }
            }
            if item.depth > 0 {
                if item.is_last_sibling {
                    prefix.push_str("└─ ");
                } else {
                    prefix.push_str("├─ ");
                }
            }

            let expand_indicator = if item.node.is_container() && self.policy.allows_toggling() {
                if item.is_open { "▼ " } else { "▶ " }
            } else {
                "  "
            };

            let mut x = area.x;

            if is_selected {
                for ch in self.highlight_symbol.chars() {
                    if x < area.x + area.width {
                        if let Some(cell) = buf.cell_mut((x, y)) {
                            cell.set_char(ch)
                                .set_style(Style::default().fg(scheme.accent));
                        }
                        x += 1;
                    }
                }
            } else {
                x += self.highlight_symbol.chars().count() as u16;
            }

            for ch in prefix.chars() {
                if x < area.x + area.width {
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_char(ch)
                            .set_style(Style::default().fg(scheme.muted));
                    }
                    x += 1;
                }
            }

            let indicator_style = if item.node.is_container() {
                Style::default().fg(scheme.accent)
            } else {
                Style::default()
            };
            for ch in expand_indicator.chars() {
                if x < area.x + area.width {
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_char(ch).set_style(indicator_style);
                    }
                    x += 1;
                }
            }

            let label_style = if is_selected {
                self.highlight_style
            } else {
                node_style(item.node, &scheme)
            };
            for ch in node_label(item.node).chars() {
                if x < area.x + area.width {
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_char(ch).set_style(label_style);
                    }
                    x += 1;
                }
            }

            // Trailing annotation: scan error or instance state.
            let annotation = match item.node {
                ViewNode::Region { error: Some(e), .. } => {
                    Some((format!(" ⚠ {e}"), Style::default().fg(scheme.error)))
                }
                ViewNode::Instance { instance, .. } if !instance.state.is_empty() => Some((
                    format!(" [{}]", instance.state),
                    Style::default().fg(scheme.state_color(&instance.state)),
                )),
                _ => None,
            };
            if let Some((text, style)) = annotation {
                for ch in text.chars() {
                    if x < area.x + area.width {
                        if let Some(cell) = buf.cell_mut((x, y)) {
                            cell.set_char(ch).set_style(style);
                        }
                        x += 1;
                    }
                }
            }

            if is_selected {
                while x < area.x + area.width {
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_style(self.highlight_style);
                    }
                    x += 1;
                }
            }
        }

        if items.len() > visible_height {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .thumb_style(Style::default().fg(scheme.accent))
                .track_style(Style::default().fg(scheme.muted));
            let mut scrollbar_state = ScrollbarState::new(items.len()).position(state.selected);
            scrollbar.render(area, buf, &mut scrollbar_state);
        }
    }
}
