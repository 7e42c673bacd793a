//! Taffy Bridge - Integration with Taffy layout engine
//!
//! The screens are small, fixed trees: a centered column of text lines for
//! the preloader and the hero, and a single row for the navigation bar.
//! Each call builds a throwaway `TaffyTree`, runs flexbox, and reads the
//! rounded cell positions back out.

use taffy::{
    AlignItems, AvailableSpace, Dimension, Display, FlexDirection, JustifyContent,
    LengthPercentageAuto, NodeId, Rect, Size, Style, TaffyError, TaffyTree,
};

use crate::error::{FolioError, Result};

// =============================================================================
// Types
// =============================================================================

/// One fixed-size line to be stacked in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBox {
    pub width: u16,
    pub height: u16,
    /// Blank rows below this line.
    pub gap_after: u16,
}

impl LineBox {
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            gap_after: 0,
        }
    }

    pub const fn with_gap(mut self, gap_after: u16) -> Self {
        self.gap_after = gap_after;
        self
    }
}

/// Computed cell rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

// =============================================================================
// Conversion helpers
// =============================================================================

fn length(cells: u16) -> Dimension {
    Dimension::Length(cells as f32)
}

fn margin_bottom(cells: u16) -> Rect<LengthPercentageAuto> {
    Rect {
        left: LengthPercentageAuto::Length(0.0),
        right: LengthPercentageAuto::Length(0.0),
        top: LengthPercentageAuto::Length(0.0),
        bottom: LengthPercentageAuto::Length(cells as f32),
    }
}

fn layout_error(error: TaffyError) -> FolioError {
    FolioError::Layout(format!("{error:?}"))
}

/// Negative offsets (content larger than the viewport) are clamped to 0.
fn to_cell(value: f32) -> u16 {
    value.round().max(0.0).min(u16::MAX as f32) as u16
}

fn read_placements(tree: &TaffyTree<()>, nodes: &[NodeId]) -> Result<Vec<Placement>> {
    nodes
        .iter()
        .map(|&node| {
            let layout = tree.layout(node).map_err(layout_error)?;
            Ok(Placement {
                x: to_cell(layout.location.x),
                y: to_cell(layout.location.y),
                width: to_cell(layout.size.width),
                height: to_cell(layout.size.height),
            })
        })
        .collect()
}

fn viewport(width: u16, height: u16) -> Size<AvailableSpace> {
    Size {
        width: AvailableSpace::Definite(width as f32),
        height: AvailableSpace::Definite(height as f32),
    }
}

// =============================================================================
// Layouts
// =============================================================================

/// Stack `lines` in a column centered both ways in a `width` x `height` area.
pub fn center_column(width: u16, height: u16, lines: &[LineBox]) -> Result<Vec<Placement>> {
    let mut tree: TaffyTree<()> = TaffyTree::new();

    let children = lines
        .iter()
        .map(|line| {
            tree.new_leaf(Style {
                size: Size {
                    width: length(line.width),
                    height: length(line.height),
                },
                margin: margin_bottom(line.gap_after),
                flex_shrink: 0.0,
                ..Default::default()
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(layout_error)?;

    let root = tree
        .new_with_children(
            Style {
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                justify_content: Some(JustifyContent::Center),
                align_items: Some(AlignItems::Center),
                size: Size {
                    width: length(width),
                    height: length(height),
                },
                ..Default::default()
            },
            &children,
        )
        .map_err(layout_error)?;

    tree.compute_layout(root, viewport(width, height))
        .map_err(layout_error)?;
    read_placements(&tree, &children)
}

/// Lay out one-row items across `width` with free space between them.
///
/// Used for the navigation bar: brand on the left, indicator on the right.
pub fn spread_row(width: u16, items: &[u16]) -> Result<Vec<Placement>> {
    let mut tree: TaffyTree<()> = TaffyTree::new();

    let children = items
        .iter()
        .map(|&item| {
            tree.new_leaf(Style {
                size: Size {
                    width: length(item),
                    height: length(1),
                },
                flex_shrink: 0.0,
                ..Default::default()
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(layout_error)?;

    let root = tree
        .new_with_children(
            Style {
                display: Display::Flex,
                flex_direction: FlexDirection::Row,
                justify_content: Some(JustifyContent::SpaceBetween),
                size: Size {
                    width: length(width),
                    height: length(1),
                },
                ..Default::default()
            },
            &children,
        )
        .map_err(layout_error)?;

    tree.compute_layout(root, viewport(width, 1))
        .map_err(layout_error)?;
    read_placements(&tree, &children)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_is_centered() {
        let placed = center_column(80, 24, &[LineBox::new(10, 1)]).unwrap();
        assert_eq!(
            placed,
            vec![Placement {
                x: 35,
                y: 12,
                width: 10,
                height: 1
            }]
        );
    }

    #[test]
    fn test_lines_stack_with_gaps() {
        let lines = [LineBox::new(20, 1).with_gap(1), LineBox::new(10, 2)];
        let placed = center_column(40, 10, &lines).unwrap();

        // Total block is 1 + 1 + 2 = 4 rows, centered in 10 => starts at 3.
        assert_eq!(placed[0].y, 3);
        assert_eq!(placed[1].y, 5);
        assert_eq!(placed[0].x, 10);
        assert_eq!(placed[1].x, 15);
        assert_eq!(placed[1].height, 2);
    }

    #[test]
    fn test_overflow_is_clamped() {
        let placed = center_column(10, 2, &[LineBox::new(4, 6)]).unwrap();
        assert_eq!(placed[0].y, 0);
        assert_eq!(placed[0].height, 6);
    }

    #[test]
    fn test_spread_row() {
        let placed = spread_row(30, &[5, 10, 5]).unwrap();
        assert_eq!(placed[0].x, 0);
        assert_eq!(placed[1].x, 10);
        assert_eq!(placed[2].x, 25);
    }

    #[test]
    fn test_empty_column() {
        assert!(center_column(10, 10, &[]).unwrap().is_empty());
    }
}
