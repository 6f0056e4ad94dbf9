//! Node layout specs and their conversion to taffy styles.
//!
//! A [`LayoutSpec`] is the small slice of flexbox the slider needs: a
//! direction, sizes in cells/percent/viewport units, whether the node may
//! shrink, whether it clips its children, and whether it overlays its parent.
//! [`resolve_spec`] maps it to a [`taffy::Style`].

use taffy::prelude::*;

/// A length in one of the units the slider understands.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Length {
    /// Sized by content / stretch.
    #[default]
    Auto,
    /// Absolute terminal cells.
    Cells(f32),
    /// Percent of the parent (0..=100).
    Percent(f32),
    /// Percent of the viewport width.
    Vw(f32),
    /// Percent of the viewport height.
    Vh(f32),
}

/// Main axis of a node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Row,
    #[default]
    Column,
}

/// Layout description attached to every DOM node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutSpec {
    pub direction: Direction,
    pub width: Length,
    pub height: Length,
    pub min_width: Option<Length>,
    pub max_width: Option<Length>,
    /// Flex grow factor.
    pub grow: f32,
    /// `false` pins the node at its basis (`flex-shrink: 0`).
    pub shrink: bool,
    /// Clip overflowing children (`overflow: hidden`).
    pub clip: bool,
    /// Cover the parent's box (`position: absolute; inset: 0`).
    pub overlay: bool,
    /// Removed from layout (`display: none`).
    pub hidden: bool,
}

impl LayoutSpec {
    /// A node laying its children out left to right.
    pub fn row() -> Self {
        Self { direction: Direction::Row, shrink: true, ..Self::default() }
    }

    /// A node laying its children out top to bottom.
    pub fn column() -> Self {
        Self { direction: Direction::Column, shrink: true, ..Self::default() }
    }

    pub fn width(mut self, width: Length) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: Length) -> Self {
        self.height = height;
        self
    }

    pub fn min_width(mut self, width: Length) -> Self {
        self.min_width = Some(width);
        self
    }

    pub fn max_width(mut self, width: Length) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn grow(mut self, grow: f32) -> Self {
        self.grow = grow;
        self
    }

    /// Never shrink below the basis.
    pub fn fixed(mut self) -> Self {
        self.shrink = false;
        self
    }

    pub fn clip(mut self) -> Self {
        self.clip = true;
        self
    }

    pub fn overlay(mut self) -> Self {
        self.overlay = true;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

fn resolve_dimension(length: Length, viewport: taffy::geometry::Size<f32>) -> Dimension {
    match length {
        Length::Auto => Dimension::AUTO,
        Length::Cells(v) => Dimension::from_length(v),
        Length::Percent(v) => Dimension::from_percent(v / 100.0),
        Length::Vw(v) => Dimension::from_length(v / 100.0 * viewport.width),
        Length::Vh(v) => Dimension::from_length(v / 100.0 * viewport.height),
    }
}

/// Convert a [`LayoutSpec`] into a [`taffy::Style`].
///
/// `viewport_size` is `(columns, rows)` and resolves `Vw`/`Vh` lengths.
pub fn resolve_spec(spec: &LayoutSpec, viewport_size: (u16, u16)) -> taffy::Style {
    let viewport = taffy::geometry::Size {
        width: f32::from(viewport_size.0),
        height: f32::from(viewport_size.1),
    };

    let mut style = taffy::Style {
        display: if spec.hidden { Display::None } else { Display::Flex },
        flex_direction: match spec.direction {
            Direction::Row => FlexDirection::Row,
            Direction::Column => FlexDirection::Column,
        },
        flex_grow: spec.grow,
        flex_shrink: if spec.shrink { 1.0 } else { 0.0 },
        ..taffy::Style::default()
    };

    style.size.width = resolve_dimension(spec.width, viewport);
    style.size.height = resolve_dimension(spec.height, viewport);
    if let Some(min) = spec.min_width {
        style.min_size.width = resolve_dimension(min, viewport);
    }
    if let Some(max) = spec.max_width {
        style.max_size.width = resolve_dimension(max, viewport);
    }

    if spec.clip {
        style.overflow = taffy::geometry::Point {
            x: taffy::style::Overflow::Hidden,
            y: taffy::style::Overflow::Hidden,
        };
    }

    if spec.overlay {
        style.position = Position::Absolute;
        style.inset = taffy::geometry::Rect {
            top: LengthPercentageAuto::from_length(0.0),
            right: LengthPercentageAuto::from_length(0.0),
            bottom: LengthPercentageAuto::from_length(0.0),
            left: LengthPercentageAuto::from_length(0.0),
        };
    }

    style
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: (u16, u16) = (80, 24);

    #[test]
    fn row_and_column_directions() {
        assert_eq!(resolve_spec(&LayoutSpec::row(), VP).flex_direction, FlexDirection::Row);
        assert_eq!(resolve_spec(&LayoutSpec::column(), VP).flex_direction, FlexDirection::Column);
    }

    #[test]
    fn cells_and_percent_sizes() {
        let style = resolve_spec(
            &LayoutSpec::row().width(Length::Cells(12.0)).height(Length::Percent(50.0)),
            VP,
        );
        assert_eq!(style.size.width, Dimension::from_length(12.0));
        assert_eq!(style.size.height, Dimension::from_percent(0.5));
    }

    #[test]
    fn viewport_units_resolve_to_lengths() {
        let style = resolve_spec(
            &LayoutSpec::column().width(Length::Vw(50.0)).height(Length::Vh(100.0)),
            VP,
        );
        assert_eq!(style.size.width, Dimension::from_length(40.0));
        assert_eq!(style.size.height, Dimension::from_length(24.0));
    }

    #[test]
    fn fixed_nodes_do_not_shrink() {
        assert_eq!(resolve_spec(&LayoutSpec::row(), VP).flex_shrink, 1.0);
        assert_eq!(resolve_spec(&LayoutSpec::row().fixed(), VP).flex_shrink, 0.0);
    }

    #[test]
    fn clip_sets_hidden_overflow() {
        let style = resolve_spec(&LayoutSpec::row().clip(), VP);
        assert_eq!(style.overflow.x, taffy::style::Overflow::Hidden);
    }

    #[test]
    fn overlay_is_absolute_with_zero_inset() {
        let style = resolve_spec(&LayoutSpec::column().overlay(), VP);
        assert_eq!(style.position, Position::Absolute);
        assert_eq!(style.inset.left, LengthPercentageAuto::from_length(0.0));
    }

    #[test]
    fn hidden_is_display_none() {
        let style = resolve_spec(&LayoutSpec::row().hidden(true), VP);
        assert_eq!(style.display, Display::None);
    }

    #[test]
    fn max_width_is_optional() {
        let style = resolve_spec(&LayoutSpec::row(), VP);
        assert_eq!(style.max_size.width, Dimension::AUTO);
        let style = resolve_spec(&LayoutSpec::row().max_width(Length::Cells(30.0)), VP);
        assert_eq!(style.max_size.width, Dimension::from_length(30.0));
    }
}
