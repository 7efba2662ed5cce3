use serde::{Deserialize, Serialize};

use crate::core::ScreenRect;
use crate::error::{ChartError, ChartResult};

fn finite_point(point: (f64, f64)) -> bool {
    point.0.is_finite() && point.1.is_finite()
}

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> ChartResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
            return Err(ChartError::InvalidData(format!(
                "color `{hex}` must be #rrggbb or #rrggbbaa"
            )));
        }

        let channel = |index: usize| -> ChartResult<f64> {
            u8::from_str_radix(&digits[index..index + 2], 16)
                .map(|value| f64::from(value) / 255.0)
                .map_err(|_| ChartError::InvalidData(format!("color `{hex}` is not hex")))
        };
        let alpha = if digits.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    /// Ok when every channel lies in `[0, 1]`; NaN never does.
    pub fn validate(self) -> ChartResult<()> {
        let channels = [self.red, self.green, self.blue, self.alpha];
        match channels.iter().position(|value| !(0.0..=1.0).contains(value)) {
            None => Ok(()),
            Some(index) => Err(ChartError::InvalidData(format!(
                "color {self:?} has channel {index} outside [0, 1]"
            ))),
        }
    }
}

/// Named dash patterns; `dash_array` yields canvas `setLineDash` segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeDash {
    #[default]
    Solid,
    ShortDash,
    ShortDot,
    ShortDashDot,
    ShortDashDotDot,
    Dot,
    Dash,
    LongDash,
    DashDot,
    LongDashDot,
    LongDashDotDot,
}

impl StrokeDash {
    #[must_use]
    pub const fn dash_array(self) -> &'static [f64] {
        match self {
            Self::Solid => &[],
            Self::ShortDash => &[6.0, 2.0],
            Self::ShortDot => &[2.0, 2.0],
            Self::ShortDashDot => &[6.0, 2.0, 2.0, 2.0],
            Self::ShortDashDotDot => &[6.0, 2.0, 2.0, 2.0, 2.0, 2.0],
            Self::Dot => &[2.0, 6.0],
            Self::Dash => &[8.0, 6.0],
            Self::LongDash => &[16.0, 6.0],
            Self::DashDot => &[8.0, 6.0, 2.0, 6.0],
            Self::LongDashDot => &[16.0, 6.0, 2.0, 6.0],
            Self::LongDashDotDot => &[16.0, 6.0, 2.0, 6.0, 2.0, 6.0],
        }
    }
}

/// Outline paint shared by lines, rects and paths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub dash: StrokeDash,
}

impl Stroke {
    #[must_use]
    pub const fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: StrokeDash::Solid,
        }
    }

    #[must_use]
    pub fn with_dash(self, dash: StrokeDash) -> Self {
        Self { dash, ..self }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(ChartError::InvalidData(format!(
                "stroke width {} is not a positive finite number",
                self.width
            )));
        }
        self.color.validate()
    }
}

/// One straight segment between two canvas points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub stroke: Stroke,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(from: (f64, f64), to: (f64, f64), stroke: Stroke) -> Self {
        Self { from, to, stroke }
    }

    /// Horizontal segment at `y` from `x_start` to `x_end`.
    #[must_use]
    pub const fn horizontal(y: f64, x_start: f64, x_end: f64, stroke: Stroke) -> Self {
        Self::new((x_start, y), (x_end, y), stroke)
    }

    pub fn validate(self) -> ChartResult<()> {
        if !finite_point(self.from) || !finite_point(self.to) {
            return Err(ChartError::InvalidData(format!(
                "line {:?} -> {:?} has a non-finite end",
                self.from, self.to
            )));
        }
        self.stroke.validate()
    }
}

/// Filled and/or stroked rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub rect: ScreenRect,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

impl RectPrimitive {
    #[must_use]
    pub const fn filled(rect: ScreenRect, fill: Color) -> Self {
        Self {
            rect,
            fill: Some(fill),
            stroke: None,
        }
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        let ScreenRect {
            x,
            y,
            width,
            height,
        } = self.rect;
        if !finite_point((x, y)) || !finite_point((width, height)) {
            return Err(ChartError::InvalidData(
                "rect geometry must be finite".to_owned(),
            ));
        }
        if width < 0.0 || height < 0.0 {
            return Err(ChartError::InvalidData(
                "rect size must be >= 0".to_owned(),
            ));
        }
        self.fill.map_or(Ok(()), Color::validate)?;
        self.stroke.map_or(Ok(()), Stroke::validate)
    }
}

pub const DEFAULT_FONT_FAMILY: &str =
    "-apple-system, system-ui, Roboto, 'Helvetica Neue', Ubuntu, sans-serif";

/// CSS-style font description for labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFont {
    pub family: String,
    pub size_px: f64,
    /// CSS numeric weight, 100..=900.
    pub weight: u16,
}

impl Default for TextFont {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_owned(),
            size_px: 12.0,
            weight: 400,
        }
    }
}

impl TextFont {
    #[must_use]
    pub fn sized(size_px: f64) -> Self {
        Self {
            size_px,
            ..Self::default()
        }
    }

    /// Canvas `font` shorthand, e.g. `400 12px sans-serif`.
    #[must_use]
    pub fn css(&self) -> String {
        format!("{} {}px {}", self.weight, self.size_px, self.family)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !(self.size_px.is_finite() && self.size_px > 0.0) {
            return Err(ChartError::InvalidData(format!(
                "font size {} is not a positive finite number",
                self.size_px
            )));
        }
        if !(100..=900).contains(&self.weight) {
            return Err(ChartError::InvalidData(format!(
                "font weight {} is outside 100..=900",
                self.weight
            )));
        }
        if self.family.trim().is_empty() {
            return Err(ChartError::InvalidData("font family is empty".to_owned()));
        }
        Ok(())
    }
}

/// Horizontal text alignment relative to `TextPrimitive::anchor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// One label drawn at `anchor`, vertically centred on it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub anchor: (f64, f64),
    pub h_align: TextHAlign,
    pub font: TextFont,
    pub fill: Color,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(text: impl Into<String>, anchor: (f64, f64), h_align: TextHAlign) -> Self {
        Self {
            text: text.into(),
            anchor,
            h_align,
            font: TextFont::default(),
            fill: Color::BLACK,
        }
    }

    #[must_use]
    pub fn with_font(mut self, font: TextFont) -> Self {
        self.font = font;
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData("label text is empty".to_owned()));
        }
        if !finite_point(self.anchor) {
            return Err(ChartError::InvalidData(format!(
                "label `{}` has non-finite anchor {:?}",
                self.text, self.anchor
            )));
        }
        self.font.validate()?;
        self.fill.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Close,
}

/// Polyline outline in pixel space, built with `move_to`/`line_to`/`close`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathGeometry {
    commands: Vec<PathCommand>,
}

impl PathGeometry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::MoveTo(x, y));
        self
    }

    #[must_use]
    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::LineTo(x, y));
        self
    }

    #[must_use]
    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let commands = self
            .commands
            .iter()
            .map(|command| match *command {
                PathCommand::MoveTo(x, y) => PathCommand::MoveTo(x + dx, y + dy),
                PathCommand::LineTo(x, y) => PathCommand::LineTo(x + dx, y + dy),
                PathCommand::Close => PathCommand::Close,
            })
            .collect();
        Self { commands }
    }

    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.commands.iter().filter_map(|command| match *command {
            PathCommand::MoveTo(x, y) | PathCommand::LineTo(x, y) => Some((x, y)),
            PathCommand::Close => None,
        })
    }

    /// Smallest rectangle covering every vertex.
    #[must_use]
    pub fn bounds(&self) -> Option<ScreenRect> {
        let mut points = self.points();
        let (first_x, first_y) = points.next()?;
        let (min_x, min_y, max_x, max_y) = points.fold(
            (first_x, first_y, first_x, first_y),
            |(min_x, min_y, max_x, max_y), (x, y)| {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            },
        );
        Some(ScreenRect::from_corners((min_x, min_y), (max_x, max_y)))
    }

    /// SVG path data, e.g. `M10 20 L15 25 Z`.
    #[must_use]
    pub fn to_svg_path_data(&self) -> String {
        self.commands
            .iter()
            .map(|command| match *command {
                PathCommand::MoveTo(x, y) => format!("M{x} {y}"),
                PathCommand::LineTo(x, y) => format!("L{x} {y}"),
                PathCommand::Close => "Z".to_owned(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn validate(&self) -> ChartResult<()> {
        if !matches!(self.commands.first(), Some(PathCommand::MoveTo(..))) {
            return Err(ChartError::InvalidData(
                "path must start with move_to".to_owned(),
            ));
        }
        if self.points().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(ChartError::InvalidData(
                "path coordinates must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Styled path draw command.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPrimitive {
    pub geometry: PathGeometry,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
    pub opacity: f64,
    /// Hover text, rendered as the shape's `<title>` by SVG backends.
    pub title: Option<String>,
}

impl PathPrimitive {
    #[must_use]
    pub fn new(geometry: PathGeometry) -> Self {
        Self {
            geometry,
            fill: None,
            stroke: None,
            opacity: 1.0,
            title: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.geometry.validate()?;
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ChartError::InvalidData(format!(
                "path opacity {} is outside [0, 1]",
                self.opacity
            )));
        }
        self.fill.map_or(Ok(()), Color::validate)?;
        self.stroke.map_or(Ok(()), Stroke::validate)
    }
}
