//! Day cell styling keyed by [`DayState`].
//!
//! ## Usage
//!
//! Resolve a [`DayStyle`] for each cell with [`CalendarTheme::day_style`], and
//! replace the style function of any single state with
//! [`CalendarTheme::with_style`].

use std::{fmt, sync::Arc};

use daygrid::{CalendarDayMetadata, DayState};

/// A color in linear sRGB with an alpha component, each channel in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Fully transparent.
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from four channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates an opaque color from 8-bit channels.
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgb(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
    }

    /// The same color with alpha replaced.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// Alpha applied to content of disabled days.
pub const DISABLED_CONTENT_ALPHA: f32 = 0.38;
/// Alpha applied to content of filler days from neighbouring months.
pub const OTHER_MONTH_CONTENT_ALPHA: f32 = 0.5;

/// Colors the default style functions draw from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarPalette {
    /// Fill of active days.
    pub primary: Color,
    /// Content drawn on `primary`.
    pub on_primary: Color,
    /// Content of ordinary days.
    pub content: Color,
    /// Border of today's cell.
    pub outline: Color,
}

impl Default for CalendarPalette {
    fn default() -> Self {
        Self {
            primary: Color::from_rgb(0.4039, 0.3137, 0.6431), // #6750A4
            on_primary: Color::WHITE,
            content: Color::from_rgb_u8(0x1D, 0x1B, 0x20),
            outline: Color::from_rgb(0.4039, 0.3137, 0.6431),
        }
    }
}

/// The facts about a day that styling may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayVariant {
    /// Resolved state; selects the style function.
    pub state: DayState,
    /// Start of the covering range.
    pub is_start_of_range: bool,
    /// End of the covering range.
    pub is_end_of_range: bool,
    /// The covering range is complete.
    pub is_range_valid: bool,
    /// Filler day from a neighbouring month.
    pub is_different_month: bool,
    /// Saturday or Sunday.
    pub is_weekend: bool,
    /// The day is today.
    pub is_today: bool,
}

impl From<&CalendarDayMetadata> for DayVariant {
    fn from(day: &CalendarDayMetadata) -> Self {
        Self {
            state: day.state,
            is_start_of_range: day.is_start_of_range,
            is_end_of_range: day.is_end_of_range,
            is_range_valid: day.is_range_valid,
            is_different_month: day.is_different_month,
            is_weekend: day.is_weekend,
            is_today: day.is_today,
        }
    }
}

/// How one day cell is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayStyle {
    /// Cell fill.
    pub background: Option<Color>,
    /// Label color.
    pub content: Color,
    /// Cell border.
    pub border: Option<Color>,
    /// Corner radius on the side facing earlier days.
    pub leading_radius: f32,
    /// Corner radius on the side facing later days.
    pub trailing_radius: f32,
}

/// Produces a style for one state.
pub type DayStyleFn = Arc<dyn Fn(&DayVariant, &CalendarPalette) -> DayStyle + Send + Sync>;

/// Style functions for every [`DayState`].
#[derive(Clone)]
pub struct CalendarTheme {
    palette: CalendarPalette,
    idle: DayStyleFn,
    active: DayStyleFn,
    today: DayStyleFn,
    disabled: DayStyleFn,
}

impl fmt::Debug for CalendarTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarTheme")
            .field("palette", &self.palette)
            .finish_non_exhaustive()
    }
}

impl Default for CalendarTheme {
    fn default() -> Self {
        Self::new(CalendarPalette::default())
    }
}

/// Corner radius of fully rounded day cells.
pub const DAY_CORNER_RADIUS: f32 = 16.0;

impl CalendarTheme {
    /// The default style table over `palette`.
    pub fn new(palette: CalendarPalette) -> Self {
        Self {
            palette,
            idle: Arc::new(idle_style),
            active: Arc::new(active_style),
            today: Arc::new(today_style),
            disabled: Arc::new(disabled_style),
        }
    }

    /// The palette handed to every style function.
    pub fn palette(&self) -> &CalendarPalette {
        &self.palette
    }

    /// Replaces the style function for `state`.
    pub fn with_style<F>(mut self, state: DayState, style: F) -> Self
    where
        F: Fn(&DayVariant, &CalendarPalette) -> DayStyle + Send + Sync + 'static,
    {
        *self.slot_mut(state) = Arc::new(style);
        self
    }

    /// The style for a variant.
    pub fn style_for(&self, variant: &DayVariant) -> DayStyle {
        let style = match variant.state {
            DayState::Idle => &self.idle,
            DayState::Active => &self.active,
            DayState::Today => &self.today,
            DayState::Disabled => &self.disabled,
        };
        style(variant, &self.palette)
    }

    /// The style for a day cell.
    pub fn day_style(&self, day: &CalendarDayMetadata) -> DayStyle {
        self.style_for(&DayVariant::from(day))
    }

    fn slot_mut(&mut self, state: DayState) -> &mut DayStyleFn {
        match state {
            DayState::Idle => &mut self.idle,
            DayState::Active => &mut self.active,
            DayState::Today => &mut self.today,
            DayState::Disabled => &mut self.disabled,
        }
    }
}

fn rounded(background: Option<Color>, content: Color) -> DayStyle {
    DayStyle {
        background,
        content,
        border: None,
        leading_radius: DAY_CORNER_RADIUS,
        trailing_radius: DAY_CORNER_RADIUS,
    }
}

fn idle_style(variant: &DayVariant, palette: &CalendarPalette) -> DayStyle {
    let content = if variant.is_different_month {
        palette.content.with_alpha(OTHER_MONTH_CONTENT_ALPHA)
    } else {
        palette.content
    };
    rounded(None, content)
}

fn active_style(variant: &DayVariant, palette: &CalendarPalette) -> DayStyle {
    // Interior days of a complete range connect to their neighbours.
    let open_ended = !variant.is_range_valid;
    DayStyle {
        leading_radius: if variant.is_start_of_range || open_ended {
            DAY_CORNER_RADIUS
        } else {
            0.0
        },
        trailing_radius: if variant.is_end_of_range || open_ended {
            DAY_CORNER_RADIUS
        } else {
            0.0
        },
        ..rounded(Some(palette.primary), palette.on_primary)
    }
}

fn today_style(_: &DayVariant, palette: &CalendarPalette) -> DayStyle {
    DayStyle {
        border: Some(palette.outline),
        ..rounded(None, palette.primary)
    }
}

fn disabled_style(_: &DayVariant, palette: &CalendarPalette) -> DayStyle {
    rounded(None, palette.content.with_alpha(DISABLED_CONTENT_ALPHA))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(state: DayState) -> DayVariant {
        DayVariant {
            state,
            is_start_of_range: false,
            is_end_of_range: false,
            is_range_valid: false,
            is_different_month: false,
            is_weekend: false,
            is_today: false,
        }
    }

    #[test]
    fn active_range_interior_connects() {
        let theme = CalendarTheme::default();
        let interior = theme.style_for(&DayVariant {
            is_range_valid: true,
            ..variant(DayState::Active)
        });
        assert_eq!(interior.leading_radius, 0.0);
        assert_eq!(interior.trailing_radius, 0.0);
        assert_eq!(interior.background, Some(theme.palette().primary));

        let start = theme.style_for(&DayVariant {
            is_range_valid: true,
            is_start_of_range: true,
            ..variant(DayState::Active)
        });
        assert_eq!(start.leading_radius, DAY_CORNER_RADIUS);
        assert_eq!(start.trailing_radius, 0.0);

        let pending = theme.style_for(&variant(DayState::Active));
        assert_eq!(pending.leading_radius, DAY_CORNER_RADIUS);
        assert_eq!(pending.trailing_radius, DAY_CORNER_RADIUS);
    }

    #[test]
    fn each_state_dispatches_to_its_own_style() {
        let theme = CalendarTheme::default();
        assert!(theme.style_for(&variant(DayState::Today)).border.is_some());
        assert_eq!(
            theme.style_for(&variant(DayState::Disabled)).content.a,
            DISABLED_CONTENT_ALPHA
        );
        let filler = theme.style_for(&DayVariant {
            is_different_month: true,
            ..variant(DayState::Idle)
        });
        assert_eq!(filler.content.a, OTHER_MONTH_CONTENT_ALPHA);
        assert_eq!(theme.style_for(&variant(DayState::Idle)).content.a, 1.0);
    }

    #[test]
    fn overriding_one_state_leaves_the_rest() {
        let theme = CalendarTheme::default().with_style(DayState::Today, |_, palette| DayStyle {
            background: Some(palette.primary),
            content: Color::BLACK,
            border: None,
            leading_radius: 0.0,
            trailing_radius: 0.0,
        });
        let today = theme.style_for(&variant(DayState::Today));
        assert_eq!(today.content, Color::BLACK);
        assert!(today.border.is_none());
        assert!(theme.style_for(&variant(DayState::Disabled)).background.is_none());
    }
}
