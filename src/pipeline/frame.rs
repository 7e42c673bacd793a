//! Frame composition: view snapshot + palette → cells.
//!
//! Composition is a pure function. The run loop calls it from the render
//! effect and hands the buffer to the diff renderer.
//!
//! # Screen layout (main view)
//!
//! ```text
//! row 0          nav bar: brand · section labels · theme
//! rows 1..h-1    body: five stacked sections, scrolled
//! row h-1        footer: key help · scroll-to-top hint
//! ```

use crate::error::Result;
use crate::layout::{center_column, spread_row, string_width, wrap_text, LineBox};
use crate::renderer::FrameBuffer;
use crate::state::{PreloaderFrame, Section};
use crate::theme::{Palette, ThemeMode};
use crate::types::{Attr, Rgba};

use super::shell::CHROME_ROWS;

const CARET: &str = "|";
const CALL_TO_ACTION: &str = "[ Enter ] Learn More";
const TAGLINE_MAX_WIDTH: u16 = 60;
const SECTION_HINT: &str = "1-5 jump · Tab next · ↑↓ scroll";
const FOOTER_HELP: &str = " q quit  t theme  1-5 sections  ↑↓ scroll";
const SCROLL_TOP_HINT: &str = "g ↑ top ";

// =============================================================================
// Snapshot
// =============================================================================

/// Everything needed to draw the main view.
#[derive(Debug, Clone, PartialEq)]
pub struct MainSnapshot {
    pub brand: String,
    /// Revealed text before the highlighted name.
    pub prefix: String,
    /// Revealed part of the highlighted name.
    pub name: String,
    /// Full headline, used to keep the hero line from shifting as it types.
    pub headline: String,
    pub caret_visible: bool,
    pub tagline: String,
    pub current: Section,
    pub scroll: u16,
    pub section_height: u16,
    pub scroll_top_visible: bool,
    pub mode: ThemeMode,
}

/// What the screen shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewSnapshot {
    Blank { mode: ThemeMode },
    Preloader {
        title: String,
        frame: PreloaderFrame,
        mode: ThemeMode,
    },
    Main(MainSnapshot),
}

impl ViewSnapshot {
    pub fn mode(&self) -> ThemeMode {
        match self {
            Self::Blank { mode } | Self::Preloader { mode, .. } => *mode,
            Self::Main(main) => main.mode,
        }
    }
}

// =============================================================================
// Compose
// =============================================================================

/// Build the frame for `snapshot`.
pub fn compose(
    snapshot: &ViewSnapshot,
    palette: &Palette,
    width: u16,
    height: u16,
) -> Result<FrameBuffer> {
    let mut buf = FrameBuffer::new(width, height);
    buf.fill(palette.background);

    match snapshot {
        ViewSnapshot::Blank { .. } => {}
        ViewSnapshot::Preloader { title, frame, .. } => {
            compose_preloader(&mut buf, title, frame, palette)?
        }
        ViewSnapshot::Main(main) => compose_main(&mut buf, main, palette)?,
    }
    Ok(buf)
}

fn compose_preloader(
    buf: &mut FrameBuffer,
    title: &str,
    frame: &PreloaderFrame,
    palette: &Palette,
) -> Result<()> {
    if !frame.visible {
        return Ok(());
    }

    let surface = Rgba::lerp(palette.background, palette.surface, frame.surface_opacity);
    buf.fill(surface);

    let placed = center_column(buf.width(), buf.height(), &[LineBox::new(string_width(title), 1)])?;
    let Some(slot) = placed.first() else {
        return Ok(());
    };

    let opacity = frame.text_opacity * frame.surface_opacity;
    let fg = palette.text.with_opacity_over(surface, opacity);
    // Positive offset lifts the title above its resting row.
    let y = slot.y as i32 - frame.text_offset.round() as i32;
    if (0..buf.height() as i32).contains(&y) {
        buf.draw_text(slot.x, y as u16, title, fg, None, Attr::BOLD);
    }
    Ok(())
}

fn compose_main(buf: &mut FrameBuffer, main: &MainSnapshot, palette: &Palette) -> Result<()> {
    let (width, height) = (buf.width(), buf.height());
    if height == 0 || width == 0 {
        return Ok(());
    }

    draw_nav_bar(buf, main, palette)?;

    let body_height = height.saturating_sub(CHROME_ROWS);
    for section in Section::ALL {
        draw_section(buf, main, section, body_height, palette)?;
    }

    if height > 1 {
        draw_footer(buf, main, palette);
    }
    Ok(())
}

fn draw_nav_bar(buf: &mut FrameBuffer, main: &MainSnapshot, palette: &Palette) -> Result<()> {
    buf.fill_row(0, palette.surface);

    let brand = format!(" {}", main.brand);
    let labels_width = Section::ALL
        .iter()
        .map(|s| string_width(s.label()))
        .sum::<u16>()
        + 2 * (Section::ALL.len() as u16 - 1);
    let theme = format!("[{}] ", main.mode);

    let slots = spread_row(
        buf.width(),
        &[string_width(&brand), labels_width, string_width(&theme)],
    )?;

    buf.draw_text(slots[0].x, 0, &brand, palette.accent, None, Attr::BOLD);

    let mut x = slots[1].x;
    for section in Section::ALL {
        let (fg, attrs) = if section == main.current {
            (palette.accent, Attr::BOLD | Attr::UNDERLINE)
        } else {
            (palette.text_muted, Attr::NONE)
        };
        x += buf.draw_text(x, 0, section.label(), fg, None, attrs) + 2;
    }

    buf.draw_text(slots[2].x, 0, &theme, palette.text_muted, None, Attr::NONE);
    Ok(())
}

/// One styled run of a content line.
struct Span<'a> {
    text: &'a str,
    fg: Rgba,
    attrs: Attr,
}

/// A content line: reserved width for centering, plus its spans.
struct Line<'a> {
    width: u16,
    gap_after: u16,
    spans: Vec<Span<'a>>,
}

impl<'a> Line<'a> {
    fn plain(text: &'a str, fg: Rgba, attrs: Attr) -> Self {
        Self {
            width: string_width(text),
            gap_after: 0,
            spans: vec![Span { text, fg, attrs }],
        }
    }

    fn gap(mut self, rows: u16) -> Self {
        self.gap_after = rows;
        self
    }
}

fn hero_lines<'a>(main: &'a MainSnapshot, palette: &Palette, tagline: &'a [String]) -> Vec<Line<'a>> {
    let mut headline = vec![
        Span {
            text: &main.prefix,
            fg: palette.text,
            attrs: Attr::BOLD,
        },
        Span {
            text: &main.name,
            fg: palette.accent,
            attrs: Attr::BOLD,
        },
    ];
    if main.caret_visible {
        headline.push(Span {
            text: CARET,
            fg: palette.accent,
            attrs: Attr::NONE,
        });
    }

    let mut lines = vec![Line {
        width: string_width(&main.headline) + string_width(CARET),
        gap_after: 1,
        spans: headline,
    }];
    let last = tagline.len().saturating_sub(1);
    for (i, row) in tagline.iter().enumerate() {
        let line = Line::plain(row, palette.text_muted, Attr::NONE);
        lines.push(if i == last { line.gap(1) } else { line });
    }
    lines.push(Line::plain(CALL_TO_ACTION, palette.accent, Attr::BOLD));
    lines
}

fn draw_section(
    buf: &mut FrameBuffer,
    main: &MainSnapshot,
    section: Section,
    body_height: u16,
    palette: &Palette,
) -> Result<()> {
    let section_height = main.section_height.max(1);
    let top = section.index() as i32 * section_height as i32 - main.scroll as i32;
    // Entirely off screen.
    if top >= body_height as i32 || top + section_height as i32 <= 0 {
        return Ok(());
    }

    let tagline_width = buf.width().saturating_sub(4).min(TAGLINE_MAX_WIDTH);
    let tagline = wrap_text(&main.tagline, tagline_width);

    let lines = match section {
        Section::Home => hero_lines(main, palette, &tagline),
        _ => vec![
            Line::plain(section.label(), palette.accent, Attr::BOLD).gap(1),
            Line::plain(SECTION_HINT, palette.text_muted, Attr::DIM),
        ],
    };

    let boxes: Vec<_> = lines
        .iter()
        .map(|line| LineBox::new(line.width, 1).with_gap(line.gap_after))
        .collect();
    let placed = center_column(buf.width(), section_height, &boxes)?;

    for (line, slot) in lines.iter().zip(placed) {
        let row = top + slot.y as i32;
        if row < 0 || row >= body_height as i32 {
            continue;
        }
        // Body starts below the nav bar.
        let y = row as u16 + 1;
        let mut x = slot.x;
        for span in &line.spans {
            x += buf.draw_text(x, y, span.text, span.fg, None, span.attrs);
        }
    }
    Ok(())
}

fn draw_footer(buf: &mut FrameBuffer, main: &MainSnapshot, palette: &Palette) {
    let y = buf.height() - 1;
    buf.fill_row(y, palette.surface);
    buf.draw_text(0, y, FOOTER_HELP, palette.text_muted, None, Attr::NONE);

    if main.scroll_top_visible {
        let hint_width = string_width(SCROLL_TOP_HINT);
        let x = buf.width().saturating_sub(hint_width);
        buf.draw_text(x, y, SCROLL_TOP_HINT, palette.accent, None, Attr::BOLD);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PreloaderConfig;
    use crate::theme::{dark, light};

    fn main_snapshot() -> MainSnapshot {
        MainSnapshot {
            brand: "Asad Ali".into(),
            prefix: "Hello, I'm ".into(),
            name: "Asad".into(),
            headline: "Hello, I'm Asad Ali".into(),
            caret_visible: true,
            tagline: "Builds things for the web.".into(),
            current: Section::Home,
            scroll: 0,
            section_height: 22,
            scroll_top_visible: false,
            mode: ThemeMode::Dark,
        }
    }

    fn find_row(buf: &FrameBuffer, needle: &str) -> Option<u16> {
        (0..buf.height()).find(|&y| buf.row_text(y).contains(needle))
    }

    #[test]
    fn test_blank_fills_background() {
        let palette = dark();
        let buf = compose(&ViewSnapshot::Blank { mode: ThemeMode::Dark }, &palette, 4, 2).unwrap();
        assert_eq!(buf.get(3, 1).unwrap().bg, palette.background);
    }

    #[test]
    fn test_preloader_title_centered_and_fading() {
        let config = PreloaderConfig::default();
        let palette = light();
        let mut frame = PreloaderFrame::initial(&config);
        frame.text_offset = 0.0;

        let hidden = compose(
            &ViewSnapshot::Preloader {
                title: "Asad Ali".into(),
                frame,
                mode: ThemeMode::Light,
            },
            &palette,
            20,
            5,
        )
        .unwrap();
        let cell = hidden.get(6, 2).unwrap();
        assert_eq!(cell.char, 'A');
        // Opacity 0: text color equals the surface.
        assert_eq!(cell.fg, cell.bg);

        frame.text_opacity = 1.0;
        let shown = compose(
            &ViewSnapshot::Preloader {
                title: "Asad Ali".into(),
                frame,
                mode: ThemeMode::Light,
            },
            &palette,
            20,
            5,
        )
        .unwrap();
        assert_eq!(shown.get(6, 2).unwrap().fg, palette.text);
    }

    #[test]
    fn test_hidden_preloader_draws_nothing() {
        let config = PreloaderConfig::default();
        let mut frame = PreloaderFrame::initial(&config);
        frame.visible = false;
        let buf = compose(
            &ViewSnapshot::Preloader {
                title: "X".into(),
                frame,
                mode: ThemeMode::Dark,
            },
            &dark(),
            10,
            3,
        )
        .unwrap();
        assert!(find_row(&buf, "X").is_none());
    }

    #[test]
    fn test_main_view_hero() {
        let palette = dark();
        let buf = compose(&ViewSnapshot::Main(main_snapshot()), &palette, 80, 24).unwrap();

        let row = find_row(&buf, "Hello, I'm Asad|").unwrap();
        let text = buf.row_text(row);
        let x = text.find("Asad|").unwrap() as u16;
        assert_eq!(buf.get(x, row).unwrap().fg, palette.accent);
        assert_eq!(buf.get(x - 2, row).unwrap().fg, palette.text);

        assert!(find_row(&buf, "Builds things for the web.").unwrap() > row);
        assert!(find_row(&buf, CALL_TO_ACTION).is_some());
    }

    #[test]
    fn test_caret_hidden_while_paused() {
        let mut snapshot = main_snapshot();
        snapshot.caret_visible = false;
        let buf = compose(&ViewSnapshot::Main(snapshot), &dark(), 80, 24).unwrap();
        assert!(find_row(&buf, "Hello, I'm Asad").is_some());
        assert!(find_row(&buf, "Asad|").is_none());
    }

    #[test]
    fn test_nav_bar_marks_current_section() {
        let palette = dark();
        let mut snapshot = main_snapshot();
        snapshot.current = Section::Skills;
        let buf = compose(&ViewSnapshot::Main(snapshot), &palette, 80, 24).unwrap();

        let bar = buf.row_text(0);
        assert!(bar.starts_with(" Asad Ali"));
        assert!(bar.trim_end().ends_with("[dark]"));
        let x = bar.find("Skills").unwrap() as u16;
        let cell = buf.get(x, 0).unwrap();
        assert_eq!(cell.fg, palette.accent);
        assert!(cell.attrs.contains(Attr::UNDERLINE));
    }

    #[test]
    fn test_scrolled_body_and_footer_hint() {
        let mut snapshot = main_snapshot();
        snapshot.scroll = 22;
        snapshot.current = Section::About;
        snapshot.scroll_top_visible = true;
        let buf = compose(&ViewSnapshot::Main(snapshot), &dark(), 80, 24).unwrap();

        assert!(find_row(&buf, "Hello, I'm").is_none());
        // Row 0 is the nav bar, which always lists "About".
        let heading = (1..23).find(|&y| buf.row_text(y).trim() == "About");
        assert!(heading.is_some());
        assert!(buf.row_text(23).contains("g ↑ top"));
    }

    #[test]
    fn test_tiny_terminal_does_not_fail() {
        let buf = compose(&ViewSnapshot::Main(main_snapshot()), &dark(), 5, 1).unwrap();
        assert_eq!(buf.height(), 1);
    }
}
