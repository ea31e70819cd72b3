//! Multi-series line/bar chart rendered with the Iced canvas.
//!
//! A [`ChartSlot`] stands in for a canvas element: it owns at most one live
//! [`ChartInstance`], and rendering new data always destroys the previous
//! instance first.

use iced::mouse;
use iced::widget::canvas::{self, Cache, Canvas, Frame, Geometry, Path, Stroke, Text};
use iced::widget::{container, text};
use iced::{Color, Element, Length, Point, Rectangle, Renderer, Size, Theme};

use trendscope_common::{DatasetEndpoint, TimeSeriesDataset};

use super::formatting::{
    ValueFormat, format_tick, format_tooltip_value, month_tick_label, tooltip_title,
};
use super::theme::{ThemeColors, financial_color, series_color};
use crate::message::Message;

/// Visual chart type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
}

impl ChartKind {
    /// The other kind.
    pub fn toggled(&self) -> Self {
        match self {
            ChartKind::Line => ChartKind::Bar,
            ChartKind::Bar => ChartKind::Line,
        }
    }

    /// Label of the button that switches away from this kind.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            ChartKind::Line => "Switch to Bar Chart",
            ChartKind::Bar => "Switch to Line Chart",
        }
    }
}

/// Options a chart is created with.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub kind: ChartKind,
    pub value_format: ValueFormat,
    pub title: Option<String>,
    pub begin_at_zero: bool,
}

impl ChartOptions {
    /// Line chart with the given value format.
    pub fn line(value_format: ValueFormat) -> Self {
        Self {
            kind: ChartKind::Line,
            value_format,
            title: None,
            begin_at_zero: false,
        }
    }

    /// Options for a per-selection dataset endpoint.
    pub fn for_endpoint(endpoint: DatasetEndpoint) -> Self {
        if endpoint.is_currency() {
            Self::line(ValueFormat::Currency)
        } else {
            Self::line(ValueFormat::Plain)
        }
    }

    /// Options for the financials chart.
    pub fn financials(kind: ChartKind) -> Self {
        Self {
            kind,
            value_format: ValueFormat::Billions,
            title: Some("Financial and Shares Trends".to_string()),
            begin_at_zero: kind == ChartKind::Bar,
        }
    }
}

/// One rendered chart: the data it shows plus its geometry cache.
#[derive(Debug)]
pub struct ChartInstance {
    data: TimeSeriesDataset,
    options: ChartOptions,
    serial: u64,
    value_range: (f64, f64),
    cache: Cache,
}

impl ChartInstance {
    /// Build an instance. Pure function of its inputs apart from the serial.
    pub fn new(data: TimeSeriesDataset, options: ChartOptions, serial: u64) -> Self {
        let value_range = padded_range(data.value_bounds(), options.begin_at_zero);
        Self {
            data,
            options,
            serial,
            value_range,
            cache: Cache::new(),
        }
    }

    pub fn data(&self) -> &TimeSeriesDataset {
        &self.data
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Creation number within the owning slot.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn value_range(&self) -> (f64, f64) {
        self.value_range
    }

    fn color(&self, index: usize) -> Color {
        self.data
            .series()
            .get(index)
            .and_then(|s| financial_color(&s.name))
            .unwrap_or_else(|| series_color(index))
    }
}

/// Holder of the single live chart for one canvas.
#[derive(Debug, Default)]
pub struct ChartSlot {
    current: Option<ChartInstance>,
    created: u64,
}

impl ChartSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroy any current instance, then create one for `data`.
    pub fn render(&mut self, data: TimeSeriesDataset, options: ChartOptions) -> &ChartInstance {
        if let Some(old) = self.current.take() {
            tracing::debug!(serial = old.serial, "Destroying chart instance");
        }
        self.created += 1;
        self.current
            .insert(ChartInstance::new(data, options, self.created))
    }

    /// Destroy the current instance. Returns whether there was one.
    pub fn clear(&mut self) -> bool {
        self.current.take().is_some()
    }

    pub fn instance(&self) -> Option<&ChartInstance> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Number of instances ever created in this slot.
    pub fn created(&self) -> u64 {
        self.created
    }
}

const MARGIN_LEFT: f32 = 80.0;
const MARGIN_RIGHT: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 30.0;
const LEGEND_HEIGHT: f32 = 36.0;
const TITLE_HEIGHT: f32 = 28.0;

/// The rectangle inside the axes where data is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PlotArea {
    /// Plot area for a canvas of `size`, or `None` if it is too small.
    pub fn new(size: Size, has_title: bool) -> Option<Self> {
        let top = LEGEND_HEIGHT + if has_title { TITLE_HEIGHT } else { 0.0 };
        let width = size.width - MARGIN_LEFT - MARGIN_RIGHT;
        let height = size.height - top - MARGIN_BOTTOM;
        (width > 0.0 && height > 0.0).then_some(Self {
            left: MARGIN_LEFT,
            top,
            width,
            height,
        })
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Horizontal center of point `index` out of `count`.
    pub fn x_for(&self, index: usize, count: usize, kind: ChartKind) -> f32 {
        match kind {
            ChartKind::Bar => {
                let slot = self.width / count.max(1) as f32;
                self.left + slot * (index as f32 + 0.5)
            }
            ChartKind::Line if count <= 1 => self.left + self.width / 2.0,
            ChartKind::Line => self.left + self.width * index as f32 / (count - 1) as f32,
        }
    }

    /// Data index nearest to `x`, if `x` is inside the plot.
    pub fn index_at(&self, x: f32, count: usize, kind: ChartKind) -> Option<usize> {
        if count == 0 || x < self.left || x > self.right() {
            return None;
        }
        let offset = x - self.left;
        let index = match kind {
            ChartKind::Bar => (offset / (self.width / count as f32)).floor() as usize,
            ChartKind::Line if count == 1 => 0,
            ChartKind::Line => (offset / self.width * (count - 1) as f32).round() as usize,
        };
        Some(index.min(count - 1))
    }

    /// Vertical position of `value` within `range`.
    pub fn y_for(&self, value: f64, range: (f64, f64)) -> f32 {
        let (lo, hi) = range;
        let t = ((value - lo) / (hi - lo)) as f32;
        self.bottom() - t * self.height
    }
}

/// Value axis range with headroom. Degenerate ranges are widened.
pub fn padded_range(bounds: Option<(f64, f64)>, begin_at_zero: bool) -> (f64, f64) {
    let Some((mut lo, mut hi)) = bounds else {
        return (0.0, 1.0);
    };
    if begin_at_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }

    let range = hi - lo;
    if range < 0.001 {
        return (lo - 0.5, hi + 0.5);
    }

    let pad = range * 0.05;
    let lo = if begin_at_zero && lo >= 0.0 { lo } else { lo - pad };
    (lo, hi + pad)
}

/// Indices that get an x-axis label, at most `max_ticks` of them.
pub fn tick_indices(count: usize, max_ticks: usize) -> Vec<usize> {
    if count == 0 || max_ticks == 0 {
        return Vec::new();
    }
    let step = count.div_ceil(max_ticks).max(1);
    (0..count).step_by(step).collect()
}

/// Hover state kept by the canvas between events.
#[derive(Debug, Default)]
pub struct HoverState {
    index: Option<usize>,
}

/// Canvas program drawing one chart instance.
struct ChartCanvas<'a> {
    instance: &'a ChartInstance,
}

impl<'a> canvas::Program<Message> for ChartCanvas<'a> {
    type State = HoverState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let canvas::Event::Mouse(mouse::Event::CursorMoved { .. } | mouse::Event::CursorLeft) =
            event
        else {
            return None;
        };

        let count = self.instance.data.len();
        let kind = self.instance.options.kind;
        let hovered = cursor.position_in(bounds).and_then(|position| {
            PlotArea::new(bounds.size(), self.instance.options.title.is_some())
                .and_then(|area| area.index_at(position.x, count, kind))
        });

        if hovered != state.index {
            state.index = hovered;
            Some(canvas::Action::request_redraw())
        } else {
            None
        }
    }

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let colors = ThemeColors::new(theme);
        let base = self.instance.cache.draw(renderer, bounds.size(), |frame| {
            self.draw_chart(frame, bounds.size(), &colors);
        });

        let mut layers = vec![base];
        if let Some(index) = state.index {
            let mut overlay = Frame::new(renderer, bounds.size());
            self.draw_tooltip(&mut overlay, bounds.size(), index, &colors);
            layers.push(overlay.into_geometry());
        }
        layers
    }
}

impl<'a> ChartCanvas<'a> {
    fn draw_chart(&self, frame: &mut Frame, size: Size, colors: &ThemeColors<'_>) {
        frame.fill(&Path::rectangle(Point::ORIGIN, size), colors.background());

        let options = &self.instance.options;
        if let Some(title) = &options.title {
            frame.fill_text(Text {
                content: title.clone(),
                position: Point::new(MARGIN_LEFT, 6.0),
                color: colors.text(),
                size: 18.0.into(),
                ..Text::default()
            });
        }

        let Some(area) = PlotArea::new(size, options.title.is_some()) else {
            return;
        };

        self.draw_legend(frame, area, colors);

        if self.instance.data.is_empty() {
            frame.fill_text(Text {
                content: "No data".to_string(),
                position: Point::new(
                    area.left + area.width / 2.0 - 25.0,
                    area.top + area.height / 2.0,
                ),
                color: colors.text_muted(),
                size: 16.0.into(),
                ..Text::default()
            });
            return;
        }

        self.draw_grid(frame, area, colors);

        match options.kind {
            ChartKind::Line => self.draw_lines(frame, area),
            ChartKind::Bar => self.draw_bars(frame, area),
        }
    }

    /// Legend row above the plot, wrapping when it runs out of width.
    fn draw_legend(&self, frame: &mut Frame, area: PlotArea, colors: &ThemeColors<'_>) {
        let mut x = area.left;
        let mut y = area.top - LEGEND_HEIGHT + 6.0;

        for (i, series) in self.instance.data.series().iter().enumerate() {
            let entry_width = series.name.len() as f32 * 7.0 + 30.0;
            if x + entry_width > area.right() && x > area.left {
                x = area.left;
                y += 14.0;
            }

            frame.fill_rectangle(
                Point::new(x, y + 2.0),
                Size::new(10.0, 10.0),
                self.instance.color(i),
            );
            frame.fill_text(Text {
                content: series.name.clone(),
                position: Point::new(x + 14.0, y),
                color: colors.text(),
                size: 12.0.into(),
                ..Text::default()
            });
            x += entry_width;
        }
    }

    /// Horizontal grid with value labels, plus month labels along the x axis.
    fn draw_grid(&self, frame: &mut Frame, area: PlotArea, colors: &ThemeColors<'_>) {
        let (lo, hi) = self.instance.value_range;
        let grid = Stroke::default().with_color(colors.grid()).with_width(1.0);
        let lines = 5;

        for i in 0..=lines {
            let value = lo + (hi - lo) * i as f64 / lines as f64;
            let y = area.y_for(value, (lo, hi));
            frame.stroke(
                &Path::line(Point::new(area.left, y), Point::new(area.right(), y)),
                grid.clone(),
            );
            frame.fill_text(Text {
                content: format_tick(value, self.instance.options.value_format),
                position: Point::new(4.0, y - 7.0),
                color: colors.text_muted(),
                size: 11.0.into(),
                ..Text::default()
            });
        }

        let labels = self.instance.data.labels();
        let max_ticks = (area.width / 60.0).max(1.0) as usize;
        for index in tick_indices(labels.len(), max_ticks) {
            let x = area.x_for(index, labels.len(), self.instance.options.kind);
            frame.fill_text(Text {
                content: month_tick_label(&labels[index]),
                position: Point::new(x - 12.0, area.bottom() + 8.0),
                color: colors.text_muted(),
                size: 11.0.into(),
                ..Text::default()
            });
        }
    }

    fn draw_lines(&self, frame: &mut Frame, area: PlotArea) {
        let count = self.instance.data.len();
        let range = self.instance.value_range;

        for (i, series) in self.instance.data.series().iter().enumerate() {
            let color = self.instance.color(i);
            let mut builder = canvas::path::Builder::new();
            let mut pen_down = false;

            for (index, value) in series.values.iter().enumerate() {
                match value {
                    Some(v) => {
                        let point = Point::new(
                            area.x_for(index, count, ChartKind::Line),
                            area.y_for(*v, range),
                        );
                        if pen_down {
                            builder.line_to(point);
                        } else {
                            builder.move_to(point);
                            pen_down = true;
                        }
                        frame.fill(&Path::circle(point, 2.5), color);
                    }
                    // Missing point: lift the pen so the gap stays visible.
                    None => pen_down = false,
                }
            }

            frame.stroke(
                &builder.build(),
                Stroke::default().with_color(color).with_width(2.5),
            );
        }
    }

    fn draw_bars(&self, frame: &mut Frame, area: PlotArea) {
        let count = self.instance.data.len();
        let series = self.instance.data.series();
        if series.is_empty() {
            return;
        }

        let range = self.instance.value_range;
        let baseline = area.y_for(0.0_f64.clamp(range.0, range.1), range);
        let group = area.width / count as f32 * 0.8;
        let bar = group / series.len() as f32;

        for index in 0..count {
            let center = area.x_for(index, count, ChartKind::Bar);
            for (j, s) in series.iter().enumerate() {
                let Some(value) = s.values[index] else {
                    continue;
                };
                let y = area.y_for(value, range);
                let x = center - group / 2.0 + j as f32 * bar;
                let mut fill = self.instance.color(j);
                fill.a = 0.75;
                frame.fill_rectangle(
                    Point::new(x, y.min(baseline)),
                    Size::new((bar - 1.0).max(1.0), (baseline - y).abs()),
                    fill,
                );
            }
        }
    }

    /// Guide line and value box for the hovered index.
    fn draw_tooltip(&self, frame: &mut Frame, size: Size, index: usize, colors: &ThemeColors<'_>) {
        let data = &self.instance.data;
        let options = &self.instance.options;
        let Some(area) = PlotArea::new(size, options.title.is_some()) else {
            return;
        };
        let Some(label) = data.labels().get(index) else {
            return;
        };

        let x = area.x_for(index, data.len(), options.kind);
        frame.stroke(
            &Path::line(Point::new(x, area.top), Point::new(x, area.bottom())),
            Stroke::default().with_color(colors.text_muted()).with_width(1.0),
        );

        let title = tooltip_title(label);
        let entries: Vec<(usize, String)> = data
            .series()
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                s.values[index].map(|v| {
                    (i, format!("{}: {}", s.name, format_tooltip_value(v, options.value_format)))
                })
            })
            .collect();

        let longest = entries
            .iter()
            .map(|(_, line)| line.len() + 2)
            .chain(std::iter::once(title.len()))
            .max()
            .unwrap_or(0);
        let width = longest as f32 * 6.8 + 16.0;
        let height = (entries.len() + 1) as f32 * 16.0 + 10.0;

        let left = if x + 12.0 + width > size.width {
            x - 12.0 - width
        } else {
            x + 12.0
        };
        let top = area.top + 4.0;

        frame.fill_rectangle(
            Point::new(left, top),
            Size::new(width, height),
            colors.background_weak(),
        );
        frame.stroke(
            &Path::rectangle(Point::new(left, top), Size::new(width, height)),
            Stroke::default().with_color(colors.grid()).with_width(1.0),
        );

        frame.fill_text(Text {
            content: title,
            position: Point::new(left + 8.0, top + 5.0),
            color: colors.text(),
            size: 12.0.into(),
            ..Text::default()
        });

        for (row, (series_index, line)) in entries.into_iter().enumerate() {
            let y = top + 5.0 + (row + 1) as f32 * 16.0;
            frame.fill_rectangle(
                Point::new(left + 8.0, y + 3.0),
                Size::new(8.0, 8.0),
                self.instance.color(series_index),
            );
            frame.fill_text(Text {
                content: line,
                position: Point::new(left + 20.0, y),
                color: colors.text(),
                size: 12.0.into(),
                ..Text::default()
            });
        }
    }
}

/// Canvas element for a chart instance.
pub fn chart_view(instance: &ChartInstance) -> Element<'_, Message> {
    Canvas::new(ChartCanvas { instance })
        .width(Length::Fill)
        .height(Length::Fixed(340.0))
        .into()
}

/// The slot's chart, or a placeholder when it holds none.
pub fn slot_view<'a>(slot: &'a ChartSlot, placeholder: &'a str) -> Element<'a, Message> {
    match slot.instance() {
        Some(instance) => chart_view(instance),
        None => container(text(placeholder).size(14))
            .width(Length::Fill)
            .height(Length::Fixed(340.0))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(340.0))
            .into(),
    }
}
