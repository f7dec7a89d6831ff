//! Draws [`ChartData`] with plotters.
//!
//! The figure is a 3x2 grid: distribution (full width), time series (full
//! width), then the bar chart and the text summary side by side.

use crate::chart::error::{ChartError, RenderResultExt};
use crate::chart::panels::{ChartData, GroupPanel};
use crate::types::day_type::DayType;
use chrono::{Duration, NaiveDate};
use log::info;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

/// Figure size in pixels at scale 1.
pub const BASE_SIZE: (u32, u32) = (1400, 1000);

const VIOLIN_FILL: RGBColor = RGBColor(0x8d, 0xd3, 0xc7);
const WEEKEND_FILL: RGBColor = RGBColor(0xfb, 0x80, 0x72);
const WEEKDAY_LINE: RGBColor = RGBColor(0x11, 0x78, 0x64);
const WEEKEND_LINE: RGBColor = RGBColor(0xcb, 0x43, 0x35);
const SUMMARY_BOX: RGBColor = RGBColor(245, 222, 179);

fn fill_color(label: DayType) -> RGBColor {
    match label {
        DayType::Weekday => VIOLIN_FILL,
        DayType::Weekend => WEEKEND_FILL,
    }
}

fn line_color(label: DayType) -> RGBColor {
    match label {
        DayType::Weekday => WEEKDAY_LINE,
        DayType::Weekend => WEEKEND_LINE,
    }
}

fn font(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
}

fn bold(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Bold)
}

fn anchored(font: FontDesc<'static>, v: VPos) -> TextStyle<'static> {
    TextStyle::from(font).pos(Pos::new(HPos::Center, v))
}

fn category_label(x: f64) -> String {
    DayType::ALL
        .iter()
        .enumerate()
        .find(|(i, _)| (x - *i as f64).abs() < 1e-6)
        .map(|(_, label)| label.to_string())
        .unwrap_or_default()
}

/// Renders the figure to `path`. Files ending in `.svg` use the SVG backend,
/// anything else is written as a bitmap (PNG for `.png`).
pub fn render_chart(data: &ChartData, path: &Path, scale: u32) -> Result<(), ChartError> {
    let scale = scale.max(1);
    let size = (BASE_SIZE.0 * scale, BASE_SIZE.1 * scale);
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| ChartError::DirCreation(dir.to_path_buf(), e))?;
    }

    let is_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw_figure(&root, data, scale as f64)?;
        root.present().or_render_err()?;
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw_figure(&root, data, scale as f64)?;
        root.present().or_render_err()?;
    }
    info!("Chart written to {:?} ({}x{})", path, size.0, size.1);
    Ok(())
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    data: &ChartData,
    s: f64,
) -> Result<(), ChartError> {
    root.fill(&WHITE).or_render_err()?;
    let (width, _) = root.dim_in_pixel();

    let (header, body) = root.split_vertically((70.0 * s) as u32);
    header
        .draw(&Text::new(
            data.title(),
            ((width / 2) as i32, (24.0 * s) as i32),
            anchored(bold(24.0 * s), VPos::Center),
        ))
        .or_render_err()?;
    header
        .draw(&Text::new(
            data.year_span(),
            ((width / 2) as i32, (52.0 * s) as i32),
            anchored(bold(20.0 * s), VPos::Center),
        ))
        .or_render_err()?;

    let (_, body_height) = body.dim_in_pixel();
    let (distribution, rest) = body.split_vertically(body_height / 3);
    let (series, bottom) = rest.split_vertically(body_height / 3);
    let (bars, summary) = bottom.split_horizontally(width / 2);

    draw_distribution(&distribution, data, s)?;
    draw_time_series(&series, data, s)?;
    draw_bars(&bars, data, s)?;
    draw_summary(&summary, data, s)?;
    Ok(())
}

/// Panel A: violins with box plots on top.
fn draw_distribution<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &ChartData,
    s: f64,
) -> Result<(), ChartError> {
    let mut chart = ChartBuilder::on(area)
        .caption(
            "A. Distribution of Cloud Cover: Weekdays vs Weekends",
            bold(15.0 * s),
        )
        .margin((10.0 * s) as u32)
        .x_label_area_size((28.0 * s) as u32)
        .y_label_area_size((60.0 * s) as u32)
        .build_cartesian_2d(-0.5f64..1.5f64, 0f64..105f64)
        .or_render_err()?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(5)
        .x_label_formatter(&|x| category_label(*x))
        .y_desc("Cloud Cover (%)")
        .label_style(font(11.0 * s))
        .axis_desc_style(bold(12.0 * s))
        .light_line_style(BLACK.mix(0.05))
        .draw()
        .or_render_err()?;

    for group in &data.groups {
        draw_violin(&mut chart, group, s)?;
        draw_box(&mut chart, group, s)?;
        chart
            .draw_series(std::iter::once(Text::new(
                format!("n = {}", group.summary.n),
                (group.position, 102.0),
                anchored(bold(11.0 * s), VPos::Center),
            )))
            .or_render_err()?;
    }
    Ok(())
}

type CategoryChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn draw_violin<DB: DrawingBackend>(
    chart: &mut CategoryChart<'_, DB>,
    group: &GroupPanel,
    s: f64,
) -> Result<(), ChartError> {
    if group.violin.is_empty() {
        return Ok(());
    }
    let x = group.position;
    let mut outline: Vec<(f64, f64)> = group.violin.iter().map(|(y, w)| (x - w, *y)).collect();
    outline.extend(group.violin.iter().rev().map(|(y, w)| (x + w, *y)));

    chart
        .draw_series(std::iter::once(Polygon::new(
            outline.clone(),
            VIOLIN_FILL.mix(0.7).filled(),
        )))
        .or_render_err()?;
    if let Some(first) = outline.first().copied() {
        outline.push(first);
    }
    chart
        .draw_series(std::iter::once(PathElement::new(
            outline,
            BLACK.stroke_width(s as u32),
        )))
        .or_render_err()?;

    // violin mean marker
    let half = crate::chart::panels::VIOLIN_HALF_WIDTH / 2.0;
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(x - half, group.mean), (x + half, group.mean)],
            BLUE.stroke_width((2.0 * s) as u32),
        )))
        .or_render_err()?;
    Ok(())
}

fn draw_box<DB: DrawingBackend>(
    chart: &mut CategoryChart<'_, DB>,
    group: &GroupPanel,
    s: f64,
) -> Result<(), ChartError> {
    let x = group.position;
    let half = 0.15;
    let cap = 0.075;
    let b = group.box_stats;
    let stroke = BLACK.stroke_width((1.5 * s).round() as u32);

    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(x - half, b.q1), (x + half, b.q3)],
            WHITE.filled(),
        )))
        .or_render_err()?;
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(x - half, b.q1), (x + half, b.q3)],
            stroke,
        )))
        .or_render_err()?;

    let whiskers = vec![
        vec![(x, b.q3), (x, b.whisker_high)],
        vec![(x, b.q1), (x, b.whisker_low)],
        vec![(x - cap, b.whisker_high), (x + cap, b.whisker_high)],
        vec![(x - cap, b.whisker_low), (x + cap, b.whisker_low)],
    ];
    chart
        .draw_series(
            whiskers
                .into_iter()
                .map(|points| PathElement::new(points, stroke)),
        )
        .or_render_err()?;

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(x - half, b.median), (x + half, b.median)],
            RED.stroke_width((2.0 * s) as u32),
        )))
        .or_render_err()?;
    Ok(())
}

/// Panel B: daily scatter plus the 30-day rolling mean per label.
fn draw_time_series<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &ChartData,
    s: f64,
) -> Result<(), ChartError> {
    let x_range: std::ops::Range<NaiveDate> =
        data.first_date..data.last_date + Duration::days(1);
    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("B. Cloud Cover Time Series ({})", data.year_span()),
            bold(15.0 * s),
        )
        .margin((10.0 * s) as u32)
        .x_label_area_size((40.0 * s) as u32)
        .y_label_area_size((60.0 * s) as u32)
        .build_cartesian_2d(x_range, 0f64..105f64)
        .or_render_err()?;

    chart
        .configure_mesh()
        .x_labels(12)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y").to_string())
        .x_desc("Date")
        .y_desc("Cloud Cover (%)")
        .label_style(font(11.0 * s))
        .axis_desc_style(bold(12.0 * s))
        .light_line_style(BLACK.mix(0.05))
        .draw()
        .or_render_err()?;

    let dot = ((1.5 * s).round() as u32).max(1);
    for group in &data.groups {
        let color = fill_color(group.label);
        chart
            .draw_series(
                group
                    .series
                    .iter()
                    .map(|&(date, value)| Circle::new((date, value), dot, color.mix(0.15).filled())),
            )
            .or_render_err()?
            .label(group.label.as_str())
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    for group in &data.groups {
        let color = line_color(group.label);
        let style = color.mix(0.8).stroke_width((2.0 * s) as u32);
        for (i, run) in group.rolling.iter().enumerate() {
            let series = chart
                .draw_series(LineSeries::new(run.iter().copied(), style))
                .or_render_err()?;
            if i == 0 {
                series
                    .label(format!("{} (30-day avg)", group.label))
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
            }
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font(font(10.0 * s))
        .background_style(WHITE.mix(0.9))
        .border_style(BLACK)
        .draw()
        .or_render_err()?;
    Ok(())
}

/// Panel C: group means with 95% CI error bars.
fn draw_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &ChartData,
    s: f64,
) -> Result<(), ChartError> {
    let y_max = data.bar_y_max();
    let mut chart = ChartBuilder::on(area)
        .caption("C. Mean Cloud Cover Comparison", bold(15.0 * s))
        .margin((10.0 * s) as u32)
        .x_label_area_size((28.0 * s) as u32)
        .y_label_area_size((60.0 * s) as u32)
        .build_cartesian_2d(-0.5f64..1.5f64, 0f64..y_max)
        .or_render_err()?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(5)
        .x_label_formatter(&|x| category_label(*x))
        .y_desc("Mean Cloud Cover (%) ± 95% CI")
        .label_style(font(11.0 * s))
        .axis_desc_style(bold(12.0 * s))
        .light_line_style(BLACK.mix(0.05))
        .draw()
        .or_render_err()?;

    let line_step = y_max * 0.06;
    for group in &data.groups {
        let x = group.position;
        let mean = group.summary.mean;
        let moe = group.summary.margin_of_error;

        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x - 0.3, 0.0), (x + 0.3, mean)],
                fill_color(group.label).filled(),
            )))
            .or_render_err()?;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x - 0.3, 0.0), (x + 0.3, mean)],
                BLACK.stroke_width((1.5 * s).round() as u32),
            )))
            .or_render_err()?;
        chart
            .draw_series(std::iter::once(ErrorBar::new_vertical(
                x,
                mean - moe,
                mean,
                mean + moe,
                BLACK.stroke_width((2.0 * s) as u32),
                (16.0 * s) as u32,
            )))
            .or_render_err()?;

        let label_base = group.bar_top() + 2.0;
        chart
            .draw_series([
                Text::new(
                    format!("±{:.2}", moe),
                    (x, label_base),
                    anchored(bold(11.0 * s), VPos::Bottom),
                ),
                Text::new(
                    format!("{:.2}%", mean),
                    (x, label_base + line_step),
                    anchored(bold(11.0 * s), VPos::Bottom),
                ),
            ])
            .or_render_err()?;
    }
    Ok(())
}

/// Panel D: monospace summary block on a light background.
fn draw_summary<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &ChartData,
    s: f64,
) -> Result<(), ChartError> {
    let (width, height) = area.dim_in_pixel();
    let pad = (12.0 * s) as i32;
    area.draw(&Rectangle::new(
        [(pad, pad), (width as i32 - pad, height as i32 - pad)],
        SUMMARY_BOX.mix(0.3).filled(),
    ))
    .or_render_err()?;

    let lines = data.summary_lines();
    // shrink the font if the block would not fit vertically
    let available = (height as f64 - 4.0 * pad as f64).max(1.0);
    let line_height = (available / lines.len() as f64).min(14.0 * s);
    let size = line_height * 0.85;
    let style = FontDesc::new(FontFamily::Monospace, size, FontStyle::Normal);

    for (i, line) in lines.into_iter().enumerate() {
        let y = 2 * pad + (i as f64 * line_height) as i32;
        area.draw(&Text::new(line, (2 * pad, y), style.clone()))
            .or_render_err()?;
    }
    Ok(())
}
