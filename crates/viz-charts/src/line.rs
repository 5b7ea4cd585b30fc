//! Line chart over date labels

use crate::{
    AxisTick, BandScale, ChartDimensions, ChartMargin, LinearScale, Scale, TICK_PADDING, TICK_SIZE,
    bottom_axis_domain, colors, estimate_axis_width, left_axis_domain, line_path,
};
use leptos::prelude::*;
use viz_core::{DecimalFormatter, LinePoint, ValueFormatter, VizResult, value_extent};

#[derive(Debug, Clone, PartialEq)]
pub struct LineChartConfig {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub y_ticks: usize,
}

impl Default for LineChartConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 250.0,
            padding: 30.0,
            y_ticks: 10,
        }
    }
}

impl LineChartConfig {
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn dimensions(&self) -> ChartDimensions {
        ChartDimensions::new(self.width, self.height).with_margin(ChartMargin::uniform(self.padding))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub dims: ChartDimensions,
    pub y_axis_width: f64,
    /// Band centre and scaled value of every sample
    pub points: Vec<(f64, f64)>,
    pub path: String,
    pub y_ticks: Vec<AxisTick>,
    pub x_ticks: Vec<AxisTick>,
    pub x_axis_y: f64,
    pub y_axis_path: String,
    pub x_axis_path: String,
}

impl LineLayout {
    pub fn compute(dataset: &[LinePoint], config: &LineChartConfig) -> VizResult<Self> {
        let (min, max) = value_extent(dataset)?;
        let dims = config.dimensions();
        let formatter = DecimalFormatter::default();

        let y_scale = LinearScale::new()
            .domain(if min > 0.0 { 0.0 } else { min }, max)
            .range(config.height - config.padding, config.padding);

        let y_ticks: Vec<AxisTick> = y_scale
            .ticks(config.y_ticks)
            .into_iter()
            .map(|v| AxisTick {
                position: y_scale.scale(v),
                text: formatter.format(v),
            })
            .collect();
        let y_axis_width = estimate_axis_width(&y_ticks);

        let x_scale = BandScale::new(dataset.iter().map(|p| p.date.clone())).range(y_axis_width, config.width);
        let points: Vec<(f64, f64)> = dataset
            .iter()
            .filter_map(|p| {
                let x = x_scale.scale(&p.date)? + x_scale.bandwidth() / 2.0;
                Some((x, y_scale.scale(p.value)))
            })
            .collect();

        let x_ticks = x_scale
            .labels()
            .iter()
            .enumerate()
            .filter_map(|(i, label)| {
                Some(AxisTick {
                    position: x_scale.center(i)?,
                    text: label.clone(),
                })
            })
            .collect();

        let (r0, r1) = y_scale.range_bounds();
        Ok(Self {
            dims,
            y_axis_width,
            path: line_path(&points),
            points,
            y_ticks,
            x_ticks,
            x_axis_y: config.height - config.padding,
            y_axis_path: left_axis_domain(0.0, r0, r1, TICK_SIZE),
            x_axis_path: bottom_axis_domain(0.0, y_axis_width, config.width, TICK_SIZE),
        })
    }
}

#[component]
pub fn LineChart(layout: LineLayout) -> impl IntoView {
    let dims = layout.dims;

    let y_ticks = layout
        .y_ticks
        .into_iter()
        .map(|tick| {
            view! {
                <g class="tick" transform=format!("translate(0, {})", tick.position)>
                    <line x2={-TICK_SIZE} stroke=colors::AXIS />
                    <text x={-(TICK_SIZE + TICK_PADDING)} dy="0.32em" text-anchor="end" font-size="10" fill=colors::TEXT_MUTED>
                        {tick.text}
                    </text>
                </g>
            }
        })
        .collect_view();

    let x_ticks = layout
        .x_ticks
        .into_iter()
        .map(|tick| {
            view! {
                <g class="tick" transform=format!("translate({}, 0)", tick.position)>
                    <line y2=TICK_SIZE stroke=colors::AXIS />
                    <text y={TICK_SIZE + TICK_PADDING} dy="0.71em" text-anchor="middle" font-size="10" fill=colors::TEXT_MUTED>
                        {tick.text}
                    </text>
                </g>
            }
        })
        .collect_view();

    view! {
        <div class="viz-line-chart">
            <svg width=dims.width height=dims.height viewBox=dims.viewbox()>
                <g class="y-axis" transform=format!("translate({}, 0)", layout.y_axis_width)>
                    <path class="domain" d=layout.y_axis_path fill="none" stroke=colors::AXIS />
                    {y_ticks}
                </g>
                <g class="x-axis" transform=format!("translate(0, {})", layout.x_axis_y)>
                    <path class="domain" d=layout.x_axis_path fill="none" stroke=colors::AXIS />
                    {x_ticks}
                </g>
                <path class="line" d=layout.path fill="none" stroke=colors::LINE stroke-width="2" />
            </svg>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_core::samples;

    #[test]
    fn test_flat_series_domain_starts_at_zero() {
        let layout = LineLayout::compute(&samples::line(), &LineChartConfig::default()).unwrap();

        // Domain [0, 70] -> [220, 30]; every sample sits on the top edge
        assert_eq!(layout.points.len(), 6);
        assert!(layout.points.iter().all(|&(_, y)| y == 30.0));
        assert_eq!(layout.x_axis_y, 220.0);
        assert!(layout.path.starts_with('M'));
        assert_eq!(layout.path.matches('L').count(), 5);
    }

    #[test]
    fn test_points_at_band_centres() {
        let data = vec![LinePoint::new("a", -10.0), LinePoint::new("b", 10.0)];
        let layout = LineLayout::compute(&data, &LineChartConfig::default()).unwrap();
        let band = (500.0 - layout.y_axis_width) / 2.0;

        assert_eq!(layout.points[0].0, layout.y_axis_width + band / 2.0);
        assert_eq!(layout.points[0].1, 220.0);
        assert_eq!(layout.points[1].1, 30.0);
    }

    #[test]
    fn test_empty_series() {
        assert!(LineLayout::compute(&[], &LineChartConfig::default()).is_err());
    }
}
