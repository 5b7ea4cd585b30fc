//! Histogram (bar chart over labelled volumes).
//!
//! Bars grow from the zero baseline. When any volume is negative the
//! baseline moves up into the plot and a zero line is drawn across it.

use crate::{
    AxisTick, BandScale, Easing, LinearScale, Scale, TICK_PADDING, TICK_SIZE, Tooltip,
    TooltipState, Transition, bottom_axis_domain, colors, estimate_axis_width, left_axis_domain,
    pointer_event, start_entry_clock,
};
use leptos::prelude::*;
use viz_core::{
    DecimalFormatter, HistogramDatum, HistogramOptions, HistogramSettings, PointerKind,
    ValueFormatter, VizResult, volume_extent,
};
use viz_force::SimHandle;

/// Band padding of the x scale
pub const BAND_PADDING: f64 = 0.2;

/// Ticks requested from the y scale when none are configured
pub const DEFAULT_Y_TICKS: usize = 10;

/// Height shaved off the most negative bar so it clears the axis stroke
pub const MIN_BAR_INSET: f64 = 3.0;

/// Entry animation: 700ms per bar, 100ms stagger
pub fn bar_transition() -> Transition {
    Transition::new(700.0).stagger(100.0).easing(Easing::ExpInOut)
}

// ============================================================================
// LAYOUT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBar {
    pub index: usize,
    pub label: String,
    pub volume: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl HistogramBar {
    pub fn is_negative(&self) -> bool {
        self.volume < 0.0
    }

    /// `down` for negative volumes, `up` otherwise
    pub fn direction_class(&self) -> &'static str {
        if self.is_negative() { "down" } else { "up" }
    }

    pub fn class(&self) -> String {
        format!("{} bar-chart-data", self.direction_class())
    }

    /// `(y, height)` at eased progress `t`. Positive bars grow upward from
    /// the baseline, negative bars downward.
    pub fn animated(&self, t: f64) -> (f64, f64) {
        let t = t.clamp(0.0, 1.0);
        let height = self.height * t;
        if self.is_negative() {
            (self.y, height)
        } else {
            (self.y + self.height - height, height)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeroLine {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
}

/// Every computed position of a histogram
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramLayout {
    pub settings: HistogramSettings,
    pub y_axis_width: f64,
    pub bar_width: f64,
    pub bars: Vec<HistogramBar>,
    pub zero_line: Option<ZeroLine>,
    pub y_ticks: Vec<AxisTick>,
    pub x_ticks: Vec<AxisTick>,
    /// Pixel y of the x axis
    pub x_axis_y: f64,
    pub y_axis_path: String,
    pub x_axis_path: String,
    /// Title text and its anchor point (centre of the plot area)
    pub title: Option<(String, f64, f64)>,
    /// y-axis label text and its transform
    pub y_label: Option<(String, String)>,
    /// Transform applied to each x tick label
    pub x_label_transform: Option<String>,
}

impl HistogramLayout {
    pub fn compute(dataset: &[HistogramDatum], options: &HistogramOptions) -> VizResult<Self> {
        let settings = options.resolve()?;
        Self::with_settings(dataset, settings)
    }

    pub fn with_settings(dataset: &[HistogramDatum], settings: HistogramSettings) -> VizResult<Self> {
        let (min, max) = volume_extent(dataset)?;
        let formatter = DecimalFormatter::default();

        let graph_bottom = settings.height - settings.padding_bottom();
        let y_scale = LinearScale::new()
            .domain(min.min(0.0), max.max(0.0))
            .range(graph_bottom, settings.padding_top());

        let y_ticks: Vec<AxisTick> = y_scale
            .ticks(settings.y_ticks.unwrap_or(DEFAULT_Y_TICKS))
            .into_iter()
            .map(|v| AxisTick {
                position: y_scale.scale(v),
                text: formatter.format(v),
            })
            .collect();

        let y_axis_width = if settings.padding_left() != 0.0 {
            settings.padding_left()
        } else {
            estimate_axis_width(&y_ticks)
        };

        let plot_right = settings.width - settings.padding_right();
        let x_scale = BandScale::new(dataset.iter().map(|d| d.label.clone()))
            .range(y_axis_width, plot_right)
            .padding(BAND_PADDING)
            .round(true);

        let bandwidth = x_scale.bandwidth();
        let clamped = bandwidth > settings.max_bar_width;
        let bar_width = bandwidth.min(settings.max_bar_width);
        let zero = y_scale.scale(0.0);

        let bars = dataset
            .iter()
            .enumerate()
            .map(|(index, datum)| {
                let band = x_scale.scale(&datum.label).unwrap_or(y_axis_width);
                let x = if clamped {
                    band + bandwidth / 2.0 - bar_width / 2.0
                } else {
                    band
                };
                let scaled = y_scale.scale(datum.volume);
                let y = if datum.volume > 0.0 { scaled } else { zero + 1.0 };
                let mut height = (scaled - zero).abs();
                if datum.volume < 0.0 && datum.volume == min {
                    height = (height - MIN_BAR_INSET).max(0.0);
                }
                HistogramBar {
                    index,
                    label: datum.label.clone(),
                    volume: datum.volume,
                    x,
                    y,
                    width: bar_width,
                    height,
                }
            })
            .collect();

        let zero_line = (min < 0.0).then_some(ZeroLine {
            x1: y_axis_width,
            x2: plot_right,
            y: zero,
        });

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

        let title = settings.title.clone().map(|text| {
            let x = y_axis_width + (settings.width - y_axis_width - settings.padding_right()) / 2.0;
            (text, x, settings.padding_top() / 2.0)
        });
        let y_label = settings.y_axis_label.clone().map(|text| {
            let transform = format!(
                "translate({}, {})rotate(90)",
                y_axis_width + 4.0,
                settings.padding_top()
            );
            (text, transform)
        });
        let rotate = settings.label_rotate;
        let x_label_transform = (rotate.rotate != 0.0).then(|| {
            format!("translate({}, {})rotate({})", rotate.x, rotate.y, rotate.rotate)
        });

        let y_range = y_scale.range_bounds();
        Ok(Self {
            y_axis_path: left_axis_domain(0.0, y_range.0, y_range.1, TICK_SIZE),
            x_axis_path: bottom_axis_domain(0.0, y_axis_width, plot_right, TICK_SIZE),
            x_axis_y: graph_bottom,
            settings,
            y_axis_width,
            bar_width,
            bars,
            zero_line,
            y_ticks,
            x_ticks,
            title,
            y_label,
            x_label_transform,
        })
    }

    pub fn svg_class(&self) -> String {
        match &self.settings.class_name {
            Some(class) => format!("histogram-area {}", class),
            None => "histogram-area".to_string(),
        }
    }

    pub fn tooltip_text(&self, index: usize) -> Option<String> {
        let bar = self.bars.get(index)?;
        Some(format!("{} {}", bar.label, DecimalFormatter::default().format(bar.volume)))
    }
}

// ============================================================================
// COMPONENT
// ============================================================================

#[component]
pub fn Histogram(layout: HistogramLayout) -> impl IntoView {
    let settings = layout.settings.clone();
    let transition = bar_transition();
    let elapsed = RwSignal::new(0.0);
    let hovered = RwSignal::new(None::<usize>);
    let tooltip = RwSignal::new(TooltipState::default());
    let show_tooltip = settings.show_tooltip;

    let handle = SimHandle::new();
    start_entry_clock(elapsed, transition.total_ms(layout.bars.len()), handle.clone());
    on_cleanup(move || handle.stop());

    let tooltips = StoredValue::new(
        (0..layout.bars.len())
            .map(|i| layout.tooltip_text(i))
            .collect::<Vec<_>>(),
    );

    let bars = layout
        .bars
        .iter()
        .cloned()
        .map(|bar| {
            let i = bar.index;
            let class = bar.class();
            let fill = if bar.is_negative() { colors::BAR_DOWN } else { colors::BAR_UP };
            let frame = {
                let bar = bar.clone();
                move || bar.animated(transition.progress(i, elapsed.get()))
            };
            let frame_h = frame.clone();
            view! {
                <rect
                    data-index=i
                    class=class
                    class:hover=move || hovered.get() == Some(i)
                    x=bar.x
                    y=move || frame().0
                    width=bar.width
                    height=move || frame_h().1
                    fill=fill
                    on:pointermove=move |ev: web_sys::PointerEvent| {
                        if !show_tooltip {
                            return;
                        }
                        hovered.set(Some(i));
                        let event = pointer_event(&ev, PointerKind::Move).on(i);
                        let text = tooltips.with_value(|t| t.get(i).cloned().flatten());
                        tooltip.update(|t| t.handle(&event, |_| text));
                    }
                    on:pointerleave=move |ev: web_sys::PointerEvent| {
                        if !show_tooltip {
                            return;
                        }
                        hovered.set(None);
                        let event = pointer_event(&ev, PointerKind::Leave);
                        tooltip.update(|t| t.handle(&event, |_| None));
                    }
                />
            }
        })
        .collect_view();

    let y_axis_width = layout.y_axis_width;
    let y_ticks = layout
        .y_ticks
        .iter()
        .cloned()
        .map(|tick| {
            view! {
                <g class="tick" transform=format!("translate(0, {})", tick.position)>
                    <line x2={-TICK_SIZE} stroke=colors::AXIS />
                    <text
                        x={-(TICK_SIZE + TICK_PADDING)}
                        dy="0.32em"
                        text-anchor="end"
                        fill=colors::TEXT_MUTED
                        font-size="10"
                    >
                        {tick.text}
                    </text>
                </g>
            }
        })
        .collect_view();

    let label_transform = layout.x_label_transform.clone();
    let x_ticks = layout
        .x_ticks
        .iter()
        .cloned()
        .map(|tick| {
            view! {
                <g class="tick" transform=format!("translate({}, 0)", tick.position)>
                    <line y2=TICK_SIZE stroke=colors::AXIS />
                    <text
                        y={TICK_SIZE + TICK_PADDING}
                        dy="0.71em"
                        text-anchor="middle"
                        fill=colors::TEXT_MUTED
                        font-size="10"
                        transform=label_transform.clone()
                    >
                        {tick.text}
                    </text>
                </g>
            }
        })
        .collect_view();

    let zero_line = layout.zero_line.map(|z| {
        view! {
            <line class="zero-line" x1=z.x1 x2=z.x2 y1=z.y y2=z.y stroke=colors::ZERO_LINE />
        }
    });

    let title = layout.title.clone().map(|(text, x, y)| {
        view! {
            <text class="title" x=x y=y text-anchor="middle" fill=colors::TEXT_PRIMARY>
                {text}
            </text>
        }
    });

    let y_label = layout.y_label.clone().map(|(text, transform)| {
        view! {
            <text class="y_axsis_label" transform=transform fill=colors::TEXT_MUTED font-size="10">
                {text}
            </text>
        }
    });

    let tooltip_view = show_tooltip.then(|| view! { <Tooltip state=tooltip /> });

    view! {
        <div class="viz-histogram">
            <svg
                class=layout.svg_class()
                width=settings.width
                height=settings.height
                viewBox=format!("0 0 {} {}", settings.width, settings.height)
            >
                <g class="y-axis" transform=format!("translate({}, 0)", y_axis_width)>
                    <path class="domain" d=layout.y_axis_path.clone() fill="none" stroke=colors::AXIS />
                    {y_ticks}
                </g>
                <g class="x-axis" transform=format!("translate(0, {})", layout.x_axis_y)>
                    <path class="domain" d=layout.x_axis_path.clone() fill="none" stroke=colors::AXIS />
                    {x_ticks}
                </g>
                <g class="bars">{bars}</g>
                {zero_line}
                {title}
                {y_label}
            </svg>
            {tooltip_view}
        </div>
    }
}
