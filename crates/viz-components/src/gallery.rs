//! Gallery page: one panel per chart kind, each with its own mount point

use leptos::prelude::*;
use viz_charts::{BubbleConfig, GraphConfig, LineChartConfig, WordCloudConfig};
use viz_core::{ChartKind, HistogramOptions, VizResult, samples};
use viz_state::use_gallery_state;

use crate::{
    unmount, use_bubble_chart, use_force_directed_graph, use_histogram, use_line_chart,
    use_word_cloud,
};

/// Histogram options in the object shape the chart accepts from JSON
const HISTOGRAM_OPTIONS: &str = r#"{
    "title": "Monthly balance",
    "y_axsis_label": "Volume",
    "padding": [40, 30, 40],
    "max_bar_width": 60
}"#;

type DrawFn = Box<dyn Fn() -> VizResult<()>>;

/// Selector of the mount point for a chart kind
pub fn mount_selector(kind: ChartKind) -> String {
    format!("#{}", kind.css_class())
}

fn draw_fn(kind: ChartKind) -> VizResult<DrawFn> {
    let selector = mount_selector(kind);
    Ok(match kind {
        ChartKind::Bubble => Box::new(use_bubble_chart(selector, samples::bubbles(), BubbleConfig::default())),
        ChartKind::ForceGraph => Box::new(use_force_directed_graph(
            selector,
            samples::citation_graph(),
            GraphConfig::default(),
        )),
        ChartKind::Histogram => Box::new(use_histogram(
            selector,
            samples::histogram(),
            HistogramOptions::from_json(HISTOGRAM_OPTIONS)?,
        )),
        ChartKind::Line => Box::new(use_line_chart(selector, samples::line(), LineChartConfig::default())),
        ChartKind::WordCloud => Box::new(use_word_cloud(selector, samples::words(), WordCloudConfig::default())),
    })
}

#[component]
pub fn Gallery() -> impl IntoView {
    let state = use_gallery_state();

    let nav = ChartKind::all()
        .iter()
        .map(|&kind| {
            view! {
                <button
                    class="gallery-tab"
                    class:active=move || state.selected.get() == kind
                    on:click=move |_| state.select(kind)
                >
                    {kind.label()}
                </button>
            }
        })
        .collect_view();

    let panels = ChartKind::all()
        .iter()
        .map(|&kind| view! { <ChartPanel kind=kind /> })
        .collect_view();

    view! {
        <div class="gallery">
            <header class="gallery-header">
                <span class="gallery-title">"Force-laid-out charts"</span>
                <nav class="gallery-nav">{nav}</nav>
            </header>

            <main class="gallery-main">{panels}</main>

            <footer class="gallery-footer">
                <StatusBar />
            </footer>
        </div>
    }
}

#[component]
fn ChartPanel(kind: ChartKind) -> impl IntoView {
    let state = use_gallery_state();
    let draw = StoredValue::new_local(draw_fn(kind));
    let selector = mount_selector(kind);
    let clear_selector = selector.clone();

    let on_draw = move |_| {
        state.select(kind);
        let result = draw.with_value(|draw| match draw {
            Ok(draw) => draw(),
            Err(err) => Err(err.clone()),
        });
        state.record(result);
    };

    let on_clear = move |_| {
        if unmount(&clear_selector) {
            tracing::debug!("Cleared {}", clear_selector);
        }
    };

    view! {
        <section
            class="panel"
            class:selected=move || state.selected.get() == kind
        >
            <div class="panel-header">
                <span class="panel-title">{kind.label()}</span>
                <button class="panel-action" on:click=on_draw>"Draw"</button>
                <button class="panel-action" on:click=on_clear>"Clear"</button>
            </div>
            <div class="panel-content" id=selector.trim_start_matches('#').to_string()></div>
        </section>
    }
}

#[component]
fn StatusBar() -> impl IntoView {
    let state = use_gallery_state();
    let error = state.error;
    let draws = state.draws;

    view! {
        <div class="status-bar">
            <div class="sb-draws">
                <span class="sb-label">"Charts drawn:"</span>
                <span class="sb-value">{move || draws.get()}</span>
            </div>

            {move || {
                error.get().map(|e| {
                    view! {
                        <div class="sb-error">
                            <span class="error-icon">"⚠"</span>
                            <span class="error-msg">{e}</span>
                        </div>
                    }
                })
            }}

            <div class="sb-version">
                <span>"v0.1.0"</span>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_options_parse() {
        let settings = HistogramOptions::from_json(HISTOGRAM_OPTIONS).unwrap().resolve().unwrap();
        assert_eq!(settings.padding, [40.0, 30.0, 40.0, 0.0]);
        assert_eq!(settings.max_bar_width, 60.0);
        assert_eq!(settings.title.as_deref(), Some("Monthly balance"));
    }

    #[test]
    fn test_mount_selectors_are_ids() {
        assert_eq!(mount_selector(ChartKind::Histogram), "#histogram-area");
        assert!(draw_fn(ChartKind::Bubble).is_ok());
    }
}
