//! Draw triggers.
//!
//! Each `use_*` function captures a mount selector, a dataset and options,
//! and returns a draw function. Calling it resolves the selector, builds
//! the scene and mounts it. Live scenes are tracked per selector in a
//! thread-local [`MountRegistry`]; the histogram replaces its previous
//! scene, every other chart refuses to draw twice into the same mount.

use std::any::Any;
use std::cell::RefCell;

use leptos::prelude::*;
use viz_charts::{
    BubbleChart, BubbleConfig, BubbleScene, ForceGraph, GraphConfig, GraphScene, Histogram,
    HistogramLayout, LineChart, LineChartConfig, LineLayout, WordCloud, WordCloudConfig,
    WordCloudScene,
};
use viz_core::{
    BubbleDatum, ChartKind, GraphData, HistogramDatum, HistogramOptions, LinePoint, VizResult,
    WordCount,
};
use viz_state::{MountPolicy, MountRegistry, resolve_mount};

/// Keeps a mounted scene alive; dropping it unmounts the scene
type MountedScene = Box<dyn Any>;

thread_local! {
    static MOUNTS: RefCell<MountRegistry<MountedScene>> = RefCell::new(MountRegistry::new());
}

/// Mount policy used by each chart's draw trigger
pub fn mount_policy(kind: ChartKind) -> MountPolicy {
    match kind {
        ChartKind::Histogram => MountPolicy::Replace,
        _ => MountPolicy::Reject,
    }
}

/// Build a scene and mount the view it renders under `selector`.
///
/// `build` validates the dataset and returns a view constructor; the view
/// itself is created inside the mount so its signals and tick loop belong
/// to the mounted owner.
fn draw<B, G, V>(selector: &str, kind: ChartKind, build: B) -> VizResult<()>
where
    B: FnOnce() -> VizResult<G>,
    G: FnOnce() -> V + 'static,
    V: IntoView + 'static,
{
    MOUNTS.with(|mounts| {
        mounts
            .borrow_mut()
            .mount(selector, mount_policy(kind), || {
                let parent = resolve_mount(selector)?;
                let view = build()?;
                let handle = leptos::mount::mount_to(parent, view);
                Ok(Box::new(handle) as MountedScene)
            })
    })
    .inspect(|()| tracing::info!("Drew {} into {}", kind.label(), selector))
}

/// Tear down whatever chart is mounted at `selector`
pub fn unmount(selector: &str) -> bool {
    MOUNTS.with(|mounts| mounts.borrow_mut().unmount(selector))
}

pub fn is_mounted(selector: &str) -> bool {
    MOUNTS.with(|mounts| mounts.borrow().is_mounted(selector))
}

// ============================================================================
// TRIGGERS
// ============================================================================

pub fn use_bubble_chart(
    selector: impl Into<String>,
    dataset: Vec<BubbleDatum>,
    config: BubbleConfig,
) -> impl Fn() -> VizResult<()> {
    let selector = selector.into();
    move || {
        draw(&selector, ChartKind::Bubble, || {
            let scene = BubbleScene::new(dataset.clone(), config.clone())?;
            Ok(move || view! { <BubbleChart scene=scene /> })
        })
    }
}

pub fn use_force_directed_graph(
    selector: impl Into<String>,
    dataset: GraphData,
    config: GraphConfig,
) -> impl Fn() -> VizResult<()> {
    let selector = selector.into();
    move || {
        draw(&selector, ChartKind::ForceGraph, || {
            let scene = GraphScene::new(dataset.clone(), config.clone())?;
            Ok(move || view! { <ForceGraph scene=scene /> })
        })
    }
}

pub fn use_histogram(
    selector: impl Into<String>,
    dataset: Vec<HistogramDatum>,
    options: HistogramOptions,
) -> impl Fn() -> VizResult<()> {
    let selector = selector.into();
    move || {
        draw(&selector, ChartKind::Histogram, || {
            let layout = HistogramLayout::compute(&dataset, &options)?;
            Ok(move || view! { <Histogram layout=layout /> })
        })
    }
}

pub fn use_line_chart(
    selector: impl Into<String>,
    dataset: Vec<LinePoint>,
    config: LineChartConfig,
) -> impl Fn() -> VizResult<()> {
    let selector = selector.into();
    move || {
        draw(&selector, ChartKind::Line, || {
            let layout = LineLayout::compute(&dataset, &config)?;
            Ok(move || view! { <LineChart layout=layout /> })
        })
    }
}

pub fn use_word_cloud(
    selector: impl Into<String>,
    dataset: Vec<WordCount>,
    config: WordCloudConfig,
) -> impl Fn() -> VizResult<()> {
    let selector = selector.into();
    move || {
        draw(&selector, ChartKind::WordCloud, || {
            let scene = WordCloudScene::build(&dataset, config.clone())?;
            Ok(move || view! { <WordCloud scene=scene /> })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_replaces_others_reject() {
        assert_eq!(mount_policy(ChartKind::Histogram), MountPolicy::Replace);
        for kind in [ChartKind::Bubble, ChartKind::ForceGraph, ChartKind::Line, ChartKind::WordCloud] {
            assert_eq!(mount_policy(kind), MountPolicy::Reject);
        }
    }
}
