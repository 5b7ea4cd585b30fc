//! Word cloud.
//!
//! Counts map to font sizes on a linear scale, every word gets a random
//! rotation in 30° steps, and a [`WordLayout`] decides where the words go.
//! The built-in [`SpiralLayout`] walks an Archimedean spiral from the centre
//! and keeps the first spot whose bounding box overlaps nothing placed yet.

use crate::{Easing, LinearScale, Scale, Transition, colors, lerp, start_entry_clock};
use leptos::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use viz_core::{CanvasSize, PlacedWord, SizedWord, VizResult, WordCount, max_count};
use viz_force::SimHandle;

/// Rotation step between the allowed angles, in degrees
pub const ROTATION_STEP: f64 = 30.0;

/// Word cloud configuration
#[derive(Debug, Clone, PartialEq)]
pub struct WordCloudConfig {
    pub width: f64,
    pub height: f64,
    pub min_font_size: f64,
    pub max_font_size: f64,
    pub font_family: String,
    pub transition_ms: f64,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            min_font_size: 10.0,
            max_font_size: 100.0,
            font_family: "Impact".to_string(),
            transition_ms: 500.0,
        }
    }
}

impl WordCloudConfig {
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_font_sizes(mut self, min: f64, max: f64) -> Self {
        self.min_font_size = min;
        self.max_font_size = max;
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize::new(self.width, self.height)
    }

    pub fn transition(&self) -> Transition {
        Transition::new(self.transition_ms).easing(Easing::SinInOut)
    }
}

// ============================================================================
// STRATEGY PATTERN: Rotation and layout
// ============================================================================

/// Source of per-word rotations, in degrees
pub trait RotationSource {
    fn next_rotation(&mut self) -> f64;
}

/// `(k - 3) * 30` degrees with `k` uniform in `0..6`
pub struct RandomRotation<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomRotation<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomRotation<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RotationSource for RandomRotation<R> {
    fn next_rotation(&mut self) -> f64 {
        let k: i32 = self.rng.gen_range(0..6);
        (k - 3) as f64 * ROTATION_STEP
    }
}

/// Every word at the same angle
pub struct FixedRotation(pub f64);

impl RotationSource for FixedRotation {
    fn next_rotation(&mut self) -> f64 {
        self.0
    }
}

/// Places sized words on a canvas. Positions are relative to the canvas
/// centre; words that do not fit may be left out.
pub trait WordLayout {
    fn place(&mut self, words: Vec<SizedWord>, canvas: CanvasSize) -> Vec<PlacedWord>;
}

/// Font sizes and rotations for a dataset, in dataset order
pub fn size_words(
    dataset: &[WordCount],
    config: &WordCloudConfig,
    rotation: &mut dyn RotationSource,
) -> VizResult<Vec<SizedWord>> {
    let max = max_count(dataset)?;
    let scale = LinearScale::new()
        .domain(0.0, max)
        .range(config.min_font_size, config.max_font_size);

    Ok(dataset
        .iter()
        .map(|w| SizedWord {
            text: w.word.clone(),
            size: scale.scale(w.count),
            rotate: rotation.next_rotation(),
        })
        .collect())
}

// ============================================================================
// SPIRAL LAYOUT
// ============================================================================

/// Axis-aligned box centred on `(x, y)`
#[derive(Debug, Clone, Copy, PartialEq)]
struct WordBox {
    x: f64,
    y: f64,
    half_w: f64,
    half_h: f64,
}

impl WordBox {
    fn overlaps(&self, other: &WordBox) -> bool {
        (self.x - other.x).abs() < self.half_w + other.half_w
            && (self.y - other.y).abs() < self.half_h + other.half_h
    }

    fn inside(&self, canvas: CanvasSize) -> bool {
        self.x - self.half_w >= -canvas.width / 2.0
            && self.x + self.half_w <= canvas.width / 2.0
            && self.y - self.half_h >= -canvas.height / 2.0
            && self.y + self.half_h <= canvas.height / 2.0
    }
}

/// Greedy Archimedean spiral placement, largest words first
#[derive(Debug, Clone)]
pub struct SpiralLayout {
    /// Glyph advance as a fraction of the font size
    pub char_width: f64,
    /// Spiral growth per radian
    pub spacing: f64,
    /// Angle increment per probe, in radians
    pub step: f64,
    pub max_probes: usize,
}

impl Default for SpiralLayout {
    fn default() -> Self {
        Self {
            char_width: 0.6,
            spacing: 2.0,
            step: 0.1,
            max_probes: 10_000,
        }
    }
}

impl SpiralLayout {
    fn extent(&self, word: &SizedWord) -> (f64, f64) {
        let w = word.text.chars().count() as f64 * word.size * self.char_width;
        let h = word.size;
        let (sin, cos) = word.rotate.to_radians().sin_cos();
        let half_w = (w * cos.abs() + h * sin.abs()) / 2.0;
        let half_h = (w * sin.abs() + h * cos.abs()) / 2.0;
        (half_w, half_h)
    }
}

impl WordLayout for SpiralLayout {
    fn place(&mut self, mut words: Vec<SizedWord>, canvas: CanvasSize) -> Vec<PlacedWord> {
        words.sort_by(|a, b| b.size.total_cmp(&a.size));

        let mut boxes: Vec<WordBox> = Vec::with_capacity(words.len());
        let mut placed = Vec::with_capacity(words.len());

        for word in words {
            let (half_w, half_h) = self.extent(&word);
            let spot = (0..self.max_probes)
                .map(|i| {
                    let t = i as f64 * self.step;
                    let r = self.spacing * t;
                    WordBox {
                        x: r * t.cos(),
                        y: r * t.sin(),
                        half_w,
                        half_h,
                    }
                })
                .find(|b| b.inside(canvas) && !boxes.iter().any(|o| o.overlaps(b)));

            match spot {
                Some(b) => {
                    boxes.push(b);
                    placed.push(PlacedWord {
                        text: word.text,
                        size: word.size,
                        x: b.x.round(),
                        y: b.y.round(),
                        rotate: word.rotate,
                    });
                }
                None => tracing::debug!("Word '{}' does not fit the canvas", word.text),
            }
        }
        placed
    }
}

// ============================================================================
// SCENE
// ============================================================================

/// Laid-out word cloud ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct WordCloudScene {
    pub config: WordCloudConfig,
    pub words: Vec<PlacedWord>,
}

impl WordCloudScene {
    pub fn new(
        dataset: &[WordCount],
        config: WordCloudConfig,
        layout: &mut dyn WordLayout,
        rotation: &mut dyn RotationSource,
    ) -> VizResult<Self> {
        let sized = size_words(dataset, &config, rotation)?;
        let requested = sized.len();
        let words = layout.place(sized, config.canvas());

        tracing::info!("Word cloud placed {} of {} words", words.len(), requested);
        Ok(Self { config, words })
    }

    /// Spiral layout with random rotations
    pub fn build(dataset: &[WordCount], config: WordCloudConfig) -> VizResult<Self> {
        Self::new(
            dataset,
            config,
            &mut SpiralLayout::default(),
            &mut RandomRotation::from_entropy(),
        )
    }

    /// Group transform putting layout coordinates around the canvas centre
    pub fn group_transform(&self) -> String {
        let center = self.config.canvas().center();
        format!("translate({}, {})", center.x, center.y)
    }

    /// Font size of word `index` `elapsed_ms` into the entry transition
    pub fn font_size_at(&self, index: usize, elapsed_ms: f64) -> f64 {
        let Some(word) = self.words.get(index) else {
            return 0.0;
        };
        lerp(0.0, word.size, self.config.transition().progress(0, elapsed_ms))
    }
}

#[component]
pub fn WordCloud(scene: WordCloudScene) -> impl IntoView {
    let canvas = scene.config.canvas();
    let total_ms = scene.config.transition_ms;
    let font_family = scene.config.font_family.clone();
    let transform = scene.group_transform();

    let elapsed = RwSignal::new(0.0);
    let handle = SimHandle::new();
    start_entry_clock(elapsed, total_ms, handle.clone());
    on_cleanup(move || handle.stop());

    let placed = scene.words.clone();
    let scene = StoredValue::new(scene);

    let words = placed
        .into_iter()
        .enumerate()
        .map(|(i, word)| {
            let family = font_family.clone();
            let transform = word.transform();
            view! {
                <text
                    text-anchor="middle"
                    transform=transform
                    fill=colors::category10(i)
                    style:font-family=family
                    style:font-size=move || {
                        format!("{}px", scene.with_value(|s| s.font_size_at(i, elapsed.get())))
                    }
                >
                    {word.text}
                </text>
            }
        })
        .collect_view();

    view! {
        <div class="viz-word-cloud">
            <svg width=canvas.width height=canvas.height viewBox=canvas.viewbox()>
                <g transform=transform>{words}</g>
            </svg>
        </div>
    }
}
