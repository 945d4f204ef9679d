use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::gauge::Gauge;
use crate::model::{classify, predict, Label, Score, Tier};
use crate::particles::{fire_particles, Particle, ParticleLayer, ParticleTemplate};
use crate::view::{Field, InputPanel, Side};

pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;

/// Everything the page can ask of the view-model.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Input {
        field: Field,
        side: Side,
        value: String,
    },
    Predict {
        #[serde(default)]
        trigger_x: Option<f64>,
        #[serde(default)]
        viewport_width: Option<f64>,
    },
    Reset,
    ToggleTheme,
}

/// Screen position of the click that asked for a prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trigger {
    pub x: f64,
    pub viewport_width: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Badge {
    pub label: Label,
    pub tier: Tier,
    pub class_name: String,
}

impl Badge {
    fn for_score(score: Score) -> Self {
        let grade = classify(score);
        Self {
            label: grade.label,
            tier: grade.tier,
            class_name: format!("badge {}", grade.tier.css_class()),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FieldView {
    pub field: Field,
    pub max: f64,
    pub range_value: String,
    pub number_value: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ViewState {
    pub fields: Vec<FieldView>,
    pub score: Score,
    pub score_text: String,
    pub gauge: Gauge,
    pub badge: Badge,
    pub light_theme: bool,
    pub particles: Vec<Particle>,
    pub live_particles: usize,
}

/// Page view-model: named input ports, rendered outputs, and the confetti layer.
pub struct Dashboard<R: Rng = StdRng> {
    inputs: InputPanel,
    score: Score,
    gauge: Gauge,
    badge: Badge,
    light_theme: bool,
    template: Option<ParticleTemplate>,
    layer: ParticleLayer,
    fresh: Vec<Particle>,
    rng: R,
}

impl Dashboard<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy(), Some(ParticleTemplate::default()))
    }
}

impl Default for Dashboard<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Dashboard<R> {
    pub fn with_rng(rng: R, template: Option<ParticleTemplate>) -> Self {
        let inputs = InputPanel::default();
        // Predict on load; there is no click yet, so no confetti either.
        let score = predict(&inputs.read());
        Self {
            inputs,
            score,
            gauge: Gauge::render(f64::from(score.value())),
            badge: Badge::for_score(score),
            light_theme: false,
            template,
            layer: ParticleLayer::new(),
            fresh: Vec::new(),
            rng,
        }
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn live_particles(&self) -> usize {
        self.layer.len()
    }

    pub fn update_prediction(&mut self, trigger: Option<Trigger>) {
        let raw = self.inputs.read();
        let score = predict(&raw);

        self.score = score;
        self.gauge = Gauge::render(f64::from(score.value()));
        self.badge = Badge::for_score(score);

        tracing::debug!(
            hours = raw.hours,
            attendance = raw.attendance,
            previous = raw.previous,
            score = score.value(),
            label = %self.badge.label,
            "Prediction updated"
        );

        if let Some(trigger) = trigger.filter(|_| score.is_excellent()) {
            let batch = fire_particles(
                &mut self.rng,
                trigger.x,
                trigger.viewport_width,
                self.template.as_ref(),
            );
            self.layer.spawn(&batch, Instant::now());
            self.fresh.extend(batch);
        }
    }

    pub fn on_user_action(&mut self, action: Action) -> ViewState {
        self.fresh.clear();

        match action {
            Action::Input { field, side, value } => {
                self.inputs.pair_mut(field).input(side, &value);
            }
            Action::Predict {
                trigger_x,
                viewport_width,
            } => {
                let trigger = trigger_x.map(|x| Trigger {
                    x,
                    viewport_width: viewport_width.unwrap_or(DEFAULT_VIEWPORT_WIDTH),
                });
                self.update_prediction(trigger);
            }
            Action::Reset => {
                self.inputs.reset();
                self.update_prediction(None);
            }
            Action::ToggleTheme => {
                self.light_theme = !self.light_theme;
            }
        }

        self.render()
    }

    pub fn render(&mut self) -> ViewState {
        let expired = self.layer.prune(Instant::now());
        if expired > 0 {
            tracing::trace!("Removed {} expired particles", expired);
        }

        let fields = Field::ALL
            .iter()
            .map(|&field| {
                let pair = self.inputs.pair(field);
                FieldView {
                    field,
                    max: field.max(),
                    range_value: pair.range.value.clone(),
                    number_value: pair.number.value.clone(),
                }
            })
            .collect();

        ViewState {
            fields,
            score: self.score,
            score_text: self.score.to_string(),
            gauge: self.gauge,
            badge: self.badge.clone(),
            light_theme: self.light_theme,
            particles: std::mem::take(&mut self.fresh),
            live_particles: self.layer.len(),
        }
    }
}
