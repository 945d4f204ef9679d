use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::model::clamp;

pub const PARTICLE_COUNT: usize = 18;
pub const PARTICLE_LIFETIME: Duration = Duration::from_millis(2000);
pub const MAX_SPREAD: f64 = 100.0;
const EDGE_MARGIN: f64 = 10.0;

/// Markup hook the browser clones for each confetti piece.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ParticleTemplate {
    pub element_id: String,
    pub class_name: String,
}

impl Default for ParticleTemplate {
    fn default() -> Self {
        Self {
            element_id: "confetti-template".to_string(),
            class_name: "confetti".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Particle {
    pub class_name: String,
    pub left: f64,
    pub hue_from: f64,
    pub hue_to: f64,
    pub background: String,
    pub duration_secs: f64,
    pub rotation_deg: f64,
    pub lifetime_ms: u64,
}

pub fn gradient(hue_from: f64, hue_to: f64) -> String {
    format!(
        "linear-gradient(180deg, hsl({:.0} 90% 60%), hsl({:.0} 90% 70%))",
        hue_from, hue_to
    )
}

/// Spawns one confetti batch around `origin_x`. Without a template nothing
/// is spawned.
pub fn fire_particles<R: Rng>(
    rng: &mut R,
    origin_x: f64,
    viewport_width: f64,
    template: Option<&ParticleTemplate>,
) -> Vec<Particle> {
    let Some(template) = template else {
        tracing::debug!("No confetti template, skipping particles");
        return Vec::new();
    };

    let right_edge = (viewport_width - EDGE_MARGIN).max(0.0);

    (0..PARTICLE_COUNT)
        .map(|_| {
            let spread = (rng.gen::<f64>() - 0.5) * 2.0 * MAX_SPREAD;
            let hue_from = rng.gen_range(0.0..360.0);
            let hue_to = rng.gen_range(0.0..360.0);
            Particle {
                class_name: template.class_name.clone(),
                left: clamp(origin_x + spread, 0.0, right_edge),
                hue_from,
                hue_to,
                background: gradient(hue_from, hue_to),
                duration_secs: rng.gen_range(1.2..2.0),
                rotation_deg: rng.gen_range(0.0..360.0),
                lifetime_ms: PARTICLE_LIFETIME.as_millis() as u64,
            }
        })
        .collect()
}

/// Particles currently on screen, tracked by expiry. Batches may overlap;
/// each piece leaves on its own fixed timeout regardless of animation length.
#[derive(Debug, Default, Clone)]
pub struct ParticleLayer {
    expiries: Vec<Instant>,
}

impl ParticleLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, batch: &[Particle], now: Instant) {
        let expires_at = now + PARTICLE_LIFETIME;
        self.expiries.extend(std::iter::repeat(expires_at).take(batch.len()));
    }

    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.expiries.len();
        self.expiries.retain(|expires_at| *expires_at > now);
        before - self.expiries.len()
    }

    pub fn len(&self) -> usize {
        self.expiries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expiries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fires_fixed_count_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let template = ParticleTemplate::default();

        for origin in [0.0, 50.0, 640.0, 1275.0, 5000.0] {
            let batch = fire_particles(&mut rng, origin, 1280.0, Some(&template));
            assert_eq!(batch.len(), PARTICLE_COUNT);
            for particle in &batch {
                assert!(particle.left >= 0.0 && particle.left <= 1270.0);
                assert!(particle.duration_secs >= 1.2 && particle.duration_secs < 2.0);
                assert!(particle.rotation_deg >= 0.0 && particle.rotation_deg < 360.0);
                assert!(particle.hue_from < 360.0 && particle.hue_to < 360.0);
                assert_eq!(particle.lifetime_ms, 2000);
                assert_eq!(particle.class_name, "confetti");
            }
        }
    }

    #[test]
    fn spread_stays_near_origin() {
        let mut rng = StdRng::seed_from_u64(11);
        let batch = fire_particles(&mut rng, 600.0, 1280.0, Some(&ParticleTemplate::default()));
        assert!(batch.iter().all(|p| (p.left - 600.0).abs() <= MAX_SPREAD));
    }

    #[test]
    fn missing_template_is_noop() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(fire_particles(&mut rng, 300.0, 1280.0, None).is_empty());
    }

    #[test]
    fn background_uses_both_hues() {
        assert_eq!(
            gradient(12.0, 299.6),
            "linear-gradient(180deg, hsl(12 90% 60%), hsl(300 90% 70%))"
        );

        let mut rng = StdRng::seed_from_u64(9);
        let batch = fire_particles(&mut rng, 10.0, 400.0, Some(&ParticleTemplate::default()));
        assert!(batch
            .iter()
            .all(|p| p.background == gradient(p.hue_from, p.hue_to)));
    }

    #[test]
    fn layer_expires_batches_independently() {
        let mut rng = StdRng::seed_from_u64(3);
        let template = ParticleTemplate::default();
        let start = Instant::now();
        let mut layer = ParticleLayer::new();

        layer.spawn(&fire_particles(&mut rng, 100.0, 800.0, Some(&template)), start);
        layer.spawn(
            &fire_particles(&mut rng, 200.0, 800.0, Some(&template)),
            start + Duration::from_millis(1500),
        );
        assert_eq!(layer.len(), 2 * PARTICLE_COUNT);

        assert_eq!(layer.prune(start + Duration::from_millis(1999)), 0);
        assert_eq!(layer.prune(start + PARTICLE_LIFETIME), PARTICLE_COUNT);
        assert_eq!(layer.len(), PARTICLE_COUNT);

        layer.prune(start + Duration::from_millis(3500));
        assert!(layer.is_empty());
    }
}
