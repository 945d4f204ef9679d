use actix_web::{web, App, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Instant;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::dashboard::Action;
use crate::error::{PredictorError, Result};
use crate::gauge::Gauge;
use crate::model::{batch_predict as score_batch, classify, predict_grade, Label, Score, StudentRecord, Tier};
use crate::session::{PageRegistry, PageView};

pub type SharedPages = web::Data<Mutex<PageRegistry>>;

#[derive(Debug, Deserialize)]
pub struct StateQuery {
    pub page: Option<Uuid>,
}

/// An action addressed to one page, numbered by the page that sent it.
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub page_id: Uuid,
    #[serde(default)]
    pub seq: Option<u64>,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub hours: f64,
    pub attendance: f64,
    pub previous: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub score: Score,
    pub label: Label,
    pub tier: Tier,
    pub badge_class: String,
    pub gauge_offset: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(err: PredictorError) -> HttpResponse {
    let body = ErrorResponse {
        error: err.to_string(),
    };
    match err {
        PredictorError::PageNotFound { .. } => {
            tracing::warn!("{}", err);
            HttpResponse::NotFound().json(body)
        }
        PredictorError::StaleAction { .. } => {
            tracing::debug!("{}", err);
            HttpResponse::Conflict().json(body)
        }
        _ => {
            tracing::error!("Request failed: {}", err);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn with_pages<F>(pages: &SharedPages, f: F) -> Result<PageView>
where
    F: FnOnce(&mut PageRegistry) -> Result<PageView>,
{
    let mut guard = pages.lock().map_err(|e| PredictorError::StateError {
        message: e.to_string(),
    })?;
    f(&mut *guard)
}

// Without a page id this opens a fresh page: its own inputs, outputs and confetti.
async fn get_state(query: web::Query<StateQuery>, pages: SharedPages) -> HttpResponse {
    let now = Instant::now();
    let result = with_pages(&pages, |registry| match query.page {
        Some(page_id) => registry.view(page_id, now),
        None => Ok(registry.open(now)),
    });

    match result {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => error_response(e),
    }
}

async fn post_action(req: web::Json<ActionRequest>, pages: SharedPages) -> HttpResponse {
    let ActionRequest {
        page_id,
        seq,
        action,
    } = req.into_inner();
    tracing::debug!("Dispatching {:?} to page {} (seq {:?})", action, page_id, seq);

    match with_pages(&pages, |registry| {
        registry.dispatch(page_id, seq, action, Instant::now())
    }) {
        Ok(page) => {
            if !page.view.particles.is_empty() {
                tracing::info!(
                    "🎉 Score {} fired {} particles",
                    page.view.score,
                    page.view.particles.len()
                );
            }
            HttpResponse::Ok().json(page)
        }
        Err(e) => error_response(e),
    }
}

// Stateless prediction
async fn predict(req: web::Json<PredictRequest>) -> HttpResponse {
    let score = predict_grade(req.hours, req.attendance, req.previous);
    let grade = classify(score);

    HttpResponse::Ok().json(PredictResponse {
        score,
        label: grade.label,
        tier: grade.tier,
        badge_class: format!("badge {}", grade.tier.css_class()),
        gauge_offset: Gauge::render(f64::from(score.value())).dash_offset,
    })
}

async fn batch_predict(web::Json(students): web::Json<Vec<StudentRecord>>) -> HttpResponse {
    let result = score_batch(students);
    tracing::info!(
        "Batch of {} students scored, average {:.1}",
        result.summary.total_students,
        result.summary.average_score
    );
    HttpResponse::Ok().json(result)
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("Grade Predictor is running!")
}

async fn serve_homepage() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(HOMEPAGE)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(serve_homepage))
        .route("/state", web::get().to(get_state))
        .route("/action", web::post().to(post_action))
        .route("/predict", web::post().to(predict))
        .route("/batch-predict", web::post().to(batch_predict))
        .route("/health", web::get().to(health_check));
}

pub async fn start_api(config: &ServerConfig) -> std::io::Result<()> {
    let pages: SharedPages = web::Data::new(Mutex::new(PageRegistry::default()));

    tracing::info!("🌐 Starting Grade Predictor on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(pages.clone())
            .configure(configure)
    })
    .bind(config.bind_addr())?
    .run()
    .await
}

const HOMEPAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Student Grade Predictor</title>
    <style>
        body { font-family: Arial, sans-serif; max-width: 720px; margin: 40px auto; padding: 20px; }
        .theme-light body { background: #fafafa; color: #222; }
        .field { margin: 14px 0; }
        .field label { display: block; font-weight: bold; margin-bottom: 4px; }
        .field input[type=number] { width: 90px; margin-left: 10px; }
        .gauge { width: 140px; height: 140px; }
        .gauge__track { fill: none; stroke: #ddd; stroke-width: 12; }
        .gauge__progress { fill: none; stroke: #007bff; stroke-width: 12; transform: rotate(-90deg); transform-origin: 60px 60px; }
        .badge { display: inline-block; padding: 6px 12px; border-radius: 12px; font-weight: bold; }
        .badge--good { background: #d4edda; color: #155724; }
        .badge--warn { background: #fff3cd; color: #856404; }
        .badge--bad { background: #f8d7da; color: #721c24; }
        .confetti { position: fixed; top: -10px; width: 8px; height: 14px; animation-name: fall; animation-timing-function: linear; }
        @keyframes fall { to { top: 100vh; } }
    </style>
</head>
<body>
    <h1>🎓 Student Grade Predictor</h1>

    <div class="field">
        <label for="hoursRange">Weekly study hours</label>
        <input type="range" id="hoursRange" min="0" max="60" step="1">
        <input type="number" id="hoursNumber" min="0" max="60" step="0.5">
    </div>
    <div class="field">
        <label for="attendanceRange">Attendance (%)</label>
        <input type="range" id="attendanceRange" min="0" max="100" step="1">
        <input type="number" id="attendanceNumber" min="0" max="100" step="1">
    </div>
    <div class="field">
        <label for="previousRange">Previous score (%)</label>
        <input type="range" id="previousRange" min="0" max="100" step="1">
        <input type="number" id="previousNumber" min="0" max="100" step="1">
    </div>

    <button id="predictBtn">📊 Predict</button>
    <button id="resetBtn">Reset</button>
    <button id="themeBtn">Toggle theme</button>

    <svg class="gauge" viewBox="0 0 120 120">
        <circle class="gauge__track" cx="60" cy="60" r="52"></circle>
        <circle class="gauge__progress" cx="60" cy="60" r="52"></circle>
    </svg>
    <p><strong id="predictedValue">--</strong> / 100</p>
    <span id="badgeLabel" class="badge">--</span>

    <template id="confetti-template"><div class="confetti"></div></template>

    <script>
        const fields = ['hours', 'attendance', 'previous'];
        let pageId = null;
        let seq = 0;
        let pending = 0;
        let queue = Promise.resolve();

        // Actions run one at a time, in the order the user made them.
        function send(action) {
            pending += 1;
            const body = {...action, seq: ++seq};
            queue = queue.then(async () => {
                try {
                    const response = await fetch('/action', {
                        method: 'POST',
                        headers: {'Content-Type': 'application/json'},
                        body: JSON.stringify({...body, page_id: pageId})
                    });
                    if (response.ok) {
                        const page = await response.json();
                        render(page, pending === 1);
                    }
                } finally {
                    pending -= 1;
                }
            }).catch((err) => console.error('action failed', err));
            return queue;
        }

        function spawn(particle) {
            const tpl = document.getElementById('confetti-template');
            if (!tpl) return;
            const node = tpl.content.firstElementChild.cloneNode(true);
            node.style.left = `${particle.left}px`;
            node.style.background = particle.background;
            node.style.animationDuration = `${particle.duration_secs}s`;
            node.style.transform = `rotate(${particle.rotation_deg}deg)`;
            document.body.appendChild(node);
            setTimeout(() => node.remove(), particle.lifetime_ms);
        }

        function render(view, syncFields) {
            // Control values are only written back once no newer edit is queued.
            if (syncFields) {
                for (const f of view.fields) {
                    document.getElementById(`${f.field}Range`).value = f.range_value;
                    document.getElementById(`${f.field}Number`).value = f.number_value;
                }
            }
            document.getElementById('predictedValue').textContent = view.score_text;
            const progress = document.querySelector('.gauge__progress');
            progress.style.strokeDasharray = String(view.gauge.circumference);
            progress.style.strokeDashoffset = String(view.gauge.dash_offset);
            const badge = document.getElementById('badgeLabel');
            badge.textContent = view.badge.label;
            badge.className = view.badge.class_name;
            document.documentElement.classList.toggle('theme-light', view.light_theme);
            view.particles.forEach(spawn);
        }

        window.addEventListener('DOMContentLoaded', async () => {
            for (const field of fields) {
                for (const side of ['range', 'number']) {
                    const suffix = side === 'range' ? 'Range' : 'Number';
                    document.getElementById(`${field}${suffix}`).addEventListener('input', (e) => {
                        send({type: 'input', field, side, value: e.target.value});
                    });
                }
            }
            document.getElementById('predictBtn').addEventListener('click', (e) => {
                send({type: 'predict', trigger_x: e.clientX, viewport_width: window.innerWidth});
            });
            document.getElementById('resetBtn').addEventListener('click', () => send({type: 'reset'}));
            document.getElementById('themeBtn').addEventListener('click', () => send({type: 'toggle_theme'}));

            queue = queue.then(async () => {
                const response = await fetch('/state');
                const page = await response.json();
                pageId = page.page_id;
                seq = Math.max(seq, page.seq);
                render(page, pending === 0);
            }).catch((err) => console.error('load failed', err));
        });
    </script>
</body>
</html>
"#;
