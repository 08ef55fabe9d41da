use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lawd_table::DistrictTable;
use pnu_addr::{Resolution, Resolved, resolve};

/// Requests longer than this are rejected outright.
pub const MAX_TEXT_LEN: usize = 512;

const NO_MATCH_MESSAGE: &str =
    "해당 명칭으로 매칭된 법정동이 없습니다. 시·군·구를 포함해 다시 입력해주세요.";
const AMBIGUOUS_MESSAGE: &str =
    "여러 지역에서 같은 동명이 발견되었습니다. 시·군·구를 지정해주세요.";

#[derive(Clone)]
pub struct AppState {
    pub table: Arc<DistrictTable>,
}

#[derive(Deserialize)]
pub struct ConvertQuery {
    #[serde(default)]
    pub text: String,
}

#[derive(Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize)]
pub struct CandidateBody {
    #[serde(rename = "admCd10")]
    pub adm_cd10: String,
    pub name: String,
}

#[derive(Serialize)]
struct ResolvedBody {
    ok: bool,
    input: String,
    normalized: Option<String>,
    full: String,
    #[serde(rename = "admCd10")]
    adm_cd10: String,
    #[serde(rename = "mtYn")]
    mt_yn: u8,
    bun: Option<String>,
    ji: Option<String>,
    pnu: String,
    length: usize,
    candidates: Vec<CandidateBody>,
}

#[derive(Serialize)]
struct AmbiguousBody {
    ok: bool,
    message: &'static str,
    candidates: Vec<CandidateBody>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(frontend))
        .route("/robots.txt", get(robots))
        .route("/healthz", get(healthz))
        .route("/v1/convert", get(convert_get).post(convert_post))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn robots() -> impl IntoResponse {
    (
        axum::http::HeaderMap::from_iter([(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("text/plain; charset=utf-8"),
        )]),
        "User-agent: *\nDisallow: /",
    )
}

async fn frontend() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn convert_get(
    State(state): State<AppState>,
    Query(params): Query<ConvertQuery>,
) -> Result<Response, ApiError> {
    convert(&state, &params.text)
}

async fn convert_post(
    State(state): State<AppState>,
    Json(req): Json<ConvertRequest>,
) -> Result<Response, ApiError> {
    convert(&state, &req.text)
}

fn convert(state: &AppState, text: &str) -> Result<Response, ApiError> {
    if text.len() > MAX_TEXT_LEN {
        return Err(ApiError::bad_request(format!(
            "text must be at most {MAX_TEXT_LEN} bytes"
        )));
    }

    match resolve(&state.table, text) {
        Resolution::Resolved(resolved) => Ok(Json(resolved_body(resolved)).into_response()),
        Resolution::Ambiguous { candidates } => {
            let message = if candidates.is_empty() {
                NO_MATCH_MESSAGE
            } else {
                AMBIGUOUS_MESSAGE
            };
            let body = AmbiguousBody {
                ok: false,
                message,
                candidates: candidates
                    .into_iter()
                    .map(|c| CandidateBody {
                        adm_cd10: c.code,
                        name: c.name,
                    })
                    .collect(),
            };
            Ok(Json(body).into_response())
        }
    }
}

fn resolved_body(resolved: Resolved) -> ResolvedBody {
    let Resolved {
        input,
        token,
        code,
        name,
        lot,
        pnu,
    } = resolved;
    let candidates = vec![CandidateBody {
        adm_cd10: code.clone(),
        name: name.clone(),
    }];
    ResolvedBody {
        ok: true,
        input,
        normalized: token,
        full: name,
        adm_cd10: code,
        mt_yn: lot.mountain as u8,
        bun: lot.main_lot.map(|n| format!("{n:04}")),
        ji: lot.sub_lot.map(|n| format!("{n:04}")),
        length: pnu.len(),
        pnu,
        candidates,
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

const INDEX_HTML: &str = r#"
<!doctype html>
<html lang="ko">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>PNU 변환기</title>
  <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css" rel="stylesheet">
  <style>
    body { background: #f8f9fa; }
    .pnu { font-family: ui-monospace, monospace; letter-spacing: 0.1em; }
    .results-list { max-height: 60vh; overflow-y: auto; }
  </style>
</head>
<body class="py-4">
  <div class="container" style="max-width: 40rem;">
    <h1 class="h4 mb-3">주소 &rarr; PNU 변환</h1>

    <div class="card shadow-sm">
      <div class="card-body">
        <div class="mb-3">
          <label class="form-label fw-semibold" for="textInput">주소</label>
          <input id="textInput" type="text" class="form-control form-control-lg"
                 placeholder="예: 서울 강남구 역삼동 123-4" autocomplete="off">
          <div class="form-text">법정동명과 번지를 포함해 입력하세요.</div>
        </div>
        <div class="d-grid">
          <button id="convertBtn" class="btn btn-primary btn-lg">변환</button>
        </div>
      </div>
    </div>

    <div class="mt-4">
      <div id="status" class="text-muted mb-2">주소를 입력하면 19자리 PNU를 계산합니다.</div>
      <div id="result" class="d-none card">
        <div class="card-body">
          <div class="h5 pnu mb-1" id="pnuOut"></div>
          <div class="text-muted" id="nameOut"></div>
        </div>
      </div>
      <ul id="candidateList" class="list-group results-list mt-2"></ul>
    </div>
  </div>

  <script>
    const textInput = document.getElementById('textInput');
    const convertBtn = document.getElementById('convertBtn');
    const statusEl = document.getElementById('status');
    const resultEl = document.getElementById('result');
    const pnuOut = document.getElementById('pnuOut');
    const nameOut = document.getElementById('nameOut');
    const candidateList = document.getElementById('candidateList');

    function reset() {
      resultEl.classList.add('d-none');
      candidateList.innerHTML = '';
    }

    async function runConvert() {
      const text = textInput.value.trim();
      if (!text) return;
      reset();
      statusEl.textContent = '변환 중...';
      try {
        const resp = await fetch('/v1/convert', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ text }),
        });
        if (!resp.ok) throw new Error(`Request failed (${resp.status})`);
        const data = await resp.json();
        if (data.ok) {
          statusEl.textContent = `${data.input} (토큰: ${data.normalized ?? '-'})`;
          pnuOut.textContent = data.pnu;
          nameOut.textContent = `${data.full} · 코드 ${data.admCd10} · 산 ${data.mtYn} · 본번 ${data.bun ?? '-'} · 부번 ${data.ji ?? '-'}`;
          resultEl.classList.remove('d-none');
        } else {
          statusEl.textContent = data.message;
          data.candidates.forEach(c => {
            const li = document.createElement('li');
            li.className = 'list-group-item';
            li.textContent = `${c.name} (${c.admCd10})`;
            li.addEventListener('click', () => {
              textInput.value = c.name + ' ' + textInput.value.replace(/[^0-9\-\s산]/g, '').trim();
              runConvert();
            });
            candidateList.appendChild(li);
          });
        }
      } catch (err) {
        statusEl.textContent = '변환 요청에 실패했습니다.';
      }
    }

    convertBtn.addEventListener('click', runConvert);
    textInput.addEventListener('keydown', (e) => {
      if (e.key === 'Enter') {
        e.preventDefault();
        runConvert();
      }
    });
  </script>
</body>
</html>
"#;
