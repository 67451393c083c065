//! Maps `ViewState` to displayable output: a JSON-friendly snapshot, an HTML page and plain text.

use std::fmt::Write;
use chrono::{DateTime, Utc};
use htmlescape::{encode_attribute, encode_minimal as escape};
use serde::Serialize;
use crate::format::{format_clock, format_compact_volume, format_currency_usd, format_fee_percent};
use crate::models::PoolRecord;
use crate::services::{Status, ViewState};

pub const EMPTY_PLACEHOLDER: &str = "No pool data loaded yet.";

/// One pool with every field already formatted for display.
#[derive(Debug, Clone, Serialize)]
pub struct PoolCard {
    pub id: String,
    pub short_id: String,
    pub pair: String,
    pub fee: String,
    pub tvl: String,
    pub volume: String,
}

impl From<&PoolRecord> for PoolCard {
    fn from(pool: &PoolRecord) -> Self {
        Self {
            id: pool.id.clone(),
            short_id: pool.short_id(),
            pair: pool.pair(),
            fee: format_fee_percent(&pool.fee_tier),
            tvl: format_currency_usd(&pool.total_value_locked_usd),
            volume: format!("{} USD", format_compact_volume(&pool.volume_usd)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub status: Status,
    pub status_text: &'static str,
    pub refresh_enabled: bool,
    pub error_message: String,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub last_updated: Option<String>,
    pub cards: Vec<PoolCard>,
    pub show_empty_placeholder: bool,
}

pub fn status_text(status: Status) -> &'static str {
    match status {
        Status::Idle => "Preparing to load data",
        Status::Loading => "Loading data…",
        Status::Success => "Data ready",
        Status::Error => "Request failed; please retry",
    }
}

fn status_key(status: Status) -> &'static str {
    match status {
        Status::Idle => "idle",
        Status::Loading => "loading",
        Status::Success => "success",
        Status::Error => "error",
    }
}

pub fn snapshot(state: &ViewState) -> ViewSnapshot {
    ViewSnapshot {
        status: state.status,
        status_text: status_text(state.status),
        refresh_enabled: !state.is_loading(),
        error_message: state.error_message.clone(),
        last_updated_at: state.last_updated_at,
        last_updated: state.last_updated_at.map(format_clock),
        cards: state.records.iter().map(PoolCard::from).collect(),
        show_empty_placeholder: state.records.is_empty() && !state.is_loading(),
    }
}

/// Terminal rendering used by `--once`.
pub fn render_text(state: &ViewState) -> String {
    let view = snapshot(state);
    let mut out = String::new();

    let _ = write!(out, "Status: {}", view.status_text);
    if let Some(at) = &view.last_updated {
        let _ = write!(out, " (last updated {})", at);
    }
    out.push('\n');

    if !view.error_message.is_empty() {
        let _ = writeln!(out, "Error: {}", view.error_message);
    }

    for card in &view.cards {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}  [{} fee]", card.pair, card.fee);
        let _ = writeln!(out, "  {}", card.short_id);
        let _ = writeln!(out, "  {:<12} {:>20}", "TVL", card.tvl);
        let _ = writeln!(out, "  {:<12} {:>20}", "Volume", card.volume);
    }

    if view.show_empty_placeholder {
        let _ = writeln!(out, "\n{}", EMPTY_PLACEHOLDER);
    }
    out
}

const PAGE_STYLE: &str = "body{background:#020617;color:#f1f5f9;font-family:sans-serif;margin:0;padding:40px 16px}\
main{max-width:960px;margin:0 auto;display:flex;flex-direction:column;gap:24px}\
.panel{display:flex;align-items:center;gap:12px;border:1px solid #1e293b;border-radius:16px;padding:16px}\
.panel button{margin-left:auto;border-radius:999px;padding:8px 20px;border:0;background:#6366f1;color:#fff}\
.panel button:disabled{opacity:.5;cursor:wait}\
.error{border:1px solid #f87171;border-radius:12px;padding:16px;color:#fecaca}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(360px,1fr));gap:24px}\
.card{border:1px solid #1e293b;border-radius:24px;padding:24px}\
.row{display:flex;justify-content:space-between}\
.muted{color:#94a3b8;font-size:12px}\
.empty{grid-column:1/-1;border:1px dashed #334155;border-radius:24px;padding:24px;color:#94a3b8}";

const PAGE_SCRIPT: &str = "const proto=location.protocol==='https:'?'wss':'ws';\
const ws=new WebSocket(proto+'://'+location.host+'/ws');\
ws.onmessage=(e)=>{const m=JSON.parse(e.data);\
if(m.type==='state'&&m.data.status!==document.body.dataset.status)location.reload();};\
document.getElementById('refresh').onclick=()=>fetch('/api/refresh',{method:'POST'});";

/// Full page for `GET /`.
pub fn render_html(state: &ViewState) -> String {
    let view = snapshot(state);
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Top Uniswap V3 pools</title><style>");
    html.push_str(PAGE_STYLE);
    let _ = write!(html, "</style></head><body data-status=\"{}\"><main>", status_key(view.status));
    html.push_str("<header><p class=\"muted\">The Graph + Uniswap V3</p><h1>Top pools by TVL</h1></header>");

    html.push_str("<section class=\"panel\"><div><p class=\"muted\">Status</p>");
    let _ = write!(html, "<p id=\"status\">{}</p>", escape(view.status_text));
    if let Some(at) = &view.last_updated {
        let _ = write!(html, "<p class=\"muted\">Last updated {}</p>", escape(at));
    }
    let _ = write!(
        html,
        "</div><button id=\"refresh\" type=\"button\"{}>{}</button></section>",
        if view.refresh_enabled { "" } else { " disabled" },
        if view.refresh_enabled { "Reload data" } else { "Refreshing…" },
    );

    if !view.error_message.is_empty() {
        let _ = write!(html, "<div class=\"error\">{}</div>", escape(&view.error_message));
    }

    html.push_str("<section class=\"grid\">");
    for card in &view.cards {
        let _ = write!(
            html,
            "<article class=\"card\" data-pool-id=\"{}\">\
             <div class=\"row\"><h2>{}</h2><span>{} fee</span></div>\
             <p class=\"muted\">{}</p>\
             <div class=\"row\"><span>TVL</span><span>{}</span></div>\
             <div class=\"row\"><span>Volume</span><span>{}</span></div>\
             </article>",
            encode_attribute(&card.id),
            escape(&card.pair),
            escape(&card.fee),
            escape(&card.short_id),
            escape(&card.tvl),
            escape(&card.volume),
        );
    }
    if view.show_empty_placeholder {
        let _ = write!(html, "<div class=\"empty\">{}</div>", EMPTY_PLACEHOLDER);
    }
    html.push_str("</section></main><script>");
    html.push_str(PAGE_SCRIPT);
    html.push_str("</script></body></html>");
    html
}
