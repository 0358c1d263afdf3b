//! Static file serving for the web UI.
//!
//! The page is embedded directly in the binary for easy deployment.

use axum::{http::header, response::IntoResponse};

/// CSS styles for the web UI.
pub const CSS: &str = r#"
:root {
    --bg-primary: #0f172a;
    --bg-secondary: #1e293b;
    --bg-tertiary: #334155;
    --text-primary: #f1f5f9;
    --text-secondary: #94a3b8;
    --accent: #3b82f6;
    --accent-hover: #2563eb;
    --success: #22c55e;
    --warning: #eab308;
    --error: #ef4444;
    --border: #475569;
}

* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
    background: var(--bg-primary);
    color: var(--text-primary);
    line-height: 1.6;
}

.container {
    max-width: 1100px;
    margin: 0 auto;
    padding: 20px;
}

header {
    background: var(--bg-secondary);
    border-bottom: 1px solid var(--border);
    padding: 15px 0;
    margin-bottom: 30px;
}

.logo {
    font-size: 1.5rem;
    font-weight: 700;
    color: var(--accent);
}

.logo span {
    color: var(--text-primary);
}

.card {
    background: var(--bg-secondary);
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 20px;
    margin-bottom: 20px;
}

.card h2 {
    font-size: 1.1rem;
    margin-bottom: 15px;
    color: var(--text-secondary);
}

.form-grid {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
    gap: 12px;
}

label {
    display: block;
    font-size: 0.85rem;
    color: var(--text-secondary);
    margin-bottom: 4px;
}

input {
    width: 100%;
    padding: 10px 12px;
    background: var(--bg-tertiary);
    border: 1px solid var(--border);
    border-radius: 6px;
    color: var(--text-primary);
    font-size: 0.95rem;
}

input:focus {
    outline: none;
    border-color: var(--accent);
}

.btn {
    padding: 10px 18px;
    background: var(--accent);
    color: white;
    border: none;
    border-radius: 6px;
    cursor: pointer;
    font-size: 0.9rem;
    transition: background 0.2s;
}

.btn:hover {
    background: var(--accent-hover);
}

.btn:disabled {
    opacity: 0.5;
    cursor: not-allowed;
}

.btn-secondary {
    background: var(--bg-tertiary);
}

.actions {
    display: flex;
    flex-wrap: wrap;
    gap: 10px;
    margin-top: 15px;
}

.query-row {
    display: flex;
    gap: 10px;
}

.status {
    margin-top: 12px;
    font-size: 0.9rem;
}

.status.ok { color: var(--success); }
.status.error { color: var(--error); }

.answer {
    white-space: pre-wrap;
    font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
    font-size: 0.9rem;
    background: var(--bg-primary);
    padding: 15px;
    border-radius: 6px;
    margin-bottom: 15px;
}

table {
    width: 100%;
    border-collapse: collapse;
    font-size: 0.9rem;
}

th, td {
    text-align: left;
    padding: 8px;
    border-bottom: 1px solid var(--border);
}

th {
    color: var(--text-secondary);
    font-weight: 600;
}

td a {
    color: var(--accent);
    text-decoration: none;
}

.meta {
    color: var(--text-secondary);
    font-size: 0.8rem;
    margin-top: 10px;
}

.hidden {
    display: none;
}
"#;

/// JavaScript for the web UI.
pub const JS: &str = r#"
// ADO Assistant web page

const STORAGE_KEY = 'ado-assistant-config';

const QUICK_ACTIONS = [
    ['Open bugs', 'Show me all open bugs'],
    ['My items', "What's assigned to me?"],
    ['Sprint status', 'Current sprint status'],
    ['Pull requests', 'Show active pull requests'],
    ['Recent builds', 'Show recent builds'],
    ['Critical issues', 'Show critical issues'],
    ['User stories', 'List user stories'],
    ['Completed this week', 'What was completed this week?'],
];

const $ = (id) => document.getElementById(id);

document.addEventListener('DOMContentLoaded', init);

function init() {
    loadConfig();

    const actions = $('quick-actions');
    QUICK_ACTIONS.forEach(([label, text]) => {
        const btn = document.createElement('button');
        btn.className = 'btn btn-secondary';
        btn.textContent = label;
        btn.addEventListener('click', () => {
            $('query-text').value = text;
            runQuery();
        });
        actions.appendChild(btn);
    });

    $('save-config').addEventListener('click', () => {
        saveConfig();
        setStatus('config-status', 'Saved', true);
    });
    $('test-connection').addEventListener('click', testConnection);
    $('run-query').addEventListener('click', runQuery);
    $('query-text').addEventListener('keydown', (e) => {
        if (e.key === 'Enter') runQuery();
    });
}

function readConfig() {
    return {
        organization: $('organization').value.trim(),
        project: $('project').value.trim(),
        token: $('token').value.trim(),
    };
}

function loadConfig() {
    try {
        const saved = JSON.parse(localStorage.getItem(STORAGE_KEY) || '{}');
        $('organization').value = saved.organization || '';
        $('project').value = saved.project || '';
        $('token').value = saved.token || '';
    } catch (e) {
        localStorage.removeItem(STORAGE_KEY);
    }
}

function saveConfig() {
    localStorage.setItem(STORAGE_KEY, JSON.stringify(readConfig()));
}

function setStatus(id, message, ok) {
    const el = $(id);
    el.textContent = message;
    el.className = 'status ' + (ok ? 'ok' : 'error');
}

async function postJson(path, body) {
    const response = await fetch(path, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body),
    });
    const data = await response.json();
    return { ok: response.ok, data };
}

async function testConnection() {
    saveConfig();
    setStatus('config-status', 'Testing...', true);
    try {
        const { data } = await postJson('/test-connection', readConfig());
        setStatus('config-status', data.message, data.ok);
    } catch (e) {
        setStatus('config-status', 'Service unreachable: ' + e.message, false);
    }
}

async function runQuery() {
    const text = $('query-text').value.trim();
    if (!text) return;

    const button = $('run-query');
    button.disabled = true;
    setStatus('query-status', 'Running...', true);
    $('results').classList.add('hidden');

    try {
        const { ok, data } = await postJson('/query', { ...readConfig(), text });
        if (!ok) {
            setStatus('query-status', data.error || 'Query failed', false);
            return;
        }
        setStatus('query-status', '', true);
        renderResult(data);
    } catch (e) {
        setStatus('query-status', 'Service unreachable: ' + e.message, false);
    } finally {
        button.disabled = false;
    }
}

function escapeHtml(text) {
    const div = document.createElement('div');
    div.textContent = text == null ? '' : String(text);
    return div.innerHTML;
}

function renderResult(result) {
    $('answer').textContent = result.answer;

    const rows = result.items.map((item) => {
        const title = item.url
            ? `<a href="${escapeHtml(item.url)}" target="_blank" rel="noopener">${escapeHtml(item.title)}</a>`
            : escapeHtml(item.title);
        return `<tr>
            <td>${item.id}</td>
            <td>${title}</td>
            <td>${escapeHtml(item.kind)}</td>
            <td>${escapeHtml(item.state)}</td>
            <td>${escapeHtml(item.assigned_to || '')}</td>
            <td>${item.priority == null ? '' : item.priority}</td>
        </tr>`;
    });
    $('items').innerHTML = rows.join('');
    $('items-table').classList.toggle('hidden', result.items.length === 0);

    $('meta').textContent =
        `intent: ${result.intent} (${result.source}) | matches: ${result.count} | ` +
        `api calls: ${result.stats.api_calls} | ${result.stats.execution_time_ms} ms`;

    $('results').classList.remove('hidden');
}
"#;

/// HTML template for the web UI.
pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>ADO Assistant</title>
    <link rel="stylesheet" href="/ui/style.css">
</head>
<body>
    <header>
        <div class="container">
            <div class="logo">ADO<span>Assistant</span></div>
        </div>
    </header>

    <main class="container">
        <section class="card">
            <h2>Connection</h2>
            <div class="form-grid">
                <div>
                    <label for="organization">Organization</label>
                    <input id="organization" placeholder="contoso">
                </div>
                <div>
                    <label for="project">Project</label>
                    <input id="project" placeholder="Fabrikam Fiber">
                </div>
                <div>
                    <label for="token">Personal access token</label>
                    <input id="token" type="password" autocomplete="off">
                </div>
            </div>
            <div class="actions">
                <button class="btn" id="save-config">Save</button>
                <button class="btn btn-secondary" id="test-connection">Test connection</button>
            </div>
            <div class="status" id="config-status"></div>
        </section>

        <section class="card">
            <h2>Ask a question</h2>
            <div class="query-row">
                <input id="query-text" placeholder="Show me all open bugs">
                <button class="btn" id="run-query">Ask</button>
            </div>
            <div class="actions" id="quick-actions"></div>
            <div class="status" id="query-status"></div>
        </section>

        <section class="card hidden" id="results">
            <h2>Results</h2>
            <div class="answer" id="answer"></div>
            <table id="items-table">
                <thead>
                    <tr><th>ID</th><th>Title</th><th>Type</th><th>State</th><th>Assigned</th><th>Priority</th></tr>
                </thead>
                <tbody id="items"></tbody>
            </table>
            <div class="meta" id="meta"></div>
        </section>
    </main>

    <script src="/ui/app.js"></script>
</body>
</html>
"#;

/// Serve the main HTML page.
pub async fn serve_index() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        INDEX_HTML,
    )
}

/// Serve CSS styles.
pub async fn serve_css() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        CSS,
    )
}

/// Serve JavaScript.
pub async fn serve_js() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        JS,
    )
}
