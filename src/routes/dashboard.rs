use axum::{
    http::header,
    response::{Html, IntoResponse},
};

/// Dashboard page. It holds no logic of its own: every control posts to the
/// session API and the page re-renders whatever view comes back.
pub async fn dashboard() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "public, max-age=60")],
        Html(DASHBOARD_HTML),
    )
}

const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Sensor Monitoring</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/uplot@1.6.31/dist/uPlot.min.css">
    <style>
        :root {
            --bg: #f8fafc;
            --surface: #ffffff;
            --border: #e2e8f0;
            --text: #1e293b;
            --muted: #64748b;
            --accent: #2563eb;
            --danger: #dc2626;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: system-ui, -apple-system, sans-serif; background: var(--bg); color: var(--text); min-height: 100vh; }

        .container {
            max-width: 1200px;
            margin: 0 auto;
            padding: 1.5rem;
        }
        header { margin-bottom: 1.5rem; }
        h1 { font-size: 1.25rem; font-weight: 600; }
        h2 { font-size: 1rem; font-weight: 600; margin-bottom: 0.75rem; }

        .controls {
            display: flex;
            gap: 0.75rem;
            flex-wrap: wrap;
            align-items: center;
            background: var(--surface);
            border: 1px solid var(--border);
            border-radius: 0.5rem;
            padding: 1rem;
            margin-bottom: 1rem;
        }
        select, input, button {
            padding: 0.5rem 0.75rem;
            border: 1px solid var(--border);
            border-radius: 0.375rem;
            font-size: 0.875rem;
            background: var(--surface);
        }
        button {
            cursor: pointer;
            background: var(--accent);
            border-color: var(--accent);
            color: white;
        }
        button:disabled, select:disabled, input:disabled { opacity: 0.5; cursor: not-allowed; }

        .error {
            border: 1px solid var(--danger);
            color: var(--danger);
            border-radius: 0.5rem;
            padding: 0.75rem 1rem;
            margin-bottom: 1rem;
        }
        .status, .no-data {
            color: var(--muted);
            text-align: center;
            padding: 2rem;
        }
        .panel {
            background: var(--surface);
            border: 1px solid var(--border);
            border-radius: 0.5rem;
            padding: 1rem;
            margin-bottom: 1rem;
        }
        table { width: 100%; border-collapse: collapse; font-size: 0.875rem; }
        th, td { text-align: left; padding: 0.4rem 0.5rem; border-bottom: 1px solid var(--border); }
        th { color: var(--muted); font-weight: 500; }
        .hidden { display: none; }
    </style>
</head>
<body>
<div class="container">
    <header><h1>Sensor Monitoring</h1></header>

    <div class="controls">
        <select id="sensor"><option value="">-- Select a sensor --</option></select>
        <input id="date-from" type="datetime-local" step="1" placeholder="From">
        <input id="date-to" type="datetime-local" step="1" placeholder="To">
        <button id="refresh">Refresh</button>
    </div>

    <div id="error" class="error hidden"></div>
    <div id="status" class="status hidden">Loading...</div>

    <div id="data" class="hidden">
        <div class="panel">
            <h2 id="tag-name"></h2>
            <div id="chart"></div>
            <div id="chart-empty" class="no-data hidden"></div>
        </div>
        <div class="panel">
            <table>
                <thead><tr><th>Time</th><th>Value</th><th>Quality</th><th>Record type</th></tr></thead>
                <tbody id="rows"></tbody>
            </table>
        </div>
    </div>
</div>

<script src="https://cdn.jsdelivr.net/npm/uplot@1.6.31/dist/uPlot.iife.min.js"></script>
<script>
const $ = id => document.getElementById(id);
let plot = null;
let catalogShown = false;

async function call(method, url, body) {
    const opts = { method, headers: { 'Content-Type': 'application/json' } };
    if (body !== undefined) opts.body = JSON.stringify(body);
    const res = await fetch(url, opts);
    const json = await res.json();
    if (!res.ok) throw new Error(json.error || res.status);
    return json;
}

function setBusy(busy) {
    ['sensor', 'date-from', 'date-to'].forEach(id => $(id).disabled = busy);
    $('refresh').disabled = busy || !$('sensor').value;
    $('refresh').textContent = busy ? 'Loading...' : 'Refresh';
    $('status').classList.toggle('hidden', !busy);
}

function showError(message) {
    $('error').textContent = message || '';
    $('error').classList.toggle('hidden', !message);
}

function renderCatalog(view) {
    if (catalogShown || view.phase === 'loading') return;
    const select = $('sensor');
    view.sensors.forEach(s => {
        const opt = document.createElement('option');
        opt.value = s.nodeid;
        opt.textContent = s.tagname;
        select.appendChild(opt);
    });
    catalogShown = true;
}

function renderChart(chart) {
    if (plot) { plot.destroy(); plot = null; }
    const empty = chart.state === 'no_data';
    $('chart-empty').classList.toggle('hidden', !empty);
    if (empty) {
        $('chart-empty').textContent = chart.message;
        return;
    }
    const xs = chart.labels.map((_, i) => i);
    const ys = chart.values.map(v => typeof v === 'number' ? v : null);
    plot = new uPlot({
        width: $('chart').clientWidth || 800,
        height: 320,
        scales: { x: { time: false } },
        axes: [
            { stroke: '#64748b', values: (u, vals) => vals.map(i => chart.labels[i] || '') },
            { stroke: '#64748b' },
        ],
        series: [{}, { label: chart.label, stroke: '#2563eb', width: 1.5, spanGaps: true }],
    }, [xs, ys], $('chart'));
}

function renderTable(rows) {
    const body = $('rows');
    body.innerHTML = '';
    rows.forEach(row => {
        const tr = document.createElement('tr');
        [row.time, row.value, row.quality, row.record_type || ''].forEach(text => {
            const td = document.createElement('td');
            td.textContent = text;
            tr.appendChild(td);
        });
        body.appendChild(tr);
    });
}

// Server bounds look like 2024-01-01T08:00:00[.fff]; inputs take up to seconds.
function renderBound(id, value) {
    const input = $(id);
    if (document.activeElement === input) return;
    input.value = value ? value.slice(0, 19) : '';
}

function render(view) {
    renderCatalog(view);
    setBusy(view.controls_disabled);
    showError(view.error);
    $('sensor').value = view.selected || '';
    renderBound('date-from', view.date_from);
    renderBound('date-to', view.date_to);
    $('refresh').disabled = view.controls_disabled || !view.selected;

    const hasData = !!view.chart;
    $('data').classList.toggle('hidden', !hasData);
    if (hasData) {
        $('tag-name').textContent = view.tag_name || '';
        renderChart(view.chart);
        renderTable(view.table);
    }
}

async function run(method, url, body) {
    setBusy(true);
    try {
        render(await call(method, url, body));
    } catch (e) {
        showError(e.message);
        setBusy(false);
    }
}

async function poll() {
    const view = await call('GET', '/dashboard/state');
    render(view);
    if (view.phase === 'loading') setTimeout(poll, 500);
}

$('sensor').addEventListener('change', e =>
    run('POST', '/dashboard/selection', { nodeid: e.target.value || null }));

['date-from', 'date-to'].forEach(id => $(id).addEventListener('change', () =>
    call('PUT', '/dashboard/range', { date_from: $('date-from').value, date_to: $('date-to').value })
        .catch(e => showError(e.message))));

$('refresh').addEventListener('click', () => run('POST', '/dashboard/refresh'));

poll();
</script>
</body>
</html>
"##;
