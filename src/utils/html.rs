use crate::models::{ChartType, PageContext, SeriesFunction};

/// Escape text for use inside HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn chart_type_options() -> String {
    [ChartType::Line, ChartType::Bar]
        .iter()
        .map(|t| format!(r#"<option value="{0}">{0}</option>"#, t.as_str()))
        .collect::<Vec<_>>()
        .join("\n                ")
}

fn series_options() -> String {
    SeriesFunction::ALL
        .iter()
        .map(|f| {
            let selected = if *f == SeriesFunction::Daily { " selected" } else { "" };
            format!(r#"<option value="{}"{}>{}</option>"#, f.api_name(), selected, f.label())
        })
        .collect::<Vec<_>>()
        .join("\n                ")
}

/// Render the form page, with the flash message and chart when present
pub fn render_page(context: &PageContext) -> String {
    let flash = context
        .flash
        .as_deref()
        .map(|message| format!(r#"<div class="flash error">{}</div>"#, escape_html(message)))
        .unwrap_or_default();

    let chart = match &context.chart {
        Some(view) => {
            let skipped = if view.skipped > 0 {
                format!(
                    r#"<p class="note">{} malformed entries were skipped.</p>"#,
                    view.skipped
                )
            } else {
                String::new()
            };
            format!(
                r#"<section class="chart">
        <h2>{symbol}: {start} to {end}</h2>
        <object type="image/svg+xml" data="{url}">
            <img src="{url}" alt="{symbol} Stock Data">
        </object>
        {skipped}
    </section>"#,
                symbol = escape_html(&view.symbol),
                start = view.start.format("%Y-%m-%d"),
                end = view.end.format("%Y-%m-%d"),
                url = escape_html(&view.chart_url),
                skipped = skipped,
            )
        }
        None => String::new(),
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Stock Data Visualizer</title>
    <style>
        body {{ font-family: sans-serif; margin: 2rem auto; max-width: 1100px; color: #222; }}
        form {{ display: flex; flex-wrap: wrap; gap: 1rem; align-items: flex-end; }}
        label {{ display: flex; flex-direction: column; font-size: 0.9rem; }}
        .flash.error {{ background: #fdecea; border: 1px solid #f5c2c0; padding: 0.75rem; margin-bottom: 1rem; }}
        .chart object {{ width: 100%; }}
        .note {{ color: #666; font-size: 0.85rem; }}
    </style>
</head>
<body>
    <h1>Stock Data Visualizer</h1>
    {flash}
    <form method="post" action="/visualize">
        <label>Stock symbol
            <input type="text" name="symbol" required>
        </label>
        <label>Chart type
            <select name="chart_type">
                {chart_types}
            </select>
        </label>
        <label>Time series
            <select name="time_series">
                {series}
            </select>
        </label>
        <label>Start date
            <input type="date" name="start_date" required>
        </label>
        <label>End date
            <input type="date" name="end_date" required>
        </label>
        <button type="submit">Visualize</button>
    </form>
    {chart}
</body>
</html>
"##,
        flash = flash,
        chart_types = chart_type_options(),
        series = series_options(),
        chart = chart,
    )
}
