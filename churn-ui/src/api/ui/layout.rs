//! Shared page shell: header, tabs, banners

use crate::api::buildinfo::BuildInfo;
use crate::view::BannerStyle;

/// Top-level tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    DataInput,
    PredictionResult,
}

/// Styled message shown above the page content
#[derive(Debug, Clone)]
pub struct Banner {
    pub style: BannerStyle,
    pub message: String,
}

impl Banner {
    pub fn new(style: BannerStyle, message: impl Into<String>) -> Self {
        Self {
            style,
            message: message.into(),
        }
    }
}

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
        }
        header {
            background-color: #2a2a2a;
            border-bottom: 1px solid #3a3a3a;
            padding: 20px;
        }
        .header-content { display: flex; justify-content: space-between; align-items: center; }
        .header-right {
            text-align: right;
            font-size: 14px;
            color: #888;
            font-family: 'Courier New', monospace;
            line-height: 1.2;
        }
        h1 { font-size: 26px; color: #4a9eff; }
        h2 { color: #4a9eff; margin: 10px 0 15px; }
        nav.tabs { display: flex; gap: 4px; padding: 0 20px; border-bottom: 1px solid #3a3a3a; }
        nav.tabs a {
            padding: 10px 18px;
            color: #aaa;
            text-decoration: none;
            border-bottom: 3px solid transparent;
        }
        nav.tabs a.active { color: #fff; border-bottom-color: #4a9eff; }
        .content { padding: 20px; max-width: 1100px; }
        .banner { padding: 12px 16px; border-radius: 4px; margin-bottom: 16px; font-weight: 600; }
        .banner-info { background: #1e3a5f; color: #cfe3ff; }
        .banner-success { background: #0f3d2e; color: #9ff0c8; }
        .banner-warning { background: #4a3410; color: #ffd58a; }
        .banner-error { background: #4a1515; color: #ffb3b3; }
        .field-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 12px 40px; }
        .field label { display: block; font-size: 14px; color: #aaa; margin-bottom: 4px; }
        .field select, .field input {
            width: 100%;
            padding: 8px;
            background: #2a2a2a;
            color: #e0e0e0;
            border: 1px solid #3a3a3a;
            border-radius: 4px;
        }
        .field.invalid select, .field.invalid input { border-color: #ef4444; }
        button {
            margin-top: 24px;
            padding: 10px 20px;
            background: #4a9eff;
            color: white;
            border: none;
            border-radius: 4px;
            font-weight: 600;
            cursor: pointer;
        }
        button:hover { background: #3a8eef; }
"#;

fn tab_link(href: &str, label: &str, active: bool) -> String {
    format!(
        r#"<a href="{}"{}>{}</a>"#,
        href,
        if active { r#" class="active""# } else { "" },
        label
    )
}

/// Render a complete page
pub fn page(tab: Tab, banners: &[Banner], content: &str) -> String {
    let build = BuildInfo::current();
    let short_hash: String = build.git_hash.chars().take(8).collect();

    let banners: String = banners
        .iter()
        .map(|b| {
            format!(
                r#"<div class="{}">{}</div>"#,
                b.style.css_class(),
                escape_html(&b.message)
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Telco Churn Prediction</title>
    <style>{style}</style>
</head>
<body>
    <header>
        <div class="header-content">
            <h1>📞 Telco Customer Churn Prediction</h1>
            <div class="header-right">
                <div>churn-ui v{version}</div>
                <div>{hash} ({profile})</div>
            </div>
        </div>
    </header>
    <nav class="tabs">
        {input_tab}
        {result_tab}
    </nav>
    <div class="content">
        {banners}
        {content}
    </div>
</body>
</html>"#,
        style = STYLE,
        version = escape_html(&build.version),
        hash = escape_html(&short_hash),
        profile = escape_html(&build.build_profile),
        input_tab = tab_link("/", "📥 Data Input", tab == Tab::DataInput),
        result_tab = tab_link("/result", "📊 Prediction Result", tab == Tab::PredictionResult),
        banners = banners,
        content = content,
    )
}

/// Page shown when artifacts failed to load. No form is offered.
pub fn fatal_page(tab: Tab, message: &str) -> String {
    page(
        tab,
        &[Banner::new(BannerStyle::Error, message)],
        concat!(
            "<p>The prediction service is unavailable until the model artifacts ",
            "are fixed and the service is restarted.</p>"
        ),
    )
}
