//! Data Input tab
//!
//! GET / renders the form, POST /predict runs the pipeline on the submitted
//! values and stores the result in the caller's session.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use churn_common::fields::{collect, FieldSpec, Widget, FIELDS};
use churn_common::infer;
use std::collections::HashMap;
use tracing::{info, warn};

use super::layout::{escape_html, fatal_page, page, Banner, Tab};
use crate::view::BannerStyle;
use crate::AppState;

pub const SUCCESS_MESSAGE: &str = "Prediction complete! Check the 'Prediction Result' tab.";

fn render_field(spec: &FieldSpec, value: &str, invalid: bool) -> String {
    let control = match spec.widget {
        Widget::Select { options } => {
            let options: String = options
                .iter()
                .map(|option| {
                    format!(
                        r#"<option value="{0}"{1}>{0}</option>"#,
                        escape_html(option),
                        if *option == value { " selected" } else { "" }
                    )
                })
                .collect();
            format!(
                r#"<select id="{0}" name="{0}">{1}</select>"#,
                spec.name, options
            )
        }
        Widget::Number { min, max, step, .. } => format!(
            concat!(
                r#"<input type="number" id="{0}" name="{0}" "#,
                r#"min="{1}" max="{2}" step="{3}" value="{4}" required>"#
            ),
            spec.name,
            min,
            max,
            step,
            escape_html(value)
        ),
    };

    format!(
        r#"<div class="field{}"><label for="{}">{}</label>{}</div>"#,
        if invalid { " invalid" } else { "" },
        spec.name,
        escape_html(spec.label),
        control
    )
}

/// Form markup pre-filled with `values`; missing entries show the default
fn render_form(values: &HashMap<String, String>, invalid_field: Option<&str>) -> String {
    let fields: String = FIELDS
        .iter()
        .map(|spec| {
            let value = values
                .get(spec.name)
                .cloned()
                .unwrap_or_else(|| spec.default_value());
            render_field(spec, &value, invalid_field == Some(spec.name))
        })
        .collect::<Vec<_>>()
        .join("\n            ");

    format!(
        r#"<h2>Enter Customer Details</h2>
        <form method="post" action="/predict">
            <div class="field-grid">
            {}
            </div>
            <button type="submit">Predict Churn</button>
        </form>"#,
        fields
    )
}

fn input_response(
    status: StatusCode,
    banners: &[Banner],
    values: &HashMap<String, String>,
    invalid_field: Option<&str>,
) -> Response {
    let html = page(Tab::DataInput, banners, &render_form(values, invalid_field));
    (status, Html(html)).into_response()
}

/// GET /
pub async fn input_page(State(state): State<AppState>) -> Response {
    match state.artifacts() {
        Ok(_) => input_response(StatusCode::OK, &[], &HashMap::new(), None),
        Err(message) => Html(fatal_page(Tab::DataInput, message)).into_response(),
    }
}

/// POST /predict
///
/// Only a successful run touches the session store. A browser without a
/// session gets one together with its first stored prediction.
pub async fn submit_prediction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(values): Form<HashMap<String, String>>,
) -> Response {
    let artifacts = match state.artifacts() {
        Ok(artifacts) => artifacts,
        Err(message) => {
            let html = fatal_page(Tab::DataInput, message);
            return (StatusCode::SERVICE_UNAVAILABLE, Html(html)).into_response();
        }
    };

    let record = match collect(&values) {
        Ok(record) => record,
        Err(e) => {
            info!(error = %e, "Form input rejected");
            let banner = Banner::new(BannerStyle::Error, format!("Invalid input: {}", e));
            return input_response(StatusCode::BAD_REQUEST, &[banner], &values, Some(e.field()));
        }
    };

    match infer(&record, artifacts) {
        Ok(result) => {
            let session = state.sessions.store_prediction(&headers, result).await;
            info!(
                session_id = %session.id,
                label = %result.label,
                probability = result.probability.value(),
                "Prediction stored"
            );
            let banner = Banner::new(BannerStyle::Success, SUCCESS_MESSAGE);
            session.apply(input_response(StatusCode::OK, &[banner], &values, None))
        }
        Err(e) => {
            warn!(error = %e, "Prediction failed");
            let banner = Banner::new(BannerStyle::Error, e.to_string());
            input_response(StatusCode::INTERNAL_SERVER_ERROR, &[banner], &values, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_has_every_field() {
        let html = render_form(&HashMap::new(), None);
        for spec in FIELDS.iter() {
            assert!(html.contains(&format!(r#"name="{}""#, spec.name)), "{}", spec.name);
        }
        assert!(html.contains("Predict Churn"));
    }

    #[test]
    fn test_defaults_selected() {
        let html = render_form(&HashMap::new(), None);
        assert!(html.contains(r#"<option value="Month-to-month" selected>"#));
        assert!(html.contains(r#"name="tenure" min="0" max="72" step="1" value="12""#));
    }

    #[test]
    fn test_submitted_values_kept_and_escaped() {
        let mut values = HashMap::new();
        values.insert("Contract".to_string(), "Two year".to_string());
        values.insert("tenure".to_string(), "\"><b>".to_string());
        let html = render_form(&values, Some("tenure"));
        assert!(html.contains(r#"<option value="Two year" selected>"#));
        assert!(html.contains("value=\"&quot;&gt;&lt;b&gt;\""));
        assert!(html.contains(r#"<div class="field invalid"><label for="tenure">"#));
    }
}
