//! Server-rendered prediction form and result card.

use shared::{PredictionResult, TABULAR_FEATURE_NAMES};

pub enum PageView<'a> {
    Blank,
    Result(&'a PredictionResult),
    Error(&'a str),
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
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

fn field_label(name: &str) -> String {
    match name {
        "pH" => "pH".to_string(),
        _ => {
            let spaced = name.replace('_', " ");
            let mut chars = spaced.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => spaced,
            }
        }
    }
}

fn feature_inputs() -> String {
    TABULAR_FEATURE_NAMES
        .iter()
        .map(|name| {
            format!(
                r#"
            <label class="field">
                <span>{label}</span>
                <input type="number" step="any" name="{name}" id="{name}">
            </label>"#,
                label = field_label(name),
                name = name
            )
        })
        .collect()
}

fn optional_score(value: Option<i32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn result_card(result: &PredictionResult) -> String {
    format!(
        r#"
        <section class="result {severity}">
            <h2>{label}</h2>
            <p class="quality">Quality score: <strong>{quality}</strong></p>
            <dl>
                <dt>Mode</dt><dd>{mode}</dd>
                <dt>Confidence</dt><dd>{confidence}%</dd>
                <dt>Data score</dt><dd>{data}</dd>
                <dt>Image score</dt><dd>{image}</dd>
            </dl>
        </section>"#,
        severity = result.label.severity(),
        label = result.label,
        quality = result.final_quality,
        mode = result.mode,
        confidence = result.confidence,
        data = optional_score(result.data_quality),
        image = optional_score(result.image_quality),
    )
}

pub fn render_page(view: &PageView<'_>) -> String {
    let outcome = match view {
        PageView::Blank => String::new(),
        PageView::Result(result) => result_card(result),
        PageView::Error(message) => format!(
            r#"
        <section class="result danger error">
            <p>{}</p>
        </section>"#,
            escape_html(message)
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>BrewCheck Quality Predictor</title>
    <link rel="stylesheet" href="/static/brewcheck.css">
</head>
<body>
    <main class="container">
        <h1>BrewCheck Quality Predictor</h1>
        <p class="subtitle">Enter lab measurements, upload a photo, or both.</p>
        <form action="/predict" method="post" enctype="multipart/form-data">
            <fieldset class="features">
                <legend>Physicochemical measurements</legend>{inputs}
            </fieldset>
            <fieldset>
                <legend>Photo</legend>
                <input type="file" name="image" accept="image/*">
            </fieldset>
            <button type="submit">Predict quality</button>
        </form>{outcome}
    </main>
</body>
</html>
"#,
        inputs = feature_inputs(),
        outcome = outcome,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{PredictionMode, QualityLabel};

    #[test]
    fn blank_page_has_every_feature_input() {
        let html = render_page(&PageView::Blank);
        for name in TABULAR_FEATURE_NAMES {
            assert!(html.contains(&format!(r#"name="{}""#, name)), "missing {}", name);
        }
        assert!(html.contains(r#"name="image""#));
        assert!(!html.contains("class=\"result"));
    }

    #[test]
    fn result_card_shows_label_severity_and_scores() {
        let result = PredictionResult {
            final_quality: 6,
            label: QualityLabel::Average,
            mode: PredictionMode::DataAndImage,
            confidence: 85,
            data_quality: Some(8),
            image_quality: Some(3),
        };
        let html = render_page(&PageView::Result(&result));
        assert!(html.contains("result warning"));
        assert!(html.contains("Average Quality"));
        assert!(html.contains("Data + Image"));
        assert!(html.contains("85%"));
    }

    #[test]
    fn error_messages_are_escaped() {
        let html = render_page(&PageView::Error("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn labels_are_humanized() {
        assert_eq!(field_label("free_sulfur_dioxide"), "Free sulfur dioxide");
        assert_eq!(field_label("pH"), "pH");
    }
}
