//! Gemini `generateContent` client
//!
//! Request/response shapes are shared; the transport differs per target:
//! blocking `ureq` natively, `fetch` in the browser.

use serde::{Deserialize, Serialize};

use super::{CommentaryConfig, CommentaryError, EMPTY_COMMENTARY, build_prompt};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Endpoint URL for a model
pub fn endpoint(model: &str) -> String {
    format!("{}/{}:generateContent", API_BASE, model)
}

/// Request body asking for a remark about `score`
pub fn request_body(score: u32, config: &CommentaryConfig) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: build_prompt(score, config),
            }],
        }],
        generation_config: GenerationConfig {
            temperature: config.temperature,
        },
    }
}

/// Text of the first candidate, or the empty-response line
pub fn response_text(response: &GenerateResponse) -> String {
    let text: String = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        EMPTY_COMMENTARY.to_string()
    } else {
        text.trim().to_string()
    }
}

/// Parse a raw response body
pub fn parse_response(body: &str) -> Result<String, CommentaryError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| CommentaryError::Malformed(e.to_string()))?;
    Ok(response_text(&response))
}

/// Fetch commentary, blocking the calling thread
#[cfg(not(target_arch = "wasm32"))]
pub fn fetch_blocking(score: u32, config: &CommentaryConfig) -> Result<String, CommentaryError> {
    let key = config.credentials()?;
    let body = request_body(score, config);

    let response = ureq::post(&endpoint(&config.model))
        .set("x-goog-api-key", key)
        .set("User-Agent", "gemini-flappy")
        .send_json(&body)
        .map_err(|e| match e {
            ureq::Error::Status(code, _) => CommentaryError::Status(code),
            ureq::Error::Transport(t) => CommentaryError::Transport(t.to_string()),
        })?;

    let body = response
        .into_string()
        .map_err(|e| CommentaryError::Transport(e.to_string()))?;
    parse_response(&body)
}

/// Fetch commentary with the browser's `fetch`
#[cfg(target_arch = "wasm32")]
pub async fn fetch(score: u32, config: &CommentaryConfig) -> Result<String, CommentaryError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    fn transport(e: JsValue) -> CommentaryError {
        CommentaryError::Transport(format!("{:?}", e))
    }

    let key = config.credentials()?;
    let body = serde_json::to_string(&request_body(score, config))
        .map_err(|e| CommentaryError::Malformed(e.to_string()))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));

    let request =
        Request::new_with_str_and_init(&endpoint(&config.model), &opts).map_err(transport)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(transport)?;
    request.headers().set("x-goog-api-key", key).map_err(transport)?;

    let window = web_sys::window().ok_or_else(|| CommentaryError::Transport("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(transport)?
        .dyn_into()
        .map_err(transport)?;

    if !response.ok() {
        return Err(CommentaryError::Status(response.status()));
    }

    let text = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?
        .as_string()
        .unwrap_or_default();
    parse_response(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let config = CommentaryConfig::default();
        let json = serde_json::to_value(request_body(7, &config)).unwrap();

        let text = json["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("score of 7"));
        assert!((json["generationConfig"]["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            endpoint("gemini-3-flash-preview"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let body = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "Gravity " }, { "text": "won again." } ] } },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ]
        }"#;
        assert_eq!(parse_response(body).unwrap(), "Gravity won again.");
    }

    #[test]
    fn test_parse_response_empty() {
        assert_eq!(parse_response(r#"{"candidates": []}"#).unwrap(), EMPTY_COMMENTARY);
        assert_eq!(parse_response("{}").unwrap(), EMPTY_COMMENTARY);
        assert_eq!(
            parse_response(r#"{"candidates": [{}]}"#).unwrap(),
            EMPTY_COMMENTARY
        );
    }

    #[test]
    fn test_parse_response_malformed() {
        assert!(matches!(
            parse_response("<html>oops</html>"),
            Err(CommentaryError::Malformed(_))
        ));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_fetch_without_key_fails_fast() {
        let config = CommentaryConfig::default();
        assert_eq!(
            fetch_blocking(3, &config),
            Err(CommentaryError::MissingApiKey)
        );
    }
}
