use serde_json::Value;

/// A listing endpoint body: sometimes bare HTML, sometimes a JSON envelope.
///
/// Decoded once at the boundary so call sites never inspect the shape again.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamPayload {
    Html(String),
    Parsed(Value),
}

impl UpstreamPayload {
    /// Classify a raw response body.
    #[must_use]
    pub fn decode(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::Parsed(value),
            Err(_) => Self::Html(body.to_owned()),
        }
    }

    /// The HTML fragment carried by the payload, if any.
    ///
    /// JSON envelopes carry it as `result.html` or as a string `result`.
    #[must_use]
    pub fn html_fragment(&self) -> Option<&str> {
        let fragment = match self {
            Self::Html(html) => Some(html.as_str()),
            Self::Parsed(Value::String(html)) => Some(html.as_str()),
            Self::Parsed(value) => {
                let result = value.get("result")?;
                result
                    .as_str()
                    .or_else(|| result.get("html").and_then(Value::as_str))
            }
        };

        fragment.filter(|html| !html.trim().is_empty())
    }
}
