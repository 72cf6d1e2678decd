// src/services/prompt.rs
use serde_json::{Value, json};

/// Fixed instruction sent with every image. Only the image bytes vary per
/// identification attempt.
pub const IDENTIFY_PROMPT: &str = r#"Identify this plant and provide detailed care information.
Respond ONLY with a JSON object in exactly this format, with no other text:
{
    "name": "Common name of the plant",
    "commonNames": ["Other common name 1", "Other common name 2"],
    "scientificName": "Latin binomial name",
    "family": "Botanical family",
    "description": "A short description of the plant",
    "care": {
        "light": "Light requirements",
        "water": "Watering requirements",
        "humidity": "Humidity requirements",
        "temperature": "Temperature range",
        "soil": "Soil preferences"
    },
    "growthRate": "Slow, moderate or fast",
    "toxicity": "Toxicity information, or null if non-toxic",
    "confidence": 92
}
The confidence field is an integer from 0 to 100.
If the image does not show an identifiable plant, respond instead with:
{"error": "Could not identify plant. Please upload a clearer image of a plant."}"#;

// Fixed generation parameters, biased toward deterministic, well-formed
// structured output with enough room for a full JSON object.
const TEMPERATURE: f64 = 0.4;
const TOP_K: u32 = 32;
const TOP_P: f64 = 1.0;
const MAX_OUTPUT_TOKENS: u32 = 2048;

/// Gemini `generateContent` request body for one identification attempt.
pub fn build_request(image_base64: &str, mime_type: &str) -> Value {
    json!({
        "contents": [{
            "parts": [
                {
                    "text": IDENTIFY_PROMPT
                },
                {
                    "inline_data": {
                        "mime_type": mime_type,
                        "data": image_base64
                    }
                }
            ]
        }],
        "generationConfig": {
            "temperature": TEMPERATURE,
            "topK": TOP_K,
            "topP": TOP_P,
            "maxOutputTokens": MAX_OUTPUT_TOKENS
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_embeds_image_and_mime() {
        let body = build_request("QUJD", "image/png");
        let inline = &body["contents"][0]["parts"][1]["inline_data"];
        assert_eq!(inline["data"], "QUJD");
        assert_eq!(inline["mime_type"], "image/png");
    }

    #[test]
    fn generation_parameters_are_pinned() {
        let body = build_request("QUJD", "image/jpeg");
        let config = &body["generationConfig"];
        assert_eq!(config["temperature"], 0.4);
        assert_eq!(config["topK"], 32);
        assert_eq!(config["topP"], 1.0);
        assert_eq!(config["maxOutputTokens"], 2048);
    }

    #[test]
    fn instruction_declares_shape_and_fallback() {
        let body = build_request("QUJD", "image/jpeg");
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("\"scientificName\""));
        assert!(text.contains("\"care\""));
        assert!(text.contains(r#"{"error":"#));
    }
}
