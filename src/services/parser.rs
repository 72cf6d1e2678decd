// src/services/parser.rs
use serde_json::Value;

use crate::errors::LeafscanError;
use crate::models::{CareGuide, PlantIdentification};

/// Turn a raw completion into a validated identification, or the matching
/// failure. The model is asked for bare JSON but routinely wraps it in
/// markdown fences anyway.
pub fn parse_identification(completion: &str) -> Result<PlantIdentification, LeafscanError> {
    let json_str = extract_json(completion);

    let data: Value = serde_json::from_str(&json_str)
        .map_err(|e| LeafscanError::MalformedResponse(e.to_string()))?;

    // The prompt declares {"error": "..."} as the shape for unidentifiable
    // images; that is a domain outcome, not a parse failure.
    if let Some(message) = data["error"].as_str() {
        return Err(LeafscanError::Unidentified(message.to_string()));
    }

    let name = data["name"].as_str().unwrap_or("").trim().to_string();
    let scientific_name = data["scientificName"]
        .as_str()
        .unwrap_or("")
        .trim()
        .to_string();
    if name.is_empty() || scientific_name.is_empty() {
        return Err(LeafscanError::IncompleteData(
            "name and scientificName are required".to_string(),
        ));
    }

    let care = &data["care"];
    Ok(PlantIdentification {
        name,
        scientific_name,
        common_names: data["commonNames"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default(),
        family: data["family"].as_str().unwrap_or("").to_string(),
        description: data["description"].as_str().unwrap_or("").to_string(),
        care: CareGuide {
            light: care["light"].as_str().unwrap_or("").to_string(),
            water: care["water"].as_str().unwrap_or("").to_string(),
            humidity: care["humidity"].as_str().unwrap_or("").to_string(),
            temperature: care["temperature"].as_str().unwrap_or("").to_string(),
            soil: care["soil"].as_str().unwrap_or("").to_string(),
        },
        growth_rate: data["growthRate"].as_str().map(|s| s.to_string()),
        // Absent or null means non-toxic.
        toxicity: data["toxicity"].as_str().map(|s| s.to_string()),
        confidence: parse_confidence(&data["confidence"]),
    })
}

// Absent confidence stays absent; out-of-range values are clamped to 0-100.
fn parse_confidence(value: &Value) -> Option<u8> {
    value.as_f64().map(|c| c.clamp(0.0, 100.0).round() as u8)
}

/// Strip markdown code fences around the completion; fall back to the
/// outermost JSON object when the reply carries prose around it.
fn extract_json(text: &str) -> String {
    let trimmed = text.trim();

    if let Some(start) = trimmed.find("```json") {
        let after_marker = &trimmed[start + 7..];
        if let Some(end) = after_marker.find("```") {
            return after_marker[..end].trim().to_string();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after_marker = &trimmed[start + 3..];
        if let Some(end) = after_marker.find("```") {
            return after_marker[..end].trim().to_string();
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if end > start {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_REPLY: &str = r#"{
        "name": "Monstera Deliciosa",
        "commonNames": ["Swiss Cheese Plant", "Split-Leaf Philodendron"],
        "scientificName": "Monstera deliciosa",
        "family": "Araceae",
        "description": "A climbing evergreen with fenestrated leaves.",
        "care": {
            "light": "Bright, indirect light",
            "water": "Water when top inch of soil is dry",
            "humidity": "Above 60%",
            "temperature": "18-27C",
            "soil": "Chunky, well-draining aroid mix"
        },
        "growthRate": "Fast",
        "toxicity": "Toxic to cats and dogs if ingested",
        "confidence": 92
    }"#;

    #[test]
    fn full_reply_parses_to_result() {
        let result = parse_identification(FULL_REPLY).unwrap();
        assert_eq!(result.name, "Monstera Deliciosa");
        assert_eq!(result.scientific_name, "Monstera deliciosa");
        assert_eq!(result.common_names.len(), 2);
        assert_eq!(result.care.humidity, "Above 60%");
        assert_eq!(result.confidence, Some(92));
        assert!(result.toxicity.is_some());
    }

    #[test]
    fn fenced_reply_parses_identically() {
        let fenced = format!("```json\n{}\n```", FULL_REPLY);
        let plain_fenced = format!("```\n{}\n```", FULL_REPLY);
        let unfenced = parse_identification(FULL_REPLY).unwrap();
        assert_eq!(
            parse_identification(&fenced).unwrap().name,
            unfenced.name
        );
        assert_eq!(
            parse_identification(&plain_fenced).unwrap().confidence,
            unfenced.confidence
        );
    }

    #[test]
    fn prose_around_object_is_tolerated() {
        let reply = format!("Here is the identification:\n{}\nHope that helps!", FULL_REPLY);
        assert_eq!(
            parse_identification(&reply).unwrap().family,
            "Araceae"
        );
    }

    #[test]
    fn optional_fields_default_sensibly() {
        let reply = r#"{"name": "Aloe Vera", "scientificName": "Aloe barbadensis", "toxicity": null}"#;
        let result = parse_identification(reply).unwrap();
        assert!(result.toxicity.is_none());
        assert!(result.confidence.is_none());
        assert!(result.growth_rate.is_none());
        assert!(result.common_names.is_empty());
        assert_eq!(result.care.light, "");
    }

    #[test]
    fn confidence_is_clamped() {
        let reply = r#"{"name": "A", "scientificName": "B", "confidence": 150}"#;
        assert_eq!(parse_identification(reply).unwrap().confidence, Some(100));
        let reply = r#"{"name": "A", "scientificName": "B", "confidence": -3}"#;
        assert_eq!(parse_identification(reply).unwrap().confidence, Some(0));
    }

    #[test]
    fn missing_required_fields_is_incomplete_data() {
        let no_scientific = r#"{"name": "Mystery plant"}"#;
        assert!(matches!(
            parse_identification(no_scientific),
            Err(LeafscanError::IncompleteData(_))
        ));
        let blank_name = r#"{"name": "  ", "scientificName": "Ficus lyrata"}"#;
        assert!(matches!(
            parse_identification(blank_name),
            Err(LeafscanError::IncompleteData(_))
        ));
    }

    #[test]
    fn error_field_is_a_domain_outcome() {
        let reply =
            r#"{"error": "Could not identify plant. Please upload a clearer image of a plant."}"#;
        match parse_identification(reply) {
            Err(LeafscanError::Unidentified(message)) => assert_eq!(
                message,
                "Could not identify plant. Please upload a clearer image of a plant."
            ),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn truncated_reply_is_malformed() {
        let reply = r#"{"name": "Monstera Deli"#;
        assert!(matches!(
            parse_identification(reply),
            Err(LeafscanError::MalformedResponse(_))
        ));
    }
}
