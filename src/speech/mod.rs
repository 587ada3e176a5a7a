//! Voice input adapter.
//!
//! One-shot recognition of a single uploaded utterance via the hosted
//! speech-to-text REST API. The recognized text substitutes for typed input
//! for exactly the next submitted message; the client posts it through the
//! normal message endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::core::errors::ApiError;

const RECOGNITION_LANGUAGE: &str = "en-US";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RecognitionResponse {
    recognition_status: String,
    #[serde(default)]
    display_text: String,
}

#[derive(Clone)]
pub struct SpeechTranscriber {
    subscription_key: String,
    region: String,
    client: Client,
}

impl SpeechTranscriber {
    pub fn new(
        subscription_key: String,
        region: String,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::internal)?;
        Ok(Self {
            subscription_key,
            region,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "https://{}.stt.speech.microsoft.com/speech/recognition/conversation/cognitiveservices/v1?language={}",
            self.region, RECOGNITION_LANGUAGE
        )
    }

    /// Recognize a single WAV utterance. Returns the recognized text, or an
    /// empty string on no-match or cancellation.
    pub async fn recognize_once(&self, audio: Vec<u8>) -> Result<String, ApiError> {
        if audio.is_empty() {
            return Err(ApiError::BadRequest("empty audio payload".to_string()));
        }

        let res = self
            .client
            .post(self.endpoint())
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .header(
                "Content-Type",
                "audio/wav; codecs=audio/pcm; samplerate=16000",
            )
            .header("Accept", "application/json")
            .body(audio)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "speech recognition failed ({}): {}",
                status, text
            )));
        }

        let payload: RecognitionResponse = res
            .json()
            .await
            .map_err(|e| ApiError::Upstream(format!("speech recognition response: {}", e)))?;

        Ok(recognized_text(&payload))
    }
}

/// Map the service's result reason: only a successful recognition carries
/// text; no-match and cancellation degrade to an empty utterance.
fn recognized_text(payload: &RecognitionResponse) -> String {
    match payload.recognition_status.as_str() {
        "Success" => payload.display_text.clone(),
        status => {
            tracing::debug!("speech recognition returned {}", status);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_carries_text() {
        let payload = RecognitionResponse {
            recognition_status: "Success".to_string(),
            display_text: "What is the premium?".to_string(),
        };
        assert_eq!(recognized_text(&payload), "What is the premium?");
    }

    #[test]
    fn test_no_match_is_empty() {
        let payload = RecognitionResponse {
            recognition_status: "NoMatch".to_string(),
            display_text: String::new(),
        };
        assert_eq!(recognized_text(&payload), "");
    }

    #[test]
    fn test_response_deserialization() {
        let payload: RecognitionResponse = serde_json::from_str(
            r#"{"RecognitionStatus":"Success","DisplayText":"hello","Offset":0,"Duration":100}"#,
        )
        .unwrap();
        assert_eq!(payload.recognition_status, "Success");
        assert_eq!(payload.display_text, "hello");
    }
}
