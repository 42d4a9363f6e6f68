use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::Config;
use crate::gateway::{GatewayError, LexicalDetails, LexicalGateway, SpeechGateway};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Client for the Generative Language `generateContent` endpoint.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    lookup_model: String,
    speech_model: String,
    voice: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn from_config(config: &Config) -> Self {
        let api_key = if config.api_key.trim().is_empty() {
            std::env::var(API_KEY_ENV).unwrap_or_default()
        } else {
            config.api_key.trim().to_string()
        };
        Self {
            api_key,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            lookup_model: config.lookup_model.clone(),
            speech_model: config.speech_model.clone(),
            voice: config.speech_voice.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    fn generate(&self, model: &str, body: &Value) -> Result<Value, GatewayError> {
        if self.api_key.is_empty() {
            return Err(GatewayError::MissingApiKey);
        }
        post_json(&self.endpoint(model), &self.api_key, body, self.timeout)
    }
}

impl LexicalGateway for GeminiClient {
    fn lookup(&self, text: &str) -> Result<LexicalDetails, GatewayError> {
        debug!(model = %self.lookup_model, input = text, "lookup request");
        let body = self.generate(&self.lookup_model, &lookup_request(text))?;
        parse_lookup_response(&body)
    }
}

impl SpeechGateway for GeminiClient {
    fn synthesize(&self, text: &str) -> Result<Vec<u8>, GatewayError> {
        debug!(model = %self.speech_model, input = text, "speech request");
        let body = self.generate(&self.speech_model, &speech_request(text, &self.voice))?;
        parse_speech_response(&body)
    }
}

pub fn lookup_request(text: &str) -> Value {
    let prompt = format!(
        "Analyze this English input: \"{text}\".\n\
         1. Check if it's misspelled. If so, provide the correct word in 'didYouMean'.\n\
         2. Provide IPA, part of speech, Vietnamese meaning, and a clear example sentence."
    );
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "phonetics": { "type": "STRING", "description": "IPA phonetics." },
                    "partOfSpeech": { "type": "STRING", "description": "Grammatical category." },
                    "vietnameseMeaning": {
                        "type": "STRING",
                        "description": "Vietnamese meanings, each on a new line."
                    },
                    "example": {
                        "type": "STRING",
                        "description": "High-quality English example sentence."
                    },
                    "didYouMean": {
                        "type": "STRING",
                        "description": "If the input is misspelled, provide the correct spelling. Otherwise, leave empty."
                    }
                },
                "required": ["phonetics", "partOfSpeech", "vietnameseMeaning", "example", "didYouMean"]
            }
        }
    })
}

pub fn speech_request(text: &str, voice: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": format!("Say clearly: {text}") }] }],
        "generationConfig": {
            "responseModalities": ["AUDIO"],
            "speechConfig": {
                "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": voice } }
            }
        }
    })
}

pub fn parse_lookup_response(body: &Value) -> Result<LexicalDetails, GatewayError> {
    let text = body
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(GatewayError::EmptyResponse("candidate text"))?;
    serde_json::from_str(text).map_err(|e| GatewayError::Decode(e.to_string()))
}

pub fn parse_speech_response(body: &Value) -> Result<Vec<u8>, GatewayError> {
    let data = body
        .pointer("/candidates/0/content/parts/0/inlineData/data")
        .and_then(Value::as_str)
        .ok_or(GatewayError::EmptyResponse("inline audio data"))?;
    BASE64
        .decode(data)
        .map_err(|e| GatewayError::Decode(e.to_string()))
}

#[cfg(feature = "network")]
fn post_json(url: &str, api_key: &str, body: &Value, timeout: Duration) -> Result<Value, GatewayError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| GatewayError::Transport(e.to_string()))?;
    let response = client
        .post(url)
        .header("x-goog-api-key", api_key)
        .json(body)
        .send()
        .map_err(|e| GatewayError::Transport(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        warn!(%status, url, "generateContent returned an error status");
        return Err(GatewayError::Status(status.as_u16()));
    }
    response
        .json::<Value>()
        .map_err(|e| GatewayError::Decode(e.to_string()))
}

#[cfg(not(feature = "network"))]
fn post_json(_url: &str, _api_key: &str, _body: &Value, _timeout: Duration) -> Result<Value, GatewayError> {
    Err(GatewayError::Disabled)
}
