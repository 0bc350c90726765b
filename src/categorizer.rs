use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::Error;

pub const WEDDING_CATEGORIES: &[&str] = &[
    "場地",
    "攝影",
    "錄影",
    "化妝",
    "婚紗禮服",
    "餐飲",
    "婚禮統籌",
    "花藝佈置",
    "婚禮音樂",
    "婚禮主持",
    "婚禮蛋糕",
    "婚禮邀請卡",
    "婚禮小物",
    "婚車租賃",
    "蜜月旅遊",
    "婚戒珠寶",
    "其他",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySuggestion {
    pub categories: Vec<String>,
    pub reasoning: String,
}

// Suggests 1-3 wedding-service categories for a free-text service
// description through an OpenAI-compatible chat endpoint.
pub struct CategoryAnalyzer {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl CategoryAnalyzer {
    pub fn new(api_base: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_owned(),
            api_key,
            model,
        }
    }

    pub async fn analyze(&self, description: &str) -> Result<CategorySuggestion, Error> {
        let system_prompt = format!(
            "你是一位專業的婚宴服務分類專家。根據用戶提供的服務描述，分析並建議最適合的婚宴服務分類。可選分類包括：{}。請返回 1-3 個最相關的分類。",
            WEDDING_CATEGORIES.join("、"),
        );
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": format!("請分析以下婚宴服務描述，並建議適合的分類：\n\n{}", description) },
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "wedding_category_analysis",
                    "strict": true,
                    "schema": {
                        "type": "object",
                        "properties": {
                            "categories": { "type": "array", "items": { "type": "string" } },
                            "reasoning": { "type": "string" },
                        },
                        "required": ["categories", "reasoning"],
                        "additionalProperties": false,
                    },
                },
            },
        });
        let payload: Value = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::ExternalService(format!("category analysis: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::ExternalService(format!("category analysis: {}", e)))?
            .json()
            .await
            .map_err(|e| Error::ExternalService(format!("category analysis: {}", e)))?;
        parse_completion(&payload)
    }
}

fn parse_completion(payload: &Value) -> Result<CategorySuggestion, Error> {
    let content = payload["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| Error::ExternalService("category analysis: malformed completion".to_owned()))?;
    serde_json::from_str(content).map_err(|e| Error::ExternalService(format!("category analysis: {}", e)))
}
