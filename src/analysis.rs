//! The boundary between free-text model output and typed dispatch.
//!
//! [`analysis_prompt`] asks the model for a single JSON object and
//! [`parse_analysis`] is the only place that scrapes that object back out of
//! the completion text.

use serde::{Deserialize, Serialize};

use crate::classifier::Parameters;
use crate::context::RequestContext;
use crate::errors::{AgentError, AgentResult};

/// Structured reading of a user request, as produced by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDescriptor {
    pub intent: String,
    #[serde(default)]
    pub actions: Vec<String>,
    pub parameters: Parameters,
    #[serde(default)]
    pub tools: Vec<String>,
}

pub fn analysis_prompt(ctx: &RequestContext, user_input: &str) -> String {
    let current_date = ctx.today();
    format!(
        r#"Current date: {current_date}

Analyze this request: "{user_input}"
Determine:
1. The user's intent
2. Required actions
3. Parameters needed (including dates, considering current date: {current_date})
4. Available tools to use

Return ONLY a JSON object in this exact format:
{{
    "intent": "string",
    "actions": ["action1", "action2"],
    "parameters": {{
        "start_date": "YYYY-MM-DD or YYYY-MM-DDTHH:MM:SSZ",
        "end_date": "YYYY-MM-DD or YYYY-MM-DDTHH:MM:SSZ",
        "event_title": "string",
        "event_description": "string",
        "attendees": ["email1", "email2"],
        "location": "string",
        "duration": 60,
        "count": 5,
        "to": "recipient email address",
        "subject": "string",
        "content": "string",
        "email_id": "string"
    }},
    "tools": ["tool1", "tool2"]
}}

Only include parameters that the request provides or implies; omit the rest.
"duration" is in minutes. "count" is the number of emails or events.

For relative dates:
- "today" should be {current_date}
- "tomorrow" should be the next day
- "next week" should be 7 days from {current_date}
- "next month" should be the first day of the next month
- "this week" should be from {current_date} to 6 days later
- "this month" should be from {current_date} to the last day of the current month

Do not include any other text or explanation."#
    )
}

/// Remove an optional Markdown code fence around the completion.
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parse a completion into an [`AnalysisDescriptor`] or fail; nothing is salvaged.
pub fn parse_analysis(raw: &str) -> AgentResult<AnalysisDescriptor> {
    serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| AgentError::MalformedAnalysis(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    const ANALYSIS: &str = r#"{
        "intent": "summarize unread emails",
        "actions": ["fetch emails", "summarize"],
        "parameters": { "count": 3 },
        "tools": ["summarize_emails"]
    }"#;

    #[test]
    fn test_parse_plain_json() {
        let analysis = parse_analysis(ANALYSIS).unwrap();
        assert_eq!(analysis.intent, "summarize unread emails");
        assert_eq!(analysis.actions.len(), 2);
        assert_eq!(analysis.parameters["count"], json!(3));
        assert_eq!(analysis.tools, vec!["summarize_emails"]);
    }

    #[test]
    fn test_fenced_json_parses_identically() {
        let fenced = format!("```json\n{}\n```", ANALYSIS);
        assert_eq!(parse_analysis(&fenced), parse_analysis(ANALYSIS));

        let bare_fence = format!("  ```\n{}\n```  ", ANALYSIS);
        assert_eq!(parse_analysis(&bare_fence), parse_analysis(ANALYSIS));
    }

    #[test]
    fn test_optional_fields_default() {
        let analysis =
            parse_analysis(r#"{"intent": "list events", "parameters": {}}"#).unwrap();
        assert!(analysis.actions.is_empty());
        assert!(analysis.tools.is_empty());
    }

    #[test]
    fn test_missing_parameters_is_malformed() {
        let err = parse_analysis(r#"{"intent": "list events"}"#).unwrap_err();
        assert!(matches!(err, AgentError::MalformedAnalysis(_)));
    }

    #[test]
    fn test_prose_is_malformed() {
        let err = parse_analysis("Sure! Here is what I found.").unwrap_err();
        assert!(matches!(err, AgentError::MalformedAnalysis(_)));
    }

    #[test]
    fn test_prompt_embeds_reference_date() {
        let ctx = RequestContext::at(Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap());
        let prompt = analysis_prompt(&ctx, "what's on tomorrow?");
        assert!(prompt.starts_with("Current date: 2024-02-29"));
        assert!(prompt.contains(r#"Analyze this request: "what's on tomorrow?""#));
        assert!(prompt.contains(r#""intent": "string""#));
    }
}
