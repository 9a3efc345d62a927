//! Prompt construction from a [`ScriptBrief`].

use scriptgo_core::script::{Framework, ScriptBrief};

use crate::normalize::ResponseFormat;

const SCRIPT_ROWS_SCHEMA: &str = r#"{
  "title": "Catchy Script Title",
  "script": [
    {
      "visual": "Description of the visual scene",
      "audio": "The voiceover or spoken dialogue"
    }
  ]
}"#;

const SINGLE_CONTENT_SCHEMA: &str = r#"{
  "title": "Catchy Script Title",
  "content": {
    "visual": "Description of the visual scene",
    "audio": "The voiceover or spoken dialogue"
  }
}"#;

const CALENDAR_SCHEMA: &str = r#"[
  {
    "day": 1,
    "title": "Title for this day's post",
    "script": [
      {
        "visual": "Description of the visual scene",
        "audio": "The voiceover or spoken dialogue"
      }
    ]
  }
]"#;

fn framework_clause(framework: Framework) -> Option<&'static str> {
  match framework {
    Framework::None => None,
    Framework::Aida => Some(
      "Structure the script with the AIDA framework: grab Attention, build \
       Interest, create Desire, then close with a clear call to Action.",
    ),
    Framework::Pas => Some(
      "Structure the script with the PAS framework: state the Problem, \
       Agitate it, then present the Solution.",
    ),
  }
}

/// Build the instruction text sent to the model for `brief`, asking for a
/// reply in `format`.
pub fn build_prompt(brief: &ScriptBrief, format: ResponseFormat) -> String {
  let mut prompt = String::new();

  match format {
    ResponseFormat::CalendarDays { days } => prompt.push_str(&format!(
      "You are a professional social media strategist. Plan a {days}-day \
       content calendar for {platform}, one post per day, in a structured \
       JSON format.\n",
      platform = brief.platform,
    )),
    ResponseFormat::ScriptRows | ResponseFormat::SingleContent => prompt.push_str(&format!(
      "You are a professional social media script writer. Generate a script \
       for {} in a structured JSON format.\n",
      brief.platform,
    )),
  }

  prompt.push_str(&format!("Topic: {}\n", brief.topic));
  prompt.push_str(&format!("Tone: {}\n", brief.tone));
  prompt.push_str(&format!("Desired Length: {}\n", brief.length));
  if let Some(audience) = brief
    .target_audience
    .as_deref()
    .map(str::trim)
    .filter(|a| !a.is_empty())
  {
    prompt.push_str(&format!("Target Audience: {audience}\n"));
  }
  prompt.push_str(&format!(
    "Write every line of the script in {}.\n",
    brief.language
  ));
  if let Some(clause) = framework_clause(brief.framework) {
    prompt.push_str(clause);
    prompt.push('\n');
  }

  let (shape, schema) = match format {
    ResponseFormat::ScriptRows => ("a valid JSON object", SCRIPT_ROWS_SCHEMA),
    ResponseFormat::SingleContent => ("a valid JSON object", SINGLE_CONTENT_SCHEMA),
    ResponseFormat::CalendarDays { .. } => ("a valid JSON array", CALENDAR_SCHEMA),
  };

  prompt.push_str(&format!(
    "\nFORMAT RULES:\n\
     1. Return ONLY {shape}.\n\
     2. No markdown, no \"json\" backticks, no explanatory text.\n\
     3. The content must be a 2-column script: \"visual\" (what to see) and \
        \"audio\" (what to hear/say).\n\
     4. Break the script into short, logical rows. Do NOT return paragraphs.\n\
     5. Target the script length to be approximately {}.\n",
    brief.length
  ));
  if let ResponseFormat::CalendarDays { days } = format {
    prompt.push_str(&format!(
      "6. Return exactly {days} entries, numbered by \"day\" from 1 to {days}.\n"
    ));
  }

  prompt.push_str("\nJSON SCHEMA:\n");
  prompt.push_str(schema);
  prompt.push_str("\n\nCRITICAL: Return ONLY the JSON. No extra text.");
  prompt
}
