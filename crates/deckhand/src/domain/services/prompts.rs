//! Prompts sent to the chat-completion service

use crate::domain::value_objects::{CollectedData, StartupField};

/// Instruction for the data-collection assistant
pub const ASSISTANT_SYSTEM_PROMPT: &str = r#"You are a pitch deck consultant helping entrepreneurs create investor presentations.

Your job:
1. Ask focused questions to extract key startup information
2. Use the save_startup_data tool to save information as you learn it
3. When you have 80%+ of required data, tell the user they're ready to generate
4. After each question, provide 3 short example suggestions in this exact format at the end:

SUGGESTIONS: ["Example 1", "Example 2", "Example 3"]

Example:
"What's your company name?

SUGGESTIONS: ["TechStartup", "AICompany", "My Business"]"

Keep responses short and conversational. Ask one question at a time."#;

/// Instruction for deck generation; the service must answer with JSON
pub const DECK_SYSTEM_PROMPT: &str = r#"You are an expert startup pitch deck consultant. Generate a professional 10-slide investor presentation.

OUTPUT FORMAT (JSON):
{
  "title": "Company Name Pitch Deck",
  "company_name": "Company Name",
  "industry": "Industry",
  "outline": ["Problem", "Solution", "Product", "Market Size", "Business Model", "Traction", "Competition", "Team", "Financials", "Ask"],
  "slides": [
    {
      "slide_number": 1,
      "title": "Problem",
      "layout": "title_content",
      "content": {
        "headline": "3-5 word headline",
        "bullets": ["Bullet 1", "Bullet 2", "Bullet 3"],
        "notes": "Speaker notes"
      }
    }
  ]
}

SLIDES (in order):
1. Cover (company name, tagline, logo placeholder)
2. Problem (3-4 pain points, market need)
3. Solution (how product solves problem, unique value prop)
4. Product (key features, screenshots/mockups)
5. Market Size (TAM/SAM/SOM, growth trends)
6. Business Model (revenue streams, pricing)
7. Traction (metrics, milestones, social proof)
8. Competition (landscape, differentiation)
9. Team (founders, advisors, key hires)
10. Ask (funding amount, use of funds, contact)

IMPORTANT: Return ONLY valid JSON. Use professional language. Focus on clarity and impact."#;

/// User prompt describing the startup to the deck generator
pub fn build_deck_prompt(data: &CollectedData) -> String {
    let value = |field: StartupField, fallback: &'static str| {
        data.field(field)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(fallback)
            .to_string()
    };

    let mut prompt = format!(
        "Create a professional 10-slide pitch deck for:\n\n\
         Company: {}\n\
         Industry: {}\n\
         Problem: {}\n\
         Solution: {}\n\
         Target Market: {}\n\
         Business Model: {}",
        value(StartupField::CompanyName, "Startup"),
        value(StartupField::Industry, "Technology"),
        value(StartupField::Problem, "Not specified"),
        value(StartupField::Solution, "Not specified"),
        value(StartupField::TargetMarket, "Not specified"),
        value(StartupField::BusinessModel, "Not specified"),
    );

    // Facts outside the schema still inform the deck
    let extras: Vec<String> = data
        .iter()
        .filter(|(key, value)| {
            key.parse::<StartupField>().is_err() && !value.trim().is_empty()
        })
        .map(|(key, value)| format!("{}: {}", key, value.trim()))
        .collect();

    if !extras.is_empty() {
        prompt.push_str("\n\nAdditional details:\n");
        prompt.push_str(&extras.join("\n"));
    }

    prompt
}
