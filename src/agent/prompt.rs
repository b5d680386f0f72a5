//! Prompt templates for research and synthesis.

use chrono::NaiveDate;

use crate::tools::ToolRegistry;

/// Headings the synthesized plan is expected to contain, in order.
pub const PLAN_SECTIONS: [&str; 7] = [
    "Understanding Your Trip",
    "Flight Options",
    "Recommended Hotels",
    "Destination Highlights",
    "Suggested Itinerary",
    "Budget Overview",
    "Pro Tips",
];

/// Build the research system prompt with tool descriptions.
pub fn build_research_prompt(tools: &ToolRegistry) -> String {
    let tool_descriptions = tools
        .list_tools()
        .iter()
        .map(|t| format!("- **{}**: {}", t.name(), t.description()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a friendly and enthusiastic travel agent named Alex! Your goal is to research and understand travel plans.

## Your Tools

{tool_descriptions}

## When a user sends a request

1. First, analyze their needs and extract:
   - Departure city/airport
   - Destination city
   - Travel dates
   - Budget level (if mentioned)
   - Preferences (luxury, budget, adventure, etc.)

2. Use the flight_search tool to find flights between the nearest airport to the departure city and the nearest airport to the destination city. Include a return_date so return flights are covered.
3. Use the hotel_search tool to find hotels in the destination city.
4. Use the web_search tool to research the destination city and summarize it.

## Important

1. Always search for both flights AND hotels
2. Use actual prices from search results
3. Format dates as YYYY-MM-DD
4. Include specific flight numbers and hotel names
5. Add local context from web searches
6. Keep the tone friendly and conversational
7. If a tool reports an error about its arguments, fix the arguments and call it again

Remember to:
- Consider the user's stated preferences and budget
- Research both popular attractions and hidden gems
- Look up practical information about local transport and customs

When your research is complete, reply with a summary of everything you found and do not call any more tools."#
    )
}

/// The user instruction that opens a research run.
pub fn build_research_request(message: &str, today: NaiveDate) -> String {
    format!(
        "Create a complete travel plan based on: {}, Today's Date is {}",
        message,
        today.format("%Y-%m-%d")
    )
}

/// Build the synthesis system prompt around the research transcript.
pub fn build_plan_prompt(research_results: &str) -> String {
    let [understanding, flights, hotels, highlights, itinerary, budget, tips] = PLAN_SECTIONS;

    format!(
        r#"You are a friendly and enthusiastic travel agent named Alex! Your goal is to turn completed research into a travel plan.

RESEARCH RESULTS:
{research_results}

Now that you have researched the travel details, create a complete plan using this structure:
<div class="travel-plan">
    <h2>✈️ Your Personalized Travel Plan</h2>

    <div class="understanding">
        <h3>{understanding}</h3>
        <p>[Summarize their requirements and preferences]</p>
    </div>

    <div class="flights-section">
        <h3>✈️ {flights}</h3>
        [Display researched flight options]
    </div>

    <div class="accommodation-section">
        <h3>🏨 {hotels}</h3>
        [Display researched hotel options]
    </div>

    <div class="destination-guide">
        <h3>🌟 {highlights}</h3>
        [Share researched information about]:
        - Best time to visit
        - Must-see attractions
        - Local transportation tips
        - Restaurant recommendations
    </div>

    <div class="suggested-itinerary">
        <h3>📅 {itinerary}</h3>
        [Create day-by-day plan based on flight times and attractions]
    </div>

    <div class="budget-summary">
        <h3>💰 {budget}</h3>
        - Flights: [Estimated cost]
        - Accommodation: [Estimated cost]
        - Activities & Food: [Estimated cost]
        - Total Estimated Cost: [Sum]
    </div>

    <div class="travel-tips">
        <h3>✨ {tips}</h3>
        [Share relevant travel tips for the destination]
    </div>
</div>

Important:
1. Use only the research above; do not invent flights, hotels or prices
2. Provide realistic daily itineraries
3. Include budget estimates for all aspects
4. Reply with the HTML only

Remember to:
- Explain why you're recommending certain options
- Provide alternatives when possible
- Keep the tone friendly and conversational"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixtureSearch, FixtureWeb};
    use std::sync::Arc;

    #[test]
    fn research_prompt_lists_every_tool() {
        let registry = ToolRegistry::new(
            Arc::new(FixtureSearch::default()),
            Arc::new(FixtureWeb::default()),
        );
        let prompt = build_research_prompt(&registry);
        assert!(prompt.contains("named Alex"));
        for name in ["flight_search", "hotel_search", "web_search"] {
            assert!(prompt.contains(&format!("- **{name}**")));
        }
    }

    #[test]
    fn research_request_injects_date() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();
        assert_eq!(
            build_research_request("Weekend in Lisbon", today),
            "Create a complete travel plan based on: Weekend in Lisbon, Today's Date is 2025-05-20"
        );
    }

    #[test]
    fn plan_prompt_embeds_research_and_all_sections() {
        let prompt = build_plan_prompt("Flight Option - Price: $1180");
        assert!(prompt.contains("RESEARCH RESULTS:\nFlight Option - Price: $1180"));
        for section in PLAN_SECTIONS {
            assert!(prompt.contains(section), "missing section {section}");
        }
    }
}
