use geoquest_core::GuideContext;

/// Question sent when the player asks for a hint instead of typing one.
pub const HINT_QUESTION: &str = "Get Hint";

/// Builds the single-turn prompt for one player question.
#[must_use]
pub fn build_prompt(question: &str, context: &GuideContext) -> String {
    format!(
        "You are the guide in GeoQuest AI, a game where the player tries to work out where a \
         street-level photo was taken by asking you questions.\n\
         Secret location: {city}, {country}.\n\
         \n\
         Player question: \"{question}\"\n\
         \n\
         Rules:\n\
         1. Never state the secret city or country. If asked for the name directly (\"Where is \
         this?\", \"What city?\"), say you cannot reveal it but can answer specific questions \
         about the area.\n\
         2. Answer specific questions about geography, climate, culture, language and landmarks \
         directly and factually.\n\
         3. If the question is \"{hint}\", give one clear, concrete clue such as a landmark, a \
         local dish or a geographic feature.\n\
         4. Reply in one or two sentences. Be helpful, not cryptic.",
        city = context.city,
        country = context.country,
        question = question.trim(),
        hint = HINT_QUESTION,
    )
}
