//! Sales persona prompt

/// Sent to the customer when the model answers with empty text
pub const FALLBACK_REPLY: &str = "Desculpe, não entendi.";

/// Persona instructions placed before the customer's message
pub const PERSONA_PREAMBLE: &str = "Você é a Lúcia, uma vendedora simpática, brasileira e eficiente.
Você vende o produto 'RejuveSkin'.
Seja curta, use emojis e quebre objeções.";

/// Build the prompt for one customer message
///
/// The message is embedded verbatim inside double quotes.
pub fn build_prompt(customer_text: &str) -> String {
    format!("{}\nCliente disse: \"{}\"", PERSONA_PREAMBLE, customer_text)
}

/// The model's reply, or [`FALLBACK_REPLY`] when there is none
pub fn reply_or_fallback(generated: Option<&str>) -> String {
    generated.unwrap_or(FALLBACK_REPLY).to_string()
}
