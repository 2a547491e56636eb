// EPB narrative bullet generation.
// Partitions caller entries by category, renders the prompt, and relays the
// model's JSON reply. All LLM calls go through llm_client.

pub mod extract;
pub mod handlers;
pub mod models;
pub mod prompts;
