// Proposal lifecycle: compose via the generator, persist as draft, send, sign by token,
// track revisions, and draft scope-alert emails.
// All generation goes through llm_client::TextGenerator; all storage through store::ProposalStore.

pub mod category;
pub mod composer;
pub mod handlers;
pub mod lifecycle;
pub mod prompts;
pub mod quota;
pub mod scope_alert;
pub mod store;
