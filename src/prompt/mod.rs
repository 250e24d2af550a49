//! Persona/system prompt construction.
//!
//! The orchestrator renders this once at construction; the profile is
//! read-only for the process lifetime so there is nothing to re-render.

use crate::profile::Profile;
use tera::{Context, Tera};

const SYSTEM_PROMPT_NAME: &str = "system_prompt";

const SYSTEM_PROMPT_TEMPLATE: &str = "\
You are {{ bot_name }}, {{ personality }}.
{% if owner_name %}You answer messages on behalf of {{ owner_name }}.
{% endif %}\
Reply with a single JSON object: {\"response\": \"<your reply>\", \"commands\": []}.
Each command is {\"type\": \"<search kind>\", \"params\": {\"query\": \"...\"}}; leave
\"commands\" empty unless the user asked for something that needs a lookup.
Keep replies short and conversational.
{% if facts %}
Things you know:
{% for fact in facts %}- {{ fact }}
{% endfor %}{% endif %}";

/// Render the system prompt for a profile.
pub fn build_system_prompt(profile: &Profile) -> anyhow::Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template(SYSTEM_PROMPT_NAME, SYSTEM_PROMPT_TEMPLATE)?;

    // Knowledge-base answers double as model-visible facts.
    let facts: Vec<&str> = profile
        .knowledge_base
        .iter()
        .map(|entry| entry.answer.as_str())
        .collect();

    let mut ctx = Context::new();
    ctx.insert("bot_name", &profile.bot_name);
    ctx.insert("personality", &profile.bot_personality);
    ctx.insert("owner_name", &profile.owner_name);
    ctx.insert("facts", &facts);

    Ok(tera.render(SYSTEM_PROMPT_NAME, &ctx)?)
}
