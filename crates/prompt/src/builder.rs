//! Prompt builder for rendering templates and injecting retrieved context.

use crate::language::ResponseLanguage;
use crate::types::{BuiltPrompt, PromptKind};
use gems_core::{AppError, AppResult};
use handlebars::Handlebars;
use serde_json::json;

/// Separator between snippets inside a grounded prompt.
pub const SNIPPET_SEPARATOR: &str = "\n\n";

const SELF_EN: &str = "User question: {{question}}

{{language_instruction}}";

const SELF_NO: &str = "Brukerens spørsmål: {{question}}

{{language_instruction}}";

const GROUNDED_EN: &str = "User question: {{question}}

Retrieved information from knowledge base:
{{context}}

Instructions:
- Answer the question using only the retrieved information above.
- If the retrieved information does not contain what is needed to answer, say clearly that the knowledge base has no relevant information on this question.
- Do not make up facts that are not in the retrieved information.
- {{language_instruction}}
- Be professional and precise.";

const GROUNDED_NO: &str = "Brukerens spørsmål: {{question}}

Hentet informasjon fra kunnskapsbasen:
{{context}}

Instruksjoner:
- Svar på spørsmålet kun basert på den hentede informasjonen ovenfor.
- Hvis den hentede informasjonen ikke inneholder det som trengs for å svare, si tydelig at kunnskapsbasen ikke har relevant informasjon om dette spørsmålet.
- Ikke dikt opp fakta som ikke står i den hentede informasjonen.
- {{language_instruction}}
- Vær profesjonell og presis.";

/// Renders the agent's prompts.
///
/// Templates are compiled once on construction; the builder is then
/// read-only and can be shared between requests.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    handlebars: Handlebars<'static>,
}

impl PromptBuilder {
    /// Create a builder with all templates registered.
    pub fn new() -> AppResult<Self> {
        let mut handlebars = Handlebars::new();

        // Disable HTML escaping for plain text
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);

        for (kind, language, template) in [
            (PromptKind::SelfDescription, ResponseLanguage::English, SELF_EN),
            (PromptKind::SelfDescription, ResponseLanguage::Norwegian, SELF_NO),
            (PromptKind::Grounded, ResponseLanguage::English, GROUNDED_EN),
            (PromptKind::Grounded, ResponseLanguage::Norwegian, GROUNDED_NO),
        ] {
            handlebars
                .register_template_string(kind.template_name(language), template)
                .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;
        }

        Ok(Self { handlebars })
    }

    /// Build the prompt for a question about the agent itself.
    ///
    /// The prompt carries only the question and the language instruction;
    /// the agent description comes from the system instruction.
    pub fn self_description(
        &self,
        question: &str,
        language: ResponseLanguage,
    ) -> AppResult<BuiltPrompt> {
        let kind = PromptKind::SelfDescription;
        let text = self.render(
            kind.template_name(language),
            &json!({
                "question": question.trim(),
                "language_instruction": language.instruction(),
            }),
        )?;

        tracing::debug!("Built self-description prompt ({})", language);
        Ok(BuiltPrompt::new(text, kind, language, 0))
    }

    /// Build a grounded prompt embedding `snippets` in the given order.
    ///
    /// Callers decide how many snippets to pass; all of them are embedded.
    pub fn grounded<S: AsRef<str>>(
        &self,
        question: &str,
        snippets: &[S],
        language: ResponseLanguage,
    ) -> AppResult<BuiltPrompt> {
        let kind = PromptKind::Grounded;
        let context = snippets
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(SNIPPET_SEPARATOR);

        let text = self.render(
            kind.template_name(language),
            &json!({
                "question": question.trim(),
                "context": context,
                "language_instruction": language.instruction(),
            }),
        )?;

        tracing::debug!(
            "Built grounded prompt ({}, {} snippets, {} chars)",
            language,
            snippets.len(),
            text.len()
        );
        Ok(BuiltPrompt::new(text, kind, language, snippets.len()))
    }

    /// Render a registered template with variables.
    fn render(&self, name: &str, variables: &serde_json::Value) -> AppResult<String> {
        self.handlebars
            .render(name, variables)
            .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
    }
}
