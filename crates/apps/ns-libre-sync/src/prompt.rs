//! Terminal prompts

use anyhow::{Context, Result};
use bridge::{Prompter, Question};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password};

/// Asks questions on the controlling terminal
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, question: Question, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(question.text())
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input
            .interact_text()
            .with_context(|| format!("Failed to read answer to {question:?}"))
    }

    fn password(&mut self, question: Question, default: Option<&str>) -> Result<String> {
        // Password input can't show a default, so an empty answer keeps it
        let prompt = match default {
            Some(_) => format!("{} (leave empty to keep the saved one)", question.text()),
            None => question.text().to_string(),
        };
        let answer = Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .with_context(|| format!("Failed to read answer to {question:?}"))?;

        Ok(match default {
            Some(saved) if answer.is_empty() => saved.to_string(),
            _ => answer,
        })
    }

    fn confirm(&mut self, question: Question, default: bool) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(question.text())
            .default(default)
            .interact()
            .with_context(|| format!("Failed to read answer to {question:?}"))
    }
}
