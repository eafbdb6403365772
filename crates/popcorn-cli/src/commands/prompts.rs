use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::{Confirm, Input, Password, Select};
use popcorn_models::{RatingInput, UserRating};

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true);

    if let Some(default_value) = default {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder
        .interact_text()
        .map_err(|e| eyre!("Failed to read input: {}", e))
}

/// Prompt for a secret (masked input)
pub fn prompt_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| eyre!("Failed to read password: {}", e))
}

pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| eyre!("Failed to read confirmation: {}", e))
}

/// Pick from `items`. `None` when the user pressed Escape.
pub fn prompt_select<T: ToString>(prompt: &str, items: &[T], default: usize) -> Result<Option<usize>> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(default.min(items.len().saturating_sub(1)))
        .interact_opt()
        .map_err(|e| eyre!("Failed to read selection: {}", e))
}

/// Star picker over the valid ratings. `None` means the user skipped rating.
pub fn prompt_rating(prompt: &str, input: &RatingInput) -> Result<Option<UserRating>> {
    let choices: Vec<UserRating> = input.choices().collect();
    let labels: Vec<String> = choices.iter().map(|r| "⭐".repeat(r.value() as usize)).collect();

    Ok(prompt_select(prompt, &labels, 0)?.and_then(|i| choices.get(i).copied()))
}
