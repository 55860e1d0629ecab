use anyhow::Result;
use dialoguer::Select;

/// Yes/No selection prompt
///
/// # Arguments
/// * `prompt` - The question to ask the user
/// * `default_yes` - Whether "Yes" is preselected
pub fn confirm(prompt: &str, default_yes: bool) -> Result<bool> {
    let items = ["Yes", "No"];
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(if default_yes { 0 } else { 1 })
        .interact()?;

    Ok(selection == 0)
}
