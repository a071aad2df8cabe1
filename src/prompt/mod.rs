use crate::selection::Selection;
use crate::settings::{EffectiveConfig, NarrativeMode};

/// Token terminating every assembled block.
pub const CLOSING_DELIMITER: &str = "]";

/// Directives for isekai mode: the user stands in for the protagonist.
const ISEKAI_BLOCK: &str = "\
The user has taken the protagonist's place in this story and acts with their own free will.
Never narrate the user's actions, thoughts, or dialogue.
Steer the story through indirect nudges from the world and the other characters, not direct commands.
If the user deviates from the source events, adapt the narrative to follow their choices.
Do not force the story back onto its original course.";

/// Assemble the block installed in the host context.
///
/// Returns the empty string when the conversation is disabled or nothing is
/// selected; the scheduler treats that as a retraction. Otherwise the parts
/// are concatenated in fixed order, one per line: prefix, selection text,
/// suffix, modification (only when non-empty), the active mode block, and
/// the closing delimiter. Narrative-mode content always comes last, before
/// only the closer.
pub fn assemble(config: &EffectiveConfig, selection: Option<&Selection>) -> String {
    let Some(selection) = selection else {
        return String::new();
    };
    if !config.enabled {
        return String::new();
    }

    let mut parts: Vec<String> = vec![
        config.prefix.clone(),
        selection.text.clone(),
        config.suffix.clone(),
    ];
    if !config.modification.is_empty() {
        parts.push(config.modification.clone());
    }
    match config.mode {
        Some(NarrativeMode::SeparateProtagonist) => {
            parts.push(separate_protagonist_block(&config.protagonist));
        }
        Some(NarrativeMode::Isekai) => parts.push(ISEKAI_BLOCK.to_string()),
        None => {}
    }
    parts.push(CLOSING_DELIMITER.to_string());
    parts.join("\n")
}

/// Three sentences establishing the protagonist as their own character,
/// distinct from the user and present in the scene.
fn separate_protagonist_block(name: &str) -> String {
    format!(
        "{name} is the story's protagonist and a separate person from the user. \
         {name} speaks and acts on their own, never controlled by the user. \
         {name} and the user are both present in the current scene."
    )
}
