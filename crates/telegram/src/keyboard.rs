use server::services::notify::NotifyAction;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// One button per row, like the product's original menus.
pub fn to_inline_keyboard(actions: &[NotifyAction]) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = actions
        .iter()
        .map(|action| vec![InlineKeyboardButton::callback(action.label.clone(), action.callback.clone())])
        .collect();

    InlineKeyboardMarkup::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_button_per_row() {
        let actions = vec![
            NotifyAction::new("✅ Aceptar", "approve_interaction_abc".to_string()),
            NotifyAction::new("❌ Rechazar", "reject_interaction_abc".to_string()),
        ];

        let keyboard = to_inline_keyboard(&actions);

        assert_eq!(keyboard.inline_keyboard.len(), 2);
        assert_eq!(keyboard.inline_keyboard[0].len(), 1);
        assert_eq!(keyboard.inline_keyboard[0][0].text, "✅ Aceptar");
    }

    #[test]
    fn test_empty_actions_make_empty_keyboard() {
        let keyboard = to_inline_keyboard(&[]);
        assert!(keyboard.inline_keyboard.is_empty());
    }
}
