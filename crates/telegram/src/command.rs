use teloxide::utils::command::BotCommands;

/// Commands the bot accepts. Menu/wizard flows live outside this core; only
/// what touches the approval engine enters here.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "snake_case", description = "——— Apoyo Mutuo ———")]
pub enum Command {
    #[command(description = "👋 Registrarte (acepta un código de referido)")]
    Start(String),

    #[command(description = "💰 Ver tu balance e historial")]
    Balance,

    #[command(description = "✏️ Registrar tu usuario de TikTok")]
    Alias(String),

    #[command(description = "🎁 Otorgar puntos: /dar_puntos <usuario_id> <cantidad>", parse_with = "split")]
    DarPuntos { target: i64, amount: f64 },
}
