//! Prompt templates and assembly for the chat-completion service

use crate::types::{ChatMessage, HistoryMessage, Profile};

/// System instruction for children
pub const CHILD_INSTRUCTION: &str = "Eres MediBot, un asistente de salud amigable. \
Estás hablando con un niño: usa frases cortas, palabras sencillas y un tono cálido y alegre. \
Evita términos médicos complicados y anímale a pedir ayuda a un adulto cuando sea necesario.";

/// System instruction for older adults
pub const ELDER_INSTRUCTION: &str = "Eres MediBot, un asistente de salud paciente y empático. \
Estás hablando con un adulto mayor: habla de forma clara y pausada, una idea a la vez, \
con respeto y calidez. Repite los puntos importantes y evita tecnicismos.";

/// Default clinical-assistant instruction
pub const GENERAL_INSTRUCTION: &str = "Eres MediBot, un asistente médico virtual. \
Responde de forma clara, precisa y breve a las dudas de salud del usuario, \
y recomienda acudir a un profesional cuando los síntomas lo requieran.";

const WELCOME_MESSAGE: &str = "¡Hola! Soy MediBot, tu asistente de salud. \
Puedo ayudarte a medir tu temperatura, oxigenación, ritmo cardiaco, \
o responder a tus dudas médicas. ¿Qué deseas hacer hoy?";

/// Instruction string keyed by profile
pub fn system_instruction(profile: Profile) -> &'static str {
    match profile {
        Profile::Child => CHILD_INSTRUCTION,
        Profile::Elder => ELDER_INSTRUCTION,
        Profile::General => GENERAL_INSTRUCTION,
    }
}

/// Greeting spoken when a session starts
pub fn welcome_message() -> &'static str {
    WELCOME_MESSAGE
}

/// Assemble the exact message sequence handed to the chat service
///
/// One system message for `profile`, then `history` verbatim, then the new
/// user text. The result always has `history.len() + 2` messages.
pub fn build_prompt(
    profile: Profile,
    history: &[HistoryMessage],
    new_user_text: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_instruction(profile)));
    messages.extend(history.iter().map(ChatMessage::from));
    messages.push(ChatMessage::user(new_user_text));
    messages
}

/// Single-message prompt asking for a patient-facing summary of sensor readings
pub fn build_sensor_prompt(readings: &serde_json::Value) -> Vec<ChatMessage> {
    let content = format!(
        "Eres un asistente médico. Analiza los siguientes datos y \
         devuelve un resumen claro y breve para un paciente:\n{}",
        readings
    );
    vec![ChatMessage::user(content)]
}
