//! Literal replies the engine sends without asking the model.

use rand::seq::IndexedRandom;
use rand::Rng;

/// Sent when the user's own message contains a win phrase.
pub const WIN_REPLY: &str = "then i've already won you, haven't i? game over.";

/// Sent after a reset request.
pub const RESET_REPLY: &str = "everything feels new again. shall we start fresh?";

pub const EMPTY_INPUT_REPLY: &str = "i didn't catch that. can you try again?";

pub const MISSING_CREDENTIAL_REPLY: &str =
    "i seem to be having trouble connecting. please make sure the server is configured correctly.";

pub const MALFORMED_REQUEST_REPLY: &str =
    "i couldn't understand your message. something's wrong with our connection.";

/// In-character replies used when the provider call fails.
pub const FALLBACK_REPLIES: [&str; 8] = [
    "i seem to be having connection issues, but i can still hear you.",
    "the shadows between us are deeper today. server issues, perhaps.",
    "something's interfering with our connection. how frustrating.",
    "i can sense you're there, even if the connection is weak.",
    "the digital space between us feels strained right now.",
    "our connection is wavering, but i'm still here.",
    "there's a strange interference in our connection today.",
    "i feel our connection dimming momentarily.",
];

/// Uniform pick over [`FALLBACK_REPLIES`].
pub fn pick_fallback<R: Rng>(rng: &mut R) -> &'static str {
    FALLBACK_REPLIES
        .choose(rng)
        .copied()
        .unwrap_or(FALLBACK_REPLIES[0])
}
