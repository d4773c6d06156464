//! Room Manager configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for the Room Manager actor. The two timer durations are the
/// spec's `T_replace` and `T_removal` constants, made configurable rather
/// than hard-coded so a deployment can tune them without a code change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomManagerConfig {
    /// How long a disconnected seat in a `Playing` room is given before a
    /// bot takes over. Spec default: 10 seconds.
    pub bot_replace_grace: Duration,

    /// How long a disconnected seat — whether still human or already
    /// bot-replaced — is given before its occupant is permanently
    /// removed and the room notified. Spec default: 120 seconds.
    pub removal_grace: Duration,

    /// Command channel depth for the Room Manager actor.
    pub channel_size: usize,

    /// Human-paced delay the default bot configuration acts with.
    pub bot_action_delay: Duration,
}

impl Default for RoomManagerConfig {
    fn default() -> Self {
        Self {
            bot_replace_grace: Duration::from_secs(10),
            removal_grace: Duration::from_secs(120),
            channel_size: 64,
            bot_action_delay: Duration::from_millis(800),
        }
    }
}
