// Keyword tutor
// Picks a canned answer by trigger substring, first declared rule wins

/// A trigger substring and the answer it selects
#[derive(Debug, Clone, Copy)]
pub struct ChatRule {
    /// Lowercase keyword searched anywhere in the message
    pub trigger: &'static str,
    pub response: &'static str,
}

/// Rules in priority order
pub const CHAT_RULES: &[ChatRule] = &[
    ChatRule {
        trigger: "ros",
        response: "ROS 2 (Robot Operating System 2) is a flexible framework for writing robot software. It provides tools, libraries, and conventions to simplify creating complex robot behavior.",
    },
    ChatRule {
        trigger: "physical ai",
        response: "Physical AI refers to AI systems that interact with the physical world through embodied agents like robots. It combines perception, reasoning, and action in real environments.",
    },
    ChatRule {
        trigger: "sensor",
        response: "Sensors in robotics include LIDAR for distance measurement, cameras for vision, IMUs for orientation, and force sensors for tactile feedback.",
    },
    ChatRule {
        trigger: "simulation",
        response: "Simulation environments like Gazebo and Isaac Sim allow testing robot behaviors in virtual environments before deploying to real hardware.",
    },
];

pub const DEFAULT_RESPONSE: &str = "I'm an AI tutor for Physical AI. I can help you understand robotics, ROS 2, and simulation. What would you like to learn?";

/// Answer a chat message
pub fn respond(message: &str) -> &'static str {
    let message = message.to_lowercase();
    CHAT_RULES
        .iter()
        .find(|rule| message.contains(rule.trigger))
        .map_or(DEFAULT_RESPONSE, |rule| rule.response)
}
