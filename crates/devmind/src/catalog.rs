//! Fixed choices offered to the person chatting.

use devmind_core::CapabilitySet;

/// Models the chat may be configured with.
pub const MODEL_ALLOW_LIST: &[&str] = &["deepseek-r1-distill-llama-70b"];

/// Every capability the chatbot can declare, in display order.
pub const CAPABILITY_CATALOG: &[&str] = &[
    "General Conversation",
    "Python Expert",
    "Debugging Assistant",
    "Code Documentation",
    "Solution Design",
    "Information Retrieval",
];

/// Hints printed by the `/tips` command.
pub const QUICK_TIPS: &[(&str, &str)] = &[
    (
        "Tip 1",
        "Use the chatbot for general conversation to explore its versatility.",
    ),
    (
        "Tip 2",
        "Leverage the Python expertise for coding help and debugging.",
    ),
    (
        "Tip 3",
        "Utilize the information retrieval for quick access to data and facts.",
    ),
];

/// Returns the whole catalog as a capability set.
pub fn default_capabilities() -> CapabilitySet {
    CapabilitySet::from_labels(CAPABILITY_CATALOG.iter().copied())
}

/// Looks up a catalog label, ignoring ASCII case and surrounding spaces.
pub fn find_capability(name: &str) -> Option<&'static str> {
    let name = name.trim();
    CAPABILITY_CATALOG
        .iter()
        .copied()
        .find(|label| label.eq_ignore_ascii_case(name))
}
