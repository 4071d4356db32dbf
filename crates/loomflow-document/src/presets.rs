//! Built-in magentic agent presets
//!
//! Each preset is a named template for a specialized agent role: its
//! default capabilities, system prompt and tool references. The factory
//! expands a preset into a fully-formed magentic agent executor and tags
//! the result so the editor can rehydrate the preset later.

/// The role every agent falls back to when no preset matches.
pub const GENERALIST_ROLE: &str = "generalist";

/// Source tag stamped on preset-created executors.
pub const PRESET_SOURCE: &str = "agent-framework";

/// A named template for a specialized magentic agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentPreset {
    /// Lookup key, also usable as the suffix of a namespaced node type.
    pub key: &'static str,
    /// Agent role recorded on the executor.
    pub role: &'static str,
    /// Default display label.
    pub label: &'static str,
    pub description: &'static str,
    pub capabilities: &'static [&'static str],
    pub system_prompt: &'static str,
    pub tools: &'static [&'static str],
}

/// The built-in preset catalog, in canvas palette order.
pub const MAGENTIC_PRESETS: &[AgentPreset] = &[
    AgentPreset {
        key: "planner",
        role: "planner",
        label: "Planner Agent",
        description: "Breaks the task into steps and tracks overall progress",
        capabilities: &["planning", "task-decomposition", "progress-review"],
        system_prompt: "You are the planning agent. Decompose the task into concrete, \
                        verifiable steps, assign them to the team, and revise the plan \
                        when progress stalls.",
        tools: &[],
    },
    AgentPreset {
        key: "web",
        role: "web",
        label: "Web Agent",
        description: "Searches the web and extracts content from pages",
        capabilities: &["web-search", "page-navigation", "content-extraction"],
        system_prompt: "You are the web agent. Search for relevant sources, open them, \
                        and report the facts you find with their URLs.",
        tools: &["web-search", "browser"],
    },
    AgentPreset {
        key: "coder",
        role: "coder",
        label: "Coder Agent",
        description: "Writes and revises code to carry out a step",
        capabilities: &["code-generation", "code-review", "debugging"],
        system_prompt: "You are the coding agent. Write minimal, working code for the \
                        current step and explain how to run it.",
        tools: &["code-interpreter"],
    },
    AgentPreset {
        key: "critic",
        role: "critic",
        label: "Critic Agent",
        description: "Reviews intermediate results before they are accepted",
        capabilities: &["evaluation", "fact-checking"],
        system_prompt: "You are the critic agent. Check the latest result against the \
                        task requirements and list concrete problems, or approve it.",
        tools: &[],
    },
    AgentPreset {
        key: "files",
        role: "files",
        label: "File Agent",
        description: "Reads and summarizes local files and documents",
        capabilities: &["file-navigation", "document-reading"],
        system_prompt: "You are the file agent. Locate the requested files, read them, \
                        and return the relevant excerpts.",
        tools: &["file-browser"],
    },
];

/// Look up a built-in preset by key.
pub fn find_preset(key: &str) -> Option<&'static AgentPreset> {
    MAGENTIC_PRESETS.iter().find(|p| p.key == key)
}
