//! System prompt for the ReAct grammar

use equity_tools::ToolRegistry;

/// Render the system instruction: tool catalogue plus response grammar
pub fn system_prompt(registry: &ToolRegistry) -> String {
    render(&registry.catalogue())
}

fn render(catalogue: &str) -> String {
    format!(
        "You are a ReAct agent that can reason step-by-step and use tools.

Available Tools:
{catalogue}

Follow this REQUIRED format:

Thought: your reasoning
Action: tool_name
Action Input: JSON parameters

After tool output is shown to you as:
Observation: {{...}}

You MUST continue the reasoning loop until done.

End with:
Final Answer: your summary
"
    )
}
