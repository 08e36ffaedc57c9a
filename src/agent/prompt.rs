//! Summary prompt construction.
//!
//! Builds the natural-language task given to the model. The GitHub traversal
//! itself happens through the MCP tools; the prompt only sets the role, the
//! output format, and the optional company context.

/// Build the Yesterday/Today summary prompt.
///
/// `company`, when present, is embedded as "at {company}" in the role line.
pub fn build_summary_prompt(company: Option<&str>) -> String {
    let company_context = match company {
        Some(name) => format!(" at {name}"),
        None => String::new(),
    };

    format!(
        "\
I'm a software engineer{company_context}, and I do most of my work on GitHub.
I need to provide a daily update about what I did yesterday and what I plan to do today.
Please help me compile this info and output it in the following format:

```
Yesterday:
- (List of PRs opened/closed/reviewed, issues worked on, commits made)
Today:
- (List of things it looks like I'll be working on based on recent activity)
```

Please be concise and focus on the most important work items."
    )
}
