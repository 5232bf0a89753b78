pub(super) const SEPARATOR: &str = "════════════════════";

const JOURNAL_COLOR: u32 = 0x3498db;
const TASK_COLOR: u32 = 0x2ecc71;
const HELP_COLOR: u32 = 0x9b59b6;

pub(super) const TASK_LIST_TITLE: &str = "📝 Task List";
pub(super) const EMPTY_TASKS_TEXT: &str = "No tasks yet! Add one with `/task <content>`";

/// Platform-neutral rich message: converted to a serenity embed only at the edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct Embed {
    pub(super) color: u32,
    pub(super) title: String,
    pub(super) description: String,
}

pub(super) fn journal_embed(date: &str, entries: &[String]) -> Embed {
    Embed {
        color: JOURNAL_COLOR,
        title: format!("📅   {}", date),
        description: format!("{}\n\n{}\n\n\n", SEPARATOR, entries.join("\n\n")),
    }
}

pub(super) fn task_embed(tasks: &[String]) -> Embed {
    let description = if tasks.is_empty() {
        EMPTY_TASKS_TEXT.to_string()
    } else {
        let lines = tasks
            .iter()
            .enumerate()
            .map(|(i, task)| format!("{}. {}", i + 1, task))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{}\n\n{}\n\n", SEPARATOR, lines)
    };
    Embed {
        color: TASK_COLOR,
        title: TASK_LIST_TITLE.to_string(),
        description,
    }
}

pub(super) fn help_embed() -> Embed {
    let description = [
        SEPARATOR,
        "",
        "**/today [content]**",
        "Start or add to today's journal",
        "",
        "**/task [tasks]**",
        "Add new tasks (comma separated)",
        "",
        "**/done [number]**",
        "Complete a task by its number",
        "",
        "**/help**",
        "Show this message (only you can see it)",
        "",
        "**Examples:**",
        "`/today Finished the project!`",
        "`/task Buy milk, Walk dog`",
        "`/done 2` (completes task #2)",
        "`/help`",
        "",
    ]
    .join("\n");
    Embed {
        color: HELP_COLOR,
        title: "📘 JournalBot Help".to_string(),
        description,
    }
}
