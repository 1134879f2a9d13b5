use chrono::Utc;

use crate::executor::ExecutionOutput;
use crate::session::HistoryPage;
use crate::store::{CommandEntry, EntryKind, SavedCommand};
use crate::theme::Theme;

pub struct Renderer {
    theme: Theme,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn command(&self, command: &str) {
        println!("{}", self.theme.command.apply(command));
    }

    pub fn explanation(&self, explanation: &str) {
        println!("{}", self.theme.explanation.apply(explanation.trim()));
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{}", self.theme.warning.apply(message));
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}: {}", self.theme.warning.apply("Error"), message);
    }

    pub fn notice(&self, message: &str) {
        println!("{}", self.theme.muted.apply(message));
    }

    pub fn execution(&self, output: &ExecutionOutput) {
        if !output.stdout.trim().is_empty() {
            println!("{}", output.stdout.trim_end());
        }
        if !output.stderr.trim().is_empty() {
            eprintln!("{}", self.theme.stderr.apply(output.stderr.trim_end()));
        }
        if output.stdout.trim().is_empty() && output.stderr.trim().is_empty() {
            self.notice("(no output)");
        }
    }

    pub fn history_page(&self, page: &HistoryPage) {
        if page.total_entries == 0 {
            self.notice("No history yet.");
            return;
        }

        println!("{}", self.theme.header.apply("Command History"));
        for entry in &page.entries {
            self.history_entry(entry);
        }
        let mut footer = format!(
            "Page {} of {} ({} entries)",
            page.index + 1,
            page.total_pages,
            page.total_entries
        );
        if page.has_previous {
            footer.push_str(&format!("  previous: page {}", page.index));
        }
        if page.has_next {
            footer.push_str(&format!("  next: page {}", page.index + 2));
        }
        self.notice(&footer);
    }

    fn history_entry(&self, entry: &CommandEntry) {
        let label = match entry.kind {
            EntryKind::Translation => "generate",
            EntryKind::Explanation => "explain",
        };
        println!(
            "{} {} {}",
            self.theme.muted.apply(&format!("[{}]", label)),
            entry.input.summary(),
            self.theme.muted.apply(&format!("({})", time_ago(entry.created_at))),
        );
        match entry.kind {
            EntryKind::Translation => println!("  {}", self.theme.command.apply(&entry.output)),
            EntryKind::Explanation => println!("  {}", self.theme.explanation.apply(entry.output.trim())),
        }
    }

    pub fn saved_commands(&self, saved: &[SavedCommand]) {
        if saved.is_empty() {
            self.notice("No saved commands.");
            return;
        }

        println!("{}", self.theme.header.apply("Saved Commands"));
        for item in saved {
            println!("{} {}", self.theme.header.apply(&item.description), self.theme.muted.apply(&item.id.to_string()));
            println!("  {}", self.theme.command.apply(&item.command));
            self.notice(&format!("  Saved {}", time_ago(item.created_at)));
        }
    }
}

pub fn time_ago(at: chrono::DateTime<Utc>) -> String {
    let seconds = (Utc::now() - at).num_seconds().max(0);
    match seconds {
        0..=59 => "less than a minute ago".to_string(),
        60..=3599 => plural(seconds / 60, "minute"),
        3600..=86_399 => plural(seconds / 3600, "hour"),
        _ => plural(seconds / 86_400, "day"),
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
