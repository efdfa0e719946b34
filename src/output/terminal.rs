// Colored terminal output for the topic list.
//
// Only used when the caller asks for `--format table`; the default output
// is JSON so the CLI stays scriptable.

use colored::{ColoredString, Colorize};

use super::truncate_chars;
use crate::topics::Topic;

/// Longest sample response shown before truncation.
const SAMPLE_WIDTH: usize = 90;

/// Display the ranked topic list in the terminal.
pub fn display_topics(topics: &[Topic]) {
    if topics.is_empty() {
        println!("No topics found. Responses were either empty or too dissimilar to group.");
        return;
    }

    let total: usize = topics.iter().map(|t| t.count).sum();
    println!(
        "\n{}",
        format!("=== Topics ({} topics, {} grouped responses) ===", topics.len(), total).bold()
    );
    println!();

    let bar_width: usize = 20;

    for (i, topic) in topics.iter().enumerate() {
        let share = topic.count as f64 / total as f64;
        let filled = (share * bar_width as f64).round() as usize;
        let empty = bar_width.saturating_sub(filled);
        let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(empty));

        println!(
            "  {:>2}. {:<12} {} {:>3} responses",
            i + 1,
            topic.topic.bold(),
            colorize_share(bar, share),
            topic.count
        );
        println!("      {}", topic.summary);

        if !topic.keywords.is_empty() {
            println!("      {}", topic.keywords.join(", ").dimmed());
        }

        for response in &topic.responses {
            println!(
                "      {} {}",
                "-".dimmed(),
                truncate_chars(response, SAMPLE_WIDTH)
            );
        }
        println!();
    }
}

fn colorize_share(bar: String, share: f64) -> ColoredString {
    if share >= 0.25 {
        bar.bright_green()
    } else if share >= 0.10 {
        bar.bright_yellow()
    } else {
        bar.bright_blue()
    }
}
