//! Prompt templates for daily and weekly reports.
//!
//! Prompts list the highest-scoring stories of the period followed by a fixed
//! set of instructions. Ranking is by `score`, descending, and stable on ties
//! so the upstream order decides between equal scores.

use crate::models::{Item, Snapshot};
use itertools::Itertools;
use std::fmt::Write;

/// System message sent with every report request.
pub const SYSTEM_PROMPT: &str = "You are a professional technology news analyst. \
You write concise, well-structured briefings on Hacker News activity for software engineers.";

const DAILY_STORY_COUNT: usize = 10;
const WEEKLY_STORY_COUNT: usize = 20;

const DAILY_INSTRUCTIONS: &str = "Please provide the following:
1. Today's overview: briefly summarize the main topics and trends on Hacker News today.
2. Stories worth attention: pick 3-5 of the most noteworthy topics and explain why they matter.
3. Technology trends: based on today's popular topics, analyze current technology trends.
4. Recommended reading: recommend 1-2 articles most worth reading in depth, with a short reason for each.

Write in clear, professional language for technology practitioners. Keep the report concise and focused on what matters.";

const WEEKLY_INSTRUCTIONS: &str = "Please provide the following:
1. Weekly overview: briefly summarize the main topics and trends on Hacker News this week.
2. Hot topic analysis: analyze the 3-5 technology topics that drew the most attention this week and why they matter.
3. Technology trend insights: based on this week's topics, analyze current technology trends and where they may be heading.
4. Notable projects and tools: introduce open-source projects, tools, or services worth watching that appeared this week.
5. Industry news: summarize important developments and changes in the technology industry this week.
6. Recommended reading: recommend 2-3 articles from this week most worth reading in depth, with a short reason for each.

Write in clear, professional language for technology practitioners. Be thorough without padding, highlight what matters, and offer real insight.";

/// The `limit` highest-scoring stories, stable on ties.
fn top_by_score<'a>(stories: impl IntoIterator<Item = &'a Item>, limit: usize) -> Vec<&'a Item> {
    stories
        .into_iter()
        .sorted_by(|a, b| b.score().cmp(&a.score()))
        .take(limit)
        .collect()
}

fn write_story_list(prompt: &mut String, stories: &[&Item]) {
    for (i, story) in stories.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "{}. {} (score: {}, comments: {})\n   Link: {}\n",
            i + 1,
            story.title.as_deref().unwrap_or("Untitled"),
            story.score(),
            story.descendants(),
            story.url.as_deref().unwrap_or(""),
        );
    }
}

/// Build the daily report prompt for one snapshot.
pub fn daily_prompt(snapshot: &Snapshot) -> String {
    let top = top_by_score(&snapshot.top_stories, DAILY_STORY_COUNT);

    let mut prompt = format!(
        "Based on the following Hacker News data, write a daily technology news briefing for {}.\n\n\
         Today's top {} stories:\n",
        snapshot.date, DAILY_STORY_COUNT
    );
    write_story_list(&mut prompt, &top);
    prompt.push_str(DAILY_INSTRUCTIONS);
    prompt
}

/// Build the weekly report prompt over date-sorted snapshots.
///
/// Top and best stories from every day are merged, each story id is kept
/// once (first occurrence wins), and the highest-scoring are listed.
///
/// Returns `None` when `snapshots` is empty.
pub fn weekly_prompt(snapshots: &[Snapshot]) -> Option<String> {
    let start_date = &snapshots.first()?.date;
    let end_date = &snapshots.last()?.date;

    let unique = snapshots
        .iter()
        .flat_map(|day| day.top_stories.iter().chain(day.best_stories.iter()))
        .unique_by(|story| story.id);
    let top = top_by_score(unique, WEEKLY_STORY_COUNT);

    let mut prompt = format!(
        "Based on the following Hacker News data, write a weekly technology news briefing for {} to {}.\n\n\
         This week's top {} stories:\n",
        start_date, end_date, WEEKLY_STORY_COUNT
    );
    write_story_list(&mut prompt, &top);
    prompt.push_str(WEEKLY_INSTRUCTIONS);
    Some(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: u64, title: &str, score: i64) -> Item {
        let mut item = Item::new(id);
        item.kind = Some("story".to_string());
        item.title = Some(title.to_string());
        item.url = Some(format!("https://example.com/{id}"));
        item.score = Some(score);
        item.descendants = Some(score / 2);
        item
    }

    fn snapshot(date: &str, top: Vec<Item>, best: Vec<Item>) -> Snapshot {
        Snapshot {
            date: date.to_string(),
            timestamp: 0.0,
            top_stories: top,
            new_stories: vec![],
            best_stories: best,
        }
    }

    #[test]
    fn test_daily_prompt_ranks_by_score() {
        let top = (1..=12).map(|i| story(i, &format!("Story {i}"), i as i64 * 10)).collect();
        let prompt = daily_prompt(&snapshot("2025-05-06", top, vec![]));

        assert!(prompt.contains("2025-05-06"));
        assert!(prompt.contains("1. Story 12 (score: 120, comments: 60)\n   Link: https://example.com/12"));
        assert!(prompt.contains("10. Story 3 (score: 30"));
        assert!(!prompt.contains("Story 2 "));
        assert!(prompt.ends_with(DAILY_INSTRUCTIONS));
    }

    #[test]
    fn test_daily_prompt_handles_missing_fields() {
        let prompt = daily_prompt(&snapshot("2025-05-06", vec![Item::new(1)], vec![]));
        assert!(prompt.contains("1. Untitled (score: 0, comments: 0)\n   Link: \n"));
    }

    #[test]
    fn test_ties_keep_upstream_order() {
        let items = [story(1, "a", 5), story(2, "b", 5), story(3, "c", 9)];
        let ranked: Vec<u64> = top_by_score(&items, 3).iter().map(|s| s.id).collect();
        assert_eq!(ranked, vec![3, 1, 2]);
    }

    #[test]
    fn test_weekly_prompt_dedupes_and_spans_dates() {
        let days = vec![
            snapshot("2025-05-05", vec![story(1, "Rust 2.0", 500)], vec![story(2, "Zig", 300)]),
            snapshot("2025-05-06", vec![story(1, "Rust 2.0", 700)], vec![story(3, "Go", 100)]),
        ];
        let prompt = weekly_prompt(&days).unwrap();

        assert!(prompt.contains("2025-05-05 to 2025-05-06"));
        assert_eq!(prompt.matches("Rust 2.0").count(), 1);
        // First occurrence wins, so the earlier score is reported.
        assert!(prompt.contains("1. Rust 2.0 (score: 500"));
        assert!(prompt.contains("2. Zig"));
        assert!(prompt.contains("3. Go"));
        assert!(prompt.ends_with(WEEKLY_INSTRUCTIONS));
    }

    #[test]
    fn test_weekly_prompt_ignores_new_stories() {
        let mut day = snapshot("2025-05-06", vec![], vec![]);
        day.new_stories.push(story(9, "Fresh", 1));
        let prompt = weekly_prompt(&[day]).unwrap();
        assert!(!prompt.contains("Fresh"));
    }

    #[test]
    fn test_weekly_prompt_needs_data() {
        assert!(weekly_prompt(&[]).is_none());
    }
}
