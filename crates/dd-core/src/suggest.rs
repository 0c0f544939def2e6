//! Suggestion generation for new log entries.
//!
//! Suggestions come from an ordered table of rules. Each rule pairs a
//! predicate over the [`SuggestionContext`] with the suggestions it emits.
//! Every matching rule contributes, in table order; if none match a generic
//! fallback set is used. The result is capped at [`MAX_SUGGESTIONS`].
//!
//! Generation is pure: the caller supplies the history and the local hour.

use crate::{Category, LogEntry, Priority, Suggestion, SuggestionKind};

/// Maximum number of suggestions attached to one entry.
pub const MAX_SUGGESTIONS: usize = 4;

/// How many of the most recent entries the pattern rule looks at.
const RECENT_WINDOW: usize = 5;

/// Length of the task prefix compared by the pattern rule.
const PREFIX_CHARS: usize = 10;

/// A category must appear more often than this to count as the user's usual focus.
const DOMINANT_CATEGORY_MIN: usize = 3;

/// Everything a rule may inspect.
#[derive(Debug, Clone)]
pub struct SuggestionContext<'a> {
    /// Lowercased task text.
    task: String,
    category: Category,
    priority: Priority,
    /// Prior entries, most recent first.
    history: &'a [LogEntry],
    /// Local hour of day, 0 to 23.
    hour: u32,
}

impl<'a> SuggestionContext<'a> {
    pub fn new(
        task: &str,
        category: Category,
        priority: Priority,
        history: &'a [LogEntry],
        hour: u32,
    ) -> Self {
        Self {
            task: task.to_lowercase(),
            category,
            priority,
            history,
            hour,
        }
    }

    fn mentions(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|keyword| self.task.contains(keyword))
    }
}

/// A fixed suggestion, materialized when a rule fires.
#[derive(Debug, Clone, Copy)]
struct Template {
    kind: SuggestionKind,
    title: &'static str,
    content: &'static str,
    priority: Priority,
}

impl Template {
    const fn new(
        kind: SuggestionKind,
        priority: Priority,
        title: &'static str,
        content: &'static str,
    ) -> Self {
        Self {
            kind,
            title,
            content,
            priority,
        }
    }

    fn to_suggestion(self) -> Suggestion {
        Suggestion {
            kind: self.kind,
            title: self.title.to_string(),
            content: self.content.to_string(),
            priority: self.priority,
        }
    }
}

/// What a rule produces when its predicate holds.
#[derive(Clone, Copy)]
enum Emit {
    Fixed(&'static [Template]),
    Computed(fn(&SuggestionContext<'_>) -> Vec<Suggestion>),
}

/// A predicate and the suggestions it yields.
#[derive(Clone, Copy)]
struct Rule {
    name: &'static str,
    applies: fn(&SuggestionContext<'_>) -> bool,
    emit: Emit,
}

use Priority::{High, Low, Medium};
use SuggestionKind::{Insight, Tip, Tool};

/// Rules in evaluation order. Order is part of the output contract, since the
/// cap keeps only the first suggestions.
const RULES: &[Rule] = &[
    Rule {
        name: "recent-pattern",
        applies: repeats_recent_task,
        emit: Emit::Fixed(&[Template::new(
            Insight,
            High,
            "Pattern Detected",
            "You've worked on similar tasks recently. Consider a checklist or template to streamline this work.",
        )]),
    },
    Rule {
        name: "debugging",
        applies: is_debugging,
        emit: Emit::Fixed(&[
            Template::new(
                Tool,
                Medium,
                "Advanced Debugging",
                "Set breakpoints in your debugger or browser DevTools instead of scattering print statements.",
            ),
            Template::new(
                Tip,
                High,
                "Debugging Methodology",
                "Work like a scientist: hypothesize, test, observe, repeat. Write down what you rule out.",
            ),
        ]),
    },
    Rule {
        name: "frontend-debugging",
        applies: is_frontend_debugging,
        emit: Emit::Fixed(&[Template::new(
            Tool,
            Medium,
            "Frontend Debugging",
            "Use the React or Vue devtools profiler to isolate component-specific issues.",
        )]),
    },
    Rule {
        name: "testing",
        applies: is_testing,
        emit: Emit::Fixed(&[
            Template::new(
                Tool,
                High,
                "Testing Strategy",
                "Follow the testing pyramid: many unit tests, fewer integration tests, minimal end-to-end tests.",
            ),
            Template::new(
                Tip,
                Medium,
                "Test-Driven Development",
                "Write a failing test first, then the code that makes it pass.",
            ),
        ]),
    },
    Rule {
        name: "api-testing",
        applies: is_api_testing,
        emit: Emit::Fixed(&[Template::new(
            Tool,
            Medium,
            "API Testing",
            "Keep API checks in a collection runner such as Newman and run it in CI.",
        )]),
    },
    Rule {
        name: "performance",
        applies: is_performance,
        emit: Emit::Fixed(&[
            Template::new(
                Tool,
                High,
                "Performance Analysis",
                "Profile before changing anything: DevTools Performance tab, Lighthouse, or a flamegraph.",
            ),
            Template::new(
                Tip,
                High,
                "Performance Budget",
                "Set explicit budgets: under 3s load, under 100ms response, under 50KB critical resources.",
            ),
            Template::new(
                Insight,
                Medium,
                "Optimization Priority",
                "Focus on Core Web Vitals (LCP, FID, CLS) for the biggest user-facing gains.",
            ),
        ]),
    },
    Rule {
        name: "api",
        applies: is_api,
        emit: Emit::Fixed(&[
            Template::new(
                Tool,
                Medium,
                "API Development",
                "Describe endpoints with OpenAPI and exercise them from a client like Insomnia.",
            ),
            Template::new(
                Tip,
                High,
                "API Security",
                "Cover rate limiting, input validation, authentication and CORS before shipping.",
            ),
        ]),
    },
    Rule {
        name: "ui-framework",
        applies: is_ui_framework,
        emit: Emit::Fixed(&[
            Template::new(
                Tool,
                Medium,
                "React Development",
                "Use the React Profiler and reach for memo, useMemo and useCallback where renders are hot.",
            ),
            Template::new(
                Tip,
                Medium,
                "React Best Practices",
                "Give each component a single responsibility and keep it under 200 lines.",
            ),
        ]),
    },
    Rule {
        name: "styling",
        applies: is_styling,
        emit: Emit::Fixed(&[
            Template::new(
                Tool,
                Medium,
                "CSS Development",
                "Use custom properties for theming and combine Grid with Flexbox for layout.",
            ),
            Template::new(
                Tip,
                Medium,
                "Design System",
                "Adopt a spacing scale on a 4px base and a fixed color palette.",
            ),
        ]),
    },
    Rule {
        name: "database",
        applies: is_database,
        emit: Emit::Fixed(&[
            Template::new(
                Tool,
                High,
                "Database Optimization",
                "Run EXPLAIN ANALYZE on slow queries and index frequently filtered columns.",
            ),
            Template::new(
                Tip,
                Medium,
                "Database Design",
                "Normalize to 3NF first, then denormalize deliberately where reads demand it.",
            ),
        ]),
    },
    Rule {
        name: "high-priority",
        applies: is_high_priority,
        emit: Emit::Fixed(&[Template::new(
            Insight,
            High,
            "High Priority Task",
            "Break this into smaller subtasks and tackle the riskiest part first. Consider pair programming.",
        )]),
    },
    Rule {
        name: "late-session",
        applies: is_late_session,
        emit: Emit::Fixed(&[Template::new(
            Tip,
            Medium,
            "Late Work Session",
            "Take regular breaks and keep good lighting. Save the hardest problems for when you are fresh.",
        )]),
    },
    Rule {
        name: "category-shift",
        applies: is_category_shift,
        emit: Emit::Computed(category_shift),
    },
];

/// Used only when no rule matches.
const FALLBACK: &[Template] = &[
    Template::new(
        Tip,
        Medium,
        "General Productivity",
        "Time-box your work: 25 focused minutes, then a 5 minute break.",
    ),
    Template::new(
        Tool,
        Medium,
        "Code Quality",
        "Set up a linter, a formatter and pre-commit hooks so style never reaches review.",
    ),
    Template::new(
        Insight,
        Low,
        "Documentation",
        "Write down your decisions while they are fresh. Your future self will thank you.",
    ),
];

/// Generates up to [`MAX_SUGGESTIONS`] suggestions for a new task.
///
/// `history` is the existing collection, most recent first. `hour` is the
/// local hour of day at submission.
pub fn generate(
    task: &str,
    category: Category,
    priority: Priority,
    history: &[LogEntry],
    hour: u32,
) -> Vec<Suggestion> {
    let ctx = SuggestionContext::new(task, category, priority, history, hour);
    let mut fired = Vec::new();
    let mut suggestions = Vec::new();

    for rule in RULES {
        if !(rule.applies)(&ctx) {
            continue;
        }
        fired.push(rule.name);
        match rule.emit {
            Emit::Fixed(templates) => {
                suggestions.extend(templates.iter().map(|t| t.to_suggestion()));
            }
            Emit::Computed(build) => suggestions.extend(build(&ctx)),
        }
    }

    if suggestions.is_empty() {
        suggestions.extend(FALLBACK.iter().map(|t| t.to_suggestion()));
    }

    tracing::debug!(rules = ?fired, generated = suggestions.len(), "generated suggestions");
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

fn prefix(text: &str) -> String {
    text.chars().take(PREFIX_CHARS).collect()
}

/// The task shares a leading prefix with one of the recent tasks, in either direction.
fn repeats_recent_task(ctx: &SuggestionContext<'_>) -> bool {
    let task_prefix = prefix(&ctx.task);
    ctx.history
        .iter()
        .take(RECENT_WINDOW)
        .map(|entry| entry.task.to_lowercase())
        .filter(|recent| !recent.trim().is_empty())
        .any(|recent| recent.contains(&task_prefix) || ctx.task.contains(&prefix(&recent)))
}

fn is_debugging(ctx: &SuggestionContext<'_>) -> bool {
    ctx.mentions(&["debug", "bug", "error"]) || ctx.category == Category::Debugging
}

fn is_frontend_debugging(ctx: &SuggestionContext<'_>) -> bool {
    is_debugging(ctx) && ctx.mentions(&["frontend", "ui"])
}

fn is_testing(ctx: &SuggestionContext<'_>) -> bool {
    ctx.mentions(&["test", "testing"]) || ctx.category == Category::Testing
}

fn is_api_testing(ctx: &SuggestionContext<'_>) -> bool {
    is_testing(ctx) && ctx.mentions(&["api", "backend"])
}

fn is_performance(ctx: &SuggestionContext<'_>) -> bool {
    ctx.mentions(&["performance", "optimize", "slow"])
}

fn is_api(ctx: &SuggestionContext<'_>) -> bool {
    ctx.mentions(&["api", "backend", "server"])
}

fn is_ui_framework(ctx: &SuggestionContext<'_>) -> bool {
    ctx.mentions(&["react", "component", "jsx"])
}

fn is_styling(ctx: &SuggestionContext<'_>) -> bool {
    ctx.mentions(&["css", "style", "design"])
}

fn is_database(ctx: &SuggestionContext<'_>) -> bool {
    ctx.mentions(&["database", "sql", "query"])
}

fn is_high_priority(ctx: &SuggestionContext<'_>) -> bool {
    ctx.priority == Priority::High
}

fn is_late_session(ctx: &SuggestionContext<'_>) -> bool {
    ctx.hour >= 18 || ctx.hour <= 6
}

fn is_category_shift(ctx: &SuggestionContext<'_>) -> bool {
    dominant_category(ctx.history)
        .is_some_and(|(usual, count)| usual != ctx.category && count > DOMINANT_CATEGORY_MIN)
}

fn category_shift(ctx: &SuggestionContext<'_>) -> Vec<Suggestion> {
    let Some((usual, _)) = dominant_category(ctx.history) else {
        return Vec::new();
    };
    vec![Suggestion {
        kind: Insight,
        title: "Category Shift".to_string(),
        content: format!(
            "You usually work on {usual}. This change in focus might benefit from extra planning."
        ),
        priority: Low,
    }]
}

/// The most frequent category in `history` with its count.
///
/// Categories are compared in order of first appearance; on a tie the one
/// seen later wins.
fn dominant_category(history: &[LogEntry]) -> Option<(Category, usize)> {
    let mut counts: Vec<(Category, usize)> = Vec::new();
    for entry in history {
        match counts.iter_mut().find(|(category, _)| *category == entry.category) {
            Some((_, count)) => *count += 1,
            None => counts.push((entry.category, 1)),
        }
    }
    counts
        .into_iter()
        .reduce(|best, next| if best.1 > next.1 { best } else { next })
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};

    use crate::LogId;

    const AFTERNOON: u32 = 14;

    fn history_entry(n: u32, task: &str, category: Category) -> LogEntry {
        LogEntry {
            id: LogId::new(format!("log-{n}")).unwrap(),
            task: task.to_string(),
            category,
            priority: Priority::Medium,
            time_spent: None,
            tags: Vec::new(),
            suggestions: Vec::new(),
            timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 9, n, 0).unwrap(),
            completed: false,
        }
    }

    fn titles(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.title.as_str()).collect()
    }

    fn fired(ctx: &SuggestionContext<'_>) -> Vec<&'static str> {
        RULES
            .iter()
            .filter(|rule| (rule.applies)(ctx))
            .map(|rule| rule.name)
            .collect()
    }

    #[test]
    fn debugging_high_priority_example() {
        let suggestions = generate(
            "Fixed bug in login",
            Category::Debugging,
            Priority::High,
            &[],
            AFTERNOON,
        );

        assert_eq!(
            titles(&suggestions),
            vec![
                "Advanced Debugging",
                "Debugging Methodology",
                "High Priority Task"
            ]
        );
        assert_eq!(suggestions[0].kind, SuggestionKind::Tool);
        assert_eq!(suggestions[1].kind, SuggestionKind::Tip);
        assert_eq!(suggestions[1].priority, Priority::High);
        assert_eq!(suggestions[2].kind, SuggestionKind::Insight);
        assert_eq!(suggestions[2].priority, Priority::High);
    }

    #[test]
    fn keyword_rules_emit_their_templates() {
        let cases: &[(&str, &[(&str, SuggestionKind, Priority)])] = &[
            (
                "Build React component",
                &[
                    ("React Development", SuggestionKind::Tool, Priority::Medium),
                    ("React Best Practices", SuggestionKind::Tip, Priority::Medium),
                ],
            ),
            (
                "Fix CSS layout",
                &[
                    ("CSS Development", SuggestionKind::Tool, Priority::Medium),
                    ("Design System", SuggestionKind::Tip, Priority::Medium),
                ],
            ),
            (
                "Add pagination endpoint to server",
                &[
                    ("API Development", SuggestionKind::Tool, Priority::Medium),
                    ("API Security", SuggestionKind::Tip, Priority::High),
                ],
            ),
            (
                "Speed up slow dashboard",
                &[
                    ("Performance Analysis", SuggestionKind::Tool, Priority::High),
                    ("Performance Budget", SuggestionKind::Tip, Priority::High),
                    ("Optimization Priority", SuggestionKind::Insight, Priority::Medium),
                ],
            ),
            (
                "Tune SQL indexes",
                &[
                    ("Database Optimization", SuggestionKind::Tool, Priority::High),
                    ("Database Design", SuggestionKind::Tip, Priority::Medium),
                ],
            ),
        ];

        for (task, expected) in cases {
            let suggestions =
                generate(task, Category::Development, Priority::Medium, &[], AFTERNOON);
            let actual: Vec<(&str, SuggestionKind, Priority)> = suggestions
                .iter()
                .map(|s| (s.title.as_str(), s.kind, s.priority))
                .collect();
            assert_eq!(actual, *expected, "suggestions for {task:?}");
        }
    }

    #[test]
    fn ui_and_styling_keywords_match_case_insensitively() {
        let ctx = SuggestionContext::new(
            "Restyle the JSX header per DESIGN review",
            Category::Development,
            Priority::Medium,
            &[],
            AFTERNOON,
        );
        assert_eq!(fired(&ctx), vec!["ui-framework", "styling"]);
    }

    #[test]
    fn category_shift_names_dominant_category() {
        let history: Vec<LogEntry> = (0..4)
            .map(|n| history_entry(n, &format!("Implement feature {n}"), Category::Development))
            .collect();

        let suggestions = generate(
            "Write unit tests",
            Category::Testing,
            Priority::Medium,
            &history,
            AFTERNOON,
        );

        let shift = suggestions
            .iter()
            .find(|s| s.title == "Category Shift")
            .expect("category shift insight");
        assert_eq!(shift.kind, SuggestionKind::Insight);
        assert_eq!(shift.priority, Priority::Low);
        assert!(shift.content.contains("development"));
        assert_eq!(
            titles(&suggestions),
            vec!["Testing Strategy", "Test-Driven Development", "Category Shift"]
        );
    }

    #[test]
    fn category_shift_needs_more_than_three_entries() {
        let history: Vec<LogEntry> = (0..3)
            .map(|n| history_entry(n, &format!("Implement feature {n}"), Category::Development))
            .collect();

        let ctx = SuggestionContext::new(
            "Write unit tests",
            Category::Testing,
            Priority::Medium,
            &history,
            AFTERNOON,
        );
        assert!(!fired(&ctx).contains(&"category-shift"));
    }

    #[test]
    fn category_shift_skipped_when_category_matches() {
        let history: Vec<LogEntry> = (0..5)
            .map(|n| history_entry(n, &format!("Implement feature {n}"), Category::Development))
            .collect();

        let ctx = SuggestionContext::new(
            "Wire up settings page",
            Category::Development,
            Priority::Low,
            &history,
            AFTERNOON,
        );
        assert!(fired(&ctx).is_empty());
    }

    #[test]
    fn fallback_when_nothing_matches() {
        let suggestions = generate(
            "Weekly planning sync",
            Category::Planning,
            Priority::Low,
            &[],
            AFTERNOON,
        );

        assert_eq!(
            titles(&suggestions),
            vec!["General Productivity", "Code Quality", "Documentation"]
        );
    }

    #[test]
    fn output_is_capped_in_rule_order() {
        // debugging (2) + frontend debugging (1) + performance (3) + high priority (1)
        let suggestions = generate(
            "Debug slow frontend render",
            Category::Debugging,
            Priority::High,
            &[],
            AFTERNOON,
        );

        assert_eq!(suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(
            titles(&suggestions),
            vec![
                "Advanced Debugging",
                "Debugging Methodology",
                "Frontend Debugging",
                "Performance Analysis"
            ]
        );
    }

    #[test]
    fn pattern_detected_for_repeated_prefix() {
        let history = vec![history_entry(
            0,
            "Refactor billing module",
            Category::Refactoring,
        )];

        let suggestions = generate(
            "Refactor billing exports",
            Category::Refactoring,
            Priority::Low,
            &history,
            AFTERNOON,
        );

        assert_eq!(suggestions[0].title, "Pattern Detected");
        assert_eq!(suggestions[0].priority, Priority::High);
    }

    #[test]
    fn pattern_matches_when_recent_task_prefix_is_inside_new_task() {
        let history = vec![history_entry(0, "Deploy v2", Category::Deployment)];

        let ctx = SuggestionContext::new(
            "Rollback after deploy v2 went wrong",
            Category::Deployment,
            Priority::Low,
            &history,
            AFTERNOON,
        );
        assert!(repeats_recent_task(&ctx));
    }

    #[test]
    fn pattern_only_looks_at_five_most_recent() {
        let mut history: Vec<LogEntry> = (0..5)
            .map(|n| history_entry(n, &format!("Meeting number {n}"), Category::Meeting))
            .collect();
        history.push(history_entry(5, "Refactor billing module", Category::Refactoring));

        let ctx = SuggestionContext::new(
            "Refactor billing exports",
            Category::Refactoring,
            Priority::Low,
            &history,
            AFTERNOON,
        );
        assert!(!repeats_recent_task(&ctx));
    }

    #[test]
    fn late_session_boundaries() {
        for (hour, expected) in [(6, true), (7, false), (17, false), (18, true), (23, true), (0, true)] {
            let ctx = SuggestionContext::new("x", Category::Planning, Priority::Low, &[], hour);
            assert_eq!(is_late_session(&ctx), expected, "hour {hour}");
        }
    }

    #[test]
    fn late_session_tip_is_medium_priority() {
        let suggestions = generate("Weekly sync", Category::Meeting, Priority::Low, &[], 22);
        assert_eq!(titles(&suggestions), vec!["Late Work Session"]);
        assert_eq!(suggestions[0].priority, Priority::Medium);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let ctx = SuggestionContext::new(
            "Tune SQL Query plans",
            Category::Research,
            Priority::Low,
            &[],
            AFTERNOON,
        );
        assert_eq!(fired(&ctx), vec!["database"]);
    }

    #[test]
    fn api_testing_adds_extra_tool() {
        let ctx = SuggestionContext::new(
            "Cover backend handlers",
            Category::Testing,
            Priority::Low,
            &[],
            AFTERNOON,
        );
        assert_eq!(fired(&ctx), vec!["testing", "api-testing", "api"]);
    }

    #[test]
    fn dominant_category_tie_goes_to_later_first_seen() {
        let history = vec![
            history_entry(0, "a", Category::Research),
            history_entry(1, "b", Category::Learning),
            history_entry(2, "c", Category::Research),
            history_entry(3, "d", Category::Learning),
        ];
        assert_eq!(dominant_category(&history), Some((Category::Learning, 2)));
        assert_eq!(dominant_category(&[]), None);
    }

    #[test]
    fn every_rule_has_a_unique_name() {
        let mut names: Vec<_> = RULES.iter().map(|rule| rule.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RULES.len());
    }
}
